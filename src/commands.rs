use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use tracing::debug;

use crate::board::dispatch::{ClickTarget, DELETE_MARKER};
use crate::board::render::{ActivityCard, ListArea, LOAD_FAILED_MESSAGE, NO_PARTICIPANTS_MESSAGE};
use crate::board::{ActivityBoardController, Confirm, HandlerOutcome, SignupForm};
use crate::client::ActivitiesClient;
use crate::models::Config;

/// Asks on the terminal. Anything but "y"/"yes" declines.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(_) => is_yes(&line),
            Err(e) => {
                debug!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn build_board(config: &Config) -> Result<ActivityBoardController> {
    let api = ActivitiesClient::new(&config.backend.base_url)?;
    Ok(ActivityBoardController::new(
        Arc::new(api),
        Duration::from_secs(config.notification.hide_after_secs),
    ))
}

fn print_card(card: &ActivityCard) {
    println!("{} ({} spots left)", card.name, card.spots_left);
    println!("  {}", card.description);
    println!("  Schedule: {}", card.schedule);
    if card.participants.is_empty() {
        println!("  {}", NO_PARTICIPANTS_MESSAGE);
    } else {
        println!("  Participants:");
        for p in &card.participants {
            println!("    - {}", p.email);
        }
    }
}

/// Print the server's message, failing the command on an error notification.
fn report(board: &ActivityBoardController, outcome: HandlerOutcome) -> Result<()> {
    let note = board.snapshot().notification;
    match outcome {
        HandlerOutcome::Succeeded => {
            println!("{}", note.text);
            Ok(())
        }
        HandlerOutcome::Rejected | HandlerOutcome::Errored => bail!("{}", note.text),
        HandlerOutcome::Declined => {
            println!("Cancelled.");
            Ok(())
        }
        HandlerOutcome::Ignored => {
            println!("Nothing to do.");
            Ok(())
        }
    }
}

pub async fn run_list(config: &Config) -> Result<()> {
    let board = build_board(config)?;
    board.load().await;

    match board.snapshot().view.list {
        ListArea::Cards(cards) if cards.is_empty() => println!("No activities."),
        ListArea::Cards(cards) => {
            for (i, card) in cards.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print_card(card);
            }
        }
        ListArea::Loading | ListArea::LoadFailed => bail!(LOAD_FAILED_MESSAGE),
    }
    Ok(())
}

pub async fn run_signup(config: &Config, email: &str, activity: &str) -> Result<()> {
    let board = build_board(config)?;
    let form = SignupForm {
        email: email.to_string(),
        activity: activity.to_string(),
    };
    let outcome = board.submit_signup(&form).await;
    report(&board, outcome)
}

pub async fn run_unregister(config: &Config, email: &str, activity: &str, yes: bool) -> Result<()> {
    let board = build_board(config)?;
    let target = ClickTarget::new(&[DELETE_MARKER])
        .with_data("activity", activity)
        .with_data("email", email);

    let outcome = if yes {
        board.handle_click(&target, &|_: &str| true).await
    } else {
        board.handle_click(&target, &StdinConfirm).await
    };
    report(&board, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
        assert!(!is_yes("yep"));
    }
}
