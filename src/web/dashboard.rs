use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use tracing::debug;

use super::views::{render_confirm_page, render_page};
use super::AppState;
use crate::board::controller::unregister_prompt;
use crate::board::dispatch::{ClickAction, ClickTarget};
use crate::board::{HandlerOutcome, SignupForm};

/// A click inside the activities list, as posted by a removal control or by
/// the confirmation page.
#[derive(Debug, Deserialize)]
pub(crate) struct ClickForm {
    #[serde(default)]
    marker: String,
    #[serde(rename = "data-activity")]
    activity: Option<String>,
    #[serde(rename = "data-email")]
    email: Option<String>,
    confirmed: Option<String>,
}

impl ClickForm {
    fn target(&self) -> ClickTarget {
        let mut target = ClickTarget::new(&[self.marker.as_str()]);
        if let Some(activity) = &self.activity {
            target = target.with_data("activity", activity);
        }
        if let Some(email) = &self.email {
            target = target.with_data("email", email);
        }
        target
    }
}

fn page(state: &AppState, form: &SignupForm) -> Html<String> {
    Html(render_page(&state.title, state.timezone, &state.board.snapshot(), form))
}

/// Page-ready: load the activities, then render with an empty form.
pub(crate) async fn index_handler(State(state): State<AppState>) -> Html<String> {
    state.board.load().await;
    page(&state, &SignupForm::default())
}

/// A failed signup answers with the submitter's own values still in the
/// form. Anything else goes back to the board.
pub(crate) async fn signup_handler(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Response {
    let outcome = state.board.submit_signup(&form).await;
    debug!("Signup settled: {:?} (board {:?})", outcome, state.board.phase());
    match outcome {
        HandlerOutcome::Rejected | HandlerOutcome::Errored => page(&state, &form).into_response(),
        _ => Redirect::to("/").into_response(),
    }
}

pub(crate) async fn click_handler(
    State(state): State<AppState>,
    Form(click): Form<ClickForm>,
) -> Response {
    let target = click.target();

    let answer = match click.confirmed.as_deref() {
        Some(answer) => answer == "yes",
        None => {
            // Ask first; the confirmation page posts the click back with an answer.
            if let (Some(ClickAction::Unregister), Some(activity), Some(email)) =
                (target.action(), target.data("activity"), target.data("email"))
            {
                let prompt = unregister_prompt(email, activity);
                return Html(render_confirm_page(&state.title, &prompt, &target)).into_response();
            }
            false
        }
    };

    let outcome = state
        .board
        .handle_click(&target, &move |_: &str| answer)
        .await;
    debug!("Click settled: {:?} (board {:?})", outcome, state.board.phase());
    Redirect::to("/").into_response()
}
