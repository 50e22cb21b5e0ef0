use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::dispatch::{ClickAction, ClickTarget};
use super::notification::{NotificationArea, NotificationKind, NotificationState};
use super::render::{self, ListArea, SelectOption};
use super::{Confirm, SignupForm};
use crate::client::ActivitiesApi;
use crate::models::ServerReply;

pub const SIGNUP_FAILED_MESSAGE: &str = "Failed to sign up. Please try again.";
pub const UNREGISTER_FAILED_MESSAGE: &str = "Failed to unregister. Please try again.";
pub const REJECTED_FALLBACK_MESSAGE: &str = "An error occurred";

pub fn unregister_prompt(email: &str, activity: &str) -> String {
    format!("Are you sure you want to unregister {email} from {activity}?")
}

/// The parts of the host page every visitor shares. The signup form is not
/// one of them: each submission renders its own form values.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardView {
    pub list: ListArea,
    pub options: Vec<SelectOption>,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            list: ListArea::Loading,
            options: vec![SelectOption::placeholder()],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    pub view: BoardView,
    pub notification: NotificationState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// Server accepted; the list was reloaded.
    Succeeded,
    /// Server answered with a non-success status.
    Rejected,
    /// Transport or parse failure.
    Errored,
    /// The user declined the confirmation prompt.
    Declined,
    /// The click carried no actionable marker or context.
    Ignored,
}

/// Which mutation a reply belongs to.
#[derive(Clone, Copy)]
enum Mutation {
    Signup,
    Unregister,
}

impl Mutation {
    fn failure_message(self) -> &'static str {
        match self {
            Mutation::Signup => SIGNUP_FAILED_MESSAGE,
            Mutation::Unregister => UNREGISTER_FAILED_MESSAGE,
        }
    }
}

/// Back to `Idle` when the request settles, whichever way it settles.
struct SubmissionGuard<'a>(&'a AtomicUsize);

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Loader, signup handler and delegated unregister handler around one view
/// and one notification area. Locks are never held across a request, so
/// concurrent handlers interleave and the last reload to finish wins.
pub struct ActivityBoardController {
    api: Arc<dyn ActivitiesApi>,
    view: Mutex<BoardView>,
    notification: NotificationArea,
    in_flight: AtomicUsize,
}

impl ActivityBoardController {
    pub fn new(api: Arc<dyn ActivitiesApi>, hide_after: Duration) -> Self {
        Self {
            api,
            view: Mutex::new(BoardView::default()),
            notification: NotificationArea::new(hide_after),
            in_flight: AtomicUsize::new(0),
        }
    }

    fn view(&self) -> MutexGuard<'_, BoardView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            view: self.view().clone(),
            notification: self.notification.state(),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.in_flight.load(Ordering::SeqCst) == 0 {
            Phase::Idle
        } else {
            Phase::Submitting
        }
    }

    fn begin_submission(&self) -> SubmissionGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        SubmissionGuard(&self.in_flight)
    }

    /// Fetch the activity set and rebuild the list and the select options.
    pub async fn load(&self) {
        match self.api.list_activities().await {
            Ok(set) => {
                if set.is_empty() {
                    warn!("Backend returned no activities");
                }
                let cards = render::build_cards(&set);
                let options = render::build_options(&set);
                debug!("Rendering {} activities", cards.len());
                let mut view = self.view();
                view.list = ListArea::Cards(cards);
                view.options = options;
            }
            Err(e) => {
                error!("Error fetching activities: {:#}", e);
                self.view().list = ListArea::LoadFailed;
            }
        }
    }

    pub async fn submit_signup(&self, form: &SignupForm) -> HandlerOutcome {
        let _guard = self.begin_submission();

        info!("Signing up {} for {}", form.email, form.activity);
        let reply = self.api.signup(&form.activity, &form.email).await;
        self.settle(Mutation::Signup, reply).await
    }

    /// Delegated click handler for the whole list container.
    pub async fn handle_click<C>(&self, target: &ClickTarget, confirm: &C) -> HandlerOutcome
    where
        C: Confirm + ?Sized,
    {
        match target.action() {
            Some(ClickAction::Unregister) => self.unregister(target, confirm).await,
            None => HandlerOutcome::Ignored,
        }
    }

    async fn unregister<C>(&self, target: &ClickTarget, confirm: &C) -> HandlerOutcome
    where
        C: Confirm + ?Sized,
    {
        let (Some(activity), Some(email)) = (target.data("activity"), target.data("email")) else {
            debug!("Ignoring removal click without activity/email attributes");
            return HandlerOutcome::Ignored;
        };

        if !confirm.confirm(&unregister_prompt(email, activity)) {
            debug!("Unregister of {} from {} declined", email, activity);
            return HandlerOutcome::Declined;
        }

        let _guard = self.begin_submission();
        info!("Unregistering {} from {}", email, activity);
        let reply = self.api.unregister(activity, email).await;
        self.settle(Mutation::Unregister, reply).await
    }

    async fn settle(&self, mutation: Mutation, reply: anyhow::Result<ServerReply>) -> HandlerOutcome {
        match reply {
            Ok(ServerReply::Accepted { message }) => {
                self.notification.show(message, NotificationKind::Success);
                self.load().await;
                HandlerOutcome::Succeeded
            }
            Ok(ServerReply::Rejected { status, detail }) => {
                warn!("Request rejected with status {}: {:?}", status, detail);
                let text = detail.unwrap_or_else(|| REJECTED_FALLBACK_MESSAGE.to_string());
                self.notification.show(text, NotificationKind::Error);
                HandlerOutcome::Rejected
            }
            Err(e) => {
                error!("Error: {:#}", e);
                self.notification
                    .show(mutation.failure_message(), NotificationKind::Error);
                HandlerOutcome::Errored
            }
        }
    }
}
