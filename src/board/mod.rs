pub mod controller;
pub mod dispatch;
pub mod markup;
pub mod notification;
pub mod render;

use serde::Deserialize;

pub use controller::{ActivityBoardController, BoardSnapshot, HandlerOutcome};

/// Current values of the signup form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub activity: String,
}

/// Synchronous yes/no question put to the user before a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
