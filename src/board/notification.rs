use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotificationKind {
    #[default]
    Success,
    Error,
}

impl NotificationKind {
    pub fn css_class(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationState {
    pub text: String,
    pub kind: NotificationKind,
    pub visible: bool,
}

#[derive(Default)]
struct Shared {
    state: NotificationState,
    generation: u64,
}

/// The single message area. Each `show` arms a hide timer and aborts the one
/// it supersedes, so an older timer never hides a newer message.
pub struct NotificationArea {
    shared: Arc<Mutex<Shared>>,
    hide_timer: Mutex<Option<JoinHandle<()>>>,
    hide_after: Duration,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl NotificationArea {
    pub fn new(hide_after: Duration) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared::default())),
            hide_timer: Mutex::new(None),
            hide_after,
        }
    }

    pub fn state(&self) -> NotificationState {
        lock(&self.shared).state.clone()
    }

    /// Must be called from within a tokio runtime.
    pub fn show(&self, text: impl Into<String>, kind: NotificationKind) {
        let generation = {
            let mut shared = lock(&self.shared);
            shared.generation += 1;
            shared.state = NotificationState {
                text: text.into(),
                kind,
                visible: true,
            };
            shared.generation
        };

        let shared = Arc::clone(&self.shared);
        let hide_after = self.hide_after;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(hide_after).await;
            let mut shared = lock(&shared);
            // A newer message may have landed between wake-up and lock.
            if shared.generation == generation {
                shared.state.visible = false;
            }
        });

        if let Some(previous) = lock(&self.hide_timer).replace(timer) {
            debug!("Cancelling superseded notification timer");
            previous.abort();
        }
    }
}

impl Drop for NotificationArea {
    fn drop(&mut self) {
        if let Some(timer) = lock(&self.hide_timer).take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HIDE: Duration = Duration::from_secs(5);

    // With the clock paused, sleeping auto-advances through earlier timers first.
    async fn advance(secs: u64) {
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_starts_hidden() {
        let area = NotificationArea::new(HIDE);
        assert!(!area.state().visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hides_after_delay() {
        let area = NotificationArea::new(HIDE);
        area.show("Signed up", NotificationKind::Success);
        assert!(area.state().visible);

        advance(4).await;
        assert!(area.state().visible);

        advance(2).await;
        let state = area.state();
        assert!(!state.visible);
        assert_eq!(state.text, "Signed up");
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_message_is_not_hidden_by_old_timer() {
        let area = NotificationArea::new(HIDE);
        area.show("first", NotificationKind::Success);
        advance(3).await;

        area.show("second", NotificationKind::Error);
        advance(3).await;
        let state = area.state();
        assert!(state.visible, "old timer must not hide the newer message");
        assert_eq!(state.text, "second");
        assert_eq!(state.kind, NotificationKind::Error);

        advance(3).await;
        assert!(!area.state().visible);
    }

    #[test]
    fn test_css_class() {
        assert_eq!(NotificationKind::Success.css_class(), "success");
        assert_eq!(NotificationKind::Error.css_class(), "error");
    }
}
