//! Confirmation prompts for destructive actions.

/// Asks the user to confirm an action.
///
/// In the browser this is the blocking `confirm()` dialog.
pub trait Confirm: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

/// The answer the user already gave in the browser.
///
/// Delete controls carry `hx-confirm`, so htmx shows the dialog before the
/// request is sent. The request then reports the answer along with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answered(pub bool);

impl Confirm for Answered {
    fn confirm(&self, message: &str) -> bool {
        tracing::debug!("\"{message}\" answered with {}", self.0);
        self.0
    }
}
