use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::Value;

use super::fatal::FatalScreen;
use crate::host::ToastSeverity;

/// Side effects the controller wants performed.
///
/// Commands are returned from the update step and executed against the
/// collaborator traits; they are the only channel through which state
/// transitions touch the outside world.
pub enum Command<Msg> {
    /// Do nothing.
    None,

    /// Execute multiple commands in sequence.
    Batch(Vec<Command<Msg>>),

    /// Show a transient, auto-dismissing notification.
    Toast {
        message: String,
        severity: ToastSeverity,
    },

    /// Announce a message to assistive technology.
    Announce { message: String },

    /// Start chat polling for one group.
    StartPolling { group_id: String },

    /// Stop the active chat polling task.
    StopPolling,

    /// Refresh session-scoped UI after a login.
    RefreshSessionUi,

    /// Clear user-scoped UI state after a logout.
    CleanupUserData,

    /// Replace the document with a fatal notice.
    RenderFatal(FatalScreen),

    /// Emit a structured tracking event.
    Track { event: &'static str, data: Value },

    /// Perform an async operation and feed the result back as a message.
    Perform(Pin<Box<dyn Future<Output = Msg> + Send>>),

    /// Reveal or hide the skip-navigation control.
    SetSkipLinkVisible(bool),

    /// Move focus to the first focusable element in the main content.
    FocusMainContent,

    /// Move focus to a specific element, e.g. a modal's trigger.
    FocusElement { id: String },
}

impl<Msg> Command<Msg> {
    pub fn batch(commands: Vec<Command<Msg>>) -> Self {
        Command::Batch(commands)
    }

    pub fn toast(message: impl Into<String>, severity: ToastSeverity) -> Self {
        Command::Toast {
            message: message.into(),
            severity,
        }
    }

    pub fn track(event: &'static str, data: Value) -> Self {
        Command::Track { event, data }
    }

    /// Run a future and map its output into a message.
    pub fn perform<F, T>(future: F, to_msg: impl Fn(T) -> Msg + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
        Msg: Send + 'static,
    {
        Command::Perform(Box::pin(async move {
            let result = future.await;
            to_msg(result)
        }))
    }

    /// Deliver a message after a delay, without blocking the queue.
    pub fn after(delay: Duration, msg: Msg) -> Self
    where
        Msg: Send + 'static,
    {
        Command::Perform(Box::pin(async move {
            tokio::time::sleep(delay).await;
            msg
        }))
    }
}

impl<Msg> Default for Command<Msg> {
    fn default() -> Self {
        Command::None
    }
}
