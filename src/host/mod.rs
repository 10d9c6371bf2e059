//! Boundary traits for the external collaborators this crate orchestrates
//! but does not implement: the auth token store, the API client, the view
//! layer, and the hosting environment itself.

pub mod console;
pub mod http;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::app::capabilities::Capability;
use crate::app::signal::AuthSnapshot;

pub use console::{ConsoleUi, DemoAuthStore, DemoEnvironment};
pub use http::HttpApiClient;

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastSeverity {
    Info,
    Success,
    Warning,
    Error,
}

/// Static facts about the hosting environment, surfaced in diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HostInfo {
    pub name: String,
    pub version: String,
    pub platform: String,
    pub online: bool,
}

/// The authentication token store. Change notifications arrive separately
/// as [`crate::app::signal::Signal::Auth`]; this trait covers the readable
/// state and the unauthorized-handling hook.
pub trait AuthStore {
    /// Current auth state, used to seed the bridge at startup.
    fn snapshot(&self) -> AuthSnapshot;

    /// Whether a token refresh is in flight.
    fn is_loading(&self) -> bool;

    /// React to a 401 from the API, typically by refreshing or clearing the
    /// session. Returns false when the store could not absorb it, in which
    /// case the controller falls back to notifying the user itself.
    fn handle_unauthorized(&mut self) -> bool;
}

/// The API client boundary. Failed calls surface separately as
/// [`crate::app::signal::Signal::ApiError`].
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Liveness probe run once after startup. `Ok(false)` means the API
    /// answered but reported itself unhealthy.
    async fn health_check(&self) -> Result<bool>;
}

/// The view layer. Owns all DOM, timers, and rendering; the controller
/// only calls through this surface.
pub trait UiSurface {
    fn show_toast(&mut self, message: &str, severity: ToastSeverity, duration: Duration);
    fn announce(&mut self, message: &str);

    fn start_chat_polling(&mut self, group_id: &str);
    fn stop_chat_polling(&mut self);

    /// Refresh session-scoped chrome (avatar, notifications) after login.
    fn refresh_session_ui(&mut self);
    /// Drop user-scoped view state after logout.
    fn cleanup_user_data(&mut self);
    /// Stop all UI-owned timers at teardown.
    fn cleanup(&mut self);

    fn inject_skip_link(&mut self);
    fn set_skip_link_visible(&mut self, visible: bool);
    fn focus_main_content(&mut self);
    /// Returns false when no element with that id exists.
    fn focus_element(&mut self, id: &str) -> bool;
}

/// The hosting environment: feature detection, diagnostics, and the target
/// of the fatal-screen fallback.
pub trait HostEnvironment {
    fn has_capability(&self, cap: Capability) -> bool;

    /// Replace the entire visible document. Only the two fatal paths call
    /// this.
    fn replace_document(&mut self, html: &str);

    fn host_info(&self) -> HostInfo;
}
