//! Console-backed collaborators for the demo binary. They log what the
//! real view layer and auth store would do, which is enough to exercise
//! the full controller lifecycle outside a browser.

use std::time::Duration;

use log::{debug, info};

use super::{AuthStore, HostEnvironment, HostInfo, ToastSeverity, UiSurface};
use crate::app::capabilities::Capability;
use crate::app::signal::AuthSnapshot;

/// UI collaborator that narrates every call to the log.
#[derive(Debug, Default)]
pub struct ConsoleUi {
    active_poll: Option<String>,
}

impl UiSurface for ConsoleUi {
    fn show_toast(&mut self, message: &str, severity: ToastSeverity, duration: Duration) {
        info!("[toast:{severity:?}] {message} ({}ms)", duration.as_millis());
    }

    fn announce(&mut self, message: &str) {
        info!("[announce] {message}");
    }

    fn start_chat_polling(&mut self, group_id: &str) {
        info!("[poll] start group {group_id}");
        self.active_poll = Some(group_id.to_string());
    }

    fn stop_chat_polling(&mut self) {
        if let Some(group) = self.active_poll.take() {
            info!("[poll] stop group {group}");
        }
    }

    fn refresh_session_ui(&mut self) {
        info!("[ui] refresh session chrome");
    }

    fn cleanup_user_data(&mut self) {
        info!("[ui] clear user-scoped state");
    }

    fn cleanup(&mut self) {
        info!("[ui] cleanup timers");
    }

    fn inject_skip_link(&mut self) {
        debug!("[a11y] skip link injected");
    }

    fn set_skip_link_visible(&mut self, visible: bool) {
        debug!("[a11y] skip link visible={visible}");
    }

    fn focus_main_content(&mut self) {
        debug!("[a11y] focus main content");
    }

    fn focus_element(&mut self, id: &str) -> bool {
        debug!("[a11y] focus #{id}");
        true
    }
}

/// Auth store with a directly settable snapshot.
#[derive(Debug, Default)]
pub struct DemoAuthStore {
    pub snapshot: AuthSnapshot,
}

impl AuthStore for DemoAuthStore {
    fn snapshot(&self) -> AuthSnapshot {
        self.snapshot.clone()
    }

    fn is_loading(&self) -> bool {
        false
    }

    fn handle_unauthorized(&mut self) -> bool {
        info!("[auth] unauthorized, clearing session");
        self.snapshot = AuthSnapshot::anonymous();
        true
    }
}

/// Host environment with every capability present.
#[derive(Debug, Default)]
pub struct DemoEnvironment;

impl HostEnvironment for DemoEnvironment {
    fn has_capability(&self, _cap: Capability) -> bool {
        true
    }

    fn replace_document(&mut self, html: &str) {
        info!("[fatal] document replaced ({} bytes)", html.len());
    }

    fn host_info(&self) -> HostInfo {
        HostInfo {
            name: "console".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            platform: std::env::consts::OS.into(),
            online: true,
        }
    }
}
