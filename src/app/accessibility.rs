use std::time::Duration;

use log::debug;

/// Focus flow and screen-reader coordination.
///
/// Decides when the skip-navigation control is injected and revealed, when
/// a Tab press is redirected into the main content region, what gets
/// announced after a route change, and where focus returns after a modal
/// closes. All DOM work is delegated to the UI collaborator; this type only
/// holds the decisions.
#[derive(Debug)]
pub struct AccessibilityCoordinator {
    skip_link_installed: bool,
    tab_redirect_armed: bool,
    announce_delay: Duration,
}

impl AccessibilityCoordinator {
    pub fn new(announce_delay: Duration) -> Self {
        Self {
            skip_link_installed: false,
            tab_redirect_armed: true,
            announce_delay,
        }
    }

    /// True exactly once: the skip link is injected as the first focusable
    /// element during initialization and never again.
    pub fn needs_skip_link(&mut self) -> bool {
        if self.skip_link_installed {
            return false;
        }
        self.skip_link_installed = true;
        true
    }

    /// The first Tab press while focus is still on the document body is
    /// redirected to the first focusable element in the main content
    /// region. Later presses follow normal tab order.
    pub fn should_redirect_tab(&mut self, from_document_body: bool) -> bool {
        if from_document_body && self.tab_redirect_armed {
            self.tab_redirect_armed = false;
            debug!("redirecting first Tab press into main content");
            return true;
        }
        false
    }

    /// Re-arm the Tab redirect when a new view renders.
    pub fn arm_tab_redirect(&mut self) {
        self.tab_redirect_armed = true;
    }

    /// Delay between a route change and its announcement, giving the new
    /// view time to render first.
    pub fn announce_delay(&self) -> Duration {
        self.announce_delay
    }

    pub fn route_announcement(&self, path: &str) -> String {
        format!("Navigated to {path}")
    }
}
