//! Shared test doubles: recording collaborators the controller drives
//! during integration tests.

// Not every test file uses every helper.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use studycircle_client::app::AppController;
use studycircle_client::app::capabilities::Capability;
use studycircle_client::app::signal::{AuthSnapshot, Signal, UserRef};
use studycircle_client::config::ControllerConfig;
use studycircle_client::host::{
    ApiClient, AuthStore, HostEnvironment, HostInfo, ToastSeverity, UiSurface,
};

#[derive(Debug, Default)]
pub struct UiLog {
    pub toasts: Vec<(String, ToastSeverity)>,
    pub announcements: Vec<String>,
    pub poll_events: Vec<String>,
    pub active_poll: Option<String>,
    pub session_refreshes: usize,
    pub user_cleanups: usize,
    pub cleanups: usize,
    pub skip_links_injected: usize,
    pub skip_link_visible: bool,
    pub main_focused: usize,
    pub focused: Vec<String>,
    pub known_elements: HashSet<String>,
}

/// UI collaborator that records every call for later assertions.
#[derive(Clone, Default)]
pub struct SharedUi(pub Rc<RefCell<UiLog>>);

impl UiSurface for SharedUi {
    fn show_toast(&mut self, message: &str, severity: ToastSeverity, _duration: Duration) {
        self.0.borrow_mut().toasts.push((message.into(), severity));
    }

    fn announce(&mut self, message: &str) {
        self.0.borrow_mut().announcements.push(message.into());
    }

    fn start_chat_polling(&mut self, group_id: &str) {
        let mut log = self.0.borrow_mut();
        assert!(
            log.active_poll.is_none(),
            "started polling for {group_id} while {} was still active",
            log.active_poll.as_deref().unwrap_or("?")
        );
        log.poll_events.push(format!("start:{group_id}"));
        log.active_poll = Some(group_id.into());
    }

    fn stop_chat_polling(&mut self) {
        let mut log = self.0.borrow_mut();
        log.poll_events.push("stop".into());
        log.active_poll = None;
    }

    fn refresh_session_ui(&mut self) {
        self.0.borrow_mut().session_refreshes += 1;
    }

    fn cleanup_user_data(&mut self) {
        self.0.borrow_mut().user_cleanups += 1;
    }

    fn cleanup(&mut self) {
        self.0.borrow_mut().cleanups += 1;
    }

    fn inject_skip_link(&mut self) {
        self.0.borrow_mut().skip_links_injected += 1;
    }

    fn set_skip_link_visible(&mut self, visible: bool) {
        self.0.borrow_mut().skip_link_visible = visible;
    }

    fn focus_main_content(&mut self) {
        self.0.borrow_mut().main_focused += 1;
    }

    fn focus_element(&mut self, id: &str) -> bool {
        let mut log = self.0.borrow_mut();
        if log.known_elements.contains(id) {
            log.focused.push(id.into());
            true
        } else {
            false
        }
    }
}

#[derive(Debug)]
pub struct AuthState {
    pub snapshot: AuthSnapshot,
    pub loading: bool,
    pub absorbs_unauthorized: bool,
    pub unauthorized_calls: usize,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            snapshot: AuthSnapshot::anonymous(),
            loading: false,
            absorbs_unauthorized: true,
            unauthorized_calls: 0,
        }
    }
}

/// Auth collaborator with a scriptable snapshot and 401 behaviour.
#[derive(Clone, Default)]
pub struct SharedAuth(pub Rc<RefCell<AuthState>>);

impl AuthStore for SharedAuth {
    fn snapshot(&self) -> AuthSnapshot {
        self.0.borrow().snapshot.clone()
    }

    fn is_loading(&self) -> bool {
        self.0.borrow().loading
    }

    fn handle_unauthorized(&mut self) -> bool {
        let mut state = self.0.borrow_mut();
        state.unauthorized_calls += 1;
        state.absorbs_unauthorized
    }
}

#[derive(Debug)]
pub struct EnvState {
    pub present: HashSet<Capability>,
    pub replaced_document: Option<String>,
}

/// Host environment with a configurable capability set; captures any fatal
/// document replacement.
#[derive(Clone)]
pub struct SharedEnv(pub Rc<RefCell<EnvState>>);

impl SharedEnv {
    pub fn full() -> Self {
        Self(Rc::new(RefCell::new(EnvState {
            present: Capability::REQUIRED.into_iter().collect(),
            replaced_document: None,
        })))
    }

    pub fn without(cap: Capability) -> Self {
        let env = Self::full();
        env.0.borrow_mut().present.remove(&cap);
        env
    }
}

impl HostEnvironment for SharedEnv {
    fn has_capability(&self, cap: Capability) -> bool {
        self.0.borrow().present.contains(&cap)
    }

    fn replace_document(&mut self, html: &str) {
        self.0.borrow_mut().replaced_document = Some(html.into());
    }

    fn host_info(&self) -> HostInfo {
        HostInfo {
            name: "test".into(),
            version: "0".into(),
            platform: "test".into(),
            online: true,
        }
    }
}

/// API collaborator that counts health checks.
#[derive(Debug, Default)]
pub struct StubApi {
    pub unhealthy: bool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl ApiClient for StubApi {
    async fn health_check(&self) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(!self.unhealthy)
    }
}

pub struct Fixture {
    pub controller: AppController,
    pub ui: SharedUi,
    pub auth: SharedAuth,
    pub env: SharedEnv,
    pub api: Arc<StubApi>,
}

pub fn test_config() -> ControllerConfig {
    ControllerConfig {
        announce_delay_ms: 10,
        ..ControllerConfig::default()
    }
}

pub fn fixture_with_env(env: SharedEnv) -> Fixture {
    let ui = SharedUi::default();
    let auth = SharedAuth::default();
    let api = Arc::new(StubApi::default());
    let controller = AppController::new(
        test_config(),
        Box::new(auth.clone()),
        api.clone(),
        Box::new(ui.clone()),
        Box::new(env.clone()),
    );
    Fixture {
        controller,
        ui,
        auth,
        env,
        api,
    }
}

pub fn fixture() -> Fixture {
    fixture_with_env(SharedEnv::full())
}

/// Initialize and bring the controller to `ready`.
pub fn ready_fixture() -> Fixture {
    let mut fx = fixture();
    fx.controller.initialize();
    fx.controller.handle_signal(Signal::DocumentReady);
    fx
}

pub fn user(id: &str) -> UserRef {
    UserRef {
        id: id.into(),
        display_name: format!("User {id}"),
    }
}

pub fn login(fx: &mut Fixture, id: &str) {
    fx.controller
        .handle_signal(Signal::Auth(AuthSnapshot::authenticated(user(id))));
}

pub fn logout(fx: &mut Fixture) {
    fx.controller
        .handle_signal(Signal::Auth(AuthSnapshot::anonymous()));
}
