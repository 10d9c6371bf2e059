//! Top-level orchestrator for the client application lifecycle.
//!
//! The controller reconciles document readiness, authentication, tab
//! visibility, routing, and connectivity into one consistent
//! running/paused/degraded state. Host signals are converted into internal
//! messages by the signal bus, the update step advances the state machine,
//! and the resulting commands are the only side effects applied to the
//! collaborator traits.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, error, info, warn};
use serde::Serialize;
use serde_json::{Value, json};

use super::accessibility::AccessibilityCoordinator;
use super::auth_bridge::{AuthBridge, AuthTransition};
use super::bus::SignalBus;
use super::capabilities::CapabilityGate;
use super::command::Command;
use super::failures::{Disposition, FailurePolicy};
use super::fatal::FatalScreen;
use super::lifecycle::{Lifecycle, LifecycleState};
use super::scheduler::{PollAction, PollScheduler, group_from_route};
use super::signal::{AuthSnapshot, Signal, SignalKind, UserRef, Visibility};
use crate::config::ControllerConfig;
use crate::error::AppError;
use crate::host::{ApiClient, AuthStore, HostEnvironment, HostInfo, ToastSeverity, UiSurface};

/// Internal messages produced by the signal bus and by completed async
/// work.
#[derive(Debug, Clone)]
pub enum Msg {
    DocumentReady,
    AuthChanged(AuthSnapshot),
    VisibilityChanged(Visibility),
    RouteChanged(String),
    NetworkChanged { online: bool },
    ApiErrorRaised { status: u16, message: String },
    AsyncFailureRaised { message: String },
    SyncFailureRaised { message: String, source: String },
    TabPressed { from_document_body: bool },
    SkipLinkFocusChanged { focused: bool },
    ModalDismissed { trigger_id: Option<String> },
    AnnounceDue { message: String },
    HealthChecked(bool),
    TeardownRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FatalKind {
    IncompatibleEnvironment,
    CriticalInit,
}

/// Auth facts included in the diagnostic snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct AuthStateInfo {
    pub is_authenticated: bool,
    pub is_loading: bool,
}

/// Immutable diagnostic snapshot of the running application.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationInfo {
    pub is_initialized: bool,
    pub lifecycle: LifecycleState,
    pub current_user: Option<UserRef>,
    pub current_route: String,
    pub online: bool,
    pub auth_state: AuthStateInfo,
    pub host: HostInfo,
}

/// The application controller. One instance per page session, explicitly
/// constructed and owned by the process entry point.
pub struct AppController {
    config: ControllerConfig,
    lifecycle: Lifecycle,
    is_initialized: bool,
    fatal: Option<FatalKind>,
    started_at: Option<Instant>,

    bus: SignalBus<Msg>,
    auth_bridge: AuthBridge,
    scheduler: PollScheduler,
    failures: FailurePolicy,
    a11y: AccessibilityCoordinator,

    visibility: Visibility,
    online: bool,
    current_route: String,

    auth: Box<dyn AuthStore>,
    api: Arc<dyn ApiClient>,
    ui: Box<dyn UiSurface>,
    env: Box<dyn HostEnvironment>,

    pending_async: Vec<Pin<Box<dyn Future<Output = Msg> + Send>>>,
}

impl AppController {
    pub fn new(
        config: ControllerConfig,
        auth: Box<dyn AuthStore>,
        api: Arc<dyn ApiClient>,
        ui: Box<dyn UiSurface>,
        env: Box<dyn HostEnvironment>,
    ) -> Self {
        let failures = FailurePolicy::new(config.own_source_marker.clone());
        let a11y = AccessibilityCoordinator::new(config.announce_delay());
        Self {
            config,
            lifecycle: Lifecycle::new(),
            is_initialized: false,
            fatal: None,
            started_at: None,
            bus: SignalBus::new(),
            auth_bridge: AuthBridge::new(),
            scheduler: PollScheduler::new(),
            failures,
            a11y,
            visibility: Visibility::Visible,
            online: true,
            current_route: "/".into(),
            auth,
            api,
            ui,
            env,
            pending_async: Vec::new(),
        }
    }

    /// Install all listeners and hooks. Idempotent, and never lets a
    /// failure escape: anything that goes wrong here funnels into
    /// [`AppController::handle_critical_error`].
    pub fn initialize(&mut self) {
        if self.is_initialized {
            debug!("initialize called twice; ignoring");
            return;
        }
        if let Err(err) = self.initialize_inner() {
            self.handle_critical_error(err);
        }
    }

    fn initialize_inner(&mut self) -> Result<()> {
        if !self.lifecycle.transition(LifecycleState::Initializing) {
            return Err(AppError::CriticalInit(format!(
                "cannot initialize from lifecycle state {}",
                self.lifecycle.state().as_str()
            ))
            .into());
        }

        self.install_failure_interception()
            .context("installing failure interception")?;
        self.install_application_listeners()
            .context("installing application listeners")?;
        self.install_performance_hooks();
        self.install_accessibility_hooks()
            .context("installing accessibility hooks")?;

        // Wiring is complete; from here on signals may be dispatched.
        self.bus.seal();
        self.is_initialized = true;
        info!("controller initialized; waiting for document readiness");
        Ok(())
    }

    fn install_failure_interception(&mut self) -> Result<()> {
        self.bus.subscribe(SignalKind::Failure, |signal| match signal {
            Signal::ApiError { status, message } => Some(Msg::ApiErrorRaised {
                status: *status,
                message: message.clone(),
            }),
            Signal::UnhandledAsync { message } => Some(Msg::AsyncFailureRaised {
                message: message.clone(),
            }),
            Signal::UncaughtSync { message, source } => Some(Msg::SyncFailureRaised {
                message: message.clone(),
                source: source.clone(),
            }),
            _ => None,
        })
    }

    fn install_application_listeners(&mut self) -> Result<()> {
        self.bus.subscribe(SignalKind::Lifecycle, |signal| {
            matches!(signal, Signal::DocumentReady).then_some(Msg::DocumentReady)
        })?;
        self.bus.subscribe(SignalKind::Visibility, |signal| match signal {
            Signal::Visibility(v) => Some(Msg::VisibilityChanged(*v)),
            _ => None,
        })?;
        self.bus.subscribe(SignalKind::Network, |signal| match signal {
            Signal::Network { online } => Some(Msg::NetworkChanged { online: *online }),
            _ => None,
        })?;
        self.bus.subscribe(SignalKind::Auth, |signal| match signal {
            Signal::Auth(snapshot) => Some(Msg::AuthChanged(snapshot.clone())),
            _ => None,
        })?;
        self.bus.subscribe(SignalKind::Route, |signal| match signal {
            Signal::Route { path } => Some(Msg::RouteChanged(path.clone())),
            _ => None,
        })?;
        self.bus.subscribe(SignalKind::Teardown, |signal| {
            matches!(signal, Signal::BeforeTeardown).then_some(Msg::TeardownRequested)
        })
    }

    fn install_performance_hooks(&mut self) {
        self.started_at = Some(Instant::now());
        debug!(
            "host: {}",
            serde_json::to_string(&self.env.host_info()).unwrap_or_default()
        );
    }

    fn install_accessibility_hooks(&mut self) -> Result<()> {
        if self.a11y.needs_skip_link() {
            self.ui.inject_skip_link();
        }
        self.bus.subscribe(SignalKind::Keyboard, |signal| match signal {
            Signal::TabKey { from_document_body } => Some(Msg::TabPressed {
                from_document_body: *from_document_body,
            }),
            Signal::SkipLinkFocus { focused } => {
                Some(Msg::SkipLinkFocusChanged { focused: *focused })
            }
            _ => None,
        })?;
        self.bus.subscribe(SignalKind::Modal, |signal| match signal {
            Signal::ModalDismissed { trigger_id } => Some(Msg::ModalDismissed {
                trigger_id: trigger_id.clone(),
            }),
            _ => None,
        })
    }

    /// Entry point for every host signal.
    pub fn handle_signal(&mut self, signal: Signal) {
        if let Some(kind) = self.fatal {
            // Terminal state: only teardown cleanup still runs.
            if matches!(signal, Signal::BeforeTeardown) {
                self.teardown();
            } else {
                debug!("ignoring {:?} signal after fatal {kind:?}", signal.kind());
            }
            return;
        }
        // Covers both signals arriving before `initialize` and signals
        // arriving after teardown.
        if !self.is_initialized {
            debug!("ignoring {:?} signal: controller not initialized", signal.kind());
            return;
        }
        for msg in self.bus.dispatch(&signal) {
            self.step(msg);
        }
    }

    fn step(&mut self, msg: Msg) {
        if self.fatal.is_some() {
            return;
        }
        let command = self.update(msg);
        self.execute(command);
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::DocumentReady => self.start_application(),

            Msg::AuthChanged(snapshot) => {
                // The bridge is wired only after the gate passes; the
                // startup seed reads the store directly, so pre-ready
                // notifications are dropped rather than cached.
                if self.lifecycle.state() != LifecycleState::Ready {
                    debug!("auth notification before ready; deferred to the startup seed");
                    Command::None
                } else {
                    self.apply_auth(snapshot)
                }
            }

            Msg::VisibilityChanged(visibility) => {
                self.visibility = visibility;
                if self.lifecycle.state() != LifecycleState::Ready {
                    Command::None
                } else {
                    self.sync_polling()
                }
            }

            Msg::RouteChanged(path) => {
                self.current_route = path.clone();
                self.a11y.arm_tab_redirect();
                if self.lifecycle.state() != LifecycleState::Ready {
                    Command::None
                } else {
                    let announcement = self.a11y.route_announcement(&path);
                    Command::batch(vec![
                        self.sync_polling(),
                        Command::after(
                            self.a11y.announce_delay(),
                            Msg::AnnounceDue {
                                message: announcement,
                            },
                        ),
                    ])
                }
            }

            Msg::NetworkChanged { online } => {
                self.online = online;
                if self.lifecycle.state() != LifecycleState::Ready {
                    Command::None
                } else if online {
                    info!("network restored; re-running health check");
                    self.health_check_command()
                } else {
                    Command::toast(
                        "You appear to be offline. Some features may not work.",
                        ToastSeverity::Warning,
                    )
                }
            }

            Msg::ApiErrorRaised { status, message } => {
                let (record, disposition) = self.failures.classify_api(status, &message);
                record.log();
                self.apply_disposition(disposition)
            }

            Msg::AsyncFailureRaised { message } => {
                let (record, disposition) = self.failures.classify_async(&message);
                record.log();
                self.apply_disposition(disposition)
            }

            Msg::SyncFailureRaised { message, source } => {
                let (record, disposition) = self.failures.classify_sync(&message, &source);
                record.log();
                self.apply_disposition(disposition)
            }

            Msg::TabPressed { from_document_body } => {
                if self.a11y.should_redirect_tab(from_document_body) {
                    Command::FocusMainContent
                } else {
                    Command::None
                }
            }

            Msg::SkipLinkFocusChanged { focused } => Command::SetSkipLinkVisible(focused),

            Msg::ModalDismissed { trigger_id } => match trigger_id {
                Some(id) => Command::FocusElement { id },
                None => Command::None,
            },

            Msg::AnnounceDue { message } => Command::Announce { message },

            Msg::HealthChecked(healthy) => {
                if healthy {
                    debug!("API health check passed");
                } else {
                    warn!("API health check reported an unhealthy backend");
                }
                Command::None
            }

            Msg::TeardownRequested => {
                self.teardown();
                Command::None
            }
        }
    }

    /// Environment-dependent startup, run once the document is ready.
    fn start_application(&mut self) -> Command<Msg> {
        if self.lifecycle.state() != LifecycleState::Initializing {
            debug!("document ready in state {}; ignoring", self.lifecycle.state().as_str());
            return Command::None;
        }

        let report = CapabilityGate::check(self.env.as_ref());
        if !report.passed {
            let err = AppError::IncompatibleEnvironment {
                missing: report.missing.clone(),
            };
            error!("{err}");
            // Lifecycle stays in `initializing`; the session is inert from
            // here and only a reload recovers it.
            self.fatal = Some(FatalKind::IncompatibleEnvironment);
            if self.scheduler.stop().is_some() {
                self.ui.stop_chat_polling();
            }
            return Command::RenderFatal(FatalScreen::incompatible(&report.missing));
        }

        let seed = self.auth.snapshot();
        self.lifecycle.transition(LifecycleState::Ready);
        let startup_ms = self
            .started_at
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);
        info!("application ready in {startup_ms}ms");

        Command::batch(vec![
            Command::track(
                "app_startup",
                json!({ "startup_ms": startup_ms, "host": self.env.host_info() }),
            ),
            self.apply_auth(seed),
            self.health_check_command(),
        ])
    }

    fn apply_auth(&mut self, snapshot: AuthSnapshot) -> Command<Msg> {
        match self.auth_bridge.observe(snapshot) {
            AuthTransition::Login(user) => Command::batch(vec![
                Command::track("user_login", json!({ "user_id": user.id })),
                Command::RefreshSessionUi,
                self.sync_polling(),
            ]),
            AuthTransition::Logout => Command::batch(vec![
                Command::track("user_logout", json!({})),
                // Polling stops before the cleanup hook so no request runs
                // against the now-stale session.
                self.sync_polling(),
                Command::CleanupUserData,
            ]),
            AuthTransition::NoChange => Command::None,
        }
    }

    /// Reconcile the chat-polling task with visibility, auth, and route.
    fn sync_polling(&mut self) -> Command<Msg> {
        let group = group_from_route(&self.current_route, &self.config.group_route_prefix);
        let actions = self.scheduler.sync(
            self.visibility.is_visible(),
            self.auth_bridge.is_authenticated(),
            group.as_deref(),
        );
        let commands: Vec<Command<Msg>> = actions
            .into_iter()
            .map(|action| match action {
                PollAction::Stop { .. } => Command::StopPolling,
                PollAction::Start { group_id } => Command::StartPolling { group_id },
            })
            .collect();
        if commands.is_empty() {
            Command::None
        } else {
            Command::Batch(commands)
        }
    }

    fn apply_disposition(&mut self, disposition: Disposition) -> Command<Msg> {
        match disposition {
            Disposition::Notify { message, severity } => Command::Toast { message, severity },
            Disposition::NotifyReload => Command::toast(
                "Something broke in this page. Please reload to continue.",
                ToastSeverity::Error,
            ),
            Disposition::DelegateToAuth => {
                if self.auth.handle_unauthorized() {
                    Command::None
                } else {
                    warn!("auth collaborator did not absorb a 401; notifying directly");
                    Command::toast(
                        "Your session has expired. Please sign in again.",
                        ToastSeverity::Warning,
                    )
                }
            }
            Disposition::LogOnly => Command::None,
        }
    }

    fn health_check_command(&self) -> Command<Msg> {
        let api = Arc::clone(&self.api);
        Command::perform(
            async move {
                match api.health_check().await {
                    Ok(healthy) => healthy,
                    Err(err) => {
                        warn!("health check failed: {err:#}");
                        false
                    }
                }
            },
            Msg::HealthChecked,
        )
    }

    fn execute(&mut self, command: Command<Msg>) {
        match command {
            Command::None => {}
            Command::Batch(commands) => {
                for cmd in commands {
                    self.execute(cmd);
                }
            }
            Command::Toast { message, severity } => {
                self.ui
                    .show_toast(&message, severity, self.config.toast_duration());
            }
            Command::Announce { message } => self.ui.announce(&message),
            Command::StartPolling { group_id } => self.ui.start_chat_polling(&group_id),
            Command::StopPolling => self.ui.stop_chat_polling(),
            Command::RefreshSessionUi => self.ui.refresh_session_ui(),
            Command::CleanupUserData => self.ui.cleanup_user_data(),
            Command::SetSkipLinkVisible(visible) => self.ui.set_skip_link_visible(visible),
            Command::FocusMainContent => self.ui.focus_main_content(),
            Command::FocusElement { id } => {
                if !self.ui.focus_element(&id) {
                    debug!("modal trigger #{id} not found; leaving focus untouched");
                }
            }
            Command::RenderFatal(screen) => self.env.replace_document(&screen.render()),
            Command::Track { event, data } => self.emit_tracking(event, data),
            Command::Perform(future) => self.pending_async.push(future),
        }
    }

    fn emit_tracking(&self, event: &str, data: Value) {
        let line = json!({
            "event": event,
            "data": data,
            "timestamp": Utc::now().to_rfc3339(),
        });
        info!("Tracking event: {line}");
    }

    /// Poll deferred async work and feed completed results back through the
    /// update step. The embedding loop calls this between signals.
    pub async fn poll_async(&mut self) {
        let waker = futures::task::noop_waker();
        let mut cx = TaskContext::from_waker(&waker);

        let mut completed = Vec::new();
        for (i, future) in self.pending_async.iter_mut().enumerate() {
            if let Poll::Ready(msg) = future.as_mut().poll(&mut cx) {
                completed.push((i, msg));
            }
        }

        // Remove completed futures in reverse order to keep indices valid.
        completed.sort_by(|a, b| b.0.cmp(&a.0));
        for (i, msg) in completed {
            self.pending_async.remove(i);
            self.step(msg);
        }
    }

    /// Unrecoverable failure in our own initialization or startup: render
    /// the fatal fallback and halt all further lifecycle progress.
    pub fn handle_critical_error(&mut self, error: anyhow::Error) {
        error!("critical initialization failure: {error:#}");
        self.fatal = Some(FatalKind::CriticalInit);
        self.lifecycle.transition(LifecycleState::Degraded);
        self.is_initialized = false;

        if self.scheduler.stop().is_some() {
            self.ui.stop_chat_polling();
        }
        let screen = FatalScreen::critical(&format!("{error:#}"));
        self.env.replace_document(&screen.render());
    }

    /// Best-effort synchronous cleanup at page teardown. No suspension
    /// points: the environment gives no guaranteed async window here.
    pub fn teardown(&mut self) {
        if self.scheduler.stop().is_some() {
            self.ui.stop_chat_polling();
        }
        self.ui.cleanup();
        self.pending_async.clear();
        self.is_initialized = false;
        info!("controller torn down");
    }

    /// Diagnostic snapshot; mutates nothing.
    pub fn application_info(&self) -> ApplicationInfo {
        ApplicationInfo {
            is_initialized: self.is_initialized,
            lifecycle: self.lifecycle.state(),
            current_user: self.auth_bridge.current_user().cloned(),
            current_route: self.current_route.clone(),
            online: self.online,
            auth_state: AuthStateInfo {
                is_authenticated: self.auth_bridge.is_authenticated(),
                is_loading: self.auth.is_loading(),
            },
            host: self.env.host_info(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.is_initialized
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ConsoleUi, DemoAuthStore, DemoEnvironment};

    struct HealthyApi;

    #[async_trait::async_trait]
    impl ApiClient for HealthyApi {
        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }
    }

    fn controller() -> AppController {
        AppController::new(
            ControllerConfig::default(),
            Box::new(DemoAuthStore::default()),
            Arc::new(HealthyApi),
            Box::new(ConsoleUi::default()),
            Box::new(DemoEnvironment),
        )
    }

    #[test]
    fn initialize_is_idempotent() {
        let mut app = controller();
        app.initialize();
        assert!(app.is_initialized());
        assert_eq!(app.lifecycle_state(), LifecycleState::Initializing);
        app.initialize();
        assert_eq!(app.lifecycle_state(), LifecycleState::Initializing);
    }

    #[test]
    fn document_ready_before_initialize_does_nothing() {
        let mut app = controller();
        app.handle_signal(Signal::DocumentReady);
        assert_eq!(app.lifecycle_state(), LifecycleState::Uninitialized);
        assert!(!app.is_initialized());
    }

    #[test]
    fn info_snapshot_reflects_cold_state() {
        let app = controller();
        let info = app.application_info();
        assert!(!info.is_initialized);
        assert_eq!(info.lifecycle, LifecycleState::Uninitialized);
        assert!(info.current_user.is_none());
        assert_eq!(info.current_route, "/");
    }

    #[tokio::test]
    async fn startup_reaches_ready_and_runs_health_check() {
        let mut app = controller();
        app.initialize();
        app.handle_signal(Signal::DocumentReady);
        assert_eq!(app.lifecycle_state(), LifecycleState::Ready);
        assert_eq!(app.pending_async.len(), 1);
        app.poll_async().await;
        assert!(app.pending_async.is_empty());
    }

    #[test]
    fn critical_error_degrades_and_halts() {
        let mut app = controller();
        app.initialize();
        app.handle_critical_error(anyhow::anyhow!("wiring failed"));
        assert_eq!(app.lifecycle_state(), LifecycleState::Degraded);
        assert!(!app.is_initialized());

        // A later document-ready must not revive the session.
        app.handle_signal(Signal::DocumentReady);
        assert_eq!(app.lifecycle_state(), LifecycleState::Degraded);
    }
}
