use serde::{Deserialize, Serialize};

/// Tab visibility as reported by the hosting environment. The controller
/// only reacts to transitions; it never owns this state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        matches!(self, Visibility::Visible)
    }
}

/// Opaque identifier/display-name pair owned by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub display_name: String,
}

/// Authentication state as delivered by the auth collaborator. Replaced
/// wholesale on every notification, never partially mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSnapshot {
    pub is_authenticated: bool,
    pub user: Option<UserRef>,
}

impl AuthSnapshot {
    pub fn authenticated(user: UserRef) -> Self {
        Self {
            is_authenticated: true,
            user: Some(user),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Host signals entering the controller. All of these are read-only inputs
/// originated by the environment or by collaborators, never by this crate.
#[derive(Debug, Clone)]
pub enum Signal {
    /// Document finished loading; environment-dependent startup may begin.
    DocumentReady,
    /// Tab visibility transition.
    Visibility(Visibility),
    /// Network connectivity transition.
    Network { online: bool },
    /// Auth state notification from the auth collaborator.
    Auth(AuthSnapshot),
    /// Navigation completed; carries the new path.
    Route { path: String },
    /// Structured error surfaced by the API collaborator.
    ApiError { status: u16, message: String },
    /// Asynchronous failure nobody handled.
    UnhandledAsync { message: String },
    /// Synchronous failure that escaped to the top, with its source origin.
    UncaughtSync { message: String, source: String },
    /// Tab key pressed; true when focus was still on the document body.
    TabKey { from_document_body: bool },
    /// The skip-navigation control gained or lost keyboard focus.
    SkipLinkFocus { focused: bool },
    /// A modal was dismissed; carries the marked trigger element, if any.
    ModalDismissed { trigger_id: Option<String> },
    /// The page is about to be torn down; only synchronous work is possible.
    BeforeTeardown,
}

/// Channel a signal is dispatched on. Subscriptions are registered per kind
/// during the wiring phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Lifecycle,
    Visibility,
    Network,
    Auth,
    Route,
    Failure,
    Keyboard,
    Modal,
    Teardown,
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::DocumentReady => SignalKind::Lifecycle,
            Signal::Visibility(_) => SignalKind::Visibility,
            Signal::Network { .. } => SignalKind::Network,
            Signal::Auth(_) => SignalKind::Auth,
            Signal::Route { .. } => SignalKind::Route,
            Signal::ApiError { .. }
            | Signal::UnhandledAsync { .. }
            | Signal::UncaughtSync { .. } => SignalKind::Failure,
            Signal::TabKey { .. } | Signal::SkipLinkFocus { .. } => SignalKind::Keyboard,
            Signal::ModalDismissed { .. } => SignalKind::Modal,
            Signal::BeforeTeardown => SignalKind::Teardown,
        }
    }
}
