use log::debug;

use super::signal::{AuthSnapshot, UserRef};

/// Classification of an incoming auth notification against the cached state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthTransition {
    Login(UserRef),
    Logout,
    NoChange,
}

/// Converts auth-state notifications into lifecycle transitions.
///
/// The bridge is subscribed once per session, so it must be idempotent over
/// repeated identical notifications: login/logout side effects fire at most
/// once per actual state change.
#[derive(Debug, Default)]
pub struct AuthBridge {
    cached: Option<AuthSnapshot>,
}

impl AuthBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.cached
            .as_ref()
            .map(|s| s.is_authenticated)
            .unwrap_or(false)
    }

    pub fn current_user(&self) -> Option<&UserRef> {
        self.cached.as_ref().and_then(|s| s.user.as_ref())
    }

    /// Absorb a notification, replacing the cached snapshot wholesale, and
    /// classify the transition.
    pub fn observe(&mut self, snapshot: AuthSnapshot) -> AuthTransition {
        let was_authenticated = self.is_authenticated();
        let now_authenticated = snapshot.is_authenticated;

        let mut snapshot = snapshot;
        if !now_authenticated {
            // A logged-out snapshot never carries a user.
            snapshot.user = None;
        }
        self.cached = Some(snapshot);

        match (was_authenticated, now_authenticated) {
            (false, true) => match self.current_user() {
                Some(user) => {
                    debug!("auth transition: login as {}", user.id);
                    AuthTransition::Login(user.clone())
                }
                None => {
                    // Authenticated snapshot without a user reference; treat
                    // as a login with an unresolved identity.
                    debug!("auth transition: login without user reference");
                    AuthTransition::Login(UserRef {
                        id: String::new(),
                        display_name: String::new(),
                    })
                }
            },
            (true, false) => {
                debug!("auth transition: logout");
                AuthTransition::Logout
            }
            _ => AuthTransition::NoChange,
        }
    }
}
