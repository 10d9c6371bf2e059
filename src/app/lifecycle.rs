use log::{debug, warn};
use serde::Serialize;

/// Coarse running status of the application process.
///
/// Normal progression is `Uninitialized -> Initializing -> Ready`.
/// `Degraded` is terminal and reachable from any prior state; once entered,
/// the only recovery path is a full page reload, which is outside this
/// crate's control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Uninitialized,
    Initializing,
    Ready,
    Degraded,
}

impl LifecycleState {
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Initializing => "initializing",
            LifecycleState::Ready => "ready",
            LifecycleState::Degraded => "degraded",
        }
    }

    fn allows(self, next: LifecycleState) -> bool {
        match (self, next) {
            (LifecycleState::Degraded, _) => false,
            (_, LifecycleState::Degraded) => true,
            (LifecycleState::Uninitialized, LifecycleState::Initializing) => true,
            (LifecycleState::Initializing, LifecycleState::Ready) => true,
            _ => false,
        }
    }
}

/// Owns the lifecycle state and enforces its transition rules.
#[derive(Debug)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: LifecycleState::Uninitialized,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Attempt a transition. Invalid transitions are refused and logged,
    /// leaving the current state untouched.
    pub fn transition(&mut self, next: LifecycleState) -> bool {
        if !self.state.allows(next) {
            warn!(
                "refused lifecycle transition {} -> {}",
                self.state.as_str(),
                next.as_str()
            );
            return false;
        }
        debug!(
            "lifecycle transition {} -> {}",
            self.state.as_str(),
            next.as_str()
        );
        self.state = next;
        true
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
