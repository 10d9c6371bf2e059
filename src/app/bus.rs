use std::collections::HashMap;

use anyhow::{Result, bail};
use log::warn;

use super::signal::{Signal, SignalKind};

/// Converts a host signal into an internal message, or ignores it.
pub type Handler<Msg> = Box<dyn Fn(&Signal) -> Option<Msg>>;

/// Typed publish/subscribe channel per signal kind.
///
/// Subscriptions are only accepted during a single wiring phase; `seal()`
/// closes the phase and enables dispatch. This guarantees that every
/// listener is installed before the first signal it could handle is
/// delivered.
pub struct SignalBus<Msg> {
    handlers: HashMap<SignalKind, Vec<Handler<Msg>>>,
    sealed: bool,
}

impl<Msg> SignalBus<Msg> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            sealed: false,
        }
    }

    /// Register a handler for one signal kind. Fails after `seal()`.
    pub fn subscribe<F>(&mut self, kind: SignalKind, handler: F) -> Result<()>
    where
        F: Fn(&Signal) -> Option<Msg> + 'static,
    {
        if self.sealed {
            bail!("signal bus is sealed; subscriptions are only accepted during wiring");
        }
        self.handlers
            .entry(kind)
            .or_default()
            .push(Box::new(handler));
        Ok(())
    }

    /// End the wiring phase. Dispatch is a no-op until this is called.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Fan a signal out to every subscriber of its kind, collecting the
    /// messages they produce.
    pub fn dispatch(&self, signal: &Signal) -> Vec<Msg> {
        if !self.sealed {
            warn!("signal {:?} dropped: bus not sealed yet", signal.kind());
            return Vec::new();
        }
        match self.handlers.get(&signal.kind()) {
            Some(handlers) => handlers.iter().filter_map(|h| h(signal)).collect(),
            None => Vec::new(),
        }
    }
}

impl<Msg> Default for SignalBus<Msg> {
    fn default() -> Self {
        Self::new()
    }
}
