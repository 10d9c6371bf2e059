use thiserror::Error;

use crate::app::capabilities::Capability;

/// Fatal failure kinds. Both are terminal for the session: the controller
/// renders the fatal screen and the only recovery is a full page reload.
///
/// Recoverable failures (transient sync/async failures, remote API errors)
/// are never propagated as errors; they are carried by
/// [`crate::app::failures::FailureRecord`], reported, and discarded.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("environment is missing required capabilities: {}", format_missing(.missing))]
    IncompatibleEnvironment { missing: Vec<Capability> },

    #[error("critical initialization failure: {0}")]
    CriticalInit(String),
}

fn format_missing(missing: &[Capability]) -> String {
    missing
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(", ")
}
