//! Global failure interception policy.
//!
//! Classifies uncaught synchronous failures, unhandled asynchronous
//! failures, and surfaced API errors, and maps each to a disposition the
//! controller applies. None of these are fatal by themselves; only the
//! controller's critical-error path halts the lifecycle.

use chrono::{DateTime, Utc};
use log::warn;
use serde::Serialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::host::ToastSeverity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    UnhandledAsyncFailure,
    UncaughtSyncFailure,
    ApiError,
}

/// Ephemeral record of an intercepted failure. Produced, logged, and
/// discarded; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct FailureRecord {
    pub id: Uuid,
    pub kind: FailureKind,
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
}

impl FailureRecord {
    pub fn new(kind: FailureKind, payload: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            payload,
            timestamp: Utc::now(),
        }
    }

    /// Emit the record as a structured log line.
    pub fn log(&self) {
        let data = json!({
            "event": "failure_intercepted",
            "correlation_id": self.id.to_string(),
            "kind": self.kind,
            "payload": self.payload,
            "timestamp": self.timestamp.to_rfc3339(),
        });
        warn!("Failure intercepted: {data}");
    }
}

/// What the controller should do with an intercepted failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Show a transient, auto-dismissing toast.
    Notify {
        message: String,
        severity: ToastSeverity,
    },
    /// Our own code broke synchronously; ask the user to reload.
    NotifyReload,
    /// Hand the failure to the auth collaborator (401).
    DelegateToAuth,
    /// Diagnostics only, no user-facing output.
    LogOnly,
}

/// Classification policy for intercepted failures.
pub struct FailurePolicy {
    /// Substring identifying our own code in a failure's source origin.
    own_source_marker: String,
}

impl FailurePolicy {
    pub fn new(own_source_marker: impl Into<String>) -> Self {
        Self {
            own_source_marker: own_source_marker.into(),
        }
    }

    /// An asynchronous failure nobody handled: always reported to the user
    /// as a generic transient problem.
    pub fn classify_async(&self, message: &str) -> (FailureRecord, Disposition) {
        let record = FailureRecord::new(
            FailureKind::UnhandledAsyncFailure,
            json!({ "message": message }),
        );
        let disposition = Disposition::Notify {
            message: "Something went wrong. Please try again.".into(),
            severity: ToastSeverity::Warning,
        };
        (record, disposition)
    }

    /// An uncaught synchronous failure: only failures attributable to our
    /// own code warrant a user-facing reload notice.
    pub fn classify_sync(&self, message: &str, source: &str) -> (FailureRecord, Disposition) {
        let ours = source.contains(&self.own_source_marker);
        let record = FailureRecord::new(
            FailureKind::UncaughtSyncFailure,
            json!({ "message": message, "source": source, "own_code": ours }),
        );
        let disposition = if ours {
            Disposition::NotifyReload
        } else {
            Disposition::LogOnly
        };
        (record, disposition)
    }

    /// A structured API error. 401 belongs to the auth collaborator, server
    /// errors get a transient notice, everything else is diagnostics only.
    pub fn classify_api(&self, status: u16, message: &str) -> (FailureRecord, Disposition) {
        let record = FailureRecord::new(
            FailureKind::ApiError,
            json!({ "status": status, "message": message }),
        );
        let disposition = match status {
            401 => Disposition::DelegateToAuth,
            s if s >= 500 => Disposition::Notify {
                message: "The server is having trouble right now. Please try again shortly."
                    .into(),
                severity: ToastSeverity::Error,
            },
            _ => Disposition::LogOnly,
        };
        (record, disposition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> FailurePolicy {
        FailurePolicy::new("studycircle")
    }

    #[test]
    fn async_failures_always_notify() {
        let (record, disposition) = policy().classify_async("fetch aborted");
        assert_eq!(record.kind, FailureKind::UnhandledAsyncFailure);
        assert!(matches!(
            disposition,
            Disposition::Notify { severity: ToastSeverity::Warning, .. }
        ));
    }

    #[test]
    fn own_sync_failure_requests_reload() {
        let (record, disposition) =
            policy().classify_sync("boom", "https://cdn.studycircle.app/js/app.js:120");
        assert_eq!(record.kind, FailureKind::UncaughtSyncFailure);
        assert_eq!(disposition, Disposition::NotifyReload);
    }

    #[test]
    fn foreign_sync_failure_is_log_only() {
        let (_, disposition) =
            policy().classify_sync("boom", "https://third-party.example/widget.js:7");
        assert_eq!(disposition, Disposition::LogOnly);
    }

    #[test]
    fn unauthorized_is_delegated() {
        let (_, disposition) = policy().classify_api(401, "token expired");
        assert_eq!(disposition, Disposition::DelegateToAuth);
    }

    #[test]
    fn server_errors_notify() {
        for status in [500, 502, 503] {
            let (_, disposition) = policy().classify_api(status, "upstream down");
            assert!(
                matches!(disposition, Disposition::Notify { severity: ToastSeverity::Error, .. }),
                "status {status}"
            );
        }
    }

    #[test]
    fn other_statuses_are_log_only() {
        for status in [400, 404, 409, 422] {
            let (_, disposition) = policy().classify_api(status, "client error");
            assert_eq!(disposition, Disposition::LogOnly, "status {status}");
        }
    }
}
