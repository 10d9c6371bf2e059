use log::debug;

/// At most one chat-polling task exists at any time; this handle records
/// which group it is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollHandle {
    pub group_id: String,
}

/// Side effect the controller must apply to the UI collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollAction {
    Stop { group_id: String },
    Start { group_id: String },
}

/// Owns the single background chat-polling handle.
///
/// The task runs exactly when the tab is visible, the user is
/// authenticated, and the current route addresses a group. Starting a task
/// for a new group implicitly stops the previous one, and stopping an
/// already-stopped task is a no-op, which stands in for cancellation tokens
/// in this single-threaded model.
#[derive(Debug, Default)]
pub struct PollScheduler {
    active: Option<PollHandle>,
}

impl PollScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_group(&self) -> Option<&str> {
        self.active.as_ref().map(|h| h.group_id.as_str())
    }

    /// Reconcile the handle against the current signals and return the
    /// actions needed to get there. Stop always precedes start so no two
    /// tasks ever overlap.
    pub fn sync(
        &mut self,
        visible: bool,
        authenticated: bool,
        group_id: Option<&str>,
    ) -> Vec<PollAction> {
        let desired = if visible && authenticated {
            group_id
        } else {
            None
        };

        let mut actions = Vec::new();
        match (self.active_group(), desired) {
            (Some(current), Some(wanted)) if current == wanted => {}
            (None, None) => {}
            (current, wanted) => {
                if let Some(group) = current {
                    debug!("stopping chat polling for group {group}");
                    actions.push(PollAction::Stop {
                        group_id: group.to_string(),
                    });
                }
                if let Some(group) = wanted {
                    debug!("starting chat polling for group {group}");
                    actions.push(PollAction::Start {
                        group_id: group.to_string(),
                    });
                }
            }
        }

        self.active = desired.map(|group_id| PollHandle {
            group_id: group_id.to_string(),
        });
        actions
    }

    /// Idempotent stop, used on logout and teardown.
    pub fn stop(&mut self) -> Option<PollAction> {
        self.active.take().map(|handle| {
            debug!("stopping chat polling for group {}", handle.group_id);
            PollAction::Stop {
                group_id: handle.group_id,
            }
        })
    }
}

/// Extract the group id from a route path like `/group/42` or
/// `/group/42/chat`. The id is the first non-empty segment after the
/// configured prefix.
pub fn group_from_route(path: &str, prefix: &str) -> Option<String> {
    let rest = path.strip_prefix(prefix)?;
    let id = rest.split(['/', '?', '#']).next().unwrap_or("");
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
