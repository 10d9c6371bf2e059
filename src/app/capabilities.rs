use log::{debug, error};
use serde::Serialize;

use crate::host::HostEnvironment;

/// Environment features the application cannot run without.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Network fetch.
    Fetch,
    /// Persistent key-value storage.
    Storage,
    /// DOM query support.
    DomQuery,
    /// Element classlist manipulation.
    ClassList,
    /// Promise support.
    Promises,
    /// Custom-event dispatch.
    CustomEvents,
}

impl Capability {
    pub const REQUIRED: [Capability; 6] = [
        Capability::Fetch,
        Capability::Storage,
        Capability::DomQuery,
        Capability::ClassList,
        Capability::Promises,
        Capability::CustomEvents,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Capability::Fetch => "fetch",
            Capability::Storage => "storage",
            Capability::DomQuery => "dom-query",
            Capability::ClassList => "classlist",
            Capability::Promises => "promises",
            Capability::CustomEvents => "custom-events",
        }
    }
}

/// Outcome of the pre-flight capability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityReport {
    pub passed: bool,
    pub missing: Vec<Capability>,
}

/// Pre-flight check of required hosting-environment features.
///
/// The gate only reports; rendering the incompatibility notice on failure
/// is the controller's job.
pub struct CapabilityGate;

impl CapabilityGate {
    pub fn check(env: &dyn HostEnvironment) -> CapabilityReport {
        let missing: Vec<Capability> = Capability::REQUIRED
            .into_iter()
            .filter(|cap| !env.has_capability(*cap))
            .collect();

        if missing.is_empty() {
            debug!("capability gate passed");
        } else {
            let labels: Vec<&str> = missing.iter().map(|c| c.label()).collect();
            error!("capability gate failed, missing: {}", labels.join(", "));
        }

        CapabilityReport {
            passed: missing.is_empty(),
            missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::host::HostInfo;

    struct FixedEnv {
        present: HashSet<Capability>,
    }

    impl FixedEnv {
        fn all() -> Self {
            Self {
                present: Capability::REQUIRED.into_iter().collect(),
            }
        }

        fn without(cap: Capability) -> Self {
            let mut env = Self::all();
            env.present.remove(&cap);
            env
        }
    }

    impl HostEnvironment for FixedEnv {
        fn has_capability(&self, cap: Capability) -> bool {
            self.present.contains(&cap)
        }

        fn replace_document(&mut self, _html: &str) {}

        fn host_info(&self) -> HostInfo {
            HostInfo::default()
        }
    }

    #[test]
    fn passes_when_everything_is_present() {
        let report = CapabilityGate::check(&FixedEnv::all());
        assert!(report.passed);
        assert!(report.missing.is_empty());
    }

    #[test]
    fn reports_missing_fetch() {
        let report = CapabilityGate::check(&FixedEnv::without(Capability::Fetch));
        assert!(!report.passed);
        assert_eq!(report.missing, vec![Capability::Fetch]);
        assert_eq!(report.missing[0].label(), "fetch");
    }

    #[test]
    fn any_absent_capability_fails_the_gate() {
        for cap in Capability::REQUIRED {
            let report = CapabilityGate::check(&FixedEnv::without(cap));
            assert!(!report.passed, "{:?} should fail the gate", cap);
            assert_eq!(report.missing, vec![cap]);
        }
    }
}
