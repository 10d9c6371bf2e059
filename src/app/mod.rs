pub mod accessibility;
pub mod auth_bridge;
pub mod bus;
pub mod capabilities;
pub mod command;
pub mod controller;
pub mod failures;
pub mod fatal;
pub mod lifecycle;
pub mod scheduler;
pub mod signal;

pub use auth_bridge::{AuthBridge, AuthTransition};
pub use bus::SignalBus;
pub use capabilities::{Capability, CapabilityGate, CapabilityReport};
pub use command::Command;
pub use controller::{AppController, ApplicationInfo, AuthStateInfo, Msg};
pub use failures::{Disposition, FailureKind, FailurePolicy, FailureRecord};
pub use fatal::FatalScreen;
pub use lifecycle::{Lifecycle, LifecycleState};
pub use scheduler::{PollAction, PollHandle, PollScheduler, group_from_route};
pub use signal::{AuthSnapshot, Signal, SignalKind, UserRef, Visibility};
