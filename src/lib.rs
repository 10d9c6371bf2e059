//! Application lifecycle and event orchestration layer for the StudyCircle
//! client.
//!
//! The crate takes the application from cold start to ready, keeps UI and
//! background work in sync with authentication state, pauses and resumes
//! the group-chat polling task with tab visibility and routing, and
//! intercepts failures nothing else handled. Everything outside that core
//! (auth token refresh, API calls, view rendering, route matching) is
//! reached through the collaborator traits in [`host`].

pub mod app;
pub mod config;
pub mod error;
pub mod host;

pub use app::{AppController, ApplicationInfo, LifecycleState, Signal};
pub use config::ControllerConfig;
pub use error::AppError;
