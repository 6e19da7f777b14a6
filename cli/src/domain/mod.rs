//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod artifact;
pub mod config;
pub mod error;
pub mod outcome;
pub mod policy;
pub mod selector;
pub mod session;
pub mod status;

pub use artifact::{DiagnosticsArtifact, DownloadedFile, RawFileRow};
pub use config::{DeviceProfile, DiagpullConfig, Timings, validate_config};
pub use error::{ConfigError, SessionError, UiError, WorkflowError};
pub use outcome::{ReasonCode, WorkflowOutcome};
pub use selector::{ClickOptions, RowQuery, Selector};
pub use session::{Credentials, Session};
pub use status::CollectionStatus;
