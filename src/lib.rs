//! Builds the capture backend in release mode and stages the binary into the
//! desktop app's runtime directory.
//!
//! The pipeline is `compile → ensure destination → copy → verify`; see
//! [`orchestrator::BuildOrchestrator`].

pub mod config;
pub mod error;
pub mod manifest;
pub mod models;
pub mod orchestrator;
pub mod report;
pub mod sys;

pub use config::StageConfig;
pub use error::{ConfigError, ManifestError, PipelineError};
pub use models::{BuildResult, CopyOutcome, DeploymentTarget, PipelineState};
pub use orchestrator::{BuildOrchestrator, PipelineOutcome};
