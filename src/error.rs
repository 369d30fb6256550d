// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

use crate::models::PipelineState;

/// Terminal failures of the pipeline. Every variant aborts the run; nothing is
/// retried and nothing already done is rolled back.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The toolchain ran and exited non-zero (or was killed by a signal).
    #[error("build failed: `{program}` exited with code {code}")]
    Compile { program: String, code: i32 },

    /// The toolchain could not be started at all.
    #[error("build failed: could not spawn `{program}`: {source}")]
    ToolchainSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The build succeeded but its output file name could not be worked out.
    #[error("build output could not be located: {0}")]
    ArtifactUnresolved(#[from] ManifestError),

    #[error("could not create destination directory {}: {source}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("copy failed from {} to {}: {reason}", src.display(), dst.display())]
    Copy {
        src: PathBuf,
        dst: PathBuf,
        reason: String,
    },

    #[error("verification failed for {}: {reason}", path.display())]
    Verify { path: PathBuf, reason: String },
}

impl PipelineError {
    /// Process exit status for this failure. Compile failures forward the
    /// toolchain's own code; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Compile { code, .. } if *code != 0 => *code,
            _ => 1,
        }
    }

    /// The terminal state the pipeline ends in when this error is raised.
    pub fn terminal_state(&self) -> PipelineState {
        match self {
            PipelineError::Compile { .. }
            | PipelineError::ToolchainSpawn { .. }
            | PipelineError::ArtifactUnresolved(_) => PipelineState::CompileFailed,
            PipelineError::DirectoryCreation { .. } => PipelineState::DestFailed,
            PipelineError::Copy { .. } => PipelineState::CopyFailed,
            PipelineError::Verify { .. } => PipelineState::VerifyFailed,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot determine working directory: {0}")]
    WorkingDir(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{} has neither a [[bin]] name nor a [package] name", path.display())]
    NoBinaryName { path: PathBuf },
}
