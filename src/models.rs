// src/models.rs
//
// Transient values computed once per run. Nothing here is persisted.

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

/// Outcome of the toolchain invocation.
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub exit_code: i32,
    pub artifact: PathBuf,
    pub elapsed: Duration,
}

/// Where the artifact is staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    pub dir: PathBuf,
    /// Whether the directory was already there before this run.
    pub existed: bool,
}

impl DeploymentTarget {
    pub fn created(&self) -> bool {
        !self.existed
    }
}

/// Result of copy + independent re-verification.
#[derive(Debug, Clone)]
pub struct CopyOutcome {
    pub success: bool,
    pub path: PathBuf,
    /// Bytes the copy call claimed to have written.
    pub bytes_copied: u64,
    /// Size re-read from the destination metadata.
    pub size: u64,
    pub modified: Option<SystemTime>,
}

/// File metadata the pipeline cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub len: u64,
    pub modified: Option<SystemTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Init,
    Compiling,
    CompileFailed,
    Compiled,
    EnsuringDest,
    DestFailed,
    DestReady,
    Copying,
    CopyFailed,
    Copied,
    Verifying,
    VerifyFailed,
    Done,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Init => "init",
            PipelineState::Compiling => "compiling",
            PipelineState::CompileFailed => "compile_failed",
            PipelineState::Compiled => "compiled",
            PipelineState::EnsuringDest => "ensuring_dest",
            PipelineState::DestFailed => "dest_failed",
            PipelineState::DestReady => "dest_ready",
            PipelineState::Copying => "copying",
            PipelineState::CopyFailed => "copy_failed",
            PipelineState::Copied => "copied",
            PipelineState::Verifying => "verifying",
            PipelineState::VerifyFailed => "verify_failed",
            PipelineState::Done => "done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineState::CompileFailed
                | PipelineState::DestFailed
                | PipelineState::CopyFailed
                | PipelineState::VerifyFailed
                | PipelineState::Done
        )
    }

    /// Legal forward transitions. Anything else is a bug in the orchestrator.
    pub fn can_transition_to(&self, next: PipelineState) -> bool {
        use PipelineState::*;
        matches!(
            (self, next),
            (Init, Compiling)
                | (Compiling, CompileFailed)
                | (Compiling, Compiled)
                | (Compiled, EnsuringDest)
                | (EnsuringDest, DestFailed)
                | (EnsuringDest, DestReady)
                | (DestReady, Copying)
                | (Copying, CopyFailed)
                | (Copying, Copied)
                | (Copied, Verifying)
                | (Verifying, VerifyFailed)
                | (Verifying, Done)
        )
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
