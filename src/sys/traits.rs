// src/sys/traits.rs
//
// The two seams between the pipeline and the machine. The orchestrator only
// ever talks to these, so one implementation serves every shell and platform.

use async_trait::async_trait;
use std::io;
use std::path::Path;

use crate::models::FileStat;

// ==============================================================================
// 1. Toolchain (Process Spawn)
// ==============================================================================

#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Program name, used in diagnostics.
    fn program(&self) -> &str;

    /// Runs a release build of the manifest in `working_dir` and waits for it.
    ///
    /// `Ok(Some(code))` is the toolchain's exit code, `Ok(None)` means it was
    /// terminated without one (signal). `Err` means it never started.
    async fn build_release(&self, working_dir: &Path) -> io::Result<Option<i32>>;
}

// ==============================================================================
// 2. Artifact Store (Filesystem)
// ==============================================================================

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// `true` only for an existing directory. A missing path is `Ok(false)`.
    async fn dir_exists(&self, path: &Path) -> io::Result<bool>;

    /// Creates `path` and any missing parents. Succeeds if it already exists.
    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Overwrite-copies `src` to `dst`, returning the bytes the copy reports.
    async fn copy(&self, src: &Path, dst: &Path) -> io::Result<u64>;

    /// Fresh metadata for `path`, or `Ok(None)` when nothing is there.
    async fn stat(&self, path: &Path) -> io::Result<Option<FileStat>>;
}
