// src/orchestrator.rs

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::StageConfig;
use crate::error::PipelineError;
use crate::manifest;
use crate::models::{BuildResult, CopyOutcome, DeploymentTarget, PipelineState};
use crate::report::Reporter;
use crate::sys::store::LocalArtifactStore;
use crate::sys::toolchain::CargoToolchain;
use crate::sys::traits::{ArtifactStore, Toolchain};

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub build: BuildResult,
    pub target: DeploymentTarget,
    pub copy: CopyOutcome,
}

/// Compile, ensure the destination, copy, verify. Strictly in that order, and
/// the first failure ends the run.
pub struct BuildOrchestrator {
    config: StageConfig,
    toolchain: Box<dyn Toolchain>,
    store: Box<dyn ArtifactStore>,
    state: PipelineState,
    trail: Vec<PipelineState>,
}

impl BuildOrchestrator {
    /// Cargo on the local machine.
    pub fn new(config: StageConfig) -> Self {
        let toolchain = CargoToolchain::new(config.toolchain.clone(), config.target_dir.clone());
        Self::with_parts(config, Box::new(toolchain), Box::new(LocalArtifactStore))
    }

    pub fn with_parts(
        config: StageConfig,
        toolchain: Box<dyn Toolchain>,
        store: Box<dyn ArtifactStore>,
    ) -> Self {
        Self {
            config,
            toolchain,
            store,
            state: PipelineState::Init,
            trail: vec![PipelineState::Init],
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Every state visited so far, starting with `Init`.
    pub fn trail(&self) -> &[PipelineState] {
        &self.trail
    }

    fn advance(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        debug!(from = %self.state, to = %next, "pipeline transition");
        self.state = next;
        self.trail.push(next);
    }

    /// Runs the whole pipeline. On failure the reporter has already been told
    /// and the orchestrator sits in the matching terminal state. Calling it
    /// again starts a fresh run from `Init`.
    pub async fn run(
        &mut self,
        reporter: &mut dyn Reporter,
    ) -> Result<PipelineOutcome, PipelineError> {
        self.state = PipelineState::Init;
        self.trail = vec![PipelineState::Init];

        match self.run_stages(reporter).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.advance(e.terminal_state());
                // The message itself goes out through `reporter.failed`.
                debug!(state = %self.state, "pipeline aborted");
                reporter.failed(&e);
                Err(e)
            }
        }
    }

    async fn run_stages(
        &mut self,
        reporter: &mut dyn Reporter,
    ) -> Result<PipelineOutcome, PipelineError> {
        self.advance(PipelineState::Compiling);
        reporter.build_started(self.toolchain.program());
        let build = self.compile().await?;
        self.advance(PipelineState::Compiled);
        reporter.build_succeeded(build.elapsed);

        self.advance(PipelineState::EnsuringDest);
        let dest_dir = self.config.destination_dir.clone();
        let target = self.ensure_destination(&dest_dir).await?;
        self.advance(PipelineState::DestReady);
        reporter.destination_ready(&target);

        self.advance(PipelineState::Copying);
        let (dst, bytes_copied) = self.copy_artifact(&build.artifact, &target.dir).await?;
        self.advance(PipelineState::Copied);

        self.advance(PipelineState::Verifying);
        let copy = self.verify_copy(&build.artifact, &dst, bytes_copied).await?;
        self.advance(PipelineState::Done);
        reporter.copy_verified(&copy);

        info!(artifact = %dst.display(), size = copy.size, "backend staged");
        Ok(PipelineOutcome { build, target, copy })
    }

    // ==============================================================================
    // Stages
    // ==============================================================================

    /// Release build of the manifest in the working directory, then the path
    /// of the binary it produced. No retries.
    pub async fn compile(&self) -> Result<BuildResult, PipelineError> {
        let program = self.toolchain.program().to_string();
        let started = Instant::now();

        let code = self
            .toolchain
            .build_release(&self.config.working_dir)
            .await
            .map_err(|source| PipelineError::ToolchainSpawn {
                program: program.clone(),
                source,
            })?;
        let elapsed = started.elapsed();

        match code {
            Some(0) => {}
            // Killed by a signal: there is no code to forward.
            None => return Err(PipelineError::Compile { program, code: 1 }),
            Some(code) => return Err(PipelineError::Compile { program, code }),
        }

        let artifact = self.resolve_artifact().await?;
        debug!(artifact = %artifact.display(), ?elapsed, "build output located");

        Ok(BuildResult {
            exit_code: 0,
            artifact,
            elapsed,
        })
    }

    async fn resolve_artifact(&self) -> Result<PathBuf, PipelineError> {
        let name = match &self.config.artifact_name {
            Some(name) => name.clone(),
            None => manifest::binary_name(&self.config.manifest_path()).await?,
        };
        Ok(self
            .config
            .release_dir()
            .join(manifest::executable_file_name(&name)))
    }

    /// Creates `path` (and parents) when missing. A second call is a no-op.
    pub async fn ensure_destination(&self, path: &Path) -> Result<DeploymentTarget, PipelineError> {
        let dir_error = |source: std::io::Error| PipelineError::DirectoryCreation {
            path: path.to_path_buf(),
            source,
        };

        let existed = self.store.dir_exists(path).await.map_err(dir_error)?;
        if !existed {
            self.store.create_dir_all(path).await.map_err(dir_error)?;
            info!(dir = %path.display(), "created destination directory");
        }

        Ok(DeploymentTarget {
            dir: path.to_path_buf(),
            existed,
        })
    }

    /// Overwrite-copies `src` into `dest_dir`, keeping its file name. Returns
    /// the destination path and the byte count the copy call reported.
    pub async fn copy_artifact(
        &self,
        src: &Path,
        dest_dir: &Path,
    ) -> Result<(PathBuf, u64), PipelineError> {
        let file_name = src.file_name().ok_or_else(|| PipelineError::Copy {
            src: src.to_path_buf(),
            dst: dest_dir.to_path_buf(),
            reason: "artifact path has no file name".into(),
        })?;
        let dst = dest_dir.join(file_name);
        let copy_error = |reason: String| PipelineError::Copy {
            src: src.to_path_buf(),
            dst: dst.clone(),
            reason,
        };

        match self.store.stat(src).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(copy_error("build output not found".into())),
            Err(e) => return Err(copy_error(e.to_string())),
        }

        let bytes = self
            .store
            .copy(src, &dst)
            .await
            .map_err(|e| copy_error(e.to_string()))?;

        debug!(src = %src.display(), dst = %dst.display(), bytes, "copy call returned");
        Ok((dst, bytes))
    }

    /// Re-reads `dst` from disk instead of trusting the copy call. A missing,
    /// empty or short file fails here.
    pub async fn verify_copy(
        &self,
        src: &Path,
        dst: &Path,
        bytes_copied: u64,
    ) -> Result<CopyOutcome, PipelineError> {
        let verify_error = |reason: String| PipelineError::Verify {
            path: dst.to_path_buf(),
            reason,
        };

        let stat = match self.store.stat(dst).await {
            Ok(Some(stat)) => stat,
            Ok(None) => return Err(verify_error("file is missing after copy".into())),
            Err(e) => return Err(verify_error(format!("cannot read metadata: {e}"))),
        };

        if stat.len == 0 {
            return Err(verify_error("file is empty".into()));
        }

        // The source may have vanished by now; only compare when we can.
        if let Ok(Some(source)) = self.store.stat(src).await {
            if source.len != stat.len {
                return Err(verify_error(format!(
                    "size mismatch: expected {} bytes, found {}",
                    source.len, stat.len
                )));
            }
        }

        Ok(CopyOutcome {
            success: true,
            path: dst.to_path_buf(),
            bytes_copied,
            size: stat.len,
            modified: stat.modified,
        })
    }
}
