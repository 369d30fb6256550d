// src/sys/toolchain.rs

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::sys::traits::Toolchain;

/// Drives `cargo build --release`.
pub struct CargoToolchain {
    program: String,
    target_dir: PathBuf,
}

impl CargoToolchain {
    pub fn new(program: impl Into<String>, target_dir: PathBuf) -> Self {
        Self {
            program: program.into(),
            target_dir,
        }
    }
}

#[async_trait]
impl Toolchain for CargoToolchain {
    fn program(&self) -> &str {
        &self.program
    }

    async fn build_release(&self, working_dir: &Path) -> io::Result<Option<i32>> {
        debug!(program = %self.program, dir = %working_dir.display(), "spawning release build");

        // Compiler diagnostics go straight to the developer's terminal.
        // CARGO_TARGET_DIR is pinned so the artifact lands where we look for it.
        let status = Command::new(&self.program)
            .arg("build")
            .arg("--release")
            .current_dir(working_dir)
            .env("CARGO_TARGET_DIR", &self.target_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        debug!(?status, "release build finished");
        Ok(status.code())
    }
}
