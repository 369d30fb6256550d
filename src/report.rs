// src/report.rs
//
// Human-readable status lines for the developer running the build. There is
// no machine-readable mode; automation should look at the exit code.

use chrono::{DateTime, Local};
use crossterm::style::Stylize;
use is_terminal::IsTerminal;
use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::error::PipelineError;
use crate::models::{CopyOutcome, DeploymentTarget};

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Receives one call per pipeline milestone.
pub trait Reporter {
    fn build_started(&mut self, program: &str);
    fn build_succeeded(&mut self, elapsed: Duration);
    fn destination_ready(&mut self, target: &DeploymentTarget);
    fn copy_verified(&mut self, outcome: &CopyOutcome);
    fn failed(&mut self, error: &PipelineError);
}

/// Size in megabytes, rounded to two decimals (`3.46 MB`).
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / BYTES_PER_MEGABYTE)
}

pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format(TIMESTAMP_FORMAT).to_string()
}

/// Color only for an interactive, non-dumb terminal without `NO_COLOR`.
pub fn supports_color(get_env: impl Fn(&str) -> Option<String>, is_tty: bool) -> bool {
    let term_is_dumb = get_env("TERM")
        .map(|t| t.eq_ignore_ascii_case("dumb"))
        .unwrap_or(false);
    is_tty && !term_is_dumb && get_env("NO_COLOR").is_none()
}

#[derive(Clone, Copy)]
enum Tone {
    Info,
    Success,
    Error,
    Dim,
}

pub struct Console<W: Write> {
    out: W,
    color: bool,
}

impl Console<io::Stdout> {
    pub fn stdout() -> Self {
        let color = supports_color(|k| std::env::var(k).ok(), io::stdout().is_terminal());
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, tone: Tone, text: &str) {
        let rendered = if self.color {
            match tone {
                Tone::Info => format!("{}", text.cyan()),
                Tone::Success => format!("{}", text.green()),
                Tone::Error => format!("{}", text.red().bold()),
                Tone::Dim => format!("{}", text.dark_grey()),
            }
        } else {
            text.to_string()
        };
        // A closed stdout must not turn a good build into a failure.
        if let Err(e) = writeln!(self.out, "{rendered}") {
            tracing::warn!("console write failed: {}", e);
        }
    }
}

impl<W: Write> Reporter for Console<W> {
    fn build_started(&mut self, program: &str) {
        self.line(Tone::Info, &format!("Building backend in release mode ({program} build --release)..."));
    }

    fn build_succeeded(&mut self, elapsed: Duration) {
        self.line(
            Tone::Success,
            &format!("✓ Build succeeded in {:.1}s", elapsed.as_secs_f64()),
        );
    }

    fn destination_ready(&mut self, target: &DeploymentTarget) {
        if target.created() {
            self.line(
                Tone::Info,
                &format!("Created destination directory: {}", display(&target.dir)),
            );
        }
    }

    fn copy_verified(&mut self, outcome: &CopyOutcome) {
        self.line(
            Tone::Success,
            &format!("✓ Copied backend to {}", display(&outcome.path)),
        );
        self.line(Tone::Dim, &format!("  File size: {}", format_megabytes(outcome.size)));
        let modified = outcome
            .modified
            .map(format_timestamp)
            .unwrap_or_else(|| "unknown".to_string());
        self.line(Tone::Dim, &format!("  Last modified: {modified}"));
    }

    fn failed(&mut self, error: &PipelineError) {
        self.line(Tone::Error, &format!("✗ {error}"));
        if let PipelineError::Copy { .. } = error {
            self.line(
                Tone::Dim,
                "  If the app is running it may be holding the old binary open; stop it and retry.",
            );
        }
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
