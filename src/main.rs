// src/main.rs

use std::process;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use stagehand::report::Console;
use stagehand::{BuildOrchestrator, StageConfig};

// One stage at a time; nothing here benefits from worker threads.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // ==============================================================================
    // 1. Diagnostics
    // ==============================================================================

    // Status lines go to stdout; tracing stays on stderr and is quiet unless
    // RUST_LOG asks for more.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let extra: Vec<String> = std::env::args().skip(1).collect();
    if !extra.is_empty() {
        warn!(?extra, "stagehand takes no arguments; ignoring them");
    }

    // ==============================================================================
    // 2. Configuration
    // ==============================================================================

    let config = match StageConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {}", e);
            process::exit(1);
        }
    };

    // ==============================================================================
    // 3. Pipeline
    // ==============================================================================

    let mut console = Console::stdout();
    let mut orchestrator = BuildOrchestrator::new(config);

    let code = match orchestrator.run(&mut console).await {
        Ok(_) => 0,
        Err(e) => e.exit_code(),
    };

    process::exit(code);
}
