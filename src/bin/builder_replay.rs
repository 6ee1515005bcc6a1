//! Builder Replay - Recorded Session Player
//!
//! Replays a recorded tool session against the in-memory scene and prints
//! the resulting scene graph.
//!
//! Run with: `cargo run --bin builder_replay -- <recording.json> [config.json]`
//!
//! Set `RUST_LOG=debug` to follow every preview and fit request.

use std::path::Path;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use viewport_builders::playback::Recording;
use viewport_builders::{MemoryScene, PlaybackError, ToolConfig, ToolHost};

fn run(recording_path: &Path, config_path: Option<&Path>) -> Result<(), PlaybackError> {
    let recording = Recording::load(recording_path)?;
    let config = match config_path {
        Some(path) => ToolConfig::load(path)?,
        None => recording.tool_config(),
    };

    let mut host = ToolHost::new(MemoryScene::with_config(&config), config);
    let summary = recording.replay(&mut host);
    let scene = host.into_scene();

    println!("===========================================");
    println!("   Replay: {}", recording_path.display());
    println!("===========================================");
    println!(
        "{} events, {} clicks consumed, {} fits answered, {} fits dropped",
        summary.events, summary.clicks_consumed, summary.fits_answered, summary.fits_dropped
    );
    println!();
    print!("{}", scene.describe());
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(recording) = args.get(1) else {
        eprintln!("Usage: builder_replay <recording.json> [config.json]");
        return ExitCode::FAILURE;
    };
    let config = args.get(2).map(Path::new);

    match run(Path::new(recording), config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[Replay] {e}");
            ExitCode::FAILURE
        }
    }
}
