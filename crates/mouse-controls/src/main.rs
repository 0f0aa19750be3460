//! mouse-controls entry point.
//!
//! ```text
//! main()
//!  └─ resolve_config()          -- --config, ./config.toml, ./config.json, platform dir
//!  └─ platform_cursor()         -- fails fast without a display backend
//!  └─ platform_key_source()
//!  └─ Dispatcher::start()       -- spawn_blocking; also starts the governor thread
//!       └─ raced against Ctrl-C, which calls Dispatcher::cancel()
//! ```
//!
//! Exit code is zero for the exit key and for Ctrl-C, non-zero for
//! configuration or device errors.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mouse_controls::application::dispatcher::Dispatcher;
use mouse_controls::application::governor::Governor;
use mouse_controls::infrastructure::cursor::platform_cursor;
use mouse_controls::infrastructure::key_capture::platform_key_source;
use mouse_controls::infrastructure::storage::config::resolve_config;
use mouse_controls::MouseControlError;

/// Holds the mouse cursor inside a screen region while a hotkey lock is on.
#[derive(Debug, Parser)]
#[command(
    name = "mouse-controls",
    about = "Confine the mouse cursor to a screen region, toggled by a global hotkey",
    version
)]
struct Cli {
    /// Path to a `.toml` (or legacy `.json`) config file.
    ///
    /// When omitted, `config.toml` and `config.json` in the working directory
    /// and then the platform config directory are tried, falling back to
    /// built-in defaults.
    #[arg(long, env = "MOUSE_CONTROLS_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ── Configuration ─────────────────────────────────────────────────────────
    //
    // Loaded before logging so the file's `log_level` can seed the filter.
    let (config, config_path) =
        resolve_config(cli.config.as_deref()).map_err(MouseControlError::from)?;

    // `RUST_LOG` wins over the config file; an unparsable level falls back to info.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.log_level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match &config_path {
        Some(path) => info!("loaded configuration from {}", path.display()),
        None => info!("no configuration file found, using defaults"),
    }

    let settings = config.settings().map_err(MouseControlError::from)?;
    info!(
        region = %settings.region,
        poll_interval = ?settings.poll_interval,
        "clamp region configured"
    );

    // ── Devices ───────────────────────────────────────────────────────────────
    let cursor = platform_cursor().map_err(MouseControlError::from)?;
    let source = platform_key_source(settings.keys).map_err(MouseControlError::from)?;

    let governor = Arc::new(Governor::new(
        settings.region,
        settings.poll_interval,
        settings.keys,
        cursor,
    ));
    let dispatcher = Arc::new(Dispatcher::new(governor, source));

    // ── Session ───────────────────────────────────────────────────────────────
    //
    // The dispatcher blocks on the key channel, so it runs on the blocking
    // pool while this task waits for Ctrl-C.
    let mut session = {
        let dispatcher = Arc::clone(&dispatcher);
        tokio::task::spawn_blocking(move || dispatcher.start())
    };

    let outcome = tokio::select! {
        result = &mut session => result,
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => {
                    info!("received Ctrl+C, releasing the cursor");
                    dispatcher.cancel();
                }
                Err(e) => warn!("failed to listen for Ctrl+C ({e}); use the exit key to quit"),
            }
            (&mut session).await
        }
    };

    let reason = outcome.context("dispatcher task failed")??;
    info!(?reason, "mouse-controls stopped");
    Ok(())
}
