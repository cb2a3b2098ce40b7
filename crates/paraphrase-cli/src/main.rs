//! paraphrase - a command-line client for the paraphrase service.
//!
//! Signs in against the backend, keeps the bearer token between runs and
//! sends text to be rewritten in one of several modes.

mod app;
mod cli;

use std::io;

use anyhow::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use paraphrase_core::Config;

use app::App;
use cli::{Command, USAGE};

/// Log file prefix inside the cache directory
const LOG_FILE_PREFIX: &str = "paraphrase.log";

/// Initialize the tracing subscriber for logging.
/// Logs go to stderr and, when the cache directory is known, to a daily file.
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match config.cache_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match cli::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };
    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = Config::load()?;
    let _guard = init_tracing(&config);
    info!(api_url = %config.api_url, "paraphrase starting");

    let mut app = App::new(config)?;
    let result = app.run(command).await;
    app.shutdown().await;

    result
}
