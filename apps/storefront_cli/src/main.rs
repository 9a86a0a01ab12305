// feastly/apps/storefront_cli/src/main.rs

mod commands;
mod console;

use crate::commands::Command;
use crate::console::{ConsoleNavigator, ConsoleNotifier};

use clap::Parser;
use feastly::{ClientConfig, Storefront};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info";

/// Order food from the terminal.
#[derive(Parser, Debug)]
#[command(name = "feastly", version, about, long_about = None)]
struct Cli {
  /// Overrides FEASTLY_API_BASE_URL.
  #[arg(long, global = true)]
  api_url: Option<String>,

  /// Overrides FEASTLY_STORAGE_PATH.
  #[arg(long, global = true)]
  storage: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

/// `RUST_LOG` when set and valid, `info` otherwise.
fn env_filter() -> EnvFilter {
  EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(env_filter())
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let mut config = match cli.api_url {
    Some(url) => ClientConfig::new(url),
    None => ClientConfig::from_env()?,
  };
  if let Some(path) = cli.storage {
    config = config.with_storage_path(path);
  }
  tracing::debug!(api = %config.api_base_url, storage = %config.storage_path.display(), "Configuration loaded.");

  let storefront = Storefront::from_config(&config, Arc::new(ConsoleNotifier), Arc::new(ConsoleNavigator))?;
  commands::run(&storefront, cli.command).await
}
