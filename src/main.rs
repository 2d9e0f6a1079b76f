//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `safe_fetch` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Mapping outcomes to exit codes
//!
//! All core functionality is implemented in the library crate.

use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use safe_fetch::config::{EXIT_OK, EXIT_UNAVAILABLE};
use safe_fetch::initialization::init_logger_with;
use safe_fetch::server::start_server;
use safe_fetch::{Cli, Command, FetchOutcome, Fetcher};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; flags and defaults cover everything
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = cli.log_level.clone();
    let log_format = cli.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    let fetcher = Fetcher::new(cli.fetch_config());

    let code = match cli.command {
        Command::Validate { url } => match fetcher.validate(&url).await {
            Ok(safe) => {
                println!("{}", safe);
                EXIT_OK
            }
            Err(e) => {
                eprintln!("safe_fetch: {}", e);
                e.exit_code()
            }
        },
        Command::Fetch { url, output } => match fetcher.fetch(&url).await {
            Ok(FetchOutcome::Fetched(page)) => {
                match output {
                    Some(path) => {
                        tokio::fs::write(&path, page.body.as_bytes())
                            .await
                            .with_context(|| format!("Failed to write {}", path.display()))?;
                        eprintln!(
                            "Wrote {} bytes from {} ({} redirects) to {}",
                            page.body.len(),
                            page.final_url,
                            page.redirects.len(),
                            path.display()
                        );
                    }
                    None => print!("{}", page.body),
                }
                EXIT_OK
            }
            Ok(FetchOutcome::Unavailable(reason)) => {
                eprintln!("safe_fetch: content unavailable: {}", reason);
                EXIT_UNAVAILABLE
            }
            Err(e) => {
                eprintln!("safe_fetch: {}", e);
                e.exit_code()
            }
        },
        Command::Serve { bind } => {
            start_server(bind, fetcher).await?;
            EXIT_OK
        }
    };

    process::exit(code);
}
