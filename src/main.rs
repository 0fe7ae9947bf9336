//! txkeeper main entry point

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio::runtime::Runtime;
use txkeeper_api::{start_server, AppState};
use txkeeper_config::Config;
use txkeeper_core::LoadMode;

#[derive(Parser, Debug)]
#[command(name = "txkeeper")]
#[command(version = "0.1.0")]
#[command(about = "A small file-backed transaction record service with token login", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print a default configuration file and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[ERROR] [{}] {}", e.code(), e);
            for suggestion in e.suggestions() {
                eprintln!("  - {}", suggestion);
            }
            anyhow::bail!("failed to load configuration from {}", args.config.display());
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    let state = AppState::from_config(config);
    log::info!(
        "Data file: {} ({} load)",
        state.config.data.json_data_file_path.display(),
        match state.store.load_mode() {
            LoadMode::Lenient => "lenient",
            LoadMode::Strict => "strict",
        }
    );

    // Surface a bad token lifetime at startup; logins would fail with it
    if let Err(e) = state.issuer.token_lifetime() {
        log::warn!("{}", e);
    }

    let rt = Runtime::new().context("failed to start tokio runtime")?;
    rt.block_on(start_server(state))
        .context("server stopped with an error")?;

    Ok(())
}
