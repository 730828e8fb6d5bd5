mod config;
mod gallery;
mod layout;
mod page;
mod simulate;

use config::{SimConfig, SimError};
use std::path::PathBuf;
use tracing::{error, info};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), SimError> {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let config = match std::env::args().nth(2) {
        Some(path) => SimConfig::load_or_default(&PathBuf::from(path))?,
        None => SimConfig::from_user_config()?,
    };

    info!("Starting lazyload-sim in {}", dir.display());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(SimError::Runtime)?;

    let summary = tokio::task::LocalSet::new()
        .block_on(&runtime, simulate::simulate(&dir, &config))?;

    println!("{}", summary);
    Ok(())
}
