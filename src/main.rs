use anyhow::Result;
use cinefav::app::{run_cli, Command};
use cinefav::config::WidgetConfig;
use dotenvy::dotenv;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let dotenv_result = dotenv();
    init_tracing();
    match dotenv_result {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }
    let command = Command::parse(env::args().skip(1))?;
    let config = WidgetConfig::from_env()?;
    run_cli(config, command).await
}
