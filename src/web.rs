#![cfg(not(tarpaulin_include))]

use heads_up::app;
use heads_up::config::Config;

/// Main entry point for the web application
///
/// Initializes logging (default level `info`, overridable with `RUST_LOG`),
/// reads the configuration from the environment and an optional `.env` file,
/// and serves the report until the process is stopped.
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or error object
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    log::info!("Starting heads up report ({} environment)", config.app_env);

    app::run(config).await
}
