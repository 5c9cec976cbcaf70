use anyhow::Result;
use battle_session_overlay::bin_common::{load_config_from_env, parse_args, ConfigType};
use session_rating::{init_tracing, run_overlay, LogPresenter, OverlayConfig, ShutdownManager};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // A path on the command line wins over OVERLAY_CONFIG_PATH
    let config_path = match parse_args().into_iter().next() {
        Some(path) => PathBuf::from(path),
        None => load_config_from_env(ConfigType::Overlay),
    };
    let config = OverlayConfig::load_or_default(&config_path)?;

    // Loading logs nothing; `log` reports the file and any override
    init_tracing(&config.log_level);
    config.log();

    let shutdown = ShutdownManager::new();
    shutdown.spawn_signal_handler();

    info!("Press Ctrl+C to stop");
    run_overlay(&config, Box::new(LogPresenter::new()), shutdown.flag()).await?;

    info!("Session overlay stopped gracefully");
    Ok(())
}
