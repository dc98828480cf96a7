mod core;
mod domain;
mod infra;
#[cfg(test)]
mod testing;

use std::{path::Path, sync::Arc};

use tracing::{debug, info};

use crate::{
    core::{App, StatusAnnouncer},
    infra::{Config, DiscordGateway, LogGuard, Settings, UnixSignalHandler},
};

const CONFIG_PATH: &str = "./config";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded = load_config()?;
    let _log_guard = LogGuard::init()?;
    if !loaded {
        debug!("no {CONFIG_PATH} file, using the process environment");
    }

    let settings = Settings::from_config(&Config::new())?;
    info!(
        channel_id = %settings.channel_id,
        announce_shutdown = settings.announce_shutdown,
        shutdown_timeout = ?settings.shutdown_timeout,
        "configuration loaded"
    );

    let signal_handler = UnixSignalHandler::new()?;
    let gateway = DiscordGateway::new(&settings).await?;
    let announcer = StatusAnnouncer::new(settings.channel_id.clone(), settings.announce_shutdown);

    let app = App::new(
        signal_handler,
        Arc::new(gateway),
        Arc::new(announcer),
        settings.shutdown_timeout,
    );

    let state = app.run().await?;
    debug!(closed = state.is_closed(), "exiting");

    Ok(())
}

/// Loads `./config` into the environment. Runs before logging starts, so a
/// `RUST_LOG` set there reaches the filter. Returns whether the file existed.
fn load_config() -> anyhow::Result<bool> {
    load_config_from(Path::new(CONFIG_PATH))
}

fn load_config_from(path: &Path) -> anyhow::Result<bool> {
    if !path.exists() {
        return Ok(false);
    }

    dotenv::from_path(path)?;
    Ok(true)
}
