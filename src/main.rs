use std::time::Duration;

use a_axis_pin_finder::config;
use anyhow::Context;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    a_axis_pin_finder::configure_logging();

    let app_config = config::load_app_config()
        .context("Failed to load app config")?
        .with_env_overrides();

    let mut finder = a_axis_pin_finder::build_pin_finder(&app_config)
        .context("Failed to initialize hardware")?;

    finder.setup().context("Startup sequence failed")?;
    info!("Startup complete");

    let idle_poll = Duration::from_micros(app_config.idle_poll_us);
    if let Err(e) = finder.run_forever(idle_poll) {
        error!("Command loop stopped: {}", e);
        return Err(e.into());
    }
    Ok(())
}
