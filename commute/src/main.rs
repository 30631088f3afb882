// ---------------------------------------------------------------------
// name: commute
// type: Command line application.
// desc: Records the current driving times between home and college in
//       both directions.  Meant to be run from a scheduler, roughly
//       every 15 minutes.
// ---------------------------------------------------------------------

use anyhow::Context;
use commute_tracker::config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // A .env file is optional; a scheduler may set the variables itself.
    let env_file = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = env_file {
        info!("No .env file loaded: {}", e);
    }

    let config = Config::from_env().context("Failed to read configuration")?;
    let summary = commute_tracker::log_commute(&config)
        .context("Failed to record commute times")?;

    if !summary.quota_denied {
        info!(
            "Logged {} of {} directions",
            summary.logged.len(),
            summary.logged.len() + summary.failed.len()
        );
    }
    Ok(())
}
