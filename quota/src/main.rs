// ---------------------------------------------------------------------
// name: quota
// type: Command line application.
// desc: Shows how much of today's routes API quota has been used.
//       Never changes the quota file, and only needs the quota
//       settings (QUOTA_FILE or DATA_DIR, DAILY_LIMIT), not API keys.
// ---------------------------------------------------------------------

use anyhow::Context;
use chrono::Utc;
use commute_tracker::config::QuotaSettings;
use commute_tracker::quota::{QuotaTracker, REQUESTS_PER_RUN};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let settings = QuotaSettings::from_env().context("Failed to read quota settings")?;
    let tracker = QuotaTracker::new(settings.quota_file, settings.daily_limit, REQUESTS_PER_RUN);
    let today = Utc::now().date_naive();
    let usage = tracker.usage_on(today);
    let remaining = tracker.daily_limit().saturating_sub(usage.count);

    println!(
        "{}: used {} of {} requests ({} remaining)",
        usage.date,
        usage.count,
        tracker.daily_limit(),
        remaining
    );
    Ok(())
}
