// ============================================================================
// LOGGING SETUP
// ============================================================================

pub mod middleware;

pub use middleware::*;

use anyhow::anyhow;
use shared::config::AppConfig;
use shared::LogFormat;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// JSON output drops timestamps since CloudWatch records ingestion time.
pub fn init_tracing(app: &AppConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&app.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match app.log_format {
        LogFormat::Json => builder.json().flatten_event(true).without_time().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))
}
