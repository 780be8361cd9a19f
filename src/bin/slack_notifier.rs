// ============================================================================
// SLACK NOTIFIER - SNS-triggered Lambda forwarding CloudWatch alarms
// ============================================================================

use cloud_resume::{alarm::handler::function_handler, init_tracing, state::AppState};
use lambda_runtime::{run, service_fn, Error};
use shared::Config;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;
    init_tracing(&config.app)?;

    let state = AppState::from_aws(config).await?;

    run(service_fn(|event| function_handler(&state, event))).await
}
