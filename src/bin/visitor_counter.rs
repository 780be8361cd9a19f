// ============================================================================
// VISITOR COUNTER - API Gateway proxy Lambda
// ============================================================================

use cloud_resume::{init_tracing, state::AppState, visitor::handler::function_handler};
use lambda_http::{run, service_fn, Error};
use shared::Config;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;
    init_tracing(&config.app)?;

    // Clients and the salt cache live for the whole container lifetime.
    let state = AppState::from_aws(config).await?;

    run(service_fn(|event| function_handler(&state, event))).await
}
