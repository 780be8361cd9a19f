use crate::visitor::{DynamoVisitorStore, InMemoryVisitorStore, VisitorStore};
use aws_config::BehaviorVersion;
use reqwest::Client as ReqwestClient;
use shared::{
    AppError, CachedSecretResolver, Config, SecretResolver, SsmSecretResolver,
    StaticSecretResolver,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Long-lived clients shared by every invocation on this process.
///
/// Built once at cold start and handed to the handlers explicitly.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub secrets: Arc<dyn SecretResolver>,
    pub visitors: Arc<dyn VisitorStore>,
    pub http_client: ReqwestClient,
}

impl AppState {
    pub fn new(
        config: Config,
        secrets: Arc<dyn SecretResolver>,
        visitors: Arc<dyn VisitorStore>,
    ) -> shared::Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.alarm.webhook_timeout_seconds))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config: Arc::new(config),
            secrets,
            visitors,
            http_client,
        })
    }

    /// State for the deployed Lambda functions: SSM secrets and DynamoDB tables.
    pub async fn from_aws(config: Config) -> shared::Result<Self> {
        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;

        let secrets = CachedSecretResolver::new(SsmSecretResolver::new(
            aws_sdk_ssm::Client::new(&sdk_config),
        ));
        let visitors = DynamoVisitorStore::new(
            aws_sdk_dynamodb::Client::new(&sdk_config),
            &config.visitor,
        );

        info!(
            counter_table = %config.visitor.counter_table,
            ip_table = %config.visitor.ip_table,
            "☁️ AWS clients initialized"
        );

        Self::new(config, Arc::new(secrets), Arc::new(visitors))
    }

    /// State for the local dev server: in-memory tables and static secrets.
    pub fn local(config: Config) -> shared::Result<Self> {
        let mut secrets = StaticSecretResolver::new()
            .with_secret(&config.visitor.ip_salt_parameter, &config.app.dev_ip_salt);
        if let Some(url) = &config.app.dev_slack_webhook_url {
            secrets = secrets.with_secret(&config.alarm.slack_webhook_parameter, url);
        }

        Self::new(
            config,
            Arc::new(CachedSecretResolver::new(secrets)),
            Arc::new(InMemoryVisitorStore::new()),
        )
    }
}
