//! Secret resolution backed by the SSM parameter store

use crate::{error::AppError, Result};
use async_trait::async_trait;
use aws_sdk_ssm::error::DisplayErrorContext;
use aws_sdk_ssm::Client as SsmClient;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Resolves a named secret to its decrypted value.
#[async_trait]
pub trait SecretResolver: Send + Sync {
    async fn resolve(&self, name: &str) -> Result<String>;
}

/// Reads SecureString parameters with decryption enabled.
#[derive(Debug, Clone)]
pub struct SsmSecretResolver {
    client: SsmClient,
}

impl SsmSecretResolver {
    pub fn new(client: SsmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretResolver for SsmSecretResolver {
    async fn resolve(&self, name: &str) -> Result<String> {
        debug!(parameter = name, "fetching parameter from SSM");

        let output = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|e| AppError::secret_unavailable(name, DisplayErrorContext(&e).to_string()))?;

        output
            .parameter()
            .and_then(|p| p.value())
            .map(str::to_string)
            .ok_or_else(|| AppError::secret_unavailable(name, "parameter has no value"))
    }
}

/// Fixed secrets held in memory. Used by the dev server.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretResolver {
    values: HashMap<String, String>,
}

impl StaticSecretResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

#[async_trait]
impl SecretResolver for StaticSecretResolver {
    async fn resolve(&self, name: &str) -> Result<String> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::secret_unavailable(name, "no such secret"))
    }
}

/// Process-wide cache in front of another resolver.
///
/// Each name resolves at most once successfully; the value is never replaced
/// afterwards. Concurrent first lookups of the same name share one fetch.
/// Failed lookups are not cached.
pub struct CachedSecretResolver<R> {
    inner: R,
    cells: DashMap<String, Arc<OnceCell<String>>>,
}

impl<R: SecretResolver> CachedSecretResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cells: DashMap::new(),
        }
    }
}

#[async_trait]
impl<R: SecretResolver> SecretResolver for CachedSecretResolver<R> {
    async fn resolve(&self, name: &str) -> Result<String> {
        let cell = self.cells.entry(name.to_string()).or_default().clone();

        if let Some(value) = cell.get() {
            return Ok(value.clone());
        }

        let value = cell
            .get_or_try_init(|| async {
                let value = self.inner.resolve(name).await?;
                info!(parameter = name, "🔐 secret resolved and cached for process lifetime");
                Ok::<_, AppError>(value)
            })
            .await?;

        Ok(value.clone())
    }
}
