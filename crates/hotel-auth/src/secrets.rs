//! Secret store access for the JWKS document

use crate::error::{AuthError, Result};
use crate::jwks::KeySet;
use async_trait::async_trait;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use std::collections::HashMap;

/// Source of secret strings
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the string value of `secret_id`
    async fn get_secret(&self, secret_id: &str) -> Result<String>;
}

/// Fetch and parse the key set stored under `secret_id`.
///
/// Every call goes to the store; nothing is cached between invocations.
pub async fn fetch_key_set<S>(store: &S, secret_id: &str) -> Result<KeySet>
where
    S: SecretStore + ?Sized,
{
    let raw = store.get_secret(secret_id).await?;
    let key_set = KeySet::from_json(&raw)?;
    tracing::debug!(secret_id, keys = key_set.keys.len(), "Fetched key set");
    Ok(key_set)
}

/// AWS Secrets Manager backed store
#[derive(Debug, Clone)]
pub struct SecretsManagerStore {
    client: aws_sdk_secretsmanager::Client,
}

impl SecretsManagerStore {
    pub fn new(client: aws_sdk_secretsmanager::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for SecretsManagerStore {
    async fn get_secret(&self, secret_id: &str) -> Result<String> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| {
                AuthError::Upstream(format!(
                    "Failed to read secret '{secret_id}': {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        output
            .secret_string()
            .map(String::from)
            .ok_or_else(|| AuthError::Upstream(format!("Secret '{secret_id}' has no string value")))
    }
}

/// In-memory store for tests and offline verification
#[derive(Debug, Clone, Default)]
pub struct StaticSecretStore {
    secrets: HashMap<String, String>,
}

impl StaticSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, secret_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(secret_id.into(), value.into());
        self
    }
}

#[async_trait]
impl SecretStore for StaticSecretStore {
    async fn get_secret(&self, secret_id: &str) -> Result<String> {
        self.secrets
            .get(secret_id)
            .cloned()
            .ok_or_else(|| AuthError::Upstream(format!("Secret '{secret_id}' not found")))
    }
}
