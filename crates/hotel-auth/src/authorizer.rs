//! Token validation followed by group authorization

use crate::claims::Claims;
use crate::config::AuthConfig;
use crate::error::Result;
use crate::jwt::{self, TokenValidator};
use crate::policy::{Decision, GroupRules};
use crate::secrets::{SecretStore, fetch_key_set};

/// Validates bearer tokens with keys from a secret store and applies the
/// configured group rules.
pub struct Authorizer<S> {
    store: S,
    key_set_secret_id: String,
    validator: TokenValidator,
    rules: GroupRules,
}

impl<S: SecretStore> Authorizer<S> {
    pub fn new(config: AuthConfig, store: S) -> Self {
        Self {
            store,
            key_set_secret_id: config.key_set_secret_id,
            validator: TokenValidator::new(config.validation),
            rules: config.rules,
        }
    }

    /// Verify `token` and return its claims.
    ///
    /// The token is parsed before the key set is fetched, so malformed tokens
    /// never cost a secret store call.
    pub async fn verify(&self, token: &str) -> Result<Claims> {
        let peeked = jwt::peek(token)?;
        let key_set = fetch_key_set(&self.store, &self.key_set_secret_id).await?;
        self.validator.validate_peeked(token, &peeked, &key_set)
    }

    /// Verify `token` and decide whether it may access `path`
    pub async fn authorize(&self, token: &str, path: &str) -> Result<Decision> {
        self.authorize_with_claims(token, path)
            .await
            .map(|(_, decision)| decision)
    }

    /// Like [`Authorizer::authorize`], also returning the verified claims
    pub async fn authorize_with_claims(&self, token: &str, path: &str) -> Result<(Claims, Decision)> {
        let claims = self.verify(token).await?;
        let decision = self.rules.authorize(&claims, path);

        match &decision {
            Decision::Allow { matched_rule, .. } => tracing::info!(
                sub = decision.principal_id().unwrap_or_default(),
                path,
                rule = matched_rule.as_ref().map(|r| r.pattern()).unwrap_or("<none>"),
                "Request allowed"
            ),
            Decision::Deny { reason, .. } => tracing::info!(
                sub = decision.principal_id().unwrap_or_default(),
                path,
                %reason,
                "Request denied"
            ),
        }

        Ok((claims, decision))
    }
}
