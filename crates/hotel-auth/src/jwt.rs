//! JWT token verification

use crate::claims::{Claims, StringOrList};
use crate::config::ValidationConfig;
use crate::error::{AuthError, Result};
use crate::jwks::KeySet;
use base64::{Engine as _, engine::general_purpose};
use jsonwebtoken::{Algorithm, Validation, decode, decode_header};
use serde::Deserialize;

/// Header and claim fields read from a token before its signature is checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPeek {
    pub kid: Option<String>,
    pub alg: Algorithm,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UnverifiedClaims {
    #[serde(default)]
    iss: Option<String>,
    #[serde(default)]
    aud: Option<StringOrList>,
}

/// Parse a token without verifying its signature.
///
/// The key id selects the verification key and the issuer/audience feed the
/// validation parameters, so this runs before the key set is fetched.
pub fn peek(token: &str) -> Result<TokenPeek> {
    let header = decode_header(token)
        .map_err(|e| AuthError::InvalidToken(format!("Malformed token header: {e}")))?;

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::InvalidToken(format!(
            "Expected 3 dot-separated parts, got {}",
            parts.len()
        )));
    }

    let payload = general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|e| AuthError::InvalidToken(format!("Malformed token payload: {e}")))?;
    let claims: UnverifiedClaims = serde_json::from_slice(&payload)
        .map_err(|e| AuthError::InvalidToken(format!("Malformed token claims: {e}")))?;

    Ok(TokenPeek {
        kid: header.kid,
        alg: header.alg,
        issuer: claims.iss,
        audience: claims.aud.as_ref().and_then(|a| a.first().map(String::from)),
    })
}

/// Verifies tokens against a key set
#[derive(Debug, Clone, Default)]
pub struct TokenValidator {
    config: ValidationConfig,
}

impl TokenValidator {
    pub fn new(config: ValidationConfig) -> Self {
        if config.expected_issuer.is_none() || config.expected_audience.is_none() {
            tracing::warn!(
                issuer_pinned = config.expected_issuer.is_some(),
                audience_pinned = config.expected_audience.is_some(),
                "Token issuer/audience not pinned by configuration; falling back to the token's own values"
            );
        }
        Self { config }
    }

    /// Validate `token` against `key_set` and return its claims
    pub fn validate(&self, token: &str, key_set: &KeySet) -> Result<Claims> {
        let peeked = peek(token)?;
        self.validate_peeked(token, &peeked, key_set)
    }

    /// Validate a token that has already been peeked
    pub fn validate_peeked(&self, token: &str, peeked: &TokenPeek, key_set: &KeySet) -> Result<Claims> {
        let verification_key = key_set.verification_key(peeked.kid.as_deref())?;

        if let Some(key_alg) = verification_key.alg
            && key_alg != peeked.alg
        {
            return Err(AuthError::InvalidToken(format!(
                "Token algorithm {:?} does not match key algorithm {key_alg:?}",
                peeked.alg
            )));
        }

        let issuer = self
            .config
            .expected_issuer
            .as_deref()
            .or(peeked.issuer.as_deref())
            .ok_or_else(|| AuthError::InvalidToken("Token has no issuer".to_string()))?;
        let audience = self
            .config
            .expected_audience
            .as_deref()
            .or(peeked.audience.as_deref())
            .ok_or_else(|| AuthError::InvalidToken("Token has no audience".to_string()))?;

        let mut validation = Validation::new(peeked.alg);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.validate_nbf = true;
        validation.leeway = self.config.leeway_secs;

        let token_data = decode::<serde_json::Map<String, serde_json::Value>>(
            token,
            &verification_key.key,
            &validation,
        )?;

        let claims = Claims::from_payload(token_data.claims, &self.config.group_claims);
        tracing::debug!(
            kid = peeked.kid.as_deref().unwrap_or_default(),
            sub = claims.subject.as_deref().unwrap_or_default(),
            groups = %claims.groups_joined(),
            "Token validated"
        );

        Ok(claims)
    }
}
