//! JWKS (JSON Web Key Set) parsing and key selection

use crate::error::{AuthError, Result};
use base64::{Engine as _, engine::general_purpose};
use jsonwebtoken::{Algorithm, DecodingKey};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// JWKS document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeySet {
    #[serde(alias = "Keys")]
    pub keys: Vec<Jwk>,
}

/// JSON Web Key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwk {
    /// Key type (RSA, oct)
    #[serde(alias = "Kty")]
    pub kty: String,

    /// Key ID
    #[serde(alias = "Kid", skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    /// Algorithm
    #[serde(alias = "Alg", skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,

    /// Key use (sig, enc)
    #[serde(rename = "use", alias = "Use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,

    /// RSA modulus (base64url)
    #[serde(alias = "N", skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,

    /// RSA exponent (base64url)
    #[serde(alias = "E", skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,

    /// Symmetric key (base64url)
    #[serde(alias = "K", skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,
}

/// A key located in the set, ready for signature verification
pub struct VerificationKey {
    pub key: DecodingKey,
    /// Algorithm pinned by the JWK, if it declares one
    pub alg: Option<Algorithm>,
}

impl KeySet {
    /// Parse a JWKS document as stored in the secret store
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| AuthError::Upstream(format!("Failed to parse JWKS: {e}")))
    }

    pub fn kids(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().filter_map(|k| k.kid.as_deref())
    }

    /// Find the signing key for `kid`
    pub fn find(&self, kid: Option<&str>) -> Result<&Jwk> {
        let Some(kid) = kid else {
            return Err(AuthError::KeyNotFound { kid: None });
        };

        self.keys
            .iter()
            .filter(|key| key.use_.as_deref().is_none_or(|u| u == "sig"))
            .find(|key| key.kid.as_deref() == Some(kid))
            .ok_or_else(|| AuthError::KeyNotFound {
                kid: Some(kid.to_string()),
            })
    }

    /// Find the signing key for `kid` and build its decoding key
    pub fn verification_key(&self, kid: Option<&str>) -> Result<VerificationKey> {
        self.find(kid)?.to_verification_key()
    }
}

impl Jwk {
    /// Convert this JWK into a decoding key based on its key type
    pub fn to_verification_key(&self) -> Result<VerificationKey> {
        let alg = self
            .alg
            .as_deref()
            .map(|a| {
                Algorithm::from_str(a)
                    .map_err(|_| AuthError::Upstream(format!("Unsupported key algorithm in JWKS: {a}")))
            })
            .transpose()?;

        let key = match self.kty.as_str() {
            "RSA" => {
                let n = self
                    .n
                    .as_deref()
                    .ok_or_else(|| AuthError::Upstream("JWKS key missing RSA modulus".to_string()))?;
                let e = self
                    .e
                    .as_deref()
                    .ok_or_else(|| AuthError::Upstream("JWKS key missing RSA exponent".to_string()))?;
                DecodingKey::from_rsa_components(n, e)
                    .map_err(|e| AuthError::Upstream(format!("Invalid RSA key components: {e}")))?
            }
            "oct" => {
                let k = self
                    .k
                    .as_deref()
                    .ok_or_else(|| AuthError::Upstream("JWKS key missing symmetric key".to_string()))?;
                let bytes = general_purpose::URL_SAFE_NO_PAD
                    .decode(k.trim_end_matches('='))
                    .map_err(|e| AuthError::Upstream(format!("Invalid base64 symmetric key: {e}")))?;
                DecodingKey::from_secret(&bytes)
            }
            other => {
                return Err(AuthError::Upstream(format!(
                    "Unsupported key type in JWKS: {other}"
                )));
            }
        };

        Ok(VerificationKey { key, alg })
    }
}
