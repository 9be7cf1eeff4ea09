//! JWT token minting for testing

use anyhow::{Context, Result};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode, get_current_timestamp};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use super::format_timestamp;

/// JWT signing algorithm (RS256 for RSA-2048 keys)
const JWT_ALGORITHM: Algorithm = Algorithm::RS256;

/// ID token claims, shaped like the identity provider's
#[derive(Debug, Serialize)]
struct Claims {
    sub: String,
    iss: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    aud: Vec<String>,
    token_use: &'static str,
    exp: u64,
    iat: u64,
    /// Group claim and custom claims
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

/// Parse custom claims from key=value strings
fn parse_custom_claims(claim_strings: &[String]) -> Result<BTreeMap<String, Value>> {
    let mut claims = BTreeMap::new();

    for claim_str in claim_strings {
        let Some((key, value)) = claim_str.split_once('=') else {
            anyhow::bail!(
                "Invalid claim format '{}'.\nExpected format: key=value",
                claim_str
            );
        };

        // Try to parse as JSON value (number, boolean, string, etc.)
        let json_value = if let Ok(num) = value.parse::<i64>() {
            Value::Number(num.into())
        } else if let Ok(b) = value.parse::<bool>() {
            Value::Bool(b)
        } else {
            Value::String(value.to_string())
        };

        claims.insert(key.to_string(), json_value);
    }

    Ok(claims)
}

/// One group is written as a string, several as a list
fn group_value(groups: &[String]) -> Option<Value> {
    match groups {
        [] => None,
        [single] => Some(Value::String(single.clone())),
        many => Some(Value::Array(many.iter().cloned().map(Value::String).collect())),
    }
}

/// Configuration for minting a test JWT token
#[derive(Debug, Clone)]
pub struct MintTokenConfig {
    pub groups: Vec<String>,
    pub group_claim: String,
    pub subject: String,
    pub issuer: String,
    pub audience: Vec<String>,
    pub expires_in: u64,
    pub claim_strings: Vec<String>,
    pub kid: String,
    pub private_key_path: PathBuf,
}

/// Mint a test JWT token signed with the configured private key
pub fn mint_token(config: &MintTokenConfig) -> Result<String> {
    let now = get_current_timestamp();

    let mut extra = parse_custom_claims(&config.claim_strings)?;
    if let Some(groups) = group_value(&config.groups) {
        extra.insert(config.group_claim.clone(), groups);
    }

    let claims = Claims {
        sub: config.subject.clone(),
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
        token_use: "id",
        exp: now + config.expires_in,
        iat: now,
        extra,
    };

    let key_path = &config.private_key_path;
    if !key_path.exists() {
        anyhow::bail!(
            "Private key not found at {}.\nRun 'hotel-cli jwt generate-keypair' first.",
            key_path.display()
        );
    }

    let private_key_pem = fs::read_to_string(key_path)
        .with_context(|| format!("Failed to read private key from {}", key_path.display()))?;
    let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
        .context("Failed to parse private key")?;

    let mut header = Header::new(JWT_ALGORITHM);
    header.kid = Some(config.kid.clone());

    encode(&header, &claims, &encoding_key).context("Failed to encode JWT")
}

pub(super) fn print_summary(config: &MintTokenConfig, token: &str) {
    let now = get_current_timestamp();
    let exp = now + config.expires_in;

    println!("⚠️  WARNING: FOR LOCAL TESTING ONLY - DO NOT USE IN PRODUCTION\n");
    println!("Test ID token:");
    println!("  {}\n", token);

    println!("Claims:");
    println!("  sub: {}", config.subject);
    println!("  iss: {}", config.issuer);
    if !config.audience.is_empty() {
        println!("  aud: {}", config.audience.join(", "));
    }
    println!("  exp: {} ({})", exp, format_timestamp(exp));
    if config.groups.is_empty() {
        println!("  (no group claim)");
    } else {
        println!("  {}: {}", config.group_claim, config.groups.join(", "));
    }
    println!("  kid: {}", config.kid);

    println!("\nExport for use:");
    println!("  export HOTEL_TOKEN=\"{}\"", token);
}
