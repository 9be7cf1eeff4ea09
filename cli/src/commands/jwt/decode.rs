//! JWT token decoding and display

use anyhow::{Context, Result};
use base64::{Engine as _, engine::general_purpose};
use hotel_auth::StringOrList;
use jsonwebtoken::{Header, decode_header, get_current_timestamp};
use serde_json::{Map, Value};

use super::format_timestamp;

/// Header and unverified claims of a token
#[derive(Debug, Clone)]
pub struct DecodedToken {
    pub header: Header,
    pub claims: Map<String, Value>,
}

impl DecodedToken {
    fn timestamp(&self, claim: &str) -> Option<u64> {
        self.claims.get(claim).and_then(Value::as_u64)
    }

    /// Expiry status relative to now
    pub fn status(&self) -> String {
        let now = get_current_timestamp();

        if let Some(nbf) = self.timestamp("nbf")
            && now < nbf
        {
            return "NOT YET VALID (nbf not reached)".to_string();
        }

        let Some(exp) = self.timestamp("exp") else {
            return "INVALID (no exp claim)".to_string();
        };
        if exp <= now {
            return "EXPIRED".to_string();
        }

        let remaining = exp - now;
        let hours = remaining / 3600;
        let minutes = (remaining % 3600) / 60;
        if hours > 0 {
            format!(
                "VALID (expires in {} hour{} {} minute{})",
                hours,
                if hours == 1 { "" } else { "s" },
                minutes,
                if minutes == 1 { "" } else { "s" }
            )
        } else {
            format!(
                "VALID (expires in {} minute{})",
                minutes,
                if minutes == 1 { "" } else { "s" }
            )
        }
    }
}

/// Decode a JWT without verifying its signature
pub fn decode_token(token: &str) -> Result<DecodedToken> {
    let token = token.trim();
    let token = token
        .strip_prefix("Bearer ")
        .or_else(|| token.strip_prefix("bearer "))
        .unwrap_or(token);

    let header = decode_header(token).context("Failed to decode JWT header")?;

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        anyhow::bail!(
            "Invalid JWT format - expected 3 parts separated by dots, got {} parts",
            parts.len()
        );
    }

    let payload_bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .context("Failed to decode JWT payload")?;
    let claims: Map<String, Value> =
        serde_json::from_slice(&payload_bytes).context("Failed to parse JWT claims")?;

    Ok(DecodedToken { header, claims })
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(super) fn print(decoded: &DecodedToken) {
    println!("Header:");
    println!("  alg: {:?}", decoded.header.alg);
    println!(
        "  typ: {}",
        decoded.header.typ.as_deref().unwrap_or("JWT")
    );
    if let Some(kid) = &decoded.header.kid {
        println!("  kid: {}", kid);
    }
    println!();

    println!("Claims:");
    for (key, value) in &decoded.claims {
        match key.as_str() {
            "exp" | "iat" | "nbf" | "auth_time" => match value.as_u64() {
                Some(ts) => println!("  {}: {} ({})", key, ts, format_timestamp(ts)),
                None => println!("  {}: {}", key, display_value(value)),
            },
            "aud" => match serde_json::from_value::<StringOrList>(value.clone()) {
                Ok(aud) => println!("  aud: {}", aud.into_vec().join(", ")),
                Err(_) => println!("  aud: {}", display_value(value)),
            },
            _ => println!("  {}: {}", key, display_value(value)),
        }
    }

    println!();
    println!("Status: {}", decoded.status());
}
