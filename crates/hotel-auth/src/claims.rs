//! Validated token claims

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Claims extracted from a verified token
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Claims {
    /// Subject (`sub`), the principal identity
    pub subject: Option<String>,

    /// Issuer (`iss`)
    pub issuer: Option<String>,

    /// Audiences (`aud`), normalized to a list
    pub audience: Vec<String>,

    /// Expiration time (`exp`), seconds since epoch
    pub expires_at: Option<i64>,

    /// Issued at (`iat`)
    pub issued_at: Option<i64>,

    /// Group membership, normalized to a set. `None` when the token carries
    /// no group claim; an empty set when the claim is present but empty.
    pub groups: Option<BTreeSet<String>>,

    /// Every claim in the token, as received
    pub raw: serde_json::Map<String, serde_json::Value>,
}

impl Claims {
    /// Build claims from a decoded payload, reading groups from the first
    /// claim in `group_claims` that holds a string or a list of strings.
    pub fn from_payload(
        raw: serde_json::Map<String, serde_json::Value>,
        group_claims: &[String],
    ) -> Self {
        let str_claim = |key: &str| raw.get(key).and_then(|v| v.as_str()).map(String::from);
        let int_claim = |key: &str| raw.get(key).and_then(serde_json::Value::as_i64);

        let audience = raw
            .get("aud")
            .cloned()
            .and_then(|v| serde_json::from_value::<StringOrList>(v).ok())
            .map(StringOrList::into_vec)
            .unwrap_or_default();

        let groups = group_claims
            .iter()
            .filter_map(|name| raw.get(name))
            .find_map(|v| serde_json::from_value::<StringOrList>(v.clone()).ok())
            .map(|v| v.into_vec().into_iter().collect());

        Self {
            subject: str_claim("sub"),
            issuer: str_claim("iss"),
            audience,
            expires_at: int_claim("exp"),
            issued_at: int_claim("iat"),
            groups,
            raw,
        }
    }

    /// Groups joined with commas, for response contexts and logs
    pub fn groups_joined(&self) -> String {
        self.groups
            .as_ref()
            .map(|g| g.iter().cloned().collect::<Vec<_>>().join(","))
            .unwrap_or_default()
    }
}

/// A claim that identity providers emit either as a string or as a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    Single(String),
    Multiple(Vec<String>),
}

impl StringOrList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Single(s) => vec![s],
            Self::Multiple(v) => v,
        }
    }

    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(s) => Some(s),
            Self::Multiple(v) => v.first().map(String::as_str),
        }
    }
}
