//! Authorizer configuration
//!
//! Built once per cold start from the process environment and handed to
//! [`crate::Authorizer`] and [`crate::TokenValidator`]. Values are read through
//! a lookup function so tests can supply their own environment.

use crate::error::{AuthError, Result};
use crate::policy::{GroupRule, GroupRules};

/// Environment variables read by [`AuthConfig::from_env`]
pub struct ConfigKeys;

impl ConfigKeys {
    pub const JWKS_SECRET_ID: &'static str = "HOTEL_JWKS_SECRET_ID";
    pub const EXPECTED_ISSUER: &'static str = "HOTEL_EXPECTED_ISSUER";
    pub const EXPECTED_AUDIENCE: &'static str = "HOTEL_EXPECTED_AUDIENCE";
    pub const LEEWAY_SECS: &'static str = "HOTEL_JWT_LEEWAY_SECS";
    pub const GROUP_CLAIMS: &'static str = "HOTEL_GROUP_CLAIMS";
    pub const GROUP_RULES: &'static str = "HOTEL_GROUP_RULES";
}

pub const DEFAULT_JWKS_SECRET_ID: &str = "hotelCognitoKeys";
pub const DEFAULT_LEEWAY_SECS: u64 = 60;
pub const DEFAULT_GROUP_CLAIMS: [&str; 2] = ["cognito:groups", "cognito:group"];

/// Token validation settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Required issuer. When unset the token's own `iss` is used.
    pub expected_issuer: Option<String>,

    /// Required audience. When unset the token's own `aud` is used.
    pub expected_audience: Option<String>,

    /// Clock skew tolerance for `exp` / `nbf`
    pub leeway_secs: u64,

    /// Claim names searched, in order, for group membership
    pub group_claims: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            expected_issuer: None,
            expected_audience: None,
            leeway_secs: DEFAULT_LEEWAY_SECS,
            group_claims: DEFAULT_GROUP_CLAIMS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ValidationConfig {
    /// Issuer and audience are both pinned by configuration
    pub fn is_hardened(&self) -> bool {
        self.expected_issuer.is_some() && self.expected_audience.is_some()
    }
}

/// Full authorizer configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Secrets Manager id holding the JWKS document
    pub key_set_secret_id: String,
    pub validation: ValidationConfig,
    pub rules: GroupRules,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            key_set_secret_id: DEFAULT_JWKS_SECRET_ID.to_string(),
            validation: ValidationConfig::default(),
            rules: GroupRules::default(),
        }
    }
}

impl AuthConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` to resolve variables
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let key_set_secret_id =
            get(ConfigKeys::JWKS_SECRET_ID).unwrap_or_else(|| DEFAULT_JWKS_SECRET_ID.to_string());

        let leeway_secs = match get(ConfigKeys::LEEWAY_SECS) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AuthError::Configuration(format!(
                    "{} must be a whole number of seconds, got '{raw}'",
                    ConfigKeys::LEEWAY_SECS
                ))
            })?,
            None => DEFAULT_LEEWAY_SECS,
        };

        let group_claims = match get(ConfigKeys::GROUP_CLAIMS) {
            Some(raw) => split_list(&raw),
            None => DEFAULT_GROUP_CLAIMS.iter().map(|s| s.to_string()).collect(),
        };
        if group_claims.is_empty() {
            return Err(AuthError::Configuration(format!(
                "{} must name at least one claim",
                ConfigKeys::GROUP_CLAIMS
            )));
        }

        let rules = match get(ConfigKeys::GROUP_RULES) {
            Some(raw) => parse_rules(&raw)?,
            None => GroupRules::default(),
        };

        Ok(Self {
            key_set_secret_id,
            validation: ValidationConfig {
                expected_issuer: get(ConfigKeys::EXPECTED_ISSUER),
                expected_audience: get(ConfigKeys::EXPECTED_AUDIENCE),
                leeway_secs,
                group_claims,
            },
            rules,
        })
    }
}

/// Parse `pattern=group` pairs separated by commas, keeping their order
pub fn parse_rules(raw: &str) -> Result<GroupRules> {
    let mut rules = Vec::new();
    for entry in split_list(raw) {
        let Some((pattern, group)) = entry.split_once('=') else {
            return Err(AuthError::Configuration(format!(
                "Invalid group rule '{entry}'. Expected format: pattern=group"
            )));
        };
        let (pattern, group) = (pattern.trim(), group.trim());
        if pattern.is_empty() || group.is_empty() {
            return Err(AuthError::Configuration(format!(
                "Invalid group rule '{entry}'. Pattern and group must be non-empty"
            )));
        }
        rules.push(GroupRule::new(pattern, group));
    }
    Ok(GroupRules::new(rules))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = AuthConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(config, AuthConfig::default());
        assert_eq!(config.key_set_secret_id, "hotelCognitoKeys");
        assert_eq!(config.validation.leeway_secs, 60);
        assert_eq!(
            config.validation.group_claims,
            vec!["cognito:groups", "cognito:group"]
        );
        assert!(!config.validation.is_hardened());
    }

    #[test]
    fn test_reads_all_values() {
        let config = AuthConfig::from_lookup(env(&[
            (ConfigKeys::JWKS_SECRET_ID, "otherKeys"),
            (ConfigKeys::EXPECTED_ISSUER, "https://issuer.example"),
            (ConfigKeys::EXPECTED_AUDIENCE, "client-123"),
            (ConfigKeys::LEEWAY_SECS, "5"),
            (ConfigKeys::GROUP_CLAIMS, "groups, roles"),
            (ConfigKeys::GROUP_RULES, "reports=Auditors, admin+=Admins"),
        ]))
        .unwrap();

        assert_eq!(config.key_set_secret_id, "otherKeys");
        assert_eq!(
            config.validation.expected_issuer.as_deref(),
            Some("https://issuer.example")
        );
        assert_eq!(config.validation.expected_audience.as_deref(), Some("client-123"));
        assert!(config.validation.is_hardened());
        assert_eq!(config.validation.leeway_secs, 5);
        assert_eq!(config.validation.group_claims, vec!["groups", "roles"]);

        let rules: Vec<_> = config.rules.iter().collect();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].pattern(), "reports");
        assert_eq!(rules[0].group(), "Auditors");
        assert_eq!(rules[1].pattern(), "admin+");
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = AuthConfig::from_lookup(env(&[
            (ConfigKeys::JWKS_SECRET_ID, "  "),
            (ConfigKeys::EXPECTED_ISSUER, ""),
        ]))
        .unwrap();
        assert_eq!(config.key_set_secret_id, DEFAULT_JWKS_SECRET_ID);
        assert!(config.validation.expected_issuer.is_none());
    }

    #[test]
    fn test_invalid_leeway_is_rejected() {
        let err = AuthConfig::from_lookup(env(&[(ConfigKeys::LEEWAY_SECS, "soon")])).unwrap_err();
        assert!(matches!(err, AuthError::Configuration(_)));
    }

    #[test]
    fn test_invalid_rules_are_rejected() {
        assert!(parse_rules("admin+").is_err());
        assert!(parse_rules("=Admins").is_err());
        assert!(parse_rules("admin+=").is_err());
    }

    #[test]
    fn test_group_claims_must_not_be_empty() {
        let err = AuthConfig::from_lookup(env(&[(ConfigKeys::GROUP_CLAIMS, " , ")])).unwrap_err();
        assert!(matches!(err, AuthError::Configuration(_)));
    }
}
