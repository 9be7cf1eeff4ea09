//! Add-hotel configuration

use crate::error::{AdminError, Result};
use hotel_auth::AuthConfig;

/// Environment variables read by [`AdminConfig::from_env`], in addition to
/// [`hotel_auth::ConfigKeys`]
pub struct AdminConfigKeys;

impl AdminConfigKeys {
    pub const IMAGE_BUCKET: &'static str = "HOTEL_IMAGE_BUCKET";
    pub const TABLE_NAME: &'static str = "HOTEL_TABLE_NAME";
    pub const ADMIN_GROUP: &'static str = "HOTEL_ADMIN_GROUP";
}

pub const DEFAULT_TABLE_NAME: &str = "Hotels";
pub const DEFAULT_ADMIN_GROUP: &str = "Admin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    pub auth: AuthConfig,
    pub image_bucket: String,
    pub table_name: String,
    /// Group a caller must belong to before hotels are written
    pub admin_group: String,
}

impl AdminConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let auth = AuthConfig::from_lookup(&lookup)?;
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let image_bucket = get(AdminConfigKeys::IMAGE_BUCKET).ok_or_else(|| {
            AdminError::Configuration(format!("{} must be set", AdminConfigKeys::IMAGE_BUCKET))
        })?;

        Ok(Self {
            auth,
            image_bucket,
            table_name: get(AdminConfigKeys::TABLE_NAME)
                .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            admin_group: get(AdminConfigKeys::ADMIN_GROUP)
                .unwrap_or_else(|| DEFAULT_ADMIN_GROUP.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AdminConfig::from_lookup(lookup(&[("HOTEL_IMAGE_BUCKET", "hotel-images")])).unwrap();
        assert_eq!(config.image_bucket, "hotel-images");
        assert_eq!(config.table_name, "Hotels");
        assert_eq!(config.admin_group, "Admin");
        assert_eq!(config.auth, AuthConfig::default());
    }

    #[test]
    fn test_bucket_is_required() {
        let err = AdminConfig::from_lookup(lookup(&[("HOTEL_IMAGE_BUCKET", "  ")])).unwrap_err();
        assert!(matches!(err, AdminError::Configuration(msg) if msg.contains("HOTEL_IMAGE_BUCKET")));
    }

    #[test]
    fn test_overrides_and_auth_errors() {
        let config = AdminConfig::from_lookup(lookup(&[
            ("HOTEL_IMAGE_BUCKET", "b"),
            ("HOTEL_TABLE_NAME", "HotelsStaging"),
            ("HOTEL_ADMIN_GROUP", "Admins"),
            ("HOTEL_EXPECTED_ISSUER", "https://issuer.example"),
        ]))
        .unwrap();
        assert_eq!(config.table_name, "HotelsStaging");
        assert_eq!(config.admin_group, "Admins");
        assert_eq!(
            config.auth.validation.expected_issuer.as_deref(),
            Some("https://issuer.example")
        );

        let err = AdminConfig::from_lookup(lookup(&[
            ("HOTEL_IMAGE_BUCKET", "b"),
            ("HOTEL_JWT_LEEWAY_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AdminError::Configuration(_)));
    }
}
