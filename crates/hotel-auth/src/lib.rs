//! Bearer token validation and path-based group authorization
//!
//! Tokens are verified against a JSON Web Key Set read from a secret store,
//! then checked against an ordered table of `path pattern -> group` rules.
//!
//! ```no_run
//! # async fn run() -> hotel_auth::Result<()> {
//! use hotel_auth::{AuthConfig, Authorizer, StaticSecretStore};
//!
//! let store = StaticSecretStore::new().with_secret("hotelCognitoKeys", r#"{"keys": []}"#);
//! let authorizer = Authorizer::new(AuthConfig::default(), store);
//! let decision = authorizer.authorize("eyJ...", "/listadminhotels+/add").await?;
//! println!("allowed: {}", decision.is_allowed());
//! # Ok(())
//! # }
//! ```

mod authorizer;
mod bearer;
mod claims;
mod config;
mod error;
mod jwks;
mod jwt;
mod policy;
mod secrets;

pub mod logging;

pub use authorizer::Authorizer;
pub use bearer::{authorization_header, extract_bearer_token};
pub use claims::{Claims, StringOrList};
pub use config::{AuthConfig, ConfigKeys, ValidationConfig, parse_rules};
pub use error::{AuthError, Result};
pub use jwks::{Jwk, KeySet};
pub use jwt::{TokenPeek, TokenValidator, peek};
pub use policy::{Decision, DenyReason, GroupRule, GroupRules, require_group};
pub use secrets::{SecretStore, SecretsManagerStore, StaticSecretStore, fetch_key_set};
