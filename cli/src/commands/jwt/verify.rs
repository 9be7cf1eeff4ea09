//! Offline token verification with the authorizer's validator and rules

use anyhow::{Context, Result};
use hotel_auth::{
    AuthConfig, Authorizer, Claims, Decision, GroupRules, StaticSecretStore, ValidationConfig,
    extract_bearer_token, parse_rules,
};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct VerifyConfig {
    pub token: String,
    pub path: String,
    pub jwks_path: PathBuf,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub rules: Option<String>,
}

/// Verified claims and the rule decision for the requested path
#[derive(Debug, Clone)]
pub struct VerifyOutcome {
    pub path: String,
    pub claims: Claims,
    pub decision: Decision,
}

/// Verify `config.token` against the JWKS file and evaluate the rule table.
///
/// Token failures are returned as errors; a denied path is a successful
/// outcome carrying a deny decision.
pub async fn verify_token(config: &VerifyConfig) -> Result<VerifyOutcome> {
    let jwks = fs::read_to_string(&config.jwks_path)
        .with_context(|| format!("Failed to read JWKS from {}", config.jwks_path.display()))?;

    let rules = match &config.rules {
        Some(raw) => parse_rules(raw).context("Invalid --rules")?,
        None => GroupRules::default(),
    };
    let auth = AuthConfig {
        validation: ValidationConfig {
            expected_issuer: config.issuer.clone(),
            expected_audience: config.audience.clone(),
            ..ValidationConfig::default()
        },
        rules,
        ..AuthConfig::default()
    };

    let store = StaticSecretStore::new().with_secret(auth.key_set_secret_id.clone(), jwks);
    let authorizer = Authorizer::new(auth, store);

    let token = extract_bearer_token(&config.token).context("Token is empty")?;
    let (claims, decision) = authorizer
        .authorize_with_claims(token, &config.path)
        .await
        .context("Token verification failed")?;

    Ok(VerifyOutcome {
        path: config.path.clone(),
        claims,
        decision,
    })
}

pub(super) fn print(outcome: &VerifyOutcome) {
    println!("Token verified:");
    println!(
        "  sub:    {}",
        outcome.claims.subject.as_deref().unwrap_or("<none>")
    );
    println!(
        "  iss:    {}",
        outcome.claims.issuer.as_deref().unwrap_or("<none>")
    );
    println!("  aud:    {}", outcome.claims.audience.join(", "));
    match &outcome.claims.groups {
        Some(_) => println!("  groups: {}", outcome.claims.groups_joined()),
        None => println!("  groups: <no group claim>"),
    }
    println!();

    let rule = outcome
        .decision
        .matched_rule()
        .map(|r| format!("{} -> {}", r.pattern(), r.group()))
        .unwrap_or_else(|| "<none, path is unrestricted>".to_string());
    println!("Path:     {}", outcome.path);
    println!("Rule:     {}", rule);
    match outcome.decision.deny_reason() {
        None => println!("Decision: ALLOW"),
        Some(reason) => println!("Decision: DENY ({reason})"),
    }
}
