//! End-to-end authorization: key set fetch, token validation, group rules

mod common;

use common::*;
use hotel_auth::{
    AuthConfig, AuthError, DenyReason, KeySet, StaticSecretStore, TokenValidator, ValidationConfig,
    fetch_key_set,
};
use serde_json::json;

#[tokio::test]
async fn test_admin_group_is_allowed_on_list_admin_hotels() {
    let token = sign(KID, &claims_with_group(json!("Admin")));
    let decision = default_authorizer()
        .authorize(&token, "/listadminhotels+/add")
        .await
        .unwrap();

    assert!(decision.is_allowed());
    assert_eq!(decision.principal_id(), Some("0f5c8a1e-user"));
    assert_eq!(
        decision.matched_rule().map(|r| (r.pattern(), r.group())),
        Some(("listadminhotels+", "Admin"))
    );
}

#[tokio::test]
async fn test_group_comparison_ignores_case() {
    let token = sign(KID, &claims_with_group(json!("aDmIn")));
    let decision = default_authorizer()
        .authorize(&token, "/ListAdminHotels+/add")
        .await
        .unwrap();
    assert!(decision.is_allowed());
}

#[tokio::test]
async fn test_member_group_is_denied_on_list_admin_hotels() {
    let token = sign(KID, &claims_with_group(json!("Member")));
    let decision = default_authorizer()
        .authorize(&token, "/listadminhotels+/add")
        .await
        .unwrap();

    assert!(!decision.is_allowed());
    assert_eq!(
        decision.deny_reason(),
        Some(&DenyReason::GroupMismatch {
            required: "Admin".into(),
            presented: vec!["Member".into()],
        })
    );
    assert_eq!(decision.into_result().unwrap_err().status_code(), 403);
}

#[tokio::test]
async fn test_group_list_claim_is_supported() {
    let mut claims = claims_with_group(json!(null));
    claims.as_object_mut().unwrap().remove("cognito:group");
    claims["cognito:groups"] = json!(["Member", "Admins"]);
    let token = sign(KID, &claims);

    let decision = default_authorizer()
        .authorize(&token, "/admin+/hotels")
        .await
        .unwrap();
    assert!(decision.is_allowed());
}

#[tokio::test]
async fn test_unrestricted_path_is_allowed_without_groups() {
    let mut claims = claims_with_group(json!(null));
    claims.as_object_mut().unwrap().remove("cognito:group");
    let token = sign(KID, &claims);

    let decision = default_authorizer()
        .authorize(&token, "/hotels/search")
        .await
        .unwrap();
    assert!(decision.is_allowed());
    assert!(decision.matched_rule().is_none());
}

#[tokio::test]
async fn test_missing_group_claim_is_denied_on_restricted_path() {
    let mut claims = claims_with_group(json!(null));
    claims.as_object_mut().unwrap().remove("cognito:group");
    let token = sign(KID, &claims);

    let decision = default_authorizer()
        .authorize(&token, "/admin+/hotels")
        .await
        .unwrap();
    assert!(matches!(
        decision.deny_reason(),
        Some(DenyReason::MissingGroupClaim { .. })
    ));
}

#[tokio::test]
async fn test_unknown_kid_is_key_not_found() {
    let token = sign("rotated-away", &claims_with_group(json!("Admin")));
    let err = default_authorizer()
        .authorize(&token, "/listadminhotels+/add")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        AuthError::KeyNotFound {
            kid: Some("rotated-away".into())
        }
    );
    assert_eq!(err.status_code(), 401);
}

#[tokio::test]
async fn test_tampered_signature_is_invalid_token() {
    let token = tamper_signature(&sign(KID, &claims_with_group(json!("Admin"))));
    let err = default_authorizer()
        .authorize(&token, "/listadminhotels+/add")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken(_)), "got {err:?}");
}

#[tokio::test]
async fn test_tampered_claims_are_invalid_token() {
    let token = sign(KID, &claims_with_group(json!("Member")));
    let parts: Vec<&str> = token.split('.').collect();
    let forged_payload = {
        use base64::Engine as _;
        let claims = claims_with_group(json!("Admin"));
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(claims.to_string())
    };
    let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

    let err = default_authorizer()
        .authorize(&forged, "/listadminhotels+/add")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken(_)));
}

#[tokio::test]
async fn test_hardened_issuer_and_audience() {
    let config = AuthConfig {
        validation: ValidationConfig {
            expected_issuer: Some(ISSUER.into()),
            expected_audience: Some(AUDIENCE.into()),
            ..ValidationConfig::default()
        },
        ..AuthConfig::default()
    };
    let authorizer = authorizer_with(jwks_json(KID), config);

    let good = sign(KID, &claims_with_group(json!("Admin")));
    assert!(authorizer.verify(&good).await.is_ok());

    let mut claims = claims_with_group(json!("Admin"));
    claims["iss"] = json!("https://attacker.example");
    let bad = sign(KID, &claims);
    assert_eq!(
        authorizer.verify(&bad).await.unwrap_err(),
        AuthError::InvalidToken("issuer mismatch".into())
    );
}

#[tokio::test]
async fn test_malformed_token_fails_before_key_set_fetch() {
    // No secret stored: a fetch would be an upstream failure
    let authorizer = hotel_auth::Authorizer::new(AuthConfig::default(), StaticSecretStore::new());
    let err = authorizer.authorize("garbage", "/admin+/x").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken(_)));
}

#[tokio::test]
async fn test_missing_secret_is_upstream_failure() {
    let authorizer = hotel_auth::Authorizer::new(AuthConfig::default(), StaticSecretStore::new());
    let token = sign(KID, &claims_with_group(json!("Admin")));
    let err = authorizer.authorize(&token, "/admin+/x").await.unwrap_err();
    assert!(matches!(err, AuthError::Upstream(_)));
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn test_validator_accepts_fetched_key_set() {
    let store = StaticSecretStore::new().with_secret(SECRET_ID, jwks_json(KID));
    let key_set: KeySet = fetch_key_set(&store, SECRET_ID).await.unwrap();
    let token = sign(KID, &claims_with_group(json!(["Admin"])));

    let claims = TokenValidator::default().validate(&token, &key_set).unwrap();
    assert_eq!(claims.issuer.as_deref(), Some(ISSUER));
    assert_eq!(claims.groups_joined(), "Admin");
    assert_eq!(claims.raw["token_use"], json!("id"));
}
