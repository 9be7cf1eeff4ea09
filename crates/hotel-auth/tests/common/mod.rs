//! Shared token and key set fixtures for hotel-auth integration tests

#![allow(dead_code)]

use hotel_auth::{AuthConfig, Authorizer, StaticSecretStore};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode, get_current_timestamp};
use serde_json::{Value, json};

pub const SECRET_ID: &str = "hotelCognitoKeys";
pub const KID: &str = "test-rsa-1";
pub const ISSUER: &str = "https://cognito-idp.eu-west-1.amazonaws.com/eu-west-1_TEST";
pub const AUDIENCE: &str = "hotel-admin-client";

const PRIVATE_KEY_PEM: &str = include_str!("../fixtures/rsa_private.pem");
const MODULUS: &str = include_str!("../fixtures/rsa_modulus.txt");

/// JWKS document holding the fixture RSA public key under `kid`
pub fn jwks_json(kid: &str) -> String {
    json!({
        "keys": [{
            "kty": "RSA",
            "kid": kid,
            "alg": "RS256",
            "use": "sig",
            "n": MODULUS.trim(),
            "e": "AQAB",
        }]
    })
    .to_string()
}

/// Claims of a freshly issued Cognito-style ID token
pub fn claims_with_group(group: Value) -> Value {
    json!({
        "sub": "0f5c8a1e-user",
        "iss": ISSUER,
        "aud": AUDIENCE,
        "token_use": "id",
        "iat": get_current_timestamp(),
        "exp": get_current_timestamp() + 3600,
        "cognito:group": group,
    })
}

/// Sign `claims` with the fixture RSA key
pub fn sign(kid: &str, claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY_PEM.as_bytes()).expect("fixture key parses");
    encode(&header, claims, &key).expect("token encodes")
}

/// Flip one character of the signature segment
pub fn tamper_signature(token: &str) -> String {
    let (rest, signature) = token.rsplit_once('.').expect("three-part token");
    let mut chars: Vec<char> = signature.chars().collect();
    chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
    format!("{rest}.{}", chars.into_iter().collect::<String>())
}

/// Authorizer backed by an in-memory secret holding `jwks`
pub fn authorizer_with(jwks: String, config: AuthConfig) -> Authorizer<StaticSecretStore> {
    let store = StaticSecretStore::new().with_secret(SECRET_ID, jwks);
    Authorizer::new(config, store)
}

pub fn default_authorizer() -> Authorizer<StaticSecretStore> {
    authorizer_with(jwks_json(KID), AuthConfig::default())
}
