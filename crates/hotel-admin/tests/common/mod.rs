//! Request, token and service fixtures for add-hotel tests

#![allow(dead_code)]

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hotel_admin::{AdminConfig, AdminService, MemoryObjectStore, MemoryRecordStore};
use hotel_auth::{AuthConfig, StaticSecretStore};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode, get_current_timestamp};
use lambda_http::{Body, Request};
use serde_json::json;

pub const BUCKET: &str = "hotel-images-test";
pub const BOUNDARY: &str = "----hotel-form-boundary";
const SECRET: &[u8] = b"add-hotel-test-secret";
const KID: &str = "hmac-1";

pub type TestService = AdminService<StaticSecretStore, MemoryObjectStore, MemoryRecordStore>;

pub fn config() -> AdminConfig {
    AdminConfig {
        auth: AuthConfig::default(),
        image_bucket: BUCKET.to_string(),
        table_name: "Hotels".to_string(),
        admin_group: "Admin".to_string(),
    }
}

fn secrets() -> StaticSecretStore {
    let jwks = json!({
        "keys": [{"kty": "oct", "kid": KID, "alg": "HS256", "use": "sig", "k": URL_SAFE_NO_PAD.encode(SECRET)}]
    });
    StaticSecretStore::new().with_secret("hotelCognitoKeys", jwks.to_string())
}

pub fn service() -> TestService {
    service_with_objects(MemoryObjectStore::new())
}

pub fn service_with_objects(objects: MemoryObjectStore) -> TestService {
    AdminService::new(config(), secrets(), objects, MemoryRecordStore::new())
}

pub fn service_with_records(records: MemoryRecordStore) -> TestService {
    AdminService::new(config(), secrets(), MemoryObjectStore::new(), records)
}

/// HS256 ID token for `sub` with `cognito:group = group`
pub fn token(group: &str) -> String {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(KID.to_string());
    let claims = json!({
        "sub": "admin-sub-1",
        "iss": "https://cognito-idp.eu-west-1.amazonaws.com/eu-west-1_TEST",
        "aud": "hotel-admin-client",
        "exp": get_current_timestamp() + 600,
        "cognito:group": group,
    });
    encode(&header, &claims, &EncodingKey::from_secret(SECRET)).expect("token encodes")
}

/// Text fields of a complete form, plus an optional `idToken`
pub fn fields(id_token: Option<&str>) -> Vec<(String, String)> {
    let mut fields: Vec<(String, String)> = [
        ("hotelName", "Harbour View"),
        ("hotelRating", "4"),
        ("hotelCity", "Lisbon"),
        ("hotelPrice", "180"),
        ("userId", "user-42"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    if let Some(token) = id_token {
        fields.push(("idToken".to_string(), token.to_string()));
    }
    fields
}

/// Multipart body with `fields` and, when given, one PNG file part
pub fn multipart(fields: &[(String, String)], file_name: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file_name) = file_name {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a]);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn post(body: Vec<u8>, authorization: Option<&str>) -> Request {
    let mut builder = lambda_http::http::Request::builder()
        .method("POST")
        .uri("/listadminhotels+/add")
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"));
    if let Some(value) = authorization {
        builder = builder.header("Authorization", value);
    }
    builder.body(Body::Binary(body)).expect("request builds")
}

/// Decoded JSON body of a response
pub fn json_body(response: &lambda_http::Response<Body>) -> serde_json::Value {
    match response.body() {
        Body::Text(text) => serde_json::from_str(text).expect("JSON body"),
        Body::Binary(bytes) => serde_json::from_slice(bytes).expect("JSON body"),
        Body::Empty => serde_json::Value::Null,
    }
}
