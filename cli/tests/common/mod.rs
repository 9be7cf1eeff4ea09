//! Common test utilities and fixtures
//!
//! Shared key material and file helpers for hotel-cli tests.

#![allow(dead_code)]

use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const KID: &str = "cli-test-1";

/// Creates a temporary directory for test fixtures
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Write the fixture key's JWKS into `dir` and return its path
pub fn write_fixture_jwks(dir: &Path, kid: &str) -> PathBuf {
    let modulus = std::fs::read_to_string(fixture_path("rsa_modulus.txt"))
        .expect("fixture modulus");
    let jwks = json!({
        "keys": [{"kty": "RSA", "kid": kid, "alg": "RS256", "use": "sig", "n": modulus.trim(), "e": "AQAB"}]
    });
    let path = dir.join("jwks.json");
    std::fs::write(&path, jwks.to_string()).expect("write JWKS");
    path
}
