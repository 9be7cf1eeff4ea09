//! RSA keypair and JWKS generation for JWT testing

use anyhow::{Context, Result};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

/// RSA key size for test keypairs (2048-bit minimum for JWT RS256)
const RSA_KEY_BITS: usize = 2048;

/// Files written by [`generate_keypair`]
#[derive(Debug, Clone)]
pub struct KeyPairFiles {
    pub private_key: PathBuf,
    pub public_key: PathBuf,
    pub jwks: PathBuf,
}

/// JWKS document publishing `public_key` under `kid`
pub fn jwks_document(public_key: &RsaPublicKey, kid: &str) -> Value {
    json!({
        "keys": [{
            "kty": "RSA",
            "kid": kid,
            "alg": "RS256",
            "use": "sig",
            "n": URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be()),
            "e": URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be()),
        }]
    })
}

/// Generate an RSA keypair and its JWKS in `dir`
pub fn generate_keypair(dir: &Path, kid: &str, force: bool) -> Result<KeyPairFiles> {
    let files = KeyPairFiles {
        private_key: dir.join("private.pem"),
        public_key: dir.join("public.pem"),
        jwks: dir.join("jwks.json"),
    };

    // Check if keys already exist
    if (files.private_key.exists() || files.public_key.exists() || files.jwks.exists()) && !force {
        anyhow::bail!(
            "Keypair already exists in {}.\nUse --force to overwrite.",
            dir.display()
        );
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    tracing::info!(bits = RSA_KEY_BITS, kid, "Generating RSA keypair");
    let mut rng = rand::thread_rng();
    let private_key =
        RsaPrivateKey::new(&mut rng, RSA_KEY_BITS).context("Failed to generate private key")?;
    let public_key = RsaPublicKey::from(&private_key);

    let private_pem = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .context("Failed to encode private key to PEM")?;
    let public_pem = public_key
        .to_public_key_pem(LineEnding::LF)
        .context("Failed to encode public key to PEM")?;
    let jwks = serde_json::to_string_pretty(&jwks_document(&public_key, kid))
        .context("Failed to encode JWKS")?;

    fs::write(&files.private_key, private_pem.as_bytes()).with_context(|| {
        format!(
            "Failed to write private key to {}",
            files.private_key.display()
        )
    })?;
    fs::write(&files.public_key, public_pem.as_bytes()).with_context(|| {
        format!("Failed to write public key to {}", files.public_key.display())
    })?;
    fs::write(&files.jwks, jwks)
        .with_context(|| format!("Failed to write JWKS to {}", files.jwks.display()))?;

    // Set restrictive permissions on private key (Unix only)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&files.private_key)?.permissions();
        perms.set_mode(0o600); // rw-------
        fs::set_permissions(&files.private_key, perms)?;
    }

    Ok(files)
}

pub(super) fn print_summary(files: &KeyPairFiles, kid: &str) {
    println!("Generated RSA-2048 keypair (kid {kid}):");
    println!("  Private key: {}", files.private_key.display());
    println!("  Public key:  {}", files.public_key.display());
    println!("  JWKS:        {}", files.jwks.display());
    println!();
    println!("To use with a deployed authorizer, store the JWKS as the key set secret:");
    println!(
        "  aws secretsmanager put-secret-value --secret-id hotelCognitoKeys --secret-string file://{}",
        files.jwks.display()
    );

    #[cfg(not(unix))]
    {
        println!();
        println!("⚠️  WARNING: Cannot set restrictive permissions on this platform.");
        println!("   Ensure private key is stored securely.");
    }
}
