//! JWT testing utilities for local development
//!
//! Generates an RSA key pair together with the JWKS document the authorizer
//! reads from Secrets Manager, mints Cognito-style ID tokens carrying group
//! claims, and runs the real validator and group rules offline.

mod decode;
mod keygen;
mod mint;
mod verify;

pub use decode::{DecodedToken, decode_token};
pub use keygen::{KeyPairFiles, generate_keypair, jwks_document};
pub use mint::{MintTokenConfig, mint_token};
pub use verify::{VerifyConfig, VerifyOutcome, verify_token};

use anyhow::{Context, Result};
use chrono::DateTime;
use clap::Parser;
use std::path::PathBuf;

/// Key id written by `generate-keypair` and used by `mint` unless overridden
pub const DEFAULT_KID: &str = "hotel-local-1";

/// Issuer of minted tokens unless overridden
pub const DEFAULT_ISSUER: &str = "hotel-local-test";

/// Format timestamp as human-readable UTC string
pub(crate) fn format_timestamp(timestamp: u64) -> String {
    if let Some(datetime) = DateTime::from_timestamp(timestamp as i64, 0) {
        datetime.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    } else {
        "Invalid timestamp".to_string()
    }
}

/// Get the JWT test directory (~/.hotel-admin/jwt-test/)
pub fn default_key_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Failed to determine home directory")?;
    Ok(home.join(".hotel-admin").join("jwt-test"))
}

fn key_dir_or_default(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => default_key_dir(),
    }
}

#[derive(Parser)]
pub enum JwtCommand {
    /// Generate an RSA keypair and matching JWKS for local testing
    ///
    /// Writes private.pem, public.pem and jwks.json. The JWKS is the value to
    /// store in the key set secret (HOTEL_JWKS_SECRET_ID).
    ///
    /// ⚠️  WARNING: FOR LOCAL TESTING ONLY - DO NOT USE IN PRODUCTION
    GenerateKeypair {
        /// Directory for the key files (defaults to ~/.hotel-admin/jwt-test)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Key id published in the JWKS
        #[arg(long, default_value = DEFAULT_KID)]
        kid: String,

        /// Overwrite existing keypair if it exists
        #[arg(long)]
        force: bool,
    },

    /// Mint an ID token carrying group claims
    ///
    /// ⚠️  WARNING: FOR LOCAL TESTING ONLY - DO NOT USE IN PRODUCTION
    Mint {
        /// Group to put in the group claim (can be specified multiple times)
        #[arg(long)]
        group: Vec<String>,

        /// Claim that carries the groups
        #[arg(long, default_value = "cognito:groups")]
        group_claim: String,

        /// Subject claim (user identifier)
        #[arg(long, default_value = "test-user")]
        subject: String,

        /// Issuer claim
        #[arg(long, default_value = DEFAULT_ISSUER)]
        issuer: String,

        /// Audience claim (can be specified multiple times)
        #[arg(long, default_value = "hotel-admin-local")]
        audience: Vec<String>,

        /// Token expiration in seconds from now
        #[arg(long, default_value = "3600")]
        expires_in: u64,

        /// Custom claim in key=value format (can be specified multiple times)
        #[arg(long)]
        claim: Vec<String>,

        /// Key id placed in the token header
        #[arg(long, default_value = DEFAULT_KID)]
        kid: String,

        /// Path to private key (defaults to ~/.hotel-admin/jwt-test/private.pem)
        #[arg(long)]
        private_key: Option<PathBuf>,

        /// Print only the token
        #[arg(long, short)]
        quiet: bool,
    },

    /// Decode and display token contents without verifying the signature
    Decode {
        token: String,
    },

    /// Verify a token and evaluate the group rules for a path
    ///
    /// Uses the same validator and rule table as the deployed authorizer,
    /// with the JWKS read from a local file.
    Verify {
        token: String,

        /// Request path to authorize, e.g. /listadminhotels+/add
        #[arg(long, default_value = "/")]
        path: String,

        /// JWKS file (defaults to ~/.hotel-admin/jwt-test/jwks.json)
        #[arg(long)]
        jwks: Option<PathBuf>,

        /// Required issuer. Without it the token's own issuer is trusted.
        #[arg(long)]
        issuer: Option<String>,

        /// Required audience. Without it the token's own audience is trusted.
        #[arg(long)]
        audience: Option<String>,

        /// Rule table as pattern=group pairs separated by commas
        #[arg(long)]
        rules: Option<String>,
    },
}

pub async fn handle_jwt_command(command: JwtCommand) -> Result<()> {
    match command {
        JwtCommand::GenerateKeypair { dir, kid, force } => {
            println!("⚠️  WARNING: FOR LOCAL TESTING ONLY - DO NOT USE IN PRODUCTION\n");
            let dir = key_dir_or_default(dir)?;
            let files = generate_keypair(&dir, &kid, force)?;
            keygen::print_summary(&files, &kid);
            Ok(())
        }

        JwtCommand::Mint {
            group,
            group_claim,
            subject,
            issuer,
            audience,
            expires_in,
            claim,
            kid,
            private_key,
            quiet,
        } => {
            let private_key_path = match private_key {
                Some(path) => path,
                None => default_key_dir()?.join("private.pem"),
            };
            let config = MintTokenConfig {
                groups: group,
                group_claim,
                subject,
                issuer,
                audience,
                expires_in,
                claim_strings: claim,
                kid,
                private_key_path,
            };
            let token = mint_token(&config)?;
            if quiet {
                println!("{token}");
            } else {
                mint::print_summary(&config, &token);
            }
            Ok(())
        }

        JwtCommand::Decode { token } => {
            let decoded = decode_token(&token)?;
            decode::print(&decoded);
            Ok(())
        }

        JwtCommand::Verify {
            token,
            path,
            jwks,
            issuer,
            audience,
            rules,
        } => {
            let jwks_path = match jwks {
                Some(path) => path,
                None => default_key_dir()?.join("jwks.json"),
            };
            let outcome = verify_token(&VerifyConfig {
                token,
                path,
                jwks_path,
                issuer,
                audience,
                rules,
            })
            .await?;
            verify::print(&outcome);
            if !outcome.decision.is_allowed() {
                anyhow::bail!("Request denied");
            }
            Ok(())
        }
    }
}
