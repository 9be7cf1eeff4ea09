use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for hotel-cli
///
/// Logs go to stderr so command output on stdout stays pipeable, e.g.
/// `export TOKEN=$(hotel-cli jwt mint --group Admin --quiet)`.
///
/// The level can be controlled via the RUST_LOG environment variable:
/// - RUST_LOG=debug hotel-cli jwt verify ...  (key lookups, claims)
/// - RUST_LOG=info hotel-cli jwt verify ...   (default level)
pub fn init() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hotel_cli=info,hotel_auth=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_target(false)
                .compact(),
        )
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}
