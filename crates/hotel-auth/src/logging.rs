use tracing_subscriber::EnvFilter;

/// Initialize logging for a Lambda function.
///
/// Events are written to stdout as JSON lines without timestamps or ANSI
/// colors; CloudWatch records the time of each line. The level is taken from
/// `RUST_LOG`, falling back to `default_filter`, e.g.
/// `"hotel_auth=info,hotel_authorizer=info"`.
pub fn init_lambda(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A second init (tests, warm re-entry) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter)
        .with_current_span(false)
        .with_ansi(false)
        .without_time()
        .with_target(true)
        .try_init();
}
