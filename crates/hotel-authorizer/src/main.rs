//! API Gateway custom authorizer for the hotel admin API
//!
//! Validates the caller's bearer token against the JWKS kept in Secrets
//! Manager and answers with an IAM policy for the requested method.

mod handler;

use anyhow::Context;
use handler::AuthorizerRequest;
use hotel_auth::{AuthConfig, Authorizer, SecretsManagerStore};
use lambda_runtime::{Error, LambdaEvent, service_fn};

#[tokio::main]
async fn main() -> Result<(), Error> {
    hotel_auth::logging::init_lambda("hotel_auth=info,hotel_authorizer=info");

    let config = AuthConfig::from_env().context("Invalid authorizer configuration")?;
    tracing::info!(
        secret_id = %config.key_set_secret_id,
        rules = config.rules.iter().count(),
        hardened = config.validation.is_hardened(),
        "Authorizer starting"
    );

    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = SecretsManagerStore::new(aws_sdk_secretsmanager::Client::new(&sdk_config));
    let authorizer = Authorizer::new(config, store);
    let authorizer = &authorizer;

    lambda_runtime::run(service_fn(
        move |event: LambdaEvent<AuthorizerRequest>| async move {
            handler::handle(authorizer, event.payload)
                .await
                .map_err(Error::from)
        },
    ))
    .await
}
