use anyhow::Context;
use hotel_admin::{AdminConfig, AdminService, DynamoRecordStore, S3ObjectStore};
use hotel_auth::SecretsManagerStore;
use lambda_http::{Error, Request, service_fn};

#[tokio::main]
async fn main() -> Result<(), Error> {
    hotel_auth::logging::init_lambda("hotel_auth=info,hotel_admin=info");

    let config = AdminConfig::from_env().context("Invalid add-hotel configuration")?;
    tracing::info!(
        bucket = %config.image_bucket,
        table = %config.table_name,
        admin_group = %config.admin_group,
        "Add-hotel handler starting"
    );

    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let service = AdminService::new(
        config.clone(),
        SecretsManagerStore::new(aws_sdk_secretsmanager::Client::new(&sdk_config)),
        S3ObjectStore::new(aws_sdk_s3::Client::new(&sdk_config)),
        DynamoRecordStore::new(aws_sdk_dynamodb::Client::new(&sdk_config), config.table_name),
    );
    let service = &service;

    lambda_http::run(service_fn(move |request: Request| async move {
        Ok::<_, Error>(service.handle(request).await)
    }))
    .await
}
