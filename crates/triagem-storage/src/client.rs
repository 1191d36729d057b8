use aws_sdk_s3::Client;

/// Build an S3 client from the ambient AWS environment (env vars, profile,
/// instance metadata).
pub async fn build_client() -> Client {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .load()
        .await;
    Client::new(&config)
}

/// Build an S3 client from an already loaded SDK config.
pub fn client_from_config(config: &aws_config::SdkConfig) -> Client {
    Client::new(config)
}
