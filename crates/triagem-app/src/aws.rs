use std::sync::Arc;

use aws_sdk_s3::config::Credentials;
use triagem_storage::PatientRepository;
use triagem_storage::s3::S3PatientRepository;

use crate::config::{CredentialSource, TriagemConfig};

/// Build an `SdkConfig` from a region and credential source.
pub async fn build_aws_config(region: &str, creds: &CredentialSource) -> aws_config::SdkConfig {
    let mut builder = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()));

    match creds {
        CredentialSource::Inline {
            access_key_id,
            secret_access_key,
            session_token,
        } => {
            builder = builder.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                session_token.clone(),
                None,
                "triagem-config",
            ));
        }
        CredentialSource::Profile { profile_name } => {
            builder = builder.profile_name(profile_name);
        }
        CredentialSource::DefaultChain => {}
    }

    builder.load().await
}

/// S3-backed repository for the collection named in `config`.
pub async fn build_repository(config: &TriagemConfig) -> Arc<dyn PatientRepository> {
    let sdk_config = build_aws_config(&config.region, &config.credentials).await;
    let client = triagem_storage::client::client_from_config(&sdk_config);
    tracing::debug!(
        region = %config.region,
        bucket = %config.bucket,
        collection = %config.collection,
        "using S3 patient store"
    );
    Arc::new(
        S3PatientRepository::new(client, config.bucket.clone())
            .with_collection(config.collection.clone())
            .with_poll_interval(config.poll_interval()),
    )
}
