use triagem_app::config::{self, CredentialSource, TriagemConfig};

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let mut config = TriagemConfig::new(
        "sa-east-1",
        "hospital-fila",
        CredentialSource::Profile {
            profile_name: "triagem".to_string(),
        },
    );
    config.poll_interval_ms = 500;

    assert!(!config::has_config(&path));
    config::save_config(&path, &config).unwrap();
    assert!(config::has_config(&path));

    let loaded = config::load_config(&path).unwrap();
    assert_eq!(loaded.region, "sa-east-1");
    assert_eq!(loaded.bucket, "hospital-fila");
    assert_eq!(loaded.collection, "pacientes");
    assert_eq!(loaded.poll_interval().as_millis(), 500);
    assert_eq!(loaded.credentials, config.credentials);
    assert_eq!(loaded.created_at, config.created_at);
    assert!(!path.with_extension("json.tmp").exists());
}

#[cfg(unix)]
#[test]
fn saved_config_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let config = TriagemConfig::new("us-east-1", "b", CredentialSource::DefaultChain);
    config::save_config(&path, &config).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn unversioned_config_is_migrated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{
            "region": "us-east-1",
            "bucket": "legacy",
            "created_at": "2025-03-01T12:00:00Z",
            "credentials": { "type": "default_chain" }
        }"#,
    )
    .unwrap();

    let loaded = config::load_config(&path).unwrap();
    assert_eq!(loaded.config_version, 1);
    assert_eq!(loaded.collection, "pacientes");
    assert_eq!(loaded.poll_interval_ms, 2_000);
    assert_eq!(loaded.credentials, CredentialSource::DefaultChain);
}

#[test]
fn newer_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{
            "config_version": 99,
            "region": "us-east-1",
            "bucket": "future",
            "created_at": "2025-03-01T12:00:00Z",
            "credentials": { "type": "default_chain" }
        }"#,
    )
    .unwrap();

    let err = config::load_config(&path).unwrap_err();
    assert!(err.to_string().contains("newer than this build supports"));
}

#[test]
fn missing_config_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let err = config::load_config(&path).unwrap_err();
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn delete_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let config = TriagemConfig::new("us-east-1", "b", CredentialSource::DefaultChain);
    config::save_config(&path, &config).unwrap();

    config::delete_config(&path).unwrap();
    assert!(!path.exists());
    config::delete_config(&path).unwrap();
}

#[test]
fn info_redacts_inline_keys() {
    let config = TriagemConfig::new(
        "us-east-1",
        "b",
        CredentialSource::Inline {
            access_key_id: "AKIAABCDEFGHWXYZ".to_string(),
            secret_access_key: "secret".to_string(),
            session_token: None,
        },
    );

    let info = config::config_info(&config);
    assert_eq!(info.credential_type, "inline");
    assert_eq!(info.access_key_hint.as_deref(), Some("AKIA...WXYZ"));
    assert!(!serde_json::to_string(&info).unwrap().contains("secret"));
}

#[test]
fn info_marks_temporary_and_profile_credentials() {
    let temporary = TriagemConfig::new(
        "us-east-1",
        "b",
        CredentialSource::Inline {
            access_key_id: "short".to_string(),
            secret_access_key: "s".to_string(),
            session_token: Some("token".to_string()),
        },
    );
    let info = config::config_info(&temporary);
    assert_eq!(info.credential_type, "temporary");
    assert_eq!(info.access_key_hint.as_deref(), Some("****"));

    let profile = TriagemConfig::new(
        "us-east-1",
        "b",
        CredentialSource::Profile {
            profile_name: "clinica".to_string(),
        },
    );
    let info = config::config_info(&profile);
    assert_eq!(info.credential_type, "profile");
    assert_eq!(info.profile_name.as_deref(), Some("clinica"));
}

#[test]
fn oversized_version_is_rejected_not_migrated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{
            "config_version": 4294967296,
            "region": "us-east-1",
            "bucket": "future",
            "created_at": "2025-03-01T12:00:00Z",
            "credentials": { "type": "default_chain" }
        }"#,
    )
    .unwrap();

    let err = config::load_config(&path).unwrap_err();
    assert!(err.to_string().contains("newer than this build supports"));
}

#[test]
fn non_numeric_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{
            "config_version": "1",
            "region": "us-east-1",
            "bucket": "b",
            "created_at": "2025-03-01T12:00:00Z",
            "credentials": { "type": "default_chain" }
        }"#,
    )
    .unwrap();

    let err = config::load_config(&path).unwrap_err();
    assert!(err.to_string().contains("not a valid version number"));
}
