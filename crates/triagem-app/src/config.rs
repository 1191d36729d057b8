use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use triagem_core::keys::PATIENTS_COLLECTION;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

/// Environment variable pointing at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "TRIAGEM_CONFIG";

const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriagemConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub region: String,
    pub bucket: String,
    /// Key prefix of the patient collection. Added in v1.
    #[serde(default = "default_collection")]
    pub collection: String,
    /// How often subscriptions re-list the collection. Added in v1.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    pub created_at: jiff::Timestamp,
    pub credentials: CredentialSource,
}

impl TriagemConfig {
    pub fn new(region: impl Into<String>, bucket: impl Into<String>, credentials: CredentialSource) -> Self {
        Self {
            config_version: CURRENT_VERSION,
            region: region.into(),
            bucket: bucket.into(),
            collection: default_collection(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            created_at: jiff::Timestamp::now(),
            credentials,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn default_collection() -> String {
    PATIENTS_COLLECTION.to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialSource {
    Inline {
        access_key_id: String,
        secret_access_key: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        session_token: Option<String>,
    },
    Profile {
        profile_name: String,
    },
    DefaultChain,
}

/// Redacted config info safe to print.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigInfo {
    pub region: String,
    pub bucket: String,
    pub collection: String,
    pub poll_interval_ms: u64,
    pub created_at: String,
    pub credential_type: String,
    pub profile_name: Option<String>,
    pub access_key_hint: Option<String>,
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("com.triagem.app"))
}

/// Location of the config file: `$TRIAGEM_CONFIG` if set, otherwise
/// `config.json` in the platform config directory.
pub fn config_path() -> eyre::Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }
    Ok(config_dir()?.join("config.json"))
}

pub fn has_config(path: &Path) -> bool {
    path.exists()
}

pub fn load_config(path: &Path) -> eyre::Result<TriagemConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = read_version(&json)?;

    let migrated = migrate(json, on_disk_version)?;
    let config: TriagemConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// The on-disk `config_version`. Missing or null means pre-versioned (0).
fn read_version(json: &serde_json::Value) -> eyre::Result<u32> {
    let raw = match json.get("config_version") {
        None | Some(serde_json::Value::Null) => return Ok(0),
        Some(raw) => raw,
    };
    let version = raw
        .as_u64()
        .ok_or_else(|| eyre::eyre!("config_version {raw} is not a valid version number"))?;
    u32::try_from(version).map_err(|_| {
        eyre::eyre!(
            "config_version {version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update Triagem."
        )
    })
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update Triagem."
        ));
    }

    // v0 → v1: collection prefix and poll interval become configurable
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("collection")
            .or_insert(serde_json::Value::String(default_collection()));
        obj.entry("poll_interval_ms")
            .or_insert(serde_json::Value::Number(DEFAULT_POLL_INTERVAL_MS.into()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added collection, poll_interval_ms)");
    }

    Ok(json)
}

pub fn save_config(path: &Path, config: &TriagemConfig) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path has no parent: {}", path.display()))?;
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    // Credentials may be inline; keep the file private on Unix
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

pub fn delete_config(path: &Path) -> eyre::Result<()> {
    if path.exists() {
        std::fs::remove_file(path)?;
        tracing::info!(path = %path.display(), "config deleted");
    }
    Ok(())
}

pub fn config_info(config: &TriagemConfig) -> ConfigInfo {
    let (credential_type, profile_name, access_key_hint) = match &config.credentials {
        CredentialSource::Inline {
            access_key_id,
            session_token,
            ..
        } => {
            let cred_type = if session_token.is_some() {
                "temporary".to_string()
            } else {
                "inline".to_string()
            };
            let hint = redact_access_key(access_key_id);
            (cred_type, None, Some(hint))
        }
        CredentialSource::Profile { profile_name } => {
            ("profile".to_string(), Some(profile_name.clone()), None)
        }
        CredentialSource::DefaultChain => ("default_chain".to_string(), None, None),
    };

    ConfigInfo {
        region: config.region.clone(),
        bucket: config.bucket.clone(),
        collection: config.collection.clone(),
        poll_interval_ms: config.poll_interval_ms,
        created_at: config.created_at.to_string(),
        credential_type,
        profile_name,
        access_key_hint,
    }
}

fn redact_access_key(key: &str) -> String {
    if key.len() <= 8 || !key.is_ascii() {
        return "****".to_string();
    }
    let prefix = &key[..4];
    let suffix = &key[key.len() - 4..];
    format!("{prefix}...{suffix}")
}
