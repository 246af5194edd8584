//! Configuration for the session registry

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

pub const DEFAULT_BUCKET: &str = "speak-faster";
pub const DEFAULT_PROFILE: &str = "spo";
pub const DEFAULT_TIMEZONE: &str = "US/Central";

/// Registry configuration
///
/// Every field has a default, so a partial JSON file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bucket holding observer uploads
    pub bucket: String,

    /// Named credentials profile for the store client
    pub profile: String,

    /// Data schema id under `observer_data/`
    pub schema_id: String,

    /// Where sessions are mirrored; inferred from well-known locations when unset
    pub local_data_root: Option<PathBuf>,

    /// Zone used when a session carries none and nobody supplies one
    pub default_timezone: String,

    /// Preprocessing program and leading arguments; the session directory
    /// and time zone id are appended
    pub preprocess_command: Vec<String>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            schema_id: observer_naming::DEFAULT_SCHEMA_ID.to_string(),
            local_data_root: None,
            default_timezone: DEFAULT_TIMEZONE.to_string(),
            preprocess_command: vec!["python".to_string(), "elan_format_raw.py".to_string()],
        }
    }

    /// Load from a JSON file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let contents = std::fs::read_to_string(path).map_err(RegistryError::io(path))?;
        serde_json::from_str(&contents)
            .map_err(|e| RegistryError::Config(format!("{}: {}", path.display(), e)))
    }

    /// `observer_data/<schema>/`
    pub fn schema_root(&self) -> String {
        observer_naming::schema_root(&self.schema_id)
    }

    /// Configured data root, or the first well-known one that exists
    pub fn data_root(&self) -> Result<PathBuf> {
        match &self.local_data_root {
            Some(root) => Ok(root.clone()),
            None => {
                let candidates = observer_naming::default_data_root_candidates();
                observer_naming::infer_local_data_root(&candidates)
                    .map_err(|e| RegistryError::Config(e.to_string()))
            }
        }
    }

    pub fn default_zone(&self) -> Result<Tz> {
        self.default_timezone.parse::<Tz>().map_err(|_| {
            RegistryError::Config(format!("unknown default time zone {}", self.default_timezone))
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::new();
        assert_eq!(config.bucket, "speak-faster");
        assert_eq!(config.profile, "spo");
        assert_eq!(config.schema_root(), "observer_data/SPO-2111/");
        assert_eq!(config.default_zone().unwrap(), chrono_tz::US::Central);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(&temp.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::new());
    }

    #[test]
    fn test_load_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("observer.json");
        std::fs::write(
            &path,
            r#"{"bucket": "other-bucket", "local_data_root": "/tmp/sessions"}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.bucket, "other-bucket");
        assert_eq!(config.profile, "spo");
        assert_eq!(config.data_root().unwrap(), PathBuf::from("/tmp/sessions"));
    }

    #[test]
    fn test_load_malformed_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("observer.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Config::load(&path), Err(RegistryError::Config(_))));
    }

    #[test]
    fn test_bad_default_zone() {
        let config = Config {
            default_timezone: "Mars/Olympus".to_string(),
            ..Config::new()
        };
        assert!(config.default_zone().is_err());
    }
}
