pub mod containers;
pub mod download;
pub mod open;
pub mod preprocess;
pub mod prompt;
pub mod sessions;
pub mod show;
pub mod status;
pub mod upload;
pub mod version;

use std::path::PathBuf;

use observer_core::{Config, OperationReport, Registry};
use observer_store::S3Store;
use tracing::debug;

use crate::cli::GlobalArgs;

/// `<config dir>/observer/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("observer").join("config.json"))
}

/// Config file (if any) with command-line overrides applied
pub fn load_config(global: &GlobalArgs) -> anyhow::Result<Config> {
    let mut config = match global.config.clone().or_else(default_config_path) {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            Config::load(&path)?
        }
        None => Config::new(),
    };
    global.apply(&mut config);
    Ok(config)
}

/// Registry backed by the configured S3 bucket, prompting on stdin for missing zones
pub fn open_registry(global: &GlobalArgs) -> anyhow::Result<Registry> {
    let config = load_config(global)?;
    let store = S3Store::connect(config.bucket.clone(), config.profile.clone())?;
    let registry = Registry::new(Box::new(store), config)?
        .with_timezone_prompt(Box::new(prompt::ask_timezone))?;
    Ok(registry)
}

pub fn print_report(report: &OperationReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}: {:?}", report.session_prefix, report.outcome);
        println!("  local:  {}", report.local);
        println!("  remote: {}", report.remote);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_default_config_path_under_xdg() {
        let temp = TempDir::new().unwrap();
        let original = std::env::var_os("XDG_CONFIG_HOME");
        unsafe { std::env::set_var("XDG_CONFIG_HOME", temp.path()) };

        let path = default_config_path();

        match original {
            Some(value) => unsafe { std::env::set_var("XDG_CONFIG_HOME", value) },
            None => unsafe { std::env::remove_var("XDG_CONFIG_HOME") },
        }
        assert_eq!(path, Some(temp.path().join("observer").join("config.json")));
    }

    #[test]
    fn test_load_config_from_flag() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("observer.json");
        std::fs::write(&path, r#"{"bucket": "from-file", "profile": "p1"}"#).unwrap();

        let global = GlobalArgs {
            config: Some(path),
            profile: Some("p2".to_string()),
            ..GlobalArgs::default()
        };
        let config = load_config(&global).unwrap();

        assert_eq!(config.bucket, "from-file");
        assert_eq!(config.profile, "p2");
    }

    #[test]
    fn test_load_config_without_file() {
        let temp = TempDir::new().unwrap();
        let global = GlobalArgs {
            config: Some(temp.path().join("missing.json")),
            ..GlobalArgs::default()
        };

        assert_eq!(load_config(&global).unwrap(), Config::new());
    }

    #[test]
    fn test_open_registry_with_data_root() {
        let temp = TempDir::new().unwrap();
        let global = GlobalArgs {
            config: Some(temp.path().join("missing.json")),
            data_root: Some(temp.path().to_path_buf()),
            ..GlobalArgs::default()
        };

        let registry = open_registry(&global).unwrap();
        assert_eq!(registry.data_root(), temp.path());
        assert_eq!(registry.config().bucket, "speak-faster");
    }
}
