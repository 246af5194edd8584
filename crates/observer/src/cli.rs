use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use observer_core::Config;

#[derive(Parser)]
#[command(name = "observer")]
#[command(version)]
#[command(about = "Browse, download, preprocess and upload recorded observer sessions")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// JSON config file (defaults to the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Bucket holding observer uploads
    #[arg(long, global = true)]
    pub bucket: Option<String>,

    /// Credentials profile passed to the aws CLI
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Data schema id
    #[arg(long, global = true)]
    pub schema: Option<String>,

    /// Local directory sessions are mirrored into
    #[arg(long, global = true)]
    pub data_root: Option<PathBuf>,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Overlay command-line values onto a loaded config
    pub fn apply(&self, config: &mut Config) {
        if let Some(bucket) = &self.bucket {
            config.bucket = bucket.clone();
        }
        if let Some(profile) = &self.profile {
            config.profile = profile.clone();
        }
        if let Some(schema) = &self.schema {
            config.schema_id = schema.clone();
        }
        if let Some(root) = &self.data_root {
            config.local_data_root = Some(root.clone());
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List session containers under the schema root
    Containers,

    /// List sessions in a container with their local and remote state
    Sessions {
        /// Container prefix, e.g. observer_data/SPO-2111/user/device/2023/
        container: String,
    },

    /// Show session details
    Show { session: String },

    /// Show local and remote status of a session
    Status { session: String },

    /// Download a session into the local data root
    Download { session: String },

    /// Run preprocessing on a downloaded session
    Preprocess { session: String },

    /// Upload preprocessing results of a session
    Upload { session: String },

    /// Print or open the local directory of a downloaded session
    Open {
        session: String,
        /// Also open the directory in the desktop file manager
        #[arg(long)]
        launch: bool,
    },

    /// Print version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_version() {
        let cli = Cli::try_parse_from(["observer", "version"]);
        assert!(cli.is_ok());
        assert!(matches!(cli.unwrap().command, Commands::Version));
    }

    #[test]
    fn test_cli_parse_open_launch() {
        let cli = Cli::try_parse_from(["observer", "open", "s/session-1/", "--launch"]).unwrap();
        match cli.command {
            Commands::Open { session, launch } => {
                assert_eq!(session, "s/session-1/");
                assert!(launch);
            }
            _ => panic!("Expected Open command"),
        }

        let cli = Cli::try_parse_from(["observer", "open", "s/session-1/"]).unwrap();
        assert!(matches!(cli.command, Commands::Open { launch: false, .. }));
    }

    #[test]
    fn test_cli_parse_sessions() {
        let cli = Cli::try_parse_from(["observer", "sessions", "observer_data/SPO-2111/a/b/c/"]);
        assert!(cli.is_ok());
        if let Commands::Sessions { container } = cli.unwrap().command {
            assert_eq!(container, "observer_data/SPO-2111/a/b/c/");
        } else {
            panic!("Expected Sessions command");
        }
    }

    #[test]
    fn test_cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "observer",
            "upload",
            "s/session-1/",
            "--yes",
            "--json",
            "--bucket",
            "other",
            "--data-root",
            "/tmp/data",
        ])
        .unwrap();

        assert!(cli.global.yes);
        assert!(cli.global.json);
        assert_eq!(cli.global.bucket.as_deref(), Some("other"));
        assert_eq!(cli.global.data_root, Some(PathBuf::from("/tmp/data")));
        assert!(matches!(cli.command, Commands::Upload { .. }));
    }

    #[test]
    fn test_cli_parse_session_commands() {
        for cmd in ["show", "status", "download", "preprocess", "upload", "open"] {
            let cli = Cli::try_parse_from(["observer", cmd, "s/session-1/"]);
            assert!(cli.is_ok(), "Failed to parse {}", cmd);
        }
    }

    #[test]
    fn test_cli_requires_session_argument() {
        assert!(Cli::try_parse_from(["observer", "download"]).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let args = GlobalArgs {
            bucket: Some("b".to_string()),
            schema: Some("SPO-9999".to_string()),
            data_root: Some(PathBuf::from("/data")),
            ..GlobalArgs::default()
        };
        let mut config = Config::new();
        args.apply(&mut config);

        assert_eq!(config.bucket, "b");
        assert_eq!(config.profile, "spo");
        assert_eq!(config.schema_root(), "observer_data/SPO-9999/");
        assert_eq!(config.local_data_root, Some(PathBuf::from("/data")));
    }
}
