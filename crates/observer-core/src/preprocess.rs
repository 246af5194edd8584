//! External preprocessing transform

use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::error::{RegistryError, Result};

/// Turns a downloaded session directory into merged artifacts
pub trait Preprocessor: Send + Sync {
    fn run(&self, session_dir: &Path, timezone_id: &str) -> Result<()>;
}

/// Runs a configured program with the session directory and zone appended
#[derive(Debug, Clone)]
pub struct CommandPreprocessor {
    program: String,
    args: Vec<String>,
}

impl CommandPreprocessor {
    /// `command` is the program followed by its leading arguments
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| RegistryError::Config("preprocess command is empty".to_string()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl Preprocessor for CommandPreprocessor {
    fn run(&self, session_dir: &Path, timezone_id: &str) -> Result<()> {
        let dir = session_dir.display().to_string();
        let mut args = self.args.clone();
        args.push(dir.clone());
        args.push(timezone_id.to_string());

        info!("Calling: {} {}", self.program, args.join(" "));
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(RegistryError::io(&self.program))?;

        if !status.success() {
            return Err(RegistryError::Preprocess {
                session: dir,
                status: status.to_string(),
            });
        }
        info!(session = %dir, "preprocessing complete");
        Ok(())
    }
}
