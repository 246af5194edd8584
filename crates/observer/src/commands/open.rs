use std::path::{Path, PathBuf};
use std::process::Command;

use observer_core::{LocalSessionStatus, Registry};
use tracing::info;

use crate::cli::GlobalArgs;
use crate::commands::open_registry;

pub fn run(global: &GlobalArgs, session: &str, launch: bool) -> anyhow::Result<()> {
    let registry = open_registry(global)?;
    let dir = downloaded_dir(&registry, session)?;
    if launch {
        launch_file_manager(opener_program(), &dir)?;
    }

    if global.json {
        println!("{}", serde_json::json!({ "session": session, "local_dir": dir }));
    } else {
        println!("{}", dir.display());
    }
    Ok(())
}

/// Local directory of a session, provided something has been downloaded
fn downloaded_dir(registry: &Registry, session: &str) -> anyhow::Result<PathBuf> {
    if registry.local_status(session)? == LocalSessionStatus::NotDownloaded {
        anyhow::bail!("session {} has not been downloaded", session);
    }
    Ok(registry.local_dir(session))
}

/// Desktop command that opens a directory in the file manager
fn opener_program() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    }
}

fn launch_file_manager(program: &str, dir: &Path) -> anyhow::Result<()> {
    info!("Calling: {} {}", program, dir.display());
    // The opener detaches on its own; only a failed start is reported.
    Command::new(program)
        .arg(dir)
        .spawn()
        .map_err(|e| anyhow::anyhow!("failed to run {}: {}", program, e))?;
    Ok(())
}
