use crate::cli::GlobalArgs;
use crate::commands::open_registry;

pub fn run(global: &GlobalArgs, session: &str) -> anyhow::Result<()> {
    let registry = open_registry(global)?;
    let local = registry.local_status(session)?;
    let remote = registry.remote_status(session)?;
    let dir = registry.local_dir(session);

    if global.json {
        let output = serde_json::json!({
            "session": session,
            "local": local,
            "remote": remote,
            "local_dir": dir,
        });
        println!("{output}");
    } else {
        println!("{session}");
        println!("  local:  {local} ({})", dir.display());
        println!("  remote: {remote}");
    }
    Ok(())
}
