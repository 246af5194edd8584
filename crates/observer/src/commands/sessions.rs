use observer_core::SessionSummary;
use observer_naming::ensure_trailing_slash;

use crate::cli::GlobalArgs;
use crate::commands::open_registry;

pub fn run(global: &GlobalArgs, container: &str) -> anyhow::Result<()> {
    let registry = open_registry(global)?;
    let container = ensure_trailing_slash(container);
    let sessions = registry.list_sessions(&container)?;

    if global.json {
        let output = serde_json::json!({
            "container": container,
            "sessions": sessions,
        });
        println!("{output}");
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No sessions in {container}");
        return Ok(());
    }
    for line in table(&sessions) {
        println!("{line}");
    }
    Ok(())
}

fn table(sessions: &[SessionSummary]) -> Vec<String> {
    let width = sessions
        .iter()
        .map(|s| s.session.len())
        .max()
        .unwrap_or(0)
        .max("SESSION".len());

    let mut lines = vec![format!("{:<width$}  {:<14}  {}", "SESSION", "LOCAL", "REMOTE")];
    lines.extend(sessions.iter().map(|s| {
        format!(
            "{:<width$}  {:<14}  {}",
            s.session,
            s.local.to_string(),
            s.remote.to_string()
        )
    }));
    lines
}
