use crate::cli::GlobalArgs;
use crate::commands::open_registry;

pub fn run(global: &GlobalArgs) -> anyhow::Result<()> {
    let registry = open_registry(global)?;
    let containers = registry.discover_containers()?;

    if global.json {
        let output = serde_json::json!({
            "schema_root": registry.config().schema_root(),
            "containers": containers,
        });
        println!("{output}");
        return Ok(());
    }

    if containers.is_empty() {
        println!("No session containers under {}", registry.config().schema_root());
    }
    for container in &containers {
        println!("{container}");
    }
    Ok(())
}
