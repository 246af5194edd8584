use crate::cli::GlobalArgs;
use crate::commands::prompt::StdinConfirm;
use crate::commands::{open_registry, print_report};

pub fn run(global: &GlobalArgs, session: &str) -> anyhow::Result<()> {
    let registry = open_registry(global)?;
    let report = registry.preprocess(session, &StdinConfirm::new(global.yes))?;
    print_report(&report, global.json)
}
