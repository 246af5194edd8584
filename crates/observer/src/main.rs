mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.global.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    // Logs on stderr, command output on stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let global = &cli.global;
    match &cli.command {
        Commands::Containers => commands::containers::run(global),
        Commands::Sessions { container } => commands::sessions::run(global, container),
        Commands::Show { session } => commands::show::run(global, session),
        Commands::Status { session } => commands::status::run(global, session),
        Commands::Download { session } => commands::download::run(global, session),
        Commands::Preprocess { session } => commands::preprocess::run(global, session),
        Commands::Upload { session } => commands::upload::run(global, session),
        Commands::Open { session, launch } => commands::open::run(global, session, *launch),
        Commands::Version => commands::version::run(),
    }
}
