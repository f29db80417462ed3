//! Solim CLI - drive the SOLIM module from scenario files.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "solim")]
#[command(author, version, about = "SOLIM module CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario through the module and print its outputs
    Run(commands::run::RunArgs),

    /// Show, create and validate the settings file
    Settings(commands::settings::SettingsArgs),

    /// List, show and copy scenarios
    Scenarios(commands::scenarios::ScenariosArgs),

    /// Show module capacities and defaults
    Info,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Settings(args) => commands::settings::run(args),
        Commands::Scenarios(args) => commands::scenarios::run(args),
        Commands::Info => commands::info::run(),
    }
}
