//! Settings file commands.

use clap::{Args, Subcommand};
use solim_config::{ModuleSettings, user_settings_path, validate_settings};
use std::path::PathBuf;

#[derive(Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    command: SettingsCommand,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the effective settings
    Show {
        /// Settings file (defaults to the user settings file)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Write a settings file with default values
    Init {
        /// Settings file (defaults to the user settings file)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Check a settings file for errors
    Validate {
        /// Settings file (defaults to the user settings file)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

pub fn run(args: SettingsArgs) -> anyhow::Result<()> {
    match args.command {
        SettingsCommand::Show { path } => show(path),
        SettingsCommand::Init { path, force } => init(path, force),
        SettingsCommand::Validate { path } => validate(path),
    }
}

fn show(path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(user_settings_path);
    let settings = ModuleSettings::load_or_default(&path)?;

    if path.exists() {
        println!("# {}", path.display());
    } else {
        println!("# {} (not found, showing defaults)", path.display());
    }
    print!("{}", settings.to_toml()?);
    Ok(())
}

fn init(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(user_settings_path);

    if path.exists() && !force {
        anyhow::bail!(
            "Settings file '{}' already exists. Use --force to overwrite.",
            path.display()
        );
    }

    ModuleSettings::default().save(&path)?;
    tracing::info!(path = %path.display(), "wrote default settings");
    println!("Wrote default settings to {}", path.display());
    Ok(())
}

fn validate(path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(user_settings_path);
    let settings = ModuleSettings::load(&path)?;
    validate_settings(&settings)?;
    println!("{}: ok", path.display());
    Ok(())
}
