//! Scenario management commands.
//!
//! Lists factory and user scenarios, prints them as TOML, and copies factory
//! scenarios into the user directory for editing.

use clap::{Args, Subcommand};
use solim_config::{
    Scenario, ensure_user_scenarios_dir, factory_scenario_names, get_factory_scenario,
    list_user_scenarios, resolve_scenario, scenario_name_from_path, user_scenarios_dir,
    user_settings_path,
};

#[derive(Args)]
pub struct ScenariosArgs {
    #[command(subcommand)]
    command: ScenariosCommand,
}

#[derive(Subcommand)]
enum ScenariosCommand {
    /// List available scenarios (factory and user)
    List {
        /// Show only factory scenarios
        #[arg(long)]
        factory: bool,

        /// Show only user scenarios
        #[arg(long)]
        user: bool,
    },

    /// Print a scenario as TOML
    Show {
        /// Scenario name or path
        name: String,
    },

    /// Copy a factory scenario to the user directory for editing
    Copy {
        /// Factory scenario name
        source: String,

        /// New scenario name (defaults to the source name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Show config directories
    Paths,
}

pub fn run(args: ScenariosArgs) -> anyhow::Result<()> {
    match args.command {
        ScenariosCommand::List { factory, user } => list(factory, user),
        ScenariosCommand::Show { name } => show(&name),
        ScenariosCommand::Copy { source, name } => copy(&source, name.as_deref()),
        ScenariosCommand::Paths => paths(),
    }
}

fn list(factory_only: bool, user_only: bool) -> anyhow::Result<()> {
    if !user_only {
        println!("Factory Scenarios:");
        println!("==================");
        for id in factory_scenario_names() {
            if let Some(scenario) = get_factory_scenario(id) {
                let desc = scenario.description.as_deref().unwrap_or("");
                println!("  {id:16} - {desc}");
            }
        }
        println!();
    }

    if !factory_only {
        println!("User Scenarios:");
        println!("===============");
        let user_scenarios = list_user_scenarios();
        if user_scenarios.is_empty() {
            println!("  (none)");
            println!();
            println!("  Copy one with: solim scenarios copy <factory name>\n");
        } else {
            for path in user_scenarios {
                let name = scenario_name_from_path(&path).unwrap_or_else(|| "unknown".into());
                match Scenario::load(&path) {
                    Ok(scenario) => {
                        let desc = scenario.description.as_deref().unwrap_or("");
                        println!("  {name:16} - {desc}");
                    }
                    Err(_) => println!("  {name:16} - (error loading)"),
                }
            }
            println!();
        }
    }

    Ok(())
}

fn show(name: &str) -> anyhow::Result<()> {
    let scenario = resolve_scenario(name)?;
    print!("{}", scenario.to_toml()?);
    Ok(())
}

fn copy(source: &str, new_name: Option<&str>) -> anyhow::Result<()> {
    let scenario = get_factory_scenario(source)
        .ok_or_else(|| anyhow::anyhow!("Factory scenario '{source}' not found."))?;

    let target_name = new_name.unwrap_or(source);
    let dir = ensure_user_scenarios_dir()?;
    let path = dir.join(format!("{target_name}.toml"));

    if path.exists() {
        anyhow::bail!(
            "Scenario '{target_name}' already exists. Choose another name with --name."
        );
    }

    scenario.save(&path)?;
    println!("Copied '{source}' to {}", path.display());
    Ok(())
}

fn paths() -> anyhow::Result<()> {
    println!("Settings:  {}", user_settings_path().display());
    println!("Scenarios: {}", user_scenarios_dir().display());
    Ok(())
}
