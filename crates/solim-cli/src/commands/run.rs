//! Run a scenario through the module.

use clap::{Args, ValueEnum};
use serde::Serialize;
use solim_config::{ModuleSettings, StepOutput, resolve_scenario};
use solim_module::SolimModule;
use std::path::PathBuf;

/// Output format for step listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per module call
    #[default]
    Text,
    /// A single JSON document
    Json,
}

/// Run a scenario.
#[derive(Args)]
pub struct RunArgs {
    /// Scenario file path, user scenario name, or factory scenario name
    pub scenario: String,

    /// Random seed (overrides the scenario's seed)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Settings file (overrides the scenario's settings)
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

#[derive(Serialize)]
struct RunReport<'a> {
    scenario: &'a str,
    seed: Option<u64>,
    output_mode: &'a str,
    process_rate: u32,
    steps: Vec<StepReport<'a>>,
}

#[derive(Serialize)]
struct StepReport<'a> {
    tick: usize,
    repetition: u32,
    columns: &'a [Vec<f32>],
}

/// Run the run command.
pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let mut scenario = resolve_scenario(&args.scenario)?;

    if let Some(path) = &args.settings {
        scenario.settings = ModuleSettings::load(path)?;
        tracing::debug!(path = %path.display(), "settings override");
    }

    let seed = args.seed.or(scenario.seed);
    let mut module = match seed {
        Some(seed) => SolimModule::from_seed(seed),
        None => SolimModule::new(),
    };

    tracing::info!(
        scenario = %scenario.name,
        ticks = scenario.ticks.len(),
        calls = scenario.step_count(),
        seed = ?seed,
        "running scenario"
    );

    let steps = scenario.run(&mut module)?;

    match args.format {
        OutputFormat::Text => print_text(&scenario.name, &steps),
        OutputFormat::Json => {
            let report = RunReport {
                scenario: &scenario.name,
                seed,
                output_mode: &scenario.settings.output_mode,
                process_rate: scenario.settings.process_rate,
                steps: steps
                    .iter()
                    .map(|step| StepReport {
                        tick: step.tick,
                        repetition: step.repetition,
                        columns: &step.columns,
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn print_text(name: &str, steps: &[StepOutput]) {
    println!("Scenario: {name}");
    println!("{}", "=".repeat(10 + name.len()));

    for step in steps {
        let label = format!("{}.{}", step.tick, step.repetition);
        if step.columns.is_empty() {
            println!("{label:>6}  (no outputs)");
            continue;
        }
        for (index, column) in step.columns.iter().enumerate() {
            let prefix = if index == 0 { label.as_str() } else { "" };
            println!("{prefix:>6}  col {index}: {}", format_voltages(column));
        }
    }
}

fn format_voltages(voltages: &[f32]) -> String {
    if voltages.is_empty() {
        return "-".to_string();
    }
    voltages
        .iter()
        .map(|v| format!("{v:+.3}"))
        .collect::<Vec<_>>()
        .join(" ")
}
