//! Display module capacities and defaults.

use solim_config::ModuleSettings;
use solim_core::{
    DEFAULT_LOWER_LIMIT, DEFAULT_UPPER_LIMIT, LIMIT_TOLERANCE, MAX_COLUMNS, MAX_INPUTS, MAX_OUTPUTS,
    MAX_RESULTS,
};
use solim_module::{MAX_PROCESS_RATE, TRIGGER_HIGH_THRESHOLD, TRIGGER_LOW_THRESHOLD};

/// Run the info command.
pub fn run() -> anyhow::Result<()> {
    let defaults = ModuleSettings::default();

    println!("SOLIM {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Capacities:");
    println!("  Columns:            {MAX_COLUMNS}");
    println!("  Inputs per column:  {MAX_INPUTS}");
    println!("  Outputs per column: {MAX_OUTPUTS}");
    println!("  Results per column: {MAX_RESULTS}");
    println!();
    println!("Defaults:");
    println!(
        "  Limits:             {DEFAULT_LOWER_LIMIT:+.1} V to {DEFAULT_UPPER_LIMIT:+.1} V"
    );
    println!("  Limit tolerance:    {LIMIT_TOLERANCE}");
    println!("  Output mode:        {}", defaults.output_mode);
    println!(
        "  Process rate:       {} (max {MAX_PROCESS_RATE})",
        defaults.process_rate
    );
    println!(
        "  Trigger thresholds: {TRIGGER_LOW_THRESHOLD} V / {TRIGGER_HIGH_THRESHOLD} V"
    );

    Ok(())
}
