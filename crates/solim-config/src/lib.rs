//! Settings and scenario management for the SOLIM module.
//!
//! This crate is the file-facing layer around [`solim_module::SolimModule`]:
//! module settings, scripted scenarios that replay frames through the module,
//! name and range validation, and platform-specific directories.
//!
//! # Features
//!
//! - **Settings**: Output mode and process rate in `settings.toml`
//! - **Scenarios**: Ticks of column inputs, expander state and random gates
//! - **Validation**: Known names, capacities, finite voltages
//! - **Paths**: Platform-specific config and scenario directories
//! - **Factory Scenarios**: Built-in scenarios covering each feature
//!
//! # Example
//!
//! ```rust
//! use solim_config::{ColumnConfig, Scenario, TickConfig};
//! use solim_module::SolimModule;
//!
//! let scenario = Scenario::new("Chord").with_seed(3).with_tick(TickConfig {
//!     columns: vec![ColumnConfig {
//!         sort: "ascending".to_string(),
//!         ..ColumnConfig::with_inputs(vec![0.5, 0.25])
//!     }],
//!     ..TickConfig::default()
//! });
//!
//! let mut module = SolimModule::from_seed(3);
//! let steps = scenario.run(&mut module).unwrap();
//! assert_eq!(steps[0].columns, vec![vec![0.25, 0.5]]);
//! ```

mod error;
mod scenario;
mod settings;

/// Platform-specific paths for settings and scenarios.
pub mod paths;

/// Settings and scenario validation.
pub mod validation;

/// Factory scenarios bundled with the library.
pub mod factory_scenarios;

pub use error::ConfigError;
pub use factory_scenarios::{
    FACTORY_SCENARIO_NAMES, factory_scenario_names, factory_scenarios, get_factory_scenario,
    is_factory_scenario,
};
pub use paths::{
    ensure_user_config_dir, ensure_user_scenarios_dir, find_scenario, list_scenarios_in_dir,
    list_user_scenarios, scenario_name_from_path, user_config_dir, user_scenarios_dir,
    user_settings_path,
};
pub use scenario::{ColumnConfig, GATE_HIGH, OutputConfig, Scenario, StepOutput, TickConfig};
pub use settings::ModuleSettings;
pub use validation::{
    MAX_REPEAT, ValidationError, ValidationResult, parse_octave, parse_output_mode,
    parse_random_trigger, parse_resort_mode, parse_sort, parse_sort_relative, validate_process_rate,
    validate_repeat, validate_scenario, validate_settings,
};

/// Load a scenario by file path, user scenario name, or factory name, in that
/// order.
pub fn resolve_scenario(name: &str) -> Result<Scenario, ConfigError> {
    if let Some(path) = find_scenario(name) {
        return Scenario::load(path);
    }
    get_factory_scenario(name).ok_or_else(|| ConfigError::ScenarioNotFound(name.to_string()))
}
