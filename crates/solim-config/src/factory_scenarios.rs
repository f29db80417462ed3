//! Factory scenarios bundled with the solim library.
//!
//! Built-in scenarios that are always available without external files. Each
//! one exercises a different part of the module and serves as a starting point
//! for writing new scenarios.

use crate::Scenario;

/// Array of factory scenario names for external access.
pub static FACTORY_SCENARIO_NAMES: &[&str] = &[
    "init",
    "sorted_chord",
    "octave_fold",
    "input_octaves",
    "output_octaves",
    "shuffle",
    "slow_clock",
    "four_columns",
];

/// TOML content for factory scenarios, embedded at compile time.
static FACTORY_SCENARIOS_TOML: &[(&str, &str)] = &[
    ("init", INIT_SCENARIO),
    ("sorted_chord", SORTED_CHORD_SCENARIO),
    ("octave_fold", OCTAVE_FOLD_SCENARIO),
    ("input_octaves", INPUT_OCTAVES_SCENARIO),
    ("output_octaves", OUTPUT_OCTAVES_SCENARIO),
    ("shuffle", SHUFFLE_SCENARIO),
    ("slow_clock", SLOW_CLOCK_SCENARIO),
    ("four_columns", FOUR_COLUMNS_SCENARIO),
];

/// Pass-through: one column, no sorting, no expanders.
const INIT_SCENARIO: &str = r#"
name = "Init"
description = "One column passed straight through"

[[ticks]]
[[ticks.columns]]
inputs = [0.0, 0.25, 0.583]
"#;

/// A minor seventh chord played out of order and sorted both ways.
const SORTED_CHORD_SCENARIO: &str = r#"
name = "Sorted Chord"
description = "Unordered chord sorted ascending, then descending"

[[ticks]]
[[ticks.columns]]
inputs = [0.583, 0.0, 0.833, 0.25]
sort = "ascending"

[[ticks]]
[[ticks.columns]]
inputs = [0.583, 0.0, 0.833, 0.25]
sort = "descending"
"#;

/// Values outside the window are folded in by whole octaves.
const OCTAVE_FOLD_SCENARIO: &str = r#"
name = "Octave Fold"
description = "Inputs folded into a -1 V to 3 V window"

[[ticks]]
[[ticks.columns]]
inputs = [5.33, 10.0, -2.0, 1.5]
lower = -1.0
upper = 3.0

[[ticks]]
[[ticks.columns]]
inputs = [5.33, 10.0, -2.0, 1.5]
lower = 3.0
upper = -1.0
sort = "ascending"
"#;

/// Input expander: octave duplicates injected before and after sorting.
const INPUT_OCTAVES_SCENARIO: &str = r#"
name = "Input Octaves"
description = "Octave duplicates from the input expander"

[[ticks]]
[[ticks.columns]]
inputs = [0.0, 0.25, 0.583]
sort = "ascending"
octaves = ["higher", "none", "lower"]
sort_relative = ["before", "before", "after"]
replace = [false, false, true]
"#;

/// Output expander: octave shifted results and a full resort.
const OUTPUT_OCTAVES_SCENARIO: &str = r#"
name = "Output Octaves"
description = "Output expander octaves, first unsorted then resorted"

[[ticks]]
[[ticks.columns]]
inputs = [0.0, 0.25, 0.583, 0.833]
[ticks.columns.outputs]
octaves = ["none", "higher", "none", "lower"]

[[ticks]]
[[ticks.columns]]
inputs = [0.0, 0.25, 0.583, 0.833]
[ticks.columns.outputs]
octaves = ["none", "higher", "none", "lower"]
resort = "all"
"#;

/// Random expander: every action once, with idle ticks between edges.
const SHUFFLE_SCENARIO: &str = r#"
name = "Shuffle"
description = "Random expander actions on a sorted chord"
seed = 7

[[ticks]]
random = [[]]
[[ticks.columns]]
inputs = [0.0, 0.25, 0.417, 0.583, 0.833]
sort = "ascending"

[[ticks]]
random = [["all"]]
[[ticks.columns]]
inputs = [0.0, 0.25, 0.417, 0.583, 0.833]
sort = "ascending"

[[ticks]]
random = [[]]
[[ticks.columns]]
inputs = [0.0, 0.25, 0.417, 0.583, 0.833]
sort = "ascending"

[[ticks]]
random = [["one"]]
[[ticks.columns]]
inputs = [0.0, 0.25, 0.417, 0.583, 0.833]
sort = "ascending"

[[ticks]]
random = [[]]
[[ticks.columns]]
inputs = [0.0, 0.25, 0.417, 0.583, 0.833]
sort = "ascending"

[[ticks]]
random = [["move"]]
[[ticks.columns]]
inputs = [0.0, 0.25, 0.417, 0.583, 0.833]
sort = "ascending"

[[ticks]]
random = [[]]
[[ticks.columns]]
inputs = [0.0, 0.25, 0.417, 0.583, 0.833]
sort = "ascending"

[[ticks]]
random = [["reset"]]
[[ticks.columns]]
inputs = [0.0, 0.25, 0.417, 0.583, 0.833]
sort = "ascending"
"#;

/// Process rate division with monophonic output.
const SLOW_CLOCK_SCENARIO: &str = r#"
name = "Slow Clock"
description = "Core runs every fourth call, first result only"

[settings]
output_mode = "monophonic"
process_rate = 4

[[ticks]]
repeat = 4
[[ticks.columns]]
inputs = [0.583, 0.0]
sort = "ascending"

[[ticks]]
repeat = 4
[[ticks.columns]]
inputs = [0.25, 0.917]
sort = "descending"
"#;

/// Several columns with different panel settings side by side.
const FOUR_COLUMNS_SCENARIO: &str = r#"
name = "Four Columns"
description = "Independent columns, one left unconnected"

[[ticks]]
[[ticks.columns]]
inputs = [0.5, 0.1, 0.3]
sort = "ascending"

[[ticks.columns]]
inputs = [0.5, 0.1, 0.3]
sort = "descending"

[[ticks.columns]]

[[ticks.columns]]
inputs = [4.2, -3.1]
lower = 0.0
upper = 1.0
"#;

/// Get all factory scenarios.
///
/// # Example
///
/// ```rust
/// use solim_config::factory_scenarios;
///
/// for scenario in factory_scenarios() {
///     println!("{}: {}", scenario.name, scenario.description.as_deref().unwrap_or(""));
/// }
/// ```
pub fn factory_scenarios() -> Vec<Scenario> {
    FACTORY_SCENARIOS_TOML
        .iter()
        .filter_map(|(_, toml)| Scenario::from_toml(toml).ok())
        .collect()
}

/// Get a factory scenario by identifier or display name, case-insensitively.
///
/// ```rust
/// use solim_config::get_factory_scenario;
///
/// assert!(get_factory_scenario("shuffle").is_some());
/// assert!(get_factory_scenario("Sorted Chord").is_some());
/// ```
pub fn get_factory_scenario(name: &str) -> Option<Scenario> {
    let name_lower = name.to_lowercase();

    for (scenario_name, toml) in FACTORY_SCENARIOS_TOML {
        if scenario_name.to_lowercase() == name_lower {
            return Scenario::from_toml(toml).ok();
        }
    }

    factory_scenarios()
        .into_iter()
        .find(|scenario| scenario.name.to_lowercase() == name_lower)
}

/// Get the identifiers of all factory scenarios.
pub fn factory_scenario_names() -> Vec<&'static str> {
    FACTORY_SCENARIOS_TOML
        .iter()
        .map(|(name, _)| *name)
        .collect()
}

/// Check if a name refers to a factory scenario.
///
/// ```rust
/// use solim_config::is_factory_scenario;
///
/// assert!(is_factory_scenario("slow_clock"));
/// assert!(is_factory_scenario("Slow Clock"));
/// assert!(!is_factory_scenario("my_scenario"));
/// ```
pub fn is_factory_scenario(name: &str) -> bool {
    get_factory_scenario(name).is_some()
}
