//! Settings and scenario validation.
//!
//! Names in settings and scenario files are plain strings so that files stay
//! readable and errors can point at the offending word. This module parses
//! them into core types and checks capacities and ranges.
//!
//! # Example
//!
//! ```rust
//! use solim_config::{ModuleSettings, validate_settings, parse_sort};
//! use solim_core::SortOrder;
//!
//! assert_eq!(parse_sort("Ascending").unwrap(), SortOrder::Ascending);
//! assert!(parse_sort("sideways").is_err());
//!
//! let settings = ModuleSettings::default();
//! validate_settings(&settings).expect("defaults are valid");
//! ```

use solim_core::{Octave, RandomTrigger, ResortMode, SortOrder, SortRelative};
use solim_module::{MAX_PROCESS_RATE, OutputMode};
use thiserror::Error;

use crate::scenario::Scenario;
use crate::settings::ModuleSettings;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A name that does not map to any known option.
    #[error("unknown {kind} '{name}'")]
    UnknownName {
        /// What was being named (sort, octave, ...).
        kind: String,
        /// The unrecognized name.
        name: String,
    },

    /// Process rate outside the accepted range.
    #[error("process rate {value} out of range [{min}, {max}]")]
    ProcessRateOutOfRange {
        /// The rejected rate.
        value: u32,
        /// Smallest accepted rate.
        min: u32,
        /// Largest accepted rate.
        max: u32,
    },

    /// More columns than the module has.
    #[error("{count} columns given, at most {max} allowed")]
    TooManyColumns {
        /// Number of columns given.
        count: usize,
        /// Module capacity.
        max: usize,
    },

    /// More entries of some kind in one column than it can hold.
    #[error("column {column}: {count} {what} given, at most {max} allowed")]
    TooManyEntries {
        /// Column index.
        column: usize,
        /// What was counted.
        what: String,
        /// Number given.
        count: usize,
        /// Capacity.
        max: usize,
    },

    /// NaN or infinite voltage.
    #[error("column {column}: non-finite voltage {value}")]
    NonFiniteVoltage {
        /// Column index.
        column: usize,
        /// The rejected value.
        value: f64,
    },

    /// A tick repeated zero times.
    #[error("repeat must be at least 1")]
    ZeroRepeat,

    /// A tick repeated more often than a scenario may run.
    #[error("repeat {value} exceeds {max}")]
    RepeatTooLarge {
        /// The rejected count.
        value: u32,
        /// Largest accepted count.
        max: u32,
    },

    /// An error inside one scenario tick.
    #[error("tick {tick}: {error}")]
    InTick {
        /// Tick index in the file.
        tick: usize,
        /// The error.
        error: Box<ValidationError>,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", join_messages(.0))]
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    fn unknown(kind: &str, name: &str) -> Self {
        ValidationError::UnknownName {
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }

    fn collect(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple(errors)),
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    messages.join("; ")
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Parse a sort mode: `none`, `ascending` or `descending`.
pub fn parse_sort(name: &str) -> ValidationResult<SortOrder> {
    match name.to_lowercase().as_str() {
        "none" => Ok(SortOrder::None),
        "ascending" => Ok(SortOrder::Ascending),
        "descending" => Ok(SortOrder::Descending),
        _ => Err(ValidationError::unknown("sort", name)),
    }
}

/// Parse an octave directive: `none`, `lower` or `higher`.
pub fn parse_octave(name: &str) -> ValidationResult<Octave> {
    match name.to_lowercase().as_str() {
        "none" => Ok(Octave::None),
        "lower" => Ok(Octave::Lower),
        "higher" => Ok(Octave::Higher),
        _ => Err(ValidationError::unknown("octave", name)),
    }
}

/// Parse when an octave duplicate is shifted: `before` or `after` sorting.
pub fn parse_sort_relative(name: &str) -> ValidationResult<SortRelative> {
    match name.to_lowercase().as_str() {
        "before" => Ok(SortRelative::Before),
        "after" => Ok(SortRelative::After),
        _ => Err(ValidationError::unknown("sort relative", name)),
    }
}

/// Parse a resort mode: `none`, `connected` or `all`.
pub fn parse_resort_mode(name: &str) -> ValidationResult<ResortMode> {
    match name.to_lowercase().as_str() {
        "none" => Ok(ResortMode::None),
        "connected" => Ok(ResortMode::Connected),
        "all" => Ok(ResortMode::All),
        _ => Err(ValidationError::unknown("resort mode", name)),
    }
}

/// Parse a random action: `move`, `one`, `all`, `reset` (or `none`).
pub fn parse_random_trigger(name: &str) -> ValidationResult<RandomTrigger> {
    match name.to_lowercase().as_str() {
        "none" => Ok(RandomTrigger::None),
        "move" => Ok(RandomTrigger::Move),
        "one" => Ok(RandomTrigger::One),
        "all" => Ok(RandomTrigger::All),
        "reset" => Ok(RandomTrigger::Reset),
        _ => Err(ValidationError::unknown("random action", name)),
    }
}

/// Parse an output mode: `polyphonic` or `monophonic`.
pub fn parse_output_mode(name: &str) -> ValidationResult<OutputMode> {
    match name.to_lowercase().as_str() {
        "polyphonic" | "poly" => Ok(OutputMode::Polyphonic),
        "monophonic" | "mono" => Ok(OutputMode::Monophonic),
        _ => Err(ValidationError::unknown("output mode", name)),
    }
}

/// Check a process rate against `1..=MAX_PROCESS_RATE`.
pub fn validate_process_rate(rate: u32) -> ValidationResult<()> {
    if (1..=MAX_PROCESS_RATE).contains(&rate) {
        Ok(())
    } else {
        Err(ValidationError::ProcessRateOutOfRange {
            value: rate,
            min: 1,
            max: MAX_PROCESS_RATE,
        })
    }
}

/// Largest `repeat` accepted on one scenario tick.
pub const MAX_REPEAT: u32 = 1 << 20;

/// Check a tick's repeat count against `1..=MAX_REPEAT`.
pub fn validate_repeat(repeat: u32) -> ValidationResult<()> {
    match repeat {
        0 => Err(ValidationError::ZeroRepeat),
        1..=MAX_REPEAT => Ok(()),
        _ => Err(ValidationError::RepeatTooLarge {
            value: repeat,
            max: MAX_REPEAT,
        }),
    }
}

/// Validate module settings.
pub fn validate_settings(settings: &ModuleSettings) -> ValidationResult<()> {
    let mut errors = Vec::new();
    if let Err(e) = parse_output_mode(&settings.output_mode) {
        errors.push(e);
    }
    if let Err(e) = validate_process_rate(settings.process_rate) {
        errors.push(e);
    }
    ValidationError::collect(errors)
}

/// Validate a whole scenario: its settings and every tick.
///
/// All problems are reported, not just the first.
pub fn validate_scenario(scenario: &Scenario) -> ValidationResult<()> {
    let mut errors = Vec::new();

    match validate_settings(&scenario.settings) {
        Ok(()) => {}
        Err(ValidationError::Multiple(inner)) => errors.extend(inner),
        Err(e) => errors.push(e),
    }

    for (index, tick) in scenario.ticks.iter().enumerate() {
        if let Err(e) = validate_repeat(tick.repeat) {
            errors.push(ValidationError::InTick {
                tick: index,
                error: Box::new(e),
            });
        }
        if let Err(e) = tick.to_frame() {
            errors.push(ValidationError::InTick {
                tick: index,
                error: Box::new(e),
            });
        }
    }

    ValidationError::collect(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(parse_sort("DESCENDING").unwrap(), SortOrder::Descending);
        assert_eq!(parse_octave("Higher").unwrap(), Octave::Higher);
        assert_eq!(parse_sort_relative("After").unwrap(), SortRelative::After);
        assert_eq!(
            parse_resort_mode("Connected").unwrap(),
            ResortMode::Connected
        );
        assert_eq!(parse_random_trigger("RESET").unwrap(), RandomTrigger::Reset);
        assert_eq!(parse_output_mode("Mono").unwrap(), OutputMode::Monophonic);
    }

    #[test]
    fn unknown_name_reports_kind_and_word() {
        let err = parse_octave("sideways").unwrap_err();
        assert_eq!(err.to_string(), "unknown octave 'sideways'");
    }

    #[test]
    fn process_rate_bounds() {
        assert!(validate_process_rate(1).is_ok());
        assert!(validate_process_rate(MAX_PROCESS_RATE).is_ok());
        assert!(matches!(
            validate_process_rate(0),
            Err(ValidationError::ProcessRateOutOfRange { value: 0, .. })
        ));
        assert!(validate_process_rate(MAX_PROCESS_RATE + 1).is_err());
    }

    #[test]
    fn repeat_bounds() {
        assert_eq!(validate_repeat(0), Err(ValidationError::ZeroRepeat));
        assert!(validate_repeat(1).is_ok());
        assert!(validate_repeat(MAX_REPEAT).is_ok());
        assert_eq!(
            validate_repeat(4_000_000_000),
            Err(ValidationError::RepeatTooLarge {
                value: 4_000_000_000,
                max: MAX_REPEAT,
            })
        );
    }

    #[test]
    fn settings_errors_are_collected() {
        let settings = ModuleSettings {
            output_mode: "stereo".to_string(),
            process_rate: 0,
        };
        match validate_settings(&settings) {
            Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected two errors, got {other:?}"),
        }
    }

    #[test]
    fn multiple_display_joins_messages() {
        let err = ValidationError::Multiple(vec![
            ValidationError::ZeroRepeat,
            ValidationError::TooManyColumns { count: 9, max: 8 },
        ]);
        assert_eq!(
            err.to_string(),
            "multiple validation errors: repeat must be at least 1; 9 columns given, at most 8 allowed"
        );
    }
}
