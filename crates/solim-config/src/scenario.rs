//! Scenario files: scripted sequences of module frames.
//!
//! A scenario describes what a host would feed the module, one entry per
//! call to [`SolimModule::process`]. Each tick lists the columns' input
//! voltages and panel state, optional expander blocks and the random
//! expander's gates. Gates behave like real trigger inputs: a gate that stays
//! high over several ticks fires once.

use serde::{Deserialize, Serialize};
use solim_core::{
    DEFAULT_LOWER_LIMIT, DEFAULT_UPPER_LIMIT, MAX_COLUMNS, MAX_INPUTS, MAX_RESULTS, RandomSource,
    RandomTrigger,
};
use solim_module::{
    ColumnFrame, InputExpanderFrame, ModuleFrame, ModuleOutputs, OutputExpanderFrame,
    RandomColumnFrame, RandomFrame, SolimModule,
};
use std::path::Path;

use crate::error::ConfigError;
use crate::settings::ModuleSettings;
use crate::validation::{
    ValidationError, ValidationResult, parse_octave, parse_random_trigger, parse_resort_mode,
    parse_sort, parse_sort_relative, validate_repeat,
};

/// Gate voltage written for an active random action.
pub const GATE_HIGH: f32 = 10.0;

/// A scripted run of the module.
///
/// # TOML Format
///
/// ```toml
/// name = "Shuffle"
/// description = "Sorted chord, then shuffled"
/// seed = 7
///
/// [settings]
/// output_mode = "polyphonic"
/// process_rate = 1
///
/// [[ticks]]
/// random = []
/// [[ticks.columns]]
/// inputs = [0.0, 0.25, 0.583]
/// sort = "ascending"
///
/// [[ticks]]
/// random = [["all"]]
/// [[ticks.columns]]
/// inputs = [0.0, 0.25, 0.583]
/// sort = "ascending"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    /// Name of the scenario.
    pub name: String,

    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Random seed; entropy is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Module settings for the run.
    #[serde(default)]
    pub settings: ModuleSettings,

    /// Ticks in order.
    #[serde(default)]
    pub ticks: Vec<TickConfig>,
}

/// One call's worth of frame, possibly repeated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TickConfig {
    /// How many consecutive calls receive this frame.
    #[serde(default = "default_repeat")]
    pub repeat: u32,

    /// Random expander gates: per column, the actions whose gate is high.
    /// Absent means no random expander.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random: Option<Vec<Vec<String>>>,

    /// Columns from the left; missing columns are unconnected.
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

fn default_repeat() -> u32 {
    1
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            repeat: default_repeat(),
            random: None,
            columns: Vec::new(),
        }
    }
}

/// One column of a tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnConfig {
    /// Input voltages; empty means unconnected.
    #[serde(default)]
    pub inputs: Vec<f64>,

    /// Lower limit in volts.
    #[serde(default = "default_lower")]
    pub lower: f64,

    /// Upper limit in volts.
    #[serde(default = "default_upper")]
    pub upper: f64,

    /// `none`, `ascending` or `descending`.
    #[serde(default = "default_none")]
    pub sort: String,

    /// Input expander: octave duplicate per input.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub octaves: Vec<String>,

    /// Input expander: `before` or `after` per input.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort_relative: Vec<String>,

    /// Input expander: drop the original per input.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replace: Vec<bool>,

    /// Output expander, if attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<OutputConfig>,
}

fn default_lower() -> f64 {
    f64::from(DEFAULT_LOWER_LIMIT)
}

fn default_upper() -> f64 {
    f64::from(DEFAULT_UPPER_LIMIT)
}

fn default_none() -> String {
    "none".to_string()
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            lower: default_lower(),
            upper: default_upper(),
            sort: default_none(),
            octaves: Vec::new(),
            sort_relative: Vec::new(),
            replace: Vec::new(),
            outputs: None,
        }
    }
}

/// Output expander block of a column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OutputConfig {
    /// Octave directive per result position.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub octaves: Vec<String>,

    /// Drop the unshifted result per position.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replace: Vec<bool>,

    /// `none`, `connected` or `all`.
    #[serde(default = "default_none")]
    pub resort: String,

    /// Connected output ports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connected: Vec<bool>,
}

fn check_len(column: usize, what: &str, count: usize, max: usize) -> ValidationResult<()> {
    if count > max {
        Err(ValidationError::TooManyEntries {
            column,
            what: what.to_string(),
            count,
            max,
        })
    } else {
        Ok(())
    }
}

impl ColumnConfig {
    /// A column carrying `inputs` with everything else at defaults.
    pub fn with_inputs(inputs: impl Into<Vec<f64>>) -> Self {
        Self {
            inputs: inputs.into(),
            ..Self::default()
        }
    }

    fn has_input_expander(&self) -> bool {
        !(self.octaves.is_empty() && self.sort_relative.is_empty() && self.replace.is_empty())
    }

    /// Build the main-panel frame for column `index`.
    pub fn to_frame(&self, index: usize) -> ValidationResult<ColumnFrame> {
        check_len(index, "inputs", self.inputs.len(), MAX_INPUTS)?;
        let limits = [self.lower, self.upper];
        if let Some(&value) = self.inputs.iter().chain(&limits).find(|v| !v.is_finite()) {
            return Err(ValidationError::NonFiniteVoltage {
                column: index,
                value,
            });
        }

        let voltages: Vec<f32> = self.inputs.iter().map(|&v| v as f32).collect();
        let mut frame = ColumnFrame::with_voltages(&voltages);
        frame.lower_limit = self.lower as f32;
        frame.upper_limit = self.upper as f32;
        frame.sort = parse_sort(&self.sort)?;
        Ok(frame)
    }

    /// Build the input expander frame, if any flags are given.
    pub fn input_expander(&self, index: usize) -> ValidationResult<Option<InputExpanderFrame>> {
        if !self.has_input_expander() {
            return Ok(None);
        }
        let inputs = self.inputs.len();
        check_len(index, "input octaves", self.octaves.len(), inputs)?;
        check_len(
            index,
            "sort relative flags",
            self.sort_relative.len(),
            inputs,
        )?;
        check_len(index, "replace flags", self.replace.len(), inputs)?;

        let mut expander = InputExpanderFrame::default();
        for (slot, name) in expander.add_octave.iter_mut().zip(&self.octaves) {
            *slot = parse_octave(name)?;
        }
        for (slot, name) in expander.sort_relative.iter_mut().zip(&self.sort_relative) {
            *slot = parse_sort_relative(name)?;
        }
        for (slot, flag) in expander.replace_original.iter_mut().zip(&self.replace) {
            *slot = *flag;
        }
        Ok(Some(expander))
    }

    /// Build the output expander frame, if attached.
    pub fn output_expander(&self, index: usize) -> ValidationResult<Option<OutputExpanderFrame>> {
        let Some(outputs) = &self.outputs else {
            return Ok(None);
        };
        check_len(index, "output octaves", outputs.octaves.len(), MAX_RESULTS)?;
        check_len(
            index,
            "output replace flags",
            outputs.replace.len(),
            MAX_RESULTS,
        )?;
        check_len(
            index,
            "connected ports",
            outputs.connected.len(),
            MAX_RESULTS,
        )?;

        let mut expander = OutputExpanderFrame {
            resort_mode: parse_resort_mode(&outputs.resort)?,
            ..OutputExpanderFrame::default()
        };
        for (slot, name) in expander.octaves.iter_mut().zip(&outputs.octaves) {
            *slot = parse_octave(name)?;
        }
        for (slot, flag) in expander.replace_original.iter_mut().zip(&outputs.replace) {
            *slot = *flag;
        }
        for (slot, flag) in expander.connected.iter_mut().zip(&outputs.connected) {
            *slot = *flag;
        }
        Ok(Some(expander))
    }
}

fn random_column(actions: &[String]) -> ValidationResult<RandomColumnFrame> {
    let mut gates = RandomColumnFrame::default();
    for name in actions {
        match parse_random_trigger(name)? {
            RandomTrigger::None => {}
            RandomTrigger::Move => gates.move_trigger = GATE_HIGH,
            RandomTrigger::One => gates.one_trigger = GATE_HIGH,
            RandomTrigger::All => gates.all_trigger = GATE_HIGH,
            RandomTrigger::Reset => gates.reset_trigger = GATE_HIGH,
        }
    }
    Ok(gates)
}

impl TickConfig {
    /// Build the module frame for this tick.
    pub fn to_frame(&self) -> ValidationResult<ModuleFrame> {
        if self.columns.len() > MAX_COLUMNS {
            return Err(ValidationError::TooManyColumns {
                count: self.columns.len(),
                max: MAX_COLUMNS,
            });
        }

        let mut frame = ModuleFrame::default();
        for (index, column) in self.columns.iter().enumerate() {
            frame.columns[index] = column.to_frame(index)?;
            frame.input_expanders[index] = column.input_expander(index)?;
            frame.output_expanders[index] = column.output_expander(index)?;
        }

        if let Some(random) = &self.random {
            if random.len() > MAX_COLUMNS {
                return Err(ValidationError::TooManyColumns {
                    count: random.len(),
                    max: MAX_COLUMNS,
                });
            }
            let mut expander = RandomFrame::default();
            for (slot, actions) in expander.columns.iter_mut().zip(random) {
                *slot = random_column(actions)?;
            }
            frame.random = Some(expander);
        }
        Ok(frame)
    }
}

/// Outputs observed after one module call.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutput {
    /// Index of the tick in the scenario file.
    pub tick: usize,
    /// Repetition within the tick, from zero.
    pub repetition: u32,
    /// Output voltages per column, trailing silent columns trimmed.
    pub columns: Vec<Vec<f32>>,
}

impl StepOutput {
    fn capture(tick: usize, repetition: u32, outputs: &ModuleOutputs) -> Self {
        let mut columns: Vec<Vec<f32>> = (0..MAX_COLUMNS)
            .map(|i| outputs.column(i).to_vec())
            .collect();
        while columns.last().is_some_and(Vec::is_empty) {
            columns.pop();
        }
        Self {
            tick,
            repetition,
            columns,
        }
    }
}

impl Scenario {
    /// Create an empty scenario.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            seed: None,
            settings: ModuleSettings::default(),
            ticks: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Append a tick.
    pub fn with_tick(mut self, tick: TickConfig) -> Self {
        self.ticks.push(tick);
        self
    }

    /// Load a scenario from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a scenario from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the scenario to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the scenario to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Total number of module calls, repeats included.
    pub fn step_count(&self) -> usize {
        self.ticks.iter().map(|t| t.repeat as usize).sum()
    }

    /// Every frame in call order, repeats expanded.
    pub fn frames(&self) -> ValidationResult<Vec<ModuleFrame>> {
        let mut frames = Vec::new();
        for (index, tick) in self.ticks.iter().enumerate() {
            let frame = validate_repeat(tick.repeat)
                .and_then(|()| tick.to_frame())
                .map_err(|e| ValidationError::InTick {
                    tick: index,
                    error: Box::new(e),
                })?;
            frames.extend(std::iter::repeat_n(frame, tick.repeat as usize));
        }
        Ok(frames)
    }

    /// Feed every frame to `module` and collect the outputs after each call.
    ///
    /// The scenario's settings are applied first.
    pub fn run<S: RandomSource>(
        &self,
        module: &mut SolimModule<S>,
    ) -> Result<Vec<StepOutput>, ConfigError> {
        crate::validation::validate_scenario(self)?;
        self.settings.apply(module)?;

        let mut steps = Vec::new();
        for (index, tick) in self.ticks.iter().enumerate() {
            let frame = tick.to_frame()?;
            for repetition in 0..tick.repeat {
                let outputs = module.process(&frame);
                steps.push(StepOutput::capture(index, repetition, outputs));
            }
        }
        Ok(steps)
    }
}
