//! The SOLIM module: frames in, polyphonic voltages out.
//!
//! [`SolimModule`] is the host-facing wrapper around [`SolimCore`]. Each call
//! to [`process`](SolimModule::process) edge-detects the random expander's
//! triggers; every `process_rate`-th call it also copies the frame into the
//! core's inactive bank, runs one tick and publishes the results.
//!
//! # Example
//!
//! ```rust
//! use solim_module::{ColumnFrame, ModuleFrame, OutputMode, SolimModule};
//! use solim_core::SortOrder;
//!
//! let mut module = SolimModule::from_seed(0);
//! let mut frame = ModuleFrame::default();
//! frame.columns[0] = ColumnFrame::with_voltages(&[0.7, 0.2]);
//! frame.columns[0].sort = SortOrder::Ascending;
//!
//! let outputs = module.process(&frame);
//! assert_eq!(outputs.column(0), &[0.2, 0.7]);
//!
//! module.set_output_mode(OutputMode::Monophonic);
//! assert_eq!(module.process(&frame).column(0), &[0.2]);
//! ```

use solim_core::{
    ColumnState, MAX_COLUMNS, MAX_RESULTS, RandomSource, RandomTrigger, SmallRngSource, SolimCore,
    SolimRandomizer, SolimValueTransform, Value,
};

use crate::frame::{ColumnFrame, InputExpanderFrame, ModuleFrame, OutputExpanderFrame};
use crate::trigger::ColumnTriggers;

/// Largest accepted process-rate divisor.
pub const MAX_PROCESS_RATE: u32 = 4096;

/// How results are written to a column's output port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputMode {
    /// Every result becomes one channel.
    #[default]
    Polyphonic,
    /// Only the first result is written.
    Monophonic,
}

/// Output voltages of one column.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColumnOutput {
    voltages: [f32; MAX_RESULTS],
    channels: usize,
}

impl ColumnOutput {
    /// Live channels.
    #[inline]
    pub fn voltages(&self) -> &[f32] {
        &self.voltages[..self.channels]
    }

    /// Channel count of the output cable.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    fn write(&mut self, results: &[f32], mode: OutputMode) {
        let channels = match mode {
            OutputMode::Polyphonic => results.len(),
            OutputMode::Monophonic => results.len().min(1),
        };
        self.voltages[..channels].copy_from_slice(&results[..channels]);
        self.channels = channels;
    }

    fn clear(&mut self) {
        self.channels = 0;
    }
}

/// Output ports of all columns.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ModuleOutputs {
    /// Per-column outputs.
    pub columns: [ColumnOutput; MAX_COLUMNS],
}

impl ModuleOutputs {
    /// Live voltages of column `index`.
    ///
    /// # Panics
    /// Panics if `index >= MAX_COLUMNS`.
    #[inline]
    pub fn column(&self, index: usize) -> &[f32] {
        self.columns[index].voltages()
    }
}

/// Production core type used by the module.
pub type ModuleCore<S> = SolimCore<SolimValueTransform, SolimRandomizer<S>>;

/// The SOLIM module.
#[derive(Debug, Clone)]
pub struct SolimModule<S: RandomSource = SmallRngSource> {
    core: ModuleCore<S>,
    output_mode: OutputMode,
    process_rate: u32,
    /// Calls since the last core tick.
    divider: u32,
    triggers: [ColumnTriggers; MAX_COLUMNS],
    outputs: ModuleOutputs,
}

impl SolimModule {
    /// Module with a deterministic random seed.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_source(SmallRngSource::seed_from_u64(seed))
    }

    /// Module seeded from OS entropy.
    #[cfg(feature = "std")]
    pub fn new() -> Self {
        Self::with_source(SmallRngSource::from_entropy())
    }
}

#[cfg(feature = "std")]
impl Default for SolimModule {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RandomSource> SolimModule<S> {
    /// Module drawing randomness from `source`.
    pub fn with_source(source: S) -> Self {
        Self {
            core: SolimCore::with_parts(SolimValueTransform::new(), SolimRandomizer::new(source)),
            output_mode: OutputMode::Polyphonic,
            process_rate: 1,
            divider: 0,
            triggers: [ColumnTriggers::default(); MAX_COLUMNS],
            outputs: ModuleOutputs::default(),
        }
    }

    /// Current output mode.
    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Switch output mode. Takes effect on the next core tick.
    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    /// Current process-rate divisor.
    pub fn process_rate(&self) -> u32 {
        self.process_rate
    }

    /// Run the core on every `rate`-th call. Clamped to `1..=MAX_PROCESS_RATE`.
    pub fn set_process_rate(&mut self, rate: u32) {
        self.process_rate = rate.clamp(1, MAX_PROCESS_RATE);
        self.divider = 0;
        #[cfg(feature = "tracing")]
        tracing::debug!(rate = self.process_rate, "process rate changed");
    }

    /// The wrapped core.
    pub fn core(&self) -> &ModuleCore<S> {
        &self.core
    }

    /// Outputs published by the last core tick.
    pub fn outputs(&self) -> &ModuleOutputs {
        &self.outputs
    }

    /// Process one call's worth of frame.
    ///
    /// Returns the current outputs; on calls skipped by the process-rate
    /// divider these are the previous tick's.
    pub fn process(&mut self, frame: &ModuleFrame) -> &ModuleOutputs {
        if let Some(random) = &frame.random {
            for (triggers, column) in self.triggers.iter_mut().zip(&random.columns) {
                triggers.process(column);
            }
        }

        let due = self.divider == 0;
        self.divider = (self.divider + 1) % self.process_rate;
        if due {
            self.tick(frame);
        }
        &self.outputs
    }

    fn tick(&mut self, frame: &ModuleFrame) {
        let column_count = frame.column_count();

        for (i, column) in frame.columns.iter().enumerate().take(column_count) {
            write_column(
                self.core.inactive_values_mut(i),
                column,
                frame.input_expanders[i].as_ref(),
                frame.output_expanders[i].as_ref(),
            );
        }

        let mut pending = [RandomTrigger::None; MAX_COLUMNS];
        let triggers = if frame.random.is_some() {
            for (slot, column) in pending.iter_mut().zip(self.triggers.iter_mut()) {
                *slot = column.take();
            }
            Some(&pending)
        } else {
            for column in &mut self.triggers {
                column.reset();
            }
            None
        };

        self.core.process_and_activate_inactive_values(column_count, triggers);

        for (i, output) in self.outputs.columns.iter_mut().enumerate() {
            if i < column_count {
                output.write(self.core.active_values(i).results(), self.output_mode);
            } else {
                output.clear();
            }
        }
    }

    /// Back to the freshly constructed state. Settings are kept.
    pub fn reset(&mut self) {
        self.core.reset();
        self.divider = 0;
        for column in &mut self.triggers {
            column.reset();
        }
        self.outputs = ModuleOutputs::default();
    }
}

/// Copy one column's frame into a lane of the inactive bank.
fn write_column(
    state: &mut ColumnState,
    column: &ColumnFrame,
    input_expander: Option<&InputExpanderFrame>,
    output_expander: Option<&OutputExpanderFrame>,
) {
    let live = column.live();
    for (i, (slot, voltage)) in state.input_values.iter_mut().zip(live).enumerate() {
        let mut value = Value::new(*voltage);
        if let Some(expander) = input_expander {
            value = value.with_octave(expander.add_octave[i], expander.sort_relative[i]);
            value.replace_original = expander.replace_original[i];
        }
        *slot = value;
    }
    state.input_value_count = live.len();

    let (lower, upper) = column.ordered_limits();
    state.set_limits(lower, upper);
    state.sort = column.sort;

    match output_expander {
        Some(expander) => {
            state.output_octaves = expander.octaves;
            state.output_replace_original = expander.replace_original;
            state.resort_mode = expander.resort_mode;
            state.output_connected = expander.connected;
        }
        None => state.clear_output_directives(),
    }
}
