//! One sample's worth of port voltages and expander state.
//!
//! A host fills a [`ModuleFrame`] per call to
//! [`SolimModule::process`](crate::SolimModule::process). Expander blocks are
//! optional: `None` means the expander is not attached to that column, and a
//! missing [`RandomFrame`] means the random expander is absent altogether.

use solim_core::{
    DEFAULT_LOWER_LIMIT, DEFAULT_UPPER_LIMIT, MAX_COLUMNS, MAX_INPUTS, MAX_RESULTS, Octave,
    ResortMode, SortOrder, SortRelative,
};

/// Main-panel state of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnFrame {
    /// Polyphonic input voltages; the first `channels` are live.
    pub voltages: [f32; MAX_INPUTS],
    /// Channel count of the input cable. Zero means unconnected.
    pub channels: usize,
    /// Lower limit in volts.
    pub lower_limit: f32,
    /// Upper limit in volts.
    pub upper_limit: f32,
    /// Sort switch.
    pub sort: SortOrder,
}

impl Default for ColumnFrame {
    fn default() -> Self {
        Self {
            voltages: [0.0; MAX_INPUTS],
            channels: 0,
            lower_limit: DEFAULT_LOWER_LIMIT,
            upper_limit: DEFAULT_UPPER_LIMIT,
            sort: SortOrder::None,
        }
    }
}

impl ColumnFrame {
    /// A connected column carrying `voltages`, default limits, unsorted.
    ///
    /// Voltages past [`MAX_INPUTS`] are ignored.
    ///
    /// ```rust
    /// use solim_module::ColumnFrame;
    ///
    /// let column = ColumnFrame::with_voltages(&[0.5, 1.25]);
    /// assert_eq!(column.channels, 2);
    /// assert_eq!(column.live(), &[0.5, 1.25]);
    /// ```
    pub fn with_voltages(voltages: &[f32]) -> Self {
        let mut column = Self::default();
        column.set_voltages(voltages);
        column
    }

    /// Replace the input voltages and channel count.
    pub fn set_voltages(&mut self, voltages: &[f32]) {
        let channels = voltages.len().min(MAX_INPUTS);
        self.voltages[..channels].copy_from_slice(&voltages[..channels]);
        self.channels = channels;
    }

    /// Live voltages, with the channel count clamped to [`MAX_INPUTS`].
    pub fn live(&self) -> &[f32] {
        &self.voltages[..self.channels.min(MAX_INPUTS)]
    }

    /// True when a cable is plugged in.
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.channels > 0
    }

    /// Limits in ascending order.
    #[inline]
    pub fn ordered_limits(&self) -> (f32, f32) {
        if self.lower_limit > self.upper_limit {
            (self.upper_limit, self.lower_limit)
        } else {
            (self.lower_limit, self.upper_limit)
        }
    }
}

/// Per-input flags from an input expander.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputExpanderFrame {
    /// Octave duplicate per input.
    pub add_octave: [Octave; MAX_INPUTS],
    /// Whether each duplicate is shifted before or after sorting.
    pub sort_relative: [SortRelative; MAX_INPUTS],
    /// Drop the unshifted original.
    pub replace_original: [bool; MAX_INPUTS],
}

/// Per-output directives from an output expander.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputExpanderFrame {
    /// Octave directive per result position.
    pub octaves: [Octave; MAX_RESULTS],
    /// Drop the unshifted result at this position.
    pub replace_original: [bool; MAX_RESULTS],
    /// Re-sort policy.
    pub resort_mode: ResortMode,
    /// Which of the expander's output ports have cables.
    pub connected: [bool; MAX_RESULTS],
}

/// Trigger voltages of one column on the random expander.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RandomColumnFrame {
    /// Swap with a neighbour.
    pub move_trigger: f32,
    /// Swap two positions.
    pub one_trigger: f32,
    /// Shuffle everything.
    pub all_trigger: f32,
    /// Back to identity.
    pub reset_trigger: f32,
}

/// The random expander.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RandomFrame {
    /// Trigger voltages per column.
    pub columns: [RandomColumnFrame; MAX_COLUMNS],
}

/// Everything the module reads on one call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ModuleFrame {
    /// Main-panel columns.
    pub columns: [ColumnFrame; MAX_COLUMNS],
    /// Input expander per column, if attached.
    pub input_expanders: [Option<InputExpanderFrame>; MAX_COLUMNS],
    /// Output expander per column, if attached.
    pub output_expanders: [Option<OutputExpanderFrame>; MAX_COLUMNS],
    /// Random expander, if attached.
    pub random: Option<RandomFrame>,
}

impl ModuleFrame {
    /// Number of columns the core has to process: one past the last
    /// connected column, and never less than one.
    ///
    /// ```rust
    /// use solim_module::{ColumnFrame, ModuleFrame};
    ///
    /// let mut frame = ModuleFrame::default();
    /// assert_eq!(frame.column_count(), 1);
    /// frame.columns[3] = ColumnFrame::with_voltages(&[1.0]);
    /// assert_eq!(frame.column_count(), 4);
    /// ```
    pub fn column_count(&self) -> usize {
        self.columns
            .iter()
            .rposition(ColumnFrame::is_connected)
            .map_or(1, |last| last + 1)
    }
}
