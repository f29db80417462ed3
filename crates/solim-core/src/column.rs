//! Per-lane value sets and the predicates that gate recomputation.
//!
//! A [`ColumnState`] carries everything one lane needs for one tick: the
//! inputs written by the host, the intermediate output set, the permutation
//! and the final results. All storage is fixed-size; counts say how much of
//! each array is live.
//!
//! ## Match predicates
//!
//! [`ColumnState::matches_inputs`] and [`ColumnState::matches_outputs`]
//! compare exactly the fields that the two transform stages read. The double
//! buffer skips a stage whenever they report a match with the previous tick.

use crate::value::{Octave, SortOrder, Value};

/// Number of lanes in a bank.
pub const MAX_COLUMNS: usize = 8;
/// Input values per lane.
pub const MAX_INPUTS: usize = 8;
/// Output values per lane (every input may spawn one octave duplicate).
pub const MAX_OUTPUTS: usize = MAX_INPUTS * 2;
/// Result voltages per lane.
pub const MAX_RESULTS: usize = 8;

/// Identity permutation over all output slots.
pub const IDENTITY_INDICES: [usize; MAX_OUTPUTS] =
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

/// Default lower limit: the bottom of the ±10 V range.
pub const DEFAULT_LOWER_LIMIT: f32 = -10.0;
/// Default upper limit: the top of the ±10 V range.
pub const DEFAULT_UPPER_LIMIT: f32 = 10.0;

/// Which results get sorted again after octaving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResortMode {
    /// Results keep their permuted order.
    #[default]
    None,
    /// Only results routed to connected output ports are sorted among themselves.
    Connected,
    /// The whole result list is sorted.
    All,
}

/// One lane's state for one tick.
#[derive(Clone, Debug)]
pub struct ColumnState {
    /// Input values; the first `input_value_count` are live.
    pub input_values: [Value; MAX_INPUTS],
    /// Number of live inputs.
    pub input_value_count: usize,
    /// Lower folding bound in volts.
    pub lower_limit: f32,
    /// Upper folding bound in volts.
    pub upper_limit: f32,
    /// Sort applied to the output set (and to re-sorted results).
    pub sort: SortOrder,

    /// Output set; the first `output_value_count` are live.
    pub output_values: [Value; MAX_OUTPUTS],
    /// Number of live outputs.
    pub output_value_count: usize,
    /// Permutation used to read outputs into results.
    pub indices: [usize; MAX_OUTPUTS],

    /// Octave directive per result position.
    pub output_octaves: [Octave; MAX_RESULTS],
    /// Drop the unshifted value at this result position.
    pub output_replace_original: [bool; MAX_RESULTS],
    /// Re-sort policy for the result list.
    pub resort_mode: ResortMode,
    /// Connected output ports, read when `resort_mode` is `Connected`.
    pub output_connected: [bool; MAX_RESULTS],

    /// Result voltages; the first `result_value_count` are live.
    pub result_values: [f32; MAX_RESULTS],
    /// Number of live results.
    pub result_value_count: usize,
}

impl Default for ColumnState {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnState {
    /// An empty lane with identity permutation and the default ±10 V limits.
    pub const fn new() -> Self {
        Self {
            input_values: [Value::new(0.0); MAX_INPUTS],
            input_value_count: 0,
            lower_limit: DEFAULT_LOWER_LIMIT,
            upper_limit: DEFAULT_UPPER_LIMIT,
            sort: SortOrder::None,
            output_values: [Value::new(0.0); MAX_OUTPUTS],
            output_value_count: 0,
            indices: IDENTITY_INDICES,
            output_octaves: [Octave::None; MAX_RESULTS],
            output_replace_original: [false; MAX_RESULTS],
            resort_mode: ResortMode::None,
            output_connected: [false; MAX_RESULTS],
            result_values: [0.0; MAX_RESULTS],
            result_value_count: 0,
        }
    }

    /// Live inputs.
    #[inline]
    pub fn inputs(&self) -> &[Value] {
        &self.input_values[..self.input_value_count]
    }

    /// Live outputs.
    #[inline]
    pub fn outputs(&self) -> &[Value] {
        &self.output_values[..self.output_value_count]
    }

    /// Live results.
    #[inline]
    pub fn results(&self) -> &[f32] {
        &self.result_values[..self.result_value_count]
    }

    /// Replace the live inputs.
    ///
    /// # Panics
    /// Panics if more than [`MAX_INPUTS`] values are given.
    pub fn set_inputs(&mut self, values: &[Value]) {
        assert!(
            values.len() <= MAX_INPUTS,
            "column holds at most {MAX_INPUTS} inputs, got {}",
            values.len()
        );
        self.input_values[..values.len()].copy_from_slice(values);
        self.input_value_count = values.len();
    }

    /// Set the folding window.
    #[inline]
    pub fn set_limits(&mut self, lower: f32, upper: f32) {
        self.lower_limit = lower;
        self.upper_limit = upper;
    }

    /// Reset the permutation to identity.
    #[inline]
    pub fn reset_indices(&mut self) {
        self.indices = IDENTITY_INDICES;
    }

    /// True when the permutation is the identity.
    #[inline]
    pub fn has_identity_indices(&self) -> bool {
        self.indices == IDENTITY_INDICES
    }

    /// Clear the result-stage directives (octaves, replace flags, resort, connections).
    pub fn clear_output_directives(&mut self) {
        self.output_octaves = [Octave::None; MAX_RESULTS];
        self.output_replace_original = [false; MAX_RESULTS];
        self.resort_mode = ResortMode::None;
        self.output_connected = [false; MAX_RESULTS];
    }

    /// Input-equivalence: the output set derived from `self` would equal the
    /// one derived from `other`.
    ///
    /// Two lanes without inputs always match, whatever their limits or sort.
    pub fn matches_inputs(&self, other: &ColumnState) -> bool {
        if self.input_value_count == 0 && other.input_value_count == 0 {
            return true;
        }
        self.input_value_count == other.input_value_count
            && self.lower_limit == other.lower_limit
            && self.upper_limit == other.upper_limit
            && self.sort == other.sort
            && self.inputs() == other.inputs()
    }

    /// Output-equivalence: the results derived from `self` would equal the
    /// ones derived from `other`.
    ///
    /// `sort` is part of the comparison because result octaving and
    /// re-sorting both read it. The connection snapshot only counts when
    /// `resort_mode` is [`ResortMode::Connected`].
    pub fn matches_outputs(&self, other: &ColumnState) -> bool {
        if self.output_value_count == 0 && other.output_value_count == 0 {
            return true;
        }
        self.output_value_count == other.output_value_count
            && self.sort == other.sort
            && self.indices == other.indices
            && self.output_octaves == other.output_octaves
            && self.output_replace_original == other.output_replace_original
            && self.resort_mode == other.resort_mode
            && (self.resort_mode != ResortMode::Connected
                || self.output_connected == other.output_connected)
            && self.outputs() == other.outputs()
    }

    /// Take over `other`'s output set verbatim.
    #[inline]
    pub fn copy_outputs_from(&mut self, other: &ColumnState) {
        let count = other.output_value_count;
        self.output_values[..count].copy_from_slice(&other.output_values[..count]);
        self.output_value_count = count;
    }

    /// Take over `other`'s results verbatim.
    #[inline]
    pub fn copy_results_from(&mut self, other: &ColumnState) {
        let count = other.result_value_count;
        self.result_values[..count].copy_from_slice(&other.result_values[..count]);
        self.result_value_count = count;
    }
}

/// A bank of lanes.
pub type Bank = [ColumnState; MAX_COLUMNS];

/// A bank with every lane empty.
pub const fn empty_bank() -> Bank {
    [const { ColumnState::new() }; MAX_COLUMNS]
}
