//! The two pure stages of the SOLIM pipeline.
//!
//! [`ValueTransform::process_values`] turns a lane's inputs into its output
//! set: fold into the limit window, inject octave duplicates, sort.
//! [`ValueTransform::process_results`] turns the output set into at most eight
//! result voltages: apply the permutation, inject per-position octaves, drop
//! replaced originals, optionally sort again.
//!
//! Both stages are deterministic functions of the fields compared by the
//! matching predicate on [`ColumnState`], which is what lets the double
//! buffer skip them.

use libm::floorf;

use crate::column::{ColumnState, MAX_INPUTS, MAX_OUTPUTS, MAX_RESULTS, ResortMode};
use crate::value::{Octave, SortOrder, SortRelative, Value, stable_sort_by};

/// Fractional parts this close to a whole octave count as zero.
pub const LIMIT_TOLERANCE: f32 = 1e-5;

/// Fold a voltage into `[lower, upper]` by whole octaves.
///
/// A value below `lower` keeps its fractional part but is re-anchored on
/// `floor(lower)`; if that is still below `lower` one octave is added. Values
/// above `upper` are handled the same way from the top. A single correction
/// step is applied: with a window narrower than one octave the result may
/// still lie outside it.
///
/// ```rust
/// use solim_core::limit_value_if;
///
/// assert!((limit_value_if(5.33, -1.0, 3.0) - 2.33).abs() < 1e-5);
/// assert_eq!(limit_value_if(10.0, -1.0, 3.0), 3.0);
/// assert_eq!(limit_value_if(-2.0, -1.0, 3.0), -1.0);
/// assert_eq!(limit_value_if(0.5, -1.0, 3.0), 0.5);
/// ```
pub fn limit_value_if(value: f32, lower: f32, upper: f32) -> f32 {
    if value < lower {
        let mut limited = floorf(lower) + octave_fraction(value);
        if limited < lower {
            limited += 1.0;
        }
        limited
    } else if value > upper {
        let mut limited = floorf(upper) + octave_fraction(value);
        if limited > upper {
            limited -= 1.0;
        }
        limited
    } else {
        value
    }
}

/// Fractional part in `[0, 1)`, snapping floor-rounding drift to zero.
#[inline]
fn octave_fraction(value: f32) -> f32 {
    let fraction = value - floorf(value);
    if 1.0 - fraction < LIMIT_TOLERANCE {
        0.0
    } else {
        fraction
    }
}

/// The pipeline's two computation stages.
///
/// Implementations must be pure with respect to the fields covered by
/// [`ColumnState::matches_inputs`] (for `process_values`) and
/// [`ColumnState::matches_outputs`] (for `process_results`).
pub trait ValueTransform {
    /// Derive `output_values` / `output_value_count` from the inputs.
    fn process_values(&mut self, column: &mut ColumnState);

    /// Derive `result_values` / `result_value_count` from the outputs.
    fn process_results(&mut self, column: &mut ColumnState);
}

impl<T: ValueTransform + ?Sized> ValueTransform for &mut T {
    fn process_values(&mut self, column: &mut ColumnState) {
        (**self).process_values(column);
    }

    fn process_results(&mut self, column: &mut ColumnState) {
        (**self).process_results(column);
    }
}

/// The production transform. Stateless.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolimValueTransform;

impl SolimValueTransform {
    /// Create the transform.
    pub const fn new() -> Self {
        Self
    }
}

impl ValueTransform for SolimValueTransform {
    fn process_values(&mut self, column: &mut ColumnState) {
        let count = column.input_value_count;
        assert!(
            count <= MAX_INPUTS,
            "input count {count} exceeds {MAX_INPUTS}"
        );

        let mut scratch = column.input_values;
        for value in &mut scratch[..count] {
            value.value = limit_value_if(value.value, column.lower_limit, column.upper_limit);
        }

        let mut outputs = OutputList::new(&mut column.output_values);
        for value in scratch[..count].iter().filter(|v| !v.replace_original) {
            outputs.push(Value {
                add_octave: Octave::None,
                ..*value
            });
        }
        for value in scratch[..count].iter().filter(|v| v.add_octave.is_shift()) {
            match value.sort_relative {
                SortRelative::Before => outputs.push(Value {
                    value: value.value + value.add_octave.offset(),
                    add_octave: Octave::None,
                    ..*value
                }),
                // shifted after sorting, below
                SortRelative::After => outputs.push(*value),
            }
        }
        let output_count = outputs.len();

        let sort = column.sort;
        let live = &mut column.output_values[..output_count];
        if sort != SortOrder::None {
            stable_sort_by(live, |a, b| sort.precedes(a.value, b.value));
        }
        for value in live.iter_mut().filter(|v| v.add_octave.is_shift()) {
            value.value += value.add_octave.offset();
            value.add_octave = Octave::None;
        }
        column.output_value_count = output_count;
    }

    fn process_results(&mut self, column: &mut ColumnState) {
        let size = column.output_value_count.min(MAX_RESULTS);
        debug_assert!(column.output_value_count <= MAX_OUTPUTS);

        let mut working = [0.0_f32; MAX_RESULTS];
        for (i, slot) in working[..size].iter_mut().enumerate() {
            let index = column.indices[i];
            debug_assert!(
                index < column.output_value_count,
                "permutation index {index} outside {} outputs",
                column.output_value_count
            );
            *slot = column.output_values[index].value;
        }

        let mut results = ResultList::new(&mut column.result_values);

        // Ascending and unsorted lanes grow downwards at the front; descending
        // lanes grow upwards.
        let mut octaves = if column.sort == SortOrder::Descending {
            Octave::Higher
        } else {
            Octave::Lower
        };
        for i in 0..size {
            if column.output_octaves[i] == octaves {
                results.push(working[i] + octaves.offset());
            }
        }
        for i in 0..size {
            if !column.output_replace_original[i] && !results.push(working[i]) {
                break;
            }
        }
        octaves = octaves.flipped();
        for i in 0..size {
            let shifted = working[i] + octaves.offset();
            if column.output_octaves[i] == octaves && !results.push(shifted) {
                break;
            }
        }

        let truncated = results.truncated();
        let result_count = results.len();
        column.result_value_count = result_count;

        if truncated || column.sort == SortOrder::None {
            return;
        }
        let sort = column.sort;
        let live = &mut column.result_values[..result_count];
        match column.resort_mode {
            ResortMode::None => {}
            ResortMode::All => stable_sort_by(live, |a, b| sort.precedes(*a, *b)),
            ResortMode::Connected => sort_connected(live, &column.output_connected, sort),
        }
    }
}

/// Sort only the results routed to connected ports; the rest stay put.
fn sort_connected(results: &mut [f32], connected: &[bool; MAX_RESULTS], sort: SortOrder) {
    let mut gathered = [0.0_f32; MAX_RESULTS];
    let mut count = 0;
    for (value, _) in results.iter().zip(connected).filter(|(_, c)| **c) {
        gathered[count] = *value;
        count += 1;
    }
    stable_sort_by(&mut gathered[..count], |a, b| sort.precedes(*a, *b));

    let mut sorted = gathered[..count].iter();
    for (value, _) in results.iter_mut().zip(connected).filter(|(_, c)| **c) {
        if let Some(next) = sorted.next() {
            *value = *next;
        }
    }
}

/// Append-only view over a lane's output array.
struct OutputList<'a> {
    values: &'a mut [Value; MAX_OUTPUTS],
    len: usize,
}

impl<'a> OutputList<'a> {
    fn new(values: &'a mut [Value; MAX_OUTPUTS]) -> Self {
        Self { values, len: 0 }
    }

    #[inline]
    fn push(&mut self, value: Value) {
        // at most MAX_INPUTS originals plus MAX_INPUTS duplicates
        self.values[self.len] = value;
        self.len += 1;
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// Append-only view over a lane's result array that refuses pushes past the cap.
struct ResultList<'a> {
    values: &'a mut [f32; MAX_RESULTS],
    len: usize,
    truncated: bool,
}

impl<'a> ResultList<'a> {
    fn new(values: &'a mut [f32; MAX_RESULTS]) -> Self {
        Self {
            values,
            len: 0,
            truncated: false,
        }
    }

    /// Returns false, and remembers the loss, when the list is already full.
    #[inline]
    fn push(&mut self, value: f32) -> bool {
        if self.len == MAX_RESULTS {
            self.truncated = true;
            return false;
        }
        self.values[self.len] = value;
        self.len += 1;
        true
    }

    fn len(&self) -> usize {
        self.len
    }

    fn truncated(&self) -> bool {
        self.truncated
    }
}
