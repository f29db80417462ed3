//! The double-buffered SOLIM core.
//!
//! [`SolimCore`] owns two banks of lanes. The host writes the next tick's
//! inputs into the inactive bank, calls
//! [`process_and_activate_inactive_values`](SolimCore::process_and_activate_inactive_values),
//! and reads the results from the active bank. Each stage of the pipeline is
//! skipped for a lane whose stage inputs are unchanged since the previous
//! tick; the previous bank's outputs or results are copied instead.
//!
//! ## Stale lanes
//!
//! Lanes at or past `column_count` are not processed at all. They keep
//! whatever the host wrote into them and must not be read as current. The
//! randomizer may still reset their permutations, so a lane that comes back
//! into range is always recomputed on its first tick instead of being matched
//! against the previous bank.

use crate::column::{Bank, ColumnState, MAX_COLUMNS, empty_bank};
use crate::random::SmallRngSource;
use crate::randomizer::{RandomTrigger, Randomizer, SolimRandomizer};
use crate::transform::{SolimValueTransform, ValueTransform};

/// Double-buffered pipeline over up to [`MAX_COLUMNS`] lanes.
///
/// # Example
///
/// ```rust
/// use solim_core::{SolimCore, Value, SortOrder};
///
/// let mut core = SolimCore::from_seed(1);
/// let column = core.inactive_values_mut(0);
/// column.set_inputs(&[Value::new(5.33), Value::new(0.5)]);
/// column.set_limits(-1.0, 3.0);
/// column.sort = SortOrder::Ascending;
///
/// core.process_and_activate_inactive_values(1, None);
///
/// let results = core.active_values(0).results();
/// assert_eq!(results.len(), 2);
/// assert_eq!(results[0], 0.5);
/// assert!((results[1] - 2.33).abs() < 1e-5);
/// ```
#[derive(Debug, Clone)]
pub struct SolimCore<T = SolimValueTransform, R = SolimRandomizer<SmallRngSource>> {
    banks: [Bank; 2],
    active: usize,
    /// `column_count` of the last tick.
    previous_column_count: usize,
    transform: T,
    randomizer: R,
}

impl SolimCore {
    /// Production core with a deterministic random seed.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_parts(
            SolimValueTransform,
            SolimRandomizer::new(SmallRngSource::seed_from_u64(seed)),
        )
    }

    /// Production core seeded from OS entropy.
    #[cfg(feature = "std")]
    pub fn new() -> Self {
        Self::with_parts(
            SolimValueTransform,
            SolimRandomizer::new(SmallRngSource::from_entropy()),
        )
    }
}

#[cfg(feature = "std")]
impl Default for SolimCore {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ValueTransform, R: Randomizer> SolimCore<T, R> {
    /// Core with injected stages.
    pub fn with_parts(transform: T, randomizer: R) -> Self {
        Self {
            banks: [empty_bank(), empty_bank()],
            active: 0,
            previous_column_count: 0,
            transform,
            randomizer,
        }
    }

    /// Lane `index` of the bank published by the last tick.
    ///
    /// # Panics
    /// Panics if `index >= MAX_COLUMNS`.
    #[inline]
    pub fn active_values(&self, index: usize) -> &ColumnState {
        &self.banks[self.active][index]
    }

    /// Lane `index` of the bank being prepared.
    #[inline]
    pub fn inactive_values(&self, index: usize) -> &ColumnState {
        &self.banks[1 - self.active][index]
    }

    /// Mutable lane `index` of the bank being prepared. The host writes inputs here.
    #[inline]
    pub fn inactive_values_mut(&mut self, index: usize) -> &mut ColumnState {
        &mut self.banks[1 - self.active][index]
    }

    /// Run one tick over the first `column_count` lanes and publish the result.
    ///
    /// `triggers` is `None` when randomization is not available this tick.
    ///
    /// # Panics
    /// Panics if `column_count > MAX_COLUMNS`.
    pub fn process_and_activate_inactive_values(
        &mut self,
        column_count: usize,
        triggers: Option<&[RandomTrigger; MAX_COLUMNS]>,
    ) {
        assert!(
            column_count <= MAX_COLUMNS,
            "column count {column_count} exceeds {MAX_COLUMNS}"
        );

        let [first, second] = &mut self.banks;
        let (old, new) = if self.active == 0 {
            (&*first, second)
        } else {
            (&*second, first)
        };

        let carried = self.previous_column_count;

        for (i, (column, previous)) in new.iter_mut().zip(old).take(column_count).enumerate() {
            if i < carried && column.matches_inputs(previous) {
                column.copy_outputs_from(previous);
            } else {
                self.transform.process_values(column);
            }
        }

        self.randomizer.process(column_count, triggers, old, new);

        for (i, (column, previous)) in new.iter_mut().zip(old).take(column_count).enumerate() {
            if i < carried && column.matches_outputs(previous) {
                column.copy_results_from(previous);
            } else {
                self.transform.process_results(column);
            }
        }

        self.previous_column_count = column_count;
        self.active = 1 - self.active;
    }

    /// Back to the freshly constructed state: empty lanes, identity permutations.
    pub fn reset(&mut self) {
        self.banks = [empty_bank(), empty_bank()];
        self.active = 0;
        self.previous_column_count = 0;
        self.randomizer.reset();
    }

    /// The value transform.
    pub fn transform(&self) -> &T {
        &self.transform
    }

    /// Mutable access to the value transform.
    pub fn transform_mut(&mut self) -> &mut T {
        &mut self.transform
    }

    /// The randomizer.
    pub fn randomizer(&self) -> &R {
        &self.randomizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Octave, SortOrder, Value};

    #[derive(Default)]
    struct Counting {
        values: usize,
        results: usize,
    }

    impl ValueTransform for Counting {
        fn process_values(&mut self, column: &mut ColumnState) {
            self.values += 1;
            SolimValueTransform.process_values(column);
        }

        fn process_results(&mut self, column: &mut ColumnState) {
            self.results += 1;
            SolimValueTransform.process_results(column);
        }
    }

    fn counting_core() -> SolimCore<Counting> {
        SolimCore::with_parts(
            Counting::default(),
            SolimRandomizer::new(SmallRngSource::seed_from_u64(0)),
        )
    }

    fn write_inputs<T: ValueTransform, R: Randomizer>(
        core: &mut SolimCore<T, R>,
        index: usize,
        values: &[f32],
    ) {
        let column = core.inactive_values_mut(index);
        for (slot, value) in column.input_values.iter_mut().zip(values) {
            *slot = Value::new(*value);
        }
        column.input_value_count = values.len();
    }

    #[test]
    fn tick_publishes_results() {
        let mut core = counting_core();
        write_inputs(&mut core, 0, &[0.25, 0.5]);
        core.process_and_activate_inactive_values(1, None);
        assert_eq!(core.active_values(0).results(), &[0.25, 0.5]);
        assert_eq!(core.transform().values, 1);
        assert_eq!(core.transform().results, 1);
    }

    #[test]
    fn unchanged_tick_skips_both_stages() {
        let mut core = counting_core();
        write_inputs(&mut core, 0, &[0.25, 0.5]);
        core.process_and_activate_inactive_values(1, None);
        write_inputs(&mut core, 0, &[0.25, 0.5]);
        core.process_and_activate_inactive_values(1, None);

        assert_eq!(core.transform().values, 1);
        assert_eq!(core.transform().results, 1);
        assert_eq!(core.active_values(0).results(), &[0.25, 0.5]);
    }

    #[test]
    fn result_directive_change_reruns_results_only() {
        let mut core = counting_core();
        write_inputs(&mut core, 0, &[0.25]);
        core.process_and_activate_inactive_values(1, None);

        write_inputs(&mut core, 0, &[0.25]);
        core.inactive_values_mut(0).output_octaves[0] = Octave::Higher;
        core.process_and_activate_inactive_values(1, None);

        assert_eq!(core.transform().values, 1);
        assert_eq!(core.transform().results, 2);
        assert_eq!(core.active_values(0).results(), &[0.25, 1.25]);
    }

    #[test]
    fn sort_flip_with_identical_outputs_reruns_results() {
        let mut core = counting_core();
        write_inputs(&mut core, 0, &[0.5]);
        core.inactive_values_mut(0).output_octaves[0] = Octave::Higher;
        core.inactive_values_mut(0).sort = SortOrder::Ascending;
        core.process_and_activate_inactive_values(1, None);
        assert_eq!(core.active_values(0).results(), &[0.5, 1.5]);

        write_inputs(&mut core, 0, &[0.5]);
        core.inactive_values_mut(0).output_octaves[0] = Octave::Higher;
        core.inactive_values_mut(0).sort = SortOrder::Descending;
        core.process_and_activate_inactive_values(1, None);
        assert_eq!(core.active_values(0).results(), &[1.5, 0.5]);
    }

    #[test]
    fn lanes_past_count_are_untouched() {
        let mut core = counting_core();
        write_inputs(&mut core, 0, &[0.1]);
        write_inputs(&mut core, 3, &[0.9]);
        core.process_and_activate_inactive_values(1, None);
        assert_eq!(core.active_values(3).result_value_count, 0);
        assert_eq!(core.active_values(3).input_value_count, 1);
        assert_eq!(core.transform().values, 1);
    }

    #[test]
    fn returning_lane_is_recomputed() {
        let mut core = counting_core();
        for count in [2, 1, 2] {
            write_inputs(&mut core, 0, &[0.1]);
            write_inputs(&mut core, 1, &[0.9]);
            core.process_and_activate_inactive_values(count, None);
        }
        // lane 1: first tick, then again on return
        assert_eq!(core.transform().values, 3);
        assert_eq!(core.transform().results, 3);
        assert_eq!(core.active_values(1).results(), &[0.9]);
    }

    #[test]
    fn banks_alternate() {
        let mut core = counting_core();
        write_inputs(&mut core, 0, &[0.1]);
        core.process_and_activate_inactive_values(1, None);
        write_inputs(&mut core, 0, &[0.2]);
        assert_eq!(core.active_values(0).results(), &[0.1]);
        assert_eq!(core.inactive_values(0).inputs(), &[Value::new(0.2)]);
        core.process_and_activate_inactive_values(1, None);
        assert_eq!(core.active_values(0).results(), &[0.2]);
    }

    #[test]
    fn reset_clears_everything() {
        let mut core = SolimCore::from_seed(3);
        write_inputs(&mut core, 0, &[0.1, 0.2, 0.3]);
        let triggers = [RandomTrigger::All; MAX_COLUMNS];
        core.process_and_activate_inactive_values(1, Some(&triggers));
        write_inputs(&mut core, 0, &[0.1, 0.2, 0.3]);
        core.process_and_activate_inactive_values(1, Some(&triggers));

        core.reset();
        assert_eq!(core.active_values(0).result_value_count, 0);
        assert!(core.active_values(0).has_identity_indices());
        assert!(core.inactive_values(0).has_identity_indices());
        assert!(!core.randomizer().previous_was_random());
    }

    #[test]
    #[should_panic]
    fn too_many_columns_panics() {
        let mut core = SolimCore::from_seed(0);
        core.process_and_activate_inactive_values(MAX_COLUMNS + 1, None);
    }
}
