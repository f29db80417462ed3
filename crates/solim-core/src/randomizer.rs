//! Per-lane permutation management.
//!
//! The randomizer decides, tick by tick, which permutation each lane reads its
//! outputs through. Permutations are carried across ticks through the double
//! buffer: every call gets the previous tick's bank (`old`) and the bank being
//! prepared (`new`), and writes `new[i].indices`.
//!
//! ## Lifecycle
//!
//! - The first tick with triggers present resets every lane to identity and
//!   applies no trigger. Randomization starts on the following tick.
//! - While triggers stay present, permutations are copied forward, repaired
//!   when a lane's output set shrank, and then modified by the lane's trigger.
//! - When triggers disappear, every lane goes back to identity. The reset is
//!   repeated on the next tick so that both banks end up at identity.

use crate::column::{Bank, IDENTITY_INDICES, MAX_COLUMNS, MAX_OUTPUTS};
use crate::random::{RandomSource, SmallRngSource};

/// Per-lane randomization request for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RandomTrigger {
    /// Leave the permutation alone.
    #[default]
    None,
    /// Swap one random position with a neighbour.
    Move,
    /// Swap two distinct random positions.
    One,
    /// Shuffle every live position.
    All,
    /// Back to identity.
    Reset,
}

/// Maintains permutation indices across ticks.
pub trait Randomizer {
    /// Update `new[i].indices` for this tick.
    ///
    /// `triggers` is `None` when the randomization feature is absent.
    /// `new[i].output_value_count` is already final when this is called.
    fn process(
        &mut self,
        column_count: usize,
        triggers: Option<&[RandomTrigger; MAX_COLUMNS]>,
        old: &Bank,
        new: &mut Bank,
    );

    /// Forget everything carried between ticks.
    fn reset(&mut self) {}
}

impl<R: Randomizer + ?Sized> Randomizer for &mut R {
    fn process(
        &mut self,
        column_count: usize,
        triggers: Option<&[RandomTrigger; MAX_COLUMNS]>,
        old: &Bank,
        new: &mut Bank,
    ) {
        (**self).process(column_count, triggers, old, new);
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

/// The production randomizer.
#[derive(Debug, Clone)]
pub struct SolimRandomizer<S = SmallRngSource> {
    source: S,
    previous_was_random: bool,
    previous_column_count: usize,
    /// The other bank still holds permutations from the last randomized tick.
    identity_pending: bool,
}

impl<S: RandomSource> SolimRandomizer<S> {
    /// Create a randomizer drawing from `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            previous_was_random: false,
            previous_column_count: 0,
            identity_pending: false,
        }
    }

    /// Whether the previous tick had triggers present.
    pub fn previous_was_random(&self) -> bool {
        self.previous_was_random
    }

    /// Lane count seen on the previous tick.
    pub fn previous_column_count(&self) -> usize {
        self.previous_column_count
    }

    /// The random source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    fn apply_trigger(
        &mut self,
        trigger: RandomTrigger,
        indices: &mut [usize; MAX_OUTPUTS],
        count: usize,
    ) {
        match trigger {
            RandomTrigger::None => {}
            RandomTrigger::Reset => *indices = IDENTITY_INDICES,
            RandomTrigger::All => shuffle(&mut self.source, &mut indices[..count]),
            RandomTrigger::One => {
                if let Some((a, b)) = pick_distinct(&mut self.source, count) {
                    indices.swap(a, b);
                }
            }
            RandomTrigger::Move => {
                if let Some((a, b)) = pick_neighbours(&mut self.source, count) {
                    indices.swap(a, b);
                }
            }
        }
    }
}

impl<S: RandomSource> Randomizer for SolimRandomizer<S> {
    fn process(
        &mut self,
        column_count: usize,
        triggers: Option<&[RandomTrigger; MAX_COLUMNS]>,
        old: &Bank,
        new: &mut Bank,
    ) {
        assert!(
            column_count <= MAX_COLUMNS,
            "column count {column_count} exceeds {MAX_COLUMNS}"
        );

        match triggers {
            Some(_) if !self.previous_was_random => {
                #[cfg(feature = "tracing")]
                tracing::debug!("randomizer: enabled, starting from identity");
                for column in new.iter_mut() {
                    column.reset_indices();
                }
                self.identity_pending = false;
            }
            Some(triggers) => {
                for (i, (column, previous)) in new
                    .iter_mut()
                    .zip(old.iter())
                    .take(column_count)
                    .enumerate()
                {
                    if i >= self.previous_column_count {
                        column.reset_indices();
                    } else {
                        column.indices = previous.indices;
                        if previous.output_value_count > column.output_value_count {
                            restore_last_indices(&mut column.indices, column.output_value_count);
                        }
                    }
                    let count = column.output_value_count;
                    self.apply_trigger(triggers[i], &mut column.indices, count);
                }
            }
            None => {
                if self.previous_was_random || self.identity_pending {
                    #[cfg(feature = "tracing")]
                    if self.previous_was_random {
                        tracing::debug!("randomizer: disabled, back to identity");
                    }
                    for column in new.iter_mut() {
                        column.reset_indices();
                    }
                }
                self.identity_pending = self.previous_was_random;
            }
        }

        self.previous_column_count = column_count;
        self.previous_was_random = triggers.is_some();
    }

    fn reset(&mut self) {
        self.previous_was_random = false;
        self.previous_column_count = 0;
        self.identity_pending = false;
    }
}

/// Put every index at or past `count` back on its own slot.
///
/// Walks from the last slot down to `count`. Where a slot holds a foreign
/// index, the slot's own index is fetched from an earlier position by a swap.
/// Afterwards `indices[count..]` is the identity and `indices[..count]` is a
/// permutation of `0..count` whose relative order follows the input.
///
/// ```rust
/// use solim_core::restore_last_indices;
///
/// let mut indices = [3, 0, 1, 2, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
/// restore_last_indices(&mut indices, 2);
/// assert_eq!(&indices[..4], &[1, 0, 2, 3]);
/// ```
pub fn restore_last_indices(indices: &mut [usize; MAX_OUTPUTS], count: usize) {
    for position in (count..MAX_OUTPUTS).rev() {
        if indices[position] == position {
            continue;
        }
        if let Some(found) = indices[..position].iter().position(|&i| i == position) {
            indices.swap(found, position);
        }
    }
}

/// Fisher-Yates over `indices`.
fn shuffle<S: RandomSource>(source: &mut S, indices: &mut [usize]) {
    for i in (1..indices.len()).rev() {
        let j = source.uniform(0, i);
        indices.swap(i, j);
    }
}

/// Two distinct positions in `[0, count)`; `None` when fewer than two exist.
fn pick_distinct<S: RandomSource>(source: &mut S, count: usize) -> Option<(usize, usize)> {
    match count {
        0 | 1 => None,
        2 => Some((0, 1)),
        _ => {
            let first = source.uniform(0, count - 1);
            let mut second = source.uniform(0, count - 1);
            while second == first {
                second = source.uniform(0, count - 1);
            }
            Some((first, second))
        }
    }
}

/// A position and its wrapped neighbour in `[0, count)`.
fn pick_neighbours<S: RandomSource>(source: &mut S, count: usize) -> Option<(usize, usize)> {
    match count {
        0 | 1 => None,
        2 => Some((0, 1)),
        _ => {
            let first = source.uniform(0, count - 1);
            let second = if source.uniform(0, 1) == 1 {
                (first + 1) % count
            } else {
                (first + count - 1) % count
            };
            Some((first, second))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{ColumnState, empty_bank};

    /// Replays fixed draws, wrapping around.
    struct Script<'a> {
        draws: &'a [usize],
        next: usize,
    }

    impl<'a> Script<'a> {
        fn new(draws: &'a [usize]) -> Self {
            Self { draws, next: 0 }
        }
    }

    impl RandomSource for Script<'_> {
        fn uniform(&mut self, min: usize, max: usize) -> usize {
            let draw = self.draws[self.next % self.draws.len()];
            self.next += 1;
            assert!(
                (min..=max).contains(&draw),
                "scripted {draw} outside [{min}, {max}]"
            );
            draw
        }
    }

    fn bank_with_counts(count: usize) -> Bank {
        let mut bank = empty_bank();
        for column in bank.iter_mut() {
            column.output_value_count = count;
        }
        bank
    }

    fn is_permutation(indices: &[usize]) -> bool {
        let mut seen = [false; MAX_OUTPUTS];
        for &i in indices {
            if i >= indices.len() || seen[i] {
                return false;
            }
            seen[i] = true;
        }
        true
    }

    #[test]
    fn first_random_tick_is_identity() {
        let mut randomizer = SolimRandomizer::new(SmallRngSource::seed_from_u64(1));
        let old = bank_with_counts(4);
        let mut new = bank_with_counts(4);
        new[0].indices.swap(0, 3);
        randomizer.process(8, Some(&[RandomTrigger::All; MAX_COLUMNS]), &old, &mut new);
        assert!(new.iter().all(ColumnState::has_identity_indices));
        assert!(randomizer.previous_was_random());
    }

    #[test]
    fn all_shuffles_live_slots_only() {
        let mut randomizer = SolimRandomizer::new(Script::new(&[0, 0, 0]));
        let old = bank_with_counts(4);
        let mut new = bank_with_counts(4);
        let triggers = [RandomTrigger::All; MAX_COLUMNS];
        randomizer.process(1, Some(&triggers), &old, &mut new);
        randomizer.process(1, Some(&triggers), &old, &mut new);
        // i=3 <-> 0, i=2 <-> 0, i=1 <-> 0
        assert_eq!(&new[0].indices[..4], &[1, 2, 3, 0]);
        assert_eq!(&new[0].indices[4..], &IDENTITY_INDICES[4..]);
    }

    #[test]
    fn one_swaps_distinct_positions() {
        // second draw collides with the first and is redrawn
        let mut randomizer = SolimRandomizer::new(Script::new(&[1, 1, 3]));
        let old = bank_with_counts(5);
        let mut new = bank_with_counts(5);
        let mut triggers = [RandomTrigger::None; MAX_COLUMNS];
        randomizer.process(1, Some(&triggers), &old, &mut new);
        triggers[0] = RandomTrigger::One;
        randomizer.process(1, Some(&triggers), &old, &mut new);
        assert_eq!(&new[0].indices[..5], &[0, 3, 2, 1, 4]);
    }

    #[test]
    fn one_with_two_outputs_is_deterministic() {
        let mut randomizer = SolimRandomizer::new(Script::new(&[]));
        let old = bank_with_counts(2);
        let mut new = bank_with_counts(2);
        let triggers = [RandomTrigger::One; MAX_COLUMNS];
        randomizer.process(8, Some(&triggers), &old, &mut new);
        randomizer.process(8, Some(&triggers), &old, &mut new);
        for column in &new {
            assert_eq!(&column.indices[..2], &[1, 0]);
        }
    }

    #[test]
    fn move_wraps_around() {
        // position 0, direction down -> neighbour is the last slot
        let mut randomizer = SolimRandomizer::new(Script::new(&[0, 0]));
        let old = bank_with_counts(4);
        let mut new = bank_with_counts(4);
        let mut triggers = [RandomTrigger::None; MAX_COLUMNS];
        randomizer.process(1, Some(&triggers), &old, &mut new);
        triggers[0] = RandomTrigger::Move;
        randomizer.process(1, Some(&triggers), &old, &mut new);
        assert_eq!(&new[0].indices[..4], &[3, 1, 2, 0]);
    }

    #[test]
    fn single_output_ignores_swaps() {
        let mut randomizer = SolimRandomizer::new(Script::new(&[]));
        let old = bank_with_counts(1);
        let mut new = bank_with_counts(1);
        randomizer.process(2, Some(&[RandomTrigger::One; MAX_COLUMNS]), &old, &mut new);
        let mut triggers = [RandomTrigger::None; MAX_COLUMNS];
        triggers[0] = RandomTrigger::One;
        triggers[1] = RandomTrigger::Move;
        randomizer.process(2, Some(&triggers), &old, &mut new);
        assert!(new.iter().all(ColumnState::has_identity_indices));
    }

    #[test]
    fn reset_trigger_only_touches_its_column() {
        let mut randomizer = SolimRandomizer::new(SmallRngSource::seed_from_u64(9));
        let mut old = bank_with_counts(4);
        old[0].indices[..4].copy_from_slice(&[3, 2, 1, 0]);
        old[1].indices[..4].copy_from_slice(&[1, 0, 3, 2]);
        let mut new = bank_with_counts(4);

        let idle = [RandomTrigger::None; MAX_COLUMNS];
        randomizer.process(2, Some(&idle), &empty_bank(), &mut bank_with_counts(4));

        let mut triggers = idle;
        triggers[1] = RandomTrigger::Reset;
        randomizer.process(2, Some(&triggers), &old, &mut new);
        assert_eq!(&new[0].indices[..4], &[3, 2, 1, 0]);
        assert!(new[1].has_identity_indices());
    }

    #[test]
    fn new_columns_start_at_identity() {
        let mut randomizer = SolimRandomizer::new(SmallRngSource::seed_from_u64(2));
        let mut old = bank_with_counts(4);
        old[0].indices.swap(0, 1);
        old[1].indices.swap(0, 1);
        let idle = [RandomTrigger::None; MAX_COLUMNS];
        randomizer.process(1, Some(&idle), &empty_bank(), &mut bank_with_counts(4));

        let mut new = bank_with_counts(4);
        new[1].indices.swap(2, 3);
        randomizer.process(2, Some(&idle), &old, &mut new);
        assert_eq!(&new[0].indices[..2], &[1, 0]);
        assert!(new[1].has_identity_indices());
        assert_eq!(randomizer.previous_column_count(), 2);
    }

    #[test]
    fn shrinking_restores_tail() {
        let mut randomizer = SolimRandomizer::new(SmallRngSource::seed_from_u64(5));
        let idle = [RandomTrigger::None; MAX_COLUMNS];
        randomizer.process(1, Some(&idle), &empty_bank(), &mut bank_with_counts(16));

        let mut old = bank_with_counts(16);
        old[0].indices = [15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0];
        let mut new = bank_with_counts(5);
        randomizer.process(1, Some(&idle), &old, &mut new);
        assert!(is_permutation(&new[0].indices[..5]));
        assert_eq!(&new[0].indices[5..], &IDENTITY_INDICES[5..]);
    }

    #[test]
    fn disabling_resets_both_banks() {
        let mut randomizer = SolimRandomizer::new(SmallRngSource::seed_from_u64(4));
        let idle = [RandomTrigger::None; MAX_COLUMNS];
        randomizer.process(1, Some(&idle), &empty_bank(), &mut bank_with_counts(4));

        let mut bank_a = bank_with_counts(4);
        bank_a[0].indices.swap(0, 2);
        let mut bank_b = bank_with_counts(4);
        bank_b[0].indices.swap(1, 3);

        randomizer.process(1, None, &bank_a, &mut bank_b);
        assert!(bank_b[0].has_identity_indices());
        randomizer.process(1, None, &bank_b, &mut bank_a);
        assert!(bank_a[0].has_identity_indices());

        // nothing left to repair afterwards
        bank_b[0].indices.swap(0, 1);
        randomizer.process(1, None, &bank_a, &mut bank_b);
        assert!(!bank_b[0].has_identity_indices());
    }

    #[test]
    fn restore_handles_full_reversal() {
        let mut indices = [15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0];
        restore_last_indices(&mut indices, 0);
        assert_eq!(indices, IDENTITY_INDICES);
    }

    #[test]
    fn restore_keeps_relative_order_below_cut() {
        // slots 0..4 hold 2, 5, 0, 1 and 3 sits at slot 5
        let mut indices = [2, 5, 0, 1, 4, 3, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
        restore_last_indices(&mut indices, 4);
        assert_eq!(&indices[4..], &IDENTITY_INDICES[4..]);
        assert!(is_permutation(&indices[..4]));
    }

    #[test]
    fn shuffle_produces_permutation() {
        let mut source = SmallRngSource::seed_from_u64(11);
        let mut indices = IDENTITY_INDICES;
        shuffle(&mut source, &mut indices[..9]);
        assert!(is_permutation(&indices[..9]));
        assert_eq!(&indices[9..], &IDENTITY_INDICES[9..]);
    }
}
