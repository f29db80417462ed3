//! Voltage values and the flags that travel with them.
//!
//! A [`Value`] is one voltage in 1 V/oct plus the instructions for how the
//! pipeline should octave it. The flags are set per input by the caller and
//! resolved by [`ValueTransform::process_values`](crate::ValueTransform::process_values).

/// Octave shift requested for a value or an output slot.
///
/// One octave is 1.0 in the 1 V/oct convention.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Octave {
    /// Shift down by one octave (-1.0).
    Lower,
    /// No shift.
    #[default]
    None,
    /// Shift up by one octave (+1.0).
    Higher,
}

impl Octave {
    /// Signed shift in volts.
    ///
    /// ```rust
    /// use solim_core::Octave;
    ///
    /// assert_eq!(Octave::Lower.offset(), -1.0);
    /// assert_eq!(Octave::None.offset(), 0.0);
    /// assert_eq!(Octave::Higher.offset(), 1.0);
    /// ```
    #[inline]
    pub const fn offset(self) -> f32 {
        match self {
            Octave::Lower => -1.0,
            Octave::None => 0.0,
            Octave::Higher => 1.0,
        }
    }

    /// Direction as -1, 0 or +1.
    #[inline]
    pub const fn direction(self) -> i8 {
        match self {
            Octave::Lower => -1,
            Octave::None => 0,
            Octave::Higher => 1,
        }
    }

    /// Build from a direction; negative is lower, positive is higher.
    #[inline]
    pub const fn from_direction(direction: i8) -> Self {
        if direction < 0 {
            Octave::Lower
        } else if direction > 0 {
            Octave::Higher
        } else {
            Octave::None
        }
    }

    /// The opposite shift. `None` stays `None`.
    #[inline]
    pub const fn flipped(self) -> Self {
        match self {
            Octave::Lower => Octave::Higher,
            Octave::None => Octave::None,
            Octave::Higher => Octave::Lower,
        }
    }

    /// True unless this is [`Octave::None`].
    #[inline]
    pub const fn is_shift(self) -> bool {
        !matches!(self, Octave::None)
    }
}

/// Whether an octave duplicate is computed before or after sorting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortRelative {
    /// Shift first, then sort the shifted copy with everything else.
    #[default]
    Before,
    /// Sort the unshifted copy, then shift it in place.
    After,
}

/// Sort direction for a column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Highest voltage first.
    Descending,
    /// Keep input order.
    #[default]
    None,
    /// Lowest voltage first.
    Ascending,
}

impl SortOrder {
    /// Direction as -1, 0 or +1.
    #[inline]
    pub const fn direction(self) -> i8 {
        match self {
            SortOrder::Descending => -1,
            SortOrder::None => 0,
            SortOrder::Ascending => 1,
        }
    }

    /// Build from a direction; negative is descending, positive ascending.
    ///
    /// ```rust
    /// use solim_core::SortOrder;
    ///
    /// assert_eq!(SortOrder::from_direction(-3), SortOrder::Descending);
    /// assert_eq!(SortOrder::from_direction(0), SortOrder::None);
    /// assert_eq!(SortOrder::from_direction(1), SortOrder::Ascending);
    /// ```
    #[inline]
    pub const fn from_direction(direction: i8) -> Self {
        if direction < 0 {
            SortOrder::Descending
        } else if direction > 0 {
            SortOrder::Ascending
        } else {
            SortOrder::None
        }
    }

    /// True when `a` must be placed strictly before `b`.
    ///
    /// Always false for [`SortOrder::None`], which leaves order untouched.
    #[inline]
    pub fn precedes(self, a: f32, b: f32) -> bool {
        match self {
            SortOrder::Descending => a > b,
            SortOrder::None => false,
            SortOrder::Ascending => a < b,
        }
    }
}

/// A voltage with its octave instructions.
///
/// Equality compares the four fields only, so two values are equal when they
/// would be processed identically.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Value {
    /// Voltage (1 V/oct).
    pub value: f32,
    /// Octave duplicate to inject, if any.
    pub add_octave: Octave,
    /// When the duplicate is shifted relative to sorting.
    pub sort_relative: SortRelative,
    /// Drop the unshifted original from the output.
    pub replace_original: bool,
}

impl Value {
    /// A plain voltage with no octave instructions.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self {
            value,
            add_octave: Octave::None,
            sort_relative: SortRelative::Before,
            replace_original: false,
        }
    }

    /// Builder: request an octave duplicate.
    #[inline]
    pub const fn with_octave(mut self, octave: Octave, sort_relative: SortRelative) -> Self {
        self.add_octave = octave;
        self.sort_relative = sort_relative;
        self
    }

    /// Builder: drop the unshifted original.
    #[inline]
    pub const fn replacing_original(mut self) -> Self {
        self.replace_original = true;
        self
    }
}

/// Stable insertion sort of a small slice by an ordering predicate.
///
/// `precedes(a, b)` must be true only when `a` belongs strictly before `b`;
/// equal elements keep their relative order. Used on slices of at most 16
/// elements, where this beats anything that needs scratch memory.
pub(crate) fn stable_sort_by<T: Copy>(items: &mut [T], precedes: impl Fn(&T, &T) -> bool) {
    for i in 1..items.len() {
        let current = items[i];
        let mut j = i;
        while j > 0 && precedes(&current, &items[j - 1]) {
            items[j] = items[j - 1];
            j -= 1;
        }
        items[j] = current;
    }
}
