//! Solim Core - the SOLIM value pipeline
//!
//! This crate turns up to eight polyphonic voltage inputs per lane into up to
//! eight result voltages: values are folded into a window by whole octaves,
//! octave duplicates are injected, the set is sorted, read through a
//! randomizable permutation and octaved once more per output position.
//!
//! # Core Abstractions
//!
//! ## Data
//!
//! - [`Value`] - One voltage plus its octave flags ([`Octave`], [`SortRelative`])
//! - [`ColumnState`] - Everything one lane needs for one tick
//! - [`Bank`] - [`MAX_COLUMNS`] lanes
//!
//! ## Stages
//!
//! - [`ValueTransform`] - The two pure stages ([`SolimValueTransform`])
//! - [`Randomizer`] - Permutation bookkeeping across ticks ([`SolimRandomizer`])
//! - [`RandomSource`] - Injected uniform draws ([`SmallRngSource`] wraps `rand`'s `SmallRng`)
//!
//! ## Pipeline
//!
//! - [`SolimCore`] - Double buffer that runs both stages and skips unchanged lanes
//!
//! ## Utilities
//!
//! - [`limit_value_if`] - Octave folding of a single voltage
//! - [`restore_last_indices`] - Repair a permutation after its domain shrank
//!
//! # no_std Support
//!
//! The crate is `no_std` compatible and never allocates. Disable the default
//! `std` feature to build for embedded targets; seed the generator with
//! [`SmallRngSource::seed_from_u64`] instead of OS entropy:
//!
//! ```toml
//! [dependencies]
//! solim-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use solim_core::{Octave, SolimCore, SortOrder, Value};
//!
//! let mut core = SolimCore::from_seed(0);
//!
//! let column = core.inactive_values_mut(0);
//! column.set_inputs(&[Value::new(0.75), Value::new(0.25)]);
//! column.sort = SortOrder::Ascending;
//! column.output_octaves[1] = Octave::Higher;
//!
//! core.process_and_activate_inactive_values(1, None);
//! assert_eq!(core.active_values(0).results(), &[0.25, 0.75, 1.75]);
//! ```
//!
//! # Features
//!
//! - `std` (default) - OS entropy seeding
//! - `tracing` - debug events from the randomizer

#![cfg_attr(not(feature = "std"), no_std)]

pub mod column;
pub mod double_buffer;
pub mod random;
pub mod randomizer;
pub mod transform;
pub mod value;

// Re-export main types at crate root
pub use column::{
    Bank, ColumnState, DEFAULT_LOWER_LIMIT, DEFAULT_UPPER_LIMIT, IDENTITY_INDICES, MAX_COLUMNS,
    MAX_INPUTS, MAX_OUTPUTS, MAX_RESULTS, ResortMode, empty_bank,
};
pub use double_buffer::SolimCore;
pub use random::{RandomSource, SmallRngSource};
pub use randomizer::{RandomTrigger, Randomizer, SolimRandomizer, restore_last_indices};
pub use transform::{LIMIT_TOLERANCE, SolimValueTransform, ValueTransform, limit_value_if};
pub use value::{Octave, SortOrder, SortRelative, Value};
