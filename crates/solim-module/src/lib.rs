//! Solim Module - host-facing layer around the SOLIM core
//!
//! This crate turns per-sample port voltages into core ticks. It owns the
//! parts of the module that are not part of the value pipeline itself:
//!
//! - [`ModuleFrame`] - One call's port voltages and expander state
//! - [`SchmittTrigger`] / [`ColumnTriggers`] - Edge detection and latching for the random expander
//! - [`SolimModule`] - Process-rate division, frame-to-lane copying, output writing
//! - [`OutputMode`] - Polyphonic or monophonic output ports
//!
//! Columns are processed up to and including the last connected one. The
//! random expander's actions are latched between core ticks; when several
//! fire on one column the strongest wins (Reset, All, One, Move).
//!
//! # no_std Support
//!
//! Like `solim-core`, this crate is `no_std` compatible:
//!
//! ```toml
//! [dependencies]
//! solim-module = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod frame;
pub mod module;
pub mod trigger;

// Re-export main types at crate root
pub use frame::{
    ColumnFrame, InputExpanderFrame, ModuleFrame, OutputExpanderFrame, RandomColumnFrame,
    RandomFrame,
};
pub use module::{
    ColumnOutput, MAX_PROCESS_RATE, ModuleCore, ModuleOutputs, OutputMode, SolimModule,
};
pub use trigger::{
    ColumnTriggers, SchmittState, SchmittTrigger, TRIGGER_HIGH_THRESHOLD, TRIGGER_LOW_THRESHOLD,
    priority, strongest,
};
