//! CLI command implementations.

pub mod info;
pub mod run;
pub mod scenarios;
pub mod settings;
