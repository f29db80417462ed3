//! Module-wide settings file.

use serde::{Deserialize, Serialize};
use solim_core::RandomSource;
use solim_module::{OutputMode, SolimModule};
use std::path::Path;

use crate::error::ConfigError;
use crate::validation::{ValidationResult, parse_output_mode, validate_process_rate};

/// Settings that live outside the per-tick frames.
///
/// # TOML Format
///
/// ```toml
/// output_mode = "polyphonic"
/// process_rate = 1
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleSettings {
    /// `polyphonic` or `monophonic`.
    #[serde(default = "default_output_mode")]
    pub output_mode: String,

    /// Run the core on every n-th call.
    #[serde(default = "default_process_rate")]
    pub process_rate: u32,
}

fn default_output_mode() -> String {
    "polyphonic".to_string()
}

fn default_process_rate() -> u32 {
    1
}

impl Default for ModuleSettings {
    fn default() -> Self {
        Self {
            output_mode: default_output_mode(),
            process_rate: default_process_rate(),
        }
    }
}

impl ModuleSettings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load settings, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the settings to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the settings to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The parsed output mode.
    pub fn output_mode(&self) -> ValidationResult<OutputMode> {
        parse_output_mode(&self.output_mode)
    }

    /// Configure a module with these settings.
    pub fn apply<S: RandomSource>(&self, module: &mut SolimModule<S>) -> ValidationResult<()> {
        validate_process_rate(self.process_rate)?;
        module.set_output_mode(self.output_mode()?);
        module.set_process_rate(self.process_rate);
        Ok(())
    }
}
