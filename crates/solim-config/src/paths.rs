//! Platform-specific paths for settings and scenarios.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/solim/` (Linux),
//!   `~/Library/Application Support/solim/` (macOS), `%APPDATA%\solim\` (Windows)
//! - **Settings file**: `<user config>/settings.toml`
//! - **User scenarios**: `<user config>/scenarios/`
//!
//! # Example
//!
//! ```rust,no_run
//! use solim_config::paths;
//!
//! println!("Settings: {:?}", paths::user_settings_path());
//!
//! if let Some(path) = paths::find_scenario("my_run") {
//!     println!("Found scenario at: {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Application name used for directory paths.
const APP_NAME: &str = "solim";

/// Subdirectory name for scenarios.
const SCENARIOS_SUBDIR: &str = "scenarios";

/// File name of the settings file.
const SETTINGS_FILE: &str = "settings.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the path of the user settings file.
pub fn user_settings_path() -> PathBuf {
    user_config_dir().join(SETTINGS_FILE)
}

/// Returns the user-specific scenarios directory.
pub fn user_scenarios_dir() -> PathBuf {
    user_config_dir().join(SCENARIOS_SUBDIR)
}

/// Find a scenario file by name.
///
/// `name` may be a path to an existing file, or a scenario name with or
/// without the `.toml` extension, looked up in the user scenarios directory.
pub fn find_scenario(name: &str) -> Option<PathBuf> {
    find_scenario_in(name, &user_scenarios_dir())
}

fn find_scenario_in(name: &str, dir: &Path) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };

    let user_path = dir.join(filename);
    user_path.is_file().then_some(user_path)
}

fn ensure_dir(dir: PathBuf) -> Result<PathBuf, ConfigError> {
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// Ensure the user config directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_config_dir() -> Result<PathBuf, ConfigError> {
    ensure_dir(user_config_dir())
}

/// Ensure the user scenarios directory exists.
pub fn ensure_user_scenarios_dir() -> Result<PathBuf, ConfigError> {
    ensure_dir(user_scenarios_dir())
}

/// List all scenario files in the user scenarios directory.
pub fn list_user_scenarios() -> Vec<PathBuf> {
    list_scenarios_in_dir(&user_scenarios_dir())
}

/// List the `.toml` files in `dir`, sorted by path.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_scenarios_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut scenarios: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    scenarios.sort();
    scenarios
}

/// Get the scenario name from a file path.
///
/// ```rust
/// use solim_config::paths::scenario_name_from_path;
/// use std::path::Path;
///
/// let name = scenario_name_from_path(Path::new("/path/to/arpeggio.toml"));
/// assert_eq!(name, Some("arpeggio".to_string()));
/// ```
pub fn scenario_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn user_dirs_carry_app_name() {
        assert!(user_config_dir().to_string_lossy().contains("solim"));
        assert!(user_settings_path().ends_with("solim/settings.toml"));
        assert!(user_scenarios_dir().ends_with("solim/scenarios"));
    }

    #[test]
    fn find_by_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("run.toml");
        fs::write(&path, "name = \"run\"").unwrap();

        assert_eq!(find_scenario(path.to_str().unwrap()), Some(path));
    }

    #[test]
    fn find_by_name_in_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("chords.toml");
        fs::write(&path, "name = \"chords\"").unwrap();

        assert_eq!(
            find_scenario_in("chords", temp_dir.path()),
            Some(path.clone())
        );
        assert_eq!(find_scenario_in("chords.toml", temp_dir.path()), Some(path));
        assert!(find_scenario_in("missing", temp_dir.path()).is_none());
    }

    #[test]
    fn not_found() {
        assert!(find_scenario("nonexistent_scenario_12345").is_none());
    }

    #[test]
    fn list_only_toml_sorted() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.toml"), "").unwrap();
        fs::write(temp_dir.path().join("a.toml"), "").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(temp_dir.path().join("dir.toml")).unwrap();

        let names: Vec<_> = list_scenarios_in_dir(temp_dir.path())
            .iter()
            .filter_map(|p| scenario_name_from_path(p))
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn list_missing_dir_is_empty() {
        let missing = Path::new("/nonexistent/path/12345");
        assert!(list_scenarios_in_dir(missing).is_empty());
    }

    #[test]
    fn ensure_dir_creates_nested() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("x").join("y");
        let created = ensure_dir(nested.clone()).unwrap();
        assert_eq!(created, nested);
        assert!(nested.is_dir());
        // idempotent
        assert!(ensure_dir(nested).is_ok());
    }
}
