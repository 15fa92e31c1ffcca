//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".agri-forecast.yaml",
    ".agri-forecast.yml",
    "agri-forecast.yaml",
    "agri-forecast.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. User config directory (~/.config/agri-forecast/)
/// 4. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if let Some(path) = find_config_in_dir(&cwd) {
            return Some(path);
        }
    }

    if let Some(path) = user_config_dir().and_then(|dir| find_config_in_dir(&dir)) {
        return Some(path);
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// The per-user configuration directory, if the platform has one.
#[must_use]
pub fn user_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("agri-forecast"))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml_ng::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml_ng::Error> for ConfigFileError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml_ng::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Only values that differ from the defaults are taken from `other`, so
    /// CLI args layered over a file config override just what was passed.
    pub fn merge(&mut self, other: &Self) {
        let defaults = Self::default();

        if other.models.model_dir != defaults.models.model_dir {
            self.models.model_dir.clone_from(&other.models.model_dir);
        }

        for (mine, theirs) in [
            (&mut self.flood, &other.flood),
            (&mut self.drought, &other.drought),
        ] {
            if theirs.high.is_some() {
                mine.high = theirs.high;
            }
            if theirs.medium.is_some() {
                mine.medium = theirs.medium;
            }
            if theirs.horizon_days.is_some() {
                mine.horizon_days = theirs.horizon_days;
            }
        }

        if other.price.learning_rate != defaults.price.learning_rate {
            self.price.learning_rate = other.price.learning_rate;
        }
        if other.price.iterations != defaults.price.iterations {
            self.price.iterations = other.price.iterations;
        }
        if other.price.default_days_ahead != defaults.price.default_days_ahead {
            self.price.default_days_ahead = other.price.default_days_ahead;
        }
        if other.price.history_points != defaults.price.history_points {
            self.price.history_points = other.price.history_points;
        }
        if other.price.seed.is_some() {
            self.price.seed = other.price.seed;
        }

        if other.output.format != defaults.output.format {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if other.output.no_color {
            self.output.no_color = true;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# agri-forecast configuration
# Place this file at .agri-forecast.yaml in your working directory or ~/.config/agri-forecast/

{}
",
        serde_yaml_ng::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# agri-forecast configuration file
# =================================
#
# Place it at:
#   - .agri-forecast.yaml in the working directory
#   - ~/.config/agri-forecast/agri-forecast.yaml for global config
#
# CLI arguments always override file settings.

# Trained model artifacts
models:
  # Directory probed for flood_model.json and drought_model.json
  model_dir: models

# Flood severity (probability above `high` is high, above `medium` is medium)
flood: {}
  # high: 0.7
  # medium: 0.4
  # horizon_days: 7

# Drought severity
drought: {}
  # high: 0.6
  # medium: 0.4
  # horizon_days: 30

# Price forecasting
price:
  learning_rate: 0.01
  iterations: 1000
  default_days_ahead: 30
  # Synthetic history length when training without recorded prices
  history_points: 365
  # Fix the random source for reproducible heuristic forecasts
  # seed: 42

# Output configuration
output:
  # Format: json, summary
  format: json
  # Output file path (omit for stdout)
  # file: prediction.json
  no_color: false
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::OutputFormat;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".agri-forecast.yaml");
        std::fs::write(&config_path, "flood:\n  high: 0.8\n").unwrap();

        let found = find_config_in_dir(tmp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_config_in_dir(tmp.path()), None);
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");

        let yaml = r"
models:
  model_dir: /var/lib/agri/models
drought:
  high: 0.65
price:
  seed: 7
output:
  format: summary
";
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.models.model_dir, PathBuf::from("/var/lib/agri/models"));
        assert_eq!(config.drought.high, Some(0.65));
        assert_eq!(config.drought.medium, None);
        assert_eq!(config.price.seed, Some(7));
        assert_eq!(config.price.iterations, 1000);
        assert_eq!(config.output.format, OutputFormat::Summary);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_config_file_parse_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("bad.yaml");
        std::fs::write(&config_path, "price:\n  iterations: lots\n").unwrap();
        assert!(matches!(
            load_config_file(&config_path),
            Err(ConfigFileError::Parse(_))
        ));
    }

    #[test]
    fn test_config_merge() {
        let mut base = AppConfig::builder().flood_thresholds(0.8, 0.5).build();
        base.price.seed = Some(1);

        let mut overrides = AppConfig::default();
        overrides.flood.high = Some(0.9);
        overrides.price.iterations = 50;
        overrides.output.no_color = true;

        base.merge(&overrides);

        assert_eq!(base.flood.high, Some(0.9));
        assert_eq!(base.flood.medium, Some(0.5));
        assert_eq!(base.price.iterations, 50);
        assert_eq!(base.price.seed, Some(1));
        assert!(base.output.no_color);
    }

    #[test]
    fn test_generate_example_config_parses() {
        let example = generate_example_config();
        assert!(example.contains("models:"));
        let parsed: AppConfig = serde_yaml_ng::from_str(&example).unwrap();
        assert_eq!(parsed, AppConfig::default());

        let full: AppConfig = serde_yaml_ng::from_str(&generate_full_example_config()).unwrap();
        assert_eq!(full, AppConfig::default());
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom-config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "price:\n  seed: 3").unwrap();

        let discovered = discover_config_file(Some(&config_path));
        assert_eq!(discovered, Some(config_path));
    }
}
