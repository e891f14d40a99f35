//! Configuration for Stagehand, read from `~/.stagehand/config.toml`.
//!
//! ```toml
//! [loader]
//! main_module = "ui/main"
//! main_export = "Main"
//! include_framework_modules = false
//! minimum_bootstrap_ms = 0
//! minimum_loading_ms = 0
//! remove_content_on_load = true
//!
//! [ui]
//! ascii_only = false
//! reduced_motion = false
//! ```

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use stagehand_core::SequencerOptions;
use stagehand_types::{NonEmptyString, UiOptions};

/// Environment variable that points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "STAGEHAND_CONFIG";

const fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct StagehandConfig {
    pub loader: Option<LoaderConfig>,
    pub ui: Option<UiConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// How the main unit is found and how long each indicator stays up.
#[derive(Debug, Deserialize)]
pub struct LoaderConfig {
    pub main_module: Option<String>,
    pub main_export: Option<String>,
    #[serde(default)]
    pub include_framework_modules: bool,
    #[serde(default)]
    pub minimum_bootstrap_ms: u64,
    #[serde(default)]
    pub minimum_loading_ms: u64,
    /// Remove bootstrap content as soon as the main view is revealed.
    #[serde(default = "default_true")]
    pub remove_content_on_load: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            main_module: None,
            main_export: None,
            include_framework_modules: false,
            minimum_bootstrap_ms: 0,
            minimum_loading_ms: 0,
            remove_content_on_load: true,
        }
    }
}

impl LoaderConfig {
    /// Build sequencer options, keeping defaults for anything unset or blank.
    #[must_use]
    pub fn sequencer_options(&self) -> SequencerOptions {
        let defaults = SequencerOptions::default();
        SequencerOptions {
            main_module: non_empty_or(self.main_module.as_deref(), "main_module", defaults.main_module),
            main_export: non_empty_or(self.main_export.as_deref(), "main_export", defaults.main_export),
            include_framework_modules: self.include_framework_modules,
            minimum_bootstrap_duration: Duration::from_millis(self.minimum_bootstrap_ms),
            minimum_loading_duration: Duration::from_millis(self.minimum_loading_ms),
            remove_content_on_load: self.remove_content_on_load,
        }
    }
}

fn non_empty_or(value: Option<&str>, key: &str, fallback: NonEmptyString) -> NonEmptyString {
    let Some(value) = value else {
        return fallback;
    };
    match NonEmptyString::new(value) {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(key, "Ignoring blank [loader] value; using {fallback}");
            fallback
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UiConfig {
    /// Use ASCII-only glyphs for indicators and borders.
    #[serde(default)]
    pub ascii_only: bool,
    /// Disable passage transition effects.
    #[serde(default)]
    pub reduced_motion: bool,
}

impl StagehandConfig {
    /// Load the config file, if there is one.
    ///
    /// A missing file is not an error; a file that cannot be read or parsed is.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn sequencer_options(&self) -> SequencerOptions {
        self.loader
            .as_ref()
            .map_or_else(SequencerOptions::default, LoaderConfig::sequencer_options)
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        UiOptions {
            ascii_only: self.ascii_only(),
            reduced_motion: self.reduced_motion(),
        }
    }

    #[must_use]
    pub fn ascii_only(&self) -> bool {
        self.ui.as_ref().is_some_and(|ui| ui.ascii_only)
    }

    #[must_use]
    pub fn reduced_motion(&self) -> bool {
        self.ui.as_ref().is_some_and(|ui| ui.reduced_motion)
    }
}

/// `$STAGEHAND_CONFIG` if set, otherwise `~/.stagehand/config.toml`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV).filter(|path| !path.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".stagehand").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, LoaderConfig, StagehandConfig};
    use stagehand_core::SequencerOptions;
    use stagehand_types::UiOptions;
    use std::fs;
    use std::time::Duration;

    #[test]
    fn parse_empty_config() {
        let config: StagehandConfig = toml::from_str("").unwrap();
        assert!(config.loader.is_none());
        assert!(config.ui.is_none());
        assert_eq!(config.sequencer_options(), SequencerOptions::default());
    }

    #[test]
    fn parse_loader_config() {
        let toml_str = r#"
[loader]
main_module = "app/shell"
main_export = "Shell"
include_framework_modules = true
minimum_bootstrap_ms = 300
minimum_loading_ms = 1200
remove_content_on_load = false
"#;
        let config: StagehandConfig = toml::from_str(toml_str).unwrap();
        let options = config.sequencer_options();
        assert_eq!(options.main_module.as_str(), "app/shell");
        assert_eq!(options.main_export.as_str(), "Shell");
        assert!(options.include_framework_modules);
        assert_eq!(options.minimum_bootstrap_duration, Duration::from_millis(300));
        assert_eq!(options.minimum_loading_duration, Duration::from_millis(1200));
        assert!(!options.remove_content_on_load);
    }

    #[test]
    fn missing_loader_keys_use_defaults() {
        let config: StagehandConfig = toml::from_str("[loader]\nminimum_loading_ms = 50\n").unwrap();
        let loader = config.loader.as_ref().unwrap();
        assert!(loader.remove_content_on_load);

        let options = config.sequencer_options();
        assert_eq!(options.main_module.as_str(), "ui/main");
        assert_eq!(options.main_export.as_str(), "Main");
        assert_eq!(options.minimum_bootstrap_duration, Duration::ZERO);
        assert_eq!(options.minimum_loading_duration, Duration::from_millis(50));
    }

    #[test]
    fn blank_names_fall_back() {
        let loader = LoaderConfig {
            main_module: Some(String::new()),
            main_export: Some("  ".to_string()),
            ..LoaderConfig::default()
        };
        let options = loader.sequencer_options();
        assert_eq!(options.main_module.as_str(), "ui/main");
        assert_eq!(options.main_export.as_str(), "Main");
    }

    #[test]
    fn blank_names_in_file_fall_back() {
        let config: StagehandConfig =
            toml::from_str("[loader]\nmain_module = \"\"\nmain_export = \" \"\n").unwrap();
        let options = config.sequencer_options();
        assert_eq!(options.main_module.as_str(), "ui/main");
        assert_eq!(options.main_export.as_str(), "Main");
    }

    #[test]
    fn parse_ui_config() {
        let config: StagehandConfig =
            toml::from_str("[ui]\nascii_only = true\nreduced_motion = true\n").unwrap();
        assert!(config.ascii_only());
        assert!(config.reduced_motion());
        assert_eq!(
            config.ui_options(),
            UiOptions {
                ascii_only: true,
                reduced_motion: true,
            }
        );
    }

    #[test]
    fn load_from_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = StagehandConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[ui]\nreduced_motion = true\n").unwrap();

        let config = StagehandConfig::load_from(&path).unwrap().unwrap();
        assert!(config.reduced_motion());
        assert!(!config.ascii_only());
    }

    #[test]
    fn load_from_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[loader\nmain_module = ").unwrap();

        let err = StagehandConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn load_from_rejects_wrong_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[loader]\nminimum_loading_ms = \"soon\"\n").unwrap();

        assert!(matches!(
            StagehandConfig::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
