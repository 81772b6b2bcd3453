//! TOML-based configuration for semview.
//!
//! Supports a config file (semview.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! project = "${SEMVIEW_HOME}/datasets.toml"
//!
//! [preview]
//! rows = 10
//!
//! [composition]
//! max_view_depth = 8
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::query::{DEFAULT_HEAD_ROWS, DEFAULT_MAX_VIEW_DEPTH};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Default project file (supports ${ENV_VAR} expansion).
    pub project: Option<String>,

    /// Preview query settings.
    pub preview: PreviewSettings,

    /// View composition settings.
    pub composition: CompositionSettings,
}

/// Preview query settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Row cap for head queries.
    pub rows: u64,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_HEAD_ROWS,
        }
    }
}

/// View composition settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompositionSettings {
    /// Deepest allowed nesting of views over views.
    pub max_view_depth: usize,
}

impl Default for CompositionSettings {
    fn default() -> Self {
        Self {
            max_view_depth: DEFAULT_MAX_VIEW_DEPTH,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and check settings from TOML text.
    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SEMVIEW_CONFIG`
    /// 2. `./semview.toml`
    /// 3. `~/.config/semview/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("SEMVIEW_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("semview.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("semview").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Return defaults if no config file found
        Ok(Settings::default())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.preview.rows == 0 {
            return Err(SettingsError::InvalidConfig(
                "preview.rows must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// The default project path with environment variables expanded.
    pub fn project_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.project
            .as_deref()
            .map(|p| expand_env_vars(p).map(PathBuf::from))
            .transpose()
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name = if chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            let mut name = String::new();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                name.push(ch);
            }
            name
        } else {
            // $VAR ends at the first non-alphanumeric/underscore
            let mut name = String::new();
            while let Some(&ch) = chars.peek() {
                if !(ch.is_alphanumeric() || ch == '_') {
                    break;
                }
                name.push(ch);
                chars.next();
            }
            if name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
            name
        };

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
