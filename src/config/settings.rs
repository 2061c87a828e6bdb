//! TOML-based configuration for formscope.
//!
//! Supports a config file (formscope.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [resolver]
//! single_flight = true
//!
//! [compiler]
//! nan_literal = "drop"
//!
//! [catalog]
//! path = "${FORMSCOPE_HOME}/catalog.json"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::metadata::ResolverOptions;
use crate::odata::{CompileOptions, NanLiteral};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "FORMSCOPE_CONFIG";

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
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub resolver: ResolverSettings,
    pub compiler: CompilerSettings,
    pub catalog: CatalogSettings,
}

/// Attribute metadata resolver settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Deduplicate concurrent fetches of the same attribute map.
    pub single_flight: bool,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            single_flight: true,
        }
    }
}

/// Query compiler settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// `emit` writes `NaN` for non-numeric values on number attributes,
    /// `drop` leaves the condition out.
    pub nan_literal: NanLiteral,
}

/// Metadata catalog settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Path to a JSON catalog (supports ${ENV_VAR} expansion).
    pub path: Option<String>,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `FORMSCOPE_CONFIG`
    /// 2. `./formscope.toml`
    /// 3. `~/.config/formscope/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("formscope.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("formscope").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Catalog path with environment variables expanded, if configured.
    pub fn catalog_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.catalog
            .path
            .as_deref()
            .map(|p| expand_env_vars(p).map(PathBuf::from))
            .transpose()
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions::default().with_nan_literal(self.compiler.nan_literal)
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions::default().with_single_flight(self.resolver.single_flight)
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A lone `$` is kept as-is.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                var_name.push(ch);
            }
            if var_name.is_empty() {
                result.push('$');
                continue;
            }
        }

        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
