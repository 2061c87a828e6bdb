//! Configuration module for formscope.
//!
//! Handles the TOML settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, CatalogSettings, CompilerSettings, ResolverSettings, Settings, SettingsError,
    CONFIG_ENV_VAR,
};
