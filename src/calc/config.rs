//! Configuration loading for calcparse.
//!
//! `defaults/calcparse.default.toml` is embedded into the binary so that docs
//! and runtime behavior stay in sync. User files and command-line overrides
//! are layered on top of those defaults via [`Loader`] before deserializing
//! into [`CalcConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/calcparse.default.toml");

/// Top-level configuration consumed by the binary.
#[derive(Debug, Clone, Deserialize)]
pub struct CalcConfig {
    pub output: OutputConfig,
    pub diagnostics: DiagnosticsConfig,
}

/// Which channels are printed, and how the tree is rendered.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub trace: bool,
    pub tree: bool,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticsConfig {
    pub fail_on_error: bool,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (used for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<CalcConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<CalcConfig, ConfigError> {
    Loader::new().build()
}
