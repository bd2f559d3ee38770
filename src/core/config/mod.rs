use std::{env, ffi::OsString, fmt, path::PathBuf};

mod loader;
mod paths;

use inksac::prelude::ColorSupport;

use crate::highlight::SyntaxHighlighter;
use loader::ConfigLoader;
pub use paths::ConfigPaths;

const DEFAULT_HISTORY_SIZE: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "auto" => Some(ColorMode::Auto),
            "always" => Some(ColorMode::Always),
            "never" => Some(ColorMode::Never),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_file: PathBuf,
    pub color: ColorMode,
    pub quiet: bool,
    pub history_size: usize,
}

impl Config {
    pub fn with_defaults(paths: &ConfigPaths) -> Self {
        Config {
            log_file: paths.default_log_file(),
            color: ColorMode::Auto,
            quiet: false,
            history_size: DEFAULT_HISTORY_SIZE,
        }
    }

    /// Reads the rc file and applies the `MINISH_LOG_FILE` override.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&ConfigPaths::new(), env::var_os("MINISH_LOG_FILE"))
    }

    pub fn load_from(paths: &ConfigPaths, log_override: Option<OsString>) -> Result<Self, ConfigError> {
        let mut config = Self::with_defaults(paths);
        let loader = ConfigLoader::new(paths);
        loader.load_configs(&mut config)?;
        config.apply_log_override(&loader, log_override);
        Ok(config)
    }

    /// Defaults plus the `MINISH_LOG_FILE` override, for when the rc file
    /// can't be used.
    pub fn fallback() -> Self {
        Self::fallback_from(&ConfigPaths::new(), env::var_os("MINISH_LOG_FILE"))
    }

    pub fn fallback_from(paths: &ConfigPaths, log_override: Option<OsString>) -> Self {
        let mut config = Self::with_defaults(paths);
        config.apply_log_override(&ConfigLoader::new(paths), log_override);
        config
    }

    fn apply_log_override(&mut self, loader: &ConfigLoader<'_>, log_override: Option<OsString>) {
        if let Some(log_file) = log_override.filter(|value| !value.is_empty()) {
            self.log_file = loader.resolve_path(&log_file.to_string_lossy());
        }
    }

    pub fn highlighter(&self) -> SyntaxHighlighter {
        match self.color {
            ColorMode::Auto => SyntaxHighlighter::new(),
            ColorMode::Always => SyntaxHighlighter::with_support(ColorSupport::Basic),
            ColorMode::Never => SyntaxHighlighter::plain(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    Malformed { line: usize },
    UnknownKey { line: usize, key: String },
    InvalidValue { line: usize, key: String, value: String },
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::Malformed { line } => {
                write!(f, "line {}: expected `key = value`", line)
            }
            ConfigError::UnknownKey { line, key } => {
                write!(f, "line {}: unknown setting `{}`", line, key)
            }
            ConfigError::InvalidValue { line, key, value } => {
                write!(f, "line {}: invalid value `{}` for `{}`", line, value, key)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
