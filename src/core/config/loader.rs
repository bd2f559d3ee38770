use std::{fs, path::Path, path::PathBuf};

use super::{ColorMode, Config, ConfigError, ConfigPaths};
use crate::path::PathResolver;

pub struct ConfigLoader<'a> {
    paths: &'a ConfigPaths,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(paths: &'a ConfigPaths) -> Self {
        Self { paths }
    }

    pub fn load_configs(&self, config: &mut Config) -> Result<(), ConfigError> {
        if let Some(rc_path) = &self.paths.rc_path {
            self.source_if_exists(rc_path, config)?;
        }
        Ok(())
    }

    fn source_if_exists(&self, path: &Path, config: &mut Config) -> Result<(), ConfigError> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            for (index, line) in content.lines().enumerate() {
                self.process_line(index + 1, line, config)?;
            }
        }
        Ok(())
    }

    fn process_line(&self, number: usize, line: &str, config: &mut Config) -> Result<(), ConfigError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let (key, value) = line
            .split_once('=')
            .ok_or(ConfigError::Malformed { line: number })?;
        let key = key.trim();
        let value = unquote(value.trim());

        let invalid = || ConfigError::InvalidValue {
            line: number,
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "log_file" => config.log_file = self.resolve_path(value),
            "color" => config.color = ColorMode::parse(value).ok_or_else(invalid)?,
            "quiet" => config.quiet = parse_bool(value).ok_or_else(invalid)?,
            "history_size" => config.history_size = value.parse().map_err(|_| invalid())?,
            _ => {
                return Err(ConfigError::UnknownKey {
                    line: number,
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }

    /// Relative paths in the rc file are taken from the home directory.
    pub(super) fn resolve_path(&self, value: &str) -> PathBuf {
        let resolver = PathResolver::with_home(self.paths.home.clone());
        let base = self
            .paths
            .home()
            .map(Path::to_path_buf)
            .unwrap_or_else(std::env::temp_dir);
        resolver.resolve(value, &base)
    }
}

fn unquote(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
