use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub rc_path: Option<PathBuf>,
    pub home: Option<PathBuf>,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigPaths {
    /// `MINISH_CONFIG` wins over `~/.minishrc`.
    pub fn new() -> Self {
        Self::from_parts(env::var_os("MINISH_CONFIG").map(PathBuf::from), dirs::home_dir())
    }

    pub fn from_parts(rc_override: Option<PathBuf>, home: Option<PathBuf>) -> Self {
        let rc_path = rc_override.or_else(|| home.as_ref().map(|h| h.join(".minishrc")));
        ConfigPaths { rc_path, home }
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    pub fn default_log_file(&self) -> PathBuf {
        match &self.home {
            Some(home) => home.join(".minish").join("commands.log"),
            None => env::temp_dir().join("minish-commands.log"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_under_home() {
        let paths = ConfigPaths::from_parts(None, Some(PathBuf::from("/home/testuser")));

        assert_eq!(paths.rc_path, Some(PathBuf::from("/home/testuser/.minishrc")));
        assert_eq!(
            paths.default_log_file(),
            PathBuf::from("/home/testuser/.minish/commands.log")
        );
    }

    #[test]
    fn test_override_rc_path() {
        let paths = ConfigPaths::from_parts(
            Some(PathBuf::from("/etc/minishrc")),
            Some(PathBuf::from("/home/testuser")),
        );
        assert_eq!(paths.rc_path, Some(PathBuf::from("/etc/minishrc")));
    }

    #[test]
    fn test_missing_home() {
        let paths = ConfigPaths::from_parts(None, None);
        assert!(paths.rc_path.is_none());
        assert!(paths.default_log_file().starts_with(env::temp_dir()));
    }
}
