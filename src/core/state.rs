use std::env;
use std::io;
use std::path::{Path, PathBuf};

use crate::audit::CommandLog;
use crate::path::PathResolver;

/// Everything a running shell remembers between commands.
pub struct ShellState {
    current_dir: PathBuf,
    resolver: PathResolver,
    log: CommandLog,
}

impl ShellState {
    pub fn new(current_dir: PathBuf, log_file: PathBuf) -> Self {
        Self {
            current_dir,
            resolver: PathResolver::new(),
            log: CommandLog::new(log_file),
        }
    }

    /// Starts in the host process's working directory.
    pub fn from_process(log_file: PathBuf) -> io::Result<Self> {
        Ok(Self::new(env::current_dir()?, log_file))
    }

    pub fn with_resolver(mut self, resolver: PathResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn resolve(&self, token: &str) -> PathBuf {
        self.resolver.resolve(token, &self.current_dir)
    }

    pub fn log_file(&self) -> &Path {
        self.log.path()
    }

    pub fn log(&mut self) -> &mut CommandLog {
        &mut self.log
    }

    pub(crate) fn set_current_dir(&mut self, dir: PathBuf) {
        self.current_dir = dir;
    }

    /// Moves to the nearest existing ancestor when the current directory has
    /// disappeared underneath the shell. Returns the new directory if it moved.
    pub fn recover_current_dir(&mut self) -> Option<&Path> {
        if self.current_dir.is_dir() {
            return None;
        }

        let fallback = self
            .current_dir
            .ancestors()
            .skip(1)
            .find(|dir| dir.is_dir())
            .map(Path::to_path_buf)
            .or_else(|| self.resolver.home_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("/"));

        self.current_dir = fallback;
        Some(self.current_dir.as_path())
    }
}
