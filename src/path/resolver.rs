use std::path::{Component, Path, PathBuf};

/// Turns user-supplied path tokens into absolute paths against the shell's
/// virtual current directory. Resolution is purely lexical; nothing here
/// touches the filesystem.
#[derive(Debug, Clone)]
pub struct PathResolver {
    home: Option<PathBuf>,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PathResolver {
    pub fn new() -> Self {
        Self {
            home: dirs::home_dir(),
        }
    }

    pub fn with_home(home: Option<PathBuf>) -> Self {
        Self { home }
    }

    pub fn home_dir(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    pub fn resolve(&self, token: &str, current_dir: &Path) -> PathBuf {
        if let Some(expanded) = self.expand_tilde(token) {
            return normalize(&expanded);
        }

        let path = Path::new(token);
        if path.is_absolute() {
            normalize(path)
        } else {
            normalize(&current_dir.join(path))
        }
    }

    fn expand_tilde(&self, token: &str) -> Option<PathBuf> {
        let home = self.home.as_ref()?;
        if token == "~" {
            return Some(home.clone());
        }

        // "~user/..." is left alone
        let rest = token.strip_prefix("~/")?;
        let mut expanded = home.clone();
        for part in rest.split('/').filter(|p| !p.is_empty()) {
            expanded.push(part);
        }
        Some(expanded)
    }

    /// Renders `path` for display, abbreviating the home prefix to `~`.
    pub fn abbreviate(&self, path: &Path) -> String {
        match self.home.as_ref().and_then(|home| path.strip_prefix(home).ok()) {
            Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
            Some(rest) => format!("~/{}", rest.display()),
            None => path.display().to_string(),
        }
    }
}

/// Collapses `.` and `..` without consulting the filesystem. `..` never
/// climbs above the root.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if normalized.file_name().is_some() {
                    normalized.pop();
                }
            }
            Component::Normal(part) => normalized.push(part),
        }
    }

    normalized
}
