use std::{
    fs,
    path::{Path, PathBuf},
};

use rustyline::completion::Pair;

use crate::path::PathResolver;

/// Completes path operands against the shell's own current directory rather
/// than the process working directory.
#[derive(Clone)]
pub struct PathCompleter {
    resolver: PathResolver,
    current_dir: PathBuf,
}

impl PathCompleter {
    pub fn new(resolver: PathResolver, current_dir: PathBuf) -> Self {
        Self {
            resolver,
            current_dir,
        }
    }

    pub fn set_current_dir(&mut self, dir: &Path) {
        self.current_dir = dir.to_path_buf();
    }

    pub fn complete_path(&self, incomplete: &str) -> Vec<Pair> {
        let (typed_dir, file_prefix) = split_incomplete(incomplete);
        let dir_to_search = if typed_dir.is_empty() {
            self.current_dir.clone()
        } else {
            self.resolver.resolve(typed_dir, &self.current_dir)
        };

        self.get_path_matches(&dir_to_search, typed_dir, file_prefix)
    }

    fn get_path_matches(&self, dir_to_search: &Path, typed_dir: &str, file_prefix: &str) -> Vec<Pair> {
        let mut matches = Vec::new();
        let show_hidden = file_prefix.starts_with('.');

        if let Ok(entries) = fs::read_dir(dir_to_search) {
            for entry in entries.filter_map(Result::ok) {
                let Some(name) = entry.file_name().to_str().map(String::from) else {
                    continue;
                };
                if !name.starts_with(file_prefix) || (name.starts_with('.') && !show_hidden) {
                    continue;
                }

                let is_dir = entry.path().is_dir();
                matches.push(create_completion_pair(&name, typed_dir, is_dir));
            }
        }

        matches.sort_by(|a, b| a.display.cmp(&b.display));
        matches
    }
}

/// Splits `docs/no` into the directory part the user typed (`docs/`) and the
/// name prefix still being completed (`no`).
fn split_incomplete(incomplete: &str) -> (&str, &str) {
    match incomplete.rfind('/') {
        Some(index) => (&incomplete[..=index], &incomplete[index + 1..]),
        None => ("", incomplete),
    }
}

fn create_completion_pair(name: &str, typed_dir: &str, is_dir: bool) -> Pair {
    if is_dir {
        Pair {
            display: format!("{}/", name),
            replacement: format!("{}{}/", typed_dir, name),
        }
    } else {
        Pair {
            display: name.to_string(),
            replacement: format!("{}{} ", typed_dir, name),
        }
    }
}
