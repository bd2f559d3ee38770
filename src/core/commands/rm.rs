use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{Command, CommandError, Outcome, ParsedArgs};
use crate::core::console::Console;
use crate::core::state::ShellState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RmCommand {
    recursive: bool,
    targets: Vec<String>,
}

impl RmCommand {
    pub fn parse(args: &ParsedArgs) -> Result<Self, CommandError> {
        if args.operands.is_empty() {
            return Err(CommandError::InvalidArguments(
                "rm: missing operand\nusage: rm [-r] <path>...".to_string(),
            ));
        }

        Ok(Self {
            recursive: args.recursive(),
            targets: args.operands.clone(),
        })
    }

    /// Deletes files straight away. Directories are only collected; the
    /// caller asks the user before handing them to [`remove_confirmed`].
    fn remove_one(
        &self,
        token: &str,
        state: &ShellState,
        pending: &mut Vec<PathBuf>,
    ) -> Result<(), CommandError> {
        if is_dot_entry(token) {
            return Err(CommandError::Refused {
                command: "rm",
                path: token.to_string(),
                reason: "refusing to remove '.' or '..' directory",
            });
        }

        let path = state.resolve(token);
        if path.parent().is_none() {
            return Err(CommandError::Refused {
                command: "rm",
                path: token.to_string(),
                reason: "refusing to remove the root directory",
            });
        }

        let metadata = fs::symlink_metadata(&path).map_err(|e| CommandError::io("rm", token, e))?;
        if !metadata.is_dir() {
            return fs::remove_file(&path).map_err(|e| CommandError::io("rm", token, e));
        }

        if !self.recursive {
            return Err(CommandError::NeedsRecursive {
                command: "rm",
                path: token.to_string(),
            });
        }

        if !pending.contains(&path) {
            pending.push(path);
        }
        Ok(())
    }
}

impl Command for RmCommand {
    fn execute<W: Write>(
        &self,
        state: &mut ShellState,
        console: &mut Console<W>,
    ) -> Result<Outcome, CommandError> {
        let mut pending = Vec::new();

        for token in &self.targets {
            if let Err(err) = self.remove_one(token, state, &mut pending) {
                console.error(&err)?;
            }
        }

        if pending.is_empty() {
            Ok(Outcome::Done)
        } else {
            Ok(Outcome::ConfirmRemoval(pending))
        }
    }
}

/// Second phase of `rm -r`, run once the user said yes.
pub fn remove_confirmed(path: &Path) -> Result<(), CommandError> {
    fs::remove_dir_all(path).map_err(|e| CommandError::io("rm", &path.display().to_string(), e))
}

pub fn confirmation_prompt(path: &Path) -> String {
    format!(
        "rm: remove directory '{}' and all its contents? [y/N] ",
        path.display()
    )
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn is_dot_entry(token: &str) -> bool {
    let last = token.trim_end_matches('/').rsplit('/').next().unwrap_or(token);
    last == "." || last == ".."
}
