use std::fs::{self, Metadata};
use std::io::{self, Write};
use std::path::Path;

use super::cp::{copy_tree, is_within, target_path, two_operands};
use super::{Command, CommandError, Outcome, ParsedArgs};
use crate::core::console::Console;
use crate::core::state::ShellState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MvCommand {
    source: String,
    destination: String,
}

impl MvCommand {
    pub fn parse(args: &ParsedArgs) -> Result<Self, CommandError> {
        let (source, destination) = two_operands("mv", "mv <src> <dst>", args)?;
        Ok(Self {
            source,
            destination,
        })
    }
}

impl Command for MvCommand {
    fn execute<W: Write>(
        &self,
        state: &mut ShellState,
        _console: &mut Console<W>,
    ) -> Result<Outcome, CommandError> {
        let source = state.resolve(&self.source);
        let metadata =
            fs::symlink_metadata(&source).map_err(|e| CommandError::io("mv", &self.source, e))?;
        let destination = target_path(&source, state.resolve(&self.destination));

        if destination == source {
            return Err(CommandError::Refused {
                command: "mv",
                path: self.source.clone(),
                reason: "source and destination are the same file",
            });
        }
        if metadata.is_dir() && is_within(&destination, &source) {
            return Err(CommandError::Refused {
                command: "mv",
                path: self.source.clone(),
                reason: "cannot move a directory into itself",
            });
        }

        match fs::rename(&source, &destination) {
            Ok(()) => {}
            Err(e) if crosses_devices(&e) => move_across_devices(&source, &destination, &metadata)
                .map_err(|e| CommandError::io("mv", &self.destination, e))?,
            Err(e) => return Err(CommandError::io("mv", &self.source, e)),
        }

        Ok(Outcome::Done)
    }
}

#[cfg(unix)]
fn crosses_devices(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::EXDEV)
}

#[cfg(not(unix))]
fn crosses_devices(_err: &io::Error) -> bool {
    false
}

fn move_across_devices(source: &Path, destination: &Path, metadata: &Metadata) -> io::Result<()> {
    if metadata.is_dir() {
        copy_tree(source, destination)?;
        fs::remove_dir_all(source)
    } else {
        fs::copy(source, destination)?;
        fs::remove_file(source)
    }
}
