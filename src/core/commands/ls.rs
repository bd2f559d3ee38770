use std::fs::{self, Metadata};
use std::io::Write;

use chrono::{DateTime, Local};

use super::{Command, CommandError, Outcome, ParsedArgs};
use crate::core::console::Console;
use crate::core::state::ShellState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LsCommand {
    long: bool,
    target: Option<String>,
}

struct Entry {
    name: String,
    metadata: Metadata,
}

impl LsCommand {
    pub fn parse(args: &ParsedArgs) -> Result<Self, CommandError> {
        if args.operands.len() > 1 {
            return Err(CommandError::InvalidArguments(
                "ls: too many operands\nusage: ls [-l] [path]".to_string(),
            ));
        }

        Ok(Self {
            long: args.has('l'),
            target: args.operands.first().cloned(),
        })
    }

    fn read_entries(&self, state: &ShellState) -> Result<Vec<Entry>, CommandError> {
        let token = self.target.as_deref().unwrap_or(".");
        let path = state.resolve(token);
        let metadata = fs::metadata(&path).map_err(|e| CommandError::io("ls", token, e))?;

        if !metadata.is_dir() {
            return Ok(vec![Entry {
                name: token.to_string(),
                metadata,
            }]);
        }

        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(&path).map_err(|e| CommandError::io("ls", token, e))? {
            let dir_entry = dir_entry.map_err(|e| CommandError::io("ls", token, e))?;
            // Entries can vanish between read_dir and stat
            let Ok(metadata) = dir_entry.metadata() else {
                continue;
            };
            entries.push(Entry {
                name: dir_entry.file_name().to_string_lossy().into_owned(),
                metadata,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn render_name<W: Write>(&self, entry: &Entry, console: &Console<W>) -> String {
        if entry.metadata.is_dir() {
            console.highlighter().highlight_directory(&entry.name)
        } else {
            entry.name.clone()
        }
    }

    fn render_long<W: Write>(&self, entry: &Entry, console: &Console<W>) -> String {
        let modified = entry
            .metadata
            .modified()
            .map(|time| DateTime::<Local>::from(time).format("%b %e %H:%M").to_string())
            .unwrap_or_else(|_| "-".repeat(12));

        format!(
            "{}{} {:>10} {} {}",
            kind_char(&entry.metadata),
            permissions(&entry.metadata),
            entry.metadata.len(),
            modified,
            self.render_name(entry, console)
        )
    }
}

impl Command for LsCommand {
    fn execute<W: Write>(
        &self,
        state: &mut ShellState,
        console: &mut Console<W>,
    ) -> Result<Outcome, CommandError> {
        let entries = self.read_entries(state)?;

        for entry in &entries {
            let line = if self.long {
                self.render_long(entry, console)
            } else {
                self.render_name(entry, console)
            };
            console.line(line)?;
        }

        Ok(Outcome::Done)
    }
}

fn kind_char(metadata: &Metadata) -> char {
    if metadata.is_dir() {
        'd'
    } else if metadata.file_type().is_symlink() {
        'l'
    } else {
        '-'
    }
}

#[cfg(unix)]
fn permissions(metadata: &Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;

    let mode = metadata.permissions().mode();
    let flags = ['r', 'w', 'x'];
    (0..9)
        .map(|bit| {
            if mode & (1 << (8 - bit)) != 0 {
                flags[bit % 3]
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(not(unix))]
fn permissions(metadata: &Metadata) -> String {
    if metadata.permissions().readonly() {
        "r--r--r--".to_string()
    } else {
        "rw-rw-rw-".to_string()
    }
}
