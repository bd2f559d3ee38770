use std::io::Write;
use std::path::Path;

use super::{Command, CommandError, Outcome, ParsedArgs};
use crate::core::console::Console;
use crate::core::state::ShellState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdCommand {
    target: Option<String>,
}

impl CdCommand {
    pub fn parse(args: &ParsedArgs) -> Result<Self, CommandError> {
        if args.operands.len() > 1 {
            return Err(CommandError::InvalidArguments(
                "cd: too many arguments".to_string(),
            ));
        }

        Ok(Self {
            target: args.operands.first().cloned(),
        })
    }
}

impl Command for CdCommand {
    fn execute<W: Write>(
        &self,
        state: &mut ShellState,
        _console: &mut Console<W>,
    ) -> Result<Outcome, CommandError> {
        let destination = match self.target.as_deref() {
            Some(token) => state.resolve(token),
            None => state
                .resolver()
                .home_dir()
                .map(Path::to_path_buf)
                .ok_or(CommandError::HomeDirNotFound)?,
        };

        if !destination.is_dir() {
            let shown = self
                .target
                .clone()
                .unwrap_or_else(|| destination.display().to_string());
            return Err(CommandError::NoSuchDirectory(shown));
        }

        state.set_current_dir(destination);
        Ok(Outcome::Done)
    }
}
