use std::io::Write;

use super::{Command, CommandError, Outcome};
use crate::core::console::Console;
use crate::core::state::ShellState;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExitCommand;

impl ExitCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ExitCommand {
    fn execute<W: Write>(
        &self,
        _state: &mut ShellState,
        _console: &mut Console<W>,
    ) -> Result<Outcome, CommandError> {
        Ok(Outcome::Exit)
    }
}
