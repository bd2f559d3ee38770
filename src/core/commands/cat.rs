use std::fs;
use std::io::Write;

use super::{Command, CommandError, Outcome, ParsedArgs};
use crate::core::console::Console;
use crate::core::state::ShellState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatCommand {
    files: Vec<String>,
}

impl CatCommand {
    pub fn parse(args: &ParsedArgs) -> Result<Self, CommandError> {
        if args.operands.is_empty() {
            return Err(CommandError::InvalidArguments(
                "cat: missing operand\nusage: cat <path>...".to_string(),
            ));
        }

        Ok(Self {
            files: args.operands.clone(),
        })
    }

    fn read(&self, token: &str, state: &ShellState) -> Result<Vec<u8>, CommandError> {
        let path = state.resolve(token);
        let metadata = fs::metadata(&path).map_err(|e| CommandError::io("cat", token, e))?;
        if metadata.is_dir() {
            return Err(CommandError::IsADirectory {
                command: "cat",
                path: token.to_string(),
            });
        }

        fs::read(&path).map_err(|e| CommandError::io("cat", token, e))
    }
}

impl Command for CatCommand {
    fn execute<W: Write>(
        &self,
        state: &mut ShellState,
        console: &mut Console<W>,
    ) -> Result<Outcome, CommandError> {
        // One bad operand never stops the rest
        for token in &self.files {
            match self.read(token, state) {
                Ok(content) => console.raw(&content)?,
                Err(err) => console.error(&err)?,
            }
        }

        Ok(Outcome::Done)
    }
}
