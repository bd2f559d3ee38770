use rustyline::completion::Pair;

use crate::core::commands::CommandType;

#[derive(Clone, Default)]
pub struct CommandCompleter;

impl CommandCompleter {
    pub fn new() -> Self {
        Self
    }

    pub fn complete_command(&self, line: &str) -> Vec<Pair> {
        let input = line.trim();

        CommandType::NAMES
            .iter()
            .filter(|cmd| cmd.starts_with(input))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: format!("{} ", cmd),
            })
            .collect()
    }
}
