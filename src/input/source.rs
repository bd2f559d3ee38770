use std::path::Path;

use rustyline::{config::Configurer, error::ReadlineError, history::FileHistory, Editor};

use super::ShellCompleter;
use crate::error::ShellError;
use crate::highlight::SyntaxHighlighter;
use crate::path::PathResolver;

/// One read from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// Ctrl-C at the prompt.
    Interrupted,
    /// Ctrl-D or closed stdin.
    Eof,
}

/// Anything the REPL can pull lines from.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Input, ShellError>;

    fn add_history(&mut self, _line: &str) {}

    fn set_current_dir(&mut self, _dir: &Path) {}
}

pub struct EditorSource {
    editor: Editor<ShellCompleter, FileHistory>,
    quiet: bool,
}

impl EditorSource {
    pub fn new(
        highlighter: SyntaxHighlighter,
        resolver: PathResolver,
        current_dir: &Path,
        history_size: usize,
        quiet: bool,
    ) -> Result<Self, ShellError> {
        let completer = ShellCompleter::new(highlighter, resolver, current_dir);
        let mut editor = Editor::<ShellCompleter, FileHistory>::new()?;

        editor.set_helper(Some(completer));
        // Confirmation answers must not end up in history
        editor.set_auto_add_history(false);
        editor.set_max_history_size(history_size)?;

        Ok(EditorSource { editor, quiet })
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> Result<Input, ShellError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Input::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Eof),
            Err(e) => Err(e.into()),
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            if !self.quiet {
                eprintln!("Warning: Couldn't add to history: {}", e);
            }
        }
    }

    fn set_current_dir(&mut self, dir: &Path) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.set_current_dir(dir);
        }
    }
}
