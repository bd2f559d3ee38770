use std::io::Stdout;

mod repl;
mod signal;

pub use repl::{Repl, ReplState};
pub use signal::Interrupts;

use crate::{
    core::{
        config::Config,
        console::Console,
        state::ShellState,
    },
    error::ShellError,
    input::EditorSource,
};

pub struct Shell {
    repl: Repl<EditorSource, Stdout>,
}

impl Shell {
    pub fn new() -> Result<Self, ShellError> {
        let config = Config::load().unwrap_or_else(|e| {
            eprintln!("Warning: ignoring config: {}", e);
            Config::fallback()
        });
        let highlighter = config.highlighter();

        let state = ShellState::from_process(config.log_file.clone())?;
        let source = EditorSource::new(
            highlighter,
            state.resolver().clone(),
            state.current_dir(),
            config.history_size,
            config.quiet,
        )?;

        let interrupts = Interrupts::new();
        interrupts.install()?;

        let repl = Repl::new(state, source, Console::stdout(highlighter))
            .with_interrupts(interrupts)
            .quiet(config.quiet);

        Ok(Shell { repl })
    }

    pub fn run(&mut self) -> Result<(), ShellError> {
        self.repl.run()
    }
}
