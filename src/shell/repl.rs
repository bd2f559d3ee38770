use std::io::Write;
use std::path::PathBuf;

use super::signal::Interrupts;
use crate::core::commands::{
    confirmation_prompt, is_affirmative, remove_confirmed, CommandExecutor, Invocation, Outcome,
};
use crate::core::console::Console;
use crate::core::state::ShellState;
use crate::error::ShellError;
use crate::input::{Input, LineSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplState {
    Running,
    Exited,
}

/// The read, dispatch, log loop.
pub struct Repl<S: LineSource, W: Write> {
    state: ShellState,
    source: S,
    console: Console<W>,
    executor: CommandExecutor,
    interrupts: Interrupts,
    quiet: bool,
}

impl<S: LineSource, W: Write> Repl<S, W> {
    pub fn new(state: ShellState, source: S, console: Console<W>) -> Self {
        Self {
            state,
            source,
            console,
            executor: CommandExecutor::new(),
            interrupts: Interrupts::new(),
            quiet: false,
        }
    }

    pub fn with_interrupts(mut self, interrupts: Interrupts) -> Self {
        self.interrupts = interrupts;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn console(&self) -> &Console<W> {
        &self.console
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn run(&mut self) -> Result<(), ShellError> {
        while self.step()? == ReplState::Running {}
        Ok(())
    }

    pub fn step(&mut self) -> Result<ReplState, ShellError> {
        let prompt = self.prompt();
        self.source.set_current_dir(self.state.current_dir());

        let line = match self.read(&prompt) {
            Ok(Input::Line(line)) => line,
            Ok(Input::Interrupted) | Ok(Input::Eof) => {
                self.farewell()?;
                return Ok(ReplState::Exited);
            }
            Err(e) => {
                self.warn(format_args!("Error: {}", e));
                return Ok(ReplState::Exited);
            }
        };

        let Some(invocation) = Invocation::parse(&line) else {
            return Ok(ReplState::Running);
        };
        self.source.add_history(&line);

        let outcome = self.executor.dispatch(
            &invocation.name,
            &invocation.args,
            &mut self.state,
            &mut self.console,
        )?;
        self.log(&line);

        let next = match outcome {
            Outcome::Done => ReplState::Running,
            Outcome::Exit => ReplState::Exited,
            Outcome::ConfirmRemoval(paths) => {
                self.confirm_removals(&paths)?;
                ReplState::Running
            }
        };

        if let Some(dir) = self.state.recover_current_dir() {
            let notice = format!("minish: current directory is gone, now in {}", dir.display());
            self.console.line(notice)?;
        }
        self.console.flush()?;

        if next == ReplState::Running && self.interrupts.take_requested() {
            self.farewell()?;
            return Ok(ReplState::Exited);
        }
        Ok(next)
    }

    fn read(&mut self, prompt: &str) -> Result<Input, ShellError> {
        self.interrupts.set_idle(true);
        let input = self.source.read_line(prompt);
        self.interrupts.set_idle(false);
        input
    }

    /// Asks about each queued directory. Anything but a yes, including a
    /// failed read, keeps the directory. The shell is not idle here, so a
    /// signal is deferred until the answers are in.
    fn confirm_removals(&mut self, paths: &[PathBuf]) -> Result<(), ShellError> {
        for path in paths {
            self.console.flush()?;
            let answer = match self.source.read_line(&confirmation_prompt(path)) {
                Ok(Input::Line(answer)) => answer,
                Ok(Input::Interrupted) | Ok(Input::Eof) => String::new(),
                Err(e) => {
                    self.warn(format_args!("Error: {}", e));
                    return Ok(());
                }
            };

            if !is_affirmative(&answer) {
                continue;
            }
            if let Err(err) = remove_confirmed(path) {
                self.console.error(&err)?;
            }
        }
        Ok(())
    }

    fn log(&mut self, line: &str) {
        if let Err(e) = self.state.log().record(line) {
            let path = self.state.log_file().display().to_string();
            self.warn(format_args!(
                "Warning: Couldn't write command log {}: {}",
                path, e
            ));
        }
    }

    fn prompt(&self) -> String {
        let dir = self.state.resolver().abbreviate(self.state.current_dir());
        format!("{} $ ", dir)
    }

    fn farewell(&mut self) -> Result<(), ShellError> {
        if !self.quiet {
            self.console.line("exit")?;
        }
        self.console.flush()?;
        Ok(())
    }

    fn warn(&self, message: std::fmt::Arguments<'_>) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathResolver;
    use std::collections::VecDeque;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Feeds canned input and remembers every prompt it was shown.
    struct ScriptedSource {
        inputs: VecDeque<Result<Input, ShellError>>,
        prompts: Vec<String>,
        history: Vec<String>,
    }

    impl ScriptedSource {
        fn new(inputs: Vec<Input>) -> Self {
            Self {
                inputs: inputs.into_iter().map(Ok).collect(),
                prompts: Vec::new(),
                history: Vec::new(),
            }
        }

        fn lines(lines: &[&str]) -> Self {
            Self::new(lines.iter().map(|l| Input::Line(l.to_string())).collect())
        }

        /// Makes the next read after the scripted lines fail.
        fn then_fail(mut self) -> Self {
            let err = std::io::Error::other("terminal went away");
            self.inputs.push_back(Err(ShellError::Io(err)));
            self
        }
    }

    impl LineSource for ScriptedSource {
        fn read_line(&mut self, prompt: &str) -> Result<Input, ShellError> {
            self.prompts.push(prompt.to_string());
            self.inputs.pop_front().unwrap_or(Ok(Input::Eof))
        }

        fn add_history(&mut self, line: &str) {
            self.history.push(line.to_string());
        }
    }

    struct Fixture {
        temp: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            fs::create_dir(temp.path().join("work")).unwrap();
            fs::write(temp.path().join("work/a.txt"), "hi").unwrap();
            fs::create_dir(temp.path().join("work/subdir")).unwrap();
            fs::write(temp.path().join("work/subdir/keep.txt"), "keep").unwrap();
            Fixture { temp }
        }

        fn work(&self) -> PathBuf {
            self.temp.path().join("work")
        }

        fn log_file(&self) -> PathBuf {
            self.temp.path().join("logs/commands.log")
        }

        fn repl(&self, source: ScriptedSource) -> Repl<ScriptedSource, Vec<u8>> {
            let state = ShellState::new(self.work(), self.log_file())
                .with_resolver(PathResolver::with_home(Some(self.temp.path().to_path_buf())));
            Repl::new(state, source, Console::buffer())
        }

        fn log_lines(&self) -> Vec<String> {
            fs::read_to_string(self.log_file())
                .unwrap_or_default()
                .lines()
                .map(String::from)
                .collect()
        }
    }

    fn output(repl: &Repl<ScriptedSource, Vec<u8>>) -> String {
        repl.console().contents()
    }

    #[test]
    fn test_run_exit() {
        let fixture = Fixture::new();
        let mut repl = fixture.repl(ScriptedSource::lines(&["exit", "ls"]));

        assert!(repl.run().is_ok());
        // Nothing after exit is read
        assert_eq!(repl.source().prompts.len(), 1);
    }

    #[test]
    fn test_keyboard_interrupt_exits_cleanly() {
        let fixture = Fixture::new();
        let mut repl = fixture.repl(ScriptedSource::new(vec![
            Input::Interrupted,
            Input::Line("rm a.txt".to_string()),
        ]));

        assert!(repl.run().is_ok());
        assert!(fixture.work().join("a.txt").exists());
        assert!(output(&repl).contains("exit"));
    }

    #[test]
    fn test_end_of_input_exits() {
        let fixture = Fixture::new();
        let mut repl = fixture.repl(ScriptedSource::lines(&["ls"]));
        assert!(repl.run().is_ok());
        assert!(output(&repl).contains("a.txt"));
    }

    #[test]
    fn test_every_attempt_is_logged_once() {
        let fixture = Fixture::new();
        let lines = [
            "ls -l",
            "",
            "   ",
            "cat missing.txt",
            "frobnicate now",
            "cd subdir",
            "exit",
        ];
        let mut repl = fixture.repl(ScriptedSource::lines(&lines));
        repl.run().unwrap();

        let log = fixture.log_lines();
        assert_eq!(log.len(), 5);
        for (entry, expected) in log.iter().zip(["ls -l", "cat missing.txt", "frobnicate now", "cd subdir", "exit"]) {
            assert!(entry.ends_with(expected), "{} should end with {}", entry, expected);
        }
        assert!(output(&repl).contains("frobnicate: command not found"));
    }

    #[test]
    fn test_empty_lines_skip_history() {
        let fixture = Fixture::new();
        let mut repl = fixture.repl(ScriptedSource::lines(&["", "ls", "exit"]));
        repl.run().unwrap();
        assert_eq!(repl.source().history, vec!["ls", "exit"]);
    }

    #[test]
    fn test_rm_recursive_confirmed() {
        let fixture = Fixture::new();
        let mut repl = fixture.repl(ScriptedSource::lines(&["rm -r subdir", "y", "exit"]));
        repl.run().unwrap();

        assert!(!fixture.work().join("subdir").exists());
        assert!(repl.source().prompts[1].contains("remove directory"));
        // The answer is not a command
        assert_eq!(fixture.log_lines().len(), 2);
    }

    #[test]
    fn test_rm_recursive_declined() {
        let fixture = Fixture::new();
        let mut repl = fixture.repl(ScriptedSource::lines(&["rm -r subdir", "n", "exit"]));
        repl.run().unwrap();

        let kept = fixture.work().join("subdir/keep.txt");
        assert_eq!(fs::read_to_string(kept).unwrap(), "keep");
    }

    #[test]
    fn test_rm_recursive_eof_at_prompt_cancels() {
        let fixture = Fixture::new();
        let mut repl = fixture.repl(ScriptedSource::lines(&["rm -r subdir"]));
        repl.run().unwrap();
        assert!(fixture.work().join("subdir").is_dir());
    }

    #[test]
    fn test_read_error_at_rm_prompt_keeps_directory() {
        let fixture = Fixture::new();
        let mut repl = fixture
            .repl(ScriptedSource::lines(&["rm -r subdir"]).then_fail())
            .quiet(true);

        assert!(repl.run().is_ok());
        assert!(fixture.work().join("subdir/keep.txt").is_file());

        let log = fixture.log_lines();
        assert_eq!(log.len(), 1);
        assert!(log[0].ends_with("rm -r subdir"));
    }

    #[test]
    fn test_read_error_at_main_prompt_exits_cleanly() {
        let fixture = Fixture::new();
        let mut repl = fixture
            .repl(ScriptedSource::lines(&["cp a.txt b.txt"]).then_fail())
            .quiet(true);

        assert!(repl.run().is_ok());
        assert!(fixture.work().join("b.txt").exists());
    }

    #[test]
    fn test_removing_current_dir_recovers() {
        let fixture = Fixture::new();
        let mut repl = fixture.repl(ScriptedSource::lines(&[
            "cd subdir",
            "rm -r ../subdir",
            "YES",
            "exit",
        ]));
        repl.run().unwrap();

        assert_eq!(repl.state().current_dir(), fixture.work().as_path());
        assert!(output(&repl).contains("current directory is gone"));
    }

    #[test]
    fn test_prompt_tracks_virtual_dir() {
        let fixture = Fixture::new();
        let mut repl = fixture.repl(ScriptedSource::lines(&["cd subdir", "cd /", "exit"]));
        repl.run().unwrap();

        let prompts = &repl.source().prompts;
        assert_eq!(prompts[0], "~/work $ ");
        assert_eq!(prompts[1], "~/work/subdir $ ");
        assert_eq!(prompts[2], format!("{} $ ", Path::new("/").display()));
    }

    #[test]
    fn test_pending_interrupt_stops_after_command() {
        let fixture = Fixture::new();
        let interrupts = Interrupts::new();
        let mut repl = fixture
            .repl(ScriptedSource::lines(&["cp a.txt b.txt", "rm a.txt"]))
            .with_interrupts(interrupts.clone());

        interrupts.request();
        repl.run().unwrap();

        assert!(fixture.work().join("b.txt").exists());
        assert!(fixture.work().join("a.txt").exists());
    }

    #[test]
    fn test_quiet_skips_farewell() {
        let fixture = Fixture::new();
        let mut repl = fixture.repl(ScriptedSource::lines(&[])).quiet(true);
        repl.run().unwrap();
        assert!(output(&repl).is_empty());
    }

    #[test]
    fn test_unwritable_log_does_not_stop_loop() {
        let fixture = Fixture::new();
        // A directory squatting on the log path makes appends fail
        fs::create_dir_all(fixture.log_file()).unwrap();

        let mut repl = fixture
            .repl(ScriptedSource::lines(&["cp a.txt b.txt", "cat b.txt", "exit"]))
            .quiet(true);
        assert!(repl.run().is_ok());
        assert!(output(&repl).contains("hi"));
    }
}
