use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;

mod args;
mod cat;
mod cd;
mod cp;
mod exit;
mod ls;
mod mv;
mod rm;

pub use args::ParsedArgs;
pub use cat::CatCommand;
pub use cd::CdCommand;
pub use cp::CpCommand;
pub use exit::ExitCommand;
pub use ls::LsCommand;
pub use mv::MvCommand;
pub use rm::{confirmation_prompt, is_affirmative, remove_confirmed, RmCommand};

use crate::core::console::Console;
use crate::core::state::ShellState;

#[derive(Debug)]
pub enum CommandError {
    NotFound(String),
    InvalidArguments(String),
    NoSuchFile {
        command: &'static str,
        path: String,
    },
    NoSuchDirectory(String),
    IsADirectory {
        command: &'static str,
        path: String,
    },
    NeedsRecursive {
        command: &'static str,
        path: String,
    },
    Refused {
        command: &'static str,
        path: String,
        reason: &'static str,
    },
    HomeDirNotFound,
    IoError {
        command: &'static str,
        path: String,
        source: io::Error,
    },
    /// The console itself could not be written to.
    Output(io::Error),
}

impl CommandError {
    /// Maps a filesystem error on `path` to the matching shell message.
    pub fn io(command: &'static str, path: &str, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => CommandError::NoSuchFile {
                command,
                path: path.to_string(),
            },
            _ => CommandError::IoError {
                command,
                path: path.to_string(),
                source: err,
            },
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::NotFound(cmd) => write!(f, "{}: command not found", cmd),
            CommandError::InvalidArguments(msg) => write!(f, "{}", msg),
            CommandError::NoSuchFile { command, path } => {
                write!(f, "{}: {}: No such file or directory", command, path)
            }
            CommandError::NoSuchDirectory(path) => write!(f, "cd: {}: No such directory", path),
            CommandError::IsADirectory { command, path } => {
                write!(f, "{}: {}: Is a directory", command, path)
            }
            CommandError::NeedsRecursive { command, path } => {
                write!(f, "{}: {}: Is a directory (use -r)", command, path)
            }
            CommandError::Refused {
                command,
                path,
                reason,
            } => write!(f, "{}: {}: {}", command, path, reason),
            CommandError::HomeDirNotFound => write!(f, "cd: Home directory not found"),
            CommandError::IoError {
                command,
                path,
                source,
            } => write!(f, "{}: {}: {}", command, path, source),
            CommandError::Output(err) => write!(f, "output error: {}", err),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<io::Error> for CommandError {
    fn from(err: io::Error) -> Self {
        CommandError::Output(err)
    }
}

/// What the caller has to do after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Exit,
    /// `rm -r` found directories; each needs a yes from the user before
    /// [`remove_confirmed`] may delete it.
    ConfirmRemoval(Vec<PathBuf>),
}

pub trait Command {
    fn execute<W: Write>(
        &self,
        state: &mut ShellState,
        console: &mut Console<W>,
    ) -> Result<Outcome, CommandError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandType {
    Ls(LsCommand),
    Cd(CdCommand),
    Cat(CatCommand),
    Cp(CpCommand),
    Mv(MvCommand),
    Rm(RmCommand),
    Exit(ExitCommand),
}

impl CommandType {
    pub const NAMES: [&'static str; 7] = ["cat", "cd", "cp", "exit", "ls", "mv", "rm"];

    pub fn is_known(name: &str) -> bool {
        Self::NAMES.contains(&name)
    }

    pub fn parse(name: &str, tokens: &[String]) -> Result<Self, CommandError> {
        let args = ParsedArgs::parse(tokens);
        let command = match name {
            "ls" => CommandType::Ls(LsCommand::parse(&args)?),
            "cd" => CommandType::Cd(CdCommand::parse(&args)?),
            "cat" => CommandType::Cat(CatCommand::parse(&args)?),
            "cp" => CommandType::Cp(CpCommand::parse(&args)?),
            "mv" => CommandType::Mv(MvCommand::parse(&args)?),
            "rm" => CommandType::Rm(RmCommand::parse(&args)?),
            "exit" => CommandType::Exit(ExitCommand::new()),
            _ => return Err(CommandError::NotFound(name.to_string())),
        };
        Ok(command)
    }
}

impl Command for CommandType {
    fn execute<W: Write>(
        &self,
        state: &mut ShellState,
        console: &mut Console<W>,
    ) -> Result<Outcome, CommandError> {
        match self {
            CommandType::Ls(cmd) => cmd.execute(state, console),
            CommandType::Cd(cmd) => cmd.execute(state, console),
            CommandType::Cat(cmd) => cmd.execute(state, console),
            CommandType::Cp(cmd) => cmd.execute(state, console),
            CommandType::Mv(cmd) => cmd.execute(state, console),
            CommandType::Rm(cmd) => cmd.execute(state, console),
            CommandType::Exit(cmd) => cmd.execute(state, console),
        }
    }
}

/// One line of input split into a command name and its argument tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Returns `None` for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace().map(String::from);
        let name = tokens.next()?;
        Some(Invocation {
            name,
            args: tokens.collect(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandExecutor;

impl CommandExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Parses and runs one command. Command failures are printed to the
    /// console and never escape; only a broken console is returned as an
    /// error.
    pub fn dispatch<W: Write>(
        &self,
        name: &str,
        args: &[String],
        state: &mut ShellState,
        console: &mut Console<W>,
    ) -> io::Result<Outcome> {
        let result = CommandType::parse(name, args).and_then(|cmd| cmd.execute(state, console));

        match result {
            Ok(outcome) => Ok(outcome),
            Err(CommandError::Output(err)) => Err(err),
            Err(err) => {
                console.error(&err)?;
                Ok(Outcome::Done)
            }
        }
    }

    pub fn is_builtin(&self, command: &str) -> bool {
        CommandType::is_known(command)
    }
}
