mod completer;
pub mod source;

pub use completer::ShellCompleter;
pub use source::{EditorSource, Input, LineSource};
