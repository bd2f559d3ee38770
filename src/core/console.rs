use std::fmt::Display;
use std::io::{self, Stdout, Write};

use crate::highlight::SyntaxHighlighter;

/// Where command output goes. Commands never touch stdout directly so the
/// same handlers can write into a buffer under test.
pub struct Console<W: Write = Stdout> {
    out: W,
    highlighter: SyntaxHighlighter,
}

impl Console<Stdout> {
    pub fn stdout(highlighter: SyntaxHighlighter) -> Self {
        Self::new(io::stdout(), highlighter)
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W, highlighter: SyntaxHighlighter) -> Self {
        Self { out, highlighter }
    }

    pub fn plain(out: W) -> Self {
        Self::new(out, SyntaxHighlighter::plain())
    }

    pub fn highlighter(&self) -> &SyntaxHighlighter {
        &self.highlighter
    }

    pub fn line(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.out, "{}", text)
    }

    /// Writes bytes untouched, terminating them with a newline when missing.
    pub fn raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)?;
        if !bytes.is_empty() && !bytes.ends_with(b"\n") {
            self.out.write_all(b"\n")?;
        }
        Ok(())
    }

    pub fn error(&mut self, err: impl Display) -> io::Result<()> {
        let text = self.highlighter.highlight_error(&err.to_string());
        writeln!(self.out, "{}", text)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl Console<Vec<u8>> {
    pub fn buffer() -> Self {
        Self::plain(Vec::new())
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_appends_missing_newline() {
        let mut console = Console::buffer();
        console.raw(b"Hello World!\nLine 2").unwrap();
        assert_eq!(console.contents(), "Hello World!\nLine 2\n");
    }

    #[test]
    fn test_raw_keeps_existing_newline() {
        let mut console = Console::buffer();
        console.raw(b"done\n").unwrap();
        console.raw(b"").unwrap();
        assert_eq!(console.contents(), "done\n");
    }

    #[test]
    fn test_error_is_one_line() {
        let mut console = Console::buffer();
        console.error("cat: x: No such file or directory").unwrap();
        assert_eq!(console.contents(), "cat: x: No such file or directory\n");
    }
}
