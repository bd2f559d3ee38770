use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{Command, CommandError, Outcome, ParsedArgs};
use crate::core::console::Console;
use crate::core::state::ShellState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpCommand {
    recursive: bool,
    source: String,
    destination: String,
}

impl CpCommand {
    pub fn parse(args: &ParsedArgs) -> Result<Self, CommandError> {
        let (source, destination) = two_operands("cp", "cp [-r] <src> <dst>", args)?;
        Ok(Self {
            recursive: args.recursive(),
            source,
            destination,
        })
    }
}

impl Command for CpCommand {
    fn execute<W: Write>(
        &self,
        state: &mut ShellState,
        _console: &mut Console<W>,
    ) -> Result<Outcome, CommandError> {
        let source = state.resolve(&self.source);
        let metadata = fs::metadata(&source).map_err(|e| CommandError::io("cp", &self.source, e))?;
        let destination = target_path(&source, state.resolve(&self.destination));

        if metadata.is_dir() {
            if !self.recursive {
                return Err(CommandError::NeedsRecursive {
                    command: "cp",
                    path: self.source.clone(),
                });
            }
            if is_within(&destination, &source) {
                return Err(CommandError::Refused {
                    command: "cp",
                    path: self.source.clone(),
                    reason: "cannot copy a directory into itself",
                });
            }
            copy_tree(&source, &destination)
                .map_err(|e| CommandError::io("cp", &self.destination, e))?;
        } else {
            if destination == source || same_file(&source, &destination) {
                return Err(CommandError::Refused {
                    command: "cp",
                    path: self.source.clone(),
                    reason: "source and destination are the same file",
                });
            }
            fs::copy(&source, &destination)
                .map_err(|e| CommandError::io("cp", &self.destination, e))?;
        }

        Ok(Outcome::Done)
    }
}

/// Reads exactly two operands, producing the usage message otherwise.
pub(super) fn two_operands(
    command: &'static str,
    usage: &str,
    args: &ParsedArgs,
) -> Result<(String, String), CommandError> {
    match args.operands.as_slice() {
        [source, destination] => Ok((source.clone(), destination.clone())),
        [] => Err(CommandError::InvalidArguments(format!(
            "{}: missing file operand\nusage: {}",
            command, usage
        ))),
        [source] => Err(CommandError::InvalidArguments(format!(
            "{}: missing destination file operand after '{}'\nusage: {}",
            command, source, usage
        ))),
        _ => Err(CommandError::InvalidArguments(format!(
            "{}: too many operands\nusage: {}",
            command, usage
        ))),
    }
}

/// An existing directory as destination means "put it inside".
pub(super) fn target_path(source: &Path, destination: PathBuf) -> PathBuf {
    match source.file_name() {
        Some(name) if destination.is_dir() => destination.join(name),
        _ => destination,
    }
}

/// Whether both paths lead to the same file once links are followed.
#[cfg(unix)]
pub(super) fn same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
pub(super) fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Whether `path` is `dir` or lies below it, after resolving symlinks in
/// whatever part of `path` already exists.
pub(super) fn is_within(path: &Path, dir: &Path) -> bool {
    if path.starts_with(dir) {
        return true;
    }
    match (canonical(path), fs::canonicalize(dir)) {
        (Some(path), Ok(dir)) => path.starts_with(dir),
        _ => false,
    }
}

/// Canonicalizes the longest existing prefix of `path` and re-appends the rest.
fn canonical(path: &Path) -> Option<PathBuf> {
    let mut missing = Vec::new();
    let mut existing = path;
    loop {
        if let Ok(mut resolved) = fs::canonicalize(existing) {
            resolved.extend(missing.iter().rev());
            return Some(resolved);
        }
        missing.push(existing.file_name()?);
        existing = existing.parent()?;
    }
}

/// Copies `source` and everything below it to `destination`, creating
/// directories as needed and overwriting files that already exist.
pub(super) fn copy_tree(source: &Path, destination: &Path) -> io::Result<()> {
    fs::create_dir_all(destination)?;

    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let target = destination.join(entry.file_name());

        if file_type.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else if file_type.is_symlink() {
            copy_link(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_link(source: &Path, target: &Path) -> io::Result<()> {
    let link = fs::read_link(source)?;
    if fs::symlink_metadata(target).is_ok() {
        fs::remove_file(target)?;
    }
    std::os::unix::fs::symlink(link, target)
}

#[cfg(not(unix))]
fn copy_link(source: &Path, target: &Path) -> io::Result<()> {
    fs::copy(source, target).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Sandbox;
    use std::fs;

    #[test]
    fn test_cp_file() {
        let mut sandbox = Sandbox::new();
        let new_file = sandbox.path("copied.txt");
        sandbox.run(&format!("cp test1.txt {}", new_file.display()));

        assert!(new_file.exists());
        let content = fs::read_to_string(&new_file).unwrap();
        assert_eq!(content, "Hello World!\nLine 2");
    }

    #[test]
    fn test_cp_then_cat_round_trip() {
        let mut sandbox = Sandbox::new();
        sandbox.run("cp test2.txt copy.txt");
        let output = sandbox.output("cat copy.txt");
        assert_eq!(output, "Another file\n");
    }

    #[test]
    fn test_cp_overwrites_destination() {
        let mut sandbox = Sandbox::new();
        sandbox.run("cp test1.txt test2.txt");
        let content = fs::read_to_string(sandbox.path("test2.txt")).unwrap();
        assert_eq!(content, "Hello World!\nLine 2");
    }

    #[test]
    fn test_cp_into_existing_directory() {
        let mut sandbox = Sandbox::new();
        sandbox.run("cp test1.txt subdir");
        assert!(sandbox.path("subdir/test1.txt").is_file());
    }

    #[test]
    fn test_cp_directory_without_r() {
        let mut sandbox = Sandbox::new();
        let output = sandbox.output("cp subdir newdir");
        assert!(output.contains("Is a directory (use -r)"));
        assert!(!sandbox.path("newdir").exists());
    }

    #[test]
    fn test_cp_directory_with_r() {
        let mut sandbox = Sandbox::new();
        fs::create_dir_all(sandbox.path("subdir/nested")).unwrap();
        fs::write(sandbox.path("subdir/a.txt"), "alpha").unwrap();
        fs::write(sandbox.path("subdir/nested/b.txt"), "beta").unwrap();

        let new_dir = sandbox.path("newdir");
        sandbox.run(&format!("cp -r subdir {}", new_dir.display()));

        assert!(new_dir.is_dir());
        assert_eq!(fs::read_to_string(new_dir.join("a.txt")).unwrap(), "alpha");
        assert_eq!(
            fs::read_to_string(new_dir.join("nested/b.txt")).unwrap(),
            "beta"
        );
        assert!(sandbox.path("subdir/a.txt").exists());
    }

    #[test]
    fn test_cp_uppercase_recursive_flag() {
        let mut sandbox = Sandbox::new();
        sandbox.run("cp -R subdir copy");
        assert!(sandbox.path("copy").is_dir());
    }

    #[test]
    fn test_cp_missing_source() {
        let mut sandbox = Sandbox::new();
        let output = sandbox.output("cp ghost.txt out.txt");
        assert!(output.contains("No such file or directory"));
        assert!(!sandbox.path("out.txt").exists());
    }

    #[test]
    fn test_cp_directory_into_itself() {
        let mut sandbox = Sandbox::new();
        let output = sandbox.output("cp -r subdir subdir/inner");
        assert!(output.contains("into itself"));
        assert!(!sandbox.path("subdir/inner").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_cp_directory_into_itself_through_link() {
        let mut sandbox = Sandbox::new();
        std::os::unix::fs::symlink("subdir", sandbox.path("alias")).unwrap();

        let output = sandbox.output("cp -r subdir alias/inner");
        assert!(output.contains("into itself"));
        assert!(!sandbox.path("subdir/inner").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_cp_onto_symlink_to_source_keeps_data() {
        let mut sandbox = Sandbox::new();
        std::os::unix::fs::symlink("test1.txt", sandbox.path("alias.txt")).unwrap();

        let output = sandbox.output("cp test1.txt alias.txt");
        assert!(output.contains("same file"));
        assert_eq!(
            fs::read_to_string(sandbox.path("test1.txt")).unwrap(),
            "Hello World!\nLine 2"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_cp_onto_hard_link_to_source_keeps_data() {
        let mut sandbox = Sandbox::new();
        fs::hard_link(sandbox.path("test1.txt"), sandbox.path("twin.txt")).unwrap();

        let output = sandbox.output("cp twin.txt test1.txt");
        assert!(output.contains("same file"));
        assert_eq!(
            fs::read_to_string(sandbox.path("test1.txt")).unwrap(),
            "Hello World!\nLine 2"
        );
    }

    #[test]
    fn test_cp_needs_two_operands() {
        let mut sandbox = Sandbox::new();
        let output = sandbox.output("cp test1.txt");
        assert!(output.contains("missing destination file operand"));
    }

    #[cfg(unix)]
    #[test]
    fn test_cp_recursive_keeps_symlinks() {
        let mut sandbox = Sandbox::new();
        fs::write(sandbox.path("subdir/real.txt"), "data").unwrap();
        std::os::unix::fs::symlink("real.txt", sandbox.path("subdir/link.txt")).unwrap();

        sandbox.run("cp -r subdir copy");

        let link = sandbox.path("copy/link.txt");
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(link).unwrap(), "data");
    }
}
