use minish::shell::Shell;

fn main() -> Result<(), minish::error::ShellError> {
    let mut shell = Shell::new()?;
    shell.run()
}
