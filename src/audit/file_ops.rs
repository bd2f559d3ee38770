use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
};

pub fn append_line(file_path: &Path, entry: &str) -> Result<(), std::io::Error> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(file_path)?;

    writeln!(file, "{}", entry)?;
    Ok(())
}
