//! Line-oriented file helpers used by cache manifests.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

/// Reads a text file into its lines, without line terminators.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn read_lines(path: impl AsRef<Path>) -> std::io::Result<Vec<String>> {
    let file = File::open(path)?;
    BufReader::new(file).lines().collect()
}

/// Writes each line followed by `\n`, replacing the file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_lines<S: AsRef<str>>(path: impl AsRef<Path>, lines: &[S]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for line in lines {
        writer.write_all(line.as_ref().as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Copies a file, creating missing parent directories of `dst`.
///
/// Returns the number of bytes copied.
///
/// # Errors
///
/// Returns an error if `src` cannot be read or `dst` cannot be written.
pub fn copy_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> std::io::Result<u64> {
    let dst = dst.as_ref();
    if let Some(parent) = dst.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(src, dst)
}
