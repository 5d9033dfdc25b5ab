//! File-backed storage for task records and user credentials.
//!
//! Every mutation other than a pure addition rewrites the whole file, so the
//! on-disk state is consistent whenever an operation returns.

pub mod codec;
pub mod tasks;
pub mod users;

pub use tasks::{SkippedLine, TaskLoad, TaskStore};
pub use users::{LoginError, UserDirectory};

use crate::error::{TrackerError, TrackerResult};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Read a whole file. A missing file reads as `None`.
pub(crate) fn read_optional(path: &Path) -> TrackerResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(TrackerError::storage(path, e)),
    }
}

/// Append one record line, first terminating the previous record if the
/// file does not already end in a newline.
pub(crate) fn append_line(path: &Path, line: &str) -> TrackerResult<()> {
    ensure_parent(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)
        .map_err(|e| TrackerError::storage(path, e))?;

    let needs_newline = ends_without_newline(&mut file).map_err(|e| TrackerError::storage(path, e))?;

    let mut buf = String::with_capacity(line.len() + 2);
    if needs_newline {
        buf.push('\n');
    }
    buf.push_str(line);
    buf.push('\n');
    file.write_all(buf.as_bytes())
        .map_err(|e| TrackerError::storage(path, e))
}

/// Replace the file content with the given lines, each newline-terminated.
pub(crate) fn rewrite_lines(path: &Path, lines: &[String]) -> TrackerResult<()> {
    ensure_parent(path)?;
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(path, content).map_err(|e| TrackerError::storage(path, e))
}

fn ends_without_newline(file: &mut fs::File) -> std::io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

fn ensure_parent(path: &Path) -> TrackerResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| TrackerError::storage(parent, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_append_terminates_previous_record() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("records.txt");
        fs::write(&path, "first").unwrap();

        append_line(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_append_creates_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("records.txt");

        append_line(&path, "only").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "only\n");
    }

    #[test]
    fn test_read_optional_missing() {
        let temp = TempDir::new().unwrap();
        assert!(read_optional(&temp.path().join("absent.txt")).unwrap().is_none());
    }

    #[test]
    fn test_rewrite_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("records.txt");
        fs::write(&path, "stale\nstale\nstale\n").unwrap();

        rewrite_lines(&path, &["a".to_string(), "b".to_string()]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
    }
}
