//! File IO helpers used by the read and write commands.
//!
//! Synchronous and minimal. Paths fall back to the buffer's associated file;
//! the association itself is only updated by callers after the IO succeeded.

use crate::error::{CommandError, CommandResult};
use core_text::{Buffer, NormalizedText, normalize_line_endings};
use std::path::{Path, PathBuf};

/// Pick the explicit `filename` or fall back to the buffer's associated file.
pub fn resolve_path(buffer: &Buffer, filename: Option<&str>) -> CommandResult<PathBuf> {
    match filename {
        Some(name) => Ok(PathBuf::from(name)),
        None => buffer
            .associated_file
            .clone()
            .ok_or(CommandError::NoFilename),
    }
}

/// Read a file and split it into lines with normalized endings.
pub fn read_file(path: &Path) -> CommandResult<NormalizedText> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        tracing::error!(target: "io", file = %path.display(), error = %source, "file_read_error");
        CommandError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let norm = normalize_line_endings(&content);
    tracing::debug!(
        target: "io",
        file = %path.display(),
        size_bytes = content.len(),
        line_count = norm.lines.len(),
        "file_read_ok"
    );
    if norm.mixed {
        tracing::warn!(target: "io", file = %path.display(), "mixed_line_endings_detected");
    }
    Ok(norm)
}

/// Write every line of `buffer` to `path`. Returns the number of bytes written.
pub fn write_file(path: &Path, buffer: &Buffer) -> CommandResult<usize> {
    let content = buffer.render();
    std::fs::write(path, content.as_bytes()).map_err(|source| {
        tracing::error!(target: "io", file = %path.display(), error = %source, "file_write_error");
        CommandError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    tracing::debug!(
        target: "io",
        file = %path.display(),
        size_bytes = content.len(),
        line_count = buffer.line_count(),
        "file_write_ok"
    );
    Ok(content.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::LineEnding;

    #[test]
    fn explicit_name_wins_over_association() {
        let mut b = Buffer::new();
        b.associated_file = Some(PathBuf::from("old.txt"));
        assert_eq!(
            resolve_path(&b, Some("new.txt")).unwrap(),
            PathBuf::from("new.txt")
        );
        assert_eq!(resolve_path(&b, None).unwrap(), PathBuf::from("old.txt"));
    }

    #[test]
    fn no_name_and_no_association() {
        let b = Buffer::new();
        assert!(matches!(
            resolve_path(&b, None),
            Err(CommandError::NoFilename)
        ));
    }

    #[test]
    fn read_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        let err = read_file(&path).unwrap_err();
        assert!(matches!(err, CommandError::Io { .. }));
        assert!(err.to_string().contains("absent.txt"));
    }

    #[test]
    fn write_preserves_crlf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut b = Buffer::from_lines(vec!["a".into(), "b".into()]);
        b.line_ending = LineEnding::Crlf;
        let bytes = write_file(&path, &b).unwrap();
        assert_eq!(bytes, 6);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\r\nb\r\n");
        let norm = read_file(&path).unwrap();
        assert_eq!(norm.lines, vec!["a", "b"]);
        assert_eq!(norm.original, LineEnding::Crlf);
    }
}
