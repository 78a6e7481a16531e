//! Line buffer abstraction.
//!
//! A `Buffer` is an ordered list of lines plus a cursor (the "current line").
//! The cursor is `Some(index)` with `index < lines.len()` whenever the buffer
//! has lines and `None` exactly when it is empty. Every mutating method here
//! restores that invariant before returning; callers never have to repair it.
//!
//! Range commands operate on sub-buffers produced by [`Buffer::slice`] and are
//! merged back with [`Buffer::splice`]. A sub-buffer carries a shifted
//! `first_line_number` so numbered output lines up with the parent document.

use std::path::PathBuf;
use tracing::trace;

pub mod line_ending;
pub use line_ending::{LineEnding, NormalizedText, normalize_line_endings};

/// An in-memory text buffer made of lines (without terminators).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    lines: Vec<String>,
    current_line_index: Option<usize>,
    /// Number displayed for `lines[0]`.
    pub first_line_number: usize,
    /// Path last used by a read or write; the fallback when a command omits one.
    pub associated_file: Option<PathBuf>,
    /// Terminator emitted by [`Buffer::render`].
    pub line_ending: LineEnding,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    /// Construct an empty buffer (no lines, no cursor).
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            current_line_index: None,
            first_line_number: 1,
            associated_file: None,
            line_ending: LineEnding::Lf,
        }
    }

    /// Construct a buffer owning `lines` with the cursor on the last line.
    pub fn from_lines(lines: Vec<String>) -> Self {
        let mut buffer = Self::new();
        buffer.replace_all(lines);
        buffer
    }

    /// Construct a buffer from raw file content, normalizing line endings and
    /// remembering the detected style for later writes.
    pub fn from_text(content: &str) -> Self {
        let norm = normalize_line_endings(content);
        let mut buffer = Self::from_lines(norm.lines);
        buffer.line_ending = norm.original;
        buffer
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Consume the buffer, keeping only its lines.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn current_line_index(&self) -> Option<usize> {
        self.current_line_index
    }

    /// Text of the line under the cursor, `None` for an empty buffer.
    pub fn current_line(&self) -> Option<&str> {
        self.current_line_index.and_then(|idx| self.line(idx))
    }

    /// Move the cursor to `index`. Returns `false` (leaving the cursor alone)
    /// when `index` does not name an existing line.
    pub fn set_current_line(&mut self, index: usize) -> bool {
        if index < self.lines.len() {
            self.current_line_index = Some(index);
            true
        } else {
            false
        }
    }

    /// Index of the last line, `None` when empty.
    pub fn last_index(&self) -> Option<usize> {
        self.lines.len().checked_sub(1)
    }

    /// Insert `new_lines` after the cursor and leave the cursor on the last
    /// inserted line. On an empty buffer the lines become the whole buffer.
    pub fn insert_after_cursor(&mut self, new_lines: Vec<String>) {
        if new_lines.is_empty() {
            return;
        }
        let count = new_lines.len();
        match self.current_line_index {
            None => {
                self.lines = new_lines;
                self.current_line_index = Some(count - 1);
            }
            Some(cursor) => {
                let at = cursor + 1;
                self.lines.splice(at..at, new_lines);
                self.current_line_index = Some(cursor + count);
            }
        }
    }

    /// Append `new_lines` after the last line; the cursor follows to the end.
    pub fn append(&mut self, new_lines: Vec<String>) {
        if new_lines.is_empty() {
            return;
        }
        self.lines.extend(new_lines);
        self.current_line_index = self.last_index();
    }

    /// Replace every line; the cursor lands on the new last line.
    pub fn replace_all(&mut self, new_lines: Vec<String>) {
        self.lines = new_lines;
        self.current_line_index = self.last_index();
    }

    /// Remove every line and unset the cursor.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.current_line_index = None;
    }

    /// Copy `lines[start..end]` into a standalone sub-buffer.
    ///
    /// The copy's cursor sits on its last line, its numbering starts at the
    /// parent's number for `start`, and it inherits the associated file and
    /// line ending so writes from a range behave like writes from the parent.
    ///
    /// Panics if `start > end` or `end > line_count()`; range parsing
    /// validates both before slicing.
    pub fn slice(&self, start: usize, end: usize) -> Buffer {
        let lines = self.lines[start..end].to_vec();
        let current_line_index = lines.len().checked_sub(1);
        Buffer {
            lines,
            current_line_index,
            first_line_number: self.first_line_number + start,
            associated_file: self.associated_file.clone(),
            line_ending: self.line_ending,
        }
    }

    /// Replace `lines[start..end]` with `replacement`, which may hold a
    /// different number of lines.
    ///
    /// The cursor is kept when it still names a line; otherwise it moves to
    /// the new last line (or is unset when the buffer ends up empty).
    pub fn splice(&mut self, start: usize, end: usize, replacement: Vec<String>) {
        let inserted = replacement.len();
        self.lines.splice(start..end, replacement);
        let len = self.lines.len();
        match self.current_line_index {
            Some(cursor) if cursor < len => {}
            _ => self.current_line_index = self.last_index(),
        }
        trace!(
            target: "text.buffer",
            start,
            end,
            inserted,
            len,
            cursor = ?self.current_line_index,
            "splice"
        );
    }

    /// Serialize every line followed by the buffer's line ending.
    pub fn render(&self) -> String {
        let ending = self.line_ending.as_str();
        let capacity = self.lines.iter().map(|l| l.len() + ending.len()).sum();
        let mut out = String::with_capacity(capacity);
        for line in &self.lines {
            out.push_str(line);
            out.push_str(ending);
        }
        out
    }
}

/// Split command text into buffer lines (`"a\nb"` -> `["a", "b"]`).
pub fn split_text(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(src: &[&str]) -> Vec<String> {
        src.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_buffer_has_no_current_line() {
        let b = Buffer::new();
        assert!(b.is_empty());
        assert_eq!(b.current_line_index(), None);
        assert_eq!(b.current_line(), None);
        assert_eq!(b.first_line_number, 1);
    }

    #[test]
    fn from_lines_puts_cursor_on_last_line() {
        let b = Buffer::from_lines(lines(&["a", "b", "c"]));
        assert_eq!(b.current_line_index(), Some(2));
        assert_eq!(b.current_line(), Some("c"));
    }

    #[test]
    fn set_current_line_rejects_out_of_bounds() {
        let mut b = Buffer::from_lines(lines(&["a", "b"]));
        assert!(b.set_current_line(0));
        assert!(!b.set_current_line(2));
        assert_eq!(b.current_line_index(), Some(0));
    }

    #[test]
    fn insert_into_empty_buffer_replaces_contents() {
        let mut b = Buffer::new();
        b.insert_after_cursor(lines(&["x", "y"]));
        assert_eq!(b.lines(), &lines(&["x", "y"])[..]);
        assert_eq!(b.current_line_index(), Some(1));
    }

    #[test]
    fn insert_goes_after_cursor() {
        let mut b = Buffer::from_lines(lines(&["a", "b", "c"]));
        b.set_current_line(0);
        b.insert_after_cursor(lines(&["x", "y"]));
        assert_eq!(b.lines(), &lines(&["a", "x", "y", "b", "c"])[..]);
        assert_eq!(b.current_line(), Some("y"));
    }

    #[test]
    fn append_moves_cursor_to_end() {
        let mut b = Buffer::from_lines(lines(&["a", "b"]));
        b.set_current_line(0);
        b.append(lines(&["c"]));
        assert_eq!(b.current_line_index(), Some(2));
    }

    #[test]
    fn slice_shifts_numbering_and_inherits_file() {
        let mut b = Buffer::from_lines(lines(&["a", "b", "c", "d"]));
        b.associated_file = Some(PathBuf::from("doc.txt"));
        let sub = b.slice(1, 3);
        assert_eq!(sub.lines(), &lines(&["b", "c"])[..]);
        assert_eq!(sub.current_line_index(), Some(1));
        assert_eq!(sub.first_line_number, 2);
        assert_eq!(sub.associated_file, Some(PathBuf::from("doc.txt")));
    }

    #[test]
    fn empty_slice_has_no_cursor() {
        let b = Buffer::new();
        let sub = b.slice(0, 0);
        assert!(sub.is_empty());
        assert_eq!(sub.current_line_index(), None);
    }

    #[test]
    fn splice_shrinking_resets_cursor_past_end() {
        let mut b = Buffer::from_lines(lines(&["a", "b", "c", "d"]));
        b.splice(1, 3, Vec::new());
        assert_eq!(b.lines(), &lines(&["a", "d"])[..]);
        assert_eq!(b.current_line_index(), Some(1));
    }

    #[test]
    fn splice_keeps_valid_cursor() {
        let mut b = Buffer::from_lines(lines(&["a", "b", "c"]));
        b.set_current_line(0);
        b.splice(1, 2, lines(&["x", "y", "z"]));
        assert_eq!(b.lines(), &lines(&["a", "x", "y", "z", "c"])[..]);
        assert_eq!(b.current_line_index(), Some(0));
    }

    #[test]
    fn splice_to_empty_unsets_cursor() {
        let mut b = Buffer::from_lines(lines(&["a"]));
        b.splice(0, 1, Vec::new());
        assert!(b.is_empty());
        assert_eq!(b.current_line_index(), None);
    }

    #[test]
    fn splice_into_empty_buffer_sets_cursor() {
        let mut b = Buffer::new();
        b.splice(0, 0, lines(&["hello"]));
        assert_eq!(b.current_line_index(), Some(0));
    }

    #[test]
    fn render_uses_line_ending() {
        let mut b = Buffer::from_lines(lines(&["a", "b"]));
        assert_eq!(b.render(), "a\nb\n");
        b.line_ending = LineEnding::Crlf;
        assert_eq!(b.render(), "a\r\nb\r\n");
        assert_eq!(Buffer::new().render(), "");
    }

    #[test]
    fn from_text_detects_crlf() {
        let b = Buffer::from_text("one\r\ntwo\r\n");
        assert_eq!(b.lines(), &lines(&["one", "two"])[..]);
        assert_eq!(b.line_ending, LineEnding::Crlf);
    }

    #[test]
    fn split_text_keeps_empty_segments() {
        assert_eq!(split_text("a\n\nb"), lines(&["a", "", "b"]));
        assert_eq!(split_text(""), lines(&[""]));
    }
}
