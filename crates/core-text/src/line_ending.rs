//! Line terminator detection for text loaded from disk.
//!
//! Content is split into terminator-free lines in a single pass while the
//! three terminator styles are counted. The majority style (ties resolved
//! CRLF > LF > CR) is remembered so a later write reproduces the file's
//! convention. A final terminator does not start an extra empty line.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
    Cr,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
            LineEnding::Cr => "\r",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub lines: Vec<String>,
    pub original: LineEnding,
    /// More than one terminator style was present.
    pub mixed: bool,
}

pub fn normalize_line_endings(input: &str) -> NormalizedText {
    let bytes = input.as_bytes();
    let (mut crlf, mut lf, mut cr) = (0usize, 0usize, 0usize);
    let mut lines = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;
    // Only '\r' and '\n' are cut points, so slices stay on char boundaries.
    while i < bytes.len() {
        let width = match bytes[i] {
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                crlf += 1;
                2
            }
            b'\r' => {
                cr += 1;
                1
            }
            b'\n' => {
                lf += 1;
                1
            }
            _ => {
                i += 1;
                continue;
            }
        };
        lines.push(input[start..i].to_string());
        i += width;
        start = i;
    }
    if start < input.len() {
        lines.push(input[start..].to_string());
    }

    let mut original = LineEnding::Lf;
    let mut max = 0usize;
    for (style, count) in [
        (LineEnding::Crlf, crlf),
        (LineEnding::Lf, lf),
        (LineEnding::Cr, cr),
    ] {
        if count > max {
            max = count;
            original = style;
        }
    }
    let styles_seen = [crlf, lf, cr].iter().filter(|c| **c > 0).count();

    NormalizedText {
        lines,
        original,
        mixed: styles_seen > 1,
    }
}
