//! Single address resolution.
//!
//! Grammar (tried in order against the head of the text):
//!
//! | Token     | Resolves to                          |
//! |-----------|--------------------------------------|
//! | `N`       | line `N` (first digit `1-9`)         |
//! | `+` / `+N`| cursor + 1 / cursor + N              |
//! | `-` / `-N`| cursor - 1 / cursor - N              |
//! | `.`       | cursor                               |
//! | `$`       | last line                            |
//!
//! Anything else means "no address", which is a valid outcome and not an
//! error. Indices are zero-based and signed: `-3` on the second line yields
//! `-2`. Resolution never clamps; validating against the buffer bounds is the
//! caller's job because only the caller knows which endpoint it is parsing.

use crate::error::{AddressError, Endpoint};
use core_text::Buffer;

/// A resolved address and the text following it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'t> {
    pub rest: &'t str,
    pub index: i64,
}

/// Resolve an address at the head of `text` against `buffer`'s cursor.
pub fn resolve<'t>(buffer: &Buffer, text: &'t str) -> Result<Option<Resolved<'t>>, AddressError> {
    resolve_at(buffer.current_line_index(), buffer.line_count(), text)
}

/// Resolve against an explicit cursor, used by the range parser once `;`
/// has moved "." away from the buffer's own cursor.
pub fn resolve_at(
    cursor: Option<usize>,
    len: usize,
    text: &str,
) -> Result<Option<Resolved<'_>>, AddressError> {
    if let Some((rest, n)) = number(text) {
        return Ok(Some(Resolved { rest, index: n - 1 }));
    }
    let mut chars = text.chars();
    let Some(head) = chars.next() else {
        return Ok(None);
    };
    let tail = chars.as_str();
    let resolved = match head {
        '+' | '-' => {
            let base = current(cursor)?;
            let (rest, step) = number(tail).unwrap_or((tail, 1));
            let index = if head == '+' {
                base.saturating_add(step)
            } else {
                base.saturating_sub(step)
            };
            Resolved { rest, index }
        }
        '.' => Resolved {
            rest: tail,
            index: current(cursor)?,
        },
        '$' => {
            current(cursor)?;
            Resolved {
                rest: tail,
                index: len as i64 - 1,
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(resolved))
}

/// Check that a resolved index names an existing line.
pub fn validate(index: i64, len: usize, which: Endpoint) -> Result<usize, AddressError> {
    match usize::try_from(index) {
        Ok(idx) if idx < len => Ok(idx),
        _ => Err(AddressError::OutOfRange {
            index,
            bound: len,
            which,
        }),
    }
}

fn current(cursor: Option<usize>) -> Result<i64, AddressError> {
    cursor
        .map(|c| c as i64)
        .ok_or(AddressError::NoCurrentLine)
}

/// `[1-9][0-9]*` at the head of `text`. Runs too long for `i64` saturate so
/// they still fail bounds validation instead of wrapping.
fn number(text: &str) -> Option<(&str, i64)> {
    let bytes = text.as_bytes();
    match bytes.first() {
        Some(b'1'..=b'9') => {}
        _ => return None,
    }
    let end = bytes
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(bytes.len());
    let value = text[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some((&text[end..], value))
}
