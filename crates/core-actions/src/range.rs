//! Range parsing: `[ADDR] (',' | ';')? [ADDR]`.
//!
//! The operator decides how missing endpoints default:
//! * `,` : first defaults to line 1, last to the final line (`,` alone is the
//!   whole buffer).
//! * `;` : first defaults to the cursor, and "." moves to the first address
//!   before the second one is resolved, so `5;+2` means lines 5..=7.
//! * no operator: a lone address is a one-line range; no address at all means
//!   the command has no range and applies to the whole buffer.
//!
//! The `;` cursor move is not applied to the buffer here. `RangeParser`
//! tracks its own cursor and reports the move through `cursor_update`, which
//! stays readable after a failed parse so the dispatcher can apply it either
//! way.

use crate::address::{resolve_at, validate};
use crate::error::{AddressError, Endpoint};
use core_text::Buffer;
use tracing::debug;

/// Half-open interval `[start, end)` of zero-based line indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }
    pub fn len(&self) -> usize {
        self.end - self.start
    }
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
    /// Index of the last line in the range.
    pub fn last(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.end - 1)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedRange<'t> {
    /// Command text following the range.
    pub rest: &'t str,
    pub range: LineRange,
    /// New cursor requested by `;`.
    pub cursor_update: Option<usize>,
}

pub struct RangeParser<'b> {
    buffer: &'b Buffer,
    cursor: Option<usize>,
    cursor_update: Option<usize>,
}

impl<'b> RangeParser<'b> {
    pub fn new(buffer: &'b Buffer) -> Self {
        Self {
            buffer,
            cursor: buffer.current_line_index(),
            cursor_update: None,
        }
    }

    /// Cursor move performed by `;` during the last parse, if any.
    pub fn cursor_update(&self) -> Option<usize> {
        self.cursor_update
    }

    pub fn parse<'t>(&mut self, text: &'t str) -> Result<Option<ParsedRange<'t>>, AddressError> {
        let parsed = self.parse_inner(text);
        match &parsed {
            Ok(Some(p)) => debug!(
                target: "range",
                start = p.range.start,
                end = p.range.end,
                cursor_update = ?p.cursor_update,
                "range_parsed"
            ),
            Ok(None) => {}
            Err(e) => debug!(
                target: "range",
                error = %e,
                cursor_update = ?self.cursor_update,
                "range_rejected"
            ),
        }
        parsed
    }

    fn parse_inner<'t>(&mut self, mut text: &'t str) -> Result<Option<ParsedRange<'t>>, AddressError> {
        let len = self.buffer.line_count();

        let first = match resolve_at(self.cursor, len, text)? {
            Some(r) => {
                text = r.rest;
                Some(validate(r.index, len, Endpoint::First)?)
            }
            None => None,
        };

        let first = if let Some(rest) = text.strip_prefix(',') {
            text = rest;
            first.unwrap_or(0)
        } else if let Some(rest) = text.strip_prefix(';') {
            text = rest;
            let first = match first {
                Some(f) => f,
                None => self.cursor.ok_or(AddressError::NoCurrentLine)?,
            };
            self.cursor = Some(first);
            self.cursor_update = Some(first);
            first
        } else {
            return Ok(first.map(|f| ParsedRange {
                rest: text,
                range: LineRange::new(f, f + 1),
                cursor_update: None,
            }));
        };

        let end = match resolve_at(self.cursor, len, text)? {
            Some(r) => {
                text = r.rest;
                let last = validate(r.index, len, Endpoint::Last)?;
                if last < first {
                    return Err(AddressError::InvalidRange { first, last });
                }
                last + 1
            }
            // `first < len` here, or `first == 0 == len` for `,` on an empty
            // buffer, which is the empty range.
            None => len,
        };

        Ok(Some(ParsedRange {
            rest: text,
            range: LineRange::new(first, end),
            cursor_update: self.cursor_update,
        }))
    }
}

/// Parse a range at the head of `text`. `Ok(None)` means no range syntax.
pub fn parse_range<'t>(
    buffer: &Buffer,
    text: &'t str,
) -> Result<Option<ParsedRange<'t>>, AddressError> {
    RangeParser::new(buffer).parse(text)
}
