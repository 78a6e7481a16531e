//! Dispatcher applying one line of command text to a buffer.
//!
//! Sub-modules:
//! * `command_parser` - tokenization of the command name and arguments
//! * `edit`           - line mutation commands (i, a, c, d)
//! * `command`        - display, file and session commands (p, n, r, w, q)
//!
//! Protocol for `execute(registry, buffer, text)`:
//! 1. Parse an optional range. A `;` cursor move is applied to the buffer
//!    whether or not the rest of the range parses.
//! 2. With a range, copy the addressed lines into a sub-buffer. Bare ranges
//!    print the sub-buffer and move the cursor to the range's last line.
//!    Otherwise the remaining text is dispatched recursively on the
//!    sub-buffer and its lines are spliced back over the range.
//! 3. Without a range, tokenize, look the command up and run it on the whole
//!    buffer.
//!
//! A failure anywhere aborts the call before the splice, so the parent's
//! lines are only replaced by a nested command that succeeded. Nesting is
//! capped at `MAX_RANGE_DEPTH` levels.

use crate::error::{CommandError, CommandResult};
use crate::range::{ParsedRange, RangeParser};
use crate::registry::{CommandContext, CommandRegistry};
use core_text::Buffer;
use std::io::Write;
use tracing::debug;

pub(crate) mod command;
mod command_parser;
pub(crate) mod edit;

pub use command::{builtin_commands, builtin_registry, print_lines};
pub use command_parser::{CommandLine, CommandParser, tokenize};

/// Deepest chain of ranges one command line may nest (`.....p`).
pub const MAX_RANGE_DEPTH: usize = 64;

/// Result of dispatching a single command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    pub quit: bool,
}

impl DispatchResult {
    pub fn clean() -> Self {
        Self { quit: false }
    }
    pub fn quit() -> Self {
        Self { quit: true }
    }
}

/// Apply one line of command text to `buffer`, writing any display output to
/// `out`. Returns whether the session should end.
pub fn execute(
    registry: &CommandRegistry,
    buffer: &mut Buffer,
    text: &str,
    out: &mut dyn Write,
) -> CommandResult<DispatchResult> {
    execute_at(registry, buffer, text, out, 0)
}

fn execute_at(
    registry: &CommandRegistry,
    buffer: &mut Buffer,
    text: &str,
    out: &mut dyn Write,
    depth: usize,
) -> CommandResult<DispatchResult> {
    let mut parser = RangeParser::new(buffer);
    let parsed = parser.parse(text);
    if let Some(cursor) = parser.cursor_update() {
        buffer.set_current_line(cursor);
    }
    match parsed? {
        Some(range) => execute_range(registry, buffer, range, out, depth),
        None => execute_command(registry, buffer, text, out, depth),
    }
}

fn execute_range(
    registry: &CommandRegistry,
    buffer: &mut Buffer,
    parsed: ParsedRange<'_>,
    out: &mut dyn Write,
    depth: usize,
) -> CommandResult<DispatchResult> {
    let range = parsed.range;
    let mut sub = buffer.slice(range.start, range.end);

    if parsed.rest.trim().is_empty() {
        print_lines(&sub, out)?;
        if let Some(last) = range.last() {
            buffer.set_current_line(last);
        }
        debug!(target: "dispatch", depth, start = range.start, end = range.end, "bare_range");
        return Ok(DispatchResult::clean());
    }

    if depth + 1 >= MAX_RANGE_DEPTH {
        debug!(target: "dispatch", depth, "range_nesting_rejected");
        return Err(CommandError::NestingTooDeep {
            limit: MAX_RANGE_DEPTH,
        });
    }
    let result = execute_at(registry, &mut sub, parsed.rest, out, depth + 1)?;

    // `r` and `w` record their file on the sub-buffer; an empty parent also
    // takes the line ending of whatever was read into it.
    if sub.associated_file.is_some() {
        buffer.associated_file = sub.associated_file.take();
    }
    if buffer.is_empty() {
        buffer.line_ending = sub.line_ending;
    }
    let replaced = sub.line_count();
    buffer.splice(range.start, range.end, sub.into_lines());
    debug!(
        target: "dispatch",
        depth,
        start = range.start,
        end = range.end,
        replaced,
        "range_spliced"
    );
    Ok(result)
}

fn execute_command(
    registry: &CommandRegistry,
    buffer: &mut Buffer,
    text: &str,
    out: &mut dyn Write,
    depth: usize,
) -> CommandResult<DispatchResult> {
    let line = CommandParser::parse(text)?;
    let Some(entry) = registry.get(&line.name) else {
        return Err(CommandError::UnknownCommand(line.name));
    };
    debug!(
        target: "dispatch",
        depth,
        command = entry.name,
        args = line.args.len(),
        lines = buffer.line_count(),
        "command_invoked"
    );
    let mut ctx = CommandContext {
        buffer,
        registry,
        out,
    };
    entry.invoke(&mut ctx, &line.args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AddressError;
    use pretty_assertions::assert_eq;

    fn doc(src: &[&str], cursor: usize) -> Buffer {
        let mut b = Buffer::from_lines(src.iter().map(|s| s.to_string()).collect());
        b.set_current_line(cursor);
        b
    }

    fn run(buffer: &mut Buffer, text: &str) -> (CommandResult<DispatchResult>, String) {
        let registry = builtin_registry();
        let mut out = Vec::new();
        let res = execute(&registry, buffer, text, &mut out);
        (res, String::from_utf8(out).unwrap())
    }

    #[test]
    fn whole_buffer_print_keeps_cursor() {
        let mut b = doc(&["a", "b", "c", "d"], 1);
        let (res, out) = run(&mut b, ",p");
        assert_eq!(res.unwrap(), DispatchResult::clean());
        assert_eq!(out, "a\nb\nc\nd\n");
        assert_eq!(b.current_line_index(), Some(1));
    }

    #[test]
    fn ranged_delete_splices_and_resets_cursor() {
        let mut b = doc(&["a", "b", "c", "d"], 1);
        let (res, _) = run(&mut b, "2,3d");
        res.unwrap();
        assert_eq!(b.lines(), &["a".to_string(), "d".to_string()][..]);
        assert_eq!(b.current_line_index(), Some(1));
    }

    #[test]
    fn bare_range_prints_and_moves_cursor() {
        let mut b = doc(&["a", "b", "c", "d"], 0);
        let (res, out) = run(&mut b, "2,3");
        res.unwrap();
        assert_eq!(out, "b\nc\n");
        assert_eq!(b.current_line_index(), Some(2));
    }

    #[test]
    fn bare_range_with_trailing_whitespace() {
        let mut b = doc(&["a", "b"], 1);
        let (res, out) = run(&mut b, "1  ");
        res.unwrap();
        assert_eq!(out, "a\n");
        assert_eq!(b.current_line_index(), Some(0));
    }

    #[test]
    fn empty_buffer_dot_fails() {
        let mut b = Buffer::new();
        let (res, _) = run(&mut b, ".p");
        assert!(matches!(
            res,
            Err(CommandError::Address(AddressError::NoCurrentLine))
        ));
    }

    #[test]
    fn out_of_range_fails_without_output() {
        let mut b = doc(&["a", "b", "c"], 0);
        let (res, out) = run(&mut b, "5p");
        assert!(matches!(
            res,
            Err(CommandError::Address(AddressError::OutOfRange { .. }))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn semicolon_moves_cursor_even_when_parse_fails() {
        let mut b = doc(&["a", "b", "c"], 0);
        let (res, _) = run(&mut b, "2;+9p");
        assert!(res.is_err());
        assert_eq!(b.current_line_index(), Some(1));
    }

    #[test]
    fn no_command_and_unknown_command() {
        let mut b = doc(&["a"], 0);
        assert!(matches!(run(&mut b, "").0, Err(CommandError::NoCommand)));
        assert!(matches!(
            run(&mut b, "zz").0,
            Err(CommandError::UnknownCommand(name)) if name == "zz"
        ));
    }

    #[test]
    fn nested_ranges_recombine() {
        let mut b = doc(&["a", "b", "c", "d", "e"], 0);
        // Lines 2..=5, then the second and third of those.
        let (res, _) = run(&mut b, "2,$2,3d");
        res.unwrap();
        assert_eq!(
            b.lines(),
            &["a".to_string(), "b".to_string(), "e".to_string()][..]
        );
    }

    #[test]
    fn failed_nested_command_leaves_parent_untouched() {
        let mut b = doc(&["a", "b", "c"], 2);
        let (res, _) = run(&mut b, "1,2 i");
        assert!(matches!(res, Err(CommandError::Arguments { .. })));
        assert_eq!(b.line_count(), 3);
        assert_eq!(b.current_line_index(), Some(2));
    }

    #[test]
    fn deeply_nested_ranges_fail_without_overflow() {
        let mut b = doc(&["a", "b"], 1);
        let text = format!("{}p", ".".repeat(200_000));
        let (res, out) = run(&mut b, &text);
        assert!(matches!(
            res,
            Err(CommandError::NestingTooDeep {
                limit: MAX_RANGE_DEPTH
            })
        ));
        assert!(out.is_empty());
        assert_eq!(b.lines(), &["a".to_string(), "b".to_string()][..]);
    }

    #[test]
    fn nesting_just_under_the_limit_runs() {
        let mut b = doc(&["a", "b"], 1);
        let text = format!("{}p", ".".repeat(MAX_RANGE_DEPTH - 1));
        let (res, out) = run(&mut b, &text);
        res.unwrap();
        assert_eq!(out, "b\n");
    }

    #[test]
    fn quit_propagates_out_of_ranges() {
        let mut b = doc(&["a"], 0);
        let (res, _) = run(&mut b, "1q");
        assert_eq!(res.unwrap(), DispatchResult::quit());
    }
}
