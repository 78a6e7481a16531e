//! Line mutation commands.
//!
//! Each command acts on the buffer it receives: the whole document without a
//! range, the addressed sub-buffer with one. Arguments are fully parsed
//! before any of these run, so a handler either applies its change or fails
//! before touching the buffer.

use super::DispatchResult;
use crate::args::{ArgKind, ArgSpec, ParsedArgs};
use crate::error::{CommandError, CommandResult};
use crate::registry::{CommandContext, CommandDef};
use core_text::split_text;

const TEXT_ARG: [ArgSpec; 1] =
    [ArgSpec::positional("text", ArgKind::Str).help("Text to add; embedded newlines split lines")];

pub(crate) const INSERT: CommandDef = CommandDef {
    name: "i",
    function: "insert",
    description: "Insert text after the current line.",
    args: &TEXT_ARG,
    handler: insert,
};

pub(crate) const APPEND: CommandDef = CommandDef {
    name: "a",
    function: "append",
    description: "Append text after the last line.",
    args: &TEXT_ARG,
    handler: append,
};

pub(crate) const CHANGE: CommandDef = CommandDef {
    name: "c",
    function: "change",
    description: "Replace the lines with text.",
    args: &TEXT_ARG,
    handler: change,
};

pub(crate) const DELETE: CommandDef = CommandDef {
    name: "d",
    function: "delete",
    description: "Delete the lines. Without a range this empties the whole buffer; \
                  use `.d` for the current line.",
    args: &[],
    handler: delete,
};

fn text_lines(command: &str, args: &ParsedArgs) -> CommandResult<Vec<String>> {
    args.get_str("text")
        .map(split_text)
        .ok_or_else(|| CommandError::Arguments {
            command: command.to_string(),
            message: "missing text".to_string(),
        })
}

fn insert(ctx: &mut CommandContext<'_>, args: &ParsedArgs) -> CommandResult<DispatchResult> {
    let lines = text_lines(INSERT.name, args)?;
    ctx.buffer.insert_after_cursor(lines);
    Ok(DispatchResult::clean())
}

fn append(ctx: &mut CommandContext<'_>, args: &ParsedArgs) -> CommandResult<DispatchResult> {
    let lines = text_lines(APPEND.name, args)?;
    ctx.buffer.append(lines);
    Ok(DispatchResult::clean())
}

fn change(ctx: &mut CommandContext<'_>, args: &ParsedArgs) -> CommandResult<DispatchResult> {
    let lines = text_lines(CHANGE.name, args)?;
    ctx.buffer.replace_all(lines);
    Ok(DispatchResult::clean())
}

fn delete(ctx: &mut CommandContext<'_>, _args: &ParsedArgs) -> CommandResult<DispatchResult> {
    ctx.buffer.clear();
    Ok(DispatchResult::clean())
}
