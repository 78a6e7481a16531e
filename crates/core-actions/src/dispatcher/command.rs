//! Display, file and session commands (p, n, r, w, q) and the built-in
//! command table.

use super::DispatchResult;
use super::edit::{APPEND, CHANGE, DELETE, INSERT};
use crate::args::{ArgKind, ArgSpec, ParsedArgs};
use crate::error::CommandResult;
use crate::io_ops::{read_file, resolve_path, write_file};
use crate::registry::{CommandContext, CommandDef, CommandRegistry};
use core_config::{NUMBER_WIDTH_MAX, NUMBER_WIDTH_MIN};
use core_text::Buffer;
use std::io::Write;

const FILENAME_ARG: [ArgSpec; 1] = [ArgSpec::optional("filename", ArgKind::Str)
    .help("File to use instead of the buffer's associated file")];

pub(crate) const PRINT: CommandDef = CommandDef {
    name: "p",
    function: "print",
    description: "Print the lines.",
    args: &[],
    handler: print,
};

const WIDTH_ARG: [ArgSpec; 1] = [ArgSpec::optional("width", ArgKind::Int)
    .help("Column width for the line numbers (1-16); defaults to the configured width")];

pub(crate) const NUMBER: CommandDef = CommandDef {
    name: "n",
    function: "number",
    description: "Print the lines with their line numbers.",
    args: &WIDTH_ARG,
    handler: number,
};

pub(crate) const READ: CommandDef = CommandDef {
    name: "r",
    function: "read",
    description: "Read a file and insert its lines after the current line.",
    args: &FILENAME_ARG,
    handler: read,
};

pub(crate) const WRITE: CommandDef = CommandDef {
    name: "w",
    function: "write",
    description: "Write the lines to a file.",
    args: &FILENAME_ARG,
    handler: write,
};

pub(crate) const QUIT: CommandDef = CommandDef {
    name: "q",
    function: "quit",
    description: "Quit the editor.",
    args: &[],
    handler: quit,
};

/// Every built-in command except help, which the registry provides itself.
pub fn builtin_commands() -> [CommandDef; 9] {
    [INSERT, APPEND, CHANGE, DELETE, PRINT, NUMBER, READ, WRITE, QUIT]
}

/// Registry populated with the built-in commands.
pub fn builtin_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    for def in builtin_commands() {
        // Built-in names are distinct and none is the help name.
        if let Err(e) = registry.register(def) {
            tracing::error!(target: "dispatch", error = %e, "builtin_registration_failed");
        }
    }
    registry
}

/// Write every line of `buffer` to `out`.
pub fn print_lines(buffer: &Buffer, out: &mut dyn Write) -> std::io::Result<()> {
    for line in buffer.lines() {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn print(ctx: &mut CommandContext<'_>, _args: &ParsedArgs) -> CommandResult<DispatchResult> {
    print_lines(ctx.buffer, ctx.out)?;
    Ok(DispatchResult::clean())
}

fn number(ctx: &mut CommandContext<'_>, args: &ParsedArgs) -> CommandResult<DispatchResult> {
    let width = match args.get_int("width") {
        Some(w) => usize::try_from(w)
            .unwrap_or(NUMBER_WIDTH_MIN)
            .clamp(NUMBER_WIDTH_MIN, NUMBER_WIDTH_MAX),
        None => ctx.registry.display().number_width,
    };
    let first = ctx.buffer.first_line_number;
    for (offset, line) in ctx.buffer.lines().iter().enumerate() {
        writeln!(ctx.out, "{:>width$}\t{line}", first + offset)?;
    }
    Ok(DispatchResult::clean())
}

fn read(ctx: &mut CommandContext<'_>, args: &ParsedArgs) -> CommandResult<DispatchResult> {
    let path = resolve_path(ctx.buffer, args.get_str("filename"))?;
    let norm = read_file(&path)?;
    if ctx.buffer.is_empty() {
        ctx.buffer.line_ending = norm.original;
    }
    ctx.buffer.insert_after_cursor(norm.lines);
    ctx.buffer.associated_file = Some(path);
    Ok(DispatchResult::clean())
}

fn write(ctx: &mut CommandContext<'_>, args: &ParsedArgs) -> CommandResult<DispatchResult> {
    let path = resolve_path(ctx.buffer, args.get_str("filename"))?;
    write_file(&path, ctx.buffer)?;
    ctx.buffer.associated_file = Some(path);
    Ok(DispatchResult::clean())
}

fn quit(_ctx: &mut CommandContext<'_>, _args: &ParsedArgs) -> CommandResult<DispatchResult> {
    Ok(DispatchResult::quit())
}
