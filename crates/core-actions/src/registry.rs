//! Command registry: name -> descriptors + handler.
//!
//! Commands are registered from a declarative [`CommandDef`]. The argument
//! descriptors are compiled into a parser up front so a bad descriptor is a
//! registration error rather than a runtime surprise. The help command is
//! always present and its name is reserved.

use crate::args::{ArgParser, ArgSpec, ParseOutcome, ParsedArgs};
use crate::dispatcher::DispatchResult;
use crate::error::{CommandError, CommandResult, RegistryError};
use core_text::Buffer;
use std::collections::BTreeMap;
use std::io::Write;

/// Name of the built-in help command.
pub const HELP_COMMAND: &str = "h";

pub type Handler = fn(&mut CommandContext<'_>, &ParsedArgs) -> CommandResult<DispatchResult>;

/// Everything a handler may touch while it runs.
pub struct CommandContext<'a> {
    pub buffer: &'a mut Buffer,
    pub registry: &'a CommandRegistry,
    pub out: &'a mut dyn Write,
}

/// Declarative command description.
#[derive(Clone, Copy)]
pub struct CommandDef {
    /// Short token typed by the user (`p`).
    pub name: &'static str,
    /// Long descriptive name shown by help (`print`).
    pub function: &'static str,
    pub description: &'static str,
    pub args: &'static [ArgSpec],
    pub handler: Handler,
}

/// Presentation settings shared by output commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Column width of line numbers printed by `n`.
    pub number_width: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self { number_width: 6 }
    }
}

impl From<&core_config::PrintConfig> for DisplayOptions {
    fn from(cfg: &core_config::PrintConfig) -> Self {
        Self {
            number_width: cfg.effective_number_width(),
        }
    }
}

pub struct CommandEntry {
    pub name: &'static str,
    pub function: &'static str,
    pub description: &'static str,
    parser: ArgParser,
    handler: Handler,
}

impl CommandEntry {
    /// Parse `tokens` against the descriptors and run the handler. `--help`
    /// prints usage and leaves the buffer alone.
    pub fn invoke(
        &self,
        ctx: &mut CommandContext<'_>,
        tokens: &[String],
    ) -> CommandResult<DispatchResult> {
        match self.parser.parse(tokens) {
            Ok(ParseOutcome::Args(args)) => (self.handler)(ctx, &args),
            Ok(ParseOutcome::Help(usage)) => {
                ctx.out.write_all(usage.as_bytes())?;
                Ok(DispatchResult::clean())
            }
            Err(message) => Err(CommandError::Arguments {
                command: self.name.to_string(),
                message,
            }),
        }
    }
}

pub struct CommandRegistry {
    entries: BTreeMap<&'static str, CommandEntry>,
    display: DisplayOptions,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Registry holding only the help command.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: BTreeMap::new(),
            display: DisplayOptions::default(),
        };
        let def = CommandDef {
            name: HELP_COMMAND,
            function: "help",
            description: "Print help message for all commands.",
            args: &[],
            handler: help,
        };
        // Help takes no arguments, so compiling its parser cannot fail.
        if let Ok(entry) = compile(def) {
            registry.entries.insert(HELP_COMMAND, entry);
        }
        registry
    }

    pub fn register(&mut self, def: CommandDef) -> Result<(), RegistryError> {
        if def.name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if def.name == HELP_COMMAND {
            return Err(RegistryError::Reserved(def.name.to_string()));
        }
        if self.entries.contains_key(def.name) {
            return Err(RegistryError::Duplicate(def.name.to_string()));
        }
        let entry = compile(def)?;
        self.entries.insert(def.name, entry);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.get(name)
    }

    /// Entries sorted by name.
    pub fn entries(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries.values()
    }

    pub fn display(&self) -> DisplayOptions {
        self.display
    }

    pub fn set_display(&mut self, display: DisplayOptions) {
        self.display = display;
    }
}

fn compile(def: CommandDef) -> Result<CommandEntry, RegistryError> {
    Ok(CommandEntry {
        name: def.name,
        function: def.function,
        description: def.description,
        parser: ArgParser::build(def.name, def.description, def.args)?,
        handler: def.handler,
    })
}

fn help(ctx: &mut CommandContext<'_>, _args: &ParsedArgs) -> CommandResult<DispatchResult> {
    writeln!(ctx.out, "Available commands:")?;
    writeln!(ctx.out)?;
    for entry in ctx.registry.entries() {
        writeln!(
            ctx.out,
            "{}, {},  {}",
            entry.name, entry.function, entry.description
        )?;
    }
    Ok(DispatchResult::clean())
}
