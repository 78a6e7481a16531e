//! Addressing, argument parsing and command dispatch for the line editor.
//!
//! Layers, bottom-up:
//! * `address`    - a single line address (`N`, `+N`, `-N`, `.`, `$`)
//! * `range`      - address pairs joined by `,` or `;` plus the shorthands
//! * `args`       - per-command argument descriptors compiled into a parser
//! * `registry`   - command name -> descriptors + handler
//! * `dispatcher` - range slicing, recursive execution and splicing
//! * `io_ops`     - file reads and writes for `r` and `w`
//!
//! Nothing here writes to stdout directly; display output goes to the
//! `Write` sink handed to [`dispatcher::execute`].

pub mod address;
pub mod args;
pub mod dispatcher;
pub mod error;
pub mod io_ops;
pub mod range;
pub mod registry;

pub use address::{Resolved, resolve, resolve_at};
pub use args::{ArgKind, ArgParser, ArgSpec, ParseOutcome, ParsedArgs};
pub use dispatcher::{DispatchResult, builtin_commands, builtin_registry, execute};
pub use error::{AddressError, CommandError, CommandResult, Endpoint, RegistryError};
pub use range::{LineRange, ParsedRange, RangeParser, parse_range};
pub use registry::{
    CommandContext, CommandDef, CommandEntry, CommandRegistry, DisplayOptions, HELP_COMMAND,
    Handler,
};
