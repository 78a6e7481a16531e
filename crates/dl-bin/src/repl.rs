//! Read-dispatch-print loop.
//!
//! Generic over the input and output streams so the binary drives it with
//! stdin/stdout and tests drive it with in-memory buffers.

use anyhow::Result;
use core_actions::{CommandRegistry, execute};
use core_text::Buffer;
use std::io::{BufRead, Write};
use tracing::{debug, info};

pub const WELCOME_MESSAGE: &str = "Welcome to deepline\n\nType `h` to get more help.\n";

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    EndOfInput,
}

pub struct Session {
    pub registry: CommandRegistry,
    pub buffer: Buffer,
    pub prompt: String,
}

impl Session {
    pub fn new(registry: CommandRegistry, buffer: Buffer, prompt: impl Into<String>) -> Self {
        Self {
            registry,
            buffer,
            prompt: prompt.into(),
        }
    }

    /// Prompt, read one line, dispatch, repeat until `q` or end of input.
    /// Command failures are reported on `out` and do not stop the loop; only
    /// failures of the streams themselves are returned.
    pub fn run_loop<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> Result<ExitReason> {
        let mut line = String::new();
        let mut commands = 0usize;
        let mut failures = 0usize;
        let reason = loop {
            write!(out, "{}", self.prompt)?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                break ExitReason::EndOfInput;
            }
            let text = line.trim_end_matches(['\n', '\r']);
            commands += 1;

            match execute(&self.registry, &mut self.buffer, text, out) {
                Ok(result) if result.quit => break ExitReason::Quit,
                Ok(_) => {}
                Err(e) => {
                    failures += 1;
                    debug!(target: "runtime", error = %e, "command_failed");
                    writeln!(out, "error: {e}")?;
                }
            }
        };
        out.flush()?;
        info!(
            target: "runtime",
            ?reason,
            commands,
            failures,
            lines = self.buffer.line_count(),
            "session_end"
        );
        Ok(reason)
    }
}
