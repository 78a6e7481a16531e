#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{CommandRegistry, CommandResult, DispatchResult, builtin_registry, execute};
use core_text::Buffer;

/// Buffer holding `src` with the cursor on `cursor`.
pub fn doc(src: &[&str], cursor: usize) -> Buffer {
    let mut b = Buffer::from_lines(src.iter().map(|s| s.to_string()).collect());
    b.set_current_line(cursor);
    b
}

pub fn lines(b: &Buffer) -> Vec<&str> {
    b.lines().iter().map(String::as_str).collect()
}

/// Outcome of one dispatched line: result plus captured display output.
pub struct Run {
    pub result: CommandResult<DispatchResult>,
    pub output: String,
}

pub fn run_with(registry: &CommandRegistry, buffer: &mut Buffer, text: &str) -> Run {
    let mut out = Vec::new();
    let result = execute(registry, buffer, text, &mut out);
    Run {
        result,
        output: String::from_utf8(out).unwrap(),
    }
}

pub fn run(buffer: &mut Buffer, text: &str) -> Run {
    run_with(&builtin_registry(), buffer, text)
}

/// Dispatch every line in order, panicking on the first failure.
pub fn script(buffer: &mut Buffer, steps: &[&str]) -> String {
    let registry = builtin_registry();
    let mut output = String::new();
    for step in steps {
        let r = run_with(&registry, buffer, step);
        if let Err(e) = r.result {
            panic!("step {step:?} failed: {e}");
        }
        output.push_str(&r.output);
    }
    output
}
