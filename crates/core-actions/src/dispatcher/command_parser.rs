//! Command line tokenization.
//!
//! Splits the text after any range into a command name and argument tokens
//! using shell-like rules:
//! * unquoted whitespace separates tokens;
//! * `'...'` is taken literally;
//! * `"..."` groups text, with `\"` and `\\` as the only escapes;
//! * an unquoted `\` takes the next character literally.
//!
//! Pure classification, no side effects. Unterminated quotes and a trailing
//! lone backslash are errors.

use crate::error::{CommandError, CommandResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub name: String,
    pub args: Vec<String>,
}

pub struct CommandParser;

impl CommandParser {
    /// Tokenize `raw`; the first token names the command.
    pub fn parse(raw: &str) -> CommandResult<CommandLine> {
        let mut tokens = tokenize(raw)?.into_iter();
        match tokens.next() {
            Some(name) if !name.is_empty() => Ok(CommandLine {
                name,
                args: tokens.collect(),
            }),
            _ => Err(CommandError::NoCommand),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single,
    Double,
}

pub fn tokenize(raw: &str) -> CommandResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // Distinguishes `""` (an empty token) from no token at all.
    let mut in_token = false;
    let mut quote = Quote::None;
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        match quote {
            Quote::Single => match ch {
                '\'' => quote = Quote::None,
                _ => current.push(ch),
            },
            Quote::Double => match ch {
                '"' => quote = Quote::None,
                '\\' => match chars.next() {
                    Some(next @ ('"' | '\\')) => current.push(next),
                    Some(next) => {
                        current.push('\\');
                        current.push(next);
                    }
                    None => return Err(unterminated("\"")),
                },
                _ => current.push(ch),
            },
            Quote::None => match ch {
                c if c.is_whitespace() => {
                    if in_token {
                        tokens.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                }
                '\'' => {
                    quote = Quote::Single;
                    in_token = true;
                }
                '"' => {
                    quote = Quote::Double;
                    in_token = true;
                }
                '\\' => match chars.next() {
                    Some(next) => {
                        current.push(next);
                        in_token = true;
                    }
                    None => {
                        return Err(CommandError::Tokenize(
                            "no character after escape".to_string(),
                        ));
                    }
                },
                _ => {
                    current.push(ch);
                    in_token = true;
                }
            },
        }
    }

    match quote {
        Quote::None => {}
        Quote::Single => return Err(unterminated("'")),
        Quote::Double => return Err(unterminated("\"")),
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn unterminated(quote: &str) -> CommandError {
    CommandError::Tokenize(format!("no closing quotation ({quote})"))
}
