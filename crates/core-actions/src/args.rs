//! Per-command argument descriptors and the generic parser built from them.
//!
//! A command declares its arguments as a slice of [`ArgSpec`]. Required
//! arguments become positionals in declaration order; optional ones become
//! options named `--<name>` with a `-<first letter>` short form unless that
//! letter is already taken (`-h` always belongs to `--help`). The slice is
//! compiled once into a `clap::Command` at registration.

use crate::error::RegistryError;
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Str,
    Int,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: &'static str,
    pub kind: ArgKind,
    pub optional: bool,
    pub default: Option<&'static str>,
    pub help: Option<&'static str>,
}

impl ArgSpec {
    /// Required positional argument.
    pub const fn positional(name: &'static str, kind: ArgKind) -> Self {
        Self {
            name,
            kind,
            optional: false,
            default: None,
            help: None,
        }
    }

    /// Option that may be omitted; absent values read back as `None`.
    pub const fn optional(name: &'static str, kind: ArgKind) -> Self {
        Self {
            name,
            kind,
            optional: true,
            default: None,
            help: None,
        }
    }

    /// Option that falls back to `default` when omitted. No built-in command
    /// uses one yet; commands registered by embedders may.
    pub const fn with_default(name: &'static str, kind: ArgKind, default: &'static str) -> Self {
        Self {
            name,
            kind,
            optional: true,
            default: Some(default),
            help: None,
        }
    }

    pub const fn help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

/// Outcome of parsing a token list.
#[derive(Debug)]
pub enum ParseOutcome {
    Args(ParsedArgs),
    /// `-h/--help` was given; holds the rendered usage text.
    Help(String),
}

#[derive(Debug, Clone)]
pub struct ArgParser {
    command: Command,
}

impl ArgParser {
    pub fn build(
        name: &'static str,
        about: &'static str,
        specs: &[ArgSpec],
    ) -> Result<Self, RegistryError> {
        let invalid = |message: String| RegistryError::InvalidArgs {
            command: name.to_string(),
            message,
        };

        let mut command = Command::new(name)
            .about(about)
            .no_binary_name(true)
            .disable_version_flag(true);
        let mut names = HashSet::new();
        let mut shorts = HashSet::from(['h']);

        for spec in specs {
            if spec.name.is_empty() || spec.name == "help" {
                return Err(invalid(format!("invalid argument name '{}'", spec.name)));
            }
            if !names.insert(spec.name) {
                return Err(invalid(format!("duplicate argument '{}'", spec.name)));
            }
            let mut arg = Arg::new(spec.name).action(ArgAction::Set);
            arg = match spec.kind {
                ArgKind::Str => arg.value_parser(value_parser!(String)),
                ArgKind::Int => arg.value_parser(value_parser!(i64)),
                ArgKind::Float => arg.value_parser(value_parser!(f64)),
            };
            if spec.optional {
                arg = arg.long(spec.name);
                if let Some(short) = spec.name.chars().next()
                    && short.is_ascii_alphanumeric()
                    && shorts.insert(short)
                {
                    arg = arg.short(short);
                }
                if let Some(default) = spec.default {
                    arg = arg.default_value(default);
                }
            } else {
                arg = arg.required(true);
            }
            if let Some(help) = spec.help {
                arg = arg.help(help);
            }
            command = command.arg(arg);
        }
        Ok(Self { command })
    }

    /// Parse tokens (without the command name). Returns the first line of
    /// clap's diagnostic on failure.
    pub fn parse(&self, tokens: &[String]) -> Result<ParseOutcome, String> {
        match self.command.clone().try_get_matches_from(tokens.iter()) {
            Ok(matches) => Ok(ParseOutcome::Args(ParsedArgs { matches })),
            Err(e) if e.kind() == ErrorKind::DisplayHelp => Ok(ParseOutcome::Help(e.to_string())),
            Err(e) => {
                let rendered = e.to_string();
                let first = rendered.lines().next().unwrap_or_default();
                Err(first.strip_prefix("error: ").unwrap_or(first).to_string())
            }
        }
    }
}

/// Typed view over parsed arguments. Getters return `None` for absent
/// values and for names or kinds that do not match the descriptors.
#[derive(Debug, Clone)]
pub struct ParsedArgs {
    matches: ArgMatches,
}

impl ParsedArgs {
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.matches
            .try_get_one::<String>(name)
            .ok()
            .flatten()
            .map(String::as_str)
    }

    /// Value of an `ArgKind::Int` argument (`n --width`).
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.matches.try_get_one::<i64>(name).ok().flatten().copied()
    }

    /// Value of an `ArgKind::Float` argument, for commands registered
    /// outside the built-in table.
    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.matches.try_get_one::<f64>(name).ok().flatten().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(src: &[&str]) -> Vec<String> {
        src.iter().map(|s| s.to_string()).collect()
    }

    fn args(parser: &ArgParser, src: &[&str]) -> ParsedArgs {
        match parser.parse(&toks(src)).unwrap() {
            ParseOutcome::Args(a) => a,
            ParseOutcome::Help(h) => panic!("unexpected help: {h}"),
        }
    }

    #[test]
    fn positional_and_typed_options() {
        let p = ArgParser::build(
            "x",
            "test",
            &[
                ArgSpec::positional("text", ArgKind::Str),
                ArgSpec::with_default("count", ArgKind::Int, "1"),
                ArgSpec::optional("scale", ArgKind::Float),
            ],
        )
        .unwrap();
        let a = args(&p, &["hello"]);
        assert_eq!(a.get_str("text"), Some("hello"));
        assert_eq!(a.get_int("count"), Some(1));
        assert_eq!(a.get_float("scale"), None);

        let a = args(&p, &["hi", "-c", "3", "--scale", "0.5"]);
        assert_eq!(a.get_int("count"), Some(3));
        assert_eq!(a.get_float("scale"), Some(0.5));
    }

    #[test]
    fn short_flag_collisions_fall_back_to_long() {
        let p = ArgParser::build(
            "x",
            "test",
            &[
                ArgSpec::optional("file", ArgKind::Str),
                ArgSpec::optional("format", ArgKind::Str),
                ArgSpec::optional("height", ArgKind::Int),
            ],
        )
        .unwrap();
        let a = args(&p, &["-f", "a.txt", "--format", "raw", "--height", "4"]);
        assert_eq!(a.get_str("file"), Some("a.txt"));
        assert_eq!(a.get_str("format"), Some("raw"));
        assert_eq!(a.get_int("height"), Some(4));
        assert!(p.parse(&toks(&["-h"])).is_ok_and(|o| matches!(o, ParseOutcome::Help(_))));
    }

    #[test]
    fn missing_positional_is_an_error() {
        let p = ArgParser::build("i", "insert", &[ArgSpec::positional("text", ArgKind::Str)])
            .unwrap();
        let err = p.parse(&[]).unwrap_err();
        assert!(err.contains("required"), "{err}");
    }

    #[test]
    fn wrong_kind_is_an_error() {
        let p = ArgParser::build("x", "test", &[ArgSpec::positional("n", ArgKind::Int)]).unwrap();
        assert!(p.parse(&toks(&["abc"])).is_err());
    }

    #[test]
    fn unexpected_argument_is_an_error() {
        let p = ArgParser::build("p", "print", &[]).unwrap();
        let err = p.parse(&toks(&["extra"])).unwrap_err();
        assert!(err.contains("extra"), "{err}");
    }

    #[test]
    fn help_renders_usage() {
        let p = ArgParser::build(
            "w",
            "Write the buffer to a file.",
            &[ArgSpec::optional("filename", ArgKind::Str)],
        )
        .unwrap();
        match p.parse(&toks(&["--help"])).unwrap() {
            ParseOutcome::Help(text) => {
                assert!(text.contains("Write the buffer to a file."));
                assert!(text.contains("--filename"));
            }
            other => panic!("expected help, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_and_reserved_names() {
        assert!(matches!(
            ArgParser::build(
                "x",
                "t",
                &[
                    ArgSpec::positional("a", ArgKind::Str),
                    ArgSpec::positional("a", ArgKind::Str)
                ]
            ),
            Err(RegistryError::InvalidArgs { .. })
        ));
        assert!(ArgParser::build("x", "t", &[ArgSpec::optional("help", ArgKind::Str)]).is_err());
    }

    #[test]
    fn mismatched_getter_returns_none() {
        let p = ArgParser::build("x", "t", &[ArgSpec::positional("n", ArgKind::Int)]).unwrap();
        let a = args(&p, &["5"]);
        assert_eq!(a.get_str("n"), None);
        assert_eq!(a.get_int("missing"), None);
    }
}
