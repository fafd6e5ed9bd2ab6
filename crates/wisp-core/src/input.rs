//! Tokenization and flag parsing for slash input.
//!
//! A raw input line goes through three stages: [`tokenize`] splits it into
//! shell-like tokens honoring single and double quoting, [`parse_flags_and_args`]
//! classifies tokens into flags and positionals, and [`parse_line`] composes
//! the two into a `{cmd, args, flags}` triple. The router strips the leading
//! slash before any of this runs — these functions never see it.

use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

/// Parsed flag values, insertion-ordered by first appearance.
///
/// Setting a flag twice overwrites in place (last write wins).
pub type Flags = IndexMap<String, FlagValue>;

/// A single flag value: presence-only flags are `Bool(true)`, `--key=value`
/// coerces to `Number` when the value looks numeric, `Text` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FlagValue {
    /// Whether this value should count as "on" for a presence-style flag.
    pub fn is_truthy(&self) -> bool {
        match self {
            FlagValue::Bool(b) => *b,
            FlagValue::Number(n) => *n != 0.0,
            FlagValue::Text(s) => !s.is_empty(),
        }
    }
}

/// True when `name` is present in `flags` with a truthy value.
pub fn flag_enabled(flags: &Flags, name: &str) -> bool {
    flags.get(name).is_some_and(FlagValue::is_truthy)
}

/// Split a raw line into tokens.
///
/// Whitespace separates tokens outside quotes. A `"..."` or `'...'` span is
/// one token with the surrounding quotes stripped; a backslash inside a
/// matching quote span passes the next character through literally (the
/// backslash itself is kept, so an escaped quote does not terminate the
/// span). Quote types do not nest. An unterminated quote consumes the rest
/// of the input as a single token rather than erroring.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '"' || c == '\'' {
            let quote = c;
            chars.next();
            let mut token = String::new();
            while let Some(ch) = chars.next() {
                if ch == '\\' {
                    token.push(ch);
                    if let Some(escaped) = chars.next() {
                        token.push(escaped);
                    }
                } else if ch == quote {
                    break;
                } else {
                    token.push(ch);
                }
            }
            tokens.push(token);
        } else {
            let mut token = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() {
                    break;
                }
                token.push(ch);
                chars.next();
            }
            tokens.push(token);
        }
    }

    tokens
}

/// Result of classifying tokens into positionals and flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parsed {
    pub args: Vec<String>,
    pub flags: Flags,
}

/// Signed-integer-or-decimal pattern used for `--key=value` coercion.
static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("numeric pattern compiles"));

/// Classify tokens left to right into flags and positional arguments.
///
/// - `--` moves every remaining token verbatim into `args` and stops scanning.
/// - `--key=value` sets a `Number` or `Text` flag; `--key` sets `Bool(true)`.
/// - `-abc` expands to one `Bool(true)` flag per character; `-x` sets flag `x`.
/// - Anything else is a positional argument, order-preserving.
pub fn parse_flags_and_args(tokens: &[String]) -> Parsed {
    let mut args = Vec::new();
    let mut flags = Flags::new();

    for (i, token) in tokens.iter().enumerate() {
        if token == "--" {
            args.extend(tokens[i + 1..].iter().cloned());
            break;
        } else if let Some(body) = token.strip_prefix("--") {
            match body.split_once('=') {
                None => {
                    flags.insert(body.to_string(), FlagValue::Bool(true));
                }
                Some((key, value)) => {
                    let coerced = if NUMERIC.is_match(value) {
                        FlagValue::Number(value.parse().unwrap_or(0.0))
                    } else {
                        FlagValue::Text(value.to_string())
                    };
                    flags.insert(key.to_string(), coerced);
                }
            }
        } else if let Some(body) = token.strip_prefix('-') {
            if body.chars().count() > 1 {
                // Cluster semantics: no combining with a value.
                for ch in body.chars() {
                    flags.insert(ch.to_string(), FlagValue::Bool(true));
                }
            } else {
                flags.insert(body.to_string(), FlagValue::Bool(true));
            }
        } else {
            args.push(token.clone());
        }
    }

    Parsed { args, flags }
}

/// A fully parsed input line: command word plus classified remainder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLine {
    pub cmd: String,
    pub args: Vec<String>,
    pub flags: Flags,
}

/// Trim, tokenize, and split the first token off as the command word.
///
/// Empty input yields an empty `cmd`. The leading slash is the router's
/// concern, not this function's.
pub fn parse_line(input: &str) -> ParsedLine {
    let tokens = tokenize(input.trim());
    match tokens.split_first() {
        None => ParsedLine::default(),
        Some((cmd, rest)) => {
            let Parsed { args, flags } = parse_flags_and_args(rest);
            ParsedLine {
                cmd: cmd.clone(),
                args,
                flags,
            }
        }
    }
}
