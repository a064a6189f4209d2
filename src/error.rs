//! The parser's own diagnostic record and the fallible-construction error
//! type, kept apart from the matcher the way the teacher keeps diagnostics
//! (`error.rs`) apart from the combinator plumbing (`combinator.rs`).

use std::fmt;

/// A parse error raised by the consumer from inside an action callback via
/// [`crate::parser::Parser::set_error`].
///
/// At most one `ParseError` is live at a time; a later call to `set_error`
/// overwrites the earlier one (`spec.md` §4.1). This is routine diagnostic
/// state, not a Rust `Result::Err` — a rule returning `false` is ordinary
/// control flow and never touches this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub col: usize,
    pub client_code: i64,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.col, self.message)
    }
}

/// Argument and resource errors raised by rule constructors (`spec.md` §7).
///
/// A rule's match function never returns this — failing to match is encoded
/// as `Ok(false)`. This type is only surfaced by the fallible constructors in
/// [`crate::combinator`], [`crate::primitive`], [`crate::text`] and
/// [`crate::quoted`], and by [`crate::parser::Parser::run`] when handed a
/// rule built by another parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// Illegal constructor arguments, e.g. `repeat` with `max < min`.
    InvalidArgument(&'static str),
    /// A rule tagged for one parser's arena was run against a different one,
    /// or outlived the arena that owned it.
    ForeignRule,
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleError::InvalidArgument(msg) => write!(f, "invalid rule argument: {msg}"),
            RuleError::ForeignRule => {
                write!(f, "rule belongs to a different parser (or a dropped one)")
            }
        }
    }
}

impl std::error::Error for RuleError {}
