#![doc = include_str!("../README.md")]

/// The input window and read cursor a [`parser::Parser`] is built over.
pub mod cursor;
/// Line/column computation over a cursor's window.
pub mod span;
/// The parser's diagnostic record and the fallible-construction error type.
pub mod error;
/// Opaque identity tokens (parser, rule, action and string-slot indices).
pub mod ids;
/// The rule value and the sum type it dispatches over.
pub mod rule;
/// Parser state and the rule execution contract.
pub mod parser;
/// No-allocation terminal constructors.
pub mod primitive;
/// Text-specific terminals: digit runs and numeric literals.
pub mod text;
/// Combinators that build new rules out of existing ones.
pub mod combinator;
/// `quoted_string`: a quote-delimited run with escape handling.
pub mod quoted;
/// Recursive parsers: rules that refer to themselves.
pub mod recursive;

pub use crate::error::{ParseError, RuleError};
pub use crate::ids::{ActionId, ClientTag, ParserId, RuleId, SlotId};
pub use crate::parser::Parser;
pub use crate::rule::{CharClass, Rule};

/// Everything needed to build and run a grammar, re-exported together so
/// `use pegforge::prelude::*;` is all a consumer needs.
pub mod prelude {
    pub use crate::combinator::*;
    pub use crate::error::{ParseError, RuleError};
    pub use crate::ids::ClientTag;
    pub use crate::parser::Parser;
    pub use crate::primitive::*;
    pub use crate::quoted::quoted_string;
    pub use crate::recursive::recursive;
    pub use crate::rule::{CharClass, Rule};
    pub use crate::text;
}
