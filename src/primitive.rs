//! Terminal rules: the no-allocation constructors of `spec.md` §4.3.
//!
//! Every rule built here is a `Rule::standalone` value — pure data, no
//! parser arena involved, freely shareable across parsers and threads
//! (`spec.md` §3 Lifecycle, §5 "Shared-resource policy").

use std::rc::Rc;

use crate::rule::{CharClass, Rule, RuleNode};

/// Always matches; consumes nothing.
pub fn success() -> Rule {
    Rule::standalone(RuleNode::Success)
}

/// Never matches.
pub fn failure() -> Rule {
    Rule::standalone(RuleNode::Failure)
}

/// Matches iff `pos == end`; consumes nothing.
pub fn eof() -> Rule {
    Rule::standalone(RuleNode::Eof)
}

/// Matches `"\r\n"` (2 bytes) or `"\n"` (1 byte), case sensitive.
pub fn eol() -> Rule {
    Rule::standalone(RuleNode::Eol)
}

/// Matches the next byte against `c`.
pub fn char_(c: u8, case_sensitive: bool) -> Rule {
    Rule::standalone(RuleNode::Char { ch: c, case_sensitive })
}

/// Matches the next byte iff it appears in `set`.
pub fn oneof(set: impl AsRef<[u8]>, case_sensitive: bool) -> Rule {
    Rule::standalone(RuleNode::OneOf { set: Rc::from(set.as_ref()), case_sensitive })
}

/// Matches the next byte `b` iff `lo <= b <= hi`. Endpoints are swapped if
/// `lo > hi`.
pub fn range(lo: u8, hi: u8) -> Rule {
    let (lo, hi) = if lo > hi { (hi, lo) } else { (lo, hi) };
    Rule::standalone(RuleNode::Range { lo, hi })
}

/// Matches `s` literally (optionally ASCII-fold case-insensitive). Consumes
/// `s.len()` bytes.
pub fn string(s: impl AsRef<[u8]>, case_sensitive: bool) -> Rule {
    Rule::standalone(RuleNode::StringLit { s: Rc::from(s.as_ref()), case_sensitive })
}

macro_rules! char_class_ctor {
    ($(#[$meta:meta])* $name:ident => $variant:ident) => {
        $(#[$meta])*
        pub fn $name() -> Rule {
            Rule::standalone(RuleNode::Class(CharClass::$variant))
        }
    };
}

char_class_ctor!(
    /// Matches one ASCII alphanumeric byte.
    alnum => Alnum
);
char_class_ctor!(
    /// Matches one ASCII alphabetic byte.
    alpha => Alpha
);
char_class_ctor!(
    /// Matches one blank byte (space or tab).
    blank => Blank
);
char_class_ctor!(
    /// Matches one ASCII control byte.
    cntrl => Cntrl
);
char_class_ctor!(
    /// Matches one ASCII digit.
    digit => Digit
);
char_class_ctor!(
    /// Matches one printable-and-not-space ASCII byte.
    graph => Graph
);
char_class_ctor!(
    /// Matches one ASCII lowercase byte.
    lower => Lower
);
char_class_ctor!(
    /// Matches one printable ASCII byte (including space).
    print => Print
);
char_class_ctor!(
    /// Matches one ASCII punctuation byte.
    punct => Punct
);
char_class_ctor!(
    /// Matches one ASCII whitespace byte.
    space => Space
);
char_class_ctor!(
    /// Matches one ASCII uppercase byte.
    upper => Upper
);
char_class_ctor!(
    /// Matches one ASCII hex-digit byte.
    xdigit => Xdigit
);

/// Matches one byte in `0..=0x7F`.
pub fn ascii() -> Rule {
    Rule::standalone(RuleNode::Ascii)
}

/// Matches any byte (kept for API symmetry with `ascii`; always true for
/// byte input, per `spec.md` §4.3).
pub fn latin1() -> Rule {
    Rule::standalone(RuleNode::Latin1)
}
