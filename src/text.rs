//! Text-specific terminals: digit runs and numeric literals (`spec.md` §4.3).

use crate::combinator::{alt, notat};
use crate::parser::Parser;
use crate::primitive::{char_, eof};
use crate::rule::{CharClass, Rule, RuleNode};

/// One or more consecutive ASCII digits. Consumes the whole run.
pub fn digits() -> Rule {
    Rule::standalone(RuleNode::Digits)
}

/// An optional sign then one or more digits. Consumes up to the last digit;
/// does not validate what follows.
pub fn int_dec() -> Rule {
    Rule::standalone(RuleNode::IntDec)
}

/// C's decimal floating-point syntax as consumed by `strtod`: optional sign,
/// digits, optional `.` + digits, optional exponent. Consumes exactly what a
/// `strtod`-style scanner would.
pub fn double() -> Rule {
    Rule::standalone(RuleNode::Double)
}

/// [`int_dec`] followed by eof or by a byte that is neither a letter, an
/// underscore, nor `.`; fails atomically otherwise.
///
/// This is the one terminal that needs parser-owned storage (`spec.md`
/// §4.3): the compound rule is built once per parser and cached in a
/// dedicated slot, installed in a single assignment so a construction
/// failure can never leak a half-built rule (`spec.md` §9 open question,
/// resolved).
pub fn int_dec_strict(parser: &mut Parser) -> Rule {
    if let Some(id) = parser.int_dec_strict_cache {
        return Rule::arena(parser.id(), id);
    }
    // `alt`/`seq` only ever reject empty child lists; every list built here
    // is a fixed, non-empty literal, so these can never actually fail.
    let tail_class = match alt(parser, vec![CharClass::Alpha.into(), char_(b'_', true), char_(b'.', true)]) {
        Ok(rule) => rule,
        Err(_) => unreachable!("alt() is given a fixed non-empty child list"),
    };
    let tail = match alt(parser, vec![eof(), notat(tail_class)]) {
        Ok(rule) => rule,
        Err(_) => unreachable!("alt() is given a fixed non-empty child list"),
    };
    let compound = match crate::combinator::seq(parser, vec![int_dec(), tail]) {
        Ok(rule) => rule,
        Err(_) => unreachable!("seq() is given a fixed non-empty child list"),
    };
    let id = match compound.arena_id() {
        Some(id) => id,
        None => unreachable!("seq() always allocates its result into the arena"),
    };
    parser.int_dec_strict_cache = Some(id);
    compound
}

impl From<CharClass> for Rule {
    fn from(class: CharClass) -> Rule {
        Rule::standalone(RuleNode::Class(class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_dec_strict_fails_on_trailing_dot() {
        let mut p = Parser::from_str("-3492.323asa");
        let rule = int_dec_strict(&mut p);
        assert!(!p.run(&rule).unwrap());
        assert_eq!(p.pos(), 0, "atomic failure must not move pos");
    }

    #[test]
    fn int_dec_strict_matches_before_space_dot() {
        let mut p = Parser::from_str("-3492 . xyz");
        let rule = int_dec_strict(&mut p);
        assert!(p.run(&rule).unwrap());
        assert_eq!(p.get_match(), Some(&b"-3492"[..]));
    }

    #[test]
    fn int_dec_strict_is_cached_per_parser() {
        let mut p = Parser::from_str("1 2");
        let a = int_dec_strict(&mut p);
        let b = int_dec_strict(&mut p);
        assert!(a.is_arena_bound());
        assert!(b.is_arena_bound());
    }

    #[test]
    fn digits_requires_at_least_one() {
        let mut p = Parser::from_str("abc");
        assert!(!p.run(&digits()).unwrap());
    }

    #[test]
    fn double_consumes_exponent() {
        let mut p = Parser::from_str("6.02e23rest");
        assert!(p.run(&double()).unwrap());
        assert_eq!(p.get_match(), Some(&b"6.02e23"[..]));
    }

    #[test]
    fn double_leaves_dangling_exponent_marker_unconsumed() {
        let mut p = Parser::from_str("5e");
        assert!(p.run(&double()).unwrap());
        assert_eq!(p.get_match(), Some(&b"5"[..]));
    }
}
