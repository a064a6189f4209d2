//! Recursive parsers: rules that refer to themselves (`spec.md` §3
//! "dynamically built sub-rules", §9 arena design notes).
//!
//! Not one of `spec.md` §4.4's named combinators, but the mechanism every
//! non-trivial grammar needs to express `expr := term (op term)*` where
//! `term` refers back to `expr`. Exposed from the teacher's own prelude as
//! `recursive::recursive`, carried over here as a dedicated module the same
//! way the teacher keeps it apart from `combinator.rs`.

use crate::ids::RuleId;
use crate::parser::Parser;
use crate::rule::{Rule, RuleNode};

/// Reserves an arena slot, hands `build` a placeholder [`Rule`] that refers
/// to that same slot (so it can be embedded as a child wherever the grammar
/// recurses), then installs `build`'s result into the slot in one
/// assignment.
///
/// This reuses the same "build once, install atomically" pattern
/// `int_dec_strict` uses for its own cached compound rule (`spec.md` §9):
/// the slot is written exactly once, after the whole sub-grammar is built,
/// so a panic or early return during `build` can never leave a half-wired
/// rule reachable.
pub fn recursive(parser: &mut Parser, build: impl FnOnce(&mut Parser, Rule) -> Rule) -> Rule {
    let id = RuleId(parser.arena.len());
    parser.arena.push(std::rc::Rc::new(RuleNode::Failure));
    let placeholder = Rule::arena(parser.id(), id);
    let built = build(parser, placeholder);
    // `build` only ever has access to this one `parser`, so whatever `Rule`
    // it returns is either standalone or arena-bound to `parser` itself —
    // `resolve` can only fail on a rule bound to a *different* parser.
    let node = match parser.resolve(&built) {
        Ok(node) => node,
        Err(_) => unreachable!("build() cannot construct a rule bound to another parser"),
    };
    parser.arena[id.0] = node;
    Rule::arena(parser.id(), id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::{alt, seq};
    use crate::primitive::{char_, success};

    #[test]
    fn balanced_parens_via_recursion() {
        let mut p = Parser::from_str("(())((())())()");
        let expr = recursive(&mut p, |parser, expr| {
            let paren = seq(
                parser,
                vec![char_(b'(', true), crate::combinator::opt(expr.clone()), char_(b')', true)],
            )
            .unwrap();
            alt(parser, vec![paren, success()]).unwrap()
        });
        assert!(p.run(&expr).unwrap());
        assert_eq!(p.pos(), 4, "first top-level group `(())` is fully consumed");
    }
}

