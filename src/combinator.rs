//! Combinators that allow combining and extending existing parsers
//! (`spec.md` §4.4). All combinators are atomic on failure: on `false`
//! return they restore `pos` to its entry value (enforced centrally in
//! [`crate::parser::Parser::dispatch`], not re-implemented per combinator
//! here — the constructors below only ever build [`RuleNode`] values).

use std::rc::Rc;

use crate::error::RuleError;
use crate::ids::{ActionId, RuleId};
use crate::parser::{ActionFn, Parser};
use crate::rule::{Rule, RuleNode};

pub(crate) fn push_arena(parser: &mut Parser, node: RuleNode) -> Rule {
    let id = RuleId(parser.arena.len());
    parser.arena.push(Rc::new(node));
    Rule::arena(parser.id(), id)
}

/// Ordered sequence: matches iff every child matches in order.
///
/// A genuine allocating constructor (`spec.md` §3 Lifecycle): the returned
/// rule is tied to `parser`'s arena.
pub fn seq(parser: &mut Parser, children: Vec<Rule>) -> Result<Rule, RuleError> {
    if children.is_empty() {
        return Err(RuleError::InvalidArgument("seq requires at least one child"));
    }
    Ok(push_arena(parser, RuleNode::Seq(children)))
}

/// Ordered choice: tries children in declaration order, succeeds on the
/// first match.
pub fn alt(parser: &mut Parser, children: Vec<Rule>) -> Result<Rule, RuleError> {
    if children.is_empty() {
        return Err(RuleError::InvalidArgument("alt requires at least one child"));
    }
    Ok(push_arena(parser, RuleNode::Alt(children)))
}

/// Always succeeds; consumes iff `r` matches. A no-allocation wrapper: `r`'s
/// own arena binding (if any) is what's checked at run time, not this node.
pub fn opt(r: Rule) -> Rule {
    Rule::standalone(RuleNode::Opt(r))
}

/// Repeats `r` until it fails or an iteration matches without consuming
/// (the non-consuming-exit guarantee). Always succeeds.
pub fn star(r: Rule) -> Rule {
    Rule::standalone(RuleNode::Star(r))
}

/// As [`star`] but requires at least one *consuming* match.
pub fn plus(r: Rule) -> Rule {
    Rule::standalone(RuleNode::Plus(r))
}

/// Matches iff `r` succeeds between `min` and `max` times inclusive
/// (same non-consuming-exit guard as [`star`]). `max >= min >= 0` and
/// `max >= 1` are required. `(1, 1)` degenerates to `r` itself and `(0, 1)`
/// to [`opt`], both skipping arena allocation entirely, per `spec.md` §4.4.
pub fn repeat(parser: &mut Parser, r: Rule, min: usize, max: usize) -> Result<Rule, RuleError> {
    if max < min || max < 1 {
        return Err(RuleError::InvalidArgument("repeat requires max >= min and max >= 1"));
    }
    if min == 1 && max == 1 {
        return Ok(r);
    }
    if min == 0 && max == 1 {
        return Ok(opt(r));
    }
    Ok(push_arena(parser, RuleNode::Repeat { rule: r, min, max }))
}

/// "And" predicate: runs `r`, restores `pos` regardless, returns `r`'s
/// result. Never consumes.
pub fn at(r: Rule) -> Rule {
    Rule::standalone(RuleNode::At(r))
}

/// "Not" predicate: the negation of [`at`]. Never consumes.
pub fn notat(r: Rule) -> Rule {
    Rule::standalone(RuleNode::NotAt(r))
}

/// Consumes bytes one at a time while `at(r)` is false and not eof;
/// succeeds once `at(r)` becomes true, reporting the consumed prefix
/// *excluding* `r`'s own match (`spec.md` §9 resolves the open question
/// this way). Fails atomically if eof is reached first.
pub fn until(r: Rule) -> Rule {
    Rule::standalone(RuleNode::Until(r))
}

/// Equivalent to `seq(star(left), main, star(right))`. If `discard` is true
/// the reported match is only `main`'s consumption; otherwise it is the full
/// span. If both `left` and `right` are absent, `pad` reduces to `main`
/// directly with no wrapping at all.
pub fn pad(parser: &mut Parser, left: Option<Rule>, main: Rule, right: Option<Rule>, discard: bool) -> Rule {
    if left.is_none() && right.is_none() {
        return main;
    }
    push_arena(parser, RuleNode::Pad { left, main, right, discard })
}

/// Runs `inner`. On success, records the match region, then invokes
/// `callback`; the callback may read `get_match`/`get_match_cursor`/`pos`
/// and mutate whatever state it closed over. On failure, restores `pos` and
/// never calls `callback` (`spec.md` §4.4, §6).
pub fn action(parser: &mut Parser, inner: Rule, callback: impl Fn(&mut Parser) + 'static) -> Rule {
    let action_id = ActionId(parser.actions.len());
    let boxed: ActionFn = Rc::new(callback);
    parser.actions.push(boxed);
    push_arena(parser, RuleNode::Action { rule: inner, action: action_id })
}
