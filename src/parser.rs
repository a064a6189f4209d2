//! Parser state and the rule execution contract (`spec.md` §4.1, §4.2).

use std::any::Any;
use std::ops::Range;
use std::rc::Rc;

use crate::cursor::Cursor;
use crate::error::{ParseError, RuleError};
use crate::ids::{ActionId, ParserId, RuleId, SlotId};
use crate::rule::{Rule, RuleNode, RuleRepr};
use crate::span;

/// A callback invoked after every successful `set_match` (`spec.md` §4.5).
///
/// Listeners are advisory (tracing) and must not mutate the parser; they
/// only ever see a shared `&Parser`.
pub type MatchListener<'i> = Rc<dyn Fn(&Parser<'i>)>;

/// A callback invoked after a successful [`crate::combinator::action`] rule
/// (`spec.md` §4.4, §6). May read `get_match`/`get_match_cursor`/`pos` and
/// mutate whatever state it closed over.
pub type ActionFn<'i> = Rc<dyn Fn(&mut Parser<'i>)>;

/// Parser state: the input cursor, the last-match region, the current error,
/// registered listeners, and the arenas backing dynamically built rules
/// (`spec.md` §3).
pub struct Parser<'i> {
    id: ParserId,
    cursor: Cursor<'i>,
    match_region: Option<Range<usize>>,
    listeners: Vec<MatchListener<'i>>,
    error: Option<ParseError>,
    client_data: Option<Box<dyn Any>>,

    pub(crate) arena: Vec<Rc<RuleNode>>,
    pub(crate) actions: Vec<ActionFn<'i>>,
    pub(crate) string_slots: Vec<Option<Vec<u8>>>,
    pub(crate) int_dec_strict_cache: Option<RuleId>,
}

impl<'i> Parser<'i> {
    /// Builds a parser over `input`. The window above never changes for the
    /// parser's lifetime.
    pub fn new(input: &'i [u8]) -> Self {
        Parser {
            id: ParserId::fresh(),
            cursor: Cursor::new(input),
            match_region: None,
            listeners: Vec::new(),
            error: None,
            client_data: None,
            arena: Vec::new(),
            actions: Vec::new(),
            string_slots: Vec::new(),
            int_dec_strict_cache: None,
        }
    }

    /// Builds a parser over a UTF-8 string's bytes.
    pub fn from_str(input: &'i str) -> Self {
        Parser::new(input.as_bytes())
    }

    pub(crate) fn id(&self) -> ParserId {
        self.id
    }

    // -- Cursor accessors (spec.md §4.1) ------------------------------------

    pub fn pos(&self) -> usize {
        self.cursor.pos()
    }

    pub fn begin(&self) -> usize {
        self.cursor.begin()
    }

    pub fn end(&self) -> usize {
        self.cursor.end()
    }

    pub fn distance(&self, p: usize) -> isize {
        self.cursor.distance(p)
    }

    pub fn set_pos(&mut self, p: usize) -> bool {
        self.cursor.set_pos(p)
    }

    pub fn advance(&mut self, n: usize) -> bool {
        self.cursor.advance(n)
    }

    pub fn bump(&mut self) -> bool {
        self.cursor.bump()
    }

    pub fn eof(&self) -> bool {
        self.cursor.eof()
    }

    pub fn is_good(&self) -> bool {
        !self.eof() && self.error.is_none()
    }

    pub fn line_col(&self) -> (usize, usize) {
        span::line_col(self.cursor.input(), self.begin(), self.pos())
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.cursor.peek()
    }

    pub(crate) fn peek_at(&self, n: usize) -> Option<u8> {
        self.cursor.peek_at(n)
    }

    pub(crate) fn slice(&self, b: usize, e: usize) -> &'i [u8] {
        self.cursor.slice(b, e)
    }

    // -- Match region (spec.md §4.1) ----------------------------------------

    /// Records `[b, e)` as the current match; if `advance_pos` also moves
    /// `pos` to `e`. Fails (returns `false`, no state changed) if the region
    /// is out of bounds or inverted. Invokes every listener, in registration
    /// order, on success.
    pub fn set_match(&mut self, b: usize, e: usize, advance_pos: bool) -> bool {
        if b < self.begin() || e > self.end() || e < b {
            return false;
        }
        self.match_region = Some(b..e);
        if advance_pos {
            self.set_pos(e);
        }
        let listeners = self.listeners.clone();
        for listener in listeners {
            listener(self);
        }
        true
    }

    pub fn clear_match(&mut self) {
        self.match_region = None;
    }

    /// The most recently recorded match region, if any.
    pub fn get_match_cursor(&self) -> Option<Range<usize>> {
        self.match_region.clone()
    }

    /// The bytes of the most recently recorded match region, if any.
    pub fn get_match(&self) -> Option<&'i [u8]> {
        self.match_region.clone().map(|r| self.slice(r.start, r.end))
    }

    // -- Errors (spec.md §4.1, §6) -------------------------------------------

    /// Records `message` (with the current `line_col()` snapshotted) as the
    /// current error. A later call overwrites the earlier one.
    pub fn set_error(&mut self, client_code: i64, message: impl Into<String>) {
        let (line, col) = self.line_col();
        self.error = Some(ParseError { message: message.into(), line, col, client_code });
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn get_error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    // -- Listeners (spec.md §4.5) --------------------------------------------

    pub fn add_listener(&mut self, listener: impl Fn(&Parser<'i>) + 'static) {
        self.listeners.push(Rc::new(listener));
    }

    // -- Per-parser client data (spec.md §6, §9 "global cross-parser table") -

    /// Sets this parser's consumer-owned client data slot, replacing and
    /// dropping whatever was there before. Unlike the original's process-wide
    /// table (flagged in `spec.md` §9 as racy), this is ordinary per-parser
    /// state.
    pub fn set_client_data<T: 'static>(&mut self, data: T) {
        self.client_data = Some(Box::new(data));
    }

    pub fn client_data<T: 'static>(&self) -> Option<&T> {
        self.client_data.as_ref().and_then(|b| b.downcast_ref())
    }

    pub fn client_data_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.client_data.as_mut().and_then(|b| b.downcast_mut())
    }

    // -- Rule execution (spec.md §4.2) --------------------------------------

    pub(crate) fn resolve(&self, rule: &Rule) -> Result<Rc<RuleNode>, RuleError> {
        match &rule.repr {
            RuleRepr::Standalone(node) => Ok(Rc::clone(node)),
            RuleRepr::Arena(owner, id) => {
                if *owner != self.id {
                    return Err(RuleError::ForeignRule);
                }
                self.arena.get(id.0).cloned().ok_or(RuleError::ForeignRule)
            }
        }
    }

    /// `parse(parser, rule) := rule.match_fn(&rule, parser)` (`spec.md` §4.2).
    ///
    /// Returns `Ok(true)`/`Ok(false)` for match/no-match; `Err` only when
    /// `rule` is bound to a different (or already-dropped) parser's arena.
    /// On `Ok(false)`, `pos` is guaranteed unchanged from its value on entry
    /// (atomicity).
    pub fn run(&mut self, rule: &Rule) -> Result<bool, RuleError> {
        let node = self.resolve(rule)?;
        self.dispatch(&node)
    }

    fn dispatch(&mut self, node: &RuleNode) -> Result<bool, RuleError> {
        match node {
            RuleNode::Success => Ok(true),
            RuleNode::Failure => Ok(false),
            RuleNode::Eof => Ok(self.eof()),
            RuleNode::Eol => Ok(self.match_eol()),
            RuleNode::Char { ch, case_sensitive } => Ok(self.match_byte(|b| byte_eq(b, *ch, *case_sensitive))),
            RuleNode::OneOf { set, case_sensitive } => {
                let set = Rc::clone(set);
                let cs = *case_sensitive;
                Ok(self.match_byte(|b| set.iter().any(|&s| byte_eq(b, s, cs))))
            }
            RuleNode::Range { lo, hi } => {
                let (lo, hi) = (*lo, *hi);
                Ok(self.match_byte(|b| b >= lo && b <= hi))
            }
            RuleNode::StringLit { s, case_sensitive } => Ok(self.match_string(s, *case_sensitive)),
            RuleNode::Class(class) => {
                let class = *class;
                Ok(self.match_byte(|b| class.matches(b)))
            }
            RuleNode::Ascii => Ok(self.match_byte(|b| b <= 0x7F)),
            RuleNode::Latin1 => Ok(self.match_byte(|_| true)),
            RuleNode::Digits => self.match_plus_byte(|b| b.is_ascii_digit()),
            RuleNode::IntDec => Ok(self.match_int_dec()),
            RuleNode::Double => Ok(self.match_double()),

            RuleNode::Opt(r) => self.match_opt(r),
            RuleNode::Star(r) => self.match_star(r),
            RuleNode::Plus(r) => self.match_plus(r),
            RuleNode::At(r) => self.match_at(r),
            RuleNode::NotAt(r) => self.match_notat(r),
            RuleNode::Until(r) => self.match_until(r),

            RuleNode::Seq(children) => self.match_seq(children),
            RuleNode::Alt(children) => self.match_alt(children),
            RuleNode::Repeat { rule, min, max } => self.match_repeat(rule, *min, *max),
            RuleNode::Pad { left, main, right, discard } => self.match_pad(left, main, right, *discard),
            RuleNode::Action { rule, action } => self.match_action(rule, *action),
            RuleNode::QuotedString { quote, escape, slot } => self.match_quoted_string(*quote, *escape, *slot),
        }
    }

    fn match_byte(&mut self, pred: impl FnOnce(u8) -> bool) -> bool {
        match self.peek() {
            Some(b) if pred(b) => {
                let start = self.pos();
                self.set_match(start, start + 1, true)
            }
            _ => false,
        }
    }

    fn match_eol(&mut self) -> bool {
        let start = self.pos();
        match (self.peek(), self.peek_at(1)) {
            (Some(b'\r'), Some(b'\n')) => self.set_match(start, start + 2, true),
            (Some(b'\n'), _) => self.set_match(start, start + 1, true),
            _ => false,
        }
    }

    fn match_string(&mut self, s: &[u8], case_sensitive: bool) -> bool {
        let start = self.pos();
        if start + s.len() > self.end() {
            return false;
        }
        let window = self.slice(start, start + s.len());
        let matches = window.iter().zip(s).all(|(&a, &b)| byte_eq(a, b, case_sensitive));
        if matches {
            self.set_match(start, start + s.len(), true)
        } else {
            false
        }
    }

    fn match_plus_byte(&mut self, pred: impl Fn(u8) -> bool) -> Result<bool, RuleError> {
        let start = self.pos();
        while let Some(b) = self.peek() {
            if !pred(b) {
                break;
            }
            self.bump();
        }
        let end = self.pos();
        if end == start {
            Ok(false)
        } else {
            Ok(self.set_match(start, end, false))
        }
    }

    fn match_int_dec(&mut self) -> bool {
        let start = self.pos();
        if matches!(self.peek(), Some(b'+') | Some(b'-')) {
            self.bump();
        }
        let digits_start = self.pos();
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.bump();
        }
        if self.pos() == digits_start {
            self.set_pos(start);
            return false;
        }
        let end = self.pos();
        self.set_match(start, end, false)
    }

    fn match_double(&mut self) -> bool {
        let start = self.pos();
        if matches!(self.peek(), Some(b'+') | Some(b'-')) {
            self.bump();
        }
        let mut saw_digit = false;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.bump();
            saw_digit = true;
        }
        if self.peek() == Some(b'.') {
            self.bump();
            while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                self.bump();
                saw_digit = true;
            }
        }
        if !saw_digit {
            self.set_pos(start);
            return false;
        }
        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            let exp_start = self.pos();
            self.bump();
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.bump();
            }
            let exp_digits_start = self.pos();
            while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                self.bump();
            }
            if self.pos() == exp_digits_start {
                // No digits after `e`/`E`: the exponent marker was not part
                // of the number.
                self.set_pos(exp_start);
            }
        }
        let end = self.pos();
        self.set_match(start, end, false)
    }

    fn match_opt(&mut self, r: &Rule) -> Result<bool, RuleError> {
        let start = self.pos();
        if !self.run(r)? {
            self.set_pos(start);
        }
        Ok(true)
    }

    fn run_star(&mut self, r: &Rule) -> Result<(), RuleError> {
        loop {
            let before = self.pos();
            if !self.run(r)? {
                break;
            }
            if self.pos() == before {
                break;
            }
        }
        Ok(())
    }

    fn match_star(&mut self, r: &Rule) -> Result<bool, RuleError> {
        let start = self.pos();
        self.run_star(r)?;
        let end = self.pos();
        if end > start {
            self.set_match(start, end, false);
        }
        Ok(true)
    }

    fn match_plus(&mut self, r: &Rule) -> Result<bool, RuleError> {
        let start = self.pos();
        let mut consumed_any = false;
        loop {
            let before = self.pos();
            if !self.run(r)? {
                break;
            }
            if self.pos() > before {
                consumed_any = true;
            } else {
                break;
            }
        }
        if !consumed_any {
            self.set_pos(start);
            return Ok(false);
        }
        let end = self.pos();
        self.set_match(start, end, false);
        Ok(true)
    }

    fn match_repeat(&mut self, r: &Rule, min: usize, max: usize) -> Result<bool, RuleError> {
        let start = self.pos();
        let mut count = 0usize;
        while count < max {
            let before = self.pos();
            if !self.run(r)? {
                break;
            }
            count += 1;
            if self.pos() == before {
                break;
            }
        }
        if count < min {
            self.set_pos(start);
            return Ok(false);
        }
        let end = self.pos();
        if end > start {
            self.set_match(start, end, false);
        }
        Ok(true)
    }

    fn match_at(&mut self, r: &Rule) -> Result<bool, RuleError> {
        let start = self.pos();
        let result = self.run(r)?;
        self.set_pos(start);
        Ok(result)
    }

    fn match_notat(&mut self, r: &Rule) -> Result<bool, RuleError> {
        let start = self.pos();
        let result = self.run(r)?;
        self.set_pos(start);
        Ok(!result)
    }

    fn match_until(&mut self, r: &Rule) -> Result<bool, RuleError> {
        let start = self.pos();
        loop {
            if self.eof() {
                self.set_pos(start);
                return Ok(false);
            }
            if self.match_at(r)? {
                break;
            }
            self.bump();
        }
        let end = self.pos();
        Ok(self.set_match(start, end, false))
    }

    fn match_seq(&mut self, children: &[Rule]) -> Result<bool, RuleError> {
        let start = self.pos();
        for child in children {
            if !self.run(child)? {
                self.set_pos(start);
                return Ok(false);
            }
        }
        let end = self.pos();
        self.set_match(start, end, false);
        Ok(true)
    }

    fn match_alt(&mut self, children: &[Rule]) -> Result<bool, RuleError> {
        for child in children {
            if self.run(child)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn match_pad(
        &mut self,
        left: &Option<Rule>,
        main: &Rule,
        right: &Option<Rule>,
        discard: bool,
    ) -> Result<bool, RuleError> {
        let entry = self.pos();
        if let Some(l) = left {
            self.run_star(l)?;
        }
        let main_start = self.pos();
        if !self.run(main)? {
            self.set_pos(entry);
            return Ok(false);
        }
        let main_end = self.pos();
        if let Some(r) = right {
            self.run_star(r)?;
        }
        let full_end = self.pos();
        let (b, e) = if discard { (main_start, main_end) } else { (entry, full_end) };
        self.set_match(b, e, false);
        Ok(true)
    }

    fn match_action(&mut self, r: &Rule, action: ActionId) -> Result<bool, RuleError> {
        let start = self.pos();
        if !self.run(r)? {
            return Ok(false);
        }
        let end = self.pos();
        self.set_match(start, end, false);
        let callback = Rc::clone(&self.actions[action.0]);
        callback(self);
        Ok(true)
    }

    fn match_quoted_string(&mut self, quote: u8, escape: Option<u8>, slot: SlotId) -> Result<bool, RuleError> {
        let start = self.pos();
        if self.peek() != Some(quote) {
            return Ok(false);
        }
        self.bump();
        let mut out = Vec::new();
        loop {
            match self.peek() {
                None => {
                    self.set_pos(start);
                    return Ok(false);
                }
                Some(b) if Some(b) == escape && b != quote => {
                    self.bump();
                    match self.peek() {
                        None => {
                            self.set_pos(start);
                            return Ok(false);
                        }
                        Some(next) => {
                            // The fixed C-style escape table (`\n`, `\t`, …)
                            // only applies when `escape == '\\'` (`spec.md`
                            // §4.4); any other escape byte is a plain
                            // pass-through that just strips itself.
                            let ch = if escape == Some(b'\\') { unescape(next) } else { next };
                            out.push(ch);
                            self.bump();
                        }
                    }
                }
                Some(b) if b == quote => {
                    // SQL-style doubled-quote escaping: `escape == quote`
                    // (`spec.md` §9 open question, resolved: supported).
                    if escape == Some(quote) && self.peek_at(1) == Some(quote) {
                        out.push(quote);
                        self.bump();
                        self.bump();
                    } else {
                        self.bump();
                        break;
                    }
                }
                Some(b) => {
                    out.push(b);
                    self.bump();
                }
            }
        }
        let end = self.pos();
        self.string_slots[slot.0] = Some(out);
        Ok(self.set_match(start, end, false))
    }
}

fn byte_eq(a: u8, b: u8, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a.to_ascii_lowercase() == b.to_ascii_lowercase()
    }
}

fn unescape(b: u8) -> u8 {
    match b {
        b'n' => b'\n',
        b't' => b'\t',
        b'r' => b'\r',
        b'0' => 0,
        b'a' => 0x07,
        b'b' => 0x08,
        b'f' => 0x0c,
        b'v' => 0x0b,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{char_, success};

    #[test]
    fn set_match_rejects_out_of_bounds() {
        let mut p = Parser::from_str("abc");
        assert!(!p.set_match(0, 10, false));
        assert!(!p.set_match(2, 1, false));
        assert!(p.set_match(0, 2, false));
        assert_eq!(p.get_match(), Some(&b"ab"[..]));
    }

    #[test]
    fn listeners_fire_in_order() {
        let mut p = Parser::from_str("abc");
        let log = Rc::new(std::cell::RefCell::new(Vec::new()));
        for tag in 0..3 {
            let log = Rc::clone(&log);
            p.add_listener(move |parser| log.borrow_mut().push((tag, parser.get_match_cursor())));
        }
        p.set_match(0, 1, false);
        assert_eq!(log.borrow().len(), 3);
        assert_eq!(log.borrow()[0].0, 0);
        assert_eq!(log.borrow()[2].0, 2);
    }

    #[test]
    fn foreign_rule_is_rejected() {
        let mut a = Parser::from_str("abc");
        let mut b = Parser::from_str("abc");
        let seq = crate::combinator::seq(&mut a, vec![char_(b'a', true), char_(b'b', true)]).unwrap();
        assert_eq!(b.run(&seq), Err(RuleError::ForeignRule));
        assert!(a.run(&seq).unwrap());
    }

    #[test]
    fn standalone_rules_are_shareable() {
        let shared = success();
        let mut a = Parser::from_str("x");
        let mut b = Parser::from_str("y");
        assert!(a.run(&shared).unwrap());
        assert!(b.run(&shared).unwrap());
    }
}
