//! `quoted_string`: a `quote`-delimited run with `escape`-prefixed escapes
//! (`spec.md` §4.4). One of the few allocating constructors, since the
//! unescaped copy it produces has to live somewhere the consumer can read it
//! back from after the match.

use crate::combinator::push_arena;
use crate::ids::SlotId;
use crate::parser::Parser;
use crate::rule::{Rule, RuleNode};

/// Matches a `quote`-delimited run in which `escape` escapes the next byte
/// (plus the small fixed set of C-style escapes, but only when
/// `escape == Some(b'\\')` — any other escape byte is a plain pass-through
/// that strips itself and leaves the escaped byte untranslated, per
/// `spec.md` §4.4), writing a newly unescaped copy into a parser-owned slot.
///
/// The copy is kept as raw bytes, not re-encoded through `char`/`String`:
/// the input is bytes, not code points (`spec.md` §3), so a byte >= 0x80 in
/// the source must come back out as that same byte, not a re-encoded
/// multi-byte UTF-8 sequence.
///
/// `spec.md` §9 leaves `escape == quote` (SQL-style doubled-quote escaping)
/// as an open question the original declares unsupported; this port
/// resolves it by supporting it, since it costs nothing to special-case and
/// doubled-quote escaping is a common real-world dialect.
///
/// Returns the rule and the [`SlotId`] to read the unescaped bytes back
/// from via [`Parser::quoted_string_value`] once the rule has matched. A
/// second match through the same rule overwrites (and drops) the slot's
/// previous contents, matching the original's "previously written copy is
/// freed first" (`spec.md` §4.4) — ordinary `Option<Vec<u8>>` assignment.
pub fn quoted_string(parser: &mut Parser, quote: u8, escape: Option<u8>) -> (Rule, SlotId) {
    let slot = SlotId(parser.string_slots.len());
    parser.string_slots.push(None);
    let rule = push_arena(parser, RuleNode::QuotedString { quote, escape, slot });
    (rule, slot)
}

impl<'i> Parser<'i> {
    /// The most recently unescaped bytes written to `slot`, if the rule that
    /// owns it has matched at least once.
    pub fn quoted_string_value(&self, slot: SlotId) -> Option<&[u8]> {
        self.string_slots.get(slot.0).and_then(|s| s.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescapes_backslash_escapes() {
        let mut p = Parser::from_str(r#""a\nb\"c""#);
        let (rule, slot) = quoted_string(&mut p, b'"', Some(b'\\'));
        assert!(p.run(&rule).unwrap());
        assert_eq!(p.quoted_string_value(slot), Some(&b"a\nb\"c"[..]));
    }

    #[test]
    fn non_backslash_escape_is_a_plain_pass_through() {
        // `escape = '%'` must only strip the `%`, never consult the
        // C-style escape table — `%n` is a literal `n`, not a newline.
        let mut p = Parser::from_str(r#""a%nb""#);
        let (rule, slot) = quoted_string(&mut p, b'"', Some(b'%'));
        assert!(p.run(&rule).unwrap());
        assert_eq!(p.quoted_string_value(slot), Some(&b"anb"[..]));
    }

    #[test]
    fn supports_doubled_quote_escaping() {
        let mut p = Parser::from_str("'it''s here' rest");
        let (rule, slot) = quoted_string(&mut p, b'\'', Some(b'\''));
        assert!(p.run(&rule).unwrap());
        assert_eq!(p.quoted_string_value(slot), Some(&b"it's here"[..]));
    }

    #[test]
    fn fails_atomically_on_unterminated_string() {
        let mut p = Parser::from_str(r#""no closing quote"#);
        let (rule, _slot) = quoted_string(&mut p, b'"', Some(b'\\'));
        assert!(!p.run(&rule).unwrap());
        assert_eq!(p.pos(), 0);
    }

    #[test]
    fn slot_is_overwritten_on_rematch() {
        let mut p = Parser::from_str(r#""first""second""#);
        let (rule, slot) = quoted_string(&mut p, b'"', Some(b'\\'));
        assert!(p.run(&rule).unwrap());
        assert_eq!(p.quoted_string_value(slot), Some(&b"first"[..]));
        assert!(p.run(&rule).unwrap());
        assert_eq!(p.quoted_string_value(slot), Some(&b"second"[..]));
    }

    #[test]
    fn preserves_high_bytes_without_utf8_re_encoding() {
        // A source byte >= 0x80 must come back out as that same byte, not
        // re-encoded as a 2-byte UTF-8 sequence (`spec.md` §3: bytes, not
        // code points).
        let input: &[u8] = b"\"a\xffb\"";
        let mut p = Parser::new(input);
        let (rule, slot) = quoted_string(&mut p, b'"', Some(b'\\'));
        assert!(p.run(&rule).unwrap());
        assert_eq!(p.quoted_string_value(slot), Some(&b"a\xffb"[..]));
    }
}
