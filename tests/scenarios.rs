//! The nine worked end-to-end scenarios and the action-based scenario.

use pegforge::prelude::*;

#[test]
fn scenario_1_alpha_on_zyx() {
    let mut p = Parser::from_str("zyx");
    assert!(p.run(&alpha()).unwrap());
    assert_eq!(p.get_match(), Some(&b"z"[..]));
    assert_eq!(p.pos(), 1);
}

#[test]
fn scenario_2_seq_alpha_digit_on_a123() {
    let mut p = Parser::from_str("a123");
    let rule = seq(&mut p, vec![alpha(), digit()]).unwrap();
    assert!(p.run(&rule).unwrap());
    assert_eq!(p.get_match(), Some(&b"a1"[..]));
    assert_eq!(p.pos(), 2);
}

#[test]
fn scenario_3_pad_discard_true() {
    let mut p = Parser::from_str("abc123def");
    let rule = pad(&mut p, Some(alpha()), plus(digit()), Some(alpha()), true);
    assert!(p.run(&rule).unwrap());
    assert_eq!(p.get_match(), Some(&b"123"[..]));
    assert_eq!(p.pos(), 9, "pos reflects the full span consumed by the right pad");
}

#[test]
fn scenario_4_pad_discard_false() {
    let mut p = Parser::from_str("abc123def");
    let rule = pad(&mut p, Some(alpha()), plus(digit()), Some(alpha()), false);
    assert!(p.run(&rule).unwrap());
    assert_eq!(p.get_match(), Some(&b"abc123def"[..]));
}

#[test]
fn scenario_5_int_dec_strict_fails_atomically() {
    let mut p = Parser::from_str("-3492.323asa");
    let rule = text::int_dec_strict(&mut p);
    assert!(!p.run(&rule).unwrap());
    assert_eq!(p.pos(), 0);
}

#[test]
fn scenario_6_int_dec_strict_matches_before_space_dot() {
    let mut p = Parser::from_str("-3492 . xyz");
    let rule = text::int_dec_strict(&mut p);
    assert!(p.run(&rule).unwrap());
    assert_eq!(p.get_match(), Some(&b"-3492"[..]));
}

#[test]
fn scenario_7_plus_alt_char_on_hiaf() {
    let mut p = Parser::from_str("hiaF!");
    let branch = alt(&mut p, vec![char_(b'h', true), char_(b'i', true)]).unwrap();
    let rule = plus(branch);
    assert!(p.run(&rule).unwrap());
    assert_eq!(p.get_match(), Some(&b"hi"[..]));
}

#[test]
fn scenario_8_pad_upper_lower_upper() {
    let mut p = Parser::from_str("ZYXtokenCBA!end");
    let rule = pad(&mut p, Some(plus(range(b'A', b'Z'))), plus(range(b'a', b'z')), Some(plus(range(b'A', b'Z'))), true);
    assert!(p.run(&rule).unwrap());
    assert_eq!(p.get_match(), Some(&b"token"[..]));
}

#[test]
fn scenario_9_action_appends_each_number_in_order() {
    let mut p = Parser::from_str("12 34 56");
    let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let seen_cb = std::rc::Rc::clone(&seen);
    let number = action(&mut p, text::int_dec(), move |parser| {
        if let Some(m) = parser.get_match() {
            seen_cb.borrow_mut().push(String::from_utf8_lossy(m).into_owned());
        }
    });
    let padded = pad(&mut p, Some(opt(space())), number, Some(opt(space())), true);
    let rule = star(padded);
    assert!(p.run(&rule).unwrap());
    assert_eq!(*seen.borrow(), vec!["12", "34", "56"]);
}
