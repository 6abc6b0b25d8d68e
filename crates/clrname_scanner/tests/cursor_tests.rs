//! Parse cursor integration tests.
//!
//! Exercises movement bounds, whitespace skipping, scope bookkeeping and
//! error construction independently of the parser.

use clrname_core::Token;
use clrname_diagnostics::messages;
use clrname_scanner::{default_error_for, ParseCursor};

/// Helper: collect every character by advancing to the end.
fn walk(text: &str) -> Vec<char> {
    let mut cursor = ParseCursor::new(text);
    let mut seen = Vec::new();
    while cursor.advance() {
        seen.extend(cursor.current_char());
    }
    seen
}

#[test]
fn test_advance_visits_every_char() {
    assert_eq!(walk("A`1[B]"), vec!['A', '`', '1', '[', 'B', ']']);
    assert!(walk("").is_empty());
}

#[test]
fn test_movement_bounds() {
    let mut cursor = ParseCursor::new("ab");
    assert_eq!(cursor.pos(), -1);
    assert_eq!(cursor.current_char(), None);
    assert!(!cursor.retreat());

    assert!(cursor.advance());
    assert!(cursor.advance());
    assert!(cursor.at_last());
    assert!(!cursor.advance());
    assert_eq!(cursor.pos(), 1);

    assert!(cursor.retreat());
    assert_eq!(cursor.current_char(), Some('a'));
    assert!(cursor.retreat());
    assert_eq!(cursor.pos(), -1);

    cursor.set_pos(99);
    assert_eq!(cursor.pos(), 2);
    assert!(cursor.past_end());
    assert_eq!(cursor.current_char(), None);
    cursor.set_pos(-7);
    assert_eq!(cursor.pos(), -1);
}

#[test]
fn test_whitespace_runs() {
    let mut cursor = ParseCursor::new("a   b  ");
    assert_eq!(cursor.find_non_whitespace(1, true).unwrap(), 4);
    assert_eq!(cursor.find_non_whitespace_backward(3, true).unwrap(), 0);
    assert_eq!(cursor.find_non_whitespace(5, false).unwrap(), 7);

    let err = cursor.find_non_whitespace(5, true).unwrap_err();
    assert!(err.is(&messages::INVALID_TYPE_NAME_TERMINATION));

    cursor.set_pos(1);
    cursor.eat_whitespace(true).unwrap();
    assert_eq!(cursor.current_char(), Some('b'));
}

#[test]
fn test_backward_whitespace_strict() {
    let cursor = ParseCursor::new("   x");
    let err = cursor.find_non_whitespace_backward(2, true).unwrap_err();
    assert_eq!(err.code(), messages::INVALID_TYPE_NAME.code);
    assert_eq!(cursor.find_non_whitespace_backward(2, false).unwrap(), -1);
}

#[test]
fn test_keyword_match_ignores_case() {
    let cursor = ParseCursor::new("a, version=1.0");
    assert!(cursor.matches_ignore_case("Version", 3));
    assert!(!cursor.matches_ignore_case("Culture", 3));
    assert!(!cursor.matches_ignore_case("Version=1.0.0", 3));
    assert_eq!(cursor.last_index_of(',', 10), 1);
    assert_eq!(cursor.last_index_of('=', 9), -1);
    assert_eq!(cursor.last_index_of(',', 100), -1);
}

#[test]
fn test_token_transitions_are_traced() {
    let mut cursor = ParseCursor::new("T").with_trace(true);
    cursor.advance();
    cursor.set_token(Token::TypeName);
    cursor.set_token(Token::TypeName);
    assert_eq!(cursor.prev_token(), Token::TypeNameStart);

    let (_, trace) = cursor.finish();
    assert_eq!(trace.len(), 2);
    assert_eq!(trace[0].token, Token::TypeNameStart);
    assert_eq!(trace[0].pos, -1);
    assert_eq!(trace[1].token, Token::TypeName);
    assert_eq!(trace[1].prev_token, Token::TypeNameStart);
    assert_eq!(trace[1].to_string(), "TypeNameStart -> TypeName @ 0");
}

#[test]
fn test_untraced_cursor_records_nothing() {
    let mut cursor = ParseCursor::new("T");
    cursor.set_token(Token::TypeName);
    let (_, trace) = cursor.finish();
    assert!(trace.is_empty());
}

#[test]
fn test_scope_stack() {
    let mut cursor = ParseCursor::new("L`2[A,B]");
    assert!(cursor.in_root());
    let err = cursor.start_scope().unwrap_err();
    assert!(err.is(&messages::INVALID_GENERICS_ARGUMENT_START));

    cursor
        .update(|tree, id| tree.set_expected_generic_arg_count(id, 2))
        .unwrap();
    let first = cursor.start_scope().unwrap();
    assert_eq!(cursor.depth(), 2);
    assert_eq!(cursor.current_scope(), first);
    assert!(!cursor.in_root());
    assert_eq!(cursor.end_scope().unwrap(), first);
    assert!(cursor.in_root());

    let second = cursor.start_scope().unwrap();
    assert_eq!(cursor.end_scope().unwrap(), second);
    let err = cursor.start_scope().unwrap_err();
    assert!(err.is(&messages::GENERICS_ARGUMENTS_COUNT_EXCEEDED));
    assert_eq!(cursor.depth(), 1);

    let err = cursor.end_scope().unwrap_err();
    assert!(err.is(&messages::INVALID_GENERICS_ARGUMENT_END));
}

#[test]
fn test_nesting_bound() {
    let mut cursor = ParseCursor::new("A`1[B`1[C]]").with_max_depth(Some(1));
    cursor
        .update(|tree, id| tree.set_expected_generic_arg_count(id, 1))
        .unwrap();
    cursor.start_scope().unwrap();
    cursor
        .update(|tree, id| tree.set_expected_generic_arg_count(id, 1))
        .unwrap();
    let err = cursor.start_scope().unwrap_err();
    assert!(err.is(&messages::NESTING_DEPTH_EXCEEDED));
}

#[test]
fn test_update_lifts_rule_violations() {
    let mut cursor = ParseCursor::new("abc");
    cursor.advance();
    cursor.advance();
    cursor.set_token(Token::TypeName);
    cursor.update(|tree, id| tree.set_name(id, 0)).unwrap();
    let err = cursor.update(|tree, id| tree.set_name(id, 0)).unwrap_err();
    assert!(err.is(&messages::TYPE_NAME_ALREADY_DEFINED));
    assert_eq!(err.position(), 1);
    assert_eq!(err.state(), Token::TypeName);
    assert_eq!(err.text(), "abc");
}

#[test]
fn test_default_errors() {
    assert_eq!(default_error_for(Token::TypeNameEnd).code, 2002);
    assert_eq!(default_error_for(Token::Array).code, 1000);
    assert_eq!(default_error_for(Token::GenericsCount).code, 3008);
    assert_eq!(default_error_for(Token::AssemblyPropertyStart).code, 4007);
    assert_eq!(default_error_for(Token::PublicKeyTokenValue).code, 4006);
    assert_eq!(default_error_for(Token::Undefined).code, 2000);

    let cursor = ParseCursor::new("x");
    let err = cursor.default_error();
    assert_eq!(err.code(), 2001);
    assert_eq!(err.position(), 0);
}
