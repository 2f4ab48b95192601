//! Tests for the scanner and token tables.

use crate::*;

fn tokens(source: &str) -> Vec<(SyntaxKind, String)> {
    let mut scanner = ScannerState::new(source.to_string());
    let mut out = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        out.push((kind, scanner.token_value().to_string()));
    }
    out
}

fn kinds(source: &str) -> Vec<SyntaxKind> {
    tokens(source).into_iter().map(|(k, _)| k).collect()
}

#[test]
fn test_text_to_keyword() {
    assert_eq!(text_to_keyword("const"), Some(SyntaxKind::ConstKeyword));
    assert_eq!(text_to_keyword("interface"), Some(SyntaxKind::InterfaceKeyword));
    assert_eq!(text_to_keyword("type"), Some(SyntaxKind::TypeKeyword));
    assert_eq!(text_to_keyword("foo"), None);
    assert_eq!(text_to_keyword("CONST"), None);
}

#[test]
fn test_contextual_keywords_are_not_reserved() {
    assert!(token_is_reserved_word(SyntaxKind::ClassKeyword));
    assert!(!token_is_reserved_word(SyntaxKind::TypeKeyword));
    assert!(token_is_contextual_keyword(SyntaxKind::NumberKeyword));
    assert!(token_is_identifier_or_keyword(SyntaxKind::Identifier));
    assert!(!token_is_identifier_or_keyword(SyntaxKind::OpenBraceToken));
}

#[test]
fn test_token_is_assignment_operator() {
    assert!(token_is_assignment_operator(SyntaxKind::EqualsToken));
    assert!(token_is_assignment_operator(SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken));
    assert!(token_is_assignment_operator(SyntaxKind::QuestionQuestionEqualsToken));
    assert!(!token_is_assignment_operator(SyntaxKind::EqualsEqualsToken));
}

#[test]
fn test_token_to_text() {
    assert_eq!(token_to_text(SyntaxKind::EqualsGreaterThanToken), Some("=>"));
    assert_eq!(token_to_text(SyntaxKind::TypeOfKeyword), Some("typeof"));
    assert_eq!(token_to_text(SyntaxKind::Identifier), None);
}

#[test]
fn test_scan_declaration() {
    assert_eq!(
        kinds("let x: number = 1;"),
        vec![
            SyntaxKind::LetKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::ColonToken,
            SyntaxKind::NumberKeyword,
            SyntaxKind::EqualsToken,
            SyntaxKind::NumericLiteral,
            SyntaxKind::SemicolonToken,
        ]
    );
}

#[test]
fn test_comments_are_skipped_and_line_breaks_recorded() {
    let mut scanner = ScannerState::new("a // one\n/* two\n */ b".to_string());
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert!(!scanner.has_preceding_line_break());
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.token_value(), "b");
    assert!(scanner.has_preceding_line_break());
}

#[test]
fn test_string_escapes_are_cooked() {
    let toks = tokens(r#"'a\'b' "c\nd" "A\x42""#);
    assert_eq!(toks[0], (SyntaxKind::StringLiteral, "a'b".to_string()));
    assert_eq!(toks[1], (SyntaxKind::StringLiteral, "c\nd".to_string()));
    assert_eq!(toks[2], (SyntaxKind::StringLiteral, "AB".to_string()));
}

#[test]
fn test_unterminated_string_reports_diagnostic() {
    let mut scanner = ScannerState::new("'abc\nx".to_string());
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert!(scanner.is_unterminated());
    assert_eq!(scanner.diagnostics().len(), 1);
    assert_eq!(scanner.diagnostics()[0].message.code, 1002);
}

#[test]
fn test_numbers() {
    let toks = tokens("0x1F 1_000 .5 1e10 2n");
    let values: Vec<&str> = toks.iter().map(|(_, v)| v.as_str()).collect();
    assert_eq!(values, vec!["0x1F", "1_000", ".5", "1e10", "2n"]);
    assert!(toks.iter().all(|(k, _)| *k == SyntaxKind::NumericLiteral));
}

#[test]
fn test_greater_than_is_rescanned_on_demand() {
    let mut scanner = ScannerState::new("a >>>= b".to_string());
    scanner.scan();
    assert_eq!(scanner.scan(), SyntaxKind::GreaterThanToken);
    assert_eq!(
        scanner.re_scan_greater_token(),
        SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken
    );
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
}

#[test]
fn test_template_with_substitution() {
    let mut scanner = ScannerState::new("`a${x}b${y}c`".to_string());
    assert_eq!(scanner.scan(), SyntaxKind::TemplateHead);
    assert_eq!(scanner.token_value(), "a");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
    assert_eq!(scanner.re_scan_template_token(), SyntaxKind::TemplateMiddle);
    assert_eq!(scanner.token_value(), "b");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
    assert_eq!(scanner.re_scan_template_token(), SyntaxKind::TemplateTail);
    assert_eq!(scanner.token_value(), "c");
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
}

#[test]
fn test_save_and_restore_state() {
    let mut scanner = ScannerState::new("(a, b) => a".to_string());
    scanner.scan();
    let snapshot = scanner.save_state();
    scanner.scan();
    scanner.scan();
    assert_eq!(scanner.token(), SyntaxKind::CommaToken);
    scanner.restore_state(snapshot);
    assert_eq!(scanner.token(), SyntaxKind::OpenParenToken);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
}

#[test]
fn test_optional_chaining_vs_conditional_number() {
    assert_eq!(
        kinds("a?.b"),
        vec![SyntaxKind::Identifier, SyntaxKind::QuestionDotToken, SyntaxKind::Identifier]
    );
    assert_eq!(
        kinds("a?.5:1"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::QuestionToken,
            SyntaxKind::NumericLiteral,
            SyntaxKind::ColonToken,
            SyntaxKind::NumericLiteral,
        ]
    );
}

#[test]
fn test_invalid_character() {
    let mut scanner = ScannerState::new("#".to_string());
    assert_eq!(scanner.scan(), SyntaxKind::Unknown);
    assert_eq!(scanner.diagnostics()[0].message.code, 1127);
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
}
