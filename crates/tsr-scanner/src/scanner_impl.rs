//! Scanner state machine.
//!
//! The scanner produces one token per `scan()` call. `>` is always scanned
//! as a single token and `}` never continues a template; the parser asks for
//! `re_scan_greater_token` / `re_scan_template_token` in the contexts where
//! the longer forms are legal.

use crate::syntax_kind::{SyntaxKind, string_to_token};
use bitflags::bitflags;
use tsr_common::DiagnosticMessage;
use tsr_common::diagnostics::diagnostic_messages;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct TokenFlags: u8 {
        const PRECEDING_LINE_BREAK = 1 << 0;
        const UNTERMINATED = 1 << 1;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannerDiagnostic {
    pub start: u32,
    pub length: u32,
    pub message: DiagnosticMessage,
    pub arg: Option<&'static str>,
}

/// Everything needed to rewind the scanner for look-ahead.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    token_value: String,
    token_flags: TokenFlags,
    diagnostics_len: usize,
}

// Longest first so that prefixes never shadow longer operators.
const OPERATORS: &[(&str, SyntaxKind)] = &[
    ("...", SyntaxKind::DotDotDotToken),
    ("===", SyntaxKind::EqualsEqualsEqualsToken),
    ("!==", SyntaxKind::ExclamationEqualsEqualsToken),
    ("**=", SyntaxKind::AsteriskAsteriskEqualsToken),
    ("<<=", SyntaxKind::LessThanLessThanEqualsToken),
    ("||=", SyntaxKind::BarBarEqualsToken),
    ("&&=", SyntaxKind::AmpersandAmpersandEqualsToken),
    ("??=", SyntaxKind::QuestionQuestionEqualsToken),
    ("=>", SyntaxKind::EqualsGreaterThanToken),
    ("==", SyntaxKind::EqualsEqualsToken),
    ("!=", SyntaxKind::ExclamationEqualsToken),
    ("<=", SyntaxKind::LessThanEqualsToken),
    ("<<", SyntaxKind::LessThanLessThanToken),
    ("**", SyntaxKind::AsteriskAsteriskToken),
    ("++", SyntaxKind::PlusPlusToken),
    ("--", SyntaxKind::MinusMinusToken),
    ("&&", SyntaxKind::AmpersandAmpersandToken),
    ("||", SyntaxKind::BarBarToken),
    ("??", SyntaxKind::QuestionQuestionToken),
    ("+=", SyntaxKind::PlusEqualsToken),
    ("-=", SyntaxKind::MinusEqualsToken),
    ("*=", SyntaxKind::AsteriskEqualsToken),
    ("/=", SyntaxKind::SlashEqualsToken),
    ("%=", SyntaxKind::PercentEqualsToken),
    ("&=", SyntaxKind::AmpersandEqualsToken),
    ("|=", SyntaxKind::BarEqualsToken),
    ("^=", SyntaxKind::CaretEqualsToken),
    ("{", SyntaxKind::OpenBraceToken),
    ("}", SyntaxKind::CloseBraceToken),
    ("(", SyntaxKind::OpenParenToken),
    (")", SyntaxKind::CloseParenToken),
    ("[", SyntaxKind::OpenBracketToken),
    ("]", SyntaxKind::CloseBracketToken),
    (".", SyntaxKind::DotToken),
    (";", SyntaxKind::SemicolonToken),
    (",", SyntaxKind::CommaToken),
    ("<", SyntaxKind::LessThanToken),
    (">", SyntaxKind::GreaterThanToken),
    ("=", SyntaxKind::EqualsToken),
    ("+", SyntaxKind::PlusToken),
    ("-", SyntaxKind::MinusToken),
    ("*", SyntaxKind::AsteriskToken),
    ("/", SyntaxKind::SlashToken),
    ("%", SyntaxKind::PercentToken),
    ("&", SyntaxKind::AmpersandToken),
    ("|", SyntaxKind::BarToken),
    ("^", SyntaxKind::CaretToken),
    ("!", SyntaxKind::ExclamationToken),
    ("~", SyntaxKind::TildeToken),
    ("?", SyntaxKind::QuestionToken),
    (":", SyntaxKind::ColonToken),
    ("@", SyntaxKind::AtToken),
];

fn is_identifier_start(ch: char) -> bool {
    ch == '$' || ch == '_' || ch.is_alphabetic()
}

fn is_identifier_part(ch: char) -> bool {
    ch == '$' || ch == '_' || ch.is_alphanumeric() || ch == '\u{200c}' || ch == '\u{200d}'
}

fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

pub struct ScannerState {
    text: String,
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    token_value: String,
    token_flags: TokenFlags,
    diagnostics: Vec<ScannerDiagnostic>,
}

impl ScannerState {
    pub fn new(text: String) -> Self {
        ScannerState {
            text,
            pos: 0,
            token: SyntaxKind::Unknown,
            token_start: 0,
            token_value: String::new(),
            token_flags: TokenFlags::empty(),
            diagnostics: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    #[inline]
    pub fn token_start(&self) -> u32 {
        self.token_start as u32
    }

    #[inline]
    pub fn token_end(&self) -> u32 {
        self.pos as u32
    }

    /// Cooked value of the current token (unescaped for strings and templates).
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    /// Raw source text of the current token.
    pub fn token_text(&self) -> &str {
        &self.text[self.token_start..self.pos]
    }

    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    pub fn is_unterminated(&self) -> bool {
        self.token_flags.contains(TokenFlags::UNTERMINATED)
    }

    pub fn diagnostics(&self) -> &[ScannerDiagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<ScannerDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            token: self.token,
            token_start: self.token_start,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
            diagnostics_len: self.diagnostics.len(),
        }
    }

    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.token = snapshot.token;
        self.token_start = snapshot.token_start;
        self.token_value = snapshot.token_value;
        self.token_flags = snapshot.token_flags;
        self.diagnostics.truncate(snapshot.diagnostics_len);
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    #[inline]
    fn peek_at(&self, offset: usize) -> Option<char> {
        self.text[self.pos..].chars().nth(offset)
    }

    fn error(&mut self, start: usize, message: DiagnosticMessage, arg: Option<&'static str>) {
        self.diagnostics.push(ScannerDiagnostic {
            start: start as u32,
            length: (self.pos.max(start + 1) - start) as u32,
            message,
            arg,
        });
    }

    pub fn scan(&mut self) -> SyntaxKind {
        self.token_flags = TokenFlags::empty();
        self.token_value.clear();
        loop {
            self.token_start = self.pos;
            let Some(ch) = self.peek() else {
                self.token = SyntaxKind::EndOfFileToken;
                return self.token;
            };

            if is_line_break(ch) {
                self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                self.pos += ch.len_utf8();
                continue;
            }
            if ch.is_whitespace() || ch == '\u{feff}' {
                self.pos += ch.len_utf8();
                continue;
            }

            match ch {
                '/' if self.peek_at(1) == Some('/') => {
                    while let Some(c) = self.peek() {
                        if is_line_break(c) {
                            break;
                        }
                        self.pos += c.len_utf8();
                    }
                    continue;
                }
                '/' if self.peek_at(1) == Some('*') => {
                    let start = self.pos;
                    self.pos += 2;
                    let mut closed = false;
                    while let Some(c) = self.peek() {
                        if c == '*' && self.peek_at(1) == Some('/') {
                            self.pos += 2;
                            closed = true;
                            break;
                        }
                        if is_line_break(c) {
                            self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                        }
                        self.pos += c.len_utf8();
                    }
                    if !closed {
                        self.error(start, diagnostic_messages::TOKEN_EXPECTED, Some("*/"));
                    }
                    continue;
                }
                '"' | '\'' => {
                    self.scan_string(ch);
                    self.token = SyntaxKind::StringLiteral;
                    return self.token;
                }
                '`' => {
                    self.pos += 1;
                    self.token = self.scan_template(true);
                    return self.token;
                }
                '0'..='9' => {
                    self.scan_number();
                    self.token = SyntaxKind::NumericLiteral;
                    return self.token;
                }
                '.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                    self.scan_number();
                    self.token = SyntaxKind::NumericLiteral;
                    return self.token;
                }
                '?' if self.peek_at(1) == Some('.')
                    && !self.peek_at(2).is_some_and(|c| c.is_ascii_digit()) =>
                {
                    self.pos += 2;
                    self.token = SyntaxKind::QuestionDotToken;
                    return self.token;
                }
                c if is_identifier_start(c) || (c == '\\' && self.peek_at(1) == Some('u')) => {
                    self.scan_identifier();
                    self.token = string_to_token(&self.token_value);
                    return self.token;
                }
                _ => {}
            }

            let rest = &self.text[self.pos..];
            if let Some((text, kind)) = OPERATORS.iter().find(|(op, _)| rest.starts_with(op)) {
                self.pos += text.len();
                self.token = *kind;
                return self.token;
            }

            self.pos += ch.len_utf8();
            self.error(self.token_start, diagnostic_messages::INVALID_CHARACTER, None);
            self.token = SyntaxKind::Unknown;
            return self.token;
        }
    }

    fn scan_identifier(&mut self) {
        while let Some(c) = self.peek() {
            if is_identifier_part(c) {
                self.token_value.push(c);
                self.pos += c.len_utf8();
            } else if c == '\\' && self.peek_at(1) == Some('u') {
                self.pos += 2;
                match self.scan_unicode_escape() {
                    Some(decoded) => self.token_value.push(decoded),
                    None => break,
                }
            } else {
                break;
            }
        }
    }

    fn scan_number(&mut self) {
        let start = self.pos;
        let radix_prefix = self.peek() == Some('0')
            && matches!(
                self.peek_at(1),
                Some('x' | 'X' | 'b' | 'B' | 'o' | 'O')
            );
        if radix_prefix {
            self.pos += 2;
            while let Some(c) = self.peek() {
                if c.is_ascii_hexdigit() || c == '_' {
                    self.pos += 1;
                } else {
                    break;
                }
            }
        } else {
            self.eat_digits();
            if self.peek() == Some('.') {
                self.pos += 1;
                self.eat_digits();
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                let save = self.pos;
                self.pos += 1;
                if matches!(self.peek(), Some('+' | '-')) {
                    self.pos += 1;
                }
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.eat_digits();
                } else {
                    self.pos = save;
                }
            }
        }
        if self.peek() == Some('n') {
            self.pos += 1;
        }
        self.token_value = self.text[start..self.pos].to_string();
    }

    fn eat_digits(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn scan_string(&mut self, quote: char) {
        let start = self.pos;
        self.pos += 1;
        loop {
            let Some(c) = self.peek() else {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(start, diagnostic_messages::UNTERMINATED_STRING_LITERAL, None);
                return;
            };
            if c == quote {
                self.pos += 1;
                return;
            }
            if is_line_break(c) {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(start, diagnostic_messages::UNTERMINATED_STRING_LITERAL, None);
                return;
            }
            if c == '\\' {
                self.pos += 1;
                self.scan_escape();
                continue;
            }
            self.token_value.push(c);
            self.pos += c.len_utf8();
        }
    }

    /// Scan template characters after a backtick (`head == true`) or after the
    /// `}` closing a substitution.
    fn scan_template(&mut self, head: bool) -> SyntaxKind {
        let start = self.token_start;
        loop {
            let Some(c) = self.peek() else {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(start, diagnostic_messages::UNTERMINATED_TEMPLATE_LITERAL, None);
                return if head {
                    SyntaxKind::NoSubstitutionTemplateLiteral
                } else {
                    SyntaxKind::TemplateTail
                };
            };
            match c {
                '`' => {
                    self.pos += 1;
                    return if head {
                        SyntaxKind::NoSubstitutionTemplateLiteral
                    } else {
                        SyntaxKind::TemplateTail
                    };
                }
                '$' if self.peek_at(1) == Some('{') => {
                    self.pos += 2;
                    return if head {
                        SyntaxKind::TemplateHead
                    } else {
                        SyntaxKind::TemplateMiddle
                    };
                }
                '\\' => {
                    self.pos += 1;
                    self.scan_escape();
                }
                _ => {
                    self.token_value.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
    }

    fn scan_escape(&mut self) {
        let Some(c) = self.peek() else {
            return;
        };
        self.pos += c.len_utf8();
        match c {
            'n' => self.token_value.push('\n'),
            't' => self.token_value.push('\t'),
            'r' => self.token_value.push('\r'),
            'b' => self.token_value.push('\u{8}'),
            'f' => self.token_value.push('\u{c}'),
            'v' => self.token_value.push('\u{b}'),
            '0' => self.token_value.push('\0'),
            'x' => {
                let digits: String = self.text[self.pos..].chars().take(2).collect();
                match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if digits.len() == 2 => {
                        self.pos += 2;
                        self.token_value.push(decoded);
                    }
                    _ => self.token_value.push('x'),
                }
            }
            'u' => {
                if let Some(decoded) = self.scan_unicode_escape() {
                    self.token_value.push(decoded);
                }
            }
            '\r' => {
                if self.peek() == Some('\n') {
                    self.pos += 1;
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => self.token_value.push(other),
        }
    }

    /// Decode the part of a `\u` escape after the `u`.
    fn scan_unicode_escape(&mut self) -> Option<char> {
        if self.peek() == Some('{') {
            let close = self.text[self.pos..].find('}')?;
            let digits = &self.text[self.pos + 1..self.pos + close];
            let decoded = u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)?;
            self.pos += close + 1;
            return Some(decoded);
        }
        let digits = self.text.get(self.pos..self.pos + 4)?;
        let decoded = u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)?;
        self.pos += 4;
        Some(decoded)
    }

    /// Combine a `>` token with the characters that follow it.
    pub fn re_scan_greater_token(&mut self) -> SyntaxKind {
        if self.token != SyntaxKind::GreaterThanToken {
            return self.token;
        }
        let rest = &self.text[self.pos..];
        let (len, kind) = if rest.starts_with(">>=") {
            (3, SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken)
        } else if rest.starts_with(">>") {
            (2, SyntaxKind::GreaterThanGreaterThanGreaterThanToken)
        } else if rest.starts_with(">=") {
            (2, SyntaxKind::GreaterThanGreaterThanEqualsToken)
        } else if rest.starts_with('>') {
            (1, SyntaxKind::GreaterThanGreaterThanToken)
        } else if rest.starts_with('=') {
            (1, SyntaxKind::GreaterThanEqualsToken)
        } else {
            (0, SyntaxKind::GreaterThanToken)
        };
        self.pos += len;
        self.token = kind;
        kind
    }

    /// Continue a template literal from the `}` closing a substitution.
    pub fn re_scan_template_token(&mut self) -> SyntaxKind {
        if self.token != SyntaxKind::CloseBraceToken {
            return self.token;
        }
        self.pos = self.token_start + 1;
        self.token_value.clear();
        self.token = self.scan_template(false);
        self.token
    }
}
