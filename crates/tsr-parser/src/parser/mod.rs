//! Recursive-descent parser.
//!
//! `ParserState` pulls tokens from a `ScannerState` and appends nodes to a
//! `NodeArena`. Parse errors become diagnostics; the parser always produces a
//! tree. Look-ahead uses scanner snapshots, and speculative parses
//! (`try_parse`) roll back the arena and the diagnostics on failure.

mod state_expressions;
mod state_statements;
mod state_types;

use crate::arena::NodeArena;
use crate::base::NodeIndex;
use crate::node::Node;
use tsr_common::diagnostics::diagnostic_messages;
use tsr_common::{Diagnostic, DiagnosticMessage};
use tsr_scanner::{ScannerState, SyntaxKind, token_is_contextual_keyword, token_to_text};

/// Output of parsing one file.
#[derive(Clone, Debug)]
pub struct ParseResult {
    pub file_name: String,
    pub text: String,
    pub arena: NodeArena,
    pub root: NodeIndex,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse `text` as a source file named `file_name`.
pub fn parse_source(file_name: &str, text: &str) -> ParseResult {
    let mut parser = ParserState::new(file_name.to_string(), text.to_string());
    let root = parser.parse_source_file();
    parser.into_result(root)
}

pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub(crate) arena: NodeArena,
    pub(crate) file_name: String,
    pub(crate) parse_diagnostics: Vec<Diagnostic>,
    /// End of the most recently consumed token.
    prev_token_end: u32,
    speculation_depth: u32,
    speculation_failed: bool,
    /// Set while parsing a `for (...)` head, where `in` ends an expression.
    pub(crate) disallow_in: bool,
}

impl ParserState {
    pub fn new(file_name: String, source_text: String) -> ParserState {
        let mut scanner = ScannerState::new(source_text);
        scanner.scan();
        ParserState {
            scanner,
            arena: NodeArena::new(),
            file_name,
            parse_diagnostics: Vec::new(),
            prev_token_end: 0,
            speculation_depth: 0,
            speculation_failed: false,
            disallow_in: false,
        }
    }

    pub fn get_arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn get_diagnostics(&self) -> &[Diagnostic] {
        &self.parse_diagnostics
    }

    pub fn into_result(mut self, root: NodeIndex) -> ParseResult {
        self.collect_scanner_diagnostics();
        self.parse_diagnostics.sort_by_key(|d| d.start);
        ParseResult {
            file_name: self.file_name,
            arena: self.arena,
            root,
            diagnostics: self.parse_diagnostics,
            text: self.scanner.into_text(),
        }
    }

    fn collect_scanner_diagnostics(&mut self) {
        for diag in self.scanner.take_diagnostics() {
            let args: Vec<&str> = diag.arg.into_iter().collect();
            self.parse_diagnostics.push(Diagnostic::from_message(
                self.file_name.clone(),
                diag.start,
                diag.length,
                &diag.message,
                &args,
            ));
        }
    }

    /// Parse the whole file into a `SourceFile` node.
    pub fn parse_source_file(&mut self) -> NodeIndex {
        let statements = self.parse_statement_list(|p| p.is_token(SyntaxKind::EndOfFileToken));
        let end = self.scanner.text().len() as u32;
        let root = self.arena.add(Node::SourceFile { statements }, 0, end);
        self.arena.set_parents(root);
        tracing::trace!(file = %self.file_name, nodes = self.arena.len(), "parsed source file");
        root
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.scanner.token() == kind
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.scanner.token_start()
    }

    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.token_end()
    }

    /// End of the last consumed token; the end of the node being built.
    #[inline]
    pub(crate) fn node_end(&self) -> u32 {
        self.prev_token_end
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.prev_token_end = self.scanner.token_end();
        self.scanner.scan()
    }

    pub(crate) fn has_preceding_line_break(&self) -> bool {
        self.scanner.has_preceding_line_break()
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.parse_optional(kind) {
            return true;
        }
        let text = token_to_text(kind).unwrap_or("token");
        self.error_at_current(&diagnostic_messages::TOKEN_EXPECTED, &[text]);
        false
    }

    /// Identifiers and contextual keywords.
    pub(crate) fn is_identifier(&self) -> bool {
        let token = self.token();
        token == SyntaxKind::Identifier || token_is_contextual_keyword(token)
    }

    /// Any identifier or keyword, as allowed after `.` and in property names.
    pub(crate) fn is_identifier_or_keyword(&self) -> bool {
        tsr_scanner::token_is_identifier_or_keyword(self.token())
    }

    pub(crate) fn current_identifier_text(&self) -> String {
        match self.token() {
            SyntaxKind::Identifier => self.scanner.token_value().to_string(),
            _ => self.scanner.token_text().to_string(),
        }
    }

    pub(crate) fn parse_identifier(&mut self) -> NodeIndex {
        if self.is_identifier() {
            return self.parse_identifier_unchecked();
        }
        self.error_at_current(&diagnostic_messages::IDENTIFIER_EXPECTED, &[]);
        self.missing_identifier()
    }

    pub(crate) fn parse_identifier_name(&mut self) -> NodeIndex {
        if self.is_identifier_or_keyword() {
            return self.parse_identifier_unchecked();
        }
        self.error_at_current(&diagnostic_messages::IDENTIFIER_EXPECTED, &[]);
        self.missing_identifier()
    }

    fn parse_identifier_unchecked(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let text = self.current_identifier_text();
        self.next_token();
        self.arena
            .add(Node::Identifier { text }, pos, self.node_end())
    }

    pub(crate) fn missing_identifier(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.arena.add(
            Node::Identifier {
                text: String::new(),
            },
            pos,
            pos,
        )
    }

    pub(crate) fn can_parse_semicolon(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.has_preceding_line_break()
    }

    pub(crate) fn parse_semicolon(&mut self) -> bool {
        if self.parse_optional(SyntaxKind::SemicolonToken) {
            return true;
        }
        if self.can_parse_semicolon() {
            return true;
        }
        self.error_at_current(&diagnostic_messages::TOKEN_EXPECTED, &[";"]);
        false
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub(crate) fn error_at_current(&mut self, message: &DiagnosticMessage, args: &[&str]) {
        let start = self.token_pos();
        let length = self.token_end().saturating_sub(start);
        self.error_at(start, length, message, args);
    }

    pub(crate) fn error_at(
        &mut self,
        start: u32,
        length: u32,
        message: &DiagnosticMessage,
        args: &[&str],
    ) {
        if self.speculation_depth > 0 {
            self.speculation_failed = true;
            return;
        }
        // One error per position keeps cascades out of the output.
        if self
            .parse_diagnostics
            .last()
            .is_some_and(|last| last.start == start)
        {
            return;
        }
        self.parse_diagnostics.push(Diagnostic::from_message(
            self.file_name.clone(),
            start,
            length,
            message,
            args,
        ));
    }

    // =========================================================================
    // Look-ahead and speculation
    // =========================================================================

    /// Run `f` and rewind the scanner afterwards, whatever it consumed.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut ParserState) -> T) -> T {
        let snapshot = self.scanner.save_state();
        let prev_end = self.prev_token_end;
        let result = f(self);
        self.scanner.restore_state(snapshot);
        self.prev_token_end = prev_end;
        result
    }

    /// Run `f` speculatively. Any parse error, or a `None` result, rolls back
    /// the scanner, the arena and the diagnostics.
    pub(crate) fn try_parse<T>(
        &mut self,
        f: impl FnOnce(&mut ParserState) -> Option<T>,
    ) -> Option<T> {
        let snapshot = self.scanner.save_state();
        let prev_end = self.prev_token_end;
        let arena_len = self.arena.len();
        let diagnostics_len = self.parse_diagnostics.len();
        let outer_failed = self.speculation_failed;

        self.speculation_depth += 1;
        self.speculation_failed = false;
        let result = f(self);
        let failed = self.speculation_failed;
        self.speculation_depth -= 1;
        self.speculation_failed = outer_failed;

        match result {
            Some(value) if !failed => Some(value),
            _ => {
                self.scanner.restore_state(snapshot);
                self.prev_token_end = prev_end;
                self.arena.truncate(arena_len);
                self.parse_diagnostics.truncate(diagnostics_len);
                None
            }
        }
    }

    /// Peek at the token after the current one.
    pub(crate) fn next_token_is(&mut self, kind: SyntaxKind) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            p.is_token(kind)
        })
    }

    /// The next token is on the same line and satisfies `pred`.
    pub(crate) fn next_token_on_same_line(
        &mut self,
        pred: impl FnOnce(&ParserState) -> bool,
    ) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            !p.has_preceding_line_break() && pred(p)
        })
    }
}
