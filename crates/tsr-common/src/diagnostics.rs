use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const UNTERMINATED_STRING_LITERAL: u32 = 1002;
    pub const IDENTIFIER_EXPECTED: u32 = 1003;
    pub const TOKEN_EXPECTED: u32 = 1005;
    pub const EXPRESSION_EXPECTED: u32 = 1109;
    pub const TYPE_EXPECTED: u32 = 1110;
    pub const INVALID_CHARACTER: u32 = 1127;
    pub const DECLARATION_OR_STATEMENT_EXPECTED: u32 = 1128;
    pub const UNTERMINATED_TEMPLATE_LITERAL: u32 = 1160;
    pub const CANNOT_FIND_NAME: u32 = 2304;
    pub const CANNOT_FIND_MODULE: u32 = 2307;
    pub const CANNOT_REDECLARE_BLOCK_SCOPED_VARIABLE: u32 = 2451;
    pub const CANNOT_WRITE_FILE_OVERWRITE_INPUT: u32 = 5055;
    pub const ARGUMENT_FOR_OPTION_MUST_BE: u32 = 6046;
    pub const FILE_NOT_FOUND: u32 = 6053;
}

pub mod diagnostic_messages {
    use super::{DiagnosticCategory, DiagnosticMessage, diagnostic_codes as codes};

    const fn error(code: u32, message: &'static str) -> DiagnosticMessage {
        DiagnosticMessage {
            code,
            category: DiagnosticCategory::Error,
            message,
        }
    }

    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage =
        error(codes::UNTERMINATED_STRING_LITERAL, "Unterminated string literal.");
    pub const IDENTIFIER_EXPECTED: DiagnosticMessage =
        error(codes::IDENTIFIER_EXPECTED, "Identifier expected.");
    pub const TOKEN_EXPECTED: DiagnosticMessage = error(codes::TOKEN_EXPECTED, "'{0}' expected.");
    pub const EXPRESSION_EXPECTED: DiagnosticMessage =
        error(codes::EXPRESSION_EXPECTED, "Expression expected.");
    pub const TYPE_EXPECTED: DiagnosticMessage = error(codes::TYPE_EXPECTED, "Type expected.");
    pub const INVALID_CHARACTER: DiagnosticMessage =
        error(codes::INVALID_CHARACTER, "Invalid character.");
    pub const DECLARATION_OR_STATEMENT_EXPECTED: DiagnosticMessage = error(
        codes::DECLARATION_OR_STATEMENT_EXPECTED,
        "Declaration or statement expected.",
    );
    pub const UNTERMINATED_TEMPLATE_LITERAL: DiagnosticMessage = error(
        codes::UNTERMINATED_TEMPLATE_LITERAL,
        "Unterminated template literal.",
    );
    pub const CANNOT_FIND_NAME: DiagnosticMessage =
        error(codes::CANNOT_FIND_NAME, "Cannot find name '{0}'.");
    pub const CANNOT_FIND_MODULE: DiagnosticMessage =
        error(codes::CANNOT_FIND_MODULE, "Cannot find module '{0}'.");
    pub const CANNOT_REDECLARE_BLOCK_SCOPED_VARIABLE: DiagnosticMessage = error(
        codes::CANNOT_REDECLARE_BLOCK_SCOPED_VARIABLE,
        "Cannot redeclare block-scoped variable '{0}'.",
    );
    pub const CANNOT_WRITE_FILE_OVERWRITE_INPUT: DiagnosticMessage = error(
        codes::CANNOT_WRITE_FILE_OVERWRITE_INPUT,
        "Cannot write file '{0}' because it would overwrite input file.",
    );
    pub const ARGUMENT_FOR_OPTION_MUST_BE: DiagnosticMessage = error(
        codes::ARGUMENT_FOR_OPTION_MUST_BE,
        "Argument for '{0}' option must be: {1}.",
    );
    pub const FILE_NOT_FOUND: DiagnosticMessage =
        error(codes::FILE_NOT_FOUND, "File '{0}' not found.");
}

const DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    diagnostic_messages::UNTERMINATED_STRING_LITERAL,
    diagnostic_messages::IDENTIFIER_EXPECTED,
    diagnostic_messages::TOKEN_EXPECTED,
    diagnostic_messages::EXPRESSION_EXPECTED,
    diagnostic_messages::TYPE_EXPECTED,
    diagnostic_messages::INVALID_CHARACTER,
    diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED,
    diagnostic_messages::UNTERMINATED_TEMPLATE_LITERAL,
    diagnostic_messages::CANNOT_FIND_NAME,
    diagnostic_messages::CANNOT_FIND_MODULE,
    diagnostic_messages::CANNOT_REDECLARE_BLOCK_SCOPED_VARIABLE,
    diagnostic_messages::CANNOT_WRITE_FILE_OVERWRITE_INPUT,
    diagnostic_messages::ARGUMENT_FOR_OPTION_MUST_BE,
    diagnostic_messages::FILE_NOT_FOUND,
];

/// A problem found while loading, analysing or emitting a program.
///
/// Diagnostics are plain data: they are collected and reported, never raised.
/// `file` is empty for option and global diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

impl Diagnostic {
    pub fn error(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            message_text: message.into(),
            code,
            file: file.into(),
            start,
            length,
        }
    }

    /// Build a diagnostic from a message template, substituting `{0}`, `{1}`, ...
    pub fn from_message(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            category: message.category,
            code: message.code,
            file: file.into(),
            start,
            length,
            message_text: format_message(message.message, args),
        }
    }

    /// A diagnostic that is not attached to any source file.
    pub fn global(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self::from_message(String::new(), 0, 0, message, args)
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

pub fn get_message_template(code: u32) -> Option<&'static str> {
    DIAGNOSTIC_MESSAGES
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message_substitutes_positional_args() {
        assert_eq!(
            format_message("Argument for '{0}' option must be: {1}.", &["target", "'es5'"]),
            "Argument for 'target' option must be: 'es5'."
        );
    }

    #[test]
    fn test_message_template_lookup() {
        assert_eq!(get_message_template(2304), Some("Cannot find name '{0}'."));
        assert_eq!(get_message_template(9999), None);
    }

    #[test]
    fn test_from_message_keeps_code_and_category() {
        let diag = Diagnostic::from_message(
            "a.ts",
            4,
            3,
            &diagnostic_messages::CANNOT_FIND_NAME,
            &["foo"],
        );
        assert_eq!(diag.code, 2304);
        assert!(diag.is_error());
        assert_eq!(diag.message_text, "Cannot find name 'foo'.");
    }
}
