use super::Printer;
use tsr_parser::{Node, NodeIndex, NodeList};
use tsr_scanner::SyntaxKind;

impl<'a> Printer<'a> {
    // =========================================================================
    // Expressions
    // =========================================================================

    pub(super) fn emit_template(&mut self, head: &str, spans: &NodeList) {
        self.write("`");
        self.write(head);
        for &span in spans {
            if let Some(Node::TemplateSpan {
                expression,
                literal,
                ..
            }) = self.arena.get(span)
            {
                self.write("${");
                self.emit(*expression);
                self.write("}");
                self.write(literal);
            }
        }
        self.write("`");
    }

    pub(super) fn emit_object_literal(&mut self, properties: &NodeList) {
        if properties.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{ ");
        self.emit_comma_list(properties);
        self.write(" }");
    }

    pub(super) fn emit_prefix_unary(&mut self, operator: SyntaxKind, operand: NodeIndex) {
        self.write_token(operator);
        match operator {
            SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::DeleteKeyword
            | SyntaxKind::AwaitKeyword => self.write(" "),
            SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken => {
                // `- -x` and `+ ++x` must not fuse into one token
                if let Some(Node::PrefixUnary {
                    operator: inner, ..
                }) = self.arena.get(operand)
                    && same_sign(operator, *inner)
                {
                    self.write(" ");
                }
            }
            _ => {}
        }
        self.emit(operand);
    }

    pub(super) fn emit_binary(&mut self, left: NodeIndex, operator: SyntaxKind, right: NodeIndex) {
        self.emit(left);
        if operator == SyntaxKind::CommaToken {
            self.write(", ");
        } else {
            self.write(" ");
            self.write_token(operator);
            self.write(" ");
        }
        self.emit(right);
    }
}

fn same_sign(outer: SyntaxKind, inner: SyntaxKind) -> bool {
    let is_plus = |kind: SyntaxKind| matches!(kind, SyntaxKind::PlusToken | SyntaxKind::PlusPlusToken);
    let is_minus = |kind: SyntaxKind| matches!(kind, SyntaxKind::MinusToken | SyntaxKind::MinusMinusToken);
    (is_plus(outer) && is_plus(inner)) || (is_minus(outer) && is_minus(inner))
}
