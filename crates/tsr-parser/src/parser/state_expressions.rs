//! Expressions: precedence climbing for binary operators, arrow-function
//! detection by speculative parse, templates and optional chaining.

use super::ParserState;
use crate::base::{NodeIndex, NodeList};
use crate::node::{FunctionData, ModifierFlags, Node};
use tsr_common::diagnostics::diagnostic_messages;
use tsr_scanner::{SyntaxKind, binary_operator_precedence, token_is_assignment_operator};

/// Head of an arrow function, parsed speculatively.
struct ArrowHead {
    type_parameters: Option<NodeList>,
    parameters: NodeList,
    type_annotation: NodeIndex,
}

impl ParserState {
    /// Comma expression.
    pub(crate) fn parse_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let mut left = self.parse_assignment_expression();
        while self.parse_optional(SyntaxKind::CommaToken) {
            let right = self.parse_assignment_expression();
            left = self.arena.add(
                Node::Binary {
                    left,
                    operator: SyntaxKind::CommaToken,
                    right,
                },
                pos,
                self.node_end(),
            );
        }
        left
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> NodeIndex {
        if let Some(arrow) = self.try_parse_arrow_function() {
            return arrow;
        }
        let pos = self.token_pos();
        let left = self.parse_conditional_expression();
        self.scanner.re_scan_greater_token();
        let operator = self.token();
        if token_is_assignment_operator(operator) && self.is_left_hand_side(left) {
            self.next_token();
            let right = self.parse_assignment_expression();
            return self.arena.add(
                Node::Binary {
                    left,
                    operator,
                    right,
                },
                pos,
                self.node_end(),
            );
        }
        left
    }

    fn is_left_hand_side(&self, node: NodeIndex) -> bool {
        matches!(
            self.arena.get(node),
            Some(
                Node::Identifier { .. }
                    | Node::PropertyAccess { .. }
                    | Node::ElementAccess { .. }
                    | Node::Parenthesized { .. }
                    | Node::NonNull { .. }
                    | Node::ObjectLiteral { .. }
                    | Node::ArrayLiteral { .. }
                    | Node::ThisExpression
                    | Node::Call { .. }
            )
        )
    }

    fn parse_conditional_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let condition = self.parse_binary_expression(0);
        if !self.parse_optional(SyntaxKind::QuestionToken) {
            return condition;
        }
        let saved_disallow_in = self.disallow_in;
        self.disallow_in = false;
        let when_true = self.parse_assignment_expression();
        self.disallow_in = saved_disallow_in;
        self.parse_expected(SyntaxKind::ColonToken);
        let when_false = self.parse_assignment_expression();
        self.arena.add(
            Node::Conditional {
                condition,
                when_true,
                when_false,
            },
            pos,
            self.node_end(),
        )
    }

    /// Operators binding tighter than `min_precedence`.
    fn parse_binary_expression(&mut self, min_precedence: u8) -> NodeIndex {
        let pos = self.token_pos();
        let mut left = self.parse_unary_expression();
        loop {
            self.scanner.re_scan_greater_token();
            let operator = self.token();
            let precedence = binary_operator_precedence(operator);
            if precedence == 0 || precedence <= min_precedence {
                // `**` is right-associative.
                if !(operator == SyntaxKind::AsteriskAsteriskToken && precedence == min_precedence)
                {
                    break;
                }
            }
            if operator == SyntaxKind::InKeyword && self.disallow_in {
                break;
            }
            if operator == SyntaxKind::AsKeyword {
                if self.has_preceding_line_break() {
                    break;
                }
                self.next_token();
                let type_node = if self.is_token(SyntaxKind::ConstKeyword) {
                    let const_pos = self.token_pos();
                    self.next_token();
                    let type_name = self.arena.add(
                        Node::Identifier {
                            text: "const".to_string(),
                        },
                        const_pos,
                        self.node_end(),
                    );
                    self.arena.add(
                        Node::TypeReference {
                            type_name,
                            type_arguments: None,
                        },
                        const_pos,
                        self.node_end(),
                    )
                } else {
                    self.parse_type()
                };
                left = self.arena.add(
                    Node::As {
                        expression: left,
                        type_node,
                    },
                    pos,
                    self.node_end(),
                );
                continue;
            }
            self.next_token();
            let right = self.parse_binary_expression(precedence);
            left = self.arena.add(
                Node::Binary {
                    left,
                    operator,
                    right,
                },
                pos,
                self.node_end(),
            );
        }
        left
    }

    fn parse_unary_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::ExclamationToken
            | SyntaxKind::TildeToken
            | SyntaxKind::MinusToken
            | SyntaxKind::PlusToken
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::DeleteKeyword => {
                let operator = self.token();
                self.next_token();
                let operand = self.parse_unary_expression();
                self.arena.add(
                    Node::PrefixUnary { operator, operand },
                    pos,
                    self.node_end(),
                )
            }
            SyntaxKind::AwaitKeyword if self.next_token_on_same_line(ParserState::is_start_of_expression) => {
                self.next_token();
                let operand = self.parse_unary_expression();
                self.arena.add(
                    Node::PrefixUnary {
                        operator: SyntaxKind::AwaitKeyword,
                        operand,
                    },
                    pos,
                    self.node_end(),
                )
            }
            SyntaxKind::LessThanToken => {
                // Angle-bracket assertions are not supported; `as` is.
                self.error_at_current(&diagnostic_messages::EXPRESSION_EXPECTED, &[]);
                self.next_token();
                self.parse_unary_expression()
            }
            _ => {
                let operand = self.parse_left_hand_side_expression();
                if matches!(
                    self.token(),
                    SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken
                ) && !self.has_preceding_line_break()
                {
                    let operator = self.token();
                    self.next_token();
                    return self.arena.add(
                        Node::PostfixUnary { operator, operand },
                        pos,
                        self.node_end(),
                    );
                }
                operand
            }
        }
    }

    pub(crate) fn is_start_of_expression(&self) -> bool {
        if self.is_identifier() {
            return true;
        }
        matches!(
            self.token(),
            SyntaxKind::NumericLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::NoSubstitutionTemplateLiteral
                | SyntaxKind::TemplateHead
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken
                | SyntaxKind::FunctionKeyword
                | SyntaxKind::ClassKeyword
                | SyntaxKind::NewKeyword
                | SyntaxKind::ThisKeyword
                | SyntaxKind::SuperKeyword
                | SyntaxKind::NullKeyword
                | SyntaxKind::TrueKeyword
                | SyntaxKind::FalseKeyword
                | SyntaxKind::PlusToken
                | SyntaxKind::MinusToken
                | SyntaxKind::TildeToken
                | SyntaxKind::ExclamationToken
                | SyntaxKind::PlusPlusToken
                | SyntaxKind::MinusMinusToken
                | SyntaxKind::TypeOfKeyword
                | SyntaxKind::VoidKeyword
                | SyntaxKind::DeleteKeyword
                | SyntaxKind::LessThanToken
        )
    }

    fn parse_left_hand_side_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let expression = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        self.parse_call_and_member_rest(pos, expression, true)
    }

    fn parse_call_and_member_rest(
        &mut self,
        pos: u32,
        mut expression: NodeIndex,
        allow_calls: bool,
    ) -> NodeIndex {
        loop {
            match self.token() {
                SyntaxKind::DotToken => {
                    self.next_token();
                    let name = self.parse_identifier_name();
                    expression = self.arena.add(
                        Node::PropertyAccess {
                            expression,
                            question_dot: false,
                            name,
                        },
                        pos,
                        self.node_end(),
                    );
                }
                SyntaxKind::QuestionDotToken if allow_calls => {
                    self.next_token();
                    expression = match self.token() {
                        SyntaxKind::OpenParenToken => {
                            let arguments = self.parse_arguments();
                            self.arena.add(
                                Node::Call {
                                    expression,
                                    question_dot: true,
                                    type_arguments: None,
                                    arguments,
                                },
                                pos,
                                self.node_end(),
                            )
                        }
                        SyntaxKind::OpenBracketToken => {
                            self.next_token();
                            let argument = self.parse_expression();
                            self.parse_expected(SyntaxKind::CloseBracketToken);
                            self.arena.add(
                                Node::ElementAccess {
                                    expression,
                                    question_dot: true,
                                    argument,
                                },
                                pos,
                                self.node_end(),
                            )
                        }
                        _ => {
                            let name = self.parse_identifier_name();
                            self.arena.add(
                                Node::PropertyAccess {
                                    expression,
                                    question_dot: true,
                                    name,
                                },
                                pos,
                                self.node_end(),
                            )
                        }
                    };
                }
                SyntaxKind::OpenBracketToken => {
                    self.next_token();
                    let saved_disallow_in = self.disallow_in;
                    self.disallow_in = false;
                    let argument = self.parse_expression();
                    self.disallow_in = saved_disallow_in;
                    self.parse_expected(SyntaxKind::CloseBracketToken);
                    expression = self.arena.add(
                        Node::ElementAccess {
                            expression,
                            question_dot: false,
                            argument,
                        },
                        pos,
                        self.node_end(),
                    );
                }
                SyntaxKind::ExclamationToken if !self.has_preceding_line_break() => {
                    self.next_token();
                    expression = self
                        .arena
                        .add(Node::NonNull { expression }, pos, self.node_end());
                }
                SyntaxKind::OpenParenToken if allow_calls => {
                    let arguments = self.parse_arguments();
                    expression = self.arena.add(
                        Node::Call {
                            expression,
                            question_dot: false,
                            type_arguments: None,
                            arguments,
                        },
                        pos,
                        self.node_end(),
                    );
                }
                SyntaxKind::LessThanToken if allow_calls => {
                    let Some(type_arguments) = self.try_parse(|p| {
                        let args = p.parse_type_arguments();
                        p.is_token(SyntaxKind::OpenParenToken).then_some(args)
                    }) else {
                        break;
                    };
                    let arguments = self.parse_arguments();
                    expression = self.arena.add(
                        Node::Call {
                            expression,
                            question_dot: false,
                            type_arguments: Some(type_arguments),
                            arguments,
                        },
                        pos,
                        self.node_end(),
                    );
                }
                _ => break,
            }
        }
        expression
    }

    fn parse_arguments(&mut self) -> NodeList {
        let mut arguments = NodeList::new();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let saved_disallow_in = self.disallow_in;
        self.disallow_in = false;
        while !self.is_token(SyntaxKind::CloseParenToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            arguments.push(self.parse_spread_or_assignment());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.disallow_in = saved_disallow_in;
        self.parse_expected(SyntaxKind::CloseParenToken);
        arguments
    }

    fn parse_spread_or_assignment(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        if self.parse_optional(SyntaxKind::DotDotDotToken) {
            let expression = self.parse_assignment_expression();
            return self
                .arena
                .add(Node::SpreadElement { expression }, pos, self.node_end());
        }
        self.parse_assignment_expression()
    }

    fn parse_new_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::NewKeyword);
        let callee_pos = self.token_pos();
        let callee = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        let expression = self.parse_call_and_member_rest(callee_pos, callee, false);
        let type_arguments = if self.is_token(SyntaxKind::LessThanToken) {
            self.try_parse(|p| Some(p.parse_type_arguments()))
        } else {
            None
        };
        let arguments = if self.is_token(SyntaxKind::OpenParenToken) {
            Some(self.parse_arguments())
        } else {
            None
        };
        self.arena.add(
            Node::New {
                expression,
                type_arguments,
                arguments,
            },
            pos,
            self.node_end(),
        )
    }

    fn parse_primary_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::NumericLiteral => {
                let text = self.scanner.token_text().to_string();
                self.next_token();
                self.arena
                    .add(Node::NumericLiteral { text }, pos, self.node_end())
            }
            SyntaxKind::StringLiteral => {
                let text = self.scanner.token_value().to_string();
                self.next_token();
                self.arena
                    .add(Node::StringLiteral { text }, pos, self.node_end())
            }
            SyntaxKind::NoSubstitutionTemplateLiteral => {
                let raw = template_raw(self.scanner.token_text(), 1, 1);
                self.next_token();
                self.arena
                    .add(Node::NoSubstitutionTemplate { raw }, pos, self.node_end())
            }
            SyntaxKind::TemplateHead => self.parse_template_expression(),
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                let value = self.is_token(SyntaxKind::TrueKeyword);
                self.next_token();
                self.arena
                    .add(Node::BooleanLiteral { value }, pos, self.node_end())
            }
            SyntaxKind::NullKeyword => {
                self.next_token();
                self.arena.add(Node::NullLiteral, pos, self.node_end())
            }
            SyntaxKind::ThisKeyword => {
                self.next_token();
                self.arena.add(Node::ThisExpression, pos, self.node_end())
            }
            SyntaxKind::SuperKeyword => {
                self.next_token();
                self.arena.add(Node::SuperExpression, pos, self.node_end())
            }
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let saved_disallow_in = self.disallow_in;
                self.disallow_in = false;
                let expression = self.parse_expression();
                self.disallow_in = saved_disallow_in;
                self.parse_expected(SyntaxKind::CloseParenToken);
                self.arena
                    .add(Node::Parenthesized { expression }, pos, self.node_end())
            }
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::FunctionKeyword => self.parse_function_expression(ModifierFlags::empty()),
            SyntaxKind::AsyncKeyword
                if self.next_token_on_same_line(|p| p.is_token(SyntaxKind::FunctionKeyword)) =>
            {
                self.next_token();
                self.parse_function_expression(ModifierFlags::ASYNC)
            }
            _ if self.is_identifier() => self.parse_identifier(),
            _ => {
                self.error_at_current(&diagnostic_messages::EXPRESSION_EXPECTED, &[]);
                self.missing_identifier()
            }
        }
    }

    fn parse_template_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let head = template_raw(self.scanner.token_text(), 1, 2);
        self.next_token();
        let mut spans = NodeList::new();
        loop {
            let span_pos = self.token_pos();
            let expression = self.parse_expression();
            if !self.is_token(SyntaxKind::CloseBraceToken) {
                self.error_at_current(&diagnostic_messages::TOKEN_EXPECTED, &["}"]);
                break;
            }
            let token = self.scanner.re_scan_template_token();
            let tail = token == SyntaxKind::TemplateTail;
            let literal = if tail {
                template_raw(self.scanner.token_text(), 1, 1)
            } else {
                template_raw(self.scanner.token_text(), 1, 2)
            };
            self.next_token();
            spans.push(self.arena.add(
                Node::TemplateSpan {
                    expression,
                    literal,
                    tail,
                },
                span_pos,
                self.node_end(),
            ));
            if tail {
                break;
            }
        }
        self.arena.add(
            Node::TemplateExpression { head, spans },
            pos,
            self.node_end(),
        )
    }

    fn parse_array_literal(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let saved_disallow_in = self.disallow_in;
        self.disallow_in = false;
        let mut elements = NodeList::new();
        while !self.is_token(SyntaxKind::CloseBracketToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.is_token(SyntaxKind::CommaToken) {
                let hole = self.token_pos();
                self.next_token();
                elements.push(self.arena.add(Node::Omitted, hole, hole));
                continue;
            }
            elements.push(self.parse_spread_or_assignment());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.disallow_in = saved_disallow_in;
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.arena
            .add(Node::ArrayLiteral { elements }, pos, self.node_end())
    }

    fn parse_object_literal(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let saved_disallow_in = self.disallow_in;
        self.disallow_in = false;
        let mut properties = NodeList::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            properties.push(self.parse_object_literal_element());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.disallow_in = saved_disallow_in;
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.arena
            .add(Node::ObjectLiteral { properties }, pos, self.node_end())
    }

    fn parse_object_literal_element(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        if self.parse_optional(SyntaxKind::DotDotDotToken) {
            let expression = self.parse_assignment_expression();
            return self
                .arena
                .add(Node::SpreadElement { expression }, pos, self.node_end());
        }

        if matches!(self.token(), SyntaxKind::GetKeyword | SyntaxKind::SetKeyword)
            && self.next_token_on_same_line(ParserState::is_start_of_property_name)
        {
            let is_get = self.is_token(SyntaxKind::GetKeyword);
            self.next_token();
            let name = self.parse_property_name();
            let data = self.parse_function_rest(ModifierFlags::empty(), false, name);
            let node = if is_get {
                Node::GetAccessor(data)
            } else {
                Node::SetAccessor(data)
            };
            return self.arena.add(node, pos, self.node_end());
        }

        let mut modifiers = ModifierFlags::empty();
        if self.is_token(SyntaxKind::AsyncKeyword)
            && self.next_token_on_same_line(|p| {
                p.is_start_of_property_name() || p.is_token(SyntaxKind::AsteriskToken)
            })
        {
            modifiers |= ModifierFlags::ASYNC;
            self.next_token();
        }
        let asterisk = self.parse_optional(SyntaxKind::AsteriskToken);
        let is_identifier_name = self.is_identifier();
        let name = self.parse_property_name();

        if asterisk
            || !modifiers.is_empty()
            || self.is_token(SyntaxKind::OpenParenToken)
            || self.is_token(SyntaxKind::LessThanToken)
        {
            let data = self.parse_function_rest(modifiers, asterisk, name);
            return self
                .arena
                .add(Node::MethodDeclaration(data), pos, self.node_end());
        }
        if self.parse_optional(SyntaxKind::ColonToken) {
            let initializer = self.parse_assignment_expression();
            return self.arena.add(
                Node::PropertyAssignment { name, initializer },
                pos,
                self.node_end(),
            );
        }
        if !is_identifier_name {
            self.parse_expected(SyntaxKind::ColonToken);
        }
        self.arena.add(
            Node::ShorthandPropertyAssignment { name },
            pos,
            self.node_end(),
        )
    }

    fn parse_function_expression(&mut self, modifiers: ModifierFlags) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::FunctionKeyword);
        let asterisk = self.parse_optional(SyntaxKind::AsteriskToken);
        let name = if self.is_identifier() {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        let data = self.parse_function_rest(modifiers, asterisk, name);
        if data.body.is_none() {
            self.error_at_current(&diagnostic_messages::TOKEN_EXPECTED, &["{"]);
        }
        self.arena
            .add(Node::FunctionExpression(data), pos, self.node_end())
    }

    // =========================================================================
    // Arrow functions
    // =========================================================================

    /// Parse an arrow function if one starts here. Only the head is parsed
    /// speculatively; the body is committed once `=>` has been seen.
    fn try_parse_arrow_function(&mut self) -> Option<NodeIndex> {
        let pos = self.token_pos();
        let is_async = self.is_token(SyntaxKind::AsyncKeyword)
            && self.next_token_on_same_line(|p| {
                p.is_identifier()
                    || p.is_token(SyntaxKind::OpenParenToken)
                    || p.is_token(SyntaxKind::LessThanToken)
            });

        let head = self.try_parse(|p| {
            if is_async {
                p.next_token();
            }
            p.parse_arrow_head()
        })?;

        let modifiers = if is_async {
            ModifierFlags::ASYNC
        } else {
            ModifierFlags::empty()
        };
        let body = if self.is_token(SyntaxKind::OpenBraceToken) {
            self.parse_block()
        } else {
            self.parse_assignment_expression()
        };
        Some(self.arena.add(
            Node::ArrowFunction(FunctionData {
                modifiers,
                asterisk: false,
                question: false,
                name: NodeIndex::NONE,
                type_parameters: head.type_parameters,
                parameters: head.parameters,
                type_annotation: head.type_annotation,
                body,
            }),
            pos,
            self.node_end(),
        ))
    }

    fn parse_arrow_head(&mut self) -> Option<ArrowHead> {
        // `x => ...`
        if self.is_identifier() {
            let param_pos = self.token_pos();
            let name = self.parse_identifier();
            if !self.is_token(SyntaxKind::EqualsGreaterThanToken) || self.has_preceding_line_break()
            {
                return None;
            }
            self.next_token();
            let parameter = self.arena.add(
                Node::Parameter {
                    modifiers: ModifierFlags::empty(),
                    dot_dot_dot: false,
                    name,
                    question: false,
                    type_annotation: NodeIndex::NONE,
                    initializer: NodeIndex::NONE,
                },
                param_pos,
                self.node_end(),
            );
            return Some(ArrowHead {
                type_parameters: None,
                parameters: NodeList::from_vec(vec![parameter]),
                type_annotation: NodeIndex::NONE,
            });
        }

        if !self.is_token(SyntaxKind::OpenParenToken) && !self.is_token(SyntaxKind::LessThanToken) {
            return None;
        }
        let type_parameters = self.parse_type_parameters();
        if !self.is_token(SyntaxKind::OpenParenToken) {
            return None;
        }
        let parameters = self.parse_parameters();
        let type_annotation = self.parse_type_annotation();
        if !self.is_token(SyntaxKind::EqualsGreaterThanToken) || self.has_preceding_line_break() {
            return None;
        }
        self.next_token();
        Some(ArrowHead {
            type_parameters,
            parameters,
            type_annotation,
        })
    }
}

/// Raw text of a template token without its delimiters.
fn template_raw(token_text: &str, open: usize, close: usize) -> String {
    let inner = token_text.get(open..).unwrap_or("");
    let inner = match (close, inner) {
        (1, text) => text.strip_suffix('`').unwrap_or(text),
        (_, text) => text.strip_suffix("${").unwrap_or(text),
    };
    inner.to_string()
}
