//! Type nodes, type parameters and type arguments.

use super::ParserState;
use crate::base::{NodeIndex, NodeList};
use crate::node::Node;
use tsr_common::diagnostics::diagnostic_messages;
use tsr_scanner::SyntaxKind;

impl ParserState {
    pub(crate) fn parse_type(&mut self) -> NodeIndex {
        if self.is_start_of_function_type() {
            if let Some(function_type) = self.try_parse(ParserState::parse_function_type) {
                return function_type;
            }
        }
        self.parse_union_type()
    }

    fn is_start_of_function_type(&mut self) -> bool {
        if self.is_token(SyntaxKind::LessThanToken) {
            return true;
        }
        self.is_token(SyntaxKind::OpenParenToken)
            && self.look_ahead(|p| {
                p.next_token();
                matches!(
                    p.token(),
                    SyntaxKind::CloseParenToken
                        | SyntaxKind::DotDotDotToken
                        | SyntaxKind::OpenBraceToken
                        | SyntaxKind::OpenBracketToken
                        | SyntaxKind::ThisKeyword
                ) || {
                    if !p.is_identifier() {
                        return false;
                    }
                    p.next_token();
                    matches!(
                        p.token(),
                        SyntaxKind::ColonToken
                            | SyntaxKind::CommaToken
                            | SyntaxKind::QuestionToken
                            | SyntaxKind::EqualsToken
                    ) || (p.is_token(SyntaxKind::CloseParenToken) && {
                        p.next_token();
                        p.is_token(SyntaxKind::EqualsGreaterThanToken)
                    })
                }
            })
    }

    fn parse_function_type(&mut self) -> Option<NodeIndex> {
        let pos = self.token_pos();
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameters();
        if !self.parse_optional(SyntaxKind::EqualsGreaterThanToken) {
            return None;
        }
        let type_annotation = self.parse_type();
        Some(self.arena.add(
            Node::FunctionType {
                type_parameters,
                parameters,
                type_annotation,
            },
            pos,
            self.node_end(),
        ))
    }

    fn parse_union_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        // A leading `|` is allowed and does not force a union.
        self.parse_optional(SyntaxKind::BarToken);
        let first = self.parse_intersection_type();
        if !self.is_token(SyntaxKind::BarToken) {
            return first;
        }
        let mut types = NodeList::from_vec(vec![first]);
        while self.parse_optional(SyntaxKind::BarToken) {
            types.push(self.parse_intersection_type());
        }
        self.arena
            .add(Node::UnionType { types }, pos, self.node_end())
    }

    fn parse_intersection_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_optional(SyntaxKind::AmpersandToken);
        let first = self.parse_type_operator();
        if !self.is_token(SyntaxKind::AmpersandToken) {
            return first;
        }
        let mut types = NodeList::from_vec(vec![first]);
        while self.parse_optional(SyntaxKind::AmpersandToken) {
            types.push(self.parse_type_operator());
        }
        self.arena
            .add(Node::IntersectionType { types }, pos, self.node_end())
    }

    fn parse_type_operator(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::KeyOfKeyword | SyntaxKind::ReadonlyKeyword | SyntaxKind::UniqueKeyword => {
                let operator = self.token();
                self.next_token();
                let type_node = self.parse_type_operator();
                self.arena.add(
                    Node::TypeOperator {
                        operator,
                        type_node,
                    },
                    pos,
                    self.node_end(),
                )
            }
            _ => self.parse_postfix_type(),
        }
    }

    fn parse_postfix_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let mut element_type = self.parse_primary_type();
        while self.is_token(SyntaxKind::OpenBracketToken) && !self.has_preceding_line_break() {
            self.next_token();
            self.parse_expected(SyntaxKind::CloseBracketToken);
            element_type = self
                .arena
                .add(Node::ArrayType { element_type }, pos, self.node_end());
        }
        element_type
    }

    fn parse_primary_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::AnyKeyword
            | SyntaxKind::NumberKeyword
            | SyntaxKind::StringKeyword
            | SyntaxKind::BooleanKeyword
            | SyntaxKind::SymbolKeyword
            | SyntaxKind::NeverKeyword
            | SyntaxKind::UnknownKeyword
            | SyntaxKind::ObjectKeyword
            | SyntaxKind::BigIntKeyword
            | SyntaxKind::UndefinedKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::ThisKeyword
                if !self.next_token_is(SyntaxKind::DotToken) =>
            {
                let keyword = self.token();
                self.next_token();
                self.arena
                    .add(Node::KeywordType { keyword }, pos, self.node_end())
            }
            SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::MinusToken => self.parse_literal_type(),
            SyntaxKind::TypeOfKeyword => {
                self.next_token();
                let expr_name = self.parse_entity_name(false);
                self.arena
                    .add(Node::TypeQuery { expr_name }, pos, self.node_end())
            }
            SyntaxKind::OpenBraceToken => {
                let members = self.parse_type_member_block();
                self.arena
                    .add(Node::TypeLiteral { members }, pos, self.node_end())
            }
            SyntaxKind::OpenBracketToken => {
                self.next_token();
                let mut elements = NodeList::new();
                while !self.is_token(SyntaxKind::CloseBracketToken)
                    && !self.is_token(SyntaxKind::EndOfFileToken)
                {
                    elements.push(self.parse_type());
                    if !self.parse_optional(SyntaxKind::CommaToken) {
                        break;
                    }
                }
                self.parse_expected(SyntaxKind::CloseBracketToken);
                self.arena
                    .add(Node::TupleType { elements }, pos, self.node_end())
            }
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let type_node = self.parse_type();
                self.parse_expected(SyntaxKind::CloseParenToken);
                self.arena
                    .add(Node::ParenthesizedType { type_node }, pos, self.node_end())
            }
            _ if self.is_identifier_or_keyword() => {
                let type_name = self.parse_entity_name(true);
                let type_arguments = if self.is_token(SyntaxKind::LessThanToken)
                    && !self.has_preceding_line_break()
                {
                    Some(self.parse_type_arguments())
                } else {
                    None
                };
                self.arena.add(
                    Node::TypeReference {
                        type_name,
                        type_arguments,
                    },
                    pos,
                    self.node_end(),
                )
            }
            _ => {
                self.error_at_current(&diagnostic_messages::TYPE_EXPECTED, &[]);
                let type_name = self.missing_identifier();
                self.arena.add(
                    Node::TypeReference {
                        type_name,
                        type_arguments: None,
                    },
                    pos,
                    pos,
                )
            }
        }
    }

    fn parse_literal_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let literal = match self.token() {
            SyntaxKind::MinusToken => {
                self.next_token();
                let operand_pos = self.token_pos();
                if !self.is_token(SyntaxKind::NumericLiteral) {
                    self.error_at_current(&diagnostic_messages::TYPE_EXPECTED, &[]);
                }
                let text = self.scanner.token_text().to_string();
                self.next_token();
                let operand = self
                    .arena
                    .add(Node::NumericLiteral { text }, operand_pos, self.node_end());
                self.arena.add(
                    Node::PrefixUnary {
                        operator: SyntaxKind::MinusToken,
                        operand,
                    },
                    pos,
                    self.node_end(),
                )
            }
            SyntaxKind::StringLiteral => {
                let text = self.scanner.token_value().to_string();
                self.next_token();
                self.arena
                    .add(Node::StringLiteral { text }, pos, self.node_end())
            }
            SyntaxKind::NumericLiteral => {
                let text = self.scanner.token_text().to_string();
                self.next_token();
                self.arena
                    .add(Node::NumericLiteral { text }, pos, self.node_end())
            }
            _ => {
                let value = self.is_token(SyntaxKind::TrueKeyword);
                self.next_token();
                self.arena
                    .add(Node::BooleanLiteral { value }, pos, self.node_end())
            }
        };
        self.arena
            .add(Node::LiteralType { literal }, pos, self.node_end())
    }

    /// `A` or `A.B.C`. Reserved words are accepted after a dot, and at the
    /// start only when `allow_reserved` is set.
    fn parse_entity_name(&mut self, allow_reserved: bool) -> NodeIndex {
        let pos = self.token_pos();
        let mut entity = if allow_reserved {
            self.parse_identifier_name()
        } else {
            self.parse_identifier()
        };
        while self.is_token(SyntaxKind::DotToken) {
            self.next_token();
            let right = self.parse_identifier_name();
            entity = self.arena.add(
                Node::QualifiedName {
                    left: entity,
                    right,
                },
                pos,
                self.node_end(),
            );
        }
        entity
    }

    /// `<T, U extends X = Y>`, or `None` when no `<` follows.
    pub(crate) fn parse_type_parameters(&mut self) -> Option<NodeList> {
        if !self.parse_optional(SyntaxKind::LessThanToken) {
            return None;
        }
        let mut parameters = NodeList::new();
        while !self.is_token(SyntaxKind::GreaterThanToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let pos = self.token_pos();
            let name = self.parse_identifier();
            let constraint = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
                self.parse_type()
            } else {
                NodeIndex::NONE
            };
            let default = if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_type()
            } else {
                NodeIndex::NONE
            };
            parameters.push(self.arena.add(
                Node::TypeParameter {
                    name,
                    constraint,
                    default,
                },
                pos,
                self.node_end(),
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::GreaterThanToken);
        Some(parameters)
    }

    pub(crate) fn parse_type_arguments(&mut self) -> NodeList {
        let mut arguments = NodeList::new();
        self.parse_expected(SyntaxKind::LessThanToken);
        while !self.is_token(SyntaxKind::GreaterThanToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            arguments.push(self.parse_type());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::GreaterThanToken);
        arguments
    }
}
