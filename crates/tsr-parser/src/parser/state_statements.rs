//! Statements, declarations and class/interface members.

use super::ParserState;
use crate::base::{NodeIndex, NodeList};
use crate::node::{ClassLikeData, FunctionData, ModifierFlags, Node, SignatureData, VariableKind};
use tsr_common::diagnostics::diagnostic_messages;
use tsr_scanner::SyntaxKind;

impl ParserState {
    /// Parse statements until `is_end` holds, recovering from statements
    /// that fail to consume anything.
    pub(crate) fn parse_statement_list(
        &mut self,
        is_end: impl Fn(&ParserState) -> bool,
    ) -> NodeList {
        let mut statements = NodeList::new();
        while !is_end(self) && !self.is_token(SyntaxKind::EndOfFileToken) {
            let start = self.token_pos();
            let statement = self.parse_statement();
            if statement.is_some() {
                statements.push(statement);
            }
            if self.token_pos() == start && !self.is_token(SyntaxKind::EndOfFileToken) {
                self.error_at_current(&diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED, &[]);
                self.next_token();
            }
        }
        statements
    }

    pub(crate) fn parse_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::SemicolonToken => {
                self.next_token();
                self.arena.add(Node::Empty, pos, self.node_end())
            }
            SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => {
                self.parse_variable_statement(pos, ModifierFlags::empty())
            }
            SyntaxKind::LetKeyword if self.is_let_declaration() => {
                self.parse_variable_statement(pos, ModifierFlags::empty())
            }
            SyntaxKind::FunctionKeyword => {
                self.parse_function_declaration(pos, ModifierFlags::empty())
            }
            SyntaxKind::ClassKeyword => self.parse_class_declaration(pos, ModifierFlags::empty()),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::ReturnKeyword => self.parse_return_statement(),
            SyntaxKind::ThrowKeyword => {
                self.next_token();
                let expression = self.parse_expression();
                self.parse_semicolon();
                self.arena
                    .add(Node::Throw { expression }, pos, self.node_end())
            }
            SyntaxKind::BreakKeyword | SyntaxKind::ContinueKeyword => {
                let is_break = self.is_token(SyntaxKind::BreakKeyword);
                self.next_token();
                let label = if !self.can_parse_semicolon() && self.is_identifier() {
                    self.parse_identifier()
                } else {
                    NodeIndex::NONE
                };
                self.parse_semicolon();
                let node = if is_break {
                    Node::Break { label }
                } else {
                    Node::Continue { label }
                };
                self.arena.add(node, pos, self.node_end())
            }
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::DebuggerKeyword => {
                self.next_token();
                self.parse_semicolon();
                self.arena.add(Node::Debugger, pos, self.node_end())
            }
            SyntaxKind::ImportKeyword
                if !self.next_token_is(SyntaxKind::OpenParenToken)
                    && !self.next_token_is(SyntaxKind::DotToken) =>
            {
                self.parse_import_declaration()
            }
            SyntaxKind::ExportKeyword => self.parse_export(),
            SyntaxKind::EnumKeyword | SyntaxKind::NamespaceKeyword
                if self.next_token_on_same_line(ParserState::is_identifier) =>
            {
                // Unsupported declaration forms: report and skip the keyword.
                self.error_at_current(&diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED, &[]);
                self.next_token();
                NodeIndex::NONE
            }
            _ if self.is_start_of_declaration() => {
                let modifiers = self.parse_declaration_modifiers();
                self.parse_declaration(pos, modifiers)
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_expression_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let expression = self.parse_expression();
        self.parse_semicolon();
        self.arena
            .add(Node::ExpressionStatement { expression }, pos, self.node_end())
    }

    pub(crate) fn parse_block(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let statements = self.parse_statement_list(|p| p.is_token(SyntaxKind::CloseBraceToken));
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.arena
            .add(Node::Block { statements }, pos, self.node_end())
    }

    // =========================================================================
    // Modifiers and declaration starts
    // =========================================================================

    fn is_let_declaration(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            p.is_identifier()
                || p.is_token(SyntaxKind::OpenBraceToken)
                || p.is_token(SyntaxKind::OpenBracketToken)
        })
    }

    /// `declare`, `abstract`, `async`, `interface` and `type` only start a
    /// declaration when followed by the right token on the same line.
    fn is_start_of_declaration(&mut self) -> bool {
        self.look_ahead(|p| loop {
            match p.token() {
                SyntaxKind::VarKeyword
                | SyntaxKind::ConstKeyword
                | SyntaxKind::FunctionKeyword
                | SyntaxKind::ClassKeyword => return true,
                SyntaxKind::LetKeyword => {
                    p.next_token();
                    return p.is_identifier()
                        || p.is_token(SyntaxKind::OpenBraceToken)
                        || p.is_token(SyntaxKind::OpenBracketToken);
                }
                SyntaxKind::InterfaceKeyword | SyntaxKind::TypeKeyword => {
                    p.next_token();
                    return !p.has_preceding_line_break() && p.is_identifier();
                }
                SyntaxKind::DeclareKeyword | SyntaxKind::AbstractKeyword | SyntaxKind::AsyncKeyword => {
                    let is_async = p.is_token(SyntaxKind::AsyncKeyword);
                    p.next_token();
                    if p.has_preceding_line_break() {
                        return false;
                    }
                    if is_async {
                        return p.is_token(SyntaxKind::FunctionKeyword);
                    }
                }
                _ => return false,
            }
        })
    }

    fn parse_declaration_modifiers(&mut self) -> ModifierFlags {
        let mut flags = ModifierFlags::empty();
        while matches!(
            self.token(),
            SyntaxKind::DeclareKeyword | SyntaxKind::AbstractKeyword | SyntaxKind::AsyncKeyword
        ) {
            if let Some(flag) = ModifierFlags::from_token(self.token()) {
                flags |= flag;
            }
            self.next_token();
        }
        flags
    }

    fn parse_declaration(&mut self, pos: u32, mut modifiers: ModifierFlags) -> NodeIndex {
        modifiers |= self.parse_declaration_modifiers();
        match self.token() {
            SyntaxKind::VarKeyword | SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword => {
                self.parse_variable_statement(pos, modifiers)
            }
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(pos, modifiers),
            SyntaxKind::ClassKeyword => self.parse_class_declaration(pos, modifiers),
            SyntaxKind::InterfaceKeyword => self.parse_interface_declaration(pos, modifiers),
            SyntaxKind::TypeKeyword => self.parse_type_alias_declaration(pos, modifiers),
            _ => {
                self.error_at_current(&diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED, &[]);
                NodeIndex::NONE
            }
        }
    }

    // =========================================================================
    // Variables
    // =========================================================================

    fn parse_variable_statement(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeIndex {
        let declaration_list = self.parse_variable_declaration_list();
        self.parse_semicolon();
        self.arena.add(
            Node::VariableStatement {
                modifiers,
                declaration_list,
            },
            pos,
            self.node_end(),
        )
    }

    pub(crate) fn parse_variable_declaration_list(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let kind = match self.token() {
            SyntaxKind::LetKeyword => VariableKind::Let,
            SyntaxKind::ConstKeyword => VariableKind::Const,
            _ => VariableKind::Var,
        };
        self.next_token();
        let mut declarations = NodeList::new();
        loop {
            declarations.push(self.parse_variable_declaration());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.arena.add(
            Node::VariableDeclarationList { kind, declarations },
            pos,
            self.node_end(),
        )
    }

    fn parse_variable_declaration(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let name = self.parse_binding_name();
        // Definite assignment assertion: `let x!: number;`
        if !self.has_preceding_line_break() {
            self.parse_optional(SyntaxKind::ExclamationToken);
        }
        let type_annotation = self.parse_type_annotation();
        let initializer = self.parse_initializer();
        self.arena.add(
            Node::VariableDeclaration {
                name,
                type_annotation,
                initializer,
            },
            pos,
            self.node_end(),
        )
    }

    /// `: Type`, or `NONE` when absent.
    pub(crate) fn parse_type_annotation(&mut self) -> NodeIndex {
        if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        }
    }

    fn parse_initializer(&mut self) -> NodeIndex {
        if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression()
        } else {
            NodeIndex::NONE
        }
    }

    pub(crate) fn parse_binding_name(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_object_binding_pattern(),
            SyntaxKind::OpenBracketToken => self.parse_array_binding_pattern(),
            _ => self.parse_identifier(),
        }
    }

    fn parse_object_binding_pattern(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let mut elements = NodeList::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let element_pos = self.token_pos();
            let dot_dot_dot = self.parse_optional(SyntaxKind::DotDotDotToken);
            let (property_name, name) = if dot_dot_dot {
                (NodeIndex::NONE, self.parse_identifier())
            } else {
                let property = self.parse_property_name();
                if self.parse_optional(SyntaxKind::ColonToken) {
                    (property, self.parse_binding_name())
                } else {
                    (NodeIndex::NONE, property)
                }
            };
            let initializer = self.parse_initializer();
            elements.push(self.arena.add(
                Node::BindingElement {
                    dot_dot_dot,
                    property_name,
                    name,
                    initializer,
                },
                element_pos,
                self.node_end(),
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.arena
            .add(Node::ObjectBindingPattern { elements }, pos, self.node_end())
    }

    fn parse_array_binding_pattern(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let mut elements = NodeList::new();
        while !self.is_token(SyntaxKind::CloseBracketToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let element_pos = self.token_pos();
            if self.is_token(SyntaxKind::CommaToken) {
                self.next_token();
                elements.push(self.arena.add(Node::Omitted, element_pos, element_pos));
                continue;
            }
            let dot_dot_dot = self.parse_optional(SyntaxKind::DotDotDotToken);
            let name = self.parse_binding_name();
            let initializer = self.parse_initializer();
            elements.push(self.arena.add(
                Node::BindingElement {
                    dot_dot_dot,
                    property_name: NodeIndex::NONE,
                    name,
                    initializer,
                },
                element_pos,
                self.node_end(),
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.arena
            .add(Node::ArrayBindingPattern { elements }, pos, self.node_end())
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    fn parse_parenthesized_condition(&mut self) -> NodeIndex {
        self.parse_expected(SyntaxKind::OpenParenToken);
        let condition = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseParenToken);
        condition
    }

    fn parse_if_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let condition = self.parse_parenthesized_condition();
        let then_statement = self.parse_statement();
        let else_statement = if self.parse_optional(SyntaxKind::ElseKeyword) {
            self.parse_statement()
        } else {
            NodeIndex::NONE
        };
        self.arena.add(
            Node::If {
                condition,
                then_statement,
                else_statement,
            },
            pos,
            self.node_end(),
        )
    }

    fn parse_while_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let condition = self.parse_parenthesized_condition();
        let body = self.parse_statement();
        self.arena
            .add(Node::While { condition, body }, pos, self.node_end())
    }

    fn parse_do_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let body = self.parse_statement();
        self.parse_expected(SyntaxKind::WhileKeyword);
        let condition = self.parse_parenthesized_condition();
        self.parse_optional(SyntaxKind::SemicolonToken);
        self.arena
            .add(Node::DoWhile { body, condition }, pos, self.node_end())
    }

    fn parse_for_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        self.parse_expected(SyntaxKind::OpenParenToken);

        let saved_disallow_in = self.disallow_in;
        self.disallow_in = true;
        let initializer = match self.token() {
            SyntaxKind::SemicolonToken => NodeIndex::NONE,
            SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => {
                self.parse_variable_declaration_list()
            }
            SyntaxKind::LetKeyword if self.is_let_declaration() => {
                self.parse_variable_declaration_list()
            }
            _ => self.parse_expression(),
        };
        self.disallow_in = saved_disallow_in;

        if self.parse_optional(SyntaxKind::OfKeyword) {
            let expression = self.parse_assignment_expression();
            self.parse_expected(SyntaxKind::CloseParenToken);
            let body = self.parse_statement();
            return self.arena.add(
                Node::ForOf {
                    initializer,
                    expression,
                    body,
                },
                pos,
                self.node_end(),
            );
        }
        if self.parse_optional(SyntaxKind::InKeyword) {
            let expression = self.parse_expression();
            self.parse_expected(SyntaxKind::CloseParenToken);
            let body = self.parse_statement();
            return self.arena.add(
                Node::ForIn {
                    initializer,
                    expression,
                    body,
                },
                pos,
                self.node_end(),
            );
        }

        self.parse_expected(SyntaxKind::SemicolonToken);
        let condition = if self.is_token(SyntaxKind::SemicolonToken) {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_expected(SyntaxKind::SemicolonToken);
        let incrementor = if self.is_token(SyntaxKind::CloseParenToken) {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_expected(SyntaxKind::CloseParenToken);
        let body = self.parse_statement();
        self.arena.add(
            Node::For {
                initializer,
                condition,
                incrementor,
                body,
            },
            pos,
            self.node_end(),
        )
    }

    fn parse_return_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let expression = if self.can_parse_semicolon() {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_semicolon();
        self.arena
            .add(Node::Return { expression }, pos, self.node_end())
    }

    fn parse_switch_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let expression = self.parse_parenthesized_condition();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut clauses = NodeList::new();
        let clause_end = |p: &ParserState| {
            matches!(
                p.token(),
                SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword | SyntaxKind::CloseBraceToken
            )
        };
        loop {
            let clause_pos = self.token_pos();
            match self.token() {
                SyntaxKind::CaseKeyword => {
                    self.next_token();
                    let test = self.parse_expression();
                    self.parse_expected(SyntaxKind::ColonToken);
                    let statements = self.parse_statement_list(clause_end);
                    clauses.push(self.arena.add(
                        Node::CaseClause {
                            expression: test,
                            statements,
                        },
                        clause_pos,
                        self.node_end(),
                    ));
                }
                SyntaxKind::DefaultKeyword => {
                    self.next_token();
                    self.parse_expected(SyntaxKind::ColonToken);
                    let statements = self.parse_statement_list(clause_end);
                    clauses.push(self.arena.add(
                        Node::DefaultClause { statements },
                        clause_pos,
                        self.node_end(),
                    ));
                }
                _ => break,
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.arena.add(
            Node::Switch {
                expression,
                clauses,
            },
            pos,
            self.node_end(),
        )
    }

    fn parse_try_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let try_block = self.parse_block();
        let catch_clause = if self.is_token(SyntaxKind::CatchKeyword) {
            let catch_pos = self.token_pos();
            self.next_token();
            let variable_declaration = if self.parse_optional(SyntaxKind::OpenParenToken) {
                let decl_pos = self.token_pos();
                let name = self.parse_binding_name();
                let type_annotation = self.parse_type_annotation();
                self.parse_expected(SyntaxKind::CloseParenToken);
                self.arena.add(
                    Node::VariableDeclaration {
                        name,
                        type_annotation,
                        initializer: NodeIndex::NONE,
                    },
                    decl_pos,
                    self.node_end(),
                )
            } else {
                NodeIndex::NONE
            };
            let block = self.parse_block();
            self.arena.add(
                Node::CatchClause {
                    variable_declaration,
                    block,
                },
                catch_pos,
                self.node_end(),
            )
        } else {
            NodeIndex::NONE
        };
        let finally_block = if self.parse_optional(SyntaxKind::FinallyKeyword) {
            self.parse_block()
        } else {
            NodeIndex::NONE
        };
        if catch_clause.is_none() && finally_block.is_none() {
            self.error_at_current(&diagnostic_messages::TOKEN_EXPECTED, &["catch"]);
        }
        self.arena.add(
            Node::Try {
                try_block,
                catch_clause,
                finally_block,
            },
            pos,
            self.node_end(),
        )
    }

    // =========================================================================
    // Functions
    // =========================================================================

    fn parse_function_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeIndex {
        self.parse_expected(SyntaxKind::FunctionKeyword);
        let asterisk = self.parse_optional(SyntaxKind::AsteriskToken);
        let name = if self.is_identifier() {
            self.parse_identifier()
        } else if modifiers.contains(ModifierFlags::DEFAULT) {
            NodeIndex::NONE
        } else {
            self.parse_identifier()
        };
        let data = self.parse_function_rest(modifiers, asterisk, name);
        self.arena
            .add(Node::FunctionDeclaration(data), pos, self.node_end())
    }

    /// Everything after the name: type parameters, parameters, return type
    /// and an optional block body (`;` marks an overload or ambient signature).
    pub(crate) fn parse_function_rest(
        &mut self,
        modifiers: ModifierFlags,
        asterisk: bool,
        name: NodeIndex,
    ) -> FunctionData {
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameters();
        let type_annotation = self.parse_type_annotation();
        let body = if self.is_token(SyntaxKind::OpenBraceToken) {
            self.parse_block()
        } else {
            self.parse_semicolon();
            NodeIndex::NONE
        };
        FunctionData {
            modifiers,
            asterisk,
            question: false,
            name,
            type_parameters,
            parameters,
            type_annotation,
            body,
        }
    }

    pub(crate) fn parse_parameters(&mut self) -> NodeList {
        let mut parameters = NodeList::new();
        if !self.parse_expected(SyntaxKind::OpenParenToken) {
            return parameters;
        }
        while !self.is_token(SyntaxKind::CloseParenToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            parameters.push(self.parse_parameter());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken);
        parameters
    }

    fn parse_parameter(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let mut modifiers = ModifierFlags::empty();
        while matches!(
            self.token(),
            SyntaxKind::PublicKeyword
                | SyntaxKind::PrivateKeyword
                | SyntaxKind::ProtectedKeyword
                | SyntaxKind::ReadonlyKeyword
        ) && self.next_token_on_same_line(|p| {
            p.is_identifier()
                || p.is_token(SyntaxKind::OpenBraceToken)
                || p.is_token(SyntaxKind::OpenBracketToken)
        }) {
            if let Some(flag) = ModifierFlags::from_token(self.token()) {
                modifiers |= flag;
            }
            self.next_token();
        }
        let dot_dot_dot = self.parse_optional(SyntaxKind::DotDotDotToken);
        let name = if self.is_token(SyntaxKind::ThisKeyword) {
            let this_pos = self.token_pos();
            self.next_token();
            self.arena.add(
                Node::Identifier {
                    text: "this".to_string(),
                },
                this_pos,
                self.node_end(),
            )
        } else {
            self.parse_binding_name()
        };
        let question = self.parse_optional(SyntaxKind::QuestionToken);
        let type_annotation = self.parse_type_annotation();
        let initializer = self.parse_initializer();
        self.arena.add(
            Node::Parameter {
                modifiers,
                dot_dot_dot,
                name,
                question,
                type_annotation,
                initializer,
            },
            pos,
            self.node_end(),
        )
    }

    // =========================================================================
    // Classes
    // =========================================================================

    fn parse_class_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeIndex {
        self.parse_expected(SyntaxKind::ClassKeyword);
        let name = if self.is_identifier() && !self.is_token(SyntaxKind::ImplementsKeyword) {
            self.parse_identifier()
        } else if modifiers.contains(ModifierFlags::DEFAULT) {
            NodeIndex::NONE
        } else {
            self.parse_identifier()
        };
        let type_parameters = self.parse_type_parameters();
        let heritage_clauses = self.parse_heritage_clauses();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut members = NodeList::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.parse_optional(SyntaxKind::SemicolonToken) {
                continue;
            }
            let start = self.token_pos();
            let member = self.parse_class_member();
            if member.is_some() {
                members.push(member);
            }
            if self.token_pos() == start {
                self.error_at_current(&diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED, &[]);
                self.next_token();
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.arena.add(
            Node::ClassDeclaration(ClassLikeData {
                modifiers,
                name,
                type_parameters,
                heritage_clauses,
                members,
            }),
            pos,
            self.node_end(),
        )
    }

    fn parse_heritage_clauses(&mut self) -> NodeList {
        let mut clauses = NodeList::new();
        while matches!(
            self.token(),
            SyntaxKind::ExtendsKeyword | SyntaxKind::ImplementsKeyword
        ) {
            let pos = self.token_pos();
            let token = self.token();
            self.next_token();
            let mut types = NodeList::new();
            loop {
                types.push(self.parse_expression_with_type_arguments());
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            clauses.push(
                self.arena
                    .add(Node::HeritageClause { token, types }, pos, self.node_end()),
            );
        }
        clauses
    }

    fn parse_expression_with_type_arguments(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let mut expression = self.parse_identifier();
        while self.is_token(SyntaxKind::DotToken) {
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
        let type_arguments = if self.is_token(SyntaxKind::LessThanToken) {
            Some(self.parse_type_arguments())
        } else {
            None
        };
        self.arena.add(
            Node::ExpressionWithTypeArguments {
                expression,
                type_arguments,
            },
            pos,
            self.node_end(),
        )
    }

    /// A modifier keyword acts as a modifier only when a member name follows.
    fn is_member_modifier(&mut self) -> bool {
        if !matches!(
            self.token(),
            SyntaxKind::PublicKeyword
                | SyntaxKind::PrivateKeyword
                | SyntaxKind::ProtectedKeyword
                | SyntaxKind::StaticKeyword
                | SyntaxKind::ReadonlyKeyword
                | SyntaxKind::AbstractKeyword
                | SyntaxKind::AsyncKeyword
                | SyntaxKind::DeclareKeyword
        ) {
            return false;
        }
        self.next_token_on_same_line(|p| p.is_start_of_property_name() || p.is_token(SyntaxKind::AsteriskToken))
    }

    pub(crate) fn is_start_of_property_name(&self) -> bool {
        self.is_identifier_or_keyword()
            || matches!(
                self.token(),
                SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral | SyntaxKind::OpenBracketToken
            )
    }

    fn parse_class_member(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let mut modifiers = ModifierFlags::empty();
        while self.is_member_modifier() {
            if let Some(flag) = ModifierFlags::from_token(self.token()) {
                modifiers |= flag;
            }
            self.next_token();
        }

        if self.is_index_signature() {
            return self.parse_index_signature(pos, modifiers);
        }

        if self.is_token(SyntaxKind::ConstructorKeyword)
            && self.next_token_is(SyntaxKind::OpenParenToken)
        {
            let name = self.parse_identifier_name();
            let data = self.parse_function_rest(modifiers, false, name);
            return self
                .arena
                .add(Node::Constructor(data), pos, self.node_end());
        }

        if matches!(self.token(), SyntaxKind::GetKeyword | SyntaxKind::SetKeyword)
            && self.next_token_on_same_line(ParserState::is_start_of_property_name)
        {
            let is_get = self.is_token(SyntaxKind::GetKeyword);
            self.next_token();
            let name = self.parse_property_name();
            let data = self.parse_function_rest(modifiers, false, name);
            let node = if is_get {
                Node::GetAccessor(data)
            } else {
                Node::SetAccessor(data)
            };
            return self.arena.add(node, pos, self.node_end());
        }

        let asterisk = self.parse_optional(SyntaxKind::AsteriskToken);
        let name = self.parse_property_name();
        let question = self.parse_optional(SyntaxKind::QuestionToken);
        if asterisk
            || self.is_token(SyntaxKind::OpenParenToken)
            || self.is_token(SyntaxKind::LessThanToken)
        {
            let mut data = self.parse_function_rest(modifiers, asterisk, name);
            data.question = question;
            return self
                .arena
                .add(Node::MethodDeclaration(data), pos, self.node_end());
        }

        let exclamation = !question && self.parse_optional(SyntaxKind::ExclamationToken);
        let type_annotation = self.parse_type_annotation();
        let initializer = self.parse_initializer();
        self.parse_semicolon();
        self.arena.add(
            Node::PropertyDeclaration {
                modifiers,
                name,
                question,
                exclamation,
                type_annotation,
                initializer,
            },
            pos,
            self.node_end(),
        )
    }

    /// Identifier, string, number or computed name.
    pub(crate) fn parse_property_name(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        match self.token() {
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
            SyntaxKind::OpenBracketToken => {
                self.next_token();
                let expression = self.parse_assignment_expression();
                self.parse_expected(SyntaxKind::CloseBracketToken);
                self.arena
                    .add(Node::ComputedPropertyName { expression }, pos, self.node_end())
            }
            _ => self.parse_identifier_name(),
        }
    }

    // =========================================================================
    // Interfaces, type aliases and type members
    // =========================================================================

    fn parse_interface_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeIndex {
        self.parse_expected(SyntaxKind::InterfaceKeyword);
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        let heritage_clauses = self.parse_heritage_clauses();
        let members = self.parse_type_member_block();
        self.arena.add(
            Node::InterfaceDeclaration(ClassLikeData {
                modifiers,
                name,
                type_parameters,
                heritage_clauses,
                members,
            }),
            pos,
            self.node_end(),
        )
    }

    fn parse_type_alias_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeIndex {
        self.parse_expected(SyntaxKind::TypeKeyword);
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        self.parse_expected(SyntaxKind::EqualsToken);
        let type_node = self.parse_type();
        self.parse_semicolon();
        self.arena.add(
            Node::TypeAliasDeclaration {
                modifiers,
                name,
                type_parameters,
                type_node,
            },
            pos,
            self.node_end(),
        )
    }

    /// `{ member; member, ... }` shared by interfaces and type literals.
    pub(crate) fn parse_type_member_block(&mut self) -> NodeList {
        let mut members = NodeList::new();
        if !self.parse_expected(SyntaxKind::OpenBraceToken) {
            return members;
        }
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let start = self.token_pos();
            members.push(self.parse_type_member());
            if !self.parse_optional(SyntaxKind::SemicolonToken) {
                self.parse_optional(SyntaxKind::CommaToken);
            }
            if self.token_pos() == start {
                self.error_at_current(&diagnostic_messages::TOKEN_EXPECTED, &["}"]);
                self.next_token();
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        members
    }

    fn parse_type_member(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        if self.is_token(SyntaxKind::OpenParenToken) || self.is_token(SyntaxKind::LessThanToken) {
            let sig = self.parse_signature_rest(ModifierFlags::empty(), NodeIndex::NONE, false);
            return self
                .arena
                .add(Node::CallSignature(sig), pos, self.node_end());
        }
        if self.is_token(SyntaxKind::NewKeyword)
            && self.look_ahead(|p| {
                p.next_token();
                p.is_token(SyntaxKind::OpenParenToken) || p.is_token(SyntaxKind::LessThanToken)
            })
        {
            self.next_token();
            let sig = self.parse_signature_rest(ModifierFlags::empty(), NodeIndex::NONE, false);
            return self
                .arena
                .add(Node::ConstructSignature(sig), pos, self.node_end());
        }

        let mut modifiers = ModifierFlags::empty();
        if self.is_token(SyntaxKind::ReadonlyKeyword)
            && self.next_token_on_same_line(ParserState::is_start_of_property_name)
        {
            modifiers |= ModifierFlags::READONLY;
            self.next_token();
        }
        if self.is_index_signature() {
            return self.parse_index_signature(pos, modifiers);
        }

        let name = self.parse_property_name();
        let question = self.parse_optional(SyntaxKind::QuestionToken);
        if self.is_token(SyntaxKind::OpenParenToken) || self.is_token(SyntaxKind::LessThanToken) {
            let sig = self.parse_signature_rest(modifiers, name, question);
            return self
                .arena
                .add(Node::MethodSignature(sig), pos, self.node_end());
        }
        let type_annotation = self.parse_type_annotation();
        self.arena.add(
            Node::PropertySignature {
                modifiers,
                name,
                question,
                type_annotation,
            },
            pos,
            self.node_end(),
        )
    }

    fn parse_signature_rest(
        &mut self,
        modifiers: ModifierFlags,
        name: NodeIndex,
        question: bool,
    ) -> SignatureData {
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameters();
        let type_annotation = self.parse_type_annotation();
        SignatureData {
            modifiers,
            name,
            question,
            type_parameters,
            parameters,
            type_annotation,
        }
    }

    /// `[` identifier `:` starts an index signature.
    fn is_index_signature(&mut self) -> bool {
        self.is_token(SyntaxKind::OpenBracketToken)
            && self.look_ahead(|p| {
                p.next_token();
                if !p.is_identifier() {
                    return false;
                }
                p.next_token();
                p.is_token(SyntaxKind::ColonToken)
            })
    }

    fn parse_index_signature(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeIndex {
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let param_pos = self.token_pos();
        let name = self.parse_identifier();
        let type_annotation = self.parse_type_annotation();
        let parameter = self.arena.add(
            Node::Parameter {
                modifiers: ModifierFlags::empty(),
                dot_dot_dot: false,
                name,
                question: false,
                type_annotation,
                initializer: NodeIndex::NONE,
            },
            param_pos,
            self.node_end(),
        );
        self.parse_expected(SyntaxKind::CloseBracketToken);
        let type_annotation = self.parse_type_annotation();
        self.parse_optional(SyntaxKind::SemicolonToken);
        self.arena.add(
            Node::IndexSignature {
                modifiers,
                parameters: NodeList::from_vec(vec![parameter]),
                type_annotation,
            },
            pos,
            self.node_end(),
        )
    }

    // =========================================================================
    // Modules
    // =========================================================================

    fn parse_module_specifier(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        if self.is_token(SyntaxKind::StringLiteral) {
            let text = self.scanner.token_value().to_string();
            self.next_token();
            return self
                .arena
                .add(Node::StringLiteral { text }, pos, self.node_end());
        }
        self.error_at_current(&diagnostic_messages::TOKEN_EXPECTED, &["string literal"]);
        NodeIndex::NONE
    }

    fn parse_import_declaration(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::ImportKeyword);

        if self.is_token(SyntaxKind::StringLiteral) {
            let module_specifier = self.parse_module_specifier();
            self.parse_semicolon();
            return self.arena.add(
                Node::ImportDeclaration {
                    import_clause: NodeIndex::NONE,
                    module_specifier,
                },
                pos,
                self.node_end(),
            );
        }

        let clause_pos = self.token_pos();
        let name = if self.is_identifier() && !self.is_token(SyntaxKind::FromKeyword) {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        let named_bindings = if name.is_none() || self.parse_optional(SyntaxKind::CommaToken) {
            self.parse_named_bindings()
        } else {
            NodeIndex::NONE
        };
        let import_clause = self.arena.add(
            Node::ImportClause {
                name,
                named_bindings,
            },
            clause_pos,
            self.node_end(),
        );
        self.parse_expected(SyntaxKind::FromKeyword);
        let module_specifier = self.parse_module_specifier();
        self.parse_semicolon();
        self.arena.add(
            Node::ImportDeclaration {
                import_clause,
                module_specifier,
            },
            pos,
            self.node_end(),
        )
    }

    fn parse_named_bindings(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        if self.parse_optional(SyntaxKind::AsteriskToken) {
            self.parse_expected(SyntaxKind::AsKeyword);
            let name = self.parse_identifier();
            return self
                .arena
                .add(Node::NamespaceImport { name }, pos, self.node_end());
        }
        let elements = self.parse_specifier_list(true);
        self.arena
            .add(Node::NamedImports { elements }, pos, self.node_end())
    }

    /// `{ a, b as c }` for imports and exports.
    fn parse_specifier_list(&mut self, import: bool) -> NodeList {
        let mut elements = NodeList::new();
        if !self.parse_expected(SyntaxKind::OpenBraceToken) {
            return elements;
        }
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let pos = self.token_pos();
            let first = self.parse_identifier_name();
            let (property_name, name) = if self.parse_optional(SyntaxKind::AsKeyword) {
                (first, self.parse_identifier_name())
            } else {
                (NodeIndex::NONE, first)
            };
            let node = if import {
                Node::ImportSpecifier {
                    property_name,
                    name,
                }
            } else {
                Node::ExportSpecifier {
                    property_name,
                    name,
                }
            };
            elements.push(self.arena.add(node, pos, self.node_end()));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        elements
    }

    fn parse_export(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::ExportKeyword);

        match self.token() {
            SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken => {
                let clause_pos = self.token_pos();
                let export_clause = if self.parse_optional(SyntaxKind::AsteriskToken) {
                    NodeIndex::NONE
                } else {
                    let elements = self.parse_specifier_list(false);
                    self.arena
                        .add(Node::NamedExports { elements }, clause_pos, self.node_end())
                };
                let module_specifier = if self.parse_optional(SyntaxKind::FromKeyword) {
                    self.parse_module_specifier()
                } else {
                    if export_clause.is_none() {
                        self.error_at_current(&diagnostic_messages::TOKEN_EXPECTED, &["from"]);
                    }
                    NodeIndex::NONE
                };
                self.parse_semicolon();
                self.arena.add(
                    Node::ExportDeclaration {
                        export_clause,
                        module_specifier,
                    },
                    pos,
                    self.node_end(),
                )
            }
            SyntaxKind::DefaultKeyword => {
                self.next_token();
                let is_declaration = matches!(
                    self.token(),
                    SyntaxKind::FunctionKeyword | SyntaxKind::ClassKeyword
                ) || (matches!(
                    self.token(),
                    SyntaxKind::AsyncKeyword | SyntaxKind::AbstractKeyword
                ) && self.is_start_of_declaration());
                if is_declaration {
                    return self
                        .parse_declaration(pos, ModifierFlags::EXPORT | ModifierFlags::DEFAULT);
                }
                let expression = self.parse_assignment_expression();
                self.parse_semicolon();
                self.arena
                    .add(Node::ExportAssignment { expression }, pos, self.node_end())
            }
            _ => self.parse_declaration(pos, ModifierFlags::EXPORT),
        }
    }
}
