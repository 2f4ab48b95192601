//! Syntax node variants.
//!
//! `Node` is a closed enum. Children are referenced by `NodeIndex` into the
//! owning `NodeArena`; an absent optional child is `NodeIndex::NONE`. Only the
//! variants that can carry a type annotation expose an annotation slot, see
//! `Node::annotation_slot_mut`.

use crate::base::{NodeIndex, NodeList};
use bitflags::bitflags;
use tsr_scanner::SyntaxKind;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ModifierFlags: u16 {
        const EXPORT = 1 << 0;
        const DEFAULT = 1 << 1;
        const DECLARE = 1 << 2;
        const PUBLIC = 1 << 3;
        const PRIVATE = 1 << 4;
        const PROTECTED = 1 << 5;
        const READONLY = 1 << 6;
        const STATIC = 1 << 7;
        const ABSTRACT = 1 << 8;
        const ASYNC = 1 << 9;
    }
}

impl ModifierFlags {
    pub fn from_token(kind: SyntaxKind) -> Option<ModifierFlags> {
        Some(match kind {
            SyntaxKind::ExportKeyword => ModifierFlags::EXPORT,
            SyntaxKind::DefaultKeyword => ModifierFlags::DEFAULT,
            SyntaxKind::DeclareKeyword => ModifierFlags::DECLARE,
            SyntaxKind::PublicKeyword => ModifierFlags::PUBLIC,
            SyntaxKind::PrivateKeyword => ModifierFlags::PRIVATE,
            SyntaxKind::ProtectedKeyword => ModifierFlags::PROTECTED,
            SyntaxKind::ReadonlyKeyword => ModifierFlags::READONLY,
            SyntaxKind::StaticKeyword => ModifierFlags::STATIC,
            SyntaxKind::AbstractKeyword => ModifierFlags::ABSTRACT,
            SyntaxKind::AsyncKeyword => ModifierFlags::ASYNC,
            _ => return None,
        })
    }

    /// Source keywords in canonical order.
    pub fn keywords(&self) -> Vec<&'static str> {
        const ORDER: &[(ModifierFlags, &str)] = &[
            (ModifierFlags::EXPORT, "export"),
            (ModifierFlags::DEFAULT, "default"),
            (ModifierFlags::DECLARE, "declare"),
            (ModifierFlags::PUBLIC, "public"),
            (ModifierFlags::PRIVATE, "private"),
            (ModifierFlags::PROTECTED, "protected"),
            (ModifierFlags::STATIC, "static"),
            (ModifierFlags::ABSTRACT, "abstract"),
            (ModifierFlags::READONLY, "readonly"),
            (ModifierFlags::ASYNC, "async"),
        ];
        ORDER
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, word)| *word)
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }
}

/// Shared payload of every function-like node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FunctionData {
    pub modifiers: ModifierFlags,
    pub asterisk: bool,
    /// Optional method marker (`m?() {}`).
    pub question: bool,
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
    /// Block, or an expression for concise arrow bodies. `NONE` for overload
    /// signatures and ambient declarations.
    pub body: NodeIndex,
}

/// Payload of method, call and construct signatures.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SignatureData {
    pub modifiers: ModifierFlags,
    pub name: NodeIndex,
    pub question: bool,
    pub type_parameters: Option<NodeList>,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
}

/// Payload of classes and interfaces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassLikeData {
    pub modifiers: ModifierFlags,
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub heritage_clauses: NodeList,
    pub members: NodeList,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    SourceFile {
        statements: NodeList,
    },
    /// Synthesized: several statements standing in for one.
    StatementGroup {
        statements: NodeList,
    },

    // Names
    Identifier {
        text: String,
    },
    QualifiedName {
        left: NodeIndex,
        right: NodeIndex,
    },
    ComputedPropertyName {
        expression: NodeIndex,
    },

    // Literals and primary expressions
    NumericLiteral {
        text: String,
    },
    /// `text` holds the cooked value.
    StringLiteral {
        text: String,
    },
    BooleanLiteral {
        value: bool,
    },
    NullLiteral,
    ThisExpression,
    SuperExpression,
    /// Template literals keep their raw text.
    NoSubstitutionTemplate {
        raw: String,
    },
    TemplateExpression {
        head: String,
        spans: NodeList,
    },
    TemplateSpan {
        expression: NodeIndex,
        literal: String,
        tail: bool,
    },

    // Expressions
    ArrayLiteral {
        elements: NodeList,
    },
    ObjectLiteral {
        properties: NodeList,
    },
    PropertyAssignment {
        name: NodeIndex,
        initializer: NodeIndex,
    },
    ShorthandPropertyAssignment {
        name: NodeIndex,
    },
    SpreadElement {
        expression: NodeIndex,
    },
    PropertyAccess {
        expression: NodeIndex,
        question_dot: bool,
        name: NodeIndex,
    },
    ElementAccess {
        expression: NodeIndex,
        question_dot: bool,
        argument: NodeIndex,
    },
    Call {
        expression: NodeIndex,
        question_dot: bool,
        type_arguments: Option<NodeList>,
        arguments: NodeList,
    },
    New {
        expression: NodeIndex,
        type_arguments: Option<NodeList>,
        arguments: Option<NodeList>,
    },
    Parenthesized {
        expression: NodeIndex,
    },
    FunctionExpression(FunctionData),
    ArrowFunction(FunctionData),
    /// `operator` is a punctuation token or `typeof`, `void`, `delete`, `await`.
    PrefixUnary {
        operator: SyntaxKind,
        operand: NodeIndex,
    },
    PostfixUnary {
        operator: SyntaxKind,
        operand: NodeIndex,
    },
    Binary {
        left: NodeIndex,
        operator: SyntaxKind,
        right: NodeIndex,
    },
    Conditional {
        condition: NodeIndex,
        when_true: NodeIndex,
        when_false: NodeIndex,
    },
    As {
        expression: NodeIndex,
        type_node: NodeIndex,
    },
    NonNull {
        expression: NodeIndex,
    },
    Omitted,

    // Statements
    VariableStatement {
        modifiers: ModifierFlags,
        declaration_list: NodeIndex,
    },
    VariableDeclarationList {
        kind: VariableKind,
        declarations: NodeList,
    },
    VariableDeclaration {
        name: NodeIndex,
        type_annotation: NodeIndex,
        initializer: NodeIndex,
    },
    ExpressionStatement {
        expression: NodeIndex,
    },
    Block {
        statements: NodeList,
    },
    Empty,
    If {
        condition: NodeIndex,
        then_statement: NodeIndex,
        else_statement: NodeIndex,
    },
    While {
        condition: NodeIndex,
        body: NodeIndex,
    },
    DoWhile {
        body: NodeIndex,
        condition: NodeIndex,
    },
    For {
        initializer: NodeIndex,
        condition: NodeIndex,
        incrementor: NodeIndex,
        body: NodeIndex,
    },
    ForOf {
        initializer: NodeIndex,
        expression: NodeIndex,
        body: NodeIndex,
    },
    ForIn {
        initializer: NodeIndex,
        expression: NodeIndex,
        body: NodeIndex,
    },
    Return {
        expression: NodeIndex,
    },
    Throw {
        expression: NodeIndex,
    },
    Break {
        label: NodeIndex,
    },
    Continue {
        label: NodeIndex,
    },
    Switch {
        expression: NodeIndex,
        clauses: NodeList,
    },
    CaseClause {
        expression: NodeIndex,
        statements: NodeList,
    },
    DefaultClause {
        statements: NodeList,
    },
    Try {
        try_block: NodeIndex,
        catch_clause: NodeIndex,
        finally_block: NodeIndex,
    },
    CatchClause {
        variable_declaration: NodeIndex,
        block: NodeIndex,
    },
    Debugger,

    // Declarations
    FunctionDeclaration(FunctionData),
    ClassDeclaration(ClassLikeData),
    InterfaceDeclaration(ClassLikeData),
    TypeAliasDeclaration {
        modifiers: ModifierFlags,
        name: NodeIndex,
        type_parameters: Option<NodeList>,
        type_node: NodeIndex,
    },
    HeritageClause {
        /// `extends` or `implements`.
        token: SyntaxKind,
        types: NodeList,
    },
    ExpressionWithTypeArguments {
        expression: NodeIndex,
        type_arguments: Option<NodeList>,
    },
    ImportDeclaration {
        import_clause: NodeIndex,
        module_specifier: NodeIndex,
    },
    ImportClause {
        name: NodeIndex,
        named_bindings: NodeIndex,
    },
    NamespaceImport {
        name: NodeIndex,
    },
    NamedImports {
        elements: NodeList,
    },
    ImportSpecifier {
        property_name: NodeIndex,
        name: NodeIndex,
    },
    ExportDeclaration {
        export_clause: NodeIndex,
        module_specifier: NodeIndex,
    },
    NamedExports {
        elements: NodeList,
    },
    ExportSpecifier {
        property_name: NodeIndex,
        name: NodeIndex,
    },
    /// `export default <expression>;`
    ExportAssignment {
        expression: NodeIndex,
    },

    // Class members
    PropertyDeclaration {
        modifiers: ModifierFlags,
        name: NodeIndex,
        question: bool,
        exclamation: bool,
        type_annotation: NodeIndex,
        initializer: NodeIndex,
    },
    MethodDeclaration(FunctionData),
    Constructor(FunctionData),
    GetAccessor(FunctionData),
    SetAccessor(FunctionData),

    // Signatures
    PropertySignature {
        modifiers: ModifierFlags,
        name: NodeIndex,
        question: bool,
        type_annotation: NodeIndex,
    },
    MethodSignature(SignatureData),
    CallSignature(SignatureData),
    ConstructSignature(SignatureData),
    IndexSignature {
        modifiers: ModifierFlags,
        parameters: NodeList,
        type_annotation: NodeIndex,
    },
    Parameter {
        modifiers: ModifierFlags,
        dot_dot_dot: bool,
        name: NodeIndex,
        question: bool,
        type_annotation: NodeIndex,
        initializer: NodeIndex,
    },
    TypeParameter {
        name: NodeIndex,
        constraint: NodeIndex,
        default: NodeIndex,
    },

    // Binding patterns
    ObjectBindingPattern {
        elements: NodeList,
    },
    ArrayBindingPattern {
        elements: NodeList,
    },
    BindingElement {
        dot_dot_dot: bool,
        property_name: NodeIndex,
        name: NodeIndex,
        initializer: NodeIndex,
    },

    // Types
    /// `any`, `number`, `string`, `boolean`, `void`, `null`, `undefined`,
    /// `never`, `unknown`, `object`, `symbol`, `bigint`.
    KeywordType {
        keyword: SyntaxKind,
    },
    TypeReference {
        type_name: NodeIndex,
        type_arguments: Option<NodeList>,
    },
    ArrayType {
        element_type: NodeIndex,
    },
    TupleType {
        elements: NodeList,
    },
    UnionType {
        types: NodeList,
    },
    IntersectionType {
        types: NodeList,
    },
    TypeLiteral {
        members: NodeList,
    },
    FunctionType {
        type_parameters: Option<NodeList>,
        parameters: NodeList,
        type_annotation: NodeIndex,
    },
    ParenthesizedType {
        type_node: NodeIndex,
    },
    /// A string, numeric, boolean or negative numeric literal in type position.
    LiteralType {
        literal: NodeIndex,
    },
    TypeQuery {
        expr_name: NodeIndex,
    },
    /// `keyof T`, `readonly T[]`, `unique symbol`.
    TypeOperator {
        operator: SyntaxKind,
        type_node: NodeIndex,
    },
}

/// Dispatch tag of a `Node`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    SourceFile,
    StatementGroup,
    Identifier,
    QualifiedName,
    ComputedPropertyName,
    NumericLiteral,
    StringLiteral,
    BooleanLiteral,
    NullLiteral,
    ThisExpression,
    SuperExpression,
    NoSubstitutionTemplate,
    TemplateExpression,
    TemplateSpan,
    ArrayLiteral,
    ObjectLiteral,
    PropertyAssignment,
    ShorthandPropertyAssignment,
    SpreadElement,
    PropertyAccess,
    ElementAccess,
    Call,
    New,
    Parenthesized,
    FunctionExpression,
    ArrowFunction,
    PrefixUnary,
    PostfixUnary,
    Binary,
    Conditional,
    As,
    NonNull,
    Omitted,
    VariableStatement,
    VariableDeclarationList,
    VariableDeclaration,
    ExpressionStatement,
    Block,
    Empty,
    If,
    While,
    DoWhile,
    For,
    ForOf,
    ForIn,
    Return,
    Throw,
    Break,
    Continue,
    Switch,
    CaseClause,
    DefaultClause,
    Try,
    CatchClause,
    Debugger,
    FunctionDeclaration,
    ClassDeclaration,
    InterfaceDeclaration,
    TypeAliasDeclaration,
    HeritageClause,
    ExpressionWithTypeArguments,
    ImportDeclaration,
    ImportClause,
    NamespaceImport,
    NamedImports,
    ImportSpecifier,
    ExportDeclaration,
    NamedExports,
    ExportSpecifier,
    ExportAssignment,
    PropertyDeclaration,
    MethodDeclaration,
    Constructor,
    GetAccessor,
    SetAccessor,
    PropertySignature,
    MethodSignature,
    CallSignature,
    ConstructSignature,
    IndexSignature,
    Parameter,
    TypeParameter,
    ObjectBindingPattern,
    ArrayBindingPattern,
    BindingElement,
    KeywordType,
    TypeReference,
    ArrayType,
    TupleType,
    UnionType,
    IntersectionType,
    TypeLiteral,
    FunctionType,
    ParenthesizedType,
    LiteralType,
    TypeQuery,
    TypeOperator,
}

impl NodeKind {
    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration
                | NodeKind::FunctionExpression
                | NodeKind::ArrowFunction
                | NodeKind::MethodDeclaration
                | NodeKind::Constructor
                | NodeKind::GetAccessor
                | NodeKind::SetAccessor
        )
    }

    pub fn is_type_node(&self) -> bool {
        matches!(
            self,
            NodeKind::KeywordType
                | NodeKind::TypeReference
                | NodeKind::ArrayType
                | NodeKind::TupleType
                | NodeKind::UnionType
                | NodeKind::IntersectionType
                | NodeKind::TypeLiteral
                | NodeKind::FunctionType
                | NodeKind::ParenthesizedType
                | NodeKind::LiteralType
                | NodeKind::TypeQuery
                | NodeKind::TypeOperator
        )
    }
}

// Visits every child slot of a node in source order. `$v` provides `one`,
// `list` and `opt_list`; bindings are `&` or `&mut` depending on `$node`.
macro_rules! walk_slots {
    ($node:expr, $v:ident) => {
        match $node {
            Node::SourceFile { statements }
            | Node::StatementGroup { statements }
            | Node::Block { statements }
            | Node::DefaultClause { statements } => $v.list(statements),
            Node::Identifier { .. }
            | Node::NumericLiteral { .. }
            | Node::StringLiteral { .. }
            | Node::BooleanLiteral { .. }
            | Node::NullLiteral
            | Node::ThisExpression
            | Node::SuperExpression
            | Node::NoSubstitutionTemplate { .. }
            | Node::Omitted
            | Node::Empty
            | Node::Debugger
            | Node::KeywordType { .. } => {}
            Node::QualifiedName { left, right } => {
                $v.one(left);
                $v.one(right);
            }
            Node::ComputedPropertyName { expression }
            | Node::SpreadElement { expression }
            | Node::Parenthesized { expression }
            | Node::NonNull { expression }
            | Node::ExpressionStatement { expression }
            | Node::Return { expression }
            | Node::Throw { expression }
            | Node::ExportAssignment { expression } => $v.one(expression),
            Node::TemplateExpression { spans, .. } => $v.list(spans),
            Node::TemplateSpan { expression, .. } => $v.one(expression),
            Node::ArrayLiteral { elements }
            | Node::NamedImports { elements }
            | Node::NamedExports { elements }
            | Node::ObjectBindingPattern { elements }
            | Node::ArrayBindingPattern { elements }
            | Node::TupleType { elements } => $v.list(elements),
            Node::ObjectLiteral { properties } => $v.list(properties),
            Node::PropertyAssignment { name, initializer } => {
                $v.one(name);
                $v.one(initializer);
            }
            Node::ShorthandPropertyAssignment { name } => $v.one(name),
            Node::PropertyAccess {
                expression, name, ..
            } => {
                $v.one(expression);
                $v.one(name);
            }
            Node::ElementAccess {
                expression,
                argument,
                ..
            } => {
                $v.one(expression);
                $v.one(argument);
            }
            Node::Call {
                expression,
                type_arguments,
                arguments,
                ..
            } => {
                $v.one(expression);
                $v.opt_list(type_arguments);
                $v.list(arguments);
            }
            Node::New {
                expression,
                type_arguments,
                arguments,
            } => {
                $v.one(expression);
                $v.opt_list(type_arguments);
                $v.opt_list(arguments);
            }
            Node::FunctionExpression(FunctionData {
                name,
                type_parameters,
                parameters,
                type_annotation,
                body,
                ..
            })
            | Node::ArrowFunction(FunctionData {
                name,
                type_parameters,
                parameters,
                type_annotation,
                body,
                ..
            })
            | Node::FunctionDeclaration(FunctionData {
                name,
                type_parameters,
                parameters,
                type_annotation,
                body,
                ..
            })
            | Node::MethodDeclaration(FunctionData {
                name,
                type_parameters,
                parameters,
                type_annotation,
                body,
                ..
            })
            | Node::Constructor(FunctionData {
                name,
                type_parameters,
                parameters,
                type_annotation,
                body,
                ..
            })
            | Node::GetAccessor(FunctionData {
                name,
                type_parameters,
                parameters,
                type_annotation,
                body,
                ..
            })
            | Node::SetAccessor(FunctionData {
                name,
                type_parameters,
                parameters,
                type_annotation,
                body,
                ..
            }) => {
                $v.one(name);
                $v.opt_list(type_parameters);
                $v.list(parameters);
                $v.one(type_annotation);
                $v.one(body);
            }
            Node::PrefixUnary { operand, .. } | Node::PostfixUnary { operand, .. } => {
                $v.one(operand)
            }
            Node::Binary { left, right, .. } => {
                $v.one(left);
                $v.one(right);
            }
            Node::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                $v.one(condition);
                $v.one(when_true);
                $v.one(when_false);
            }
            Node::As {
                expression,
                type_node,
            } => {
                $v.one(expression);
                $v.one(type_node);
            }
            Node::VariableStatement {
                declaration_list, ..
            } => $v.one(declaration_list),
            Node::VariableDeclarationList { declarations, .. } => $v.list(declarations),
            Node::VariableDeclaration {
                name,
                type_annotation,
                initializer,
            } => {
                $v.one(name);
                $v.one(type_annotation);
                $v.one(initializer);
            }
            Node::If {
                condition,
                then_statement,
                else_statement,
            } => {
                $v.one(condition);
                $v.one(then_statement);
                $v.one(else_statement);
            }
            Node::While { condition, body } => {
                $v.one(condition);
                $v.one(body);
            }
            Node::DoWhile { body, condition } => {
                $v.one(body);
                $v.one(condition);
            }
            Node::For {
                initializer,
                condition,
                incrementor,
                body,
            } => {
                $v.one(initializer);
                $v.one(condition);
                $v.one(incrementor);
                $v.one(body);
            }
            Node::ForOf {
                initializer,
                expression,
                body,
            }
            | Node::ForIn {
                initializer,
                expression,
                body,
            } => {
                $v.one(initializer);
                $v.one(expression);
                $v.one(body);
            }
            Node::Break { label } | Node::Continue { label } => $v.one(label),
            Node::Switch {
                expression,
                clauses,
            } => {
                $v.one(expression);
                $v.list(clauses);
            }
            Node::CaseClause {
                expression,
                statements,
            } => {
                $v.one(expression);
                $v.list(statements);
            }
            Node::Try {
                try_block,
                catch_clause,
                finally_block,
            } => {
                $v.one(try_block);
                $v.one(catch_clause);
                $v.one(finally_block);
            }
            Node::CatchClause {
                variable_declaration,
                block,
            } => {
                $v.one(variable_declaration);
                $v.one(block);
            }
            Node::ClassDeclaration(ClassLikeData {
                name,
                type_parameters,
                heritage_clauses,
                members,
                ..
            })
            | Node::InterfaceDeclaration(ClassLikeData {
                name,
                type_parameters,
                heritage_clauses,
                members,
                ..
            }) => {
                $v.one(name);
                $v.opt_list(type_parameters);
                $v.list(heritage_clauses);
                $v.list(members);
            }
            Node::TypeAliasDeclaration {
                name,
                type_parameters,
                type_node,
                ..
            } => {
                $v.one(name);
                $v.opt_list(type_parameters);
                $v.one(type_node);
            }
            Node::HeritageClause { types, .. } => $v.list(types),
            Node::ExpressionWithTypeArguments {
                expression,
                type_arguments,
            } => {
                $v.one(expression);
                $v.opt_list(type_arguments);
            }
            Node::ImportDeclaration {
                import_clause,
                module_specifier,
            } => {
                $v.one(import_clause);
                $v.one(module_specifier);
            }
            Node::ImportClause {
                name,
                named_bindings,
            } => {
                $v.one(name);
                $v.one(named_bindings);
            }
            Node::NamespaceImport { name } => $v.one(name),
            Node::ImportSpecifier {
                property_name,
                name,
            }
            | Node::ExportSpecifier {
                property_name,
                name,
            } => {
                $v.one(property_name);
                $v.one(name);
            }
            Node::ExportDeclaration {
                export_clause,
                module_specifier,
            } => {
                $v.one(export_clause);
                $v.one(module_specifier);
            }
            Node::PropertyDeclaration {
                name,
                type_annotation,
                initializer,
                ..
            } => {
                $v.one(name);
                $v.one(type_annotation);
                $v.one(initializer);
            }
            Node::PropertySignature {
                name,
                type_annotation,
                ..
            } => {
                $v.one(name);
                $v.one(type_annotation);
            }
            Node::MethodSignature(SignatureData {
                name,
                type_parameters,
                parameters,
                type_annotation,
                ..
            })
            | Node::CallSignature(SignatureData {
                name,
                type_parameters,
                parameters,
                type_annotation,
                ..
            })
            | Node::ConstructSignature(SignatureData {
                name,
                type_parameters,
                parameters,
                type_annotation,
                ..
            }) => {
                $v.one(name);
                $v.opt_list(type_parameters);
                $v.list(parameters);
                $v.one(type_annotation);
            }
            Node::IndexSignature {
                parameters,
                type_annotation,
                ..
            } => {
                $v.list(parameters);
                $v.one(type_annotation);
            }
            Node::Parameter {
                name,
                type_annotation,
                initializer,
                ..
            } => {
                $v.one(name);
                $v.one(type_annotation);
                $v.one(initializer);
            }
            Node::TypeParameter {
                name,
                constraint,
                default,
            } => {
                $v.one(name);
                $v.one(constraint);
                $v.one(default);
            }
            Node::BindingElement {
                property_name,
                name,
                initializer,
                ..
            } => {
                $v.one(property_name);
                $v.one(name);
                $v.one(initializer);
            }
            Node::TypeReference {
                type_name,
                type_arguments,
            } => {
                $v.one(type_name);
                $v.opt_list(type_arguments);
            }
            Node::ArrayType { element_type } => $v.one(element_type),
            Node::UnionType { types } | Node::IntersectionType { types } => $v.list(types),
            Node::TypeLiteral { members } => $v.list(members),
            Node::FunctionType {
                type_parameters,
                parameters,
                type_annotation,
            } => {
                $v.opt_list(type_parameters);
                $v.list(parameters);
                $v.one(type_annotation);
            }
            Node::ParenthesizedType { type_node } | Node::TypeOperator { type_node, .. } => {
                $v.one(type_node)
            }
            Node::LiteralType { literal } => $v.one(literal),
            Node::TypeQuery { expr_name } => $v.one(expr_name),
        }
    };
}

struct CollectChildren(Vec<NodeIndex>);

impl CollectChildren {
    fn one(&mut self, slot: &NodeIndex) {
        if slot.is_some() {
            self.0.push(*slot);
        }
    }

    fn list(&mut self, list: &NodeList) {
        self.0.extend(list.nodes.iter().copied().filter(|n| n.is_some()));
    }

    fn opt_list(&mut self, list: &Option<NodeList>) {
        if let Some(list) = list {
            self.list(list);
        }
    }
}

struct MapChildren<'f>(&'f mut dyn FnMut(NodeIndex) -> Option<NodeIndex>);

impl MapChildren<'_> {
    fn one(&mut self, slot: &mut NodeIndex) {
        if slot.is_some() {
            *slot = (self.0)(*slot).unwrap_or(NodeIndex::NONE);
        }
    }

    fn list(&mut self, list: &mut NodeList) {
        let nodes = std::mem::take(&mut list.nodes);
        list.nodes = nodes
            .into_iter()
            .filter_map(|n| if n.is_none() { Some(n) } else { (self.0)(n) })
            .collect();
    }

    fn opt_list(&mut self, list: &mut Option<NodeList>) {
        if let Some(list) = list {
            self.list(list);
        }
    }
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::SourceFile { .. } => NodeKind::SourceFile,
            Node::StatementGroup { .. } => NodeKind::StatementGroup,
            Node::Identifier { .. } => NodeKind::Identifier,
            Node::QualifiedName { .. } => NodeKind::QualifiedName,
            Node::ComputedPropertyName { .. } => NodeKind::ComputedPropertyName,
            Node::NumericLiteral { .. } => NodeKind::NumericLiteral,
            Node::StringLiteral { .. } => NodeKind::StringLiteral,
            Node::BooleanLiteral { .. } => NodeKind::BooleanLiteral,
            Node::NullLiteral => NodeKind::NullLiteral,
            Node::ThisExpression => NodeKind::ThisExpression,
            Node::SuperExpression => NodeKind::SuperExpression,
            Node::NoSubstitutionTemplate { .. } => NodeKind::NoSubstitutionTemplate,
            Node::TemplateExpression { .. } => NodeKind::TemplateExpression,
            Node::TemplateSpan { .. } => NodeKind::TemplateSpan,
            Node::ArrayLiteral { .. } => NodeKind::ArrayLiteral,
            Node::ObjectLiteral { .. } => NodeKind::ObjectLiteral,
            Node::PropertyAssignment { .. } => NodeKind::PropertyAssignment,
            Node::ShorthandPropertyAssignment { .. } => NodeKind::ShorthandPropertyAssignment,
            Node::SpreadElement { .. } => NodeKind::SpreadElement,
            Node::PropertyAccess { .. } => NodeKind::PropertyAccess,
            Node::ElementAccess { .. } => NodeKind::ElementAccess,
            Node::Call { .. } => NodeKind::Call,
            Node::New { .. } => NodeKind::New,
            Node::Parenthesized { .. } => NodeKind::Parenthesized,
            Node::FunctionExpression(_) => NodeKind::FunctionExpression,
            Node::ArrowFunction(_) => NodeKind::ArrowFunction,
            Node::PrefixUnary { .. } => NodeKind::PrefixUnary,
            Node::PostfixUnary { .. } => NodeKind::PostfixUnary,
            Node::Binary { .. } => NodeKind::Binary,
            Node::Conditional { .. } => NodeKind::Conditional,
            Node::As { .. } => NodeKind::As,
            Node::NonNull { .. } => NodeKind::NonNull,
            Node::Omitted => NodeKind::Omitted,
            Node::VariableStatement { .. } => NodeKind::VariableStatement,
            Node::VariableDeclarationList { .. } => NodeKind::VariableDeclarationList,
            Node::VariableDeclaration { .. } => NodeKind::VariableDeclaration,
            Node::ExpressionStatement { .. } => NodeKind::ExpressionStatement,
            Node::Block { .. } => NodeKind::Block,
            Node::Empty => NodeKind::Empty,
            Node::If { .. } => NodeKind::If,
            Node::While { .. } => NodeKind::While,
            Node::DoWhile { .. } => NodeKind::DoWhile,
            Node::For { .. } => NodeKind::For,
            Node::ForOf { .. } => NodeKind::ForOf,
            Node::ForIn { .. } => NodeKind::ForIn,
            Node::Return { .. } => NodeKind::Return,
            Node::Throw { .. } => NodeKind::Throw,
            Node::Break { .. } => NodeKind::Break,
            Node::Continue { .. } => NodeKind::Continue,
            Node::Switch { .. } => NodeKind::Switch,
            Node::CaseClause { .. } => NodeKind::CaseClause,
            Node::DefaultClause { .. } => NodeKind::DefaultClause,
            Node::Try { .. } => NodeKind::Try,
            Node::CatchClause { .. } => NodeKind::CatchClause,
            Node::Debugger => NodeKind::Debugger,
            Node::FunctionDeclaration(_) => NodeKind::FunctionDeclaration,
            Node::ClassDeclaration(_) => NodeKind::ClassDeclaration,
            Node::InterfaceDeclaration(_) => NodeKind::InterfaceDeclaration,
            Node::TypeAliasDeclaration { .. } => NodeKind::TypeAliasDeclaration,
            Node::HeritageClause { .. } => NodeKind::HeritageClause,
            Node::ExpressionWithTypeArguments { .. } => NodeKind::ExpressionWithTypeArguments,
            Node::ImportDeclaration { .. } => NodeKind::ImportDeclaration,
            Node::ImportClause { .. } => NodeKind::ImportClause,
            Node::NamespaceImport { .. } => NodeKind::NamespaceImport,
            Node::NamedImports { .. } => NodeKind::NamedImports,
            Node::ImportSpecifier { .. } => NodeKind::ImportSpecifier,
            Node::ExportDeclaration { .. } => NodeKind::ExportDeclaration,
            Node::NamedExports { .. } => NodeKind::NamedExports,
            Node::ExportSpecifier { .. } => NodeKind::ExportSpecifier,
            Node::ExportAssignment { .. } => NodeKind::ExportAssignment,
            Node::PropertyDeclaration { .. } => NodeKind::PropertyDeclaration,
            Node::MethodDeclaration(_) => NodeKind::MethodDeclaration,
            Node::Constructor(_) => NodeKind::Constructor,
            Node::GetAccessor(_) => NodeKind::GetAccessor,
            Node::SetAccessor(_) => NodeKind::SetAccessor,
            Node::PropertySignature { .. } => NodeKind::PropertySignature,
            Node::MethodSignature(_) => NodeKind::MethodSignature,
            Node::CallSignature(_) => NodeKind::CallSignature,
            Node::ConstructSignature(_) => NodeKind::ConstructSignature,
            Node::IndexSignature { .. } => NodeKind::IndexSignature,
            Node::Parameter { .. } => NodeKind::Parameter,
            Node::TypeParameter { .. } => NodeKind::TypeParameter,
            Node::ObjectBindingPattern { .. } => NodeKind::ObjectBindingPattern,
            Node::ArrayBindingPattern { .. } => NodeKind::ArrayBindingPattern,
            Node::BindingElement { .. } => NodeKind::BindingElement,
            Node::KeywordType { .. } => NodeKind::KeywordType,
            Node::TypeReference { .. } => NodeKind::TypeReference,
            Node::ArrayType { .. } => NodeKind::ArrayType,
            Node::TupleType { .. } => NodeKind::TupleType,
            Node::UnionType { .. } => NodeKind::UnionType,
            Node::IntersectionType { .. } => NodeKind::IntersectionType,
            Node::TypeLiteral { .. } => NodeKind::TypeLiteral,
            Node::FunctionType { .. } => NodeKind::FunctionType,
            Node::ParenthesizedType { .. } => NodeKind::ParenthesizedType,
            Node::LiteralType { .. } => NodeKind::LiteralType,
            Node::TypeQuery { .. } => NodeKind::TypeQuery,
            Node::TypeOperator { .. } => NodeKind::TypeOperator,
        }
    }

    /// Direct children in source order, absent slots skipped.
    pub fn children(&self) -> Vec<NodeIndex> {
        let mut collect = CollectChildren(Vec::new());
        walk_slots!(self, collect);
        collect.0
    }

    /// Replace every present child with `f(child)`. `None` removes the child:
    /// list entries are dropped and single slots become `NONE`.
    pub fn map_children(&mut self, f: &mut dyn FnMut(NodeIndex) -> Option<NodeIndex>) {
        let mut map = MapChildren(f);
        walk_slots!(self, map);
    }

    /// The type-annotation slot of annotatable variants.
    ///
    /// Constructors and set accessors are function-like but never carry a
    /// return annotation, so they have no slot.
    pub fn annotation_slot_mut(&mut self) -> Option<&mut NodeIndex> {
        match self {
            Node::VariableDeclaration {
                type_annotation, ..
            }
            | Node::Parameter {
                type_annotation, ..
            }
            | Node::PropertyDeclaration {
                type_annotation, ..
            }
            | Node::PropertySignature {
                type_annotation, ..
            }
            | Node::IndexSignature {
                type_annotation, ..
            } => Some(type_annotation),
            Node::MethodSignature(sig) | Node::CallSignature(sig) | Node::ConstructSignature(sig) => {
                Some(&mut sig.type_annotation)
            }
            Node::FunctionDeclaration(func)
            | Node::FunctionExpression(func)
            | Node::ArrowFunction(func)
            | Node::MethodDeclaration(func)
            | Node::GetAccessor(func) => Some(&mut func.type_annotation),
            Node::Constructor(_) | Node::SetAccessor(_) => None,
            Node::SourceFile { .. }
            | Node::StatementGroup { .. }
            | Node::Identifier { .. }
            | Node::QualifiedName { .. }
            | Node::ComputedPropertyName { .. }
            | Node::NumericLiteral { .. }
            | Node::StringLiteral { .. }
            | Node::BooleanLiteral { .. }
            | Node::NullLiteral
            | Node::ThisExpression
            | Node::SuperExpression
            | Node::NoSubstitutionTemplate { .. }
            | Node::TemplateExpression { .. }
            | Node::TemplateSpan { .. }
            | Node::ArrayLiteral { .. }
            | Node::ObjectLiteral { .. }
            | Node::PropertyAssignment { .. }
            | Node::ShorthandPropertyAssignment { .. }
            | Node::SpreadElement { .. }
            | Node::PropertyAccess { .. }
            | Node::ElementAccess { .. }
            | Node::Call { .. }
            | Node::New { .. }
            | Node::Parenthesized { .. }
            | Node::PrefixUnary { .. }
            | Node::PostfixUnary { .. }
            | Node::Binary { .. }
            | Node::Conditional { .. }
            | Node::As { .. }
            | Node::NonNull { .. }
            | Node::Omitted
            | Node::VariableStatement { .. }
            | Node::VariableDeclarationList { .. }
            | Node::ExpressionStatement { .. }
            | Node::Block { .. }
            | Node::Empty
            | Node::If { .. }
            | Node::While { .. }
            | Node::DoWhile { .. }
            | Node::For { .. }
            | Node::ForOf { .. }
            | Node::ForIn { .. }
            | Node::Return { .. }
            | Node::Throw { .. }
            | Node::Break { .. }
            | Node::Continue { .. }
            | Node::Switch { .. }
            | Node::CaseClause { .. }
            | Node::DefaultClause { .. }
            | Node::Try { .. }
            | Node::CatchClause { .. }
            | Node::Debugger
            | Node::ClassDeclaration(_)
            | Node::InterfaceDeclaration(_)
            | Node::TypeAliasDeclaration { .. }
            | Node::HeritageClause { .. }
            | Node::ExpressionWithTypeArguments { .. }
            | Node::ImportDeclaration { .. }
            | Node::ImportClause { .. }
            | Node::NamespaceImport { .. }
            | Node::NamedImports { .. }
            | Node::ImportSpecifier { .. }
            | Node::ExportDeclaration { .. }
            | Node::NamedExports { .. }
            | Node::ExportSpecifier { .. }
            | Node::ExportAssignment { .. }
            | Node::TypeParameter { .. }
            | Node::ObjectBindingPattern { .. }
            | Node::ArrayBindingPattern { .. }
            | Node::BindingElement { .. }
            | Node::KeywordType { .. }
            | Node::TypeReference { .. }
            | Node::ArrayType { .. }
            | Node::TupleType { .. }
            | Node::UnionType { .. }
            | Node::IntersectionType { .. }
            | Node::TypeLiteral { .. }
            | Node::FunctionType { .. }
            | Node::ParenthesizedType { .. }
            | Node::LiteralType { .. }
            | Node::TypeQuery { .. }
            | Node::TypeOperator { .. } => None,
        }
    }

    /// The current annotation, if the variant has a slot and it is filled.
    pub fn annotation(&self) -> Option<NodeIndex> {
        let slot = match self {
            Node::VariableDeclaration {
                type_annotation, ..
            }
            | Node::Parameter {
                type_annotation, ..
            }
            | Node::PropertyDeclaration {
                type_annotation, ..
            }
            | Node::PropertySignature {
                type_annotation, ..
            }
            | Node::IndexSignature {
                type_annotation, ..
            } => *type_annotation,
            Node::MethodSignature(sig) | Node::CallSignature(sig) | Node::ConstructSignature(sig) => {
                sig.type_annotation
            }
            Node::FunctionDeclaration(func)
            | Node::FunctionExpression(func)
            | Node::ArrowFunction(func)
            | Node::MethodDeclaration(func)
            | Node::GetAccessor(func) => func.type_annotation,
            _ => NodeIndex::NONE,
        };
        slot.to_option()
    }

    pub fn function_data(&self) -> Option<&FunctionData> {
        match self {
            Node::FunctionDeclaration(func)
            | Node::FunctionExpression(func)
            | Node::ArrowFunction(func)
            | Node::MethodDeclaration(func)
            | Node::Constructor(func)
            | Node::GetAccessor(func)
            | Node::SetAccessor(func) => Some(func),
            _ => None,
        }
    }

    pub fn function_data_mut(&mut self) -> Option<&mut FunctionData> {
        match self {
            Node::FunctionDeclaration(func)
            | Node::FunctionExpression(func)
            | Node::ArrowFunction(func)
            | Node::MethodDeclaration(func)
            | Node::Constructor(func)
            | Node::GetAccessor(func)
            | Node::SetAccessor(func) => Some(func),
            _ => None,
        }
    }

    pub fn class_like_data(&self) -> Option<&ClassLikeData> {
        match self {
            Node::ClassDeclaration(data) | Node::InterfaceDeclaration(data) => Some(data),
            _ => None,
        }
    }

    /// Name slot of named declarations and members.
    pub fn name(&self) -> Option<NodeIndex> {
        let name = match self {
            Node::FunctionDeclaration(func)
            | Node::FunctionExpression(func)
            | Node::MethodDeclaration(func)
            | Node::GetAccessor(func)
            | Node::SetAccessor(func) => func.name,
            Node::ClassDeclaration(data) | Node::InterfaceDeclaration(data) => data.name,
            Node::MethodSignature(sig) => sig.name,
            Node::TypeAliasDeclaration { name, .. }
            | Node::VariableDeclaration { name, .. }
            | Node::Parameter { name, .. }
            | Node::PropertyDeclaration { name, .. }
            | Node::PropertySignature { name, .. }
            | Node::TypeParameter { name, .. }
            | Node::BindingElement { name, .. }
            | Node::PropertyAssignment { name, .. }
            | Node::ShorthandPropertyAssignment { name }
            | Node::ImportSpecifier { name, .. }
            | Node::ImportClause { name, .. }
            | Node::NamespaceImport { name } => *name,
            _ => NodeIndex::NONE,
        };
        name.to_option()
    }

    pub fn modifiers(&self) -> ModifierFlags {
        match self {
            Node::FunctionDeclaration(func)
            | Node::FunctionExpression(func)
            | Node::ArrowFunction(func)
            | Node::MethodDeclaration(func)
            | Node::Constructor(func)
            | Node::GetAccessor(func)
            | Node::SetAccessor(func) => func.modifiers,
            Node::ClassDeclaration(data) | Node::InterfaceDeclaration(data) => data.modifiers,
            Node::MethodSignature(sig) | Node::CallSignature(sig) | Node::ConstructSignature(sig) => {
                sig.modifiers
            }
            Node::VariableStatement { modifiers, .. }
            | Node::TypeAliasDeclaration { modifiers, .. }
            | Node::PropertyDeclaration { modifiers, .. }
            | Node::PropertySignature { modifiers, .. }
            | Node::IndexSignature { modifiers, .. }
            | Node::Parameter { modifiers, .. } => *modifiers,
            _ => ModifierFlags::empty(),
        }
    }

    pub fn identifier_text(&self) -> Option<&str> {
        match self {
            Node::Identifier { text } => Some(text),
            _ => None,
        }
    }
}
