//! The printer.
//!
//! `Printer::emit` dispatches on the node variant. Statement emitters finish
//! their own line; expression and type emitters write inline. With
//! `strip_types` the printer drops everything that only exists at the type
//! level, see `Printer::is_emitted`.

mod declarations;
mod expressions;
mod functions;
mod helpers;
mod literals;
mod statements;
mod types;

use crate::source_writer::SourceWriter;
use tsr_parser::{Node, NodeArena, NodeIndex};

pub use literals::quote_string;

#[derive(Clone, Copy, Debug)]
pub struct PrintOptions {
    /// Emit JavaScript: drop annotations, type-only declarations and
    /// TypeScript-only modifiers.
    pub strip_types: bool,
    pub indent_width: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions {
            strip_types: false,
            indent_width: 4,
        }
    }
}

impl PrintOptions {
    pub fn javascript() -> Self {
        PrintOptions {
            strip_types: true,
            ..PrintOptions::default()
        }
    }
}

pub struct Printer<'a> {
    pub(crate) arena: &'a NodeArena,
    pub(crate) options: PrintOptions,
    pub(crate) writer: SourceWriter,
}

impl<'a> Printer<'a> {
    pub fn new(arena: &'a NodeArena, options: PrintOptions) -> Printer<'a> {
        Printer {
            arena,
            options,
            writer: SourceWriter::new(options.indent_width),
        }
    }

    pub fn finish(self) -> String {
        self.writer.into_string()
    }

    #[inline]
    pub(crate) fn strip_types(&self) -> bool {
        self.options.strip_types
    }

    pub fn emit(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            return;
        };
        match node {
            Node::SourceFile { statements } | Node::StatementGroup { statements } => {
                self.emit_statement_list(statements)
            }
            Node::Block { statements } => self.emit_block(statements),

            // Names and literals
            Node::Identifier { text } => self.write(text),
            Node::QualifiedName { left, right } => {
                self.emit(*left);
                self.write(".");
                self.emit(*right);
            }
            Node::ComputedPropertyName { expression } => {
                self.write("[");
                self.emit(*expression);
                self.write("]");
            }
            Node::NumericLiteral { text } => self.write(text),
            Node::StringLiteral { text } => self.write(&quote_string(text)),
            Node::BooleanLiteral { value } => self.write(if *value { "true" } else { "false" }),
            Node::NullLiteral => self.write("null"),
            Node::ThisExpression => self.write("this"),
            Node::SuperExpression => self.write("super"),
            Node::NoSubstitutionTemplate { raw } => {
                self.write("`");
                self.write(raw);
                self.write("`");
            }
            Node::TemplateExpression { head, spans } => self.emit_template(head, spans),
            Node::TemplateSpan { .. } => {}

            // Expressions
            Node::ArrayLiteral { elements } => {
                self.write("[");
                self.emit_comma_list(elements);
                self.write("]");
            }
            Node::ObjectLiteral { properties } => self.emit_object_literal(properties),
            Node::PropertyAssignment { name, initializer } => {
                self.emit(*name);
                self.write(": ");
                self.emit(*initializer);
            }
            Node::ShorthandPropertyAssignment { name } => self.emit(*name),
            Node::SpreadElement { expression } => {
                self.write("...");
                self.emit(*expression);
            }
            Node::PropertyAccess {
                expression,
                question_dot,
                name,
            } => {
                self.emit(*expression);
                self.write(if *question_dot { "?." } else { "." });
                self.emit(*name);
            }
            Node::ElementAccess {
                expression,
                question_dot,
                argument,
            } => {
                self.emit(*expression);
                self.write(if *question_dot { "?.[" } else { "[" });
                self.emit(*argument);
                self.write("]");
            }
            Node::Call {
                expression,
                question_dot,
                type_arguments,
                arguments,
            } => {
                self.emit(*expression);
                if *question_dot {
                    self.write("?.");
                }
                self.emit_type_arguments(type_arguments.as_ref());
                self.write("(");
                self.emit_comma_list(arguments);
                self.write(")");
            }
            Node::New {
                expression,
                type_arguments,
                arguments,
            } => {
                self.write("new ");
                self.emit(*expression);
                self.emit_type_arguments(type_arguments.as_ref());
                if let Some(arguments) = arguments {
                    self.write("(");
                    self.emit_comma_list(arguments);
                    self.write(")");
                }
            }
            Node::Parenthesized { expression } => {
                self.write("(");
                self.emit(*expression);
                self.write(")");
            }
            Node::FunctionExpression(func) => self.emit_function_expression(func),
            Node::ArrowFunction(func) => self.emit_arrow_function(func),
            Node::PrefixUnary { operator, operand } => self.emit_prefix_unary(*operator, *operand),
            Node::PostfixUnary { operator, operand } => {
                self.emit(*operand);
                self.write_token(*operator);
            }
            Node::Binary {
                left,
                operator,
                right,
            } => self.emit_binary(*left, *operator, *right),
            Node::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                self.emit(*condition);
                self.write(" ? ");
                self.emit(*when_true);
                self.write(" : ");
                self.emit(*when_false);
            }
            Node::As {
                expression,
                type_node,
            } => {
                self.emit(*expression);
                if !self.strip_types() {
                    self.write(" as ");
                    self.emit(*type_node);
                }
            }
            Node::NonNull { expression } => {
                self.emit(*expression);
                if !self.strip_types() {
                    self.write("!");
                }
            }
            Node::Omitted => {}

            // Statements
            Node::VariableStatement {
                modifiers,
                declaration_list,
            } => {
                self.emit_modifiers(*modifiers);
                self.emit(*declaration_list);
                self.write_semicolon_line();
            }
            Node::VariableDeclarationList { kind, declarations } => {
                self.write(kind.keyword());
                self.write(" ");
                self.emit_comma_list(declarations);
            }
            Node::VariableDeclaration {
                name,
                type_annotation,
                initializer,
            } => {
                self.emit(*name);
                self.emit_type_annotation(*type_annotation);
                self.emit_initializer(*initializer);
            }
            Node::ExpressionStatement { expression } => {
                self.emit(*expression);
                self.write_semicolon_line();
            }
            Node::Empty => self.write_semicolon_line(),
            Node::If {
                condition,
                then_statement,
                else_statement,
            } => self.emit_if(*condition, *then_statement, *else_statement),
            Node::While { condition, body } => {
                self.write("while (");
                self.emit(*condition);
                self.write(")");
                self.emit_embedded_statement(*body);
            }
            Node::DoWhile { body, condition } => {
                self.write("do");
                self.emit_embedded_statement(*body);
                if !self.writer.is_at_line_start() {
                    self.write(" ");
                }
                self.write("while (");
                self.emit(*condition);
                self.write(")");
                self.write_semicolon_line();
            }
            Node::For {
                initializer,
                condition,
                incrementor,
                body,
            } => self.emit_for(*initializer, *condition, *incrementor, *body),
            Node::ForOf {
                initializer,
                expression,
                body,
            } => self.emit_for_in_or_of("of", *initializer, *expression, *body),
            Node::ForIn {
                initializer,
                expression,
                body,
            } => self.emit_for_in_or_of("in", *initializer, *expression, *body),
            Node::Return { expression } => {
                self.write("return");
                if expression.is_some() {
                    self.write(" ");
                    self.emit(*expression);
                }
                self.write_semicolon_line();
            }
            Node::Throw { expression } => {
                self.write("throw ");
                self.emit(*expression);
                self.write_semicolon_line();
            }
            Node::Break { label } | Node::Continue { label } => {
                self.write(if matches!(node, Node::Break { .. }) {
                    "break"
                } else {
                    "continue"
                });
                if label.is_some() {
                    self.write(" ");
                    self.emit(*label);
                }
                self.write_semicolon_line();
            }
            Node::Switch {
                expression,
                clauses,
            } => self.emit_switch(*expression, clauses),
            Node::CaseClause {
                expression,
                statements,
            } => {
                self.write("case ");
                self.emit(*expression);
                self.write(":");
                self.emit_clause_body(statements);
            }
            Node::DefaultClause { statements } => {
                self.write("default:");
                self.emit_clause_body(statements);
            }
            Node::Try {
                try_block,
                catch_clause,
                finally_block,
            } => self.emit_try(*try_block, *catch_clause, *finally_block),
            Node::CatchClause {
                variable_declaration,
                block,
            } => {
                self.write("catch");
                if variable_declaration.is_some() {
                    self.write(" (");
                    self.emit(*variable_declaration);
                    self.write(")");
                }
                self.write(" ");
                self.emit(*block);
            }
            Node::Debugger => {
                self.write("debugger");
                self.write_semicolon_line();
            }

            // Declarations
            Node::FunctionDeclaration(func) => self.emit_function_declaration(func),
            Node::ClassDeclaration(data) => self.emit_class_declaration(data),
            Node::InterfaceDeclaration(data) => self.emit_interface_declaration(data),
            Node::TypeAliasDeclaration {
                modifiers,
                name,
                type_parameters,
                type_node,
            } => {
                self.emit_modifiers(*modifiers);
                self.write("type ");
                self.emit(*name);
                self.emit_type_parameters(type_parameters.as_ref());
                self.write(" = ");
                self.emit(*type_node);
                self.write_semicolon_line();
            }
            Node::HeritageClause { token, types } => {
                self.write_token(*token);
                self.write(" ");
                self.emit_comma_list(types);
            }
            Node::ExpressionWithTypeArguments {
                expression,
                type_arguments,
            } => {
                self.emit(*expression);
                self.emit_type_arguments(type_arguments.as_ref());
            }
            Node::ImportDeclaration {
                import_clause,
                module_specifier,
            } => self.emit_import_declaration(*import_clause, *module_specifier),
            Node::ImportClause {
                name,
                named_bindings,
            } => {
                self.emit(*name);
                if name.is_some() && named_bindings.is_some() {
                    self.write(", ");
                }
                self.emit(*named_bindings);
            }
            Node::NamespaceImport { name } => {
                self.write("* as ");
                self.emit(*name);
            }
            Node::NamedImports { elements } | Node::NamedExports { elements } => {
                self.write("{ ");
                self.emit_comma_list(elements);
                self.write(" }");
            }
            Node::ImportSpecifier {
                property_name,
                name,
            }
            | Node::ExportSpecifier {
                property_name,
                name,
            } => {
                if property_name.is_some() {
                    self.emit(*property_name);
                    self.write(" as ");
                }
                self.emit(*name);
            }
            Node::ExportDeclaration {
                export_clause,
                module_specifier,
            } => {
                self.write("export ");
                if export_clause.is_some() {
                    self.emit(*export_clause);
                } else {
                    self.write("*");
                }
                if module_specifier.is_some() {
                    self.write(" from ");
                    self.emit(*module_specifier);
                }
                self.write_semicolon_line();
            }
            Node::ExportAssignment { expression } => {
                self.write("export default ");
                self.emit(*expression);
                self.write_semicolon_line();
            }

            // Members
            Node::PropertyDeclaration {
                modifiers,
                name,
                question,
                exclamation,
                type_annotation,
                initializer,
            } => {
                self.emit_member_modifiers(*modifiers);
                self.emit(*name);
                if !self.strip_types() {
                    if *question {
                        self.write("?");
                    } else if *exclamation {
                        self.write("!");
                    }
                }
                self.emit_type_annotation(*type_annotation);
                self.emit_initializer(*initializer);
                self.write_semicolon_line();
            }
            Node::MethodDeclaration(func)
            | Node::Constructor(func)
            | Node::GetAccessor(func)
            | Node::SetAccessor(func) => self.emit_method_like(node, func),
            Node::PropertySignature {
                modifiers,
                name,
                question,
                type_annotation,
            } => {
                self.emit_member_modifiers(*modifiers);
                self.emit(*name);
                if *question {
                    self.write("?");
                }
                self.emit_type_annotation(*type_annotation);
            }
            Node::MethodSignature(sig) => {
                self.emit_member_modifiers(sig.modifiers);
                self.emit(sig.name);
                if sig.question {
                    self.write("?");
                }
                self.emit_signature_rest(sig);
            }
            Node::CallSignature(sig) => self.emit_signature_rest(sig),
            Node::ConstructSignature(sig) => {
                self.write("new ");
                self.emit_signature_rest(sig);
            }
            Node::IndexSignature {
                modifiers,
                parameters,
                type_annotation,
            } => {
                self.emit_member_modifiers(*modifiers);
                self.write("[");
                self.emit_comma_list(parameters);
                self.write("]");
                self.emit_type_annotation(*type_annotation);
            }
            Node::Parameter {
                modifiers,
                dot_dot_dot,
                name,
                question,
                type_annotation,
                initializer,
            } => {
                self.emit_member_modifiers(*modifiers);
                if *dot_dot_dot {
                    self.write("...");
                }
                self.emit(*name);
                if *question && !self.strip_types() {
                    self.write("?");
                }
                self.emit_type_annotation(*type_annotation);
                self.emit_initializer(*initializer);
            }
            Node::TypeParameter {
                name,
                constraint,
                default,
            } => {
                self.emit(*name);
                if constraint.is_some() {
                    self.write(" extends ");
                    self.emit(*constraint);
                }
                if default.is_some() {
                    self.write(" = ");
                    self.emit(*default);
                }
            }

            // Binding patterns
            Node::ObjectBindingPattern { elements } => {
                if elements.is_empty() {
                    self.write("{}");
                } else {
                    self.write("{ ");
                    self.emit_comma_list(elements);
                    self.write(" }");
                }
            }
            Node::ArrayBindingPattern { elements } => {
                self.write("[");
                self.emit_comma_list(elements);
                self.write("]");
            }
            Node::BindingElement {
                dot_dot_dot,
                property_name,
                name,
                initializer,
            } => {
                if *dot_dot_dot {
                    self.write("...");
                }
                if property_name.is_some() {
                    self.emit(*property_name);
                    self.write(": ");
                }
                self.emit(*name);
                self.emit_initializer(*initializer);
            }

            // Types
            Node::KeywordType { .. }
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
            | Node::TypeOperator { .. } => self.emit_type_node(node),
        }
    }
}

/// Print the tree rooted at `root`.
pub fn print_to_string(arena: &NodeArena, root: NodeIndex, options: PrintOptions) -> String {
    let mut printer = Printer::new(arena, options);
    printer.emit(root);
    let output = printer.finish();
    tracing::trace!(bytes = output.len(), strip_types = options.strip_types, "printed tree");
    output
}

/// Print a single node as TypeScript, without a trailing newline.
///
/// Used for textual comparison of types and members.
pub fn print_node(arena: &NodeArena, idx: NodeIndex) -> String {
    let mut printer = Printer::new(arena, PrintOptions::default());
    printer.emit(idx);
    printer.finish().trim_end().to_string()
}
