//! Node construction for generated code.
//!
//! Every node built here is synthesized: it has no source range and prints
//! from its structure alone. Calls into the runtime library go through
//! `lib_call`, which also records that the unit needs the library import.

use crate::context::LibBinding;
use tsr_parser::{
    FunctionData, ModifierFlags, Node, NodeArena, NodeIndex, NodeList, VariableKind,
};
use tsr_scanner::SyntaxKind;

pub struct Factory<'a> {
    arena: &'a mut NodeArena,
    lib: &'a mut LibBinding,
}

impl<'a> Factory<'a> {
    pub fn new(arena: &'a mut NodeArena, lib: &'a mut LibBinding) -> Self {
        Factory { arena, lib }
    }

    #[inline]
    fn add(&mut self, node: Node) -> NodeIndex {
        self.arena.add_synthesized(node)
    }

    // =========================================================================
    // Primary expressions
    // =========================================================================

    pub fn identifier(&mut self, text: &str) -> NodeIndex {
        self.add(Node::Identifier {
            text: text.to_string(),
        })
    }

    pub fn string(&mut self, value: &str) -> NodeIndex {
        self.add(Node::StringLiteral {
            text: value.to_string(),
        })
    }

    pub fn number(&mut self, text: &str) -> NodeIndex {
        self.add(Node::NumericLiteral {
            text: text.to_string(),
        })
    }

    /// `-text`
    pub fn negative_number(&mut self, text: &str) -> NodeIndex {
        let operand = self.number(text);
        self.add(Node::PrefixUnary {
            operator: SyntaxKind::MinusToken,
            operand,
        })
    }

    pub fn boolean(&mut self, value: bool) -> NodeIndex {
        self.add(Node::BooleanLiteral { value })
    }

    pub fn property_access(&mut self, expression: NodeIndex, name: &str) -> NodeIndex {
        let name = self.identifier(name);
        self.add(Node::PropertyAccess {
            expression,
            question_dot: false,
            name,
        })
    }

    pub fn call(&mut self, callee: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.add(Node::Call {
            expression: callee,
            question_dot: false,
            type_arguments: None,
            arguments: NodeList::from_vec(arguments),
        })
    }

    /// `receiver.method(arguments)`
    pub fn method_call(
        &mut self,
        receiver: NodeIndex,
        method: &str,
        arguments: Vec<NodeIndex>,
    ) -> NodeIndex {
        let callee = self.property_access(receiver, method);
        self.call(callee, arguments)
    }

    /// `(p1, p2) => body` with untyped parameters.
    pub fn arrow(&mut self, parameters: &[&str], body: NodeIndex) -> NodeIndex {
        let parameters = parameters
            .iter()
            .map(|name| self.parameter(name, false))
            .collect();
        self.add(Node::ArrowFunction(FunctionData {
            parameters: NodeList::from_vec(parameters),
            body,
            ..FunctionData::default()
        }))
    }

    pub fn parameter(&mut self, name: &str, rest: bool) -> NodeIndex {
        let name = self.identifier(name);
        self.add(Node::Parameter {
            modifiers: ModifierFlags::empty(),
            dot_dot_dot: rest,
            name,
            question: false,
            type_annotation: NodeIndex::NONE,
            initializer: NodeIndex::NONE,
        })
    }

    // =========================================================================
    // Runtime library
    // =========================================================================

    /// The library binding, e.g. `t`.
    pub fn lib(&mut self) -> NodeIndex {
        self.lib.used = true;
        let name = self.lib.name.clone();
        self.identifier(&name)
    }

    /// `t.method(arguments)`
    pub fn lib_call(&mut self, method: &str, arguments: Vec<NodeIndex>) -> NodeIndex {
        let lib = self.lib();
        self.method_call(lib, method, arguments)
    }

    /// `descriptor.assert(value)`
    pub fn assert(&mut self, descriptor: NodeIndex, value: NodeIndex) -> NodeIndex {
        self.method_call(descriptor, "assert", vec![value])
    }

    /// `_xType.assert(value)` for a named descriptor binding.
    pub fn type_assertion(&mut self, descriptor_name: &str, value: NodeIndex) -> NodeIndex {
        let descriptor = self.identifier(descriptor_name);
        self.assert(descriptor, value)
    }

    pub fn nullable(&mut self, reflection: NodeIndex) -> NodeIndex {
        self.lib_call("nullable", vec![reflection])
    }

    /// `Name => body`, deferring a self-referential body.
    pub fn self_reference(&mut self, name: &str, body: NodeIndex) -> NodeIndex {
        self.arrow(&[name], body)
    }

    /// `t.tdz(() => Name, "Name")`
    pub fn tdz(&mut self, name: &str) -> NodeIndex {
        let target = self.identifier(name);
        let thunk = self.arrow(&[], target);
        let label = self.string(name);
        self.lib_call("tdz", vec![thunk, label])
    }

    /// `t.type("Name", body)`
    pub fn type_declaration(&mut self, name: &str, body: NodeIndex) -> NodeIndex {
        let label = self.string(name);
        self.lib_call("type", vec![label, body])
    }

    /// `t.annotate(target, descriptor)`
    pub fn annotate(&mut self, target: &str, descriptor: NodeIndex) -> NodeIndex {
        let target = self.identifier(target);
        self.lib_call("annotate", vec![target, descriptor])
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub fn variable_declaration(
        &mut self,
        name: &str,
        type_annotation: NodeIndex,
        initializer: NodeIndex,
    ) -> NodeIndex {
        let name = self.identifier(name);
        self.add(Node::VariableDeclaration {
            name,
            type_annotation,
            initializer,
        })
    }

    pub fn variable_statement(
        &mut self,
        modifiers: ModifierFlags,
        kind: VariableKind,
        declarations: Vec<NodeIndex>,
    ) -> NodeIndex {
        let declaration_list = self.add(Node::VariableDeclarationList {
            kind,
            declarations: NodeList::from_vec(declarations),
        });
        self.add(Node::VariableStatement {
            modifiers,
            declaration_list,
        })
    }

    /// `const name = initializer;`
    pub fn const_statement(
        &mut self,
        modifiers: ModifierFlags,
        name: &str,
        initializer: NodeIndex,
    ) -> NodeIndex {
        let declaration = self.variable_declaration(name, NodeIndex::NONE, initializer);
        self.variable_statement(modifiers, VariableKind::Const, vec![declaration])
    }

    /// `let name = initializer;`
    pub fn let_statement(&mut self, name: &str, initializer: NodeIndex) -> NodeIndex {
        let declaration = self.variable_declaration(name, NodeIndex::NONE, initializer);
        self.variable_statement(ModifierFlags::empty(), VariableKind::Let, vec![declaration])
    }

    pub fn expression_statement(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add(Node::ExpressionStatement { expression })
    }

    pub fn return_statement(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add(Node::Return { expression })
    }

    pub fn block(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.add(Node::Block {
            statements: NodeList::from_vec(statements),
        })
    }

    /// Several statements standing in for one.
    pub fn statement_group(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.add(Node::StatementGroup {
            statements: NodeList::from_vec(statements),
        })
    }

    /// `export default name;`
    pub fn export_default(&mut self, name: &str) -> NodeIndex {
        let expression = self.identifier(name);
        self.add(Node::ExportAssignment { expression })
    }

    /// `import name from "module";`
    pub fn import_default(&mut self, name: &str, module: &str) -> NodeIndex {
        let name = self.identifier(name);
        let import_clause = self.add(Node::ImportClause {
            name,
            named_bindings: NodeIndex::NONE,
        });
        let module_specifier = self.string(module);
        self.add(Node::ImportDeclaration {
            import_clause,
            module_specifier,
        })
    }

    pub fn any_keyword(&mut self) -> NodeIndex {
        self.add(Node::KeywordType {
            keyword: SyntaxKind::AnyKeyword,
        })
    }
}
