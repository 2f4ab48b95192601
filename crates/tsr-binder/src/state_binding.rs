//! Declaration pass: scopes and symbols for every declaration of a unit.

use crate::state::BinderState;
use crate::symbols::{ContainerKind, ScopeId};
use tracing::{Level, span};
use tsr_core::{SymbolFlags, SymbolId, UnitId};
use tsr_parser::{
    ClassLikeData, FunctionData, ModifierFlags, Node, NodeIndex, NodeList, VariableKind,
};

impl<'a> BinderState<'a> {
    pub(crate) fn bind_source_file(&mut self, unit_id: UnitId) {
        self.current_unit = unit_id;
        let unit = self.unit();
        let _span = span!(Level::DEBUG, "bind_source_file", file = %unit.file_name).entered();

        let Some(Node::SourceFile { statements }) = unit.node(unit.root) else {
            return;
        };
        self.current_scope = ScopeId::GLOBAL;
        if Self::is_module(unit) {
            self.enter_scope(ContainerKind::Module, unit.root);
        } else {
            let root = self.node_ref(unit.root);
            self.scope_of.insert(root, ScopeId::GLOBAL);
        }
        for &statement in statements {
            self.bind_node(statement);
        }
        self.current_scope = ScopeId::GLOBAL;
    }

    pub(crate) fn bind_node(&mut self, idx: NodeIndex) {
        let arena = &self.unit().arena;
        let Some(node) = arena.get(idx) else {
            return;
        };

        match node {
            Node::VariableStatement {
                modifiers,
                declaration_list,
            } => {
                let exported = modifiers.contains(ModifierFlags::EXPORT);
                self.bind_variable_list(*declaration_list, exported);
            }
            Node::VariableDeclarationList { .. } => self.bind_variable_list(idx, false),
            Node::FunctionDeclaration(func) => {
                if let Some(name) = arena.identifier_text(func.name) {
                    let scope = self.current_scope;
                    let symbol =
                        self.declare_symbol(scope, name, SymbolFlags::FUNCTION, idx, func.name);
                    self.export_declaration(func.modifiers, name, symbol);
                }
                self.bind_function_like(idx, func, None);
            }
            Node::FunctionExpression(func) => {
                self.bind_function_like(idx, func, func.name.to_option());
            }
            Node::ArrowFunction(func) | Node::Constructor(func) => {
                self.bind_function_like(idx, func, None);
            }
            Node::MethodDeclaration(func) | Node::GetAccessor(func) | Node::SetAccessor(func) => {
                if let Some(name) = arena.property_name_text(func.name) {
                    self.declare_member(name, SymbolFlags::METHOD, idx, func.name);
                }
                self.bind_function_like(idx, func, None);
            }
            Node::ClassDeclaration(data) => {
                if let Some(name) = arena.identifier_text(data.name) {
                    let scope = self.current_scope;
                    let symbol =
                        self.declare_symbol(scope, name, SymbolFlags::CLASS, idx, data.name);
                    self.export_declaration(data.modifiers, name, symbol);
                }
                self.bind_class_like(idx, data, ContainerKind::Class);
            }
            Node::InterfaceDeclaration(data) => {
                if let Some(name) = arena.identifier_text(data.name) {
                    let scope = self.current_scope;
                    let symbol =
                        self.declare_symbol(scope, name, SymbolFlags::INTERFACE, idx, data.name);
                    self.export_declaration(data.modifiers, name, symbol);
                }
                self.bind_class_like(idx, data, ContainerKind::Signature);
            }
            Node::TypeAliasDeclaration {
                modifiers,
                name,
                type_parameters,
                type_node,
            } => {
                if let Some(text) = arena.identifier_text(*name) {
                    let scope = self.current_scope;
                    let symbol =
                        self.declare_symbol(scope, text, SymbolFlags::TYPE_ALIAS, idx, *name);
                    self.export_declaration(*modifiers, text, symbol);
                }
                self.enter_scope(ContainerKind::Signature, idx);
                self.bind_type_parameters(type_parameters.as_ref());
                self.bind_node(*type_node);
                self.exit_scope();
            }
            Node::PropertyDeclaration {
                name,
                type_annotation,
                initializer,
                ..
            } => {
                if let Some(text) = arena.property_name_text(*name) {
                    self.declare_member(text, SymbolFlags::PROPERTY, idx, *name);
                }
                self.bind_node(*type_annotation);
                self.bind_node(*initializer);
            }
            Node::PropertySignature {
                name,
                type_annotation,
                ..
            } => {
                if let Some(text) = arena.property_name_text(*name) {
                    self.declare_member(text, SymbolFlags::PROPERTY, idx, *name);
                }
                self.bind_node(*type_annotation);
            }
            Node::MethodSignature(sig) => {
                if let Some(text) = arena.property_name_text(sig.name) {
                    self.declare_member(text, SymbolFlags::METHOD, idx, sig.name);
                }
                self.bind_signature(
                    idx,
                    sig.type_parameters.as_ref(),
                    &sig.parameters,
                    sig.type_annotation,
                );
            }
            Node::CallSignature(sig) | Node::ConstructSignature(sig) => {
                self.bind_signature(
                    idx,
                    sig.type_parameters.as_ref(),
                    &sig.parameters,
                    sig.type_annotation,
                );
            }
            Node::FunctionType {
                type_parameters,
                parameters,
                type_annotation,
            } => {
                self.bind_signature(idx, type_parameters.as_ref(), parameters, *type_annotation);
            }
            Node::IndexSignature {
                parameters,
                type_annotation,
                ..
            } => {
                self.bind_signature(idx, None, parameters, *type_annotation);
            }
            Node::Block { statements } => {
                self.enter_scope(ContainerKind::Block, idx);
                for &statement in statements {
                    self.bind_node(statement);
                }
                self.exit_scope();
            }
            Node::For { .. } | Node::ForOf { .. } | Node::ForIn { .. } => {
                self.enter_scope(ContainerKind::For, idx);
                self.bind_children(idx);
                self.exit_scope();
            }
            Node::CatchClause {
                variable_declaration,
                block,
            } => {
                self.enter_scope(ContainerKind::Catch, idx);
                if let Some(Node::VariableDeclaration {
                    name,
                    type_annotation,
                    ..
                }) = arena.get(*variable_declaration)
                {
                    let scope = self.current_scope;
                    self.bind_binding_name(
                        scope,
                        *name,
                        SymbolFlags::BLOCK_SCOPED_VARIABLE,
                        *variable_declaration,
                        false,
                    );
                    self.bind_node(*type_annotation);
                }
                self.bind_node(*block);
                self.exit_scope();
            }
            Node::ImportDeclaration { .. } => self.bind_import_declaration(idx),
            Node::ExportDeclaration { .. } => self.bind_export_declaration(idx),
            Node::ExportAssignment { expression } => {
                if let Some(name) = arena.identifier_text(*expression) {
                    self.queue_local_export("default", name);
                }
                self.bind_node(*expression);
            }
            _ => self.bind_children(idx),
        }
    }

    fn bind_children(&mut self, idx: NodeIndex) {
        for child in self.unit().arena.children(idx) {
            self.bind_node(child);
        }
    }

    fn bind_variable_list(&mut self, list: NodeIndex, exported: bool) {
        let arena = &self.unit().arena;
        let Some(Node::VariableDeclarationList { kind, declarations }) = arena.get(list) else {
            return;
        };
        let (flags, scope) = match kind {
            VariableKind::Var => (SymbolFlags::FUNCTION_SCOPED_VARIABLE, self.function_scope()),
            VariableKind::Let => (SymbolFlags::BLOCK_SCOPED_VARIABLE, self.current_scope),
            VariableKind::Const => (
                SymbolFlags::BLOCK_SCOPED_VARIABLE | SymbolFlags::CONST,
                self.current_scope,
            ),
        };
        for &declaration in declarations {
            let Some(Node::VariableDeclaration {
                name,
                type_annotation,
                initializer,
            }) = arena.get(declaration)
            else {
                continue;
            };
            self.bind_binding_name(scope, *name, flags, declaration, exported);
            self.bind_node(*type_annotation);
            self.bind_node(*initializer);
        }
    }

    /// Declare every identifier bound by `name`, which is an identifier or a
    /// binding pattern.
    fn bind_binding_name(
        &mut self,
        scope: ScopeId,
        name: NodeIndex,
        flags: SymbolFlags,
        declaration: NodeIndex,
        exported: bool,
    ) {
        let arena = &self.unit().arena;
        match arena.get(name) {
            Some(Node::Identifier { text }) => {
                let symbol = self.declare_symbol(scope, text, flags, declaration, name);
                if exported {
                    self.export_symbol(text, symbol);
                }
            }
            Some(Node::ObjectBindingPattern { elements } | Node::ArrayBindingPattern { elements }) => {
                for &element in elements {
                    let Some(Node::BindingElement {
                        property_name,
                        name: element_name,
                        initializer,
                        ..
                    }) = arena.get(element)
                    else {
                        continue;
                    };
                    self.bind_node(*property_name);
                    self.bind_binding_name(scope, *element_name, flags, element, exported);
                    self.bind_node(*initializer);
                }
            }
            _ => {}
        }
    }

    fn bind_function_like(
        &mut self,
        idx: NodeIndex,
        func: &FunctionData,
        own_name: Option<NodeIndex>,
    ) {
        let arena = &self.unit().arena;
        self.enter_scope(ContainerKind::Function, idx);
        if let Some(name) = own_name
            && let Some(text) = arena.identifier_text(name)
        {
            let scope = self.current_scope;
            self.declare_symbol(scope, text, SymbolFlags::FUNCTION, idx, name);
        }
        self.bind_type_parameters(func.type_parameters.as_ref());
        self.bind_parameters(&func.parameters);
        self.bind_node(func.type_annotation);

        match arena.get(func.body) {
            // The body block shares the function scope with the parameters.
            Some(Node::Block { statements }) => {
                for &statement in statements {
                    self.bind_node(statement);
                }
            }
            Some(_) => self.bind_node(func.body),
            None => {}
        }
        self.exit_scope();
    }

    fn bind_class_like(&mut self, idx: NodeIndex, data: &ClassLikeData, kind: ContainerKind) {
        self.enter_scope(kind, idx);
        self.bind_type_parameters(data.type_parameters.as_ref());
        for &clause in &data.heritage_clauses {
            self.bind_node(clause);
        }
        for &member in &data.members {
            self.bind_node(member);
        }
        self.exit_scope();
    }

    fn bind_signature(
        &mut self,
        idx: NodeIndex,
        type_parameters: Option<&NodeList>,
        parameters: &NodeList,
        type_annotation: NodeIndex,
    ) {
        self.enter_scope(ContainerKind::Signature, idx);
        self.bind_type_parameters(type_parameters);
        self.bind_parameters(parameters);
        self.bind_node(type_annotation);
        self.exit_scope();
    }

    fn bind_type_parameters(&mut self, type_parameters: Option<&NodeList>) {
        let Some(list) = type_parameters else {
            return;
        };
        let arena = &self.unit().arena;
        for &parameter in list {
            let Some(Node::TypeParameter {
                name,
                constraint,
                default,
            }) = arena.get(parameter)
            else {
                continue;
            };
            if let Some(text) = arena.identifier_text(*name) {
                let scope = self.current_scope;
                self.declare_symbol(scope, text, SymbolFlags::TYPE_PARAMETER, parameter, *name);
            }
            self.bind_node(*constraint);
            self.bind_node(*default);
        }
    }

    fn bind_parameters(&mut self, parameters: &NodeList) {
        let arena = &self.unit().arena;
        for &parameter in parameters {
            let Some(Node::Parameter {
                name,
                type_annotation,
                initializer,
                ..
            }) = arena.get(parameter)
            else {
                continue;
            };
            let scope = self.current_scope;
            self.bind_binding_name(scope, *name, SymbolFlags::PARAMETER, parameter, false);
            self.bind_node(*type_annotation);
            self.bind_node(*initializer);
        }
    }

    /// Record an exported declaration; `export default` exports it as
    /// `default` as well.
    fn export_declaration(&mut self, modifiers: ModifierFlags, name: &str, symbol: SymbolId) {
        if !modifiers.contains(ModifierFlags::EXPORT) {
            return;
        }
        if modifiers.contains(ModifierFlags::DEFAULT) {
            self.export_symbol("default", symbol);
        } else {
            self.export_symbol(name, symbol);
        }
    }
}
