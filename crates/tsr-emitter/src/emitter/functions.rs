use super::Printer;
use tsr_parser::{FunctionData, ModifierFlags, Node, NodeIndex, NodeList, SignatureData};

impl<'a> Printer<'a> {
    // =========================================================================
    // Functions
    // =========================================================================

    pub(super) fn emit_function_declaration(&mut self, func: &FunctionData) {
        self.emit_modifiers(func.modifiers);
        self.write("function");
        if func.asterisk {
            self.write("*");
        }
        if func.name.is_some() {
            self.write(" ");
            self.emit(func.name);
        }
        self.emit_signature_parts(func.type_parameters.as_ref(), &func.parameters, func.type_annotation);
        self.emit_function_body(func.body, &[]);
    }

    pub(super) fn emit_function_expression(&mut self, func: &FunctionData) {
        if func.modifiers.contains(ModifierFlags::ASYNC) {
            self.write("async ");
        }
        self.write("function");
        if func.asterisk {
            self.write("*");
        }
        if func.name.is_some() {
            self.write(" ");
            self.emit(func.name);
        }
        self.emit_signature_parts(func.type_parameters.as_ref(), &func.parameters, func.type_annotation);
        self.emit_function_body(func.body, &[]);
    }

    pub(super) fn emit_arrow_function(&mut self, func: &FunctionData) {
        if func.modifiers.contains(ModifierFlags::ASYNC) {
            self.write("async ");
        }
        self.emit_signature_parts(func.type_parameters.as_ref(), &func.parameters, func.type_annotation);
        self.write(" =>");
        match self.arena.get(func.body) {
            Some(Node::Block { .. }) => self.emit_function_body(func.body, &[]),
            // A concise object body needs parentheses to not read as a block
            Some(Node::ObjectLiteral { .. }) => {
                self.write(" (");
                self.emit(func.body);
                self.write(")");
            }
            _ => {
                self.write(" ");
                self.emit(func.body);
            }
        }
    }

    /// Methods, constructors and accessors, in classes and object literals.
    pub(super) fn emit_method_like(&mut self, node: &Node, func: &FunctionData) {
        self.emit_member_modifiers(func.modifiers);
        if func.modifiers.contains(ModifierFlags::ASYNC) {
            self.write("async ");
        }
        match node {
            Node::GetAccessor(_) => self.write("get "),
            Node::SetAccessor(_) => self.write("set "),
            _ => {}
        }
        if func.asterisk {
            self.write("*");
        }
        if matches!(node, Node::Constructor(_)) {
            self.write("constructor");
        } else {
            self.emit(func.name);
        }
        if func.question && !self.strip_types() {
            self.write("?");
        }
        self.emit_signature_parts(func.type_parameters.as_ref(), &func.parameters, func.type_annotation);

        let parameter_properties = if matches!(node, Node::Constructor(_)) && self.strip_types() {
            self.parameter_property_names(&func.parameters)
        } else {
            Vec::new()
        };
        self.emit_function_body(func.body, &parameter_properties);
    }

    /// Tail of method, call and construct signatures.
    pub(super) fn emit_signature_rest(&mut self, sig: &SignatureData) {
        self.emit_signature_parts(sig.type_parameters.as_ref(), &sig.parameters, sig.type_annotation);
    }

    fn emit_signature_parts(
        &mut self,
        type_parameters: Option<&NodeList>,
        parameters: &NodeList,
        type_annotation: NodeIndex,
    ) {
        self.emit_type_parameters(type_parameters);
        self.write("(");
        self.emit_comma_list(parameters);
        self.write(")");
        self.emit_type_annotation(type_annotation);
    }

    /// ` { ... }`, or `;` for a signature without a body.
    ///
    /// `parameter_properties` are assigned to `this` at the start of the
    /// body, after a leading `super(...)` call.
    fn emit_function_body(&mut self, body: NodeIndex, parameter_properties: &[String]) {
        let Some(Node::Block { statements }) = self.arena.get(body) else {
            self.write(";");
            return;
        };
        self.write(" ");
        if parameter_properties.is_empty() {
            self.emit_block(statements);
            return;
        }

        let (leading, rest) = match statements.nodes.split_first() {
            Some((&first, rest)) if self.is_super_call_statement(first) => (Some(first), rest),
            _ => (None, statements.nodes.as_slice()),
        };
        self.write("{");
        self.write_line();
        self.increase_indent();
        if let Some(first) = leading {
            self.emit(first);
            self.write_line();
        }
        for name in parameter_properties {
            self.write("this.");
            self.write(name);
            self.write(" = ");
            self.write(name);
            self.write_semicolon_line();
        }
        self.emit_statement_list(&NodeList::from_vec(rest.to_vec()));
        self.decrease_indent();
        self.write("}");
    }

    fn parameter_property_names(&self, parameters: &NodeList) -> Vec<String> {
        let property_modifiers = ModifierFlags::PUBLIC
            | ModifierFlags::PRIVATE
            | ModifierFlags::PROTECTED
            | ModifierFlags::READONLY;
        parameters
            .iter()
            .filter_map(|&param| match self.arena.get(param) {
                Some(Node::Parameter {
                    modifiers, name, ..
                }) if modifiers.intersects(property_modifiers) => {
                    self.arena.identifier_text(*name).map(str::to_string)
                }
                _ => None,
            })
            .collect()
    }

    fn is_super_call_statement(&self, stmt: NodeIndex) -> bool {
        let Some(Node::ExpressionStatement { expression }) = self.arena.get(stmt) else {
            return false;
        };
        matches!(
            self.arena.get(*expression),
            Some(Node::Call { expression, .. })
                if matches!(self.arena.get(*expression), Some(Node::SuperExpression))
        )
    }
}
