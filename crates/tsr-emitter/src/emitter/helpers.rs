use super::Printer;
use tsr_parser::{ModifierFlags, Node, NodeIndex, NodeList};
use tsr_scanner::{SyntaxKind, token_to_text};

/// Modifiers that survive type stripping.
const JS_MODIFIERS: ModifierFlags = ModifierFlags::EXPORT
    .union(ModifierFlags::DEFAULT)
    .union(ModifierFlags::STATIC)
    .union(ModifierFlags::ASYNC);

impl<'a> Printer<'a> {
    // =========================================================================
    // Output Helpers (delegate to SourceWriter)
    // =========================================================================

    pub(super) fn write(&mut self, text: &str) {
        self.writer.write(text);
    }

    pub(super) fn write_line(&mut self) {
        self.writer.write_line();
    }

    pub(super) fn write_semicolon_line(&mut self) {
        self.writer.write(";");
        self.writer.write_line();
    }

    pub(super) fn write_token(&mut self, kind: SyntaxKind) {
        if let Some(text) = token_to_text(kind) {
            self.writer.write(text);
        }
    }

    pub(super) fn increase_indent(&mut self) {
        self.writer.increase_indent();
    }

    pub(super) fn decrease_indent(&mut self) {
        self.writer.decrease_indent();
    }

    // =========================================================================
    // Emitter Helpers
    // =========================================================================

    pub(super) fn emit_comma_list(&mut self, nodes: &NodeList) {
        let mut first = true;
        for &idx in nodes {
            if !self.is_emitted(idx) {
                continue;
            }
            if !first {
                self.write(", ");
            }
            first = false;
            self.emit(idx);
        }
    }

    /// Statement-level modifiers followed by a space.
    pub(super) fn emit_modifiers(&mut self, modifiers: ModifierFlags) {
        let modifiers = if self.strip_types() {
            modifiers & JS_MODIFIERS
        } else {
            modifiers
        };
        for keyword in modifiers.keywords() {
            self.write(keyword);
            self.write(" ");
        }
    }

    /// Class member and parameter modifiers. `async` is printed by the
    /// function emitters.
    pub(super) fn emit_member_modifiers(&mut self, modifiers: ModifierFlags) {
        self.emit_modifiers(modifiers - ModifierFlags::ASYNC);
    }

    pub(super) fn emit_type_annotation(&mut self, type_node: NodeIndex) {
        if type_node.is_some() && !self.strip_types() {
            self.write(": ");
            self.emit(type_node);
        }
    }

    pub(super) fn emit_initializer(&mut self, initializer: NodeIndex) {
        if initializer.is_some() {
            self.write(" = ");
            self.emit(initializer);
        }
    }

    pub(super) fn emit_type_parameters(&mut self, parameters: Option<&NodeList>) {
        if self.strip_types() {
            return;
        }
        if let Some(parameters) = parameters {
            self.write("<");
            self.emit_comma_list(parameters);
            self.write(">");
        }
    }

    pub(super) fn emit_type_arguments(&mut self, arguments: Option<&NodeList>) {
        self.emit_type_parameters(arguments);
    }

    /// Whether `idx` produces output. Everything is emitted when printing
    /// TypeScript; JavaScript output drops type-only constructs.
    pub(crate) fn is_emitted(&self, idx: NodeIndex) -> bool {
        if !self.strip_types() {
            return true;
        }
        let Some(node) = self.arena.get(idx) else {
            return false;
        };
        match node {
            Node::InterfaceDeclaration(_)
            | Node::TypeAliasDeclaration { .. }
            | Node::IndexSignature { .. } => false,
            Node::VariableStatement { modifiers, .. } => !modifiers.contains(ModifierFlags::DECLARE),
            Node::ClassDeclaration(data) => !data.modifiers.contains(ModifierFlags::DECLARE),
            Node::FunctionDeclaration(func)
            | Node::MethodDeclaration(func)
            | Node::Constructor(func)
            | Node::GetAccessor(func)
            | Node::SetAccessor(func) => {
                func.body.is_some()
                    && !func
                        .modifiers
                        .intersects(ModifierFlags::DECLARE | ModifierFlags::ABSTRACT)
            }
            Node::PropertyDeclaration {
                modifiers,
                initializer,
                ..
            } => {
                initializer.is_some()
                    && !modifiers.intersects(ModifierFlags::DECLARE | ModifierFlags::ABSTRACT)
            }
            Node::Parameter { name, .. } => self.arena.identifier_text(*name) != Some("this"),
            _ => true,
        }
    }
}
