use super::Printer;
use tsr_parser::{ClassLikeData, Node, NodeIndex, NodeList};
use tsr_scanner::SyntaxKind;

impl<'a> Printer<'a> {
    // =========================================================================
    // Classes and interfaces
    // =========================================================================

    pub(super) fn emit_class_declaration(&mut self, data: &ClassLikeData) {
        self.emit_modifiers(data.modifiers);
        self.write("class");
        if data.name.is_some() {
            self.write(" ");
            self.emit(data.name);
        }
        self.emit_type_parameters(data.type_parameters.as_ref());
        self.emit_heritage_clauses(&data.heritage_clauses);
        self.write(" ");

        let members: Vec<NodeIndex> = data
            .members
            .iter()
            .copied()
            .filter(|&member| self.is_emitted(member))
            .collect();
        if members.is_empty() {
            self.write("{ }");
            return;
        }
        self.write("{");
        self.write_line();
        self.increase_indent();
        for member in members {
            self.emit(member);
            if matches!(self.arena.get(member), Some(Node::IndexSignature { .. })) {
                self.write(";");
            }
            self.write_line();
        }
        self.decrease_indent();
        self.write("}");
    }

    pub(super) fn emit_interface_declaration(&mut self, data: &ClassLikeData) {
        self.emit_modifiers(data.modifiers);
        self.write("interface ");
        self.emit(data.name);
        self.emit_type_parameters(data.type_parameters.as_ref());
        self.emit_heritage_clauses(&data.heritage_clauses);
        self.write(" ");
        if data.members.is_empty() {
            self.write("{ }");
            return;
        }
        self.write("{");
        self.write_line();
        self.increase_indent();
        for &member in &data.members {
            self.emit(member);
            self.write_semicolon_line();
        }
        self.decrease_indent();
        self.write("}");
    }

    fn emit_heritage_clauses(&mut self, clauses: &NodeList) {
        for &clause in clauses {
            if self.strip_types()
                && matches!(
                    self.arena.get(clause),
                    Some(Node::HeritageClause {
                        token: SyntaxKind::ImplementsKeyword,
                        ..
                    })
                )
            {
                continue;
            }
            self.write(" ");
            self.emit(clause);
        }
    }

    // =========================================================================
    // Modules
    // =========================================================================

    pub(super) fn emit_import_declaration(&mut self, import_clause: NodeIndex, module_specifier: NodeIndex) {
        self.write("import ");
        if import_clause.is_some() {
            self.emit(import_clause);
            self.write(" from ");
        }
        self.emit(module_specifier);
        self.write_semicolon_line();
    }
}
