use super::Printer;
use tsr_parser::{Node, NodeIndex, NodeList};

impl<'a> Printer<'a> {
    // =========================================================================
    // Type nodes
    // =========================================================================

    pub(super) fn emit_type_node(&mut self, node: &Node) {
        match node {
            Node::KeywordType { keyword } => self.write_token(*keyword),
            Node::TypeReference {
                type_name,
                type_arguments,
            } => {
                self.emit(*type_name);
                self.emit_type_arguments(type_arguments.as_ref());
            }
            Node::ArrayType { element_type } => {
                let needs_parens = matches!(
                    self.arena.get(*element_type),
                    Some(
                        Node::UnionType { .. }
                            | Node::IntersectionType { .. }
                            | Node::FunctionType { .. }
                            | Node::TypeOperator { .. }
                    )
                );
                if needs_parens {
                    self.write("(");
                }
                self.emit(*element_type);
                if needs_parens {
                    self.write(")");
                }
                self.write("[]");
            }
            Node::TupleType { elements } => {
                self.write("[");
                self.emit_comma_list(elements);
                self.write("]");
            }
            Node::UnionType { types } => self.emit_type_list(types, " | "),
            Node::IntersectionType { types } => self.emit_type_list(types, " & "),
            Node::TypeLiteral { members } => {
                if members.is_empty() {
                    self.write("{}");
                    return;
                }
                self.write("{ ");
                for (i, &member) in members.iter().enumerate() {
                    if i > 0 {
                        self.write("; ");
                    }
                    self.emit(member);
                }
                self.write(" }");
            }
            Node::FunctionType {
                type_parameters,
                parameters,
                type_annotation,
            } => {
                self.emit_type_parameters(type_parameters.as_ref());
                self.write("(");
                self.emit_comma_list(parameters);
                self.write(") => ");
                self.emit(*type_annotation);
            }
            Node::ParenthesizedType { type_node } => {
                self.write("(");
                self.emit(*type_node);
                self.write(")");
            }
            Node::LiteralType { literal } => self.emit(*literal),
            Node::TypeQuery { expr_name } => {
                self.write("typeof ");
                self.emit(*expr_name);
            }
            Node::TypeOperator {
                operator,
                type_node,
            } => {
                self.write_token(*operator);
                self.write(" ");
                self.emit(*type_node);
            }
            _ => {}
        }
    }

    fn emit_type_list(&mut self, types: &NodeList, separator: &str) {
        for (i, &ty) in types.iter().enumerate() {
            if i > 0 {
                self.write(separator);
            }
            self.emit_constituent(ty);
        }
    }

    /// Function types inside unions and intersections are parenthesized.
    fn emit_constituent(&mut self, ty: NodeIndex) {
        if matches!(self.arena.get(ty), Some(Node::FunctionType { .. })) {
            self.write("(");
            self.emit(ty);
            self.write(")");
        } else {
            self.emit(ty);
        }
    }
}
