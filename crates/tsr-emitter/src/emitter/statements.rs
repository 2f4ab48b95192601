use super::Printer;
use tsr_parser::{Node, NodeIndex, NodeList};

impl<'a> Printer<'a> {
    // =========================================================================
    // Statement lists and blocks
    // =========================================================================

    pub(super) fn emit_statement_list(&mut self, statements: &NodeList) {
        for &stmt in statements {
            if !self.is_emitted(stmt) {
                continue;
            }
            self.emit(stmt);
            self.write_line();
        }
    }

    fn has_emitted_statements(&self, statements: &NodeList) -> bool {
        statements.iter().any(|&stmt| {
            if !self.is_emitted(stmt) {
                return false;
            }
            match self.arena.get(stmt) {
                Some(Node::StatementGroup { statements }) => self.has_emitted_statements(statements),
                Some(_) => true,
                None => false,
            }
        })
    }

    /// `{ ... }`, leaving the line open after the closing brace.
    pub(super) fn emit_block(&mut self, statements: &NodeList) {
        if !self.has_emitted_statements(statements) {
            self.write("{ }");
            return;
        }
        self.write("{");
        self.write_line();
        self.increase_indent();
        self.emit_statement_list(statements);
        self.decrease_indent();
        self.write("}");
    }

    /// Body of `if`/`while`/`for`: blocks stay on the header line, other
    /// statements go on their own indented line.
    pub(super) fn emit_embedded_statement(&mut self, stmt: NodeIndex) {
        match self.arena.get(stmt) {
            Some(Node::Block { statements }) | Some(Node::StatementGroup { statements }) => {
                self.write(" ");
                self.emit_block(statements);
            }
            _ => {
                self.write_line();
                self.increase_indent();
                self.emit(stmt);
                self.write_line();
                self.decrease_indent();
            }
        }
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    pub(super) fn emit_if(
        &mut self,
        condition: NodeIndex,
        then_statement: NodeIndex,
        else_statement: NodeIndex,
    ) {
        self.write("if (");
        self.emit(condition);
        self.write(")");
        self.emit_embedded_statement(then_statement);
        if else_statement.is_none() {
            return;
        }
        if !self.writer.is_at_line_start() {
            self.write(" ");
        }
        self.write("else");
        if matches!(self.arena.get(else_statement), Some(Node::If { .. })) {
            self.write(" ");
            self.emit(else_statement);
        } else {
            self.emit_embedded_statement(else_statement);
        }
    }

    pub(super) fn emit_for(
        &mut self,
        initializer: NodeIndex,
        condition: NodeIndex,
        incrementor: NodeIndex,
        body: NodeIndex,
    ) {
        self.write("for (");
        self.emit(initializer);
        self.write(";");
        if condition.is_some() {
            self.write(" ");
            self.emit(condition);
        }
        self.write(";");
        if incrementor.is_some() {
            self.write(" ");
            self.emit(incrementor);
        }
        self.write(")");
        self.emit_embedded_statement(body);
    }

    pub(super) fn emit_for_in_or_of(
        &mut self,
        keyword: &str,
        initializer: NodeIndex,
        expression: NodeIndex,
        body: NodeIndex,
    ) {
        self.write("for (");
        self.emit(initializer);
        self.write(" ");
        self.write(keyword);
        self.write(" ");
        self.emit(expression);
        self.write(")");
        self.emit_embedded_statement(body);
    }

    pub(super) fn emit_switch(&mut self, expression: NodeIndex, clauses: &NodeList) {
        self.write("switch (");
        self.emit(expression);
        self.write(") {");
        self.write_line();
        self.increase_indent();
        for &clause in clauses {
            self.emit(clause);
            self.write_line();
        }
        self.decrease_indent();
        self.write("}");
    }

    pub(super) fn emit_clause_body(&mut self, statements: &NodeList) {
        if let [single] = statements.nodes.as_slice()
            && let Some(Node::Block { statements }) = self.arena.get(*single)
        {
            self.write(" ");
            self.emit_block(statements);
            return;
        }
        self.write_line();
        self.increase_indent();
        self.emit_statement_list(statements);
        self.decrease_indent();
    }

    pub(super) fn emit_try(
        &mut self,
        try_block: NodeIndex,
        catch_clause: NodeIndex,
        finally_block: NodeIndex,
    ) {
        self.write("try ");
        self.emit(try_block);
        if catch_clause.is_some() {
            self.write(" ");
            self.emit(catch_clause);
        }
        if finally_block.is_some() {
            self.write(" finally ");
            self.emit(finally_block);
        }
    }
}
