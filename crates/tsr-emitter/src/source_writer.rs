//! Indentation-aware output buffer.

#[derive(Debug, Default)]
pub struct SourceWriter {
    output: String,
    indent: u32,
    indent_unit: String,
    at_line_start: bool,
}

impl SourceWriter {
    pub fn new(indent_width: usize) -> SourceWriter {
        SourceWriter {
            output: String::new(),
            indent: 0,
            indent_unit: " ".repeat(indent_width),
            at_line_start: true,
        }
    }

    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.at_line_start {
            for _ in 0..self.indent {
                self.output.push_str(&self.indent_unit);
            }
            self.at_line_start = false;
        }
        self.output.push_str(text);
    }

    pub fn write_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.write(ch.encode_utf8(&mut buf));
    }

    /// End the current line. Consecutive calls do not produce blank lines.
    pub fn write_line(&mut self) {
        if !self.at_line_start {
            self.output.push('\n');
            self.at_line_start = true;
        }
    }

    pub fn increase_indent(&mut self) {
        self.indent += 1;
    }

    pub fn decrease_indent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    pub fn is_at_line_start(&self) -> bool {
        self.at_line_start
    }

    pub fn into_string(mut self) -> String {
        self.write_line();
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation_applies_at_line_start_only() {
        let mut writer = SourceWriter::new(4);
        writer.write("{");
        writer.write_line();
        writer.increase_indent();
        writer.write("a;");
        writer.write(" b;");
        writer.write_line();
        writer.decrease_indent();
        writer.write("}");
        assert_eq!(writer.into_string(), "{\n    a; b;\n}\n");
    }

    #[test]
    fn test_repeated_line_breaks_collapse() {
        let mut writer = SourceWriter::new(2);
        writer.write("x");
        writer.write_line();
        writer.write_line();
        writer.write("y");
        assert_eq!(writer.into_string(), "x\ny\n");
    }
}
