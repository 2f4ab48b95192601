use std::fmt::Write;

/// Double-quoted JavaScript string literal for a cooked string value.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            '\u{2028}' | '\u{2029}' => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c if (c as u32) < 0x20 || c == '\x7F' => {
                // Control characters as \u00NN
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::quote_string;

    #[test]
    fn test_quote_string_escapes() {
        assert_eq!(quote_string("a\"b"), r#""a\"b""#);
        assert_eq!(quote_string("line\nnext"), r#""line\nnext""#);
        assert_eq!(quote_string("\u{1}"), r#""\u0001""#);
        assert_eq!(quote_string("it's"), r#""it's""#);
    }
}
