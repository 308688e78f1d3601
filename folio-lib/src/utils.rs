/// Escape text for use as HTML element content
pub(crate) fn escape_text(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Escape text for use inside a double-quoted attribute value
pub(crate) fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

/// Indent every non-empty line of a rendered fragment
pub(crate) fn indent(fragment: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    let mut result = String::with_capacity(fragment.len() + spaces * 8);
    for line in fragment.lines() {
        if !line.is_empty() {
            result.push_str(&pad);
            result.push_str(line);
        }
        result.push('\n');
    }
    result
}
