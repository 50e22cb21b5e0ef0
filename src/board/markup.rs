/// Replace `&`, `<`, `>`, `"` and `'` with their HTML entities.
///
/// Every dynamic string that ends up in board markup goes through here, both
/// as element text and as attribute values. It is not a sanitizer.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}
