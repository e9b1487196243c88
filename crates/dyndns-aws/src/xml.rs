//! Minimal XML helpers for the Route 53 REST API
//!
//! Route 53 responses are small, flat and attribute-free below the root, so
//! elements are located by plain string search. Nested elements with the
//! same name as their parent are not supported.

/// Inner text of every `<tag>...</tag>` element, in document order
pub fn elements<'a>(doc: &'a str, tag: &str) -> Vec<&'a str> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);

    let mut found = Vec::new();
    let mut rest = doc;
    while let Some(start) = rest.find(&open) {
        let body = &rest[start + open.len()..];
        let Some(end) = body.find(&close) else {
            break;
        };
        found.push(&body[..end]);
        rest = &body[end + close.len()..];
    }
    found
}

/// Inner text of the first `<tag>...</tag>` element
pub fn element<'a>(doc: &'a str, tag: &str) -> Option<&'a str> {
    elements(doc, tag).into_iter().next()
}

/// Inner text of the first `<tag>` element, unescaped
pub fn text(doc: &str, tag: &str) -> Option<String> {
    element(doc, tag).map(unescape)
}

/// Escape text for use inside an element
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Reverse [`escape`] for the five predefined entities
pub fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
