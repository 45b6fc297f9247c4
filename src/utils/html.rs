use std::collections::HashSet;

/// Strips every HTML tag from a free-text field, keeping only the text.
///
/// Student profile values end up in PDF reports and admin views; nothing in
/// them is meant to be markup. The result is plain text, not HTML: characters
/// such as `&` and `<` come back as typed.
pub fn strip_html(input: &str) -> String {
    let mut builder = ammonia::Builder::empty();
    builder.clean_content_tags(HashSet::from(["script", "style"]));
    decode_text_entities(&builder.clean(input).to_string())
}

/// Reverses the escaping applied to text nodes when the cleaned tree is
/// serialized. `&amp;` goes last so `&amp;lt;` decodes to `&lt;`.
fn decode_text_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
