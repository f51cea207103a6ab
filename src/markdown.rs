//! Markdown to HTML conversion for bot replies and escaping for literal text

use pulldown_cmark::{Options, Parser, html};

/// Markdown options matching GitHub-flavoured rendering
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

/// Render Markdown source to an HTML fragment.
///
/// Raw HTML inside the source is passed through: replies come from the
/// configured backend and are trusted.
pub fn to_html(source: &str) -> String {
    let parser = Parser::new_ext(source, markdown_options());
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Escape text so it displays literally inside HTML element content or a
/// quoted attribute value.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_and_code_spans() {
        let html = to_html("Hi **there**, run `cargo`");
        assert!(html.contains("<strong>there</strong>"));
        assert!(html.contains("<code>cargo</code>"));
    }

    #[test]
    fn test_headings_lists_and_links() {
        let html = to_html("# Title\n\n- one\n- two\n\n[docs](https://example.com)");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<li>one</li>"));
        assert!(html.contains(r#"<a href="https://example.com">docs</a>"#));
    }

    #[test]
    fn test_gfm_extensions() {
        let html = to_html("~~old~~\n\n| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<del>old</del>"));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_escape_text_neutralises_markup() {
        let escaped = escape_text(r#"<img src=x onerror="alert(1)">"#);
        assert_eq!(escaped, "&lt;img src=x onerror=&quot;alert(1)&quot;&gt;");
        assert_eq!(escape_text("fish & chips"), "fish &amp; chips");
    }
}
