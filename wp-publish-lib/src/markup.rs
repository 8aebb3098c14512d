//! Conversion of the Markdown body into what WordPress stores as content.

use pulldown_cmark::{html, Options, Parser};

/// Output dialect for the post body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarkupConverter {
    /// CommonMark rendered to HTML, with tables and strikethrough.
    #[default]
    Html,
    /// The body is sent untouched.
    Raw,
}

impl MarkupConverter {
    pub fn convert(self, markdown: &str) -> String {
        match self {
            MarkupConverter::Html => markdown_to_html(markdown),
            MarkupConverter::Raw => markdown.to_string(),
        }
    }
}

pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut body_html = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut body_html, parser);
    body_html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_headings_and_paragraphs() {
        let html = MarkupConverter::Html.convert("# Title\n\nSome *emphasis*.\n");
        assert_eq!(html, "<h1>Title</h1>\n<p>Some <em>emphasis</em>.</p>\n");
    }

    #[test]
    fn renders_fenced_code_with_language() {
        let html = MarkupConverter::Html.convert("```rust\nfn main() {}\n```\n");
        assert_eq!(
            html,
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n"
        );
    }

    #[test]
    fn renders_tables() {
        let html = MarkupConverter::Html.convert("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<th>a</th>"));
        assert!(html.contains("<td>2</td>"));
    }

    #[test]
    fn renders_strikethrough() {
        let html = MarkupConverter::Html.convert("~~gone~~\n");
        assert_eq!(html, "<p><del>gone</del></p>\n");
    }

    #[test]
    fn raw_passes_text_through() {
        let body = "# Title\n\n| not | converted |\n";
        assert_eq!(MarkupConverter::Raw.convert(body), body);
    }
}
