// Core modules
pub mod css;
pub mod error;
pub mod html;
pub mod node;
pub mod parser;
pub mod token;
pub mod tree;

// Re-export key types for the public API
pub use css::StylesheetBuilder;
pub use error::{ConvertError, Result};
pub use html::HtmlBuilder;
pub use node::{Attribute, Node, NodeVisitor};
pub use parser::parse_document;
pub use token::{ElementType, Token, TokenKind};
pub use tree::TreeBuilder;

/// The pair of artifacts one conversion produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub html: String,
    pub stylesheet: String,
}

/// Converts a Markdown document into an HTML document plus its companion
/// stylesheet.
///
/// This is the main entry point. It orchestrates the complete pipeline:
/// 1. **Tokenization:** drive the state machine over the character stream
/// 2. **Tree building:** assemble the document tree from the tokens
/// 3. **Rendering:** serialise the tree to HTML, collecting CSS classes
///
/// `stylesheet_name` is the file name the HTML document links to.
///
/// # Examples
///
/// ```
/// let document = mdforge::convert("# Hello\n", "styles.css").unwrap();
/// assert!(document.html.contains("<h1 class=\"Bold FontSize1\">"));
/// assert!(document.stylesheet.contains(".Bold {"));
/// ```
pub fn convert(markdown: &str, stylesheet_name: &str) -> Result<RenderedDocument> {
    let root = parser::parse_document(markdown)?;
    log::info!(target: "mdforge", "document tree:\n{}", root.outline());

    let mut styles = StylesheetBuilder::new();
    let html = HtmlBuilder::new().build_document(&root, stylesheet_name, &mut styles)?;

    Ok(RenderedDocument {
        html,
        stylesheet: styles.finish(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        let document = convert("# Hello\n", "styles.css").unwrap();
        assert!(document.html.contains("Hello"));
        assert!(document.html.starts_with("<!DOCTYPE html>"));
        assert!(document.stylesheet.contains(".FontSize1 {"));
    }

    #[test]
    fn test_parse_document_returns_doc_root() {
        let root = parse_document("plain text\n").unwrap();
        assert_eq!(root.element_type(), ElementType::DocStart);
        assert_eq!(root.text_content(), "plain text");
    }

    #[test]
    fn test_convert_various_inputs() {
        // emphasis inside a paragraph
        let document = convert("This is **bold** and *italic* text.\n", "styles.css").unwrap();
        assert!(document.html.contains("bold"));
        assert!(document.html.contains("italic"));
        assert!(document.stylesheet.contains(".Bold {"));
        assert!(document.stylesheet.contains(".Italic {"));

        // unordered list
        let document = convert("- Item 1\n- Item 2\n", "styles.css").unwrap();
        assert!(document.html.contains("<ul>"));
        assert!(document.html.contains("Item 1"));
        assert!(document.html.contains("Item 2"));

        // hyperlink
        let document = convert("[text](https://example.com)\n", "styles.css").unwrap();
        assert!(document.html.contains("href=\"https://example.com\""));
        assert!(document.html.contains(">text</a>"));

        // blockquote
        let document = convert("> a quote\n", "styles.css").unwrap();
        assert!(document.html.contains("class=\"BlockQuote\""));
        assert!(document.html.contains("a quote"));

        // empty input still yields a complete document
        let document = convert("", "styles.css").unwrap();
        assert!(document.html.starts_with("<!DOCTYPE html>"));
        assert!(document.html.contains("</body>"));
    }

    #[test]
    fn test_stylesheet_name_is_linked() {
        let document = convert("x\n", "custom.css").unwrap();
        assert!(document
            .html
            .contains("<link rel=\"stylesheet\" href=\"custom.css\">"));
    }

    #[test]
    fn test_robust_inputs_do_not_error() {
        let inputs = [
            "Text with **unclosed emphasis\n",
            "[link with missing](\n",
            "```\nunclosed code block\n",
            "####### overlong heading\n",
            "|half| a table\n",
        ];
        for input in inputs {
            let document = convert(input, "styles.css").unwrap();
            assert!(!document.html.is_empty());
        }
    }
}
