//! HTML document construction.
//!
//! Walks a finished document tree with a [`NodeVisitor`] and serialises
//! it into an HTML document linked to the companion stylesheet. The
//! renderer reads the tree, never mutates it; CSS classes are registered
//! with the [`StylesheetBuilder`] as their attributes are encountered.

use crate::css::StylesheetBuilder;
use crate::error::{ConvertError, Result};
use crate::node::{Attribute, Node, NodeVisitor};
use crate::token::ElementType;

/// Spaces of indentation per tree depth.
const ELEMENT_INDENTATION: usize = 4;

/// Builds an HTML document, given a parsing tree.
#[derive(Debug, Default)]
pub struct HtmlBuilder;

impl HtmlBuilder {
    pub fn new() -> Self {
        HtmlBuilder
    }

    /// Serialises the tree rooted at a `DocStart` node.
    ///
    /// Writes the DOCTYPE, the `<head>` block linking `stylesheet_name`,
    /// and the `<body>` holding the rendered children. Also seeds the
    /// stylesheet with the default body rule.
    pub fn build_document(
        &self,
        root: &Node,
        stylesheet_name: &str,
        styles: &mut StylesheetBuilder,
    ) -> Result<String> {
        if root.element_type() != ElementType::DocStart {
            return Err(ConvertError::ShapeMismatch {
                expected: ElementType::DocStart,
                found: root.element_type(),
            });
        }
        styles.create_default_styling();

        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n");
        out.push_str("<head>\n");
        out.push_str(" <meta charset=\"utf-8\">\n");
        out.push_str(" <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
        out.push_str(&format!(
            " <link rel=\"stylesheet\" href=\"{}\">\n",
            stylesheet_name
        ));
        out.push_str("</head>\n");
        out.push_str("<body>\n");

        let mut renderer = HtmlRenderer {
            out: &mut out,
            styles,
            prev_content: false,
            prev_indent: 0,
        };
        if let Some(children) = root.children() {
            for child in children {
                child.accept(&mut renderer, 0)?;
            }
        }

        out.push_str("\n\n</body>\n");
        Ok(out)
    }
}

/// Visitor that writes HTML elements for the nodes it encounters.
///
/// Every new tag starts on its own line at four spaces per depth.
/// Consecutive content leaves at the same depth concatenate without any
/// whitespace between them.
struct HtmlRenderer<'a> {
    out: &'a mut String,
    styles: &'a mut StylesheetBuilder,
    prev_content: bool,
    prev_indent: usize,
}

impl HtmlRenderer<'_> {
    fn fill_in_indenting(&mut self, indent: usize) {
        for _ in 0..indent {
            self.out.push(' ');
        }
    }
}

impl NodeVisitor for HtmlRenderer<'_> {
    fn visit_element(
        &mut self,
        element: ElementType,
        attributes: &[Attribute],
        children: &[Node],
        indent: usize,
    ) -> Result<()> {
        self.prev_content = false;
        self.out.push('\n');
        self.fill_in_indenting(indent);
        self.out.push('<');
        self.out.push_str(element.tag_name());

        if element == ElementType::HorizontalLine {
            self.out.push_str("/>");
            return Ok(());
        }

        if !attributes.is_empty() {
            self.out.push_str(" class=\"");
            for (i, attribute) in attributes.iter().enumerate() {
                if i > 0 {
                    self.out.push(' ');
                }
                self.out.push_str(attribute.name());
                self.styles.add_attr_class(*attribute)?;
            }
            self.out.push('"');
        }
        self.out.push('>');

        let block_code =
            element == ElementType::Codeblock && attributes.first() == Some(&Attribute::Block);
        if block_code {
            self.out.push_str("<pre>");
        }

        for child in children {
            child.accept(self, indent + ELEMENT_INDENTATION)?;
        }

        self.out.push('\n');
        self.fill_in_indenting(indent);
        if block_code {
            self.out.push_str("</pre>");
        }
        self.out.push_str("</");
        self.out.push_str(element.tag_name());
        self.out.push('>');
        Ok(())
    }

    fn visit_content(&mut self, content: &str, indent: usize) -> Result<()> {
        if !self.prev_content || self.prev_indent != indent {
            self.prev_content = true;
            self.prev_indent = indent;
            self.out.push('\n');
            self.fill_in_indenting(indent);
        }
        self.out.push_str(content);
        Ok(())
    }

    fn visit_image(&mut self, src: &str, alt: &str, title: &str, indent: usize) -> Result<()> {
        self.prev_content = false;
        self.out.push('\n');
        self.fill_in_indenting(indent);
        self.out.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\" title=\"{}\" class=\"ImageAttr\"/>",
            src, alt, title
        ));
        self.styles.add_attr_class(Attribute::ImageAttr)
    }

    fn visit_hyperlink(
        &mut self,
        href: &str,
        displayed: &str,
        title: &str,
        indent: usize,
    ) -> Result<()> {
        self.prev_content = false;
        self.out.push('\n');
        self.fill_in_indenting(indent);
        self.out.push_str(&format!(
            "<a href=\"{}\" title=\"{}\">{}</a>",
            href, title, displayed
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(root: &Node) -> (String, String) {
        let mut styles = StylesheetBuilder::new();
        let html = HtmlBuilder::new()
            .build_document(root, "styles.css", &mut styles)
            .unwrap();
        (html, styles.finish())
    }

    #[test]
    fn test_document_skeleton() {
        let root = Node::element(ElementType::DocStart);
        let (html, css) = render(&root);
        assert!(html.starts_with("<!DOCTYPE html>\n<head>\n"));
        assert!(html.contains("<meta charset=\"utf-8\">"));
        assert!(html.contains("<link rel=\"stylesheet\" href=\"styles.css\">"));
        assert!(html.contains("<body>"));
        assert!(html.ends_with("</body>\n"));
        assert!(css.starts_with("body {"));
    }

    #[test]
    fn test_rejects_non_document_root() {
        let root = Node::element(ElementType::Paragraph);
        let mut styles = StylesheetBuilder::new();
        let err = HtmlBuilder::new()
            .build_document(&root, "styles.css", &mut styles)
            .unwrap_err();
        assert!(matches!(err, ConvertError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_element_with_attributes_and_content() {
        let mut root = Node::element(ElementType::DocStart);
        let mut heading = Node::element(ElementType::Header1);
        heading.push_attribute(Attribute::Bold);
        heading.push_attribute(Attribute::FontSize1);
        heading
            .children_mut()
            .unwrap()
            .push(Node::content("Hello".to_string()));
        root.children_mut().unwrap().push(heading);

        let (html, css) = render(&root);
        assert!(html.contains("<h1 class=\"Bold FontSize1\">"));
        assert!(html.contains("\n    Hello"));
        assert!(html.contains("</h1>"));
        assert!(css.contains(".Bold {"));
        assert!(css.contains(".FontSize1 {"));
    }

    #[test]
    fn test_horizontal_rule_is_self_closing() {
        let mut root = Node::element(ElementType::DocStart);
        root.children_mut()
            .unwrap()
            .push(Node::element(ElementType::HorizontalLine));
        let (html, _) = render(&root);
        assert!(html.contains("<hr/>"));
        assert!(!html.contains("</hr>"));
    }

    #[test]
    fn test_block_code_wraps_in_pre() {
        let mut root = Node::element(ElementType::DocStart);
        let mut code = Node::element(ElementType::Codeblock);
        code.push_attribute(Attribute::Block);
        code.children_mut()
            .unwrap()
            .push(Node::content("let x = 1;".to_string()));
        root.children_mut().unwrap().push(code);

        let (html, _) = render(&root);
        assert!(html.contains("<code class=\"Block\"><pre>"));
        assert!(html.contains("</pre></code>"));
    }

    #[test]
    fn test_image_renders_self_closing_with_class() {
        let mut root = Node::element(ElementType::DocStart);
        root.children_mut().unwrap().push(Node::Image {
            src: "u.png".to_string(),
            alt: "cap".to_string(),
            title: "t".to_string(),
        });

        let (html, css) = render(&root);
        assert!(
            html.contains("<img src=\"u.png\" alt=\"cap\" title=\"t\" class=\"ImageAttr\"/>")
        );
        assert!(css.contains(".ImageAttr {"));
    }

    #[test]
    fn test_hyperlink_renders_inline() {
        let mut root = Node::element(ElementType::DocStart);
        root.children_mut().unwrap().push(Node::Hyperlink {
            href: "https://example.com".to_string(),
            displayed: "example".to_string(),
            title: "t".to_string(),
        });

        let (html, _) = render(&root);
        assert!(
            html.contains("<a href=\"https://example.com\" title=\"t\">example</a>")
        );
    }

    #[test]
    fn test_adjacent_content_concatenates() {
        let mut root = Node::element(ElementType::DocStart);
        let mut para = Node::element(ElementType::Paragraph);
        para.children_mut()
            .unwrap()
            .push(Node::content("one".to_string()));
        para.children_mut()
            .unwrap()
            .push(Node::content("two".to_string()));
        root.children_mut().unwrap().push(para);

        let (html, _) = render(&root);
        assert!(html.contains("\n    onetwo\n"));
    }
}
