use crate::error::Result;
use crate::token::ElementType;

/// CSS-backed decorations attached to tree nodes.
///
/// Every attribute used anywhere in a document produces exactly one class
/// block in the companion stylesheet; the class name is [`Attribute::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Bold,
    Italic,
    FontSize1,
    FontSize2,
    FontSize3,
    FontSize4,
    FontSize5,
    FontSize6,
    Inline,
    Block,
    BlockQuote,
    TableStyle,
    TableHeader,
    TableRow,
    TableCell,
    ImageAttr,
}

impl Attribute {
    /// The CSS class name this attribute renders as.
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Bold => "Bold",
            Attribute::Italic => "Italic",
            Attribute::FontSize1 => "FontSize1",
            Attribute::FontSize2 => "FontSize2",
            Attribute::FontSize3 => "FontSize3",
            Attribute::FontSize4 => "FontSize4",
            Attribute::FontSize5 => "FontSize5",
            Attribute::FontSize6 => "FontSize6",
            Attribute::Inline => "Inline",
            Attribute::Block => "Block",
            Attribute::BlockQuote => "BlockQuote",
            Attribute::TableStyle => "TableStyle",
            Attribute::TableHeader => "TableHeader",
            Attribute::TableRow => "TableRow",
            Attribute::TableCell => "TableCell",
            Attribute::ImageAttr => "ImageAttr",
        }
    }

    /// Font-size attribute matching a heading level between 1 and 6.
    pub fn font_size(level: u8) -> Attribute {
        match level {
            0 | 1 => Attribute::FontSize1,
            2 => Attribute::FontSize2,
            3 => Attribute::FontSize3,
            4 => Attribute::FontSize4,
            5 => Attribute::FontSize5,
            _ => Attribute::FontSize6,
        }
    }
}

/// A node in the document tree.
///
/// Different kinds of nodes carry different payloads, hence a sum type.
/// Element nodes own their children exclusively; the leaf variants hold
/// none. Parent links are not stored — the builders keep an explicit
/// cursor path of child indices instead, so the tree stays acyclic and
/// single-owner throughout construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Generic block or span element.
    Element {
        element: ElementType,
        attributes: Vec<Attribute>,
        children: Vec<Node>,
    },
    /// Textual content leaf.
    Content { content: String },
    /// Image leaf.
    Image {
        src: String,
        alt: String,
        title: String,
    },
    /// Hyperlink; a leaf in the finished tree, though the cursor descends
    /// into it between its open and close tokens.
    Hyperlink {
        href: String,
        displayed: String,
        title: String,
    },
}

impl Node {
    /// An element node with no attributes or children yet.
    pub fn element(element: ElementType) -> Node {
        Node::Element {
            element,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A content leaf.
    pub fn content(content: String) -> Node {
        Node::Content { content }
    }

    /// The element type of this node; leaves report their fixed type.
    pub fn element_type(&self) -> ElementType {
        match self {
            Node::Element { element, .. } => *element,
            Node::Content { .. } => ElementType::Content,
            Node::Image { .. } => ElementType::Image,
            Node::Hyperlink { .. } => ElementType::Hyperlink,
        }
    }

    /// Children of an element node, or `None` for leaves.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Element { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Mutable children of an element node, or `None` for leaves.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Element { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Attributes of an element node; leaves have none.
    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Node::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Appends an attribute to an element node. Returns whether the node
    /// could carry it; pushing onto a leaf is a builder-level fault.
    pub fn push_attribute(&mut self, attribute: Attribute) -> bool {
        match self {
            Node::Element { attributes, .. } => {
                attributes.push(attribute);
                true
            }
            _ => false,
        }
    }

    /// Removes and returns the last child of an element node.
    pub fn remove_last_child(&mut self) -> Option<Node> {
        self.children_mut().and_then(|children| children.pop())
    }

    /// Accepts a visitor, dispatching on the node variant.
    pub fn accept<V: NodeVisitor + ?Sized>(&self, visitor: &mut V, indent: usize) -> Result<()> {
        match self {
            Node::Element {
                element,
                attributes,
                children,
            } => visitor.visit_element(*element, attributes, children, indent),
            Node::Content { content } => visitor.visit_content(content, indent),
            Node::Image { src, alt, title } => visitor.visit_image(src, alt, title, indent),
            Node::Hyperlink {
                href,
                displayed,
                title,
            } => visitor.visit_hyperlink(href, displayed, title, indent),
        }
    }

    /// Concatenation of every content leaf in document order.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, text: &mut String) {
        match self {
            Node::Content { content } => text.push_str(content),
            Node::Element { children, .. } => {
                for child in children {
                    child.collect_text(text);
                }
            }
            Node::Image { .. } | Node::Hyperlink { .. } => {}
        }
    }

    /// One-line-per-node outline of the tree, two spaces per depth.
    /// A debugging aid surfaced through the info log after parsing.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            for _ in 0..2 * depth {
                out.push(' ');
            }
            out.push_str(node.element_type().tag_name());
            out.push('\n');
            if let Some(children) = node.children() {
                for child in children.iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }
        out
    }
}

/// Visitor over the node variants.
///
/// Rendering dispatches through this trait so the emitters can behave
/// differently per variant while reading, never mutating, the tree.
/// `visit_element` is responsible for recursing into `children` (via
/// [`Node::accept`]) at whatever indent discipline the visitor keeps.
pub trait NodeVisitor {
    fn visit_element(
        &mut self,
        element: ElementType,
        attributes: &[Attribute],
        children: &[Node],
        indent: usize,
    ) -> Result<()>;

    fn visit_content(&mut self, content: &str, indent: usize) -> Result<()>;

    fn visit_image(&mut self, src: &str, alt: &str, title: &str, indent: usize) -> Result<()>;

    fn visit_hyperlink(
        &mut self,
        href: &str,
        displayed: &str,
        title: &str,
        indent: usize,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_names() {
        assert_eq!(Attribute::Bold.name(), "Bold");
        assert_eq!(Attribute::ImageAttr.name(), "ImageAttr");
        assert_eq!(Attribute::font_size(2), Attribute::FontSize2);
    }

    #[test]
    fn test_leaf_has_no_children() {
        let mut leaf = Node::content("x".to_string());
        assert!(leaf.children().is_none());
        assert!(!leaf.push_attribute(Attribute::Bold));
    }

    #[test]
    fn test_text_content_order() {
        let mut root = Node::element(ElementType::DocStart);
        let mut para = Node::element(ElementType::Paragraph);
        para.children_mut()
            .unwrap()
            .push(Node::content("hello ".to_string()));
        para.children_mut()
            .unwrap()
            .push(Node::content("world".to_string()));
        root.children_mut().unwrap().push(para);

        assert_eq!(root.text_content(), "hello world");
    }

    #[test]
    fn test_outline_indents_children() {
        let mut root = Node::element(ElementType::DocStart);
        let mut para = Node::element(ElementType::Paragraph);
        para.children_mut()
            .unwrap()
            .push(Node::content("x".to_string()));
        root.children_mut().unwrap().push(para);

        let outline = root.outline();
        let lines: Vec<&str> = outline.lines().collect();
        assert_eq!(lines[0], "!DOCTYPE html");
        assert_eq!(lines[1], "  p");
        assert_eq!(lines[2], "    content");
    }
}
