use crate::error::{ConvertError, Result};
use crate::node::{Attribute, Node};
use crate::token::{ElementType, Token, TokenKind};
use log::warn;

/// Builds the document tree from tokens emitted by the tokenizer.
///
/// The builder owns the root node and designates the current open parent
/// with a *cursor*: a path of child indices from the root. `Open` tokens
/// attach a new child and descend the cursor into it, `Close` tokens
/// ascend, `Content` tokens attach a leaf without moving. Closing above
/// the document root detaches the cursor; the tree survives, but any
/// further structural operation reports the inconsistency.
#[derive(Debug)]
pub struct TreeBuilder {
    root: Option<Node>,
    path: Vec<usize>,
    detached: bool,
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder {
            root: Some(Node::element(ElementType::DocStart)),
            path: Vec::new(),
            detached: false,
        }
    }

    /// Consumes a token and grows the tree accordingly.
    pub fn consume(&mut self, token: Token) -> Result<()> {
        match token.kind {
            TokenKind::Open => {
                let node = match token.element {
                    ElementType::Image => Node::Image {
                        src: token.content,
                        alt: token.alt,
                        title: token.title,
                    },
                    ElementType::Hyperlink => Node::Hyperlink {
                        href: token.content,
                        displayed: token.alt,
                        title: token.title,
                    },
                    element => Node::element(element),
                };
                self.attach(node, true)
            }
            TokenKind::Close => {
                let current = self.cursor()?.element_type();
                if token.element != current {
                    return Err(ConvertError::ShapeMismatch {
                        expected: current,
                        found: token.element,
                    });
                }
                if self.path.is_empty() {
                    warn!(target: "tree", "closing above the document root; cursor detached");
                    self.detached = true;
                } else {
                    self.path.pop();
                }
                Ok(())
            }
            TokenKind::Content => self.attach(Node::content(token.content), false),
            TokenKind::Eof => Ok(()),
        }
    }

    /// Appends an attribute to the node under the cursor.
    pub fn add_attribute(&mut self, attribute: Attribute) -> Result<()> {
        if !self.cursor_mut()?.push_attribute(attribute) {
            return Err(ConvertError::DetachedCursor);
        }
        Ok(())
    }

    /// Attaches an externally built subtree under the cursor without moving
    /// it. Used by the table manager to graft a finished table.
    pub fn append_subtree(&mut self, subtree: Node) -> Result<()> {
        self.attach(subtree, false)
    }

    /// The element designated by the cursor.
    pub fn current_element(&self) -> Result<ElementType> {
        Ok(self.cursor()?.element_type())
    }

    /// Transfers ownership of the root out of the builder. May be called
    /// once; the builder is unusable afterwards.
    pub fn take_root(&mut self) -> Result<Node> {
        self.root.take().ok_or(ConvertError::RootTaken)
    }

    fn attach(&mut self, node: Node, descend: bool) -> Result<()> {
        let cursor = self.cursor_mut()?;
        let children = cursor.children_mut().ok_or(ConvertError::DetachedCursor)?;
        children.push(node);
        let index = children.len() - 1;
        if descend {
            self.path.push(index);
        }
        Ok(())
    }

    fn cursor(&self) -> Result<&Node> {
        if self.detached {
            return Err(ConvertError::DetachedCursor);
        }
        let mut node = self.root.as_ref().ok_or(ConvertError::RootTaken)?;
        for &index in &self.path {
            node = node
                .children()
                .and_then(|children| children.get(index))
                .ok_or(ConvertError::DetachedCursor)?;
        }
        Ok(node)
    }

    fn cursor_mut(&mut self) -> Result<&mut Node> {
        if self.detached {
            return Err(ConvertError::DetachedCursor);
        }
        let mut node = self.root.as_mut().ok_or(ConvertError::RootTaken)?;
        for &index in &self.path {
            node = node
                .children_mut()
                .and_then(|children| children.get_mut(index))
                .ok_or(ConvertError::DetachedCursor)?;
        }
        Ok(node)
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(element: ElementType) -> Token {
        Token::new(TokenKind::Open, element, String::new())
    }

    fn close(element: ElementType) -> Token {
        Token::new(TokenKind::Close, element, String::new())
    }

    fn content(text: &str) -> Token {
        Token::new(TokenKind::Content, ElementType::Content, text.to_string())
    }

    #[test]
    fn test_open_descends_and_close_ascends() {
        let mut builder = TreeBuilder::new();
        builder.consume(open(ElementType::Paragraph)).unwrap();
        assert_eq!(
            builder.current_element().unwrap(),
            ElementType::Paragraph
        );

        builder.consume(content("hello")).unwrap();
        assert_eq!(
            builder.current_element().unwrap(),
            ElementType::Paragraph
        );

        builder.consume(close(ElementType::Paragraph)).unwrap();
        assert_eq!(builder.current_element().unwrap(), ElementType::DocStart);
    }

    #[test]
    fn test_close_mismatch_is_shape_error() {
        let mut builder = TreeBuilder::new();
        builder.consume(open(ElementType::Paragraph)).unwrap();
        let err = builder.consume(close(ElementType::Span)).unwrap_err();
        assert!(matches!(err, ConvertError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_close_above_root_detaches() {
        let mut builder = TreeBuilder::new();
        builder.consume(close(ElementType::DocStart)).unwrap();
        let err = builder.consume(content("orphan")).unwrap_err();
        assert!(matches!(err, ConvertError::DetachedCursor));
    }

    #[test]
    fn test_image_open_reads_payload() {
        let mut builder = TreeBuilder::new();
        builder
            .consume(Token::with_payload(
                TokenKind::Open,
                ElementType::Image,
                "u.png".to_string(),
                "cap".to_string(),
                "t".to_string(),
            ))
            .unwrap();
        builder.consume(close(ElementType::Image)).unwrap();

        let root = builder.take_root().unwrap();
        assert_eq!(
            root.children().unwrap()[0],
            Node::Image {
                src: "u.png".to_string(),
                alt: "cap".to_string(),
                title: "t".to_string(),
            }
        );
    }

    #[test]
    fn test_append_subtree_keeps_cursor() {
        let mut builder = TreeBuilder::new();
        builder.consume(open(ElementType::Paragraph)).unwrap();
        builder
            .append_subtree(Node::element(ElementType::Table))
            .unwrap();
        assert_eq!(
            builder.current_element().unwrap(),
            ElementType::Paragraph
        );
    }

    #[test]
    fn test_take_root_only_once() {
        let mut builder = TreeBuilder::new();
        let root = builder.take_root().unwrap();
        assert_eq!(root.element_type(), ElementType::DocStart);
        assert!(matches!(
            builder.take_root().unwrap_err(),
            ConvertError::RootTaken
        ));
    }

    #[test]
    fn test_eof_is_noop() {
        let mut builder = TreeBuilder::new();
        builder
            .consume(Token::new(
                TokenKind::Eof,
                ElementType::Content,
                String::new(),
            ))
            .unwrap();
        assert_eq!(builder.current_element().unwrap(), ElementType::DocStart);
    }
}
