use crate::error::{ConvertError, Result};
use crate::node::{Attribute, Node};
use crate::token::{ElementType, Token, TokenKind};
use crate::tree::TreeBuilder;
use log::info;

/// Mirror builder active only while a table is being parsed.
///
/// The manager assembles a complete table subtree on its own and grafts it
/// onto the main tree in one piece on success. On failure the last,
/// partially parsed row is demoted to a paragraph; any rows parsed before
/// it still form a table. The table root is dropped or grafted exactly
/// once per table lifecycle.
///
/// `col_dims` is fixed by the header row and is the authoritative width
/// for every body row: short rows are padded with empty cells, excess
/// cells are discarded.
#[derive(Debug)]
pub struct TableManager {
    table_root: Option<Node>,
    path: Vec<usize>,
    col_dims: usize,
}

impl TableManager {
    pub fn new() -> Self {
        TableManager {
            table_root: None,
            path: Vec::new(),
            col_dims: 0,
        }
    }

    /// Number of header columns, zero until the header row closes.
    pub fn col_dims(&self) -> usize {
        self.col_dims
    }

    /// Consumes a token routed here by the emitter.
    pub fn consume(&mut self, token: Token) -> Result<()> {
        match token.element {
            ElementType::Table => {
                if token.kind != TokenKind::Open {
                    return Err(ConvertError::UnexpectedTableToken {
                        element: token.element,
                    });
                }
                if self.table_root.is_some() {
                    return Err(ConvertError::TableRestarted);
                }
                let mut root = Node::element(ElementType::Table);
                root.push_attribute(Attribute::TableStyle);
                self.table_root = Some(root);
                self.path.clear();
                Ok(())
            }
            ElementType::TableRow => {
                if token.kind == TokenKind::Open {
                    self.create_node(ElementType::TableRow)
                } else if self.col_dims != 0 {
                    // body row: pad up to the header width
                    let width = self.col_dims;
                    let row = self.current_mut()?;
                    if let Some(children) = row.children_mut() {
                        while children.len() < width {
                            children.push(Node::element(ElementType::TableCell));
                        }
                    }
                    self.ascend();
                    Ok(())
                } else {
                    // header row: the trailing empty head comes from the
                    // terminating pipe and is discarded
                    let row = self.current_mut()?;
                    row.remove_last_child();
                    let width = row.children().map_or(0, |children| children.len());
                    if width == 0 {
                        return Err(ConvertError::EmptyTableHeader);
                    }
                    self.col_dims = width;
                    self.ascend();
                    Ok(())
                }
            }
            ElementType::TableHead => {
                if token.kind == TokenKind::Open {
                    self.create_node(ElementType::TableHead)
                } else {
                    self.ascend();
                    Ok(())
                }
            }
            ElementType::TableCell => {
                if token.kind == TokenKind::Open {
                    let width = self.col_dims;
                    let row_len = self
                        .current()?
                        .children()
                        .map_or(0, |children| children.len());
                    if row_len < width {
                        self.create_node(ElementType::TableCell)?;
                    }
                    Ok(())
                } else {
                    if self.current()?.element_type() == ElementType::TableCell {
                        self.ascend();
                    }
                    Ok(())
                }
            }
            ElementType::Content => {
                if self.current()?.element_type() == ElementType::TableRow {
                    // the row already holds col_dims cells; overflow content
                    // is discarded
                    return Ok(());
                }
                let leaf = Node::content(token.content);
                self.attach(leaf, false)
            }
            ElementType::Hyperlink => {
                if token.kind == TokenKind::Open {
                    let node = Node::Hyperlink {
                        href: token.content,
                        displayed: token.alt,
                        title: token.title,
                    };
                    self.attach(node, true)
                } else {
                    self.ascend();
                    Ok(())
                }
            }
            ElementType::Span | ElementType::Codeblock => {
                if token.kind == TokenKind::Open {
                    self.create_node(token.element)
                } else {
                    self.ascend();
                    Ok(())
                }
            }
            element => Err(ConvertError::UnexpectedTableToken { element }),
        }
    }

    /// Adds an attribute to the node under the table cursor.
    pub fn add_attribute(&mut self, attribute: Attribute) -> Result<()> {
        if !self.current_mut()?.push_attribute(attribute) {
            return Err(ConvertError::DetachedCursor);
        }
        Ok(())
    }

    /// Grafts the finished table onto the main tree and resets.
    pub fn emit_on_success(&mut self, builder: &mut TreeBuilder) -> Result<()> {
        let root = self.table_root.take().ok_or(ConvertError::MissingTable)?;
        info!(target: "table", "appending finished table to the document tree");
        builder.append_subtree(root)?;
        self.reset();
        Ok(())
    }

    /// Emits the table minus its last row, then re-emits that row as a
    /// paragraph. Cells of the demoted row keep their inline content;
    /// each cell contributes a literal `|` followed by its children.
    pub fn emit_on_failure(&mut self, builder: &mut TreeBuilder) -> Result<()> {
        let mut root = self.table_root.take().ok_or(ConvertError::MissingTable)?;

        let last_row = match root.remove_last_child() {
            Some(row) => row,
            None => {
                self.reset();
                return Ok(());
            }
        };

        if root.children().is_some_and(|children| !children.is_empty()) {
            info!(target: "table", "appending finished table to the document tree");
            builder.append_subtree(root)?;
        }

        Self::emit_row_as_paragraph(last_row, builder)?;
        self.reset();
        Ok(())
    }

    fn emit_row_as_paragraph(row: Node, builder: &mut TreeBuilder) -> Result<()> {
        let cells = match row {
            Node::Element { children, .. } if !children.is_empty() => children,
            _ => return Ok(()),
        };

        let mut new_children = Vec::new();
        for cell in cells {
            new_children.push(Node::content("|".to_string()));
            if let Node::Element { children, .. } = cell {
                new_children.extend(children);
            }
        }

        builder.append_subtree(Node::Element {
            element: ElementType::Paragraph,
            attributes: Vec::new(),
            children: new_children,
        })
    }

    fn reset(&mut self) {
        self.table_root = None;
        self.path.clear();
        self.col_dims = 0;
    }

    fn create_node(&mut self, element: ElementType) -> Result<()> {
        let mut node = Node::element(element);
        match element {
            ElementType::TableRow => {
                node.push_attribute(Attribute::TableRow);
            }
            ElementType::TableHead => {
                node.push_attribute(Attribute::TableHeader);
            }
            ElementType::TableCell => {
                node.push_attribute(Attribute::TableCell);
            }
            _ => {}
        }
        self.attach(node, true)
    }

    fn attach(&mut self, node: Node, descend: bool) -> Result<()> {
        let current = self.current_mut()?;
        let children = current.children_mut().ok_or(ConvertError::DetachedCursor)?;
        children.push(node);
        let index = children.len() - 1;
        if descend {
            self.path.push(index);
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.path.pop();
    }

    fn current(&self) -> Result<&Node> {
        let mut node = self.table_root.as_ref().ok_or(ConvertError::MissingTable)?;
        for &index in &self.path {
            node = node
                .children()
                .and_then(|children| children.get(index))
                .ok_or(ConvertError::DetachedCursor)?;
        }
        Ok(node)
    }

    fn current_mut(&mut self) -> Result<&mut Node> {
        let mut node = self.table_root.as_mut().ok_or(ConvertError::MissingTable)?;
        for &index in &self.path {
            node = node
                .children_mut()
                .and_then(|children| children.get_mut(index))
                .ok_or(ConvertError::DetachedCursor)?;
        }
        Ok(node)
    }
}

impl Default for TableManager {
    fn default() -> Self {
        Self::new()
    }
}
