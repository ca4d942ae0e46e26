use super::table::TableManager;
use crate::error::Result;
use crate::node::{Attribute, Node};
use crate::token::{ElementType, Token};
use crate::tree::TreeBuilder;
use log::{info, trace};

/// Flags bubbled from the state handlers to conclude a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFlag {
    TableFailed,
    TableSuccess,
}

/// Multiplexer between the main tree builder and the table manager.
///
/// While `table_mode` is off, tokens flow to the tree builder; a table
/// open flips the mode and from then on every token goes to the table
/// manager, until a flag concludes the table and clears the mode.
#[derive(Debug)]
pub struct TokenEmitter {
    builder: TreeBuilder,
    table: TableManager,
    table_mode: bool,
}

impl TokenEmitter {
    pub fn new() -> Self {
        TokenEmitter {
            builder: TreeBuilder::new(),
            table: TableManager::new(),
            table_mode: false,
        }
    }

    /// Routes a token to whichever builder is active.
    pub fn emit(&mut self, token: Token) -> Result<()> {
        if self.table_mode {
            trace!(target: "emitter", "emitting {} to table manager", token.element.tag_name());
            return self.table.consume(token);
        }

        if token.element == ElementType::Table {
            self.table_mode = true;
            info!(target: "emitter", "table parsing has started");
            return self.table.consume(token);
        }

        trace!(target: "emitter", "emitting {} to tree builder", token.element.tag_name());
        self.builder.consume(token)
    }

    /// Concludes the active table on success or failure.
    pub fn handle_flag(&mut self, flag: ParseFlag) -> Result<()> {
        match flag {
            ParseFlag::TableFailed => {
                info!(target: "emitter", "table parsing has ended");
                self.table.emit_on_failure(&mut self.builder)?;
                self.table_mode = false;
            }
            ParseFlag::TableSuccess => {
                info!(target: "emitter", "table parsing has ended");
                self.table.emit_on_success(&mut self.builder)?;
                self.table_mode = false;
            }
        }
        Ok(())
    }

    /// Element under the main builder's cursor. Handlers consult this for
    /// paragraph bookkeeping even while a table is active.
    pub fn current_element(&self) -> Result<ElementType> {
        self.builder.current_element()
    }

    /// Routes an attribute to whichever builder is active.
    pub fn add_attribute(&mut self, attribute: Attribute) -> Result<()> {
        if self.table_mode {
            self.table.add_attribute(attribute)
        } else {
            self.builder.add_attribute(attribute)
        }
    }

    /// Whether tokens are currently routed to the table manager.
    pub fn in_table(&self) -> bool {
        self.table_mode
    }

    /// Column count fixed by the active table's header row.
    pub fn col_dims(&self) -> usize {
        self.table.col_dims()
    }

    /// Hands the finished document tree out of the main builder.
    pub fn take_root(&mut self) -> Result<Node> {
        self.builder.take_root()
    }
}

impl Default for TokenEmitter {
    fn default() -> Self {
        Self::new()
    }
}
