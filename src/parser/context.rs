use super::emitter::{ParseFlag, TokenEmitter};
use super::state::State;
use crate::error::{ConvertError, Result};
use crate::token::{ElementType, Token, TokenKind};
use log::warn;
use std::mem;

/// Nesting cap for the return stack; deep enough for any sane document,
/// shallow enough to catch runaway pushes.
const RETURN_STACK_CAP: usize = 64;

/// Stack of states the tokenizer will return to after an inline construct
/// closes.
///
/// Only resumable states are accepted; pushing anything else is a
/// programmer error. Reading from an empty stack falls back to
/// [`State::Data`] with a logged warning rather than failing.
#[derive(Debug, Default)]
pub struct ReturnStack {
    stack: Vec<State>,
}

impl ReturnStack {
    pub fn new() -> Self {
        ReturnStack { stack: Vec::new() }
    }

    pub fn push(&mut self, state: State) -> Result<()> {
        if !state.is_resumable() {
            return Err(ConvertError::InvalidReturnState { state });
        }
        if self.stack.len() >= RETURN_STACK_CAP {
            return Err(ConvertError::ReturnStackOverflow);
        }
        self.stack.push(state);
        Ok(())
    }

    pub fn top(&self) -> State {
        match self.stack.last() {
            Some(&state) => state,
            None => {
                warn!(target: "parser", "reading an empty return stack; assuming Data");
                State::Data
            }
        }
    }

    pub fn pop(&mut self) -> State {
        match self.stack.pop() {
            Some(state) => state,
            None => {
                warn!(target: "parser", "popping an empty return stack; assuming Data");
                State::Data
            }
        }
    }

    /// Top of the stack without the empty-stack fallback.
    pub fn peek(&self) -> Option<State> {
        self.stack.last().copied()
    }
}

/// The mutable bag of counters, buffers, and flags consumed by the state
/// handlers, plus the emit helpers they share.
///
/// One context lives per parse; the driver owns it and drains `warning`
/// after every handler invocation.
#[derive(Debug)]
pub struct Context {
    pub state: State,
    /// Pending textual content awaiting emission.
    pub consumed: String,
    pub counter: i32,
    pub alt_counter: i32,
    pub newline_counter: usize,
    pub indent_level: i32,
    /// Scratch buffer for an image/hyperlink destination.
    pub src: String,
    /// Scratch buffer for an image/hyperlink alt text.
    pub alt: String,
    pub is_image: bool,
    pub is_escaped: bool,
    pub blockquote_in_list: bool,
    pub eof_reached: bool,
    /// Soft-warning message surfaced by the last handler, if any.
    pub warning: Option<String>,
    pub emitter: TokenEmitter,
    pub return_stack: ReturnStack,
}

impl Context {
    pub fn new() -> Self {
        Context {
            state: State::Data,
            consumed: String::new(),
            counter: 0,
            alt_counter: 0,
            newline_counter: 0,
            indent_level: 0,
            src: String::new(),
            alt: String::new(),
            is_image: false,
            is_escaped: false,
            blockquote_in_list: false,
            eof_reached: false,
            warning: None,
            emitter: TokenEmitter::new(),
            return_stack: ReturnStack::new(),
        }
    }

    /// Emits a token of the given kind. Close tokens discard the pending
    /// buffer, content tokens carry and drain it.
    pub fn emit_token(&mut self, kind: TokenKind, element: ElementType) -> Result<()> {
        let text = match kind {
            TokenKind::Open | TokenKind::Eof => String::new(),
            TokenKind::Close => {
                self.consumed.clear();
                String::new()
            }
            TokenKind::Content => mem::take(&mut self.consumed),
        };
        self.emitter.emit(Token::new(kind, element, text))
    }

    /// Emits the pending buffer as content, lazily opening a paragraph
    /// when the cursor still sits at the document root.
    pub fn emit_content_token(&mut self) -> Result<()> {
        if self.consumed.is_empty() {
            return Ok(());
        }
        if self.emitter.current_element()? == ElementType::DocStart {
            self.emit_token(TokenKind::Open, ElementType::Paragraph)?;
        }
        self.emit_token(TokenKind::Content, ElementType::Content)
    }

    /// Opens an inline element, wrapping it in a lazily opened paragraph
    /// when it would otherwise land directly under the document root.
    pub fn open_inline(&mut self, element: ElementType) -> Result<()> {
        if !self.emitter.in_table() && self.emitter.current_element()? == ElementType::DocStart {
            self.emit_token(TokenKind::Open, ElementType::Paragraph)?;
        }
        self.emit_token(TokenKind::Open, element)
    }

    /// Emits a finished image: `src`/`alt` from their scratch buffers,
    /// the title from the pending buffer.
    pub fn emit_image(&mut self) -> Result<()> {
        if !self.emitter.in_table() && self.emitter.current_element()? == ElementType::DocStart {
            self.emit_token(TokenKind::Open, ElementType::Paragraph)?;
        }
        let token = Token::with_payload(
            TokenKind::Open,
            ElementType::Image,
            mem::take(&mut self.src),
            mem::take(&mut self.alt),
            mem::take(&mut self.consumed),
        );
        self.emitter.emit(token)?;
        self.emit_token(TokenKind::Close, ElementType::Image)
    }

    /// Emits a finished hyperlink; payload layout as [`Context::emit_image`].
    pub fn emit_hyperlink(&mut self) -> Result<()> {
        if !self.emitter.in_table() && self.emitter.current_element()? == ElementType::DocStart {
            self.emit_token(TokenKind::Open, ElementType::Paragraph)?;
        }
        let token = Token::with_payload(
            TokenKind::Open,
            ElementType::Hyperlink,
            mem::take(&mut self.src),
            mem::take(&mut self.alt),
            mem::take(&mut self.consumed),
        );
        self.emitter.emit(token)?;
        self.emit_token(TokenKind::Close, ElementType::Hyperlink)
    }

    /// A `|` hit inside an unclosed inline construct while in a table:
    /// flush the construct's literal prefix as cell content and treat the
    /// pipe as a cell boundary.
    ///
    /// With `full`, `to_emit` replaces the pending buffer instead of
    /// prefixing it.
    pub fn handle_pipe_in_table(&mut self, to_emit: &str, full: bool) -> Result<()> {
        let to_close = if self.return_stack.top() == State::TableCellData {
            ElementType::TableCell
        } else {
            ElementType::TableHead
        };
        self.consumed = if full {
            to_emit.to_string()
        } else {
            format!("{}{}", to_emit, self.consumed)
        };
        self.emit_token(TokenKind::Content, ElementType::Content)?;
        self.state = self.return_stack.pop();
        self.emit_token(TokenKind::Close, to_close)?;
        self.emit_token(TokenKind::Open, to_close)
    }

    /// A newline hit inside an unclosed construct: reinsert the literal
    /// sigils, fail the surrounding table if one is active, and resume
    /// the recorded state.
    pub fn handle_unexpected_newline(&mut self, to_emit: &str) -> Result<()> {
        if self.emitter.in_table() {
            self.consumed.push_str(to_emit);
            self.emit_token(TokenKind::Content, ElementType::Content)?;
            self.emitter.handle_flag(ParseFlag::TableFailed)?;
            // the table is gone; drop its recorded states with it
            while matches!(
                self.return_stack.peek(),
                Some(State::TableHeaderNames) | Some(State::TableCellData)
            ) {
                self.return_stack.pop();
            }
            self.state = self.return_stack.pop();
            return Ok(());
        }

        if !to_emit.is_empty() {
            self.consumed.push_str(to_emit);
            self.emit_content_token()?;
        }

        let current = self.emitter.current_element()?;
        if current == ElementType::Paragraph && !self.eof_reached {
            self.newline_counter += 1;
        } else {
            self.newline_counter = 0;
            self.emit_token(TokenKind::Close, current)?;
        }
        self.counter = 0;
        self.state = self.return_stack.pop();
        Ok(())
    }

    /// Resets the indentation bookkeeping when list parsing starts over.
    pub fn setup_list_parsing(&mut self) {
        self.counter = 0;
        self.indent_level = 0;
    }

    /// Closes the current element, moving the cursor up one level.
    pub fn move_up_the_tree(&mut self) -> Result<()> {
        let current = self.emitter.current_element()?;
        self.emit_token(TokenKind::Close, current)
    }

    /// Whether the pending buffer holds only spaces and tabs.
    pub fn consumed_only_whitespace(&self) -> bool {
        self.consumed.chars().all(|c| c == ' ' || c == '\t')
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_stack_rejects_inline_states() {
        let mut stack = ReturnStack::new();
        assert!(stack.push(State::Data).is_ok());
        assert!(matches!(
            stack.push(State::DataAsterisk).unwrap_err(),
            ConvertError::InvalidReturnState {
                state: State::DataAsterisk
            }
        ));
    }

    #[test]
    fn test_return_stack_empty_falls_back_to_data() {
        let mut stack = ReturnStack::new();
        assert_eq!(stack.top(), State::Data);
        assert_eq!(stack.pop(), State::Data);
    }

    #[test]
    fn test_return_stack_overflow() {
        let mut stack = ReturnStack::new();
        for _ in 0..RETURN_STACK_CAP {
            stack.push(State::Data).unwrap();
        }
        assert!(matches!(
            stack.push(State::Data).unwrap_err(),
            ConvertError::ReturnStackOverflow
        ));
    }

    #[test]
    fn test_content_token_drains_buffer() {
        let mut context = Context::new();
        context.consumed.push_str("hello");
        context.emit_content_token().unwrap();
        assert!(context.consumed.is_empty());
        // a paragraph was lazily opened around the content
        assert_eq!(
            context.emitter.current_element().unwrap(),
            ElementType::Paragraph
        );
    }

    #[test]
    fn test_empty_content_token_is_noop() {
        let mut context = Context::new();
        context.emit_content_token().unwrap();
        assert_eq!(
            context.emitter.current_element().unwrap(),
            ElementType::DocStart
        );
    }

    #[test]
    fn test_close_discards_pending_buffer() {
        let mut context = Context::new();
        context
            .emit_token(TokenKind::Open, ElementType::Paragraph)
            .unwrap();
        context.consumed.push_str("dropped");
        context
            .emit_token(TokenKind::Close, ElementType::Paragraph)
            .unwrap();
        assert!(context.consumed.is_empty());
    }

    #[test]
    fn test_consumed_only_whitespace() {
        let mut context = Context::new();
        assert!(context.consumed_only_whitespace());
        context.consumed.push_str("  \t ");
        assert!(context.consumed_only_whitespace());
        context.consumed.push('x');
        assert!(!context.consumed_only_whitespace());
    }
}
