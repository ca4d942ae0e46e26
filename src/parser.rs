//! The tokenizer driver.
//!
//! Reads the input one character at a time and dispatches to the handler
//! for the current state:
//!
//! ```text
//! driver ➜ handler ➜ context mutations ➜ emitter ➜ (builder | table manager) ➜ tree
//! ```
//!
//! Control flow is cooperative and single-threaded; every character is
//! consumed to completion, including all token emissions it triggers,
//! before the next character is read.

use crate::error::Result;
use crate::node::Node;
use lazy_static::lazy_static;
use log::warn;
use std::collections::HashSet;

pub mod context;
pub mod emitter;
mod handlers;
pub mod state;
pub mod table;


use context::Context;
use state::State;

lazy_static! {
    /// Characters a backslash can escape.
    static ref ESCAPABLE: HashSet<char> = [
        '\\', '`', '*', '_', '{', '}', '[', ']', '<', '>', '(', ')', '#', '+', '-', '.', '!', '|',
    ]
    .into_iter()
    .collect();
}

/// Parses a whole document into its tree.
///
/// The input is consumed character by character; at end of input a final
/// newline is injected so that every construct sees its terminator. Soft
/// parse problems degrade to literal text and a logged warning; only
/// internal inconsistencies surface as errors.
pub fn parse_document(input: &str) -> Result<Node> {
    let mut context = Context::new();
    let mut line: usize = 1;
    let mut chars = input.chars();

    loop {
        let next = match chars.next() {
            Some(c) => c,
            None => {
                context.eof_reached = true;
                '\n'
            }
        };
        if next == '\n' {
            line += 1;
        }

        if context.is_escaped {
            context.is_escaped = false;
            handle_escape_sequence(&mut context, next)?;
            continue;
        }
        if next == '\\'
            && !matches!(
                context.state,
                State::CodeInline | State::CodeBlock | State::DataBacktick
            )
        {
            context.is_escaped = true;
            continue;
        }

        context.state.handler()(&mut context, next)?;

        if let Some(message) = context.warning.take() {
            warn!(target: "parser", "line {}: {}", line, message);
        }

        if context.eof_reached {
            break;
        }
        if context.newline_counter != 0 && next != '\n' {
            context.newline_counter = 0;
        }
    }

    context.emitter.take_root()
}

fn handle_escape_sequence(context: &mut Context, next: char) -> Result<()> {
    if ESCAPABLE.contains(&next) {
        context.consumed.push(next);
    } else if next == '\n' {
        context.handle_unexpected_newline("\\")?;
    } else {
        context.consumed.push('\\');
        context.consumed.push(next);
    }
    Ok(())
}
