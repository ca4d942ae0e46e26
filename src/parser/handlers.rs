//! One handler per tokenizer state.
//!
//! Handlers mutate the [`Context`] and emit tokens; the driver dispatches
//! to them through [`super::state::State::handler`]. Naming follows the
//! state names. This is the state pattern implemented functionally.

use super::context::Context;
use super::emitter::ParseFlag;
use super::state::State;
use crate::error::Result;
use crate::node::Attribute;
use crate::token::{ElementType, TokenKind};
use std::mem;

/// Indentation unit for nested lists; a tab counts as one unit.
const INDENTATION: i32 = 4;

/// Whether the construct being tokenized lives inside a table cell or a
/// table header, judged by the recorded return state.
fn in_table(context: &Context) -> bool {
    matches!(
        context.return_stack.top(),
        State::TableHeaderNames | State::TableCellData
    )
}

/// `!` prefix for fallback text when the construct was an image.
fn bang(context: &Context) -> &'static str {
    if context.is_image {
        "!"
    } else {
        ""
    }
}

pub(super) fn data(context: &mut Context, next: char) -> Result<()> {
    match next {
        '#' => {
            if context.consumed.is_empty() {
                context.return_stack.push(State::Data)?;
                context.counter += 1;
                context.state = State::DataHashtag;
            } else {
                context.consumed.push(next);
            }
        }
        '*' => {
            context.emit_content_token()?;
            context.return_stack.push(State::Data)?;
            context.state = State::DataAsterisk;
        }
        '-' => {
            if context.consumed.is_empty() {
                context.counter += 1;
                context.return_stack.push(State::Data)?;
                context.state = State::HorizontalLine;
            } else {
                context.consumed.push(next);
            }
        }
        '`' => {
            context.emit_content_token()?;
            context.return_stack.push(State::Data)?;
            context.state = State::DataBacktick;
        }
        '>' => {
            if context.consumed.is_empty() {
                context.emit_token(TokenKind::Open, ElementType::Span)?;
                context.emitter.add_attribute(Attribute::BlockQuote)?;
                context.return_stack.push(State::Data)?;
            } else {
                context.consumed.push(next);
            }
        }
        '[' => {
            context.emit_content_token()?;
            context.return_stack.push(State::Data)?;
            context.is_image = false;
            context.state = State::AltOpenSquared;
        }
        '!' => {
            context.emit_content_token()?;
            context.state = State::Image;
            context.is_image = true;
            context.return_stack.push(State::Data)?;
        }
        '|' => {
            if context.consumed_only_whitespace() {
                context.consumed.clear();
                context.state = State::TableHeaderNames;
                context.return_stack.push(State::Data)?;
                context.emit_token(TokenKind::Open, ElementType::Table)?;
                context.emit_token(TokenKind::Open, ElementType::TableRow)?;
                context.emit_token(TokenKind::Open, ElementType::TableHead)?;
            } else {
                context.consumed.push('|');
            }
        }
        '\n' => {
            let before = context.emitter.current_element()?;
            context.emit_content_token()?;

            if context.newline_counter == 1 && before == ElementType::Paragraph {
                context.emit_token(TokenKind::Close, ElementType::Paragraph)?;
            } else if before != ElementType::DocStart && before != ElementType::Paragraph {
                context.emit_token(TokenKind::Close, before)?;
                if context.blockquote_in_list {
                    context.emit_token(TokenKind::Close, ElementType::ListItem)?;
                    context.blockquote_in_list = false;
                }
                context.state = context.return_stack.pop();
            }

            // count the soft break against the (possibly lazily opened)
            // paragraph under the cursor
            if context.emitter.current_element()? == ElementType::Paragraph {
                context.newline_counter += 1;
            }
        }
        _ => {
            if context.consumed.is_empty() && next.is_ascii_digit() {
                context.consumed.push(next);
                context.return_stack.push(State::Data)?;
                context.state = State::DataConsumingNumber;
            } else {
                context.consumed.push(next);
            }
        }
    }
    Ok(())
}

pub(super) fn hashtag(context: &mut Context, next: char) -> Result<()> {
    if next == '#' && context.counter < 6 {
        context.counter += 1;
    } else if next == ' ' {
        let level = context.counter as u8;
        context.emit_token(TokenKind::Open, ElementType::header(level))?;
        context.emitter.add_attribute(Attribute::Bold)?;
        context.emitter.add_attribute(Attribute::font_size(level))?;
        context.counter = 0;
        // the heading resumes the state recorded when its `#` was seen;
        // the close at end of line pops that entry
        context.state = State::Data;
    } else if next == '\n' {
        for _ in 0..context.counter {
            context.consumed.push('#');
        }
        let text = mem::take(&mut context.consumed);
        context.handle_unexpected_newline(&text)?;
    } else {
        // more than six hashes, or no space: everything becomes literal text
        for _ in 0..context.counter {
            context.consumed.push('#');
        }
        context.consumed.push(next);
        context.counter = 0;
        context.state = context.return_stack.pop();
    }
    Ok(())
}

pub(super) fn asterisk(context: &mut Context, next: char) -> Result<()> {
    match next {
        '*' => context.state = State::DataDoubleAsterisk,
        '\n' => {
            context.warning =
                Some("unclosed asterisk emphasis - converting '*' to plain text".to_string());
            context.handle_unexpected_newline("*")?;
        }
        '|' if in_table(context) => {
            context.warning =
                Some("unclosed asterisk emphasis - converting '*' to plain text".to_string());
            context.handle_pipe_in_table("*", false)?;
        }
        _ => {
            context.consumed.push(next);
            context.state = State::DataAsteriskData;
        }
    }
    Ok(())
}

pub(super) fn asterisk_data(context: &mut Context, next: char) -> Result<()> {
    match next {
        '*' => {
            context.open_inline(ElementType::Span)?;
            context.emitter.add_attribute(Attribute::Italic)?;
            context.emit_token(TokenKind::Content, ElementType::Content)?;
            context.emit_token(TokenKind::Close, ElementType::Span)?;
            context.state = context.return_stack.pop();
        }
        '\n' => {
            context.warning =
                Some("unclosed asterisk emphasis - converting to plain text".to_string());
            let text = format!("*{}", mem::take(&mut context.consumed));
            context.handle_unexpected_newline(&text)?;
        }
        '|' if in_table(context) => {
            context.warning =
                Some("unclosed asterisk emphasis - converting to plain text".to_string());
            context.handle_pipe_in_table("*", false)?;
        }
        _ => context.consumed.push(next),
    }
    Ok(())
}

pub(super) fn double_asterisk(context: &mut Context, next: char) -> Result<()> {
    match next {
        '*' => context.state = State::DataTripleAsterisk,
        '\n' => {
            context.warning =
                Some("unclosed asterisk emphasis - converting '**' to plain text".to_string());
            context.handle_unexpected_newline("**")?;
        }
        '|' if in_table(context) => {
            context.warning =
                Some("unclosed asterisk emphasis - converting '**' to plain text".to_string());
            context.handle_pipe_in_table("**", false)?;
        }
        _ => {
            context.consumed.push(next);
            context.state = State::DataDoubleAsteriskData;
        }
    }
    Ok(())
}

pub(super) fn double_asterisk_data(context: &mut Context, next: char) -> Result<()> {
    match next {
        '*' => {
            context.counter += 1;
            if context.counter == 2 {
                context.counter = 0;
                context.open_inline(ElementType::Span)?;
                context.emitter.add_attribute(Attribute::Bold)?;
                context.emit_token(TokenKind::Content, ElementType::Content)?;
                context.emit_token(TokenKind::Close, ElementType::Span)?;
                context.state = context.return_stack.pop();
            }
        }
        '\n' => {
            context.warning =
                Some("unclosed asterisk emphasis - converting to plain text".to_string());
            let mut text = format!("**{}", mem::take(&mut context.consumed));
            if context.counter == 1 {
                text.push('*');
            }
            context.handle_unexpected_newline(&text)?;
        }
        '|' if in_table(context) => {
            context.warning =
                Some("unclosed asterisk emphasis - converting to plain text".to_string());
            for _ in 0..context.counter {
                context.consumed.push('*');
            }
            context.counter = 0;
            context.handle_pipe_in_table("**", false)?;
        }
        _ => {
            // a lone closing asterisk mid-run stays literal
            for _ in 0..context.counter {
                context.consumed.push('*');
            }
            context.counter = 0;
            context.consumed.push(next);
        }
    }
    Ok(())
}

pub(super) fn triple_asterisk(context: &mut Context, next: char) -> Result<()> {
    match next {
        '*' => {
            // four asterisks in a row collapse to literal text
            context.consumed.push_str("****");
            context.state = context.return_stack.pop();
        }
        '\n' => {
            context.warning =
                Some("unclosed asterisk emphasis - converting '***' to plain text".to_string());
            context.handle_unexpected_newline("***")?;
        }
        '|' if in_table(context) => {
            context.warning =
                Some("unclosed asterisk emphasis - converting '***' to plain text".to_string());
            context.handle_pipe_in_table("***", false)?;
        }
        _ => {
            context.consumed.push(next);
            context.state = State::DataTripleAsteriskData;
        }
    }
    Ok(())
}

pub(super) fn triple_asterisk_data(context: &mut Context, next: char) -> Result<()> {
    match next {
        '*' => {
            context.counter += 1;
            if context.counter == 3 {
                context.counter = 0;
                context.open_inline(ElementType::Span)?;
                context.emitter.add_attribute(Attribute::Bold)?;
                context.emitter.add_attribute(Attribute::Italic)?;
                context.emit_token(TokenKind::Content, ElementType::Content)?;
                context.emit_token(TokenKind::Close, ElementType::Span)?;
                context.state = context.return_stack.pop();
            }
        }
        '\n' => {
            context.warning =
                Some("unclosed asterisk emphasis - converting to plain text".to_string());
            let mut text = format!("***{}", mem::take(&mut context.consumed));
            for _ in 0..context.counter {
                text.push('*');
            }
            context.handle_unexpected_newline(&text)?;
        }
        '|' if in_table(context) => {
            context.warning =
                Some("unclosed asterisk emphasis - converting to plain text".to_string());
            for _ in 0..context.counter {
                context.consumed.push('*');
            }
            context.counter = 0;
            context.handle_pipe_in_table("***", false)?;
        }
        _ => {
            for _ in 0..context.counter {
                context.consumed.push('*');
            }
            context.counter = 0;
            context.consumed.push(next);
        }
    }
    Ok(())
}

pub(super) fn consuming_number(context: &mut Context, next: char) -> Result<()> {
    match next {
        '.' => {
            context.consumed.push('.');
            context.state = State::DataOrdinalNumber;
        }
        '\n' => {
            let text = mem::take(&mut context.consumed);
            context.handle_unexpected_newline(&text)?;
        }
        _ => {
            context.consumed.push(next);
            context.state = context.return_stack.pop();
        }
    }
    Ok(())
}

pub(super) fn ordinal_number(context: &mut Context, next: char) -> Result<()> {
    match next {
        ' ' => {
            // the literal "N." prefix is discarded once the list opens
            context.consumed.clear();

            let current = context.emitter.current_element()?;
            if current == ElementType::ListOrdered || current == ElementType::ListUnordered {
                if context.counter >= context.indent_level + INDENTATION {
                    context.indent_level = context.counter;
                    context.counter = 0;
                    context.emit_token(TokenKind::Open, ElementType::ListOrdered)?;
                    context.emit_token(TokenKind::Open, ElementType::ListItem)?;
                    open_list_blockquote(context)?;
                    context.return_stack.push(State::OrderedListPrep)?;
                    context.state = State::Data;
                } else {
                    if context.counter % INDENTATION != 0 {
                        context.counter -= 1;
                    }
                    let levels = (context.indent_level - context.counter) / INDENTATION;
                    context.indent_level = context.counter;
                    context.counter = 0;

                    for _ in 0..levels {
                        context.move_up_the_tree()?;
                    }

                    context.return_stack.push(State::OrderedListPrep)?;
                    context.emit_token(TokenKind::Open, ElementType::ListItem)?;
                    open_list_blockquote(context)?;
                    context.state = State::Data;
                }
            } else {
                context.emit_token(TokenKind::Open, ElementType::ListOrdered)?;
                context.emit_token(TokenKind::Open, ElementType::ListItem)?;
                context.return_stack.push(State::OrderedListPrep)?;
                context.state = State::Data;
            }
        }
        '\n' => {
            let text = mem::take(&mut context.consumed);
            context.handle_unexpected_newline(&text)?;
        }
        _ => {
            context.consumed.push(next);
            context.state = context.return_stack.pop();
        }
    }
    Ok(())
}

pub(super) fn horizontal_line(context: &mut Context, next: char) -> Result<()> {
    match next {
        '-' => context.counter += 1,
        '\n' => {
            if context.counter >= 3 {
                context.emit_token(TokenKind::Open, ElementType::HorizontalLine)?;
                context.emit_token(TokenKind::Close, ElementType::HorizontalLine)?;
                context.state = context.return_stack.pop();
                context.counter = 0;
            } else {
                for _ in 0..context.counter {
                    context.consumed.push('-');
                }
                context.counter = 0;
                context.emit_content_token()?;
                context.state = context.return_stack.pop();
            }
        }
        _ => {
            if (next == ' ' || next == '\t') && context.counter == 1 {
                context.emit_token(TokenKind::Open, ElementType::ListUnordered)?;
                context.emit_token(TokenKind::Open, ElementType::ListItem)?;
                context.state = State::Data;
                context.return_stack.push(State::UnorderedListPrep)?;
                context.setup_list_parsing();
            } else {
                for _ in 0..context.counter {
                    context.consumed.push('-');
                }
                context.counter = 0;
                context.consumed.push(next);
                context.emit_content_token()?;
                context.state = context.return_stack.pop();
            }
        }
    }
    Ok(())
}

pub(super) fn backtick(context: &mut Context, next: char) -> Result<()> {
    match next {
        '`' => {
            if in_table(context) {
                // no code blocks inside tables; two backticks stay literal
                context.consumed.clear();
                context.consumed.push_str("``");
                context.emit_token(TokenKind::Content, ElementType::Content)?;
                context.state = context.return_stack.pop();
            } else {
                context.state = State::DataDoubleBacktick;
            }
        }
        '\n' => {
            context.warning =
                Some("unclosed backtick code element - handling as plain text".to_string());
            context.handle_unexpected_newline("`")?;
        }
        '|' if in_table(context) => {
            context.warning =
                Some("unclosed backtick code element - handling as plain text".to_string());
            context.handle_pipe_in_table("`", false)?;
        }
        _ => {
            context.consumed.push(next);
            context.state = State::CodeInline;
        }
    }
    Ok(())
}

pub(super) fn double_backtick(context: &mut Context, next: char) -> Result<()> {
    match next {
        '`' => context.state = State::CodeBlock,
        '\n' => {
            context.handle_unexpected_newline("``")?;
        }
        _ => {
            context.consumed.push_str("``");
            context.consumed.push(next);
            context.emit_content_token()?;
            context.state = context.return_stack.pop();
        }
    }
    Ok(())
}

pub(super) fn code_inline(context: &mut Context, next: char) -> Result<()> {
    match next {
        '`' => {
            context.open_inline(ElementType::Codeblock)?;
            context.emitter.add_attribute(Attribute::Inline)?;
            context.emit_token(TokenKind::Content, ElementType::Content)?;
            context.emit_token(TokenKind::Close, ElementType::Codeblock)?;
            context.state = context.return_stack.pop();
        }
        '\n' => {
            context.warning =
                Some("unclosed backtick code element - handling as plain text".to_string());
            let text = format!("`{}", mem::take(&mut context.consumed));
            context.handle_unexpected_newline(&text)?;
        }
        '|' if in_table(context) => {
            context.warning =
                Some("unclosed backtick code element - handling as plain text".to_string());
            context.handle_pipe_in_table("`", false)?;
        }
        _ => context.consumed.push(next),
    }
    Ok(())
}

pub(super) fn code_block(context: &mut Context, next: char) -> Result<()> {
    match next {
        '`' => {
            context.counter += 1;
            if context.counter == 3 {
                context.open_inline(ElementType::Codeblock)?;
                context.emitter.add_attribute(Attribute::Block)?;
                context.emit_token(TokenKind::Content, ElementType::Content)?;
                context.emit_token(TokenKind::Close, ElementType::Codeblock)?;
                context.counter = 0;
                context.state = context.return_stack.pop();
            }
        }
        // newlines are literal: code blocks span lines
        _ => {
            if context.counter != 0 {
                for _ in 0..context.counter {
                    context.consumed.push('`');
                }
                context.counter = 0;
            }
            context.consumed.push(next);
        }
    }
    Ok(())
}

pub(super) fn unordered_list_prep(context: &mut Context, next: char) -> Result<()> {
    match next {
        '\n' => {
            context.state = context.return_stack.pop();
            close_list_levels_inclusive(context)?;
            context.setup_list_parsing();
        }
        ' ' => context.counter += 1,
        '\t' => context.counter += INDENTATION,
        '*' | '+' | '>' | '-' => {
            if context.counter > context.indent_level + INDENTATION {
                close_list_levels_inclusive(context)?;
                context.state = context.return_stack.pop();
                context.setup_list_parsing();
                context.consumed.clear();
                context.consumed.push(next);
            } else {
                if next == '>' {
                    context.blockquote_in_list = true;
                }
                context.state = State::UnorderedList;
            }
        }
        _ => {
            context.consumed.push(next);
            if next.is_ascii_digit() {
                context.state = State::DataConsumingNumber;
            } else {
                close_list_levels_inclusive(context)?;
                context.state = context.return_stack.pop();
                context.setup_list_parsing();
            }
        }
    }
    Ok(())
}

pub(super) fn unordered_list(context: &mut Context, next: char) -> Result<()> {
    match next {
        ' ' | '\t' => {
            if context.counter >= context.indent_level + INDENTATION {
                context.indent_level = context.counter;
                context.counter = 0;
                context.emit_token(TokenKind::Open, ElementType::ListUnordered)?;
                context.emit_token(TokenKind::Open, ElementType::ListItem)?;
                context.state = State::Data;
                open_list_blockquote(context)?;
                context.return_stack.push(State::UnorderedListPrep)?;
            } else {
                if context.counter % INDENTATION != 0 {
                    context.counter -= 1;
                }
                let levels = (context.indent_level - context.counter) / INDENTATION;
                context.indent_level = context.counter;
                context.counter = 0;

                for _ in 0..levels {
                    context.move_up_the_tree()?;
                }

                context.state = State::Data;
                context.emit_token(TokenKind::Open, ElementType::ListItem)?;
                open_list_blockquote(context)?;
                context.return_stack.push(State::UnorderedListPrep)?;
            }
        }
        _ => {
            // not a list marker after all; close every open level
            let mut closed = 0;
            while closed < context.indent_level {
                context.move_up_the_tree()?;
                closed += INDENTATION;
            }
            context.consumed.clear();
            context.consumed.push('-');
            context.consumed.push(next);
            context.counter = 0;
            context.state = context.return_stack.pop();
            context.indent_level = 0;
        }
    }
    Ok(())
}

pub(super) fn ordered_list_prep(context: &mut Context, next: char) -> Result<()> {
    match next {
        '\n' => {
            context.state = context.return_stack.pop();
            close_list_levels_inclusive(context)?;
            context.setup_list_parsing();
        }
        '\t' => context.counter += INDENTATION,
        ' ' => context.counter += 1,
        '+' | '*' | '-' | '>' => {
            if context.counter > context.indent_level + INDENTATION {
                close_list_levels_inclusive(context)?;
                context.state = context.return_stack.pop();
                context.setup_list_parsing();
                context.consumed.clear();
                context.consumed.push(next);
            } else {
                if next == '>' {
                    context.blockquote_in_list = true;
                }
                context.state = State::UnorderedList;
            }
        }
        _ => {
            if next.is_ascii_digit() {
                context.consumed.push(next);
                context.state = State::DataConsumingNumber;
            } else {
                close_list_levels_inclusive(context)?;
                context.consumed.push(next);
                context.state = context.return_stack.pop();
                context.setup_list_parsing();
            }
        }
    }
    Ok(())
}

pub(super) fn image(context: &mut Context, next: char) -> Result<()> {
    match next {
        '[' => context.state = State::AltOpenSquared,
        '\n' => {
            context.handle_unexpected_newline("!")?;
        }
        _ => {
            context.consumed.clear();
            context.consumed.push('!');
            context.consumed.push(next);
            context.state = context.return_stack.pop();
        }
    }
    Ok(())
}

pub(super) fn alt_open_squared(context: &mut Context, next: char) -> Result<()> {
    match next {
        ']' => context.state = State::AltClosedSquared,
        '\n' => {
            let text = format!("{}[{}", bang(context), mem::take(&mut context.alt));
            context.consumed.clear();
            context.handle_unexpected_newline(&text)?;
        }
        '|' if !context.is_image && in_table(context) => {
            let prefix = format!("[{}", mem::take(&mut context.alt));
            context.handle_pipe_in_table(&prefix, true)?;
        }
        _ => context.alt.push(next),
    }
    Ok(())
}

pub(super) fn alt_closed_squared(context: &mut Context, next: char) -> Result<()> {
    match next {
        '(' => context.state = State::UrlOpenRound,
        '\n' => {
            let text = format!(
                "{}[{}]{}",
                bang(context),
                mem::take(&mut context.alt),
                mem::take(&mut context.consumed)
            );
            context.handle_unexpected_newline(&text)?;
        }
        '|' if !context.is_image && in_table(context) => {
            let prefix = format!("[{}]", mem::take(&mut context.alt));
            context.handle_pipe_in_table(&prefix, true)?;
        }
        _ => {
            context.consumed = format!("{}[{}]{}", bang(context), mem::take(&mut context.alt), next);
            context.state = context.return_stack.pop();
        }
    }
    Ok(())
}

pub(super) fn url_open_round(context: &mut Context, next: char) -> Result<()> {
    match next {
        ')' => {
            if context.is_image {
                context.emit_image()?;
            } else {
                context.emit_hyperlink()?;
            }
            context.state = context.return_stack.pop();
        }
        ' ' => context.state = State::TitleOpenRound,
        '\n' => {
            let text = format!(
                "{}[{}]({}",
                bang(context),
                mem::take(&mut context.alt),
                mem::take(&mut context.src)
            );
            context.consumed.clear();
            context.handle_unexpected_newline(&text)?;
        }
        '|' if !context.is_image && in_table(context) => {
            let prefix = format!(
                "[{}]({}",
                mem::take(&mut context.alt),
                mem::take(&mut context.src)
            );
            context.handle_pipe_in_table(&prefix, true)?;
        }
        _ => context.src.push(next),
    }
    Ok(())
}

pub(super) fn title_open_round(context: &mut Context, next: char) -> Result<()> {
    match next {
        '"' => context.state = State::TitleConsuming,
        '\n' => {
            let text = format!(
                "{}[{}]({} ",
                bang(context),
                mem::take(&mut context.alt),
                mem::take(&mut context.src)
            );
            context.consumed.clear();
            context.handle_unexpected_newline(&text)?;
        }
        '|' if !context.is_image && in_table(context) => {
            let prefix = format!(
                "[{}]({} ",
                mem::take(&mut context.alt),
                mem::take(&mut context.src)
            );
            context.handle_pipe_in_table(&prefix, true)?;
        }
        _ => {
            context.consumed = format!(
                "{}[{}]({} {}",
                bang(context),
                mem::take(&mut context.alt),
                mem::take(&mut context.src),
                next
            );
            context.state = context.return_stack.pop();
        }
    }
    Ok(())
}

pub(super) fn title_consuming(context: &mut Context, next: char) -> Result<()> {
    match next {
        '"' => context.state = State::TitleClosedRound,
        '\n' => {
            let text = format!(
                "{}[{}]({} \"{}",
                bang(context),
                mem::take(&mut context.alt),
                mem::take(&mut context.src),
                mem::take(&mut context.consumed)
            );
            context.handle_unexpected_newline(&text)?;
        }
        '|' if !context.is_image && in_table(context) => {
            let prefix = format!(
                "[{}]({} \"",
                mem::take(&mut context.alt),
                mem::take(&mut context.src)
            );
            context.handle_pipe_in_table(&prefix, false)?;
        }
        _ => context.consumed.push(next),
    }
    Ok(())
}

pub(super) fn title_closed_round(context: &mut Context, next: char) -> Result<()> {
    match next {
        ')' => {
            if context.is_image {
                context.emit_image()?;
            } else {
                context.emit_hyperlink()?;
            }
            context.state = context.return_stack.pop();
        }
        '\n' => {
            let text = format!(
                "{}[{}]({} \"{}\"",
                bang(context),
                mem::take(&mut context.alt),
                mem::take(&mut context.src),
                mem::take(&mut context.consumed)
            );
            context.handle_unexpected_newline(&text)?;
        }
        '|' if !context.is_image && in_table(context) => {
            let prefix = format!(
                "[{}]({} \"{}\"",
                mem::take(&mut context.alt),
                mem::take(&mut context.src),
                mem::take(&mut context.consumed)
            );
            context.handle_pipe_in_table(&prefix, true)?;
        }
        _ => {
            let title = mem::take(&mut context.consumed);
            context.consumed = format!(
                "{}[{}]({} \"{}\"{}",
                bang(context),
                mem::take(&mut context.alt),
                mem::take(&mut context.src),
                title,
                next
            );
            context.state = context.return_stack.pop();
        }
    }
    Ok(())
}

pub(super) fn table_header_names(context: &mut Context, next: char) -> Result<()> {
    match next {
        '\n' => {
            if context.consumed_only_whitespace() {
                context.emit_token(TokenKind::Close, ElementType::TableHead)?;
                context.emit_token(TokenKind::Close, ElementType::TableRow)?;
                context.state = State::TableHeaderSeparationPipeAwaiting;
                context.counter = 0;
            } else {
                // header row is missing its terminating pipe
                context.emit_token(TokenKind::Content, ElementType::Content)?;
                context.emitter.handle_flag(ParseFlag::TableFailed)?;
                context.state = context.return_stack.pop();
            }
        }
        '|' => {
            context.emit_token(TokenKind::Content, ElementType::Content)?;
            context.emit_token(TokenKind::Close, ElementType::TableHead)?;
            context.emit_token(TokenKind::Open, ElementType::TableHead)?;
        }
        '*' => {
            context.emit_token(TokenKind::Content, ElementType::Content)?;
            context.state = State::DataAsterisk;
            context.return_stack.push(State::TableHeaderNames)?;
        }
        '`' => {
            context.emit_token(TokenKind::Content, ElementType::Content)?;
            context.state = State::DataBacktick;
            context.return_stack.push(State::TableHeaderNames)?;
        }
        '[' => {
            context.emit_token(TokenKind::Content, ElementType::Content)?;
            context.is_image = false;
            context.state = State::AltOpenSquared;
            context.return_stack.push(State::TableHeaderNames)?;
        }
        _ => context.consumed.push(next),
    }
    Ok(())
}

pub(super) fn table_header_separation_pipe_awaiting(
    context: &mut Context,
    next: char,
) -> Result<()> {
    match next {
        '\n' => {
            context.emitter.handle_flag(ParseFlag::TableFailed)?;
            context.emit_content_token()?;
            context.state = context.return_stack.pop();
        }
        ' ' | '\t' => context.consumed.push(next),
        '|' => {
            context.consumed.push('|');
            context.counter = 0;
            context.alt_counter = 0;
            context.state = State::TableHeaderSeparation;
        }
        _ => {
            context.consumed.push(next);
            context.emitter.handle_flag(ParseFlag::TableFailed)?;
            context.emit_content_token()?;
            context.state = context.return_stack.pop();
        }
    }
    Ok(())
}

pub(super) fn table_header_separation(context: &mut Context, next: char) -> Result<()> {
    match next {
        '\n' => {
            if context.emitter.col_dims() == context.alt_counter as usize {
                context.alt_counter = 0;
                context.consumed.clear();
                context.counter = 0;
                context.state = State::TableCellPipeAwaiting;
                context.emit_token(TokenKind::Open, ElementType::TableRow)?;
                if context.eof_reached {
                    context.emitter.handle_flag(ParseFlag::TableFailed)?;
                }
            } else {
                context.alt_counter = 0;
                context.counter = 0;
                context.emitter.handle_flag(ParseFlag::TableFailed)?;
                context.emit_content_token()?;
                context.state = context.return_stack.pop();
            }
        }
        '|' => {
            context.alt_counter += 1;
            context.consumed.push('|');
            if context.counter < 3 {
                context.emitter.handle_flag(ParseFlag::TableFailed)?;
                context.emit_content_token()?;
                context.state = context.return_stack.pop();
            } else {
                context.counter = 0;
            }
        }
        ' ' | '\t' => context.consumed.push(next),
        '-' => {
            context.counter += 1;
            context.consumed.push('-');
        }
        _ => {
            context.consumed.push(next);
            context.emitter.handle_flag(ParseFlag::TableFailed)?;
            context.emit_content_token()?;
            context.state = context.return_stack.pop();
        }
    }
    Ok(())
}

pub(super) fn table_cell_pipe_awaiting(context: &mut Context, next: char) -> Result<()> {
    match next {
        '\n' => {
            context.emitter.handle_flag(ParseFlag::TableFailed)?;
            context.state = context.return_stack.pop();
        }
        ' ' | '\t' => {}
        '|' => {
            context.emit_token(TokenKind::Open, ElementType::TableCell)?;
            context.state = State::TableCellData;
        }
        _ => {
            context.emitter.handle_flag(ParseFlag::TableFailed)?;
            context.state = context.return_stack.pop();
            context.consumed.push(next);
        }
    }
    Ok(())
}

pub(super) fn table_cell_data(context: &mut Context, next: char) -> Result<()> {
    match next {
        '\n' => {
            if !context.consumed_only_whitespace() {
                // the row is missing its terminating pipe
                context.emit_token(TokenKind::Content, ElementType::Content)?;
                context.emitter.handle_flag(ParseFlag::TableFailed)?;
                context.state = context.return_stack.pop();
            } else {
                context.emit_token(TokenKind::Close, ElementType::TableCell)?;
                context.emit_token(TokenKind::Close, ElementType::TableRow)?;
                context.emit_token(TokenKind::Open, ElementType::TableRow)?;
                if context.eof_reached {
                    context.emitter.handle_flag(ParseFlag::TableFailed)?;
                }
                context.state = State::TableCellPipeAwaiting;
                context.consumed.clear();
            }
        }
        '|' => {
            context.emit_token(TokenKind::Content, ElementType::Content)?;
            context.emit_token(TokenKind::Close, ElementType::TableCell)?;
            context.emit_token(TokenKind::Open, ElementType::TableCell)?;
        }
        '*' => {
            context.emit_token(TokenKind::Content, ElementType::Content)?;
            context.state = State::DataAsterisk;
            context.return_stack.push(State::TableCellData)?;
        }
        '`' => {
            context.emit_token(TokenKind::Content, ElementType::Content)?;
            context.state = State::DataBacktick;
            context.return_stack.push(State::TableCellData)?;
        }
        '[' => {
            context.emit_token(TokenKind::Content, ElementType::Content)?;
            context.is_image = false;
            context.state = State::AltOpenSquared;
            context.return_stack.push(State::TableCellData)?;
        }
        _ => context.consumed.push(next),
    }
    Ok(())
}

/// Opens a blockquote span inside a freshly opened list item when the
/// item's marker carried one.
fn open_list_blockquote(context: &mut Context) -> Result<()> {
    if context.blockquote_in_list {
        context.emit_token(TokenKind::Open, ElementType::Span)?;
        context.emitter.add_attribute(Attribute::BlockQuote)?;
    }
    Ok(())
}

/// Closes `indent_level / INDENTATION + 1` open list levels.
fn close_list_levels_inclusive(context: &mut Context) -> Result<()> {
    let mut closed = 0;
    while closed <= context.indent_level {
        context.move_up_the_tree()?;
        closed += INDENTATION;
    }
    Ok(())
}
