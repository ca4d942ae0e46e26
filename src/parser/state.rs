use super::context::Context;
use super::handlers;
use crate::error::Result;

/// Signature shared by every state handler.
pub type Handler = fn(&mut Context, char) -> Result<()>;

/// The tokenizer states.
///
/// Adding a state means adding a variant here and a handler in
/// `handlers.rs`, then linking the two in [`State::handler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Baseline scanning.
    Data,
    /// Counting `#` for a heading.
    DataHashtag,
    /// One `*` seen; italic may open.
    DataAsterisk,
    /// Inside `*…`.
    DataAsteriskData,
    /// Two `*` seen; bold may open.
    DataDoubleAsterisk,
    /// Inside `**…`.
    DataDoubleAsteriskData,
    /// Three `*` seen; bold italic may open.
    DataTripleAsterisk,
    /// Inside `***…`.
    DataTripleAsteriskData,
    /// Digits of a potential ordered-list prefix.
    DataConsumingNumber,
    /// `N.` seen; awaiting the space that opens the list item.
    DataOrdinalNumber,
    /// Dashes at line start; horizontal rule or unordered list.
    HorizontalLine,
    /// One backtick seen.
    DataBacktick,
    /// Two backticks seen.
    DataDoubleBacktick,
    /// Single-backtick code span body.
    CodeInline,
    /// Triple-backtick code block body; newlines are literal.
    CodeBlock,
    /// Between unordered list items; counting indentation.
    UnorderedListPrep,
    /// List marker seen; indent arithmetic pending.
    UnorderedList,
    /// Between ordered list items; counting indentation.
    OrderedListPrep,
    /// `!` seen; awaiting `[`.
    Image,
    /// Capturing `[alt`.
    AltOpenSquared,
    /// `]` seen; awaiting `(`.
    AltClosedSquared,
    /// Capturing `(url`.
    UrlOpenRound,
    /// Space after the url; awaiting the opening title quote.
    TitleOpenRound,
    /// Capturing the quoted title.
    TitleConsuming,
    /// Closing title quote seen; awaiting `)`.
    TitleClosedRound,
    /// First row of a table.
    TableHeaderNames,
    /// Separator row; awaiting its leading `|`.
    TableHeaderSeparationPipeAwaiting,
    /// Inside the `|---|---|` separator row.
    TableHeaderSeparation,
    /// Body row; awaiting the `|` that opens the next cell.
    TableCellPipeAwaiting,
    /// Inside a body cell.
    TableCellData,
}

impl State {
    /// Whether this state may be recorded on the return stack.
    ///
    /// Return states represent constructs that can contain other
    /// constructs; an inline state has nowhere to resume and must never
    /// be pushed.
    pub fn is_resumable(self) -> bool {
        matches!(
            self,
            State::Data
                | State::UnorderedListPrep
                | State::OrderedListPrep
                | State::TableHeaderNames
                | State::TableCellData
        )
    }

    /// The handler for this state, resolvable in O(1).
    pub fn handler(self) -> Handler {
        match self {
            State::Data => handlers::data,
            State::DataHashtag => handlers::hashtag,
            State::DataAsterisk => handlers::asterisk,
            State::DataAsteriskData => handlers::asterisk_data,
            State::DataDoubleAsterisk => handlers::double_asterisk,
            State::DataDoubleAsteriskData => handlers::double_asterisk_data,
            State::DataTripleAsterisk => handlers::triple_asterisk,
            State::DataTripleAsteriskData => handlers::triple_asterisk_data,
            State::DataConsumingNumber => handlers::consuming_number,
            State::DataOrdinalNumber => handlers::ordinal_number,
            State::HorizontalLine => handlers::horizontal_line,
            State::DataBacktick => handlers::backtick,
            State::DataDoubleBacktick => handlers::double_backtick,
            State::CodeInline => handlers::code_inline,
            State::CodeBlock => handlers::code_block,
            State::UnorderedListPrep => handlers::unordered_list_prep,
            State::UnorderedList => handlers::unordered_list,
            State::OrderedListPrep => handlers::ordered_list_prep,
            State::Image => handlers::image,
            State::AltOpenSquared => handlers::alt_open_squared,
            State::AltClosedSquared => handlers::alt_closed_squared,
            State::UrlOpenRound => handlers::url_open_round,
            State::TitleOpenRound => handlers::title_open_round,
            State::TitleConsuming => handlers::title_consuming,
            State::TitleClosedRound => handlers::title_closed_round,
            State::TableHeaderNames => handlers::table_header_names,
            State::TableHeaderSeparationPipeAwaiting => {
                handlers::table_header_separation_pipe_awaiting
            }
            State::TableHeaderSeparation => handlers::table_header_separation,
            State::TableCellPipeAwaiting => handlers::table_cell_pipe_awaiting,
            State::TableCellData => handlers::table_cell_data,
        }
    }
}
