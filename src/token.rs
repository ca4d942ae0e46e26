/// Token model shared by the tokenizer, the emitters, and the tree builders.
///
/// The tokenizer communicates exclusively through [`Token`] values: a token
/// opens an element, closes it, or attaches textual content at the current
/// cursor. Image and hyperlink opens are the only tokens that carry the
/// auxiliary `alt` and `title` payloads.

/// The kind of action a token requests from the tree builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Open a new element and descend the cursor into it.
    Open,
    /// Close the current element and ascend the cursor.
    Close,
    /// Attach a text leaf at the cursor without moving it.
    Content,
    /// End-of-input marker; a no-op for the builders.
    Eof,
}

/// Every element the document tree can contain.
///
/// Each variant maps to a fixed HTML tag name; `Content` is inline text and
/// renders without a tag of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    DocStart,
    Content,
    Header1,
    Header2,
    Header3,
    Header4,
    Header5,
    Header6,
    Paragraph,
    Codeblock,
    HorizontalLine,
    Hyperlink,
    Image,
    Span,
    ListOrdered,
    ListUnordered,
    ListItem,
    Table,
    TableHead,
    TableRow,
    TableCell,
}

impl ElementType {
    /// The HTML tag this element renders as.
    pub fn tag_name(self) -> &'static str {
        match self {
            ElementType::DocStart => "!DOCTYPE html",
            ElementType::Content => "content",
            ElementType::Header1 => "h1",
            ElementType::Header2 => "h2",
            ElementType::Header3 => "h3",
            ElementType::Header4 => "h4",
            ElementType::Header5 => "h5",
            ElementType::Header6 => "h6",
            ElementType::Paragraph => "p",
            ElementType::Codeblock => "code",
            ElementType::HorizontalLine => "hr",
            ElementType::Hyperlink => "a",
            ElementType::Image => "img",
            ElementType::Span => "span",
            ElementType::ListOrdered => "ol",
            ElementType::ListUnordered => "ul",
            ElementType::ListItem => "li",
            ElementType::Table => "table",
            ElementType::TableHead => "th",
            ElementType::TableRow => "tr",
            ElementType::TableCell => "td",
        }
    }

    /// Heading element for a level between 1 and 6.
    ///
    /// Levels outside the range clamp to the nearest bound; the tokenizer
    /// never produces them because heading recognition stops counting at
    /// six hashes.
    pub fn header(level: u8) -> ElementType {
        match level {
            0 | 1 => ElementType::Header1,
            2 => ElementType::Header2,
            3 => ElementType::Header3,
            4 => ElementType::Header4,
            5 => ElementType::Header5,
            _ => ElementType::Header6,
        }
    }
}

/// The datum emitted by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub element: ElementType,
    /// Text for `Content` tokens; `src`/`href` for image and hyperlink opens.
    pub content: String,
    /// Alt text (images) or displayed text (hyperlinks); empty otherwise.
    pub alt: String,
    /// Optional title for image and hyperlink opens; empty otherwise.
    pub title: String,
}

impl Token {
    /// A token without the image/hyperlink payloads.
    pub fn new(kind: TokenKind, element: ElementType, content: String) -> Self {
        Token {
            kind,
            element,
            content,
            alt: String::new(),
            title: String::new(),
        }
    }

    /// A token carrying the full payload of an image or hyperlink open.
    pub fn with_payload(
        kind: TokenKind,
        element: ElementType,
        content: String,
        alt: String,
        title: String,
    ) -> Self {
        Token {
            kind,
            element,
            content,
            alt,
            title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_names() {
        assert_eq!(ElementType::DocStart.tag_name(), "!DOCTYPE html");
        assert_eq!(ElementType::Paragraph.tag_name(), "p");
        assert_eq!(ElementType::HorizontalLine.tag_name(), "hr");
        assert_eq!(ElementType::ListUnordered.tag_name(), "ul");
        assert_eq!(ElementType::TableHead.tag_name(), "th");
    }

    #[test]
    fn test_header_levels() {
        assert_eq!(ElementType::header(1), ElementType::Header1);
        assert_eq!(ElementType::header(3), ElementType::Header3);
        assert_eq!(ElementType::header(6), ElementType::Header6);
    }

    #[test]
    fn test_token_payload() {
        let token = Token::with_payload(
            TokenKind::Open,
            ElementType::Image,
            "u.png".to_string(),
            "cap".to_string(),
            "t".to_string(),
        );
        assert_eq!(token.content, "u.png");
        assert_eq!(token.alt, "cap");
        assert_eq!(token.title, "t");
    }
}
