//! Companion stylesheet construction.
//!
//! Every attribute used in the tree produces exactly one class block,
//! emitted the first time the HTML renderer encounters it.

use crate::error::{ConvertError, Result};
use crate::node::Attribute;
use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

lazy_static! {
    /// Fixed attribute → CSS property mapping. Styling a new attribute
    /// means adding it here.
    static ref ATTRIBUTE_CSS: HashMap<Attribute, &'static str> = {
        let mut map = HashMap::new();
        map.insert(Attribute::Bold, "font-weight: bold;");
        map.insert(Attribute::Italic, "font-style: italic;");
        map.insert(Attribute::FontSize1, "font-size: 32px;");
        map.insert(Attribute::FontSize2, "font-size: 24px;");
        map.insert(Attribute::FontSize3, "font-size: 20.8px;");
        map.insert(Attribute::FontSize4, "font-size: 16px;");
        map.insert(Attribute::FontSize5, "font-size: 12.8px;");
        map.insert(Attribute::FontSize6, "font-size: 11.2px;");
        map.insert(Attribute::Inline, "display: inline;");
        map.insert(Attribute::Block, "display: block;");
        map.insert(
            Attribute::BlockQuote,
            "padding-left: 1em;\nborder-left: 2px solid purple;\ndisplay: block;",
        );
        map.insert(Attribute::TableRow, "border-bottom: 1px solid #ddd;");
        map.insert(
            Attribute::TableHeader,
            "background-color: #ddd;\npadding: .4rem .8rem;",
        );
        map.insert(Attribute::TableStyle, "border-collapse: collapse;");
        map.insert(Attribute::TableCell, "padding: .4rem .8rem;");
        map.insert(Attribute::ImageAttr, "max-width: 100%;\nheight: auto;");
        map
    };
}

/// Accumulates the stylesheet for one rendered document.
///
/// Class blocks are deduplicated through a used-set, so repeated
/// attributes in the tree cost nothing beyond the first sighting.
#[derive(Debug, Default)]
pub struct StylesheetBuilder {
    used: HashSet<Attribute>,
    sheet: String,
}

impl StylesheetBuilder {
    pub fn new() -> Self {
        StylesheetBuilder {
            used: HashSet::new(),
            sheet: String::new(),
        }
    }

    /// Writes the default document styling.
    pub fn create_default_styling(&mut self) {
        self.sheet.push_str("body {\nmargin: 2rem auto;\nwidth: 80%;\n}\n");
    }

    /// Ensures a class block exists for the attribute, writing it on
    /// first use.
    pub fn add_attr_class(&mut self, attribute: Attribute) -> Result<()> {
        if !self.used.insert(attribute) {
            return Ok(());
        }
        let properties = ATTRIBUTE_CSS
            .get(&attribute)
            .ok_or(ConvertError::UnknownAttribute { attribute })?;
        self.sheet
            .push_str(&format!(".{} {{\n{}\n}}\n", attribute.name(), properties));
        Ok(())
    }

    /// The stylesheet text accumulated so far.
    pub fn as_str(&self) -> &str {
        &self.sheet
    }

    /// Consumes the builder, yielding the finished stylesheet.
    pub fn finish(self) -> String {
        self.sheet
    }
}
