//! HTML and CSS parsing plus style resolution.
//!
//! ```
//! use sumire_core::Document;
//!
//! let document = Document::parse("<p class=\"note\">hi</p>", ".note {display: block;}").unwrap();
//! let styled = document.style();
//! assert_eq!(styled.display(), sumire_core::style::Display::Block);
//! ```

mod cursor;
pub mod css;
pub mod dom;
pub mod error;
pub mod html;
pub mod style;

pub use error::{Location, ParseError, ParseErrorKind, Result};

use style::StyledNode;

/// A parsed DOM tree together with the stylesheet that applies to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub root: dom::Node,
    pub stylesheet: css::Stylesheet,
}

impl Document {
    /// Parse both sources. Fails on the first malformed input.
    pub fn parse(html: &str, css: &str) -> Result<Document> {
        let root = html::parse(html)?;
        let stylesheet = css::parse(css)?;
        Ok(Document { root, stylesheet })
    }

    /// Build the styled tree. It borrows the DOM, so restyling means calling this again.
    pub fn style(&self) -> StyledNode<'_> {
        style::style_tree(&self.root, &self.stylesheet)
    }
}
