// HTML パーサ
//
// Elements with quoted attributes and text only. Comments, doctypes,
// self-closing tags and entities are rejected or passed through as text,
// and any markup that is not well formed aborts the parse.

use crate::cursor::Cursor;
use crate::dom;
use crate::error::{ParseErrorKind, Result};

/// Parse a document. A lone top-level node becomes the root, otherwise the
/// top-level nodes are wrapped in a synthesized `<html>`.
pub fn parse(source: &str) -> Result<dom::Node> {
    let mut parser = Parser { cursor: Cursor::new(source) };
    let mut nodes = parser.parse_nodes()?;

    // NOTE: parse_nodes stops at "</", so a stray closing tag ends up here
    if let Some(c) = parser.cursor.peek() {
        return Err(parser.cursor.error(ParseErrorKind::UnexpectedCharacter {
            found: c,
            expected: "end of input".to_string(),
        }));
    }
    tracing::debug!("parsed HTML document with {} top-level nodes", nodes.len());

    if nodes.len() == 1 {
        Ok(nodes.swap_remove(0))
    } else {
        Ok(dom::elem("html".to_string(), dom::AttrMap::new(), nodes))
    }
}

struct Parser {
    cursor: Cursor,
}

impl Parser {
    // siblings up to eof or the parent's closing tag
    fn parse_nodes(&mut self) -> Result<Vec<dom::Node>> {
        let mut nodes = Vec::new();
        loop {
            self.cursor.consume_whitespace();
            if self.cursor.eof() || self.cursor.starts_with("</") {
                break;
            }
            nodes.push(self.parse_node()?);
        }
        Ok(nodes)
    }

    fn parse_node(&mut self) -> Result<dom::Node> {
        match self.cursor.next_char()? {
            '<' => self.parse_element(),
            _ => Ok(self.parse_text()),
        }
    }

    // <tag attrs>children</tag>
    fn parse_element(&mut self) -> Result<dom::Node> {
        self.cursor.expect_char('<')?;
        let tag_name = self.parse_tag_name()?;
        let attrs = self.parse_attributes()?;
        self.cursor.expect_char('>')?;

        let children = self.parse_nodes()?;

        self.cursor.expect_char('<')?;
        self.cursor.expect_char('/')?;
        let start = self.cursor.offset();
        let closing_name = self.cursor.consume_while(is_tag_name_char);
        if closing_name != tag_name {
            return Err(self.cursor.error_at(
                start,
                ParseErrorKind::MismatchedClosingTag { expected: tag_name, found: closing_name },
            ));
        }
        self.cursor.expect_char('>')?;

        Ok(dom::elem(tag_name, attrs, children))
    }

    // NOTE: 属性名にも使う
    fn parse_tag_name(&mut self) -> Result<String> {
        let name = self.cursor.consume_while(is_tag_name_char);
        if name.is_empty() {
            let found = self.cursor.next_char()?;
            return Err(self.cursor.error(ParseErrorKind::UnexpectedCharacter {
                found,
                expected: "a tag or attribute name".to_string(),
            }));
        }
        Ok(name)
    }

    fn parse_attributes(&mut self) -> Result<dom::AttrMap> {
        let mut attributes = dom::AttrMap::new();
        loop {
            self.cursor.consume_whitespace();
            if self.cursor.next_char()? == '>' {
                break;
            }
            let (name, value) = self.parse_attr()?;
            attributes.insert(name, value);
        }
        Ok(attributes)
    }

    fn parse_attr(&mut self) -> Result<(String, String)> {
        let name = self.parse_tag_name()?;
        self.cursor.expect_char('=')?;
        let value = self.parse_attr_value()?;
        Ok((name, value))
    }

    // "..." or '...', closed by the same quote
    fn parse_attr_value(&mut self) -> Result<String> {
        let found = self.cursor.next_char()?;
        if found != '"' && found != '\'' {
            return Err(self.cursor.error(ParseErrorKind::UnexpectedCharacter {
                found,
                expected: "a quoted attribute value".to_string(),
            }));
        }
        let open_quote = self.cursor.consume_char()?;
        let value = self.cursor.consume_while(|c| c != open_quote);
        self.cursor.expect_char(open_quote)?;
        Ok(value)
    }

    fn parse_text(&mut self) -> dom::Node {
        dom::text(self.cursor.consume_while(|c| c != '<'))
    }
}

fn is_tag_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}
