// NOTE: CSS のごく一部だけを扱うパーサ
//
// Rules are comma-separated simple selectors followed by `name: value;`
// declarations. Values are keywords, px lengths or #rrggbb colors.

use std::fmt;

use crate::cursor::Cursor;
use crate::error::{ParseErrorKind, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

// `<selectors> { <declarations> }`
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub selectors: Vec<Selector>,
    pub declarations: Vec<Declaration>,
}

// NOTE: only simple selectors for now. Compound selectors and combinators
// would become new variants here.
#[derive(Clone, Debug, PartialEq)]
pub enum Selector {
    Simple(SimpleSelector),
}

// NOTE: `#id`, `.class`, `body`, `div#main.note` ...
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SimpleSelector {
    pub tag_name: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

// NOTE: margin: auto;
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub value: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Keyword(String),
    Length(f32, Unit),
    Color(Color),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    Px,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Selector specificity as (ids, classes, tags).
///
/// Compared lexicographically, so a single id outweighs any number of classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity(pub usize, pub usize, pub usize);

impl Specificity {
    pub fn ids(&self) -> usize {
        self.0
    }

    pub fn classes(&self) -> usize {
        self.1
    }

    pub fn tags(&self) -> usize {
        self.2
    }
}

impl Selector {
    pub fn specificity(&self) -> Specificity {
        let Selector::Simple(ref simple) = *self;
        let a = simple.id.iter().count();
        let b = simple.classes.len();
        let c = simple.tag_name.iter().count();
        Specificity(a, b, c)
    }
}

impl Value {
    /// Pixel size of a length; anything else counts as 0.
    pub fn to_px(&self) -> f32 {
        match *self {
            Value::Length(f, Unit::Px) => f,
            _ => 0.0,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Keyword(keyword) => write!(f, "{}", keyword),
            Value::Length(length, Unit::Px) => write!(f, "{}px", length),
            Value::Color(color) => write!(f, "{}", color),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// Parse a stylesheet. Rules keep their source order.
pub fn parse(source: &str) -> Result<Stylesheet> {
    let mut parser = Parser { cursor: Cursor::new(source) };
    let rules = parser.parse_rules()?;
    tracing::debug!("parsed stylesheet with {} rules", rules.len());
    Ok(Stylesheet { rules })
}

struct Parser {
    cursor: Cursor,
}

impl Parser {
    fn parse_rules(&mut self) -> Result<Vec<Rule>> {
        let mut rules = Vec::new();
        loop {
            self.cursor.consume_whitespace();
            if self.cursor.eof() {
                break;
            }
            rules.push(self.parse_rule()?);
        }
        Ok(rules)
    }

    fn parse_rule(&mut self) -> Result<Rule> {
        Ok(Rule {
            selectors: self.parse_selectors()?,
            declarations: self.parse_declarations()?,
        })
    }

    fn parse_selectors(&mut self) -> Result<Vec<Selector>> {
        let mut selectors = Vec::new();
        loop {
            selectors.push(Selector::Simple(self.parse_simple_selector()?));
            self.cursor.consume_whitespace();
            match self.cursor.next_char()? {
                ',' => {
                    self.cursor.consume_char()?;
                    self.cursor.consume_whitespace();
                }
                '{' => break,
                c => {
                    return Err(self.cursor.error(ParseErrorKind::UnexpectedCharacter {
                        found: c,
                        expected: "',' or '{' in selector list".to_string(),
                    }))
                }
            }
        }
        // Highest specificity first. sort_by is stable, so ties keep source order.
        selectors.sort_by(|a, b| b.specificity().cmp(&a.specificity()));
        Ok(selectors)
    }

    // NOTE: tag, #id, .class, * in any order until something else shows up
    fn parse_simple_selector(&mut self) -> Result<SimpleSelector> {
        let mut selector = SimpleSelector::default();
        while let Some(c) = self.cursor.peek() {
            match c {
                '#' => {
                    self.cursor.consume_char()?;
                    selector.id = Some(self.parse_selector_name()?);
                }
                '.' => {
                    self.cursor.consume_char()?;
                    selector.classes.push(self.parse_selector_name()?);
                }
                '*' => {
                    self.cursor.consume_char()?;
                }
                c if valid_identifier_char(c) => {
                    selector.tag_name = Some(self.parse_identifier());
                }
                _ => break,
            }
        }
        Ok(selector)
    }

    // The identifier after `#` or `.` must not be empty.
    fn parse_selector_name(&mut self) -> Result<String> {
        let name = self.parse_identifier();
        if name.is_empty() {
            let found = self.cursor.next_char()?;
            return Err(self.cursor.error(ParseErrorKind::UnexpectedCharacter {
                found,
                expected: "an identifier".to_string(),
            }));
        }
        Ok(name)
    }

    fn parse_declarations(&mut self) -> Result<Vec<Declaration>> {
        self.cursor.expect_char('{')?;
        let mut declarations = Vec::new();
        loop {
            self.cursor.consume_whitespace();
            if self.cursor.next_char()? == '}' {
                self.cursor.consume_char()?;
                break;
            }
            declarations.push(self.parse_declaration()?);
        }
        Ok(declarations)
    }

    // name: value;
    fn parse_declaration(&mut self) -> Result<Declaration> {
        let property_name = self.parse_identifier();
        self.cursor.consume_whitespace();
        self.expect_delimiter(':')?;
        self.cursor.consume_whitespace();
        let value = self.parse_value()?;
        self.cursor.consume_whitespace();
        self.expect_delimiter(';')?;

        Ok(Declaration { name: property_name, value })
    }

    fn expect_delimiter(&mut self, expected: char) -> Result<()> {
        let found = self.cursor.next_char()?;
        if found != expected {
            return Err(self.cursor.error(ParseErrorKind::MalformedDeclaration { expected, found }));
        }
        self.cursor.consume_char()?;
        Ok(())
    }

    fn parse_value(&mut self) -> Result<Value> {
        match self.cursor.next_char()? {
            '0'..='9' => self.parse_length(),
            '#' => self.parse_color(),
            _ => Ok(Value::Keyword(self.parse_identifier())),
        }
    }

    fn parse_length(&mut self) -> Result<Value> {
        Ok(Value::Length(self.parse_float()?, self.parse_unit()?))
    }

    fn parse_float(&mut self) -> Result<f32> {
        let start = self.cursor.offset();
        let s = self.cursor.consume_while(|c| matches!(c, '0'..='9' | '.'));
        s.parse()
            .map_err(|_| self.cursor.error_at(start, ParseErrorKind::InvalidNumber { text: s.clone() }))
    }

    fn parse_unit(&mut self) -> Result<Unit> {
        let start = self.cursor.offset();
        let unit = self.parse_identifier();
        match &*unit.to_ascii_lowercase() {
            "px" => Ok(Unit::Px),
            _ => Err(self.cursor.error_at(start, ParseErrorKind::InvalidUnit { unit })),
        }
    }

    fn parse_color(&mut self) -> Result<Value> {
        self.cursor.expect_char('#')?;
        Ok(Value::Color(Color {
            r: self.parse_hex_pair()?,
            g: self.parse_hex_pair()?,
            b: self.parse_hex_pair()?,
            a: 255,
        }))
    }

    fn parse_hex_pair(&mut self) -> Result<u8> {
        let high = self.parse_hex_digit()?;
        let low = self.parse_hex_digit()?;
        Ok((high << 4) | low)
    }

    fn parse_hex_digit(&mut self) -> Result<u8> {
        let found = self.cursor.next_char()?;
        match found.to_digit(16) {
            Some(digit) => {
                self.cursor.consume_char()?;
                Ok(digit as u8)
            }
            None => Err(self.cursor.error(ParseErrorKind::InvalidHexDigit { found })),
        }
    }

    fn parse_identifier(&mut self) -> String {
        self.cursor.consume_while(valid_identifier_char)
    }
}

// ASCII only. Non-ASCII characters end an identifier.
fn valid_identifier_char(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_')
}
