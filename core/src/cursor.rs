// NOTE: HTML と CSS のパーサが共有する文字カーソル
//
// Only the offset is tracked while parsing. Line and column are worked out
// when an error is built.

use crate::error::{Location, ParseError, ParseErrorKind, Result};

/// Forward-only cursor over the characters of a source string.
///
/// Positions are character indices, so a multi-byte character is always
/// consumed as a whole.
#[derive(Debug, Clone)]
pub struct Cursor {
    input: Vec<char>,
    pos: usize,
}

impl Cursor {
    pub fn new(source: &str) -> Cursor {
        Cursor { input: source.chars().collect(), pos: 0 }
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// The current character, or `None` at end of input.
    pub fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    /// Like `peek`, but running out of input is an error.
    pub fn next_char(&self) -> Result<char> {
        self.peek().ok_or_else(|| self.end_of_input("more input"))
    }

    // lookahead only, nothing is consumed
    pub fn starts_with(&self, s: &str) -> bool {
        let mut rest = self.input[self.pos.min(self.input.len())..].iter();
        s.chars().all(|c| rest.next() == Some(&c))
    }

    pub fn consume_char(&mut self) -> Result<char> {
        let c = self.next_char()?;
        self.pos += 1;
        Ok(c)
    }

    /// Longest prefix whose characters all satisfy `test`.
    pub fn consume_while<F>(&mut self, test: F) -> String
    where
        F: Fn(char) -> bool,
    {
        let mut result = String::new();
        while let Some(c) = self.peek() {
            if !test(c) {
                break;
            }
            result.push(c);
            self.pos += 1;
        }
        result
    }

    pub fn consume_whitespace(&mut self) {
        self.consume_while(char::is_whitespace);
    }

    /// Consume one character and fail unless it is `expected`.
    pub fn expect_char(&mut self, expected: char) -> Result<()> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(found) => Err(self.error(ParseErrorKind::UnexpectedCharacter {
                found,
                expected: format!("{:?}", expected),
            })),
            None => Err(self.end_of_input(&format!("{:?}", expected))),
        }
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Line and column of the current position.
    pub fn location(&self) -> Location {
        self.location_at(self.pos)
    }

    // Walks the input up to `offset`, so only call this on the error path.
    pub fn location_at(&self, offset: usize) -> Location {
        let end = offset.min(self.input.len());
        let mut line = 1;
        let mut column = 1;
        for &c in &self.input[..end] {
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Location { offset, line, column }
    }

    /// Build an error of the given kind at the current position.
    pub fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.location())
    }

    /// Build an error pointing back at an earlier `offset`.
    pub fn error_at(&self, offset: usize, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.location_at(offset))
    }

    pub fn end_of_input(&self, expected: &str) -> ParseError {
        self.error(ParseErrorKind::UnexpectedEndOfInput { expected: expected.to_string() })
    }
}
