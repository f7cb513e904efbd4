use super::errors::GrammarSyntaxErrorContent;
use super::parser::{GrammarParser, ParseResult};
use super::utils::*;
use crate::ast::{ClassPart, ExpressionKind};
use crate::location::Position;

impl<'a> GrammarParser<'a> {
    /// Try to match an identifier
    pub(super) fn identifier(&mut self) -> Option<&'a str> {
        let rest = self.rest();

        match rest.chars().next() {
            Some(c) if is_identifier_start(c) => {}
            Some(_) | None => return None,
        }

        let len = rest
            .char_indices()
            .find(|(_, c)| !is_identifier_part(*c))
            .map_or(rest.len(), |(i, _)| i);

        self.pos += len;

        Some(&rest[..len])
    }

    /// Match a quoted string (either with simple or double quotes)
    pub(super) fn string_literal(&mut self) -> ParseResult<String> {
        let started_at = self.position(self.pos);

        // Callers ensure the cursor is on a quote
        let quote = self.bump().unwrap_or('"');
        let mut value = String::new();

        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.bump();
                    break Ok(value);
                }

                Some('\\') => {
                    self.bump();

                    if let Some(c) = self.escape(started_at, |started_at| {
                        GrammarSyntaxErrorContent::UnterminatedLiteral { started_at }
                    })? {
                        value.push(c);
                    }
                }

                Some('\n') | None => {
                    break Err(self.error_here(
                        GrammarSyntaxErrorContent::UnterminatedLiteral { started_at },
                        Some(if quote == '"' {
                            "you may need to add a closing quote '\"'"
                        } else {
                            "you may need to add a closing quote '''"
                        }),
                    ))
                }

                Some(c) => {
                    self.bump();
                    value.push(c);
                }
            }
        }
    }

    /// Match a character class (e.g. `[^a-z_]i`)
    pub(super) fn class(&mut self) -> ParseResult<ExpressionKind> {
        let started_at = self.position(self.pos);

        self.bump();

        let inverted = self.eat('^');
        let mut parts = vec![];

        loop {
            let from = match self.class_char(started_at)? {
                ClassChar::End => break,
                ClassChar::Skip => continue,
                ClassChar::Char(c) => c,
            };

            if self.peek() != Some('-') || self.peek_second() == Some(']') {
                parts.push(ClassPart::Char(from));
                continue;
            }

            self.bump();

            let to = loop {
                match self.class_char(started_at)? {
                    ClassChar::Char(c) => break Some(c),
                    ClassChar::Skip => continue,
                    ClassChar::End => break None,
                }
            };

            // A dash right before the closing bracket is a plain character
            let to = match to {
                Some(to) => to,
                None => {
                    parts.push(ClassPart::Char(from));
                    parts.push(ClassPart::Char('-'));
                    break;
                }
            };

            if from > to {
                return Err(self.error_here(
                    GrammarSyntaxErrorContent::InvalidClassRange { from, to },
                    Some("the range's start must not come after its end"),
                ));
            }

            parts.push(ClassPart::Range(from, to));
        }

        let ignore_case = self.eat('i');

        Ok(ExpressionKind::Class {
            parts,
            inverted,
            ignore_case,
        })
    }

    /// Match a single character inside of a class
    fn class_char(&mut self, started_at: Position) -> ParseResult<ClassChar> {
        match self.peek() {
            Some(']') => {
                self.bump();
                Ok(ClassChar::End)
            }

            Some('\\') => {
                self.bump();

                Ok(self
                    .escape(started_at, |started_at| {
                        GrammarSyntaxErrorContent::UnterminatedClass { started_at }
                    })?
                    .map_or(ClassChar::Skip, ClassChar::Char))
            }

            Some('\n') | None => Err(self.error_here(
                GrammarSyntaxErrorContent::UnterminatedClass { started_at },
                Some("you may need to add a closing bracket ']'"),
            )),

            Some(c) => {
                self.bump();
                Ok(ClassChar::Char(c))
            }
        }
    }

    /// Decode an escape sequence, the backslash being already consumed
    ///
    /// Line continuations (a backslash followed by a newline) produce no character.
    fn escape(
        &mut self,
        started_at: Position,
        unterminated: fn(Position) -> GrammarSyntaxErrorContent,
    ) -> ParseResult<Option<char>> {
        let escape_start = self.pos - 1;

        let c = match self.bump() {
            Some(c) => c,
            None => return Err(self.error_here(unterminated(started_at), None)),
        };

        let decoded = match c {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            '0' if !matches!(self.peek(), Some('0'..='9')) => '\0',
            '\n' => return Ok(None),
            'x' => self.hex_escape(escape_start, 2)?,
            'u' if self.eat('{') => {
                let digits = self.rest().find('}').unwrap_or(0);
                let value = self.hex_escape(escape_start, digits)?;

                if !self.eat('}') {
                    return Err(self.invalid_escape(escape_start));
                }

                value
            }
            'u' => self.hex_escape(escape_start, 4)?,
            other => other,
        };

        Ok(Some(decoded))
    }

    fn hex_escape(&mut self, escape_start: usize, digits: usize) -> ParseResult<char> {
        let hex = self.rest().get(..digits).unwrap_or("");

        if digits == 0 || hex.len() != digits || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(self.invalid_escape(escape_start));
        }

        let decoded = u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.invalid_escape(escape_start))?;

        self.pos += digits;

        Ok(decoded)
    }

    fn invalid_escape(&self, escape_start: usize) -> super::GrammarSyntaxError {
        super::GrammarSyntaxError::new(
            self.location_from(escape_start),
            GrammarSyntaxErrorContent::InvalidEscape,
            Some("hexadecimal escapes are written \\xHH, \\uHHHH or \\u{H...}"),
        )
    }

    /// Match a code block, returning its trimmed content (e.g. `{ return a; }` gives `return a;`)
    ///
    /// Braces must be balanced inside of the block.
    pub(super) fn code_block(&mut self) -> ParseResult<String> {
        let started_at = self.position(self.pos);

        self.bump();

        let content_start = self.pos;
        let mut depth: u32 = 0;

        loop {
            match self.bump() {
                Some('{') => depth += 1,
                Some('}') if depth == 0 => break,
                Some('}') => depth -= 1,
                Some(_) => {}
                None => {
                    return Err(self.error_here(
                        GrammarSyntaxErrorContent::UnterminatedCodeBlock { started_at },
                        Some("you may need to add a closing brace '}'"),
                    ))
                }
            }
        }

        Ok(self.input[content_start..self.pos - 1].trim().to_string())
    }
}

/// A single item read inside of a class
enum ClassChar {
    Char(char),
    /// Line continuation
    Skip,
    /// Closing bracket
    End,
}
