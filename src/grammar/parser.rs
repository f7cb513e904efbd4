use super::errors::{GrammarSyntaxError, GrammarSyntaxErrorContent};
use super::utils::*;
use crate::ast::{Expression, ExpressionKind, Grammar, Initializer, Rule};
use crate::location::{LineIndex, Location, Position};

pub type ParseResult<T> = Result<T, GrammarSyntaxError>;

/// Parse a grammar's text into a [syntax tree](`Grammar`)
///
/// Only the notation is checked here: duplicate or undefined rules are reported by the
/// [compiler's passes](crate::compiler::Passes).
pub fn parse_grammar(text: &str) -> ParseResult<Grammar> {
    GrammarParser::new(text).grammar()
}

/// Recursive-descent parser over the grammar notation
///
/// Every method starts at the current cursor and either consumes what it matched,
/// or fails with an error. Methods prefixed by `at_` never consume anything.
pub(super) struct GrammarParser<'a> {
    pub(super) input: &'a str,
    pub(super) pos: usize,
    lines: LineIndex,
}

impl<'a> GrammarParser<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            lines: LineIndex::new(input),
        }
    }

    // -- Cursor helpers --

    pub(super) fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub(super) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(super) fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    pub(super) fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    pub(super) fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    pub(super) fn position(&self, offset: usize) -> Position {
        self.lines.position(self.input, offset)
    }

    /// Location from `start` to the cursor
    pub(super) fn location_from(&self, start: usize) -> Location {
        self.lines.location(self.input, start, self.pos)
    }

    /// Location of the next character (or an empty one at the end of the input)
    pub(super) fn next_char_location(&self) -> Location {
        let end = self.pos + self.peek().map_or(0, char::len_utf8);
        self.lines.location(self.input, self.pos, end)
    }

    pub(super) fn error_here(
        &self,
        content: GrammarSyntaxErrorContent,
        tip: Option<&'static str>,
    ) -> GrammarSyntaxError {
        GrammarSyntaxError::new(self.next_char_location(), content, tip)
    }

    /// Run a sub-parser and rewind the cursor afterwards, whatever the result
    fn lookahead<T>(&mut self, parse: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.pos;
        let result = parse(self);
        self.pos = saved;
        result
    }

    /// Skip whitespaces and comments
    pub(super) fn skip_trivia(&mut self) -> ParseResult<()> {
        loop {
            match self.peek() {
                Some(c) if is_whitespace(c) => {
                    self.bump();
                }

                Some('/') if self.peek_second() == Some('/') => {
                    let len = self.rest().find('\n').unwrap_or(self.rest().len());
                    self.pos += len;
                }

                Some('/') if self.peek_second() == Some('*') => {
                    let started_at = self.position(self.pos);

                    match self.rest()[2..].find("*/") {
                        Some(len) => self.pos += len + 4,
                        None => {
                            self.pos = self.input.len();

                            return Err(self.error_here(
                                GrammarSyntaxErrorContent::UnterminatedComment { started_at },
                                Some("you can close the comment with '*/'"),
                            ));
                        }
                    }
                }

                _ => return Ok(()),
            }
        }
    }

    // -- Grammar structure --

    fn grammar(mut self) -> ParseResult<Grammar> {
        self.skip_trivia()?;

        let initializer = if self.peek() == Some('{') {
            let start = self.pos;
            let code = self.code_block()?;
            let location = self.location_from(start);

            self.skip_trivia()?;
            self.eat(';');

            Some(Initializer { code, location })
        } else {
            None
        };

        let mut rules = vec![];

        loop {
            self.skip_trivia()?;

            if self.peek().is_none() {
                break;
            }

            rules.push(self.rule()?);
        }

        if rules.is_empty() {
            return Err(self.error_here(
                GrammarSyntaxErrorContent::ExpectedRuleDeclaration,
                Some("a grammar needs at least one rule, such as: start = \"a\""),
            ));
        }

        Ok(Grammar {
            initializer,
            rules,
            location: self.lines.location(self.input, 0, self.input.len()),
        })
    }

    /// Parse a rule declaration (syntax: `name "display name"? = expression ;?`)
    fn rule(&mut self) -> ParseResult<Rule> {
        let start = self.pos;

        let name = match self.identifier() {
            Some(name) => name,
            None => {
                return Err(self.error_here(
                    GrammarSyntaxErrorContent::ExpectedRuleDeclaration,
                    Some(match self.peek() {
                        Some('0'..='9') => "digits are not allowed to begin a rule's name",
                        _ => "only alphabetic and underscores characters are allowed to begin a rule's name",
                    }),
                ))
            }
        };

        self.check_reserved(name, start)?;
        self.skip_trivia()?;

        let display_name = match self.peek() {
            Some('"') | Some('\'') => {
                let name_start = self.pos;
                let display_name = self.string_literal()?;
                self.skip_trivia()?;
                Some((display_name, name_start))
            }
            _ => None,
        };

        if !self.eat('=') {
            return Err(self.error_here(
                GrammarSyntaxErrorContent::ExpectedRuleAssignmentOp,
                Some("you may have forgot to add the rule assignment operator '='"),
            ));
        }

        self.skip_trivia()?;

        let mut expression = self.expression()?;

        if let Some((display_name, name_start)) = display_name {
            let location = self.location_from(name_start);

            expression = Expression::new(
                ExpressionKind::Named {
                    name: display_name,
                    expression: Box::new(expression),
                },
                location,
            );
        }

        let location = self.location_from(start);

        let saved = self.pos;
        self.skip_trivia()?;

        if !self.eat(';') {
            self.pos = saved;
        }

        Ok(Rule {
            name: name.to_string(),
            expression,
            location,
        })
    }

    /// Check if the cursor is at the beginning of a rule declaration
    fn at_rule_declaration(&mut self) -> bool {
        self.lookahead(|this| {
            if this.identifier().is_none() || this.skip_trivia().is_err() {
                return false;
            }

            if matches!(this.peek(), Some('"') | Some('\'')) {
                if this.string_literal().is_err() || this.skip_trivia().is_err() {
                    return false;
                }
            }

            this.peek() == Some('=')
        })
    }

    // -- Expressions, by increasing precedence --

    pub(super) fn expression(&mut self) -> ParseResult<Expression> {
        self.choice()
    }

    fn choice(&mut self) -> ParseResult<Expression> {
        let start = self.pos;
        let mut alternatives = vec![self.action()?];

        loop {
            let saved = self.pos;
            self.skip_trivia()?;

            if !self.eat('/') {
                self.pos = saved;
                break;
            }

            self.skip_trivia()?;
            alternatives.push(self.action()?);
        }

        Ok(if alternatives.len() == 1 {
            alternatives.remove(0)
        } else {
            Expression::new(
                ExpressionKind::Choice { alternatives },
                self.location_from(start),
            )
        })
    }

    fn action(&mut self) -> ParseResult<Expression> {
        let start = self.pos;
        let expression = self.sequence()?;

        let saved = self.pos;
        self.skip_trivia()?;

        if self.peek() != Some('{') {
            self.pos = saved;
            return Ok(expression);
        }

        let code = self.code_block()?;

        Ok(Expression::new(
            ExpressionKind::Action {
                expression: Box::new(expression),
                code,
            },
            self.location_from(start),
        ))
    }

    fn sequence(&mut self) -> ParseResult<Expression> {
        let start = self.pos;
        let mut elements = vec![self.labeled()?];

        loop {
            let saved = self.pos;
            self.skip_trivia()?;

            if !self.at_element() {
                self.pos = saved;
                break;
            }

            elements.push(self.labeled()?);
        }

        Ok(if elements.len() == 1 {
            elements.remove(0)
        } else {
            Expression::new(
                ExpressionKind::Sequence { elements },
                self.location_from(start),
            )
        })
    }

    /// Check if the cursor is at the beginning of another element of a sequence
    fn at_element(&mut self) -> bool {
        match self.peek() {
            Some('"' | '\'' | '[' | '.' | '(' | '$' | '&' | '!') => true,
            Some(c) if is_identifier_start(c) => !self.at_rule_declaration(),
            _ => false,
        }
    }

    fn labeled(&mut self) -> ParseResult<Expression> {
        let start = self.pos;

        if let Some(label) = self.label()? {
            self.check_reserved(label, start)?;
            self.skip_trivia()?;

            let expression = self.prefixed()?;

            return Ok(Expression::new(
                ExpressionKind::Labeled {
                    label: label.to_string(),
                    expression: Box::new(expression),
                },
                self.location_from(start),
            ));
        }

        self.prefixed()
    }

    /// Try to parse a label (syntax: `name:`), leaving the cursor untouched if there is none
    fn label(&mut self) -> ParseResult<Option<&'a str>> {
        let saved = self.pos;

        let label = match self.identifier() {
            Some(label) => label,
            None => return Ok(None),
        };

        self.skip_trivia()?;

        if self.eat(':') {
            Ok(Some(label))
        } else {
            self.pos = saved;
            Ok(None)
        }
    }

    fn prefixed(&mut self) -> ParseResult<Expression> {
        let start = self.pos;

        let operator = match self.peek() {
            Some(c @ ('$' | '&' | '!')) => c,
            _ => return self.suffixed(),
        };

        self.bump();
        self.skip_trivia()?;

        if !self.at_primary() && !(operator != '$' && self.peek() == Some('{')) {
            return Err(self.error_here(
                GrammarSyntaxErrorContent::ExpectedAfterPrefix(operator),
                None,
            ));
        }

        let kind = match operator {
            '&' if self.peek() == Some('{') => ExpressionKind::SemanticAnd {
                code: self.code_block()?,
            },
            '!' if self.peek() == Some('{') => ExpressionKind::SemanticNot {
                code: self.code_block()?,
            },
            _ => {
                let expression = Box::new(self.suffixed()?);

                match operator {
                    '$' => ExpressionKind::Text { expression },
                    '&' => ExpressionKind::SimpleAnd { expression },
                    _ => ExpressionKind::SimpleNot { expression },
                }
            }
        };

        Ok(Expression::new(kind, self.location_from(start)))
    }

    fn suffixed(&mut self) -> ParseResult<Expression> {
        let start = self.pos;
        let primary = self.primary()?;

        let saved = self.pos;
        self.skip_trivia()?;

        let build: fn(Box<Expression>) -> ExpressionKind = match self.peek() {
            Some('?') => |expression| ExpressionKind::Optional { expression },
            Some('*') => |expression| ExpressionKind::ZeroOrMore { expression },
            Some('+') => |expression| ExpressionKind::OneOrMore { expression },
            _ => {
                self.pos = saved;
                return Ok(primary);
            }
        };

        self.bump();

        Ok(Expression::new(
            build(Box::new(primary)),
            self.location_from(start),
        ))
    }

    fn at_primary(&self) -> bool {
        matches!(self.peek(), Some(c) if matches!(c, '"' | '\'' | '[' | '.' | '(') || is_identifier_start(c))
    }

    fn primary(&mut self) -> ParseResult<Expression> {
        let start = self.pos;

        let kind = match self.peek() {
            Some('"' | '\'') => {
                let value = self.string_literal()?;
                let ignore_case = self.eat('i');

                ExpressionKind::Literal { value, ignore_case }
            }

            Some('[') => self.class()?,

            Some('.') => {
                self.bump();
                ExpressionKind::Any
            }

            Some('(') => {
                let started_at = self.position(start);

                self.bump();
                self.skip_trivia()?;

                let expression = self.expression()?;
                self.skip_trivia()?;

                if !self.eat(')') {
                    return Err(self.error_here(
                        GrammarSyntaxErrorContent::UnclosedGroup { started_at },
                        Some("you may need to add a closing parenthesis ')'"),
                    ));
                }

                ExpressionKind::Group {
                    expression: Box::new(expression),
                }
            }

            Some(c) if is_identifier_start(c) => {
                // Cannot fail as the first character was checked
                let name = self.identifier().unwrap_or_default();
                self.check_reserved(name, start)?;

                ExpressionKind::RuleRef {
                    name: name.to_string(),
                }
            }

            Some(c) => {
                return Err(self.error_here(
                    GrammarSyntaxErrorContent::ExpectedExpression,
                    Some(match c {
                        '{' => "code blocks must follow an expression, or a '&' / '!' predicate operator",
                        _ => "you may either open a group with '(', a string with '\"', a class with '[', or specify a rule's name",
                    }),
                ))
            }

            None => {
                return Err(self.error_here(
                    GrammarSyntaxErrorContent::UnexpectedEnd,
                    Some("you need to provide an expression, such as a group, a string or a rule's name"),
                ))
            }
        };

        Ok(Expression::new(kind, self.location_from(start)))
    }

    fn check_reserved(&self, name: &str, start: usize) -> ParseResult<()> {
        if is_reserved_word(name) {
            Err(GrammarSyntaxError::new(
                self.lines.location(self.input, start, start + name.len()),
                GrammarSyntaxErrorContent::ReservedWord(name.to_string()),
                Some("try to use another name"),
            ))
        } else {
            Ok(())
        }
    }
}
