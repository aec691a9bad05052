//! Free-text query parser
//!
//! ```text
//! query      := token (whitespace token)*
//! token      := "!"* (fieldName operator)? value
//! fieldName  := identifier | identifier ":" modifierName
//! operator   := ":" | "=" | "<" | "<=" | ">" | ">="
//! value      := "quoted \"string\"" | /regex/ | bareWord
//! ```
//!
//! The parser knows nothing about models: `foo:bar` parses fine and fails
//! later in the resolver. Offsets are character offsets into the input.

use crate::errors::SearchError;
use crate::types::{Operator, ParsedToken, Qualifier, Span, TokenValue};


pub type ParseResult = Result<ParsedToken, SearchError>;

struct Tokenizer {
    input: Vec<char>,
    pos: usize,
}

impl Tokenizer {
    fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.input.get(pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn at_separator(&self) -> bool {
        self.peek().is_none_or(char::is_whitespace)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn skip_to_separator(&mut self) {
        while !self.at_separator() {
            self.advance();
        }
    }

    fn read_while<F>(&mut self, predicate: F) -> String
    where
        F: Fn(char) -> bool,
    {
        let mut result = String::new();
        while let Some(ch) = self.peek() {
            if predicate(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn tokenize(&mut self) -> Vec<ParseResult> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            if self.peek().is_none() {
                break;
            }

            let start = self.pos;
            match self.read_token(start) {
                Ok(token) => tokens.push(Ok(token)),
                Err(message) => {
                    self.skip_to_separator();
                    tokens.push(Err(SearchError::SyntaxError {
                        message,
                        start,
                        end: self.pos,
                    }));
                }
            }
        }

        tokens
    }

    fn read_token(&mut self, start: usize) -> Result<ParsedToken, String> {
        let mut qualifiers = Vec::new();
        while self.peek() == Some('!') {
            self.advance();
            qualifiers.push(Qualifier::Not);
        }

        let (field, modifier, operator) = match self.scan_field() {
            Some(FieldHead {
                field,
                modifier,
                operator,
                end,
            }) => {
                self.pos = end;
                (Some(field), modifier, Some(operator))
            }
            None => (None, None, None),
        };

        if operator.is_some() && matches!(self.peek(), Some(':' | '=' | '<' | '>')) {
            return Err("Malformed operator".to_string());
        }

        let value = self.read_value(operator.is_some())?;

        Ok(ParsedToken {
            qualifiers,
            field,
            modifier,
            operator,
            value,
            span: Span::new(start, self.pos),
        })
    }

    /// Looks ahead for `identifier operator` or `identifier:modifier operator`
    /// without consuming anything.
    fn scan_field(&self) -> Option<FieldHead> {
        let field_end = self.scan_identifier(self.pos)?;
        let (operator, op_end) = self.scan_operator(field_end)?;
        let field: String = self.input[self.pos..field_end].iter().collect();

        if operator == Operator::Match {
            if let Some(modifier_end) = self.scan_identifier(op_end) {
                if let Some((inner, end)) = self.scan_operator(modifier_end) {
                    return Some(FieldHead {
                        field,
                        modifier: Some(self.input[op_end..modifier_end].iter().collect()),
                        operator: inner,
                        end,
                    });
                }
            }
        }

        Some(FieldHead {
            field,
            modifier: None,
            operator,
            end: op_end,
        })
    }

    fn scan_identifier(&self, from: usize) -> Option<usize> {
        let first = self.char_at(from)?;
        if !(first.is_ascii_alphabetic() || first == '_') {
            return None;
        }
        let mut end = from + 1;
        while let Some(ch) = self.char_at(end) {
            if ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.') {
                end += 1;
            } else {
                break;
            }
        }
        Some(end)
    }

    fn scan_operator(&self, from: usize) -> Option<(Operator, usize)> {
        let follows_eq = self.char_at(from + 1) == Some('=');
        match self.char_at(from)? {
            ':' => Some((Operator::Match, from + 1)),
            '=' => Some((Operator::Eq, from + 1)),
            '<' if follows_eq => Some((Operator::Lte, from + 2)),
            '<' => Some((Operator::Lt, from + 1)),
            '>' if follows_eq => Some((Operator::Gte, from + 2)),
            '>' => Some((Operator::Gt, from + 1)),
            _ => None,
        }
    }

    fn read_value(&mut self, after_operator: bool) -> Result<TokenValue, String> {
        match self.peek() {
            None => Err("Expected value".to_string()),
            Some(ch) if ch.is_whitespace() => {
                if after_operator {
                    Err("Expected value after operator".to_string())
                } else {
                    Err("Expected value".to_string())
                }
            }
            Some('"') => {
                let text = self.read_quoted()?;
                self.expect_separator()?;
                Ok(TokenValue::Text(text))
            }
            Some('/') => {
                let source = self.read_regex()?;
                self.expect_separator()?;
                Ok(TokenValue::Regex(source))
            }
            Some(_) => Ok(TokenValue::Text(self.read_while(|c| !c.is_whitespace()))),
        }
    }

    fn read_quoted(&mut self) -> Result<String, String> {
        // Consume "
        self.advance();

        let mut text = String::new();
        loop {
            match self.advance() {
                None => return Err("Unterminated quoted string".to_string()),
                Some('\\') => match self.advance() {
                    Some(escaped) => text.push(escaped),
                    None => return Err("Unterminated quoted string".to_string()),
                },
                Some('"') => return Ok(text),
                Some(ch) => text.push(ch),
            }
        }
    }

    fn read_regex(&mut self) -> Result<String, String> {
        // Consume /
        self.advance();

        let mut source = String::new();
        loop {
            match self.advance() {
                None => return Err("Unterminated regular expression".to_string()),
                Some('\\') => match self.advance() {
                    Some('/') => source.push('/'),
                    Some(escaped) => {
                        source.push('\\');
                        source.push(escaped);
                    }
                    None => return Err("Unterminated regular expression".to_string()),
                },
                Some('/') if source.is_empty() => {
                    return Err("Empty regular expression".to_string())
                }
                Some('/') => return Ok(source),
                Some(ch) => source.push(ch),
            }
        }
    }

    fn expect_separator(&self) -> Result<(), String> {
        if self.at_separator() {
            Ok(())
        } else {
            Err("Expected whitespace after closing delimiter".to_string())
        }
    }
}

struct FieldHead {
    field: String,
    modifier: Option<String>,
    operator: Operator,
    end: usize,
}

/// Splits a query into tokens, in input order. Syntax errors are reported in
/// place of the offending token and parsing resumes at the next whitespace.
pub fn parse_query(query: &str) -> Vec<ParseResult> {
    Tokenizer::new(query).tokenize()
}
