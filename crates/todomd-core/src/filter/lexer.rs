//! Splits a filter query into tokens.

use std::iter::Peekable;
use std::str::Chars;

/// A token and the byte offset it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken {
    pub token: FilterToken,
    /// Byte offset into the query.
    pub position: usize,
}

/// One lexical unit of a filter query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterToken {
    // ==================== Sigils ====================
    /// A tag reference (prefixed with `#`).
    Tag(String),

    /// A project reference (prefixed with `+`).
    Project(String),

    /// A context reference (prefixed with `@`).
    Context(String),

    /// A keyword (prefixed with `$`), not yet validated.
    Keyword(String),

    // ==================== Text ====================
    /// A bare word or a quoted string.
    Text(String),

    // ==================== Punctuation ====================
    /// `&`, explicit conjunction.
    And,

    /// `|`, disjunction.
    Or,

    /// The NOT operator (`!` or a leading `-`).
    Not,

    /// `(`
    OpenParen,

    /// `)`
    CloseParen,
}

impl FilterToken {
    /// Source-like rendering used in error messages.
    pub fn display(&self) -> String {
        match self {
            FilterToken::Tag(name) => format!("#{name}"),
            FilterToken::Project(name) => format!("+{name}"),
            FilterToken::Context(name) => format!("@{name}"),
            FilterToken::Keyword(name) => format!("${name}"),
            FilterToken::Text(text) => text.clone(),
            FilterToken::And => "&".to_string(),
            FilterToken::Or => "|".to_string(),
            FilterToken::Not => "!".to_string(),
            FilterToken::OpenParen => "(".to_string(),
            FilterToken::CloseParen => ")".to_string(),
        }
    }
}

/// Character scanner over a filter query.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    /// Byte offset of the next unread char.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Starts scanning `input` at offset 0.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Looks at the next char.
    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    /// Takes one char and advances the byte offset.
    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(ch) = c {
            self.position += ch.len_utf8();
        }
        c
    }

    /// Consumes the next character if it satisfies `accept`.
    fn next_char_if(&mut self, accept: impl FnOnce(char) -> bool) -> Option<char> {
        let c = self.chars.next_if(|&c| accept(c));
        if let Some(ch) = c {
            self.position += ch.len_utf8();
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while self.next_char_if(char::is_whitespace).is_some() {}
    }

    /// Reads up to the matching `quote_char`. An unterminated quote runs to the end.
    fn read_quoted_string(&mut self, quote_char: char) -> String {
        // Skip the opening quote
        self.next_char();

        let mut result = String::new();
        while let Some(c) = self.next_char() {
            if c == quote_char {
                break;
            }
            // Backslash takes the next char literally
            if c == '\\' {
                if let Some(escaped) = self.next_char() {
                    result.push(escaped);
                }
            } else {
                result.push(c);
            }
        }
        result
    }

    /// Reads a name or a bare word: a quoted string, or everything up to
    /// whitespace or an operator.
    fn read_name(&mut self) -> String {
        if let Some(&c) = self.peek() {
            if c == '"' || c == '\'' {
                return self.read_quoted_string(c);
            }
        }

        let mut name = String::new();
        while let Some(c) = self.next_char_if(|c| !is_delimiter(c)) {
            name.push(c);
        }
        name
    }

    /// Scans one token. `None` once the input is exhausted.
    pub fn next_token(&mut self) -> Option<PositionedToken> {
        self.skip_whitespace();

        let c = *self.peek()?;
        let position = self.position;

        let token = match c {
            // Operators
            '&' | '|' | '!' | '-' | '(' | ')' => {
                self.next_char();
                match c {
                    '&' => FilterToken::And,
                    '|' => FilterToken::Or,
                    '(' => FilterToken::OpenParen,
                    ')' => FilterToken::CloseParen,
                    _ => FilterToken::Not,
                }
            }

            // Sigils
            '#' | '+' | '@' | '$' => {
                self.next_char();
                let name = self.read_name();
                match c {
                    '#' => FilterToken::Tag(name),
                    '+' => FilterToken::Project(name),
                    '@' => FilterToken::Context(name),
                    _ => FilterToken::Keyword(name),
                }
            }

            // Text
            _ => FilterToken::Text(self.read_name()),
        };

        Some(PositionedToken { token, position })
    }

    /// Collects all tokens with their positions.
    pub fn tokenize(mut self) -> Vec<PositionedToken> {
        let mut tokens = Vec::new();
        while let Some(positioned_token) = self.next_token() {
            tokens.push(positioned_token);
        }
        tokens
    }
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '&' | '|' | '(' | ')')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<FilterToken> {
        Lexer::new(input)
            .tokenize()
            .into_iter()
            .map(|pt| pt.token)
            .collect()
    }

    #[test]
    fn test_tokenize_sigils() {
        assert_eq!(
            tokens("#work +site @home $due"),
            vec![
                FilterToken::Tag("work".into()),
                FilterToken::Project("site".into()),
                FilterToken::Context("home".into()),
                FilterToken::Keyword("due".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_operators() {
        assert_eq!(
            tokens("(a|b)&!c -d"),
            vec![
                FilterToken::OpenParen,
                FilterToken::Text("a".into()),
                FilterToken::Or,
                FilterToken::Text("b".into()),
                FilterToken::CloseParen,
                FilterToken::And,
                FilterToken::Not,
                FilterToken::Text("c".into()),
                FilterToken::Not,
                FilterToken::Text("d".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_hyphen_inside_word_is_text() {
        assert_eq!(tokens("well-known"), vec![FilterToken::Text("well-known".into())]);
    }

    #[test]
    fn test_tokenize_quoted_text() {
        assert_eq!(
            tokens(r#""buy milk" 'it\'s'"#),
            vec![
                FilterToken::Text("buy milk".into()),
                FilterToken::Text("it's".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_quoted_tag() {
        assert_eq!(tokens("#\"two words\""), vec![FilterToken::Tag("two words".into())]);
    }

    #[test]
    fn test_tokenize_empty_sigil() {
        assert_eq!(tokens("# a"), vec![FilterToken::Tag(String::new()), FilterToken::Text("a".into())]);
    }

    #[test]
    fn test_tokenize_positions_are_byte_offsets() {
        let positioned = Lexer::new("é #x").tokenize();
        assert_eq!(positioned[0].position, 0);
        assert_eq!(positioned[1].position, 3);
    }

    #[test]
    fn test_tokenize_empty_input() {
        assert!(tokens("   ").is_empty());
    }
}
