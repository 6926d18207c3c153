//! Turns filter tokens into a [`Filter`] tree.

use strsim::levenshtein;

use super::ast::Filter;
use super::error::{FilterError, FilterResult};
use super::lexer::{FilterToken, Lexer, PositionedToken};
use crate::models::Priority;

/// Keywords accepted after `$`, besides single priority letters.
pub const KEYWORDS: [&str; 12] = [
    "due",
    "overdue",
    "notdue",
    "invalid",
    "nodue",
    "done",
    "recurring",
    "hidden",
    "collapsed",
    "notag",
    "noproject",
    "nocontext",
];

/// Maximum Levenshtein distance to consider a keyword as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Parser for task filter expressions.
///
/// # Grammar
///
/// ```text
/// expression ::= or_expr
/// or_expr    ::= and_expr ("|" and_expr)*
/// and_expr   ::= unary_expr (["&"] unary_expr)*
/// unary_expr ::= ("!" | "-") unary_expr | primary
/// primary    ::= "(" expression ")" | "#" name | "+" name | "@" name
///              | "$" keyword | text
/// ```
///
/// Juxtaposed terms are combined with AND, so `#work $due` is the same as
/// `#work & $due`.
///
/// # Binding, tightest first
///
/// 1. prefix `!` or `-`
/// 2. `&` or two terms side by side, left-associative
/// 3. `|`, left-associative
///
/// # Example
///
/// ```
/// use todomd_core::filter::{Filter, FilterParser};
///
/// let filter = FilterParser::parse("#work $overdue").unwrap();
/// assert_eq!(
///     filter,
///     Filter::and(Filter::Tag("work".into()), Filter::Overdue)
/// );
///
/// let filter = FilterParser::parse("+home | @phone").unwrap();
/// assert!(matches!(filter, Filter::Or(_, _)));
/// ```
pub struct FilterParser {
    tokens: Vec<PositionedToken>,
    position: usize,
}

impl FilterParser {
    /// Parses a filter query.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::EmptyExpression` if the input is blank.
    ///
    /// Returns `FilterError::UnexpectedToken` or
    /// `FilterError::UnexpectedEndOfInput` for malformed expressions,
    /// `FilterError::UnclosedParenthesis` if parentheses are not balanced,
    /// `FilterError::UnknownKeyword` for an unrecognized `$keyword` and
    /// `FilterError::EmptyName` for a sigil without a name.
    pub fn parse(input: &str) -> FilterResult<Filter> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(FilterError::EmptyExpression);
        }

        let tokens = Lexer::new(trimmed).tokenize();
        if tokens.is_empty() {
            return Err(FilterError::EmptyExpression);
        }

        let mut parser = Self {
            tokens,
            position: 0,
        };
        let filter = parser.parse_expression()?;

        // Leftover input after a complete expression
        if let Some(remaining) = parser.tokens.get(parser.position) {
            return Err(FilterError::unexpected_token(
                remaining.token.display(),
                remaining.position,
            ));
        }

        Ok(filter)
    }

    fn peek(&self) -> Option<&FilterToken> {
        self.tokens.get(self.position).map(|pt| &pt.token)
    }

    fn advance(&mut self) -> Option<&PositionedToken> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn check(&self, expected: &FilterToken) -> bool {
        self.peek() == Some(expected)
    }

    /// Returns true if the current token can start a unary expression.
    fn at_term_start(&self) -> bool {
        !matches!(
            self.peek(),
            None | Some(FilterToken::Or | FilterToken::CloseParen | FilterToken::And)
        )
    }

    fn parse_expression(&mut self) -> FilterResult<Filter> {
        self.parse_or_expr()
    }

    /// `and_expr ("|" and_expr)*`
    fn parse_or_expr(&mut self) -> FilterResult<Filter> {
        let mut left = self.parse_and_expr()?;

        while self.check(&FilterToken::Or) {
            self.advance();
            let right = self.parse_and_expr()?;
            left = Filter::or(left, right);
        }

        Ok(left)
    }

    /// Parses AND expressions: `unary_expr (["&"] unary_expr)*`
    fn parse_and_expr(&mut self) -> FilterResult<Filter> {
        let mut left = self.parse_unary_expr()?;

        loop {
            if self.check(&FilterToken::And) {
                self.advance();
            } else if !self.at_term_start() {
                break;
            }
            let right = self.parse_unary_expr()?;
            left = Filter::and(left, right);
        }

        Ok(left)
    }

    /// Parses unary expressions: `("!" | "-") unary_expr | primary`
    fn parse_unary_expr(&mut self) -> FilterResult<Filter> {
        if self.check(&FilterToken::Not) {
            self.advance();
            let inner = self.parse_unary_expr()?;
            return Ok(Filter::negate(inner));
        }

        self.parse_primary()
    }

    /// Parses primary expressions.
    fn parse_primary(&mut self) -> FilterResult<Filter> {
        let PositionedToken { token, position } = self
            .advance()
            .cloned()
            .ok_or(FilterError::UnexpectedEndOfInput)?;

        match token {
            // Group
            FilterToken::OpenParen => {
                let inner = self.parse_expression()?;
                if !self.check(&FilterToken::CloseParen) {
                    return Err(FilterError::UnclosedParenthesis);
                }
                self.advance();
                Ok(inner)
            }

            // Sigils
            FilterToken::Tag(name) => Ok(Filter::Tag(non_empty(name, '#', position)?)),
            FilterToken::Project(name) => Ok(Filter::Project(non_empty(name, '+', position)?)),
            FilterToken::Context(name) => Ok(Filter::Context(non_empty(name, '@', position)?)),
            FilterToken::Keyword(name) => parse_keyword(&non_empty(name, '$', position)?),

            FilterToken::Text(text) => Ok(Filter::Text(text)),

            // Operators and `)` cannot start a term
            token @ (FilterToken::And
            | FilterToken::Or
            | FilterToken::CloseParen
            | FilterToken::Not) => Err(FilterError::unexpected_token(token.display(), position)),
        }
    }
}

fn non_empty(name: String, sigil: char, position: usize) -> FilterResult<String> {
    if name.is_empty() {
        Err(FilterError::EmptyName { sigil, position })
    } else {
        Ok(name)
    }
}

/// Resolves a `$keyword` (case-insensitive).
fn parse_keyword(keyword: &str) -> FilterResult<Filter> {
    let mut chars = keyword.chars();
    if let (Some(letter), None) = (chars.next(), chars.next()) {
        if let Some(priority) = Priority::new(letter.to_ascii_uppercase()) {
            return Ok(Filter::Priority(priority));
        }
    }

    let filter = match keyword.to_lowercase().as_str() {
        "due" => Filter::Due,
        "overdue" => Filter::Overdue,
        "notdue" => Filter::NotDue,
        "invalid" => Filter::InvalidDue,
        "nodue" => Filter::NoDue,
        "done" => Filter::Done,
        "recurring" => Filter::Recurring,
        "hidden" => Filter::Hidden,
        "collapsed" => Filter::Collapsed,
        "notag" => Filter::NoTag,
        "noproject" => Filter::NoProject,
        "nocontext" => Filter::NoContext,
        _ => {
            let suggestion = find_similar_keyword(keyword);
            return Err(FilterError::unknown_keyword(keyword, suggestion));
        }
    };
    Ok(filter)
}

/// Finds the closest known keyword using Levenshtein distance.
fn find_similar_keyword(query: &str) -> Option<String> {
    let query_lower = query.to_lowercase();

    let (best_match, best_distance) = KEYWORDS
        .iter()
        .map(|keyword| (*keyword, levenshtein(&query_lower, keyword)))
        .min_by_key(|(_, distance)| *distance)?;

    (best_distance > 0 && best_distance <= MAX_SUGGESTION_DISTANCE)
        .then(|| best_match.to_string())
}
