//! Value types shared by the task model: source ranges, priorities, counters
//! and links.

use serde::{Deserialize, Serialize};

/// A character range on a single source line.
///
/// Columns are counted in characters (not bytes) of the raw line, so they can
/// be handed to an editor as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    /// 0-based line index.
    pub line: usize,
    /// Start column (inclusive).
    pub start: usize,
    /// End column (exclusive).
    pub end: usize,
}

impl Range {
    /// Creates a range on `line` spanning `[start, end)`.
    pub fn new(line: usize, start: usize, end: usize) -> Self {
        Self { line, start, end }
    }

    /// Number of characters covered by the range.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the range covers no characters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Task priority, a single uppercase ASCII letter (`A` is the highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(char);

impl Priority {
    /// Creates a priority from a letter, returning `None` unless it is `A..=Z`.
    ///
    /// # Example
    ///
    /// ```
    /// use todomd_core::models::Priority;
    ///
    /// assert_eq!(Priority::new('C').map(|p| p.letter()), Some('C'));
    /// assert!(Priority::new('c').is_none());
    /// ```
    pub fn new(letter: char) -> Option<Self> {
        letter.is_ascii_uppercase().then_some(Self(letter))
    }

    /// Parses the `(X)` annotation form.
    pub fn from_annotation(word: &str) -> Option<Self> {
        let inner = word.strip_prefix('(')?.strip_suffix(')')?;
        let mut chars = inner.chars();
        let letter = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::new(letter)
    }

    /// The priority letter.
    pub fn letter(&self) -> char {
        self.0
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A manual progress counter from a `{count:current/needed}` annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Count {
    pub current: i64,
    pub needed: i64,
    /// Range of the whole `{count:…}` word.
    pub range: Range,
}

impl Count {
    /// Returns true once the counter reached its target.
    pub fn is_complete(&self) -> bool {
        self.current == self.needed
    }
}

/// A hyperlink found on a task line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// `(start, end)` character columns on the line.
    pub character_range: (usize, usize),
    /// Link target.
    pub value: String,
    /// Target scheme, e.g. `https` or `file`.
    pub scheme: String,
}

/// A link reported by the host's link resolver for a whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLink {
    pub line: usize,
    pub start_col: usize,
    pub end_col: usize,
    /// Resolved target; links without one are ignored.
    pub target: Option<String>,
    pub scheme: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_from_annotation() {
        assert_eq!(Priority::from_annotation("(A)"), Priority::new('A'));
        assert_eq!(Priority::from_annotation("(Z)"), Priority::new('Z'));
        assert_eq!(Priority::from_annotation("(a)"), None);
        assert_eq!(Priority::from_annotation("(AB)"), None);
        assert_eq!(Priority::from_annotation("()"), None);
        assert_eq!(Priority::from_annotation("(A"), None);
        assert_eq!(Priority::from_annotation("A)"), None);
    }

    #[test]
    fn test_priority_ordering_follows_letters() {
        let a = Priority::new('A').unwrap();
        let b = Priority::new('B').unwrap();
        assert!(a < b);
        assert_eq!(a.to_string(), "A");
    }

    #[test]
    fn test_range_len() {
        let range = Range::new(3, 2, 6);
        assert_eq!(range.len(), 4);
        assert!(!range.is_empty());
        assert!(Range::new(0, 5, 5).is_empty());
    }

    #[test]
    fn test_count_is_complete() {
        let range = Range::default();
        assert!(!Count { current: 1, needed: 3, range }.is_complete());
        assert!(Count { current: 3, needed: 3, range }.is_complete());
    }
}
