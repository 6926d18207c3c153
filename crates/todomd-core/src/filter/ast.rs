//! Abstract Syntax Tree (AST) for filter expressions.

use crate::models::Priority;

/// Represents a parsed filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    // ==================== Annotation Filters ====================
    /// Matches tasks carrying the tag (`#name`), own or inherited.
    Tag(String),

    /// Matches tasks with the project (`+name`).
    Project(String),

    /// Matches tasks with the context (`@name`).
    Context(String),

    /// Matches tasks with the priority (`$A`..`$Z`).
    Priority(Priority),

    // ==================== Due Filters ====================
    /// Due today or overdue (`$due`).
    Due,

    /// Past due (`$overdue`).
    Overdue,

    /// Due in the future (`$notdue`).
    NotDue,

    /// Unparseable due specifier (`$invalid`).
    InvalidDue,

    /// No due date (`$nodue`).
    NoDue,

    /// Recurring due date (`$recurring`).
    Recurring,

    // ==================== State Filters ====================
    /// Completed tasks (`$done`).
    Done,

    /// Tasks marked `{h}` (`$hidden`).
    Hidden,

    /// Tasks marked `{c}` (`$collapsed`).
    Collapsed,

    /// Tasks without tags (`$notag`).
    NoTag,

    /// Tasks without projects (`$noproject`).
    NoProject,

    /// Tasks without contexts (`$nocontext`).
    NoContext,

    // ==================== Text ====================
    /// Case-insensitive substring of the title.
    Text(String),

    // ==================== Boolean Operators ====================
    /// Logical AND of two filters.
    And(Box<Filter>, Box<Filter>),

    /// Logical OR of two filters.
    Or(Box<Filter>, Box<Filter>),

    /// Logical NOT of a filter.
    Not(Box<Filter>),
}

impl Filter {
    /// Creates an AND filter from two filters.
    ///
    /// # Example
    ///
    /// ```
    /// use todomd_core::filter::Filter;
    ///
    /// let filter = Filter::and(Filter::Due, Filter::Tag("work".into()));
    /// assert!(matches!(filter, Filter::And(_, _)));
    /// ```
    pub fn and(left: Filter, right: Filter) -> Self {
        Filter::And(Box::new(left), Box::new(right))
    }

    /// Creates an OR filter from two filters.
    pub fn or(left: Filter, right: Filter) -> Self {
        Filter::Or(Box::new(left), Box::new(right))
    }

    /// Creates a NOT filter from another filter.
    ///
    /// # Example
    ///
    /// ```
    /// use todomd_core::filter::Filter;
    ///
    /// let filter = Filter::negate(Filter::Done);
    /// assert!(matches!(filter, Filter::Not(_)));
    /// ```
    pub fn negate(inner: Filter) -> Self {
        Filter::Not(Box::new(inner))
    }
}
