//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```
//! use todomd_core::prelude::*;
//!
//! // Now you have access to:
//! // - parse_document, Document, Task (parsing)
//! // - DueDate, DueState (due dates)
//! // - sort_tasks, default_sort, SortProperty (sorting)
//! // - FilterParser, FilterEvaluator, FilterContext (filtering)
//! ```

// Configuration
pub use crate::config::{ConfigError, EditConfig, ParseConfig};

// Parsing
pub use crate::parse::{parse_document, parse_line, Document, ParsedLine, TaskNode};

// Data models
pub use crate::models::{Count, DocumentLink, Link, Priority, Range, Task};

// Due dates
pub use crate::due::{DueDate, DueState, DueStatus};

// Sorting
pub use crate::sort::{default_sort, sort_tasks, SortDirection, SortError, SortProperty};

// Filtering
pub use crate::filter::{Filter, FilterContext, FilterError, FilterEvaluator, FilterParser, FilterResult};

// Grouping
pub use crate::group::{group_by_contexts, group_by_projects, group_by_tags, next_tasks, GroupSort, TaskGroup};

// Edits
pub use crate::edit::{
    apply_edits, archivable, needs_recurring_reset, reset_recurring, toggle_done, TextEdit,
};
