//! Filter expression parser and evaluator for task lists.
//!
//! # Supported Syntax
//!
//! ## Annotations
//! - `#tag` - Tasks with a tag (own or inherited from a tag comment)
//! - `+project` - Tasks in a project
//! - `@context` - Tasks with a context
//!
//! ## Keywords
//! - `$due` - Due today or overdue
//! - `$overdue`, `$notdue`, `$invalid` - Due state
//! - `$nodue` - No due date
//! - `$recurring` - Recurring due date
//! - `$done`, `$hidden`, `$collapsed` - Task state
//! - `$notag`, `$noproject`, `$nocontext` - Missing annotations
//! - `$A` .. `$Z` - Priority
//!
//! ## Text
//! - `word` or `"quoted words"` - Case-insensitive title substring
//!
//! ## Boolean Operators
//! - `&` or juxtaposition - AND
//! - `|` - OR
//! - `!` or a leading `-` - NOT
//! - `()` - Grouping
//!
//! # Example
//!
//! ```
//! use todomd_core::filter::{Filter, FilterParser};
//!
//! let filter = FilterParser::parse("$due").unwrap();
//! assert_eq!(filter, Filter::Due);
//! ```

mod ast;
mod error;
mod evaluator;
mod lexer;
mod parser;

pub use ast::Filter;
pub use error::{FilterError, FilterResult};
pub use evaluator::{FilterContext, FilterEvaluator};
pub use parser::{FilterParser, KEYWORDS};
