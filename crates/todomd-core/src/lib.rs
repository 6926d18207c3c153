//! Parsing and querying for todo.md task files.
//!
//! A todo.md file is plain text with one task per line. Tasks carry inline
//! annotations: `#tags`, `+projects`, `@contexts`, `(A)` priorities and
//! `{name:value}` special tags such as `{due:…}`. This crate turns the text
//! into [`models::Task`] values and provides the queries a front end needs.
//!
//! Everything here is synchronous and pure: no I/O, no clock. Callers pass the
//! lines, a [`config::ParseConfig`] and the current moment explicitly.
//!
//! # Quick Start
//!
//! For convenient imports, use the prelude:
//!
//! ```
//! use todomd_core::prelude::*;
//!
//! let now = chrono::NaiveDate::from_ymd_opt(2024, 1, 10)
//!     .unwrap()
//!     .and_hms_opt(9, 0, 0)
//!     .unwrap();
//! let text = "(C) call @alice +website #urgent {due:2024-01-01}\nx done already";
//! let document = parse_document(text.lines(), &[], &ParseConfig::default());
//!
//! let filter = FilterParser::parse("$overdue").unwrap();
//! let context = FilterContext::new(now);
//! let overdue = FilterEvaluator::new(&filter, &context).filter_tasks(&document.tasks);
//! assert_eq!(overdue[0].title, "call");
//!
//! let sorted = default_sort(&document.tasks, now);
//! assert_eq!(sorted.len(), 2);
//! ```

pub mod config;
pub mod due;
pub mod edit;
pub mod filter;
pub mod group;
pub mod models;
pub mod parse;
pub mod prelude;
pub mod sort;
