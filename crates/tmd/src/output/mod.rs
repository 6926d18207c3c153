//! Output formatting utilities for the tmd CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules by view:
//!
//! - [`tasks`] - Task lists, the tree view and edit summaries
//! - [`groups`] - Tag, project and context groups
//! - [`helpers`] - Common formatting utilities (truncation, priority, due status)

mod groups;
pub mod helpers;
mod tasks;

// Tasks
pub use tasks::{
    format_task_summary, format_tasks_json, format_tasks_table, format_tree_json,
    format_tree_text,
};

// Groups
pub use groups::{format_groups_json, format_groups_table};
