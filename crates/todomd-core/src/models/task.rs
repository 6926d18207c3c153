//! Task model.
//!
//! A [`Task`] is produced for every task line of a document. It is a plain
//! value: edits to the document are handled by re-parsing, never by mutating
//! a task in place.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::common::{Count, Link, Priority, Range};
use crate::due::{DueDate, DueState, DueStatus};

/// A task parsed from one line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Task {
    /// The untouched source line.
    pub raw_text: String,

    /// Words that were not recognized as annotations, space-joined.
    pub title: String,

    /// 0-based line index, unique within one parse.
    pub line_number: usize,

    /// Leading whitespace width divided by the tab size.
    pub indent_level: usize,

    /// Whether the task is completed.
    pub done: bool,

    /// Priority from a `(A)`..`(Z)` annotation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(skip)]
    pub priority_range: Option<Range>,

    /// Own tags followed by tags inherited from a preceding tag comment.
    pub tags: Vec<String>,

    /// Ranges of the tag names (own tags only).
    #[serde(skip)]
    pub tag_ranges: Vec<Range>,

    /// Ranges of the `#` delimiters (own tags only).
    #[serde(skip)]
    pub tag_delimiter_ranges: Vec<Range>,

    /// `+project` names.
    pub projects: Vec<String>,

    #[serde(skip)]
    pub project_ranges: Vec<Range>,

    /// `@context` names.
    pub contexts: Vec<String>,

    #[serde(skip)]
    pub context_ranges: Vec<Range>,

    /// Due date from `{due:…}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<DueDate>,

    #[serde(skip)]
    pub due_range: Option<Range>,

    /// Raw `{overdue:…}` value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overdue: Option<String>,

    #[serde(skip)]
    pub overdue_range: Option<Range>,

    #[serde(skip)]
    pub collapse_range: Option<Range>,

    #[serde(skip)]
    pub completion_date_range: Option<Range>,

    /// Ranges of every recognized brace annotation except due and overdue.
    #[serde(skip)]
    pub special_tag_ranges: Vec<Range>,

    /// Value of `{cr:…}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,

    /// Value of `{cm:…}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<String>,

    /// `{count:current/needed}` progress counter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<Count>,

    /// Value of `{t:…}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<String>,

    /// Set by `{h}`.
    pub is_hidden: bool,

    /// Set by `{c}`.
    pub is_collapsed: bool,

    /// Links on this line, attached by the document assembler.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,

    /// Line number of the nearest preceding task with a smaller indent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_line_number: Option<usize>,
}

impl Task {
    /// Returns true if the task has a recurring due date.
    pub fn is_recurring(&self) -> bool {
        self.due.as_ref().is_some_and(DueDate::is_recurring)
    }

    /// Due status at `now`, or `None` without a due date.
    pub fn due_status(&self, now: NaiveDateTime) -> Option<DueStatus> {
        self.due.as_ref().map(|due| due.status(now))
    }

    /// Due state at `now`, or `None` without a due date.
    pub fn due_state(&self, now: NaiveDateTime) -> Option<DueState> {
        self.due_status(now).map(|status| status.state)
    }

    /// Returns true if the task is due today or overdue at `now`.
    pub fn is_due_or_overdue(&self, now: NaiveDateTime) -> bool {
        matches!(
            self.due_state(now),
            Some(DueState::Due | DueState::Overdue)
        )
    }

    /// Character column of the first non-whitespace character of the raw line.
    pub fn first_non_whitespace(&self) -> usize {
        self.raw_text
            .chars()
            .take_while(|c| c.is_whitespace())
            .count()
    }

    /// Character length of the raw line.
    pub fn line_len(&self) -> usize {
        self.raw_text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_task_without_due() {
        let task = Task::default();
        assert!(!task.is_recurring());
        assert_eq!(task.due_state(now()), None);
        assert!(!task.is_due_or_overdue(now()));
    }

    #[test]
    fn test_task_due_helpers() {
        let task = Task {
            due: Some(DueDate::new("2024-01-09")),
            ..Task::default()
        };
        assert_eq!(task.due_state(now()), Some(DueState::Overdue));
        assert!(task.is_due_or_overdue(now()));

        let recurring = Task {
            due: Some(DueDate::new("ed")),
            ..Task::default()
        };
        assert!(recurring.is_recurring());
    }

    #[test]
    fn test_first_non_whitespace_counts_chars() {
        let task = Task {
            raw_text: "\t  task".to_string(),
            ..Task::default()
        };
        assert_eq!(task.first_non_whitespace(), 3);
        assert_eq!(task.line_len(), 7);
    }

    #[test]
    fn test_task_serializes_public_fields() {
        let task = Task {
            title: "call".to_string(),
            priority: Priority::new('C'),
            tags: vec!["urgent".to_string()],
            ..Task::default()
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["title"], "call");
        assert_eq!(json["priority"], "C");
        assert_eq!(json["tags"][0], "urgent");
        assert!(json.get("priority_range").is_none());
    }
}
