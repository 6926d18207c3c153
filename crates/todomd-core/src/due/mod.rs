//! Due-date evaluation.
//!
//! A [`DueDate`] wraps the raw `{due:…}` specifier and classifies it against an
//! explicit "now". Nothing here reads the clock, so the classification is a
//! pure function of `(raw, overdue override, now)`.
//!
//! # Supported specifiers
//!
//! - `2024-01-01` - due on a day
//! - `2024-01-01T10:00` / `2024-01-01T10:00:00` - due at a time
//! - `2024-01-01|e3d`, `|e2w`, `|e1m` - every N days, weeks or months from a date
//! - `ed` / `everyday` - every day
//! - `mon`, `mon,fri`, `mon-fri` - on the listed weekdays
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use todomd_core::due::{DueDate, DueState};
//!
//! let now = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap().and_hms_opt(9, 0, 0).unwrap();
//!
//! let due = DueDate::new("2024-01-01");
//! let status = due.status(now);
//! assert_eq!(status.state, DueState::Overdue);
//! assert_eq!(status.overdue_in_days, 2);
//! ```

mod spec;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

pub use spec::{parse_date, parse_date_lenient, parse_datetime, DueSpec, IntervalUnit};

/// Temporal classification of a due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DueState {
    /// The specifier could not be parsed.
    Invalid,
    /// Past due.
    Overdue,
    /// Due today.
    Due,
    /// Due in the future.
    NotDue,
}

/// Classification plus aging metrics, computed for one moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DueStatus {
    pub state: DueState,
    /// Whole days past due; 0 unless overdue.
    pub overdue_in_days: i64,
    /// Whole days until the next due day; 0 when due today or past.
    pub days_until_due: i64,
}

impl DueStatus {
    fn new(state: DueState) -> Self {
        Self {
            state,
            overdue_in_days: 0,
            days_until_due: 0,
        }
    }

    fn overdue(days: i64) -> Self {
        Self {
            state: DueState::Overdue,
            overdue_in_days: days,
            days_until_due: 0,
        }
    }

    fn not_due(days: i64) -> Self {
        Self {
            state: DueState::NotDue,
            overdue_in_days: 0,
            days_until_due: days,
        }
    }
}

/// A due date parsed from a `{due:…}` annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueDate {
    raw: String,
    is_recurring: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    overdue: Option<String>,
    #[serde(skip)]
    spec: DueSpec,
}

impl DueDate {
    /// Parses a specifier. Unknown forms produce an [`DueState::Invalid`] due date.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let spec = DueSpec::parse(&raw);
        Self {
            is_recurring: spec.is_recurring(),
            raw,
            overdue: None,
            spec,
        }
    }

    /// Parses a specifier together with an `{overdue:…}` override.
    ///
    /// An empty override is ignored.
    pub fn with_overdue(raw: impl Into<String>, overdue: impl Into<String>) -> Self {
        let overdue = overdue.into();
        let mut due = Self::new(raw);
        if !overdue.is_empty() {
            due.overdue = Some(overdue);
        }
        due
    }

    /// The original specifier text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parsed specifier.
    pub fn spec(&self) -> &DueSpec {
        &self.spec
    }

    /// The override string, if any.
    pub fn overdue_override(&self) -> Option<&str> {
        self.overdue.as_deref()
    }

    /// Returns true for repeating specifiers.
    pub fn is_recurring(&self) -> bool {
        self.is_recurring
    }

    /// Classifies the due date at `now`.
    pub fn status(&self, now: NaiveDateTime) -> DueStatus {
        let computed = self.computed_status(now);
        if computed.state == DueState::Invalid {
            return computed;
        }

        let today = now.date();
        match self.overdue.as_deref().and_then(parse_date_lenient) {
            Some(since) if since <= today => DueStatus::overdue((today - since).num_days()),
            _ => computed,
        }
    }

    /// Shorthand for `status(now).state`.
    pub fn state(&self, now: NaiveDateTime) -> DueState {
        self.status(now).state
    }

    /// Shorthand for `status(now).overdue_in_days`.
    pub fn overdue_in_days(&self, now: NaiveDateTime) -> i64 {
        self.status(now).overdue_in_days
    }

    /// Shorthand for `status(now).days_until_due`.
    pub fn days_until_due(&self, now: NaiveDateTime) -> i64 {
        self.status(now).days_until_due
    }

    /// First occurrence on or after `from`.
    pub fn next_occurrence(&self, from: NaiveDate) -> Option<NaiveDate> {
        self.spec.next_occurrence(from)
    }

    /// Most recent occurrence strictly before `before`.
    pub fn previous_occurrence(&self, before: NaiveDate) -> Option<NaiveDate> {
        self.spec.previous_occurrence(before)
    }

    fn computed_status(&self, now: NaiveDateTime) -> DueStatus {
        let today = now.date();
        match &self.spec {
            DueSpec::Invalid => DueStatus::new(DueState::Invalid),
            DueSpec::Date(date) => absolute_status(*date, None, now),
            DueSpec::DateTime(datetime) => absolute_status(datetime.date(), Some(*datetime), now),
            spec => {
                if spec.occurs_on(today) {
                    return DueStatus::new(DueState::Due);
                }
                match spec.next_occurrence(today) {
                    Some(next) => DueStatus::not_due((next - today).num_days()),
                    None => DueStatus::new(DueState::Invalid),
                }
            }
        }
    }
}

fn absolute_status(date: NaiveDate, at: Option<NaiveDateTime>, now: NaiveDateTime) -> DueStatus {
    let today = now.date();
    if date < today {
        DueStatus::overdue((today - date).num_days())
    } else if date > today {
        DueStatus::not_due((date - today).num_days())
    } else if at.is_some_and(|at| now < at) {
        DueStatus::not_due(0)
    } else {
        DueStatus::new(DueState::Due)
    }
}
