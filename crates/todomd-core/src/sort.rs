//! Task ordering.
//!
//! Every sort works on a copy of its input and returns a permutation of it.
//! Sorts are stable: tasks that compare equal keep their document order.

use std::cmp::{Ordering, Reverse};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::due::{parse_date_lenient, DueState};
use crate::models::Task;

/// Errors from sort configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SortError {
    /// The sort property name is not recognized.
    #[error("unsupported sort property '{0}' (expected one of: {expected})", expected = SortProperty::NAMES.join(", "))]
    UnsupportedProperty(String),
}

/// Property to sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortProperty {
    /// Due buckets with a secondary priority order.
    #[default]
    Default,
    Priority,
    /// Clusters tasks that share projects.
    Project,
    /// Soonest upcoming first.
    NotDue,
    /// Most overdue first.
    Overdue,
    CreationDate,
    CompletionDate,
}

impl SortProperty {
    /// Names accepted by [`SortProperty::from_str`], in declaration order.
    pub const NAMES: [&'static str; 7] = [
        "default",
        "priority",
        "project",
        "not-due",
        "overdue",
        "creation-date",
        "completion-date",
    ];

    /// Canonical name of the property.
    pub fn name(&self) -> &'static str {
        match self {
            SortProperty::Default => "default",
            SortProperty::Priority => "priority",
            SortProperty::Project => "project",
            SortProperty::NotDue => "not-due",
            SortProperty::Overdue => "overdue",
            SortProperty::CreationDate => "creation-date",
            SortProperty::CompletionDate => "completion-date",
        }
    }
}

impl fmt::Display for SortProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortProperty {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "default" => Ok(SortProperty::Default),
            "priority" => Ok(SortProperty::Priority),
            "project" => Ok(SortProperty::Project),
            "not-due" | "notdue" => Ok(SortProperty::NotDue),
            "overdue" => Ok(SortProperty::Overdue),
            "creation-date" => Ok(SortProperty::CreationDate),
            "completion-date" => Ok(SortProperty::CompletionDate),
            _ => Err(SortError::UnsupportedProperty(s.to_string())),
        }
    }
}

/// Direction applied after sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Keep the comparator order.
    #[default]
    Descending,
    /// Reverse the final sequence.
    Ascending,
}

/// Sorts a copy of `tasks`.
///
/// `now` is used by the due-based orderings.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use todomd_core::config::ParseConfig;
/// use todomd_core::parse::parse_document;
/// use todomd_core::sort::{sort_tasks, SortDirection, SortProperty};
///
/// let now = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let document = parse_document("(B) later\n(A) first".lines(), &[], &ParseConfig::default());
///
/// let sorted = sort_tasks(&document.tasks, SortProperty::Priority, SortDirection::default(), now);
/// assert_eq!(sorted[0].title, "first");
/// ```
pub fn sort_tasks(
    tasks: &[Task],
    property: SortProperty,
    direction: SortDirection,
    now: NaiveDateTime,
) -> Vec<Task> {
    let mut sorted = sort_refs(tasks.iter().collect(), property, now);
    if direction == SortDirection::Ascending {
        sorted.reverse();
    }
    sorted.into_iter().cloned().collect()
}

/// Default ordering: [`SortProperty::Default`], descending.
pub fn default_sort(tasks: &[Task], now: NaiveDateTime) -> Vec<Task> {
    sort_tasks(tasks, SortProperty::Default, SortDirection::Descending, now)
}

fn sort_refs(mut tasks: Vec<&Task>, property: SortProperty, now: NaiveDateTime) -> Vec<&Task> {
    match property {
        SortProperty::Default => return default_order(tasks, now),
        SortProperty::Project => return project_similarity(tasks),
        SortProperty::Priority => tasks.sort_by(|a, b| compare_priority(a, b)),
        SortProperty::CreationDate => tasks.sort_by(|a, b| {
            compare_dates(a.creation_date.as_deref(), b.creation_date.as_deref())
        }),
        SortProperty::CompletionDate => tasks.sort_by(|a, b| {
            compare_dates(a.completion_date.as_deref(), b.completion_date.as_deref())
        }),
        SortProperty::Overdue => tasks.sort_by_key(|task| Reverse(overdue_days(task, now))),
        SortProperty::NotDue => tasks.sort_by_key(|task| days_until_due(task, now)),
    }
    tasks
}

/// Absent priority ranks after `Z`.
pub(crate) fn compare_priority(a: &Task, b: &Task) -> Ordering {
    match (a.priority, b.priority) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// A missing or unparseable date ranks first.
fn compare_dates(a: Option<&str>, b: Option<&str>) -> Ordering {
    let parse = |value: Option<&str>| -> Option<NaiveDate> { value.and_then(parse_date_lenient) };
    parse(a).cmp(&parse(b))
}

fn overdue_days(task: &Task, now: NaiveDateTime) -> i64 {
    task.due_status(now).map_or(0, |status| status.overdue_in_days)
}

fn days_until_due(task: &Task, now: NaiveDateTime) -> i64 {
    task.due_status(now).map_or(0, |status| status.days_until_due)
}

/// Invalid, Overdue (most overdue first), Due, no due date, NotDue (soonest
/// first); priority order within each bucket.
fn default_order(tasks: Vec<&Task>, now: NaiveDateTime) -> Vec<&Task> {
    let by_priority = sort_refs(tasks, SortProperty::Priority, now);

    let mut invalid = Vec::new();
    let mut overdue = Vec::new();
    let mut due = Vec::new();
    let mut no_due = Vec::new();
    let mut not_due = Vec::new();

    for task in by_priority {
        match task.due_state(now) {
            Some(DueState::Invalid) => invalid.push(task),
            Some(DueState::Overdue) => overdue.push(task),
            Some(DueState::Due) => due.push(task),
            Some(DueState::NotDue) => not_due.push(task),
            None => no_due.push(task),
        }
    }

    let mut ordered = invalid;
    ordered.extend(sort_refs(overdue, SortProperty::Overdue, now));
    ordered.extend(due);
    ordered.extend(no_due);
    ordered.extend(sort_refs(not_due, SortProperty::NotDue, now));
    ordered
}

/// Legacy project clustering.
///
/// Every ordered pair `(a, b)` (including `a == b`) is scored by the number of
/// shared projects and the pairs are stable-sorted by that score. The pairs are
/// flattened as `b, a` and only the last occurrence of each task is kept, so
/// tasks from the highest-scoring pairs end up at the tail.
fn project_similarity(tasks: Vec<&Task>) -> Vec<&Task> {
    let mut pairs: Vec<(usize, usize, usize)> = Vec::with_capacity(tasks.len() * tasks.len());
    for (first, a) in tasks.iter().enumerate() {
        for (second, b) in tasks.iter().enumerate() {
            pairs.push((first, second, shared_count(&a.projects, &b.projects)));
        }
    }
    pairs.sort_by_key(|&(_, _, shared)| shared);

    let flattened: Vec<usize> = pairs
        .iter()
        .flat_map(|&(first, second, _)| [second, first])
        .collect();

    let mut seen = HashSet::new();
    let mut order: Vec<usize> = flattened
        .into_iter()
        .rev()
        .filter(|index| seen.insert(*index))
        .collect();
    order.reverse();

    order.into_iter().map(|index| tasks[index]).collect()
}

/// Size of the intersection, counting each distinct name of `a` once.
fn shared_count(a: &[String], b: &[String]) -> usize {
    let mut seen = HashSet::new();
    a.iter()
        .filter(|name| seen.insert(name.as_str()) && b.contains(name))
        .count()
}
