//! Grouped views and the "next tasks" pick.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::Task;
use crate::sort::compare_priority;

/// Ordering of groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupSort {
    /// By title, case-insensitive.
    #[default]
    Alphabetic,
    /// Larger groups first; ties by title.
    Count,
}

/// Tasks sharing one tag, project or context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskGroup<'a> {
    pub title: String,
    /// Member tasks in document order.
    pub items: Vec<&'a Task>,
}

/// Groups tasks by tag. A task appears once in every group it has a tag for.
///
/// # Example
///
/// ```
/// use todomd_core::config::ParseConfig;
/// use todomd_core::group::{group_by_tags, GroupSort};
/// use todomd_core::parse::parse_document;
///
/// let document = parse_document("a #x\nb #y #x".lines(), &[], &ParseConfig::default());
/// let groups = group_by_tags(&document.tasks, GroupSort::Count);
///
/// assert_eq!(groups[0].title, "x");
/// assert_eq!(groups[0].items.len(), 2);
/// ```
pub fn group_by_tags(tasks: &[Task], sort: GroupSort) -> Vec<TaskGroup<'_>> {
    group_by(tasks, sort, |task| &task.tags)
}

/// Groups tasks by project.
pub fn group_by_projects(tasks: &[Task], sort: GroupSort) -> Vec<TaskGroup<'_>> {
    group_by(tasks, sort, |task| &task.projects)
}

/// Groups tasks by context.
pub fn group_by_contexts(tasks: &[Task], sort: GroupSort) -> Vec<TaskGroup<'_>> {
    group_by(tasks, sort, |task| &task.contexts)
}

fn group_by<'a>(
    tasks: &'a [Task],
    sort: GroupSort,
    names: impl Fn(&'a Task) -> &'a [String],
) -> Vec<TaskGroup<'a>> {
    let mut groups: Vec<TaskGroup<'a>> = Vec::new();
    let mut index_by_title: HashMap<&'a str, usize> = HashMap::new();

    for task in tasks {
        for name in names(task) {
            let index = *index_by_title.entry(name.as_str()).or_insert_with(|| {
                groups.push(TaskGroup {
                    title: name.clone(),
                    items: Vec::new(),
                });
                groups.len() - 1
            });
            let items = &mut groups[index].items;
            // A name repeated on one line still lists the task once.
            if items.last().map_or(true, |last| !std::ptr::eq(*last, task)) {
                items.push(task);
            }
        }
    }

    match sort {
        GroupSort::Alphabetic => groups.sort_by_cached_key(|group| group.title.to_lowercase()),
        GroupSort::Count => groups.sort_by(|a, b| {
            b.items
                .len()
                .cmp(&a.items.len())
                .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        }),
    }
    groups
}

/// Picks the tasks to work on next.
///
/// Considers tasks that are not done; when some of them are due or overdue at
/// `now`, only those. The result is in priority order (tasks without a
/// priority last) and holds at most `limit` tasks.
pub fn next_tasks(tasks: &[Task], now: NaiveDateTime, limit: usize) -> Vec<&Task> {
    let open: Vec<&Task> = tasks.iter().filter(|task| !task.done).collect();
    let due: Vec<&Task> = open
        .iter()
        .copied()
        .filter(|task| task.is_due_or_overdue(now))
        .collect();

    let mut picked = if due.is_empty() { open } else { due };
    picked.sort_by(|a, b| compare_priority(a, b));
    picked.truncate(limit);
    picked
}
