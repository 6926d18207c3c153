//! Document assembler.
//!
//! Runs the line classifier over a whole document and adds what needs more
//! than one line: inherited tags from tag comments, links reported by the
//! host, overdue overrides, and the parent/child hierarchy from indentation.

use serde::Serialize;

use super::line::{parse_line, ParsedLine};
use crate::config::ParseConfig;
use crate::due::DueDate;
use crate::models::{DocumentLink, Link, Task};

/// Result of parsing a document.
///
/// Tasks are stored flat in source order; the hierarchy is kept as indices
/// into `tasks` (`roots` and per-task `children`), so the tree view borrows
/// the tasks instead of copying them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    /// Every task, in source order.
    pub tasks: Vec<Task>,
    /// Line numbers of `# ` and `## ` lines.
    pub comment_lines: Vec<usize>,
    roots: Vec<usize>,
    children: Vec<Vec<usize>>,
}

/// A task with its subtasks, borrowed from a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskNode<'a> {
    #[serde(flatten)]
    pub task: &'a Task,
    pub subtasks: Vec<TaskNode<'a>>,
}

impl Document {
    /// Indices of top-level tasks, in source order.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Indices of the direct subtasks of the task at `index`, in source order.
    pub fn children(&self, index: usize) -> &[usize] {
        self.children.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Finds the task on a line.
    pub fn task_at_line(&self, line_number: usize) -> Option<&Task> {
        self.index_of_line(line_number).map(|index| &self.tasks[index])
    }

    /// Index into `tasks` of the task on a line.
    pub fn index_of_line(&self, line_number: usize) -> Option<usize> {
        self.tasks
            .binary_search_by_key(&line_number, |task| task.line_number)
            .ok()
    }

    /// Builds the tree view: top-level tasks with their subtasks.
    pub fn tree(&self) -> Vec<TaskNode<'_>> {
        self.roots.iter().map(|&index| self.node(index)).collect()
    }

    fn node(&self, index: usize) -> TaskNode<'_> {
        TaskNode {
            task: &self.tasks[index],
            subtasks: self
                .children(index)
                .iter()
                .map(|&child| self.node(child))
                .collect(),
        }
    }
}

/// Parses every line of a document.
///
/// `links` is the host's link list for the whole document; links are attached
/// to the task on the same line when they have a target.
///
/// # Example
///
/// ```
/// use todomd_core::config::ParseConfig;
/// use todomd_core::parse::parse_document;
///
/// let text = "## #work\nreport\n    draft\n# notes\nrelax";
/// let document = parse_document(text.lines(), &[], &ParseConfig::default());
///
/// assert_eq!(document.tasks.len(), 3);
/// assert_eq!(document.tasks[0].tags, vec!["work"]);
/// assert_eq!(document.tasks[1].parent_line_number, Some(1));
/// assert!(document.tasks[2].tags.is_empty());
/// ```
pub fn parse_document<'a, I>(lines: I, links: &[DocumentLink], config: &ParseConfig) -> Document
where
    I: IntoIterator<Item = &'a str>,
{
    let mut document = Document::default();
    let mut additional_tags: Vec<String> = Vec::new();
    // Indices of open ancestors, with strictly increasing indent levels.
    let mut ancestors: Vec<usize> = Vec::new();

    for (line_number, text) in lines.into_iter().enumerate() {
        let mut task = match parse_line(text, line_number, config) {
            ParsedLine::Empty => continue,
            ParsedLine::Comment => {
                document.comment_lines.push(line_number);
                additional_tags.clear();
                continue;
            }
            ParsedLine::TagComment(tags) => {
                document.comment_lines.push(line_number);
                additional_tags = tags;
                continue;
            }
            ParsedLine::Task(task) => *task,
        };

        task.tags.extend(additional_tags.iter().cloned());
        task.links = links_on_line(links, line_number);
        apply_overdue_override(&mut task);

        let index = document.tasks.len();
        while let Some(&last) = ancestors.last() {
            if document.tasks[last].indent_level < task.indent_level {
                break;
            }
            ancestors.pop();
        }

        match ancestors.last() {
            Some(&parent) if task.indent_level > 0 => {
                task.parent_line_number = Some(document.tasks[parent].line_number);
                document.children[parent].push(index);
            }
            _ => document.roots.push(index),
        }

        ancestors.push(index);
        document.children.push(Vec::new());
        document.tasks.push(task);
    }

    tracing::debug!(
        tasks = document.tasks.len(),
        roots = document.roots.len(),
        comments = document.comment_lines.len(),
        "parsed document"
    );

    document
}

fn links_on_line(links: &[DocumentLink], line_number: usize) -> Vec<Link> {
    links
        .iter()
        .filter(|link| link.line == line_number)
        .filter_map(|link| {
            let target = link.target.as_ref()?;
            Some(Link {
                character_range: (link.start_col, link.end_col),
                value: target.clone(),
                scheme: link.scheme.clone(),
            })
        })
        .collect()
}

/// Rebuilds the due date with the `{overdue:…}` value when both are present.
fn apply_overdue_override(task: &mut Task) {
    let Some(overdue) = task.overdue.as_deref().filter(|value| !value.is_empty()) else {
        return;
    };
    if let Some(due) = &task.due {
        task.due = Some(DueDate::with_overdue(due.raw(), overdue));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::due::DueState;

    fn parse(text: &str) -> Document {
        parse_document(text.lines(), &[], &ParseConfig::default())
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_empty_document() {
        let document = parse("");
        assert!(document.tasks.is_empty());
        assert!(document.tree().is_empty());
    }

    #[test]
    fn test_tag_comment_inheritance_and_reset() {
        let document = parse("## #work #urgent\nbuy milk\ncall #own\n# notes\nrelax");
        assert_eq!(document.tasks[0].tags, vec!["work", "urgent"]);
        assert_eq!(document.tasks[1].tags, vec!["own", "work", "urgent"]);
        assert!(document.tasks[2].tags.is_empty());
        assert_eq!(document.comment_lines, vec![0, 3]);
    }

    #[test]
    fn test_tag_comment_replaces_previous_tags() {
        let document = parse("## #a\none\n## #b\ntwo");
        assert_eq!(document.tasks[0].tags, vec!["a"]);
        assert_eq!(document.tasks[1].tags, vec!["b"]);
    }

    #[test]
    fn test_inherited_tags_have_no_ranges() {
        let document = parse("## #a\none #own");
        assert_eq!(document.tasks[0].tags.len(), 2);
        assert_eq!(document.tasks[0].tag_ranges.len(), 1);
    }

    #[test]
    fn test_tree_from_indentation() {
        let document = parse("root\n    child one\n    child two\nsecond root");
        let tree = document.tree();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].task.title, "root");
        assert_eq!(tree[0].subtasks.len(), 2);
        assert_eq!(tree[0].subtasks[0].task.title, "child one");
        assert_eq!(tree[0].subtasks[1].task.title, "child two");
        assert!(tree[1].subtasks.is_empty());

        assert_eq!(document.tasks[1].parent_line_number, Some(0));
        assert_eq!(document.tasks[2].parent_line_number, Some(0));
        assert_eq!(document.tasks[3].parent_line_number, None);
        assert_eq!(document.roots(), &[0, 3]);
        assert_eq!(document.children(0), &[1, 2]);
    }

    #[test]
    fn test_parent_is_nearest_lesser_indent() {
        let text = "a\n    b\n        c\n    d\n            e\n        f";
        let document = parse(text);
        let parents: Vec<_> = document
            .tasks
            .iter()
            .map(|task| task.parent_line_number)
            .collect();
        assert_eq!(parents, vec![None, Some(0), Some(1), Some(0), Some(3), Some(3)]);
    }

    #[test]
    fn test_indented_first_task_is_a_root() {
        let document = parse("    orphan\nroot");
        assert_eq!(document.tasks[0].parent_line_number, None);
        assert_eq!(document.roots(), &[0, 1]);
    }

    #[test]
    fn test_parent_skips_comments_and_blank_lines() {
        let document = parse("parent\n\n# comment\n    child");
        assert_eq!(document.tasks[1].line_number, 3);
        assert_eq!(document.tasks[1].parent_line_number, Some(0));
    }

    #[test]
    fn test_links_are_attached_by_line() {
        let links = vec![
            DocumentLink {
                line: 1,
                start_col: 5,
                end_col: 24,
                target: Some("https://example.com".to_string()),
                scheme: "https".to_string(),
            },
            DocumentLink {
                line: 1,
                start_col: 25,
                end_col: 30,
                target: None,
                scheme: "file".to_string(),
            },
        ];
        let text = "first\nread https://example.com ./x";
        let document = parse_document(text.lines(), &links, &ParseConfig::default());
        assert!(document.tasks[0].links.is_empty());
        assert_eq!(
            document.tasks[1].links,
            vec![Link {
                character_range: (5, 24),
                value: "https://example.com".to_string(),
                scheme: "https".to_string(),
            }]
        );
    }

    #[test]
    fn test_overdue_override_is_applied() {
        let document = parse("water plants {due:mon} {overdue:2024-01-08}");
        let due = document.tasks[0].due.as_ref().unwrap();
        assert_eq!(due.overdue_override(), Some("2024-01-08"));
        let status = due.status(now());
        assert_eq!(status.state, DueState::Overdue);
        assert_eq!(status.overdue_in_days, 2);
    }

    #[test]
    fn test_overdue_without_due_is_kept_raw() {
        let document = parse("task {overdue:2024-01-08}");
        assert!(document.tasks[0].due.is_none());
        assert_eq!(document.tasks[0].overdue.as_deref(), Some("2024-01-08"));
    }

    #[test]
    fn test_task_lookup_by_line() {
        let document = parse("# c\none\n\ntwo");
        assert_eq!(document.task_at_line(3).map(|t| t.title.as_str()), Some("two"));
        assert!(document.task_at_line(0).is_none());
        assert_eq!(document.index_of_line(1), Some(0));
    }

    #[test]
    fn test_tree_serializes_flattened() {
        let document = parse("a\n    b");
        let json = serde_json::to_value(document.tree()).unwrap();
        assert_eq!(json[0]["title"], "a");
        assert_eq!(json[0]["subtasks"][0]["title"], "b");
    }
}
