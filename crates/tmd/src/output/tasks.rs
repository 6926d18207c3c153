//! Task output formatting.

use chrono::NaiveDateTime;
use owo_colors::OwoColorize;
use serde::Serialize;
use todomd_core::due::DueStatus;
use todomd_core::models::Task;
use todomd_core::parse::TaskNode;

use super::helpers::{
    checkbox, display_line, due_label, format_due, format_names, format_priority, format_title,
};

const LINE_WIDTH: usize = 5;
const PRIORITY_WIDTH: usize = 4;
const DUE_WIDTH: usize = 16;
const NAMES_WIDTH: usize = 24;

/// JSON output structure for list-like commands.
#[derive(Serialize)]
pub struct ListOutput<'a> {
    pub tasks: Vec<TaskOutput<'a>>,
    /// Number of matching tasks before the limit was applied.
    pub total: usize,
}

/// JSON output structure for a single task.
#[derive(Serialize)]
pub struct TaskOutput<'a> {
    /// 1-based line number, as accepted by `tmd toggle`.
    pub line: usize,
    #[serde(flatten)]
    pub task: &'a Task,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_status: Option<DueStatus>,
}

impl<'a> TaskOutput<'a> {
    pub fn new(task: &'a Task, now: NaiveDateTime) -> Self {
        Self {
            line: display_line(task.line_number),
            task,
            due_status: task.due_status(now),
        }
    }
}

/// JSON output structure for a node of the tree view.
#[derive(Serialize)]
pub struct TreeNodeOutput<'a> {
    #[serde(flatten)]
    pub task: TaskOutput<'a>,
    pub subtasks: Vec<TreeNodeOutput<'a>>,
}

impl<'a> TreeNodeOutput<'a> {
    fn new(node: &TaskNode<'a>, now: NaiveDateTime) -> Self {
        Self {
            task: TaskOutput::new(node.task, now),
            subtasks: node
                .subtasks
                .iter()
                .map(|child| Self::new(child, now))
                .collect(),
        }
    }
}

/// Formats tasks as JSON.
pub fn format_tasks_json(
    tasks: &[&Task],
    total: usize,
    now: NaiveDateTime,
) -> Result<String, serde_json::Error> {
    let output = ListOutput {
        tasks: tasks.iter().map(|task| TaskOutput::new(task, now)).collect(),
        total,
    };

    serde_json::to_string_pretty(&output)
}

/// Formats tasks as a table.
pub fn format_tasks_table(tasks: &[&Task], now: NaiveDateTime, use_colors: bool) -> String {
    if tasks.is_empty() {
        return "No tasks found.\n".to_string();
    }

    let mut output = String::new();

    let header = format!(
        "{:<LINE_WIDTH$} {:<PRIORITY_WIDTH$} {:<DUE_WIDTH$} {:<NAMES_WIDTH$} {}",
        "Line", "Pri", "Due", "Tags", "Title"
    );
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for task in tasks {
        let line = format!(
            "{:<LINE_WIDTH$} {} {} {:<NAMES_WIDTH$} {}",
            display_line(task.line_number),
            format_priority(task.priority, PRIORITY_WIDTH, use_colors),
            format_due(task, now, DUE_WIDTH, use_colors),
            format_names(task, NAMES_WIDTH),
            format_title(task, use_colors)
        );
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output
}

/// Formats the tree view as JSON.
pub fn format_tree_json(
    nodes: &[TaskNode<'_>],
    now: NaiveDateTime,
) -> Result<String, serde_json::Error> {
    let output: Vec<TreeNodeOutput> = nodes
        .iter()
        .map(|node| TreeNodeOutput::new(node, now))
        .collect();

    serde_json::to_string_pretty(&output)
}

/// Formats the tree view as indented text.
pub fn format_tree_text(nodes: &[TaskNode<'_>], now: NaiveDateTime, use_colors: bool) -> String {
    if nodes.is_empty() {
        return "No tasks found.\n".to_string();
    }

    let mut output = String::new();
    for node in nodes {
        push_tree_node(&mut output, node, 0, now, use_colors);
    }
    output
}

fn push_tree_node(
    output: &mut String,
    node: &TaskNode<'_>,
    depth: usize,
    now: NaiveDateTime,
    use_colors: bool,
) {
    let task = node.task;
    let mut line = format!(
        "{}{} {}",
        "  ".repeat(depth),
        checkbox(task),
        format_title(task, use_colors)
    );
    if let Some(priority) = task.priority {
        line.push_str(&format!(" ({})", priority.letter()));
    }
    let due = due_label(task, now);
    if !due.is_empty() {
        if use_colors {
            line.push_str(&format!(" [{}]", due.dimmed()));
        } else {
            line.push_str(&format!(" [{due}]"));
        }
    }
    output.push_str(&line);
    output.push('\n');

    for child in &node.subtasks {
        push_tree_node(output, child, depth + 1, now, use_colors);
    }
}

/// One-line summary of a task, used after edits.
pub fn format_task_summary(task: &Task) -> String {
    format!("line {}: {}", display_line(task.line_number), task.title)
}
