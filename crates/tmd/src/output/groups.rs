//! Grouped view output formatting.

use chrono::NaiveDateTime;
use owo_colors::OwoColorize;
use serde::Serialize;
use todomd_core::group::TaskGroup;

use super::helpers::{display_line, format_due, format_title};
use super::tasks::TaskOutput;

/// JSON output structure for one group.
#[derive(Serialize)]
pub struct GroupOutput<'a> {
    pub title: &'a str,
    pub count: usize,
    pub tasks: Vec<TaskOutput<'a>>,
}

/// Formats groups as JSON.
pub fn format_groups_json(
    groups: &[TaskGroup<'_>],
    now: NaiveDateTime,
) -> Result<String, serde_json::Error> {
    let output: Vec<GroupOutput> = groups
        .iter()
        .map(|group| GroupOutput {
            title: &group.title,
            count: group.items.len(),
            tasks: group
                .items
                .iter()
                .map(|task| TaskOutput::new(task, now))
                .collect(),
        })
        .collect();

    serde_json::to_string_pretty(&output)
}

/// Formats groups as a list of headed sections.
///
/// `sigil` is printed before each group title (`#`, `+` or `@`).
pub fn format_groups_table(
    groups: &[TaskGroup<'_>],
    sigil: char,
    now: NaiveDateTime,
    use_colors: bool,
) -> String {
    if groups.is_empty() {
        return "No groups found.\n".to_string();
    }

    let mut output = String::new();
    for (index, group) in groups.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }
        let header = format!("{sigil}{} ({})", group.title, group.items.len());
        if use_colors {
            output.push_str(&format!("{}\n", header.bold()));
        } else {
            output.push_str(&header);
            output.push('\n');
        }

        for task in &group.items {
            let line = format!(
                "  {:<5} {} {}",
                display_line(task.line_number),
                format_due(task, now, 16, use_colors),
                format_title(task, use_colors)
            );
            output.push_str(line.trim_end());
            output.push('\n');
        }
    }
    output
}
