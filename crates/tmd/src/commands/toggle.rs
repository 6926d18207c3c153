//! Toggle command implementation.
//!
//! Marks the task on a line done, re-opens it, or advances its counter. With
//! `completion.auto_archive` a task that becomes done is moved straight to
//! the archive file.

use std::path::Path;

use serde::Serialize;
use todomd_core::edit::{apply_edits, toggle_done, TextEdit};
use todomd_core::parse::{parse_line, ParsedLine};

use super::archive::{append_lines, missing_archive_file};
use super::config::Config;
use super::{CommandContext, CommandError, Result};
use crate::task_file::TaskFile;

/// JSON output for a toggled task.
#[derive(Serialize)]
struct ToggleOutput<'a> {
    line: usize,
    title: &'a str,
    done: bool,
    text: &'a str,
    edits: &'a [TextEdit],
    #[serde(skip_serializing_if = "Option::is_none")]
    archived_to: Option<String>,
}

/// Executes the toggle command.
///
/// `line` is 1-based.
///
/// # Errors
///
/// Returns [`CommandError::NoTaskOnLine`] if the line is not a task, a
/// configuration error if the task should be auto-archived but no archive file
/// is set, or an I/O error if a file cannot be written.
pub fn execute(ctx: &CommandContext, line: usize, file: &TaskFile, config: &Config) -> Result<()> {
    let line_number = line.checked_sub(1).ok_or(CommandError::NoTaskOnLine(line))?;
    let task = file
        .document()
        .task_at_line(line_number)
        .ok_or(CommandError::NoTaskOnLine(line))?;

    let edits = toggle_done(task, &config.edit_config(), ctx.now);
    let mut lines = apply_edits(file.lines(), &edits);
    let text = lines.get(line_number).cloned().unwrap_or_default();

    let (done, recurring) = match parse_line(&text, line_number, &config.parse) {
        ParsedLine::Task(updated) => (updated.done, updated.is_recurring()),
        _ => (false, false),
    };

    // Recurring tasks stay in the file so reset-recurring can re-open them.
    let archive_to: Option<&Path> = if config.completion.auto_archive && done && !recurring {
        Some(
            config
                .default_archive_file
                .as_deref()
                .ok_or_else(missing_archive_file)?,
        )
    } else {
        None
    };

    match archive_to {
        Some(path) => {
            append_lines(path, &[text.as_str()])?;
            lines.remove(line_number);
            file.write_lines(&lines)?;
        }
        None => file.write_lines(&lines)?,
    }
    tracing::debug!(
        line,
        done,
        archived = archive_to.is_some(),
        edits = edits.len(),
        "toggled task"
    );

    if ctx.json_output {
        let output = ToggleOutput {
            line,
            title: &task.title,
            done,
            text: &text,
            edits: &edits,
            archived_to: archive_to.map(|path| path.display().to_string()),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        let state = if done { "Completed" } else { "Reopened" };
        match &task.count {
            Some(_) => println!("Updated line {}: {}", line, text.trim()),
            None => println!("{} line {}: {}", state, line, task.title),
        }
        if let Some(path) = archive_to {
            println!("Archived to {}", path.display());
        }
    }

    Ok(())
}
