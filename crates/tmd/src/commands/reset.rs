//! Reset-recurring command implementation.
//!
//! Re-opens completed recurring tasks and marks occurrences missed since the
//! last visit with `{overdue:…}`.

use chrono::NaiveDate;
use todomd_core::config::EditConfig;
use todomd_core::edit::{needs_recurring_reset, reset_recurring};

use super::{CommandContext, Result};
use crate::task_file::TaskFile;

/// Executes the reset-recurring command.
///
/// `since` is the day of the last visit and defaults to yesterday. Nothing is
/// changed when it is today.
pub fn execute(
    ctx: &CommandContext,
    since: Option<NaiveDate>,
    file: &TaskFile,
    edit_config: &EditConfig,
) -> Result<()> {
    let today = ctx.now.date();
    let last_visit = since.unwrap_or_else(|| today.pred_opt().unwrap_or(today));

    let edits = if needs_recurring_reset(Some(last_visit), ctx.now) {
        reset_recurring(&file.document().tasks, edit_config, last_visit, ctx.now)
    } else {
        Vec::new()
    };
    // Edits of one task are adjacent.
    let mut lines: Vec<usize> = edits.iter().map(|edit| edit.line).collect();
    lines.dedup();

    if !edits.is_empty() {
        file.write_edits(&edits)?;
    }

    if ctx.json_output {
        let output = serde_json::json!({
            "since": last_visit.format("%Y-%m-%d").to_string(),
            "updated_lines": lines.iter().map(|line| line + 1).collect::<Vec<_>>(),
            "edits": edits,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        match lines.len() {
            0 => println!("No recurring tasks to reset."),
            1 => println!("Reset 1 recurring task."),
            n => println!("Reset {} recurring tasks.", n),
        }
    }

    Ok(())
}
