//! Next command implementation.
//!
//! Shows the open tasks to work on next: due and overdue ones if there are
//! any, by priority.

use todomd_core::group::next_tasks;

use super::{CommandContext, Result};
use crate::output::{format_tasks_json, format_tasks_table};
use crate::task_file::TaskFile;

/// Executes the next command.
pub fn execute(ctx: &CommandContext, limit: usize, file: &TaskFile) -> Result<()> {
    let tasks = next_tasks(&file.document().tasks, ctx.now, limit);

    if ctx.json_output {
        println!("{}", format_tasks_json(&tasks, tasks.len(), ctx.now)?);
    } else if !ctx.quiet {
        print!("{}", format_tasks_table(&tasks, ctx.now, ctx.use_colors));
    }

    Ok(())
}
