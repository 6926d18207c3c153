//! Tree command implementation.
//!
//! Shows the tasks of a file with their subtasks, as nested by indentation.

use super::{CommandContext, Result};
use crate::output::{format_tree_json, format_tree_text};
use crate::task_file::TaskFile;

/// Executes the tree command.
pub fn execute(ctx: &CommandContext, file: &TaskFile) -> Result<()> {
    let tree = file.document().tree();

    if ctx.json_output {
        println!("{}", format_tree_json(&tree, ctx.now)?);
    } else if !ctx.quiet {
        print!("{}", format_tree_text(&tree, ctx.now, ctx.use_colors));
    }

    Ok(())
}
