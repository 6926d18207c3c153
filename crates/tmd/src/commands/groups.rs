//! Grouped views: tasks by tag, project or context.

use todomd_core::group::{group_by_contexts, group_by_projects, group_by_tags, GroupSort};
use todomd_core::models::Task;

use super::config::ViewConfig;
use super::list::is_visible;
use super::{CommandContext, Result};
use crate::output::{format_groups_json, format_groups_table};
use crate::task_file::TaskFile;

/// What to group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Tags,
    Projects,
    Contexts,
}

impl GroupKind {
    fn sigil(self) -> char {
        match self {
            GroupKind::Tags => '#',
            GroupKind::Projects => '+',
            GroupKind::Contexts => '@',
        }
    }
}

/// Executes the tags, projects or contexts command.
///
/// Completed tasks are left out under the same `[view]` rules as `list`.
/// `by_count` overrides the configured group order.
pub fn execute(
    ctx: &CommandContext,
    kind: GroupKind,
    by_count: bool,
    file: &TaskFile,
    view: &ViewConfig,
) -> Result<()> {
    let tasks: Vec<Task> = file
        .document()
        .tasks
        .iter()
        .filter(|task| is_visible(task, false, view))
        .cloned()
        .collect();
    let sort = if by_count {
        GroupSort::Count
    } else {
        view.group_sort
    };

    let groups = match kind {
        GroupKind::Tags => group_by_tags(&tasks, sort),
        GroupKind::Projects => group_by_projects(&tasks, sort),
        GroupKind::Contexts => group_by_contexts(&tasks, sort),
    };

    if ctx.json_output {
        println!("{}", format_groups_json(&groups, ctx.now)?);
    } else if !ctx.quiet {
        print!(
            "{}",
            format_groups_table(&groups, kind.sigil(), ctx.now, ctx.use_colors)
        );
    }

    Ok(())
}
