//! List command implementation.
//!
//! Lists the tasks of a file, optionally filtered and sorted.

use chrono::NaiveDateTime;
use todomd_core::filter::{FilterContext, FilterEvaluator, FilterParser};
use todomd_core::models::Task;
use todomd_core::sort::{sort_tasks, SortDirection, SortProperty};

use super::config::ViewConfig;
use super::{CommandContext, Result};
use crate::output::{format_tasks_json, format_tasks_table};
use crate::task_file::TaskFile;

/// Options for the list command.
#[derive(Debug, Default)]
pub struct ListOptions {
    /// Filter expression.
    pub filter: Option<String>,
    /// Sort property name.
    pub sort: Option<String>,
    /// Reverse the sort order.
    pub ascending: bool,
    /// Include completed tasks.
    pub all: bool,
    /// Limit results.
    pub limit: Option<usize>,
}

/// Executes the list command.
///
/// # Arguments
///
/// * `ctx` - Command context with output settings
/// * `opts` - List command options
/// * `file` - The parsed task file
/// * `view` - `[view]` settings from the config file
///
/// # Errors
///
/// Returns an error if the filter expression is invalid or the sort property
/// is unknown.
pub fn execute(
    ctx: &CommandContext,
    opts: &ListOptions,
    file: &TaskFile,
    view: &ViewConfig,
) -> Result<()> {
    let tasks = select_tasks(&file.document().tasks, opts, view, ctx.now)?;
    let total = tasks.len();
    let shown: Vec<&Task> = tasks.iter().take(opts.limit.unwrap_or(usize::MAX)).collect();

    if ctx.verbose {
        eprintln!("{} of {} tasks match", total, file.document().tasks.len());
    }

    if ctx.json_output {
        println!("{}", format_tasks_json(&shown, total, ctx.now)?);
    } else if !ctx.quiet {
        print!("{}", format_tasks_table(&shown, ctx.now, ctx.use_colors));
    }

    Ok(())
}

/// Filters, hides completed tasks and sorts.
///
/// The sort property is checked before anything else so an unknown name is
/// reported even for an empty file.
fn select_tasks(
    tasks: &[Task],
    opts: &ListOptions,
    view: &ViewConfig,
    now: NaiveDateTime,
) -> Result<Vec<Task>> {
    let property = opts
        .sort
        .as_deref()
        .map(str::parse::<SortProperty>)
        .transpose()?;
    let filter = opts.filter.as_deref().map(FilterParser::parse).transpose()?;
    let context = FilterContext::new(now);

    let selected: Vec<Task> = tasks
        .iter()
        .filter(|task| is_visible(task, opts.all, view))
        .filter(|task| {
            filter
                .as_ref()
                .map_or(true, |filter| FilterEvaluator::new(filter, &context).matches(task))
        })
        .cloned()
        .collect();

    let direction = if opts.ascending {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    };
    Ok(sort_tasks(
        &selected,
        property.unwrap_or_default(),
        direction,
        now,
    ))
}

/// Whether a task is listed under the `[view]` settings.
pub(crate) fn is_visible(task: &Task, all: bool, view: &ViewConfig) -> bool {
    if !task.done || all {
        return true;
    }
    view.show_completed && (view.show_recurring_completed || !task.is_recurring())
}
