//! Archive command implementation.
//!
//! Moves completed, non-recurring tasks to the archive file.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use todomd_core::edit::archivable;

use super::{CommandContext, CommandError, Result};
use crate::task_file::TaskFile;

/// Executes the archive command.
///
/// Archived lines are appended to `archive_path` (created if missing) and
/// then removed from the task file.
///
/// # Errors
///
/// Returns a configuration error without an archive file, or an I/O error if
/// either file cannot be written.
pub fn execute(ctx: &CommandContext, file: &TaskFile, archive_path: Option<&Path>) -> Result<()> {
    let archive_path = archive_path.ok_or_else(missing_archive_file)?;

    let archived: HashSet<usize> = archivable(&file.document().tasks).into_iter().collect();
    let (moved, kept): (Vec<(usize, &String)>, Vec<(usize, &String)>) = file
        .lines()
        .iter()
        .enumerate()
        .partition(|(line_number, _)| archived.contains(line_number));

    if !moved.is_empty() {
        let moved_lines: Vec<&str> = moved.iter().map(|(_, text)| text.as_str()).collect();
        append_lines(archive_path, &moved_lines)?;

        let kept_lines: Vec<String> = kept.into_iter().map(|(_, text)| text.clone()).collect();
        file.write_lines(&kept_lines)?;
    }
    tracing::debug!(archived = moved.len(), archive = %archive_path.display(), "archived tasks");

    if ctx.json_output {
        let output = serde_json::json!({
            "archived": moved.len(),
            "archive_file": archive_path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        match moved.len() {
            0 => println!("No completed tasks to archive."),
            1 => println!("Archived 1 task to {}", archive_path.display()),
            n => println!("Archived {} tasks to {}", n, archive_path.display()),
        }
    }

    Ok(())
}

pub(crate) fn missing_archive_file() -> CommandError {
    CommandError::Config(
        "No default archive file specified. Set default_archive_file in the config".to_string(),
    )
}

/// Appends lines to a file, starting on a new line.
pub(crate) fn append_lines(path: &Path, lines: &[&str]) -> Result<()> {
    let needs_separator = fs::read_to_string(path)
        .map(|content| !content.is_empty() && !content.ends_with('\n'))
        .unwrap_or(false);

    let mut archive = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| CommandError::file(path, e))?;

    let mut content = String::new();
    if needs_separator {
        content.push('\n');
    }
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    archive
        .write_all(content.as_bytes())
        .map_err(|e| CommandError::file(path, e))
}
