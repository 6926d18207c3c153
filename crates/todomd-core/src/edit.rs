//! Edit producers.
//!
//! Operations that change a document are expressed as [`TextEdit`] values
//! against the parsed tasks; the host applies them to its buffer (or uses
//! [`apply_edits`]) and re-parses. Columns are character offsets, like the
//! ranges on [`Task`].

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::config::EditConfig;
use crate::models::{Count, Range, Task};

const COUNT_PREFIX: &str = "{count:";

/// Replacement of the character span `start..end` of one line.
///
/// An empty span is an insertion; an empty `new_text` is a deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub line: usize,
    pub start: usize,
    pub end: usize,
    pub new_text: String,
}

impl TextEdit {
    /// Inserts `text` at `column`.
    pub fn insert(line: usize, column: usize, text: impl Into<String>) -> Self {
        Self::replace(line, column, column, text)
    }

    /// Deletes `start..end`.
    pub fn delete(line: usize, start: usize, end: usize) -> Self {
        Self::replace(line, start, end, String::new())
    }

    /// Replaces `start..end` with `text`.
    pub fn replace(line: usize, start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            start,
            end,
            new_text: text.into(),
        }
    }
}

/// Edits that toggle the completion of a task.
///
/// - With a `{count:current/needed}` counter, the current value is incremented,
///   wrapping to `0` once it has reached `needed`.
/// - A done task loses its done symbol, its `{cm:…}` annotation, or both.
/// - An open task gets ` {cm:DATE}` appended when completion dates are enabled,
///   and the done symbol inserted before its first character otherwise. Any
///   `{overdue:…}` annotation is removed.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use todomd_core::config::{EditConfig, ParseConfig};
/// use todomd_core::edit::{apply_edits, toggle_done};
/// use todomd_core::parse::parse_document;
///
/// let now = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let lines = vec!["    write report".to_string()];
/// let document = parse_document(lines.iter().map(String::as_str), &[], &ParseConfig::default());
///
/// let edits = toggle_done(&document.tasks[0], &EditConfig::default(), now);
/// assert_eq!(apply_edits(&lines, &edits), vec!["    x write report"]);
/// ```
pub fn toggle_done(task: &Task, config: &EditConfig, now: NaiveDateTime) -> Vec<TextEdit> {
    if let Some(count) = &task.count {
        let next = if count.current == count.needed {
            0
        } else {
            count.current + 1
        };
        return set_count(task, count, next).into_iter().collect();
    }

    if task.done {
        undo_done(task, config)
    } else {
        mark_done(task, config, now)
    }
}

/// Edits that reset recurring tasks for a new day.
///
/// For every recurring task:
/// - a done task is re-opened (a complete counter goes back to `0`);
/// - an open task without an `{overdue:…}` annotation whose schedule had an
///   occurrence in `[last_visit, today)` gets ` {overdue:DATE}` appended, with
///   the most recent missed occurrence.
pub fn reset_recurring(
    tasks: &[Task],
    config: &EditConfig,
    last_visit: NaiveDate,
    now: NaiveDateTime,
) -> Vec<TextEdit> {
    let today = now.date();
    let mut edits = Vec::new();

    for task in tasks.iter().filter(|task| task.is_recurring()) {
        if task.done {
            if let Some(count) = task.count.as_ref().filter(|count| count.is_complete()) {
                edits.extend(set_count(task, count, 0));
            }
            edits.extend(undo_done(task, config));
            continue;
        }

        if task.overdue.is_some() {
            continue;
        }
        let missed = task
            .due
            .as_ref()
            .and_then(|due| due.previous_occurrence(today))
            .filter(|date| *date >= last_visit);
        if let Some(date) = missed {
            edits.push(TextEdit::insert(
                task.line_number,
                task.line_len(),
                format!(" {{overdue:{}}}", date.format("%Y-%m-%d")),
            ));
        }
    }

    tracing::debug!(edits = edits.len(), %last_visit, "reset recurring tasks");
    edits
}

/// Returns true unless the document was already visited on `now`'s day.
pub fn needs_recurring_reset(last_visit: Option<NaiveDate>, now: NaiveDateTime) -> bool {
    last_visit.map_or(true, |date| date != now.date())
}

/// Line numbers of completed, non-recurring tasks.
pub fn archivable(tasks: &[Task]) -> Vec<usize> {
    tasks
        .iter()
        .filter(|task| task.done && !task.is_recurring())
        .map(|task| task.line_number)
        .collect()
}

/// Applies edits to a copy of `lines`.
///
/// Edits of one line are applied right to left so earlier columns stay valid.
/// An insertion at the start of a deletion lands after it is applied. An edit
/// that overlaps one already applied to its right is skipped. Columns past the
/// end of a line are clamped and edits for missing lines are ignored.
pub fn apply_edits<S: AsRef<str>>(lines: &[S], edits: &[TextEdit]) -> Vec<String> {
    let mut result: Vec<String> = lines.iter().map(|line| line.as_ref().to_string()).collect();

    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    ordered.sort_by(|a, b| (b.line, b.start, b.end).cmp(&(a.line, a.start, a.end)));

    // Leftmost column touched so far on the current line.
    let mut applied_from: Option<(usize, usize)> = None;
    for edit in ordered {
        if let Some((line, column)) = applied_from {
            if line == edit.line && edit.end > column {
                tracing::debug!(line = edit.line, start = edit.start, "skipping overlapping edit");
                continue;
            }
        }
        let Some(line) = result.get_mut(edit.line) else {
            tracing::trace!(line = edit.line, "skipping edit for missing line");
            continue;
        };
        applied_from = Some((edit.line, edit.start));
        let mut chars: Vec<char> = line.chars().collect();
        let end = edit.end.min(chars.len());
        let start = edit.start.min(end);
        chars.splice(start..end, edit.new_text.chars());
        *line = chars.into_iter().collect();
    }

    result
}

/// Replaces the current value of a counter.
fn set_count(task: &Task, count: &Count, value: i64) -> Option<TextEdit> {
    let word = slice(&task.raw_text, count.range);
    let current = word.strip_prefix(COUNT_PREFIX)?.split('/').next()?;
    let start = count.range.start + COUNT_PREFIX.chars().count();
    Some(TextEdit::replace(
        task.line_number,
        start,
        start + current.chars().count(),
        value.to_string(),
    ))
}

fn mark_done(task: &Task, config: &EditConfig, now: NaiveDateTime) -> Vec<TextEdit> {
    let mut edits = Vec::new();

    if config.add_completion_date {
        let format = if config.completion_date_include_time {
            "%Y-%m-%dT%H:%M:%S"
        } else {
            "%Y-%m-%d"
        };
        edits.push(TextEdit::insert(
            task.line_number,
            task.line_len(),
            format!(" {{cm:{}}}", now.format(format)),
        ));
    } else {
        edits.push(TextEdit::insert(
            task.line_number,
            task.first_non_whitespace(),
            config.done_symbol.clone(),
        ));
    }

    if let Some(range) = task.overdue_range {
        edits.push(delete_word(task, range, task.first_non_whitespace()));
    }
    edits
}

fn undo_done(task: &Task, config: &EditConfig) -> Vec<TextEdit> {
    let mut edits = Vec::new();
    let start = task.first_non_whitespace();
    let mut symbol_end = start;

    let starts_with_symbol = task
        .raw_text
        .trim_start()
        .starts_with(config.done_symbol.as_str());
    if !config.done_symbol.is_empty() && starts_with_symbol {
        symbol_end = start + config.done_symbol.chars().count();
        edits.push(TextEdit::delete(task.line_number, start, symbol_end));
    }

    if let Some(range) = task.completion_date_range {
        edits.push(delete_word(task, range, symbol_end));
    }
    edits
}

/// Deletes an annotation word together with one adjacent space.
///
/// The space before the word is taken unless it lies before `floor`; a word at
/// `floor` takes the space after it instead, so the text that follows moves up
/// to `floor` rather than gaining a leading space.
fn delete_word(task: &Task, range: Range, floor: usize) -> TextEdit {
    let char_at = |column: usize| task.raw_text.chars().nth(column);
    if range.start > floor && char_at(range.start - 1) == Some(' ') {
        TextEdit::delete(task.line_number, range.start - 1, range.end)
    } else if char_at(range.end) == Some(' ') {
        TextEdit::delete(task.line_number, range.start, range.end + 1)
    } else {
        TextEdit::delete(task.line_number, range.start, range.end)
    }
}

fn slice(text: &str, range: Range) -> String {
    text.chars()
        .skip(range.start)
        .take(range.end.saturating_sub(range.start))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::ParseConfig;
    use crate::parse::parse_document;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(9, 30, 5)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parse(lines: &[&str]) -> Vec<Task> {
        parse_document(lines.iter().copied(), &[], &ParseConfig::default()).tasks
    }

    fn toggled(line: &str, config: &EditConfig) -> String {
        let tasks = parse(&[line]);
        let edits = toggle_done(&tasks[0], config, now());
        apply_edits(&[line], &edits).remove(0)
    }

    // ==================== toggle_done ====================

    #[test]
    fn test_toggle_marks_done_with_symbol() {
        assert_eq!(toggled("buy milk", &EditConfig::default()), "x buy milk");
        assert_eq!(toggled("\t  buy milk", &EditConfig::default()), "\t  x buy milk");
    }

    #[test]
    fn test_toggle_unmarks_done_symbol() {
        assert_eq!(toggled("  x buy milk", &EditConfig::default()), "  buy milk");
    }

    #[test]
    fn test_toggle_with_completion_date() {
        let config = EditConfig::default().with_completion_date(true, false);
        assert_eq!(toggled("buy milk", &config), "buy milk {cm:2024-01-10}");

        let config = EditConfig::default().with_completion_date(true, true);
        assert_eq!(toggled("buy milk", &config), "buy milk {cm:2024-01-10T09:30:05}");
    }

    #[test]
    fn test_toggle_removes_completion_date() {
        let config = EditConfig::default();
        assert_eq!(toggled("buy milk {cm:2024-01-09} #home", &config), "buy milk #home");
        assert_eq!(toggled("x buy milk {cm:2024-01-09}", &config), "buy milk");
        assert_eq!(toggled("x {cm:2024-01-09} buy milk", &config), "buy milk");
        assert_eq!(toggled("  x {cm:2024-01-09} buy milk", &config), "  buy milk");
    }

    #[test]
    fn test_toggle_custom_done_symbol() {
        let config = EditConfig::from_parse_config(&ParseConfig::default().with_done_symbol("[x] "));
        let line = "[x] task";
        let tasks = parse_document([line], &[], &ParseConfig::default().with_done_symbol("[x] ")).tasks;
        let edits = toggle_done(&tasks[0], &config, now());
        assert_eq!(apply_edits(&[line], &edits), vec!["task"]);
    }

    #[test]
    fn test_toggle_increments_counter() {
        let config = EditConfig::default();
        assert_eq!(toggled("pushups {count:1/3}", &config), "pushups {count:2/3}");
        assert_eq!(toggled("pushups {count:9/10}", &config), "pushups {count:10/10}");
        assert_eq!(toggled("pushups {count:3/3}", &config), "pushups {count:0/3}");
    }

    #[test]
    fn test_toggle_done_removes_overdue() {
        assert_eq!(
            toggled("water plants {due:ed} {overdue:2024-01-09}", &EditConfig::default()),
            "x water plants {due:ed}"
        );
    }

    #[test]
    fn test_toggle_done_removes_leading_overdue_on_indented_task() {
        let line = "    {overdue:2024-01-08} water {due:ed}";
        assert_eq!(toggled(line, &EditConfig::default()), "    x water {due:ed}");

        let config = EditConfig::default().with_completion_date(true, false);
        assert_eq!(toggled(line, &config), "    water {due:ed} {cm:2024-01-10}");
    }

    // ==================== reset_recurring ====================

    #[test]
    fn test_reset_reopens_done_recurring_tasks() {
        let lines = [
            "x stretch {due:ed}",
            "read {due:ed} {cm:2024-01-09}",
            "x one-off {due:2024-01-09}",
            "pushups {due:ed} {count:3/3}",
        ];
        let tasks = parse(&lines);
        let edits = reset_recurring(&tasks, &EditConfig::default(), date(2024, 1, 10), now());
        assert_eq!(
            apply_edits(&lines, &edits),
            vec![
                "stretch {due:ed}",
                "read {due:ed}",
                "x one-off {due:2024-01-09}",
                "pushups {due:ed} {count:0/3}",
            ]
        );
    }

    #[test]
    fn test_reset_marks_missed_occurrence() {
        // 2024-01-10 is a Wednesday; the last Monday was 2024-01-08.
        let lines = [
            "water {due:mon}",
            "call {due:ed}",
            "walk {due:ed} {overdue:2024-01-05}",
            "future {due:mon}",
        ];
        let tasks = parse(&lines);
        let edits = reset_recurring(&tasks[..3], &EditConfig::default(), date(2024, 1, 7), now());
        assert_eq!(
            apply_edits(&lines, &edits),
            vec![
                "water {due:mon} {overdue:2024-01-08}",
                "call {due:ed} {overdue:2024-01-09}",
                "walk {due:ed} {overdue:2024-01-05}",
                "future {due:mon}",
            ]
        );
    }

    #[test]
    fn test_reset_ignores_occurrences_before_last_visit() {
        let tasks = parse(&["water {due:mon}"]);
        let edits = reset_recurring(&tasks, &EditConfig::default(), date(2024, 1, 9), now());
        assert!(edits.is_empty());
    }

    #[test]
    fn test_reset_same_day_visit_adds_nothing() {
        let tasks = parse(&["call {due:ed}"]);
        let edits = reset_recurring(&tasks, &EditConfig::default(), date(2024, 1, 10), now());
        assert!(edits.is_empty());
    }

    #[test]
    fn test_needs_recurring_reset() {
        assert!(needs_recurring_reset(None, now()));
        assert!(needs_recurring_reset(Some(date(2024, 1, 9)), now()));
        assert!(!needs_recurring_reset(Some(date(2024, 1, 10)), now()));
    }

    // ==================== archivable ====================

    #[test]
    fn test_archivable_skips_recurring_and_open() {
        let tasks = parse(&["x done", "open", "x daily {due:ed}", "finished {cm:2024-01-01}"]);
        assert_eq!(archivable(&tasks), vec![0, 3]);
    }

    // ==================== apply_edits ====================

    #[test]
    fn test_apply_edits_right_to_left() {
        let lines = ["abcdef"];
        let edits = vec![
            TextEdit::delete(0, 0, 1),
            TextEdit::insert(0, 3, "XY"),
            TextEdit::replace(0, 5, 6, "!"),
        ];
        assert_eq!(apply_edits(&lines, &edits), vec!["bcXYde!"]);
    }

    #[test]
    fn test_apply_edits_uses_char_columns() {
        let lines = ["café au lait"];
        let edits = vec![TextEdit::insert(0, 4, "!")];
        assert_eq!(apply_edits(&lines, &edits), vec!["café! au lait"]);
    }

    #[test]
    fn test_apply_edits_inserts_after_deletion_at_same_column() {
        let lines = ["  {old} rest"];
        let edits = vec![TextEdit::insert(0, 2, "x "), TextEdit::delete(0, 2, 8)];
        assert_eq!(apply_edits(&lines, &edits), vec!["  x rest"]);
    }

    #[test]
    fn test_apply_edits_skips_overlapping_edit() {
        let lines = ["abcdef"];
        let edits = vec![TextEdit::insert(0, 3, "X"), TextEdit::delete(0, 1, 5)];
        assert_eq!(apply_edits(&lines, &edits), vec!["abcXdef"]);
    }

    #[test]
    fn test_apply_edits_clamps_and_skips() {
        let lines = ["abc"];
        let edits = vec![TextEdit::insert(0, 10, "d"), TextEdit::insert(5, 0, "x")];
        assert_eq!(apply_edits(&lines, &edits), vec!["abcd"]);
    }
}
