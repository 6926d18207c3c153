//! Common helper functions for output formatting.

use chrono::NaiveDateTime;
use owo_colors::OwoColorize;
use todomd_core::due::DueState;
use todomd_core::models::{Priority, Task};

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats a 0-based line number as the 1-based number editors show.
pub fn display_line(line_number: usize) -> usize {
    line_number + 1
}

/// Formats priority for display, padded to `width`.
pub fn format_priority(priority: Option<Priority>, width: usize, use_colors: bool) -> String {
    let Some(priority) = priority else {
        return " ".repeat(width);
    };
    let label = format!("{:<width$}", format!("({})", priority.letter()));

    if use_colors {
        match priority.letter() {
            'A' => label.red().to_string(),
            'B' => label.yellow().to_string(),
            'C' => label.blue().to_string(),
            _ => label.dimmed().to_string(),
        }
    } else {
        label
    }
}

/// Describes the due status of a task at `now`.
pub fn due_label(task: &Task, now: NaiveDateTime) -> String {
    let Some(status) = task.due_status(now) else {
        return String::new();
    };
    match status.state {
        DueState::Invalid => "invalid".to_string(),
        DueState::Due => "today".to_string(),
        DueState::Overdue => match status.overdue_in_days {
            1 => "1 day overdue".to_string(),
            days => format!("{days} days overdue"),
        },
        DueState::NotDue => match status.days_until_due {
            1 => "tomorrow".to_string(),
            days => format!("in {days} days"),
        },
    }
}

/// Formats the due status for display, padded to `width`.
pub fn format_due(task: &Task, now: NaiveDateTime, width: usize, use_colors: bool) -> String {
    let label = format!("{:<width$}", due_label(task, now));
    if !use_colors {
        return label;
    }
    match task.due_state(now) {
        Some(DueState::Overdue) => label.red().to_string(),
        Some(DueState::Due) => label.yellow().to_string(),
        Some(DueState::Invalid) => label.magenta().to_string(),
        _ => label,
    }
}

/// Formats tags, projects and contexts with their sigils.
pub fn format_names(task: &Task, max_len: usize) -> String {
    let names: Vec<String> = task
        .tags
        .iter()
        .map(|tag| format!("#{tag}"))
        .chain(task.projects.iter().map(|project| format!("+{project}")))
        .chain(task.contexts.iter().map(|context| format!("@{context}")))
        .collect();

    truncate_str(&names.join(" "), max_len)
}

/// Formats the title, dimmed when the task is done.
pub fn format_title(task: &Task, use_colors: bool) -> String {
    if task.done && use_colors {
        task.title.dimmed().strikethrough().to_string()
    } else {
        task.title.clone()
    }
}

/// Checkbox for the tree view.
pub fn checkbox(task: &Task) -> &'static str {
    if task.done {
        "[x]"
    } else {
        "[ ]"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use todomd_core::config::ParseConfig;
    use todomd_core::parse::parse_line;
    use todomd_core::parse::ParsedLine;

    fn task(text: &str) -> Task {
        match parse_line(text, 0, &ParseConfig::default()) {
            ParsedLine::Task(task) => *task,
            other => panic!("expected a task, got {other:?}"),
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("this is long", 10), "this is...");
        assert_eq!(truncate_str("ääääää", 5), "ää...");
    }

    #[test]
    fn test_format_priority_no_colors() {
        assert_eq!(format_priority(Priority::new('A'), 4, false), "(A) ");
        assert_eq!(format_priority(None, 4, false), "    ");
    }

    #[test]
    fn test_due_labels() {
        assert_eq!(due_label(&task("a {due:2024-01-10}"), now()), "today");
        assert_eq!(due_label(&task("a {due:2024-01-09}"), now()), "1 day overdue");
        assert_eq!(due_label(&task("a {due:2024-01-07}"), now()), "3 days overdue");
        assert_eq!(due_label(&task("a {due:2024-01-11}"), now()), "tomorrow");
        assert_eq!(due_label(&task("a {due:2024-01-15}"), now()), "in 5 days");
        assert_eq!(due_label(&task("a {due:someday}"), now()), "invalid");
        assert_eq!(due_label(&task("a"), now()), "");
    }

    #[test]
    fn test_format_names() {
        let task = task("call +house @phone #errand");
        assert_eq!(format_names(&task, 40), "#errand +house @phone");
        assert_eq!(format_names(&task, 10), "#errand...");
    }

    #[test]
    fn test_format_title_and_checkbox() {
        let done = task("x water plants");
        assert_eq!(format_title(&done, false), "water plants");
        assert_eq!(checkbox(&done), "[x]");
        assert_eq!(checkbox(&task("open")), "[ ]");
    }
}
