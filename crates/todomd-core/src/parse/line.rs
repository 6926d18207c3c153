//! Line classifier and annotation tokenizer.
//!
//! One line is classified as empty, comment, tag comment or task. Task lines
//! are split into words, and every word is dispatched on its first character.
//! A word either becomes an annotation or stays part of the title; malformed
//! annotations never produce an error.

use crate::config::ParseConfig;
use crate::due::DueDate;
use crate::models::{Count, Priority, Range, Task};

/// Result of classifying one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// Blank after trimming.
    Empty,
    /// Starts with `# `.
    Comment,
    /// Starts with `## `; carries the tags declared for the following tasks.
    TagComment(Vec<String>),
    /// Any other line.
    Task(Box<Task>),
}

/// Classifies and tokenizes one line.
///
/// # Example
///
/// ```
/// use todomd_core::config::ParseConfig;
/// use todomd_core::parse::{parse_line, ParsedLine};
///
/// let config = ParseConfig::default();
/// let ParsedLine::Task(task) = parse_line("(A) call mom +family", 0, &config) else {
///     panic!("expected a task");
/// };
/// assert_eq!(task.title, "call mom");
/// assert_eq!(task.projects, vec!["family"]);
/// ```
pub fn parse_line(text: &str, line_number: usize, config: &ParseConfig) -> ParsedLine {
    let line = text.trim();
    if line.is_empty() {
        return ParsedLine::Empty;
    }

    if line.starts_with("# ") {
        return ParsedLine::Comment;
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return ParsedLine::TagComment(parse_tag_comment(rest));
    }

    ParsedLine::Task(Box::new(tokenize_task(text, line, line_number, config)))
}

/// Extracts the `#tag` words of a tag comment body.
fn parse_tag_comment(body: &str) -> Vec<String> {
    body.trim()
        .split(' ')
        .filter(|word| word.starts_with('#'))
        .flat_map(|word| word.split('#'))
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Running position of the word being tokenized, in characters of the raw line.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    line: usize,
    offset: usize,
}

impl Cursor {
    fn range(&self, len: usize) -> Range {
        Range::new(self.line, self.offset, self.offset + len)
    }

    fn skip(&mut self, len: usize) {
        self.offset += len;
    }

    /// Moves past a word and the single space that follows it.
    fn advance(&mut self, word: &str) {
        self.offset += char_len(word) + 1;
    }
}

/// What a word looks like, judged by its first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WordKind {
    Brace,
    Tag,
    Context,
    Project,
    Priority,
    Text,
}

impl WordKind {
    fn classify(word: &str) -> Self {
        match word.chars().next() {
            Some('{') => WordKind::Brace,
            Some('#') => WordKind::Tag,
            Some('@') => WordKind::Context,
            Some('+') => WordKind::Project,
            Some('(') => WordKind::Priority,
            _ => WordKind::Text,
        }
    }
}

/// Whether a word was taken as an annotation or left in the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Annotation,
    Literal,
}

fn tokenize_task(raw: &str, trimmed: &str, line_number: usize, config: &ParseConfig) -> Task {
    let mut task = Task {
        raw_text: raw.to_string(),
        line_number,
        indent_level: indent_level(raw, config.tab_size),
        ..Task::default()
    };

    let mut cursor = Cursor {
        line: line_number,
        offset: raw.chars().take_while(|c| c.is_whitespace()).count(),
    };

    let mut rest = trimmed;
    if let Some(stripped) = trimmed.strip_prefix(config.done_symbol.as_str()) {
        task.done = true;
        cursor.skip(char_len(&config.done_symbol));
        rest = stripped;
    }

    let mut title_words = Vec::new();
    for word in rest.split(' ') {
        let outcome = match WordKind::classify(word) {
            WordKind::Brace => brace_annotation(&mut task, word, cursor),
            WordKind::Tag => tag_annotation(&mut task, word, cursor),
            WordKind::Context => {
                sigil_annotation(word, cursor, &mut task.contexts, &mut task.context_ranges)
            }
            WordKind::Project => {
                sigil_annotation(word, cursor, &mut task.projects, &mut task.project_ranges)
            }
            WordKind::Priority => priority_annotation(&mut task, word, cursor),
            WordKind::Text => Outcome::Literal,
        };
        if outcome == Outcome::Literal {
            title_words.push(word);
        }
        cursor.advance(word);
    }

    task.title = title_words.join(" ");
    task
}

/// Handles `{name:value}` and `{name}` words.
fn brace_annotation(task: &mut Task, word: &str, cursor: Cursor) -> Outcome {
    if word.len() < 2 || !word.ends_with('}') {
        return Outcome::Literal;
    }

    let inner = &word[1..word.len() - 1];
    let (name, value) = inner.split_once(':').unwrap_or((inner, ""));
    let range = cursor.range(char_len(word));

    match name {
        "due" => {
            if !value.is_empty() {
                task.due = Some(DueDate::new(value));
                task.due_range = Some(range);
            }
        }
        "overdue" => {
            task.overdue = Some(value.to_string());
            task.overdue_range = Some(range);
        }
        "cr" => {
            task.creation_date = non_empty(value);
            task.special_tag_ranges.push(range);
        }
        "cm" => {
            task.done = true;
            task.completion_date = non_empty(value);
            task.completion_date_range = Some(range);
            task.special_tag_ranges.push(range);
        }
        "count" => match parse_count(value) {
            Some((current, needed)) => {
                task.special_tag_ranges.push(range);
                if current == needed {
                    task.done = true;
                }
                task.count = Some(Count {
                    current,
                    needed,
                    range,
                });
            }
            None => {
                tracing::trace!(line = cursor.line, word, "dropping malformed count annotation");
            }
        },
        "t" => {
            task.threshold = Some(value.to_string());
            task.special_tag_ranges.push(range);
        }
        "h" => {
            task.is_hidden = true;
            task.special_tag_ranges.push(range);
        }
        "c" => {
            task.is_collapsed = true;
            task.collapse_range = Some(range);
            task.special_tag_ranges.push(range);
        }
        _ => return Outcome::Literal,
    }

    Outcome::Annotation
}

/// Handles `#a` and chained `#a#b` words.
fn tag_annotation(task: &mut Task, word: &str, cursor: Cursor) -> Outcome {
    let mut offset = cursor.offset;
    for tag in word.split('#').filter(|tag| !tag.is_empty()) {
        let len = char_len(tag);
        task.tag_delimiter_ranges
            .push(Range::new(cursor.line, offset, offset + 1));
        task.tag_ranges
            .push(Range::new(cursor.line, offset + 1, offset + 1 + len));
        task.tags.push(tag.to_string());
        offset += len + 1;
    }
    Outcome::Annotation
}

/// Handles `@context` and `+project`; a bare sigil is literal text.
fn sigil_annotation(
    word: &str,
    cursor: Cursor,
    names: &mut Vec<String>,
    ranges: &mut Vec<Range>,
) -> Outcome {
    let len = char_len(word);
    if len == 1 {
        return Outcome::Literal;
    }
    names.push(word[1..].to_string());
    ranges.push(cursor.range(len));
    Outcome::Annotation
}

/// Handles `(A)`..`(Z)`.
fn priority_annotation(task: &mut Task, word: &str, cursor: Cursor) -> Outcome {
    match Priority::from_annotation(word) {
        Some(priority) => {
            task.priority = Some(priority);
            task.priority_range = Some(cursor.range(char_len(word)));
            Outcome::Annotation
        }
        None => Outcome::Literal,
    }
}

/// Parses `current/needed` with both sides as integers.
///
/// Extra segments (`1/3/5`) or trailing junk (`1x/3`) make the whole counter
/// invalid rather than reading a prefix.
fn parse_count(value: &str) -> Option<(i64, i64)> {
    let (current, needed) = value.split_once('/')?;
    Some((current.parse().ok()?, needed.parse().ok()?))
}

/// Leading whitespace width (tabs count as `tab_size`) divided by `tab_size`.
fn indent_level(raw: &str, tab_size: usize) -> usize {
    let tab_size = tab_size.max(1);
    let width: usize = raw
        .chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { tab_size } else { 1 })
        .sum();
    width / tab_size
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}
