//! Task files on disk.
//!
//! Reads a todo.md file, scans it for links and parses it into a
//! [`Document`]. Edits are applied to the original lines and written back,
//! keeping the file's line ending and final newline.

use std::fs;
use std::path::{Path, PathBuf};

use todomd_core::config::ParseConfig;
use todomd_core::edit::{apply_edits, TextEdit};
use todomd_core::models::DocumentLink;
use todomd_core::parse::{parse_document, Document};

use crate::commands::config::Config;
use crate::commands::{CommandError, Result};

/// A parsed task file.
#[derive(Debug)]
pub struct TaskFile {
    path: PathBuf,
    lines: Vec<String>,
    crlf: bool,
    trailing_newline: bool,
    document: Document,
}

impl TaskFile {
    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::File`] if the file cannot be read.
    pub fn open(path: impl Into<PathBuf>, config: &ParseConfig) -> Result<Self> {
        let path = path.into();
        let content = fs::read_to_string(&path).map_err(|e| CommandError::file(&path, e))?;
        Ok(Self::from_content(path, &content, config))
    }

    fn from_content(path: PathBuf, content: &str, config: &ParseConfig) -> Self {
        let lines: Vec<String> = content.lines().map(str::to_string).collect();
        let links = scan_links(&lines);
        let document = parse_document(lines.iter().map(String::as_str), &links, config);

        tracing::debug!(
            path = %path.display(),
            lines = lines.len(),
            links = links.len(),
            "read task file"
        );

        Self {
            path,
            crlf: content.contains("\r\n"),
            trailing_newline: content.ends_with('\n'),
            lines,
            document,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Applies `edits` to the file's lines and writes the result back.
    ///
    /// Returns the new lines.
    pub fn write_edits(&self, edits: &[TextEdit]) -> Result<Vec<String>> {
        let lines = apply_edits(&self.lines, edits);
        self.write_lines(&lines)?;
        Ok(lines)
    }

    /// Replaces the file's content with `lines`.
    pub fn write_lines(&self, lines: &[String]) -> Result<()> {
        let separator = if self.crlf { "\r\n" } else { "\n" };
        let mut content = lines.join(separator);
        if self.trailing_newline && !lines.is_empty() {
            content.push_str(separator);
        }
        fs::write(&self.path, content).map_err(|e| CommandError::file(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), lines = lines.len(), "wrote task file");
        Ok(())
    }
}

/// Resolves the task file from `--file` / `TMD_FILE`, then `default_file`.
///
/// # Errors
///
/// Returns a configuration error when neither is set.
pub fn resolve_path(file: Option<&Path>, config: &Config) -> Result<PathBuf> {
    file.map(Path::to_path_buf)
        .or_else(|| config.default_file.clone())
        .ok_or_else(|| {
            CommandError::Config(
                "No task file specified. Use --file, set TMD_FILE, or set default_file in the config"
                    .to_string(),
            )
        })
}

/// Reports every `scheme://…` word as a link.
///
/// Columns are character offsets; words are separated by single spaces, like
/// the task tokenizer splits them.
pub fn scan_links<S: AsRef<str>>(lines: &[S]) -> Vec<DocumentLink> {
    let mut links = Vec::new();

    for (line, text) in lines.iter().enumerate() {
        let mut column = 0;
        for word in text.as_ref().split(' ') {
            let width = word.chars().count();
            let start = column + leading_whitespace(word);
            let target = word.trim();
            if let Some(scheme) = link_scheme(target) {
                links.push(DocumentLink {
                    line,
                    start_col: start,
                    end_col: start + target.chars().count(),
                    target: Some(target.to_string()),
                    scheme: scheme.to_string(),
                });
            }
            column += width + 1;
        }
    }

    links
}

fn leading_whitespace(word: &str) -> usize {
    word.chars().take_while(|c| c.is_whitespace()).count()
}

/// Scheme of `word` if it looks like `scheme://rest`.
fn link_scheme(word: &str) -> Option<&str> {
    let (scheme, rest) = word.split_once("://")?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    (valid && !rest.is_empty()).then_some(scheme)
}
