//! Line classification and document assembly.

mod document;
mod line;

pub use document::{parse_document, Document, TaskNode};
pub use line::{parse_line, ParsedLine};
