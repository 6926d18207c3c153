//! Filter evaluation against parsed tasks.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use todomd_core::config::ParseConfig;
//! use todomd_core::filter::{FilterContext, FilterEvaluator, FilterParser};
//! use todomd_core::parse::parse_document;
//!
//! let now = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let text = "pay rent #home {due:2024-01-01}\nwrite report #work";
//! let document = parse_document(text.lines(), &[], &ParseConfig::default());
//!
//! let filter = FilterParser::parse("#home $overdue").unwrap();
//! let context = FilterContext::new(now);
//! let evaluator = FilterEvaluator::new(&filter, &context);
//!
//! let matched = evaluator.filter_tasks(&document.tasks);
//! assert_eq!(matched.len(), 1);
//! assert_eq!(matched[0].title, "pay rent");
//! ```

use chrono::NaiveDateTime;

use super::ast::Filter;
use crate::due::DueState;
use crate::models::Task;

/// Context for filter evaluation.
///
/// Holds the moment due-based predicates are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterContext {
    now: NaiveDateTime,
}

impl FilterContext {
    /// Creates a new filter context evaluated at `now`.
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// The evaluation moment.
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }
}

/// Evaluates a parsed filter against tasks.
#[derive(Debug)]
pub struct FilterEvaluator<'a> {
    filter: &'a Filter,
    context: &'a FilterContext,
}

impl<'a> FilterEvaluator<'a> {
    /// Creates a new filter evaluator.
    ///
    /// # Arguments
    ///
    /// * `filter` - The parsed filter to evaluate
    /// * `context` - The evaluation context
    pub fn new(filter: &'a Filter, context: &'a FilterContext) -> Self {
        Self { filter, context }
    }

    /// Returns true if the task matches the filter.
    pub fn matches(&self, task: &Task) -> bool {
        self.evaluate_filter(self.filter, task)
    }

    /// Filters a slice of tasks, returning only those that match, in order.
    pub fn filter_tasks<'b>(&self, tasks: &'b [Task]) -> Vec<&'b Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }

    /// Evaluates a filter expression against a task.
    fn evaluate_filter(&self, filter: &Filter, task: &Task) -> bool {
        match filter {
            // Annotation filters
            Filter::Tag(name) => contains_ignore_case(&task.tags, name),
            Filter::Project(name) => contains_ignore_case(&task.projects, name),
            Filter::Context(name) => contains_ignore_case(&task.contexts, name),
            Filter::Priority(priority) => task.priority == Some(*priority),

            // Due filters
            Filter::Due => task.is_due_or_overdue(self.context.now),
            Filter::Overdue => self.has_due_state(task, DueState::Overdue),
            Filter::NotDue => self.has_due_state(task, DueState::NotDue),
            Filter::InvalidDue => self.has_due_state(task, DueState::Invalid),
            Filter::NoDue => task.due.is_none(),
            Filter::Recurring => task.is_recurring(),

            // State filters
            Filter::Done => task.done,
            Filter::Hidden => task.is_hidden,
            Filter::Collapsed => task.is_collapsed,
            Filter::NoTag => task.tags.is_empty(),
            Filter::NoProject => task.projects.is_empty(),
            Filter::NoContext => task.contexts.is_empty(),

            Filter::Text(text) => task.title.to_lowercase().contains(&text.to_lowercase()),

            // Boolean operators
            Filter::And(left, right) => {
                self.evaluate_filter(left, task) && self.evaluate_filter(right, task)
            }
            Filter::Or(left, right) => {
                self.evaluate_filter(left, task) || self.evaluate_filter(right, task)
            }
            Filter::Not(inner) => !self.evaluate_filter(inner, task),
        }
    }

    fn has_due_state(&self, task: &Task, state: DueState) -> bool {
        task.due_state(self.context.now) == Some(state)
    }
}

fn contains_ignore_case(names: &[String], name: &str) -> bool {
    let name_lower = name.to_lowercase();
    names.iter().any(|candidate| candidate.to_lowercase() == name_lower)
}
