use chrono::{Duration, Local, NaiveDate};

use crate::model::task::Task;

/// Built-in deadline categories a view can filter the task list by.
///
/// One tagged enum dispatched through [`CategoryFilter::matches`] rather than
/// per-button closures, so "today" is sampled exactly once per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    DueToday,
    /// Deadline in `[today, today + 7 days)`.
    DueThisWeek,
    /// Deadline strictly before today.
    Overdue,
    NoDeadline,
}

impl CategoryFilter {
    pub fn matches(self, task: &Task, today: NaiveDate) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::DueToday => task.deadline == Some(today),
            CategoryFilter::DueThisWeek => task
                .deadline
                .is_some_and(|d| d >= today && d < today + Duration::days(7)),
            CategoryFilter::Overdue => task.deadline.is_some_and(|d| d < today),
            CategoryFilter::NoDeadline => task.deadline.is_none(),
        }
    }
}

/// Compute the ordered visible subset of `tasks` for the current view state,
/// evaluated against today's date at call time.
///
/// A task is visible iff it passes the show-done toggle, the category filter,
/// and the free-text query (empty query matches everything; otherwise a
/// case-insensitive substring of the title or description). Order among
/// survivors is the store's display order; nothing is cached, every call
/// recomputes over the full collection.
pub fn visible<'a>(
    tasks: &'a [Task],
    show_done: bool,
    category: CategoryFilter,
    query: &str,
) -> Vec<&'a Task> {
    visible_at(tasks, show_done, category, query, Local::now().date_naive())
}

/// [`visible`] with an explicit "today", for deterministic tests.
pub fn visible_at<'a>(
    tasks: &'a [Task],
    show_done: bool,
    category: CategoryFilter,
    query: &str,
    today: NaiveDate,
) -> Vec<&'a Task> {
    let needle = query.to_lowercase();
    tasks
        .iter()
        .filter(|t| show_done || !t.is_done)
        .filter(|t| category.matches(t, today))
        .filter(|t| {
            needle.is_empty()
                || t.title.to_lowercase().contains(&needle)
                || t.description.to_lowercase().contains(&needle)
        })
        .collect()
}
