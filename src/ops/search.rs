use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::model::task::{Task, TaskId};

/// Which field of a task matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Title,
    Description,
}

/// A search hit for a task field, with byte ranges a view can highlight.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub task_id: TaskId,
    pub field: MatchField,
    pub spans: Vec<Range<usize>>,
}

/// Build a case-insensitive literal matcher for a user query. The query text
/// is escaped, so regex metacharacters typed by the user match themselves.
pub fn query_regex(query: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
}

/// Collect all non-overlapping match byte-ranges for a regex in the given text.
fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

/// Search task titles and descriptions, in display order.
pub fn search_tasks(tasks: &[Task], re: &Regex) -> Vec<SearchHit> {
    let mut hits = Vec::new();

    for task in tasks {
        let spans = find_matches(re, &task.title);
        if !spans.is_empty() {
            hits.push(SearchHit {
                task_id: task.id,
                field: MatchField::Title,
                spans,
            });
        }

        let spans = find_matches(re, &task.description);
        if !spans.is_empty() {
            hits.push(SearchHit {
                task_id: task.id,
                field: MatchField::Description,
                spans,
            });
        }
    }

    hits
}
