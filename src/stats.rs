//! Completion statistics for one owner.
//!
//! Counts are always computed over the owner's entire todo set, independent
//! of whatever filter the current list view happens to apply. Callers that
//! want filtered counts must run the predicate themselves; this is the
//! dashboard-style global summary.

use serde::Serialize;

use crate::error::Result;
use crate::model::Priority;
use crate::store::Store;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodoStats {
    pub completed: usize,
    pub pending: usize,
    pub by_priority: PriorityCounts,
}

/// Compute the global summary for `owner`. An owner with no todos gets
/// all-zero counts, never an error.
pub fn compute(store: &Store, owner: &str) -> Result<TodoStats> {
    let todos = store.todos_for_owner(owner);

    let mut stats = TodoStats::default();
    for todo in &todos {
        if todo.completed {
            stats.completed += 1;
        } else {
            stats.pending += 1;
        }
        // Priority buckets are independent of completion status.
        match todo.priority {
            Priority::High => stats.by_priority.high += 1,
            Priority::Medium => stats.by_priority.medium += 1,
            Priority::Low => stats.by_priority.low += 1,
        }
    }

    Ok(stats)
}
