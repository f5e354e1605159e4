//! Todo query engine: predicate construction and pagination.
//!
//! A listing request turns into a `TodoPredicate`: the mandatory owner
//! scope plus an explicit list of optional clauses combined by pure
//! conjunction. No clause is ever mutated in place; absence of a criterion
//! means absence of its clause.

use serde::{Deserialize, Serialize};

use chrono::NaiveDate;

use crate::error::Result;
use crate::model::{Priority, Todo, TodoView};
use crate::store::Store;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Priority selector: `All` disables the clause entirely.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    High,
    Medium,
    Low,
}

impl PriorityFilter {
    fn as_priority(self) -> Option<Priority> {
        match self {
            PriorityFilter::All => None,
            PriorityFilter::High => Some(Priority::High),
            PriorityFilter::Medium => Some(Priority::Medium),
            PriorityFilter::Low => Some(Priority::Low),
        }
    }
}

/// Completion selector: `All` disables the clause entirely.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

/// Ephemeral, per-request filter criteria.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub search: Option<String>,
    #[serde(default)]
    pub priority: PriorityFilter,
    #[serde(default)]
    pub status: StatusFilter,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<u32>,
    pub limit: Option<usize>,
}

/// One optional filter clause over todo fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// Case-insensitive substring over title OR description.
    Text(String),
    Priority(Priority),
    Completed(bool),
    DueOnOrAfter(NaiveDate),
    DueOnOrBefore(NaiveDate),
}

impl Clause {
    fn matches(&self, todo: &Todo) -> bool {
        match self {
            Clause::Text(needle) => {
                let needle = needle.to_lowercase();
                todo.title.to_lowercase().contains(&needle)
                    || todo
                        .description
                        .as_deref()
                        .is_some_and(|text| text.to_lowercase().contains(&needle))
            }
            Clause::Priority(priority) => todo.priority == *priority,
            Clause::Completed(completed) => todo.completed == *completed,
            // A todo with no due date never matches a date clause. This is a
            // deliberate design decision, not an omission.
            Clause::DueOnOrAfter(start) => todo.due_date.is_some_and(|due| due >= *start),
            Clause::DueOnOrBefore(end) => todo.due_date.is_some_and(|due| due <= *end),
        }
    }
}

/// The owner scope plus all active clauses, combined conjunctively.
#[derive(Debug, Clone)]
pub struct TodoPredicate {
    owner: String,
    clauses: Vec<Clause>,
}

impl TodoPredicate {
    /// Build the predicate for one request. The owner clause is mandatory
    /// and unconditional; every other clause is attached only when its
    /// criterion is present.
    pub fn build(owner: &str, query: &ListQuery) -> Self {
        let mut clauses = Vec::new();

        if let Some(search) = query.search.as_deref() {
            let search = search.trim();
            if !search.is_empty() {
                clauses.push(Clause::Text(search.to_string()));
            }
        }
        if let Some(priority) = query.priority.as_priority() {
            clauses.push(Clause::Priority(priority));
        }
        match query.status {
            StatusFilter::All => {}
            StatusFilter::Pending => clauses.push(Clause::Completed(false)),
            StatusFilter::Completed => clauses.push(Clause::Completed(true)),
        }
        if let Some(start) = query.start_date {
            clauses.push(Clause::DueOnOrAfter(start));
        }
        if let Some(end) = query.end_date {
            clauses.push(Clause::DueOnOrBefore(end));
        }

        Self {
            owner: owner.to_string(),
            clauses,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Pure conjunction over the owner scope and all active clauses.
    pub fn matches(&self, todo: &Todo) -> bool {
        todo.user == self.owner && self.clauses.iter().all(|clause| clause.matches(todo))
    }
}

/// One page of listing results plus pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct TodoPage {
    pub todos: Vec<TodoView>,
    pub page: u32,
    pub pages: u32,
    pub total: usize,
}

/// Most recent first. The sort is stable and the input vector is in
/// insertion order, so equal timestamps keep their creation order.
fn order_newest_first(todos: &mut [Todo]) {
    todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Execute a listing request: filter, order, page, and resolve category
/// references. Read-only and repeatable for identical inputs.
pub fn run_query(store: &Store, owner: &str, query: &ListQuery) -> Result<TodoPage> {
    let predicate = TodoPredicate::build(owner, query);
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

    let mut matching: Vec<Todo> = store
        .todos_for_owner(owner)
        .into_iter()
        .filter(|todo| predicate.matches(todo))
        .collect();

    order_newest_first(&mut matching);

    let total = matching.len();
    let pages = total.div_ceil(limit) as u32;

    let start = (page as usize - 1).saturating_mul(limit);
    let todos = matching
        .into_iter()
        .skip(start)
        .take(limit)
        .map(|todo| {
            let category = todo
                .category
                .as_deref()
                .and_then(|id| store.resolve_category(owner, id));
            TodoView::resolve(todo, category)
        })
        .collect();

    Ok(TodoPage {
        todos,
        page,
        pages,
        total,
    })
}
