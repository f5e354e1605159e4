//! Record types for todos and categories.
//!
//! Wire form is camelCase JSON (`dueDate`, `createdAt`, ...) so existing
//! clients keep working unchanged.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

pub const DEFAULT_CATEGORY_COLOR: &str = "#a855f7";

fn default_category_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}

/// Task priority. Serialized exactly as "High" / "Medium" / "Low".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Priority {
    High,
    Medium,
    #[default]
    Low,
}

/// A single todo record, visible only to its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    /// Owner identity. Immutable after creation.
    pub user: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Category id. May dangle after the category is deleted; readers must
    /// treat an unresolvable reference as absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Build a new record with server-assigned id and timestamps.
    pub fn new(user: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Ulid::new().to_string(),
            user: user.into(),
            title: title.into(),
            description: None,
            priority: Priority::default(),
            completed: false,
            due_date: None,
            category: None,
            attachments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// An owner-scoped category. Deleting one does not cascade to todos.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub user: String,
    pub name: String,
    pub icon: String,
    #[serde(default = "default_category_color")]
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(
        user: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        color: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Ulid::new().to_string(),
            user: user.into(),
            name: name.into(),
            icon: icon.into(),
            color: color.unwrap_or_else(default_category_color),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A todo with its category reference resolved for display. A dangling or
/// absent reference renders as `null`, never as an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoView {
    pub id: String,
    pub user: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TodoView {
    pub fn resolve(todo: Todo, category: Option<Category>) -> Self {
        Self {
            id: todo.id,
            user: todo.user,
            title: todo.title,
            description: todo.description,
            priority: todo.priority,
            completed: todo.completed,
            due_date: todo.due_date,
            category,
            attachments: todo.attachments,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_todo_defaults() {
        let todo = Todo::new("user-1", "Write report");
        assert_eq!(todo.priority, Priority::Low);
        assert!(!todo.completed);
        assert!(todo.due_date.is_none());
        assert!(todo.attachments.is_empty());
        assert_eq!(todo.created_at, todo.updated_at);
    }

    #[test]
    fn priority_serializes_capitalized() {
        assert_eq!(
            serde_json::to_string(&Priority::High).expect("serialize"),
            "\"High\""
        );
        let parsed: Priority = serde_json::from_str("\"Medium\"").expect("parse");
        assert_eq!(parsed, Priority::Medium);
    }

    #[test]
    fn todo_wire_form_is_camel_case() {
        let mut todo = Todo::new("user-1", "Buy milk");
        todo.due_date = NaiveDate::from_ymd_opt(2026, 9, 1);
        let value = serde_json::to_value(&todo).expect("serialize");
        assert_eq!(value["dueDate"], "2026-09-01");
        assert!(value["createdAt"].is_string());
        assert!(value.get("due_date").is_none());
    }

    #[test]
    fn category_color_defaults() {
        let category = Category::new("user-1", "Work", "briefcase", None);
        assert_eq!(category.color, DEFAULT_CATEGORY_COLOR);
    }

    #[test]
    fn view_renders_dangling_category_as_null() {
        let view = TodoView::resolve(Todo::new("user-1", "Buy milk"), None);
        let value = serde_json::to_value(&view).expect("serialize");
        assert!(value["category"].is_null());
    }
}
