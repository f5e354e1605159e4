//! Document store for todos and categories.
//!
//! One JSON document per collection under the data directory:
//!
//! ```text
//! <data_dir>/
//!   todos.json        # All todo records, in insertion order
//!   categories.json   # All category records
//!   uploads/          # Attachment payloads (see attachments module)
//! ```
//!
//! The store is constructed once at startup and injected into the engine;
//! nothing reaches it through ambient globals. An in-process `RwLock` gives
//! every mutation a single atomic critical section, and writes go to disk
//! through the atomic temp-file+rename pattern under an advisory file lock,
//! so a concurrent reader never sees a partial document.
//!
//! Every mutation re-reads the record inside its own write section and runs
//! the ownership guard there, immediately before the write. NotFound (no
//! such record) and Forbidden (record owned by someone else) are distinct
//! outcomes.
//!
//! Mutations stage their change on a copy of the collection and swap it in
//! only after the disk write succeeds. A failed write leaves memory and
//! disk both untouched; callers see the error and readers never observe a
//! record that would vanish on restart.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{NaiveDate, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock::{FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::model::{Category, Priority, Todo};

const TODOS_FILE: &str = "todos.json";
const CATEGORIES_FILE: &str = "categories.json";

/// Fields accepted when creating a todo.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub category: Option<String>,
}

/// Partial update of a todo. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
    pub due_date: Option<NaiveDate>,
    pub category: Option<String>,
}

/// Fields accepted when creating a category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCategory {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub color: Option<String>,
}

#[derive(Default)]
struct Collections {
    todos: Vec<Todo>,
    categories: Vec<Category>,
}

/// Persistent store handle, shared across request handlers.
pub struct Store {
    data_dir: PathBuf,
    inner: RwLock<Collections>,
}

impl Store {
    /// Open (or initialize) the store under `data_dir`.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        let todos = read_collection(&data_dir.join(TODOS_FILE))?;
        let categories = read_collection(&data_dir.join(CATEGORIES_FILE))?;
        Ok(Self {
            data_dir,
            inner: RwLock::new(Collections { todos, categories }),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn todos_path(&self) -> PathBuf {
        self.data_dir.join(TODOS_FILE)
    }

    fn categories_path(&self) -> PathBuf {
        self.data_dir.join(CATEGORIES_FILE)
    }

    // =========================================================================
    // Todos
    // =========================================================================

    /// Create a todo for `owner`. Title validation happens before the store
    /// is touched; attachments arrive as already-resolved location strings.
    pub fn create_todo(
        &self,
        owner: &str,
        new: NewTodo,
        attachments: Vec<String>,
    ) -> Result<Todo> {
        if new.title.trim().is_empty() {
            return Err(Error::Validation("Please add a title".to_string()));
        }

        let mut todo = Todo::new(owner, new.title.trim());
        todo.description = new.description;
        todo.priority = new.priority.unwrap_or_default();
        todo.due_date = new.due_date;
        todo.category = new.category;
        todo.attachments = attachments;

        let mut inner = write_guard(&self.inner);
        let mut todos = inner.todos.clone();
        todos.push(todo.clone());
        self.persist_todos(&todos)?;
        inner.todos = todos;
        Ok(todo)
    }

    /// All todos belonging to `owner`, in insertion order.
    pub fn todos_for_owner(&self, owner: &str) -> Vec<Todo> {
        let inner = read_guard(&self.inner);
        inner
            .todos
            .iter()
            .filter(|todo| todo.user == owner)
            .cloned()
            .collect()
    }

    /// Fetch one todo, enforcing ownership.
    pub fn find_todo(&self, owner: &str, id: &str) -> Result<Todo> {
        let inner = read_guard(&self.inner);
        let todo = inner
            .todos
            .iter()
            .find(|todo| todo.id == id)
            .ok_or_else(|| Error::TodoNotFound(id.to_string()))?;
        authorize(&todo.user, owner)?;
        Ok(todo.clone())
    }

    /// Apply a partial update. The record is re-read and the ownership guard
    /// runs inside the same write section as the mutation.
    pub fn update_todo(&self, owner: &str, id: &str, update: TodoUpdate) -> Result<Todo> {
        let mut inner = write_guard(&self.inner);
        let position = inner
            .todos
            .iter()
            .position(|todo| todo.id == id)
            .ok_or_else(|| Error::TodoNotFound(id.to_string()))?;
        authorize(&inner.todos[position].user, owner)?;

        // Stage the change on a copy; the live collection swaps over only
        // after the disk write lands.
        let mut todos = inner.todos.clone();
        let todo = &mut todos[position];

        if let Some(title) = update.title {
            if title.trim().is_empty() {
                return Err(Error::Validation("Please add a title".to_string()));
            }
            todo.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            todo.description = Some(description);
        }
        if let Some(priority) = update.priority {
            todo.priority = priority;
        }
        if let Some(completed) = update.completed {
            todo.completed = completed;
        }
        if let Some(due_date) = update.due_date {
            todo.due_date = Some(due_date);
        }
        if let Some(category) = update.category {
            todo.category = Some(category);
        }
        todo.updated_at = Utc::now();

        let updated = todo.clone();
        self.persist_todos(&todos)?;
        inner.todos = todos;
        Ok(updated)
    }

    /// Append an attachment location to an existing todo.
    pub fn push_attachment(&self, owner: &str, id: &str, location: String) -> Result<Todo> {
        let mut inner = write_guard(&self.inner);
        let position = inner
            .todos
            .iter()
            .position(|todo| todo.id == id)
            .ok_or_else(|| Error::TodoNotFound(id.to_string()))?;
        authorize(&inner.todos[position].user, owner)?;

        let mut todos = inner.todos.clone();
        let todo = &mut todos[position];
        todo.attachments.push(location);
        todo.updated_at = Utc::now();

        let updated = todo.clone();
        self.persist_todos(&todos)?;
        inner.todos = todos;
        Ok(updated)
    }

    pub fn delete_todo(&self, owner: &str, id: &str) -> Result<()> {
        let mut inner = write_guard(&self.inner);
        let position = inner
            .todos
            .iter()
            .position(|todo| todo.id == id)
            .ok_or_else(|| Error::TodoNotFound(id.to_string()))?;
        authorize(&inner.todos[position].user, owner)?;

        let mut todos = inner.todos.clone();
        todos.remove(position);
        self.persist_todos(&todos)?;
        inner.todos = todos;
        Ok(())
    }

    // =========================================================================
    // Categories
    // =========================================================================

    pub fn create_category(&self, owner: &str, new: NewCategory) -> Result<Category> {
        if new.name.trim().is_empty() || new.icon.trim().is_empty() {
            return Err(Error::Validation("Please add all fields".to_string()));
        }

        let category = Category::new(owner, new.name.trim(), new.icon.trim(), new.color);
        let mut inner = write_guard(&self.inner);
        let mut categories = inner.categories.clone();
        categories.push(category.clone());
        self.persist_categories(&categories)?;
        inner.categories = categories;
        Ok(category)
    }

    pub fn categories_for_owner(&self, owner: &str) -> Vec<Category> {
        let inner = read_guard(&self.inner);
        inner
            .categories
            .iter()
            .filter(|category| category.user == owner)
            .cloned()
            .collect()
    }

    /// Deleting a category does not cascade: todos keep their (now dangling)
    /// reference and render it as absent.
    pub fn delete_category(&self, owner: &str, id: &str) -> Result<()> {
        let mut inner = write_guard(&self.inner);
        let position = inner
            .categories
            .iter()
            .position(|category| category.id == id)
            .ok_or_else(|| Error::CategoryNotFound(id.to_string()))?;
        authorize(&inner.categories[position].user, owner)?;

        let mut categories = inner.categories.clone();
        categories.remove(position);
        self.persist_categories(&categories)?;
        inner.categories = categories;
        Ok(())
    }

    /// Resolve a category reference for display. Returns None for a dangling
    /// reference or one that belongs to another owner.
    pub fn resolve_category(&self, owner: &str, id: &str) -> Option<Category> {
        let inner = read_guard(&self.inner);
        inner
            .categories
            .iter()
            .find(|category| category.id == id && category.user == owner)
            .cloned()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn persist_todos(&self, todos: &[Todo]) -> Result<()> {
        write_collection(&self.todos_path(), todos)
    }

    fn persist_categories(&self, categories: &[Category]) -> Result<()> {
        write_collection(&self.categories_path(), categories)
    }
}

/// Ownership guard: NotFound is decided by the caller; this only separates
/// "yours" from "someone else's".
fn authorize(record_user: &str, owner: &str) -> Result<()> {
    if record_user == owner {
        Ok(())
    } else {
        Err(Error::Forbidden)
    }
}

fn read_guard<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_guard<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn read_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    let records: Vec<T> = serde_json::from_str(&content)?;
    Ok(records)
}

/// Write a collection atomically (temp file + rename) under a file lock, so
/// readers and a second process never observe a partial document.
fn write_collection<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let lock_path = path.with_extension("json.lock");
    let _lock = FileLock::acquire(&lock_path, DEFAULT_LOCK_TIMEOUT_MS)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(records)?;
    let temp_path = path.with_extension("json.tmp");
    let mut file = File::create(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;
    Ok(())
}
