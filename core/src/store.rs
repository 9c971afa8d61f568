//! The authoritative, ordered collection of todos.
//!
//! # Design
//! `TodoStore` is a plain owned value: mutations take `&mut self`, so one
//! operation can never interleave with another. Callers that share a store
//! across threads wrap it in a mutex (see the server and FFI crates).
//!
//! Todos live in a `Vec` to keep insertion order; lookups are linear, which
//! is fine for a single user's list. A file-backed store stages each
//! mutation on a copy, writes the snapshot, and only then commits, so a
//! failed write leaves memory and disk in agreement.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::snapshot::Snapshot;
use crate::types::{validate_detail, validate_title, Todo, TodoId, UpdateTodo};

#[derive(Debug, Default)]
pub struct TodoStore {
    todos: Vec<Todo>,
    snapshot: Option<Snapshot>,
}

impl TodoStore {
    /// An empty, memory-only store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store backed by the snapshot at `path`, loading whatever it
    /// already holds. Every later mutation is flushed to the same file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let snapshot = Snapshot::new(path);
        let todos = snapshot.load()?;
        debug!(path = %snapshot.path().display(), count = todos.len(), "store opened");
        Ok(Self {
            todos,
            snapshot: Some(snapshot),
        })
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Create a todo and append it to the list.
    pub fn add(
        &mut self,
        title: impl Into<String>,
        detail: impl Into<String>,
    ) -> Result<Todo, StoreError> {
        let title = title.into();
        let detail = detail.into();
        validate_title(&title)?;
        validate_detail(&detail)?;

        let todo = Todo::new(title, detail);
        let created = todo.clone();
        self.apply(move |todos| {
            todos.push(todo);
            Ok(())
        })?;
        debug!(id = %created.id(), "todo added");
        Ok(created)
    }

    /// All todos in insertion order. The returned vector is a copy.
    pub fn list(&self) -> Vec<Todo> {
        self.todos.clone()
    }

    pub fn get(&self, id: TodoId) -> Result<Todo, StoreError> {
        self.todos
            .iter()
            .find(|t| t.id() == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    pub fn toggle_complete(&mut self, id: TodoId) -> Result<Todo, StoreError> {
        let todo = self.apply(|todos| {
            let todo = find_mut(todos, id)?;
            todo.toggle();
            Ok(todo.clone())
        })?;
        debug!(%id, completed = todo.completed(), "todo toggled");
        Ok(todo)
    }

    /// Apply the provided fields of `changes`. An unknown id is reported
    /// before any validation failure; an empty change set writes nothing.
    pub fn update(&mut self, id: TodoId, changes: UpdateTodo) -> Result<Todo, StoreError> {
        let index = self.position(id)?;
        if changes.is_empty() {
            return Ok(self.todos[index].clone());
        }
        if let Some(title) = &changes.title {
            validate_title(title)?;
        }
        if let Some(detail) = &changes.detail {
            validate_detail(detail)?;
        }

        let todo = self.apply(move |todos| {
            let todo = &mut todos[index];
            if let Some(title) = changes.title {
                todo.set_title(title);
            }
            if let Some(detail) = changes.detail {
                todo.set_detail(detail);
            }
            Ok(todo.clone())
        })?;
        debug!(%id, "todo updated");
        Ok(todo)
    }

    pub fn remove(&mut self, id: TodoId) -> Result<(), StoreError> {
        let index = self.position(id)?;
        self.apply(move |todos| {
            todos.remove(index);
            Ok(())
        })?;
        debug!(%id, "todo removed");
        Ok(())
    }

    fn position(&self, id: TodoId) -> Result<usize, StoreError> {
        self.todos
            .iter()
            .position(|t| t.id() == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Run a mutation. Memory-only stores mutate in place; file-backed
    /// stores commit only after the snapshot write succeeds.
    fn apply<T>(
        &mut self,
        mutate: impl FnOnce(&mut Vec<Todo>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let Some(snapshot) = &self.snapshot else {
            return mutate(&mut self.todos);
        };

        let mut staged = self.todos.clone();
        let out = mutate(&mut staged)?;
        if let Err(e) = snapshot.save(&staged) {
            warn!(
                path = %snapshot.path().display(),
                error = %e,
                "snapshot flush failed, change discarded"
            );
            return Err(e.into());
        }
        self.todos = staged;
        Ok(out)
    }
}

fn find_mut(todos: &mut [Todo], id: TodoId) -> Result<&mut Todo, StoreError> {
    todos
        .iter_mut()
        .find(|t| t.id() == id)
        .ok_or(StoreError::NotFound(id))
}
