//! Domain types for the todo store.
//!
//! # Design
//! `Todo` keeps its fields private so the only way to obtain one is through
//! `TodoStore` (or by deserializing a record, which the store re-validates
//! on load). Request payloads (`CreateTodo`, `UpdateTodo`) are plain public
//! structs shared by the HTTP and FFI adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Maximum title length, in characters.
pub const MAX_TITLE_CHARS: usize = 50;

/// Maximum detail length, in characters.
pub const MAX_DETAIL_CHARS: usize = 120;

/// Stable identifier of a todo. Never reused.
pub type TodoId = Uuid;

/// A single todo item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    id: TodoId,
    title: String,
    #[serde(default)]
    detail: String,
    #[serde(default)]
    completed: bool,
    created_at: DateTime<Utc>,
}

impl Todo {
    pub(crate) fn new(title: String, detail: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            detail,
            completed: false,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> TodoId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub(crate) fn set_detail(&mut self, detail: String) {
        self.detail = detail;
    }

    pub(crate) fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    /// Check the title/detail invariants of a record that did not come from
    /// `TodoStore::add` (e.g. one read back from a snapshot).
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_detail(&self.detail)
    }
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub detail: String,
}

/// Request payload for updating an existing todo. Only the fields that are
/// `Some` are applied; the rest stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl UpdateTodo {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.detail.is_none()
    }
}

/// A title must contain a non-whitespace character and fit in
/// `MAX_TITLE_CHARS`.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let len = title.chars().count();
    if len > MAX_TITLE_CHARS {
        return Err(ValidationError::TitleTooLong {
            len,
            max: MAX_TITLE_CHARS,
        });
    }
    Ok(())
}

/// A detail may be empty but must fit in `MAX_DETAIL_CHARS`.
pub fn validate_detail(detail: &str) -> Result<(), ValidationError> {
    let len = detail.chars().count();
    if len > MAX_DETAIL_CHARS {
        return Err(ValidationError::DetailTooLong {
            len,
            max: MAX_DETAIL_CHARS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_rules() {
        assert!(validate_title("Buy milk").is_ok());
        assert!(validate_title(&"a".repeat(MAX_TITLE_CHARS)).is_ok());
        assert_eq!(validate_title(""), Err(ValidationError::EmptyTitle));
        assert_eq!(validate_title(" \t\n"), Err(ValidationError::EmptyTitle));
        assert_eq!(
            validate_title(&"a".repeat(51)),
            Err(ValidationError::TitleTooLong { len: 51, max: 50 })
        );
    }

    #[test]
    fn detail_rules() {
        assert!(validate_detail("").is_ok());
        assert!(validate_detail(&"b".repeat(MAX_DETAIL_CHARS)).is_ok());
        assert_eq!(
            validate_detail(&"b".repeat(121)),
            Err(ValidationError::DetailTooLong { len: 121, max: 120 })
        );
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        // 50 two-byte characters is 100 bytes but still a valid title.
        let title = "é".repeat(50);
        assert_eq!(title.len(), 100);
        assert!(validate_title(&title).is_ok());
    }

    #[test]
    fn new_todo_starts_incomplete() {
        let todo = Todo::new("Test".to_string(), String::new());
        assert!(!todo.completed());
        assert_eq!(todo.title(), "Test");
        assert_eq!(todo.detail(), "");
    }

    #[test]
    fn todo_serializes_to_json() {
        let todo = Todo::new("Test".to_string(), "detail".to_string());
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], todo.id().to_string());
        assert_eq!(json["title"], "Test");
        assert_eq!(json["detail"], "detail");
        assert_eq!(json["completed"], false);
        assert!(json["created_at"].is_string());
    }

    #[test]
    fn create_todo_defaults_detail_to_empty() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":"No detail"}"#).unwrap();
        assert_eq!(input.title, "No detail");
        assert_eq!(input.detail, "");
    }

    #[test]
    fn create_todo_rejects_missing_title() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"detail":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_todo_all_fields_optional() {
        let input: UpdateTodo = serde_json::from_str("{}").unwrap();
        assert!(input.is_empty());

        let input: UpdateTodo = serde_json::from_str(r#"{"detail":""}"#).unwrap();
        assert!(input.title.is_none());
        assert_eq!(input.detail.as_deref(), Some(""));
    }
}
