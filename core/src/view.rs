//! View-level state for the "Add Todo" screen.
//!
//! # Design
//! Plain data owned by whatever presentation layer renders the screen.
//! Nothing here draws anything; it only holds the form fields, the inline
//! error, and the light/dark theme, and wires form submission to
//! `TodoStore::add`.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::TodoStore;
use crate::types::Todo;

/// Colour scheme of the screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(&mut self) {
        *self = self.opposite();
    }

    pub fn opposite(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Value applied as the document's `data-theme` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Text on the toggle button; names the theme a click switches to.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "🌙 Dark",
            Theme::Dark => "☀️ Light",
        }
    }

    pub fn toggle_aria_label(self) -> String {
        format!("Switch to {} mode", self.opposite().as_str())
    }
}

/// Fields of the "Add Todo" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddTodoForm {
    pub title: String,
    pub detail: String,
    pub error: Option<String>,
}

impl AddTodoForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_detail(&mut self, detail: impl Into<String>) {
        self.detail = detail.into();
    }

    /// Submit the form to `store`.
    ///
    /// On success the form is cleared. On failure the fields are kept and
    /// the error message is shown inline.
    pub fn submit(&mut self, store: &mut TodoStore) -> Result<Todo, StoreError> {
        match store.add(self.title.as_str(), self.detail.as_str()) {
            Ok(todo) => {
                self.clear();
                Ok(todo)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.detail.clear();
        self.error = None;
    }
}
