//! Todo store core.
//!
//! # Overview
//! Owns the authoritative, ordered list of todos and enforces its
//! invariants: non-blank titles, length limits, unique ids. The store is
//! memory-only by default and can be bound to a JSON snapshot file that is
//! rewritten after every mutation.
//!
//! # Design
//! - `TodoStore` is a single-owner value; adapters that share it across
//!   threads serialize access with a mutex.
//! - `Todo` has no public constructor; todos come from `TodoStore::add`.
//! - Errors are returned as `StoreError` values; nothing panics on bad input.
//! - `view` holds the form and theme state of the "Add Todo" screen so a
//!   presentation layer only has to render it.

pub mod error;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod view;

pub use error::{SnapshotError, StoreError, ValidationError};
pub use snapshot::Snapshot;
pub use store::TodoStore;
pub use types::{CreateTodo, Todo, TodoId, UpdateTodo, MAX_DETAIL_CHARS, MAX_TITLE_CHARS};
pub use view::{AddTodoForm, Theme};
