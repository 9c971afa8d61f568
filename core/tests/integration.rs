//! End-to-end store behaviour, in memory and against a snapshot file.
//!
//! # Design
//! Walks the same add/list/toggle/remove lifecycle a presentation layer
//! would drive, then checks that a file-backed store survives a reopen and
//! refuses to diverge from disk when a flush fails.

use std::fs;

use todo_core::{AddTodoForm, StoreError, TodoStore, UpdateTodo};

#[test]
fn buy_milk_lifecycle() {
    let mut store = TodoStore::new();

    // Step 1: add.
    let todo = store.add("Buy milk", "2%").unwrap();
    assert_eq!(todo.title(), "Buy milk");
    assert_eq!(todo.detail(), "2%");
    assert!(!todo.completed());
    let id = todo.id();

    // Step 2: list shows exactly that todo.
    assert_eq!(store.list(), vec![todo]);

    // Step 3: toggle to completed.
    assert!(store.toggle_complete(id).unwrap().completed());

    // Step 4: remove, list is empty again.
    store.remove(id).unwrap();
    assert!(store.list().is_empty());

    // Step 5: the id is gone for good.
    assert!(matches!(store.toggle_complete(id), Err(StoreError::NotFound(gone)) if gone == id));
}

#[test]
fn failed_operations_leave_list_unchanged() {
    let mut store = TodoStore::new();
    store.add("first", "").unwrap();
    let id = store.add("second", "").unwrap().id();
    let before = store.list();

    assert!(store.add("", "x").is_err());
    assert!(store.add("a".repeat(51), "").is_err());
    assert!(store
        .update(
            id,
            UpdateTodo {
                title: Some("   ".to_string()),
                detail: None,
            },
        )
        .is_err());
    assert!(store.remove(uuid::Uuid::new_v4()).is_err());

    assert_eq!(store.list(), before);
}

#[test]
fn file_backed_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todos.json");

    let (kept, toggled) = {
        let mut store = TodoStore::open(&path).unwrap();
        assert!(store.is_empty());
        let kept = store.add("keep", "detail").unwrap();
        let toggled = store.add("toggle", "").unwrap();
        let dropped = store.add("drop", "").unwrap();
        store.toggle_complete(toggled.id()).unwrap();
        store.remove(dropped.id()).unwrap();
        (kept, toggled)
    };

    let store = TodoStore::open(&path).unwrap();
    let listed = store.list();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0], kept);
    assert_eq!(listed[1].id(), toggled.id());
    assert!(listed[1].completed());
    assert_eq!(listed[1].created_at(), toggled.created_at());
}

#[test]
fn failed_flush_discards_the_change() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("sub");
    let mut store = TodoStore::open(blocker.join("todos.json")).unwrap();

    // A regular file where the snapshot directory should be makes every
    // write fail.
    fs::write(&blocker, "not a directory").unwrap();

    let err = store.add("never stored", "").unwrap_err();
    assert!(matches!(err, StoreError::Persistence(_)));
    assert!(store.is_empty());
}

#[test]
fn form_submits_into_file_backed_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todos.json");
    let mut store = TodoStore::open(&path).unwrap();
    let mut form = AddTodoForm::new();

    form.set_title("Water plants");
    form.submit(&mut store).unwrap();
    assert!(form.title.is_empty());

    let reopened = TodoStore::open(&path).unwrap();
    assert_eq!(reopened.list()[0].title(), "Water plants");
}
