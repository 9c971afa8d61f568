//! `todo_store_open` against a real snapshot file.

use std::ffi::{CStr, CString};
use std::ptr;

use todo_ffi::types::{FfiDataTag, FfiErrorCode, FfiTodo, FfiTodoList, FfiTodoStore};
use todo_ffi::*;

fn open(path: &CString) -> *mut FfiTodoStore {
    let mut store: *mut FfiTodoStore = ptr::null_mut();
    let result = todo_store_open(path.as_ptr(), &mut store);
    assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::Ok);
    todo_free_result(result);
    assert!(!store.is_null());
    store
}

#[test]
fn reopened_store_keeps_todos() {
    let dir = tempfile::tempdir().unwrap();
    let path = CString::new(dir.path().join("todos.json").to_str().unwrap()).unwrap();

    let store = open(&path);
    let title = CString::new("Persisted").unwrap();
    let result = todo_store_add(store, title.as_ptr(), ptr::null());
    let id = {
        let r = unsafe { &*result };
        assert_eq!(r.data_tag, FfiDataTag::Todo);
        let todo = unsafe { &*(r.data as *const FfiTodo) };
        unsafe { CStr::from_ptr(todo.id) }.to_owned()
    };
    todo_free_result(result);

    let result = todo_store_toggle_complete(store, id.as_ptr());
    todo_free_result(result);
    todo_store_free(store);

    let store = open(&path);
    let result = todo_store_list(store);
    let r = unsafe { &*result };
    let list = unsafe { &*(r.data as *const FfiTodoList) };
    assert_eq!(list.len, 1);
    let items = unsafe { std::slice::from_raw_parts(list.items, 1) };
    assert_eq!(unsafe { CStr::from_ptr(items[0].id) }, id.as_c_str());
    assert!(items[0].completed);

    todo_free_result(result);
    todo_store_free(store);
}

#[test]
fn corrupt_snapshot_is_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("todos.json");
    std::fs::write(&file, "{ not json").unwrap();
    let path = CString::new(file.to_str().unwrap()).unwrap();

    let mut store: *mut FfiTodoStore = ptr::null_mut();
    let result = todo_store_open(path.as_ptr(), &mut store);
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Persistence);
    assert!(!r.error_message.is_null());
    assert!(store.is_null());

    todo_free_result(result);
}

#[test]
fn failed_snapshot_write_is_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("sub");
    let path = CString::new(blocker.join("todos.json").to_str().unwrap()).unwrap();
    let store = open(&path);

    // A regular file where the snapshot directory should be makes every
    // write fail.
    std::fs::write(&blocker, "not a directory").unwrap();

    let title = CString::new("Never stored").unwrap();
    let result = todo_store_add(store, title.as_ptr(), ptr::null());
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Persistence);
    assert!(!r.error_message.is_null());
    assert!(r.data.is_null());
    todo_free_result(result);

    let result = todo_store_list(store);
    let list = unsafe { &*((*result).data as *const FfiTodoList) };
    assert_eq!(list.len, 0);
    todo_free_result(result);

    todo_store_free(store);
}
