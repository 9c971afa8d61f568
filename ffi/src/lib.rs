//! C-ABI wrapper around `todo-core`.
//!
//! # Overview
//! Exposes the todo store through `extern "C"` functions so a presentation
//! layer written in any language with a C FFI can embed the store directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - One function per store operation, mirroring `TodoStore` 1:1.
//! - A single `FfiTodoResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - Ids cross the boundary as UUID strings; a string that is not a UUID
//!   cannot name a live todo and is reported as `NotFound`.
//! - The C caller owns all returned pointers and must call the matching
//!   `todo_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use todo_core::{TodoStore, UpdateTodo};
use uuid::Uuid;

use types::*;

// ---------------------------------------------------------------------------
// Argument helpers
// ---------------------------------------------------------------------------

/// Borrow a required C string argument.
fn required_str<'a>(ptr: *const c_char, name: &str) -> Result<&'a str, *mut FfiTodoResult> {
    if ptr.is_null() {
        return Err(FfiTodoResult::null_arg(name));
    }
    optional_str(ptr, name).map(|s| s.unwrap_or_default())
}

/// Borrow an optional C string argument; null means "not provided".
fn optional_str<'a>(
    ptr: *const c_char,
    name: &str,
) -> Result<Option<&'a str>, *mut FfiTodoResult> {
    if ptr.is_null() {
        return Ok(None);
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map(Some)
        .map_err(|_| {
            FfiTodoResult::error(
                FfiErrorCode::InvalidArg,
                &format!("{name} is not valid UTF-8"),
            )
        })
}

fn parse_id(ptr: *const c_char) -> Result<Uuid, *mut FfiTodoResult> {
    let id = required_str(ptr, "id")?;
    Uuid::parse_str(id)
        .map_err(|_| FfiTodoResult::error(FfiErrorCode::NotFound, &format!("todo {id} not found")))
}

fn store_ref<'a>(store: *const FfiTodoStore) -> Result<&'a FfiTodoStore, *mut FfiTodoResult> {
    if store.is_null() {
        return Err(FfiTodoResult::null_arg("store"));
    }
    Ok(unsafe { &*store })
}

/// Run `body` behind `catch_unwind`, turning an early-return `Err` or a
/// panic into the matching result envelope.
fn guarded(
    op: &str,
    body: impl FnOnce() -> Result<*mut FfiTodoResult, *mut FfiTodoResult>,
) -> *mut FfiTodoResult {
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(result)) | Ok(Err(result)) => result,
        Err(_) => FfiTodoResult::panic(&format!("panic in {op}")),
    }
}

// ---------------------------------------------------------------------------
// Store lifecycle
// ---------------------------------------------------------------------------

/// Create an empty, memory-only store.
///
/// Returns null only if an internal panic occurs.
/// The caller must free the returned pointer with `todo_store_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_new() -> *mut FfiTodoStore {
    catch_unwind(|| Box::into_raw(Box::new(FfiTodoStore::new(TodoStore::new()))))
        .unwrap_or(std::ptr::null_mut())
}

/// Open a store backed by the snapshot file at `path`.
///
/// On success writes the new handle to `*out_store` and returns an `Ok`
/// result with no data. On failure `*out_store` is left untouched.
/// The caller frees the result with `todo_free_result` and the store with
/// `todo_store_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_open(
    path: *const c_char,
    out_store: *mut *mut FfiTodoStore,
) -> *mut FfiTodoResult {
    guarded("todo_store_open", || {
        let path = required_str(path, "path")?;
        if out_store.is_null() {
            return Err(FfiTodoResult::null_arg("out_store"));
        }
        let store = TodoStore::open(path).map_err(FfiTodoResult::from_error)?;
        unsafe { *out_store = Box::into_raw(Box::new(FfiTodoStore::new(store))) };
        Ok(FfiTodoResult::ok_empty())
    })
}

/// Free a store created by `todo_store_new` or `todo_store_open`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_free(store: *mut FfiTodoStore) {
    if !store.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(store) });
        });
    }
}

// ---------------------------------------------------------------------------
// Store operations
// ---------------------------------------------------------------------------

/// Add a todo. `detail` may be null, meaning empty.
///
/// Returns a result with `data_tag = Todo` on success, `Validation` when
/// the title is blank or either field is too long.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_add(
    store: *const FfiTodoStore,
    title: *const c_char,
    detail: *const c_char,
) -> *mut FfiTodoResult {
    guarded("todo_store_add", || {
        let store = store_ref(store)?;
        let title = required_str(title, "title")?;
        let detail = optional_str(detail, "detail")?.unwrap_or_default();
        let todo = store
            .lock()
            .add(title, detail)
            .map_err(FfiTodoResult::from_error)?;
        Ok(FfiTodoResult::ok_todo(todo))
    })
}

/// List all todos in insertion order.
///
/// Returns a result with `data_tag = TodoList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_list(store: *const FfiTodoStore) -> *mut FfiTodoResult {
    guarded("todo_store_list", || {
        let store = store_ref(store)?;
        Ok(FfiTodoResult::ok_todo_list(store.lock().list()))
    })
}

/// Fetch a single todo by id.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_get(
    store: *const FfiTodoStore,
    id: *const c_char,
) -> *mut FfiTodoResult {
    guarded("todo_store_get", || {
        let store = store_ref(store)?;
        let id = parse_id(id)?;
        let todo = store.lock().get(id).map_err(FfiTodoResult::from_error)?;
        Ok(FfiTodoResult::ok_todo(todo))
    })
}

/// Flip the completion flag of a todo.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_toggle_complete(
    store: *const FfiTodoStore,
    id: *const c_char,
) -> *mut FfiTodoResult {
    guarded("todo_store_toggle_complete", || {
        let store = store_ref(store)?;
        let id = parse_id(id)?;
        let todo = store
            .lock()
            .toggle_complete(id)
            .map_err(FfiTodoResult::from_error)?;
        Ok(FfiTodoResult::ok_todo(todo))
    })
}

/// Update a todo. `title` and `detail` may each be null (leave unchanged).
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_update(
    store: *const FfiTodoStore,
    id: *const c_char,
    title: *const c_char,
    detail: *const c_char,
) -> *mut FfiTodoResult {
    guarded("todo_store_update", || {
        let store = store_ref(store)?;
        let id = parse_id(id)?;
        let changes = UpdateTodo {
            title: optional_str(title, "title")?.map(str::to_string),
            detail: optional_str(detail, "detail")?.map(str::to_string),
        };
        let todo = store
            .lock()
            .update(id, changes)
            .map_err(FfiTodoResult::from_error)?;
        Ok(FfiTodoResult::ok_todo(todo))
    })
}

/// Delete a todo permanently.
///
/// Returns a result with `data_tag = None` on success.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_remove(
    store: *const FfiTodoStore,
    id: *const c_char,
) -> *mut FfiTodoResult {
    guarded("todo_store_remove", || {
        let store = store_ref(store)?;
        let id = parse_id(id)?;
        store.lock().remove(id).map_err(FfiTodoResult::from_error)?;
        Ok(FfiTodoResult::ok_empty())
    })
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiTodoResult` returned by any `todo_store_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_result(result: *mut FfiTodoResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.data.is_null() {
            match result.data_tag {
                FfiDataTag::Todo => {
                    let todo = unsafe { Box::from_raw(result.data as *mut FfiTodo) };
                    free_ffi_todo_fields(&todo);
                }
                FfiDataTag::TodoList => {
                    let list = unsafe { Box::from_raw(result.data as *mut FfiTodoList) };
                    if !list.items.is_null() && list.len > 0 {
                        let items: Box<[FfiTodo]> = unsafe {
                            Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                                list.items,
                                list.len as usize,
                            ))
                        };
                        for item in items.iter() {
                            free_ffi_todo_fields(item);
                        }
                    }
                }
                FfiDataTag::None => {}
            }
        }
    });
}

/// Free the C-string fields of an `FfiTodo` (but not the struct itself).
fn free_ffi_todo_fields(todo: &FfiTodo) {
    for field in [todo.id, todo.title, todo.detail] {
        if !field.is_null() {
            drop(unsafe { CString::from_raw(field) });
        }
    }
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
