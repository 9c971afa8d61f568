//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;
use std::sync::{Mutex, MutexGuard, PoisonError};

use todo_core::{StoreError, TodoStore};

/// Opaque handle to a `TodoStore`. C callers receive a pointer to this
/// and pass it back into every FFI function. Calls from several threads
/// are serialized by the inner mutex.
pub struct FfiTodoStore {
    pub(crate) inner: Mutex<TodoStore>,
}

impl FfiTodoStore {
    pub(crate) fn new(store: TodoStore) -> Self {
        Self {
            inner: Mutex::new(store),
        }
    }

    /// Every store operation leaves the store consistent, so a lock
    /// poisoned by a caught panic is still safe to use.
    pub(crate) fn lock(&self) -> MutexGuard<'_, TodoStore> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiTodoResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NotFound = 1,
    Validation = 2,
    Persistence = 3,
    Panic = 4,
    NullArg = 5,
    InvalidArg = 6,
    /// A list too long to describe with a `u32` length.
    Overflow = 7,
}

/// Tag that tells `todo_free_result` what `FfiTodoResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    Todo = 1,
    TodoList = 2,
}

/// A single todo item exposed to C.
#[repr(C)]
pub struct FfiTodo {
    pub id: *mut c_char,
    pub title: *mut c_char,
    pub detail: *mut c_char,
    pub completed: bool,
    /// Unix epoch milliseconds.
    pub created_at_ms: i64,
}

impl FfiTodo {
    fn from_core(todo: todo_core::Todo) -> Self {
        FfiTodo {
            id: c_string(todo.id().to_string()),
            title: c_string(todo.title().to_string()),
            detail: c_string(todo.detail().to_string()),
            completed: todo.completed(),
            created_at_ms: todo.created_at().timestamp_millis(),
        }
    }
}

/// A list of todo items exposed to C.
#[repr(C)]
pub struct FfiTodoList {
    pub items: *mut FfiTodo,
    pub len: u32,
}

/// Result envelope for all store operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the payload (tagged by `data_tag`).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `data` is null.
#[repr(C)]
pub struct FfiTodoResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub data_tag: FfiDataTag,
    pub data: *mut std::ffi::c_void,
}

impl FfiTodoResult {
    fn boxed(
        error_code: FfiErrorCode,
        error_message: *mut c_char,
        data_tag: FfiDataTag,
        data: *mut std::ffi::c_void,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiTodoResult {
            error_code,
            error_message,
            data_tag,
            data,
        }))
    }

    /// Build a success result carrying a single `FfiTodo`.
    pub(crate) fn ok_todo(todo: todo_core::Todo) -> *mut Self {
        let ffi_todo = Box::new(FfiTodo::from_core(todo));
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            FfiDataTag::Todo,
            Box::into_raw(ffi_todo) as *mut std::ffi::c_void,
        )
    }

    /// Build a success result carrying a `FfiTodoList`.
    pub(crate) fn ok_todo_list(todos: Vec<todo_core::Todo>) -> *mut Self {
        let len = match list_len(todos.len()) {
            Ok(len) => len,
            Err(result) => return result,
        };
        let ffi_todos: Box<[FfiTodo]> = todos.into_iter().map(FfiTodo::from_core).collect();

        // Freed in `todo_free_result` as a boxed slice of exactly `len`.
        let items = if ffi_todos.is_empty() {
            std::ptr::null_mut()
        } else {
            Box::into_raw(ffi_todos) as *mut FfiTodo
        };

        let ffi_list = Box::new(FfiTodoList { items, len });
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            FfiDataTag::TodoList,
            Box::into_raw(ffi_list) as *mut std::ffi::c_void,
        )
    }

    /// Build a success result with no data payload (e.g. remove).
    pub(crate) fn ok_empty() -> *mut Self {
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result from a `StoreError`.
    pub(crate) fn from_error(err: StoreError) -> *mut Self {
        let code = match &err {
            StoreError::Validation(_) => FfiErrorCode::Validation,
            StoreError::NotFound(_) => FfiErrorCode::NotFound,
            StoreError::Persistence(_) => FfiErrorCode::Persistence,
        };
        Self::error(code, &err.to_string())
    }

    pub(crate) fn error(code: FfiErrorCode, msg: &str) -> *mut Self {
        Self::boxed(
            code,
            c_string(msg.to_string()),
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, &format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, msg)
    }
}

/// Length of a list as it crosses the boundary. `todo_free_result` rebuilds
/// the items from this value, so it must never be truncated.
pub(crate) fn list_len(len: usize) -> Result<u32, *mut FfiTodoResult> {
    u32::try_from(len).map_err(|_| {
        FfiTodoResult::error(
            FfiErrorCode::Overflow,
            &format!("{len} todos do not fit in a u32 length"),
        )
    })
}

/// Move `s` into a heap C string. Interior NULs cannot cross the boundary
/// and are dropped.
pub(crate) fn c_string(s: String) -> *mut c_char {
    CString::new(s)
        .unwrap_or_else(|e| {
            let mut bytes = e.into_vec();
            bytes.retain(|&b| b != 0);
            CString::new(bytes).unwrap_or_default()
        })
        .into_raw()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn list_len_fits_u32() {
        assert_eq!(list_len(3).ok(), Some(3));
        assert_eq!(list_len(u32::MAX as usize).ok(), Some(u32::MAX));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn list_len_rejects_overflow() {
        let result = list_len(u32::MAX as usize + 1).unwrap_err();
        let r = unsafe { Box::from_raw(result) };
        assert_eq!(r.error_code, FfiErrorCode::Overflow);
        assert!(r.data.is_null());
        drop(unsafe { CString::from_raw(r.error_message) });
    }

    #[test]
    fn c_string_drops_interior_nul() {
        let ptr = c_string("a\0b".to_string());
        let s = unsafe { CString::from_raw(ptr) };
        assert_eq!(s.as_c_str(), CStr::from_bytes_with_nul(b"ab\0").unwrap());
    }
}
