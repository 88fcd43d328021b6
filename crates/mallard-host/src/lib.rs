//! Host integration shim: opens a database path and hands the host a
//! numeric handle.
//!
//! This crate is the recovery boundary for the wrapper layer: every error
//! raised by `mallard` is caught here, logged through `tracing`, and
//! converted into the [`INVALID_HANDLE`] sentinel (NaN) the host
//! understands. No retry, nothing is process-fatal.
//!
//! Two C-ABI callables are exported for hosts that register plugin
//! functions dynamically: `mallard_open` and `mallard_close`. Rust
//! callers can use [`open_database`] / [`close_database`] directly.

#![allow(unsafe_code)]

mod registry;

pub use registry::HandleTable;

use mallard::Database;
use std::ffi::{CStr, c_char};
use std::sync::LazyLock;

/// The failure sentinel returned across the host boundary.
pub const INVALID_HANDLE: f64 = f64::NAN;

static TABLE: LazyLock<HandleTable> = LazyLock::new(HandleTable::new);

/// The process-global handle table behind the exported entry points.
pub fn handle_table() -> &'static HandleTable {
    &TABLE
}

/// Open the database at `path` (empty selects an in-memory instance) and
/// return its handle, or [`INVALID_HANDLE`] with the diagnostic logged.
pub fn open_database(path: &str) -> f64 {
    match open_impl(path) {
        Ok(handle) => {
            tracing::debug!(path, handle, "database registered");
            handle
        }
        Err(e) => {
            tracing::error!(path, error = %e, "database open failed");
            INVALID_HANDLE
        }
    }
}

fn open_impl(path: &str) -> mallard::Result<f64> {
    let db = if path.is_empty() {
        Database::open_in_memory()?
    } else {
        Database::open(path)?
    };
    Ok(TABLE.insert(db))
}

/// Release the database behind `handle`. Returns `false` for the sentinel
/// or an unknown handle.
pub fn close_database(handle: f64) -> bool {
    TABLE.remove(handle)
}

/// C-ABI entry point registered with the host: open a database and return
/// a handle, or NaN on failure. A null path opens an in-memory instance.
///
/// # Safety
/// - `path` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn mallard_open(path: *const c_char) -> f64 {
    if path.is_null() {
        return open_database("");
    }
    // SAFETY: caller guarantees a valid NUL-terminated string
    let path = unsafe { CStr::from_ptr(path) }.to_string_lossy();
    open_database(&path)
}

/// C-ABI entry point: release the database behind `handle`.
#[unsafe(no_mangle)]
pub extern "C" fn mallard_close(handle: f64) -> bool {
    close_database(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory_returns_handle() {
        let handle = open_database("");
        assert!(handle.is_finite());
        assert!(handle >= 1.0);
        assert!(handle_table().contains(handle));
        assert!(close_database(handle));
    }

    #[test]
    fn test_open_failure_returns_sentinel() {
        // A directory path cannot be opened as a database file.
        let dir = tempfile::tempdir().unwrap();
        let handle = open_database(&dir.path().to_string_lossy());
        assert!(handle.is_nan());
    }

    #[test]
    fn test_open_file_and_reuse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host.db");
        let path = path.to_string_lossy();

        let handle = open_database(&path);
        assert!(handle.is_finite());
        assert!(close_database(handle));

        // Closing released the file; it can be opened again.
        let handle = open_database(&path);
        assert!(handle.is_finite());
        assert!(close_database(handle));
    }

    #[test]
    fn test_close_rejects_sentinel_and_unknown() {
        assert!(!close_database(INVALID_HANDLE));
        assert!(!close_database(0.0));
        assert!(!close_database(1e18));
    }

    #[test]
    fn test_c_entry_points() {
        // Null path opens an in-memory database.
        let handle = unsafe { mallard_open(std::ptr::null()) };
        assert!(handle.is_finite());
        assert!(mallard_close(handle));
        assert!(!mallard_close(handle));

        let path = std::ffi::CString::new("").unwrap();
        let handle = unsafe { mallard_open(path.as_ptr()) };
        assert!(handle.is_finite());
        assert!(mallard_close(handle));
    }
}
