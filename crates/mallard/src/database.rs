//! The owning handle for a DuckDB database instance.

use crate::connection::Connection;
use crate::error::{Error, OpenError, Result};
use crate::ffi;
use std::ffi::{CStr, CString, c_char};
use std::path::Path;
use std::ptr;

/// An open DuckDB database.
///
/// Owns exactly one native database handle and releases it exactly once on
/// drop. Not cloneable: ownership is never shared between wrapper
/// instances. Connections borrow the database, so the borrow checker
/// guarantees no connection outlives it.
#[derive(Debug)]
pub struct Database {
    raw: ffi::duckdb_database,
}

// SAFETY: DuckDB documents the database handle as safe to use from
// multiple threads; all statement execution goes through per-thread
// connections. The wrapper adds no state of its own beyond the raw handle.
unsafe impl Send for Database {}
unsafe impl Sync for Database {}

impl Database {
    /// Open (creating if necessary) the database file at `path`.
    ///
    /// An empty path selects an in-memory instance, matching the engine's
    /// treatment of a null path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Self::open_internal(None);
        }
        Self::open_internal(Some(path))
    }

    /// Open an ephemeral in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::open_internal(None)
    }

    fn open_internal(path: Option<&Path>) -> Result<Self> {
        let display_path = path.map(|p| p.to_string_lossy().into_owned());
        let c_path = match &display_path {
            Some(p) => Some(CString::new(p.as_str())?),
            None => None,
        };
        let c_path_ptr = c_path.as_ref().map_or(ptr::null(), |p| p.as_ptr());

        let mut raw: ffi::duckdb_database = ptr::null_mut();
        let mut err: *mut c_char = ptr::null_mut();

        // SAFETY: all pointers are valid; config is null (engine defaults)
        let state =
            unsafe { ffi::duckdb_open_ext(c_path_ptr, &mut raw, ptr::null_mut(), &mut err) };

        if state != ffi::DuckDBSuccess {
            let message = if err.is_null() {
                "unknown open failure".to_string()
            } else {
                // SAFETY: the engine allocated err; copy then release it
                // exactly once
                unsafe {
                    let msg = CStr::from_ptr(err).to_string_lossy().into_owned();
                    ffi::duckdb_free(err.cast());
                    msg
                }
            };
            // Nothing was allocated for us on failure; raw stays null and
            // there is no handle to release.
            return Err(Error::Open(OpenError {
                path: display_path,
                message,
            }));
        }

        tracing::debug!(
            path = display_path.as_deref().unwrap_or(":memory:"),
            "opened database"
        );

        Ok(Self { raw })
    }

    /// Attach a new connection to this database.
    pub fn connect(&self) -> Result<Connection<'_>> {
        Connection::new(self)
    }

    pub(crate) fn as_raw(&self) -> ffi::duckdb_database {
        self.raw
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        // duckdb_close tolerates a null handle and nulls it after release,
        // so this runs exactly once even on every exit path.
        // SAFETY: raw is this wrapper's exclusively owned handle
        unsafe { ffi::duckdb_close(&mut self.raw) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        drop(db);
    }

    #[test]
    fn test_empty_path_is_in_memory() {
        let db = Database::open("").unwrap();
        let conn = db.connect().unwrap();
        let res = conn.query("SELECT 1").unwrap();
        assert_eq!(res.row_count(), 1);
    }

    #[test]
    fn test_open_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        {
            let db = Database::open(&path).unwrap();
            let conn = db.connect().unwrap();
            conn.query("CREATE TABLE t (a INTEGER)").unwrap();
            conn.query("INSERT INTO t VALUES (7)").unwrap();
        }

        // Reopen and verify persistence.
        let db = Database::open(&path).unwrap();
        let conn = db.connect().unwrap();
        let res = conn.query("SELECT a FROM t").unwrap();
        assert_eq!(res.row_count(), 1);
        assert_eq!(res.value_int32(0, 0).unwrap(), 7);
    }

    #[test]
    fn test_open_invalid_path() {
        // A directory cannot hold a database file in its own name.
        let dir = tempfile::tempdir().unwrap();
        let err = Database::open(dir.path()).unwrap_err();
        match err {
            Error::Open(e) => {
                assert!(e.path.is_some());
                assert!(!e.message.is_empty());
            }
            other => panic!("expected Open error, got {other:?}"),
        }
    }

    #[test]
    fn test_open_nested_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("dir").join("x.db");
        assert!(matches!(Database::open(&path), Err(Error::Open(_))));
    }

    #[test]
    fn test_path_with_nul_byte() {
        assert!(matches!(
            Database::open("bad\0path"),
            Err(Error::InvalidString(_))
        ));
    }

    #[test]
    fn test_multiple_connections() {
        let db = Database::open_in_memory().unwrap();
        let c1 = db.connect().unwrap();
        let c2 = db.connect().unwrap();
        c1.query("CREATE TABLE t (a INTEGER)").unwrap();
        c1.query("INSERT INTO t VALUES (1)").unwrap();
        // The second connection sees the first one's committed writes.
        let res = c2.query("SELECT count(*) FROM t").unwrap();
        assert_eq!(res.value_int64(0, 0).unwrap(), 1);
    }
}
