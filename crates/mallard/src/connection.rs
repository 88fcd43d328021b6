//! Connections: the execution surface of an open database.

use crate::appender::Appender;
use crate::database::Database;
use crate::error::{ConnectError, Error, QueryError, Result};
use crate::ffi;
use crate::result::QueryResult;
use std::ffi::CString;
use std::marker::PhantomData;
use std::ptr;

/// A connection to an open [`Database`].
///
/// Borrows the database for its whole lifetime, so the lifecycle-ordering
/// invariant (no connection outlives its database) is enforced at compile
/// time. Releases its native handle exactly once on drop.
///
/// There is no first-class transaction API: transaction control is issued
/// as ordinary SQL (`BEGIN TRANSACTION`, `COMMIT`, ...) through [`query`].
///
/// [`query`]: Connection::query
pub struct Connection<'db> {
    raw: ffi::duckdb_connection,
    _db: PhantomData<&'db Database>,
}

impl<'db> Connection<'db> {
    pub(crate) fn new(db: &'db Database) -> Result<Self> {
        let mut raw: ffi::duckdb_connection = ptr::null_mut();

        // SAFETY: the database handle is live (borrowed) and raw is a
        // valid out-pointer
        let state = unsafe { ffi::duckdb_connect(db.as_raw(), &mut raw) };

        if state != ffi::DuckDBSuccess {
            // duckdb_connect exposes no diagnostic channel.
            return Err(Error::Connect(ConnectError {
                message: "engine refused the connection".to_string(),
            }));
        }

        Ok(Self {
            raw,
            _db: PhantomData,
        })
    }

    /// Execute one SQL statement synchronously and materialize its result.
    ///
    /// Blocks the calling thread until the engine returns; there is no
    /// cancellation or timeout.
    pub fn query(&self, sql: &str) -> Result<QueryResult<'_>> {
        let c_sql = CString::new(sql)?;

        // SAFETY: the all-zero duckdb_result is the valid "unexecuted"
        // state; its internal_data sentinel stays null unless the engine
        // populates it
        let mut raw: ffi::duckdb_result = unsafe { std::mem::zeroed() };

        // SAFETY: connection handle is live, c_sql is NUL-terminated, raw
        // is a valid out-buffer
        let state = unsafe { ffi::duckdb_query(self.raw, c_sql.as_ptr(), &mut raw) };

        // Hand the buffer to the wrapper immediately: even a failed query
        // leaves an allocated result (it carries the error message) that
        // must be destroyed exactly once.
        let result = QueryResult::from_raw(raw);

        if state != ffi::DuckDBSuccess {
            let message = result
                .error_message()
                .unwrap_or_else(|| "unknown query failure".to_string());
            return Err(Error::Query(QueryError {
                sql: sql.to_string(),
                message,
            }));
        }

        tracing::debug!(rows = result.row_count(), "query executed");
        Ok(result)
    }

    /// Open a bulk-insert appender for `table`, optionally under `schema`
    /// (`None` selects the engine's default schema).
    pub fn appender(&self, schema: Option<&str>, table: &str) -> Result<Appender<'_>> {
        Appender::new(self, schema, table)
    }

    pub(crate) fn as_raw(&self) -> ffi::duckdb_connection {
        self.raw
    }
}

impl Drop for Connection<'_> {
    fn drop(&mut self) {
        // SAFETY: raw is this wrapper's exclusively owned handle;
        // duckdb_disconnect nulls it after release
        unsafe { ffi::duckdb_disconnect(&mut self.raw) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_and_query() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connect().unwrap();
        let res = conn.query("SELECT 42").unwrap();
        assert_eq!(res.row_count(), 1);
        assert_eq!(res.column_count(), 1);
    }

    #[test]
    fn test_query_syntax_error() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connect().unwrap();
        let err = conn.query("SELEKT 1").unwrap_err();
        match err {
            Error::Query(e) => {
                assert_eq!(e.sql, "SELEKT 1");
                assert!(!e.message.is_empty());
            }
            other => panic!("expected Query error, got {other:?}"),
        }
    }

    #[test]
    fn test_query_missing_table() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connect().unwrap();
        assert!(matches!(
            conn.query("SELECT * FROM no_such_table"),
            Err(Error::Query(_))
        ));
    }

    #[test]
    fn test_sql_with_nul_byte() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connect().unwrap();
        assert!(matches!(
            conn.query("SELECT\0 1"),
            Err(Error::InvalidString(_))
        ));
    }

    #[test]
    fn test_transactions_via_sql() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connect().unwrap();
        conn.query("CREATE TABLE t (a INTEGER)").unwrap();

        conn.query("BEGIN TRANSACTION").unwrap();
        conn.query("INSERT INTO t VALUES (1)").unwrap();
        conn.query("ROLLBACK").unwrap();
        let res = conn.query("SELECT count(*) FROM t").unwrap();
        assert_eq!(res.value_int64(0, 0).unwrap(), 0);

        conn.query("BEGIN TRANSACTION").unwrap();
        conn.query("INSERT INTO t VALUES (2)").unwrap();
        conn.query("COMMIT").unwrap();
        let res = conn.query("SELECT count(*) FROM t").unwrap();
        assert_eq!(res.value_int64(0, 0).unwrap(), 1);
    }

    #[test]
    fn test_connection_dropped_before_database() {
        let db = Database::open_in_memory().unwrap();
        {
            let conn = db.connect().unwrap();
            conn.query("SELECT 1").unwrap();
        }
        // A fresh connection still works after the first was released.
        let conn = db.connect().unwrap();
        conn.query("SELECT 1").unwrap();
    }
}
