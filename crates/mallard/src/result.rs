//! Materialized query results and their typed cell accessors.

use crate::error::{Error, RangeError, Result};
use crate::ffi;
use crate::types::LogicalType;
use crate::value::{Date, Decimal, OwnedBlob, OwnedString, hugeint_to_i128};
use std::ffi::CStr;
use std::marker::PhantomData;

/// Generates one typed cell accessor per supported column type. The table
/// at the call site is the single source of truth for the
/// {method, engine accessor, Rust type} mapping; public accessors take
/// (row, col) while the C API takes (col, row).
macro_rules! value_accessors {
    ($($(#[$meta:meta])* $method:ident => $ffi_fn:ident -> $ty:ty;)+) => {
        $(
            $(#[$meta])*
            pub fn $method(&self, row: u64, col: u64) -> Result<$ty> {
                self.check_bounds(row, col)?;
                // SAFETY: the result buffer is live and (row, col) is in
                // range
                Ok(unsafe { ffi::$ffi_fn(self.as_ptr(), col, row) })
            }
        )+
    };
}

/// The materialized outcome of executing one SQL statement.
///
/// Owns the native result buffer and destroys it exactly once on drop.
/// Borrows the connection it came from, so it cannot outlive it.
///
/// All cell accessors validate `(row, col)` against the result's bounds
/// and return [`Error::Range`] on a miss. Asking for a type that differs
/// from the column's actual type is engine-defined: DuckDB's value API
/// casts where it can and yields a zero value where it cannot.
#[derive(Debug)]
pub struct QueryResult<'conn> {
    raw: ffi::duckdb_result,
    _conn: PhantomData<&'conn ()>,
}

impl QueryResult<'_> {
    /// Take ownership of a result buffer, populated or not. The null
    /// `internal_data` sentinel of an unexecuted buffer is what keeps drop
    /// from destroying nothing.
    pub(crate) fn from_raw(raw: ffi::duckdb_result) -> Self {
        Self {
            raw,
            _conn: PhantomData,
        }
    }

    /// The C API reads through a mutable pointer; the buffer itself is
    /// never mutated by the metadata and value accessors.
    fn as_ptr(&self) -> *mut ffi::duckdb_result {
        std::ptr::from_ref(&self.raw).cast_mut()
    }

    /// Number of rows in the result.
    pub fn row_count(&self) -> u64 {
        // SAFETY: the result buffer is live
        unsafe { ffi::duckdb_row_count(self.as_ptr()) }
    }

    /// Number of columns in the result.
    pub fn column_count(&self) -> u64 {
        // SAFETY: the result buffer is live
        unsafe { ffi::duckdb_column_count(self.as_ptr()) }
    }

    /// Rows affected by a DML statement executed through `query`.
    pub fn rows_changed(&self) -> u64 {
        // SAFETY: the result buffer is live
        unsafe { ffi::duckdb_rows_changed(self.as_ptr()) }
    }

    /// Name of column `col`.
    pub fn column_name(&self, col: u64) -> Result<String> {
        self.check_column(col)?;
        // SAFETY: the result buffer is live and col is in range; the
        // returned pointer belongs to the result and is not freed here
        let ptr = unsafe { ffi::duckdb_column_name(self.as_ptr(), col) };
        if ptr.is_null() {
            return Ok(String::new());
        }
        // SAFETY: non-null column names are NUL-terminated
        Ok(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
    }

    /// Logical type of column `col`; fails with
    /// [`Error::UnsupportedType`] for types outside the supported set.
    pub fn column_type(&self, col: u64) -> Result<LogicalType> {
        self.check_column(col)?;
        // SAFETY: the result buffer is live and col is in range
        let raw = unsafe { ffi::duckdb_column_type(self.as_ptr(), col) };
        LogicalType::from_raw(raw)
    }

    /// Engine diagnostic attached to a failed result, if any.
    pub(crate) fn error_message(&self) -> Option<String> {
        // SAFETY: the result buffer is live; the error string belongs to
        // the result and is not freed here
        let ptr = unsafe { ffi::duckdb_result_error(self.as_ptr()) };
        if ptr.is_null() {
            return None;
        }
        // SAFETY: non-null error messages are NUL-terminated
        let msg = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
        if msg.is_empty() { None } else { Some(msg) }
    }

    fn check_column(&self, col: u64) -> Result<()> {
        if col >= self.column_count() {
            return Err(Error::Range(RangeError {
                row: 0,
                column: col,
                row_count: self.row_count(),
                column_count: self.column_count(),
            }));
        }
        Ok(())
    }

    fn check_bounds(&self, row: u64, col: u64) -> Result<()> {
        if row >= self.row_count() || col >= self.column_count() {
            return Err(Error::Range(RangeError {
                row,
                column: col,
                row_count: self.row_count(),
                column_count: self.column_count(),
            }));
        }
        Ok(())
    }

    value_accessors! {
        /// Cell as a boolean.
        value_boolean => duckdb_value_boolean -> bool;
        /// Cell as a signed 8-bit integer.
        value_int8 => duckdb_value_int8 -> i8;
        /// Cell as a signed 16-bit integer.
        value_int16 => duckdb_value_int16 -> i16;
        /// Cell as a signed 32-bit integer.
        value_int32 => duckdb_value_int32 -> i32;
        /// Cell as a signed 64-bit integer.
        value_int64 => duckdb_value_int64 -> i64;
        /// Cell as an unsigned 8-bit integer.
        value_uint8 => duckdb_value_uint8 -> u8;
        /// Cell as an unsigned 16-bit integer.
        value_uint16 => duckdb_value_uint16 -> u16;
        /// Cell as an unsigned 32-bit integer.
        value_uint32 => duckdb_value_uint32 -> u32;
        /// Cell as an unsigned 64-bit integer.
        value_uint64 => duckdb_value_uint64 -> u64;
        /// Cell as a 32-bit float.
        value_float => duckdb_value_float -> f32;
        /// Cell as a 64-bit float.
        value_double => duckdb_value_double -> f64;
        /// Whether the cell is NULL.
        value_is_null => duckdb_value_is_null -> bool;
    }

    /// Cell as a 128-bit integer (HUGEINT).
    pub fn value_hugeint(&self, row: u64, col: u64) -> Result<i128> {
        self.check_bounds(row, col)?;
        // SAFETY: the result buffer is live and (row, col) is in range
        let raw = unsafe { ffi::duckdb_value_hugeint(self.as_ptr(), col, row) };
        Ok(hugeint_to_i128(raw))
    }

    /// Cell as a fixed-point decimal.
    pub fn value_decimal(&self, row: u64, col: u64) -> Result<Decimal> {
        self.check_bounds(row, col)?;
        // SAFETY: the result buffer is live and (row, col) is in range
        let raw = unsafe { ffi::duckdb_value_decimal(self.as_ptr(), col, row) };
        Ok(Decimal::from_ffi(raw))
    }

    /// Cell as a calendar date.
    pub fn value_date(&self, row: u64, col: u64) -> Result<Date> {
        self.check_bounds(row, col)?;
        // SAFETY: the result buffer is live and (row, col) is in range
        let raw = unsafe { ffi::duckdb_value_date(self.as_ptr(), col, row) };
        Ok(Date::from_ffi(raw))
    }

    /// Cell as an owned `String` (copies out of the engine allocation).
    pub fn value_varchar(&self, row: u64, col: u64) -> Result<String> {
        Ok(self.value_string(row, col)?.as_str().to_owned())
    }

    /// Cell as an [`OwnedString`] that keeps the engine allocation alive
    /// instead of copying it.
    pub fn value_string(&self, row: u64, col: u64) -> Result<OwnedString> {
        self.check_bounds(row, col)?;
        // SAFETY: the result buffer is live and (row, col) is in range;
        // the engine allocates the returned string and OwnedString frees
        // it exactly once
        unsafe {
            let ptr = ffi::duckdb_value_varchar(self.as_ptr(), col, row);
            Ok(OwnedString::from_raw(ptr))
        }
    }

    /// Cell as an owned binary blob.
    pub fn value_blob(&self, row: u64, col: u64) -> Result<OwnedBlob> {
        self.check_bounds(row, col)?;
        // SAFETY: the result buffer is live and (row, col) is in range;
        // the engine allocates the blob data and OwnedBlob frees it
        // exactly once
        unsafe {
            let raw = ffi::duckdb_value_blob(self.as_ptr(), col, row);
            Ok(OwnedBlob::from_raw(raw))
        }
    }
}

impl Drop for QueryResult<'_> {
    fn drop(&mut self) {
        // An unexecuted buffer (null internal_data) has nothing to
        // destroy; passing it to the engine is what this guard prevents.
        if !self.raw.internal_data.is_null() {
            // SAFETY: the buffer was populated by duckdb_query and is
            // destroyed exactly once
            unsafe { ffi::duckdb_destroy_result(&mut self.raw) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    #[test]
    fn test_metadata() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connect().unwrap();
        let res = conn
            .query("SELECT 1 AS a, 'x' AS b, DATE '2020-05-17' AS c")
            .unwrap();

        assert_eq!(res.row_count(), 1);
        assert_eq!(res.column_count(), 3);
        assert_eq!(res.column_name(0).unwrap(), "a");
        assert_eq!(res.column_name(1).unwrap(), "b");
        assert_eq!(res.column_name(2).unwrap(), "c");
        assert_eq!(res.column_type(0).unwrap(), LogicalType::Integer);
        assert_eq!(res.column_type(1).unwrap(), LogicalType::Varchar);
        assert_eq!(res.column_type(2).unwrap(), LogicalType::Date);
    }

    #[test]
    fn test_typed_accessors() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connect().unwrap();
        let res = conn
            .query(
                "SELECT true, 42::TINYINT, 42::SMALLINT, 42::INTEGER, 42::BIGINT, \
                 42::UTINYINT, 42::USMALLINT, 42::UINTEGER, 42::UBIGINT, \
                 1.5::FLOAT, 2.5::DOUBLE, 'hello', DATE '1970-01-02'",
            )
            .unwrap();

        assert!(res.value_boolean(0, 0).unwrap());
        assert_eq!(res.value_int8(0, 1).unwrap(), 42);
        assert_eq!(res.value_int16(0, 2).unwrap(), 42);
        assert_eq!(res.value_int32(0, 3).unwrap(), 42);
        assert_eq!(res.value_int64(0, 4).unwrap(), 42);
        assert_eq!(res.value_uint8(0, 5).unwrap(), 42);
        assert_eq!(res.value_uint16(0, 6).unwrap(), 42);
        assert_eq!(res.value_uint32(0, 7).unwrap(), 42);
        assert_eq!(res.value_uint64(0, 8).unwrap(), 42);
        assert!((res.value_float(0, 9).unwrap() - 1.5).abs() < f32::EPSILON);
        assert!((res.value_double(0, 10).unwrap() - 2.5).abs() < f64::EPSILON);
        assert_eq!(res.value_varchar(0, 11).unwrap(), "hello");
        assert_eq!(res.value_date(0, 12).unwrap().days(), 1);
    }

    #[test]
    fn test_hugeint_accessor() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connect().unwrap();
        let res = conn
            .query("SELECT 170141183460469231731687303715884105727::HUGEINT, (-9223372036854775809)::HUGEINT")
            .unwrap();
        assert_eq!(res.column_type(0).unwrap(), LogicalType::HugeInt);
        assert_eq!(res.value_hugeint(0, 0).unwrap(), i128::MAX);
        assert_eq!(
            res.value_hugeint(0, 1).unwrap(),
            i128::from(i64::MIN) - 1
        );
    }

    #[test]
    fn test_decimal_accessor() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connect().unwrap();
        let res = conn.query("SELECT 123.45::DECIMAL(5,2)").unwrap();
        assert_eq!(res.column_type(0).unwrap(), LogicalType::Decimal);

        let dec = res.value_decimal(0, 0).unwrap();
        assert_eq!(dec.scale, 2);
        assert_eq!(dec.value, 12345);
        assert!((dec.to_f64() - 123.45).abs() < 1e-9);
    }

    #[test]
    fn test_owned_string_and_blob() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connect().unwrap();
        let res = conn.query("SELECT 'quack', '\\xDE\\xAD\\xBE\\xEF'::BLOB").unwrap();

        let s = res.value_string(0, 0).unwrap();
        assert_eq!(s.as_str(), "quack");
        assert_eq!(s.len(), 5);
        assert_eq!(&*s, "quack");

        let b = res.value_blob(0, 1).unwrap();
        assert_eq!(b.as_slice(), &[0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn test_null_detection() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connect().unwrap();
        let res = conn.query("SELECT NULL::INTEGER, 3").unwrap();
        assert!(res.value_is_null(0, 0).unwrap());
        assert!(!res.value_is_null(0, 1).unwrap());
    }

    #[test]
    fn test_bounds_validation() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connect().unwrap();
        let res = conn.query("SELECT 1, 2").unwrap();

        // Row past the end.
        match res.value_int32(1, 0) {
            Err(Error::Range(e)) => {
                assert_eq!(e.row, 1);
                assert_eq!(e.row_count, 1);
                assert_eq!(e.column_count, 2);
            }
            other => panic!("expected Range error, got {other:?}"),
        }
        // Column past the end.
        assert!(matches!(res.value_int32(0, 2), Err(Error::Range(_))));
        assert!(matches!(res.column_name(2), Err(Error::Range(_))));
        assert!(matches!(res.column_type(2), Err(Error::Range(_))));
    }

    #[test]
    fn test_unsupported_column_type() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connect().unwrap();
        let res = conn
            .query("SELECT TIMESTAMP '2020-01-01 00:00:00'")
            .unwrap();
        match res.column_type(0) {
            Err(Error::UnsupportedType(e)) => assert_eq!(e.type_name(), "TIMESTAMP"),
            other => panic!("expected UnsupportedType, got {other:?}"),
        }

        let res = conn.query("SELECT [1, 2, 3]").unwrap();
        match res.column_type(0) {
            Err(Error::UnsupportedType(e)) => assert_eq!(e.type_name(), "LIST"),
            other => panic!("expected UnsupportedType, got {other:?}"),
        }
    }

    /// Baseline for engine-defined behavior: asking for a type the column
    /// does not have is delegated to the engine's value casting, which
    /// yields a zero value when the cast fails. Recorded, not asserted as
    /// a contract.
    #[test]
    fn test_type_mismatch_baseline() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connect().unwrap();
        let res = conn.query("SELECT 'not a number'").unwrap();
        assert_eq!(res.value_int32(0, 0).unwrap(), 0);
    }

    #[test]
    fn test_rows_changed() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connect().unwrap();
        conn.query("CREATE TABLE t (a INTEGER)").unwrap();
        let res = conn.query("INSERT INTO t VALUES (1), (2), (3)").unwrap();
        assert_eq!(res.rows_changed(), 3);
    }

    #[test]
    fn test_empty_result() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connect().unwrap();
        conn.query("CREATE TABLE t (a INTEGER)").unwrap();
        let res = conn.query("SELECT * FROM t").unwrap();
        assert_eq!(res.row_count(), 0);
        assert_eq!(res.column_count(), 1);
        // Any cell access on an empty result is out of range.
        assert!(matches!(res.value_int32(0, 0), Err(Error::Range(_))));
    }

    /// Dropping an unexecuted (all-zero) result must not call the native
    /// destroy. Constructing one directly exercises the same drop guard
    /// the failed-query path relies on.
    #[test]
    fn test_unexecuted_result_drop_is_noop() {
        // SAFETY: all-zero is the valid unexecuted result state
        let raw: ffi::duckdb_result = unsafe { std::mem::zeroed() };
        let res = QueryResult::from_raw(raw);
        assert!(res.raw.internal_data.is_null());
        drop(res);
    }
}
