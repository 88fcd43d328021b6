//! Low-level FFI bindings to the DuckDB C API.
//!
//! These bindings are manually written to provide full control over the
//! interface. We only declare what the wrapper layer needs; the engine
//! itself is compiled by `libduckdb-sys` with the `bundled` feature, and
//! the anchor import below is what pulls its static library onto the
//! link line.

#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]
#![allow(clippy::upper_case_acronyms)]

// Links the bundled engine; rustc only emits link directives for crates
// that are referenced.
use libduckdb_sys as _;

use std::ffi::{c_char, c_uint, c_void};

/// Row, column, and size index type used throughout the C API.
pub type idx_t = u64;

/// Opaque database instance handle.
#[repr(C)]
pub struct _duckdb_database {
    _private: [u8; 0],
}
pub type duckdb_database = *mut _duckdb_database;

/// Opaque connection handle.
#[repr(C)]
pub struct _duckdb_connection {
    _private: [u8; 0],
}
pub type duckdb_connection = *mut _duckdb_connection;

/// Opaque configuration handle (only ever passed as null here).
#[repr(C)]
pub struct _duckdb_config {
    _private: [u8; 0],
}
pub type duckdb_config = *mut _duckdb_config;

/// Opaque appender handle.
#[repr(C)]
pub struct _duckdb_appender {
    _private: [u8; 0],
}
pub type duckdb_appender = *mut _duckdb_appender;

// Status codes returned by fallible C API calls.
pub type duckdb_state = c_uint;
pub const DuckDBSuccess: duckdb_state = 0;
pub const DuckDBError: duckdb_state = 1;

// Column type identifiers. The engine reports these from
// duckdb_column_type; the wrapper maps a closed subset to LogicalType and
// rejects the rest.
pub type duckdb_type = c_uint;
pub const DUCKDB_TYPE_INVALID: duckdb_type = 0;
pub const DUCKDB_TYPE_BOOLEAN: duckdb_type = 1;
pub const DUCKDB_TYPE_TINYINT: duckdb_type = 2;
pub const DUCKDB_TYPE_SMALLINT: duckdb_type = 3;
pub const DUCKDB_TYPE_INTEGER: duckdb_type = 4;
pub const DUCKDB_TYPE_BIGINT: duckdb_type = 5;
pub const DUCKDB_TYPE_UTINYINT: duckdb_type = 6;
pub const DUCKDB_TYPE_USMALLINT: duckdb_type = 7;
pub const DUCKDB_TYPE_UINTEGER: duckdb_type = 8;
pub const DUCKDB_TYPE_UBIGINT: duckdb_type = 9;
pub const DUCKDB_TYPE_FLOAT: duckdb_type = 10;
pub const DUCKDB_TYPE_DOUBLE: duckdb_type = 11;
pub const DUCKDB_TYPE_TIMESTAMP: duckdb_type = 12;
pub const DUCKDB_TYPE_DATE: duckdb_type = 13;
pub const DUCKDB_TYPE_TIME: duckdb_type = 14;
pub const DUCKDB_TYPE_INTERVAL: duckdb_type = 15;
pub const DUCKDB_TYPE_HUGEINT: duckdb_type = 16;
pub const DUCKDB_TYPE_VARCHAR: duckdb_type = 17;
pub const DUCKDB_TYPE_BLOB: duckdb_type = 18;
pub const DUCKDB_TYPE_DECIMAL: duckdb_type = 19;
pub const DUCKDB_TYPE_TIMESTAMP_S: duckdb_type = 20;
pub const DUCKDB_TYPE_TIMESTAMP_MS: duckdb_type = 21;
pub const DUCKDB_TYPE_TIMESTAMP_NS: duckdb_type = 22;
pub const DUCKDB_TYPE_ENUM: duckdb_type = 23;
pub const DUCKDB_TYPE_LIST: duckdb_type = 24;
pub const DUCKDB_TYPE_STRUCT: duckdb_type = 25;
pub const DUCKDB_TYPE_MAP: duckdb_type = 26;
pub const DUCKDB_TYPE_UUID: duckdb_type = 27;
pub const DUCKDB_TYPE_UNION: duckdb_type = 28;
pub const DUCKDB_TYPE_BIT: duckdb_type = 29;
pub const DUCKDB_TYPE_TIME_TZ: duckdb_type = 30;
pub const DUCKDB_TYPE_TIMESTAMP_TZ: duckdb_type = 31;
pub const DUCKDB_TYPE_UHUGEINT: duckdb_type = 32;
pub const DUCKDB_TYPE_ARRAY: duckdb_type = 33;

/// A date as days since 1970-01-01.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct duckdb_date {
    pub days: i32,
}

/// A date decomposed into calendar fields.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct duckdb_date_struct {
    pub year: i32,
    pub month: i8,
    pub day: i8,
}

/// A 128-bit integer split into a low and high half.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct duckdb_hugeint {
    pub lower: u64,
    pub upper: i64,
}

/// An engine-allocated binary value; `data` is released via `duckdb_free`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct duckdb_blob {
    pub data: *mut c_void,
    pub size: idx_t,
}

/// A fixed-point decimal: a 128-bit value with width and scale.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct duckdb_decimal {
    pub width: u8,
    pub scale: u8,
    pub value: duckdb_hugeint,
}

/// Result column as laid out in the deprecated materialized interface.
/// Only present so `duckdb_result` has the exact C layout; never touched
/// directly.
#[repr(C)]
#[derive(Debug)]
pub struct duckdb_column {
    pub deprecated_data: *mut c_void,
    pub deprecated_nullmask: *mut bool,
    pub deprecated_type: duckdb_type,
    pub deprecated_name: *mut c_char,
    pub internal_data: *mut c_void,
}

/// A materialized query result, owned by value on the Rust side.
///
/// `internal_data` doubles as the "executed" sentinel: the all-zero value
/// produced before `duckdb_query` populates it must never be passed to
/// `duckdb_destroy_result`.
#[repr(C)]
#[derive(Debug)]
pub struct duckdb_result {
    pub deprecated_column_count: idx_t,
    pub deprecated_row_count: idx_t,
    pub deprecated_rows_changed: idx_t,
    pub deprecated_columns: *mut duckdb_column,
    pub deprecated_error_message: *mut c_char,
    pub internal_data: *mut c_void,
}

unsafe extern "C" {
    // Database lifecycle
    pub fn duckdb_open(path: *const c_char, out_database: *mut duckdb_database) -> duckdb_state;

    pub fn duckdb_open_ext(
        path: *const c_char,
        out_database: *mut duckdb_database,
        config: duckdb_config,
        out_error: *mut *mut c_char,
    ) -> duckdb_state;

    pub fn duckdb_close(database: *mut duckdb_database);

    // Connection lifecycle
    pub fn duckdb_connect(
        database: duckdb_database,
        out_connection: *mut duckdb_connection,
    ) -> duckdb_state;

    pub fn duckdb_disconnect(connection: *mut duckdb_connection);

    // Query execution
    pub fn duckdb_query(
        connection: duckdb_connection,
        query: *const c_char,
        out_result: *mut duckdb_result,
    ) -> duckdb_state;

    pub fn duckdb_destroy_result(result: *mut duckdb_result);

    // Result metadata
    pub fn duckdb_column_name(result: *mut duckdb_result, col: idx_t) -> *const c_char;
    pub fn duckdb_column_type(result: *mut duckdb_result, col: idx_t) -> duckdb_type;
    pub fn duckdb_column_count(result: *mut duckdb_result) -> idx_t;
    pub fn duckdb_row_count(result: *mut duckdb_result) -> idx_t;
    pub fn duckdb_rows_changed(result: *mut duckdb_result) -> idx_t;
    pub fn duckdb_result_error(result: *mut duckdb_result) -> *const c_char;

    // Typed cell accessors. Note the C API takes (col, row), not (row, col).
    pub fn duckdb_value_boolean(result: *mut duckdb_result, col: idx_t, row: idx_t) -> bool;
    pub fn duckdb_value_int8(result: *mut duckdb_result, col: idx_t, row: idx_t) -> i8;
    pub fn duckdb_value_int16(result: *mut duckdb_result, col: idx_t, row: idx_t) -> i16;
    pub fn duckdb_value_int32(result: *mut duckdb_result, col: idx_t, row: idx_t) -> i32;
    pub fn duckdb_value_int64(result: *mut duckdb_result, col: idx_t, row: idx_t) -> i64;
    pub fn duckdb_value_hugeint(result: *mut duckdb_result, col: idx_t, row: idx_t)
    -> duckdb_hugeint;
    pub fn duckdb_value_decimal(result: *mut duckdb_result, col: idx_t, row: idx_t)
    -> duckdb_decimal;
    pub fn duckdb_value_uint8(result: *mut duckdb_result, col: idx_t, row: idx_t) -> u8;
    pub fn duckdb_value_uint16(result: *mut duckdb_result, col: idx_t, row: idx_t) -> u16;
    pub fn duckdb_value_uint32(result: *mut duckdb_result, col: idx_t, row: idx_t) -> u32;
    pub fn duckdb_value_uint64(result: *mut duckdb_result, col: idx_t, row: idx_t) -> u64;
    pub fn duckdb_value_float(result: *mut duckdb_result, col: idx_t, row: idx_t) -> f32;
    pub fn duckdb_value_double(result: *mut duckdb_result, col: idx_t, row: idx_t) -> f64;
    pub fn duckdb_value_date(result: *mut duckdb_result, col: idx_t, row: idx_t) -> duckdb_date;
    pub fn duckdb_value_varchar(result: *mut duckdb_result, col: idx_t, row: idx_t) -> *mut c_char;
    pub fn duckdb_value_blob(result: *mut duckdb_result, col: idx_t, row: idx_t) -> duckdb_blob;
    pub fn duckdb_value_is_null(result: *mut duckdb_result, col: idx_t, row: idx_t) -> bool;

    // Memory allocated by the engine (varchar/blob values, error strings)
    // is returned through this, exactly once per allocation.
    pub fn duckdb_free(ptr: *mut c_void);

    // Date helpers
    pub fn duckdb_from_date(date: duckdb_date) -> duckdb_date_struct;
    pub fn duckdb_to_date(date: duckdb_date_struct) -> duckdb_date;

    // Decimal helpers
    pub fn duckdb_decimal_to_double(val: duckdb_decimal) -> f64;

    // Appender lifecycle
    pub fn duckdb_appender_create(
        connection: duckdb_connection,
        schema: *const c_char,
        table: *const c_char,
        out_appender: *mut duckdb_appender,
    ) -> duckdb_state;

    pub fn duckdb_appender_error(appender: duckdb_appender) -> *const c_char;
    pub fn duckdb_appender_flush(appender: duckdb_appender) -> duckdb_state;
    pub fn duckdb_appender_close(appender: duckdb_appender) -> duckdb_state;
    pub fn duckdb_appender_destroy(appender: *mut duckdb_appender) -> duckdb_state;
    pub fn duckdb_appender_end_row(appender: duckdb_appender) -> duckdb_state;

    // Per-type append calls
    pub fn duckdb_append_bool(appender: duckdb_appender, value: bool) -> duckdb_state;
    pub fn duckdb_append_int8(appender: duckdb_appender, value: i8) -> duckdb_state;
    pub fn duckdb_append_int16(appender: duckdb_appender, value: i16) -> duckdb_state;
    pub fn duckdb_append_int32(appender: duckdb_appender, value: i32) -> duckdb_state;
    pub fn duckdb_append_int64(appender: duckdb_appender, value: i64) -> duckdb_state;
    pub fn duckdb_append_hugeint(appender: duckdb_appender, value: duckdb_hugeint)
    -> duckdb_state;
    pub fn duckdb_append_uint8(appender: duckdb_appender, value: u8) -> duckdb_state;
    pub fn duckdb_append_uint16(appender: duckdb_appender, value: u16) -> duckdb_state;
    pub fn duckdb_append_uint32(appender: duckdb_appender, value: u32) -> duckdb_state;
    pub fn duckdb_append_uint64(appender: duckdb_appender, value: u64) -> duckdb_state;
    pub fn duckdb_append_float(appender: duckdb_appender, value: f32) -> duckdb_state;
    pub fn duckdb_append_double(appender: duckdb_appender, value: f64) -> duckdb_state;
    pub fn duckdb_append_date(appender: duckdb_appender, value: duckdb_date) -> duckdb_state;
    pub fn duckdb_append_varchar(appender: duckdb_appender, val: *const c_char) -> duckdb_state;
    pub fn duckdb_append_varchar_length(
        appender: duckdb_appender,
        val: *const c_char,
        length: idx_t,
    ) -> duckdb_state;
    pub fn duckdb_append_blob(
        appender: duckdb_appender,
        data: *const c_void,
        length: idx_t,
    ) -> duckdb_state;
    pub fn duckdb_append_null(appender: duckdb_appender) -> duckdb_state;

    // Version info
    pub fn duckdb_library_version() -> *const c_char;
}

/// Get the DuckDB library version as a string, e.g. `v1.1.1`.
pub fn version() -> &'static str {
    // SAFETY: duckdb_library_version returns a static string
    unsafe {
        let ptr = duckdb_library_version();
        std::ffi::CStr::from_ptr(ptr).to_str().unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let v = version();
        assert!(!v.is_empty());
        // Release builds report as v<major>.<minor>.<patch>
        assert!(v.starts_with('v'));
    }

    #[test]
    fn test_state_constants() {
        assert_eq!(DuckDBSuccess, 0);
        assert_eq!(DuckDBError, 1);
    }

    #[test]
    fn test_struct_layouts() {
        // These are passed by value across the FFI boundary; a size drift
        // against duckdb.h would corrupt the stack.
        assert_eq!(std::mem::size_of::<duckdb_date>(), 4);
        assert_eq!(std::mem::size_of::<duckdb_hugeint>(), 16);
        assert_eq!(std::mem::size_of::<duckdb_decimal>(), 24);
        assert_eq!(std::mem::size_of::<duckdb_blob>(), 16);
        assert_eq!(std::mem::size_of::<duckdb_result>(), 48);
    }
}
