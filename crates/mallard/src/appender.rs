//! Bulk row insertion through the engine's appender interface.

use crate::connection::Connection;
use crate::error::{AppendError, Error, Result};
use crate::ffi;
use crate::value::{Date, i128_to_hugeint};
use std::ffi::CString;
use std::marker::PhantomData;
use std::ptr;

/// Generates one staging method per appendable scalar type; the table at
/// the call site is the single source of truth for the
/// {method, engine call, Rust type} mapping.
macro_rules! append_methods {
    ($($(#[$meta:meta])* $method:ident => $ffi_fn:ident($ty:ty);)+) => {
        $(
            $(#[$meta])*
            pub fn $method(&mut self, value: $ty) -> Result<()> {
                // SAFETY: the appender handle is live
                let state = unsafe { ffi::$ffi_fn(self.raw, value) };
                if state != ffi::DuckDBSuccess {
                    return Err(self.row_error());
                }
                Ok(())
            }
        )+
    };
}

/// A write-only, forward-only bulk-insert cursor bound to one table.
///
/// Values are staged per row in left-to-right column order; [`end_row`]
/// commits the staged values as one row. Dropping the appender flushes
/// every completed row and releases the native handle exactly once; a row
/// staged but never ended is discarded.
///
/// [`end_row`]: Appender::end_row
#[derive(Debug)]
pub struct Appender<'conn> {
    raw: ffi::duckdb_appender,
    schema: Option<String>,
    table: String,
    _conn: PhantomData<&'conn ()>,
}

impl<'conn> Appender<'conn> {
    pub(crate) fn new(
        conn: &'conn Connection<'_>,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Self> {
        let c_table = CString::new(table)?;
        let c_schema = schema.map(CString::new).transpose()?;
        let c_schema_ptr = c_schema.as_ref().map_or(ptr::null(), |s| s.as_ptr());

        let mut raw: ffi::duckdb_appender = ptr::null_mut();

        // SAFETY: the connection handle is live and all string pointers
        // are NUL-terminated (schema may be null for the default schema)
        let state = unsafe {
            ffi::duckdb_appender_create(conn.as_raw(), c_schema_ptr, c_table.as_ptr(), &mut raw)
        };

        if state != ffi::DuckDBSuccess {
            // Even a failed create can allocate the appender to carry its
            // error message; read it, then destroy the handle exactly
            // once.
            let message = if raw.is_null() {
                "unknown appender failure".to_string()
            } else {
                let msg = appender_error(raw);
                // SAFETY: raw is a live handle owned solely by this frame
                unsafe { ffi::duckdb_appender_destroy(&mut raw) };
                msg
            };
            return Err(Error::AppendOpen(AppendError {
                schema: schema.map(str::to_owned),
                table: table.to_owned(),
                message,
            }));
        }

        tracing::debug!(table, "appender opened");

        Ok(Self {
            raw,
            schema: schema.map(str::to_owned),
            table: table.to_owned(),
            _conn: PhantomData,
        })
    }

    append_methods! {
        /// Stage a boolean for the current row.
        append_bool => duckdb_append_bool(bool);
        /// Stage a signed 8-bit integer.
        append_int8 => duckdb_append_int8(i8);
        /// Stage a signed 16-bit integer.
        append_int16 => duckdb_append_int16(i16);
        /// Stage a signed 32-bit integer.
        append_int32 => duckdb_append_int32(i32);
        /// Stage a signed 64-bit integer.
        append_int64 => duckdb_append_int64(i64);
        /// Stage an unsigned 8-bit integer.
        append_uint8 => duckdb_append_uint8(u8);
        /// Stage an unsigned 16-bit integer.
        append_uint16 => duckdb_append_uint16(u16);
        /// Stage an unsigned 32-bit integer.
        append_uint32 => duckdb_append_uint32(u32);
        /// Stage an unsigned 64-bit integer.
        append_uint64 => duckdb_append_uint64(u64);
        /// Stage a 32-bit float.
        append_float => duckdb_append_float(f32);
        /// Stage a 64-bit float.
        append_double => duckdb_append_double(f64);
    }

    /// Stage a 128-bit integer (HUGEINT).
    pub fn append_hugeint(&mut self, value: i128) -> Result<()> {
        // SAFETY: the appender handle is live
        let state = unsafe { ffi::duckdb_append_hugeint(self.raw, i128_to_hugeint(value)) };
        if state != ffi::DuckDBSuccess {
            return Err(self.row_error());
        }
        Ok(())
    }

    /// Stage a calendar date.
    pub fn append_date(&mut self, value: Date) -> Result<()> {
        // SAFETY: the appender handle is live
        let state = unsafe { ffi::duckdb_append_date(self.raw, value.to_ffi()) };
        if state != ffi::DuckDBSuccess {
            return Err(self.row_error());
        }
        Ok(())
    }

    /// Stage a string. Passed with an explicit length, so interior NUL
    /// bytes are allowed.
    pub fn append_varchar(&mut self, value: &str) -> Result<()> {
        // SAFETY: the appender handle is live; ptr/len describe a valid
        // UTF-8 buffer the engine copies before returning
        let state = unsafe {
            ffi::duckdb_append_varchar_length(
                self.raw,
                value.as_ptr().cast(),
                value.len() as ffi::idx_t,
            )
        };
        if state != ffi::DuckDBSuccess {
            return Err(self.row_error());
        }
        Ok(())
    }

    /// Stage a binary blob.
    pub fn append_blob(&mut self, value: &[u8]) -> Result<()> {
        // SAFETY: the appender handle is live; ptr/len describe a valid
        // buffer the engine copies before returning
        let state = unsafe {
            ffi::duckdb_append_blob(self.raw, value.as_ptr().cast(), value.len() as ffi::idx_t)
        };
        if state != ffi::DuckDBSuccess {
            return Err(self.row_error());
        }
        Ok(())
    }

    /// Stage a NULL for the next column.
    pub fn append_null(&mut self) -> Result<()> {
        // SAFETY: the appender handle is live
        let state = unsafe { ffi::duckdb_append_null(self.raw) };
        if state != ffi::DuckDBSuccess {
            return Err(self.row_error());
        }
        Ok(())
    }

    /// Commit the staged values as one row and reset staging for the
    /// next. Ending a row with fewer values than the table has columns is
    /// an engine-reported failure; no partial row is inserted.
    pub fn end_row(&mut self) -> Result<()> {
        // SAFETY: the appender handle is live
        let state = unsafe { ffi::duckdb_appender_end_row(self.raw) };
        if state != ffi::DuckDBSuccess {
            return Err(self.row_error());
        }
        Ok(())
    }

    /// Force all completed rows out to the table now instead of waiting
    /// for drop. Constraint violations surface here.
    pub fn flush(&mut self) -> Result<()> {
        // SAFETY: the appender handle is live
        let state = unsafe { ffi::duckdb_appender_flush(self.raw) };
        if state != ffi::DuckDBSuccess {
            return Err(self.row_error());
        }
        tracing::debug!(table = %self.table, "appender flushed");
        Ok(())
    }

    fn row_error(&self) -> Error {
        Error::AppendRow(AppendError {
            schema: self.schema.clone(),
            table: self.table.clone(),
            message: appender_error(self.raw),
        })
    }
}

/// Read the appender's current diagnostic. The string belongs to the
/// appender and is not freed here.
fn appender_error(raw: ffi::duckdb_appender) -> String {
    // SAFETY: raw is a live appender handle
    let ptr = unsafe { ffi::duckdb_appender_error(raw) };
    if ptr.is_null() {
        return "unknown appender failure".to_string();
    }
    // SAFETY: non-null appender errors are NUL-terminated
    unsafe { std::ffi::CStr::from_ptr(ptr) }
        .to_string_lossy()
        .into_owned()
}

impl Drop for Appender<'_> {
    fn drop(&mut self) {
        // Destroy flushes completed rows, discards any half-staged row,
        // and releases the handle; it nulls the pointer so this runs
        // exactly once.
        // SAFETY: raw is this wrapper's exclusively owned handle
        unsafe { ffi::duckdb_appender_destroy(&mut self.raw) };
    }
}
