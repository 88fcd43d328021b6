//! Safe RAII ownership wrappers over the DuckDB C API.
//!
//! Every native resource (database, connection, query result, appender)
//! is owned by exactly one wrapper value that acquires the handle on
//! construction and releases it exactly once on drop, on every exit path.
//! Child resources borrow their parent, so the borrow checker enforces the
//! destruction order the C API requires.
//!
//! The engine itself is compiled and linked by `libduckdb-sys` (bundled);
//! this crate adds no SQL execution, storage, or parsing of its own.
//!
//! # Example
//!
//! ```rust,ignore
//! use mallard::Database;
//!
//! let db = Database::open_in_memory()?;
//! let conn = db.connect()?;
//! conn.query("CREATE TABLE t (a INTEGER, b VARCHAR)")?;
//!
//! let mut app = conn.appender(None, "t")?;
//! app.append_int32(42)?;
//! app.append_varchar("hello")?;
//! app.end_row()?;
//! drop(app);
//!
//! let res = conn.query("SELECT a, b FROM t")?;
//! assert_eq!(res.value_int32(0, 0)?, 42);
//! # Ok::<(), mallard::Error>(())
//! ```
//!
//! # Supported column types
//!
//! | Rust type | DuckDB type |
//! |-----------|-------------|
//! | `bool` | BOOLEAN |
//! | `i8`, `i16`, `i32`, `i64` | TINYINT..BIGINT |
//! | `u8`, `u16`, `u32`, `u64` | UTINYINT..UBIGINT |
//! | `i128` | HUGEINT |
//! | `Decimal` | DECIMAL (read only) |
//! | `f32`, `f64` | FLOAT, DOUBLE |
//! | `String` / `OwnedString` | VARCHAR |
//! | `OwnedBlob` | BLOB |
//! | `Date` | DATE |
//!
//! Everything else (lists, structs, maps, unions, the timestamp family,
//! ...) is a closed-set miss and surfaces as [`Error::UnsupportedType`].
//!
//! # Thread safety
//!
//! [`Database`] is `Send + Sync`; connections, results, and appenders are
//! deliberately neither: this layer adds no locking, and sharing them
//! across threads is not made safe by it.

#![allow(unsafe_code)]

pub mod appender;
pub mod connection;
pub mod database;
pub mod error;
pub mod ffi;
pub mod result;
pub mod types;
pub mod value;

pub use appender::Appender;
pub use connection::Connection;
pub use database::Database;
pub use error::{
    AppendError, ConnectError, Error, OpenError, QueryError, RangeError, Result,
    UnsupportedTypeError,
};
pub use result::QueryResult;
pub use types::LogicalType;
pub use value::{Date, DateParts, Decimal, OwnedBlob, OwnedString};

/// The linked DuckDB library version, e.g. `v1.1.1`.
pub fn duckdb_version() -> &'static str {
    ffi::version()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duckdb_version() {
        let version = duckdb_version();
        assert!(
            version.starts_with('v'),
            "expected a vX.Y.Z version, got {}",
            version
        );
    }
}
