//! Error types for mallard operations.
//!
//! Every fallible wrapper operation returns `Result<T, Error>`; nothing is
//! swallowed. Failures are raised at the point the native call reports
//! non-success and carry the engine-provided diagnostic text when the C API
//! exposes one.

use std::fmt;

/// Convenient result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The primary error type for all mallard operations.
#[derive(Debug)]
pub enum Error {
    /// Opening the database failed.
    Open(OpenError),
    /// Attaching a connection to a live database failed.
    Connect(ConnectError),
    /// Executing a SQL statement failed.
    Query(QueryError),
    /// Creating a bulk-insert appender failed.
    AppendOpen(AppendError),
    /// Staging a value, ending a row, or flushing the appender failed.
    AppendRow(AppendError),
    /// A result column has a type outside the supported closed set.
    UnsupportedType(UnsupportedTypeError),
    /// A row or column index is outside the result's bounds.
    Range(RangeError),
    /// A path, SQL string, or identifier contains an interior NUL byte
    /// and cannot cross the C boundary.
    InvalidString(std::ffi::NulError),
}

/// Database open failure, with the engine's diagnostic when available.
#[derive(Debug)]
pub struct OpenError {
    /// The path that was opened, or `None` for an in-memory instance.
    pub path: Option<String>,
    pub message: String,
}

/// Connection attach failure. The C API reports no diagnostic text for
/// `duckdb_connect`, so the message is synthesized.
#[derive(Debug)]
pub struct ConnectError {
    pub message: String,
}

/// Query execution failure, carrying the offending SQL.
#[derive(Debug)]
pub struct QueryError {
    pub sql: String,
    pub message: String,
}

/// Appender failure, shared by open and row-level errors.
#[derive(Debug)]
pub struct AppendError {
    /// Target schema, or `None` for the engine default.
    pub schema: Option<String>,
    pub table: String,
    pub message: String,
}

/// A column reported a type the wrapper deliberately does not handle
/// (lists, structs, maps, timestamps, ...). The raw engine type id is kept
/// for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedTypeError {
    pub raw: u32,
}

impl UnsupportedTypeError {
    /// Human-readable name of the rejected engine type.
    pub fn type_name(&self) -> &'static str {
        crate::types::raw_type_name(self.raw)
    }
}

/// Out-of-range row or column access, with the actual result bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeError {
    pub row: u64,
    pub column: u64,
    pub row_count: u64,
    pub column_count: u64,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Open(e) => match &e.path {
                Some(path) => write!(f, "failed to open database '{}': {}", path, e.message),
                None => write!(f, "failed to open in-memory database: {}", e.message),
            },
            Error::Connect(e) => write!(f, "failed to connect: {}", e.message),
            Error::Query(e) => write!(f, "query failed: {}", e.message),
            Error::AppendOpen(e) => match &e.schema {
                Some(schema) => write!(
                    f,
                    "failed to open appender for {}.{}: {}",
                    schema, e.table, e.message
                ),
                None => write!(f, "failed to open appender for {}: {}", e.table, e.message),
            },
            Error::AppendRow(e) => write!(f, "append to {} failed: {}", e.table, e.message),
            Error::UnsupportedType(e) => {
                write!(f, "unsupported column type {} (id {})", e.type_name(), e.raw)
            }
            Error::Range(e) => write!(
                f,
                "cell ({}, {}) out of range for {} rows x {} columns",
                e.row, e.column, e.row_count, e.column_count
            ),
            Error::InvalidString(e) => write!(f, "string contains interior NUL byte: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidString(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::ffi::NulError> for Error {
    fn from(e: std::ffi::NulError) -> Self {
        Error::InvalidString(e)
    }
}
