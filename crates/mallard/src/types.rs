//! The closed set of column types the wrapper supports.
//!
//! DuckDB's type system is much larger (lists, structs, maps, unions,
//! enums, the timestamp/time family, ...). This layer deliberately exposes
//! only the scalar subset below; anything else surfaces as
//! `Error::UnsupportedType` instead of silently misinterpreting bytes.

use crate::error::{Error, Result, UnsupportedTypeError};
use crate::ffi;

/// A supported result column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    UTinyInt,
    USmallInt,
    UInteger,
    UBigInt,
    HugeInt,
    Decimal,
    Float,
    Double,
    Varchar,
    Blob,
    Date,
}

impl LogicalType {
    /// Map a raw engine type id into the closed set, rejecting everything
    /// outside it.
    pub(crate) fn from_raw(raw: ffi::duckdb_type) -> Result<Self> {
        match raw {
            ffi::DUCKDB_TYPE_BOOLEAN => Ok(LogicalType::Boolean),
            ffi::DUCKDB_TYPE_TINYINT => Ok(LogicalType::TinyInt),
            ffi::DUCKDB_TYPE_SMALLINT => Ok(LogicalType::SmallInt),
            ffi::DUCKDB_TYPE_INTEGER => Ok(LogicalType::Integer),
            ffi::DUCKDB_TYPE_BIGINT => Ok(LogicalType::BigInt),
            ffi::DUCKDB_TYPE_UTINYINT => Ok(LogicalType::UTinyInt),
            ffi::DUCKDB_TYPE_USMALLINT => Ok(LogicalType::USmallInt),
            ffi::DUCKDB_TYPE_UINTEGER => Ok(LogicalType::UInteger),
            ffi::DUCKDB_TYPE_UBIGINT => Ok(LogicalType::UBigInt),
            ffi::DUCKDB_TYPE_HUGEINT => Ok(LogicalType::HugeInt),
            ffi::DUCKDB_TYPE_DECIMAL => Ok(LogicalType::Decimal),
            ffi::DUCKDB_TYPE_FLOAT => Ok(LogicalType::Float),
            ffi::DUCKDB_TYPE_DOUBLE => Ok(LogicalType::Double),
            ffi::DUCKDB_TYPE_VARCHAR => Ok(LogicalType::Varchar),
            ffi::DUCKDB_TYPE_BLOB => Ok(LogicalType::Blob),
            ffi::DUCKDB_TYPE_DATE => Ok(LogicalType::Date),
            other => Err(Error::UnsupportedType(UnsupportedTypeError { raw: other })),
        }
    }

    /// SQL-level name of this type.
    pub fn name(self) -> &'static str {
        match self {
            LogicalType::Boolean => "BOOLEAN",
            LogicalType::TinyInt => "TINYINT",
            LogicalType::SmallInt => "SMALLINT",
            LogicalType::Integer => "INTEGER",
            LogicalType::BigInt => "BIGINT",
            LogicalType::UTinyInt => "UTINYINT",
            LogicalType::USmallInt => "USMALLINT",
            LogicalType::UInteger => "UINTEGER",
            LogicalType::UBigInt => "UBIGINT",
            LogicalType::HugeInt => "HUGEINT",
            LogicalType::Decimal => "DECIMAL",
            LogicalType::Float => "FLOAT",
            LogicalType::Double => "DOUBLE",
            LogicalType::Varchar => "VARCHAR",
            LogicalType::Blob => "BLOB",
            LogicalType::Date => "DATE",
        }
    }
}

/// Name lookup for any raw engine type id, supported or not. Used by
/// `UnsupportedTypeError` so diagnostics can say *what* was rejected.
pub(crate) fn raw_type_name(raw: ffi::duckdb_type) -> &'static str {
    match raw {
        ffi::DUCKDB_TYPE_INVALID => "INVALID",
        ffi::DUCKDB_TYPE_BOOLEAN => "BOOLEAN",
        ffi::DUCKDB_TYPE_TINYINT => "TINYINT",
        ffi::DUCKDB_TYPE_SMALLINT => "SMALLINT",
        ffi::DUCKDB_TYPE_INTEGER => "INTEGER",
        ffi::DUCKDB_TYPE_BIGINT => "BIGINT",
        ffi::DUCKDB_TYPE_UTINYINT => "UTINYINT",
        ffi::DUCKDB_TYPE_USMALLINT => "USMALLINT",
        ffi::DUCKDB_TYPE_UINTEGER => "UINTEGER",
        ffi::DUCKDB_TYPE_UBIGINT => "UBIGINT",
        ffi::DUCKDB_TYPE_FLOAT => "FLOAT",
        ffi::DUCKDB_TYPE_DOUBLE => "DOUBLE",
        ffi::DUCKDB_TYPE_TIMESTAMP => "TIMESTAMP",
        ffi::DUCKDB_TYPE_DATE => "DATE",
        ffi::DUCKDB_TYPE_TIME => "TIME",
        ffi::DUCKDB_TYPE_INTERVAL => "INTERVAL",
        ffi::DUCKDB_TYPE_HUGEINT => "HUGEINT",
        ffi::DUCKDB_TYPE_VARCHAR => "VARCHAR",
        ffi::DUCKDB_TYPE_BLOB => "BLOB",
        ffi::DUCKDB_TYPE_DECIMAL => "DECIMAL",
        ffi::DUCKDB_TYPE_TIMESTAMP_S => "TIMESTAMP_S",
        ffi::DUCKDB_TYPE_TIMESTAMP_MS => "TIMESTAMP_MS",
        ffi::DUCKDB_TYPE_TIMESTAMP_NS => "TIMESTAMP_NS",
        ffi::DUCKDB_TYPE_ENUM => "ENUM",
        ffi::DUCKDB_TYPE_LIST => "LIST",
        ffi::DUCKDB_TYPE_STRUCT => "STRUCT",
        ffi::DUCKDB_TYPE_MAP => "MAP",
        ffi::DUCKDB_TYPE_UUID => "UUID",
        ffi::DUCKDB_TYPE_UNION => "UNION",
        ffi::DUCKDB_TYPE_BIT => "BIT",
        ffi::DUCKDB_TYPE_TIME_TZ => "TIME_TZ",
        ffi::DUCKDB_TYPE_TIMESTAMP_TZ => "TIMESTAMP_TZ",
        ffi::DUCKDB_TYPE_UHUGEINT => "UHUGEINT",
        ffi::DUCKDB_TYPE_ARRAY => "ARRAY",
        _ => "UNKNOWN",
    }
}
