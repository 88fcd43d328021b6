//! Owned scalar values returned by the engine, and their conversions.
//!
//! `OwnedString` and `OwnedBlob` wrap engine-allocated memory and release
//! it through `duckdb_free` exactly once on drop; they are movable but not
//! copyable or cloneable, so ownership is never shared. `Date` is a plain
//! `Copy` newtype over the engine's day count (there is no allocation to
//! own) with calendar conversions delegated to the engine.

use crate::ffi;
use std::ffi::{CStr, c_char, c_void};
use std::fmt;
use std::ops::Deref;

/// A string value allocated by the engine.
///
/// Keeps the engine's allocation alive instead of copying it; use
/// `QueryResult::value_varchar` when an ordinary `String` is preferable.
pub struct OwnedString {
    ptr: *mut c_char,
    len: usize,
}

impl OwnedString {
    /// Take ownership of a NUL-terminated engine allocation. A null
    /// pointer (the engine's representation of a NULL cell) becomes the
    /// empty string.
    ///
    /// # Safety
    /// - `ptr` must be null or come from an engine call that allocates
    ///   with the engine's allocator (e.g. `duckdb_value_varchar`) and
    ///   must not be freed elsewhere.
    pub(crate) unsafe fn from_raw(ptr: *mut c_char) -> Self {
        let len = if ptr.is_null() {
            0
        } else {
            // SAFETY: caller guarantees a valid NUL-terminated allocation
            unsafe { CStr::from_ptr(ptr) }.to_bytes().len()
        };
        Self { ptr, len }
    }

    /// The string bytes, without the trailing NUL.
    pub fn as_bytes(&self) -> &[u8] {
        if self.ptr.is_null() {
            return &[];
        }
        // SAFETY: ptr is live for self's lifetime and len bytes were
        // measured at construction
        unsafe { std::slice::from_raw_parts(self.ptr.cast::<u8>(), self.len) }
    }

    /// View as `&str`. DuckDB guarantees VARCHAR data is valid UTF-8; a
    /// corrupt value degrades to the empty string rather than panicking.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Deref for OwnedString {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for OwnedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for OwnedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl PartialEq<str> for OwnedString {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for OwnedString {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Drop for OwnedString {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            // SAFETY: ptr was allocated by the engine and is released
            // here exactly once
            unsafe { ffi::duckdb_free(self.ptr.cast::<c_void>()) }
        }
    }
}

/// A binary blob allocated by the engine.
pub struct OwnedBlob {
    data: *mut c_void,
    size: usize,
}

impl OwnedBlob {
    /// Take ownership of a blob returned by `duckdb_value_blob`.
    ///
    /// # Safety
    /// - `raw.data` must be an engine allocation (or null for an empty
    ///   blob) that is not freed elsewhere.
    pub(crate) unsafe fn from_raw(raw: ffi::duckdb_blob) -> Self {
        Self {
            data: raw.data,
            size: raw.size as usize,
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        if self.data.is_null() || self.size == 0 {
            return &[];
        }
        // SAFETY: data is live for self's lifetime and size came from the
        // engine
        unsafe { std::slice::from_raw_parts(self.data.cast::<u8>(), self.size) }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

impl fmt::Debug for OwnedBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnedBlob({} bytes)", self.size)
    }
}

impl Drop for OwnedBlob {
    fn drop(&mut self) {
        if !self.data.is_null() {
            // SAFETY: data was allocated by the engine and is released
            // here exactly once
            unsafe { ffi::duckdb_free(self.data) }
        }
    }
}

/// A calendar date stored as days since 1970-01-01.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    days: i32,
}

/// A date decomposed into year, month, and day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub year: i32,
    /// 1-based month.
    pub month: u8,
    /// 1-based day of month.
    pub day: u8,
}

impl Date {
    pub fn from_days(days: i32) -> Self {
        Self { days }
    }

    /// Build a date from calendar fields via the engine's conversion.
    pub fn from_calendar(parts: DateParts) -> Self {
        let raw = ffi::duckdb_date_struct {
            year: parts.year,
            month: parts.month as i8,
            day: parts.day as i8,
        };
        // SAFETY: pure conversion, no handles involved
        let date = unsafe { ffi::duckdb_to_date(raw) };
        Self { days: date.days }
    }

    pub fn days(self) -> i32 {
        self.days
    }

    /// Decompose into calendar fields via the engine's conversion.
    pub fn to_calendar(self) -> DateParts {
        // SAFETY: pure conversion, no handles involved
        let raw = unsafe { ffi::duckdb_from_date(ffi::duckdb_date { days: self.days }) };
        DateParts {
            year: raw.year,
            month: raw.month as u8,
            day: raw.day as u8,
        }
    }

    pub(crate) fn from_ffi(raw: ffi::duckdb_date) -> Self {
        Self { days: raw.days }
    }

    pub(crate) fn to_ffi(self) -> ffi::duckdb_date {
        ffi::duckdb_date { days: self.days }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = self.to_calendar();
        write!(f, "{:04}-{:02}-{:02}", parts.year, parts.month, parts.day)
    }
}

/// A fixed-point decimal value read from a DECIMAL column.
///
/// The 128-bit `value` is scaled by `10^scale`; conversion to `f64` is
/// lossy for widths beyond the double mantissa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal {
    pub width: u8,
    pub scale: u8,
    pub value: i128,
}

impl Decimal {
    pub(crate) fn from_ffi(raw: ffi::duckdb_decimal) -> Self {
        Self {
            width: raw.width,
            scale: raw.scale,
            value: hugeint_to_i128(raw.value),
        }
    }

    /// Lossy conversion through the engine's own decimal-to-double routine.
    pub fn to_f64(self) -> f64 {
        let raw = ffi::duckdb_decimal {
            width: self.width,
            scale: self.scale,
            value: i128_to_hugeint(self.value),
        };
        // SAFETY: pure conversion, no handles involved
        unsafe { ffi::duckdb_decimal_to_double(raw) }
    }
}

/// Reassemble a HUGEINT from its split halves.
pub(crate) fn hugeint_to_i128(raw: ffi::duckdb_hugeint) -> i128 {
    (i128::from(raw.upper) << 64) | i128::from(raw.lower)
}

/// Split an i128 into the engine's HUGEINT halves.
pub(crate) fn i128_to_hugeint(value: i128) -> ffi::duckdb_hugeint {
    ffi::duckdb_hugeint {
        lower: value as u64,
        upper: (value >> 64) as i64,
    }
}
