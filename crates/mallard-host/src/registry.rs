//! The process-global table mapping numeric handles to open databases.

use mallard::Database;
use std::collections::HashMap;
use std::sync::Mutex;

/// Maps `f64` handles to open databases.
///
/// Handles are drawn from a monotonically increasing counter, so they are
/// exactly representable as doubles for any realistic number of opens and
/// never reused within a process.
pub struct HandleTable {
    entries: Mutex<State>,
}

struct State {
    databases: HashMap<u64, Database>,
    next: u64,
}

impl HandleTable {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(State {
                databases: HashMap::new(),
                // Zero is never a valid handle.
                next: 1,
            }),
        }
    }

    /// Store a database and return its handle.
    pub fn insert(&self, db: Database) -> f64 {
        let mut state = self.entries.lock().unwrap();
        let id = state.next;
        state.next += 1;
        state.databases.insert(id, db);
        id as f64
    }

    /// Release the database behind `handle`. Returns whether an entry was
    /// actually removed; the database closes as it drops here.
    pub fn remove(&self, handle: f64) -> bool {
        match decode(handle) {
            Some(id) => self.entries.lock().unwrap().databases.remove(&id).is_some(),
            None => false,
        }
    }

    /// Whether `handle` refers to a live entry.
    pub fn contains(&self, handle: f64) -> bool {
        match decode(handle) {
            Some(id) => self.entries.lock().unwrap().databases.contains_key(&id),
            None => false,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().databases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for HandleTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A handle is valid only if it is a finite positive integer-valued
/// double. NaN (the failure sentinel) and anything fractional map to
/// nothing.
fn decode(handle: f64) -> Option<u64> {
    if !handle.is_finite() || handle < 1.0 || handle.fract() != 0.0 {
        return None;
    }
    Some(handle as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove() {
        let table = HandleTable::new();
        assert!(table.is_empty());

        let db = Database::open_in_memory().unwrap();
        let h = table.insert(db);
        assert!(h >= 1.0);
        assert!(table.contains(h));
        assert_eq!(table.len(), 1);

        assert!(table.remove(h));
        assert!(!table.contains(h));
        // Second removal is a no-op.
        assert!(!table.remove(h));
    }

    #[test]
    fn test_handles_are_unique() {
        let table = HandleTable::new();
        let h1 = table.insert(Database::open_in_memory().unwrap());
        let h2 = table.insert(Database::open_in_memory().unwrap());
        assert!(h1 != h2);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(decode(f64::NAN), None);
        assert_eq!(decode(f64::INFINITY), None);
        assert_eq!(decode(0.0), None);
        assert_eq!(decode(-3.0), None);
        assert_eq!(decode(1.5), None);
        assert_eq!(decode(7.0), Some(7));
    }
}
