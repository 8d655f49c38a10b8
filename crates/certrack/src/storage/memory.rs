//! In-memory slot backend.

use std::collections::HashMap;

use crate::error::Result;

use super::Slot;

/// A [`Slot`] held entirely in memory.
///
/// Counts writes so callers can observe persistence side effects.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    values: HashMap<String, String>,
    writes: usize,
}

impl MemorySlot {
    /// Create an empty slot store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot store with `value` already stored under `key`.
    #[must_use]
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut values = HashMap::new();
        values.insert(key.into(), value.into());
        Self { values, writes: 0 }
    }

    /// Number of writes performed since creation.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Borrow the value stored under `key` without going through [`Slot::read`].
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl Slot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
