//! The record store.
//!
//! [`RecordStore`] owns the in-memory certificate list and mirrors it into a
//! [`Slot`] under a single key. The slot is read once in [`RecordStore::load`]
//! and rewritten in full by every [`RecordStore::append`].

use tracing::{debug, info, warn};

use crate::certificate::Certificate;
use crate::config::CorruptPolicy;
use crate::error::{Error, Result};
use crate::storage::Slot;

/// Suffix of the key that receives unparseable slot content on reset.
pub const CORRUPT_BACKUP_SUFFIX: &str = ".corrupt";

/// Newest-first list of certificates mirrored to a slot.
#[derive(Debug)]
pub struct RecordStore<S> {
    slot: S,
    key: String,
    records: Vec<Certificate>,
    /// Highest numeric id seen, used to keep new ids unique.
    last_id: i64,
}

impl<S: Slot> RecordStore<S> {
    /// Load the store from `slot`.
    ///
    /// A missing key yields an empty store. Content that does not parse as a
    /// certificate array is handled according to `policy`.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read, or if the content is
    /// malformed and `policy` is [`CorruptPolicy::Fail`].
    pub fn load(mut slot: S, key: impl Into<String>, policy: CorruptPolicy) -> Result<Self> {
        let key = key.into();

        let records = match slot.read(&key)? {
            None => {
                debug!(key = %key, "Slot empty, starting with no records");
                Vec::new()
            }
            Some(raw) => match serde_json::from_str::<Vec<Certificate>>(&raw) {
                Ok(records) => {
                    debug!(key = %key, count = records.len(), "Loaded records");
                    records
                }
                Err(source) => match policy {
                    CorruptPolicy::Fail => return Err(Error::corrupt_slot(key, source)),
                    CorruptPolicy::Reset => {
                        let backup = back_up_corrupt(&mut slot, &key, &raw)?;
                        warn!(
                            key = %key,
                            backup = %backup,
                            error = %source,
                            "Slot content is malformed; backed it up and starting empty"
                        );
                        Vec::new()
                    }
                },
            },
        };

        let last_id = records
            .iter()
            .filter_map(|record| record.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);

        Ok(Self {
            slot,
            key,
            records,
            last_id,
        })
    }

    /// Insert `record` at the front and rewrite the slot.
    ///
    /// If the write fails the record is removed again, leaving the store as
    /// it was.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the slot write fails.
    pub fn append(&mut self, record: Certificate) -> Result<()> {
        if let Ok(id) = record.id.parse::<i64>() {
            self.last_id = self.last_id.max(id);
        }
        self.records.insert(0, record);

        if let Err(err) = self.save() {
            self.records.remove(0);
            return Err(err);
        }

        info!(
            id = %self.records[0].id,
            name = %self.records[0].name,
            total = self.records.len(),
            "Added certificate"
        );
        Ok(())
    }

    /// Serialize every record and overwrite the slot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the slot write fails.
    pub fn save(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.records)?;
        self.slot.write(&self.key, &json)
    }

    /// Issue a fresh record id from the current time in milliseconds.
    ///
    /// Ids are strictly increasing: if the clock has not moved past the newest
    /// id already issued or loaded, the next integer is used instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdsExhausted`] if the newest id is already `i64::MAX`.
    pub fn next_id(&mut self, now_millis: i64) -> Result<String> {
        let following = self
            .last_id
            .checked_add(1)
            .ok_or(Error::IdsExhausted { last: self.last_id })?;
        let id = now_millis.max(following);
        self.last_id = id;
        Ok(id.to_string())
    }

    /// All records, newest first.
    #[must_use]
    pub fn records(&self) -> &[Certificate] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Key of the backing slot.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow the backing slot.
    #[must_use]
    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Consume the store, returning the backing slot.
    #[must_use]
    pub fn into_slot(self) -> S {
        self.slot
    }
}

/// Copy unparseable slot content to a backup key and return that key.
///
/// Backups go to `<key>.corrupt`, then `<key>.corrupt.1`, `<key>.corrupt.2`
/// and so on. An earlier backup is never overwritten; content identical to an
/// existing backup is not stored twice.
fn back_up_corrupt<S: Slot>(slot: &mut S, key: &str, raw: &str) -> Result<String> {
    let base = format!("{key}{CORRUPT_BACKUP_SUFFIX}");
    let mut candidate = base.clone();
    let mut n = 0u32;
    loop {
        match slot.read(&candidate)? {
            None => {
                slot.write(&candidate, raw)?;
                return Ok(candidate);
            }
            Some(existing) if existing == raw => return Ok(candidate),
            Some(_) => {
                n += 1;
                candidate = format!("{base}.{n}");
            }
        }
    }
}
