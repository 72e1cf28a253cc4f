//! Read path: `get()`, `list_keys()`, and `fold()`.
//!
//! A point lookup is one index probe plus one positioned read from the file
//! the position names. The whole lookup runs under the shared lock, so a
//! concurrent rollover cannot retire a file out from under the read.

use logfile::{LogRecord, LogRecordPos, RecordType};

use crate::{Engine, EngineError, FileSet, Result};

impl Engine {
    /// Returns the value stored under `key`.
    ///
    /// # Errors
    ///
    /// [`EngineError::KeyIsEmpty`] for a zero-length key;
    /// [`EngineError::KeyNotFound`] when the key is absent or its latest
    /// record is a tombstone.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        let files = self.files.read();

        if key.is_empty() {
            return Err(EngineError::KeyIsEmpty);
        }

        let pos = self.index.get(key).ok_or(EngineError::KeyNotFound)?;
        let record = Self::read_record_at(&files, pos)?;

        match record.rec_type {
            RecordType::Normal => Ok(record.value),
            RecordType::Tombstone => Err(EngineError::KeyNotFound),
        }
    }

    /// Returns every live key in ascending lexicographic order, as of the
    /// moment of the call.
    pub fn list_keys(&self) -> Vec<Vec<u8>> {
        let mut it = self.index.iterator(false);
        let mut keys = Vec::new();
        while it.valid() {
            keys.push(it.key().to_vec());
            it.next();
        }
        keys
    }

    /// Visits every live `(key, value)` pair in ascending key order until
    /// `f` returns `false`.
    ///
    /// The shared lock is held for the duration, so `f` should not call
    /// back into the engine's write operations.
    pub fn fold<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&[u8], Vec<u8>) -> bool,
    {
        let files = self.files.read();
        let mut it = self.index.iterator(false);
        while it.valid() {
            let record = Self::read_record_at(&files, it.value())?;
            if !f(it.key(), record.value) {
                break;
            }
            it.next();
        }
        Ok(())
    }

    /// Resolves `pos` to its data file and reads the record there.
    pub(crate) fn read_record_at(files: &FileSet, pos: LogRecordPos) -> Result<LogRecord> {
        let file = match &files.active {
            Some(active) if active.fid() == pos.fid => active,
            _ => files
                .older
                .get(&pos.fid)
                .ok_or(EngineError::DataFileNotFound)?,
        };
        let (record, _) = file.read_record(pos.offset)?;
        Ok(record)
    }
}
