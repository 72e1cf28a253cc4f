//! Write path: `put()`, `delete()`, and the locked append.
//!
//! All mutations flow through [`Engine::append_record_locked`]: encode the
//! frame, roll the active file over when it would grow past the configured
//! size, append, and optionally fsync. The caller keeps holding the writer
//! lock for the index update that follows, so the index never lags the log
//! for a concurrent reader.

use logfile::{encode_record, DataFile, LogRecord, LogRecordPos, RecordType};

use crate::{Engine, EngineError, FileSet, Result};

impl Engine {
    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// [`EngineError::KeyIsEmpty`] for a zero-length key; otherwise any
    /// append or index failure.
    pub fn put(&self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        if key.is_empty() {
            return Err(EngineError::KeyIsEmpty);
        }

        let record = LogRecord {
            key,
            value,
            rec_type: RecordType::Normal,
        };

        let mut files = self.files.write();
        let pos = self.append_record_locked(&mut files, &record)?;
        if !self.index.put(record.key, pos) {
            return Err(EngineError::IndexUpdateFailed);
        }
        Ok(())
    }

    /// Deletes `key` by appending a tombstone. Deleting an absent key is a
    /// successful no-op; nothing is appended.
    ///
    /// # Errors
    ///
    /// [`EngineError::KeyIsEmpty`] for a zero-length key; otherwise any
    /// append or index failure.
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        if key.is_empty() {
            return Err(EngineError::KeyIsEmpty);
        }

        let mut files = self.files.write();
        if self.index.get(key).is_none() {
            return Ok(());
        }

        let record = LogRecord {
            key: key.to_vec(),
            value: Vec::new(),
            rec_type: RecordType::Tombstone,
        };
        self.append_record_locked(&mut files, &record)?;

        if !self.index.delete(key) {
            return Err(EngineError::IndexUpdateFailed);
        }
        Ok(())
    }

    /// Appends `record` to the active data file, returning where it landed.
    ///
    /// Callers hold the writer lock (witnessed by `&mut FileSet`). The
    /// rollover threshold is evaluated once per record: a frame larger than
    /// `data_file_size` still goes to the freshly rolled, empty file.
    pub(crate) fn append_record_locked(
        &self,
        files: &mut FileSet,
        record: &LogRecord,
    ) -> Result<LogRecordPos> {
        if files.active.is_none() {
            files.active = Some(DataFile::open(&self.options.dir_path, 0)?);
        }
        let Some(active) = files.active.as_mut() else {
            unreachable!("active data file was just ensured");
        };

        let buf = encode_record(record);
        let size = buf.len() as u64;

        if active.write_offset() + size > self.options.data_file_size {
            // Make what the retiring file holds durable before moving on.
            active.sync()?;

            let next_fid = active.fid() + 1;
            let next = DataFile::open(&self.options.dir_path, next_fid)?;
            let old = std::mem::replace(active, next);
            tracing::debug!(
                retired_fid = old.fid(),
                active_fid = next_fid,
                "rolled over active data file"
            );
            files.older.insert(old.fid(), old);
        }

        let offset = active.write_offset();
        active.append(&buf)?;

        if self.options.sync_writes {
            active.sync()?;
        }

        Ok(LogRecordPos {
            fid: active.fid(),
            offset,
        })
    }
}
