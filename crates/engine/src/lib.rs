//! # Engine - CoveKV storage engine
//!
//! A Bitcask-style log-structured store: every mutation is appended to the
//! single active data file, an in-memory index maps each live key to the
//! position of its latest record, and reads are one index lookup plus one
//! positioned file read.
//!
//! ```text
//! Client
//!   |
//!   v
//! ┌────────────────────────────────────────────────┐
//! │                    ENGINE                      │
//! │                                                │
//! │ write.rs → encode → append to active file      │
//! │              |         (rollover at size cap)  │
//! │              v                                 │
//! │           index.put / index.delete             │
//! │                                                │
//! │ read.rs → index.get → positioned file read     │
//! │                                                │
//! │ recovery.rs → scan *.data ascending → rebuild  │
//! │               index, restore tail offset       │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Responsibilities
//!
//! | Module       | Purpose                                               |
//! |--------------|-------------------------------------------------------|
//! | `lib.rs`     | `Engine` struct, options, open/close, `Debug`, `Drop` |
//! | [`recovery`] | Data-file loading and index rebuild at open           |
//! | [`write`]    | `put()`, `delete()`, the locked append path           |
//! | [`read`]     | `get()`, `list_keys()`, `fold()`                      |
//!
//! ## Concurrency
//!
//! One readers-writer lock guards the file set. Writers hold it exclusively
//! across encode, rollover, append, optional fsync, **and** the index
//! update, so no reader can observe a record on disk without its index
//! entry. Readers share it for the index lookup plus the positioned read;
//! reads never block each other.

mod error;
mod read;
mod recovery;
mod write;

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use index::{new_indexer, Indexer};
use logfile::DataFile;
use parking_lot::RwLock;

pub use error::{EngineError, Result};
pub use index::IndexType;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct Options {
    /// Directory holding the data files. Created if missing.
    pub dir_path: PathBuf,
    /// Rollover threshold in bytes for the active data file.
    pub data_file_size: u64,
    /// If `true`, every successful append fsyncs before returning.
    pub sync_writes: bool,
    /// Index realization to use.
    pub index_type: IndexType,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            dir_path: PathBuf::from("covekv-data"),
            data_file_size: 256 * 1024 * 1024,
            sync_writes: false,
            index_type: IndexType::BTree,
        }
    }
}

impl Options {
    fn validate(&self) -> Result<()> {
        if self.dir_path.as_os_str().is_empty() {
            return Err(EngineError::InvalidOptions(
                "dir_path must not be empty".to_string(),
            ));
        }
        if self.data_file_size == 0 {
            return Err(EngineError::InvalidOptions(
                "data_file_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// The mutable file state guarded by the engine lock.
pub(crate) struct FileSet {
    /// The file currently receiving appends. `None` until the first write
    /// on a fresh directory.
    pub(crate) active: Option<DataFile>,
    /// Every previously active file, keyed by fid. Read-only.
    pub(crate) older: HashMap<u32, DataFile>,
}

/// The storage engine.
///
/// All operations take `&self`; share the engine between threads behind an
/// `Arc`.
pub struct Engine {
    pub(crate) options: Options,
    pub(crate) files: RwLock<FileSet>,
    pub(crate) index: Box<dyn Indexer>,
}

impl Engine {
    /// Opens the engine on `options.dir_path`, creating the directory if
    /// needed and rebuilding the index from the data files found there.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidOptions`] for an empty directory path or a
    ///   zero `data_file_size`.
    /// - [`EngineError::DataDirectoryCorrupted`] when a `.data` file name
    ///   does not parse as a file id.
    /// - Any CRC or I/O error encountered while replaying the files.
    pub fn open(options: Options) -> Result<Self> {
        options.validate()?;
        std::fs::create_dir_all(&options.dir_path)?;

        let index = new_indexer(options.index_type);
        let mut files = FileSet {
            active: None,
            older: HashMap::new(),
        };

        let fids = recovery::load_data_files(&options.dir_path, &mut files)?;
        recovery::load_index(&mut files, &fids, index.as_ref())?;

        tracing::info!(
            dir = %options.dir_path.display(),
            data_files = fids.len(),
            "engine opened"
        );

        Ok(Self {
            options,
            files: RwLock::new(files),
            index,
        })
    }

    /// Flushes the active data file to stable storage.
    pub fn sync(&self) -> Result<()> {
        let files = self.files.read();
        if let Some(active) = &files.active {
            active.sync()?;
        }
        Ok(())
    }

    /// Syncs outstanding writes. File handles are released when the engine
    /// is dropped.
    pub fn close(&self) -> Result<()> {
        self.sync()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let files = self.files.read();
        f.debug_struct("Engine")
            .field("dir", &self.options.dir_path)
            .field("data_file_size", &self.options.data_file_size)
            .field("sync_writes", &self.options.sync_writes)
            .field("active_fid", &files.active.as_ref().map(|a| a.fid()))
            .field(
                "active_offset",
                &files.active.as_ref().map(|a| a.write_offset()),
            )
            .field("older_files", &files.older.len())
            .finish()
    }
}

/// Best-effort sync on drop. Errors cannot propagate from `Drop`; anything
/// already appended is rebuilt from the log on the next open.
impl Drop for Engine {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests;
