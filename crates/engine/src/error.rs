use logfile::LogFileError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A user operation was called with a zero-length key.
    #[error("the key is empty")]
    KeyIsEmpty,

    /// No live record exists for the key. The expected miss outcome of
    /// `get`, also returned when the latest record is a tombstone.
    #[error("key is not found in the database")]
    KeyNotFound,

    /// The index names a file id that is neither active nor older.
    #[error("data file is not found")]
    DataFileNotFound,

    /// The index rejected an insert or removal.
    #[error("failed to update index")]
    IndexUpdateFailed,

    /// A `.data` file name in the directory failed numeric parsing at open.
    #[error("database directory may be corrupted")]
    DataDirectoryCorrupted,

    /// Option validation failed at open.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// A data file read or write failed; includes CRC mismatches.
    #[error(transparent)]
    LogFile(#[from] LogFileError),

    /// An I/O error outside the data-file layer (directory handling).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
