//! # logfile - append-only data files
//!
//! A CoveKV directory holds a sequence of numbered data files
//! (`000000000.data`, `000000001.data`, …). Each file is an append-only run
//! of CRC-framed records; see [`format`] for the wire layout. [`DataFile`]
//! wraps one such file: it tracks the append offset for the writer and serves
//! positioned record reads for any number of readers.
//!
//! ## Example
//!
//! ```rust,no_run
//! use logfile::{DataFile, LogRecord, RecordType};
//!
//! let dir = std::path::Path::new("/tmp/cove");
//! let mut df = DataFile::open(dir, 0).unwrap();
//! let frame = logfile::encode_record(&LogRecord {
//!     key: b"hello".to_vec(),
//!     value: b"world".to_vec(),
//!     rec_type: RecordType::Normal,
//! });
//! df.append(&frame).unwrap();
//! let (rec, _len) = df.read_record(0).unwrap();
//! assert_eq!(rec.value, b"world");
//! ```

pub mod fio;
pub mod format;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use fio::FileIo;
pub use format::{
    decode_header, encode_record, record_crc, LogRecord, LogRecordPos, RecordHeader, RecordType,
    CRC_SIZE, MAX_HEADER_SIZE,
};

/// Extension shared by every data file in a directory.
pub const DATA_FILE_SUFFIX: &str = ".data";

/// Errors from reading or writing a data file.
#[derive(Debug, Error)]
pub enum LogFileError {
    /// An underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// A record's stored CRC does not match its contents.
    #[error("invalid crc, log record may be corrupted")]
    InvalidCrc,

    /// No record starts at the requested offset: the offset is at or past the
    /// end of the data, or only zeroed padding remains.
    #[error("end of data file reached")]
    EndOfFile,
}

pub type Result<T> = std::result::Result<T, LogFileError>;

/// One numbered log file.
///
/// `write_offset` equals the bytes appended through this handle since it was
/// opened (recovery overwrites it for the tail file after replay). Older
/// files are never written through; only the single active file is.
pub struct DataFile {
    fid: u32,
    write_offset: u64,
    io: Box<dyn FileIo>,
}

impl DataFile {
    /// Opens (or creates) the data file for `fid` inside `dir`.
    pub fn open(dir: &Path, fid: u32) -> Result<Self> {
        let path = Self::file_name(dir, fid);
        let io = fio::open_file_io(&path)?;
        Ok(Self {
            fid,
            write_offset: 0,
            io,
        })
    }

    /// Path of the data file for `fid`: the zero-padded 9-digit decimal fid
    /// plus [`DATA_FILE_SUFFIX`].
    pub fn file_name(dir: &Path, fid: u32) -> PathBuf {
        dir.join(format!("{:09}{}", fid, DATA_FILE_SUFFIX))
    }

    pub fn fid(&self) -> u32 {
        self.fid
    }

    pub fn write_offset(&self) -> u64 {
        self.write_offset
    }

    /// Overrides the append offset. Used by recovery once the tail file has
    /// been replayed to its true end.
    pub fn set_write_offset(&mut self, offset: u64) {
        self.write_offset = offset;
    }

    /// Appends an encoded frame and advances the write offset.
    pub fn append(&mut self, buf: &[u8]) -> Result<()> {
        let n = self.io.write(buf)?;
        self.write_offset += n as u64;
        Ok(())
    }

    /// Reads the record starting at `offset`, returning it together with the
    /// total frame length (header + key + value).
    ///
    /// # Errors
    ///
    /// - [`LogFileError::EndOfFile`] when `offset` is at or past the end of
    ///   the data, or the bytes there are zeroed end-of-file padding.
    /// - [`LogFileError::InvalidCrc`] when the frame's CRC does not match.
    /// - [`LogFileError::Io`] for adapter failures, including a truncated
    ///   key/value region.
    pub fn read_record(&self, offset: u64) -> Result<(LogRecord, u64)> {
        let file_size = self.io.size()?;
        if offset >= file_size {
            return Err(LogFileError::EndOfFile);
        }

        // Near the tail the full 15-byte header may not fit; read what's there.
        let header_cap = (MAX_HEADER_SIZE as u64).min(file_size - offset) as usize;
        let header_buf = self.read_n(header_cap, offset)?;

        let (header, header_size) = match decode_header(&header_buf) {
            Some(decoded) => decoded,
            None => return Err(LogFileError::EndOfFile),
        };

        // A zeroed header is file padding, not a record.
        if header.crc == 0 && header.key_size == 0 && header.value_size == 0 {
            return Err(LogFileError::EndOfFile);
        }

        let key_size = header.key_size as usize;
        let value_size = header.value_size as usize;
        let total = (header_size + key_size + value_size) as u64;

        let (key, value) = if key_size + value_size > 0 {
            let mut kv = self.read_n(key_size + value_size, offset + header_size as u64)?;
            let value = kv.split_off(key_size);
            (kv, value)
        } else {
            (Vec::new(), Vec::new())
        };

        let crc = record_crc(&header_buf[CRC_SIZE..header_size], &key, &value);
        if crc != header.crc {
            return Err(LogFileError::InvalidCrc);
        }
        // The type byte is covered by the CRC, so an unknown value here means
        // the file was written by something that is not us.
        let rec_type = RecordType::from_u8(header.type_byte).ok_or(LogFileError::InvalidCrc)?;

        Ok((
            LogRecord {
                key,
                value,
                rec_type,
            },
            total,
        ))
    }

    /// Flushes this file to stable storage.
    pub fn sync(&self) -> Result<()> {
        self.io.sync()?;
        Ok(())
    }

    /// Reads exactly `n` bytes at `offset`.
    fn read_n(&self, n: usize, offset: u64) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        let mut read = 0;
        while read < n {
            let got = self.io.read_at(&mut buf[read..], offset + read as u64)?;
            if got == 0 {
                return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
            }
            read += got;
        }
        Ok(buf)
    }
}
