//! Cold-start recovery: discover the data files, then replay them in
//! ascending fid order to rebuild the in-memory index.
//!
//! Ascending order matters: a larger fid holds strictly later writes, and
//! within one file offsets are appended in time order, so replaying
//! ascending leaves the index pointing at the latest record for every key.

use std::fs;
use std::path::Path;

use index::Indexer;
use logfile::{DataFile, LogFileError, LogRecordPos, RecordType, DATA_FILE_SUFFIX};

use crate::{EngineError, FileSet, Result};

/// Scans `dir` for `*.data` files and opens them: the largest fid becomes
/// the active file, the rest go into the older set. Returns the fids in
/// ascending order.
///
/// # Errors
///
/// [`EngineError::DataDirectoryCorrupted`] when a `.data` name does not
/// parse as a numeric fid.
pub(crate) fn load_data_files(dir: &Path, files: &mut FileSet) -> Result<Vec<u32>> {
    let mut fids = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(stem) = name.strip_suffix(DATA_FILE_SUFFIX) {
            let fid: u32 = stem
                .parse()
                .map_err(|_| EngineError::DataDirectoryCorrupted)?;
            fids.push(fid);
        }
    }
    fids.sort_unstable();

    for (i, &fid) in fids.iter().enumerate() {
        let file = DataFile::open(dir, fid)?;
        if i == fids.len() - 1 {
            files.active = Some(file);
        } else {
            files.older.insert(fid, file);
        }
    }
    Ok(fids)
}

/// Replays every data file from offset 0, applying each record to `index`,
/// and restores the active file's write offset to the end of its replay.
///
/// A tombstone removes its key; whether the key was present is not an error
/// (the tombstone may follow the put in an earlier file that a prior
/// tombstone already covered).
///
/// # Errors
///
/// Any decode or I/O error other than end-of-stream aborts the open and
/// surfaces unchanged, CRC mismatches included.
pub(crate) fn load_index(files: &mut FileSet, fids: &[u32], index: &dyn Indexer) -> Result<()> {
    if fids.is_empty() {
        return Ok(());
    }

    for (i, &fid) in fids.iter().enumerate() {
        let is_active = i == fids.len() - 1;
        let file = if is_active {
            files.active.as_ref()
        } else {
            files.older.get(&fid)
        };
        let Some(file) = file else {
            return Err(EngineError::DataFileNotFound);
        };

        let mut offset = 0u64;
        loop {
            match file.read_record(offset) {
                Ok((record, size)) => {
                    let pos = LogRecordPos { fid, offset };
                    match record.rec_type {
                        RecordType::Normal => {
                            index.put(record.key, pos);
                        }
                        RecordType::Tombstone => {
                            index.delete(&record.key);
                        }
                    }
                    offset += size;
                }
                Err(LogFileError::EndOfFile) => break,
                Err(e) => return Err(e.into()),
            }
        }
        tracing::debug!(fid, end_offset = offset, "replayed data file");

        if is_active {
            if let Some(active) = files.active.as_mut() {
                active.set_write_offset(offset);
            }
        }
    }
    Ok(())
}
