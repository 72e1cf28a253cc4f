use std::fs;
use std::path::Path;

use crate::{Engine, IndexType, Options};

pub fn open_engine(dir: &Path, data_file_size: u64, sync_writes: bool) -> Engine {
    Engine::open(Options {
        dir_path: dir.to_path_buf(),
        data_file_size,
        sync_writes,
        index_type: IndexType::BTree,
    })
    .unwrap()
}

pub fn count_data_files(dir: &Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|s| s.to_str())
                .map(|ext| ext == "data")
                .unwrap_or(false)
        })
        .count()
}
