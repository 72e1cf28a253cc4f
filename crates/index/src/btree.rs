use std::collections::BTreeMap;

use logfile::LogRecordPos;
use parking_lot::RwLock;

use crate::{IndexIterator, Indexer};

/// B-tree index over raw key bytes.
///
/// Backed by a `BTreeMap`, which compares `Vec<u8>` keys lexicographically,
/// the ordering the iterator contract promises. The internal lock keeps the
/// structure safe under direct concurrent use; the engine's own lock already
/// serializes calls made through it.
pub struct BTreeIndex {
    tree: RwLock<BTreeMap<Vec<u8>, LogRecordPos>>,
}

impl BTreeIndex {
    pub fn new() -> Self {
        Self {
            tree: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for BTreeIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl Indexer for BTreeIndex {
    fn put(&self, key: Vec<u8>, pos: LogRecordPos) -> bool {
        self.tree.write().insert(key, pos);
        true
    }

    fn get(&self, key: &[u8]) -> Option<LogRecordPos> {
        self.tree.read().get(key).copied()
    }

    fn delete(&self, key: &[u8]) -> bool {
        self.tree.write().remove(key).is_some()
    }

    fn iterator(&self, reverse: bool) -> Box<dyn IndexIterator> {
        let guard = self.tree.read();
        Box::new(BTreeIterator::new(&guard, reverse))
    }
}

/// Snapshot cursor over a [`BTreeIndex`].
///
/// The tree offers ascending and descending traversals but no resumable
/// positioned cursor, so the iterator materializes the items in iteration
/// order at construction time; `seek` is then a binary search.
struct BTreeIterator {
    /// Items in iteration order: ascending, or descending when `reverse`.
    items: Vec<(Vec<u8>, LogRecordPos)>,
    current: usize,
    reverse: bool,
}

impl BTreeIterator {
    fn new(tree: &BTreeMap<Vec<u8>, LogRecordPos>, reverse: bool) -> Self {
        let items: Vec<_> = if reverse {
            tree.iter().rev().map(|(k, p)| (k.clone(), *p)).collect()
        } else {
            tree.iter().map(|(k, p)| (k.clone(), *p)).collect()
        };
        Self {
            items,
            current: 0,
            reverse,
        }
    }
}

impl IndexIterator for BTreeIterator {
    fn rewind(&mut self) {
        self.current = 0;
    }

    fn seek(&mut self, target: &[u8]) {
        self.current = if self.reverse {
            // Descending order: skip keys greater than the target, landing on
            // the first key <= target (the equal key when present).
            self.items
                .partition_point(|(k, _)| k.as_slice() > target)
        } else {
            self.items
                .partition_point(|(k, _)| k.as_slice() < target)
        };
    }

    fn next(&mut self) {
        self.current += 1;
    }

    fn valid(&self) -> bool {
        self.current < self.items.len()
    }

    fn key(&self) -> &[u8] {
        &self.items[self.current].0
    }

    fn value(&self) -> LogRecordPos {
        self.items[self.current].1
    }
}
