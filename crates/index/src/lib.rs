//! # index - in-memory key directory
//!
//! Maps each live key to the on-disk position of its latest record. The
//! engine depends only on the [`Indexer`] capability set; realizations are
//! selected through [`IndexType`] at open time.
//!
//! Iteration is an auxiliary ordered view: [`Indexer::iterator`] snapshots
//! the current keys in lexicographic byte order and walks them forward or in
//! reverse, unaffected by later mutations.

mod btree;

pub use btree::BTreeIndex;
use logfile::LogRecordPos;

/// Available index realizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    /// Ordered B-tree keyed by raw bytes.
    BTree,
    /// Adaptive radix tree. Reserved; not yet implemented.
    Art,
}

/// Constructs the index realization for `typ`.
///
/// # Panics
///
/// Selecting [`IndexType::Art`] aborts: the variant is reserved and choosing
/// it is a programmer error, not a runtime condition.
pub fn new_indexer(typ: IndexType) -> Box<dyn Indexer> {
    match typ {
        IndexType::BTree => Box::new(BTreeIndex::new()),
        IndexType::Art => unimplemented!("adaptive radix tree index"),
    }
}

/// Point operations plus ordered iteration over key positions.
///
/// Implementations are internally synchronized so the trait can be used from
/// shared references; when driven through the engine, calls are additionally
/// serialized by the engine's own lock.
pub trait Indexer: Send + Sync {
    /// Inserts or replaces the position for `key`. Returns `true` on accept;
    /// replacement never fails.
    fn put(&self, key: Vec<u8>, pos: LogRecordPos) -> bool;

    /// Latest position recorded for `key`.
    fn get(&self, key: &[u8]) -> Option<LogRecordPos>;

    /// Removes `key`, returning whether an entry existed.
    fn delete(&self, key: &[u8]) -> bool;

    /// Ordered cursor over a snapshot of the current keys.
    fn iterator(&self, reverse: bool) -> Box<dyn IndexIterator>;
}

/// Cursor over an index snapshot.
///
/// The snapshot is taken when the iterator is constructed; mutations made to
/// the index afterwards are not observed. Dropping the iterator releases the
/// snapshot.
pub trait IndexIterator: Send {
    /// Repositions at the first element of the iteration.
    fn rewind(&mut self);

    /// Positions at the first element with key `>= target` (forward), or the
    /// first element with key `<= target` when walking largest-to-smallest
    /// (reverse). An exact match positions on the equal key either way.
    fn seek(&mut self, target: &[u8]);

    /// Advances one position in the iteration direction.
    fn next(&mut self);

    /// Whether the cursor currently indexes a live element.
    fn valid(&self) -> bool;

    /// Key at the cursor. Must only be called while [`valid`](Self::valid).
    fn key(&self) -> &[u8];

    /// Position at the cursor. Must only be called while
    /// [`valid`](Self::valid).
    fn value(&self) -> LogRecordPos;
}
