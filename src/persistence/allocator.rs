use crate::models::index::WORD_RANGE_SIZE;
use crate::models::WordIndex;

/// Append-only allocator over one reserved index range `[base, base + range_size)`
///
/// Indices outside the range are ignored. Duplicates are harmless: only the
/// maximum matters.
#[derive(Clone, Debug)]
pub struct IndexAllocator {
    base: u64,
    range_size: u64,
    max_seen: Option<u64>,
}

impl IndexAllocator {
    pub fn new(base: WordIndex, range_size: u64) -> Self {
        Self {
            base: base.0,
            range_size,
            max_seen: None,
        }
    }

    /// Allocator over the full range of a leading character
    pub fn for_leading(leading: char) -> Self {
        Self::new(WordIndex::word_base(leading), WORD_RANGE_SIZE)
    }

    pub fn contains(&self, index: WordIndex) -> bool {
        index.0 >= self.base && index.0 - self.base < self.range_size
    }

    /// Record an index already present in the bucket
    pub fn observe(&mut self, index: WordIndex) {
        if self.contains(index) {
            self.max_seen = Some(self.max_seen.map_or(index.0, |max| max.max(index.0)));
        }
    }

    pub fn max_seen(&self) -> Option<WordIndex> {
        self.max_seen.map(WordIndex)
    }

    /// Next free index, or `None` once the range is exhausted
    pub fn next(&self) -> Option<WordIndex> {
        let candidate = match self.max_seen {
            Some(max) => max + 1,
            None => self.base,
        };
        (candidate - self.base < self.range_size).then_some(WordIndex(candidate))
    }
}
