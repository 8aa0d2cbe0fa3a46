use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, error, warn};

use crate::metrics::DictMetrics;
use crate::models::entry::{check_field, split_line};
use crate::models::{Entry, WordIndex};
use crate::persistence::IndexAllocator;
use crate::Result;

/// Result of an insert attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    Allocated(WordIndex),
    /// The reserved range is exhausted; nothing was written
    Overflow,
}

impl InsertOutcome {
    /// Allocated index, or the empty sentinel on overflow
    pub fn index(self) -> WordIndex {
        match self {
            InsertOutcome::Allocated(index) => index,
            InsertOutcome::Overflow => WordIndex::EMPTY,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScanStatus {
    Missing,
    Complete,
    /// Read failed part-way; callers treat the bucket as empty
    Degraded,
}

/// Parsed contents of one bucket file
#[derive(Debug, Default)]
struct BucketSnapshot {
    entries: Vec<Entry>,
}

/// Append-only store of `(word, lang) -> index` entries, one text file per bucket.
///
/// Every call opens, scans and closes the bucket file. There is no locking:
/// two writers appending to the same bucket can allocate the same index.
/// Callers must serialize writers per bucket.
pub struct WordStore {
    cache: Option<Mutex<HashMap<PathBuf, BucketSnapshot>>>,
    metrics: DictMetrics,
}

impl WordStore {
    /// Create a store. With `cache_buckets`, parsed buckets stay in memory and
    /// this process must be the only writer.
    pub fn new(cache_buckets: bool, metrics: DictMetrics) -> Self {
        Self {
            cache: cache_buckets.then(|| Mutex::new(HashMap::new())),
            metrics,
        }
    }

    /// Find the index recorded for `word`.
    ///
    /// A non-empty `lang` must match exactly; an empty `lang` takes the first
    /// line for `word` whatever its language.
    pub fn lookup(&self, path: &Path, word: &str, lang: &str) -> Option<WordIndex> {
        let matches = |w: &str, l: &str| w == word && (lang.is_empty() || l == lang);

        if let Some(cache) = &self.cache {
            let mut cache = cache.lock();
            let snapshot = self.cached_snapshot(&mut cache, path)?;
            return snapshot
                .entries
                .iter()
                .find(|entry| matches(&entry.word, &entry.lang))
                .map(|entry| entry.index);
        }

        let mut found = None;
        let status = scan_bucket(path, |w, l, index| {
            if matches(w, l) {
                found = Some(index);
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        });
        if status == ScanStatus::Degraded {
            self.metrics.record_degraded_read();
            return None;
        }
        found
    }

    /// Append `word` with the next free index in `[base, base + range_size)`.
    ///
    /// Does not check whether `word` is already present; callers look up first.
    /// Write failures are returned as errors.
    pub fn insert(
        &self,
        path: &Path,
        word: &str,
        lang: &str,
        base: WordIndex,
        range_size: u64,
    ) -> Result<InsertOutcome> {
        check_field("word", word)?;
        check_field("lang", lang)?;

        let mut allocator = IndexAllocator::new(base, range_size);

        if let Some(cache) = &self.cache {
            let mut cache = cache.lock();
            if let Some(snapshot) = self.cached_snapshot(&mut cache, path) {
                for entry in &snapshot.entries {
                    allocator.observe(entry.index);
                }
            }
            let Some(index) = allocator.next() else {
                return Ok(InsertOutcome::Overflow);
            };
            let entry = Entry::new(word, lang, index);
            append_entry(path, &entry)?;
            if let Some(snapshot) = cache.get_mut(path) {
                snapshot.entries.push(entry);
            }
            return Ok(InsertOutcome::Allocated(index));
        }

        let status = scan_bucket(path, |_, _, index| {
            allocator.observe(index);
            ControlFlow::Continue(())
        });
        if status == ScanStatus::Degraded {
            self.metrics.record_degraded_read();
            allocator = IndexAllocator::new(base, range_size);
        }

        let Some(index) = allocator.next() else {
            return Ok(InsertOutcome::Overflow);
        };
        append_entry(path, &Entry::new(word, lang, index))?;
        Ok(InsertOutcome::Allocated(index))
    }

    /// Drop all cached buckets, forcing the next access to re-read files
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.lock().clear();
        }
    }

    /// Load a bucket into the cache if absent. Degraded reads are not cached.
    fn cached_snapshot<'a>(
        &self,
        cache: &'a mut HashMap<PathBuf, BucketSnapshot>,
        path: &Path,
    ) -> Option<&'a BucketSnapshot> {
        if !cache.contains_key(path) {
            let mut snapshot = BucketSnapshot::default();
            let status = scan_bucket(path, |word, lang, index| {
                snapshot.entries.push(Entry::new(word, lang, index));
                ControlFlow::Continue(())
            });
            if status == ScanStatus::Degraded {
                self.metrics.record_degraded_read();
                return None;
            }
            debug!(
                bucket = %path.display(),
                entries = snapshot.entries.len(),
                "Cached bucket"
            );
            cache.insert(path.to_path_buf(), snapshot);
        }
        cache.get(path)
    }
}

/// Visit every structurally valid line of a bucket file in order.
/// Malformed and non-UTF-8 lines are skipped.
fn scan_bucket<F>(path: &Path, mut visit: F) -> ScanStatus
where
    F: FnMut(&str, &str, WordIndex) -> ControlFlow<()>,
{
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return ScanStatus::Missing,
        Err(e) => {
            warn!(bucket = %path.display(), error = %e, "Bucket unreadable, treating as empty");
            return ScanStatus::Degraded;
        }
    };

    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => return ScanStatus::Complete,
            Ok(_) => {}
            Err(e) => {
                warn!(bucket = %path.display(), error = %e, "Bucket read failed, treating as empty");
                return ScanStatus::Degraded;
            }
        }
        let Some((word, lang, index)) = std::str::from_utf8(&buf).ok().and_then(split_line)
        else {
            continue;
        };
        if visit(word, lang, index).is_break() {
            return ScanStatus::Complete;
        }
    }
}

/// Append one entry, creating the bucket directory and file as needed.
/// A torn last line is terminated first so the new entry stays parseable.
fn append_entry(path: &Path, entry: &Entry) -> io::Result<()> {
    let result = (|| {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;

        let mut line = entry.to_line();
        let len = file.metadata()?.len();
        if len > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::Start(len - 1))?;
            file.read_exact(&mut last)?;
            if last[0] != b'\n' {
                line.insert(0, '\n');
            }
        }
        file.write_all(line.as_bytes())
    })();

    if let Err(e) = &result {
        error!(
            bucket = %path.display(),
            word = %entry.word,
            error = %e,
            "Failed to append entry"
        );
    }
    result
}
