//! Invariant checking framework for bucket files
//!
//! Each invariant inspects the parsed contents of one bucket file. The
//! single-writer constraint means concurrent appends can silently break
//! these; the checks only report, they never repair.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use super::bucket::BucketContents;
use crate::persistence::IndexAllocator;

/// A violation of an invariant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub invariant: String,
    pub description: String,
    pub bucket: PathBuf,
    pub violating_lines: Vec<usize>, // 1-based line numbers
    pub context: HashMap<String, String>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "INVARIANT VIOLATION: {}", self.invariant)?;
        writeln!(f, "  Bucket: {}", self.bucket.display())?;
        writeln!(f, "  Description: {}", self.description)?;
        writeln!(f, "  Violating lines: {:?}", self.violating_lines)?;
        if !self.context.is_empty() {
            writeln!(f, "  Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "    {}: {}", key, value)?;
            }
        }
        Ok(())
    }
}

/// Trait for invariant checkers
pub trait Invariant: Send + Sync {
    /// Name of the invariant
    fn name(&self) -> &str;

    /// Check the invariant against one bucket
    fn check(&self, bucket: &BucketContents) -> Result<(), Violation>;

    /// Human-readable description
    fn description(&self) -> &str {
        "No description provided"
    }
}

/// All invariants every bucket file should satisfy
pub fn default_invariants() -> Vec<Box<dyn Invariant>> {
    vec![
        Box::new(WellFormedLines),
        Box::new(IndicesInRange),
        Box::new(EntriesInOwnBucket),
        Box::new(UniqueWordLang),
        Box::new(UniqueIndices),
    ]
}

/// Check all invariants and return violations
pub fn check_all_invariants(
    bucket: &BucketContents,
    invariants: &[Box<dyn Invariant>],
) -> Vec<Violation> {
    invariants
        .iter()
        .filter_map(|invariant| invariant.check(bucket).err())
        .collect()
}

fn violation(
    invariant: &dyn Invariant,
    bucket: &BucketContents,
    description: String,
    violating_lines: Vec<usize>,
) -> Violation {
    Violation {
        invariant: invariant.name().to_string(),
        description,
        bucket: bucket.path.clone(),
        violating_lines,
        context: HashMap::new(),
    }
}

/// Invariant: every line parses as `word\tlang\tindex\n`
pub struct WellFormedLines;

impl Invariant for WellFormedLines {
    fn name(&self) -> &str {
        "WellFormedLines"
    }

    fn description(&self) -> &str {
        "Every line holds a word, a language tag and a decimal index"
    }

    fn check(&self, bucket: &BucketContents) -> Result<(), Violation> {
        let malformed: Vec<usize> = bucket
            .lines
            .iter()
            .filter(|line| line.entry.is_none())
            .map(|line| line.number)
            .collect();

        if malformed.is_empty() {
            return Ok(());
        }
        Err(violation(
            self,
            bucket,
            format!("{} malformed lines", malformed.len()),
            malformed,
        ))
    }
}

/// Invariant: every index lies in the leading character's reserved range
pub struct IndicesInRange;

impl Invariant for IndicesInRange {
    fn name(&self) -> &str {
        "IndicesInRange"
    }

    fn description(&self) -> &str {
        "Every index lies in the range reserved for the bucket's leading character"
    }

    fn check(&self, bucket: &BucketContents) -> Result<(), Violation> {
        let Some(leading) = bucket.leading else {
            return Ok(());
        };
        let allocator = IndexAllocator::for_leading(leading);
        let outside: Vec<usize> = bucket
            .entries()
            .filter(|(_, entry)| !allocator.contains(entry.index))
            .map(|(number, _)| number)
            .collect();

        if outside.is_empty() {
            return Ok(());
        }
        let mut v = violation(
            self,
            bucket,
            format!("{} indices outside the range of {:?}", outside.len(), leading),
            outside,
        );
        v.context.insert("leading".to_string(), format!("{:#x}", leading as u32));
        Err(v)
    }
}

/// Invariant: every word starts with the bucket's leading character
pub struct EntriesInOwnBucket;

impl Invariant for EntriesInOwnBucket {
    fn name(&self) -> &str {
        "EntriesInOwnBucket"
    }

    fn description(&self) -> &str {
        "Every word starts with the character its bucket file is named after"
    }

    fn check(&self, bucket: &BucketContents) -> Result<(), Violation> {
        let Some(leading) = bucket.leading else {
            return Ok(());
        };
        let misplaced: Vec<usize> = bucket
            .entries()
            .filter(|(_, entry)| !entry.word.starts_with(leading))
            .map(|(number, _)| number)
            .collect();

        if misplaced.is_empty() {
            return Ok(());
        }
        Err(violation(
            self,
            bucket,
            format!("{} words filed under the wrong bucket", misplaced.len()),
            misplaced,
        ))
    }
}

/// Invariant: a `(word, lang)` pair maps to at most one index
pub struct UniqueWordLang;

impl Invariant for UniqueWordLang {
    fn name(&self) -> &str {
        "UniqueWordLang"
    }

    fn description(&self) -> &str {
        "No (word, lang) pair is recorded twice"
    }

    fn check(&self, bucket: &BucketContents) -> Result<(), Violation> {
        let mut first_seen: HashMap<(&str, &str), usize> = HashMap::new();
        let mut duplicates = Vec::new();

        for (number, entry) in bucket.entries() {
            let key = (entry.word.as_str(), entry.lang.as_str());
            if let Some(&first) = first_seen.get(&key) {
                duplicates.push(first);
                duplicates.push(number);
            } else {
                first_seen.insert(key, number);
            }
        }

        if duplicates.is_empty() {
            return Ok(());
        }
        duplicates.sort_unstable();
        duplicates.dedup();
        Err(violation(
            self,
            bucket,
            "Same (word, lang) recorded on several lines".to_string(),
            duplicates,
        ))
    }
}

/// Invariant: indices are never reused within a bucket
pub struct UniqueIndices;

impl Invariant for UniqueIndices {
    fn name(&self) -> &str {
        "UniqueIndices"
    }

    fn description(&self) -> &str {
        "No index is assigned to more than one line"
    }

    fn check(&self, bucket: &BucketContents) -> Result<(), Violation> {
        let mut first_seen: HashMap<u64, usize> = HashMap::new();
        let mut duplicates = Vec::new();

        for (number, entry) in bucket.entries() {
            if let Some(&first) = first_seen.get(&entry.index.0) {
                duplicates.push(first);
                duplicates.push(number);
            } else {
                first_seen.insert(entry.index.0, number);
            }
        }

        if duplicates.is_empty() {
            return Ok(());
        }
        duplicates.sort_unstable();
        duplicates.dedup();
        Err(violation(
            self,
            bucket,
            "Index assigned to several lines".to_string(),
            duplicates,
        ))
    }
}
