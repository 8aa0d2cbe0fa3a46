//! Consistency checks for bucket files
//!
//! This module provides:
//! - Parsing of raw bucket files, malformed lines included
//! - An invariant checking framework over single buckets
//! - A walker that checks every bucket under a data directory
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use wordsdict::testing::check_store;
//!
//! let violations = check_store("./data/wordsdict")?;
//! for v in &violations {
//!     eprintln!("{v}");
//! }
//! ```

pub mod bucket;
pub mod invariants;

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use bucket::{BucketContents, BucketLine};
pub use invariants::{
    check_all_invariants, default_invariants, EntriesInOwnBucket, IndicesInRange, Invariant,
    UniqueIndices, UniqueWordLang, Violation, WellFormedLines,
};

use crate::persistence::PartitionResolver;
use crate::Result;

/// Check one bucket file against the default invariants
pub fn check_bucket(path: &Path) -> Result<Vec<Violation>> {
    let bucket = BucketContents::read(path)?;
    Ok(check_all_invariants(&bucket, &default_invariants()))
}

/// Check every bucket file under `data_dir`, including that each one sits
/// in the directory its leading character resolves to.
pub fn check_store<P: AsRef<Path>>(data_dir: P) -> Result<Vec<Violation>> {
    let invariants = default_invariants();
    let mut violations = Vec::new();

    for dir in sorted_entries(data_dir.as_ref())? {
        let Some(dir_name) = dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !dir.is_dir() || !dir_name.starts_with("wd_") {
            continue;
        }

        for file in sorted_entries(&dir)? {
            if file.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            let bucket = BucketContents::read(&file)?;

            if let Some(leading) = bucket.leading {
                let expected = PartitionResolver::dir_name(leading);
                if expected != dir_name {
                    let mut context = HashMap::new();
                    context.insert("expected_dir".to_string(), expected);
                    violations.push(Violation {
                        invariant: "BucketInResolvedDirectory".to_string(),
                        description: format!("Bucket stored under {dir_name}"),
                        bucket: file.clone(),
                        violating_lines: vec![],
                        context,
                    });
                }
            }

            violations.extend(check_all_invariants(&bucket, &invariants));
        }
    }

    Ok(violations)
}

fn sorted_entries(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = match fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e),
    };
    paths.sort();
    Ok(paths)
}
