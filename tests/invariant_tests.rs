//! Integration tests for the bucket consistency checks
//!
//! These run real indexing workloads and verify the on-disk store with
//! the invariant framework.

use std::fs;

use tempfile::TempDir;

use wordsdict::config::DictConfig;
use wordsdict::testing::{check_bucket, check_store};
use wordsdict::WordIndexer;

fn invariant_names(violations: &[wordsdict::testing::Violation]) -> Vec<&str> {
    violations.iter().map(|v| v.invariant.as_str()).collect()
}

#[test]
fn test_clean_workload_has_no_violations() {
    let tmp = TempDir::new().unwrap();
    let dict = WordIndexer::open(DictConfig::new(tmp.path())).unwrap();

    let text = "Rust's ownership model, well-known 2nd-gen #1st-class rock&roll \
                перевод 日本語 _snake_case_ v1.2.3 don't don't";
    dict.index_text(text, "en").unwrap();
    dict.index_text(text, "de").unwrap();
    dict.index_text(text, "").unwrap();

    let violations = check_store(tmp.path()).unwrap();
    assert!(violations.is_empty(), "{violations:#?}");
}

#[test]
fn test_missing_store_is_clean() {
    let tmp = TempDir::new().unwrap();
    let violations = check_store(tmp.path().join("never-created")).unwrap();
    assert!(violations.is_empty());
}

#[test]
fn test_two_caching_writers_collide() {
    let tmp = TempDir::new().unwrap();
    let config = DictConfig::new(tmp.path()).with_bucket_cache(true);
    let a = WordIndexer::open(config.clone()).unwrap();
    let b = WordIndexer::open(config).unwrap();

    // Both load the empty bucket, then allocate from stale state
    assert!(a.check_index("kiwi", "").unwrap().is_empty());
    assert!(b.check_index("kumquat", "").unwrap().is_empty());
    let ka = a.get_index("kiwi", "").unwrap();
    let kb = b.get_index("kumquat", "").unwrap();
    assert_eq!(ka, kb);

    let bucket = a.resolver().resolve("kiwi").unwrap().file;
    let violations = check_bucket(&bucket).unwrap();
    assert_eq!(invariant_names(&violations), vec!["UniqueIndices"]);
    assert_eq!(violations[0].violating_lines, vec![1, 2]);
}

#[test]
fn test_detects_hand_edited_corruption() {
    let tmp = TempDir::new().unwrap();
    let dict = WordIndexer::open(DictConfig::new(tmp.path())).unwrap();
    let bucket = dict.resolver().resolve("pear").unwrap().file;

    dict.get_index("pear", "en").unwrap();
    let mut content = fs::read_to_string(&bucket).unwrap();
    content.push_str("pear\ten\t1879048193\n"); // second index for (pear, en)
    content.push_str("apple\t\t1879048194\n"); // wrong bucket
    content.push_str("plum\t\t12\n"); // outside the 'p' range
    content.push_str("peach\t\t18790"); // torn append
    fs::write(&bucket, content).unwrap();

    let violations = check_store(tmp.path()).unwrap();
    let mut names = invariant_names(&violations);
    names.sort_unstable();
    assert_eq!(
        names,
        vec![
            "EntriesInOwnBucket",
            "IndicesInRange",
            "UniqueWordLang",
            "WellFormedLines",
        ]
    );

    // Lookups keep working on the readable lines
    assert_eq!(dict.check_index("plum", "").unwrap().value(), 12);
}

#[test]
fn test_bucket_in_wrong_directory() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("wd_0xfff");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("wd_0x41.csv"), "Apple\t\t1090519040\n").unwrap();

    let violations = check_store(tmp.path()).unwrap();
    assert_eq!(invariant_names(&violations), vec!["BucketInResolvedDirectory"]);
    assert_eq!(
        violations[0].context.get("expected_dir").map(String::as_str),
        Some("wd_0xff")
    );
}
