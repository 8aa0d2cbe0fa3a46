//! Stable numeric indices for tokens of natural-language text.
//!
//! Integers, whitespace and single characters map to indices arithmetically.
//! Multi-character words are assigned indices from a range reserved for their
//! leading character and persisted in bucket files under a data directory.

pub mod config;
pub mod error;
pub mod indexer;
pub mod metrics;
pub mod models;
pub mod persistence;
pub mod testing;
pub mod tokenizer;

pub use config::{DictConfig, TokenizerConfig};
pub use error::{Result, WordsDictError};
pub use indexer::{classify, Classification, WordIndexer};
pub use models::*;
pub use tokenizer::{TokenGroups, Tokenizer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
