//! Token classification and the word indexer that combines it with the
//! bucket store.

pub mod classifier;
mod word_indexer;

pub use classifier::{classify, Classification};
pub use word_indexer::WordIndexer;
