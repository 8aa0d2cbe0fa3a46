//! Persistence primitives: bucket partitioning, index allocation and the
//! append-only word store.

mod allocator;
mod partition;
mod word_store;

pub use allocator::IndexAllocator;
pub use partition::{BucketLocation, PartitionResolver};
pub use word_store::{InsertOutcome, WordStore};
