pub mod entry;
pub mod index;

pub use entry::Entry;
pub use index::{Category, IndexKind, WordIndex};
