mod tokenizer;

pub use tokenizer::{TokenGroups, Tokenizer};
