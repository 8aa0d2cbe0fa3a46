use crate::error::WordsDictError;
use crate::models::index::{CONTROL_MAX, INTEGER_MAX};
use crate::models::{Category, WordIndex};
use crate::Result;

/// Category of a token and its arithmetic index.
///
/// For [`Category::Word`] the index is the base of the leading character's
/// range, and the final index must come from the word store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub index: WordIndex,
}

impl Classification {
    fn new(category: Category, index: WordIndex) -> Self {
        Self { category, index }
    }

    pub fn needs_lookup(&self) -> bool {
        self.category == Category::Word
    }
}

/// Classify a token without touching storage.
///
/// Any whitespace anywhere in the token makes it `Empty`. Only tokens made
/// purely of ASCII digits are tried as integers; values above `0x1FFFFFFF`
/// fall through to the word rules.
pub fn classify(token: &str) -> Result<Classification> {
    let mut chars = token.chars();
    let leading = chars.next().ok_or(WordsDictError::EmptyToken)?;

    if token.chars().any(char::is_whitespace) {
        return Ok(Classification::new(Category::Empty, WordIndex::EMPTY));
    }
    if leading as u32 <= CONTROL_MAX {
        return Err(WordsDictError::InvalidToken(format!(
            "token {token:?} starts with a control character"
        )));
    }

    if token.bytes().all(|b| b.is_ascii_digit()) {
        if let Some(value) = token.parse::<u64>().ok().filter(|&v| v <= INTEGER_MAX) {
            return Ok(Classification::new(Category::Integer, WordIndex(value)));
        }
    }

    if chars.next().is_none() {
        return Ok(Classification::new(
            Category::Symbol,
            WordIndex::symbol(leading),
        ));
    }

    Ok(Classification::new(
        Category::Word,
        WordIndex::word_base(leading),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(token: &str) -> Classification {
        classify(token).unwrap()
    }

    #[test]
    fn test_integers() {
        assert_eq!(class("0"), Classification::new(Category::Integer, WordIndex(0)));
        assert_eq!(class("42").index, WordIndex(42));
        assert_eq!(class("007").index, WordIndex(7));
        assert_eq!(class("536870911").index, WordIndex(0x1FFF_FFFF));
        assert_eq!(class("536870911").category, Category::Integer);
    }

    #[test]
    fn test_large_integers_become_words() {
        let c = class("536870912");
        assert_eq!(c.category, Category::Word);
        assert_eq!(c.index, WordIndex::word_base('5'));

        // Too long for u64 as well
        let c = class("99999999999999999999999");
        assert_eq!(c.category, Category::Word);
        assert!(c.index.is_numeric_reserved());
    }

    #[test]
    fn test_alphanumeric_is_not_integer() {
        let c = class("3rd");
        assert_eq!(c.category, Category::Word);
        assert_eq!(c.index, WordIndex::word_base('3'));

        assert_eq!(class("abc123").category, Category::Word);
        assert_eq!(class("x").category, Category::Symbol);
        // Non-ASCII digits are not parsed as integers
        assert_eq!(class("٣٤").category, Category::Word);
    }

    #[test]
    fn test_whitespace_anywhere_is_empty() {
        for token in [" ", "\t", "a b", "word\n", "\u{00A0}x", "  lead"] {
            let c = class(token);
            assert_eq!(c.category, Category::Empty, "{token:?}");
            assert_eq!(c.index, WordIndex::EMPTY);
        }
    }

    #[test]
    fn test_symbols() {
        assert_eq!(class("!").index, WordIndex(0x2000_0021));
        assert_eq!(class("~").index, WordIndex(0x2000_007E));
        assert_eq!(class("5").category, Category::Integer);
        let c = class("€");
        assert_eq!(c.category, Category::Symbol);
        assert_eq!(c.index, WordIndex(0x2000_20AC));
        assert!(!c.needs_lookup());
    }

    #[test]
    fn test_words() {
        let c = class("Apple");
        assert_eq!(c.category, Category::Word);
        assert_eq!(c.index, WordIndex(0x4100_0000));
        assert!(c.needs_lookup());
        assert!(c.index.needs_lookup());
    }

    #[test]
    fn test_preconditions() {
        assert!(matches!(classify(""), Err(WordsDictError::EmptyToken)));
        assert!(matches!(
            classify("\u{1}"),
            Err(WordsDictError::InvalidToken(_))
        ));
        assert!(matches!(
            classify("\u{7}bell"),
            Err(WordsDictError::InvalidToken(_))
        ));
    }
}
