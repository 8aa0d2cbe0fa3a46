use serde::{Deserialize, Serialize};

use super::index::WordIndex;
use crate::error::WordsDictError;
use crate::Result;

const FIELD_SEPARATOR: char = '\t';
const LINE_TERMINATOR: char = '\n';

/// One persisted `(word, lang, index)` mapping
///
/// Line format: `<word>\t<lang>\t<index>\n`, index in base 10.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub word: String,
    pub lang: String,
    pub index: WordIndex,
}

impl Entry {
    pub fn new(word: impl Into<String>, lang: impl Into<String>, index: WordIndex) -> Self {
        Self {
            word: word.into(),
            lang: lang.into(),
            index,
        }
    }

    /// Render the entry as a bucket file line, terminator included
    pub fn to_line(&self) -> String {
        format!(
            "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}{LINE_TERMINATOR}",
            self.word, self.lang, self.index.0
        )
    }

    /// Parse a full line as read from a bucket file.
    ///
    /// Returns `None` for malformed lines, including a trailing line without
    /// its terminator (a torn append).
    pub fn parse_line(line: &str) -> Option<Self> {
        split_line(line).map(|(word, lang, index)| Self::new(word, lang, index))
    }
}

/// Borrowing variant of [`Entry::parse_line`] used by scans
pub(crate) fn split_line(line: &str) -> Option<(&str, &str, WordIndex)> {
    let body = line.strip_suffix(LINE_TERMINATOR)?;
    let mut fields = body.splitn(3, FIELD_SEPARATOR);
    let word = fields.next().filter(|w| !w.is_empty())?;
    let lang = fields.next()?;
    let index = fields.next()?.parse::<u64>().ok()?;
    Some((word, lang, WordIndex(index)))
}

/// Reject values the line format cannot represent
pub(crate) fn check_field(name: &str, value: &str) -> Result<()> {
    if value.contains([FIELD_SEPARATOR, LINE_TERMINATOR, '\r']) {
        return Err(WordsDictError::InvalidToken(format!(
            "{name} {value:?} contains a field or line separator"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_format() {
        let entry = Entry::new("bank", "en", WordIndex(0x6200_0003));
        assert_eq!(entry.to_line(), "bank\ten\t1644167171\n");

        let untagged = Entry::new("bank", "", WordIndex(0x6200_0000));
        assert_eq!(untagged.to_line(), "bank\t\t1644167168\n");
        assert_eq!(Entry::parse_line(&untagged.to_line()), Some(untagged));
    }

    #[test]
    fn test_malformed_lines_rejected() {
        assert_eq!(Entry::parse_line("bank\ten\t12"), None);
        assert_eq!(Entry::parse_line("bank\ten\n"), None);
        assert_eq!(Entry::parse_line("bank\n"), None);
        assert_eq!(Entry::parse_line("\ten\t12\n"), None);
        assert_eq!(Entry::parse_line("bank\ten\tx12\n"), None);
        assert_eq!(Entry::parse_line("bank\ten\t12\t7\n"), None);
        assert_eq!(Entry::parse_line("\n"), None);
    }

    #[test]
    fn test_check_field() {
        assert!(check_field("word", "don't").is_ok());
        assert!(check_field("lang", "").is_ok());
        assert!(check_field("word", "a\tb").is_err());
        assert!(check_field("lang", "en\n").is_err());
    }
}
