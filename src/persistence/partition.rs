//! Mapping from a word's leading character to its bucket file.
//!
//! ```text
//! <data_dir>/
//! ├── wd_0xff/          # leading code points 0x21..=0xFF
//! │   ├── wd_0x41.csv
//! │   └── wd_0x61.csv
//! ├── wd_0xfff/         # 0x100..=0xFFF
//! ├── wd_0x1fff/        # 0x1000..=0x1FFF
//! └── ...               # one directory per further 0x1000 block
//! ```

use std::path::{Path, PathBuf};

use crate::error::WordsDictError;
use crate::models::index::CONTROL_MAX;
use crate::Result;

/// Leading code points up to this value share a single directory
const LATIN_DIR_MAX: u32 = 0xFF;
/// Code points above [`LATIN_DIR_MAX`] are grouped into blocks ending at `k * 0x1000 + 0xFFF`
const BLOCK_MASK: u32 = 0x0FFF;

/// Location of the bucket file for one leading character
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BucketLocation {
    pub leading: char,
    pub dir: PathBuf,
    pub file: PathBuf,
}

/// Resolves tokens to bucket locations under a fixed root. Pure; touches no files.
#[derive(Clone, Debug)]
pub struct PartitionResolver {
    root: PathBuf,
}

impl PartitionResolver {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory name for a leading character, e.g. `wd_0xff` or `wd_0x1fff`
    pub fn dir_name(leading: char) -> String {
        let cp = leading as u32;
        let upper = if cp <= LATIN_DIR_MAX {
            LATIN_DIR_MAX
        } else {
            cp | BLOCK_MASK
        };
        format!("wd_{:#x}", upper)
    }

    /// File name for a leading character, e.g. `wd_0x41.csv`
    pub fn file_name(leading: char) -> String {
        format!("wd_{:#x}.csv", leading as u32)
    }

    /// Bucket for a leading character, without checking it is printable
    pub fn locate(&self, leading: char) -> BucketLocation {
        let dir = self.root.join(Self::dir_name(leading));
        let file = dir.join(Self::file_name(leading));
        BucketLocation { leading, dir, file }
    }

    /// Resolve the bucket of a multi-character token with a printable leading character
    pub fn resolve(&self, token: &str) -> Result<BucketLocation> {
        let mut chars = token.chars();
        let leading = chars.next().ok_or(WordsDictError::EmptyToken)?;
        if chars.next().is_none() {
            return Err(WordsDictError::InvalidToken(format!(
                "single-character token {token:?} has no bucket"
            )));
        }
        if leading as u32 <= CONTROL_MAX {
            return Err(WordsDictError::InvalidToken(format!(
                "token {token:?} starts with a control or blank character"
            )));
        }
        Ok(self.locate(leading))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir_of(cp: u32) -> String {
        PartitionResolver::dir_name(char::from_u32(cp).unwrap())
    }

    #[test]
    fn test_ascii_word_path() {
        let resolver = PartitionResolver::new("/data");
        let loc = resolver.resolve("Apple").unwrap();
        assert_eq!(loc.leading, 'A');
        assert_eq!(loc.dir, PathBuf::from("/data/wd_0xff"));
        assert_eq!(loc.file, PathBuf::from("/data/wd_0xff/wd_0x41.csv"));
    }

    #[test]
    fn test_block_boundaries() {
        assert_eq!(dir_of(0x21), "wd_0xff");
        assert_eq!(dir_of(0xFF), "wd_0xff");
        assert_eq!(dir_of(0x100), "wd_0xfff");
        assert_eq!(dir_of(0xFFF), "wd_0xfff");
        assert_eq!(dir_of(0x1000), "wd_0x1fff");
        assert_eq!(dir_of(0x1234), "wd_0x1fff");
        assert_eq!(dir_of(0x1FFF), "wd_0x1fff");
        assert_eq!(dir_of(0x2000), "wd_0x2fff");
        assert_eq!(dir_of(0xFFFF), "wd_0xffff");
        assert_eq!(dir_of(0x10000), "wd_0x10fff");
        assert_eq!(dir_of(0x10FFFF), "wd_0x10ffff");
    }

    #[test]
    fn test_non_ascii_file_name() {
        let resolver = PartitionResolver::new("root");
        let loc = resolver.resolve("\u{1234}\u{1235}").unwrap();
        assert_eq!(loc.file, PathBuf::from("root/wd_0x1fff/wd_0x1234.csv"));

        let loc = resolver.resolve("жук").unwrap();
        assert_eq!(loc.file, PathBuf::from("root/wd_0xfff/wd_0x436.csv"));
    }

    #[test]
    fn test_unroutable_tokens() {
        let resolver = PartitionResolver::new("root");
        assert!(matches!(resolver.resolve(""), Err(WordsDictError::EmptyToken)));
        assert!(matches!(
            resolver.resolve("a"),
            Err(WordsDictError::InvalidToken(_))
        ));
        assert!(matches!(
            resolver.resolve("\u{1}ab"),
            Err(WordsDictError::InvalidToken(_))
        ));
    }
}
