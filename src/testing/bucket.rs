use std::path::{Path, PathBuf};

use crate::models::Entry;

/// One raw line of a bucket file
#[derive(Debug, Clone)]
pub struct BucketLine {
    /// 1-based line number
    pub number: usize,
    pub raw: String,
    /// `None` when the line is malformed
    pub entry: Option<Entry>,
}

/// Full contents of a bucket file, malformed lines included
#[derive(Debug, Clone)]
pub struct BucketContents {
    pub path: PathBuf,
    /// Leading character decoded from the `wd_<hex>.csv` file name
    pub leading: Option<char>,
    pub lines: Vec<BucketLine>,
}

impl BucketContents {
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::parse(
            path.to_path_buf(),
            &String::from_utf8_lossy(&bytes),
        ))
    }

    pub fn parse(path: PathBuf, content: &str) -> Self {
        let lines = content
            .split_inclusive('\n')
            .enumerate()
            .map(|(i, raw)| BucketLine {
                number: i + 1,
                raw: raw.to_string(),
                entry: Entry::parse_line(raw),
            })
            .collect();
        let leading = leading_from_file_name(&path);
        Self {
            path,
            leading,
            lines,
        }
    }

    /// Well-formed entries with their line numbers
    pub fn entries(&self) -> impl Iterator<Item = (usize, &Entry)> {
        self.lines
            .iter()
            .filter_map(|line| line.entry.as_ref().map(|entry| (line.number, entry)))
    }
}

/// Decode `wd_0x41.csv` into `'A'`
pub fn leading_from_file_name(path: &Path) -> Option<char> {
    let name = path.file_name()?.to_str()?;
    let hex = name.strip_prefix("wd_0x")?.strip_suffix(".csv")?;
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}
