use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Largest token value encoded literally as an integer
pub const INTEGER_MAX: u64 = 0x1FFF_FFFF;

/// Base of the single-character range; also the empty sentinel
pub const SYMBOL_BASE: u64 = 0x2000_0000;

/// Number of slots reserved per leading character
pub const WORD_RANGE_SIZE: u64 = 0x0100_0000;

/// Indices at or above this value are resolved through bucket files
pub const FILE_LOOKUP_THRESHOLD: u64 = 0x2100_0000;

/// Decimal values starting with a digit that do not fit the integer range.
///
/// Nothing allocates into this block explicitly. It coincides with the word
/// ranges of the leading characters `'0'..='9'`, so over-long digit strings
/// land here through the regular word store.
pub const NUMERIC_RESERVED: RangeInclusive<u64> = 0x3000_0000..=0x39FF_FFFF;

/// Highest code point treated as a control or blank leading character
pub const CONTROL_MAX: u32 = 0x20;

/// Token category, tested in this order during classification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Integer,
    Empty,
    Symbol,
    Word,
}

/// Stable numeric identifier assigned to a token
///
/// 64 bits wide: the word range of the highest code point ends past `u32::MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WordIndex(pub u64);

impl WordIndex {
    /// Empty token, not found, or allocation overflow
    pub const EMPTY: WordIndex = WordIndex(SYMBOL_BASE);
    /// Start-of-text marker, injected by callers only
    pub const TEXT_START: WordIndex = WordIndex(0x2000_0002);
    /// End-of-text marker, injected by callers only
    pub const TEXT_END: WordIndex = WordIndex(0x2000_0003);

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    /// Index of a single-character token
    pub fn symbol(ch: char) -> Self {
        WordIndex(SYMBOL_BASE + ch as u64)
    }

    /// First slot of the range reserved for words starting with `leading`
    pub fn word_base(leading: char) -> Self {
        WordIndex(leading as u64 * WORD_RANGE_SIZE)
    }

    /// Exclusive end of the range reserved for words starting with `leading`
    pub fn word_limit(leading: char) -> Self {
        WordIndex(Self::word_base(leading).0 + WORD_RANGE_SIZE)
    }

    /// Whether this index requires a bucket file to resolve
    pub fn needs_lookup(self) -> bool {
        self.0 >= FILE_LOOKUP_THRESHOLD
    }

    pub fn is_numeric_reserved(self) -> bool {
        NUMERIC_RESERVED.contains(&self.0)
    }

    /// Decode the namespace region this index belongs to
    pub fn kind(self) -> IndexKind {
        let v = self.0;
        if v <= INTEGER_MAX {
            return IndexKind::Integer(v as u32);
        }
        if self == Self::EMPTY {
            return IndexKind::Empty;
        }
        if self == Self::TEXT_START {
            return IndexKind::TextStart;
        }
        if self == Self::TEXT_END {
            return IndexKind::TextEnd;
        }
        if v < FILE_LOOKUP_THRESHOLD {
            return u32::try_from(v - SYMBOL_BASE)
                .ok()
                .filter(|&cp| cp > CONTROL_MAX)
                .and_then(char::from_u32)
                .map_or(IndexKind::Unassigned, IndexKind::Symbol);
        }
        u32::try_from(v / WORD_RANGE_SIZE)
            .ok()
            .and_then(char::from_u32)
            .map_or(IndexKind::Unassigned, |leading| IndexKind::Word {
                leading,
                slot: (v % WORD_RANGE_SIZE) as u32,
            })
    }
}

impl fmt::Display for WordIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl From<WordIndex> for u64 {
    fn from(index: WordIndex) -> u64 {
        index.0
    }
}

/// Namespace region of an index, as decoded by [`WordIndex::kind`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexKind {
    Integer(u32),
    Empty,
    TextStart,
    TextEnd,
    Symbol(char),
    Word { leading: char, slot: u32 },
    /// Inside the namespace but never produced by classification
    Unassigned,
}
