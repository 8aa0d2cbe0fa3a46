use regex::Regex;

use crate::config::TokenizerConfig;
use crate::Result;

/// Letter/digit runs, optionally joined by apostrophes, hyphens or an ampersand
const WORD_SHAPE: &str = r"^(?:\w+|\w+-\w+|\w+'\w+|\w+'\w+'\w+|\w+-\w+-\w+|\w+&\w+)$";
/// Digit followed by word characters, with an optional joined suffix or percent sign
const NUMBERED_SHAPE: &str = r"^(?:\d\w+|\d\w*'\w+|\d\w*-\w+|\d\w*%)$";
/// `#` followed by a digit-leading shape
const HASHED_SHAPE: &str = r"^#(?:\d\w+|\d\w*'\w+|\d\w*-\w+)$";

/// Normalized tokens split into their emission groups
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenGroups {
    pub words: Vec<String>,
    pub numbered: Vec<String>,
    pub hashed: Vec<String>,
}

impl TokenGroups {
    /// Tokens in emission order: words, then digit-leading, then hash-leading
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words
            .iter()
            .chain(&self.numbered)
            .chain(&self.hashed)
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len() + self.numbered.len() + self.hashed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render as newline-delimited text. Each non-empty group ends with a newline.
    pub fn to_normalized(&self) -> String {
        let mut out = String::new();
        for group in [&self.words, &self.numbered, &self.hashed] {
            if group.is_empty() {
                continue;
            }
            out.push_str(&group.join("\n"));
            out.push('\n');
        }
        out
    }
}

/// Splits free-form text into the token stream consumed by the word indexer
pub struct Tokenizer {
    config: TokenizerConfig,
    whitespace: Regex,
    pure_digits: Regex,
    word_shape: Regex,
    numbered_shape: Regex,
    hashed_shape: Regex,
}

impl Tokenizer {
    /// Create a new tokenizer from configuration
    pub fn new(config: &TokenizerConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            whitespace: Regex::new(r"\s+")?,
            pure_digits: Regex::new(r"^\d+$")?,
            word_shape: Regex::new(WORD_SHAPE)?,
            numbered_shape: Regex::new(NUMBERED_SHAPE)?,
            hashed_shape: Regex::new(HASHED_SHAPE)?,
        })
    }

    /// Tokenize text into ordered groups.
    ///
    /// Each whitespace-separated candidate is dropped if it is purely digits,
    /// then loses its leading and trailing underscores and all periods. A
    /// candidate matching several shapes goes to the first of digit-leading,
    /// hash-leading, word. Candidates matching none are dropped.
    pub fn tokenize(&self, text: &str) -> TokenGroups {
        let mut groups = TokenGroups::default();

        for candidate in self.whitespace.split(text) {
            if candidate.is_empty() || self.pure_digits.is_match(candidate) {
                continue;
            }
            let token = candidate.trim_matches('_').replace('.', "");
            if token.is_empty() {
                continue;
            }

            let group = if self.numbered_shape.is_match(&token) {
                &mut groups.numbered
            } else if self.hashed_shape.is_match(&token) {
                &mut groups.hashed
            } else if self.word_shape.is_match(&token) {
                &mut groups.words
            } else {
                continue;
            };

            if let Some(token) = self.finish(token) {
                group.push(token);
            }
        }

        groups
    }

    /// Tokenize and render as newline-delimited text
    pub fn normalize(&self, text: &str) -> String {
        self.tokenize(text).to_normalized()
    }

    fn finish(&self, token: String) -> Option<String> {
        let token = if self.config.lowercase {
            token.to_lowercase()
        } else {
            token
        };
        match self.config.max_token_length {
            Some(max) if token.chars().count() > max => None,
            _ => Some(token),
        }
    }
}
