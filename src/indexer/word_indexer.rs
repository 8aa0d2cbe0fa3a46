use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::DictConfig;
use crate::indexer::classifier::classify;
use crate::metrics::DictMetrics;
use crate::models::entry::check_field;
use crate::models::index::WORD_RANGE_SIZE;
use crate::models::{Category, WordIndex};
use crate::persistence::{BucketLocation, InsertOutcome, PartitionResolver, WordStore};
use crate::tokenizer::Tokenizer;
use crate::Result;

/// Resolves tokens to indices, allocating new word indices on demand.
///
/// Integers, whitespace and single characters are computed arithmetically.
/// Only multi-character words touch the bucket files under `data_dir`.
/// Not-found and overflow both come back as [`WordIndex::EMPTY`].
pub struct WordIndexer {
    config: DictConfig,
    resolver: PartitionResolver,
    store: WordStore,
    tokenizer: Tokenizer,
    metrics: DictMetrics,
}

impl WordIndexer {
    /// Open a dictionary. Bucket directories are created lazily on first insert.
    pub fn open(config: DictConfig) -> Result<Self> {
        config.validate()?;
        let metrics = DictMetrics::new()?;
        let tokenizer = Tokenizer::new(&config.tokenizer)?;

        info!(
            data_dir = %config.data_dir.display(),
            cache_buckets = config.cache_buckets,
            "Opening word dictionary"
        );

        Ok(Self {
            resolver: PartitionResolver::new(&config.data_dir),
            store: WordStore::new(config.cache_buckets, metrics.clone()),
            tokenizer,
            metrics,
            config,
        })
    }

    /// Index of `token` under `lang`, allocating one if the word is new.
    pub fn get_index(&self, token: &str, lang: &str) -> Result<WordIndex> {
        let Some(location) = self.word_location(token, lang)? else {
            return classify(token).map(|c| c.index);
        };

        if let Some(index) = self.lookup(&location, token, lang) {
            return Ok(index);
        }

        let base = WordIndex::word_base(location.leading);
        match self
            .store
            .insert(&location.file, token, lang, base, WORD_RANGE_SIZE)?
        {
            InsertOutcome::Allocated(index) => {
                self.metrics.record_allocation();
                info!(word = token, lang, index = %index, "Allocated word index");
                Ok(index)
            }
            InsertOutcome::Overflow => {
                self.metrics.record_overflow();
                warn!(
                    word = token,
                    leading = %location.leading,
                    "Word range exhausted, returning empty index"
                );
                Ok(WordIndex::EMPTY)
            }
        }
    }

    /// Index of `token` under `lang` without allocating; `EMPTY` if unknown.
    pub fn check_index(&self, token: &str, lang: &str) -> Result<WordIndex> {
        let Some(location) = self.word_location(token, lang)? else {
            return classify(token).map(|c| c.index);
        };
        Ok(self
            .lookup(&location, token, lang)
            .unwrap_or(WordIndex::EMPTY))
    }

    /// Normalize `text` and resolve every resulting token under `lang`
    pub fn index_text(&self, text: &str, lang: &str) -> Result<Vec<WordIndex>> {
        self.tokenizer
            .tokenize(text)
            .iter()
            .map(|token| self.get_index(token, lang))
            .collect()
    }

    /// Tokenization pass only, as newline-delimited text
    pub fn normalize(&self, text: &str) -> String {
        self.tokenizer.normalize(text)
    }

    pub fn config(&self) -> &DictConfig {
        &self.config
    }

    pub fn resolver(&self) -> &PartitionResolver {
        &self.resolver
    }

    pub fn metrics(&self) -> &DictMetrics {
        &self.metrics
    }

    /// Bucket for `token` if it classifies as a word, `None` otherwise
    fn word_location(&self, token: &str, lang: &str) -> Result<Option<BucketLocation>> {
        check_field("lang", lang)?;
        let classification = classify(token)?;
        if classification.category != Category::Word {
            return Ok(None);
        }
        let location = self.resolver.resolve(token)?;
        debug!(word = token, bucket = %location.file.display(), "Resolved bucket");
        Ok(Some(location))
    }

    fn lookup(&self, location: &BucketLocation, token: &str, lang: &str) -> Option<WordIndex> {
        let start = Instant::now();
        let found = self.store.lookup(&location.file, token, lang);
        self.metrics
            .record_lookup(found.is_some(), start.elapsed().as_secs_f64());
        debug!(word = token, lang, found = ?found, "Bucket lookup");
        found
    }
}
