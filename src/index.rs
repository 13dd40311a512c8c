//! N-gram frequency index
//!
//! Maps each n-gram to the number of distinct words containing it. N-grams
//! with an apostrophe or a hyphen are never indexed.

use crate::error::IndexError;
use crate::ngrams::ngrams;
use std::collections::{BTreeMap, HashSet};

/// Characters that exclude an n-gram from the index.
pub const EXCLUDED_CHARS: [char; 2] = ['\'', '-'];

/// N-gram to word count. Every stored count is at least 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NgramIndex {
    counts: BTreeMap<String, u32>,
}

/// Whether an n-gram is kept out of the index.
pub fn is_excluded(ngram: &str) -> bool {
    ngram.contains(&EXCLUDED_CHARS[..])
}

impl NgramIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count, per n-gram, how many of `words` contain it at least once.
    pub fn build<'a, I>(words: I, windows: &[usize]) -> Self
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut counts: BTreeMap<String, u32> = BTreeMap::new();
        for word in words {
            let distinct: HashSet<&str> = ngrams(word, windows)
                .filter(|gram| !is_excluded(gram))
                .collect();
            for gram in distinct {
                *counts.entry(gram.to_string()).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    /// Parse the remote `ngram:count` file.
    ///
    /// Every line must be `key:count`; a line without a `:` separator (blank
    /// lines included), or whose count is not a non-negative integer, fails
    /// the whole parse. The trailing newline ends the last line and is not a
    /// line of its own. The count is read after the last `:` so keys
    /// containing a colon survive. Zero counts are accepted but not
    /// materialized.
    pub fn parse(text: &str) -> Result<Self, IndexError> {
        let mut counts = BTreeMap::new();
        for (idx, line) in text.lines().enumerate() {
            let malformed = || IndexError::MalformedLine {
                line_number: idx + 1,
                line: line.to_string(),
            };
            let (key, count) = line.rsplit_once(':').ok_or_else(malformed)?;
            let count: u32 = count.trim().parse().map_err(|_| malformed())?;
            if count > 0 {
                counts.insert(key.to_string(), count);
            }
        }
        Ok(Self { counts })
    }

    /// One `ngram:count` line per entry, ascending by count, ties by n-gram.
    pub fn serialize(&self) -> String {
        let mut entries: Vec<(&String, &u32)> = self.counts.iter().collect();
        // Stable sort keeps the lexicographic order from the BTreeMap for ties.
        entries.sort_by_key(|(_, count)| **count);
        let mut out = String::new();
        for (gram, count) in entries {
            out.push_str(gram);
            out.push(':');
            out.push_str(&count.to_string());
            out.push('\n');
        }
        out
    }

    /// Count for an n-gram, 0 when absent.
    pub fn count(&self, ngram: &str) -> u32 {
        self.counts.get(ngram).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }
}
