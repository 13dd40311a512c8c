//! Remote word list file: one word per line, sorted.

use std::collections::BTreeSet;

/// A set of words. Ordered so every serialization comes out sorted.
pub type WordSet = BTreeSet<String>;

/// Parse the remote word list. Blank lines carry no word and are dropped.
pub fn parse_words(text: &str) -> WordSet {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Serialize sorted, newline-joined, without a trailing newline.
pub fn serialize_words(words: &WordSet) -> String {
    words
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}
