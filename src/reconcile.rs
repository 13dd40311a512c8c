//! Reconciliation Engine
//!
//! Merges queued additions and deletions into the fetched word list, rebuilds
//! the n-gram index from the merged set and diffs it against the fetched index.
//! Pure: nothing here touches the queue store or the remote.

use crate::index::NgramIndex;
use crate::ngrams::DEFAULT_WINDOWS;
use crate::wordlist::{serialize_words, WordSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One n-gram whose count moved. Absent on a side means 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NgramChange {
    pub ngram: String,
    pub before: u32,
    pub after: u32,
}

impl NgramChange {
    pub fn is_new(&self) -> bool {
        self.before == 0
    }

    pub fn is_removed(&self) -> bool {
        self.after == 0
    }
}

/// Every changed n-gram, sorted by n-gram.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub changes: Vec<NgramChange>,
}

impl ChangeSummary {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn get(&self, ngram: &str) -> Option<&NgramChange> {
        self.changes
            .binary_search_by(|c| c.ngram.as_str().cmp(ngram))
            .ok()
            .map(|i| &self.changes[i])
    }
}

/// Output of one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub merged: WordSet,
    pub index: NgramIndex,
    pub summary: ChangeSummary,
}

impl Reconciliation {
    /// Word list file contents for the remote.
    pub fn words_content(&self) -> String {
        serialize_words(&self.merged)
    }

    /// Index file contents for the remote.
    pub fn index_content(&self) -> String {
        self.index.serialize()
    }
}

/// `(fetched ∪ adds) − dels`. A word queued both ways ends up deleted.
pub fn merge(fetched: &WordSet, adds: &WordSet, dels: &WordSet) -> WordSet {
    fetched
        .iter()
        .chain(adds.iter())
        .filter(|word| !dels.contains(*word))
        .cloned()
        .collect()
}

/// Compare two indexes over the union of their keys.
pub fn diff(old: &NgramIndex, new: &NgramIndex) -> ChangeSummary {
    let keys: BTreeSet<&str> = old.keys().chain(new.keys()).collect();
    let changes = keys
        .into_iter()
        .filter_map(|ngram| {
            let before = old.count(ngram);
            let after = new.count(ngram);
            (before != after).then(|| NgramChange {
                ngram: ngram.to_string(),
                before,
                after,
            })
        })
        .collect();
    ChangeSummary { changes }
}

/// Merge, rebuild the index and diff it against `fetched_index`.
pub fn reconcile(
    adds: &WordSet,
    dels: &WordSet,
    fetched_words: &WordSet,
    fetched_index: &NgramIndex,
) -> Reconciliation {
    let merged = merge(fetched_words, adds, dels);
    let index = NgramIndex::build(&merged, &DEFAULT_WINDOWS);
    let summary = diff(fetched_index, &index);
    Reconciliation {
        merged,
        index,
        summary,
    }
}
