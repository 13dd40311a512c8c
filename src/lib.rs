//! wordsync: word list moderation queue
//!
//! Collects confirmed word list proposals, batches them, and on demand merges
//! the batch into a remote word list while regenerating its n-gram frequency
//! index.

pub mod announce;
pub mod bot;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod index;
pub mod logging;
pub mod ngrams;
pub mod queue;
pub mod reconcile;
pub mod remote;
pub mod sync;
pub mod wordlist;
