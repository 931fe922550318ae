//! Unigram and bigram frequency store backed by an open-addressing index.
//!
//! [`VocabularyStore`] is the mutable form used while streaming the corpus: it supports
//! lookup, insertion, counting and lossy incremental pruning. [`VocabularyStore::finalize`]
//! sorts and hard-prunes it into a read-only [`Vocabulary`] consumed by the emission pass.
//!
//! Entries are addressed by their position in a growable array. The index stores positions
//! only, and is rebuilt from scratch whenever positions change.

use std::cmp::Reverse;

use crate::error::{PhrasalError, Result};
use crate::metrics::ReductionMetrics;

mod index;

use index::SlotIndex;

/// Position of the line-boundary entry. It is never pruned, moved, or sorted.
pub const BOUNDARY_POSITION: usize = 0;

/// Token bytes of the boundary entry. No real token or bigram key is empty.
pub const BOUNDARY_TOKEN: &[u8] = b"";

const INITIAL_ENTRY_CAPACITY: usize = 10_000;
const ENTRY_GROWTH: usize = 10_000;

/// A token (or bigram key) and the number of times it was counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabEntry {
    token: Vec<u8>,
    frequency: u64,
}

impl VocabEntry {
    pub(crate) fn new(token: &[u8]) -> Self {
        Self {
            token: token.to_vec(),
            frequency: 0,
        }
    }

    /// Raw token bytes.
    #[must_use]
    pub fn token(&self) -> &[u8] {
        &self.token
    }

    /// Occurrence count.
    #[must_use]
    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    /// Returns `true` for the line-boundary entry.
    #[must_use]
    pub fn is_boundary(&self) -> bool {
        self.token.is_empty()
    }
}

/// Mutable vocabulary populated during the learning pass.
#[derive(Debug, Clone)]
pub struct VocabularyStore {
    entries: Vec<VocabEntry>,
    index: SlotIndex,
    min_reduce: u64,
}

impl VocabularyStore {
    /// Creates a store with `hash_capacity` index slots and the boundary entry at position 0.
    pub fn new(hash_capacity: usize) -> Result<Self> {
        if hash_capacity == 0 {
            return Err(PhrasalError::InvalidConfig(
                "hash_capacity must be greater than zero".into(),
            ));
        }
        let mut store = Self {
            entries: Vec::with_capacity(INITIAL_ENTRY_CAPACITY),
            index: SlotIndex::with_capacity(hash_capacity),
            min_reduce: 1,
        };
        let boundary = store.insert(BOUNDARY_TOKEN)?;
        debug_assert_eq!(boundary, BOUNDARY_POSITION);
        Ok(store)
    }

    /// Returns the position of `token`, if present.
    #[must_use]
    pub fn lookup(&self, token: &[u8]) -> Option<usize> {
        self.index.find(token, &self.entries)
    }

    /// Appends `token` with frequency 0 and indexes it. The caller ensures it is absent.
    pub fn insert(&mut self, token: &[u8]) -> Result<usize> {
        let position = self.entries.len();
        self.index.place(token, position)?;
        self.entries.push(VocabEntry::new(token));
        if self.entries.len() + 2 >= self.entries.capacity() {
            self.entries.reserve_exact(ENTRY_GROWTH);
        }
        Ok(position)
    }

    /// Adds one occurrence to the entry at `position`.
    pub fn increment(&mut self, position: usize) {
        self.entries[position].frequency += 1;
    }

    /// Looks `token` up, inserting it first when absent, then counts one occurrence.
    pub fn count(&mut self, token: &[u8]) -> Result<usize> {
        let position = match self.lookup(token) {
            Some(position) => position,
            None => self.insert(token)?,
        };
        self.increment(position);
        Ok(position)
    }

    /// Frequency of the entry at `position`.
    #[must_use]
    pub fn frequency(&self, position: usize) -> u64 {
        self.entries[position].frequency
    }

    /// Entries in position order, boundary first.
    #[must_use]
    pub fn entries(&self) -> &[VocabEntry] {
        &self.entries
    }

    /// Number of live entries including the boundary.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: the boundary entry is present from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fixed slot count of the index.
    #[must_use]
    pub fn hash_capacity(&self) -> usize {
        self.index.capacity()
    }

    /// Threshold the next [`VocabularyStore::reduce`] call will apply.
    #[must_use]
    pub fn next_reduce_threshold(&self) -> u64 {
        self.min_reduce
    }

    /// Drops every entry with `frequency <= threshold`, then raises the threshold by one.
    ///
    /// Survivors keep their relative order and the boundary entry is always retained. The
    /// index is rebuilt over the compacted entries. Pruned counts are lost for the rest of
    /// the run.
    pub fn reduce(&mut self) -> Result<ReductionMetrics> {
        let threshold = self.min_reduce;
        let entries_before = self.entries.len();
        let mut position = 0usize;
        self.entries.retain(|entry| {
            let keep = position == BOUNDARY_POSITION || entry.frequency > threshold;
            position += 1;
            keep
        });
        self.index.rebuild(&self.entries)?;
        self.min_reduce += 1;
        Ok(ReductionMetrics {
            threshold,
            entries_before,
            entries_after: self.entries.len(),
        })
    }

    /// Sorts entries by descending frequency, drops those below `min_count`, and freezes the
    /// result.
    ///
    /// The sort is stable and never moves the boundary entry.
    pub fn finalize(mut self, min_count: u64) -> Result<Vocabulary> {
        let ranked = &mut self.entries[BOUNDARY_POSITION + 1..];
        ranked.sort_by_key(|entry| Reverse(entry.frequency));
        let survivors = ranked.partition_point(|entry| entry.frequency >= min_count);
        self.entries.truncate(BOUNDARY_POSITION + 1 + survivors);
        self.entries.shrink_to_fit();
        self.index.rebuild(&self.entries)?;
        Ok(Vocabulary {
            entries: self.entries,
            index: self.index,
        })
    }
}

/// Read-only vocabulary produced by [`VocabularyStore::finalize`].
///
/// Entries after the boundary are ordered by non-increasing frequency and all meet the
/// `min_count` used at finalization.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    entries: Vec<VocabEntry>,
    index: SlotIndex,
}

impl Vocabulary {
    /// Returns the position of `token`, if present.
    #[must_use]
    pub fn lookup(&self, token: &[u8]) -> Option<usize> {
        self.index.find(token, &self.entries)
    }

    /// Frequency of `token`, or `None` when it was pruned or never seen.
    #[must_use]
    pub fn frequency_of(&self, token: &[u8]) -> Option<u64> {
        self.lookup(token)
            .map(|position| self.entries[position].frequency)
    }

    /// Entries in position order, boundary first.
    #[must_use]
    pub fn entries(&self) -> &[VocabEntry] {
        &self.entries
    }

    /// Number of entries including the boundary.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: the boundary entry survives finalization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
