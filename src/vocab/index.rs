use crate::bytes::token_hash;
use crate::error::{PhrasalError, Result};

use super::VocabEntry;

const EMPTY_SLOT: u32 = u32::MAX;

/// Fixed-capacity open-addressing index from token bytes to entry positions.
///
/// Slots hold positions into the entry array, never token copies. Collisions probe linearly
/// with wraparound.
#[derive(Debug, Clone)]
pub(crate) struct SlotIndex {
    slots: Vec<u32>,
}

impl SlotIndex {
    /// Allocates `capacity` empty slots.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![EMPTY_SLOT; capacity],
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Probes from the token's home slot until an empty slot or a byte-equal entry.
    pub(crate) fn find(&self, token: &[u8], entries: &[VocabEntry]) -> Option<usize> {
        let capacity = self.slots.len();
        let mut slot = token_hash(token, capacity);
        for _ in 0..capacity {
            let position = self.slots[slot];
            if position == EMPTY_SLOT {
                return None;
            }
            let position = position as usize;
            if entries[position].token() == token {
                return Some(position);
            }
            slot = (slot + 1) % capacity;
        }
        None
    }

    /// Records `position` in the first empty slot on the token's probe sequence.
    pub(crate) fn place(&mut self, token: &[u8], position: usize) -> Result<()> {
        let capacity = self.slots.len();
        let value = u32::try_from(position)
            .ok()
            .filter(|&value| value != EMPTY_SLOT)
            .ok_or_else(|| {
                PhrasalError::Internal(format!("entry position {position} is not addressable"))
            })?;
        let mut slot = token_hash(token, capacity);
        for _ in 0..capacity {
            if self.slots[slot] == EMPTY_SLOT {
                self.slots[slot] = value;
                return Ok(());
            }
            slot = (slot + 1) % capacity;
        }
        Err(PhrasalError::Internal(format!(
            "vocabulary index is full ({capacity} slots)"
        )))
    }

    /// Clears every slot and re-places all entries at their current positions.
    pub(crate) fn rebuild(&mut self, entries: &[VocabEntry]) -> Result<()> {
        self.slots.fill(EMPTY_SLOT);
        for (position, entry) in entries.iter().enumerate() {
            self.place(entry.token(), position)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(tokens: &[&str]) -> Vec<VocabEntry> {
        tokens
            .iter()
            .map(|token| VocabEntry::new(token.as_bytes()))
            .collect()
    }

    #[test]
    fn colliding_tokens_probe_to_neighbouring_slots() {
        let entries = entries(&["a", "b", "c"]);
        let mut index = SlotIndex::with_capacity(3);
        index.rebuild(&entries).expect("rebuild");
        for (position, entry) in entries.iter().enumerate() {
            assert_eq!(index.find(entry.token(), &entries), Some(position));
        }
        assert_eq!(index.find(b"d", &entries), None);
    }

    #[test]
    fn probing_wraps_around_the_end() {
        let entries = entries(&["x", "y"]);
        let mut index = SlotIndex::with_capacity(2);
        index.rebuild(&entries).expect("rebuild");
        assert_eq!(index.find(b"x", &entries), Some(0));
        assert_eq!(index.find(b"y", &entries), Some(1));
        assert_eq!(index.find(b"z", &entries), None);
    }

    #[test]
    fn placing_into_a_full_index_fails() {
        let entries = entries(&["x", "y"]);
        let mut index = SlotIndex::with_capacity(1);
        let err = index.rebuild(&entries).expect_err("index overflow");
        assert!(matches!(err, PhrasalError::Internal(message) if message.contains("full")));
    }
}
