use bit_set::BitSet;

use crate::grid_config::GridConfig;
use crate::types::{SlotId, WordId};

/// The live set of candidate words for every slot. Each domain is a bit set over word ids, so
/// membership and removal are constant time and iteration always runs in ascending id order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domains {
    by_slot: Vec<BitSet>,
}

impl Domains {
    /// Give every slot in the grid the whole vocabulary as its domain.
    pub fn new(config: &GridConfig) -> Domains {
        let word_count = config.word_count();
        let mut full = BitSet::with_capacity(word_count);
        for word_id in 0..word_count {
            full.insert(word_id);
        }

        Domains {
            by_slot: vec![full; config.slot_count()],
        }
    }

    pub fn domain_of(&self, slot_id: SlotId) -> &BitSet {
        &self.by_slot[slot_id]
    }

    pub fn iter(&self, slot_id: SlotId) -> impl Iterator<Item = WordId> + '_ {
        self.by_slot[slot_id].iter()
    }

    pub fn contains(&self, slot_id: SlotId, word_id: WordId) -> bool {
        self.by_slot[slot_id].contains(word_id)
    }

    /// Remove a word from a slot's domain, returning whether it was present.
    pub fn remove(&mut self, slot_id: SlotId, word_id: WordId) -> bool {
        self.by_slot[slot_id].remove(word_id)
    }

    /// Shrink a slot's domain down to the single given word.
    pub fn restrict_to(&mut self, slot_id: SlotId, word_id: WordId) {
        let domain = &mut self.by_slot[slot_id];
        domain.clear();
        domain.insert(word_id);
    }

    pub fn size(&self, slot_id: SlotId) -> usize {
        self.by_slot[slot_id].len()
    }

    pub fn is_empty(&self, slot_id: SlotId) -> bool {
        self.by_slot[slot_id].is_empty()
    }

    /// Sum of the domain sizes over all slots.
    pub fn total_size(&self) -> usize {
        self.by_slot.iter().map(BitSet::len).sum()
    }
}
