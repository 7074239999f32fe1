use super::layout::{Slot, SlotId, TILE_SPAN};

// A neighbour on the same layer blocks a side when its column is one tile away,
// give or take a quarter tile.
const SIDE_MIN: i32 = TILE_SPAN * 3 / 4;
const SIDE_MAX: i32 = TILE_SPAN * 5 / 4;

impl Slot {
    fn overlaps(&self, other: &Slot) -> bool {
        (self.row - other.row).abs() < TILE_SPAN && (self.col - other.col).abs() < TILE_SPAN
    }

    fn same_band(&self, other: &Slot) -> bool {
        self.layer == other.layer && (self.row - other.row).abs() < TILE_SPAN
    }

    pub fn covers(&self, other: &Slot) -> bool {
        self.layer > other.layer && self.overlaps(other)
    }

    pub fn blocks_left(&self, other: &Slot) -> bool {
        self.same_band(other) && (SIDE_MIN..=SIDE_MAX).contains(&(other.col - self.col))
    }

    pub fn blocks_right(&self, other: &Slot) -> bool {
        self.same_band(other) && (SIDE_MIN..=SIDE_MAX).contains(&(self.col - other.col))
    }
}

// Tiles at the exact same position form a stack, the higher id on top
pub fn is_free(id: SlotId, slot: Slot, active: impl IntoIterator<Item=(SlotId, Slot)>) -> bool {
    let mut left = false;
    let mut right = false;
    for (other_id, other) in active {
        if other_id == id {
            continue;
        }
        if other.covers(&slot) || (other == slot && other_id > id) {
            return false;
        }
        left |= other.blocks_left(&slot);
        right |= other.blocks_right(&slot);
        if left && right {
            return false;
        }
    }
    true
}

pub fn free_slots(slots: &[(SlotId, Slot)]) -> Vec<bool> {
    slots.iter()
        .map(|&(id, slot)| is_free(id, slot, slots.iter().copied()))
        .collect()
}
