// row and col are in half grid units: a tile spans 4 of them
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Slot {
    pub layer: u8,
    pub row: i32,
    pub col: i32,
}

pub type SlotId = usize;

pub const TILE_SPAN: i32 = 4;

impl Slot {
    const fn at(layer: u8, row: i32, col: i32) -> Self {
        Self { layer, row: row * TILE_SPAN, col: col * TILE_SPAN }
    }

    const fn shifted(self, half_row: bool, half_col: bool) -> Self {
        Self {
            layer: self.layer,
            row: self.row + if half_row { TILE_SPAN / 2 } else { 0 },
            col: self.col + if half_col { TILE_SPAN / 2 } else { 0 },
        }
    }
}

// (row, first column, last column) on the ground floor
const GROUND_ROWS: [(i32, i32, i32); 8] = [
    (0, 1, 12),
    (1, 3, 10),
    (2, 2, 11),
    (3, 1, 12),
    (4, 1, 12),
    (5, 2, 11),
    (6, 3, 10),
    (7, 1, 12),
];

// (layer, first row, last row, first column, last column) of each square tier
const TIERS: [(u8, i32, i32, i32, i32); 3] = [
    (1, 1, 6, 4, 9),
    (2, 2, 5, 5, 8),
    (3, 3, 4, 6, 7),
];

fn block(layer: u8, rows: (i32, i32), cols: (i32, i32)) -> impl Iterator<Item=Slot> {
    (rows.0..=rows.1).flat_map(move |row| (cols.0..=cols.1).map(move |col| Slot::at(layer, row, col)))
}

pub fn turtle() -> Vec<Slot> {
    let ground = GROUND_ROWS.iter()
        .flat_map(|&(row, first, last)| block(0, (row, row), (first, last)));
    let wings = [
        Slot::at(0, 3, 0).shifted(true, false),
        Slot::at(0, 3, 13).shifted(true, false),
        Slot::at(0, 3, 14).shifted(true, false),
    ];
    let tiers = TIERS.iter()
        .flat_map(|&(layer, r0, r1, c0, c1)| block(layer, (r0, r1), (c0, c1)));
    let cap = Slot::at(4, 3, 6).shifted(true, true);

    ground.chain(wings.iter().copied())
        .chain(tiers)
        .chain(std::iter::once(cap))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use itertools::Itertools;

    use super::*;
    use crate::mahjong::catalog::TILE_COUNT;

    #[test]
    fn turtle_has_one_slot_per_tile() {
        let slots = turtle();
        assert_eq!(slots.len(), TILE_COUNT);
        assert_eq!(slots.iter().collect::<HashSet<_>>().len(), TILE_COUNT);
    }

    #[test]
    fn tier_sizes() {
        let counts = turtle().iter().counts_by(|s| s.layer);
        assert_eq!(counts[&0], 87);
        assert_eq!(counts[&1], 36);
        assert_eq!(counts[&2], 16);
        assert_eq!(counts[&3], 4);
        assert_eq!(counts[&4], 1);
    }

    #[test]
    fn upper_slots_rest_on_lower_ones() {
        let slots = turtle();
        for upper in slots.iter().filter(|s| s.layer > 0) {
            assert!(slots.iter().any(|lower| lower.layer + 1 == upper.layer
                && (lower.row - upper.row).abs() < TILE_SPAN
                && (lower.col - upper.col).abs() < TILE_SPAN),
                "{:?} floats", upper);
        }
    }

    #[test]
    fn cap_sits_between_four_tiles() {
        let slots = turtle();
        let cap = slots.iter().find(|s| s.layer == 4).copied().unwrap();
        assert_eq!(cap, Slot { layer: 4, row: 14, col: 26 });
    }
}
