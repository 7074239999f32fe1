use itertools::Itertools;

use super::catalog::Tile;
use super::layout::SlotId;

pub type Pair = (SlotId, SlotId);

pub fn matches(a: &Tile, b: &Tile) -> bool {
    a.id != b.id && a.group() == b.group()
}

pub fn find_available_pairs<'a>(free: impl IntoIterator<Item=(SlotId, &'a Tile)>) -> Vec<Pair> {
    free.into_iter()
        .sorted_by_key(|&(id, _)| id)
        .tuple_combinations()
        .filter(|((_, a), (_, b))| matches(a, b))
        .map(|((i, _), (j, _))| (i, j))
        .collect()
}
