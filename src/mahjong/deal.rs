use itertools::Itertools;
use log::warn;
use rand::Rng;
use rand::seq::{index, SliceRandom};

use super::catalog::Tile;
use super::layout::Slot;
use super::reachability::free_slots;

pub const MAX_ATTEMPTS: usize = 32;

pub struct Deal {
    pub placed: Vec<(usize, Tile)>,
    // removal order that clears the board
    pub plan: Vec<(usize, usize)>,
    pub degraded: bool,
}

// Splits every match group into pairs after shuffling it, so the pairing is not
// tied to catalog order. Groups with an odd count leave a single behind.
fn pair_up<R: Rng + ?Sized>(tiles: Vec<Tile>, rng: &mut R) -> (Vec<(Tile, Tile)>, Vec<Tile>) {
    let mut pairs = Vec::with_capacity(tiles.len() / 2);
    let mut singles = Vec::new();
    let groups = tiles.into_iter()
        .into_group_map_by(|t| t.group())
        .into_iter()
        .sorted_by_key(|&(group, _)| group);
    for (_, mut members) in groups {
        members.shuffle(rng);
        for chunk in members.chunks(2) {
            match *chunk {
                [a, b] => pairs.push((a, b)),
                [a] => singles.push(a),
                _ => {}
            }
        }
    }
    (pairs, singles)
}

// Plays the game backwards on an empty board: repeatedly takes two random free
// positions out of the occupied set. Returns the positions taken, in order,
// and whatever could not be taken.
fn peel<R: Rng + ?Sized>(slots: &[Slot], pairs: usize, rng: &mut R) -> (Vec<(usize, usize)>, Vec<usize>) {
    let mut occupied: Vec<(usize, Slot)> = slots.iter().copied().enumerate().collect();
    let mut plan = Vec::with_capacity(pairs);
    while plan.len() < pairs {
        let free: Vec<usize> = occupied.iter()
            .zip(free_slots(&occupied))
            .filter(|&(_, open)| open)
            .map(|(&(i, _), _)| i)
            .collect();
        if free.len() < 2 {
            break;
        }
        let picked = index::sample(rng, free.len(), 2);
        let (a, b) = (free[picked.index(0)], free[picked.index(1)]);
        occupied.retain(|&(i, _)| i != a && i != b);
        plan.push((a, b));
    }
    (plan, occupied.into_iter().map(|(i, _)| i).collect())
}

// Also used to reshuffle the tiles left on a board
pub fn deal<R: Rng + ?Sized>(slots: &[Slot], tiles: Vec<Tile>, rng: &mut R) -> Deal {
    let (mut pairs, singles) = pair_up(tiles, rng);
    pairs.shuffle(rng);

    let mut best: Option<(Vec<(usize, usize)>, Vec<usize>)> = None;
    for _ in 0..MAX_ATTEMPTS {
        let attempt = peel(slots, pairs.len(), rng);
        let complete = attempt.0.len() == pairs.len();
        if best.as_ref().map_or(true, |b| attempt.0.len() > b.0.len()) {
            best = Some(attempt);
        }
        if complete {
            break;
        }
    }
    let (mut plan, rest) = best.unwrap_or_default();

    let mut placed = Vec::with_capacity(slots.len());
    for (&(i, j), &(a, b)) in plan.iter().zip(&pairs) {
        placed.push((i, a));
        placed.push((j, b));
    }

    let degraded = plan.len() < pairs.len() || !singles.is_empty();
    if degraded {
        warn!("deal fell back after placing {} of {} pairs on {} slots", plan.len(), pairs.len(), slots.len());
        let mut rest = rest.into_iter();
        for &(a, b) in &pairs[plan.len()..] {
            if let Some((i, j)) = rest.next_tuple() {
                placed.push((i, a));
                placed.push((j, b));
                plan.push((i, j));
            }
        }
        placed.extend(rest.zip(singles));
    }

    Deal { placed, plan, degraded }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::mahjong::catalog::{catalog, Face, Wind};
    use crate::mahjong::layout::turtle;
    use crate::mahjong::matching::matches;
    use crate::mahjong::reachability::is_free;

    fn board(slots: &[Slot], deal: &Deal) -> Vec<Option<Tile>> {
        let mut board = vec![None; slots.len()];
        for &(i, tile) in &deal.placed {
            assert!(board[i].is_none(), "position {} dealt twice", i);
            board[i] = Some(tile);
        }
        board
    }

    // Removes the plan's pairs in order, checking each is free and matching.
    fn replay(slots: &[Slot], deal: &Deal) {
        let board = board(slots, deal);
        let mut occupied: Vec<usize> = (0..slots.len()).filter(|&i| board[i].is_some()).collect();
        for &(a, b) in &deal.plan {
            let active = || occupied.iter().map(|&i| (i, slots[i]));
            assert!(is_free(a, slots[a], active()), "{} blocked", a);
            assert!(is_free(b, slots[b], active()), "{} blocked", b);
            assert!(matches(&board[a].unwrap(), &board[b].unwrap()));
            occupied.retain(|&i| i != a && i != b);
        }
        assert!(occupied.is_empty());
    }

    #[test]
    fn turtle_deal_is_complete_and_solvable() {
        let slots = turtle();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let deal = deal(&slots, catalog(), &mut rng);
        assert!(!deal.degraded);
        assert_eq!(deal.placed.len(), slots.len());
        assert_eq!(deal.plan.len(), slots.len() / 2);
        let ids: HashSet<_> = deal.placed.iter().map(|(_, t)| t.id).collect();
        assert_eq!(ids.len(), slots.len());
        replay(&slots, &deal);
    }

    #[test]
    fn same_seed_same_deal() {
        let slots = turtle();
        let a = deal(&slots, catalog(), &mut ChaCha8Rng::seed_from_u64(99));
        let b = deal(&slots, catalog(), &mut ChaCha8Rng::seed_from_u64(99));
        assert_eq!(a.placed, b.placed);
        assert_eq!(a.plan, b.plan);
    }

    #[test]
    fn partial_board_redeal() {
        let slots: Vec<Slot> = turtle().into_iter().filter(|s| s.layer == 2 || s.layer == 3).collect();
        assert_eq!(slots.len(), 20);
        let tiles: Vec<Tile> = catalog().into_iter().take(slots.len()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let deal = deal(&slots, tiles, &mut rng);
        assert!(!deal.degraded);
        replay(&slots, &deal);
    }

    #[test]
    fn stacked_pair_degrades() {
        let slots = vec![
            Slot { layer: 0, row: 0, col: 0 },
            Slot { layer: 1, row: 0, col: 0 },
        ];
        let tiles = vec![
            Tile { id: 0, face: Face::Wind(Wind::East) },
            Tile { id: 1, face: Face::Wind(Wind::East) },
        ];
        let deal = deal(&slots, tiles, &mut ChaCha8Rng::seed_from_u64(1));
        assert!(deal.degraded);
        assert_eq!(deal.placed.len(), 2);
        assert_eq!(deal.plan.len(), 1);
    }
}
