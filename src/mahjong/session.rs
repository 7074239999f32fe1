use std::collections::HashMap;

use itertools::Itertools;
use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::catalog::{catalog, Tile, TILE_COUNT};
use super::deal::deal;
use super::layout::{turtle, Slot, SlotId};
use super::matching::{find_available_pairs, matches, Pair};
use super::reachability::free_slots;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Rules {
    pub match_reward: u32,
    pub hint_penalty: u32,
    pub shuffle_penalty: u32,
    pub completion_bonus: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            match_reward: 10,
            hint_penalty: 5,
            shuffle_penalty: 20,
            completion_bonus: 100,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    Idle,
    Running,
    Won,
    Stuck,
}

#[derive(Copy, Clone, Debug)]
pub struct BoardTile {
    pub tile: Tile,
    pub slot: Slot,
    pub removed: bool,
    pub removing: bool,
}

impl BoardTile {
    pub fn is_active(&self) -> bool {
        !self.removed && !self.removing
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Selection {
    Ignored,
    Blocked,
    Selected(SlotId),
    Deselected,
    Matched(Pair),
}

#[derive(Clone, Debug)]
pub struct Reshuffle {
    pub tiles: Vec<(SlotId, Tile)>,
    pub degraded: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Stats {
    pub score: u32,
    pub moves: u32,
    pub tiles_remaining: usize,
    pub running: bool,
    pub shuffles: u32,
}

#[derive(Copy, Clone, Debug)]
pub struct TileView {
    pub id: SlotId,
    pub slot: Slot,
    pub tile: Tile,
    pub free: bool,
}

#[derive(Clone, Debug)]
pub struct BoardSnapshot {
    pub tiles: Vec<TileView>,
}

// A matched pair whose two removals are acknowledged independently.
struct Removal {
    pair: Pair,
    landed: [bool; 2],
}

pub struct Session<R = ChaCha8Rng> {
    rules: Rules,
    rng: R,
    layout: Vec<Slot>,
    tiles: Vec<BoardTile>,
    free: Vec<bool>,
    phase: Phase,
    selected: Option<SlotId>,
    hint: Option<Pair>,
    score: u32,
    moves: u32,
    shuffles: u32,
    removals: Vec<Removal>,
    settling: bool,
    // pairs in an order known to clear the board since the last deal
    plan: Vec<Pair>,
}

impl Session<ChaCha8Rng> {
    pub fn seeded(rules: Rules, seed: u64) -> Self {
        Self::new(rules, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Session<R> {
    pub fn new(rules: Rules, rng: R) -> Self {
        Self {
            rules,
            rng,
            layout: turtle(),
            tiles: Vec::new(),
            free: Vec::new(),
            phase: Phase::Idle,
            selected: None,
            hint: None,
            score: 0,
            moves: 0,
            shuffles: 0,
            removals: Vec::new(),
            settling: false,
            plan: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected(&self) -> Option<SlotId> {
        self.selected
    }

    pub fn hint(&self) -> Option<Pair> {
        self.hint
    }

    pub fn is_settling(&self) -> bool {
        self.settling
    }

    #[cfg(test)]
    pub(crate) fn tile(&self, id: SlotId) -> Option<&BoardTile> {
        self.tiles.get(id)
    }

    pub fn is_tile_free(&self, id: SlotId) -> bool {
        self.free.get(id).copied().unwrap_or(false)
    }

    pub fn tiles_remaining(&self) -> usize {
        self.tiles.iter().filter(|t| !t.removed).count()
    }

    pub fn stats(&self) -> Stats {
        Stats {
            score: self.score,
            moves: self.moves,
            tiles_remaining: self.tiles_remaining(),
            running: self.phase == Phase::Running,
            shuffles: self.shuffles,
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let tiles = self.tiles.iter()
            .enumerate()
            .filter(|(_, t)| !t.removed)
            .map(|(id, t)| TileView {
                id,
                slot: t.slot,
                tile: t.tile,
                free: self.free[id],
            })
            .collect();
        BoardSnapshot { tiles }
    }

    pub fn start_game(&mut self) -> BoardSnapshot {
        let deal = deal(&self.layout, catalog(), &mut self.rng);
        let layout = &self.layout;
        self.tiles = deal.placed.into_iter()
            .sorted_by_key(|&(i, _)| i)
            .map(|(i, tile)| BoardTile { tile, slot: layout[i], removed: false, removing: false })
            .collect();
        debug_assert_eq!(self.tiles.len(), TILE_COUNT);
        self.plan = deal.plan;
        self.phase = Phase::Running;
        self.selected = None;
        self.hint = None;
        self.score = 0;
        self.moves = 0;
        self.shuffles = 0;
        self.removals.clear();
        self.settling = false;
        self.refresh();
        self.snapshot()
    }

    // Removing tiles still hold their place, so they keep covering and
    // flanking their neighbours until acknowledged.
    fn refresh(&mut self) {
        let occupied: Vec<(SlotId, Slot)> = self.tiles.iter()
            .enumerate()
            .filter(|(_, t)| !t.removed)
            .map(|(i, t)| (i, t.slot))
            .collect();
        let mut free = vec![false; self.tiles.len()];
        for (&(i, _), open) in occupied.iter().zip(free_slots(&occupied)) {
            free[i] = open && self.tiles[i].is_active();
        }
        self.free = free;
    }

    pub fn select_tile(&mut self, id: SlotId) -> Selection {
        if self.phase != Phase::Running {
            return Selection::Ignored;
        }
        let tile = match self.tiles.get(id) {
            Some(t) if t.is_active() => t.tile,
            _ => return Selection::Ignored,
        };
        if !self.is_tile_free(id) {
            return Selection::Blocked;
        }
        match self.selected {
            None => {
                self.selected = Some(id);
                Selection::Selected(id)
            }
            Some(current) if current == id => {
                self.selected = None;
                Selection::Deselected
            }
            Some(current) if matches(&self.tiles[current].tile, &tile) => {
                self.selected = None;
                self.remove_pair((current, id));
                Selection::Matched((current, id))
            }
            Some(_) => {
                self.selected = Some(id);
                Selection::Selected(id)
            }
        }
    }

    fn remove_pair(&mut self, pair: Pair) {
        self.tiles[pair.0].removing = true;
        self.tiles[pair.1].removing = true;
        self.moves += 1;
        self.score = self.score.saturating_add(self.rules.match_reward);
        self.hint = None;
        self.removals.push(Removal { pair, landed: [false; 2] });
        self.refresh();
    }

    // A pair is only taken off once both of its tiles are acknowledged
    pub fn on_removal_animation_complete(&mut self, id: SlotId) {
        let index = match self.removals.iter().position(|r| r.pair.0 == id || r.pair.1 == id) {
            Some(index) => index,
            None => return,
        };
        let removal = &mut self.removals[index];
        removal.landed[(removal.pair.1 == id) as usize] = true;
        if removal.landed != [true; 2] {
            return;
        }

        let (a, b) = self.removals.remove(index).pair;
        for &i in &[a, b] {
            self.tiles[i].removing = false;
            self.tiles[i].removed = true;
        }
        self.refresh();
        self.check_state();
    }

    pub fn check_state(&mut self) -> Phase {
        if self.phase != Phase::Running || !self.removals.is_empty() || self.settling {
            return self.phase;
        }
        if self.tiles_remaining() == 0 {
            self.phase = Phase::Won;
            self.score = self.score.saturating_add(self.rules.completion_bonus);
            debug!("board cleared in {} moves, score {}", self.moves, self.score);
        } else if self.available_pairs().is_empty() {
            debug!("no pairs among {} tiles, reshuffling", self.tiles_remaining());
            self.reshuffle();
            if self.available_pairs().is_empty() {
                warn!("{} tiles left with no possible pair", self.tiles_remaining());
                self.settling = false;
                self.phase = Phase::Stuck;
            }
        }
        self.phase
    }

    fn reshuffle(&mut self) -> Reshuffle {
        let ids: Vec<SlotId> = (0..self.tiles.len()).filter(|&i| self.tiles[i].is_active()).collect();
        let slots: Vec<Slot> = ids.iter().map(|&i| self.tiles[i].slot).collect();
        let tiles: Vec<Tile> = ids.iter().map(|&i| self.tiles[i].tile).collect();

        let deal = deal(&slots, tiles, &mut self.rng);
        for &(k, tile) in &deal.placed {
            self.tiles[ids[k]].tile = tile;
        }
        self.plan = deal.plan.iter().map(|&(a, b)| (ids[a], ids[b])).collect();
        self.selected = None;
        self.hint = None;
        self.shuffles += 1;
        self.score = self.score.saturating_sub(self.rules.shuffle_penalty);
        self.settling = true;
        self.refresh();

        Reshuffle {
            tiles: ids.iter().map(|&i| (i, self.tiles[i].tile)).collect(),
            degraded: deal.degraded,
        }
    }

    pub fn request_shuffle(&mut self) -> Option<Reshuffle> {
        if self.phase != Phase::Running || !self.removals.is_empty() {
            return None;
        }
        Some(self.reshuffle())
    }

    pub fn on_shuffle_settled(&mut self) {
        if self.settling {
            self.settling = false;
            self.check_state();
        }
    }

    pub fn request_hint(&mut self) -> Option<Pair> {
        if self.phase != Phase::Running {
            return None;
        }
        let pair = self.available_pairs().first().copied()?;
        self.score = self.score.saturating_sub(self.rules.hint_penalty);
        self.hint = Some(pair);
        Some(pair)
    }

    // Plan pairs come first, so always taking the first pair replays a winning sequence
    pub fn available_pairs(&self) -> Vec<Pair> {
        let free = self.tiles.iter()
            .enumerate()
            .filter(|&(i, _)| self.free[i])
            .map(|(i, t)| (i, &t.tile));
        let rank: HashMap<Pair, usize> = self.plan.iter()
            .enumerate()
            .map(|(k, &(a, b))| ((a.min(b), a.max(b)), k))
            .collect();
        find_available_pairs(free).into_iter()
            .sorted_by_key(|p| rank.get(p).copied().unwrap_or(usize::MAX))
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn rig(&mut self, f: impl FnOnce(&mut [BoardTile])) {
        f(&mut self.tiles);
        self.refresh();
    }
}
