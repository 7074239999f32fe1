use itertools::Itertools;
use log::debug;
use rand::Rng;
use telegram_bot::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::game::Intent;
use crate::puzzle::{GameState, Puzzle};
use super::matching::Pair;
use super::session::{Phase, Rules, Selection, Session, TileView};

const BUTTONS_PER_ROW: usize = 8;

pub struct Mahjong {
    session: Session,
    seed: u64,
    notice: Option<&'static str>,
}

impl Mahjong {
    pub fn from_message(data: &str, rules: Rules) -> Self {
        let seed = data.split_whitespace()
            .nth(1)
            .and_then(|arg| arg.parse().ok())
            .unwrap_or_else(|| rand::rng().random());
        let mut session = Session::seeded(rules, seed);
        session.start_game();
        Self { session, seed, notice: None }
    }

    fn settle(&mut self, pair: Option<Pair>) {
        let shuffles = self.session.stats().shuffles;
        if let Some((a, b)) = pair {
            self.session.on_removal_animation_complete(a);
            self.session.on_removal_animation_complete(b);
        }
        if self.session.is_settling() {
            self.session.on_shuffle_settled();
        }
        if pair.is_some() && self.session.stats().shuffles > shuffles {
            self.notice = Some("No pairs left, the tiles were reshuffled.");
        }
    }

    fn label(&self, view: &TileView) -> String {
        let hinted = self.session.hint().map_or(false, |(a, b)| a == view.id || b == view.id);
        if self.session.selected() == Some(view.id) {
            format!("[{}]", view.tile.face)
        } else if hinted {
            format!("💡{}", view.tile.face)
        } else {
            view.tile.face.to_string()
        }
    }
}

impl Puzzle for Mahjong {
    fn get_state(&self) -> GameState {
        match self.session.phase() {
            Phase::Won => GameState::Solved,
            Phase::Stuck => GameState::GameOver,
            Phase::Idle | Phase::Running => GameState::Normal,
        }
    }

    fn get_text(&self) -> String {
        let stats = self.session.stats();
        let mut text = format!("🀄 Mahjong #{}\nScore {} · Moves {} · {} tiles left",
                               self.seed, stats.score, stats.moves, stats.tiles_remaining);
        match stats.shuffles {
            0 => {}
            1 => text += " · 1 shuffle",
            n => text += format!(" · {} shuffles", n).as_str(),
        }
        match self.session.phase() {
            Phase::Won => text += "\nThe board is clear!",
            Phase::Stuck => text += "\nNo pair can be made any more.",
            Phase::Idle | Phase::Running => {}
        }
        if let Some(notice) = self.notice {
            text += "\n";
            text += notice;
        }
        text
    }

    fn to_inline_keyboard(&self) -> InlineKeyboardMarkup {
        let mut inline_keyboard = InlineKeyboardMarkup::new();
        let free = self.session.snapshot().tiles.into_iter()
            .filter(|t| t.free)
            .sorted_by_key(|t| (t.slot.row, t.slot.col, t.slot.layer));
        for row in &free.chunks(BUTTONS_PER_ROW) {
            inline_keyboard.add_row(row
                .map(|t| InlineKeyboardButton::callback(self.label(&t), Intent::Tile(t.id).to_string()))
                .collect());
        }
        if self.session.stats().running {
            inline_keyboard.add_row(vec![
                InlineKeyboardButton::callback("💡 Hint", Intent::Hint.to_string()),
                InlineKeyboardButton::callback("🔀 Shuffle", Intent::Shuffle.to_string()),
            ]);
        }
        inline_keyboard
    }

    fn interact(&mut self, intent: Intent) -> bool {
        self.notice = None;
        match intent {
            Intent::Tile(id) => match self.session.select_tile(id) {
                Selection::Ignored | Selection::Blocked => false,
                Selection::Selected(_) | Selection::Deselected => true,
                Selection::Matched(pair) => {
                    self.settle(Some(pair));
                    true
                }
            },
            Intent::Hint => {
                let hint = self.session.request_hint();
                if hint.is_none() {
                    self.notice = Some("No pair to hint at.");
                }
                hint.is_some()
            }
            Intent::Shuffle => match self.session.request_shuffle() {
                Some(reshuffle) => {
                    debug!("redealt {} tiles", reshuffle.tiles.len());
                    if reshuffle.degraded {
                        self.notice = Some("This shuffle may not be solvable.");
                    }
                    self.settle(None);
                    true
                }
                None => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile_buttons(game: &Mahjong) -> Vec<TileView> {
        game.session.snapshot().tiles.into_iter().filter(|t| t.free).collect()
    }

    #[test]
    fn seed_comes_from_the_command() {
        let game = Mahjong::from_message("/mahjong 1234", Rules::default());
        assert_eq!(game.seed, 1234);
        assert!(game.get_text().starts_with("🀄 Mahjong #1234\n"));
        assert_eq!(game.get_state(), GameState::Normal);
    }

    #[test]
    fn matches_are_settled_immediately() {
        let mut game = Mahjong::from_message("/mahjong 77", Rules::default());
        let (a, b) = game.session.available_pairs()[0];
        assert!(game.interact(Intent::Tile(a)));
        assert!(game.interact(Intent::Tile(b)));
        assert_eq!(game.session.tiles_remaining(), 142);
        assert!(game.get_text().contains("142 tiles left"));
    }

    #[test]
    fn hidden_tiles_do_not_interact() {
        let mut game = Mahjong::from_message("/mahjong 5", Rules::default());
        let free: Vec<_> = tile_buttons(&game).iter().map(|t| t.id).collect();
        let covered = (0..144).find(|i| !free.contains(i)).unwrap();
        assert!(!game.interact(Intent::Tile(covered)));
    }

    #[test]
    fn shuffle_settles_without_waiting() {
        let mut game = Mahjong::from_message("/mahjong 6", Rules::default());
        assert!(game.interact(Intent::Shuffle));
        assert!(!game.session.is_settling());
        assert_eq!(game.get_text().lines().nth(1), Some("Score 0 · Moves 0 · 144 tiles left · 1 shuffle"));
        assert!(game.interact(Intent::Shuffle));
        assert_eq!(game.get_text().lines().nth(1), Some("Score 0 · Moves 0 · 144 tiles left · 2 shuffles"));
    }
}
