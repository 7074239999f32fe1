use std::collections::HashMap;

use itertools::Itertools;
use telegram_bot::{User, InlineKeyboardMarkup};

use crate::game::{Game, Intent, InteractResult};
use crate::puzzle::{GameState, Puzzle};

// Wraps a puzzle the whole chat plays on and keeps score of who made the moves
pub struct CoopGame<T: Puzzle> {
    game: T,
    interactions: HashMap<String, u32>,
}

impl<T: Puzzle> CoopGame<T> {
    pub fn create(game: T) -> (Self, String, InlineKeyboardMarkup) {
        let text = game.get_text();
        let inline_keyboard = game.to_inline_keyboard();
        (Self {
            game,
            interactions: HashMap::new(),
        }, text, inline_keyboard)
    }

    fn summary(&self, username: &str, state: GameState) -> String {
        let largest_count = self.interactions.values().copied().max().unwrap_or_default();
        let top_contributor = self.interactions.iter()
            .filter(|&(_, &count)| count == largest_count)
            .map(|(name, _)| name.as_str())
            .min()
            .unwrap_or(username);
        let mut summary = self.interactions.iter()
            .sorted_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)))
            .map(|(name, count)| format!("{} - {} moves", name, count))
            .join("\n") + "\n";
        let count = self.interactions.get(username).copied().unwrap_or_default();
        if count == largest_count {
            // It's the top contributor acting
            if state == GameState::Solved {
                summary += format!("{} has cleared the board!", username).as_str();
            } else {
                summary += format!("{} has left the board without a pair!", username).as_str();
            }
        } else if state == GameState::Solved {
            // Someone else finished it
            summary += format!("{} has snatched it from {}!", username, top_contributor).as_str();
        } else {
            summary += format!("{} has ruined it for {}!", username, top_contributor).as_str();
        }
        summary
    }
}

impl<T: Puzzle> Game for CoopGame<T> {
    fn interact(&mut self, intent: Intent, user: &User) -> Option<InteractResult> {
        if !self.game.interact(intent) {
            return None;
        }
        let username = user.username.as_ref().unwrap_or(&user.first_name);
        *self.interactions.entry(username.to_owned()).or_default() += 1;

        let keyboard_markup = self.game.to_inline_keyboard();
        let state = self.game.get_state();
        Some(if state == GameState::Normal {
            InteractResult {
                update_text: Some(self.game.get_text()),
                update_board: Some(keyboard_markup),
                game_end: false,
            }
        } else {
            InteractResult {
                update_text: Some(self.game.get_text() + "\n\n" + self.summary(username, state).as_str()),
                update_board: Some(keyboard_markup),
                game_end: true,
            }
        })
    }
}
