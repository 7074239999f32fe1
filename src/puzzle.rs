use telegram_bot::InlineKeyboardMarkup;

use crate::game::Intent;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GameState {
    Normal,
    Solved,
    GameOver,
}

pub trait Puzzle {
    fn get_state(&self) -> GameState;
    fn get_text(&self) -> String;
    fn to_inline_keyboard(&self) -> InlineKeyboardMarkup;
    // true if the board has changed
    fn interact(&mut self, intent: Intent) -> bool;
}
