use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use telegram_bot::*;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Intent {
    Tile(usize),
    Hint,
    Shuffle,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseIntentError {
    #[error("empty callback data")]
    Empty,
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    #[error("tile position missing")]
    MissingPosition,
    #[error("bad tile position: {0}")]
    BadPosition(#[from] ParseIntError),
}

impl FromStr for Intent {
    type Err = ParseIntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut iter = s.split_whitespace();
        match iter.next().ok_or(ParseIntentError::Empty)? {
            "t" => {
                let position = iter.next().ok_or(ParseIntentError::MissingPosition)?;
                Ok(Intent::Tile(position.parse()?))
            }
            "hint" => Ok(Intent::Hint),
            "shuffle" => Ok(Intent::Shuffle),
            other => Err(ParseIntentError::UnknownAction(other.to_owned())),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Tile(position) => write!(f, "t {}", position),
            Intent::Hint => f.write_str("hint"),
            Intent::Shuffle => f.write_str("shuffle"),
        }
    }
}

pub struct InteractResult {
    pub update_text: Option<String>,
    pub update_board: Option<InlineKeyboardMarkup>,
    pub game_end: bool,
}

pub trait Game {
    fn interact(&mut self, intent: Intent, user: &User) -> Option<InteractResult>;
}


impl InteractResult {
    pub async fn reply_to(self, api: &Api, message: &Message) -> Result<(), Error> {
        if let Some(text) = self.update_text {
            if let Some(board) = self.update_board {
                api.send(message.edit_text(text).reply_markup(board)).await.map(|_| ())
            } else {
                api.send(message.edit_text(text)).await.map(|_| ())
            }
        } else if let Some(board) = self.update_board {
            api.send(message.edit_reply_markup(Some(board))).await.map(|_| ())
        } else {
            Ok(())
        }
    }
}
