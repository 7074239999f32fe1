mod catalog;
mod deal;
mod game;
mod layout;
mod matching;
mod reachability;
mod session;


pub use game::Mahjong;
pub use session::Rules;
