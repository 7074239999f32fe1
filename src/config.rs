use std::env;
use std::num::ParseIntError;

use crate::mahjong::Rules;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("API_TOKEN is not set")]
    MissingToken,
    #[error("{var} is not a valid number: {source}")]
    InvalidNumber {
        var: &'static str,
        source: ParseIntError,
    },
    #[error("cannot connect through proxy: {0}")]
    Proxy(String),
    #[error("cannot build connector: {0}")]
    Connector(String),
}

pub struct Config {
    pub token: String,
    pub proxy: Option<String>,
    pub rules: Rules,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = var("API_TOKEN").ok_or(ConfigError::MissingToken)?;
        let number = |name: &'static str, default: u32| match var(name) {
            Some(value) => value.trim().parse::<u32>()
                .map_err(|source| ConfigError::InvalidNumber { var: name, source }),
            None => Ok(default),
        };
        let defaults = Rules::default();
        let rules = Rules {
            match_reward: number("MAHJONG_MATCH_REWARD", defaults.match_reward)?,
            hint_penalty: number("MAHJONG_HINT_PENALTY", defaults.hint_penalty)?,
            shuffle_penalty: number("MAHJONG_SHUFFLE_PENALTY", defaults.shuffle_penalty)?,
            completion_bonus: number("MAHJONG_COMPLETION_BONUS", defaults.completion_bonus)?,
        };
        Ok(Self {
            token,
            proxy: var("PROXY"),
            rules,
        })
    }
}
