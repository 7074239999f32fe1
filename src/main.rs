use std::collections::HashMap;
use std::convert::TryFrom;
use std::process;

use futures::StreamExt;
use hyper::{Client, Uri};
use hyper::client::HttpConnector;
use hyper_socks2::SocksConnector;
use log::{debug, error, info};
use telegram_bot::*;
use telegram_bot::connector::Connector;
use telegram_bot::connector::hyper::{default_connector, HyperConnector};

use crate::config::{Config, ConfigError};
use crate::coop_game::CoopGame;
use crate::game::{Game, Intent};
use crate::mahjong::{Mahjong, Rules};

mod config;
mod coop_game;
mod game;
mod mahjong;
mod puzzle;

struct GameManager<'a> {
    api: &'a Api,
    rules: Rules,
    running_games: HashMap<(ChatId, MessageId), Box<dyn Game>>,
}

impl<'a> GameManager<'a> {
    fn new(api: &'a Api, rules: Rules) -> GameManager<'a> {
        Self {
            api,
            rules,
            running_games: HashMap::new(),
        }
    }

    async fn handle_update(&mut self, update: Result<Update, Error>) -> Result<(), Error> {
        let update = update?;
        if let UpdateKind::Message(message) = update.kind {
            if let MessageKind::Text { ref data, .. } = message.kind {
                if data.starts_with("/mahjong") {
                    let (game, text, inline_keyboard) = CoopGame::create(Mahjong::from_message(data, self.rules));
                    let reply = self.api.send(message
                        .text_reply(text)
                        .reply_markup(inline_keyboard)).await?;
                    if let MessageOrChannelPost::Message(reply) = reply {
                        info!("new game in chat {:?}", reply.chat.id());
                        self.running_games.insert((reply.chat.id(), reply.id), Box::new(game));
                    }
                }
            }
        } else if let UpdateKind::CallbackQuery(query) = update.kind {
            self.api.send(query.acknowledge()).await?;
            let intent = match query.data.as_deref().map(str::parse::<Intent>) {
                Some(Ok(intent)) => intent,
                Some(Err(err)) => {
                    debug!("ignoring callback {:?}: {}", query.data, err);
                    return Ok(());
                }
                None => return Ok(()),
            };
            if let Some(MessageOrChannelPost::Message(message)) = query.message {
                let key = (message.chat.id(), message.id);
                if let Some(game) = self.running_games.get_mut(&key) {
                    if let Some(result) = game.interact(intent, &query.from) {
                        if result.game_end {
                            info!("game in chat {:?} is over", key.0);
                            self.running_games.remove(&key);
                        }
                        result.reply_to(self.api, &message).await?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn socks5_connector(addr: String) -> Result<Box<dyn Connector>, ConfigError> {
    let mut connector = HttpConnector::new();
    connector.enforce_http(false);
    let proxy_addr = Uri::try_from(addr).map_err(|err| ConfigError::Proxy(err.to_string()))?;
    let socks = SocksConnector {
        proxy_addr,
        auth: None,
        connector,
    }.with_tls().map_err(|err| ConfigError::Proxy(err.to_string()))?;
    Ok(Box::new(HyperConnector::new(Client::builder().build(socks))))
}

fn connector(config: &Config) -> Result<Box<dyn Connector>, ConfigError> {
    match &config.proxy {
        Some(addr) => socks5_connector(addr.to_owned()),
        None => default_connector().map_err(|err| ConfigError::Connector(err.to_string())),
    }
}

async fn run() -> Result<(), ConfigError> {
    let config = Config::from_env()?;
    let api = Api::with_connector(config.token.clone(), connector(&config)?);
    let mut stream = api.stream();

    let mut manager: GameManager = GameManager::new(&api, config.rules);

    while let Some(update) = stream.next().await {
        if let Err(err) = manager.handle_update(update).await {
            error!("failed to handle update: {}", err);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(err) = run().await {
        error!("{}", err);
        process::exit(1);
    }
}
