use std::{future::Future, sync::Arc, time::Duration};

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use atb_core::{presence::PresenceHandler, Result};

use crate::{handlers, map_connect_err};

#[derive(Clone)]
pub struct AppState {
    pub presence: Arc<PresenceHandler>,
}

/// Build the bot and make sure Telegram accepts its token.
pub async fn connect(token: &str) -> Result<Bot> {
    let bot = Bot::new(token);
    let me = bot.get_me().await.map_err(map_connect_err)?;
    tracing::info!(bot = %me.username(), "connection opened");
    Ok(bot)
}

/// Dispatch message updates to the presence handler until `shutdown`
/// resolves, then stop the dispatcher and return.
pub async fn run_until<F>(bot: Bot, state: Arc<AppState>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build();

    let token = dispatcher.shutdown_token();
    tokio::spawn(async move {
        shutdown.await;
        // The dispatcher may still be starting up; shutdown only succeeds once
        // it is running.
        loop {
            match token.shutdown() {
                Ok(done) => {
                    done.await;
                    break;
                }
                Err(_) => tokio::time::sleep(Duration::from_millis(100)).await,
            }
        }
    });

    tracing::info!("bot is now running, send SIGINT, SIGTERM or SIGHUP to exit");
    dispatcher.dispatch().await;
    tracing::info!("dispatcher stopped");

    Ok(())
}
