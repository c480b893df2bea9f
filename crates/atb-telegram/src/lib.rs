//! Telegram adapter (teloxide).
//!
//! Turns Telegram message updates into `atb-core` incoming messages and feeds
//! them to the presence handler. Nothing is ever sent back to the chat.

use teloxide::{
    types::{Message, User},
    ApiError, RequestError,
};

pub mod handlers;
pub mod router;

use atb_core::{domain::IncomingMessage, errors::Error};

/// The name participants are matched by: first and last name as shown in the
/// Telegram client.
pub fn display_name(user: &User) -> String {
    user.full_name()
}

pub fn incoming_message(msg: &Message) -> IncomingMessage {
    let author = msg.from().map(display_name).unwrap_or_default();
    let text = msg.text().or_else(|| msg.caption()).unwrap_or_default();
    IncomingMessage::new(author, text)
}

fn map_connect_err(e: RequestError) -> Error {
    match e {
        // teloxide-core 0.9 reports an unknown bot token as `NotFound`.
        RequestError::Api(ApiError::NotFound) => {
            Error::Auth("telegram rejected the bot token".to_string())
        }
        other => Error::Connection(format!("telegram error: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_token_is_an_auth_error() {
        assert!(matches!(
            map_connect_err(RequestError::Api(ApiError::NotFound)),
            Error::Auth(_)
        ));
        assert!(matches!(
            map_connect_err(RequestError::Api(ApiError::BotBlocked)),
            Error::Connection(_)
        ));
    }
}
