//! Telegram update handlers.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use crate::{incoming_message, router::AppState};

/// Every message goes through the presence handler. Failures are contained
/// there, so this endpoint always reports success to the dispatcher.
pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let incoming = incoming_message(&msg);
    let outcome = state.presence.handle(&incoming).await;
    tracing::debug!(chat_id = msg.chat.id.0, ?outcome, "message handled");
    Ok(())
}
