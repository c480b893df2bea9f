//! Presence handler: one chat message in, at most one spreadsheet append out.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    domain::{range_expression, IncomingMessage},
    ports::SheetPort,
    roster::Roster,
};

/// What happened to a single inbound message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PresenceOutcome {
    /// A marker row was appended for the author.
    Recorded { range: String },
    /// The author is not in the attendance table.
    Unmapped,
    /// The append was attempted and failed; the error has been logged.
    Failed { error: String },
}

pub struct PresenceHandler {
    roster: Arc<Roster>,
    sheet: Arc<dyn SheetPort>,
    // The chat dispatcher runs chats concurrently; appends go out one at a time.
    append_lock: Mutex<()>,
}

impl PresenceHandler {
    pub fn new(roster: Arc<Roster>, sheet: Arc<dyn SheetPort>) -> Self {
        Self {
            roster,
            sheet,
            append_lock: Mutex::new(()),
        }
    }

    /// Record attendance for the author of `msg`, if they are tracked.
    ///
    /// Never fails: append errors are logged and reported through the outcome
    /// so the dispatcher keeps running.
    pub async fn handle(&self, msg: &IncomingMessage) -> PresenceOutcome {
        tracing::info!(author = %msg.author, text = %msg.text, "message received");

        let Some(locator) = self.roster.lookup(&msg.author) else {
            tracing::info!(author = %msg.author, "user not mapped");
            return PresenceOutcome::Unmapped;
        };

        let range = range_expression(self.sheet.tab_name(), &self.roster.row_anchor());
        let row = self.roster.marker_row(locator);

        let result = {
            let _guard = self.append_lock.lock().await;
            self.sheet.append_row(&range, &row).await
        };

        match result {
            Ok(()) => {
                tracing::info!(author = %msg.author, %range, "attendance recorded");
                PresenceOutcome::Recorded { range }
            }
            Err(e) => {
                tracing::error!(author = %msg.author, %range, "error while appending new row: {e}");
                PresenceOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}
