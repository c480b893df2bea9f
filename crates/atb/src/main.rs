use std::sync::Arc;

use atb_core::{
    config::Config, months, presence::PresenceHandler, roster::Roster, shutdown, Error,
};
use atb_sheets::SheetsClient;
use atb_telegram::router::{self, AppState};

#[tokio::main]
async fn main() -> Result<(), Error> {
    atb_core::logging::init("atb")?;

    let cfg = Config::load()?;

    // Installed before any network I/O so an early SIGTERM or SIGHUP still
    // takes the graceful path.
    let mut signals = shutdown::ShutdownSignals::register()?;

    let roster = match &cfg.roster_file {
        Some(path) => Roster::load(path)?,
        None => Roster::builtin(),
    };
    tracing::info!(participants = roster.len(), "attendance table loaded");

    // Resolved once; a run that crosses a month boundary keeps this tab.
    let tab_name = months::current_tab_name();

    let sheet = SheetsClient::connect(
        &cfg.credentials_file,
        cfg.sheet_id.clone(),
        tab_name,
        cfg.sheets_timeout,
    )
    .await?;

    if cfg.verify_spreadsheet {
        let info = sheet.check_spreadsheet().await?;
        tracing::info!(title = %info.title, "spreadsheet found");
        for tab in &info.tabs {
            tracing::info!(tab = %tab.title, sheet_id = tab.sheet_id, "available sheet");
        }
        if !info.has_tab(tab_name) {
            tracing::warn!(tab = %tab_name, "current month tab is missing from the spreadsheet");
        }
    }

    let bot = router::connect(&cfg.bot_token).await?;

    let state = Arc::new(AppState {
        presence: Arc::new(PresenceHandler::new(Arc::new(roster), Arc::new(sheet))),
    });

    router::run_until(bot, state, async move {
        let sig = signals.recv().await;
        tracing::info!(signal = %sig, "shutting down");
    })
    .await
    .map_err(|e| Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
