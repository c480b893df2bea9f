//! Core domain + application logic for the attendance bot.
//!
//! This crate is intentionally framework-agnostic. The chat platform (Telegram)
//! and the spreadsheet service (Google Sheets) live behind ports (traits)
//! implemented in adapter crates.

pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod months;
pub mod ports;
pub mod presence;
pub mod roster;
pub mod shutdown;

pub use errors::{Error, Result};
