//! Month → spreadsheet tab name.
//!
//! The attendance spreadsheet keeps one tab per calendar month, named in
//! Brazilian Portuguese.

use chrono::{Datelike, Local, Month};

const MONTH_TABS: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

pub fn tab_name(month: Month) -> &'static str {
    MONTH_TABS[month.number_from_month() as usize - 1]
}

pub fn tab_name_for(date: &impl Datelike) -> &'static str {
    MONTH_TABS[date.month0() as usize]
}

/// Tab for the local wall-clock month at the moment of the call.
///
/// Startup calls this once; a process running across a month boundary keeps
/// writing to the tab it started with.
pub fn current_tab_name() -> &'static str {
    tab_name_for(&Local::now())
}
