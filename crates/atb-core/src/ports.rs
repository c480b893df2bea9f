use async_trait::async_trait;

use crate::{domain::CellValue, Result};

/// Hexagonal port for the attendance spreadsheet.
///
/// The Google Sheets adapter is the production implementation; tests plug in
/// in-memory fakes.
#[async_trait]
pub trait SheetPort: Send + Sync {
    /// Tab every append goes to, fixed for the life of the client.
    fn tab_name(&self) -> &str;

    /// Append one row inside `range` (`<tab>!<anchor>`).
    ///
    /// Exactly one remote call per invocation; the service picks the first
    /// empty row. Errors are returned as-is, never retried.
    async fn append_row(&self, range: &str, values: &[CellValue]) -> Result<()>;
}
