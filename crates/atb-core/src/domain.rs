use serde::{Serialize, Serializer};

/// A single spreadsheet cell written by the bot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellValue {
    /// Left untouched by the spreadsheet service (`null` on the wire).
    Empty,
    Marker(bool),
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_none(),
            CellValue::Marker(v) => serializer.serialize_bool(*v),
        }
    }
}

/// Where a participant's marker lands: the zero-based column inside the
/// attendance row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TargetLocator {
    pub column: usize,
}

/// Spreadsheet id plus the tab resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetTarget {
    pub spreadsheet_id: String,
    pub tab_name: String,
}

impl SheetTarget {
    pub fn new(spreadsheet_id: impl Into<String>, tab_name: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            tab_name: tab_name.into(),
        }
    }

}

pub fn range_expression(tab_name: &str, anchor: &str) -> String {
    format!("{tab_name}!{anchor}")
}

/// Chat-platform agnostic "message created" event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Empty when the platform did not report a sender.
    pub author: String,
    pub text: String,
}

impl IncomingMessage {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_values_serialize_as_null_or_bool() {
        let row = vec![CellValue::Empty, CellValue::Marker(true), CellValue::Empty];
        assert_eq!(serde_json::to_string(&row).unwrap(), "[null,true,null]");
    }

    #[test]
    fn range_joins_tab_and_anchor() {
        assert_eq!(range_expression("Março", "A1:F1"), "Março!A1:F1");
    }
}
