//! Attendance table: participant display name → marker column.
//!
//! Lookups are exact string matches. No trimming, no case folding, no prefix
//! matching; a name that is not in the table is simply not tracked.

use std::{collections::HashMap, fmt, fs, path::Path};

use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer,
};

use crate::{
    domain::{CellValue, TargetLocator},
    errors::Error,
    Result,
};

/// Display names tracked when no roster file is configured.
const BUILTIN: [(&str, usize); 3] = [("Tha", 2), ("khovovo", 3), ("TCastellani", 4)];

#[derive(Clone, Debug)]
pub struct Roster {
    entries: HashMap<String, TargetLocator>,
    width: usize,
}

impl Roster {
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN
                .iter()
                .map(|(name, column)| (name.to_string(), TargetLocator { column: *column })),
        )
    }

    fn from_entries(entries: impl IntoIterator<Item = (String, TargetLocator)>) -> Self {
        let entries: HashMap<String, TargetLocator> = entries.into_iter().collect();
        let width = entries.values().map(|t| t.column + 1).max().unwrap_or(0);
        Self { entries, width }
    }

    /// Parse a JSON object of `"display name": "column letter"` pairs.
    ///
    /// Names must be unique; a repeated key is rejected rather than letting
    /// the last occurrence win.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let RawEntries(raw) = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("invalid roster: {e}")))?;

        if raw.is_empty() {
            return Err(Error::Config("roster has no participants".to_string()));
        }

        let mut entries: HashMap<String, TargetLocator> = HashMap::with_capacity(raw.len());
        for (name, letter) in raw {
            if name.is_empty() {
                return Err(Error::Config("roster contains an empty name".to_string()));
            }
            let column = parse_column(&letter).ok_or_else(|| {
                Error::Config(format!("roster entry {name:?}: invalid column {letter:?}"))
            })?;
            if entries.contains_key(&name) {
                return Err(Error::Config(format!("roster lists {name:?} more than once")));
            }
            entries.insert(name, TargetLocator { column });
        }

        Ok(Self::from_entries(entries))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read roster {}: {e}", path.display()))
        })?;
        Self::from_json_str(&contents)
    }

    pub fn lookup(&self, display_name: &str) -> Option<TargetLocator> {
        self.entries.get(display_name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of cells in every attendance row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// A full-width row with `true` in the locator's column and nothing else.
    pub fn marker_row(&self, locator: TargetLocator) -> Vec<CellValue> {
        let width = self.width.max(locator.column + 1);
        (0..width)
            .map(|i| {
                if i == locator.column {
                    CellValue::Marker(true)
                } else {
                    CellValue::Empty
                }
            })
            .collect()
    }

    /// Range anchor covering the attendance row plus one trailing column,
    /// e.g. `A1:F1` for a five-cell row.
    pub fn row_anchor(&self) -> String {
        format!("A1:{}1", column_letter(self.width))
    }
}

/// JSON object entries in document order, duplicates included.
struct RawEntries(Vec<(String, String)>);

impl<'de> Deserialize<'de> for RawEntries {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of display name to column letter")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<RawEntries, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((k, v)) = map.next_entry::<String, String>()? {
                    out.push((k, v));
                }
                Ok(RawEntries(out))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Zero-based column index → spreadsheet letters (0 → `A`, 26 → `AA`).
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Spreadsheet letters → zero-based column index. Case-insensitive.
pub fn parse_column(letters: &str) -> Option<usize> {
    let letters = letters.trim();
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }

    let mut n: usize = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let v = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        n = n * 26 + v;
    }
    Some(n - 1)
}
