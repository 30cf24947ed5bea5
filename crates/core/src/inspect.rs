//! Workbook inspection helpers behind the CLI's diagnostic commands.

use crate::error::ConvertResult;
use crate::export::write_atomic;
use indexmap::IndexMap;
use serde::Serialize;
use standings_sheet::{Book, CellValue, Sheet};
use std::path::Path;

/// A column whose header matched a keyword search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMatch {
    pub index: usize,
    pub name: String,
}

/// Columns whose header contains any keyword, ignoring case
pub fn find_columns(sheet: &Sheet, keywords: &[String]) -> Vec<ColumnMatch> {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    sheet
        .column_names()
        .map(|names| {
            names
                .iter()
                .enumerate()
                .filter(|(_, name)| {
                    let lower = name.to_lowercase();
                    keywords.iter().any(|k| lower.contains(k.as_str()))
                })
                .map(|(index, name)| ColumnMatch {
                    index,
                    name: name.clone(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Snapshot of a workbook: its sheets and the driver sheet as records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkbookOverview {
    pub sheets: Vec<String>,
    pub driver_columns: Vec<String>,
    pub driver_data: Vec<IndexMap<String, CellValue>>,
}

impl WorkbookOverview {
    /// Build the overview; the driver sheet must exist and have a header row.
    pub fn from_book(book: &Book, driver_sheet: &str) -> ConvertResult<Self> {
        let sheet = book.get_sheet(driver_sheet)?;
        let mut named = sheet.clone();
        if named.column_names().is_none() && !named.is_empty() {
            named.name_columns_by_row(0)?;
        }

        Ok(WorkbookOverview {
            sheets: book.sheet_names().into_iter().map(str::to_string).collect(),
            driver_columns: named.column_names().cloned().unwrap_or_default(),
            driver_data: named.records().unwrap_or_default(),
        })
    }

    /// Write as pretty JSON
    pub fn save(&self, path: &Path) -> ConvertResult<()> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        write_atomic(path, &json)
    }
}
