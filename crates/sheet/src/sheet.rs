use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use indexmap::IndexMap;
use std::collections::HashMap;

/// A sheet representing a 2D grid of cells (row-major storage)
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    data: Vec<Vec<CellValue>>,
    column_names: Option<Vec<String>>,
    column_index: Option<HashMap<String, usize>>,
    header_row: Option<usize>,
}

impl Sheet {
    /// Create a new empty sheet
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Sheet1")
    }

    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            data: Vec::new(),
            column_names: None,
            column_index: None,
            header_row: None,
        }
    }

    /// Create a sheet from a 2D vector of values
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Self {
        let converted: Vec<Vec<CellValue>> = data
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();

        let mut sheet = Self::new();
        sheet.data = converted;
        sheet
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Get the number of rows (header row included)
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Get the number of columns (width of the widest row)
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.data.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the sheet is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // ===== Row Access =====

    /// Get an entire row by index (0-based)
    pub fn row(&self, index: usize) -> Result<&Vec<CellValue>> {
        self.data.get(index).ok_or(SheetError::RowIndexOutOfBounds {
            index,
            count: self.row_count(),
        })
    }

    // ===== Named Access =====

    /// Use the specified row as column headers.
    ///
    /// Blank header cells are named `Unnamed: <index>` so that every column
    /// stays addressable. Repeated names get a `.1`, `.2`, ... suffix; the
    /// first occurrence keeps the plain name.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::RowIndexOutOfBounds` if the row does not exist.
    pub fn name_columns_by_row(&mut self, row_index: usize) -> Result<()> {
        let width = self.col_count();
        let header_row = self.row(row_index)?;

        let mut names = Vec::with_capacity(width);
        let mut index_map = HashMap::with_capacity(width);
        for i in 0..width {
            let base = match header_row.get(i) {
                Some(cell) if !cell.is_blank() => header_text(cell),
                _ => format!("Unnamed: {i}"),
            };

            let mut name = base.clone();
            let mut n = 0;
            while index_map.contains_key(&name) {
                n += 1;
                name = format!("{base}.{n}");
            }

            index_map.insert(name.clone(), i);
            names.push(name);
        }

        self.column_names = Some(names);
        self.column_index = Some(index_map);
        self.header_row = Some(row_index);
        Ok(())
    }

    /// The raw header row, if columns are named
    #[must_use]
    pub fn header(&self) -> Option<&[CellValue]> {
        self.header_row
            .and_then(|h| self.data.get(h))
            .map(Vec::as_slice)
    }

    /// Get column names (if set)
    #[must_use]
    pub fn column_names(&self) -> Option<&Vec<String>> {
        self.column_names.as_ref()
    }

    /// Get the column index by name
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.column_index
            .as_ref()
            .ok_or_else(|| {
                SheetError::ColumnsNotNamed("Call name_columns_by_row() first".to_string())
            })?
            .get(name)
            .copied()
            .ok_or_else(|| SheetError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    // ===== Row Views =====

    /// Rows below the header row, or every row if columns are not named
    pub fn data_rows(&self) -> impl Iterator<Item = &Vec<CellValue>> {
        let skip = self.header_row.map_or(0, |h| h + 1);
        self.data.iter().skip(skip)
    }

    /// Data rows as header -> value records.
    ///
    /// Returns `None` if columns are not named. Missing trailing cells are
    /// reported as `CellValue::Null`.
    #[must_use]
    pub fn records(&self) -> Option<Vec<IndexMap<String, CellValue>>> {
        let names = self.column_names.as_ref()?;

        let records = self
            .data_rows()
            .map(|row| {
                names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| (name.clone(), row.get(i).cloned().unwrap_or_default()))
                    .collect()
            })
            .collect();

        Some(records)
    }

    /// A copy of this sheet holding the header row (if named) and at most `n` data rows
    #[must_use]
    pub fn head(&self, n: usize) -> Sheet {
        let keep = self.header_row.map_or(n, |h| h + 1 + n);
        let mut sheet = self.clone();
        sheet.data.truncate(keep);
        sheet
    }

    /// Get rows iterator (header row included)
    pub fn rows(&self) -> impl Iterator<Item = &Vec<CellValue>> {
        self.data.iter()
    }

    /// Get internal data reference
    #[must_use]
    pub fn data(&self) -> &Vec<Vec<CellValue>> {
        &self.data
    }

    /// Get mutable internal data reference
    pub fn data_mut(&mut self) -> &mut Vec<Vec<CellValue>> {
        &mut self.data
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

/// Header text for a cell. Whole-number floats drop their fraction so that a
/// numeric header like `2024` reads the same as it does in the workbook.
fn header_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Float(f) if f.fract() == 0.0 && f.is_finite() => format!("{}", *f as i64),
        other => other.as_str().trim().to_string(),
    }
}
