use crate::book::Book;
use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use calamine::{open_workbook, Data, Reader, Xlsx, XlsxError};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError as WriteError};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Options for reading Excel files
#[derive(Debug, Clone, Default)]
pub struct XlsxReadOptions {
    /// Whether the first row contains headers
    pub has_headers: bool,
}

impl XlsxReadOptions {
    /// Set whether the first row contains headers
    #[must_use]
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }
}

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        // Excel stores dates and times as days since 1899-12-30
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

fn read_error(e: XlsxError) -> SheetError {
    SheetError::Workbook(e.to_string())
}

fn write_error(e: WriteError) -> SheetError {
    SheetError::Workbook(e.to_string())
}

/// Open a workbook, reporting a missing path as `FileNotFound`.
///
/// The returned handle is dropped by the caller once its sheets are read.
fn open_xlsx(path: &Path) -> Result<Xlsx<BufReader<File>>> {
    if !path.exists() {
        return Err(SheetError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    open_workbook(path).map_err(read_error)
}

fn read_range(workbook: &mut Xlsx<BufReader<File>>, sheet_name: &str) -> Result<Sheet> {
    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| match e {
            XlsxError::WorksheetNotFound(name) => SheetError::SheetNotFound { name },
            other => read_error(other),
        })?;

    let mut sheet = Sheet::with_name(sheet_name);
    *sheet.data_mut() = range
        .rows()
        .map(|row| row.iter().map(data_to_cell_value).collect())
        .collect();

    Ok(sheet)
}

impl Sheet {
    /// Load a specific sheet from an Excel file by name
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened, sheet not found, or read fails.
    pub fn from_xlsx_sheet<P: AsRef<Path>>(path: P, sheet_name: &str) -> Result<Self> {
        Self::from_xlsx_sheet_with_options(path, sheet_name, XlsxReadOptions::default())
    }

    /// Load a specific sheet from an Excel file with options
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened, sheet not found, or read fails.
    pub fn from_xlsx_sheet_with_options<P: AsRef<Path>>(
        path: P,
        sheet_name: &str,
        options: XlsxReadOptions,
    ) -> Result<Self> {
        let mut sheet = {
            let mut workbook = open_xlsx(path.as_ref())?;
            read_range(&mut workbook, sheet_name)?
        };

        if options.has_headers && sheet.row_count() > 0 {
            sheet.name_columns_by_row(0)?;
        }

        Ok(sheet)
    }

    /// Save the sheet to an Excel file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or written.
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        write_to_worksheet(self, self.name(), worksheet)?;

        workbook.save(path.as_ref()).map_err(write_error)
    }
}

/// Write sheet data to a worksheet
fn write_to_worksheet(sheet: &Sheet, name: &str, worksheet: &mut Worksheet) -> Result<()> {
    worksheet.set_name(name).map_err(write_error)?;

    for (row_idx, row) in sheet.data().iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let row_num = u32::try_from(row_idx)
                .map_err(|_| SheetError::Workbook("Row index overflow".to_string()))?;
            let col_num = u16::try_from(col_idx)
                .map_err(|_| SheetError::Workbook("Column index overflow".to_string()))?;

            match cell {
                CellValue::Null => {} // Leave empty
                CellValue::Bool(b) => {
                    worksheet
                        .write_boolean(row_num, col_num, *b)
                        .map_err(write_error)?;
                }
                CellValue::Int(i) => {
                    // Excel stores all numbers as f64; integers read back as floats
                    worksheet
                        .write_number(row_num, col_num, *i as f64)
                        .map_err(write_error)?;
                }
                CellValue::Float(f) => {
                    worksheet
                        .write_number(row_num, col_num, *f)
                        .map_err(write_error)?;
                }
                CellValue::String(s) => {
                    worksheet
                        .write_string(row_num, col_num, s)
                        .map_err(write_error)?;
                }
            }
        }
    }

    Ok(())
}

impl Book {
    /// Load a book from an Excel file (all sheets)
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened or read.
    pub fn from_xlsx<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_xlsx_with_options(path, XlsxReadOptions::default())
    }

    /// Load a book from an Excel file with options.
    ///
    /// Every sheet is read into memory and the file handle is released
    /// before this returns. With `has_headers`, every non-empty sheet is
    /// named by its first row.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened or read.
    pub fn from_xlsx_with_options<P: AsRef<Path>>(
        path: P,
        options: XlsxReadOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        let mut workbook = open_xlsx(path)?;

        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
        let name = path
            .file_stem()
            .map_or_else(|| "Book1".to_string(), |s| s.to_string_lossy().into_owned());
        let mut book = Book::with_name(&name);

        for sheet_name in sheet_names {
            let mut sheet = read_range(&mut workbook, &sheet_name)?;

            if options.has_headers && sheet.row_count() > 0 {
                sheet.name_columns_by_row(0)?;
            }

            book.add_sheet(&sheet_name, sheet)?;
        }

        Ok(book)
    }

    /// Save the book to an Excel file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or written.
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut workbook = Workbook::new();

        for (name, sheet) in self.sheets() {
            let worksheet = workbook.add_worksheet();
            write_to_worksheet(sheet, name, worksheet)?;
        }

        workbook.save(path.as_ref()).map_err(write_error)
    }

    /// Get sheet names from an Excel file without loading data
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened.
    pub fn xlsx_sheet_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let workbook = open_xlsx(path.as_ref())?;
        Ok(workbook.sheet_names().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_xlsx_types() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("types.xlsx");

        let mut sheet = Sheet::with_name("Types");
        *sheet.data_mut() = vec![vec![
            CellValue::String("text".to_string()),
            CellValue::Int(42),
            CellValue::Float(3.5),
            CellValue::Bool(true),
            CellValue::Null,
        ]];

        sheet.save_as_xlsx(&path).unwrap();

        let loaded = Sheet::from_xlsx_sheet(&path, "Types").unwrap();

        assert_eq!(loaded.row_count(), 1);
        // Note: trailing empty cells are not preserved in Excel files
        assert_eq!(loaded.col_count(), 4);
        let row = loaded.row(0).unwrap();
        assert!(matches!(&row[0], CellValue::String(s) if s == "text"));
        // Int becomes Float in Excel
        assert!(matches!(&row[1], CellValue::Float(f) if (*f - 42.0).abs() < 0.01));
        assert!(matches!(&row[3], CellValue::Bool(true)));
    }

    #[test]
    fn test_xlsx_sheet_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("multi.xlsx");

        let mut book = Book::new();
        book.add_sheet("Drivers", Sheet::from_data(vec![vec!["Driver"]]))
            .unwrap();
        book.add_sheet("Silverstone Circuit", Sheet::from_data(vec![vec!["Driver"]]))
            .unwrap();
        book.save_as_xlsx(&path).unwrap();

        let names = Book::xlsx_sheet_names(&path).unwrap();
        assert_eq!(names, vec!["Drivers", "Silverstone Circuit"]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = Book::from_xlsx(dir.path().join("absent.xlsx")).unwrap_err();
        assert!(matches!(err, SheetError::FileNotFound { .. }));
    }

    #[test]
    fn test_missing_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("one.xlsx");
        Sheet::from_data(vec![vec!["Driver"]]).save_as_xlsx(&path).unwrap();

        let err = Sheet::from_xlsx_sheet(&path, "Drivers").unwrap_err();
        assert!(matches!(err, SheetError::SheetNotFound { name } if name == "Drivers"));
    }
}
