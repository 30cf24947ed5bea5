use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use indexmap::IndexMap;

/// A workbook held fully in memory (preserves sheet order)
#[derive(Debug, Clone)]
pub struct Book {
    name: String,
    sheets: IndexMap<String, Sheet>,
}

impl Book {
    /// Create a new empty book
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Book1")
    }

    /// Create a new empty book with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Book {
            name: name.to_string(),
            sheets: IndexMap::new(),
        }
    }

    /// Get the book name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if the book is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Get all sheet names in workbook order
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    // ===== Sheet Access =====

    /// Get a sheet by name
    pub fn get_sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheets
            .get(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// Add a sheet to the book
    pub fn add_sheet(&mut self, name: &str, sheet: Sheet) -> Result<()> {
        if self.sheets.contains_key(name) {
            return Err(SheetError::SheetAlreadyExists {
                name: name.to_string(),
            });
        }

        let mut sheet = sheet;
        sheet.set_name(name);
        self.sheets.insert(name.to_string(), sheet);
        Ok(())
    }

    /// Iterate over sheets
    pub fn sheets(&self) -> impl Iterator<Item = (&str, &Sheet)> {
        self.sheets.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Default for Book {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_book() {
        let book = Book::new();
        assert_eq!(book.name(), "Book1");
        assert!(book.is_empty());
    }

    #[test]
    fn test_add_sheet_keeps_order() {
        let mut book = Book::new();
        book.add_sheet("Drivers", Sheet::new()).unwrap();
        book.add_sheet("Sebring International Raceway", Sheet::new())
            .unwrap();

        assert_eq!(
            book.sheet_names(),
            vec!["Drivers", "Sebring International Raceway"]
        );
        assert_eq!(book.get_sheet("Drivers").unwrap().name(), "Drivers");
    }

    #[test]
    fn test_duplicate_sheet_rejected() {
        let mut book = Book::new();
        book.add_sheet("Drivers", Sheet::new()).unwrap();

        let err = book.add_sheet("Drivers", Sheet::new()).unwrap_err();
        assert!(matches!(err, SheetError::SheetAlreadyExists { .. }));
    }

    #[test]
    fn test_missing_sheet() {
        let book = Book::new();
        let err = book.get_sheet("Fuji Speedway").unwrap_err();
        assert!(matches!(err, SheetError::SheetNotFound { name } if name == "Fuji Speedway"));
    }
}
