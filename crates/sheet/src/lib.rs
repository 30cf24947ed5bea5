//! In-memory workbook model for the standings converter
//!
//! Reads `.xlsx` workbooks through `calamine` into ordered sheets of
//! [`CellValue`]s, with header-named column access. Empty cells are kept as
//! [`CellValue::Null`] and never replaced by a default.
//!
//! # Examples
//!
//! ## Named column access
//!
//! ```
//! use standings_sheet::{CellValue, Sheet};
//!
//! let mut sheet = Sheet::from_data(vec![
//!     vec![CellValue::from("Driver"), CellValue::from("Laps")],
//!     vec![CellValue::from("Alice"), CellValue::Int(41)],
//! ]);
//!
//! sheet.name_columns_by_row(0).unwrap();
//! let records = sheet.records().unwrap();
//! assert_eq!(records[0]["Laps"], CellValue::Int(41));
//! ```
//!
//! ## Loading a workbook
//!
//! ```no_run
//! use standings_sheet::{Book, XlsxReadOptions};
//!
//! let book = Book::from_xlsx_with_options(
//!     "XML Ingest - DEV.xlsx",
//!     XlsxReadOptions::default().with_headers(true),
//! )
//! .unwrap();
//! let drivers = book.get_sheet("Drivers").unwrap();
//! ```

mod book;
mod cell;
mod error;
mod sheet;
mod xlsx;

/// Re-export book type.
pub use book::Book;
/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export sheet type.
pub use sheet::Sheet;
/// Re-export XLSX read options.
pub use xlsx::XlsxReadOptions;
