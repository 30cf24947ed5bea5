//! # standings-core
//!
//! Converts a championship workbook into the structured document consumed
//! by the standings web page.
//!
//! This crate provides:
//! - Season configuration (race calendar, class mapping, column templates)
//! - Typed binding of the driver sheet and the per-race detail sheets
//! - Driver extraction and the driver to race join
//! - JavaScript module and JSON export with atomic replacement
//! - Workbook inspection helpers
//!
//! # Example
//!
//! ```no_run
//! use standings_core::{convert_workbook, export, ExportFormat, SeasonConfig};
//! use std::path::Path;
//!
//! let season = SeasonConfig::default();
//! let conversion = convert_workbook("XML Ingest - DEV.xlsx", &season)?;
//! export(
//!     &conversion.championship,
//!     Path::new("src/data/championship.js"),
//!     ExportFormat::JsModule,
//! )?;
//! # Ok::<(), standings_core::ConvertError>(())
//! ```

/// Cell value coercion rules.
pub mod coerce;
/// Error types and result aliases.
pub mod error;
/// Document rendering and atomic output.
pub mod export;
/// Driver table extraction.
pub mod extract;
/// Workbook inspection helpers.
pub mod inspect;
/// Driver to race join.
pub mod join;
/// Output data model.
pub mod model;
/// Sheet schemas and binding.
pub mod schema;
/// Season configuration.
pub mod season;

pub use error::{ConvertError, ConvertResult, LookupError};
pub use export::{export, render, ExportFormat};
pub use inspect::{find_columns, ColumnMatch, WorkbookOverview};
pub use model::{
    Attendance, Championship, ConversionSummary, Driver, LookupWarning, RaceResult, RaceTiming,
};
pub use season::{RaceDescriptor, SeasonConfig};

use join::{DetailIndex, RaceResultJoiner};
use schema::DriverTable;
use standings_sheet::{Book, XlsxReadOptions};
use std::path::Path;

/// Outcome of a conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub championship: Championship,
    pub summary: ConversionSummary,
}

/// Convert an already loaded workbook.
///
/// # Errors
///
/// Fails when the driver sheet is missing, lacks a required column, or holds
/// a row that cannot be converted. Detail sheet problems are only reported
/// as warnings in the summary.
pub fn convert_book(book: &Book, season: &SeasonConfig) -> ConvertResult<Conversion> {
    let sheet = book.get_sheet(&season.driver_sheet)?;
    let table = DriverTable::bind(sheet, season)?;
    let details = DetailIndex::build(book, &season.races);
    let joiner = RaceResultJoiner::new(table.sheet_name(), table.races(), &details);

    let mut warnings = Vec::new();
    let drivers = extract::extract_drivers(&table, &joiner, season, &mut warnings)?;
    let summary = ConversionSummary::from_drivers(&drivers, warnings);

    tracing::info!(
        "Converted {} drivers with {} race results from '{}'",
        summary.drivers,
        summary.results,
        book.name()
    );

    Ok(Conversion {
        championship: Championship {
            season: season.season.clone(),
            current_round: season.current_round,
            total_rounds: season.total_rounds,
            drivers,
            races: season.races.clone(),
        },
        summary,
    })
}

/// Load the workbook at `path` and convert it. The file is closed before
/// conversion starts.
///
/// # Errors
///
/// `FileNotFound` and other workbook errors, then everything
/// [`convert_book`] reports.
pub fn convert_workbook<P: AsRef<Path>>(path: P, season: &SeasonConfig) -> ConvertResult<Conversion> {
    let path = path.as_ref();
    tracing::info!("Reading workbook {}", path.display());

    let book = Book::from_xlsx_with_options(path, XlsxReadOptions::default().with_headers(true))?;
    convert_book(&book, season)
}
