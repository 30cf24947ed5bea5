//! Typed access to the driver sheet and the per-race detail sheets.
//!
//! Column names are resolved once, when a sheet is bound, instead of being
//! looked up by string for every cell.

use crate::error::{ConvertError, ConvertResult, LookupError};
use crate::season::{ColumnTemplates, RaceDescriptor, SeasonConfig};
use standings_sheet::{CellValue, Sheet, SheetError};
use std::borrow::Cow;

static NULL: CellValue = CellValue::Null;

/// Required columns of the driver sheet. Discriminants index bound columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverColumn {
    Driver,
    CarClass,
    ChampionshipPoints,
    CurrentBallast,
}

impl DriverColumn {
    pub const ALL: [DriverColumn; 4] = [
        DriverColumn::Driver,
        DriverColumn::CarClass,
        DriverColumn::ChampionshipPoints,
        DriverColumn::CurrentBallast,
    ];

    pub fn header(self) -> &'static str {
        match self {
            DriverColumn::Driver => "Driver",
            DriverColumn::CarClass => "CarClass",
            DriverColumn::ChampionshipPoints => "Championship Points",
            DriverColumn::CurrentBallast => "Current Ballast",
        }
    }
}

/// Per-race columns of the driver sheet, named from [`ColumnTemplates`].
/// Discriminants index [`RaceColumns`] slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceColumn {
    Points,
    Attendance,
    Ballast,
}

impl RaceColumn {
    pub const ALL: [RaceColumn; 3] = [RaceColumn::Points, RaceColumn::Attendance, RaceColumn::Ballast];

    fn template(self, templates: &ColumnTemplates) -> &str {
        match self {
            RaceColumn::Points => &templates.points,
            RaceColumn::Attendance => &templates.attendance,
            RaceColumn::Ballast => &templates.ballast,
        }
    }
}

/// Columns of a race detail sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailColumn {
    Driver,
    FinishTime,
    FinishTimeFormatted,
    TimePenalty,
    Laps,
}

impl DetailColumn {
    /// Optional timing columns, in the order stored by [`DetailRecord`].
    pub const TIMING: [DetailColumn; 4] = [
        DetailColumn::FinishTime,
        DetailColumn::FinishTimeFormatted,
        DetailColumn::TimePenalty,
        DetailColumn::Laps,
    ];

    pub fn header(self) -> &'static str {
        match self {
            DetailColumn::Driver => "Driver",
            DetailColumn::FinishTime => "FinishTime",
            DetailColumn::FinishTimeFormatted => "FinishTimeFormatted",
            DetailColumn::TimePenalty => "TimePenalty",
            DetailColumn::Laps => "Laps",
        }
    }

    fn timing_slot(self) -> Option<usize> {
        Self::TIMING.iter().position(|c| *c == self)
    }
}

/// The sheet with its first row as headers. Sheets loaded with headers are
/// borrowed; others are named on a copy.
fn named(sheet: &Sheet) -> Result<Cow<'_, Sheet>, SheetError> {
    if sheet.column_names().is_some() {
        return Ok(Cow::Borrowed(sheet));
    }
    let mut copy = sheet.clone();
    if !copy.is_empty() {
        copy.name_columns_by_row(0)?;
    }
    Ok(Cow::Owned(copy))
}

/// Times `header` appears in the raw header row.
fn header_count(sheet: &Sheet, header: &str) -> usize {
    sheet.header().map_or(0, |row| {
        row.iter()
            .filter(|cell| cell.as_str().trim() == header)
            .count()
    })
}

/// Resolved per-race columns for one race. Absent columns are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceColumns {
    pub race_id: u32,
    pub track: String,
    names: [String; 3],
    indices: [Option<usize>; 3],
}

impl RaceColumns {
    fn resolve(sheet: &Sheet, race: &RaceDescriptor, templates: &ColumnTemplates) -> Self {
        let names = RaceColumn::ALL.map(|c| ColumnTemplates::render(c.template(templates), &race.track));
        let indices = names.clone().map(|name| sheet.column_index(&name).ok());

        RaceColumns {
            race_id: race.id,
            track: race.track.clone(),
            names,
            indices,
        }
    }

    /// Header text of a per-race column
    pub fn name(&self, column: RaceColumn) -> &str {
        &self.names[column as usize]
    }

    /// Whether the driver sheet carries this column
    pub fn has(&self, column: RaceColumn) -> bool {
        self.indices[column as usize].is_some()
    }
}

/// The driver sheet bound to its schema.
#[derive(Debug)]
pub struct DriverTable<'a> {
    sheet: Cow<'a, Sheet>,
    required: [usize; 4],
    races: Vec<RaceColumns>,
}

impl<'a> DriverTable<'a> {
    /// Validate required columns and resolve per-race columns in race-list order.
    ///
    /// # Errors
    ///
    /// `MissingColumn` for any absent [`DriverColumn`], `DuplicateColumn` for
    /// one that appears more than once. Other repeated headers are allowed;
    /// per-race columns bind to their first occurrence.
    pub fn bind(sheet: &'a Sheet, season: &SeasonConfig) -> ConvertResult<Self> {
        let sheet = named(sheet)?;

        let mut required = [0; 4];
        for column in DriverColumn::ALL {
            required[column as usize] = sheet
                .column_index(column.header())
                .map_err(|_| ConvertError::MissingColumn {
                    sheet: sheet.name().to_string(),
                    column: column.header().to_string(),
                })?;
            if header_count(&sheet, column.header()) > 1 {
                return Err(ConvertError::DuplicateColumn {
                    sheet: sheet.name().to_string(),
                    column: column.header().to_string(),
                });
            }
        }

        let races = season
            .races
            .iter()
            .map(|race| RaceColumns::resolve(&sheet, race, &season.columns))
            .collect();

        Ok(DriverTable {
            sheet,
            required,
            races,
        })
    }

    pub fn sheet_name(&self) -> &str {
        self.sheet.name()
    }

    /// Per-race columns, in race-list order
    pub fn races(&self) -> &[RaceColumns] {
        &self.races
    }

    /// Data rows, numbered as they appear in the workbook (header is row 1)
    pub fn rows(&self) -> impl Iterator<Item = DriverRow<'_>> {
        self.sheet
            .data_rows()
            .enumerate()
            .map(move |(i, cells)| DriverRow {
                number: i + 2,
                cells: cells.as_slice(),
                required: &self.required,
            })
    }
}

/// One data row of the driver sheet.
#[derive(Debug, Clone, Copy)]
pub struct DriverRow<'a> {
    pub number: usize,
    cells: &'a [CellValue],
    required: &'a [usize; 4],
}

impl<'a> DriverRow<'a> {
    fn cell(&self, index: usize) -> &'a CellValue {
        self.cells.get(index).unwrap_or(&NULL)
    }

    pub fn get(&self, column: DriverColumn) -> &'a CellValue {
        self.cell(self.required[column as usize])
    }

    /// Per-race cell, or `None` if the column does not exist
    pub fn race(&self, race: &RaceColumns, column: RaceColumn) -> Option<&'a CellValue> {
        race.indices[column as usize].map(|index| self.cell(index))
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_blank)
    }
}

/// Timing cells of one detail-sheet row, in [`DetailColumn::TIMING`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRecord {
    pub driver: String,
    timing: [CellValue; 4],
}

impl DetailRecord {
    /// Timing cell; `Null` when the sheet lacks the column
    pub fn get(&self, column: DetailColumn) -> &CellValue {
        column
            .timing_slot()
            .map_or(&NULL, |slot| &self.timing[slot])
    }
}

/// A race detail sheet reduced to the columns the joiner reads.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailTable {
    sheet: String,
    records: Vec<DetailRecord>,
}

impl DetailTable {
    /// Bind a detail sheet. `Driver` is required exactly once; timing columns
    /// are optional, read as empty when absent and taken from their first
    /// occurrence when repeated.
    pub fn bind(sheet: &Sheet) -> Result<Self, LookupError> {
        let sheet_name = sheet.name().to_string();
        let sheet = named(sheet).map_err(|e| LookupError::Unreadable {
            sheet: sheet_name.clone(),
            message: e.to_string(),
        })?;

        let driver_col = sheet
            .column_index(DetailColumn::Driver.header())
            .map_err(|_| LookupError::ColumnMissing {
                sheet: sheet_name.clone(),
                column: DetailColumn::Driver.header().to_string(),
            })?;
        if header_count(&sheet, DetailColumn::Driver.header()) > 1 {
            return Err(LookupError::DuplicateColumn {
                sheet: sheet_name,
                column: DetailColumn::Driver.header().to_string(),
            });
        }
        let timing_cols = DetailColumn::TIMING.map(|c| sheet.column_index(c.header()).ok());

        let records = sheet
            .data_rows()
            .map(|row| DetailRecord {
                driver: row.get(driver_col).map(CellValue::as_str).unwrap_or_default(),
                timing: timing_cols.map(|col| {
                    col.and_then(|i| row.get(i))
                        .cloned()
                        .unwrap_or_default()
                }),
            })
            .collect();

        Ok(DetailTable {
            sheet: sheet_name,
            records,
        })
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet
    }

    /// Rows whose `Driver` equals `driver` exactly, in sheet order
    pub fn matches<'s>(&'s self, driver: &'s str) -> impl Iterator<Item = &'s DetailRecord> {
        self.records.iter().filter(move |r| r.driver == driver)
    }
}
