//! Driver table extractor: one [`Driver`] per row of the driver sheet.

use crate::coerce::{coerce_ballast, coerce_points, NotANumber};
use crate::error::{ConvertError, ConvertResult};
use crate::join::RaceResultJoiner;
use crate::model::{Driver, LookupWarning};
use crate::schema::{DriverColumn, DriverRow, DriverTable};
use crate::season::SeasonConfig;

/// Build every driver of the bound sheet, in sheet order. Fully blank rows
/// are skipped but keep their place in the numbering: a driver's id is its
/// data row position, counted from 1.
///
/// # Errors
///
/// `MissingValue` for a row without a driver name, `MalformedNumber` for a
/// points or ballast cell that is not a number.
pub fn extract_drivers(
    table: &DriverTable<'_>,
    joiner: &RaceResultJoiner<'_>,
    season: &SeasonConfig,
    warnings: &mut Vec<LookupWarning>,
) -> ConvertResult<Vec<Driver>> {
    let mut drivers = Vec::new();

    for row in table.rows() {
        if row.is_blank() {
            tracing::debug!("Skipping blank row {} of '{}'", row.number, table.sheet_name());
            continue;
        }

        let id = u32::try_from(row.number - 1).unwrap_or(u32::MAX);
        let driver = extract_driver(id, table.sheet_name(), &row, joiner, season, warnings)?;
        drivers.push(driver);
    }

    Ok(drivers)
}

fn extract_driver(
    id: u32,
    sheet: &str,
    row: &DriverRow<'_>,
    joiner: &RaceResultJoiner<'_>,
    season: &SeasonConfig,
    warnings: &mut Vec<LookupWarning>,
) -> ConvertResult<Driver> {
    let name_cell = row.get(DriverColumn::Driver);
    if name_cell.is_blank() {
        return Err(ConvertError::MissingValue {
            sheet: sheet.to_string(),
            row: row.number,
            column: DriverColumn::Driver.header().to_string(),
        });
    }
    let name = name_cell.as_str();

    let malformed = |column: DriverColumn| {
        move |e: NotANumber| ConvertError::MalformedNumber {
            sheet: sheet.to_string(),
            row: row.number,
            column: column.header().to_string(),
            kind: e.kind,
            value: e.value,
        }
    };

    let total_points = coerce_points(row.get(DriverColumn::ChampionshipPoints))
        .map_err(malformed(DriverColumn::ChampionshipPoints))?;
    let current_ballast = coerce_ballast(row.get(DriverColumn::CurrentBallast))
        .map_err(malformed(DriverColumn::CurrentBallast))?;
    let class = season
        .class_map
        .classify(&row.get(DriverColumn::CarClass).as_str());

    let race_results = joiner.join(row, &name, warnings)?;

    Ok(Driver {
        id,
        name,
        class,
        total_points,
        current_ballast,
        team: season.team.clone(),
        race_results,
    })
}
