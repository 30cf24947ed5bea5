//! Race result joiner: per-race columns of the driver sheet, plus timing
//! recovered from each race's detail sheet.

use crate::coerce::{coerce_ballast, coerce_float, coerce_int, coerce_points, coerce_text, NotANumber};
use crate::error::{ConvertError, ConvertResult, LookupError};
use crate::model::{Attendance, LookupWarning, RaceResult, RaceTiming};
use crate::schema::{DetailColumn, DetailTable, DriverRow, RaceColumn, RaceColumns};
use crate::season::RaceDescriptor;
use standings_sheet::Book;
use std::collections::HashMap;

/// Detail sheets of a workbook, bound once per run and keyed by track.
#[derive(Debug, Default)]
pub struct DetailIndex {
    tables: HashMap<String, Result<DetailTable, LookupError>>,
}

impl DetailIndex {
    /// Bind the detail sheet of every race. Missing or unusable sheets are
    /// kept as errors and reported when a lookup needs them.
    pub fn build(book: &Book, races: &[RaceDescriptor]) -> Self {
        let tables = races
            .iter()
            .map(|race| {
                let table = book
                    .get_sheet(&race.track)
                    .map_err(|_| LookupError::SheetMissing(race.track.clone()))
                    .and_then(DetailTable::bind);
                (race.track.clone(), table)
            })
            .collect();

        DetailIndex { tables }
    }

    /// Timing for `driver` in the race run at `track`. First match wins.
    pub fn lookup(&self, track: &str, driver: &str) -> Result<RaceTiming, LookupError> {
        let table = self
            .tables
            .get(track)
            .ok_or_else(|| LookupError::SheetMissing(track.to_string()))?
            .as_ref()
            .map_err(Clone::clone)?;

        let mut matches = table.matches(driver);
        let record = matches
            .next()
            .ok_or_else(|| LookupError::NoMatch(track.to_string()))?;

        let extra = matches.count();
        if extra > 0 {
            tracing::debug!(
                "{} appears {} times in '{}', using the first row",
                driver,
                extra + 1,
                table.sheet_name()
            );
        }

        let malformed = |column: DetailColumn| {
            move |e: NotANumber| LookupError::Malformed {
                sheet: table.sheet_name().to_string(),
                column: column.header().to_string(),
                value: e.value,
            }
        };

        Ok(RaceTiming {
            finish_time: coerce_float(record.get(DetailColumn::FinishTime))
                .map_err(malformed(DetailColumn::FinishTime))?,
            finish_time_formatted: coerce_text(record.get(DetailColumn::FinishTimeFormatted)),
            time_penalty: coerce_int(record.get(DetailColumn::TimePenalty))
                .map_err(malformed(DetailColumn::TimePenalty))?,
            laps: coerce_int(record.get(DetailColumn::Laps))
                .map_err(malformed(DetailColumn::Laps))?,
        })
    }
}

/// Builds a driver's race results in race-list order.
#[derive(Debug)]
pub struct RaceResultJoiner<'a> {
    sheet: &'a str,
    races: &'a [RaceColumns],
    details: &'a DetailIndex,
}

impl<'a> RaceResultJoiner<'a> {
    pub fn new(sheet: &'a str, races: &'a [RaceColumns], details: &'a DetailIndex) -> Self {
        RaceResultJoiner {
            sheet,
            races,
            details,
        }
    }

    /// Results for one driver. Races with an empty or absent points cell
    /// produce nothing. Failed timing lookups are pushed to `warnings` and the
    /// result keeps empty timing.
    ///
    /// # Errors
    ///
    /// `MalformedNumber` when a points or ballast cell is not a number.
    pub fn join(
        &self,
        row: &DriverRow<'_>,
        driver: &str,
        warnings: &mut Vec<LookupWarning>,
    ) -> ConvertResult<Vec<RaceResult>> {
        let mut results = Vec::new();

        for race in self.races {
            let Some(points_cell) = row.race(race, RaceColumn::Points).filter(|c| !c.is_blank())
            else {
                continue;
            };

            let points = coerce_points(points_cell)
                .map_err(|e| self.malformed(row, race.name(RaceColumn::Points), e))?;
            let ballast_change = match row.race(race, RaceColumn::Ballast) {
                Some(cell) => coerce_ballast(cell)
                    .map_err(|e| self.malformed(row, race.name(RaceColumn::Ballast), e))?,
                None => 0,
            };
            let attendance = Attendance::from_cell(row.race(race, RaceColumn::Attendance));

            let timing = match self.details.lookup(&race.track, driver) {
                Ok(timing) => timing,
                Err(error) => {
                    let warning = LookupWarning {
                        driver: driver.to_string(),
                        race_id: race.race_id,
                        track: race.track.clone(),
                        error,
                    };
                    tracing::warn!("{}", warning);
                    warnings.push(warning);
                    RaceTiming::default()
                }
            };

            results.push(RaceResult {
                race_id: race.race_id,
                points,
                attendance,
                ballast_change,
                timing,
            });
        }

        Ok(results)
    }

    fn malformed(&self, row: &DriverRow<'_>, column: &str, e: NotANumber) -> ConvertError {
        ConvertError::MalformedNumber {
            sheet: self.sheet.to_string(),
            row: row.number,
            column: column.to_string(),
            kind: e.kind,
            value: e.value,
        }
    }
}
