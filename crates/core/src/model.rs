//! The exported championship document.

use crate::error::LookupError;
use crate::season::RaceDescriptor;
use serde::{Serialize, Serializer};
use standings_sheet::CellValue;
use std::collections::BTreeMap;
use std::fmt;

/// Sentinel published when a race's attendance cell is empty.
pub const UNKNOWN_ATTENDANCE: &str = "Unknown";

/// Attendance as recorded on the driver sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum Attendance {
    /// Raw cell value, published as-is.
    Recorded(CellValue),
    /// Empty cell.
    Unknown,
}

impl Attendance {
    pub fn from_cell(cell: Option<&CellValue>) -> Self {
        match cell {
            Some(value) if !value.is_blank() => Attendance::Recorded(value.clone()),
            _ => Attendance::Unknown,
        }
    }
}

impl Serialize for Attendance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Attendance::Recorded(value) => value.serialize(serializer),
            Attendance::Unknown => serializer.serialize_str(UNKNOWN_ATTENDANCE),
        }
    }
}

/// Timing recovered from a race's detail sheet. The default is "no timing".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceTiming {
    pub finish_time: Option<f64>,
    pub finish_time_formatted: Option<String>,
    pub time_penalty: i64,
    pub laps: i64,
}

/// One driver's result in one race.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceResult {
    pub race_id: u32,
    pub points: i64,
    pub attendance: Attendance,
    pub ballast_change: i64,
    #[serde(flatten)]
    pub timing: RaceTiming,
}

/// One row of the driver sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: u32,
    pub name: String,
    pub class: String,
    pub total_points: i64,
    pub current_ballast: i64,
    pub team: String,
    pub race_results: Vec<RaceResult>,
}

/// The document handed to the front-end.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Championship {
    pub season: String,
    pub current_round: u32,
    pub total_rounds: u32,
    pub drivers: Vec<Driver>,
    pub races: Vec<RaceDescriptor>,
}

/// A detail lookup that fell back to empty timing.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupWarning {
    pub driver: String,
    pub race_id: u32,
    pub track: String,
    pub error: LookupError,
}

impl fmt::Display for LookupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Could not get race time for {} in {}: {}",
            self.driver, self.track, self.error
        )
    }
}

/// What a conversion run produced, for reporting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionSummary {
    pub drivers: usize,
    pub results: usize,
    /// Driver count per published class, sorted by class label.
    pub by_class: BTreeMap<String, usize>,
    pub warnings: Vec<LookupWarning>,
}

impl ConversionSummary {
    pub fn from_drivers(drivers: &[Driver], warnings: Vec<LookupWarning>) -> Self {
        let mut by_class = BTreeMap::new();
        for driver in drivers {
            *by_class.entry(driver.class.clone()).or_insert(0) += 1;
        }

        ConversionSummary {
            drivers: drivers.len(),
            results: drivers.iter().map(|d| d.race_results.len()).sum(),
            by_class,
            warnings,
        }
    }
}
