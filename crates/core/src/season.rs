//! Static season reference data: the race calendar, class labels and the
//! naming convention for per-race columns on the driver sheet.

use crate::error::{ConvertError, ConvertResult};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Placeholder replaced by a race's track name in column templates.
pub const TRACK_PLACEHOLDER: &str = "{track}";

/// A race event. Independent of spreadsheet content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceDescriptor {
    pub id: u32,
    pub name: String,
    pub date: NaiveDate,
    /// Track name; also the name of the race's detail sheet.
    pub track: String,
}

impl RaceDescriptor {
    fn new(id: u32, name: &str, (y, m, d): (i32, u32, u32), track: &str) -> Self {
        RaceDescriptor {
            id,
            name: name.to_string(),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
            track: track.to_string(),
        }
    }
}

/// Raw car class label -> published label. Exact match only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassMap(IndexMap<String, String>);

impl ClassMap {
    /// Map a raw class label, passing unknown labels through unchanged.
    pub fn classify(&self, raw: &str) -> String {
        self.0
            .get(raw)
            .cloned()
            .unwrap_or_else(|| raw.to_string())
    }
}

impl Default for ClassMap {
    fn default() -> Self {
        ClassMap(IndexMap::from([
            ("LMP2_ELMS".to_string(), "LMP2".to_string()),
            ("GT3".to_string(), "LMGT3".to_string()),
        ]))
    }
}

/// Templates for the per-race columns of the driver sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTemplates {
    pub points: String,
    pub attendance: String,
    pub ballast: String,
}

impl Default for ColumnTemplates {
    fn default() -> Self {
        ColumnTemplates {
            points: "points {track}".to_string(),
            attendance: "attendance {track}".to_string(),
            ballast: "Ballast {track}".to_string(),
        }
    }
}

impl ColumnTemplates {
    /// Expand a template for one track
    pub fn render(template: &str, track: &str) -> String {
        template.replace(TRACK_PLACEHOLDER, track)
    }
}

fn default_team() -> String {
    "OOFS Racing".to_string()
}

fn default_driver_sheet() -> String {
    "Drivers".to_string()
}

/// Everything about a season that the workbook does not carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonConfig {
    pub season: String,
    pub current_round: u32,
    pub total_rounds: u32,
    #[serde(default = "default_team")]
    pub team: String,
    #[serde(default = "default_driver_sheet")]
    pub driver_sheet: String,
    #[serde(default)]
    pub class_map: ClassMap,
    #[serde(default)]
    pub columns: ColumnTemplates,
    /// Races in publication order. Results follow this order.
    pub races: Vec<RaceDescriptor>,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        SeasonConfig {
            season: "Season 2".to_string(),
            current_round: 5,
            total_rounds: 8,
            team: default_team(),
            driver_sheet: default_driver_sheet(),
            class_map: ClassMap::default(),
            columns: ColumnTemplates::default(),
            races: vec![
                RaceDescriptor::new(1, "Sebring", (2024, 10, 23), "Sebring International Raceway"),
                RaceDescriptor::new(2, "Qatar", (2024, 10, 30), "Lusail International Circuit"),
                RaceDescriptor::new(3, "Monza", (2024, 11, 6), "Autodromo Nazionale Monza"),
                RaceDescriptor::new(4, "Le Mans", (2024, 11, 13), "Circuit de la Sarthe"),
                RaceDescriptor::new(5, "Silverstone", (2024, 11, 20), "Silverstone Circuit"),
                RaceDescriptor::new(6, "Bahrain", (2024, 12, 4), "Bahrain International Circuit"),
                RaceDescriptor::new(7, "Fuji", (2024, 12, 11), "Fuji Speedway"),
                RaceDescriptor::new(8, "Spa", (2024, 12, 18), "Circuit de Spa-Francorchamps"),
            ],
        }
    }
}

impl SeasonConfig {
    /// Load a season from a `.yaml`/`.yml` or `.json` file and validate it.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ConvertResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let config: SeasonConfig = match extension.as_deref() {
            Some("yaml" | "yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => {
                return Err(ConvertError::Config(format!(
                    "unsupported season file '{}' (expected .yaml, .yml or .json)",
                    path.display()
                )))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Check the calendar is usable: at least one race, unique ids and
    /// tracks, templates that mention the track, and a sane round counter.
    pub fn validate(&self) -> ConvertResult<()> {
        if self.races.is_empty() {
            return Err(ConvertError::Config("season has no races".to_string()));
        }

        if self.current_round > self.total_rounds {
            return Err(ConvertError::Config(format!(
                "current round {} is past the last round {}",
                self.current_round, self.total_rounds
            )));
        }

        let mut ids = HashSet::new();
        let mut tracks = HashSet::new();
        for race in &self.races {
            if !ids.insert(race.id) {
                return Err(ConvertError::Config(format!("duplicate race id {}", race.id)));
            }
            if !tracks.insert(race.track.as_str()) {
                return Err(ConvertError::Config(format!(
                    "duplicate track '{}'",
                    race.track
                )));
            }
        }

        for (kind, template) in [
            ("points", &self.columns.points),
            ("attendance", &self.columns.attendance),
            ("ballast", &self.columns.ballast),
        ] {
            if !template.contains(TRACK_PLACEHOLDER) {
                return Err(ConvertError::Config(format!(
                    "{kind} column template '{template}' does not contain {TRACK_PLACEHOLDER}"
                )));
            }
        }

        Ok(())
    }
}
