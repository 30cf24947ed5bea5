use serde_json::json;
use standings_core::{
    convert_book, convert_workbook, export, ConvertError, ExportFormat, LookupError, SeasonConfig,
};
use standings_sheet::{Book, CellValue, Sheet, SheetError};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn drivers_sheet(extra_headers: &[&str], rows: Vec<Vec<CellValue>>) -> Sheet {
    let mut header: Vec<CellValue> = ["Driver", "CarClass", "Championship Points", "Current Ballast"]
        .into_iter()
        .map(CellValue::from)
        .collect();
    header.extend(extra_headers.iter().map(|h| CellValue::from(*h)));

    let mut data = vec![header];
    data.extend(rows);
    Sheet::from_data(data)
}

fn silverstone_detail() -> Sheet {
    Sheet::from_data(vec![
        vec![
            CellValue::from("Driver"),
            CellValue::from("FinishTime"),
            CellValue::from("FinishTimeFormatted"),
            CellValue::from("TimePenalty"),
            CellValue::from("Laps"),
        ],
        vec![
            CellValue::from("Alice"),
            CellValue::Float(5423.5),
            CellValue::from("1:30:23.500"),
            CellValue::Int(5),
            CellValue::Int(48),
        ],
    ])
}

fn write_book(dir: &Path, sheets: Vec<(&str, Sheet)>) -> PathBuf {
    let mut book = Book::new();
    for (name, sheet) in sheets {
        book.add_sheet(name, sheet).unwrap();
    }
    let path = dir.join("XML Ingest - DEV.xlsx");
    book.save_as_xlsx(&path).unwrap();
    path
}

// ===== Conversion =====

#[test]
fn test_single_race_without_detail_sheet() {
    let dir = tempdir().unwrap();
    let path = write_book(
        dir.path(),
        vec![(
            "Drivers",
            drivers_sheet(
                &["points Sebring International Raceway", "attendance Sebring International Raceway"],
                vec![vec![
                    "Alice".into(),
                    "LMP2_ELMS".into(),
                    10.into(),
                    CellValue::Null,
                    10.into(),
                    CellValue::Null,
                ]],
            ),
        )],
    );

    let conversion = convert_workbook(&path, &SeasonConfig::default()).unwrap();
    let alice = &conversion.championship.drivers[0];

    assert_eq!(alice.id, 1);
    assert_eq!(alice.class, "LMP2");
    assert_eq!(alice.total_points, 10);
    assert_eq!(alice.current_ballast, 0);
    assert_eq!(
        serde_json::to_value(&alice.race_results).unwrap(),
        json!([{
            "raceId": 1,
            "points": 10,
            "attendance": "Unknown",
            "ballastChange": 0,
            "finishTime": null,
            "finishTimeFormatted": null,
            "timePenalty": 0,
            "laps": 0
        }])
    );

    // the missing detail sheet is reported, not fatal
    let warnings = &conversion.summary.warnings;
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].error,
        LookupError::SheetMissing("Sebring International Raceway".to_string())
    );
}

#[test]
fn test_gt3_driver_without_points() {
    let dir = tempdir().unwrap();
    let path = write_book(
        dir.path(),
        vec![(
            "Drivers",
            drivers_sheet(
                &[],
                vec![vec!["Bob".into(), "GT3".into(), CellValue::Null, 15.into()]],
            ),
        )],
    );

    let conversion = convert_workbook(&path, &SeasonConfig::default()).unwrap();
    let bob = &conversion.championship.drivers[0];

    assert_eq!(bob.class, "LMGT3");
    assert_eq!(bob.total_points, 0);
    assert_eq!(bob.current_ballast, 15);
    assert!(bob.race_results.is_empty());
    assert!(conversion.summary.warnings.is_empty());
}

#[test]
fn test_results_follow_race_list_order() {
    let mut book = Book::new();
    book.add_sheet(
        "Drivers",
        drivers_sheet(
            &["points Circuit de la Sarthe", "points Sebring International Raceway"],
            vec![vec![
                "Alice".into(),
                "GT3".into(),
                30.into(),
                CellValue::Null,
                18.into(),
                12.into(),
            ]],
        ),
    )
    .unwrap();

    let conversion = convert_book(&book, &SeasonConfig::default()).unwrap();
    let ids: Vec<u32> = conversion.championship.drivers[0]
        .race_results
        .iter()
        .map(|r| r.race_id)
        .collect();
    assert_eq!(ids, vec![1, 4]);
    assert_eq!(conversion.championship.drivers[0].race_results[1].points, 18);
}

#[test]
fn test_timing_joined_from_detail_sheet() {
    let dir = tempdir().unwrap();
    let path = write_book(
        dir.path(),
        vec![
            (
                "Drivers",
                drivers_sheet(
                    &[
                        "points Silverstone Circuit",
                        "attendance Silverstone Circuit",
                        "Ballast Silverstone Circuit",
                        "points Fuji Speedway",
                    ],
                    vec![
                        vec![
                            "Alice".into(),
                            "GT3".into(),
                            25.into(),
                            10.into(),
                            25.into(),
                            "Yes".into(),
                            10.into(),
                            CellValue::Null,
                        ],
                        vec![
                            "Carol".into(),
                            "LMP3".into(),
                            8.into(),
                            CellValue::Null,
                            8.into(),
                            "Yes".into(),
                            CellValue::Null,
                            CellValue::Null,
                        ],
                    ],
                ),
            ),
            ("Silverstone Circuit", silverstone_detail()),
        ],
    );

    let conversion = convert_workbook(&path, &SeasonConfig::default()).unwrap();
    let drivers = &conversion.championship.drivers;

    assert_eq!(
        serde_json::to_value(&drivers[0].race_results).unwrap(),
        json!([{
            "raceId": 5,
            "points": 25,
            "attendance": "Yes",
            "ballastChange": 10,
            "finishTime": 5423.5,
            "finishTimeFormatted": "1:30:23.500",
            "timePenalty": 5,
            "laps": 48
        }])
    );

    // Carol is not in the detail sheet
    assert_eq!(drivers[1].race_results[0].timing.laps, 0);
    assert_eq!(drivers[1].race_results[0].timing.finish_time, None);
    let warnings = &conversion.summary.warnings;
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].driver, "Carol");
    assert_eq!(warnings[0].race_id, 5);
    assert_eq!(
        warnings[0].to_string(),
        "Could not get race time for Carol in Silverstone Circuit: \
         no row for this driver in 'Silverstone Circuit'"
    );
}

#[test]
fn test_summary_counts_by_class() {
    let mut book = Book::new();
    book.add_sheet(
        "Drivers",
        drivers_sheet(
            &[],
            vec![
                vec!["Alice".into(), "GT3".into(), 1.into(), 0.into()],
                vec!["Bob".into(), "LMP2_ELMS".into(), 2.into(), 0.into()],
                vec!["Carol".into(), "GT3".into(), 3.into(), 0.into()],
            ],
        ),
    )
    .unwrap();

    let summary = convert_book(&book, &SeasonConfig::default()).unwrap().summary;
    assert_eq!(summary.drivers, 3);
    assert_eq!(summary.results, 0);
    let by_class: Vec<(&str, usize)> = summary
        .by_class
        .iter()
        .map(|(class, count)| (class.as_str(), *count))
        .collect();
    assert_eq!(by_class, vec![("LMGT3", 2), ("LMP2", 1)]);
}

#[test]
fn test_repeated_headers_do_not_stop_conversion() {
    let dir = tempdir().unwrap();
    let detail = Sheet::from_data(vec![
        vec![
            CellValue::from("Driver"),
            CellValue::from("Gap"),
            CellValue::from("FinishTime"),
            CellValue::from("Gap"),
            CellValue::from("Laps"),
        ],
        vec![
            CellValue::from("Alice"),
            CellValue::from("+1.2"),
            CellValue::Float(5400.5),
            CellValue::from("+0.4"),
            CellValue::Int(48),
        ],
    ]);
    let path = write_book(
        dir.path(),
        vec![
            (
                "Drivers",
                drivers_sheet(
                    &["Notes", "points Silverstone Circuit", "Notes"],
                    vec![vec![
                        "Alice".into(),
                        "GT3".into(),
                        25.into(),
                        0.into(),
                        "fast".into(),
                        25.into(),
                        "rookie".into(),
                    ]],
                ),
            ),
            ("Silverstone Circuit", detail),
        ],
    );

    let conversion = convert_workbook(&path, &SeasonConfig::default()).unwrap();
    let result = &conversion.championship.drivers[0].race_results[0];

    assert_eq!(result.race_id, 5);
    assert_eq!(result.points, 25);
    assert_eq!(result.timing.finish_time, Some(5400.5));
    assert_eq!(result.timing.laps, 48);
    assert!(conversion.summary.warnings.is_empty());
}

#[test]
fn test_empty_ballast_cell_is_zero() {
    let dir = tempdir().unwrap();
    let path = write_book(
        dir.path(),
        vec![(
            "Drivers",
            drivers_sheet(
                &["points Autodromo Nazionale Monza", "Ballast Autodromo Nazionale Monza"],
                vec![
                    vec![
                        "Alice".into(),
                        "GT3".into(),
                        15.into(),
                        5.into(),
                        15.into(),
                        CellValue::Null,
                    ],
                    vec!["Bob".into(), "GT3".into(), 12.into(), 5.into(), 12.into(), 5.into()],
                ],
            ),
        )],
    );

    let conversion = convert_workbook(&path, &SeasonConfig::default()).unwrap();
    let drivers = &conversion.championship.drivers;

    assert_eq!(drivers[0].race_results[0].race_id, 3);
    assert_eq!(drivers[0].race_results[0].ballast_change, 0);
    assert_eq!(drivers[1].race_results[0].ballast_change, 5);
}

#[test]
fn test_blank_row_keeps_row_position_ids() {
    let mut book = Book::new();
    book.add_sheet(
        "Drivers",
        drivers_sheet(
            &[],
            vec![
                vec!["Alice".into(), "GT3".into(), 1.into(), 0.into()],
                vec![CellValue::Null, CellValue::Null, CellValue::Null, CellValue::Null],
                vec!["Bob".into(), "GT3".into(), 2.into(), 0.into()],
            ],
        ),
    )
    .unwrap();

    let drivers = convert_book(&book, &SeasonConfig::default())
        .unwrap()
        .championship
        .drivers;
    let ids: Vec<(u32, &str)> = drivers.iter().map(|d| (d.id, d.name.as_str())).collect();
    assert_eq!(ids, vec![(1, "Alice"), (3, "Bob")]);
}

// ===== Failures =====

#[test]
fn test_missing_required_column_is_fatal() {
    let mut book = Book::new();
    book.add_sheet(
        "Drivers",
        Sheet::from_data(vec![
            vec!["Driver", "CarClass", "Championship Points"],
            vec!["Alice", "GT3", "10"],
        ]),
    )
    .unwrap();

    let err = convert_book(&book, &SeasonConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::MissingColumn { ref sheet, ref column }
            if sheet == "Drivers" && column == "Current Ballast"
    ));
}

#[test]
fn test_repeated_required_column_is_fatal() {
    let mut book = Book::new();
    book.add_sheet(
        "Drivers",
        drivers_sheet(
            &["Driver"],
            vec![vec!["Alice".into(), "GT3".into(), 1.into(), 0.into(), "Alice".into()]],
        ),
    )
    .unwrap();

    let err = convert_book(&book, &SeasonConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::DuplicateColumn { ref column, .. } if column == "Driver"
    ));
}

#[test]
fn test_missing_workbook() {
    let dir = tempdir().unwrap();
    let err = convert_workbook(dir.path().join("missing.xlsx"), &SeasonConfig::default())
        .unwrap_err();
    assert!(matches!(err, ConvertError::Sheet(SheetError::FileNotFound { .. })));
}

#[test]
fn test_missing_driver_sheet() {
    let dir = tempdir().unwrap();
    let path = write_book(dir.path(), vec![("Fuji Speedway", silverstone_detail())]);

    let err = convert_workbook(&path, &SeasonConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::Sheet(SheetError::SheetNotFound { ref name }) if name == "Drivers"
    ));
}

// ===== Export =====

#[test]
fn test_repeated_runs_write_identical_files() {
    let dir = tempdir().unwrap();
    let path = write_book(
        dir.path(),
        vec![
            (
                "Drivers",
                drivers_sheet(
                    &["points Silverstone Circuit"],
                    vec![vec!["Alice".into(), "GT3".into(), 25.into(), 0.into(), 25.into()]],
                ),
            ),
            ("Silverstone Circuit", silverstone_detail()),
        ],
    );
    let output = dir.path().join("src/data/championship.js");
    let season = SeasonConfig::default();

    let first = convert_workbook(&path, &season).unwrap();
    export(&first.championship, &output, ExportFormat::JsModule).unwrap();
    let first_bytes = std::fs::read(&output).unwrap();

    let second = convert_workbook(&path, &season).unwrap();
    export(&second.championship, &output, ExportFormat::JsModule).unwrap();

    assert_eq!(std::fs::read(&output).unwrap(), first_bytes);
    let text = String::from_utf8(first_bytes).unwrap();
    assert!(text.contains("export const championshipData = {"));
    assert!(text.contains("\"finishTimeFormatted\": \"1:30:23.500\""));
}
