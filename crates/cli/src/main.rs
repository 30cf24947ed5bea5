//! # standings-cli
//!
//! Command-line interface for the championship workbook converter.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use standings_core::{
    convert_workbook, export, find_columns, Conversion, ExportFormat, SeasonConfig,
    WorkbookOverview,
};
use standings_sheet::{Book, CellValue, Sheet, XlsxReadOptions};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const DEFAULT_INPUT: &str = "XML Ingest - DEV.xlsx";
const DEFAULT_OUTPUT: &str = "src/data/championship.js";
const DEFAULT_OVERVIEW: &str = "excel_data.json";

/// standings - championship workbook to standings data
#[derive(Parser)]
#[command(name = "standings")]
#[command(author, version, about = "Convert a championship workbook into standings data", long_about = None)]
struct Cli {
    /// Workbook to read
    #[arg(short, long, global = true, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Season file (.yaml or .json) replacing the built-in calendar
    #[arg(long, global = true, value_name = "FILE")]
    season: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Convert the workbook and write the standings document (default)
    Convert {
        /// Destination file
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Output format; inferred from the destination extension when omitted
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },
    /// List the workbook's sheets
    Sheets,
    /// Show a sheet's column headers
    Headers {
        #[arg(short, long, default_value = "Drivers")]
        sheet: String,
    },
    /// Preview the first rows of a sheet
    Peek {
        #[arg(short, long, default_value = "Drivers")]
        sheet: String,

        /// Number of data rows
        #[arg(short = 'n', long, default_value_t = 5)]
        rows: usize,

        /// Treat the first row as data
        #[arg(long)]
        raw: bool,
    },
    /// Find columns whose header contains any keyword (case-insensitive)
    FindColumns {
        #[arg(short, long, default_value = "Drivers")]
        sheet: String,

        #[arg(required = true)]
        keywords: Vec<String>,
    },
    /// Write an overview of the workbook as JSON
    Dump {
        #[arg(short, long, default_value = DEFAULT_OVERVIEW)]
        output: PathBuf,
    },
}

/// Output format for the standings document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// JavaScript module exporting `championshipData`
    Js,
    /// Plain JSON
    Json,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Js => ExportFormat::JsModule,
            OutputFormat::Json => ExportFormat::Json,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_level(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {e:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}

/// Fallback log filter when `RUST_LOG` is unset.
fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Command::Convert {
        output: PathBuf::from(DEFAULT_OUTPUT),
        format: None,
    });

    match command {
        Command::Convert { output, format } => {
            let season = load_season(cli.season.as_deref())?;
            run_convert(&cli.input, &output, format, &season)
        }
        Command::Sheets => {
            let names = Book::xlsx_sheet_names(&cli.input)
                .with_context(|| format!("Failed to open {}", cli.input.display()))?;
            println!("{}", "Sheets:".cyan().bold());
            for name in names {
                println!("  {name}");
            }
            Ok(())
        }
        Command::Headers { sheet } => {
            let sheet = load_sheet(&cli.input, &sheet, true)?;
            println!("{}", format!("Columns in '{}':", sheet.name()).cyan().bold());
            for (index, name) in sheet.column_names().into_iter().flatten().enumerate() {
                println!("  {index}: {name}");
            }
            Ok(())
        }
        Command::Peek { sheet, rows, raw } => {
            let sheet = load_sheet(&cli.input, &sheet, !raw)?;
            print_preview(&sheet, rows);
            Ok(())
        }
        Command::FindColumns { sheet, keywords } => {
            let sheet = load_sheet(&cli.input, &sheet, true)?;
            let found = find_columns(&sheet, &keywords);
            if found.is_empty() {
                println!("{}", "No matching columns".yellow());
            }
            for column in found {
                println!("  {}: {}", column.index, column.name);
            }
            Ok(())
        }
        Command::Dump { output } => {
            let season = load_season(cli.season.as_deref())?;
            let book = load_book(&cli.input)?;
            let overview = WorkbookOverview::from_book(&book, &season.driver_sheet)?;
            overview
                .save(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "{} Workbook overview written to {}",
                "✓".green().bold(),
                output.display()
            );
            Ok(())
        }
    }
}

fn load_season(path: Option<&Path>) -> Result<SeasonConfig> {
    match path {
        Some(path) => SeasonConfig::from_path(path)
            .with_context(|| format!("Failed to load season from {}", path.display())),
        None => Ok(SeasonConfig::default()),
    }
}

fn load_book(path: &Path) -> Result<Book> {
    Book::from_xlsx_with_options(path, XlsxReadOptions::default().with_headers(true))
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn load_sheet(path: &Path, name: &str, has_headers: bool) -> Result<Sheet> {
    Sheet::from_xlsx_sheet_with_options(
        path,
        name,
        XlsxReadOptions::default().with_headers(has_headers),
    )
    .with_context(|| format!("Failed to read sheet '{name}' from {}", path.display()))
}

fn run_convert(
    input: &Path,
    output: &Path,
    format: Option<OutputFormat>,
    season: &SeasonConfig,
) -> Result<()> {
    let format = format.map_or_else(|| ExportFormat::from_path(output), ExportFormat::from);

    let conversion = convert_workbook(input, season)
        .with_context(|| format!("Failed to convert {}", input.display()))?;
    export(&conversion.championship, output, format)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    print_summary(&conversion, output);
    Ok(())
}

fn print_summary(conversion: &Conversion, output: &Path) {
    let summary = &conversion.summary;

    println!(
        "{} Extracted {} drivers",
        "✓".green().bold(),
        summary.drivers
    );
    for (class, count) in &summary.by_class {
        println!("  {class}: {count}");
    }
    println!("{} Data written to {}", "✓".green().bold(), output.display());

    if !summary.warnings.is_empty() {
        println!(
            "{} {} race times could not be recovered",
            "!".yellow().bold(),
            summary.warnings.len()
        );
    }
}

/// Print the header (if named) and the first `rows` data rows.
fn print_preview(sheet: &Sheet, rows: usize) {
    let preview = sheet.head(rows);
    let mut lines = preview.rows();

    if preview.column_names().is_some() {
        if let Some(header) = lines.next() {
            println!("{}", format_row(header).bold());
        }
    }
    for row in lines {
        println!("{}", format_row(row));
    }
}

fn format_row(row: &[CellValue]) -> String {
    row.iter()
        .map(|cell| match cell {
            CellValue::Null => "-".to_string(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" | ")
}
