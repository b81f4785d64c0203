//! gridline - Extract tables from page layout JSON
//!
//! Reads one page region as `{"fragments": [...], "rulings": [...]}` and
//! writes the reconstructed table, row bands or column bands as CSV, TSV
//! or JSON.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use gridline_core::output::write_delimited;
use gridline_core::ruling::DEFAULT_MAX_DISTANCE;
use gridline_core::{
    Extracted, ExtractionSettings, HasRect, Ruling, Spreadsheet, TableExtractor, Tabular,
    TextFragment, clean_rulings,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// What to reconstruct from the page.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
enum Mode {
    /// Pick the builder from the rulings present (default)
    #[default]
    Auto,
    /// Gap-based table, ignoring rulings
    Gap,
    /// Rows from line boundaries, columns from vertical rulings or text
    Ruled,
    /// Cell grid from horizontal and vertical rulings
    Spreadsheet,
    /// Row bands with their text
    Rows,
    /// Column bands
    Columns,
}

/// Output format.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
enum Format {
    /// Comma-separated values (default)
    #[default]
    Csv,
    /// Tab-separated values
    Tsv,
    /// JSON
    Json,
}

/// Reconstruct tables from positioned text fragments and ruling lines.
#[derive(Parser, Debug)]
#[command(name = "gridline")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Page JSON file, or "-" for stdin
    input: PathBuf,

    /// What to extract
    #[arg(short = 'm', long, value_enum, default_value = "auto")]
    mode: Mode,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "csv")]
    format: Format,

    /// Keep fragments as given instead of merging glyphs into words
    #[arg(long = "no-merge-words", action = ArgAction::SetTrue)]
    no_merge_words: bool,

    /// Use rulings as given instead of joining split and doubled segments
    #[arg(long = "no-clean-rulings", action = ArgAction::SetTrue)]
    no_clean_rulings: bool,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

/// One page region as produced by a layout parser.
#[derive(Debug, Deserialize)]
struct PageInput {
    #[serde(default)]
    fragments: Vec<TextFragment>,
    #[serde(default)]
    rulings: Vec<RulingInput>,
}

#[derive(Debug, Deserialize)]
struct RulingInput {
    top: f64,
    left: f64,
    width: f64,
    height: f64,
    #[serde(default)]
    stroking_color: Option<String>,
}

impl RulingInput {
    fn into_ruling(self) -> gridline_core::Result<Ruling> {
        let ruling = Ruling::new(self.top, self.left, self.width, self.height)?;
        Ok(match self.stroking_color {
            Some(color) => ruling.with_stroking_color(color),
            None => ruling,
        })
    }
}

#[derive(Debug, Serialize)]
struct CellRecord {
    top: f64,
    left: f64,
    width: f64,
    height: f64,
    text: String,
    placeholder: bool,
    merged: bool,
}

#[derive(Debug, Serialize)]
struct SpreadsheetRecord {
    width: f64,
    height: f64,
    rows: Vec<Vec<String>>,
    cols: Vec<Vec<String>>,
    cells: Vec<CellRecord>,
}

impl From<&Spreadsheet> for SpreadsheetRecord {
    fn from(sheet: &Spreadsheet) -> Self {
        Self {
            width: sheet.width(),
            height: sheet.height(),
            rows: sheet.to_rows(),
            cols: sheet
                .cols()
                .iter()
                .map(|col| col.iter().map(|c| c.text()).collect())
                .collect(),
            cells: sheet
                .cells()
                .iter()
                .map(|c| CellRecord {
                    top: c.top(),
                    left: c.left(),
                    width: c.width(),
                    height: c.height(),
                    text: c.text(),
                    placeholder: c.placeholder,
                    merged: c.merged,
                })
                .collect(),
        }
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_input(path: &PathBuf) -> Result<PageInput> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read page JSON from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&raw).context("input is not a valid page JSON document")
}

fn build_settings(args: &Args, rulings: Vec<Ruling>) -> ExtractionSettings {
    let rulings = if args.no_clean_rulings {
        rulings
    } else {
        clean_rulings(rulings, DEFAULT_MAX_DISTANCE)
    };
    ExtractionSettings {
        merge_words: !args.no_merge_words,
        ..ExtractionSettings::default()
    }
    .with_rulings(rulings)
}

fn render_table(table: &impl Tabular, json: impl Serialize, format: Format) -> Result<String> {
    Ok(match format {
        Format::Csv => table.to_csv()?,
        Format::Tsv => table.to_tsv()?,
        Format::Json => serde_json::to_string_pretty(&json)?,
    })
}

fn render_records(records: Vec<Vec<String>>, json: impl Serialize, format: Format) -> Result<String> {
    Ok(match format {
        Format::Csv => write_delimited(&records, b',')?,
        Format::Tsv => write_delimited(&records, b'\t')?,
        Format::Json => serde_json::to_string_pretty(&json)?,
    })
}

fn run(args: &Args) -> Result<String> {
    let page = read_input(&args.input)?;
    let rulings = page
        .rulings
        .into_iter()
        .enumerate()
        .map(|(i, r)| r.into_ruling().with_context(|| format!("ruling #{i} is invalid")))
        .collect::<Result<Vec<_>>>()?;
    info!(
        fragments = page.fragments.len(),
        rulings = rulings.len(),
        "loaded page"
    );

    let extractor = TableExtractor::new(page.fragments, build_settings(args, rulings));
    let extracted = match args.mode {
        Mode::Auto => extractor.extract(),
        Mode::Gap => Extracted::Gap(extractor.gap_table()),
        Mode::Ruled => Extracted::Ruled(extractor.ruled_table()),
        Mode::Spreadsheet => Extracted::Spreadsheet(extractor.spreadsheet()),
        Mode::Rows => {
            let rows = extractor.rows();
            let records = rows
                .iter()
                .map(|r| {
                    [r.top.to_string(), r.bottom.to_string()]
                        .into_iter()
                        .chain(r.texts.iter().cloned())
                        .collect()
                })
                .collect();
            return render_records(records, &rows, args.format);
        }
        Mode::Columns => {
            let columns = extractor.columns();
            let records = columns
                .iter()
                .map(|c| vec![c.left.to_string(), c.right.to_string(), c.width.to_string()])
                .collect();
            return render_records(records, &columns, args.format);
        }
    };

    debug!(rows = extracted.to_rows().len(), "extracted table");
    match &extracted {
        Extracted::Spreadsheet(sheet) => {
            render_table(&extracted, SpreadsheetRecord::from(sheet), args.format)
        }
        _ => render_table(&extracted, extracted.to_rows(), args.format),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let rendered = run(&args)?;

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };
    output.write_all(rendered.as_bytes())?;
    if args.format == Format::Json {
        output.write_all(b"\n")?;
    }
    output.flush()?;
    Ok(())
}
