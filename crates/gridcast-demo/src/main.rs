//! Gridcast demo.
//!
//! Exports a two-person list through one of the gridcast sinks.
//!
//! # Usage
//!
//! ```bash
//! # HTML table on stdout
//! gridcast-demo
//!
//! # CSV with an extra property column
//! gridcast-demo --format csv --columns "Name;Initials;Age"
//!
//! # Spreadsheet with a fixed-width, formatted age column
//! gridcast-demo --format xlsx --columns "Name;Age:0:80" --output people.xlsx
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gridcast::sinks::{CsvSink, HtmlTableSink, XlsxSink};
use gridcast::{export, ExportReport, Exportable};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Export a small people list as a table.
#[derive(Debug, Parser)]
#[command(name = "gridcast-demo", version)]
struct Args {
    /// Column format: `name[:format[:width]]` tokens joined by `;`
    #[arg(short, long, default_value = "Name;Age")]
    columns: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
    format: OutputFormat,

    /// Output file (stdout for html and csv when omitted, people.xlsx for xlsx)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Html,
    Csv,
    Xlsx,
}

#[derive(Debug, Clone, Exportable)]
#[export(property(name = "Initials", method = initials))]
struct Person {
    #[export(rename = "Name")]
    name: String,

    #[export(rename = "Age")]
    age: u32,
}

impl Person {
    fn new(name: &str, age: u32) -> Self {
        Person {
            name: name.to_string(),
            age,
        }
    }

    fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .collect()
    }
}

fn people() -> Vec<Person> {
    vec![
        Person::new("Benjamin Graham", 88),
        Person::new("Jean Claude VanDamme", 12),
    ]
}

fn main() -> Result<()> {
    let args = Args::parse();
    initialize_logging(args.verbose);
    run(&args)
}

fn initialize_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let people = people();

    let report = match args.format {
        OutputFormat::Html => {
            let mut sink = HtmlTableSink::new();
            let report = export(&people, &args.columns, &mut sink)?;
            write_text(args.output.as_deref(), &sink.finish())?;
            report
        }
        OutputFormat::Csv => {
            let mut sink = CsvSink::new();
            let report = export(&people, &args.columns, &mut sink)?;
            write_text(args.output.as_deref(), &sink.finish()?)?;
            report
        }
        OutputFormat::Xlsx => {
            let path = args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from("people.xlsx"));
            let mut sink = XlsxSink::new();
            let report = export(&people, &args.columns, &mut sink)?;
            sink.save(&path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "workbook written");
            report
        }
    };

    warn_unresolved(&report);
    Ok(())
}

fn warn_unresolved(report: &ExportReport) {
    for name in &report.unresolved {
        warn!(column = %name, "no attribute named {:?}; column skipped", name);
    }
}

fn write_text(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}
