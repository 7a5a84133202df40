pub mod inventory;
pub mod output;
pub mod report;
pub mod schema;
pub mod summary;
pub mod validate;

use crate::core::{aggregate, calculate_fifo, EngineOptions, FifoReport, Ledger, SummaryRecord};
use crate::import::{self, ImportOptions};
use anyhow::Context;
use clap::Args;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Ledger input and matching options shared by every command
#[derive(Args, Debug)]
pub struct LedgerArgs {
    /// CoinTracking "double entry" CSV export
    pub csv: PathBuf,

    /// Fiscal (calendar) year to process; all years when omitted
    #[arg(short, long)]
    pub year: Option<i32>,

    /// CSV separator (',' ';' '\t' '|'); sniffed from the header when omitted
    #[arg(long, value_parser = parse_separator)]
    pub sep: Option<u8>,

    /// Tickers to ignore, comma-separated
    #[arg(long, default_value = "EUR", value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Only process this asset (e.g. BTC)
    #[arg(long)]
    pub crypto: Option<String>,

    /// Reporting currency ticker; disposals with a leg in it are classed Fiat
    #[arg(long, default_value = "EUR")]
    pub fiat: String,
}

/// Result of matching a ledger file
pub struct Run {
    pub report: FifoReport,
    /// Grouped from the cent-rounded disposals
    pub summary: Vec<SummaryRecord>,
}

impl Run {
    pub fn totals(&self) -> output::Totals {
        output::Totals::new(&self.summary, self.report.warning_count())
    }
}

impl LedgerArgs {
    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            delimiter: self.sep,
            year: self.year,
        }
    }

    pub fn engine_options(&self) -> EngineOptions {
        let ignore: BTreeSet<String> = self
            .ignore
            .iter()
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect();
        EngineOptions {
            fiat_ticker: self.fiat.trim().to_uppercase(),
            ignore,
            only_asset: self.crypto.as_ref().map(|c| c.trim().to_uppercase()),
        }
    }

    pub fn year_label(&self) -> String {
        self.year.map_or("All Years".to_string(), |y| y.to_string())
    }

    /// Read, validate and match the ledger
    pub fn run(&self) -> anyhow::Result<Run> {
        let rows = import::read_ledger(&self.csv, &self.import_options())
            .with_context(|| format!("failed to read ledger {}", self.csv.display()))?;
        let ledger = Ledger::from_unsorted(rows)?;
        let report = calculate_fifo(&ledger, &self.engine_options())?;
        let summary = aggregate(&output::round_money(&report.disposals));
        Ok(Run { report, summary })
    }
}

fn parse_separator(s: &str) -> Result<u8, String> {
    match s {
        "\\t" | "\t" | "tab" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(format!("separator must be a single ASCII character, got '{s}'")),
    }
}
