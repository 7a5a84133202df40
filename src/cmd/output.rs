//! Rendering of FIFO results: CSV records, terminal tables and JSON

use crate::core::{DisposalRecord, Holding, SummaryRecord};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

/// One disposal, as written to the detail CSV
#[derive(Debug, Clone, Serialize, Deserialize, Tabled, JsonSchema)]
pub struct DetailRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Asset")]
    pub asset: String,
    #[tabled(rename = "Trade ID")]
    pub trade_id: String,
    #[tabled(rename = "Quantity")]
    pub quantity: String,
    #[tabled(rename = "Value Received")]
    pub value_received: String,
    #[tabled(rename = "FIFO Cost")]
    pub cost_basis: String,
    #[tabled(rename = "Fees")]
    pub fees: String,
    #[tabled(rename = "Gain/Loss")]
    pub gain: String,
    /// F when the trade had a leg in the reporting currency, N otherwise
    #[tabled(rename = "Class")]
    pub counter_class: String,
}

impl From<&DisposalRecord> for DetailRow {
    fn from(d: &DisposalRecord) -> Self {
        DetailRow {
            date: d.date.format("%Y-%m-%d").to_string(),
            asset: d.asset.clone(),
            trade_id: d.trade_id.clone(),
            quantity: format_quantity(d.quantity),
            value_received: format_money(d.proceeds),
            cost_basis: format_money(d.cost_basis),
            fees: format_money(d.fees),
            gain: format_money(d.gain),
            counter_class: d.counter_class.key().to_string(),
        }
    }
}

/// One (asset, counter class) group, as written to the summary CSV
#[derive(Debug, Clone, Serialize, Deserialize, Tabled, JsonSchema)]
pub struct SummaryRow {
    #[tabled(rename = "Asset")]
    pub asset: String,
    #[tabled(rename = "Class")]
    pub counter_class: String,
    #[tabled(rename = "Disposals")]
    pub disposals: usize,
    #[tabled(rename = "Value Received")]
    pub value_received: String,
    #[tabled(rename = "FIFO Cost")]
    pub cost_basis: String,
    #[tabled(rename = "Fees")]
    pub fees: String,
    #[tabled(rename = "Gain/Loss")]
    pub gain: String,
}

impl From<&SummaryRecord> for SummaryRow {
    fn from(s: &SummaryRecord) -> Self {
        SummaryRow {
            asset: s.asset.clone(),
            counter_class: s.counter_class.key().to_string(),
            disposals: s.disposals,
            value_received: format_money(s.proceeds),
            cost_basis: format_money(s.cost_basis),
            fees: format_money(s.fees),
            gain: format_money(s.gain),
        }
    }
}

/// Open position of one asset after the run
#[derive(Debug, Clone, Serialize, Tabled, JsonSchema)]
pub struct HoldingRow {
    #[tabled(rename = "Asset")]
    pub asset: String,
    #[tabled(rename = "Lots")]
    pub lots: usize,
    #[tabled(rename = "Quantity")]
    pub quantity: String,
    #[tabled(rename = "Cost")]
    pub cost: String,
    #[tabled(rename = "Avg Cost")]
    pub average_cost: String,
}

impl From<&Holding> for HoldingRow {
    fn from(h: &Holding) -> Self {
        let average = if h.quantity.is_zero() {
            Decimal::ZERO
        } else {
            h.cost / h.quantity
        };
        HoldingRow {
            asset: h.asset.clone(),
            lots: h.lots,
            quantity: format_quantity(h.quantity),
            cost: format_money(h.cost),
            average_cost: format_money(average),
        }
    }
}

/// Grand totals across every disposal
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Totals {
    pub disposals: usize,
    pub value_received: String,
    pub cost_basis: String,
    pub fees: String,
    pub gain: String,
    pub warnings: usize,
}

impl Totals {
    /// Sum the summary groups, so totals agree with the summary CSV
    pub fn new(summary: &[SummaryRecord], warnings: usize) -> Self {
        let sum = |f: fn(&SummaryRecord) -> Decimal| -> Decimal { summary.iter().map(f).sum() };
        Totals {
            disposals: summary.iter().map(|s| s.disposals).sum(),
            value_received: format_money(sum(|s| s.proceeds)),
            cost_basis: format_money(sum(|s| s.cost_basis)),
            fees: format_money(sum(|s| s.fees)),
            gain: format_money(sum(|s| s.gain)),
            warnings,
        }
    }
}

/// JSON output of the `report` command
#[derive(Debug, Serialize, JsonSchema)]
pub struct ReportOutput {
    pub year: String,
    pub disposals: Vec<DetailRow>,
    pub summary: Vec<SummaryRow>,
    pub totals: Totals,
}

pub fn write_csv<I, R, W>(records: I, writer: W) -> anyhow::Result<()>
where
    I: IntoIterator<Item = R>,
    R: Serialize,
    W: Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records.into_iter() {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_table<R: Tabled>(rows: &[R]) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

/// Detail and summary CSV paths next to the input file
pub fn output_paths(input: &Path, year: Option<i32>) -> (PathBuf, PathBuf) {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ledger".to_string());
    let tag = year.map_or("all".to_string(), |y| y.to_string());
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    (
        dir.join(format!("{stem}.fifo_{tag}_detail.csv")),
        dir.join(format!("{stem}.fifo_{tag}_summary.csv")),
    )
}

/// Disposals with each money column rounded to cents, as they appear in the
/// detail CSV. Summaries are built from these so both files add up.
pub fn round_money(disposals: &[DisposalRecord]) -> Vec<DisposalRecord> {
    disposals
        .iter()
        .map(|d| DisposalRecord {
            proceeds: d.proceeds.round_dp(2),
            cost_basis: d.cost_basis.round_dp(2),
            fees: d.fees.round_dp(2),
            gain: d.gain.round_dp(2),
            ..d.clone()
        })
        .collect()
}

pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Full precision, without trailing zeros
pub fn format_quantity(qty: Decimal) -> String {
    qty.normalize().to_string()
}
