//! Summary command - aggregated totals per asset and counter class

use super::output::{self, SummaryRow};
use super::LedgerArgs;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct SummaryCommand {
    #[command(flatten)]
    ledger: LedgerArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct SummaryData {
    year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    asset: Option<String>,
    groups: Vec<SummaryRow>,
    totals: output::Totals,
}

impl SummaryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let run = self.ledger.run()?;
        let groups: Vec<SummaryRow> = run.summary.iter().map(SummaryRow::from).collect();

        if self.json {
            let data = SummaryData {
                year: self.ledger.year_label(),
                asset: self.ledger.crypto.as_ref().map(|a| a.to_uppercase()),
                groups,
                totals: run.totals(),
            };
            println!("{}", serde_json::to_string_pretty(&data)?);
            return Ok(());
        }

        println!();
        match self.ledger.crypto {
            Some(ref asset) => println!(
                "FIFO SUMMARY ({}, {})",
                self.ledger.year_label(),
                asset.to_uppercase()
            ),
            None => println!("FIFO SUMMARY ({})", self.ledger.year_label()),
        }
        println!();

        if groups.is_empty() {
            println!("No sales or swaps found matching the filters.");
            return Ok(());
        }

        output::print_table(&groups);
        println!();

        let totals = run.totals();
        println!("  Disposals: {}", totals.disposals);
        println!(
            "  Value received: {} | FIFO cost: {} | Fees: {} | Gain: {}",
            totals.value_received, totals.cost_basis, totals.fees, totals.gain
        );
        if totals.warnings > 0 {
            println!(
                "  {} warning(s); run `validate` for details",
                totals.warnings
            );
        }
        println!();
        Ok(())
    }
}
