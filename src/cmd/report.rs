//! Report command - per-disposal detail and per-asset summary, written to CSV

use super::output::{self, DetailRow, ReportOutput, SummaryRow};
use super::LedgerArgs;
use clap::Args;
use std::fs::File;

#[derive(Args, Debug)]
pub struct ReportCommand {
    #[command(flatten)]
    ledger: LedgerArgs,

    /// Output as JSON instead of formatted tables
    #[arg(long)]
    json: bool,

    /// Do not write the detail and summary CSV files
    #[arg(long)]
    no_write: bool,
}

impl ReportCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let run = self.ledger.run()?;

        if run.report.disposals.is_empty() {
            println!("No sales or swaps found matching the filters.");
            return Ok(());
        }

        let detail: Vec<DetailRow> = run.report.disposals.iter().map(DetailRow::from).collect();
        let summary: Vec<SummaryRow> = run.summary.iter().map(SummaryRow::from).collect();

        if self.json {
            let data = ReportOutput {
                year: self.ledger.year_label(),
                disposals: detail.clone(),
                summary: summary.clone(),
                totals: run.totals(),
            };
            println!("{}", serde_json::to_string_pretty(&data)?);
        } else {
            println!();
            println!("DISPOSALS ({})", self.ledger.year_label());
            output::print_table(&detail);
            println!();
            println!("SUMMARY BY ASSET");
            output::print_table(&summary);
        }

        if !self.no_write {
            let (detail_path, summary_path) = output::output_paths(&self.ledger.csv, self.ledger.year);
            output::write_csv(&detail, File::create(&detail_path)?)?;
            output::write_csv(&summary, File::create(&summary_path)?)?;
            log::info!(
                "Wrote {} and {}",
                detail_path.display(),
                summary_path.display()
            );
            if !self.json {
                println!();
                println!("CSV files written:");
                println!("  {}", detail_path.display());
                println!("  {}", summary_path.display());
            }
        }

        Ok(())
    }
}
