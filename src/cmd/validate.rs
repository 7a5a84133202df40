//! Validate command - surface data quality issues without generating full reports

use super::output::{format_money, format_quantity};
use super::LedgerArgs;
use crate::core::{DisposalRecord, Warning};
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    #[command(flatten)]
    ledger: LedgerArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    #[serde(rename = "type")]
    issue_type: String,
    date: String,
    asset: String,
    trade_id: String,
    quantity: String,
    value_received: String,
    message: String,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput {
    year: String,
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let run = self.ledger.run()?;

        let issues: Vec<ValidationIssue> = run
            .report
            .disposals
            .iter()
            .filter(|d| d.has_warnings())
            .flat_map(|d| d.warnings.iter().map(move |w| issue(d, w)))
            .collect();

        if self.json {
            let output = ValidationOutput {
                year: self.ledger.year_label(),
                issue_count: issues.len(),
                issues: issues.clone(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            self.print_text(&issues);
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }

    fn print_text(&self, issues: &[ValidationIssue]) {
        println!();
        println!("VALIDATION RESULTS ({})", self.ledger.year_label());
        println!();

        if issues.is_empty() {
            println!("\u{2713} No issues found.");
            return;
        }

        println!("\u{26A0} {} issue(s) found:", issues.len());
        println!();
        for (i, issue) in issues.iter().enumerate() {
            println!(
                "  {}. [{}] {} Disposal of {} {} for {} (trade '{}')",
                i + 1,
                issue.issue_type,
                issue.date,
                issue.quantity,
                issue.asset,
                issue.value_received,
                issue.trade_id
            );
            println!("     {}", issue.message);
            println!();
        }
    }
}

fn issue(disposal: &DisposalRecord, warning: &Warning) -> ValidationIssue {
    ValidationIssue {
        issue_type: warning.name().to_string(),
        date: disposal.date.format("%Y-%m-%d").to_string(),
        asset: disposal.asset.clone(),
        trade_id: disposal.trade_id.clone(),
        quantity: format_quantity(disposal.quantity),
        value_received: format_money(disposal.proceeds),
        message: warning_message(warning, disposal),
    }
}

fn warning_message(warning: &Warning, disposal: &DisposalRecord) -> String {
    match warning {
        Warning::InsufficientCostBasis { available, .. } if available.is_zero() => format!(
            "No matching acquisitions found - FIFO cost is {}",
            format_money(disposal.cost_basis)
        ),
        Warning::InsufficientCostBasis {
            available,
            required,
        } => format!(
            "Only {} acquired (disposed {}) - unmatched part costed at zero, FIFO cost {}",
            format_quantity(*available),
            format_quantity(*required),
            format_money(disposal.cost_basis)
        ),
        Warning::UnlinkedTrade => {
            "No other leg shares this trade id - fees assumed zero, classed non-fiat".to_string()
        }
    }
}
