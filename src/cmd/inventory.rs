//! Inventory command - lots still open after matching

use super::output::{self, HoldingRow};
use super::LedgerArgs;
use crate::core::Lot;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct InventoryCommand {
    #[command(flatten)]
    ledger: LedgerArgs,

    /// List every open lot instead of one line per asset
    #[arg(long)]
    lots: bool,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct InventoryOutput {
    year: String,
    holdings: Vec<AssetLots>,
}

#[derive(Debug, Serialize)]
struct AssetLots {
    #[serde(flatten)]
    holding: HoldingRow,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    open_lots: Vec<Lot>,
}

impl InventoryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let run = self.ledger.run()?;
        let inventory = &run.report.inventory;
        let holdings = inventory.holdings();

        if self.json {
            let output = InventoryOutput {
                year: self.ledger.year_label(),
                holdings: holdings
                    .iter()
                    .map(|h| AssetLots {
                        holding: HoldingRow::from(h),
                        open_lots: if self.lots {
                            inventory.lots(&h.asset)
                        } else {
                            Vec::new()
                        },
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        if holdings.is_empty() {
            println!("No open lots remaining ({})", self.ledger.year_label());
            return Ok(());
        }

        println!();
        println!("OPEN LOTS ({})", self.ledger.year_label());
        println!();

        if self.lots {
            let rows: Vec<LotRow> = holdings
                .iter()
                .flat_map(|h| {
                    inventory
                        .lots(&h.asset)
                        .into_iter()
                        .enumerate()
                        .map(|(i, lot)| LotRow {
                            asset: h.asset.clone(),
                            position: i + 1,
                            quantity: output::format_quantity(lot.quantity),
                            cost: output::format_money(lot.cost),
                        })
                        .collect::<Vec<_>>()
                })
                .collect();
            output::print_table(&rows);
        } else {
            let rows: Vec<HoldingRow> = holdings.iter().map(HoldingRow::from).collect();
            output::print_table(&rows);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, tabled::Tabled)]
struct LotRow {
    #[tabled(rename = "Asset")]
    asset: String,
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Cost")]
    cost: String,
}
