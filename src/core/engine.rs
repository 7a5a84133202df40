use super::classify::OperationKind;
use super::inventory::Inventory;
use super::ledger::{Ledger, LedgerError, LedgerRow};
use super::linker::{CounterClass, TradeLinker};
use super::warnings::Warning;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeSet;

/// Run settings for the FIFO engine
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Ticker of the reporting currency; trades with a leg in it are Fiat
    pub fiat_ticker: String,
    /// Assets never matched (typically the fiat ticker itself)
    pub ignore: BTreeSet<String>,
    /// Restrict matching to a single asset
    pub only_asset: Option<String>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            fiat_ticker: "EUR".to_string(),
            ignore: BTreeSet::from(["EUR".to_string()]),
            only_asset: None,
        }
    }
}

impl EngineOptions {
    fn skips(&self, asset: &str) -> bool {
        self.ignore.contains(asset)
            || self
                .only_asset
                .as_deref()
                .is_some_and(|only| !only.eq_ignore_ascii_case(asset))
    }
}

/// Record of a disposal with its FIFO-matched cost basis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisposalRecord {
    pub date: NaiveDate,
    pub asset: String,
    pub trade_id: String,
    pub quantity: Decimal,
    /// Gross value received
    pub proceeds: Decimal,
    pub cost_basis: Decimal,
    pub fees: Decimal,
    pub gain: Decimal,
    pub counter_class: CounterClass,
    pub warnings: Vec<Warning>,
}

impl DisposalRecord {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Output of one engine run
#[derive(Debug)]
pub struct FifoReport {
    pub disposals: Vec<DisposalRecord>,
    /// Lots still open after the last row
    pub inventory: Inventory,
}

impl FifoReport {
    pub fn warning_count(&self) -> usize {
        self.disposals.iter().map(|d| d.warnings.len()).sum()
    }
}

/// Single-pass FIFO matcher over a chronologically sorted ledger.
pub struct FifoEngine {
    options: EngineOptions,
    inventory: Inventory,
}

impl FifoEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self::with_inventory(options, Inventory::new())
    }

    /// Start from an existing set of open lots
    pub fn with_inventory(options: EngineOptions, inventory: Inventory) -> Self {
        FifoEngine { options, inventory }
    }

    /// Match every disposal in the ledger.
    ///
    /// Fails on a zero-quantity acquisition or disposal of an asset that is
    /// matched; legs of ignored or filtered-out assets are never checked.
    pub fn run(mut self, ledger: &Ledger) -> Result<FifoReport, LedgerError> {
        let linker = TradeLinker::new(ledger);
        let mut disposals = Vec::new();

        for (index, row) in ledger.rows().iter().enumerate() {
            if self.options.skips(&row.asset) {
                continue;
            }
            if row.kind.is_trade_leg() && row.quantity.is_zero() {
                return Err(LedgerError::ZeroQuantity {
                    index,
                    asset: row.asset.clone(),
                    kind: row.kind,
                });
            }

            match row.kind {
                OperationKind::Acquisition => {
                    self.inventory.push(&row.asset, row.quantity, row.value);
                }
                OperationKind::Disposal => {
                    disposals.push(self.dispose(row, &linker));
                }
                // Fees are looked up through the linker when their disposal is processed
                OperationKind::Fee | OperationKind::Other => {}
            }
        }

        log::info!(
            "Matched {} disposals against {} ledger rows",
            disposals.len(),
            ledger.len()
        );

        Ok(FifoReport {
            disposals,
            inventory: self.inventory,
        })
    }

    fn dispose(&mut self, row: &LedgerRow, linker: &TradeLinker) -> DisposalRecord {
        let consumed = self.inventory.consume(&row.asset, row.quantity);
        let fees = linker.fees_for_trade(&row.trade_id);
        let counter_class = linker.counter_class(&row.trade_id, &self.options.fiat_ticker);
        let gain = row.value - consumed.cost - fees;

        let mut warnings = Vec::new();
        if consumed.is_oversold() {
            log::warn!(
                "Oversold {} on {}: disposed {}, only {} matched against acquisitions",
                row.asset,
                row.date(),
                row.quantity,
                consumed.matched
            );
            warnings.push(Warning::InsufficientCostBasis {
                available: consumed.matched,
                required: row.quantity,
            });
        }
        if !linker.is_linked(&row.trade_id) {
            log::warn!(
                "Unlinked disposal of {} {} on {} (trade id '{}'): no fee, non-fiat",
                row.quantity,
                row.asset,
                row.date(),
                row.trade_id
            );
            warnings.push(Warning::UnlinkedTrade);
        }

        log::debug!(
            "{} {} {}: proceeds={}, cost={}, fees={}, gain={} ({})",
            row.label,
            row.quantity,
            row.asset,
            row.value,
            consumed.cost,
            fees,
            gain,
            counter_class.key()
        );

        DisposalRecord {
            date: row.date(),
            asset: row.asset.clone(),
            trade_id: row.trade_id.clone(),
            quantity: row.quantity,
            proceeds: row.value,
            cost_basis: consumed.cost,
            fees,
            gain,
            counter_class,
            warnings,
        }
    }
}

/// Run the FIFO engine over a ledger with a fresh inventory
pub fn calculate_fifo(
    ledger: &Ledger,
    options: &EngineOptions,
) -> Result<FifoReport, LedgerError> {
    FifoEngine::new(options.clone()).run(ledger)
}
