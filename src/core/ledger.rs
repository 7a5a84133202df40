use super::classify::{classify, OperationKind};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("ledger is not in chronological order: row {index} ({current}) is earlier than row {previous_index} ({previous})")]
    Unsorted {
        index: usize,
        previous_index: usize,
        current: NaiveDateTime,
        previous: NaiveDateTime,
    },
    #[error("row {index}: {kind} of {asset} has zero quantity")]
    ZeroQuantity {
        index: usize,
        asset: String,
        kind: OperationKind,
    },
}

/// One currency leg of a trade, on the canonical schema.
///
/// Quantities and values are unsigned: the sign the source ledger uses to mark
/// outflows is dropped on the way in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    pub datetime: NaiveDateTime,
    /// Shared by all legs of one trade; empty when the source had none
    pub trade_id: String,
    pub asset: String,
    /// Raw operation label, e.g. "Venta"
    pub label: String,
    pub kind: OperationKind,
    pub quantity: Decimal,
    /// Value in the reporting currency
    pub value: Decimal,
}

impl LedgerRow {
    /// Build a row from raw ledger fields, classifying the label and
    /// normalizing sign and ticker case.
    pub fn new(
        datetime: NaiveDateTime,
        trade_id: &str,
        asset: &str,
        label: &str,
        quantity: Decimal,
        value: Decimal,
    ) -> Self {
        LedgerRow {
            datetime,
            trade_id: trade_id.trim().to_string(),
            asset: asset.trim().to_uppercase(),
            label: label.to_string(),
            kind: classify(label),
            quantity: quantity.abs(),
            value: value.abs(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.datetime.date()
    }
}

/// Rows validated for the FIFO engine: chronologically sorted.
///
/// Zero-quantity trade legs are rejected by the engine, and only for assets it
/// actually matches.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    rows: Vec<LedgerRow>,
}

impl Ledger {
    /// Validate rows that are expected to already be in chronological order.
    pub fn new(rows: Vec<LedgerRow>) -> Result<Self, LedgerError> {
        for (index, pair) in rows.windows(2).enumerate() {
            if pair[1].datetime < pair[0].datetime {
                return Err(LedgerError::Unsorted {
                    index: index + 1,
                    previous_index: index,
                    current: pair[1].datetime,
                    previous: pair[0].datetime,
                });
            }
        }

        Ok(Ledger { rows })
    }

    /// Sort rows chronologically (stable, so same-timestamp legs keep their
    /// file order) and validate.
    pub fn from_unsorted(mut rows: Vec<LedgerRow>) -> Result<Self, LedgerError> {
        rows.sort_by_key(|r| r.datetime);
        Self::new(rows)
    }

    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
