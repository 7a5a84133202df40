use super::classify::OperationKind;
use super::ledger::{Ledger, LedgerRow};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// What the other side of a disposal was
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum CounterClass {
    Fiat,
    NonFiat,
}

impl CounterClass {
    /// Single-letter key used in CSV output
    pub fn key(&self) -> &'static str {
        match self {
            CounterClass::Fiat => "F",
            CounterClass::NonFiat => "N",
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            CounterClass::Fiat => "Fiat",
            CounterClass::NonFiat => "Non-fiat",
        }
    }
}

impl std::fmt::Display for CounterClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Read-only index from trade id to the ledger rows sharing it.
pub struct TradeLinker<'a> {
    rows: &'a [LedgerRow],
    by_trade: HashMap<&'a str, Vec<usize>>,
}

impl<'a> TradeLinker<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        let rows = ledger.rows();
        let mut by_trade: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (index, row) in rows.iter().enumerate() {
            if row.trade_id.is_empty() {
                continue;
            }
            by_trade.entry(row.trade_id.as_str()).or_default().push(index);
        }
        TradeLinker { rows, by_trade }
    }

    fn legs(&self, trade_id: &str) -> impl Iterator<Item = &'a LedgerRow> + '_ {
        let rows = self.rows;
        self.by_trade
            .get(trade_id)
            .into_iter()
            .flatten()
            .map(move |&i| &rows[i])
    }

    /// Sum of absolute fee values booked against this trade
    pub fn fees_for_trade(&self, trade_id: &str) -> Decimal {
        self.legs(trade_id)
            .filter(|r| r.kind == OperationKind::Fee)
            .map(|r| r.value.abs())
            .sum()
    }

    /// Tickers of every leg of this trade, including the disposed asset itself
    pub fn counter_assets_for_trade(&self, trade_id: &str) -> BTreeSet<&'a str> {
        self.legs(trade_id).map(|r| r.asset.as_str()).collect()
    }

    pub fn counter_class(&self, trade_id: &str, fiat_ticker: &str) -> CounterClass {
        if self.counter_assets_for_trade(trade_id).contains(fiat_ticker) {
            CounterClass::Fiat
        } else {
            CounterClass::NonFiat
        }
    }

    /// A trade is linked when some other row shares its id
    pub fn is_linked(&self, trade_id: &str) -> bool {
        self.by_trade.get(trade_id).is_some_and(|legs| legs.len() > 1)
    }
}
