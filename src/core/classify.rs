use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a ledger row takes part in FIFO matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub enum OperationKind {
    Acquisition,
    Disposal,
    Fee,
    /// Deposits, withdrawals, income and anything else the ledger carries
    #[default]
    Other,
}

const ACQUISITION_PREFIXES: &[&str] = &["compra", "buy"];
const DISPOSAL_PREFIXES: &[&str] = &["venta", "sell"];
const FEE_PREFIXES: &[&str] = &["comisi", "fee"];

/// Classify a transaction-type label (case-insensitive prefix match).
///
/// Labels are matched against the Spanish and English vocabularies used by
/// CoinTracking exports, e.g. "Compra", "Venta", "Comisión", "Buy", "Sell", "Fee".
pub fn classify(label: &str) -> OperationKind {
    let label = label.to_lowercase();
    let starts_with_any = |prefixes: &[&str]| prefixes.iter().any(|p| label.starts_with(p));

    if starts_with_any(ACQUISITION_PREFIXES) {
        OperationKind::Acquisition
    } else if starts_with_any(DISPOSAL_PREFIXES) {
        OperationKind::Disposal
    } else if starts_with_any(FEE_PREFIXES) {
        OperationKind::Fee
    } else {
        OperationKind::Other
    }
}

impl OperationKind {
    pub fn display(&self) -> &'static str {
        match self {
            OperationKind::Acquisition => "Acquisition",
            OperationKind::Disposal => "Disposal",
            OperationKind::Fee => "Fee",
            OperationKind::Other => "Other",
        }
    }

    /// Whether rows of this kind move lots in or out of the inventory
    pub fn is_trade_leg(&self) -> bool {
        matches!(self, OperationKind::Acquisition | OperationKind::Disposal)
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}
