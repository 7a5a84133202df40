use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Data-quality warnings attached to a disposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Warning {
    /// Inventory had less than the disposed quantity; the rest was costed at zero.
    /// When `available = 0`, this means no cost basis at all.
    InsufficientCostBasis {
        #[schemars(with = "f64")]
        available: Decimal,
        #[schemars(with = "f64")]
        required: Decimal,
    },
    /// No other ledger row shares the disposal's trade id, so no fee and no
    /// fiat counter leg could be found.
    UnlinkedTrade,
}

impl Warning {
    pub fn name(&self) -> &'static str {
        match self {
            Warning::InsufficientCostBasis { available, .. } if available.is_zero() => {
                "NoCostBasis"
            }
            Warning::InsufficientCostBasis { .. } => "InsufficientCostBasis",
            Warning::UnlinkedTrade => "UnlinkedTrade",
        }
    }
}
