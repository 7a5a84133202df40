use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Quantities within this distance of each other are treated as equal.
pub const EPSILON: Decimal = dec!(0.000000000001);

/// An unconsumed slice of a past acquisition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Lot {
    #[schemars(with = "f64")]
    pub quantity: Decimal,
    #[schemars(with = "f64")]
    pub cost: Decimal,
}

/// Result of taking a quantity out of an asset's lot queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Consumption {
    /// Cost basis of the lots (or lot fractions) taken
    pub cost: Decimal,
    /// Quantity actually matched against lots
    pub matched: Decimal,
    /// Quantity left unmatched because the queue ran dry
    pub shortfall: Decimal,
}

impl Consumption {
    pub fn is_oversold(&self) -> bool {
        self.shortfall > EPSILON
    }
}

/// Open position of one asset: total quantity and cost across its lots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Holding {
    pub asset: String,
    pub lots: usize,
    #[schemars(with = "f64")]
    pub quantity: Decimal,
    #[schemars(with = "f64")]
    pub cost: Decimal,
}

/// Per-asset FIFO queues of open lots, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    lots: HashMap<String, VecDeque<Lot>>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a lot to the back of the asset's queue
    pub fn push(&mut self, asset: &str, quantity: Decimal, cost: Decimal) {
        let queue = self.lots.entry(asset.to_string()).or_default();
        queue.push_back(Lot { quantity, cost });
        log::debug!(
            "Inventory {} PUSH: qty={}, cost={}. Open lots: {}",
            asset,
            quantity,
            cost,
            queue.len()
        );
    }

    /// Take `quantity` from the front of the asset's queue, splitting the last
    /// lot touched if it is larger than what remains to be matched.
    pub fn consume(&mut self, asset: &str, quantity: Decimal) -> Consumption {
        let mut remaining = quantity;
        let mut cost = Decimal::ZERO;

        if let Some(queue) = self.lots.get_mut(asset) {
            while remaining > EPSILON {
                let Some(lot) = queue.front_mut() else {
                    break;
                };

                if lot.quantity <= remaining + EPSILON {
                    cost += lot.cost;
                    remaining -= lot.quantity;
                    log::debug!(
                        "Inventory {} CONSUME LOT: qty={}, cost={}",
                        asset,
                        lot.quantity,
                        lot.cost
                    );
                    queue.pop_front();
                } else {
                    let proportion = remaining / lot.quantity;
                    let taken = lot.cost * proportion;
                    cost += taken;
                    lot.quantity -= remaining;
                    lot.cost -= taken;
                    log::debug!(
                        "Inventory {} SPLIT LOT: qty={}, cost={}. Remaining in lot: qty={}, cost={}",
                        asset,
                        remaining,
                        taken,
                        lot.quantity,
                        lot.cost
                    );
                    remaining = Decimal::ZERO;
                }
            }
        }

        let shortfall = remaining.max(Decimal::ZERO);
        let shortfall = if shortfall > EPSILON {
            shortfall
        } else {
            Decimal::ZERO
        };

        Consumption {
            cost,
            matched: quantity - shortfall,
            shortfall,
        }
    }

    /// Open lots for an asset, oldest first
    pub fn lots(&self, asset: &str) -> Vec<Lot> {
        self.lots
            .get(asset)
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Remaining position per asset, sorted by asset, skipping drained queues
    pub fn holdings(&self) -> Vec<Holding> {
        let sorted: BTreeMap<_, _> = self.lots.iter().collect();
        sorted
            .into_iter()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|(asset, queue)| Holding {
                asset: asset.clone(),
                lots: queue.len(),
                quantity: queue.iter().map(|l| l.quantity).sum(),
                cost: queue.iter().map(|l| l.cost).sum(),
            })
            .collect()
    }
}
