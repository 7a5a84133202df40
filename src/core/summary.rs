use super::engine::DisposalRecord;
use super::linker::CounterClass;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Disposal totals for one (asset, counter class) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRecord {
    pub asset: String,
    pub counter_class: CounterClass,
    pub disposals: usize,
    pub proceeds: Decimal,
    pub cost_basis: Decimal,
    pub fees: Decimal,
    pub gain: Decimal,
}

impl SummaryRecord {
    fn new(asset: String, counter_class: CounterClass) -> Self {
        SummaryRecord {
            asset,
            counter_class,
            disposals: 0,
            proceeds: Decimal::ZERO,
            cost_basis: Decimal::ZERO,
            fees: Decimal::ZERO,
            gain: Decimal::ZERO,
        }
    }

    fn add(&mut self, disposal: &DisposalRecord) {
        self.disposals += 1;
        self.proceeds += disposal.proceeds;
        self.cost_basis += disposal.cost_basis;
        self.fees += disposal.fees;
        self.gain += disposal.gain;
    }
}

/// Group disposals by asset and counter class, sorted by both ascending
pub fn aggregate(disposals: &[DisposalRecord]) -> Vec<SummaryRecord> {
    let mut groups: BTreeMap<(String, CounterClass), SummaryRecord> = BTreeMap::new();
    for disposal in disposals {
        let key = (disposal.asset.clone(), disposal.counter_class);
        groups
            .entry(key)
            .or_insert_with(|| SummaryRecord::new(disposal.asset.clone(), disposal.counter_class))
            .add(disposal);
    }
    groups.into_values().collect()
}
