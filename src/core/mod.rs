pub mod classify;
pub mod engine;
pub mod inventory;
pub mod ledger;
pub mod linker;
pub mod summary;
pub mod warnings;

// Flat surface for the command and import layers.
pub use engine::{calculate_fifo, DisposalRecord, EngineOptions, FifoReport};
pub use inventory::{Holding, Lot};
pub use ledger::{Ledger, LedgerRow};
pub use summary::{aggregate, SummaryRecord};
pub use warnings::Warning;
