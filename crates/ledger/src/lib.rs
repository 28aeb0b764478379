//! Ledger entries and their monthly aggregation into forecastable series.
//!
//! Pure domain logic only: no IO, no persistence concerns.

pub mod aggregate;
pub mod ledger;

pub use aggregate::{LookbackWindow, MonthlyAggregator};
pub use ledger::{Account, AccountKind, LedgerEntry};
