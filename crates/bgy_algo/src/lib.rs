// crates/bgy_algo/src/lib.rs
#![forbid(unsafe_code)]

//! Pure algorithms over already-parsed residents: no I/O, no clocks, no randomness.
//! Output order is always either ascending label order (buckets) or registry order (rows).

pub mod aggregate;
pub mod analytics;
pub mod reconcile;

pub use aggregate::{aggregate, AggregateBucket};
pub use analytics::{derive_analytics, DerivedAnalytics, PensionSplit, RowCount, RowPension, RowShare};
pub use reconcile::{reconcile, MatchTier, ReconciledRow, Reconciliation, UnreconciledLabel, UnreconciledReport};
