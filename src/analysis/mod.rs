// ============================================================================
// Module : analysis
// ============================================================================
// Calculs sur le ledger : plus grosses transactions et droite de tendance
// ============================================================================

pub mod largest; // Sélection des N plus grosses transactions
pub mod trend;   // Moindres carrés sur (date, solde)

pub use largest::{largest_transactions, RankedTransaction, DEFAULT_TOP_N};
pub use trend::{date_to_ordinal, ordinal_to_date, TrendLine};
