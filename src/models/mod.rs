// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod transaction; // Une ligne de l'export et le ledger complet
pub mod chart;       // Modèle du graphique (indépendant du rendu)

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use balance_chart::models::transaction::Ledger;
// On peut faire : use balance_chart::models::Ledger;
pub use transaction::{Ledger, Transaction};
pub use chart::{month_label, Annotation, ChartModel, ChartOptions};
