// ============================================================================
// Balance Chart - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod analysis; // Plus grosses transactions, droite de tendance
pub mod app;      // État de l'affichage interactif
pub mod config;   // Paramètres (valeurs par défaut + environnement)
pub mod error;    // Erreurs typées
pub mod import;   // Recherche et lecture de l'export CSV
pub mod models;   // Structures de données
pub mod report;   // Pipeline : fichier -> modèle de graphique
pub mod ui;       // Rendus PNG et terminal

pub use error::{ChartError, Result};
