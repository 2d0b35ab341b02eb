// ============================================================================
// Module : import
// ============================================================================
// Récupère les transactions : localise le dernier export téléchargé
// puis lit son contenu CSV
// ============================================================================

pub mod locator; // Recherche du fichier le plus récent
pub mod parser;  // Lecture du CSV au format européen

// Re-export des fonctions principales
pub use locator::{locate_latest, DEFAULT_PATTERN};
pub use parser::{parse_amount, parse_date, parse_file, parse_str};
