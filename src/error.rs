// ============================================================================
// Module : error
// ============================================================================
// Erreurs typées de la bibliothèque
//
// CONCEPT RUST : thiserror
// - #[derive(Error)] génère l'implémentation de std::error::Error
// - #[error("...")] définit le message affiché (Display)
// - #[from] génère la conversion automatique utilisée par l'opérateur ?
//
// Le binaire travaille avec anyhow, mais il a besoin de reconnaître
// NotFound pour afficher "The file does not exist" et sortir avec le code 1.
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

/// Erreurs possibles lors de la génération du graphique
#[derive(Debug, Error)]
pub enum ChartError {
    /// Aucun fichier ne correspond au motif dans le répertoire
    #[error("no file matching '{pattern}' in {}", .dir.display())]
    NotFound { dir: PathBuf, pattern: String },

    /// Erreur d'entrée/sortie (lecture du CSV, écriture du PNG)
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Erreur du lecteur CSV (guillemets mal fermés, UTF-8 invalide, ...)
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Ligne mal formée : nombre de champs, date ou montant illisible
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Le fichier ne contient aucune transaction
    #[error("the transaction file is empty")]
    EmptyLedger,

    /// Motif de fichier invalide
    #[error("invalid file pattern '{0}'")]
    Pattern(String),

    /// Échec du rendu (backend plotters ou terminal)
    #[error("render failed: {0}")]
    Render(String),
}

impl ChartError {
    /// Vrai si l'erreur correspond à "aucun fichier d'entrée"
    pub fn is_not_found(&self) -> bool {
        matches!(self, ChartError::NotFound { .. })
    }
}

/// Alias pratique pour les fonctions de la bibliothèque
pub type Result<T> = std::result::Result<T, ChartError>;
