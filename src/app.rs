// ============================================================================
// Structure : App
// ============================================================================
// État de l'affichage interactif du graphique
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
//
// PATTERN : "Application State"
// - Le rendu (ui::viewer) lit depuis App
// - Les touches (main.rs) modifient App via ses méthodes
// ============================================================================

use std::path::PathBuf;

use crate::models::ChartModel;

/// État principal de l'affichage
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Graphique calculé (ne change plus après le chargement)
    pub chart: ChartModel,

    /// Fichier d'export affiché
    pub source: PathBuf,

    /// Image écrite sur le disque, si elle l'a été
    pub saved_to: Option<PathBuf>,

    /// Affiche la droite de tendance (touche 't')
    pub show_trend: bool,

    /// Affiche les plus grosses transactions (touche 'a')
    pub show_annotations: bool,
}

impl App {
    /// Crée l'état avec tout affiché
    pub fn new(chart: ChartModel, source: PathBuf) -> Self {
        Self {
            running: true,
            chart,
            source,
            saved_to: None,
            show_trend: true,
            show_annotations: true,
        }
    }

    /// Enregistre le chemin de l'image générée (affiché dans le footer)
    pub fn with_saved_image(mut self, path: PathBuf) -> Self {
        self.saved_to = Some(path);
        self
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application tourne encore
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Affiche / masque la droite de tendance
    pub fn toggle_trend(&mut self) {
        self.show_trend = !self.show_trend;
    }

    /// Affiche / masque les annotations
    pub fn toggle_annotations(&mut self) {
        self.show_annotations = !self.show_annotations;
    }

    /// Nom du fichier source, pour les titres
    pub fn source_name(&self) -> String {
        self.source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
