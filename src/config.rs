// ============================================================================
// Module : config
// ============================================================================
// Paramètres de l'application : où chercher l'export, où écrire l'image,
// combien de transactions annoter.
//
// Pas d'arguments en ligne de commande : les valeurs par défaut suffisent,
// quelques variables d'environnement permettent de les ajuster.
//
//   BALANCE_CHART_DIR         répertoire de recherche (défaut : ~/Downloads)
//   BALANCE_CHART_PATTERN     motif de fichier (défaut : eksport*.csv)
//   BALANCE_CHART_OUTPUT      image générée (défaut : balance.png)
//   BALANCE_CHART_TOP         nombre d'annotations (défaut : 3)
//   BALANCE_CHART_NO_DISPLAY  si défini, pas d'affichage dans le terminal
// ============================================================================

use std::path::PathBuf;

use tracing::warn;

use crate::analysis::DEFAULT_TOP_N;
use crate::import::DEFAULT_PATTERN;
use crate::models::chart::{ChartOptions, DEFAULT_ANNOTATION_OFFSET};

/// Nom de l'image écrite dans le répertoire courant
pub const DEFAULT_OUTPUT: &str = "balance.png";

/// Taille de l'image PNG (plein écran 16:9)
pub const DEFAULT_IMAGE_SIZE: (u32, u32) = (1600, 900);

/// Paramètres de l'application
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Répertoire où chercher les exports
    pub downloads_dir: PathBuf,

    /// Motif des fichiers d'export
    pub pattern: String,

    /// Chemin de l'image générée
    pub output_path: PathBuf,

    /// Nombre de transactions annotées
    pub top_n: usize,

    /// Décalage vertical des annotations
    pub annotation_offset: f64,

    /// Taille de l'image (largeur, hauteur) en pixels
    pub image_size: (u32, u32),

    /// Affiche le graphique dans le terminal
    pub display: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            downloads_dir: default_downloads_dir(),
            pattern: DEFAULT_PATTERN.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            top_n: DEFAULT_TOP_N,
            annotation_offset: DEFAULT_ANNOTATION_OFFSET,
            image_size: DEFAULT_IMAGE_SIZE,
            display: true,
        }
    }
}

impl Settings {
    /// Valeurs par défaut surchargées par l'environnement du processus
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Valeurs par défaut surchargées par une fonction de lecture
    ///
    /// CONCEPT RUST : Injection de dépendance par closure
    /// - from_env() passe std::env::var
    /// - les tests passent une HashMap, sans toucher à l'environnement global
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(dir) = lookup("BALANCE_CHART_DIR").filter(|v| !v.is_empty()) {
            settings.downloads_dir = PathBuf::from(dir);
        }
        if let Some(pattern) = lookup("BALANCE_CHART_PATTERN").filter(|v| !v.is_empty()) {
            settings.pattern = pattern;
        }
        if let Some(output) = lookup("BALANCE_CHART_OUTPUT").filter(|v| !v.is_empty()) {
            settings.output_path = PathBuf::from(output);
        }
        if let Some(top) = lookup("BALANCE_CHART_TOP") {
            match top.trim().parse::<usize>() {
                Ok(n) => settings.top_n = n,
                Err(_) => warn!(value = %top, "Ignoring invalid BALANCE_CHART_TOP"),
            }
        }
        if lookup("BALANCE_CHART_NO_DISPLAY").is_some() {
            settings.display = false;
        }

        settings
    }

    /// Options de construction du modèle de graphique
    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            top_n: self.top_n,
            annotation_offset: self.annotation_offset,
        }
    }
}

/// ~/Downloads, ou le répertoire de téléchargement de la plateforme
fn default_downloads_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join("Downloads"))
        .or_else(dirs::download_dir)
        .unwrap_or_else(|| PathBuf::from("Downloads"))
}

/// Répertoire des logs (~/.local/share/balance-chart/logs sur Linux)
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("balance-chart"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_with(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_with(&[]);
        assert_eq!(settings.pattern, "eksport*.csv");
        assert_eq!(settings.output_path, PathBuf::from("balance.png"));
        assert_eq!(settings.top_n, 3);
        assert_eq!(settings.annotation_offset, 10.0);
        assert!(settings.display);
        assert!(settings.downloads_dir.ends_with("Downloads"));
    }

    #[test]
    fn test_environment_overrides() {
        let settings = settings_with(&[
            ("BALANCE_CHART_DIR", "/data/exports"),
            ("BALANCE_CHART_PATTERN", "export*.csv"),
            ("BALANCE_CHART_OUTPUT", "out/chart.png"),
            ("BALANCE_CHART_TOP", "5"),
            ("BALANCE_CHART_NO_DISPLAY", "1"),
        ]);
        assert_eq!(settings.downloads_dir, PathBuf::from("/data/exports"));
        assert_eq!(settings.pattern, "export*.csv");
        assert_eq!(settings.output_path, PathBuf::from("out/chart.png"));
        assert_eq!(settings.top_n, 5);
        assert!(!settings.display);
        assert_eq!(settings.chart_options().top_n, 5);
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let settings = settings_with(&[("BALANCE_CHART_TOP", "three"), ("BALANCE_CHART_DIR", "")]);
        assert_eq!(settings.top_n, 3);
        assert!(settings.downloads_dir.ends_with("Downloads"));
    }
}
