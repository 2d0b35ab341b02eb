// ============================================================================
// Locator : trouve le dernier export téléchargé
// ============================================================================
// Parcourt un répertoire (ex: ~/Downloads) et retourne le fichier qui
// correspond au motif (ex: "eksport*.csv") avec la date de modification
// la plus récente.
//
// CONCEPTS RUST :
// 1. std::fs::read_dir : itère sur les entrées d'un répertoire
// 2. Regex : le motif glob est traduit en expression régulière ancrée
// 3. Iterator::max_by_key : sélection du maximum en un seul passage
// ============================================================================

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use regex::Regex;
use tracing::{debug, info, instrument, warn};

use crate::error::{ChartError, Result};

/// Motif par défaut des exports bancaires
pub const DEFAULT_PATTERN: &str = "eksport*.csv";

/// Traduit un motif glob en regex ancrée
///
/// - `*` : n'importe quelle suite de caractères
/// - `?` : exactement un caractère
/// - tout le reste est littéral (le '.' de ".csv" est échappé)
pub fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let mut expr = String::from("^");
    for c in pattern.chars() {
        match c {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            other => expr.push_str(&regex::escape(&other.to_string())),
        }
    }
    expr.push('$');

    Regex::new(&expr).map_err(|_| ChartError::Pattern(pattern.to_string()))
}

/// Retourne le fichier le plus récent de `dir` qui correspond à `pattern`
///
/// # Erreurs
/// - `ChartError::NotFound` si aucun fichier ne correspond, ou si le fichier
///   choisi n'existe plus au moment de la vérification
/// - `ChartError::Io` si le répertoire est illisible
#[instrument(skip_all, fields(dir = %dir.display(), pattern = %pattern))]
pub fn locate_latest(dir: &Path, pattern: &str) -> Result<PathBuf> {
    let not_found = || ChartError::NotFound {
        dir: dir.to_path_buf(),
        pattern: pattern.to_string(),
    };

    let matcher = glob_to_regex(pattern)?;

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        // Pas de répertoire Downloads : même cas qu'un répertoire vide
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
        Err(source) => {
            return Err(ChartError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    // CONCEPT RUST : filter_map
    // - Les entrées illisibles sont ignorées (avec un warning)
    // - On garde (chemin, date de modification) pour chaque fichier retenu
    let candidates: Vec<(PathBuf, SystemTime)> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .map(|name| matcher.is_match(name))
                .unwrap_or(false)
        })
        .filter_map(|entry| {
            let modified = entry.metadata().and_then(|m| m.modified()).ok()?;
            Some((entry.path(), modified))
        })
        .collect();

    debug!(matches = candidates.len(), "Candidate export files");

    let latest = candidates
        .into_iter()
        .max_by_key(|(_, modified)| *modified)
        .map(|(path, _)| path)
        .ok_or_else(not_found)?;

    if !latest.is_file() {
        return Err(not_found());
    }

    info!(file = %latest.display(), "Latest export located");
    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;

    fn touch(dir: &Path, name: &str, modified: SystemTime) -> PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        file.set_modified(modified).unwrap();
        path
    }

    #[test]
    fn test_glob_to_regex() {
        let re = glob_to_regex("eksport*.csv").unwrap();
        assert!(re.is_match("eksport.csv"));
        assert!(re.is_match("eksport (3).csv"));
        assert!(!re.is_match("eksportXcsv"));
        assert!(!re.is_match("old-eksport.csv"));
        assert!(!re.is_match("eksport.csv.bak"));

        let re = glob_to_regex("file?.txt").unwrap();
        assert!(re.is_match("file1.txt"));
        assert!(!re.is_match("file10.txt"));
    }

    #[test]
    fn test_selects_most_recent_regardless_of_name() {
        let dir = tempfile::tempdir().unwrap();
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);

        touch(dir.path(), "eksport (3).csv", base);
        touch(dir.path(), "eksport (1).csv", base + Duration::from_secs(60));
        let newest = touch(dir.path(), "eksport (2).csv", base + Duration::from_secs(120));
        // Plus récent, mais ne correspond pas au motif
        touch(dir.path(), "report.csv", base + Duration::from_secs(600));

        let found = locate_latest(dir.path(), DEFAULT_PATTERN).unwrap();
        assert_eq!(found, newest);
    }

    #[test]
    fn test_no_match_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "statement.csv", SystemTime::now());

        let err = locate_latest(dir.path(), DEFAULT_PATTERN).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("Downloads");

        let err = locate_latest(&missing, DEFAULT_PATTERN).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_matching_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("eksport-folder.csv")).unwrap();

        let err = locate_latest(dir.path(), DEFAULT_PATTERN).unwrap_err();
        assert!(err.is_not_found());
    }
}
