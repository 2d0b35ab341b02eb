// ============================================================================
// Report : du fichier d'export au modèle de graphique
// ============================================================================
// Point d'entrée de la bibliothèque : prend un chemin, retourne le modèle.
// Aucun effet de bord (pas d'image écrite, rien d'affiché), ce qui permet
// de tester tout le pipeline avec un simple fichier temporaire.
// ============================================================================

use std::path::Path;

use tracing::{info, instrument};

use crate::config::Settings;
use crate::error::Result;
use crate::import::parse_file;
use crate::models::{ChartModel, Ledger};

/// Résultat du pipeline : les transactions et le graphique calculé
#[derive(Debug, Clone)]
pub struct Report {
    pub ledger: Ledger,
    pub chart: ChartModel,
}

/// Lit l'export et calcule le graphique
#[instrument(skip(settings), fields(file = %path.display()))]
pub fn build_report(path: &Path, settings: &Settings) -> Result<Report> {
    let ledger = parse_file(path)?;
    let chart = ChartModel::build(&ledger, &settings.chart_options());

    if let Some(trend) = chart.trend {
        info!(slope_per_day = trend.slope, "Trend computed");
    }

    Ok(Report { ledger, chart })
}

/// Raccourci : seulement le modèle de graphique
pub fn build_chart(path: &Path, settings: &Settings) -> Result<ChartModel> {
    build_report(path, settings).map(|report| report.chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChartError;
    use std::io::Write;

    fn write_export(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_three_rows_end_to_end() {
        let file = write_export(
            "\u{feff}05-06-2020;Test;1,00;100,00;DKK;\n\
             04-06-2020;Test;1,00;99,00;DKK;\n\
             03-06-2020;Test;1,00;98,00;DKK;\n",
        );

        let report = build_report(file.path(), &Settings::default()).unwrap();
        assert_eq!(report.ledger.len(), 3);

        let trend = report.chart.trend.unwrap();
        let points = report.chart.trend_points();
        // Série chronologique : le solde baisse quand on remonte dans le passé
        assert!(trend.slope > 0.0);
        assert!(points[0].1 < points[1].1 && points[1].1 < points[2].1);

        // Trois montants égaux : annotations dans l'ordre du fichier
        let rows: Vec<usize> = report.chart.annotations.iter().map(|a| a.row_index).collect();
        assert_eq!(rows, [0, 1, 2]);
        assert_eq!(report.chart.annotations[2].balance, 98.0);
    }

    #[test]
    fn test_top_n_comes_from_settings() {
        let file = write_export(
            "10-02-2021;Salary;25.000,00;30.000,00;DKK;\n\
             05-02-2021;Groceries;-450,25;5.000,00;DKK;\n\
             28-01-2021;Refund;120,00;5.450,25;DKK;\n",
        );
        let settings = Settings {
            top_n: 1,
            ..Settings::default()
        };

        let chart = build_chart(file.path(), &settings).unwrap();
        assert_eq!(chart.annotations.len(), 1);
        assert_eq!(chart.annotations[0].label, "Salary");
        assert_eq!(chart.annotations[0].text_balance, 30_010.0);
    }

    #[test]
    fn test_malformed_file_aborts() {
        let file = write_export("05-06-2020;Test;1,00;100,00;DKK;\nnot a row\n");
        let err = build_chart(file.path(), &Settings::default()).unwrap_err();
        assert!(matches!(err, ChartError::Parse { line: 2, .. }));
    }
}
