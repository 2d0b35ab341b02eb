// ============================================================================
// Structure : ChartModel
// ============================================================================
// Tout ce qu'il faut pour dessiner le graphique, sans dessiner.
//
// CONCEPT : Séparer le calcul du rendu
// - ChartModel::build() ne touche ni au disque ni au terminal
// - ui::png le dessine dans un fichier, ui::viewer dans le terminal
// - Les deux rendus lisent exactement les mêmes données
// ============================================================================

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{largest_transactions, TrendLine, DEFAULT_TOP_N};
use crate::models::Ledger;

/// Décalage vertical par défaut entre un point annoté et son texte
pub const DEFAULT_ANNOTATION_OFFSET: f64 = 10.0;

/// Rotation des labels de l'axe X (en degrés)
pub const X_LABEL_ROTATION: f64 = 30.0;

/// Format des labels de mois (ex: "Jun 2020")
pub const MONTH_LABEL_FORMAT: &str = "%b %Y";

/// Paramètres de construction du modèle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    /// Nombre de transactions annotées
    pub top_n: usize,

    /// Décalage vertical du texte des annotations
    pub annotation_offset: f64,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            annotation_offset: DEFAULT_ANNOTATION_OFFSET,
        }
    }
}

/// Annotation d'une grosse transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Texte affiché (libellé de la transaction)
    pub label: String,

    /// Montant de la transaction
    pub amount: f64,

    /// Point pointé par la flèche
    pub date: NaiveDate,
    pub balance: f64,

    /// Hauteur du texte (solde + décalage)
    pub text_balance: f64,

    /// Index de la ligne dans le fichier
    pub row_index: usize,
}

/// Modèle complet du graphique "Balance"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartModel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,

    /// Série principale (date, solde), dans l'ordre chronologique
    pub series: Vec<(NaiveDate, f64)>,

    /// Droite de tendance (None si aucune donnée)
    pub trend: Option<TrendLine>,

    /// Annotations, de la plus grosse transaction à la plus petite
    pub annotations: Vec<Annotation>,

    /// Graduations principales de l'axe X : premier jour de chaque mois
    pub month_ticks: Vec<NaiveDate>,

    /// Rotation demandée pour les labels de l'axe X
    pub x_label_rotation: f64,

    /// Grille affichée
    pub grid: bool,

    /// Devise de l'export (première ligne)
    pub currency: Option<String>,
}

impl ChartModel {
    /// Construit le modèle à partir du ledger
    pub fn build(ledger: &Ledger, options: &ChartOptions) -> Self {
        // Le fichier va du plus récent au plus ancien : on inverse puis on
        // trie par date (tri stable, les égalités gardent leur ordre)
        let mut series: Vec<(NaiveDate, f64)> = ledger
            .transactions
            .iter()
            .rev()
            .map(|t| (t.date, t.balance))
            .collect();
        series.sort_by_key(|&(date, _)| date);

        let trend = TrendLine::fit(series.iter().copied());

        let annotations: Vec<Annotation> = largest_transactions(ledger, options.top_n)
            .into_iter()
            .map(|ranked| Annotation {
                label: ranked.transaction.description.clone(),
                amount: ranked.transaction.amount,
                date: ranked.transaction.date,
                balance: ranked.transaction.balance,
                text_balance: ranked.transaction.balance + options.annotation_offset,
                row_index: ranked.index,
            })
            .collect();

        let month_ticks = match ledger.date_range() {
            Some((first, last)) => month_ticks(first, last),
            None => Vec::new(),
        };

        debug!(
            points = series.len(),
            annotations = annotations.len(),
            ticks = month_ticks.len(),
            "Chart model built"
        );

        Self {
            title: "Balance".to_string(),
            x_label: "Date".to_string(),
            y_label: "Balance".to_string(),
            series,
            trend,
            annotations,
            month_ticks,
            x_label_rotation: X_LABEL_ROTATION,
            grid: true,
            currency: ledger.currencies().next().map(str::to_string),
        }
    }

    /// Première et dernière date de la série
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.series.first()?.0, self.series.last()?.0))
    }

    /// Points de la droite de tendance, un par point de la série
    pub fn trend_points(&self) -> Vec<(NaiveDate, f64)> {
        match self.trend {
            Some(trend) => self
                .series
                .iter()
                .map(|&(date, _)| (date, trend.predict_date(date)))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Bornes verticales : soldes, tendance et textes des annotations
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let values = self
            .series
            .iter()
            .map(|&(_, balance)| balance)
            .chain(self.trend_points().into_iter().map(|(_, value)| value))
            .chain(self.annotations.iter().map(|a| a.text_balance));

        values.fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((min, max)) => Some((f64::min(min, v), f64::max(max, v))),
        })
    }
}

/// Premier jour de chaque mois compris dans [first, last]
///
/// Si la période ne traverse aucun début de mois, on garde le mois de la
/// première date pour avoir au moins une graduation.
pub fn month_ticks(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    let mut ticks = Vec::new();
    let mut cursor = start_of_month(first);

    if cursor < first {
        cursor = next_month(cursor);
    }

    while cursor <= last {
        ticks.push(cursor);
        cursor = next_month(cursor);
    }

    if ticks.is_empty() {
        ticks.push(start_of_month(first));
    }
    ticks
}

/// Label d'une graduation (ex: "Jun 2020")
pub fn month_label(date: NaiveDate) -> String {
    date.format(MONTH_LABEL_FORMAT).to_string()
}

fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Transaction;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(date: NaiveDate, description: &str, amount: f64, balance: f64) -> Transaction {
        Transaction {
            date,
            description: description.to_string(),
            amount,
            balance,
            currency: "DKK".to_string(),
        }
    }

    fn sample_ledger() -> Ledger {
        Ledger::new(vec![
            tx(date(2020, 8, 2), "Netto", -50.0, 1450.0),
            tx(date(2020, 7, 15), "Løn", 2000.0, 1500.0),
            tx(date(2020, 7, 1), "Husleje", -1500.0, -500.0),
            tx(date(2020, 6, 20), "Tilbagebetaling", 300.0, 1000.0),
            tx(date(2020, 6, 10), "Kiosk", 20.0, 700.0),
        ])
    }

    #[test]
    fn test_series_is_chronological() {
        let model = ChartModel::build(&sample_ledger(), &ChartOptions::default());
        let dates: Vec<NaiveDate> = model.series.iter().map(|&(d, _)| d).collect();
        assert_eq!(dates.first(), Some(&date(2020, 6, 10)));
        assert_eq!(dates.last(), Some(&date(2020, 8, 2)));
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(model.date_range(), Some((date(2020, 6, 10), date(2020, 8, 2))));
    }

    #[test]
    fn test_annotations_follow_largest_amounts() {
        let model = ChartModel::build(&sample_ledger(), &ChartOptions::default());
        let labels: Vec<&str> = model.annotations.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, ["Løn", "Tilbagebetaling", "Kiosk"]);

        let first = &model.annotations[0];
        assert_eq!(first.date, date(2020, 7, 15));
        assert_eq!(first.balance, 1500.0);
        assert_eq!(first.text_balance, 1510.0);
        assert_eq!(first.row_index, 1);
    }

    #[test]
    fn test_labels_and_ticks() {
        let model = ChartModel::build(&sample_ledger(), &ChartOptions::default());
        assert_eq!(model.title, "Balance");
        assert_eq!(model.x_label, "Date");
        assert_eq!(model.y_label, "Balance");
        assert!(model.grid);
        assert_eq!(model.x_label_rotation, 30.0);
        assert_eq!(model.currency.as_deref(), Some("DKK"));
        assert_eq!(model.month_ticks, [date(2020, 7, 1), date(2020, 8, 1)]);
        assert_eq!(month_label(model.month_ticks[0]), "Jul 2020");
    }

    #[test]
    fn test_month_ticks_edge_cases() {
        assert_eq!(
            month_ticks(date(2020, 11, 1), date(2021, 1, 31)),
            [date(2020, 11, 1), date(2020, 12, 1), date(2021, 1, 1)]
        );
        // Aucun début de mois dans la période
        assert_eq!(month_ticks(date(2020, 6, 3), date(2020, 6, 5)), [date(2020, 6, 1)]);
    }

    #[test]
    fn test_value_range_includes_annotation_text() {
        let options = ChartOptions {
            top_n: 1,
            annotation_offset: 10.0,
        };
        let model = ChartModel::build(&sample_ledger(), &options);
        let (min, max) = model.value_range().unwrap();
        assert!(min <= -500.0);
        assert!(max >= 1510.0);
    }

    #[test]
    fn test_trend_points_match_series() {
        let ledger = Ledger::new(vec![
            tx(date(2020, 6, 5), "Test", 1.0, 100.0),
            tx(date(2020, 6, 4), "Test", 1.0, 99.0),
            tx(date(2020, 6, 3), "Test", 1.0, 98.0),
        ]);
        let model = ChartModel::build(&ledger, &ChartOptions::default());
        let trend = model.trend_points();
        assert_eq!(trend.len(), 3);
        assert!(trend[0].1 < trend[2].1);
        assert!((trend[0].1 - 98.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_ledger_model() {
        let model = ChartModel::build(&Ledger::default(), &ChartOptions::default());
        assert!(model.series.is_empty());
        assert!(model.trend.is_none());
        assert!(model.annotations.is_empty());
        assert!(model.month_ticks.is_empty());
        assert!(model.value_range().is_none());
    }
}
