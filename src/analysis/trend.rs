// ============================================================================
// Trend : droite de tendance (moindres carrés)
// ============================================================================
// Ajuste une droite solde = pente * jour + ordonnée sur la série (date, solde).
// Le jour est un ordinal : nombre de jours depuis le 1970-01-01.
//
// CONCEPT : Moindres carrés du premier degré
// - pente = Σ(x - x̄)(y - ȳ) / Σ(x - x̄)²
// - ordonnée = ȳ - pente * x̄
// - On centre sur les moyennes : les ordinaux valent ~18 000, les sommes
//   de carrés non centrées perdraient de la précision
// ============================================================================

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date de référence des ordinaux
fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Convertit une date en ordinal (jours depuis 1970-01-01)
pub fn date_to_ordinal(date: NaiveDate) -> f64 {
    date.signed_duration_since(epoch()).num_days() as f64
}

/// Convertit un ordinal en date (arrondi au jour le plus proche)
pub fn ordinal_to_date(ordinal: f64) -> Option<NaiveDate> {
    let days = ordinal.round();
    if days >= 0.0 {
        epoch().checked_add_days(Days::new(days as u64))
    } else {
        epoch().checked_sub_days(Days::new((-days) as u64))
    }
}

/// Droite de tendance y = slope * x + intercept
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    /// Variation du solde par jour
    pub slope: f64,

    /// Solde prédit à l'ordinal 0 (1970-01-01)
    pub intercept: f64,
}

impl TrendLine {
    /// Ajuste la droite sur des points (date, solde)
    ///
    /// Retourne None s'il n'y a aucun point. Avec un seul point, ou si toutes
    /// les dates sont identiques, la droite est horizontale au solde moyen.
    pub fn fit<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let points: Vec<(f64, f64)> = points
            .into_iter()
            .map(|(date, balance)| (date_to_ordinal(date), balance))
            .collect();

        if points.is_empty() {
            return None;
        }

        let n = points.len() as f64;
        let mean_x = points.iter().map(|&(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|&(_, y)| y).sum::<f64>() / n;

        let (covariance, variance) = points.iter().fold((0.0, 0.0), |(cov, var), &(x, y)| {
            let dx = x - mean_x;
            (cov + dx * (y - mean_y), var + dx * dx)
        });

        let slope = if variance > 0.0 { covariance / variance } else { 0.0 };

        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    /// Solde prédit pour un ordinal
    pub fn predict(&self, ordinal: f64) -> f64 {
        self.slope * ordinal + self.intercept
    }

    /// Solde prédit pour une date
    pub fn predict_date(&self, date: NaiveDate) -> f64 {
        self.predict(date_to_ordinal(date))
    }
}
