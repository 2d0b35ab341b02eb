// ============================================================================
// PNG - Rendu du graphique dans un fichier image
// ============================================================================
// Dessine le ChartModel avec plotters dans balance.png
//
// CONCEPTS PLOTTERS :
// 1. DrawingArea : surface de dessin (ici un bitmap)
// 2. ChartBuilder : repère cartésien, titre, zones de labels
// 3. Series / Elements : ligne, tirets, texte, marqueurs
//
// L'axe X est en ordinaux de jours (f64). Les labels de plotters sont vides :
// les débuts de mois du modèle sont dessinés à la main, au format "Mon YYYY".
// ============================================================================

use std::path::Path;

use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, info, instrument};

use crate::analysis::date_to_ordinal;
use crate::error::{ChartError, Result};
use crate::models::{month_label, ChartModel};

/// Convertit n'importe quelle erreur de plotters en ChartError
fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

/// Bornes de l'axe X (ordinaux), élargies aux graduations de mois
fn x_bounds(model: &ChartModel) -> Option<(f64, f64)> {
    let (first, last) = model.date_range()?;
    let mut min = date_to_ordinal(first);
    let mut max = date_to_ordinal(last);

    for tick in &model.month_ticks {
        min = min.min(date_to_ordinal(*tick));
    }
    if max <= min {
        min -= 1.0;
        max += 1.0;
    }
    Some((min, max))
}

/// Bornes de l'axe Y avec une marge de 5%
fn y_bounds(model: &ChartModel) -> Option<(f64, f64)> {
    let (min, max) = model.value_range()?;
    let margin = if max > min { (max - min) * 0.05 } else { 1.0 };
    Some((min - margin, max + margin))
}

/// Graduations de l'axe X : (ordinal, "Mon YYYY") pour chaque début de mois
pub fn month_tick_labels(model: &ChartModel) -> Vec<(f64, String)> {
    model
        .month_ticks
        .iter()
        .map(|&tick| (date_to_ordinal(tick), month_label(tick)))
        .collect()
}

/// Écrit le graphique au format PNG (écrase le fichier existant)
///
/// # Erreurs
/// - `ChartError::EmptyLedger` si le modèle n'a aucun point
/// - `ChartError::Render` si plotters échoue (police, encodage, écriture)
#[instrument(skip(model), fields(file = %path.display()))]
pub fn render_png(model: &ChartModel, path: &Path, size: (u32, u32)) -> Result<()> {
    let (x_min, x_max) = x_bounds(model).ok_or(ChartError::EmptyLedger)?;
    let (y_min, y_max) = y_bounds(model).ok_or(ChartError::EmptyLedger)?;

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&model.title, ("sans-serif", 32).into_font())
        .margin(30)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(render_err)?;

    // Axe X : les graduations de plotters sont masquées, les débuts de mois
    // sont dessinés plus bas. Axe Y : solde entier.
    let no_label = |_: &f64| String::new();
    let y_formatter = |y: &f64| format!("{:.0}", y);

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(model.x_label.as_str())
        .y_desc(model.y_label.as_str())
        .disable_x_mesh()
        .x_label_formatter(&no_label)
        .y_labels(10)
        .y_label_formatter(&y_formatter)
        .y_label_style(("sans-serif", 14).into_font())
        .axis_desc_style(("sans-serif", 18).into_font());
    if !model.grid {
        mesh.disable_mesh();
    }
    mesh.draw().map_err(render_err)?;

    // Graduations de mois : ligne de grille, trait et label sous l'axe
    let tick_style = TextStyle::from(("sans-serif", 14).into_font())
        .pos(Pos::new(HPos::Center, VPos::Top));

    for (x, label) in month_tick_labels(model) {
        if model.grid {
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x, y_min), (x, y_max)],
                    BLACK.mix(0.15).stroke_width(1),
                )))
                .map_err(render_err)?;
        }

        let (px, py) = chart.backend_coord(&(x, y_min));
        root.draw(&PathElement::new(vec![(px, py), (px, py + 5)], BLACK.stroke_width(1)))
            .map_err(render_err)?;
        root.draw(&Text::new(label, (px, py + 8), tick_style.clone()))
            .map_err(render_err)?;
    }

    // Série principale : ligne continue
    let balance_points: Vec<(f64, f64)> = model
        .series
        .iter()
        .map(|&(date, balance)| (date_to_ordinal(date), balance))
        .collect();
    chart
        .draw_series(LineSeries::new(balance_points, BLUE.stroke_width(2)))
        .map_err(render_err)?;

    // Tendance : ligne en tirets
    let trend_points: Vec<(f64, f64)> = model
        .trend_points()
        .into_iter()
        .map(|(date, value)| (date_to_ordinal(date), value))
        .collect();
    if !trend_points.is_empty() {
        chart
            .draw_series(DashedLineSeries::new(
                trend_points,
                10,
                6,
                RED.stroke_width(2),
            ))
            .map_err(render_err)?;
    }

    // Annotations : texte au-dessus du point, flèche vers le point
    let label_style = TextStyle::from(("sans-serif", 16).into_font())
        .pos(Pos::new(HPos::Left, VPos::Bottom));

    for annotation in &model.annotations {
        let x = date_to_ordinal(annotation.date);
        let tip = (x, annotation.balance);
        let tail = (x, annotation.text_balance);

        chart
            .draw_series(std::iter::once(PathElement::new(vec![tail, tip], BLACK.stroke_width(1))))
            .map_err(render_err)?;

        // Pointe de flèche orientée vers le bas, sommet sur le point
        let (px, py) = chart.backend_coord(&tip);
        root.draw(&Polygon::new(arrow_head(px, py), BLACK.filled()))
            .map_err(render_err)?;

        chart
            .draw_series(std::iter::once(Text::new(
                annotation.label.clone(),
                tail,
                label_style.clone(),
            )))
            .map_err(render_err)?;

        debug!(label = %annotation.label, amount = annotation.amount, "Annotation drawn");
    }

    root.present().map_err(render_err)?;
    info!("Chart written");
    Ok(())
}

/// Triangle (en pixels) dont la pointe est sur (px, py) et la base au-dessus
fn arrow_head(px: i32, py: i32) -> Vec<(i32, i32)> {
    vec![(px - 5, py - 10), (px + 5, py - 10), (px, py)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChartOptions, Ledger, Transaction};
    use chrono::NaiveDate;

    fn model_for(dates: &[(u32, u32)]) -> ChartModel {
        let transactions = dates
            .iter()
            .map(|&(month, day)| Transaction {
                date: NaiveDate::from_ymd_opt(2020, month, day).unwrap(),
                description: "Test".to_string(),
                amount: 1.0,
                balance: 100.0,
                currency: "DKK".to_string(),
            })
            .collect();
        ChartModel::build(&Ledger::new(transactions), &ChartOptions::default())
    }

    #[test]
    fn test_x_bounds_cover_month_ticks() {
        let model = model_for(&[(6, 5), (6, 3)]);
        let (min, max) = x_bounds(&model).unwrap();
        // Graduation unique au 1er juin, avant la première transaction
        assert_eq!(min, date_to_ordinal(NaiveDate::from_ymd_opt(2020, 6, 1).unwrap()));
        assert_eq!(max, date_to_ordinal(NaiveDate::from_ymd_opt(2020, 6, 5).unwrap()));
    }

    #[test]
    fn test_single_day_is_widened() {
        let model = model_for(&[(7, 1)]);
        let (min, max) = x_bounds(&model).unwrap();
        assert!(max > min);

        let (low, high) = y_bounds(&model).unwrap();
        assert!(low < 100.0 && high > 110.0);
    }

    #[test]
    fn test_month_tick_labels_on_month_starts() {
        let model = model_for(&[(7, 15), (6, 3)]);
        let ticks = month_tick_labels(&model);

        assert_eq!(
            ticks,
            vec![(
                date_to_ordinal(NaiveDate::from_ymd_opt(2020, 7, 1).unwrap()),
                "Jul 2020".to_string()
            )]
        );

        let long = model_for(&[(8, 20), (6, 3)]);
        let labels: Vec<String> = month_tick_labels(&long).into_iter().map(|(_, l)| l).collect();
        assert_eq!(labels, vec!["Jul 2020", "Aug 2020"]);
    }

    #[test]
    fn test_arrow_head_points_down() {
        let head = arrow_head(100, 200);
        // Sommet sur le point, base au-dessus (y pixel croît vers le bas)
        assert_eq!(head[2], (100, 200));
        assert!(head[0].1 < 200 && head[1].1 < 200);
        assert!(head[0].0 < 100 && head[1].0 > 100);
    }

    #[test]
    fn test_render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("balance.png");
        let transactions = vec![
            Transaction {
                date: NaiveDate::from_ymd_opt(2020, 8, 20).unwrap(),
                description: "Løn".to_string(),
                amount: 25_000.0,
                balance: 31_000.0,
                currency: "DKK".to_string(),
            },
            Transaction {
                date: NaiveDate::from_ymd_opt(2020, 7, 1).unwrap(),
                description: "Husleje".to_string(),
                amount: -8_000.0,
                balance: 6_000.0,
                currency: "DKK".to_string(),
            },
            Transaction {
                date: NaiveDate::from_ymd_opt(2020, 6, 3).unwrap(),
                description: "Netto".to_string(),
                amount: -250.5,
                balance: 14_000.0,
                currency: "DKK".to_string(),
            },
        ];
        let model = ChartModel::build(&Ledger::new(transactions), &ChartOptions::default());

        render_png(&model, &path, (800, 600)).unwrap();

        let written = std::fs::metadata(&path).unwrap();
        assert!(written.len() > 0);
    }

    #[test]
    fn test_empty_model_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("balance.png");
        let model = ChartModel::build(&Ledger::default(), &ChartOptions::default());

        let err = render_png(&model, &path, (800, 600)).unwrap_err();
        assert!(matches!(err, ChartError::EmptyLedger));
        assert!(!path.exists());
    }
}
