// ============================================================================
// Viewer - Affichage du graphique dans le terminal
// ============================================================================
// Dessine le ChartModel en plein écran avec ratatui :
// - Header : titre, fichier, période, évolution du solde
// - Graphique : solde (ligne), tendance (pointillés), grosses transactions
// - Panneau : libellés des annotations
// - Footer : touches disponibles
//
// CONCEPTS RATATUI :
// 1. Chart widget : graphique ligne
// 2. Dataset : série de données à afficher
// 3. Axis : configuration des axes X et Y
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, List, ListItem, Paragraph},
    Frame,
};

use crate::analysis::date_to_ordinal;
use crate::app::App;
use crate::models::{month_label, ChartModel};

/// Nombre de points utilisés pour dessiner la tendance en pointillés
const TREND_SAMPLES: usize = 60;

/// Dessine l'interface complète
pub fn render(frame: &mut Frame, app: &App) {
    let annotation_rows = if app.show_annotations {
        app.chart.annotations.len() as u16 + 2
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),               // Header
            Constraint::Min(0),                  // Graphique
            Constraint::Length(annotation_rows), // Annotations
            Constraint::Length(3),               // Footer
        ])
        .split(frame.size())
        .to_vec();

    render_header(frame, app, chunks[0]);

    if app.chart.series.is_empty() {
        render_no_data(frame, chunks[1], "Aucune transaction à afficher");
    } else {
        render_chart_graph(frame, app, chunks[1]);
    }

    if app.show_annotations {
        render_annotations(frame, &app.chart, chunks[2]);
    }

    render_footer(frame, app, chunks[3]);
}

// ============================================================================
// Header
// ============================================================================

/// Titre, période couverte et évolution du solde
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} - {} ", app.chart.title, app.source_name()));

    let currency = app.chart.currency.as_deref().unwrap_or("");

    let line = match (app.chart.series.first(), app.chart.series.last()) {
        (Some(&(first_date, first)), Some(&(last_date, last))) => {
            let change = last - first;
            let color = if change >= 0.0 { Color::Green } else { Color::Red };
            let arrow = if change >= 0.0 { "▲" } else { "▼" };

            Line::from(vec![
                Span::raw(format!(
                    "{} → {}  ",
                    first_date.format("%d-%m-%Y"),
                    last_date.format("%d-%m-%Y")
                )),
                Span::raw(format!("Solde: {:.2} {}  ", last, currency)),
                Span::styled(
                    format!("{} {:+.2}", arrow, change),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ])
        }
        _ => Line::from("Pas de données"),
    };

    let paragraph = Paragraph::new(line)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Graphique principal
// ============================================================================

/// Dessine le solde, la tendance et les points annotés
///
/// CONCEPT RUST : Iterator chaining
/// - .iter().map() : transforme (date, solde) en (ordinal, solde)
/// - .collect() : collecte en Vec (le Dataset emprunte une slice)
fn render_chart_graph(frame: &mut Frame, app: &App, area: Rect) {
    let chart = &app.chart;

    let points: Vec<(f64, f64)> = chart
        .series
        .iter()
        .map(|&(date, balance)| (date_to_ordinal(date), balance))
        .collect();

    let (x_min, x_max) = x_bounds(&points);

    let trend_points: Vec<(f64, f64)> = match chart.trend {
        Some(trend) if app.show_trend => sample_line(x_min, x_max, TREND_SAMPLES)
            .map(|x| (x, trend.predict(x)))
            .collect(),
        _ => Vec::new(),
    };

    let marked_points: Vec<(f64, f64)> = if app.show_annotations {
        chart
            .annotations
            .iter()
            .map(|a| (date_to_ordinal(a.date), a.balance))
            .collect()
    } else {
        Vec::new()
    };

    // Bornes verticales avec une marge de 5%
    let (y_min, y_max) = points
        .iter()
        .chain(trend_points.iter())
        .fold((f64::MAX, f64::MIN), |(min, max), &(_x, y)| {
            (min.min(y), max.max(y))
        });
    let margin = if y_max > y_min { (y_max - y_min) * 0.05 } else { 1.0 };
    let (y_min, y_max) = (y_min - margin, y_max + margin);

    let mut datasets = vec![Dataset::default()
        .name("Balance")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points)];

    if !trend_points.is_empty() {
        datasets.push(
            Dataset::default()
                .name("Trend")
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Red))
                .data(&trend_points),
        );
    }

    if !marked_points.is_empty() {
        datasets.push(
            Dataset::default()
                .name(format!("Top {}", marked_points.len()))
                .marker(symbols::Marker::Block)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Yellow))
                .data(&marked_points),
        );
    }

    let x_axis = Axis::default()
        .title(chart.x_label.as_str())
        .style(Style::default().fg(Color::Gray))
        .bounds([x_min, x_max])
        .labels(x_labels(chart));

    let y_axis = Axis::default()
        .title(chart.y_label.as_str())
        .style(Style::default().fg(Color::Gray))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format!("{:.0}", y_min)),
            Span::raw(format!("{:.0}", (y_min + y_max) / 2.0)),
            Span::raw(format!("{:.0}", y_max)),
        ]);

    let widget = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} ", chart.title)),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(widget, area);
}

/// Bornes X, élargies d'un jour si toute la série tient sur une date
fn x_bounds(points: &[(f64, f64)]) -> (f64, f64) {
    let (min, max) = points.iter().fold((f64::MAX, f64::MIN), |(min, max), &(x, _y)| {
        (min.min(x), max.max(x))
    });
    if max > min {
        (min, max)
    } else {
        (min - 1.0, max + 1.0)
    }
}

/// `count` abscisses régulièrement espacées entre min et max (inclus)
fn sample_line(min: f64, max: f64, count: usize) -> impl Iterator<Item = f64> {
    let steps = count.max(2) - 1;
    let step = (max - min) / steps as f64;
    (0..=steps).map(move |i| min + step * i as f64)
}

/// Labels de l'axe X : premier, milieu et dernier mois gradués
///
/// ratatui répartit les labels uniformément : on choisit donc trois
/// graduations, pas toutes.
fn x_labels(chart: &ChartModel) -> Vec<Span<'static>> {
    let ticks = &chart.month_ticks;
    match ticks.len() {
        0 => Vec::new(),
        1 => vec![Span::raw(month_label(ticks[0]))],
        2 => vec![
            Span::raw(month_label(ticks[0])),
            Span::raw(month_label(ticks[1])),
        ],
        n => vec![
            Span::raw(month_label(ticks[0])),
            Span::raw(month_label(ticks[n / 2])),
            Span::raw(month_label(ticks[n - 1])),
        ],
    }
}

// ============================================================================
// Panneau des annotations
// ============================================================================

/// Liste les plus grosses transactions (libellé, montant, date, solde)
fn render_annotations(frame: &mut Frame, chart: &ChartModel, area: Rect) {
    let currency = chart.currency.as_deref().unwrap_or("");

    let items: Vec<ListItem> = chart
        .annotations
        .iter()
        .map(|a| {
            let color = if a.amount >= 0.0 { Color::Green } else { Color::Red };
            ListItem::new(Line::from(vec![
                Span::styled("▲ ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{:<30}", a.label),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{:>+14.2} {} ", a.amount, currency),
                    Style::default().fg(color),
                ),
                Span::raw(format!(" {}  solde {:.0}", a.date.format("%d-%m-%Y"), a.balance)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Plus grosses transactions "),
    );

    frame.render_widget(list, area);
}

// ============================================================================
// Footer
// ============================================================================

/// Touches disponibles et image générée
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let on_off = |enabled: bool| if enabled { "on" } else { "off" };

    let mut spans = vec![
        Span::styled("[t]", key_style),
        Span::raw(format!(" Tendance ({})  ", on_off(app.show_trend))),
        Span::styled("[a]", key_style),
        Span::raw(format!(" Annotations ({})  ", on_off(app.show_annotations))),
        Span::styled("[q]", key_style),
        Span::raw(" Quitter"),
    ];

    if let Some(path) = &app.saved_to {
        spans.push(Span::styled(
            format!("   Image: {}", path.display()),
            Style::default().fg(Color::Gray),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Helper : Message quand pas de données
// ============================================================================

fn render_no_data(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" ⚠ Erreur ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Red))),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChartOptions, Ledger, Transaction};
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};
    use std::path::PathBuf;

    fn sample_app() -> App {
        let rows = [
            (2020, 8, 2, "Netto", -50.0, 1450.0),
            (2020, 7, 15, "Salary", 2000.0, 1500.0),
            (2020, 6, 20, "Refund", 300.0, -500.0),
            (2020, 6, 10, "Kiosk", 20.0, -800.0),
        ];
        let transactions = rows
            .iter()
            .map(|&(y, m, d, description, amount, balance)| Transaction {
                date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
                description: description.to_string(),
                amount,
                balance,
                currency: "DKK".to_string(),
            })
            .collect();
        let chart = ChartModel::build(&Ledger::new(transactions), &ChartOptions::default());
        App::new(chart, PathBuf::from("eksport.csv"))
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_shows_annotations_and_keys() {
        let app = sample_app();
        let screen = draw(&app);

        assert!(screen.contains("Balance - eksport.csv"));
        assert!(screen.contains("Salary"));
        assert!(screen.contains("Refund"));
        assert!(screen.contains("Plus grosses transactions"));
        assert!(screen.contains("Quitter"));
    }

    #[test]
    fn test_hidden_annotations_are_not_listed() {
        let mut app = sample_app();
        app.toggle_annotations();
        let screen = draw(&app);

        assert!(!screen.contains("Plus grosses transactions"));
        assert!(screen.contains("Annotations (off)"));
    }

    #[test]
    fn test_sample_line_covers_bounds() {
        let xs: Vec<f64> = sample_line(0.0, 10.0, 6).collect();
        assert_eq!(xs, [0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(x_bounds(&[(5.0, 1.0)]), (4.0, 6.0));
    }
}
