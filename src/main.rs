// ============================================================================
// Balance Chart - Graphique du solde bancaire
// ============================================================================
// Trouve le dernier export "eksport*.csv" dans ~/Downloads, calcule le
// graphique du solde (tendance + plus grosses transactions), l'écrit dans
// balance.png puis l'affiche en plein écran dans le terminal.
//
// CONCEPTS RUST CLÉS :
// 1. anyhow côté binaire, erreurs typées (ChartError) côté bibliothèque
// 2. Terminal raw mode : contrôle total du terminal pendant l'affichage
//    (setup/restauration dans ui::terminal)
// 3. Event loop : render -> input -> update
// ============================================================================

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use balance_chart::app::App;
use balance_chart::config::{log_dir, Settings};
use balance_chart::import::locate_latest;
use balance_chart::models::ChartModel;
use balance_chart::report::build_report;
use balance_chart::ui::{
    events::EventHandler, render, render_png, restore_terminal, setup_terminal, Tui,
};

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place, avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans :
/// - Linux : ~/.local/share/balance-chart/logs/balance-chart.log
/// - macOS : ~/Library/Application Support/balance-chart/logs/balance-chart.log
/// - Windows : C:\Users\<user>\AppData\Local\balance-chart\logs\balance-chart.log
///
/// # Utilisation
/// ```bash
/// RUST_LOG=balance_chart=trace cargo run
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = log_dir();

    std::fs::create_dir_all(&log_dir).context("Failed to create the log directory")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "balance-chart.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender) // Écrit dans le fichier
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_line_number(true),
        )
        .with(
            // RUST_LOG=debug : tous les logs debug+
            // Par défaut : debug pour balance_chart, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "balance_chart=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialized");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    // Si l'init échoue, on continue sans logs
    init_logging().unwrap_or_else(|e| {
        eprintln!("Warning: failed to initialize logging: {}", e);
    });

    let settings = Settings::from_env();
    debug!(?settings, "Settings loaded");

    // 1. Localise le dernier export
    let path = match locate_latest(&settings.downloads_dir, &settings.pattern) {
        Ok(path) => path,
        Err(e) if e.is_not_found() => {
            warn!(error = %e, "No export file found");
            println!("The file does not exist");
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Failed to search for the export file"),
    };

    // 2. Calcule le graphique (aucun effet de bord)
    let report = build_report(&path, &settings)
        .with_context(|| format!("Failed to build the chart from {}", path.display()))?;

    // 3. Écrit l'image (écrase le fichier existant)
    render_png(&report.chart, &settings.output_path, settings.image_size)
        .with_context(|| format!("Failed to write {}", settings.output_path.display()))?;
    println!("Chart saved to {}", settings.output_path.display());

    // 4. Affiche le graphique
    if !settings.display {
        info!("Display disabled by configuration");
    } else if !io::stdout().is_terminal() {
        info!("Stdout is not a terminal, skipping display");
    } else {
        show(report.chart, &path, &settings.output_path)?;
    }

    Ok(())
}

// ============================================================================
// Affichage interactif
// ============================================================================

/// Affiche le graphique jusqu'à ce que l'utilisateur quitte
fn show(chart: ChartModel, source: &Path, image: &Path) -> Result<()> {
    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let mut app = App::new(chart, source.to_path_buf()).with_saved_image(PathBuf::from(image));
    let events = EventHandler::new();

    let result = run(&mut terminal, &mut app, &events);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Viewer exited normally"),
        Err(e) => error!(error = ?e, "Viewer exited with error"),
    }

    result
}

/// Boucle principale : render -> input
fn run(terminal: &mut Tui, app: &mut App, events: &EventHandler) -> Result<()> {
    while app.is_running() {
        terminal.draw(|frame| render(frame, app))?;

        let event = events.next()?;
        handle_event(app, event);
    }

    Ok(())
}

/// Traite un événement et met à jour l'état de l'application
fn handle_event(app: &mut App, event: balance_chart::ui::events::Event) {
    use balance_chart::ui::events::{
        is_quit_event, is_toggle_annotations_event, is_toggle_trend_event, Event,
    };

    match event {
        Event::Key(_) if is_quit_event(&event) => {
            info!("User quit");
            app.quit();
        }
        Event::Key(_) if is_toggle_trend_event(&event) => {
            app.toggle_trend();
            debug!(visible = app.show_trend, "Trend toggled");
        }
        Event::Key(_) if is_toggle_annotations_event(&event) => {
            app.toggle_annotations();
            debug!(visible = app.show_annotations, "Annotations toggled");
        }
        Event::Key(_) | Event::Tick => {}
    }
}
