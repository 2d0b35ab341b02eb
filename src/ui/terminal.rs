// ============================================================================
// Terminal : passage en mode plein écran et restauration
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
//
// Trois chemins doivent rendre un terminal utilisable :
// 1. Sortie normale : restore_terminal
// 2. Échec à mi-chemin du setup : ce qui a été activé est annulé
// 3. Panic pendant l'affichage : le hook restaure avant d'afficher le message
//
// CONCEPT RUST : panic hook
// - std::panic::take_hook récupère le hook par défaut
// - set_hook le remplace ; on l'appelle ensuite pour garder le message
// ============================================================================

use std::io::{self, Stdout};

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::warn;

/// Terminal utilisé par l'affichage interactif
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Exécute `undo` si `result` est une erreur, puis rend `result` inchangé
pub fn undo_on_error<T, E>(result: std::result::Result<T, E>, undo: impl FnOnce()) -> std::result::Result<T, E> {
    if result.is_err() {
        undo();
    }
    result
}

/// Configure le terminal en mode TUI (raw mode, écran alternatif)
pub fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;

    undo_on_error(execute!(io::stdout(), EnterAlternateScreen), leave_raw_mode)?;

    let terminal = undo_on_error(Terminal::new(CrosstermBackend::new(io::stdout())), reset_terminal)?;

    install_panic_hook();
    Ok(terminal)
}

/// Restaure le terminal à son état normal
pub fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Restaure le terminal avant le message de panic
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        reset_terminal();
        previous(info);
    }));
}

fn leave_raw_mode() {
    if let Err(e) = disable_raw_mode() {
        warn!(error = %e, "Failed to disable raw mode");
    }
}

fn reset_terminal() {
    leave_raw_mode();
    if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen) {
        warn!(error = %e, "Failed to leave the alternate screen");
    }
}
