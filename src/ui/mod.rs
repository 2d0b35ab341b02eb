// ============================================================================
// Module : ui
// ============================================================================
// Rendus du graphique : fichier PNG et affichage interactif dans le terminal
// ============================================================================

pub mod events; // Gestion des événements clavier
pub mod png;    // Rendu dans balance.png (plotters)
pub mod terminal; // Raw mode, écran alternatif, restauration
pub mod viewer; // Rendu plein écran dans le terminal (ratatui)

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};
pub use png::render_png;
pub use terminal::{restore_terminal, setup_terminal, Tui};
pub use viewer::render;
