//! Text for the status bar and notice strip.

use cellcraft_core::{Game, MovementMode, ReconcileStats};

pub const CONTROLS_HELP: &str =
    "Arrows: step | G: follow location | R: reset | C: center | drag: pan | wheel: zoom";

pub fn mode_text(mode: MovementMode) -> &'static str {
    match mode {
        MovementMode::Buttons => "Manual movement",
        MovementMode::Geolocation => "Following location",
    }
}

pub fn status_text(game: &Game) -> String {
    format!(
        "{} | {} | Cell {}",
        game.hud_text(),
        mode_text(game.mode()),
        game.player_cell()
    )
}

/// Shown over the map when the last pass drew nothing because the view was too large.
pub fn view_hint(last_pass: Option<&ReconcileStats>) -> Option<&'static str> {
    last_pass.filter(|stats| stats.too_many_cells).map(|_| "Zoom in to see cells")
}
