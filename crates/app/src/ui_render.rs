//! Rendering for the map panel, status bar and notice strip.

use cellcraft_app::app_loop::AppState;
use cellcraft_app::game_layout::{FrameLayout, PanelRect};
use cellcraft_app::map_camera::MapCamera;
use cellcraft_app::ui_text::{CONTROLS_HELP, status_text, view_hint};
use cellcraft_core::viewport::{Drawable, Rgb};
use cellcraft_core::{Game, LatLng};
use macroquad::prelude::*;

const BACKGROUND: Color = Color { r: 0.96, g: 0.96, b: 0.94, a: 1.0 };
const BORDER_COLOR: Color = Color { r: 0.2, g: 0.2, b: 0.2, a: 1.0 };
const PANEL_COLOR: Color = Color { r: 0.12, g: 0.12, b: 0.14, a: 1.0 };
const PLAYER_COLOR: Color = Color { r: 0.85, g: 0.2, b: 0.2, a: 1.0 };
const PANEL_PAD_X: f32 = 12.0;
const PANEL_PAD_Y: f32 = 26.0;
const LINE_HEIGHT: f32 = 18.0;
/// Labels are skipped once cells get smaller than this many pixels.
const MIN_LABEL_CELL_PX: f32 = 14.0;

pub fn draw_frame(game: &Game, app: &AppState, layout: &FrameLayout) {
    clear_background(PANEL_COLOR);
    draw_map(game, &app.camera, layout.map);
    if let Some(hint) = view_hint(app.last_pass.as_ref()) {
        draw_text(hint, layout.map.x + PANEL_PAD_X, layout.map.y + PANEL_PAD_Y, 22.0, BORDER_COLOR);
    }

    // Panels are drawn after the map so they cover cells that spill past its edges.
    draw_status_panel(game, layout.status);
    draw_notice_panel(app, layout.notices);
}

fn draw_map(game: &Game, camera: &MapCamera, panel: PanelRect) {
    draw_rectangle(panel.x, panel.y, panel.width, panel.height, BACKGROUND);

    for drawable in game.renderer().iter() {
        draw_cell(drawable, camera, panel);
    }

    let (x, y) = project(camera, panel, game.player());
    draw_circle(x, y, 6.0, PLAYER_COLOR);
    draw_circle_lines(x, y, 6.0, 1.5, WHITE);

    draw_rectangle_lines(panel.x, panel.y, panel.width, panel.height, 1.0, BORDER_COLOR);
}

fn draw_cell(drawable: &Drawable, camera: &MapCamera, panel: PanelRect) {
    let appearance = &drawable.appearance;
    let bounds = appearance.bounds;
    let (left, top) = project(camera, panel, LatLng::new(bounds.north, bounds.west));
    let (right, bottom) = project(camera, panel, LatLng::new(bounds.south, bounds.east));
    let (width, height) = (right - left, bottom - top);

    let style = appearance.style;
    if let Some(fill) = style.fill {
        draw_rectangle(left, top, width, height, color(fill.color, fill.opacity));
    }
    draw_rectangle_lines(left, top, width, height, style.outline_weight, color(style.outline, 1.0));

    if let Some(label) = &appearance.label
        && width >= MIN_LABEL_CELL_PX
    {
        let font_size = (height * 0.6).min(22.0);
        let size = measure_text(&label.text, None, font_size as u16, 1.0);
        let (x, y) = project(camera, panel, label.anchor);
        draw_text(&label.text, x - size.width / 2.0, y + size.height / 2.0, font_size, BLACK);
    }
}

fn draw_status_panel(game: &Game, panel: PanelRect) {
    draw_rectangle(panel.x, panel.y, panel.width, panel.height, PANEL_COLOR);
    draw_rectangle_lines(panel.x, panel.y, panel.width, panel.height, 1.0, BORDER_COLOR);
    draw_text(&status_text(game), panel.x + PANEL_PAD_X, panel.y + PANEL_PAD_Y, 20.0, WHITE);
}

fn draw_notice_panel(app: &AppState, panel: PanelRect) {
    draw_rectangle(panel.x, panel.y, panel.width, panel.height, PANEL_COLOR);
    draw_rectangle_lines(panel.x, panel.y, panel.width, panel.height, 1.0, BORDER_COLOR);

    let text_x = panel.x + PANEL_PAD_X;
    let mut text_y = panel.y + PANEL_PAD_Y;
    draw_text(CONTROLS_HELP, text_x, text_y, 16.0, GRAY);
    let latest = app.notices.latest();
    for notice in app.notices.iter() {
        text_y += LINE_HEIGHT;
        let tint = if Some(notice) == latest { YELLOW } else { LIGHTGRAY };
        draw_text(notice, text_x, text_y, 16.0, tint);
    }
}

fn project(camera: &MapCamera, panel: PanelRect, position: LatLng) -> (f32, f32) {
    let (x, y) = camera.geo_to_screen(position, panel.width, panel.height);
    (panel.x + x, panel.y + y)
}

fn color(rgb: Rgb, alpha: f32) -> Color {
    Color::from_rgba(rgb.r, rgb.g, rgb.b, (alpha * 255.0).round() as u8)
}
