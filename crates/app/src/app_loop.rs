use std::collections::VecDeque;

use cellcraft_core::{Command, Direction, Game, GeoBounds, LatLng, MovementMode, ReconcileStats};
use macroquad::prelude::KeyCode;

use crate::game_layout::PanelRect;
use crate::map_camera::MapCamera;

/// How many notices the notice strip keeps.
pub const NOTICE_CAPACITY: usize = 4;

/// Raw input gathered for one rendered frame, in screen pixels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub keys_pressed: Vec<KeyCode>,
    /// A left click that did not turn into a drag.
    pub click: Option<(f32, f32)>,
    /// Pointer movement while the left button is held.
    pub drag: Option<(f32, f32)>,
    /// Wheel notches; positive zooms in.
    pub wheel: f32,
    pub pointer: (f32, f32),
}

/// Pointer travel, in pixels, after which a press counts as a drag.
pub const DRAG_THRESHOLD: f32 = 4.0;

/// Distinguishes clicks from drags across frames.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerTracker {
    pressed_at: Option<(f32, f32)>,
    last: (f32, f32),
    dragging: bool,
}

impl PointerTracker {
    /// Feeds one frame of left-button state. Returns `(click, drag delta)`.
    pub fn update(
        &mut self,
        pressed: bool,
        down: bool,
        released: bool,
        position: (f32, f32),
    ) -> (Option<(f32, f32)>, Option<(f32, f32)>) {
        if pressed {
            self.pressed_at = Some(position);
            self.last = position;
            self.dragging = false;
        }
        let Some(origin) = self.pressed_at else {
            return (None, None);
        };

        let mut drag = None;
        if down || released {
            let travelled = (position.0 - origin.0).hypot(position.1 - origin.1);
            if travelled > DRAG_THRESHOLD {
                self.dragging = true;
            }
            if self.dragging && position != self.last {
                drag = Some((position.0 - self.last.0, position.1 - self.last.1));
            }
            self.last = position;
        }

        let mut click = None;
        if released {
            if !self.dragging {
                click = Some(origin);
            }
            self.pressed_at = None;
            self.dragging = false;
        }
        (click, drag)
    }
}

/// Most recent notices, newest last.
#[derive(Clone, Debug, Default)]
pub struct NoticeLog {
    entries: VecDeque<String>,
}

impl NoticeLog {
    pub fn push(&mut self, text: String) {
        if self.entries.len() == NOTICE_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(text);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn latest(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }
}

pub struct AppState {
    pub camera: MapCamera,
    pub notices: NoticeLog,
    /// Stats of the last viewport pass, if one ran.
    pub last_pass: Option<ReconcileStats>,
    last_player: LatLng,
    last_view: Option<GeoBounds>,
}

impl AppState {
    pub fn new(game: &Game) -> Self {
        Self {
            camera: MapCamera::new(game.player(), game.lattice().cell_size_deg()),
            notices: NoticeLog::default(),
            last_pass: None,
            last_player: game.player(),
            last_view: None,
        }
    }

    /// Turns one frame of input into game commands, then runs the frame boundary.
    pub fn tick(&mut self, game: &mut Game, input: &FrameInput, map: PanelRect) {
        for key in &input.keys_pressed {
            if let Some(command) = key_command(*key, game.mode()) {
                game.dispatch(command);
            } else if *key == KeyCode::C {
                self.camera.center_on(game.player());
            }
        }

        if let Some((dx, dy)) = input.drag {
            self.camera.pan_pixels(dx, dy);
        }
        if input.wheel != 0.0 && map.contains(input.pointer.0, input.pointer.1) {
            let (x, y) = map.to_local(input.pointer.0, input.pointer.1);
            self.camera.zoom_at(input.wheel, x, y, map.width, map.height);
        }
        if let Some((x, y)) = input.click
            && map.contains(x, y)
        {
            let (x, y) = map.to_local(x, y);
            let position = self.camera.screen_to_geo(x, y, map.width, map.height);
            game.dispatch(Command::CellClicked(game.lattice().cell_of(position)));
        }

        self.follow_player(game);

        let view = self.camera.view_bounds(map.width, map.height);
        if self.last_view != Some(view) {
            self.last_view = Some(view);
            game.dispatch(Command::ViewportChanged(view));
        }

        if let Some(stats) = game.on_frame() {
            self.last_pass = Some(stats);
        }
        self.follow_player(game);

        for notice in game.drain_notices() {
            self.notices.push(notice.to_string());
        }
    }

    /// Keeps the player in view whenever they move.
    fn follow_player(&mut self, game: &Game) {
        if game.player() != self.last_player {
            self.last_player = game.player();
            self.camera.center_on(self.last_player);
        }
    }
}

pub fn key_command(key: KeyCode, mode: MovementMode) -> Option<Command> {
    let command = match key {
        KeyCode::Up => Command::Step(Direction::North),
        KeyCode::Down => Command::Step(Direction::South),
        KeyCode::Right => Command::Step(Direction::East),
        KeyCode::Left => Command::Step(Direction::West),
        KeyCode::G => Command::ModeChanged(match mode {
            MovementMode::Buttons => MovementMode::Geolocation,
            MovementMode::Geolocation => MovementMode::Buttons,
        }),
        KeyCode::R => Command::Reset,
        _ => return None,
    };
    Some(command)
}
