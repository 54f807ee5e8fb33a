//! Session controller: owns the world state and routes every command.
//!
//! A mutating command runs to completion inside one [`Game::dispatch`] call
//! in a fixed order: world mutation, then persistence write, then render
//! update. Viewport changes only schedule a pass; [`Game::on_frame`] runs at
//! most one pass per frame and polls the position feed.

use std::fmt;
use std::mem;

use crate::config::GameConfig;
use crate::grid::{GeoBounds, Lattice};
use crate::interaction::{self, Outcome};
use crate::movement::{MovementController, PositionError, PositionSource};
use crate::persistence::{self, KeyValueStore, SaveBlob};
use crate::scheduler::CoalescingScheduler;
use crate::types::{CellCoord, CellValue, Direction, LatLng, MovementMode, Token};
use crate::viewport::{CellRenderer, ReconcileStats, Scene, ViewContext, ViewportCellManager};
use crate::world::World;

/// Inputs accepted by the controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    CellClicked(CellCoord),
    PositionUpdated(LatLng),
    Step(Direction),
    ModeChanged(MovementMode),
    ViewportChanged(GeoBounds),
    Reset,
}

/// Short user-facing messages produced while handling commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    NothingHere,
    PickedUp(Token),
    Placed(Token),
    Crafted(Token),
    Victory(Token),
    HoldingTarget(Token),
    Mismatch,
    TooFar,
    ModeChanged(MovementMode),
    LocationUnavailable(String),
    WorldReset,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NothingHere => write!(f, "Empty"),
            Self::PickedUp(token) => write!(f, "Picked up {token}"),
            Self::Placed(_) => write!(f, "Placed token"),
            Self::Crafted(token) => write!(f, "Crafted {token}"),
            Self::Victory(token) => write!(f, "Victory! You crafted {token}"),
            Self::HoldingTarget(token) => write!(f, "You now hold {token}"),
            Self::Mismatch => write!(f, "Doesn't match"),
            Self::TooFar => write!(f, "Too far"),
            Self::ModeChanged(MovementMode::Buttons) => write!(f, "Manual movement"),
            Self::ModeChanged(MovementMode::Geolocation) => write!(f, "Following your location"),
            Self::LocationUnavailable(reason) => {
                write!(f, "Location unavailable ({reason}); using manual movement")
            }
            Self::WorldReset => write!(f, "World reset"),
        }
    }
}

/// Save-relevant session state.
#[derive(Clone, Debug)]
pub struct WorldState {
    pub world: World,
    pub held: CellValue,
    pub player: LatLng,
    pub mode: MovementMode,
}

pub fn held_label(held: CellValue) -> String {
    match held {
        Some(token) => format!("Holding: {token}"),
        None => "Holding: (empty)".to_string(),
    }
}

pub struct Game<R: CellRenderer = Scene> {
    config: GameConfig,
    lattice: Lattice,
    state: WorldState,
    store: Box<dyn KeyValueStore>,
    viewport: ViewportCellManager<R>,
    view_bounds: Option<GeoBounds>,
    pending_pass: CoalescingScheduler<GeoBounds>,
    movement: MovementController,
    notices: Vec<Notice>,
}

impl<R: CellRenderer> Game<R> {
    /// Starts a session, resuming from `store` when it holds a readable save.
    pub fn new(
        config: GameConfig,
        store: Box<dyn KeyValueStore>,
        renderer: R,
        feed: Option<Box<dyn PositionSource>>,
    ) -> Self {
        let mut world = World::from_config(&config);
        let (held, player, resume_mode) = match persistence::load(store.as_ref()) {
            Some(saved) => {
                log::info!("resuming saved game with {} changed cells", saved.overlay.len());
                world.replace_overlay(saved.overlay);
                (saved.held, saved.player, saved.mode)
            }
            None => (None, config.start, MovementMode::Buttons),
        };
        let state = WorldState { world, held, player, mode: MovementMode::Buttons };

        let mut game = Self {
            lattice: Lattice::from_config(&config),
            viewport: ViewportCellManager::new(renderer, config.max_materialized_cells),
            config,
            state,
            store,
            view_bounds: None,
            pending_pass: CoalescingScheduler::new(),
            movement: MovementController::new(feed),
            notices: Vec::new(),
        };
        if let Some(token) = held
            && game.config.is_victory(token)
        {
            game.notices.push(Notice::HoldingTarget(token));
        }
        if resume_mode == MovementMode::Geolocation {
            game.change_mode(MovementMode::Geolocation);
        }
        game
    }

    /// Single entry point for inputs. Returns the interaction outcome for clicks.
    pub fn dispatch(&mut self, command: Command) -> Option<Outcome> {
        match command {
            Command::CellClicked(coord) => return Some(self.click(coord)),
            Command::PositionUpdated(position) => {
                if self.movement.mode() == MovementMode::Geolocation {
                    self.move_player(position);
                } else {
                    log::debug!("ignoring position update while in manual mode");
                }
            }
            Command::Step(direction) => {
                if self.movement.accepts_steps() {
                    let next = self.lattice.step(self.state.player, direction);
                    self.move_player(next);
                } else {
                    log::debug!("ignoring manual step while following the position feed");
                }
            }
            Command::ModeChanged(mode) => self.change_mode(mode),
            Command::ViewportChanged(bounds) => {
                self.view_bounds = Some(bounds);
                self.pending_pass.schedule(bounds);
            }
            Command::Reset => self.reset(),
        }
        None
    }

    /// Frame boundary: polls the position feed, then runs the pending viewport pass.
    pub fn on_frame(&mut self) -> Option<ReconcileStats> {
        match self.movement.poll() {
            Some(Ok(position)) => self.move_player(position),
            Some(Err(err)) => self.fall_back_to_manual(&err),
            None => {}
        }

        let bounds = self.pending_pass.take_due()?;
        log::trace!("viewport pass ({} superseded so far)", self.pending_pass.superseded());
        let ctx = self.view_context();
        Some(self.viewport.reconcile(&bounds, &self.state.world, &ctx))
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        mem::take(&mut self.notices)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn world(&self) -> &World {
        &self.state.world
    }

    pub fn held(&self) -> CellValue {
        self.state.held
    }

    pub fn player(&self) -> LatLng {
        self.state.player
    }

    pub fn player_cell(&self) -> CellCoord {
        self.lattice.cell_of(self.state.player)
    }

    pub fn mode(&self) -> MovementMode {
        self.state.mode
    }

    pub fn view_bounds(&self) -> Option<GeoBounds> {
        self.view_bounds
    }

    pub fn viewport(&self) -> &ViewportCellManager<R> {
        &self.viewport
    }

    pub fn renderer(&self) -> &R {
        self.viewport.renderer()
    }

    pub fn hud_text(&self) -> String {
        held_label(self.state.held)
    }

    pub fn view_context(&self) -> ViewContext {
        ViewContext {
            lattice: self.lattice,
            player: self.player_cell(),
            interact_radius: self.config.interact_radius,
            label_radius: self.config.label_radius,
        }
    }

    fn click(&mut self, target: CellCoord) -> Outcome {
        let cell = self.state.world.get_cell_value(target);
        let transition =
            interaction::resolve(self.player_cell(), target, self.state.held, cell, &self.config);

        if transition.mutates() {
            self.state.world.set_cell_value(target, transition.cell);
            self.state.held = transition.held;
            self.persist();
            let ctx = self.view_context();
            self.viewport.refresh_cell(target, &self.state.world, &ctx);
        }

        self.notices.push(match transition.outcome {
            Outcome::NothingHere => Notice::NothingHere,
            Outcome::PickedUp(token) => Notice::PickedUp(token),
            Outcome::Placed(token) => Notice::Placed(token),
            Outcome::Crafted { value, .. } => Notice::Crafted(value),
            Outcome::Mismatch { .. } => Notice::Mismatch,
            Outcome::TooFar { .. } => Notice::TooFar,
        });
        if let Outcome::Crafted { value, victory: true } = transition.outcome {
            log::info!("victory: crafted {value} at {target}");
            self.notices.push(Notice::Victory(value));
        }
        if transition.mutates()
            && let Some(token) = self.state.held
            && self.config.is_victory(token)
        {
            self.notices.push(Notice::HoldingTarget(token));
        }
        transition.outcome
    }

    fn move_player(&mut self, position: LatLng) {
        if !(position.lat.is_finite() && position.lng.is_finite()) {
            log::warn!("ignoring non-finite player position {position:?}");
            return;
        }
        let previous_cell = self.player_cell();
        self.state.player = position;
        self.persist();
        if self.player_cell() != previous_cell {
            let ctx = self.view_context();
            self.viewport.refresh_all(&self.state.world, &ctx);
        }
    }

    fn change_mode(&mut self, mode: MovementMode) {
        match self.movement.set_mode(mode) {
            Ok(false) => {}
            Ok(true) => {
                log::info!("movement mode changed to {mode:?}");
                self.state.mode = self.movement.mode();
                self.persist();
                self.notices.push(Notice::ModeChanged(self.state.mode));
            }
            Err(err) => self.fall_back_to_manual(&err),
        }
    }

    fn fall_back_to_manual(&mut self, err: &PositionError) {
        log::warn!("{err}; falling back to manual movement");
        self.state.mode = self.movement.mode();
        self.persist();
        let reason = match err {
            PositionError::Unavailable(reason) | PositionError::Failed(reason) => reason.clone(),
        };
        self.notices.push(Notice::LocationUnavailable(reason));
    }

    fn reset(&mut self) {
        if let Err(err) = self.movement.set_mode(MovementMode::Buttons) {
            log::warn!("could not stop the position feed: {err}");
        }
        self.state.world.clear_overlay();
        self.state.held = None;
        self.state.player = self.config.start;
        self.state.mode = self.movement.mode();
        if let Err(err) = persistence::clear(self.store.as_mut()) {
            log::error!("failed to delete saved game: {err}");
        }
        // Redraw the current view now; a deferred pass would only repeat it.
        let ctx = self.view_context();
        match self.view_bounds {
            Some(bounds) => {
                self.pending_pass.cancel();
                self.viewport.reconcile(&bounds, &self.state.world, &ctx);
            }
            None => {
                self.viewport.refresh_all(&self.state.world, &ctx);
            }
        }
        log::info!("world reset");
        self.notices.push(Notice::WorldReset);
    }

    fn persist(&mut self) {
        let blob = SaveBlob::from_parts(
            self.state.world.overlay(),
            self.state.held,
            self.state.player,
            self.state.mode,
        );
        if let Err(err) = persistence::save_blob(self.store.as_mut(), &blob) {
            log::error!("failed to save game: {err}");
        }
    }
}
