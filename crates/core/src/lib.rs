pub mod config;
pub mod game;
pub mod generator;
pub mod grid;
pub mod interaction;
pub mod movement;
pub mod overlay;
pub mod persistence;
pub mod scheduler;
pub mod types;
pub mod viewport;
pub mod world;

pub use config::{ConfigError, GameConfig, SpawnBucket, SpawnTable};
pub use game::{Command, Game, Notice, WorldState};
pub use grid::{CellRect, GeoBounds, Lattice};
pub use interaction::{Outcome, Transition};
pub use movement::{MovementController, PositionError, PositionSource, ScriptedFeed};
pub use overlay::MutationOverlay;
pub use persistence::{FileStore, KeyValueStore, MemoryStore, PersistenceError, SaveState};
pub use types::*;
pub use viewport::{CellRenderer, ReconcileStats, Scene, ViewContext, ViewportCellManager};
pub use world::{World, format_snapshot_hash};
