use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cellcraft_core::game::held_label;
use cellcraft_core::persistence::{self, SAVE_KEY, SaveState};
use cellcraft_core::{
    CellCoord, CellRect, GameConfig, KeyValueStore, Lattice, MemoryStore, World, format_snapshot_hash,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML game config; defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    tool: Tool,
}

#[derive(Subcommand)]
enum Tool {
    /// Print the cells around a center cell, north at the top
    Map {
        #[arg(short, default_value_t = 0, allow_hyphen_values = true)]
        i: i32,
        #[arg(short, default_value_t = 0, allow_hyphen_values = true)]
        j: i32,
        #[arg(short, long, default_value_t = 6)]
        radius: u32,
        /// Overrides the configured world seed
        #[arg(long)]
        seed: Option<u32>,
        /// Save file whose changes are applied on top of the generated world
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Summarize a save file
    Inspect { save: PathBuf },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    match args.tool {
        Tool::Map { i, j, radius, seed, save } => {
            let mut world = World::new(seed.unwrap_or(config.seed), config.spawn_table.clone());
            let mut marker = None;
            if let Some(path) = save {
                let state = read_save(&path)?;
                marker = Some(Lattice::from_config(&config).cell_of(state.player));
                world.replace_overlay(state.overlay);
            }
            let radius = i32::try_from(radius).context("radius is too large")?;
            print!("{}", render_map(&world, map_rect(CellCoord::new(i, j), radius), marker));
        }
        Tool::Inspect { save } => {
            let state = read_save(&save)?;
            print!("{}", summarize(&state, &config));
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    GameConfig::from_toml_str(&raw).with_context(|| format!("Invalid config: {}", path.display()))
}

fn read_save(path: &Path) -> Result<SaveState> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read save file: {}", path.display()))?;
    let mut store = MemoryStore::new();
    store.set(SAVE_KEY, &raw)?;
    persistence::try_load(&store)
        .with_context(|| format!("Failed to parse save file: {}", path.display()))?
        .with_context(|| format!("Save file has no usable player position: {}", path.display()))
}

/// Square window around `center`, clipped at the edges of the lattice.
fn map_rect(center: CellCoord, radius: i32) -> CellRect {
    CellRect {
        i_min: center.i.saturating_sub(radius),
        i_max: center.i.saturating_add(radius),
        j_min: center.j.saturating_sub(radius),
        j_max: center.j.saturating_add(radius),
    }
}

/// One row per `i`, highest first. `.` is empty; `[n]` marks the player's cell.
fn render_map(world: &World, rect: CellRect, player: Option<CellCoord>) -> String {
    let mut out = String::new();
    for i in (rect.i_min..=rect.i_max).rev() {
        let _ = write!(out, "{i:>6} ");
        for j in rect.j_min..=rect.j_max {
            let coord = CellCoord::new(i, j);
            let text = world.get_cell_value(coord).map_or(".".to_string(), |token| token.to_string());
            if Some(coord) == player {
                let _ = write!(out, "[{text:>2}]");
            } else {
                let _ = write!(out, " {text:>2} ");
            }
        }
        out.push('\n');
    }
    out
}

fn summarize(state: &SaveState, config: &GameConfig) -> String {
    let emptied = state.overlay.entries().filter(|(_, value)| value.is_none()).count();
    let mut world = World::new(config.seed, config.spawn_table.clone());
    world.replace_overlay(state.overlay.clone());

    let mut out = String::new();
    let _ = writeln!(out, "Changed cells: {} ({emptied} emptied)", state.overlay.len());
    let _ = writeln!(out, "{}", held_label(state.held));
    let _ = writeln!(out, "Position: {}, {}", state.player.lat, state.player.lng);
    let _ = writeln!(out, "Cell: {}", Lattice::from_config(config).cell_of(state.player));
    let _ = writeln!(out, "Movement: {:?}", state.mode);
    let _ = writeln!(out, "Snapshot Hash: {}", format_snapshot_hash(world.snapshot_hash()));
    out
}
