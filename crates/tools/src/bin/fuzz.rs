use anyhow::{Result, bail};
use cellcraft_core::{
    CellCoord, Command, Direction, Game, GameConfig, LatLng, MemoryStore, Outcome, Scene,
    format_snapshot_hash,
};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 10_000)]
    actions: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} actions...", args.seed, args.actions);
    let config = GameConfig {
        seed: args.seed as u32,
        cell_size_deg: 1.0,
        start: LatLng::new(0.5, 0.5),
        ..GameConfig::default()
    };
    let radius = config.interact_radius;
    let mut game = Game::new(config, Box::new(MemoryStore::new()), Scene::new(), None);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let directions = [Direction::North, Direction::South, Direction::East, Direction::West];
    let mut crafted = 0u32;

    for action in 0..args.actions {
        if rng.next_u64() % 4 == 0 {
            game.dispatch(Command::Step(choose(&mut rng, &directions)));
            continue;
        }

        let player = game.player_cell();
        let reach = radius as i32 + 2;
        let span = 2 * reach as u64 + 1;
        let target = CellCoord::new(
            player.i + (rng.next_u64() % span) as i32 - reach,
            player.j + (rng.next_u64() % span) as i32 - reach,
        );
        let held = game.held();
        let cell = game.world().get_cell_value(target);
        let Some(outcome) = game.dispatch(Command::CellClicked(target)) else {
            bail!("action {action}: click produced no outcome");
        };

        if player.chebyshev(target) > radius {
            if !matches!(outcome, Outcome::TooFar { .. }) {
                bail!("action {action}: click at distance {} was accepted", player.chebyshev(target));
            }
            if game.held() != held || game.world().get_cell_value(target) != cell {
                bail!("action {action}: out-of-range click changed state");
            }
            continue;
        }

        // The hand and the clicked cell never both hold a token after a move.
        if matches!(outcome, Outcome::PickedUp(_) | Outcome::Placed(_))
            && game.held().is_some()
            && game.world().get_cell_value(target).is_some()
        {
            bail!("action {action}: token duplicated between hand and {target}");
        }

        if let Outcome::Crafted { value, .. } = outcome {
            crafted += 1;
            let doubled = held.and_then(|token| token.doubled());
            if Some(value) != doubled || game.world().get_cell_value(target) != Some(value) {
                bail!("action {action}: crafting {held:?} with {cell:?} produced {value}");
            }
            if game.held().is_some() {
                bail!("action {action}: hand not emptied by crafting");
            }
        }
    }

    println!(
        "Fuzz completed cleanly. {} changed cells, {crafted} crafts, snapshot {}",
        game.world().overlay().len(),
        format_snapshot_hash(game.world().snapshot_hash())
    );
    Ok(())
}
