mod frame_input;
mod ui_render;
mod window_config;

use std::env;
use std::process;

use cellcraft_app::app_loop::{AppState, PointerTracker};
use cellcraft_app::feed_file::{DEFAULT_FEED_INTERVAL, open_replay_feed};
use cellcraft_app::game_layout::{compute_frame_layout, setup_layout};
use cellcraft_app::launch::parse_launch_args;
use cellcraft_app::save_path::{default_save_dir, open_store};
use cellcraft_core::{Game, PositionSource, Scene};
use macroquad::prelude::{next_frame, screen_height, screen_width};
use taffy::TaffyTree;

use crate::frame_input::capture_frame_input;
use crate::ui_render::draw_frame;
use crate::window_config::build_window_conf;

#[macroquad::main(build_window_conf)]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let launch = match parse_launch_args(&args) {
        Ok(launch) => launch,
        Err(err) => {
            eprintln!("{err}");
            process::exit(2);
        }
    };
    let config = match launch.game_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            process::exit(2);
        }
    };
    log::info!("starting with seed {}", config.seed);

    let feed = launch
        .feed
        .as_deref()
        .map(|path| Box::new(open_replay_feed(path, DEFAULT_FEED_INTERVAL)) as Box<dyn PositionSource>);
    let mut game = Game::new(config, open_store(default_save_dir()), Scene::new(), feed);
    let mut app = AppState::new(&game);
    let mut pointer = PointerTracker::default();

    let mut taffy = TaffyTree::new();
    let nodes = setup_layout(&mut taffy);

    loop {
        let layout = compute_frame_layout(&mut taffy, &nodes, screen_width(), screen_height());
        let input = capture_frame_input(&mut pointer);
        app.tick(&mut game, &input, layout.map);
        draw_frame(&game, &app, &layout);
        next_frame().await
    }
}
