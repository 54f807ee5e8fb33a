pub mod app_loop;
pub mod feed_file;
pub mod game_layout;
pub mod launch;
pub mod map_camera;
pub mod save_path;
pub mod ui_text;

pub const APP_NAME: &str = "Cellcraft";
