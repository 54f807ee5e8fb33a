//! Command-line launch options: `--seed`, `--config` and `--feed`.
//! Each accepts `--flag value` or `--flag=value` and may appear once.

use std::fs;
use std::path::{Path, PathBuf};

use cellcraft_core::GameConfig;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LaunchArgs {
    pub seed: Option<u32>,
    pub config: Option<PathBuf>,
    pub feed: Option<PathBuf>,
}

impl LaunchArgs {
    /// Builds the session config: file (or defaults), then the `--seed` override.
    pub fn game_config(&self) -> Result<GameConfig, String> {
        let mut config = match &self.config {
            Some(path) => load_config_file(path)?,
            None => GameConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        Ok(config)
    }
}

pub fn load_config_file(path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("cannot read config '{}': {err}", path.display()))?;
    GameConfig::from_toml_str(&raw).map_err(|err| format!("config '{}': {err}", path.display()))
}

pub fn parse_launch_args(args: &[String]) -> Result<LaunchArgs, String> {
    let mut parsed = LaunchArgs::default();
    let mut index = 1usize;

    while index < args.len() {
        let argument = args[index].as_str();
        let (flag, value) = match argument.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, value),
            _ if is_known_flag(argument) => {
                let Some(value) = args.get(index + 1) else {
                    return Err(format!("missing value for {argument}"));
                };
                index += 1;
                (argument, value.as_str())
            }
            _ => {
                index += 1;
                continue;
            }
        };
        index += 1;

        match flag {
            "--seed" => set_once(&mut parsed.seed, parse_seed_value(value)?, flag)?,
            "--config" => set_once(&mut parsed.config, PathBuf::from(value), flag)?,
            "--feed" => set_once(&mut parsed.feed, PathBuf::from(value), flag)?,
            _ => {}
        }
    }

    Ok(parsed)
}

fn is_known_flag(argument: &str) -> bool {
    matches!(argument, "--seed" | "--config" | "--feed")
}

fn set_once<T>(slot: &mut Option<T>, value: T, flag: &str) -> Result<(), String> {
    if slot.is_some() {
        return Err(format!("{flag} provided more than once"));
    }
    *slot = Some(value);
    Ok(())
}

fn parse_seed_value(raw_value: &str) -> Result<u32, String> {
    raw_value.parse::<u32>().map_err(|_| format!("seed value '{raw_value}' must be a number"))
}
