//! World and rule parameters, loadable from TOML.
//! Defaults reproduce the reference world: same seed, lattice, radii and spawn odds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{LatLng, Token};

pub const DEFAULT_SEED: u32 = 12_125;
pub const DEFAULT_CELL_SIZE_DEG: f64 = 0.0001;
pub const DEFAULT_START: LatLng = LatLng::new(36.9916, -122.0583);
pub const DEFAULT_INTERACT_RADIUS: u32 = 3;
pub const DEFAULT_LABEL_RADIUS: u32 = 8;
pub const DEFAULT_MAX_MATERIALIZED_CELLS: usize = 40_000;

/// One band of the value draw: draws below `below` yield `value`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnBucket {
    pub below: f64,
    pub value: u32,
}

/// Fixed cumulative thresholds used to turn hashes into base tokens.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTable {
    /// Presence draws below this leave the cell empty.
    pub empty_below: f64,
    pub buckets: Vec<SpawnBucket>,
}

impl Default for SpawnTable {
    fn default() -> Self {
        Self {
            empty_below: 0.45,
            buckets: vec![
                SpawnBucket { below: 0.60, value: 1 },
                SpawnBucket { below: 0.85, value: 2 },
                SpawnBucket { below: 0.95, value: 4 },
                SpawnBucket { below: 0.99, value: 8 },
                SpawnBucket { below: 1.0, value: 16 },
            ],
        }
    }
}

impl SpawnTable {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.empty_below) {
            return Err(ConfigError::Invalid(format!(
                "spawn_table.empty_below must lie in [0, 1], got {}",
                self.empty_below
            )));
        }
        if self.buckets.is_empty() {
            return Err(ConfigError::Invalid("spawn_table.buckets must not be empty".to_string()));
        }
        let mut previous = 0.0_f64;
        for bucket in &self.buckets {
            if !(bucket.below > previous && bucket.below <= 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "spawn_table bucket thresholds must increase within (0, 1], got {}",
                    bucket.below
                )));
            }
            if Token::new(bucket.value).is_none() {
                return Err(ConfigError::Invalid("spawn_table bucket values must be positive".to_string()));
            }
            previous = bucket.below;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub seed: u32,
    pub cell_size_deg: f64,
    /// Lattice origin; cell `(0, 0)` has its south-west corner here.
    pub origin: LatLng,
    pub start: LatLng,
    pub interact_radius: u32,
    pub label_radius: u32,
    /// Crafting into one of these values signals victory.
    pub victory_values: Vec<u32>,
    pub spawn_table: SpawnTable,
    pub max_materialized_cells: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            cell_size_deg: DEFAULT_CELL_SIZE_DEG,
            origin: LatLng::new(0.0, 0.0),
            start: DEFAULT_START,
            interact_radius: DEFAULT_INTERACT_RADIUS,
            label_radius: DEFAULT_LABEL_RADIUS,
            victory_values: vec![8, 16],
            spawn_table: SpawnTable::default(),
            max_materialized_cells: DEFAULT_MAX_MATERIALIZED_CELLS,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cell_size_deg.is_finite() && self.cell_size_deg > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "cell_size_deg must be positive and finite, got {}",
                self.cell_size_deg
            )));
        }
        for point in [self.origin, self.start] {
            if !(point.lat.is_finite() && point.lng.is_finite()) {
                return Err(ConfigError::Invalid("origin and start must be finite".to_string()));
            }
        }
        self.spawn_table.validate()
    }

    pub fn is_victory(&self, token: Token) -> bool {
        self.victory_values.contains(&token.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = GameConfig::from_toml_str("").expect("empty config should parse");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config = GameConfig::from_toml_str(
            "seed = 7\ninteract_radius = 5\n[start]\nlat = 1.5\nlng = -2.5\n",
        )
        .expect("partial config should parse");
        assert_eq!(config.seed, 7);
        assert_eq!(config.interact_radius, 5);
        assert_eq!(config.start, LatLng::new(1.5, -2.5));
        assert_eq!(config.label_radius, DEFAULT_LABEL_RADIUS);
        assert_eq!(config.spawn_table, SpawnTable::default());
    }

    #[test]
    fn non_positive_cell_size_is_rejected() {
        let err = GameConfig::from_toml_str("cell_size_deg = 0.0").expect_err("zero cell size");
        assert!(err.to_string().contains("cell_size_deg"), "unexpected error: {err}");
    }

    #[test]
    fn unordered_spawn_thresholds_are_rejected() {
        let raw = "[spawn_table]\nempty_below = 0.5\nbuckets = [{ below = 0.9, value = 1 }, { below = 0.4, value = 2 }]\n";
        assert!(GameConfig::from_toml_str(raw).is_err());
    }

    #[test]
    fn malformed_toml_reports_parse_error() {
        let err = GameConfig::from_toml_str("seed = [").expect_err("broken toml");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn victory_values_match_tokens() {
        let config = GameConfig::default();
        assert!(config.is_victory(Token::new(8).expect("token")));
        assert!(config.is_victory(Token::new(16).expect("token")));
        assert!(!config.is_victory(Token::new(4).expect("token")));
    }
}
