use std::{fs, path::Path};

use serde::Deserialize;

use crate::error::ConfigError;

/// Tunables for dungeon generation and play. Every field has a default, so a
/// config file only needs the keys it overrides.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    pub map_width: i32,
    pub map_height: i32,
    pub max_rooms: usize,
    pub min_room_size: i32,
    pub max_room_size: i32,
    pub max_monsters_per_room: usize,
    pub max_items_per_room: usize,
    pub fov_radius: i32,
    pub inventory_capacity: usize,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_width: 80,
            map_height: 43,
            max_rooms: 30,
            min_room_size: 6,
            max_room_size: 10,
            max_monsters_per_room: 2,
            max_items_per_room: 2,
            fov_radius: 8,
            inventory_capacity: 26,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Rooms need a wall ring plus at least one interior tile.
        if self.min_room_size < 3 {
            return Err(ConfigError::Invalid(format!(
                "min_room_size must be at least 3, got {}",
                self.min_room_size
            )));
        }
        if self.min_room_size > self.max_room_size {
            return Err(ConfigError::Invalid(format!(
                "min_room_size {} exceeds max_room_size {}",
                self.min_room_size, self.max_room_size
            )));
        }
        if self.max_room_size + 1 > self.map_width || self.max_room_size + 1 > self.map_height {
            return Err(ConfigError::Invalid(format!(
                "max_room_size {} does not fit a {}x{} map",
                self.max_room_size, self.map_width, self.map_height
            )));
        }
        if self.inventory_capacity == 0 || self.inventory_capacity > 26 {
            return Err(ConfigError::Invalid(format!(
                "inventory_capacity must be within 1..=26, got {}",
                self.inventory_capacity
            )));
        }
        if self.fov_radius < 1 {
            return Err(ConfigError::Invalid("fov_radius must be positive".to_string()));
        }
        Ok(())
    }
}
