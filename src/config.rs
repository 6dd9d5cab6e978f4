//! Runtime tunables loaded from `assets/game.toml`.
//!
//! Every field defaults to the matching constant in the crate root, so the
//! file only needs the keys being tuned. A missing file is normal; a file that
//! fails to parse or validate is reported and the defaults stay in place.

use crate::error::{ConfigError, ConfigResult};
use crate::level::course_length;
use crate::{
    BLOCK_SPACING, CAMERA_OFFSET, CAMERA_SMOOTHING, CAMERA_TARGET_OFFSET, DEFAULT_BLOCKS_COUNT,
    DEFAULT_POSITION, FALL_THRESHOLD, FINISH_MARGIN, GROUND_PROBE_MAX_TOI, GROUND_PROBE_OFFSET,
    GROUND_THRESHOLD, IMPULSE_STRENGTH, JUMP_IMPULSE, TORQUE_STRENGTH,
};
use bevy::prelude::*;
use serde::Deserialize;
use std::io;
use std::path::Path;

pub const CONFIG_PATH: &str = "assets/game.toml";

#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // level
    pub blocks_count: u32,

    // marble
    pub impulse_strength: f32,
    pub torque_strength: f32,
    pub jump_impulse: f32,
    pub ground_probe_offset: f32,
    pub ground_probe_max_toi: f32,
    pub ground_threshold: f32,
    pub spawn_position: [f32; 3],

    // camera
    pub camera_smoothing: f32,
    pub camera_offset: [f32; 3],
    pub camera_target_offset: [f32; 3],

    // progress
    pub fall_threshold: f32,
    pub finish_margin: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            blocks_count: DEFAULT_BLOCKS_COUNT,
            impulse_strength: IMPULSE_STRENGTH,
            torque_strength: TORQUE_STRENGTH,
            jump_impulse: JUMP_IMPULSE,
            ground_probe_offset: GROUND_PROBE_OFFSET,
            ground_probe_max_toi: GROUND_PROBE_MAX_TOI,
            ground_threshold: GROUND_THRESHOLD,
            spawn_position: DEFAULT_POSITION.to_array(),
            camera_smoothing: CAMERA_SMOOTHING,
            camera_offset: CAMERA_OFFSET.to_array(),
            camera_target_offset: CAMERA_TARGET_OFFSET.to_array(),
            fall_threshold: FALL_THRESHOLD,
            finish_margin: FINISH_MARGIN,
        }
    }
}

impl GameConfig {
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        course_length(self.blocks_count)?;

        let positive = [
            ("impulse_strength", self.impulse_strength),
            ("torque_strength", self.torque_strength),
            ("jump_impulse", self.jump_impulse),
            ("ground_probe_max_toi", self.ground_probe_max_toi),
            ("ground_threshold", self.ground_threshold),
            ("camera_smoothing", self.camera_smoothing),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    name,
                    value,
                    expected: "> 0",
                });
            }
        }

        Ok(())
    }

    pub fn spawn_position(&self) -> Vec3 {
        Vec3::from_array(self.spawn_position)
    }

    pub fn camera_offset(&self) -> Vec3 {
        Vec3::from_array(self.camera_offset)
    }

    pub fn camera_target_offset(&self) -> Vec3 {
        Vec3::from_array(self.camera_target_offset)
    }

    /// The marble has finished once its z is below this.
    pub fn finish_line(&self, blocks_count: u32) -> f32 {
        -(blocks_count as f32 * BLOCK_SPACING + self.finish_margin)
    }
}

/// Read and validate a config file. `None` only when the file does not exist.
pub fn load_config_file(path: impl AsRef<Path>) -> Option<ConfigResult<GameConfig>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Some(GameConfig::from_toml(&contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => Some(Err(e.into())),
    }
}

pub fn load_game_config(mut config: ResMut<GameConfig>) {
    match load_config_file(CONFIG_PATH) {
        Some(Ok(loaded)) => {
            *config = loaded;
            info!("Loaded game config from {CONFIG_PATH}");
        }
        Some(Err(e)) => warn!("Failed to load {CONFIG_PATH}: {e}; using defaults"),
        None => debug!("No {CONFIG_PATH} found; using compiled defaults"),
    }
}
