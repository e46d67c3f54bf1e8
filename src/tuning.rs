//! Game balance tuning
//!
//! Every gameplay constant can be overridden from a JSON document. Missing
//! fields keep their defaults, so a tuning file only lists what it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Failure to read or accept a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tuning json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value: {0}")]
    Invalid(&'static str),
}

/// Gameplay constants for one level session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Grid ===
    pub grid_width: usize,
    pub grid_height: usize,
    pub tile_size: f32,

    // === Actor ===
    pub actor_half_extent: f32,
    pub actor_speed: f32,
    pub fire_cooldown: f32,

    // === Projectiles ===
    pub projectile_speed: f32,
    pub projectile_half_extent: f32,

    // === Destruction ===
    pub destruction_duration: f32,
    pub jitter_amplitude: f32,
    pub jitter_frequency: f32,

    // === Level ===
    pub exit_half_size: f32,
    /// Seconds before the level times out (0 disables the limit)
    pub level_time_limit: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            tile_size: TILE_SIZE,

            actor_half_extent: ACTOR_HALF_EXTENT,
            actor_speed: ACTOR_SPEED,
            fire_cooldown: FIRE_COOLDOWN,

            projectile_speed: PROJECTILE_SPEED,
            projectile_half_extent: PROJECTILE_HALF_EXTENT,

            destruction_duration: DESTRUCTION_DURATION,
            jitter_amplitude: JITTER_AMPLITUDE,
            jitter_frequency: JITTER_FREQUENCY,

            exit_half_size: EXIT_HALF_SIZE,
            level_time_limit: LEVEL_TIME_LIMIT,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a tuning file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load a tuning file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.grid_width < 3 || self.grid_height < 3 {
            return Err(TuningError::Invalid("grid must be at least 3x3"));
        }
        if self.tile_size <= 0.0 {
            return Err(TuningError::Invalid("tile_size must be positive"));
        }
        if self.actor_half_extent <= 0.0 || self.projectile_half_extent <= 0.0 {
            return Err(TuningError::Invalid("half extents must be positive"));
        }
        if self.actor_speed < 0.0 || self.projectile_speed < 0.0 {
            return Err(TuningError::Invalid("speeds must not be negative"));
        }
        if self.fire_cooldown < 0.0 {
            return Err(TuningError::Invalid("fire_cooldown must not be negative"));
        }
        if self.destruction_duration <= 0.0 {
            return Err(TuningError::Invalid("destruction_duration must be positive"));
        }
        if self.exit_half_size <= 0.0 {
            return Err(TuningError::Invalid("exit_half_size must be positive"));
        }
        if self.level_time_limit < 0.0 {
            return Err(TuningError::Invalid("level_time_limit must not be negative"));
        }
        Ok(())
    }

    /// Width and height of the whole play field
    pub fn field_size(&self) -> (f32, f32) {
        (
            self.grid_width as f32 * self.tile_size,
            self.grid_height as f32 * self.tile_size,
        )
    }
}
