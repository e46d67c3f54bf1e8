//! Battle Bomber - A top-down tile arena shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tile grid, actor, projectiles, level session)
//! - `render`: Render-facing seam (sprite lookup and batching, no drawing)
//! - `tuning`: Data-driven game balance

pub mod render;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Grid dimensions in tiles
    pub const GRID_WIDTH: usize = 20;
    pub const GRID_HEIGHT: usize = 15;
    /// Edge length of a square tile (world units)
    pub const TILE_SIZE: f32 = 40.0;

    /// Actor defaults - a 30x30 tank
    pub const ACTOR_HALF_EXTENT: f32 = 15.0;
    /// Distance moved per frame of held input
    pub const ACTOR_SPEED: f32 = 3.0;
    /// Seconds between shots
    pub const FIRE_COOLDOWN: f32 = 0.5;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 5.0;
    pub const PROJECTILE_HALF_EXTENT: f32 = 4.0;

    /// Seconds a struck tile shakes before it disappears
    pub const DESTRUCTION_DURATION: f32 = 0.3;
    /// Jitter of a shaking tile (cosmetic only)
    pub const JITTER_AMPLITUDE: f32 = 2.0;
    pub const JITTER_FREQUENCY: f32 = 60.0;

    /// Exit region is the exit cell center +/- this
    pub const EXIT_HALF_SIZE: f32 = 20.0;

    /// Seconds before the level times out
    pub const LEVEL_TIME_LIMIT: f32 = 120.0;
}

/// Scale diagonal input by 1/sqrt(2) so diagonal speed matches axial speed
#[inline]
pub fn normalize_input(input: Vec2) -> Vec2 {
    if input.x != 0.0 && input.y != 0.0 {
        input * std::f32::consts::FRAC_1_SQRT_2
    } else {
        input
    }
}

/// Sprite rotation (degrees) for an axis-aligned facing, 0 = up
#[inline]
pub fn facing_rotation(facing: Vec2) -> f32 {
    if facing.x > 0.0 && facing.y == 0.0 {
        90.0
    } else if facing.x < 0.0 && facing.y == 0.0 {
        270.0
    } else if facing.y > 0.0 && facing.x == 0.0 {
        180.0
    } else if facing.y < 0.0 && facing.x == 0.0 {
        0.0
    } else {
        // Diagonals: atan2 measured from "up", clockwise
        facing.x.atan2(-facing.y).to_degrees().rem_euclid(360.0)
    }
}
