//! Tile kinds and the per-tile destruction life-cycle
//!
//! A struck tile shakes for a fixed duration and then disappears:
//! `Idle -> Animating -> Destroyed`. Destroyed is terminal for the level.

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::{DESTRUCTION_DURATION, JITTER_AMPLITUDE, JITTER_FREQUENCY};

/// Tile types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Empty,
    /// Impassable, indestructible
    Solid,
    /// Blocks movement until shot away; all of them must go to clear the level
    Destructible,
    /// Explosive barrel - lethal on contact, walkable, destroyed when shot
    Hazard,
    /// Single-use power-up, granted when shot
    Pickup,
    /// Where the actor starts (walkable)
    SpawnMarker,
    /// Where the actor may leave the level (walkable)
    ExitMarker,
}

impl TileKind {
    /// Blocks actor movement while not destroyed
    pub fn is_obstacle(&self) -> bool {
        matches!(self, TileKind::Solid | TileKind::Destructible)
    }

    /// Stops a projectile that overlaps it
    pub fn stops_projectiles(&self) -> bool {
        matches!(
            self,
            TileKind::Solid | TileKind::Destructible | TileKind::Hazard | TileKind::Pickup
        )
    }

    /// Can enter the destruction animation at all
    pub fn is_destructible(&self) -> bool {
        matches!(
            self,
            TileKind::Destructible | TileKind::Hazard | TileKind::Pickup
        )
    }

    /// Caught by the blast of an enhanced projectile
    pub fn is_blast_target(&self) -> bool {
        matches!(self, TileKind::Destructible | TileKind::Hazard)
    }

    /// Sprite identifier for the asset layer, `None` means nothing is drawn
    pub fn sprite_name(&self) -> Option<&'static str> {
        match self {
            TileKind::Solid => Some("wall"),
            TileKind::Destructible => Some("destructible"),
            TileKind::Hazard => Some("barrel"),
            TileKind::Pickup => Some("powerup"),
            TileKind::ExitMarker => Some("exit"),
            TileKind::Empty | TileKind::SpawnMarker => None,
        }
    }
}

/// Timing shared by every tile's destruction animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DestructionTiming {
    /// Seconds between being struck and disappearing
    pub duration: f32,
    pub jitter_amplitude: f32,
    pub jitter_frequency: f32,
}

impl Default for DestructionTiming {
    fn default() -> Self {
        Self {
            duration: DESTRUCTION_DURATION,
            jitter_amplitude: JITTER_AMPLITUDE,
            jitter_frequency: JITTER_FREQUENCY,
        }
    }
}

impl DestructionTiming {
    /// Cosmetic shake for a tile with `remaining` seconds left
    #[inline]
    pub fn jitter(&self, remaining: f32) -> f32 {
        (remaining * self.jitter_frequency).sin() * self.jitter_amplitude
    }
}

/// Where a tile is in its life-cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TilePhase {
    Idle,
    Animating,
    Destroyed,
}

/// One grid cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    /// Fixed at load time
    bounds: Rect,
    destroyed: bool,
    animating: bool,
    animation_remaining: f32,
    /// Horizontal shake while animating (render only, never collides)
    animation_offset: f32,
}

impl Tile {
    pub fn new(kind: TileKind, bounds: Rect) -> Self {
        Self {
            kind,
            bounds,
            destroyed: false,
            animating: false,
            animation_remaining: 0.0,
            animation_offset: 0.0,
        }
    }

    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn animation_remaining(&self) -> f32 {
        self.animation_remaining
    }

    pub fn animation_offset(&self) -> f32 {
        self.animation_offset
    }

    pub fn phase(&self) -> TilePhase {
        if self.destroyed {
            TilePhase::Destroyed
        } else if self.animating {
            TilePhase::Animating
        } else {
            TilePhase::Idle
        }
    }

    /// Still present for collision queries and rendering
    #[inline]
    pub fn is_live(&self) -> bool {
        !self.destroyed
    }

    /// Live tile of a kind that blocks movement
    #[inline]
    pub fn blocks_movement(&self) -> bool {
        self.is_live() && self.kind.is_obstacle()
    }

    /// Start the destruction animation.
    ///
    /// Returns `true` only on the Idle -> Animating transition; re-triggering an
    /// animating or destroyed tile, or any indestructible kind, changes nothing.
    pub fn trigger_destruction(&mut self, timing: &DestructionTiming) -> bool {
        if self.destroyed || self.animating || !self.kind.is_destructible() {
            return false;
        }
        self.animating = true;
        self.animation_remaining = timing.duration;
        self.animation_offset = timing.jitter(timing.duration);
        true
    }

    /// Advance an in-progress animation by `dt` seconds.
    ///
    /// Returns `true` if the tile became destroyed on this step.
    pub fn advance(&mut self, dt: f32, timing: &DestructionTiming) -> bool {
        if !self.animating {
            return false;
        }
        self.animation_remaining -= dt;
        if self.animation_remaining <= 0.0 {
            self.destroyed = true;
            self.animating = false;
            self.animation_remaining = 0.0;
            self.animation_offset = 0.0;
            true
        } else {
            self.animation_offset = timing.jitter(self.animation_remaining);
            false
        }
    }
}
