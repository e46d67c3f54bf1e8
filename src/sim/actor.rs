//! The player-controlled tank and its projectiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::normalize_input;
use crate::tuning::Tuning;

/// A projectile fired by the actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Fixed at creation
    pub direction: Vec2,
    pub speed: f32,
    pub half_extent: f32,
    /// Blasts neighboring blocks on impact
    pub enhanced: bool,
    marked_for_removal: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, direction: Vec2, speed: f32, half_extent: f32, enhanced: bool) -> Self {
        Self {
            pos,
            direction,
            speed,
            half_extent,
            enhanced,
            marked_for_removal: false,
        }
    }

    /// Move one frame along the firing direction
    pub fn advance(&mut self) {
        self.pos += self.direction * self.speed;
    }

    pub fn hitbox(&self) -> Rect {
        Rect::centered(self.pos, Vec2::splat(self.half_extent))
    }

    pub fn mark_for_removal(&mut self) {
        self.marked_for_removal = true;
    }

    pub fn is_marked_for_removal(&self) -> bool {
        self.marked_for_removal
    }

    /// Center has left the play field
    pub fn is_out_of(&self, field: &Rect) -> bool {
        self.pos.x < field.left()
            || self.pos.x > field.right()
            || self.pos.y < field.top()
            || self.pos.y > field.bottom()
    }
}

/// Result of a movement attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// No input this frame
    Idle,
    Moved,
    /// Candidate position collided; the actor still turned to face the input
    Blocked,
}

/// The player's tank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pos: Vec2,
    half_extent: Vec2,
    speed: f32,
    /// Last nonzero movement input
    facing: Vec2,
    fire_cooldown: f32,
    fire_cooldown_remaining: f32,
    /// Once set, stays set for the rest of the level
    enhanced: bool,
    projectile_speed: f32,
    projectile_half_extent: f32,
    play_field: Rect,
    projectiles: Vec<Projectile>,
}

impl Actor {
    /// Spawn facing up at `pos`, confined to `play_field`
    pub fn spawn(pos: Vec2, play_field: Rect, tuning: &Tuning) -> Self {
        Self {
            pos,
            half_extent: Vec2::splat(tuning.actor_half_extent),
            speed: tuning.actor_speed,
            facing: Vec2::new(0.0, -1.0),
            fire_cooldown: tuning.fire_cooldown,
            fire_cooldown_remaining: 0.0,
            enhanced: false,
            projectile_speed: tuning.projectile_speed,
            projectile_half_extent: tuning.projectile_half_extent,
            play_field,
            projectiles: Vec::new(),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn half_extent(&self) -> Vec2 {
        self.half_extent
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn facing(&self) -> Vec2 {
        self.facing
    }

    pub fn is_enhanced(&self) -> bool {
        self.enhanced
    }

    pub fn fire_cooldown_remaining(&self) -> f32 {
        self.fire_cooldown_remaining
    }

    pub fn play_field(&self) -> &Rect {
        &self.play_field
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn projectiles_mut(&mut self) -> &mut [Projectile] {
        &mut self.projectiles
    }

    /// Hitbox at the current position
    pub fn rect(&self) -> Rect {
        self.rect_at(self.pos)
    }

    /// Hitbox the actor would have at `pos`
    pub fn rect_at(&self, pos: Vec2) -> Rect {
        Rect::centered(pos, self.half_extent)
    }

    /// Try to move by one frame of `input`.
    ///
    /// `blocked` answers whether a hitbox would collide with an obstacle. The
    /// move is all-or-nothing, but facing follows any nonzero input even when
    /// the move is rejected.
    pub fn validate_and_move(&mut self, input: Vec2, blocked: impl Fn(&Rect) -> bool) -> MoveOutcome {
        let dir = normalize_input(input);
        if dir == Vec2::ZERO {
            return MoveOutcome::Idle;
        }
        self.facing = dir;

        let candidate = self.pos + dir * self.speed;
        if blocked(&self.rect_at(candidate)) {
            MoveOutcome::Blocked
        } else {
            self.pos = candidate;
            MoveOutcome::Moved
        }
    }

    /// Fire along the current facing if the cooldown has elapsed
    pub fn fire(&mut self) -> bool {
        if self.fire_cooldown_remaining > 0.0 {
            return false;
        }
        self.projectiles.push(Projectile::new(
            self.pos,
            self.facing,
            self.projectile_speed,
            self.projectile_half_extent,
            self.enhanced,
        ));
        self.fire_cooldown_remaining = self.fire_cooldown;
        true
    }

    /// Run the cooldown down, move projectiles, drop spent ones (order kept)
    pub fn tick(&mut self, dt: f32) {
        if self.fire_cooldown_remaining > 0.0 {
            self.fire_cooldown_remaining -= dt;
        }

        for projectile in &mut self.projectiles {
            projectile.advance();
        }
        let field = self.play_field;
        self.projectiles
            .retain(|p| !p.is_marked_for_removal() && !p.is_out_of(&field));
    }

    /// Enable blast projectiles for the rest of the level
    pub fn grant_power_up(&mut self) {
        if !self.enhanced {
            log::debug!("Power-up granted");
        }
        self.enhanced = true;
    }
}
