//! Per-frame level update
//!
//! The session owns one grid and one actor and sequences them every frame:
//! fire, move, tick projectiles, resolve hits, animate, then evaluate the
//! win/lose predicates for the surrounding game-state layer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, MoveOutcome};
use super::grid::{Grid, LevelId};
use super::rect::Rect;
use super::tile::TileKind;
use crate::tuning::Tuning;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Digital movement vector (each axis -1, 0 or 1)
    pub movement: Vec2,
    /// Fire button held this frame
    pub fire: bool,
}

/// How a level ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelOutcome {
    /// Every destructible block is gone
    Cleared,
    /// The actor reached the exit
    ReachedExit,
    /// The actor touched a barrel
    Killed,
    /// The level clock ran out
    TimedOut,
}

impl LevelOutcome {
    pub fn is_win(&self) -> bool {
        matches!(self, LevelOutcome::Cleared | LevelOutcome::ReachedExit)
    }
}

/// Things that happened during one frame (for audio/effects layers)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LevelEvent {
    ProjectileFired { enhanced: bool },
    MoveBlocked,
    TileStruck { row: usize, col: usize, kind: TileKind },
    PickupConsumed { row: usize, col: usize },
    TileDestroyed { row: usize, col: usize, kind: TileKind },
}

/// One level being played
#[derive(Debug, Clone)]
pub struct LevelSession {
    level: LevelId,
    grid: Grid,
    actor: Actor,
    /// Seconds since the level started
    elapsed: f32,
    time_limit: f32,
    frame: u64,
    outcome: Option<LevelOutcome>,
    events: Vec<LevelEvent>,
}

impl LevelSession {
    /// Load a level and spawn the actor on its spawn marker
    pub fn start(level: LevelId, tuning: &Tuning) -> Self {
        let grid = Grid::load(level, tuning);
        Self::with_grid(level, grid, tuning)
    }

    /// Play on a prepared grid
    pub fn with_grid(level: LevelId, grid: Grid, tuning: &Tuning) -> Self {
        let actor = Actor::spawn(grid.spawn_point(), grid.bounds(), tuning);
        Self {
            level,
            grid,
            actor,
            elapsed: 0.0,
            time_limit: tuning.level_time_limit,
            frame: 0,
            outcome: None,
            events: Vec::new(),
        }
    }

    pub fn level(&self) -> LevelId {
        self.level
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn actor_position(&self) -> Vec2 {
        self.actor.position()
    }

    pub fn actor_rect(&self) -> Rect {
        self.actor.rect()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Seconds left on the level clock (`None` when unlimited)
    pub fn time_remaining(&self) -> Option<f32> {
        (self.time_limit > 0.0).then(|| (self.time_limit - self.elapsed).max(0.0))
    }

    pub fn is_time_up(&self) -> bool {
        self.time_limit > 0.0 && self.elapsed >= self.time_limit
    }

    /// Events produced by the most recent update
    pub fn events(&self) -> &[LevelEvent] {
        &self.events
    }

    /// Set once the level has ended; later updates do nothing
    pub fn outcome(&self) -> Option<LevelOutcome> {
        self.outcome
    }

    pub fn are_all_destructibles_destroyed(&self) -> bool {
        self.grid.all_destructibles_cleared()
    }

    pub fn is_player_on_exit(&self) -> bool {
        self.grid.query_exit(&self.actor.rect())
    }

    pub fn is_player_dead(&self) -> bool {
        self.grid.query_hazard(&self.actor.rect())
    }

    /// All blocks cleared, or the actor is on the exit
    pub fn win_condition(&self) -> bool {
        self.are_all_destructibles_destroyed() || self.is_player_on_exit()
    }

    /// The actor is touching a barrel
    pub fn lose_condition(&self) -> bool {
        self.is_player_dead()
    }

    /// Advance the level by one frame
    pub fn update(&mut self, dt: f32, input: &FrameInput) -> &[LevelEvent] {
        self.events.clear();
        if self.outcome.is_some() {
            return &self.events;
        }
        self.frame += 1;
        self.elapsed += dt;

        if input.fire && self.actor.fire() {
            self.events.push(LevelEvent::ProjectileFired {
                enhanced: self.actor.is_enhanced(),
            });
        }

        let grid = &self.grid;
        if self.actor.validate_and_move(input.movement, |rect| grid.query_obstacle(rect))
            == MoveOutcome::Blocked
        {
            self.events.push(LevelEvent::MoveBlocked);
        }

        self.actor.tick(dt);
        self.resolve_projectiles();

        for (row, col) in self.grid.advance_animations(dt) {
            let kind = self.grid.tile(row, col).map(|t| t.kind).unwrap_or_default();
            self.events.push(LevelEvent::TileDestroyed { row, col, kind });
        }

        self.outcome = self.evaluate_outcome();
        if let Some(outcome) = self.outcome {
            log::info!(
                "Level {} ended: {:?} after {:.1}s ({} frames)",
                self.level.0,
                outcome,
                self.elapsed,
                self.frame
            );
        }

        &self.events
    }

    /// Resolve every live projectile against the grid, independently
    fn resolve_projectiles(&mut self) {
        let mut grant = false;
        for projectile in self.actor.projectiles_mut() {
            let report = self
                .grid
                .resolve_projectile_hit(&projectile.hitbox(), projectile.enhanced);
            if report.stopped {
                projectile.mark_for_removal();
            }
            for strike in report.strikes {
                self.events.push(LevelEvent::TileStruck {
                    row: strike.row,
                    col: strike.col,
                    kind: strike.kind,
                });
                if strike.pickup_consumed {
                    grant = true;
                    self.events.push(LevelEvent::PickupConsumed {
                        row: strike.row,
                        col: strike.col,
                    });
                }
            }
        }
        if grant {
            self.actor.grant_power_up();
        }
    }

    /// A death outranks a win on the same frame; a win outranks the clock
    fn evaluate_outcome(&self) -> Option<LevelOutcome> {
        if self.lose_condition() {
            Some(LevelOutcome::Killed)
        } else if self.are_all_destructibles_destroyed() {
            Some(LevelOutcome::Cleared)
        } else if self.is_player_on_exit() {
            Some(LevelOutcome::ReachedExit)
        } else if self.is_time_up() {
            Some(LevelOutcome::TimedOut)
        } else {
            None
        }
    }
}
