//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame time only (no clock reads)
//! - Stable row-major scan order over the grid
//! - No rendering or platform dependencies

pub mod actor;
pub mod collision;
pub mod grid;
pub mod rect;
pub mod session;
pub mod tile;

pub use actor::{Actor, MoveOutcome, Projectile};
pub use collision::{HitReport, TileStrike};
pub use grid::{Grid, LayoutVariant, LevelId, classify_cell};
pub use rect::Rect;
pub use session::{FrameInput, LevelEvent, LevelOutcome, LevelSession};
pub use tile::{DestructionTiming, Tile, TileKind, TilePhase};
