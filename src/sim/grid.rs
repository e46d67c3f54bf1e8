//! The tile grid: level layout, terrain queries and destruction animations
//!
//! The grid never moves or owns the actor. It answers questions about
//! rectangles the session hands it ("would this collide?", "is this on a
//! barrel?") and mutates its own cells in place.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::tile::{DestructionTiming, Tile, TileKind};
use crate::tuning::Tuning;

/// Cell holding the spawn marker
pub const SPAWN_CELL: (usize, usize) = (1, 1);

/// Level number as chosen by the player (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelId(pub u32);

/// Interior layout rule for destructible blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutVariant {
    /// Diagonal stripes: `(x + y) % 4 == 0`
    Diagonal,
    /// Crossing lines: `(x * y) % 5 == 0`
    Lattice,
}

impl LevelId {
    /// Odd levels use the diagonal layout, even levels the lattice
    pub fn variant(&self) -> LayoutVariant {
        if self.0 % 2 == 1 {
            LayoutVariant::Diagonal
        } else {
            LayoutVariant::Lattice
        }
    }

    /// The cell that holds this level's power-up (x, y)
    pub fn pickup_cell(&self) -> (usize, usize) {
        match self.variant() {
            LayoutVariant::Diagonal => (5, 5),
            LayoutVariant::Lattice => (15, 10),
        }
    }
}

impl LayoutVariant {
    #[inline]
    fn marks_destructible(&self, x: usize, y: usize) -> bool {
        match self {
            LayoutVariant::Diagonal => (x + y) % 4 == 0,
            LayoutVariant::Lattice => (x * y) % 5 == 0,
        }
    }
}

/// Classify one cell of a `width` x `height` level.
///
/// Border first, then the destructible rule, then barrels, then the pickup.
/// Spawn and exit markers override whatever the chain produced.
pub fn classify_cell(x: usize, y: usize, level: LevelId, width: usize, height: usize) -> TileKind {
    let kind = if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
        TileKind::Solid
    } else if level.variant().marks_destructible(x, y) {
        TileKind::Destructible
    } else if (x + y) % 7 == 0 {
        TileKind::Hazard
    } else if (x, y) == level.pickup_cell() {
        TileKind::Pickup
    } else {
        TileKind::Empty
    };

    if (x, y) == (width - 2, height - 2) {
        TileKind::ExitMarker
    } else if (x, y) == SPAWN_CELL {
        TileKind::SpawnMarker
    } else {
        kind
    }
}

/// A fixed-size grid of tiles, indexed `[row][col]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<Tile>>,
    tile_size: f32,
    spawn_point: Vec2,
    exit_point: Vec2,
    exit_half_size: f32,
    timing: DestructionTiming,
}

impl Grid {
    /// Generate the layout for a level
    pub fn load(level: LevelId, tuning: &Tuning) -> Self {
        let (width, height) = (tuning.grid_width, tuning.grid_height);
        let kinds: Vec<Vec<TileKind>> = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| classify_cell(x, y, level, width, height))
                    .collect()
            })
            .collect();
        let grid = Self::from_kinds(kinds, tuning);

        log::info!(
            "Level {}: {}x{} grid, {} destructibles",
            level.0,
            width,
            height,
            grid.remaining_destructibles()
        );
        grid
    }

    /// Build a grid from an explicit layout (rows of kinds, all the same length).
    ///
    /// Spawn and exit points come from the first marker of each kind; without
    /// one they fall back to the spawn cell and the far interior corner.
    pub fn from_kinds(kinds: Vec<Vec<TileKind>>, tuning: &Tuning) -> Self {
        let size = tuning.tile_size;
        let height = kinds.len();
        let width = kinds.first().map_or(0, Vec::len);

        let cell_center =
            |x: usize, y: usize| Vec2::new(x as f32 * size + size / 2.0, y as f32 * size + size / 2.0);
        let mut spawn_point = None;
        let mut exit_point = None;

        let rows: Vec<Vec<Tile>> = kinds
            .into_iter()
            .enumerate()
            .map(|(y, row)| {
                row.into_iter()
                    .enumerate()
                    .map(|(x, kind)| {
                        match kind {
                            TileKind::SpawnMarker if spawn_point.is_none() => {
                                spawn_point = Some(cell_center(x, y));
                            }
                            TileKind::ExitMarker if exit_point.is_none() => {
                                exit_point = Some(cell_center(x, y));
                            }
                            _ => {}
                        }
                        let bounds = Rect::new(x as f32 * size, y as f32 * size, size, size);
                        Tile::new(kind, bounds)
                    })
                    .collect()
            })
            .collect();

        Self {
            rows,
            tile_size: size,
            spawn_point: spawn_point.unwrap_or_else(|| cell_center(SPAWN_CELL.0, SPAWN_CELL.1)),
            exit_point: exit_point.unwrap_or_else(|| {
                cell_center(width.saturating_sub(2), height.saturating_sub(2))
            }),
            exit_half_size: tuning.exit_half_size,
            timing: DestructionTiming {
                duration: tuning.destruction_duration,
                jitter_amplitude: tuning.jitter_amplitude,
                jitter_frequency: tuning.jitter_frequency,
            },
        }
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn timing(&self) -> &DestructionTiming {
        &self.timing
    }

    /// The whole play field
    pub fn bounds(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.width() as f32 * self.tile_size,
            self.height() as f32 * self.tile_size,
        )
    }

    /// Center of the spawn cell
    pub fn spawn_point(&self) -> Vec2 {
        self.spawn_point
    }

    /// Center of the exit cell
    pub fn exit_point(&self) -> Vec2 {
        self.exit_point
    }

    pub fn exit_rect(&self) -> Rect {
        Rect::centered(self.exit_point, Vec2::splat(self.exit_half_size))
    }

    pub fn tile(&self, row: usize, col: usize) -> Option<&Tile> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub(crate) fn tile_mut(&mut self, row: usize, col: usize) -> Option<&mut Tile> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(col))
    }

    /// Rows in scan order
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Every tile with its (row, col), row-major
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), &Tile)> {
        self.rows.iter().enumerate().flat_map(|(row, tiles)| {
            tiles
                .iter()
                .enumerate()
                .map(move |(col, tile)| ((row, col), tile))
        })
    }

    fn live_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.rows.iter().flatten().filter(|t| t.is_live())
    }

    /// Would a body occupying `rect` overlap a wall or an intact block?
    pub fn query_obstacle(&self, rect: &Rect) -> bool {
        self.live_tiles()
            .any(|t| t.kind.is_obstacle() && t.bounds().intersects(rect))
    }

    /// Does `rect` touch a live barrel?
    pub fn query_hazard(&self, rect: &Rect) -> bool {
        self.live_tiles()
            .any(|t| t.kind == TileKind::Hazard && t.bounds().intersects(rect))
    }

    /// Does `rect` overlap the exit region?
    pub fn query_exit(&self, rect: &Rect) -> bool {
        self.exit_rect().intersects(rect)
    }

    /// Destructible blocks not yet destroyed (animating ones still count)
    pub fn remaining_destructibles(&self) -> usize {
        self.live_tiles()
            .filter(|t| t.kind == TileKind::Destructible)
            .count()
    }

    pub fn all_destructibles_cleared(&self) -> bool {
        self.remaining_destructibles() == 0
    }

    /// Tiles currently shaking
    pub fn animating_count(&self) -> usize {
        self.rows.iter().flatten().filter(|t| t.is_animating()).count()
    }

    /// Start destroying the tile at (row, col).
    ///
    /// Out-of-range cells and tiles already animating or destroyed are ignored.
    pub fn trigger_destruction(&mut self, row: usize, col: usize) -> bool {
        let timing = self.timing;
        self.tile_mut(row, col)
            .is_some_and(|t| t.trigger_destruction(&timing))
    }

    /// Advance every destruction animation by `dt` seconds.
    ///
    /// Returns the cells that became destroyed on this step.
    pub fn advance_animations(&mut self, dt: f32) -> Vec<(usize, usize)> {
        let timing = self.timing;
        let mut finished = Vec::new();
        for (row, tiles) in self.rows.iter_mut().enumerate() {
            for (col, tile) in tiles.iter_mut().enumerate() {
                if tile.advance(dt, &timing) {
                    log::debug!("Tile ({}, {}) {:?} destroyed", row, col, tile.kind);
                    finished.push((row, col));
                }
            }
        }
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(n: u32) -> Grid {
        Grid::load(LevelId(n), &Tuning::default())
    }

    fn kind_at(grid: &Grid, x: usize, y: usize) -> TileKind {
        grid.tile(y, x).map(|t| t.kind).unwrap_or_default()
    }

    #[test]
    fn test_dimensions_and_bounds() {
        let grid = level(1);
        assert_eq!(grid.width(), 20);
        assert_eq!(grid.height(), 15);
        assert_eq!(grid.bounds(), Rect::new(0.0, 0.0, 800.0, 600.0));
        assert_eq!(
            *grid.tile(2, 3).unwrap().bounds(),
            Rect::new(120.0, 80.0, 40.0, 40.0)
        );
    }

    #[test]
    fn test_border_is_solid() {
        let grid = level(2);
        for x in 0..20 {
            assert_eq!(kind_at(&grid, x, 0), TileKind::Solid);
            assert_eq!(kind_at(&grid, x, 14), TileKind::Solid);
        }
        for y in 0..15 {
            assert_eq!(kind_at(&grid, 0, y), TileKind::Solid);
            assert_eq!(kind_at(&grid, 19, y), TileKind::Solid);
        }
    }

    #[test]
    fn test_level_one_classification() {
        let grid = level(1);
        // (x + y) % 4 == 0
        assert_eq!(kind_at(&grid, 2, 2), TileKind::Destructible);
        assert_eq!(kind_at(&grid, 3, 1), TileKind::Destructible);
        // (x + y) % 7 == 0 and not destructible
        assert_eq!(kind_at(&grid, 1, 6), TileKind::Hazard);
        assert_eq!(kind_at(&grid, 3, 4), TileKind::Hazard);
        // 28 is caught by the destructible rule first
        assert_eq!(kind_at(&grid, 17, 11), TileKind::Destructible);
        assert_eq!(kind_at(&grid, 5, 5), TileKind::Pickup);
        assert_eq!(kind_at(&grid, 1, 1), TileKind::SpawnMarker);
        assert_eq!(kind_at(&grid, 18, 13), TileKind::ExitMarker);
        assert_eq!(kind_at(&grid, 2, 1), TileKind::Empty);
    }

    #[test]
    fn test_level_two_classification() {
        let grid = level(2);
        assert_eq!(kind_at(&grid, 5, 3), TileKind::Destructible);
        assert_eq!(kind_at(&grid, 7, 10), TileKind::Destructible);
        assert_eq!(kind_at(&grid, 3, 4), TileKind::Hazard);
        // Pickup cell is already claimed by the lattice rule
        assert_eq!(kind_at(&grid, 15, 10), TileKind::Destructible);
        assert!(!grid.cells().any(|(_, t)| t.kind == TileKind::Pickup));
    }

    #[test]
    fn test_markers_and_points() {
        let grid = level(1);
        assert_eq!(grid.spawn_point(), Vec2::new(60.0, 60.0));
        assert_eq!(grid.exit_point(), Vec2::new(740.0, 540.0));
        assert_eq!(grid.exit_rect(), Rect::new(720.0, 520.0, 40.0, 40.0));
    }

    #[test]
    fn test_fresh_level_has_destructibles() {
        for n in 1..=4 {
            let grid = level(n);
            assert!(grid.remaining_destructibles() > 0);
            assert!(!grid.all_destructibles_cleared());
        }
    }

    #[test]
    fn test_obstacle_query() {
        let grid = level(1);
        // Overlaps the top wall
        assert!(grid.query_obstacle(&Rect::new(45.0, 38.0, 30.0, 30.0)));
        // Inside the spawn cell only
        assert!(!grid.query_obstacle(&Rect::new(45.0, 45.0, 30.0, 30.0)));
        // Overlaps destructible (2, 2)
        assert!(grid.query_obstacle(&Rect::new(85.0, 85.0, 30.0, 30.0)));
        // Barrel at (1, 6) does not block
        assert!(!grid.query_obstacle(&Rect::new(45.0, 245.0, 30.0, 30.0)));
    }

    #[test]
    fn test_hazard_and_exit_queries() {
        let grid = level(1);
        assert!(grid.query_hazard(&Rect::new(45.0, 245.0, 30.0, 30.0)));
        assert!(!grid.query_hazard(&Rect::new(45.0, 45.0, 30.0, 30.0)));
        assert!(grid.query_exit(&Rect::new(725.0, 525.0, 30.0, 30.0)));
        assert!(!grid.query_exit(&Rect::new(45.0, 45.0, 30.0, 30.0)));
    }

    #[test]
    fn test_destroyed_tiles_leave_queries() {
        let mut grid = level(1);
        let block = Rect::new(85.0, 85.0, 30.0, 30.0);
        assert!(grid.trigger_destruction(2, 2));
        // Still blocks while shaking
        assert!(grid.query_obstacle(&block));
        let done = grid.advance_animations(0.5);
        assert_eq!(done, vec![(2, 2)]);
        assert!(!grid.query_obstacle(&block));
        assert!(grid.tile(2, 2).unwrap().is_destroyed());
        assert_eq!(grid.height(), 15);
    }

    #[test]
    fn test_out_of_range_trigger_ignored() {
        let mut grid = level(1);
        assert!(!grid.trigger_destruction(99, 0));
        assert!(!grid.trigger_destruction(0, 99));
        assert_eq!(grid.animating_count(), 0);
    }

    #[test]
    fn test_clearing_every_destructible() {
        let mut grid = level(1);
        let targets: Vec<_> = grid
            .cells()
            .filter(|(_, t)| t.kind == TileKind::Destructible)
            .map(|(cell, _)| cell)
            .collect();
        for (i, &(row, col)) in targets.iter().enumerate() {
            assert!(!grid.all_destructibles_cleared());
            grid.trigger_destruction(row, col);
            grid.advance_animations(0.31);
            assert_eq!(grid.remaining_destructibles(), targets.len() - i - 1);
        }
        assert!(grid.all_destructibles_cleared());
    }

    #[test]
    fn test_from_kinds_markers() {
        use TileKind::*;
        let grid = Grid::from_kinds(
            vec![
                vec![Solid, Solid, Solid, Solid],
                vec![Solid, Empty, SpawnMarker, Solid],
                vec![Solid, ExitMarker, Empty, Solid],
                vec![Solid, Solid, Solid, Solid],
            ],
            &Tuning::default(),
        );
        assert_eq!(grid.spawn_point(), Vec2::new(100.0, 60.0));
        assert_eq!(grid.exit_point(), Vec2::new(60.0, 100.0));
        assert!(grid.all_destructibles_cleared());
    }
}
