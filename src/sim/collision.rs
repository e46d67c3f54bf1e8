//! Projectile-versus-grid resolution
//!
//! Scan order is row-major. Within a row the first tile that stops the
//! projectile ends that row's scan, but later rows are still examined, so a
//! hitbox straddling two rows can strike one tile in each on the same frame.

use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::rect::Rect;
use super::tile::TileKind;

/// One tile a projectile struck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileStrike {
    pub row: usize,
    pub col: usize,
    pub kind: TileKind,
    /// The struck tile began its destruction animation on this strike
    pub started: bool,
    /// A power-up tile was consumed (caller grants the power-up)
    pub pickup_consumed: bool,
    /// Neighbors caught in an enhanced blast that began animating
    pub blasted: Vec<(usize, usize)>,
}

/// Result of resolving one projectile against the grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HitReport {
    /// The projectile hit something and must be removed
    pub stopped: bool,
    pub strikes: Vec<TileStrike>,
}

impl HitReport {
    pub fn miss() -> Self {
        Self::default()
    }

    pub fn pickup_consumed(&self) -> bool {
        self.strikes.iter().any(|s| s.pickup_consumed)
    }
}

impl Grid {
    /// Resolve a projectile hitbox against every live tile
    pub fn resolve_projectile_hit(&mut self, hitbox: &Rect, enhanced: bool) -> HitReport {
        let mut report = HitReport::miss();

        for row in 0..self.height() {
            for col in 0..self.width() {
                let Some(tile) = self.tile(row, col) else {
                    continue;
                };
                if !tile.is_live() || !tile.bounds().intersects(hitbox) {
                    continue;
                }

                let kind = tile.kind;
                if kind == TileKind::Solid {
                    report.stopped = true;
                    report.strikes.push(TileStrike {
                        row,
                        col,
                        kind,
                        started: false,
                        pickup_consumed: false,
                        blasted: Vec::new(),
                    });
                    break;
                }
                if !kind.stops_projectiles() {
                    continue;
                }

                let started = self.trigger_destruction(row, col);
                let pickup_consumed = started && kind == TileKind::Pickup;
                if pickup_consumed {
                    log::debug!("Pickup at ({}, {}) consumed", row, col);
                }
                let blasted = if enhanced {
                    self.blast_neighbors(row, col)
                } else {
                    Vec::new()
                };

                report.stopped = true;
                report.strikes.push(TileStrike {
                    row,
                    col,
                    kind,
                    started,
                    pickup_consumed,
                    blasted,
                });
                break;
            }
        }

        report
    }

    /// Start destruction on the 8 cells around (row, col).
    ///
    /// Only destructible blocks and barrels are affected; walls never are.
    /// Cells outside the grid are skipped.
    fn blast_neighbors(&mut self, row: usize, col: usize) -> Vec<(usize, usize)> {
        let mut started = Vec::new();
        for dy in -1isize..=1 {
            for dx in -1isize..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (Some(ny), Some(nx)) = (row.checked_add_signed(dy), col.checked_add_signed(dx))
                else {
                    continue;
                };
                let is_target = self
                    .tile(ny, nx)
                    .is_some_and(|t| t.kind.is_blast_target());
                if is_target && self.trigger_destruction(ny, nx) {
                    started.push((ny, nx));
                }
            }
        }
        started
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tile::TilePhase;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use TileKind::*;

    /// 5x5 arena with a walled border and the given 3x3 interior
    fn arena(interior: [[TileKind; 3]; 3]) -> Grid {
        let mut kinds = vec![vec![Solid; 5]; 5];
        for (y, row) in interior.iter().enumerate() {
            for (x, kind) in row.iter().enumerate() {
                kinds[y + 1][x + 1] = *kind;
            }
        }
        Grid::from_kinds(kinds, &Tuning::default())
    }

    fn hitbox_at(row: usize, col: usize) -> Rect {
        Rect::centered(
            Vec2::new(col as f32 * 40.0 + 20.0, row as f32 * 40.0 + 20.0),
            Vec2::splat(4.0),
        )
    }

    fn phase(grid: &Grid, row: usize, col: usize) -> TilePhase {
        grid.tile(row, col).map(|t| t.phase()).unwrap_or(TilePhase::Idle)
    }

    #[test]
    fn test_plain_hit_starts_only_target() {
        let mut grid = arena([
            [Destructible, Destructible, Destructible],
            [Destructible, Destructible, Hazard],
            [Destructible, Destructible, Destructible],
        ]);
        let report = grid.resolve_projectile_hit(&hitbox_at(2, 2), false);
        assert!(report.stopped);
        assert_eq!(report.strikes.len(), 1);
        assert!(report.strikes[0].started);
        assert!(report.strikes[0].blasted.is_empty());
        assert_eq!(grid.animating_count(), 1);
        assert_eq!(phase(&grid, 2, 2), TilePhase::Animating);
    }

    #[test]
    fn test_enhanced_hit_blasts_neighbors_not_walls() {
        let mut grid = arena([
            [Destructible, Solid, Hazard],
            [Empty, Destructible, Pickup],
            [Destructible, Destructible, Solid],
        ]);
        let report = grid.resolve_projectile_hit(&hitbox_at(2, 2), true);
        assert!(report.stopped);
        let blasted = &report.strikes[0].blasted;
        assert_eq!(blasted.len(), 4);
        assert!(blasted.contains(&(1, 1)));
        assert!(blasted.contains(&(1, 3)));
        assert!(blasted.contains(&(3, 1)));
        assert!(blasted.contains(&(3, 2)));

        // Walls, empty cells and pickups are untouched
        assert_eq!(phase(&grid, 1, 2), TilePhase::Idle);
        assert_eq!(phase(&grid, 3, 3), TilePhase::Idle);
        assert_eq!(phase(&grid, 2, 3), TilePhase::Idle);
        assert_eq!(phase(&grid, 0, 0), TilePhase::Idle);
    }

    #[test]
    fn test_enhanced_blast_at_edge_is_bounds_checked() {
        let mut grid = Grid::from_kinds(
            vec![vec![Destructible, Destructible], vec![Destructible, Empty]],
            &Tuning::default(),
        );
        let report = grid.resolve_projectile_hit(&hitbox_at(0, 0), true);
        assert!(report.stopped);
        assert_eq!(report.strikes[0].blasted.len(), 2);
        assert_eq!(grid.animating_count(), 3);
    }

    #[test]
    fn test_wall_stops_without_damage() {
        let mut grid = arena([[Empty; 3]; 3]);
        let report = grid.resolve_projectile_hit(&hitbox_at(0, 2), true);
        assert!(report.stopped);
        assert_eq!(report.strikes[0].kind, Solid);
        assert!(!report.strikes[0].started);
        assert_eq!(grid.animating_count(), 0);
    }

    #[test]
    fn test_empty_and_markers_pass_through() {
        let mut grid = arena([
            [SpawnMarker, Empty, Empty],
            [Empty, Empty, Empty],
            [Empty, Empty, ExitMarker],
        ]);
        for (row, col) in [(1, 1), (2, 2), (3, 3)] {
            let report = grid.resolve_projectile_hit(&hitbox_at(row, col), true);
            assert_eq!(report, HitReport::miss());
        }
    }

    #[test]
    fn test_pickup_consumed_once() {
        let mut grid = arena([[Empty, Empty, Empty], [Empty, Pickup, Empty], [Empty; 3]]);
        let first = grid.resolve_projectile_hit(&hitbox_at(2, 2), false);
        assert!(first.stopped);
        assert!(first.pickup_consumed());

        // Still shaking: stops a second projectile but grants nothing
        let second = grid.resolve_projectile_hit(&hitbox_at(2, 2), false);
        assert!(second.stopped);
        assert!(!second.pickup_consumed());
        assert!(!second.strikes[0].started);
    }

    #[test]
    fn test_barrel_hit_directly() {
        let mut grid = arena([[Empty; 3], [Empty, Hazard, Empty], [Empty; 3]]);
        let report = grid.resolve_projectile_hit(&hitbox_at(2, 2), false);
        assert!(report.stopped);
        assert!(report.strikes[0].started);
        grid.advance_animations(0.3);
        assert_eq!(phase(&grid, 2, 2), TilePhase::Destroyed);
    }

    #[test]
    fn test_destroyed_tiles_are_ignored() {
        let mut grid = arena([[Empty; 3], [Empty, Destructible, Empty], [Empty; 3]]);
        grid.resolve_projectile_hit(&hitbox_at(2, 2), false);
        grid.advance_animations(1.0);
        let report = grid.resolve_projectile_hit(&hitbox_at(2, 2), false);
        assert_eq!(report, HitReport::miss());
    }

    #[test]
    fn test_first_match_per_row_scan_continues_to_next_row() {
        let mut grid = arena([
            [Empty, Destructible, Destructible],
            [Empty, Destructible, Destructible],
            [Empty; 3],
        ]);
        // Straddles the corner of cells (1,2), (1,3), (2,2), (2,3)
        let hitbox = Rect::centered(Vec2::new(120.0, 80.0), Vec2::splat(4.0));
        let report = grid.resolve_projectile_hit(&hitbox, false);
        assert!(report.stopped);
        let cells: Vec<_> = report.strikes.iter().map(|s| (s.row, s.col)).collect();
        assert_eq!(cells, vec![(1, 2), (2, 2)]);
        assert_eq!(phase(&grid, 1, 3), TilePhase::Idle);
        assert_eq!(phase(&grid, 2, 3), TilePhase::Idle);
    }
}
