use serde::{Deserialize, Serialize};

use crate::game::Position;

/// Per-tile walkability class, as published to the pathfinder and the
/// debug overlay (the discriminant is the overlay wire value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum CollisionType {
    NonWalkable = 0,
    Walkable = 1,
    LowPriority = 2,
    Monster = 3,
    Object = 4,
    TeleportOver = 5,
    Thickened = 6,
    DiagonalTile = 7,
}

/// Circle in world coordinates inside which the dilation pass is skipped,
/// preserving narrow quest paths (e.g. around the Inifuss tree).
#[derive(Debug, Clone, Copy)]
pub struct ExclusionZone {
    pub center: Position,
    pub radius: i32,
}

impl ExclusionZone {
    fn contains(&self, p: Position) -> bool {
        let dx = (p.x - self.center.x) as i64;
        let dy = (p.y - self.center.y) as i64;
        dx * dx + dy * dy <= (self.radius as i64) * (self.radius as i64)
    }
}

/// True when `tile` cannot be stepped on by the current traveler.
///
/// TeleportOver and Thickened stop a walker but not a teleporter;
/// DiagonalTile is never blocking here (the pathfinder restricts it to
/// diagonal moves instead).
pub fn is_blocking(tile: CollisionType, can_teleport: bool) -> bool {
    match tile {
        CollisionType::NonWalkable | CollisionType::Object | CollisionType::Monster => true,
        CollisionType::TeleportOver | CollisionType::Thickened => !can_teleport,
        _ => false,
    }
}

fn base_walkable(tile: CollisionType) -> bool {
    matches!(tile, CollisionType::Walkable | CollisionType::LowPriority)
}

pub fn is_walkable_type(tile: CollisionType) -> bool {
    matches!(
        tile,
        CollisionType::Walkable | CollisionType::LowPriority | CollisionType::DiagonalTile
    )
}

/// Navigable collision grid for one area.
///
/// Rows are indexed `cells[y][x]`; every row has length `width`. Once
/// published a grid is read-only; `copy()` produces a mutable clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub offset_x: i32,
    pub offset_y: i32,
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Vec<CollisionType>>,
}

impl Grid {
    /// Run the full processing pipeline over a raw collision matrix:
    ///
    /// 1. thicken obstacles (skipping exclusion zones)
    /// 2. fill 1-2 tile gaps
    /// 3. mark diagonal squeeze tiles
    /// 4. drill known exits back open
    /// 5. demote tiles hugging obstacles to low priority
    pub fn new(
        mut raw: Vec<Vec<CollisionType>>,
        offset_x: i32,
        offset_y: i32,
        can_teleport: bool,
        exits: &[Position],
        exclusions: &[ExclusionZone],
    ) -> Grid {
        thicken_collisions(&mut raw, can_teleport, offset_x, offset_y, exclusions);
        fill_gaps(&mut raw, can_teleport);
        mark_diagonal_tiles(&mut raw);
        drill_exits(&mut raw, offset_x, offset_y, exits);
        apply_low_priority_halo(&mut raw, can_teleport);

        Grid::from_processed(raw, offset_x, offset_y)
    }

    /// Wrap an already-processed matrix without re-running the pipeline.
    /// Used when reusing a cached grid.
    pub fn from_processed(cells: Vec<Vec<CollisionType>>, offset_x: i32, offset_y: i32) -> Grid {
        Grid {
            offset_x,
            offset_y,
            width: cells.first().map_or(0, Vec::len),
            height: cells.len(),
            cells,
        }
    }

    /// Translate a world position into grid-relative coordinates.
    pub fn relative(&self, p: Position) -> Position {
        Position {
            x: p.x - self.offset_x,
            y: p.y - self.offset_y,
        }
    }

    pub fn cell_at(&self, relative: Position) -> Option<CollisionType> {
        if relative.x < 0 || relative.y < 0 {
            return None;
        }
        self.cells
            .get(relative.y as usize)
            .and_then(|row| row.get(relative.x as usize))
            .copied()
    }

    /// Whether the world position lands on a traversable tile.
    pub fn is_walkable(&self, p: Position) -> bool {
        self.cell_at(self.relative(p)).is_some_and(is_walkable_type)
    }

    pub fn copy(&self) -> Grid {
        self.clone()
    }
}

fn in_bounds(grid: &[Vec<CollisionType>], x: i32, y: i32) -> bool {
    y >= 0 && (y as usize) < grid.len() && x >= 0 && (x as usize) < grid[y as usize].len()
}

/// Dilation pass: every walkable tile orthogonally adjacent to a blocking
/// tile becomes Thickened, except inside an exclusion zone.
fn thicken_collisions(
    grid: &mut [Vec<CollisionType>],
    can_teleport: bool,
    offset_x: i32,
    offset_y: i32,
    exclusions: &[ExclusionZone],
) {
    let mut buffer: Vec<Vec<bool>> = grid.iter().map(|row| vec![false; row.len()]).collect();

    for y in 0..grid.len() {
        for x in 0..grid[y].len() {
            if !is_blocking(grid[y][x], can_teleport) {
                continue;
            }
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if !in_bounds(grid, nx, ny) {
                    continue;
                }
                let world = Position {
                    x: nx + offset_x,
                    y: ny + offset_y,
                };
                if exclusions.iter().any(|z| z.contains(world)) {
                    continue;
                }
                if base_walkable(grid[ny as usize][nx as usize]) {
                    buffer[ny as usize][nx as usize] = true;
                }
            }
        }
    }

    for (y, row) in buffer.iter().enumerate() {
        for (x, &mark) in row.iter().enumerate() {
            if mark {
                grid[y][x] = CollisionType::Thickened;
            }
        }
    }
}

const GAP_SIZE: i32 = 3;

/// Longest run of consecutive blocking tiles along one axis of the window
/// centered on (x, y). `step` is the axis unit vector.
fn longest_blocking_run(
    grid: &[Vec<CollisionType>],
    x: i32,
    y: i32,
    step: (i32, i32),
    can_teleport: bool,
) -> i32 {
    let mut longest = 0;
    let mut run = 0;
    for i in -(GAP_SIZE + 1)..=(GAP_SIZE + 1) {
        let cx = x + step.0 * i;
        let cy = y + step.1 * i;
        if !in_bounds(grid, cx, cy) {
            continue;
        }
        if is_blocking(grid[cy as usize][cx as usize], can_teleport) {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}

fn is_gap(grid: &[Vec<CollisionType>], x: i32, y: i32, can_teleport: bool) -> bool {
    if !is_blocking(grid[y as usize][x as usize], can_teleport) {
        return false;
    }

    longest_blocking_run(grid, x, y, (1, 0), can_teleport) < GAP_SIZE
        && longest_blocking_run(grid, x, y, (0, 1), can_teleport) < GAP_SIZE
}

/// Close 1-2 tile holes the planner would otherwise squeeze through.
fn fill_gaps(grid: &mut [Vec<CollisionType>], can_teleport: bool) {
    for y in 0..grid.len() {
        for x in 0..grid[y].len() {
            if is_gap(grid, x as i32, y as i32, can_teleport) {
                grid[y][x] = CollisionType::Thickened;
            }
        }
    }
}

/// Mark tiles that only touch walkable space diagonally so pathing can
/// slide through tight corners created by thickened tiles.
fn mark_diagonal_tiles(grid: &mut [Vec<CollisionType>]) {
    if grid.is_empty() {
        return;
    }

    let mut to_diagonal: Vec<Vec<bool>> = grid.iter().map(|row| vec![false; row.len()]).collect();

    for y in 0..grid.len().saturating_sub(1) {
        let w = grid[y].len().min(grid[y + 1].len());
        for x in 0..w.saturating_sub(1) {
            let a = grid[y][x];
            let b = grid[y][x + 1];
            let c = grid[y + 1][x];
            let d = grid[y + 1][x + 1];

            if base_walkable(a)
                && base_walkable(d)
                && b == CollisionType::Thickened
                && c == CollisionType::Thickened
            {
                to_diagonal[y][x + 1] = true;
                to_diagonal[y + 1][x] = true;
            }

            if base_walkable(b)
                && base_walkable(c)
                && a == CollisionType::Thickened
                && d == CollisionType::Thickened
            {
                to_diagonal[y][x] = true;
                to_diagonal[y + 1][x + 1] = true;
            }
        }
    }

    for (y, row) in to_diagonal.iter().enumerate() {
        for (x, &mark) in row.iter().enumerate() {
            if mark {
                grid[y][x] = CollisionType::DiagonalTile;
            }
        }
    }
}

fn set_walkable(grid: &mut [Vec<CollisionType>], x: i32, y: i32) {
    if in_bounds(grid, x, y) {
        grid[y as usize][x as usize] = CollisionType::Walkable;
    }
}

fn has_walkable_neighbor(grid: &[Vec<CollisionType>], x: i32, y: i32) -> bool {
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            if in_bounds(grid, x + dx, y + dy)
                && is_walkable_type(grid[(y + dy) as usize][(x + dx) as usize])
            {
                return true;
            }
        }
    }
    false
}

/// Reopen one exit tile the dilation pass may have walled off. An isolated
/// exit also gets its 4-neighbors opened and any Thickened tile inside the
/// corner-less 5x5 box demoted back to walkable.
fn drill_exit(grid: &mut [Vec<CollisionType>], x: i32, y: i32) {
    set_walkable(grid, x, y);

    if has_walkable_neighbor(grid, x, y) {
        return;
    }

    for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
        set_walkable(grid, x + dx, y + dy);
    }

    for dx in -2i32..=2 {
        for dy in -2i32..=2 {
            if (dx.abs() > 1 && dy.abs() > 1) || (dx == 0 && dy == 0) {
                continue;
            }
            if in_bounds(grid, x + dx, y + dy)
                && grid[(y + dy) as usize][(x + dx) as usize] == CollisionType::Thickened
            {
                grid[(y + dy) as usize][(x + dx) as usize] = CollisionType::Walkable;
            }
        }
    }
}

fn drill_exits(grid: &mut [Vec<CollisionType>], offset_x: i32, offset_y: i32, exits: &[Position]) {
    for exit in exits {
        let x = exit.x - offset_x;
        let y = exit.y - offset_y;
        if in_bounds(grid, x, y) {
            drill_exit(grid, x, y);
        }
    }
}

/// Demote walkable tiles within Chebyshev distance 2 of any blocking tile
/// so the planner prefers open ground.
fn apply_low_priority_halo(grid: &mut [Vec<CollisionType>], can_teleport: bool) {
    let mut halo: Vec<Vec<bool>> = grid.iter().map(|row| vec![false; row.len()]).collect();

    for y in 0..grid.len() {
        for x in 0..grid[y].len() {
            if !is_blocking(grid[y][x], can_teleport) {
                continue;
            }
            for dy in -2i32..=2 {
                for dx in -2i32..=2 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = x as i32 + dx;
                    let ny = y as i32 + dy;
                    if in_bounds(grid, nx, ny)
                        && grid[ny as usize][nx as usize] == CollisionType::Walkable
                    {
                        halo[ny as usize][nx as usize] = true;
                    }
                }
            }
        }
    }

    for (y, row) in halo.iter().enumerate() {
        for (x, &mark) in row.iter().enumerate() {
            if mark {
                grid[y][x] = CollisionType::LowPriority;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CollisionType::*;

    fn grid_of(rows: &[&[CollisionType]]) -> Vec<Vec<CollisionType>> {
        rows.iter().map(|r| r.to_vec()).collect()
    }

    #[test]
    fn is_blocking_truth_table() {
        assert!(!is_blocking(TeleportOver, true));
        assert!(is_blocking(TeleportOver, false));
        assert!(!is_blocking(DiagonalTile, true));
        assert!(!is_blocking(DiagonalTile, false));
        assert!(is_blocking(NonWalkable, true));
        assert!(is_blocking(Object, true));
        assert!(is_blocking(Monster, true));
        assert!(is_blocking(Thickened, false));
        assert!(!is_blocking(Thickened, true));
        assert!(!is_blocking(Walkable, false));
        assert!(!is_blocking(LowPriority, false));
    }

    #[test]
    fn gap_fill_closes_isolated_blockers() {
        // W W B W W W B W W — both blockers sit in runs shorter than 3 on
        // row and column, so both become Thickened.
        let mut g = grid_of(&[&[
            Walkable, Walkable, NonWalkable, Walkable, Walkable, Walkable, NonWalkable, Walkable,
            Walkable,
        ]]);
        fill_gaps(&mut g, false);

        assert_eq!(g[0][2], Thickened);
        assert_eq!(g[0][6], Thickened);
        for x in [0, 1, 3, 4, 5, 7, 8] {
            assert_eq!(g[0][x], Walkable, "tile {x} must be untouched");
        }
    }

    #[test]
    fn gap_fill_keeps_solid_walls() {
        // A 1-thick horizontal wall of length 5: every tile is part of a
        // run >= 3 along the row, so nothing is reclassified.
        let mut g = grid_of(&[
            &[Walkable; 7],
            &[
                Walkable, NonWalkable, NonWalkable, NonWalkable, NonWalkable, NonWalkable, Walkable,
            ],
            &[Walkable; 7],
        ]);
        let before = g.clone();
        fill_gaps(&mut g, false);
        assert_eq!(g, before);
    }

    #[test]
    fn gap_detection_terminates_at_edges() {
        let mut g = grid_of(&[&[NonWalkable, Walkable], &[Walkable, Walkable]]);
        fill_gaps(&mut g, false);
        assert_eq!(g[0][0], Thickened);
    }

    #[test]
    fn diagonal_squeeze_is_marked() {
        let mut g = grid_of(&[&[Walkable, Thickened], &[Thickened, Walkable]]);
        mark_diagonal_tiles(&mut g);
        assert_eq!(g[0][0], Walkable);
        assert_eq!(g[0][1], DiagonalTile);
        assert_eq!(g[1][0], DiagonalTile);
        assert_eq!(g[1][1], Walkable);

        let mut g = grid_of(&[&[Thickened, Walkable], &[Walkable, Thickened]]);
        mark_diagonal_tiles(&mut g);
        assert_eq!(g[0][0], DiagonalTile);
        assert_eq!(g[1][1], DiagonalTile);
    }

    #[test]
    fn diagonal_pass_never_touches_walkable_tiles() {
        let mut g = grid_of(&[
            &[Walkable, Thickened, Walkable],
            &[Thickened, Walkable, Thickened],
            &[Walkable, Thickened, Walkable],
        ]);
        mark_diagonal_tiles(&mut g);
        for y in 0..3 {
            for x in 0..3 {
                if (x + y) % 2 == 0 {
                    assert_eq!(g[y][x], Walkable);
                }
            }
        }
    }

    #[test]
    fn low_priority_halo_radius_two() {
        let mut g = vec![vec![Walkable; 11]; 11];
        g[5][5] = NonWalkable;
        apply_low_priority_halo(&mut g, false);

        for y in 0..11i32 {
            for x in 0..11i32 {
                let chebyshev = (x - 5).abs().max((y - 5).abs());
                let cell = g[y as usize][x as usize];
                if x == 5 && y == 5 {
                    assert_eq!(cell, NonWalkable);
                } else if chebyshev <= 2 {
                    assert_eq!(cell, LowPriority, "({x},{y}) should be demoted");
                } else {
                    assert_eq!(cell, Walkable, "({x},{y}) should be untouched");
                }
            }
        }
    }

    #[test]
    fn drill_exit_reopens_a_walled_exit() {
        let mut g = vec![vec![Thickened; 5]; 5];
        drill_exit(&mut g, 2, 2);

        assert_eq!(g[2][2], Walkable);
        assert_eq!(g[2][1], Walkable);
        assert_eq!(g[2][3], Walkable);
        assert_eq!(g[1][2], Walkable);
        assert_eq!(g[3][2], Walkable);
        // Corner-less 5x5 demotion reaches (0, 2) but not the corner (0, 0).
        assert_eq!(g[0][2], Walkable);
        assert_eq!(g[0][0], Thickened);
        assert_eq!(g[4][4], Thickened);
    }

    #[test]
    fn drill_exit_at_grid_corner_stays_in_bounds() {
        let mut g = vec![vec![NonWalkable; 3]; 3];
        drill_exits(&mut g, 10, 10, &[Position { x: 10, y: 10 }, Position { x: 99, y: 99 }]);
        assert_eq!(g[0][0], Walkable);
    }

    #[test]
    fn drilled_exits_have_a_walkable_neighbor() {
        let mut g = vec![vec![Thickened; 7]; 7];
        drill_exits(&mut g, 0, 0, &[Position { x: 3, y: 3 }]);
        assert!(has_walkable_neighbor(&g, 3, 3));
    }

    #[test]
    fn pipeline_produces_rectangular_grid() {
        let raw = vec![vec![Walkable; 8]; 6];
        let grid = Grid::new(raw, 100, 200, false, &[], &[]);
        assert_eq!(grid.width, 8);
        assert_eq!(grid.height, 6);
        assert!(grid.cells.iter().all(|row| row.len() == grid.width));
    }

    #[test]
    fn exclusion_zone_skips_dilation() {
        let mut raw = vec![vec![Walkable; 9]; 9];
        raw[4][4] = NonWalkable;
        let zone = ExclusionZone {
            center: Position { x: 4, y: 4 },
            radius: 10,
        };
        thicken_collisions(&mut raw, false, 0, 0, &[zone]);
        assert_eq!(raw[4][3], Walkable);
        assert_eq!(raw[3][4], Walkable);

        let mut raw = vec![vec![Walkable; 9]; 9];
        raw[4][4] = NonWalkable;
        thicken_collisions(&mut raw, false, 0, 0, &[]);
        assert_eq!(raw[4][3], Thickened);
        assert_eq!(raw[3][4], Thickened);
    }

    #[test]
    fn from_processed_does_not_reprocess() {
        let mut raw = vec![vec![Walkable; 6]; 6];
        raw[2][2] = NonWalkable;
        let grid = Grid::new(raw, 7, 9, false, &[], &[]);

        let copy = Grid::from_processed(grid.cells.clone(), grid.offset_x, grid.offset_y);
        assert_eq!(copy, grid);
    }

    #[test]
    fn world_walkability_respects_offsets() {
        let grid = Grid::from_processed(vec![vec![Walkable; 4]; 4], 100, 50);
        assert!(grid.is_walkable(Position { x: 101, y: 51 }));
        assert!(!grid.is_walkable(Position { x: 99, y: 51 }));
        assert!(!grid.is_walkable(Position { x: 104, y: 51 }));
    }
}
