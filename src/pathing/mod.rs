//! Tile-level shortest paths over the current area grid.

use std::sync::{Arc, Mutex};

use pathfinding::prelude::astar;
use rand::Rng;

use crate::context::InputDevice;
use crate::game::grid::{CollisionType, Grid};
use crate::game::{Data, MouseButton, Object, Position};

/// Isometric projection constants: one tile spans (2*TILE_HALF_W, 2*TILE_HALF_H)
/// pixels on screen; the player is anchored at the screen center.
const TILE_HALF_W: f32 = 19.8;
const TILE_HALF_H: f32 = 9.9;
const SCREEN_W: i32 = 1280;
const SCREEN_H: i32 = 720;

/// Margin kept when deciding whether a path node is still on screen.
const SCREEN_MARGIN: i32 = 80;

/// How far `get_path` searches for a walkable stand-in when the requested
/// goal tile itself is blocked.
const GOAL_ADJUST_RADIUS: i32 = 5;

const LOW_PRIORITY_COST: u32 = 2;
const STEP_COST: u32 = 1;

/// A computed route in grid-relative coordinates. Callers add the grid
/// offset to obtain world coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub nodes: Vec<Position>,
    /// Tile count of the route.
    pub distance: u32,
}

/// Grid path finder with a debug cache of the most recent result.
pub struct PathFinder {
    hid: Arc<dyn InputDevice>,
    last_path: Mutex<Option<Vec<Position>>>,
}

impl PathFinder {
    pub fn new(hid: Arc<dyn InputDevice>) -> Self {
        Self {
            hid,
            last_path: Mutex::new(None),
        }
    }

    /// Shortest path from the player to `to` on the current grid.
    ///
    /// DiagonalTile cells are traversable by diagonal steps only;
    /// LowPriority cells cost double; TeleportOver requires the teleport
    /// capability. A blocked goal is swapped for the nearest walkable tile
    /// within a small radius.
    pub fn get_path(&self, data: &Data, to: Position) -> Option<Path> {
        let grid = data.area_data.grid.as_deref()?;
        let can_teleport = data.can_teleport();

        let start = grid.relative(data.player.position);
        let goal = nearest_reachable_goal(grid, grid.relative(to), can_teleport)?;

        let (nodes, _cost) = astar(
            &start,
            |&node| successors(grid, node, can_teleport),
            |&node| chebyshev(node, goal) * STEP_COST,
            |&node| node == goal,
        )?;

        let world: Vec<Position> = nodes
            .iter()
            .map(|n| Position::new(n.x + grid.offset_x, n.y + grid.offset_y))
            .collect();
        *self.last_path.lock().unwrap() = Some(world);

        let distance = nodes.len() as u32;
        Some(Path { nodes, distance })
    }

    pub fn distance_from_me(&self, data: &Data, to: Position) -> i32 {
        distance(data.player.position, to)
    }

    /// Closest openable chest to `pos`, if any.
    pub fn get_closest_chest(
        &self,
        data: &Data,
        pos: Position,
        selectable_only: bool,
    ) -> Option<Object> {
        data.objects
            .iter()
            .filter(|o| o.is_chest() && (!selectable_only || o.selectable))
            .min_by_key(|o| distance(o.position, pos))
            .cloned()
    }

    /// Project world tile coordinates to screen pixels, player-centered.
    pub fn game_coords_to_screen(&self, data: &Data, x: i32, y: i32) -> (i32, i32) {
        let dx = (x - data.player.position.x) as f32;
        let dy = (y - data.player.position.y) as f32;
        let screen_x = SCREEN_W as f32 / 2.0 + (dx - dy) * TILE_HALF_W;
        let screen_y = SCREEN_H as f32 / 2.0 + (dx + dy) * TILE_HALF_H;
        (screen_x as i32, screen_y as i32)
    }

    /// Index of the last consecutive path node still visible on screen;
    /// bounds the step length while teleporting.
    pub fn last_path_index_on_screen(
        &self,
        data: &Data,
        path: &[Position],
        offset: (i32, i32),
    ) -> usize {
        let mut last = 0;
        for (i, node) in path.iter().enumerate() {
            let (sx, sy) = self.game_coords_to_screen(data, node.x + offset.0, node.y + offset.1);
            let on_screen = sx > SCREEN_MARGIN
                && sx < SCREEN_W - SCREEN_MARGIN
                && sy > SCREEN_MARGIN
                && sy < SCREEN_H - SCREEN_MARGIN;
            if !on_screen {
                break;
            }
            last = i;
        }
        last
    }

    /// Most recent computed path in world coordinates, for the overlay.
    pub fn last_path_debug(&self) -> Option<Vec<Position>> {
        self.last_path.lock().unwrap().clone()
    }

    /// Short randomized nudge used for stuck recovery.
    pub fn random_movement(&self, _data: &Data) {
        let mut rng = rand::thread_rng();
        let x = SCREEN_W / 2 + rng.gen_range(-300..=300);
        let y = SCREEN_H / 2 + rng.gen_range(-150..=150);
        self.hid.click(MouseButton::Left, x, y);
    }
}

/// Euclidean tile distance, truncated to an integer.
pub fn distance(a: Position, b: Position) -> i32 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    (dx * dx + dy * dy).sqrt() as i32
}

fn chebyshev(a: Position, b: Position) -> u32 {
    (a.x - b.x).abs().max((a.y - b.y).abs()) as u32
}

fn passable(cell: CollisionType, diagonal: bool, can_teleport: bool) -> bool {
    match cell {
        CollisionType::Walkable | CollisionType::LowPriority => true,
        CollisionType::TeleportOver => can_teleport,
        CollisionType::DiagonalTile => diagonal,
        _ => false,
    }
}

fn step_cost(cell: CollisionType) -> u32 {
    if cell == CollisionType::LowPriority {
        LOW_PRIORITY_COST
    } else {
        STEP_COST
    }
}

fn successors(grid: &Grid, node: Position, can_teleport: bool) -> Vec<(Position, u32)> {
    // A node standing on a diagonal squeeze tile may only continue
    // diagonally; stepping off it orthogonally would clip the corner.
    let on_diagonal = grid.cell_at(node) == Some(CollisionType::DiagonalTile);

    let mut out = Vec::with_capacity(8);
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let diagonal = dx != 0 && dy != 0;
            if on_diagonal && !diagonal {
                continue;
            }
            let next = Position::new(node.x + dx, node.y + dy);
            let Some(cell) = grid.cell_at(next) else {
                continue;
            };
            if passable(cell, diagonal, can_teleport) {
                out.push((next, step_cost(cell)));
            }
        }
    }
    out
}

/// Clamp the goal into grid bounds and, if the tile is blocked, pick the
/// nearest traversable tile within `GOAL_ADJUST_RADIUS`.
fn nearest_reachable_goal(grid: &Grid, goal: Position, can_teleport: bool) -> Option<Position> {
    if grid.width == 0 || grid.height == 0 {
        return None;
    }
    let clamped = Position::new(
        goal.x.clamp(0, grid.width as i32 - 1),
        goal.y.clamp(0, grid.height as i32 - 1),
    );

    let standable = |p: Position| {
        grid.cell_at(p)
            .is_some_and(|c| passable(c, true, can_teleport))
    };

    if standable(clamped) {
        return Some(clamped);
    }

    for r in 1..=GOAL_ADJUST_RADIUS {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx.abs().max(dy.abs()) != r {
                    continue;
                }
                let candidate = Position::new(clamped.x + dx, clamped.y + dy);
                if standable(candidate) {
                    return Some(candidate);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{AreaData, ObjectName};
    use crate::game::area::Area;
    use CollisionType::*;

    struct NullHid;

    impl InputDevice for NullHid {
        fn click(&self, _button: MouseButton, _x: i32, _y: i32) {}
        fn move_pointer(&self, _x: i32, _y: i32) {}
        fn key_press(&self, _key: crate::game::Key) {}
    }

    fn finder() -> PathFinder {
        PathFinder::new(Arc::new(NullHid))
    }

    fn data_with_grid(cells: Vec<Vec<CollisionType>>, player: Position) -> Data {
        let grid = Grid::from_processed(cells, 0, 0);
        let mut data = Data::default();
        data.player.area = Area::BloodMoor;
        data.player.position = player;
        data.area_data = AreaData {
            area: Some(Area::BloodMoor),
            offset_x: 0,
            offset_y: 0,
            grid: Some(Arc::new(grid)),
            ..AreaData::default()
        };
        data
    }

    #[test]
    fn straight_line_path() {
        let data = data_with_grid(vec![vec![Walkable; 5]; 5], Position::new(0, 0));
        let path = finder().get_path(&data, Position::new(4, 4)).unwrap();
        assert_eq!(*path.nodes.last().unwrap(), Position::new(4, 4));
        // 8-connected: the diagonal is 5 nodes including the start.
        assert_eq!(path.nodes.len(), 5);
    }

    #[test]
    fn low_priority_tiles_are_avoided() {
        let cells = vec![
            vec![Walkable, Walkable, Walkable],
            vec![Walkable, LowPriority, Walkable],
            vec![Walkable, Walkable, Walkable],
        ];
        let data = data_with_grid(cells, Position::new(0, 1));
        let path = finder().get_path(&data, Position::new(2, 1)).unwrap();
        assert!(
            !path.nodes.contains(&Position::new(1, 1)),
            "equal-length detour must win over a low-priority tile: {:?}",
            path.nodes
        );
    }

    #[test]
    fn diagonal_tile_is_a_corner_squeeze_only() {
        // The squeeze: W D / D W. The only way through is the diagonal.
        let cells = vec![
            vec![Walkable, DiagonalTile],
            vec![DiagonalTile, Walkable],
        ];
        let data = data_with_grid(cells, Position::new(0, 0));
        let path = finder().get_path(&data, Position::new(1, 1)).unwrap();
        assert_eq!(path.nodes, vec![Position::new(0, 0), Position::new(1, 1)]);

        // A diagonal tile in a single row cannot be crossed orthogonally.
        let cells = vec![vec![Walkable, DiagonalTile, Walkable]];
        let data = data_with_grid(cells, Position::new(0, 0));
        assert!(finder().get_path(&data, Position::new(2, 0)).is_none());
    }

    #[test]
    fn teleport_over_requires_capability() {
        let cells = vec![vec![Walkable, TeleportOver, Walkable]];
        let mut data = data_with_grid(cells, Position::new(0, 0));
        assert!(finder().get_path(&data, Position::new(2, 0)).is_none());

        data.can_teleport = true;
        let path = finder().get_path(&data, Position::new(2, 0)).unwrap();
        assert_eq!(path.nodes.len(), 3);
    }

    #[test]
    fn blocked_goal_is_adjusted_to_nearest_walkable() {
        let mut cells = vec![vec![Walkable; 5]; 5];
        cells[2][4] = NonWalkable;
        let data = data_with_grid(cells, Position::new(0, 2));
        let path = finder().get_path(&data, Position::new(4, 2)).unwrap();
        let end = *path.nodes.last().unwrap();
        assert!(chebyshev(end, Position::new(4, 2)) <= 1);
    }

    #[test]
    fn last_path_is_cached_for_the_overlay() {
        let data = data_with_grid(vec![vec![Walkable; 4]; 4], Position::new(0, 0));
        let pf = finder();
        assert!(pf.last_path_debug().is_none());
        pf.get_path(&data, Position::new(3, 3)).unwrap();
        let cached = pf.last_path_debug().unwrap();
        assert_eq!(cached.len(), 4);
    }

    #[test]
    fn screen_projection_is_player_centered() {
        let data = data_with_grid(vec![vec![Walkable; 4]; 4], Position::new(2, 2));
        let (sx, sy) = finder().game_coords_to_screen(&data, 2, 2);
        assert_eq!((sx, sy), (SCREEN_W / 2, SCREEN_H / 2));

        let (right, _) = finder().game_coords_to_screen(&data, 3, 2);
        assert!(right > SCREEN_W / 2);
    }

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance(Position::new(0, 0), Position::new(3, 4)), 5);
        assert_eq!(distance(Position::new(10, 10), Position::new(10, 10)), 0);
    }

    #[test]
    fn closest_chest_prefers_selectable() {
        let mut data = Data::default();
        data.objects.push(super::Object {
            id: 1,
            name: ObjectName::Chest,
            position: Position::new(5, 0),
            selectable: false,
            shrine: None,
        });
        data.objects.push(super::Object {
            id: 2,
            name: ObjectName::Chest,
            position: Position::new(9, 0),
            selectable: true,
            shrine: None,
        });

        let chest = finder()
            .get_closest_chest(&data, Position::new(0, 0), true)
            .unwrap();
        assert_eq!(chest.id, 2);

        let chest = finder()
            .get_closest_chest(&data, Position::new(0, 0), false)
            .unwrap();
        assert_eq!(chest.id, 1);
    }
}
