//! One stride of movement: click toward a path node, then verify the
//! avatar actually went somewhere.

use std::collections::VecDeque;

use crate::context::{sleep_ms, Ctx};
use crate::errors::{NavError, NavResult};
use crate::game::{MonsterFilter, MouseButton, Position};
use crate::pathing::distance;

/// Default termination radius of a movement call.
pub const DISTANCE_TO_FINISH_MOVING: i32 = 3;

/// Hostiles closer than this to the stride target block a walking step.
const MONSTER_BLOCK_RADIUS: i32 = 4;

/// Options accepted by the movement loop.
#[derive(Default, Clone)]
pub struct MoveOpts {
    pub distance_to_finish: Option<i32>,
    pub clear_path_override: Option<i32>,
    pub ignore_monsters: bool,
    pub ignore_items: bool,
    pub monster_filters: Vec<MonsterFilter>,
}

impl MoveOpts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_distance_to_finish(mut self, distance: i32) -> Self {
        self.distance_to_finish = Some(distance);
        self
    }

    /// Force a clearing radius even when teleporting.
    pub fn with_clear_path_override(mut self, distance: i32) -> Self {
        self.clear_path_override = Some(distance);
        self
    }

    pub fn ignoring_monsters(mut self) -> Self {
        self.ignore_monsters = true;
        self
    }

    pub fn ignoring_items(mut self) -> Self {
        self.ignore_items = true;
        self
    }

    pub fn with_monster_filter(mut self, filter: MonsterFilter) -> Self {
        self.monster_filters.push(filter);
        self
    }
}

/// Per-movement-call stride state: a short position history for stuck and
/// round-trip detection.
pub struct Stepper {
    history: VecDeque<Position>,
    no_progress: u32,
}

impl Default for Stepper {
    fn default() -> Self {
        Self::new()
    }
}

impl Stepper {
    pub fn new() -> Self {
        Self {
            history: VecDeque::with_capacity(6),
            no_progress: 0,
        }
    }

    /// Issue one stride toward `to` and verify progress.
    ///
    /// Errors follow the recovery contract of the movement loop:
    /// `MonstersInPath` when walking into hostiles, `PlayerStuck` after two
    /// strides without movement, `PlayerRoundTrip` when oscillating between
    /// two spots, `NoPath` when the node is not traversable at all.
    pub fn step(&mut self, ctx: &mut Ctx, to: Position, ignore_monsters: bool) -> NavResult<()> {
        let walking = !ctx.data.can_teleport();

        if walking {
            if let Some(grid) = ctx.data.area_data.grid.as_deref() {
                if !grid.is_walkable(to) {
                    return Err(NavError::NoPath {
                        area: ctx.data.player.area.name(),
                        target: to,
                    });
                }
            }

            if !ignore_monsters {
                let blocked = ctx
                    .data
                    .enemies()
                    .any(|m| distance(m.position, to) <= MONSTER_BLOCK_RADIUS);
                if blocked {
                    return Err(NavError::MonstersInPath);
                }
            }
        }

        let before = ctx.data.player.position;
        let (sx, sy) = ctx.pathfinder.game_coords_to_screen(&ctx.data, to.x, to.y);
        ctx.hid.click(MouseButton::Left, sx, sy);

        let stride = distance(before, to).clamp(1, 10) as u64;
        sleep_ms(100 + stride * 40 + ctx.data.ping as u64 / 2);
        ctx.refresh_game_data();

        let after = ctx.data.player.position;
        self.history.push_back(after);
        if self.history.len() > 6 {
            self.history.pop_front();
        }

        if after == before {
            self.no_progress += 1;
            if self.no_progress >= 2 {
                self.no_progress = 0;
                return Err(NavError::PlayerStuck);
            }
            return Ok(());
        }
        self.no_progress = 0;

        // A position we already occupied two strides ago means we are
        // bouncing between the same two tiles.
        let revisits = self
            .history
            .iter()
            .rev()
            .skip(1)
            .filter(|&&p| p == after)
            .count();
        if revisits >= 2 {
            self.history.clear();
            return Err(NavError::PlayerRoundTrip);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::testkit::{FakeWorld, TestCtx};
    use crate::game::area::Area;
    use crate::game::grid::CollisionType;
    use crate::game::{Monster, MonsterKind};

    #[test]
    fn stuck_after_two_motionless_strides() {
        let world = FakeWorld::walkable_field(Area::BloodMoor, 20, 20);
        let mut ctx = TestCtx::new(world).ctx;
        let mut stepper = Stepper::new();

        // The fake world never moves the player unless told to.
        assert!(stepper
            .step(&mut ctx, Position::new(5, 5), false)
            .is_ok());
        let err = stepper
            .step(&mut ctx, Position::new(5, 5), false)
            .unwrap_err();
        assert!(matches!(err, NavError::PlayerStuck));
    }

    #[test]
    fn round_trip_is_detected() {
        let world = FakeWorld::walkable_field(Area::BloodMoor, 20, 20);
        world.script_positions(&[
            Position::new(1, 0),
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(0, 0),
        ]);
        let mut ctx = TestCtx::new(world).ctx;
        let mut stepper = Stepper::new();

        let mut saw_round_trip = false;
        for _ in 0..6 {
            match stepper.step(&mut ctx, Position::new(5, 5), false) {
                Err(NavError::PlayerRoundTrip) => {
                    saw_round_trip = true;
                    break;
                }
                Err(other) => panic!("unexpected error: {other}"),
                Ok(()) => {}
            }
        }
        assert!(saw_round_trip);
    }

    #[test]
    fn monsters_block_a_walking_stride() {
        let world = FakeWorld::walkable_field(Area::BloodMoor, 20, 20);
        world.mutate(|data| {
            data.monsters.push(Monster {
                id: 9,
                position: Position::new(5, 5),
                kind: MonsterKind::Regular,
                hostile: true,
            })
        });
        let mut ctx = TestCtx::new(world).ctx;
        let mut stepper = Stepper::new();

        let err = stepper
            .step(&mut ctx, Position::new(5, 6), false)
            .unwrap_err();
        assert!(matches!(err, NavError::MonstersInPath));

        // The same stride is fine when monsters are ignored.
        assert!(stepper.step(&mut ctx, Position::new(5, 6), true).is_ok());
    }

    #[test]
    fn unwalkable_node_is_no_path() {
        let world = FakeWorld::walkable_field(Area::BloodMoor, 20, 20);
        world.mutate(|data| {
            let mut cells = vec![vec![CollisionType::Walkable; 20]; 20];
            cells[5][5] = CollisionType::NonWalkable;
            world_replace_grid(data, cells);
        });
        let mut ctx = TestCtx::new(world).ctx;
        let mut stepper = Stepper::new();

        let err = stepper
            .step(&mut ctx, Position::new(5, 5), false)
            .unwrap_err();
        assert!(matches!(err, NavError::NoPath { .. }));
    }

    fn world_replace_grid(data: &mut crate::game::Data, cells: Vec<Vec<CollisionType>>) {
        data.area_data.grid = Some(std::sync::Arc::new(
            crate::game::grid::Grid::from_processed(cells, 0, 0),
        ));
    }
}
