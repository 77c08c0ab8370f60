//! Entrance interaction: hover-hunt the boundary prompt with a spiral
//! pointer search until the transition registers.

use std::time::Instant;

use tracing::{debug, warn};

use crate::context::{retry_sleep, sleep_ms, Ctx};
use crate::errors::{NavError, NavResult};
use crate::game::area::Area;
use crate::game::{Level, MouseButton, ObjectName, Position};
use crate::nav::movement;
use crate::nav::step::MoveOpts;
use crate::pathing::distance;

/// Tunables of the entrance state machine. The fuzzy-match threshold
/// reconciles map-data positions with memory-object positions.
#[derive(Debug, Clone)]
pub struct EntranceOptions {
    pub match_threshold: i32,
    pub max_attempts: u32,
    pub max_entrance_distance: i32,
}

impl Default for EntranceOptions {
    fn default() -> Self {
        Self {
            match_threshold: 10,
            max_attempts: 21,
            max_entrance_distance: 8,
        }
    }
}

const MAX_MOVE_RETRIES: u32 = 3;

/// Entrances that sometimes face away from the approach direction; the
/// machine repositions around them after repeated failures.
fn has_alternative_sides(target: Area) -> bool {
    matches!(target, Area::SewersLevel3Act2)
}

/// Transitions whose map data is wrong; the real entrance is the permanent
/// portal object the snapshot reports.
pub(crate) fn is_override_pair(a: Area, b: Area) -> bool {
    let pair = |x: Area, y: Area| (a == x && b == y) || (a == y && b == x);
    pair(Area::Abaddon, Area::FrigidHighlands)
        || pair(Area::PitOfAcheron, Area::ArreatPlateau)
        || pair(Area::FrozenTundra, Area::InfernalPit)
}

/// Drive the avatar through the entrance into `target`.
///
/// The act 3 sewer levers force the mouse protocol; when packet casting is
/// configured for entrances elsewhere, its failure path also lands here.
pub fn interact_entrance(ctx: &mut Ctx, target: Area) -> NavResult<()> {
    let current = ctx.data.player.area;
    let sewer_lever = (current == Area::SewersLevel1Act3 && target == Area::SewersLevel2Act3)
        || (current == Area::KurastBazaar && target == Area::SewersLevel1Act3);

    if sewer_lever {
        debug!(area = target.name(), "sewer lever entrance, forcing mouse interaction");
    } else if ctx.cfg.packet_casting.use_for_entrance_interaction {
        // Packet interaction is owned by an external collaborator; the
        // mouse machine is the in-core fallback either way.
        debug!(area = target.name(), "packet entrance interaction unavailable, using mouse");
    }

    interact_entrance_mouse(ctx, target, &EntranceOptions::default())
}

pub fn interact_entrance_mouse(
    ctx: &mut Ctx,
    target: Area,
    opts: &EntranceOptions,
) -> NavResult<()> {
    let mut interaction_attempts: u32 = 1;
    let mut scan_attempts: u32 = 0;
    let mut waiting_for_interaction = false;
    let mut current_mouse = (0i32, 0i32);
    let mut last_run: Option<Instant> = None;
    let mut alternative_moves: Vec<Position> = Vec::new();
    let mut alternative_index = 0usize;

    // Several areas expose two entrances to the same destination; once the
    // pointer starts hovering one instance we stay on it.
    let mut locked_entrance: Option<Level> = None;

    loop {
        ctx.pause_if_not_priority();
        ctx.check_player_death()?;
        ctx.refresh_game_data();

        let settled = last_run.is_none_or(|t| t.elapsed().as_millis() > 500);
        if ctx.data.area_data.area == Some(target)
            && settled
            && ctx.data.area_data.is_inside(ctx.data.player.position)
        {
            return Ok(());
        }

        if interaction_attempts > opts.max_attempts {
            return Err(NavError::EntranceNotInteracted(target.name()));
        }

        if waiting_for_interaction && !settled {
            sleep_ms(50);
            continue;
        }

        last_run = Some(Instant::now());

        let is_override = is_override_pair(ctx.data.player.area, target);

        let target_level = if is_override {
            ctx.refresh_game_data();
            sleep_ms(500);
            ctx.data
                .find_object(ObjectName::PermanentTownPortal)
                .map(|portal| Level {
                    area: target,
                    position: portal.position,
                    is_entrance: true,
                })
        } else {
            ctx.data
                .adjacent_levels
                .iter()
                .find(|l| l.area == target)
                .copied()
        };

        let Some(target_level) = target_level else {
            scan_attempts += 1;
            if scan_attempts > opts.max_attempts {
                return Err(NavError::EntranceNotFound(target.name()));
            }
            sleep_ms(100);
            continue;
        };

        // Fuzzy-match the entrance instance nearest the map-data entry.
        let mut candidates: Vec<Level> = ctx.data.adjacent_levels.clone();
        if is_override {
            candidates.push(target_level);
        }

        let nearest = candidates
            .iter()
            .filter(|l| l.area == target)
            .filter(|l| {
                locked_entrance.is_none_or(|locked| locked.position == l.position)
            })
            .map(|l| (distance(target_level.position, l.position), *l))
            .filter(|(d, _)| *d <= opts.match_threshold)
            .min_by_key(|(d, _)| *d);

        let Some((match_offset, level)) = nearest else {
            scan_attempts += 1;
            if scan_attempts > opts.max_attempts {
                return Err(NavError::EntranceNotFound(target.name()));
            }
            sleep_ms(100);
            continue;
        };

        if match_offset > 0 {
            debug!(offset = match_offset, area = target.name(), "entrance found via fuzzy match");
        }

        if alternative_moves.is_empty() && has_alternative_sides(target) {
            alternative_moves = approach_sides(ctx.data.player.position, level.position);
        }

        // Every few failed attempts, reposition to another side.
        if has_alternative_sides(target)
            && alternative_index < alternative_moves.len()
            && interaction_attempts % 5 == 0
        {
            let side = alternative_moves[alternative_index];
            debug!(
                area = target.name(),
                attempt = interaction_attempts,
                x = side.x,
                y = side.y,
                "repositioning for entrance interaction"
            );
            if let Err(err) =
                movement::move_to_coords(ctx, side, MoveOpts::new().with_distance_to_finish(2))
            {
                warn!(error = %err, "failed repositioning for entrance interaction");
            }
            alternative_index += 1;
        }

        let mut entrance_distance = ctx.pathfinder.distance_from_me(&ctx.data, level.position);
        if entrance_distance > opts.max_entrance_distance {
            for retry in 0..MAX_MOVE_RETRIES {
                if movement::move_to_coords(
                    ctx,
                    level.position,
                    MoveOpts::new().with_distance_to_finish(2),
                )
                .is_err()
                {
                    // Direct nudge when pathing refuses.
                    let (sx, sy) = ctx.pathfinder.game_coords_to_screen(
                        &ctx.data,
                        level.position.x - 2,
                        level.position.y - 2,
                    );
                    ctx.hid.click(MouseButton::Left, sx, sy);
                    retry_sleep(retry, ctx.data.ping, 800);
                    ctx.refresh_game_data();
                }

                entrance_distance = ctx.pathfinder.distance_from_me(&ctx.data, level.position);
                if entrance_distance <= opts.max_entrance_distance {
                    break;
                }
                if retry == MAX_MOVE_RETRIES - 1 {
                    return Err(NavError::EntranceTooFar(entrance_distance));
                }
            }
        }

        if !level.is_entrance {
            return Err(NavError::NotAnEntrance(target.name()));
        }

        let (lx, ly) = ctx
            .pathfinder
            .game_coords_to_screen(&ctx.data, level.position.x - 1, level.position.y - 1);

        let hover = ctx.data.hover;
        if hover.unit_type == 5 || (hover.unit_type == 2 && hover.is_hovered) {
            ctx.hid
                .click(MouseButton::Left, current_mouse.0, current_mouse.1);
            waiting_for_interaction = true;
            sleep_ms(200);
        }

        let (mut dx, mut dy) = spiral(interaction_attempts);
        if ctx.data.area_data.area == Some(Area::CanyonOfTheMagi) {
            dx *= 5;
            dy *= 5;
        }
        current_mouse = (lx + dx, ly + dy);
        ctx.hid.move_pointer(current_mouse.0, current_mouse.1);
        interaction_attempts += 1;
        sleep_ms(100);

        locked_entrance = Some(level);
    }
}

/// Four approach points around the entrance: the opposite side first, then
/// rotations, sampled when the default angle keeps failing.
fn approach_sides(player: Position, entrance: Position) -> Vec<Position> {
    let mut dir = Position::new(
        (entrance.x - player.x).signum(),
        (entrance.y - player.y).signum(),
    );
    if dir.x == 0 && dir.y == 0 {
        dir.y = 1;
    }

    vec![
        Position::new(entrance.x + dir.x * 3, entrance.y + dir.y * 3),
        Position::new(entrance.x - dir.y * 3, entrance.y + dir.x * 3),
        Position::new(entrance.x - dir.x * 3, entrance.y - dir.y * 3),
        Position::new(entrance.x + dir.y * 3, entrance.y - dir.x * 3),
    ]
}

/// Expanding spiral of pointer offsets, in pixels.
fn spiral(attempt: u32) -> (i32, i32) {
    let t = attempt as f32 * 40.0_f32.to_radians();
    let r = 4.0 + 5.0 * t;
    ((r * t.cos()) as i32, (r * t.sin()) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::area::Area;
    use crate::nav::testkit::{FakeWorld, TestCtx};

    fn world_with_entrance(target: Area, pos: Position) -> std::sync::Arc<FakeWorld> {
        let world = FakeWorld::walkable_field(Area::BloodMoor, 30, 30);
        world.mutate(|data| {
            data.player.position = Position::new(pos.x - 2, pos.y - 2);
            data.adjacent_levels.push(Level {
                area: target,
                position: pos,
                is_entrance: true,
            });
        });
        world
    }

    #[test]
    fn attempt_counter_caps_at_limit() {
        let world = world_with_entrance(Area::ColdPlains, Position::new(10, 10));
        let mut ctx = TestCtx::new(world.clone()).ctx;

        let opts = EntranceOptions {
            max_attempts: 5,
            ..EntranceOptions::default()
        };
        let err = interact_entrance_mouse(&mut ctx, Area::ColdPlains, &opts).unwrap_err();
        assert!(matches!(err, NavError::EntranceNotInteracted(_)));

        // One pointer move per attempt, never beyond the cap.
        let moves = world.pointer_moves.lock().unwrap().len();
        assert_eq!(moves, 5);
    }

    #[test]
    fn hovered_entrance_is_clicked_and_transition_detected() {
        let world = world_with_entrance(Area::ColdPlains, Position::new(10, 10));
        world.mutate(|data| {
            data.hover.unit_type = 5;
        });
        world.set_click_hook(|data, _button, _x, _y| {
            data.area_data.area = Some(Area::ColdPlains);
            data.player.area = Area::ColdPlains;
        });

        let mut ctx = TestCtx::new(world.clone()).ctx;
        interact_entrance_mouse(&mut ctx, Area::ColdPlains, &EntranceOptions::default()).unwrap();
        assert!(world.click_count() >= 1);
    }

    #[test]
    fn missing_adjacent_level_surfaces_not_found() {
        let world = FakeWorld::walkable_field(Area::BloodMoor, 30, 30);
        let mut ctx = TestCtx::new(world).ctx;

        let opts = EntranceOptions {
            max_attempts: 3,
            ..EntranceOptions::default()
        };
        let err = interact_entrance_mouse(&mut ctx, Area::ColdPlains, &opts).unwrap_err();
        assert!(matches!(err, NavError::EntranceNotFound(_)));
    }

    #[test]
    fn fuzzy_match_prefers_nearest_instance() {
        // Two entrances to the same area; the one nearer the map entry wins.
        let world = FakeWorld::walkable_field(Area::LutGholein, 40, 40);
        world.mutate(|data| {
            data.player.position = Position::new(10, 10);
            data.adjacent_levels.push(Level {
                area: Area::SewersLevel1Act2,
                position: Position::new(12, 12),
                is_entrance: true,
            });
            data.adjacent_levels.push(Level {
                area: Area::SewersLevel1Act2,
                position: Position::new(19, 12),
                is_entrance: true,
            });
        });

        let candidates = [
            Level {
                area: Area::SewersLevel1Act2,
                position: Position::new(12, 12),
                is_entrance: true,
            },
            Level {
                area: Area::SewersLevel1Act2,
                position: Position::new(19, 12),
                is_entrance: true,
            },
        ];
        let reference = Position::new(13, 12);
        let nearest = candidates
            .iter()
            .map(|l| (distance(reference, l.position), l))
            .filter(|(d, _)| *d <= 10)
            .min_by_key(|(d, _)| *d)
            .map(|(_, l)| l.position);
        assert_eq!(nearest, Some(Position::new(12, 12)));
    }

    #[test]
    fn default_tunables() {
        let opts = EntranceOptions::default();
        assert_eq!(opts.max_attempts, 21);
        assert_eq!(opts.match_threshold, 10);
        assert_eq!(opts.max_entrance_distance, 8);
    }

    #[test]
    fn spiral_expands_outward() {
        let near = spiral(1);
        let far = spiral(20);
        let mag = |p: (i32, i32)| p.0.abs() + p.1.abs();
        assert!(mag(far) > mag(near));
    }

    #[test]
    fn approach_sides_surround_the_entrance() {
        let sides = approach_sides(Position::new(0, 0), Position::new(10, 10));
        assert_eq!(sides.len(), 4);
        assert_eq!(sides[0], Position::new(13, 13));
        assert_eq!(sides[2], Position::new(7, 7));
        for side in sides {
            assert!(distance(side, Position::new(10, 10)) <= 5);
        }
    }
}
