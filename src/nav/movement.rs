//! The intra-area movement loop and the top-level area travel built on it.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::context::{is_any_enemy_around_player, sleep_ms, Ctx};
use crate::errors::{is_death, NavError, NavResult};
use crate::game::area::Area;
use crate::game::{Data, Level, Monster, MouseButton, Object, ObjectName, Position, UnitId};
use crate::nav::entrance::{interact_entrance, is_override_pair};
use crate::nav::graph::{build_area_route, find_proxy_area, CAN_REACH_NIHLATHAK_TEMPLE_FROM};
use crate::nav::shrine::find_closest_shrine;
use crate::nav::step::{MoveOpts, Stepper, DISTANCE_TO_FINISH_MOVING};
use crate::nav::waypoint::{travel_to_act_town, waypoint};
use crate::nav::{find_object_with_retry, interact_object, transition};
use crate::pathing::distance;

const MAX_AREA_SYNC_ATTEMPTS: u32 = 10;
const AREA_SYNC_DELAY_MS: u64 = 100;
const MONSTER_HANDLE_COOLDOWN: Duration = Duration::from_millis(500);
const LOOT_AFTER_COMBAT_RADIUS: i32 = 25;
const MAX_AREA_HOPS: u32 = 50;
const SHRINE_SCAN_DISTANCE: i32 = 50;

const TAL_TOMBS: &[Area] = &[
    Area::TalRashasTomb1,
    Area::TalRashasTomb2,
    Area::TalRashasTomb3,
    Area::TalRashasTomb4,
    Area::TalRashasTomb5,
    Area::TalRashasTomb6,
    Area::TalRashasTomb7,
];

/// Wait until the snapshot agrees we are in `expected`.
pub fn ensure_area_sync(ctx: &mut Ctx, expected: Area) -> NavResult<()> {
    if ctx.data.player.area == expected {
        return Ok(());
    }

    for _ in 0..MAX_AREA_SYNC_ATTEMPTS {
        ctx.refresh_game_data();
        ctx.check_player_death()?;
        if ctx.data.player.area == expected {
            return Ok(());
        }
        sleep_ms(AREA_SYNC_DELAY_MS);
    }

    Err(NavError::AreaSyncTimeout {
        expected: expected.name(),
        current: ctx.data.player.area.name(),
    })
}

/// Move to fixed world coordinates. Returns immediately when already
/// within the finish radius.
pub fn move_to_coords(ctx: &mut Ctx, to: Position, opts: MoveOpts) -> NavResult<()> {
    ctx.check_player_death()?;
    let current = ctx.data.player.area;
    ensure_area_sync(ctx, current)?;
    move_to(ctx, move |_| Some(to), opts)
}

/// The cooperative movement loop. `to_func` is re-evaluated every tick;
/// returning `None` ends the move.
pub fn move_to(
    ctx: &mut Ctx,
    mut to_func: impl FnMut(&Ctx) -> Option<Position>,
    opts: MoveOpts,
) -> NavResult<()> {
    let min_distance_to_finish = opts.distance_to_finish.unwrap_or(DISTANCE_TO_FINISH_MOVING);

    ctx.check_player_death()?;

    if ctx.data.open_menus.is_menu_open() {
        debug!("open menus while moving, closing them");
        ctx.close_all_menus();
    }

    let mut clear_path_dist = ctx.cfg.character.clear_path_dist;
    let mut override_clear_path = false;
    if let Some(dist) = opts.clear_path_override {
        clear_path_dist = dist;
        override_clear_path = true;
    }
    let ignore_shrines = !ctx.cfg.game.interact_with_shrines;
    let initial_area = ctx.data.player.area;

    let mut last_monster_handling: Option<Instant> = None;
    let mut previous_target: Option<Position> = None;
    let mut previous_position: Option<Position> = None;
    let mut shrine: Option<Object> = None;
    let mut chest: Option<Object> = None;
    let mut tp_pad: Option<Object> = None;
    let mut path_nodes: Vec<Position> = Vec::new();
    let mut path_offset = (0i32, 0i32);
    let mut path_found = false;
    let mut stuck = false;
    let mut blacklisted_interactions: HashSet<UnitId> = HashSet::new();
    let mut blacklisted_pads: Vec<Position> = Vec::new();
    let mut adjust_min_dist = false;
    let mut stepper = Stepper::new();

    let starting_area = ctx.data.player.area;
    ensure_area_sync(ctx, starting_area)?;

    loop {
        ctx.pause_if_not_priority();
        ctx.refresh_game_data();
        ctx.check_player_death()?;

        let Some(to) = to_func(ctx) else {
            return Ok(());
        };
        let mut target_position = to;

        // We are not headed to town, yet we are in one: another subsystem
        // is running errands there. Wait it out.
        if !initial_area.is_town()
            && ctx.data.player.area.is_town()
            && !ctx.data.is_position_in_town(target_position)
        {
            sleep_ms(100);
            continue;
        }

        let mut is_safe = true;
        if !ctx.data.player.area.is_town() {
            // Safety first: engage whatever blocks the way, then loot.
            let cooldown_over =
                last_monster_handling.is_none_or(|t| t.elapsed() >= MONSTER_HANDLE_COOLDOWN);
            if !opts.ignore_monsters
                && (!ctx.data.can_teleport() || override_clear_path)
                && cooldown_over
            {
                last_monster_handling = Some(Instant::now());
                let mut filters = opts.monster_filters.clone();
                let character = ctx.character.clone();
                let engaging_everything = stuck;
                filters.push(Arc::new(move |monsters: &[Monster]| {
                    monsters
                        .iter()
                        .filter(|m| engaging_everything || !character.should_ignore_monster(m))
                        .cloned()
                        .collect()
                }));
                let _ = ctx.combat.clear_area_around_position(
                    &ctx.data,
                    ctx.data.player.position,
                    clear_path_dist,
                    &filters,
                );
                if !opts.ignore_items {
                    if let Err(err) = ctx.loot.item_pickup(&ctx.data, LOOT_AFTER_COMBAT_RADIUS) {
                        warn!(error = %err, "error picking up items after combat");
                    }
                }
                ctx.refresh_game_data();
            }

            if !ignore_shrines && shrine.is_none() {
                if let Some(found) = find_closest_shrine(&ctx.data, &ctx.cfg, SHRINE_SCAN_DISTANCE)
                {
                    if !blacklisted_interactions.contains(&found.id) {
                        shrine = Some(found);
                        chest = None;
                    }
                }
            }

            if ctx.cfg.game.interact_with_chests && shrine.is_none() && chest.is_none() {
                if let Some(found) =
                    ctx.pathfinder
                        .get_closest_chest(&ctx.data, ctx.data.player.position, true)
                {
                    if !blacklisted_interactions.contains(&found.id) {
                        chest = Some(found);
                    }
                }
            }

            let (enemy_found, _) =
                is_any_enemy_around_player(&ctx.data, (clear_path_dist * 2).max(30));
            if enemy_found {
                is_safe = false;
            } else {
                on_safe_navigation(ctx);
            }
        }

        // Redirect toward any pending interaction.
        if let Some(s) = &shrine {
            target_position = s.position;
        } else if let Some(c) = &chest {
            target_position = c.position;
        } else if let Some(p) = &tp_pad {
            target_position = p.position;
        }

        // Recomputing the path is heavy; only do it when the target moved
        // or the previous search failed.
        if previous_target != Some(target_position) || !path_found {
            previous_target = Some(target_position);
            match ctx.pathfinder.get_path(&ctx.data, target_position) {
                Some(path) => {
                    path_nodes = path.nodes;
                    path_found = true;
                }
                None => {
                    path_nodes.clear();
                    path_found = false;
                }
            }
            path_offset = (ctx.data.area_data.offset_x, ctx.data.area_data.offset_y);
        }

        let distance_to_target = ctx.pathfinder.distance_from_me(&ctx.data, target_position);

        if !path_found {
            if ctx.data.player.area == Area::ArcaneSanctuary {
                // Ride the teleporter pads toward the target instead.
                let pad = next_arcane_teleport_pad(ctx, &blacklisted_pads)?;
                tp_pad = Some(pad);
                continue;
            }
            return Err(NavError::NoPath {
                area: ctx.data.player.area.name(),
                target: to,
            });
        }

        // A caller-provided finish radius applies to the real target only;
        // intermediate interactions use the default.
        let mut finish_dist = DISTANCE_TO_FINISH_MOVING;
        if min_distance_to_finish != DISTANCE_TO_FINISH_MOVING && to == target_position {
            finish_dist = min_distance_to_finish;
        }

        if distance_to_target <= finish_dist
            || (adjust_min_dist && distance_to_target <= finish_dist * 2)
        {
            if let Some(s) = shrine.take() {
                if target_position == s.position {
                    if let Err(err) = interact_object(ctx, &s, |ctx| {
                        ctx.data
                            .find_object_by_id(s.id)
                            .is_none_or(|o| !o.selectable)
                    }) {
                        warn!(error = %err, "failed to interact with shrine");
                    }
                    blacklisted_interactions.insert(s.id);
                    continue;
                }
                shrine = Some(s);
            }
            if let Some(c) = chest.take() {
                if target_position == c.position {
                    if let Err(err) = interact_object(ctx, &c, |ctx| {
                        ctx.data
                            .find_object_by_id(c.id)
                            .is_none_or(|o| !o.selectable)
                    }) {
                        warn!(error = %err, "failed to interact with chest");
                        blacklisted_interactions.insert(c.id);
                    }
                    if !opts.ignore_items {
                        if let Err(err) =
                            ctx.loot.item_pickup(&ctx.data, LOOT_AFTER_COMBAT_RADIUS)
                        {
                            warn!(error = %err, "error picking up items after chest opening");
                        }
                    }
                    continue;
                }
                chest = Some(c);
            }
            if let Some(pad) = tp_pad.take() {
                if target_position == pad.position {
                    interact_object(ctx, &pad, |ctx| {
                        ctx.pathfinder.distance_from_me(&ctx.data, pad.position) > 5
                    })?;
                    blacklisted_pads.push(pad.position);
                    // Blacklist the pad we landed on too, so the next leg
                    // keeps moving forward.
                    if let Some(exit_pad) = closest_teleport_pad(ctx, &blacklisted_pads) {
                        blacklisted_pads.push(exit_pad.position);
                    }
                    continue;
                }
                tp_pad = Some(pad);
            }

            return Ok(());
        }
        adjust_min_dist = false;

        // Split the remaining path into a stride.
        let mut next_position = target_position;
        let mut path_step = 0usize;
        if !ctx.data.player.area.is_town() && !path_nodes.is_empty() {
            let max_path_step = if ctx.data.can_teleport() {
                ctx.pathfinder
                    .last_path_index_on_screen(&ctx.data, &path_nodes, path_offset)
                    .max(1)
            } else if is_safe {
                8
            } else {
                3
            };

            path_step = max_path_step.min(path_nodes.len() - 1);
            let node = path_nodes[path_step];
            next_position = Position::new(node.x + path_offset.0, node.y + path_offset.1);
            if distance(next_position, target_position) <= min_distance_to_finish {
                next_position = target_position;
            }
        }

        match stepper.step(ctx, next_position, opts.ignore_monsters) {
            Err(err) => {
                // Recompute the path on the next tick.
                previous_target = None;

                match err {
                    NavError::MonstersInPath => continue,
                    NavError::PlayerStuck | NavError::PlayerRoundTrip => {
                        if !ctx.data.can_teleport() || stuck || ctx.data.player.area.is_town() {
                            ctx.pathfinder.random_movement(&ctx.data);
                            sleep_ms(200);
                        }
                        stuck = true;
                        continue;
                    }
                    NavError::NoPath { .. } if path_step > 0 => {
                        ctx.pathfinder.random_movement(&ctx.data);
                        sleep_ms(200);
                        continue;
                    }
                    other => return Err(other),
                }
            }
            Ok(()) => {
                if previous_position == Some(ctx.data.player.position) {
                    adjust_min_dist = true;
                }
            }
        }

        stuck = false;
        previous_position = Some(ctx.data.player.position);
        if !ctx.data.player.area.is_town() {
            path_nodes.drain(..path_step.min(path_nodes.len()));
        }
    }
}

/// Field housekeeping when nothing hostile is near.
fn on_safe_navigation(ctx: &mut Ctx) {
    if !ctx.character.is_leveling_character() {
        return;
    }
    if ctx.data.player.stat_points > 0 || ctx.data.player.low_stamina {
        ctx.pause_if_not_priority();
        ctx.character.on_safe_navigation(&ctx.data);
    }
}

/// Travel to `dst`, hopping areas along the weighted route with a
/// waypoint fallback when no route exists.
pub fn move_to_area(ctx: &mut Ctx, dst: Area) -> NavResult<()> {
    // Duriel hides behind one of seven tombs; resolve the real one first.
    if dst == Area::DurielsLair {
        return move_to_duriels_lair(ctx);
    }

    let mut hops = 0u32;
    loop {
        if ctx.data.player.area == dst {
            return Ok(());
        }

        match build_area_route(&ctx.data, dst, true) {
            Ok(route) => {
                let names: Vec<&str> = route.iter().map(|a| a.name()).collect();
                debug!(
                    from = ctx.data.player.area.name(),
                    to = dst.name(),
                    route = %names.join(" -> "),
                    "area route"
                );

                if route.len() <= 1 {
                    debug!(area = dst.name(), "arrived in destination area");
                    return Ok(());
                }
                move_to_area_single(ctx, route[1], true)?;
            }
            Err(route_err) => {
                debug!(error = %route_err, "no route found, trying a single hop");
                if let Err(err) = move_to_area_single(ctx, dst, true) {
                    if is_death(&err) {
                        return Err(err);
                    }
                    waypoint(ctx, dst).map_err(|wp_err| NavError::AreaTravel {
                        area: dst.name(),
                        source: Box::new(wp_err),
                    })?;
                }
            }
        }

        ctx.refresh_game_data();
        hops += 1;
        if hops > MAX_AREA_HOPS {
            return Err(NavError::HopLimit {
                area: dst.name(),
                hops,
            });
        }
    }
}

/// One hop into an adjacent (or special-cased) area.
pub fn move_to_area_single(ctx: &mut Ctx, dst: Area, allow_waypoints: bool) -> NavResult<()> {
    ctx.check_player_death()?;
    let current = ctx.data.player.area;
    ensure_area_sync(ctx, current)?;

    if let Some(strategy) = transition::strategy_for(ctx, current, dst) {
        strategy.approach(ctx)?;
        return strategy.trigger(ctx);
    }

    // The temple opens from Harrogath's red portal; from anywhere but the
    // halls beneath it, go to town first.
    if dst == Area::NihlathaksTemple
        && current != Area::Harrogath
        && !CAN_REACH_NIHLATHAK_TEMPLE_FROM.contains(&current)
    {
        travel_to_act_town(ctx, 5)?;
        ctx.refresh_game_data();
        sleep_ms(500);
        if let Some(strategy) = transition::strategy_for(ctx, Area::Harrogath, dst) {
            strategy.approach(ctx)?;
            return strategy.trigger(ctx);
        }
    }

    let find_level = |data: &Data| -> Option<Level> {
        if is_override_pair(data.player.area, dst) {
            if let Some(portal) = data.find_object(ObjectName::PermanentTownPortal) {
                return Some(Level {
                    area: dst,
                    position: portal.position,
                    is_entrance: true,
                });
            }
            return None;
        }
        data.adjacent_levels
            .iter()
            .find(|l| l.area == dst && !l.position.is_zero())
            .copied()
    };

    let mut tried_proxy = false;
    let lvl: Level = loop {
        if is_override_pair(ctx.data.player.area, dst) {
            ctx.refresh_game_data();
            sleep_ms(500);
        }
        if let Some(l) = find_level(&ctx.data) {
            break l;
        }

        debug!(area = dst.name(), "destination area not in cache, refreshing data");
        ctx.refresh_game_data();
        if let Some(l) = find_level(&ctx.data) {
            break l;
        }

        if !tried_proxy {
            if let Some(proxy) = find_proxy_area(&ctx.data, dst) {
                tried_proxy = true;
                debug!(
                    from = ctx.data.player.area.name(),
                    via = proxy.name(),
                    destination = dst.name(),
                    "routing via shared adjacency"
                );
                move_to_area(ctx, proxy)?;
                ctx.refresh_game_data();
                sleep_ms(300);
                continue;
            }
        }

        // Not adjacent on the shared grid; only the waypoint network can
        // get us there.
        if allow_waypoints {
            return waypoint(ctx, dst);
        }
        return Err(NavError::MissingCachedData(dst.name()));
    };

    // For map-loaded neighbors, aim at any reachable cached object inside
    // the destination; crossing the boundary ends the move early anyway.
    let mut cached_pos = Position::default();
    if !lvl.is_entrance && ctx.data.player.area != dst {
        let mut objects: Vec<Object> = ctx
            .data
            .areas
            .get(&lvl.area)
            .map(|a| a.objects.clone())
            .unwrap_or_default();
        objects.sort_by_key(|o| ctx.pathfinder.distance_from_me(&ctx.data, o.position));

        for obj in &objects {
            if ctx.pathfinder.get_path(&ctx.data, obj.position).is_some() {
                cached_pos = obj.position;
                break;
            }
        }
        if cached_pos.is_zero() {
            cached_pos = lvl.position;
        }
    }

    let to_fun = move |ctx: &Ctx| -> Option<Position> {
        if ctx.check_player_death().is_err() {
            return None;
        }
        if ctx.data.player.area == dst {
            debug!(area = dst.name(), "reached area");
            return None;
        }

        // The monastery gate bridge needs fixed aim points in both
        // directions.
        if ctx.data.player.area == Area::TamoeHighland && dst == Area::MonasteryGate {
            return Some(Position::new(15139, 5056));
        }
        if ctx.data.player.area == Area::MonasteryGate && dst == Area::TamoeHighland {
            return Some(Position::new(15142, 5118));
        }

        // Lut Gholein has two desert exits; probe which one is pathable.
        if dst == Area::RockyWaste && ctx.data.player.area == Area::LutGholein {
            if ctx
                .pathfinder
                .get_path(&ctx.data, Position::new(5004, 5065))
                .is_some()
            {
                return Some(Position::new(4989, 5063));
            }
            return Some(Position::new(5096, 4997));
        }

        if lvl.is_entrance {
            return Some(lvl.position);
        }
        Some(cached_pos)
    };

    let opts = if needs_entrance_distance_override(current, dst) {
        MoveOpts::new().with_distance_to_finish(7)
    } else {
        MoveOpts::new()
    };
    move_to(ctx, to_fun, opts)?;

    if lvl.is_entrance {
        let mut last_err: Option<NavError> = None;
        for attempt in 0..3u32 {
            let entrance_distance = ctx.pathfinder.distance_from_me(&ctx.data, lvl.position);

            if entrance_distance > 7 {
                // Too far for a click; the full travel flow re-approaches
                // and interacts.
                return move_to_area(ctx, dst);
            } else if entrance_distance > 3 {
                let (sx, sy) = ctx.pathfinder.game_coords_to_screen(
                    &ctx.data,
                    lvl.position.x - 2,
                    lvl.position.y - 2,
                );
                ctx.hid.click(MouseButton::Left, sx, sy);
                sleep_ms(800);
            }

            ctx.check_player_death()?;

            match interact_entrance(ctx, dst) {
                Ok(()) => {
                    last_err = None;
                    break;
                }
                Err(err) => {
                    if is_death(&err) {
                        return Err(err);
                    }
                    debug!(attempt = attempt + 1, error = %err, "entrance interaction failed, retrying");
                    last_err = Some(err);
                    if attempt < 2 {
                        sleep_ms(1000);
                    }
                }
            }
        }

        if let Some(err) = last_err {
            return Err(NavError::AreaTravel {
                area: dst.name(),
                source: Box::new(err),
            });
        }

        ensure_area_sync(ctx, dst)?;
    }

    if ctx.cfg.character.buff_on_new_area {
        ctx.character.buff();
    }
    Ok(())
}

/// Entrances that misreport their interaction range (tower, harem,
/// sewers); stopping short makes the click land.
fn needs_entrance_distance_override(current: Area, dst: Area) -> bool {
    matches!(
        (current, dst),
        (Area::LutGholein, Area::HaremLevel1)
            | (Area::SewersLevel2Act2, Area::SewersLevel3Act2)
            | (Area::ForgottenTower, Area::TowerCellarLevel1)
            | (Area::TowerCellarLevel1, Area::TowerCellarLevel2)
            | (Area::TowerCellarLevel2, Area::TowerCellarLevel3)
            | (Area::TowerCellarLevel3, Area::TowerCellarLevel4)
            | (Area::TowerCellarLevel4, Area::TowerCellarLevel5)
    )
}

fn find_real_tomb(ctx: &Ctx) -> NavResult<Area> {
    for &tomb in TAL_TOMBS {
        if let Some(cached) = ctx.data.areas.get(&tomb) {
            if cached
                .objects
                .iter()
                .any(|o| o.name == ObjectName::HoradricOrifice)
            {
                return Ok(tomb);
            }
        }
    }
    Err(NavError::RealTombNotFound)
}

fn move_to_duriels_lair(ctx: &mut Ctx) -> NavResult<()> {
    let tomb = find_real_tomb(ctx)?;
    move_to_area(ctx, tomb)?;

    let orifice = ctx
        .data
        .find_object(ObjectName::HoradricOrifice)
        .cloned()
        .ok_or(NavError::ObjectNotFound {
            object: "horadric orifice",
            area: tomb.name(),
        })?;

    move_to_coords(ctx, orifice.position, MoveOpts::new())?;
    sleep_ms(100);
    ctx.refresh_game_data();
    sleep_ms(500);

    let portal = find_object_with_retry(ctx, ObjectName::DurielsLairPortal, 2)?;
    move_to_coords(ctx, portal.position, MoveOpts::new())?;
    interact_object(ctx, &portal, |ctx| {
        ctx.data.player.area == Area::DurielsLair
            && ctx.data.area_data.is_inside(ctx.data.player.position)
    })
}

// ── Arcane Sanctuary teleporter pads ───────────────────────────────

fn valid_teleport_pads(ctx: &Ctx, blacklisted: &[Position]) -> Vec<Object> {
    ctx.data
        .area_data
        .objects
        .iter()
        .filter(|o| o.is_teleport_pad())
        .filter(|o| !blacklisted.contains(&o.position))
        .cloned()
        .collect()
}

/// The closest reachable pad by path cost; riding pads toward the lane
/// end is the only way forward when walking paths dead-end.
fn next_arcane_teleport_pad(ctx: &Ctx, blacklisted: &[Position]) -> NavResult<Object> {
    let mut best: Option<(u32, Object)> = None;
    for pad in valid_teleport_pads(ctx, blacklisted) {
        if let Some(path) = ctx.pathfinder.get_path(&ctx.data, pad.position) {
            if best.as_ref().is_none_or(|(d, _)| path.distance < *d) {
                best = Some((path.distance, pad));
            }
        }
    }

    best.map(|(_, pad)| pad).ok_or(NavError::ArcaneDeadEnd)
}

fn closest_teleport_pad(ctx: &Ctx, blacklisted: &[Position]) -> Option<Object> {
    valid_teleport_pads(ctx, blacklisted)
        .into_iter()
        .min_by_key(|pad| ctx.pathfinder.distance_from_me(&ctx.data, pad.position))
}
