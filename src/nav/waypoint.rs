//! Waypoint travel: menu driving, remainder walking, and waypoint
//! discovery along the way.

use tracing::{debug, info, warn};

use crate::context::{sleep_ms, Ctx};
use crate::errors::{NavError, NavResult};
use crate::game::area::{Area, WaypointAddress};
use crate::game::{Key, MouseButton, ObjectName};
use crate::nav::graph::{nearest_waypoint_area, static_area_path};
use crate::nav::movement::{ensure_area_sync, move_to_area_single};
use crate::nav::interact_object;
use crate::ui;

const WAYPOINT_SELECT_ATTEMPTS: u32 = 3;

/// Travel to `dest` through the waypoint network, walking any remainder.
pub fn waypoint(ctx: &mut Ctx, dest: Area) -> NavResult<()> {
    ctx.wait_for_game_to_load();

    if ctx.data.player.area == dest {
        return Ok(());
    }

    let Some((wp_area, wp_coords)) = nearest_waypoint_area(&ctx.data, dest)? else {
        // Nothing discovered in this act: walk the whole way.
        let from = ctx.data.player.area;
        return traverse_remainder(ctx, from, dest);
    };

    ensure_waypoint_access(ctx)?;
    ctx.refresh_game_data();

    if wp_area != ctx.data.player.area {
        if let Err(err) = select_waypoint(ctx, wp_coords, wp_area) {
            if ctx.data.player.area.act() != dest.act() {
                // Walking cannot cross acts.
                return Err(NavError::WaypointTravel {
                    area: dest.name(),
                    source: Box::new(err),
                });
            }
            warn!(destination = dest.name(), reason = %err, "waypoint selection failed, walking remainder");
            ctx.close_all_menus();
            let from = ctx.data.player.area;
            return traverse_remainder(ctx, from, dest);
        }
        ctx.wait_for_game_to_load();
    }

    traverse_remainder(ctx, wp_area, dest)?;

    // Verify arrival on both the area sync and the player unit.
    ctx.wait_for_game_to_load();
    ctx.refresh_game_data();
    ensure_area_sync(ctx, dest).map_err(|err| NavError::WaypointTravel {
        area: dest.name(),
        source: Box::new(err),
    })?;
    if ctx.data.player.area != dest {
        return Err(NavError::WaypointTravel {
            area: dest.name(),
            source: Box::new(NavError::AreaSyncTimeout {
                expected: dest.name(),
                current: ctx.data.player.area.name(),
            }),
        });
    }

    if ctx.cfg.character.buff_after_wp {
        ctx.character.buff();
    }

    Ok(())
}

/// Walk the static route from `wp_area` to `dest`, registering every
/// waypoint passed on the way.
fn traverse_remainder(ctx: &mut Ctx, wp_area: Area, dest: Area) -> NavResult<()> {
    if wp_area == dest {
        return Ok(());
    }

    let path = static_area_path(wp_area, dest).ok_or(NavError::NoStaticRoute {
        from: wp_area.name(),
        to: dest.name(),
    })?;

    let names: Vec<&str> = path.iter().map(|a| a.name()).collect();
    info!(areas = %names.join(" -> "), "traversing areas to reach destination");

    for &hop in path.iter().skip(1) {
        move_to_area_single(ctx, hop, false)?;
        discover_waypoint(ctx)?;
    }

    Ok(())
}

/// Interact with the current area's waypoint so it registers as
/// discovered. No-op in towns and in areas without one.
pub fn discover_waypoint(ctx: &mut Ctx) -> NavResult<()> {
    if ctx.data.player.area.is_town() {
        return Ok(());
    }

    let Some(wp) = ctx.data.objects.iter().find(|o| o.is_waypoint()).cloned() else {
        return Ok(());
    };

    info!(area = ctx.data.player.area.name(), "registering waypoint in current area");
    interact_object(ctx, &wp, |ctx| ctx.data.open_menus.waypoint)?;
    info!(area = ctx.data.player.area.name(), "waypoint discovered");
    ctx.close_all_menus();
    Ok(())
}

/// Waypoint to the act's town, a no-op when already there.
pub fn travel_to_act_town(ctx: &mut Ctx, act: u8) -> NavResult<()> {
    let town = Area::town_of_act(act).ok_or(NavError::UnknownAct(act))?;
    if ctx.data.player.area == town {
        return Ok(());
    }
    waypoint(ctx, town)
}

/// Cast a town portal and take it back to the act's town.
pub fn return_town(ctx: &mut Ctx) -> NavResult<()> {
    if ctx.data.player.area.is_town() {
        return Ok(());
    }
    ctx.check_player_death()?;

    ctx.hid.key_press(Key::TownPortal);
    sleep_ms(500);
    ctx.refresh_game_data();

    let portal = crate::nav::find_object_with_retry(ctx, ObjectName::TownPortal, 3)?;
    interact_object(ctx, &portal, |ctx| ctx.data.player.area.is_town())?;

    let town = Area::town_of_act(ctx.data.player.area.act())
        .ok_or(NavError::UnknownAct(ctx.data.player.area.act()))?;
    ensure_area_sync(ctx, town)
}

/// Preconditions of the menu protocol: stand next to a usable waypoint,
/// returning to town when the field-side shortcut does not apply.
fn ensure_waypoint_access(ctx: &mut Ctx) -> NavResult<()> {
    if !ctx.data.player.area.is_town() {
        if ctx.data.can_teleport() && has_waypoint_in_current_area(ctx) {
            return Ok(());
        }

        return_town(ctx)?;
        ctx.refresh_game_data();
        sleep_ms(300);
    }

    if !has_waypoint_in_current_area(ctx) {
        return Err(NavError::NoWaypointObject(ctx.data.player.area.name()));
    }
    Ok(())
}

fn has_waypoint_in_current_area(ctx: &Ctx) -> bool {
    ctx.data.objects.iter().any(|o| o.is_waypoint())
}

fn open_waypoint_menu(ctx: &mut Ctx) -> NavResult<()> {
    let Some(wp) = ctx.data.objects.iter().find(|o| o.is_waypoint()).cloned() else {
        sleep_ms(500);
        return Err(NavError::NoWaypointObject(ctx.data.player.area.name()));
    };
    interact_object(ctx, &wp, |ctx| ctx.data.open_menus.waypoint)
}

/// Click the act tab and destination row, re-opening the menu when a
/// loading screen closed it. The menu is not assumed to survive a failed
/// click.
fn select_waypoint(ctx: &mut Ctx, wp_coords: WaypointAddress, dest: Area) -> NavResult<()> {
    for _ in 0..WAYPOINT_SELECT_ATTEMPTS {
        if ctx.data.open_menus.loading_screen {
            debug!("loading screen detected before waypoint selection");
            ctx.wait_for_game_to_load();
        }
        ctx.refresh_game_data();
        sleep_ms(200);

        let current = ctx.data.player.area;
        if current == dest {
            return Ok(());
        }
        ensure_area_sync(ctx, current)?;

        if !ctx.data.open_menus.waypoint {
            open_waypoint_menu(ctx)?;
        }
        sleep_ms(100);
        if !ctx.data.open_menus.waypoint {
            return Err(NavError::WaypointSelection);
        }

        let ((tab_x, tab_y), (row_x, row_y)) =
            ui::waypoint_click_points(wp_coords, ctx.data.legacy_graphics);

        ctx.hid.click(MouseButton::Left, tab_x, tab_y);
        sleep_ms(200);
        ctx.hid.click(MouseButton::Left, row_x, row_y);

        ctx.wait_for_game_to_load();
        sleep_ms(200);
        ctx.refresh_game_data();
    }

    if ctx.data.player.area == dest {
        return Ok(());
    }
    Err(NavError::WaypointSelection)
}
