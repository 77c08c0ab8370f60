//! Inter-area travel: routing, transitions, and the movement loop.

pub mod entrance;
pub mod graph;
pub mod movement;
pub mod shrine;
pub mod step;
pub mod transition;
pub mod waypoint;

#[cfg(test)]
pub mod testkit;

use tracing::debug;

use crate::context::{sleep_ms, Ctx};
use crate::errors::{NavError, NavResult};
use crate::game::{MouseButton, Object, ObjectName};

const INTERACT_ATTEMPTS: u32 = 5;

/// Click an object until `completed` reports success.
///
/// The completion predicate is evaluated against fresh snapshots; failure
/// after the attempt budget surfaces the object and area names.
pub fn interact_object(
    ctx: &mut Ctx,
    object: &Object,
    mut completed: impl FnMut(&Ctx) -> bool,
) -> NavResult<()> {
    for attempt in 0..INTERACT_ATTEMPTS {
        ctx.check_player_death()?;
        if completed(ctx) {
            return Ok(());
        }

        let (sx, sy) = ctx
            .pathfinder
            .game_coords_to_screen(&ctx.data, object.position.x - 1, object.position.y - 1);
        ctx.hid.move_pointer(sx, sy);
        ctx.hid.click(MouseButton::Left, sx, sy);

        sleep_ms(300 + ctx.data.ping as u64);
        ctx.refresh_game_data();

        if attempt > 0 {
            debug!(attempt, object = label(object.name), "retrying object interaction");
        }
    }

    if completed(ctx) {
        return Ok(());
    }
    Err(NavError::ObjectInteraction {
        object: label(object.name),
        area: ctx.data.player.area.name(),
    })
}

/// Look an object up in the snapshot, refreshing a few times; some objects
/// take a moment to load after a transition.
pub fn find_object_with_retry(
    ctx: &mut Ctx,
    name: ObjectName,
    attempts: u32,
) -> NavResult<Object> {
    for _ in 0..attempts {
        if let Some(object) = ctx.data.find_object(name) {
            return Ok(object.clone());
        }
        ctx.refresh_game_data();
        sleep_ms(500);
    }

    ctx.data
        .find_object(name)
        .cloned()
        .ok_or(NavError::ObjectNotFound {
            object: label(name),
            area: ctx.data.player.area.name(),
        })
}

pub(crate) fn label(name: ObjectName) -> &'static str {
    match name {
        ObjectName::Waypoint => "waypoint",
        ObjectName::Shrine => "shrine",
        ObjectName::Chest => "chest",
        ObjectName::TownPortal => "town portal",
        ObjectName::PermanentTownPortal => "permanent town portal",
        ObjectName::ArcaneSanctuaryPortal => "arcane sanctuary portal",
        ObjectName::SummonerJournal => "summoner journal",
        ObjectName::CairnStoneAlpha => "cairn stone",
        ObjectName::InvisibleObject => "invisible object",
        ObjectName::TeleportationPad1
        | ObjectName::TeleportationPad2
        | ObjectName::TeleportationPad3
        | ObjectName::TeleportationPad4 => "teleportation pad",
        ObjectName::HoradricOrifice => "horadric orifice",
        ObjectName::DurielsLairPortal => "duriel's lair portal",
        ObjectName::AnyaTownPosition => "anya town position",
        ObjectName::Other => "object",
    }
}
