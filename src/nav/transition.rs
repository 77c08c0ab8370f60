//! Non-standard area transitions, one strategy per (from, to) pair.
//!
//! Each strategy walks the avatar to the trigger object (`approach`) and
//! then drives the object interaction until the transition verifies
//! (`trigger`). The registry keeps the quest knowledge out of the
//! movement loop.

use tracing::debug;

use crate::context::{sleep_ms, Ctx};
use crate::errors::NavResult;
use crate::game::area::Area;
use crate::game::{ObjectName, Position, Quest};
use crate::nav::movement::move_to_coords;
use crate::nav::step::MoveOpts;
use crate::nav::{find_object_with_retry, interact_object};

pub trait TransitionStrategy: Send + Sync {
    /// Bring the avatar next to the trigger.
    fn approach(&self, ctx: &mut Ctx) -> NavResult<()>;

    /// Fire the transition and verify arrival.
    fn trigger(&self, ctx: &mut Ctx) -> NavResult<()>;
}

/// Strategy lookup for a hop from `from` to `to`, when that hop is not an
/// ordinary walk-over entrance.
pub fn strategy_for(
    ctx: &Ctx,
    from: Area,
    to: Area,
) -> Option<Box<dyn TransitionStrategy>> {
    use Area::*;

    match (from, to) {
        (PalaceCellarLevel3, ArcaneSanctuary) | (ArcaneSanctuary, PalaceCellarLevel3) => {
            Some(Box::new(ArcanePortal { dst: to }))
        }
        (ArcaneSanctuary, CanyonOfTheMagi) => Some(Box::new(SummonerTomePortal)),
        (NihlathaksTemple, Harrogath) => Some(Box::new(TempleExitPortal)),
        (Harrogath, NihlathaksTemple) => Some(Box::new(AnyaRedPortal)),
        (StonyField, Tristram) if ctx.data.quest_completed(Quest::Act1TheSearchForCain) => {
            Some(Box::new(CairnStonePortal))
        }
        _ => None,
    }
}

// ── Arcane Sanctuary <-> Palace Cellar 3 ───────────────────────────

struct ArcanePortal {
    dst: Area,
}

impl TransitionStrategy for ArcanePortal {
    fn approach(&self, ctx: &mut Ctx) -> NavResult<()> {
        let portal = find_object_with_retry(ctx, ObjectName::ArcaneSanctuaryPortal, 2)?;
        move_to_coords(ctx, portal.position, MoveOpts::new())
    }

    fn trigger(&self, ctx: &mut Ctx) -> NavResult<()> {
        let portal = find_object_with_retry(ctx, ObjectName::ArcaneSanctuaryPortal, 2)?;
        let dst = self.dst;
        interact_object(ctx, &portal, |ctx| ctx.data.player.area == dst)
    }
}

// ── Arcane Sanctuary -> Canyon of the Magi ─────────────────────────

/// The summoner's tome spawns a permanent portal to the canyon when read.
struct SummonerTomePortal;

impl TransitionStrategy for SummonerTomePortal {
    fn approach(&self, ctx: &mut Ctx) -> NavResult<()> {
        let tome = find_object_with_retry(ctx, ObjectName::SummonerJournal, 2)?;
        move_to_coords(ctx, tome.position, MoveOpts::new())?;
        interact_object(ctx, &tome, |ctx| {
            ctx.data.find_object(ObjectName::PermanentTownPortal).is_some()
        })
    }

    fn trigger(&self, ctx: &mut Ctx) -> NavResult<()> {
        let portal = find_object_with_retry(ctx, ObjectName::PermanentTownPortal, 2)?;
        move_to_coords(ctx, portal.position, MoveOpts::new())?;
        interact_object(ctx, &portal, |ctx| {
            ctx.data.player.area == Area::CanyonOfTheMagi
        })
    }
}

// ── Nihlathak's Temple -> Harrogath ────────────────────────────────

/// The temple exit is a red portal at a fixed spot near the entrance hall.
struct TempleExitPortal;

const TEMPLE_PORTAL_POSITION: Position = Position { x: 10068, y: 13308 };

impl TransitionStrategy for TempleExitPortal {
    fn approach(&self, ctx: &mut Ctx) -> NavResult<()> {
        debug!("leaving Nihlathak's Temple to Harrogath");
        move_to_coords(ctx, TEMPLE_PORTAL_POSITION, MoveOpts::new())?;
        ctx.refresh_game_data();
        sleep_ms(500);
        Ok(())
    }

    fn trigger(&self, ctx: &mut Ctx) -> NavResult<()> {
        let portal = find_object_with_retry(ctx, ObjectName::PermanentTownPortal, 2)?;
        move_to_coords(ctx, portal.position, MoveOpts::new())?;
        interact_object(ctx, &portal, |ctx| ctx.data.player.area == Area::Harrogath)
    }
}

// ── Harrogath -> Nihlathak's Temple ────────────────────────────────

/// Anya's red portal in town. Opening it when absent requires talking to
/// Anya, which quest scripts handle; here we walk to her spot and wait for
/// the portal object.
struct AnyaRedPortal;

impl TransitionStrategy for AnyaRedPortal {
    fn approach(&self, ctx: &mut Ctx) -> NavResult<()> {
        let anya = find_object_with_retry(ctx, ObjectName::AnyaTownPosition, 2)?;
        move_to_coords(ctx, anya.position, MoveOpts::new())
    }

    fn trigger(&self, ctx: &mut Ctx) -> NavResult<()> {
        let portal = find_object_with_retry(ctx, ObjectName::PermanentTownPortal, 3)?;
        interact_object(ctx, &portal, |ctx| {
            ctx.data.player.area == Area::NihlathaksTemple
                && ctx.data.area_data.is_inside(ctx.data.player.position)
        })
    }
}

// ── Stony Field -> Tristram ────────────────────────────────────────

/// After the Search for Cain, the cairn stones hold a permanent portal.
struct CairnStonePortal;

impl TransitionStrategy for CairnStonePortal {
    fn approach(&self, ctx: &mut Ctx) -> NavResult<()> {
        if ctx.data.find_object(ObjectName::PermanentTownPortal).is_some() {
            return Ok(());
        }

        ctx.refresh_game_data();
        let stone = ctx
            .data
            .find_object(ObjectName::CairnStoneAlpha)
            .or_else(|| ctx.data.find_object(ObjectName::InvisibleObject))
            .cloned();

        let Some(stone) = stone else {
            return Err(crate::errors::NavError::ObjectNotFound {
                object: "cairn stone",
                area: ctx.data.player.area.name(),
            });
        };

        move_to_coords(ctx, stone.position, MoveOpts::new())?;

        for _ in 0..3 {
            ctx.refresh_game_data();
            if ctx.data.find_object(ObjectName::PermanentTownPortal).is_some() {
                return Ok(());
            }
            sleep_ms(500);
        }
        Err(crate::errors::NavError::ObjectNotFound {
            object: "permanent town portal",
            area: ctx.data.player.area.name(),
        })
    }

    fn trigger(&self, ctx: &mut Ctx) -> NavResult<()> {
        let portal = find_object_with_retry(ctx, ObjectName::PermanentTownPortal, 2)?;
        move_to_coords(ctx, portal.position, MoveOpts::new())?;
        interact_object(ctx, &portal, |ctx| {
            ctx.data.player.area == Area::Tristram
                && ctx.data.area_data.is_inside(ctx.data.player.position)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::testkit::{FakeWorld, TestCtx};

    #[test]
    fn registry_covers_the_special_pairs() {
        let world = FakeWorld::walkable_field(Area::ArcaneSanctuary, 10, 10);
        let ctx = TestCtx::new(world).ctx;

        assert!(strategy_for(&ctx, Area::PalaceCellarLevel3, Area::ArcaneSanctuary).is_some());
        assert!(strategy_for(&ctx, Area::ArcaneSanctuary, Area::PalaceCellarLevel3).is_some());
        assert!(strategy_for(&ctx, Area::ArcaneSanctuary, Area::CanyonOfTheMagi).is_some());
        assert!(strategy_for(&ctx, Area::NihlathaksTemple, Area::Harrogath).is_some());
        assert!(strategy_for(&ctx, Area::Harrogath, Area::NihlathaksTemple).is_some());
        assert!(strategy_for(&ctx, Area::BloodMoor, Area::ColdPlains).is_none());
    }

    #[test]
    fn tristram_portal_is_quest_gated() {
        let world = FakeWorld::walkable_field(Area::StonyField, 10, 10);
        let mut harness = TestCtx::new(world);
        assert!(strategy_for(&harness.ctx, Area::StonyField, Area::Tristram).is_none());

        harness.world.mutate(|data| {
            data.completed_quests.push(Quest::Act1TheSearchForCain)
        });
        harness.ctx.refresh_game_data();
        assert!(strategy_for(&harness.ctx, Area::StonyField, Area::Tristram).is_some());
    }

    #[test]
    fn arcane_portal_trigger_verifies_destination() {
        let world = FakeWorld::walkable_field(Area::PalaceCellarLevel3, 10, 10);
        world.mutate(|data| {
            data.objects.push(crate::game::Object {
                id: 4,
                name: ObjectName::ArcaneSanctuaryPortal,
                position: Position::new(2, 2),
                selectable: true,
                shrine: None,
            });
        });
        world.set_click_hook(|data, _b, _x, _y| {
            data.player.area = Area::ArcaneSanctuary;
        });

        let mut ctx = TestCtx::new(world.clone()).ctx;
        let strategy = strategy_for(&ctx, Area::PalaceCellarLevel3, Area::ArcaneSanctuary).unwrap();
        strategy.approach(&mut ctx).unwrap();
        strategy.trigger(&mut ctx).unwrap();
        assert_eq!(ctx.data.player.area, Area::ArcaneSanctuary);
    }
}
