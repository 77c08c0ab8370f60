//! Shrine selection for the movement loop.

use crate::config::CharacterCfg;
use crate::game::area::Area;
use crate::game::{Data, Object, PlayerState, ShrineType};
use crate::pathing::distance;

/// Resource shrines worth a detour whenever the pools are not full.
const ALWAYS_TAKE: &[ShrineType] = &[ShrineType::Refill, ShrineType::Health, ShrineType::Mana];

/// Buff shrines ordered by priority; taking one replaces any lower entry
/// currently active on the player.
const PRIORITIZED: &[(ShrineType, PlayerState)] = &[
    (ShrineType::Experience, PlayerState::ShrineExperience),
    (ShrineType::ManaRegen, PlayerState::ShrineManaRegen),
    (ShrineType::Stamina, PlayerState::ShrineStamina),
    (ShrineType::Skill, PlayerState::ShrineSkill),
];

/// Any shrine interaction clears these curses, so every buff shrine is a
/// candidate while cursed.
const CURSE_BREAKING: &[ShrineType] = &[
    ShrineType::Experience,
    ShrineType::ManaRegen,
    ShrineType::Stamina,
    ShrineType::Skill,
    ShrineType::Armor,
    ShrineType::Combat,
    ShrineType::ResistLightning,
    ShrineType::ResistFire,
    ShrineType::ResistCold,
    ShrineType::ResistPoison,
];

const CURSES: &[PlayerState] = &[
    PlayerState::AmplifyDamage,
    PlayerState::LowerResist,
    PlayerState::Decrepify,
];

fn closest_of(data: &Data, max_distance: i32, wanted: &[ShrineType]) -> Option<Object> {
    let player = data.player.position;
    data.objects
        .iter()
        .filter(|o| o.selectable)
        .filter(|o| o.shrine.is_some_and(|s| wanted.contains(&s)))
        .filter(|o| distance(o.position, player) < max_distance)
        .min_by_key(|o| distance(o.position, player))
        .cloned()
}

/// The shrine worth redirecting to right now, if any.
///
/// Curse-breaking shrines take priority while cursed; resource shrines are
/// taken below 95%; buff shrines only when they upgrade the current state.
pub fn find_closest_shrine(data: &Data, cfg: &CharacterCfg, max_distance: i32) -> Option<Object> {
    if data.player.is_dead()
        || data.player.hp_percent <= cfg.health.chicken_at
        || data.player.area.is_town()
    {
        return None;
    }

    // The countess tower floor is a no-detour zone.
    if data.player.area == Area::TowerCellarLevel5 {
        return None;
    }

    if CURSES.iter().any(|&c| data.player.has_state(c)) {
        if let Some(shrine) = closest_of(data, max_distance, CURSE_BREAKING) {
            return Some(shrine);
        }
    }

    let player = data.player.position;
    let refill_candidate = data
        .objects
        .iter()
        .filter(|o| o.selectable)
        .filter(|o| {
            let Some(kind) = o.shrine else { return false };
            match kind {
                _ if !ALWAYS_TAKE.contains(&kind) => false,
                ShrineType::Health => data.player.hp_percent <= 95,
                ShrineType::Mana => data.player.mp_percent <= 95,
                ShrineType::Refill => data.player.hp_percent <= 95 || data.player.mp_percent <= 95,
                _ => true,
            }
        })
        .filter(|o| distance(o.position, player) < max_distance)
        .min_by_key(|o| distance(o.position, player))
        .cloned();
    if refill_candidate.is_some() {
        return refill_candidate;
    }

    let current_priority = PRIORITIZED
        .iter()
        .position(|(_, state)| data.player.has_state(*state));

    data.objects
        .iter()
        .filter(|o| o.selectable)
        .filter(|o| {
            let Some(kind) = o.shrine else { return false };
            match PRIORITIZED.iter().position(|(t, _)| *t == kind) {
                Some(idx) => current_priority.is_none_or(|cur| idx <= cur),
                None => false,
            }
        })
        .filter(|o| distance(o.position, player) < max_distance)
        .min_by_key(|o| distance(o.position, player))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;

    fn shrine(id: u64, kind: ShrineType, x: i32) -> Object {
        Object {
            id,
            name: crate::game::ObjectName::Shrine,
            position: Position::new(x, 0),
            selectable: true,
            shrine: Some(kind),
        }
    }

    fn field_data() -> (Data, CharacterCfg) {
        let mut data = Data::default();
        data.player.area = Area::BloodMoor;
        (data, CharacterCfg::default())
    }

    #[test]
    fn curse_breaking_wins_while_cursed() {
        let (mut data, cfg) = field_data();
        data.player.states.push(PlayerState::AmplifyDamage);
        data.objects.push(shrine(1, ShrineType::Health, 5));
        data.objects.push(shrine(2, ShrineType::Armor, 20));
        data.player.hp_percent = 50;

        let picked = find_closest_shrine(&data, &cfg, 50).unwrap();
        assert_eq!(picked.id, 2);
    }

    #[test]
    fn full_resources_skip_refill_shrines() {
        let (mut data, cfg) = field_data();
        data.objects.push(shrine(1, ShrineType::Health, 5));
        data.objects.push(shrine(2, ShrineType::Refill, 8));
        assert!(find_closest_shrine(&data, &cfg, 50).is_none());

        data.player.hp_percent = 60;
        let picked = find_closest_shrine(&data, &cfg, 50).unwrap();
        assert_eq!(picked.id, 1, "nearest applicable resource shrine wins");
    }

    #[test]
    fn prioritized_shrine_only_upgrades() {
        let (mut data, cfg) = field_data();
        data.player.states.push(PlayerState::ShrineManaRegen);
        data.objects.push(shrine(1, ShrineType::Skill, 5));
        assert!(
            find_closest_shrine(&data, &cfg, 50).is_none(),
            "skill shrine must not replace mana regen"
        );

        data.objects.push(shrine(2, ShrineType::Experience, 10));
        let picked = find_closest_shrine(&data, &cfg, 50).unwrap();
        assert_eq!(picked.id, 2);
    }

    #[test]
    fn no_shrines_in_town_or_when_chickened() {
        let (mut data, cfg) = field_data();
        data.objects.push(shrine(1, ShrineType::Experience, 5));
        data.player.area = Area::RogueEncampment;
        assert!(find_closest_shrine(&data, &cfg, 50).is_none());

        data.player.area = Area::BloodMoor;
        data.player.hp_percent = cfg.health.chicken_at;
        assert!(find_closest_shrine(&data, &cfg, 50).is_none());
    }

    #[test]
    fn scan_distance_bounds_the_search() {
        let (mut data, cfg) = field_data();
        data.objects.push(shrine(1, ShrineType::Experience, 80));
        assert!(find_closest_shrine(&data, &cfg, 50).is_none());
    }
}
