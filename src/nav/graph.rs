//! Inter-area routing: the hand-maintained adjacency table, plain BFS for
//! waypoint-independent routes, and the weighted route used by travel.

use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::cmp::Reverse;
use std::sync::{OnceLock, RwLock};

use crate::errors::{NavError, NavResult};
use crate::game::area::{Area, WaypointAddress};
use crate::game::Data;

// Edge costs in tenths, so the priority queue can stay on integers:
// physical hop 1.0, waypoint hop 1.1 (teleporting) / 2.0 (walking),
// town portal 1.5.
const ADJACENCY_COST: u32 = 10;
const WAYPOINT_TELEPORT_COST: u32 = 11;
const WAYPOINT_WALK_COST: u32 = 20;
const TOWN_PORTAL_COST: u32 = 15;

/// Areas from which Nihlathak's Temple can be entered without routing
/// through Harrogath.
pub const CAN_REACH_NIHLATHAK_TEMPLE_FROM: &[Area] = &[
    Area::HallsOfAnguish,
    Area::HallsOfPain,
    Area::HallsOfVaught,
];

/// Known transitions between areas, stored as outgoing lists. Bidirectional
/// in spirit, but callers must not assume symmetry.
fn build_static_adjacency() -> HashMap<Area, Vec<Area>> {
    use Area::*;

    let entries: &[(Area, &[Area])] = &[
        // ── Act 1 ───────────────────────────────────────────────────
        (MooMooFarm, &[RogueEncampment]),
        (RogueEncampment, &[BloodMoor, MooMooFarm]),
        (BloodMoor, &[RogueEncampment, ColdPlains, DenOfEvil]),
        (ColdPlains, &[BloodMoor, StonyField, CaveLevel1, BurialGrounds]),
        (BurialGrounds, &[ColdPlains, Crypt, Mausoleum]),
        (Crypt, &[BurialGrounds]),
        (Mausoleum, &[BurialGrounds]),
        (StonyField, &[ColdPlains, UndergroundPassageLevel1, Tristram]),
        (Tristram, &[StonyField]),
        (DarkWood, &[BlackMarsh, UndergroundPassageLevel1]),
        (BlackMarsh, &[DarkWood, TamoeHighland, HoleLevel1, ForgottenTower]),
        (TamoeHighland, &[BlackMarsh, MonasteryGate, PitLevel1]),
        (MonasteryGate, &[TamoeHighland, OuterCloister]),
        (OuterCloister, &[MonasteryGate, Barracks]),
        (DenOfEvil, &[BloodMoor]),
        (CaveLevel1, &[ColdPlains, CaveLevel2]),
        (CaveLevel2, &[CaveLevel1]),
        (UndergroundPassageLevel1, &[StonyField, DarkWood, UndergroundPassageLevel2]),
        (UndergroundPassageLevel2, &[UndergroundPassageLevel1]),
        (HoleLevel1, &[BlackMarsh, HoleLevel2]),
        (HoleLevel2, &[HoleLevel1]),
        (PitLevel1, &[TamoeHighland, PitLevel2]),
        (PitLevel2, &[PitLevel1]),
        (ForgottenTower, &[BlackMarsh, TowerCellarLevel1]),
        (TowerCellarLevel1, &[ForgottenTower, TowerCellarLevel2]),
        (TowerCellarLevel2, &[TowerCellarLevel1, TowerCellarLevel3]),
        (TowerCellarLevel3, &[TowerCellarLevel2, TowerCellarLevel4]),
        (TowerCellarLevel4, &[TowerCellarLevel3, TowerCellarLevel5]),
        (TowerCellarLevel5, &[TowerCellarLevel4]),
        (Barracks, &[OuterCloister, JailLevel1]),
        (JailLevel1, &[Barracks, JailLevel2]),
        (JailLevel2, &[JailLevel1, JailLevel3]),
        (JailLevel3, &[JailLevel2, InnerCloister]),
        (InnerCloister, &[JailLevel3, Cathedral]),
        (Cathedral, &[InnerCloister, CatacombsLevel1]),
        (CatacombsLevel1, &[Cathedral, CatacombsLevel2]),
        (CatacombsLevel2, &[CatacombsLevel1, CatacombsLevel3]),
        (CatacombsLevel3, &[CatacombsLevel2, CatacombsLevel4]),
        (CatacombsLevel4, &[CatacombsLevel3]),
        // ── Act 2 ───────────────────────────────────────────────────
        (LutGholein, &[RockyWaste, SewersLevel1Act2, HaremLevel1]),
        (RockyWaste, &[LutGholein, DryHills, StonyTombLevel1]),
        (DryHills, &[RockyWaste, FarOasis, HallsOfTheDeadLevel1]),
        (FarOasis, &[DryHills, LostCity, MaggotLairLevel1]),
        (LostCity, &[FarOasis, ValleyOfSnakes, AncientTunnels]),
        (ValleyOfSnakes, &[LostCity, ClawViperTempleLevel1]),
        (
            CanyonOfTheMagi,
            &[
                TalRashasTomb1,
                TalRashasTomb2,
                TalRashasTomb3,
                TalRashasTomb4,
                TalRashasTomb5,
                TalRashasTomb6,
                TalRashasTomb7,
            ],
        ),
        (SewersLevel1Act2, &[LutGholein, SewersLevel2Act2]),
        (SewersLevel2Act2, &[SewersLevel1Act2, SewersLevel3Act2]),
        (SewersLevel3Act2, &[SewersLevel2Act2]),
        (HaremLevel1, &[LutGholein, HaremLevel2]),
        (HaremLevel2, &[HaremLevel1, PalaceCellarLevel1]),
        (PalaceCellarLevel1, &[HaremLevel2, PalaceCellarLevel2]),
        (PalaceCellarLevel2, &[PalaceCellarLevel1, PalaceCellarLevel3]),
        (PalaceCellarLevel3, &[PalaceCellarLevel2, ArcaneSanctuary]),
        (StonyTombLevel1, &[RockyWaste, StonyTombLevel2]),
        (StonyTombLevel2, &[StonyTombLevel1]),
        (HallsOfTheDeadLevel1, &[DryHills, HallsOfTheDeadLevel2]),
        (HallsOfTheDeadLevel2, &[HallsOfTheDeadLevel1, HallsOfTheDeadLevel3]),
        (HallsOfTheDeadLevel3, &[HallsOfTheDeadLevel2]),
        (ClawViperTempleLevel1, &[ValleyOfSnakes, ClawViperTempleLevel2]),
        (ClawViperTempleLevel2, &[ClawViperTempleLevel1]),
        (MaggotLairLevel1, &[FarOasis, MaggotLairLevel2]),
        (MaggotLairLevel2, &[MaggotLairLevel1, MaggotLairLevel3]),
        (MaggotLairLevel3, &[MaggotLairLevel2]),
        (AncientTunnels, &[LostCity]),
        (TalRashasTomb1, &[CanyonOfTheMagi]),
        (TalRashasTomb2, &[CanyonOfTheMagi]),
        (TalRashasTomb3, &[CanyonOfTheMagi]),
        (TalRashasTomb4, &[CanyonOfTheMagi]),
        (TalRashasTomb5, &[CanyonOfTheMagi]),
        (TalRashasTomb6, &[CanyonOfTheMagi]),
        (TalRashasTomb7, &[CanyonOfTheMagi]),
        (ArcaneSanctuary, &[PalaceCellarLevel3, CanyonOfTheMagi]),
        // ── Act 3 ───────────────────────────────────────────────────
        (KurastDocks, &[SpiderForest]),
        (
            SpiderForest,
            &[KurastDocks, GreatMarsh, FlayerJungle, SpiderCave, SpiderCavern],
        ),
        (SpiderCave, &[SpiderForest]),
        (SpiderCavern, &[SpiderForest]),
        (GreatMarsh, &[SpiderForest, FlayerJungle]),
        (
            FlayerJungle,
            &[SpiderForest, GreatMarsh, LowerKurast, SwampyPitLevel1, FlayerDungeonLevel1],
        ),
        (SwampyPitLevel1, &[FlayerJungle, SwampyPitLevel2]),
        (SwampyPitLevel2, &[SwampyPitLevel1, SwampyPitLevel3]),
        (SwampyPitLevel3, &[SwampyPitLevel2]),
        (FlayerDungeonLevel1, &[FlayerJungle, FlayerDungeonLevel2]),
        (FlayerDungeonLevel2, &[FlayerDungeonLevel1, FlayerDungeonLevel3]),
        (FlayerDungeonLevel3, &[FlayerDungeonLevel2]),
        (LowerKurast, &[FlayerJungle, KurastBazaar]),
        (
            KurastBazaar,
            &[LowerKurast, UpperKurast, RuinedTemple, SewersLevel1Act3, DisusedFane],
        ),
        (RuinedTemple, &[KurastBazaar]),
        (DisusedFane, &[KurastBazaar]),
        (SewersLevel1Act3, &[KurastBazaar, UpperKurast, SewersLevel2Act3]),
        (SewersLevel2Act3, &[SewersLevel1Act3]),
        (
            UpperKurast,
            &[KurastBazaar, KurastCauseway, SewersLevel1Act3, ForgottenTemple, ForgottenReliquary],
        ),
        (ForgottenTemple, &[UpperKurast]),
        (ForgottenReliquary, &[UpperKurast]),
        (
            KurastCauseway,
            &[UpperKurast, Travincal, RuinedFane, DisusedReliquary],
        ),
        (RuinedFane, &[KurastCauseway]),
        (DisusedReliquary, &[KurastCauseway]),
        (Travincal, &[KurastCauseway, DuranceOfHateLevel1]),
        (DuranceOfHateLevel1, &[Travincal, DuranceOfHateLevel2]),
        (DuranceOfHateLevel2, &[DuranceOfHateLevel1, DuranceOfHateLevel3]),
        (DuranceOfHateLevel3, &[DuranceOfHateLevel2, ThePandemoniumFortress]),
        // ── Act 4 ───────────────────────────────────────────────────
        (ThePandemoniumFortress, &[OuterSteppes]),
        (OuterSteppes, &[ThePandemoniumFortress, PlainsOfDespair]),
        (PlainsOfDespair, &[OuterSteppes, CityOfTheDamned]),
        (CityOfTheDamned, &[PlainsOfDespair, RiverOfFlame]),
        (RiverOfFlame, &[CityOfTheDamned, ChaosSanctuary]),
        (ChaosSanctuary, &[RiverOfFlame]),
        // ── Act 5 ───────────────────────────────────────────────────
        (Harrogath, &[BloodyFoothills, NihlathaksTemple]),
        (BloodyFoothills, &[Harrogath, FrigidHighlands]),
        (FrigidHighlands, &[BloodyFoothills, ArreatPlateau, Abaddon]),
        (Abaddon, &[FrigidHighlands]),
        (ArreatPlateau, &[FrigidHighlands, CrystallinePassage, PitOfAcheron]),
        (PitOfAcheron, &[ArreatPlateau]),
        (CrystallinePassage, &[ArreatPlateau, FrozenRiver, GlacialTrail]),
        (FrozenRiver, &[CrystallinePassage]),
        (GlacialTrail, &[CrystallinePassage, DrifterCavern, FrozenTundra]),
        (DrifterCavern, &[GlacialTrail]),
        (FrozenTundra, &[GlacialTrail, TheAncientsWay, InfernalPit]),
        (InfernalPit, &[FrozenTundra]),
        (TheAncientsWay, &[FrozenTundra, IcyCellar, ArreatSummit]),
        (IcyCellar, &[TheAncientsWay]),
        (ArreatSummit, &[TheAncientsWay, TheWorldStoneKeepLevel1]),
        (NihlathaksTemple, &[Harrogath, HallsOfAnguish]),
        (HallsOfAnguish, &[NihlathaksTemple, HallsOfPain]),
        (HallsOfPain, &[HallsOfAnguish, HallsOfVaught]),
        (HallsOfVaught, &[HallsOfPain]),
        (TheWorldStoneKeepLevel1, &[ArreatSummit, TheWorldStoneKeepLevel2]),
        (TheWorldStoneKeepLevel2, &[TheWorldStoneKeepLevel1, TheWorldStoneKeepLevel3]),
        (TheWorldStoneKeepLevel3, &[TheWorldStoneKeepLevel2, ThroneOfDestruction]),
        (ThroneOfDestruction, &[TheWorldStoneKeepLevel3]),
    ];

    entries
        .iter()
        .map(|(area, list)| (*area, list.to_vec()))
        .collect()
}

static STATIC_ADJACENCY: OnceLock<RwLock<HashMap<Area, Vec<Area>>>> = OnceLock::new();

fn table() -> &'static RwLock<HashMap<Area, Vec<Area>>> {
    STATIC_ADJACENCY.get_or_init(|| RwLock::new(build_static_adjacency()))
}

/// Defensive copy of the static outgoing edges of `area`.
pub fn static_neighbors(area: Area) -> Vec<Area> {
    table()
        .read()
        .unwrap()
        .get(&area)
        .cloned()
        .unwrap_or_default()
}

/// Classic BFS over static edges only; used when a route must not depend
/// on runtime state.
pub fn static_area_path(start: Area, goal: Area) -> Option<Vec<Area>> {
    if start == goal {
        return Some(vec![start]);
    }

    let mut queue = VecDeque::from([start]);
    let mut visited = HashSet::from([start]);
    let mut prev: HashMap<Area, Area> = HashMap::new();

    while let Some(current) = queue.pop_front() {
        for next in static_neighbors(current) {
            if !visited.insert(next) {
                continue;
            }
            prev.insert(next, current);
            if next == goal {
                return Some(reconstruct(&prev, start, goal));
            }
            queue.push_back(next);
        }
    }

    None
}

fn reconstruct(prev: &HashMap<Area, Area>, start: Area, goal: Area) -> Vec<Area> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        let Some(&p) = prev.get(&current) else { break };
        path.push(p);
        current = p;
    }
    path.reverse();
    if path.first() != Some(&start) {
        path.insert(0, start);
    }
    path
}

/// Physical neighbors of `id`: live adjacency when it is the current area,
/// cached adjacency otherwise, unioned with the static table.
pub fn collect_neighbors(data: &Data, id: Area) -> Vec<Area> {
    let mut neighbors: HashSet<Area> = HashSet::new();

    if data.area_data.area == Some(id) {
        neighbors.extend(data.area_data.adjacent_levels.iter().map(|l| l.area));
    } else if let Some(cached) = data.areas.get(&id) {
        neighbors.extend(cached.adjacent_levels.iter().map(|l| l.area));
    }

    neighbors.extend(static_neighbors(id));
    neighbors.into_iter().collect()
}

fn available_waypoints(data: &Data) -> HashSet<Area> {
    data.player.available_waypoints.iter().copied().collect()
}

/// Waypoint destinations reachable from `id`: every other discovered
/// waypoint when `id` itself is discovered, plus the act's town always
/// (the town-portal simulation).
fn collect_waypoint_neighbors(id: Area, wp_set: &HashSet<Area>) -> Vec<Area> {
    let mut destinations: HashSet<Area> = HashSet::new();

    if wp_set.contains(&id) {
        destinations.extend(wp_set.iter().copied().filter(|&dest| dest != id));
    }

    if let Some(town) = Area::town_of_act(id.act()) {
        if town != id {
            destinations.insert(town);
        }
    }

    destinations.into_iter().collect()
}

fn waypoint_transition_cost(can_teleport: bool, to_town: bool) -> u32 {
    if to_town {
        TOWN_PORTAL_COST
    } else if can_teleport {
        WAYPOINT_TELEPORT_COST
    } else {
        WAYPOINT_WALK_COST
    }
}

fn neighbors_with_costs(
    data: &Data,
    id: Area,
    wp_set: &HashSet<Area>,
    allow_waypoints: bool,
) -> Vec<(Area, u32)> {
    let mut dedup: HashMap<Area, u32> = HashMap::new();

    for neighbor in collect_neighbors(data, id) {
        dedup.insert(neighbor, ADJACENCY_COST);
    }

    if allow_waypoints {
        let town = Area::town_of_act(id.act());
        for neighbor in collect_waypoint_neighbors(id, wp_set) {
            let cost = waypoint_transition_cost(data.can_teleport(), Some(neighbor) == town);
            dedup
                .entry(neighbor)
                .and_modify(|existing| *existing = (*existing).min(cost))
                .or_insert(cost);
        }
    }

    dedup.into_iter().collect()
}

/// Dijkstra over physical and waypoint edges; returns the full hop list
/// starting at the player's area.
pub fn build_area_route(data: &Data, dst: Area, allow_waypoints: bool) -> NavResult<Vec<Area>> {
    let start = data.player.area;
    if start == dst {
        return Ok(vec![dst]);
    }

    let wp_set = if allow_waypoints {
        available_waypoints(data)
    } else {
        HashSet::new()
    };

    let mut dist: HashMap<Area, u32> = HashMap::from([(start, 0)]);
    let mut prev: HashMap<Area, Area> = HashMap::new();
    let mut queue: BinaryHeap<Reverse<(u32, Area)>> = BinaryHeap::new();
    queue.push(Reverse((0, start)));

    while let Some(Reverse((cost, current))) = queue.pop() {
        if current == dst {
            break;
        }
        if cost > dist.get(&current).copied().unwrap_or(u32::MAX) {
            continue;
        }

        for (neighbor, edge) in neighbors_with_costs(data, current, &wp_set, allow_waypoints) {
            let alt = cost + edge;
            if alt < dist.get(&neighbor).copied().unwrap_or(u32::MAX) {
                dist.insert(neighbor, alt);
                prev.insert(neighbor, current);
                queue.push(Reverse((alt, neighbor)));
            }
        }
    }

    if !dist.contains_key(&dst) {
        return Err(NavError::RouteNotFound(dst.name()));
    }

    Ok(reconstruct(&prev, start, dst))
}

/// Backward BFS along static edges inside `dest`'s act for the closest
/// discovered waypoint. `Ok(None)` means: same act, walk instead.
pub fn nearest_waypoint_area(
    data: &Data,
    dest: Area,
) -> NavResult<Option<(Area, WaypointAddress)>> {
    let available = available_waypoints(data);

    if let Some(addr) = dest.waypoint_address() {
        if available.contains(&dest) {
            return Ok(Some((dest, addr)));
        }
    }

    let act = dest.act();
    let mut visited = HashSet::from([dest]);
    let mut queue = VecDeque::from([dest]);

    while let Some(current) = queue.pop_front() {
        for next in static_neighbors(current) {
            if next.act() != act || !visited.insert(next) {
                continue;
            }
            if let Some(addr) = next.waypoint_address() {
                if available.contains(&next) {
                    return Ok(Some((next, addr)));
                }
            }
            queue.push_back(next);
        }
    }

    if data.player.area.act() == act {
        return Ok(None);
    }
    Err(NavError::NoWaypointNear(dest.name()))
}

/// A node adjacent to both the current area and the destination, used to
/// re-plan when the destination's entrance is missing from the cache.
pub fn find_proxy_area(data: &Data, dst: Area) -> Option<Area> {
    let current = data.player.area;
    let current_neighbors: HashSet<Area> = collect_neighbors(data, current).into_iter().collect();

    static_neighbors(dst)
        .into_iter()
        .find(|&candidate| {
            candidate != dst && candidate != current && current_neighbors.contains(&candidate)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{AreaData, Level, Position};

    fn data_in(area: Area) -> Data {
        let mut data = Data::default();
        data.player.area = area;
        data
    }

    fn consecutive_edges_valid(data: &Data, route: &[Area]) {
        let wp_set = available_waypoints(data);
        for pair in route.windows(2) {
            let physical = collect_neighbors(data, pair[0]).contains(&pair[1]);
            let waypoint = collect_waypoint_neighbors(pair[0], &wp_set).contains(&pair[1]);
            assert!(
                physical || waypoint,
                "no edge between {} and {}",
                pair[0].name(),
                pair[1].name()
            );
        }
    }

    #[test]
    fn static_path_blood_moor_to_cathedral() {
        let path = static_area_path(Area::BloodMoor, Area::Cathedral).unwrap();
        assert_eq!(path.first(), Some(&Area::BloodMoor));
        assert_eq!(path[1], Area::ColdPlains);
        assert_eq!(path[path.len() - 2], Area::InnerCloister);
        assert_eq!(path.last(), Some(&Area::Cathedral));
        for pair in path.windows(2) {
            assert!(
                static_neighbors(pair[0]).contains(&pair[1]),
                "{} -> {} is not a static edge",
                pair[0].name(),
                pair[1].name()
            );
        }
    }

    #[test]
    fn static_path_identity() {
        assert_eq!(
            static_area_path(Area::Tristram, Area::Tristram),
            Some(vec![Area::Tristram])
        );
    }

    #[test]
    fn weighted_route_without_waypoints_walks() {
        let data = data_in(Area::BloodMoor);
        let route = build_area_route(&data, Area::Cathedral, true).unwrap();
        assert_eq!(route.first(), Some(&Area::BloodMoor));
        assert_eq!(route.last(), Some(&Area::Cathedral));
        consecutive_edges_valid(&data, &route);
    }

    #[test]
    fn weighted_route_prefers_waypoint_hop() {
        let mut data = data_in(Area::ColdPlains);
        data.can_teleport = true;
        data.player.available_waypoints = vec![
            Area::RogueEncampment,
            Area::ColdPlains,
            Area::InnerCloister,
        ];

        let route = build_area_route(&data, Area::Cathedral, true).unwrap();
        assert_eq!(
            route,
            vec![Area::ColdPlains, Area::InnerCloister, Area::Cathedral]
        );
        consecutive_edges_valid(&data, &route);
    }

    #[test]
    fn waypoint_edges_need_a_discovered_source() {
        // Same trip, but the Cold Plains waypoint was never touched: the
        // only waypoint edge out of Cold Plains is the town portal, so the
        // route detours through town instead of hopping directly.
        let mut data = data_in(Area::ColdPlains);
        data.can_teleport = true;
        data.player.available_waypoints = vec![Area::RogueEncampment, Area::InnerCloister];

        let route = build_area_route(&data, Area::Cathedral, true).unwrap();
        assert!(route.len() > 3);
        consecutive_edges_valid(&data, &route);
    }

    #[test]
    fn dynamic_adjacency_is_merged() {
        let mut data = data_in(Area::BloodMoor);
        data.area_data = AreaData {
            area: Some(Area::BloodMoor),
            adjacent_levels: vec![Level {
                area: Area::Tristram,
                position: Position::new(1000, 1000),
                is_entrance: false,
            }],
            ..AreaData::default()
        };

        let neighbors = collect_neighbors(&data, Area::BloodMoor);
        assert!(neighbors.contains(&Area::Tristram));
        assert!(neighbors.contains(&Area::ColdPlains));
    }

    #[test]
    fn route_is_unreachable_without_any_edge() {
        // Act 4 is only reachable through Durance of Hate or a waypoint;
        // with no waypoints and no dynamic data, act 1 cannot reach it.
        let data = data_in(Area::BloodMoor);
        let err = build_area_route(&data, Area::ChaosSanctuary, false).unwrap_err();
        assert!(matches!(err, NavError::RouteNotFound(_)));
    }

    #[test]
    fn town_portal_edge_allows_cross_act_route() {
        let mut data = data_in(Area::BloodMoor);
        data.player.available_waypoints = vec![Area::RogueEncampment, Area::KurastDocks];
        let route = build_area_route(&data, Area::SpiderForest, true).unwrap();
        // Town portal to Rogue Encampment, waypoint to Kurast Docks, walk on.
        assert_eq!(route[1], Area::RogueEncampment);
        assert!(route.contains(&Area::KurastDocks));
        assert_eq!(route.last(), Some(&Area::SpiderForest));
    }

    #[test]
    fn nearest_waypoint_stays_in_act() {
        let mut data = data_in(Area::LutGholein);
        data.player.available_waypoints = vec![Area::LutGholein, Area::CanyonOfTheMagi];

        let (area, addr) = nearest_waypoint_area(&data, Area::TalRashasTomb4)
            .unwrap()
            .unwrap();
        assert_eq!(area, Area::CanyonOfTheMagi);
        assert_eq!(area.act(), Area::TalRashasTomb4.act());
        assert_eq!(addr, Area::CanyonOfTheMagi.waypoint_address().unwrap());
    }

    #[test]
    fn nearest_waypoint_walks_when_act_has_none_discovered() {
        let mut data = data_in(Area::BloodMoor);
        data.player.available_waypoints = vec![];
        assert_eq!(nearest_waypoint_area(&data, Area::Cathedral).unwrap(), None);

        // Different act with nothing discovered: surfaced as an error.
        let err = nearest_waypoint_area(&data, Area::Travincal).unwrap_err();
        assert!(matches!(err, NavError::NoWaypointNear(_)));
    }

    #[test]
    fn proxy_area_shares_both_adjacencies() {
        // Standing in Cold Plains, targeting Crypt (adjacent to Burial
        // Grounds): Burial Grounds is adjacent to both sides.
        let data = data_in(Area::ColdPlains);
        assert_eq!(find_proxy_area(&data, Area::Crypt), Some(Area::BurialGrounds));
        assert_eq!(find_proxy_area(&data, Area::ChaosSanctuary), None);
    }
}
