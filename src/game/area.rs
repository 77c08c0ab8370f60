use serde::{Deserialize, Serialize};

/// Screen address of a destination inside the waypoint menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaypointAddress {
    /// Act tab, 1..=5.
    pub tab: u8,
    /// Row inside the tab, 1..=9.
    pub row: u8,
}

/// Every region of the five-act overworld the router knows about.
///
/// The variant set mirrors the static adjacency table; the Area → act
/// mapping is total and fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Area {
    // ── Act 1 ───────────────────────────────────────────────────────
    RogueEncampment,
    MooMooFarm,
    BloodMoor,
    ColdPlains,
    BurialGrounds,
    Crypt,
    Mausoleum,
    StonyField,
    Tristram,
    DarkWood,
    BlackMarsh,
    TamoeHighland,
    MonasteryGate,
    OuterCloister,
    DenOfEvil,
    CaveLevel1,
    CaveLevel2,
    UndergroundPassageLevel1,
    UndergroundPassageLevel2,
    HoleLevel1,
    HoleLevel2,
    PitLevel1,
    PitLevel2,
    ForgottenTower,
    TowerCellarLevel1,
    TowerCellarLevel2,
    TowerCellarLevel3,
    TowerCellarLevel4,
    TowerCellarLevel5,
    Barracks,
    JailLevel1,
    JailLevel2,
    JailLevel3,
    InnerCloister,
    Cathedral,
    CatacombsLevel1,
    CatacombsLevel2,
    CatacombsLevel3,
    CatacombsLevel4,
    // ── Act 2 ───────────────────────────────────────────────────────
    LutGholein,
    RockyWaste,
    DryHills,
    FarOasis,
    LostCity,
    ValleyOfSnakes,
    CanyonOfTheMagi,
    SewersLevel1Act2,
    SewersLevel2Act2,
    SewersLevel3Act2,
    HaremLevel1,
    HaremLevel2,
    PalaceCellarLevel1,
    PalaceCellarLevel2,
    PalaceCellarLevel3,
    StonyTombLevel1,
    StonyTombLevel2,
    HallsOfTheDeadLevel1,
    HallsOfTheDeadLevel2,
    HallsOfTheDeadLevel3,
    ClawViperTempleLevel1,
    ClawViperTempleLevel2,
    MaggotLairLevel1,
    MaggotLairLevel2,
    MaggotLairLevel3,
    AncientTunnels,
    TalRashasTomb1,
    TalRashasTomb2,
    TalRashasTomb3,
    TalRashasTomb4,
    TalRashasTomb5,
    TalRashasTomb6,
    TalRashasTomb7,
    ArcaneSanctuary,
    DurielsLair,
    // ── Act 3 ───────────────────────────────────────────────────────
    KurastDocks,
    SpiderForest,
    SpiderCave,
    SpiderCavern,
    GreatMarsh,
    FlayerJungle,
    SwampyPitLevel1,
    SwampyPitLevel2,
    SwampyPitLevel3,
    FlayerDungeonLevel1,
    FlayerDungeonLevel2,
    FlayerDungeonLevel3,
    LowerKurast,
    KurastBazaar,
    RuinedTemple,
    DisusedFane,
    SewersLevel1Act3,
    SewersLevel2Act3,
    UpperKurast,
    ForgottenTemple,
    ForgottenReliquary,
    KurastCauseway,
    RuinedFane,
    DisusedReliquary,
    Travincal,
    DuranceOfHateLevel1,
    DuranceOfHateLevel2,
    DuranceOfHateLevel3,
    // ── Act 4 ───────────────────────────────────────────────────────
    ThePandemoniumFortress,
    OuterSteppes,
    PlainsOfDespair,
    CityOfTheDamned,
    RiverOfFlame,
    ChaosSanctuary,
    // ── Act 5 ───────────────────────────────────────────────────────
    Harrogath,
    BloodyFoothills,
    FrigidHighlands,
    Abaddon,
    ArreatPlateau,
    PitOfAcheron,
    CrystallinePassage,
    FrozenRiver,
    GlacialTrail,
    DrifterCavern,
    FrozenTundra,
    InfernalPit,
    TheAncientsWay,
    IcyCellar,
    ArreatSummit,
    NihlathaksTemple,
    HallsOfAnguish,
    HallsOfPain,
    HallsOfVaught,
    TheWorldStoneKeepLevel1,
    TheWorldStoneKeepLevel2,
    TheWorldStoneKeepLevel3,
    ThroneOfDestruction,
}

impl Area {
    /// The act this area belongs to, 1..=5. Total over all variants.
    pub fn act(self) -> u8 {
        use Area::*;
        match self {
            RogueEncampment | MooMooFarm | BloodMoor | ColdPlains | BurialGrounds | Crypt
            | Mausoleum | StonyField | Tristram | DarkWood | BlackMarsh | TamoeHighland
            | MonasteryGate | OuterCloister | DenOfEvil | CaveLevel1 | CaveLevel2
            | UndergroundPassageLevel1 | UndergroundPassageLevel2 | HoleLevel1 | HoleLevel2
            | PitLevel1 | PitLevel2 | ForgottenTower | TowerCellarLevel1 | TowerCellarLevel2
            | TowerCellarLevel3 | TowerCellarLevel4 | TowerCellarLevel5 | Barracks
            | JailLevel1 | JailLevel2 | JailLevel3 | InnerCloister | Cathedral
            | CatacombsLevel1 | CatacombsLevel2 | CatacombsLevel3 | CatacombsLevel4 => 1,

            LutGholein | RockyWaste | DryHills | FarOasis | LostCity | ValleyOfSnakes
            | CanyonOfTheMagi | SewersLevel1Act2 | SewersLevel2Act2 | SewersLevel3Act2
            | HaremLevel1 | HaremLevel2 | PalaceCellarLevel1 | PalaceCellarLevel2
            | PalaceCellarLevel3 | StonyTombLevel1 | StonyTombLevel2 | HallsOfTheDeadLevel1
            | HallsOfTheDeadLevel2 | HallsOfTheDeadLevel3 | ClawViperTempleLevel1
            | ClawViperTempleLevel2 | MaggotLairLevel1 | MaggotLairLevel2 | MaggotLairLevel3
            | AncientTunnels | TalRashasTomb1 | TalRashasTomb2 | TalRashasTomb3
            | TalRashasTomb4 | TalRashasTomb5 | TalRashasTomb6 | TalRashasTomb7
            | ArcaneSanctuary | DurielsLair => 2,

            KurastDocks | SpiderForest | SpiderCave | SpiderCavern | GreatMarsh
            | FlayerJungle | SwampyPitLevel1 | SwampyPitLevel2 | SwampyPitLevel3
            | FlayerDungeonLevel1 | FlayerDungeonLevel2 | FlayerDungeonLevel3 | LowerKurast
            | KurastBazaar | RuinedTemple | DisusedFane | SewersLevel1Act3
            | SewersLevel2Act3 | UpperKurast | ForgottenTemple | ForgottenReliquary
            | KurastCauseway | RuinedFane | DisusedReliquary | Travincal
            | DuranceOfHateLevel1 | DuranceOfHateLevel2 | DuranceOfHateLevel3 => 3,

            ThePandemoniumFortress | OuterSteppes | PlainsOfDespair | CityOfTheDamned
            | RiverOfFlame | ChaosSanctuary => 4,

            Harrogath | BloodyFoothills | FrigidHighlands | Abaddon | ArreatPlateau
            | PitOfAcheron | CrystallinePassage | FrozenRiver | GlacialTrail
            | DrifterCavern | FrozenTundra | InfernalPit | TheAncientsWay | IcyCellar
            | ArreatSummit | NihlathaksTemple | HallsOfAnguish | HallsOfPain
            | HallsOfVaught | TheWorldStoneKeepLevel1 | TheWorldStoneKeepLevel2
            | TheWorldStoneKeepLevel3 | ThroneOfDestruction => 5,
        }
    }

    pub fn is_town(self) -> bool {
        matches!(
            self,
            Area::RogueEncampment
                | Area::LutGholein
                | Area::KurastDocks
                | Area::ThePandemoniumFortress
                | Area::Harrogath
        )
    }

    /// The act's town, reachable from any waypoint tab.
    pub fn town_of_act(act: u8) -> Option<Area> {
        match act {
            1 => Some(Area::RogueEncampment),
            2 => Some(Area::LutGholein),
            3 => Some(Area::KurastDocks),
            4 => Some(Area::ThePandemoniumFortress),
            5 => Some(Area::Harrogath),
            _ => None,
        }
    }

    /// Waypoint-menu address of this area, when it hosts a waypoint.
    pub fn waypoint_address(self) -> Option<WaypointAddress> {
        use Area::*;
        let (tab, row) = match self {
            RogueEncampment => (1, 1),
            ColdPlains => (1, 2),
            StonyField => (1, 3),
            DarkWood => (1, 4),
            BlackMarsh => (1, 5),
            OuterCloister => (1, 6),
            JailLevel1 => (1, 7),
            InnerCloister => (1, 8),
            CatacombsLevel2 => (1, 9),
            LutGholein => (2, 1),
            SewersLevel2Act2 => (2, 2),
            DryHills => (2, 3),
            HallsOfTheDeadLevel2 => (2, 4),
            FarOasis => (2, 5),
            LostCity => (2, 6),
            PalaceCellarLevel1 => (2, 7),
            ArcaneSanctuary => (2, 8),
            CanyonOfTheMagi => (2, 9),
            KurastDocks => (3, 1),
            SpiderForest => (3, 2),
            GreatMarsh => (3, 3),
            FlayerJungle => (3, 4),
            LowerKurast => (3, 5),
            KurastBazaar => (3, 6),
            UpperKurast => (3, 7),
            Travincal => (3, 8),
            DuranceOfHateLevel2 => (3, 9),
            ThePandemoniumFortress => (4, 1),
            CityOfTheDamned => (4, 2),
            RiverOfFlame => (4, 3),
            Harrogath => (5, 1),
            FrigidHighlands => (5, 2),
            ArreatPlateau => (5, 3),
            CrystallinePassage => (5, 4),
            GlacialTrail => (5, 5),
            HallsOfPain => (5, 6),
            FrozenTundra => (5, 7),
            TheAncientsWay => (5, 8),
            TheWorldStoneKeepLevel2 => (5, 9),
            _ => return None,
        };
        Some(WaypointAddress { tab, row })
    }

    pub fn has_waypoint(self) -> bool {
        self.waypoint_address().is_some()
    }

    /// Human-readable name used in logs and error messages.
    pub fn name(self) -> &'static str {
        use Area::*;
        match self {
            RogueEncampment => "Rogue Encampment",
            MooMooFarm => "Moo Moo Farm",
            BloodMoor => "Blood Moor",
            ColdPlains => "Cold Plains",
            BurialGrounds => "Burial Grounds",
            Crypt => "Crypt",
            Mausoleum => "Mausoleum",
            StonyField => "Stony Field",
            Tristram => "Tristram",
            DarkWood => "Dark Wood",
            BlackMarsh => "Black Marsh",
            TamoeHighland => "Tamoe Highland",
            MonasteryGate => "Monastery Gate",
            OuterCloister => "Outer Cloister",
            DenOfEvil => "Den of Evil",
            CaveLevel1 => "Cave Level 1",
            CaveLevel2 => "Cave Level 2",
            UndergroundPassageLevel1 => "Underground Passage Level 1",
            UndergroundPassageLevel2 => "Underground Passage Level 2",
            HoleLevel1 => "Hole Level 1",
            HoleLevel2 => "Hole Level 2",
            PitLevel1 => "Pit Level 1",
            PitLevel2 => "Pit Level 2",
            ForgottenTower => "Forgotten Tower",
            TowerCellarLevel1 => "Tower Cellar Level 1",
            TowerCellarLevel2 => "Tower Cellar Level 2",
            TowerCellarLevel3 => "Tower Cellar Level 3",
            TowerCellarLevel4 => "Tower Cellar Level 4",
            TowerCellarLevel5 => "Tower Cellar Level 5",
            Barracks => "Barracks",
            JailLevel1 => "Jail Level 1",
            JailLevel2 => "Jail Level 2",
            JailLevel3 => "Jail Level 3",
            InnerCloister => "Inner Cloister",
            Cathedral => "Cathedral",
            CatacombsLevel1 => "Catacombs Level 1",
            CatacombsLevel2 => "Catacombs Level 2",
            CatacombsLevel3 => "Catacombs Level 3",
            CatacombsLevel4 => "Catacombs Level 4",
            LutGholein => "Lut Gholein",
            RockyWaste => "Rocky Waste",
            DryHills => "Dry Hills",
            FarOasis => "Far Oasis",
            LostCity => "Lost City",
            ValleyOfSnakes => "Valley of Snakes",
            CanyonOfTheMagi => "Canyon of the Magi",
            SewersLevel1Act2 => "Sewers Level 1",
            SewersLevel2Act2 => "Sewers Level 2",
            SewersLevel3Act2 => "Sewers Level 3",
            HaremLevel1 => "Harem Level 1",
            HaremLevel2 => "Harem Level 2",
            PalaceCellarLevel1 => "Palace Cellar Level 1",
            PalaceCellarLevel2 => "Palace Cellar Level 2",
            PalaceCellarLevel3 => "Palace Cellar Level 3",
            StonyTombLevel1 => "Stony Tomb Level 1",
            StonyTombLevel2 => "Stony Tomb Level 2",
            HallsOfTheDeadLevel1 => "Halls of the Dead Level 1",
            HallsOfTheDeadLevel2 => "Halls of the Dead Level 2",
            HallsOfTheDeadLevel3 => "Halls of the Dead Level 3",
            ClawViperTempleLevel1 => "Claw Viper Temple Level 1",
            ClawViperTempleLevel2 => "Claw Viper Temple Level 2",
            MaggotLairLevel1 => "Maggot Lair Level 1",
            MaggotLairLevel2 => "Maggot Lair Level 2",
            MaggotLairLevel3 => "Maggot Lair Level 3",
            AncientTunnels => "Ancient Tunnels",
            TalRashasTomb1 => "Tal Rasha's Tomb 1",
            TalRashasTomb2 => "Tal Rasha's Tomb 2",
            TalRashasTomb3 => "Tal Rasha's Tomb 3",
            TalRashasTomb4 => "Tal Rasha's Tomb 4",
            TalRashasTomb5 => "Tal Rasha's Tomb 5",
            TalRashasTomb6 => "Tal Rasha's Tomb 6",
            TalRashasTomb7 => "Tal Rasha's Tomb 7",
            ArcaneSanctuary => "Arcane Sanctuary",
            DurielsLair => "Duriel's Lair",
            KurastDocks => "Kurast Docks",
            SpiderForest => "Spider Forest",
            SpiderCave => "Spider Cave",
            SpiderCavern => "Spider Cavern",
            GreatMarsh => "Great Marsh",
            FlayerJungle => "Flayer Jungle",
            SwampyPitLevel1 => "Swampy Pit Level 1",
            SwampyPitLevel2 => "Swampy Pit Level 2",
            SwampyPitLevel3 => "Swampy Pit Level 3",
            FlayerDungeonLevel1 => "Flayer Dungeon Level 1",
            FlayerDungeonLevel2 => "Flayer Dungeon Level 2",
            FlayerDungeonLevel3 => "Flayer Dungeon Level 3",
            LowerKurast => "Lower Kurast",
            KurastBazaar => "Kurast Bazaar",
            RuinedTemple => "Ruined Temple",
            DisusedFane => "Disused Fane",
            SewersLevel1Act3 => "Sewers Level 1",
            SewersLevel2Act3 => "Sewers Level 2",
            UpperKurast => "Upper Kurast",
            ForgottenTemple => "Forgotten Temple",
            ForgottenReliquary => "Forgotten Reliquary",
            KurastCauseway => "Kurast Causeway",
            RuinedFane => "Ruined Fane",
            DisusedReliquary => "Disused Reliquary",
            Travincal => "Travincal",
            DuranceOfHateLevel1 => "Durance of Hate Level 1",
            DuranceOfHateLevel2 => "Durance of Hate Level 2",
            DuranceOfHateLevel3 => "Durance of Hate Level 3",
            ThePandemoniumFortress => "The Pandemonium Fortress",
            OuterSteppes => "Outer Steppes",
            PlainsOfDespair => "Plains of Despair",
            CityOfTheDamned => "City of the Damned",
            RiverOfFlame => "River of Flame",
            ChaosSanctuary => "Chaos Sanctuary",
            Harrogath => "Harrogath",
            BloodyFoothills => "Bloody Foothills",
            FrigidHighlands => "Frigid Highlands",
            Abaddon => "Abaddon",
            ArreatPlateau => "Arreat Plateau",
            PitOfAcheron => "Pit of Acheron",
            CrystallinePassage => "Crystalline Passage",
            FrozenRiver => "Frozen River",
            GlacialTrail => "Glacial Trail",
            DrifterCavern => "Drifter Cavern",
            FrozenTundra => "Frozen Tundra",
            InfernalPit => "Infernal Pit",
            TheAncientsWay => "The Ancients' Way",
            IcyCellar => "Icy Cellar",
            ArreatSummit => "Arreat Summit",
            NihlathaksTemple => "Nihlathak's Temple",
            HallsOfAnguish => "Halls of Anguish",
            HallsOfPain => "Halls of Pain",
            HallsOfVaught => "Halls of Vaught",
            TheWorldStoneKeepLevel1 => "The Worldstone Keep Level 1",
            TheWorldStoneKeepLevel2 => "The Worldstone Keep Level 2",
            TheWorldStoneKeepLevel3 => "The Worldstone Keep Level 3",
            ThroneOfDestruction => "Throne of Destruction",
        }
    }
}

impl std::fmt::Display for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn towns_map_to_their_acts() {
        for act in 1..=5 {
            let town = Area::town_of_act(act).unwrap();
            assert!(town.is_town());
            assert_eq!(town.act(), act);
        }
        assert!(Area::town_of_act(6).is_none());
    }

    #[test]
    fn waypoint_addresses_match_their_act_tab() {
        for area in [
            Area::ColdPlains,
            Area::CanyonOfTheMagi,
            Area::Travincal,
            Area::RiverOfFlame,
            Area::TheWorldStoneKeepLevel2,
        ] {
            let addr = area.waypoint_address().unwrap();
            assert_eq!(addr.tab, area.act());
            assert!((1..=9).contains(&addr.row));
        }
        assert!(Area::Tristram.waypoint_address().is_none());
    }
}
