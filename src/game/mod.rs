//! Read surface of the game-state snapshot provider.
//!
//! The provider itself runs on its own thread outside the navigation core;
//! each `Ctx::refresh_game_data` publishes a fresh consistent `Data` view.

pub mod area;
pub mod grid;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::game::area::Area;
use crate::game::grid::Grid;

pub type UnitId = u64;

/// World-space tile coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(self) -> bool {
        self.x == 0 && self.y == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    /// Keybinding that casts a town portal scroll.
    TownPortal,
}

// ── Player ─────────────────────────────────────────────────────────

/// Timed states (buffs, curses, shrine effects) on the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    AmplifyDamage,
    LowerResist,
    Decrepify,
    ShrineExperience,
    ShrineManaRegen,
    ShrineStamina,
    ShrineSkill,
}

#[derive(Debug, Clone)]
pub struct PlayerUnit {
    pub position: Position,
    pub area: Area,
    pub states: Vec<PlayerState>,
    pub hp_percent: i32,
    pub mp_percent: i32,
    pub available_waypoints: Vec<Area>,
    pub stat_points: u32,
    pub dead: bool,
    pub low_stamina: bool,
}

impl PlayerUnit {
    pub fn has_state(&self, state: PlayerState) -> bool {
        self.states.contains(&state)
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }
}

impl Default for PlayerUnit {
    fn default() -> Self {
        Self {
            position: Position::default(),
            area: Area::RogueEncampment,
            states: Vec::new(),
            hp_percent: 100,
            mp_percent: 100,
            available_waypoints: Vec::new(),
            stat_points: 0,
            dead: false,
            low_stamina: false,
        }
    }
}

// ── World objects ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShrineType {
    Refill,
    Health,
    Mana,
    Experience,
    ManaRegen,
    Stamina,
    Skill,
    Armor,
    Combat,
    ResistLightning,
    ResistFire,
    ResistCold,
    ResistPoison,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectName {
    Waypoint,
    Shrine,
    Chest,
    TownPortal,
    PermanentTownPortal,
    ArcaneSanctuaryPortal,
    SummonerJournal,
    CairnStoneAlpha,
    InvisibleObject,
    TeleportationPad1,
    TeleportationPad2,
    TeleportationPad3,
    TeleportationPad4,
    HoradricOrifice,
    DurielsLairPortal,
    AnyaTownPosition,
    Other,
}

#[derive(Debug, Clone)]
pub struct Object {
    pub id: UnitId,
    pub name: ObjectName,
    pub position: Position,
    pub selectable: bool,
    pub shrine: Option<ShrineType>,
}

impl Object {
    pub fn is_waypoint(&self) -> bool {
        self.name == ObjectName::Waypoint
    }

    pub fn is_shrine(&self) -> bool {
        self.shrine.is_some()
    }

    pub fn is_chest(&self) -> bool {
        self.name == ObjectName::Chest
    }

    pub fn is_teleport_pad(&self) -> bool {
        matches!(
            self.name,
            ObjectName::TeleportationPad1
                | ObjectName::TeleportationPad2
                | ObjectName::TeleportationPad3
                | ObjectName::TeleportationPad4
        )
    }
}

// ── Monsters ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonsterKind {
    Regular,
    Minion,
    Champion,
    Unique,
    SuperUnique,
}

impl MonsterKind {
    pub fn label(self) -> &'static str {
        match self {
            MonsterKind::Regular => "regular",
            MonsterKind::Minion => "minion",
            MonsterKind::Champion => "champion",
            MonsterKind::Unique => "unique",
            MonsterKind::SuperUnique => "superunique",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Monster {
    pub id: UnitId,
    pub position: Position,
    pub kind: MonsterKind,
    pub hostile: bool,
}

/// Pluggable predicate narrowing which monsters combat should engage.
pub type MonsterFilter = Arc<dyn Fn(&[Monster]) -> Vec<Monster> + Send + Sync>;

// ── Levels and areas ───────────────────────────────────────────────

/// Adjacent-level entry: a boundary to another area, as reported by the
/// snapshot provider from current or cached map data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    pub area: Area,
    pub position: Position,
    pub is_entrance: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AreaData {
    pub area: Option<Area>,
    pub offset_x: i32,
    pub offset_y: i32,
    pub grid: Option<Arc<Grid>>,
    pub adjacent_levels: Vec<Level>,
    pub objects: Vec<Object>,
}

impl AreaData {
    /// Whether the world position lies within this area's grid bounds.
    pub fn is_inside(&self, p: Position) -> bool {
        let Some(grid) = &self.grid else {
            return false;
        };
        p.x >= self.offset_x
            && p.y >= self.offset_y
            && p.x < self.offset_x + grid.width as i32
            && p.y < self.offset_y + grid.height as i32
    }
}

// ── Menus and hover ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct OpenMenus {
    pub waypoint: bool,
    pub loading_screen: bool,
    pub inventory: bool,
    pub character: bool,
    pub npc_interact: bool,
}

impl OpenMenus {
    /// True when any menu that blocks movement input is open.
    pub fn is_menu_open(&self) -> bool {
        self.waypoint || self.inventory || self.character || self.npc_interact
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HoverData {
    pub unit_type: u8,
    pub unit_id: UnitId,
    pub is_hovered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quest {
    Act1TheSearchForCain,
}

// ── The snapshot ───────────────────────────────────────────────────

/// One consistent view of the game state. Read-only once published.
#[derive(Debug, Clone)]
pub struct Data {
    pub is_ingame: bool,
    pub player: PlayerUnit,
    pub objects: Vec<Object>,
    pub monsters: Vec<Monster>,
    pub area_data: AreaData,
    pub areas: HashMap<Area, AreaData>,
    pub adjacent_levels: Vec<Level>,
    pub open_menus: OpenMenus,
    pub hover: HoverData,
    pub completed_quests: Vec<Quest>,
    pub can_teleport: bool,
    pub legacy_graphics: bool,
    pub ping: u32,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            is_ingame: true,
            player: PlayerUnit::default(),
            objects: Vec::new(),
            monsters: Vec::new(),
            area_data: AreaData::default(),
            areas: HashMap::new(),
            adjacent_levels: Vec::new(),
            open_menus: OpenMenus::default(),
            hover: HoverData::default(),
            completed_quests: Vec::new(),
            can_teleport: false,
            legacy_graphics: false,
            ping: 50,
        }
    }
}

impl Data {
    /// Teleport capability applies outside towns only.
    pub fn can_teleport(&self) -> bool {
        self.can_teleport && !self.player.area.is_town()
    }

    pub fn find_object(&self, name: ObjectName) -> Option<&Object> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn find_object_by_id(&self, id: UnitId) -> Option<&Object> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.iter().filter(|m| m.hostile)
    }

    pub fn quest_completed(&self, quest: Quest) -> bool {
        self.completed_quests.contains(&quest)
    }

    /// Whether `p` lies inside any town area known to the snapshot.
    pub fn is_position_in_town(&self, p: Position) -> bool {
        self.areas
            .iter()
            .any(|(area, data)| area.is_town() && data.is_inside(p))
            || (self.area_data.area.is_some_and(Area::is_town) && self.area_data.is_inside(p))
    }
}
