use serde::{Deserialize, Serialize};

/// Per-character configuration consumed by the navigation core.
///
/// The config store itself lives outside the core; these are the fields the
/// movement loop and transition protocol read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterCfg {
    pub character: CharacterSection,
    pub game: GameSection,
    pub health: HealthSection,
    pub packet_casting: PacketCastingSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterSection {
    /// Radius cleared of monsters around the player while walking.
    pub clear_path_dist: i32,
    /// Re-apply buffs after entering a new area.
    pub buff_on_new_area: bool,
    /// Re-apply buffs after arriving through a waypoint.
    pub buff_after_wp: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSection {
    pub interact_with_shrines: bool,
    pub interact_with_chests: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthSection {
    /// HP percentage at which the bot abandons the game.
    pub chicken_at: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacketCastingSection {
    /// Prefer the packet-based entrance interaction when available.
    pub use_for_entrance_interaction: bool,
}

impl Default for CharacterCfg {
    fn default() -> Self {
        Self {
            character: CharacterSection::default(),
            game: GameSection::default(),
            health: HealthSection::default(),
            packet_casting: PacketCastingSection::default(),
        }
    }
}

impl Default for CharacterSection {
    fn default() -> Self {
        Self {
            clear_path_dist: 7,
            buff_on_new_area: false,
            buff_after_wp: false,
        }
    }
}

impl Default for GameSection {
    fn default() -> Self {
        Self {
            interact_with_shrines: true,
            interact_with_chests: false,
        }
    }
}

impl Default for HealthSection {
    fn default() -> Self {
        Self { chicken_at: 30 }
    }
}

impl Default for PacketCastingSection {
    fn default() -> Self {
        Self {
            use_for_entrance_interaction: false,
        }
    }
}
