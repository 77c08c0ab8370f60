//! Navigation core for an isometric ARPG automation bot.
//!
//! Given a destination area, the core plans a route over the inter-area
//! graph, follows tile-level paths inside each area, and drives waypoint
//! menus and entrance prompts to cross boundaries. The game itself is
//! reached only through the trait seams in [`context`]: a snapshot
//! provider, a click surface, and the combat/loot engines.

pub mod config;
pub mod context;
pub mod errors;
pub mod game;
pub mod nav;
pub mod overlay;
pub mod pathing;
pub mod ui;

pub use config::CharacterCfg;
pub use context::{Character, CombatEngine, Ctx, GameReader, InputDevice, LootPicker, PauseGate};
pub use errors::{NavError, NavResult};
pub use game::area::Area;
pub use game::grid::{CollisionType, Grid};
pub use game::Position;
pub use nav::entrance::{interact_entrance, EntranceOptions};
pub use nav::movement::{move_to, move_to_area, move_to_coords};
pub use nav::step::MoveOpts;
pub use nav::waypoint::{discover_waypoint, waypoint};
pub use overlay::DebugOverlay;
pub use pathing::PathFinder;
