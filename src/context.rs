use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use tracing::debug;

use crate::config::CharacterCfg;
use crate::errors::{NavError, NavResult};
use crate::game::{Data, Key, Monster, MonsterFilter, MouseButton, Position};
use crate::pathing::PathFinder;

/// Snapshot provider handle. `snapshot` publishes a fresh consistent view;
/// the provider refreshes on its own thread.
pub trait GameReader: Send + Sync {
    fn snapshot(&self) -> Arc<Data>;
}

/// Low-level click surface of the game window.
pub trait InputDevice: Send + Sync {
    fn click(&self, button: MouseButton, x: i32, y: i32);
    fn move_pointer(&self, x: i32, y: i32);
    fn key_press(&self, key: Key);
}

/// Combat engine: clears hostiles around a position, honoring filters.
pub trait CombatEngine: Send + Sync {
    fn clear_area_around_position(
        &self,
        data: &Data,
        pos: Position,
        radius: i32,
        filters: &[MonsterFilter],
    ) -> NavResult<()>;
}

pub trait LootPicker: Send + Sync {
    fn item_pickup(&self, data: &Data, radius: i32) -> NavResult<()>;
}

/// Character-class capabilities the movement loop dispatches on.
/// The generic character is not a leveling character and ignores nothing.
pub trait Character: Send + Sync {
    fn is_leveling_character(&self) -> bool {
        false
    }

    fn should_ignore_monster(&self, _monster: &Monster) -> bool {
        false
    }

    /// Housekeeping performed when no enemy is near (point allocation,
    /// stamina top-up). Only invoked for leveling characters.
    fn on_safe_navigation(&self, _data: &Data) {}

    /// Re-apply the character's buffs, when configured after transitions.
    fn buff(&self) {}
}

/// Default character: no leveling behavior.
pub struct GenericCharacter;

impl Character for GenericCharacter {}

// ── Cooperative pause ──────────────────────────────────────────────

/// Gate the scheduler raises while a higher-priority action runs. The
/// movement loop blocks on `wait_if_paused` at the top of every tick.
#[derive(Default)]
pub struct PauseGate {
    paused: Mutex<bool>,
    cond: Condvar,
}

impl PauseGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(&self) {
        *self.paused.lock().unwrap() = true;
    }

    pub fn resume(&self) {
        *self.paused.lock().unwrap() = false;
        self.cond.notify_all();
    }

    pub fn is_paused(&self) -> bool {
        *self.paused.lock().unwrap()
    }

    pub fn wait_if_paused(&self) {
        let mut paused = self.paused.lock().unwrap();
        while *paused {
            paused = self.cond.wait(paused).unwrap();
        }
    }
}

// ── Bot context ────────────────────────────────────────────────────

/// Everything one supervisor's navigation shares: the latest snapshot,
/// the external collaborators, and the pathfinder.
pub struct Ctx {
    pub supervisor: String,
    pub data: Arc<Data>,
    reader: Arc<dyn GameReader>,
    pub hid: Arc<dyn InputDevice>,
    pub combat: Arc<dyn CombatEngine>,
    pub loot: Arc<dyn LootPicker>,
    pub character: Arc<dyn Character>,
    pub cfg: CharacterCfg,
    pub pathfinder: Arc<PathFinder>,
    pause: Arc<PauseGate>,
}

impl Ctx {
    pub fn new(
        supervisor: impl Into<String>,
        reader: Arc<dyn GameReader>,
        hid: Arc<dyn InputDevice>,
        combat: Arc<dyn CombatEngine>,
        loot: Arc<dyn LootPicker>,
        character: Arc<dyn Character>,
        cfg: CharacterCfg,
    ) -> Self {
        let data = reader.snapshot();
        let pathfinder = Arc::new(PathFinder::new(hid.clone()));
        Self {
            supervisor: supervisor.into(),
            data,
            reader,
            hid,
            combat,
            loot,
            character,
            cfg,
            pathfinder,
            pause: Arc::new(PauseGate::new()),
        }
    }

    /// Publish a fresh consistent snapshot. Every decision in a tick uses
    /// state no older than the last call.
    pub fn refresh_game_data(&mut self) {
        self.data = self.reader.snapshot();
    }

    pub fn reader(&self) -> Arc<dyn GameReader> {
        self.reader.clone()
    }

    pub fn pause_gate(&self) -> Arc<PauseGate> {
        self.pause.clone()
    }

    pub fn pause_if_not_priority(&self) {
        self.pause.wait_if_paused();
    }

    /// Death ends everything except town errands.
    pub fn check_player_death(&self) -> NavResult<()> {
        if self.data.player.area.is_town() {
            return Ok(());
        }
        if self.data.player.is_dead() {
            return Err(NavError::Died);
        }
        Ok(())
    }

    /// Block until the loading screen clears (bounded).
    pub fn wait_for_game_to_load(&mut self) {
        for _ in 0..50 {
            if !self.data.open_menus.loading_screen {
                return;
            }
            sleep_ms(100);
            self.refresh_game_data();
        }
        debug!("loading screen still up after wait budget");
    }

    /// Close any open blocking menus.
    pub fn close_all_menus(&mut self) {
        for _ in 0..5 {
            if !self.data.open_menus.is_menu_open() {
                return;
            }
            self.hid.key_press(Key::Escape);
            sleep_ms(200);
            self.refresh_game_data();
        }
    }
}

/// Smallest enemy-proximity probe; used for the safety check and by
/// callers that only need a yes/no.
pub fn is_any_enemy_around_player(data: &Data, radius: i32) -> (bool, usize) {
    let player = data.player.position;
    let count = data
        .enemies()
        .filter(|m| crate::pathing::distance(m.position, player) <= radius)
        .count();
    (count > 0, count)
}

pub fn sleep_ms(ms: u64) {
    std::thread::sleep(Duration::from_millis(ms));
}

/// Escalating retry delay scaled by ping: base, then base + ping-sized
/// increments per retry.
pub fn retry_sleep(retry: u32, ping: u32, base_ms: u64) {
    let extra = (retry as u64) * (ping.max(50) as u64);
    sleep_ms(base_ms + extra);
}
