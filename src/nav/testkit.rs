//! Scriptable fakes for the snapshot provider and the input surface,
//! shared by the movement, waypoint and entrance tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::config::CharacterCfg;
use crate::context::{CombatEngine, Ctx, GameReader, GenericCharacter, InputDevice, LootPicker};
use crate::errors::NavResult;
use crate::game::area::Area;
use crate::game::grid::{CollisionType, Grid};
use crate::game::{AreaData, Data, Key, MonsterFilter, MouseButton, Position};

type Mutation = Box<dyn FnOnce(&mut Data) + Send>;
type SnapshotHook = Box<dyn FnMut(&mut Data) + Send>;
type ClickHook = Box<dyn FnMut(&mut Data, MouseButton, i32, i32) + Send>;

/// A fake game: one mutable `Data` behind the `GameReader` barrier, plus
/// recorders for everything the bot clicks and presses.
#[derive(Default)]
pub struct FakeWorld {
    state: Mutex<Data>,
    scripted: Mutex<VecDeque<Mutation>>,
    snapshot_hook: Mutex<Option<SnapshotHook>>,
    click_hook: Mutex<Option<ClickHook>>,
    pub clicks: Mutex<Vec<(MouseButton, i32, i32)>>,
    pub pointer_moves: Mutex<Vec<(i32, i32)>>,
    pub keys: Mutex<Vec<Key>>,
    pub cleared_positions: Mutex<Vec<Position>>,
    pub loots: Mutex<Vec<i32>>,
}

impl FakeWorld {
    pub fn new(data: Data) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(data),
            ..Self::default()
        })
    }

    /// A world with the player at (0, 0) of a fully walkable grid.
    pub fn walkable_field(area: Area, width: usize, height: usize) -> Arc<Self> {
        let grid = Grid::from_processed(
            vec![vec![CollisionType::Walkable; width]; height],
            0,
            0,
        );
        let mut data = Data::default();
        data.player.area = area;
        data.player.position = Position::new(0, 0);
        data.area_data = AreaData {
            area: Some(area),
            offset_x: 0,
            offset_y: 0,
            grid: Some(Arc::new(grid)),
            ..AreaData::default()
        };
        Self::new(data)
    }

    /// Mutate the world state immediately.
    pub fn mutate(&self, f: impl FnOnce(&mut Data)) {
        f(&mut self.state.lock().unwrap());
    }

    /// Queue a mutation applied at the next snapshot (one per snapshot).
    pub fn script(&self, f: impl FnOnce(&mut Data) + Send + 'static) {
        self.scripted.lock().unwrap().push_back(Box::new(f));
    }

    /// Queue a sequence of player positions, one per upcoming snapshot.
    pub fn script_positions(&self, positions: &[Position]) {
        for &p in positions {
            self.script(move |data| data.player.position = p);
        }
    }

    /// Run a hook on every snapshot (after scripted mutations).
    pub fn set_snapshot_hook(&self, f: impl FnMut(&mut Data) + Send + 'static) {
        *self.snapshot_hook.lock().unwrap() = Some(Box::new(f));
    }

    /// Run a hook on every click, with mutable access to the world.
    pub fn set_click_hook(&self, f: impl FnMut(&mut Data, MouseButton, i32, i32) + Send + 'static) {
        *self.click_hook.lock().unwrap() = Some(Box::new(f));
    }

    pub fn click_count(&self) -> usize {
        self.clicks.lock().unwrap().len()
    }

    pub fn player_position(&self) -> Position {
        self.state.lock().unwrap().player.position
    }
}

impl GameReader for FakeWorld {
    fn snapshot(&self) -> Arc<Data> {
        let mut state = self.state.lock().unwrap();
        if let Some(mutation) = self.scripted.lock().unwrap().pop_front() {
            mutation(&mut state);
        }
        if let Some(hook) = self.snapshot_hook.lock().unwrap().as_mut() {
            hook(&mut state);
        }
        Arc::new(state.clone())
    }
}

impl InputDevice for FakeWorld {
    fn click(&self, button: MouseButton, x: i32, y: i32) {
        self.clicks.lock().unwrap().push((button, x, y));
        if let Some(hook) = self.click_hook.lock().unwrap().as_mut() {
            hook(&mut self.state.lock().unwrap(), button, x, y);
        }
    }

    fn move_pointer(&self, x: i32, y: i32) {
        self.pointer_moves.lock().unwrap().push((x, y));
    }

    fn key_press(&self, key: Key) {
        self.keys.lock().unwrap().push(key);
    }
}

impl CombatEngine for FakeWorld {
    fn clear_area_around_position(
        &self,
        _data: &Data,
        pos: Position,
        radius: i32,
        _filters: &[MonsterFilter],
    ) -> NavResult<()> {
        self.cleared_positions.lock().unwrap().push(pos);
        // The fake combat engine simply removes everything in range.
        let mut state = self.state.lock().unwrap();
        state
            .monsters
            .retain(|m| !m.hostile || crate::pathing::distance(m.position, pos) > radius);
        Ok(())
    }
}

impl LootPicker for FakeWorld {
    fn item_pickup(&self, _data: &Data, radius: i32) -> NavResult<()> {
        self.loots.lock().unwrap().push(radius);
        Ok(())
    }
}

/// A ready-to-use context wired entirely to one `FakeWorld`.
pub struct TestCtx {
    pub ctx: Ctx,
    pub world: Arc<FakeWorld>,
}

/// Route test logs through the capture writer; repeated calls are fine.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

impl TestCtx {
    pub fn new(world: Arc<FakeWorld>) -> Self {
        Self::with_cfg(world, CharacterCfg::default())
    }

    pub fn with_cfg(world: Arc<FakeWorld>, cfg: CharacterCfg) -> Self {
        init_test_logging();
        let ctx = Ctx::new(
            "test",
            world.clone(),
            world.clone(),
            world.clone(),
            world.clone(),
            Arc::new(GenericCharacter),
            cfg,
        );
        Self { ctx, world }
    }
}
