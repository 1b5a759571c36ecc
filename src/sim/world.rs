/// WorldState: everything one run of the game owns.
///
/// Per-level collections (player, hazards, items, spawner, antagonist
/// phase) are replaced wholesale by `load_level`; nothing survives a
/// level change except the score that is explicitly carried over.
/// `snapshot()` is the read-only view handed to the renderer.

use crate::domain::difficulty::LevelConfig;
use crate::domain::entity::{Antagonist, Hazard, Item, Player};
use crate::domain::placement;
use crate::domain::spawner::HazardSpawner;
use crate::domain::tile::TileGrid;
use crate::sim::level::{self, LEVEL_COUNT};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RunState {
    Menu,
    Playing,
    /// Last level cleared; waits for the return to the menu.
    Won,
    /// Touched a hazard; frozen until the return to the menu.
    Lost,
}

#[derive(Clone, Debug)]
pub struct WorldState {
    pub run_state: RunState,
    /// Menu selection, and the level being played outside the menu.
    pub level_index: usize,
    pub grid: TileGrid,
    pub config: LevelConfig,
    pub player: Player,
    pub hazards: Vec<Hazard>,
    pub items: Vec<Item>,
    pub antagonist: Antagonist,
    pub spawner: HazardSpawner,
    pub sound_on: bool,
}

impl WorldState {
    /// A world sitting in the menu with `start_level` highlighted.
    pub fn new(start_level: usize, sound_on: bool) -> Self {
        let level_index = level::clamp_index(start_level);
        let config = LevelConfig::for_level(level_index);
        WorldState {
            run_state: RunState::Menu,
            level_index,
            grid: level::builtin(level_index).grid(),
            config,
            player: Player::spawn(0),
            hazards: Vec::new(),
            items: Vec::new(),
            antagonist: Antagonist::new(),
            spawner: HazardSpawner::new(&config),
            sound_on,
        }
    }

    /// Set up level `idx` from scratch and enter `Playing`.
    /// The player respawns carrying `score`.
    pub fn load_level(&mut self, idx: usize, score: u32) {
        let idx = level::clamp_index(idx);
        let config = LevelConfig::for_level(idx);
        let grid = level::builtin(idx).grid();

        self.items = placement::place(&grid, config.item_count);
        self.grid = grid;
        self.config = config;
        self.level_index = idx;
        self.player = Player::spawn(score);
        self.hazards.clear();
        self.antagonist = Antagonist::new();
        self.spawner = HazardSpawner::new(&config);
        self.run_state = RunState::Playing;
    }

    /// Back to the menu with `selection` highlighted. The run's score is
    /// dropped and the menu backdrop shows the selected layout.
    pub fn enter_menu(&mut self, selection: usize) {
        let idx = level::clamp_index(selection);
        self.level_index = idx;
        self.grid = level::builtin(idx).grid();
        self.config = LevelConfig::for_level(idx);
        self.player = Player::spawn(0);
        self.hazards.clear();
        self.items.clear();
        self.run_state = RunState::Menu;
    }

    /// Move the menu cursor by `delta`, wrapping around the level list.
    pub fn shift_selection(&mut self, delta: isize) {
        let n = LEVEL_COUNT as isize;
        let next = (self.level_index as isize + delta).rem_euclid(n) as usize;
        self.select(next);
    }

    /// Pick a level directly; out-of-range indices clamp to the last one.
    pub fn select(&mut self, idx: usize) {
        let idx = level::clamp_index(idx);
        if idx != self.level_index {
            self.level_index = idx;
            self.grid = level::builtin(idx).grid();
            self.config = LevelConfig::for_level(idx);
        }
    }

    pub fn is_last_level(&self) -> bool {
        self.level_index + 1 >= LEVEL_COUNT
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid: &self.grid,
            player: &self.player,
            hazards: &self.hazards,
            items: &self.items,
            antagonist: self.antagonist.position(),
            score: self.player.score,
            level_index: self.level_index,
            level_name: level::builtin(self.level_index).name,
            run_state: self.run_state,
            sound_on: self.sound_on,
        }
    }
}

/// Read-only view of the world for one frame.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub grid: &'a TileGrid,
    pub player: &'a Player,
    pub hazards: &'a [Hazard],
    pub items: &'a [Item],
    pub antagonist: (f32, f32),
    pub score: u32,
    pub level_index: usize,
    pub level_name: &'static str,
    pub run_state: RunState,
    pub sound_on: bool,
}
