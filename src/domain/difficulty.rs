/// Per-level tuning, derived from the level index alone.

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct LevelConfig {
    /// Seconds between hazard spawns (before jitter).
    pub spawn_interval: f32,
    /// Base leftward hazard speed, px/tick.
    pub hazard_speed: f32,
    /// Spawning stops while this many hazards are alive.
    pub hazard_cap: usize,
    pub item_count: usize,
}

impl LevelConfig {
    pub fn for_level(level: usize) -> Self {
        let l = level as f32;
        LevelConfig {
            spawn_interval: (3.0 - 0.18 * l).max(1.15),
            hazard_speed: 1.4 + 0.12 * l,
            hazard_cap: 3 + level / 2,
            item_count: 6 + (level / 2).min(4),
        }
    }
}
