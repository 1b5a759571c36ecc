/// Timer-driven hazard spawning from the antagonist.
///
/// The timer counts down by `dt`. Once it has run out and fewer than
/// `hazard_cap` hazards are alive, one hazard is created and the timer is
/// re-armed with `spawn_interval + jitter`. At the cap the timer simply
/// stays expired, so the next free slot is filled on the following tick.

use rand::Rng;

use super::difficulty::LevelConfig;
use super::entity::{Antagonist, Hazard};

/// Extra random speed on top of the level's base hazard speed, `[0, x)`.
pub const SPEED_JITTER: f32 = 0.6;
/// Extra random delay added when the timer is re-armed, `[0, x)` seconds.
pub const INTERVAL_JITTER: f32 = 0.8;

#[derive(Clone, Debug)]
pub struct HazardSpawner {
    timer: f32,
}

impl HazardSpawner {
    /// Armed with the level's full interval (no jitter on the first spawn).
    pub fn new(config: &LevelConfig) -> Self {
        HazardSpawner { timer: config.spawn_interval }
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Run one evaluation. Returns the new hazard, if any; the caller
    /// owns the hazard list.
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        alive: usize,
        config: &LevelConfig,
        antagonist: &Antagonist,
        rng: &mut R,
    ) -> Option<Hazard> {
        self.timer -= dt;
        if self.timer > 0.0 || alive >= config.hazard_cap {
            return None;
        }

        let (x, y) = antagonist.spawn_point();
        let speed = config.hazard_speed + rng.random_range(0.0..SPEED_JITTER);
        self.timer = config.spawn_interval + rng.random_range(0.0..INTERVAL_JITTER);
        Some(Hazard::new(x, y, speed))
    }
}
