/// LevelRunner: the single owner of the simulation.
///
/// Once per frame the caller hands over the wall-clock time, the frame
/// `dt` and the held input. The runner then:
///   1. fires deferred transitions that came due (`pump`),
///   2. handles the state-specific input (menu cursor, start, skip),
///   3. runs one clamped `step` while `Playing`,
///   4. reacts to the outcome: schedule the return to the menu after a
///      loss or the final level, or load the next level right away.
///
/// Menu keys and Confirm are edge-triggered against the previous frame's
/// input; movement and jump are level-triggered.

use std::time::{Duration, Instant};

use log::{debug, info};
use rand_pcg::Pcg32;

use crate::config::GameConfig;
use crate::domain::entity::FrameInput;
use super::event::GameEvent;
use super::schedule::{Scheduler, Transition};
use super::step::{self, StepOutcome};
use super::world::{RunState, Snapshot, WorldState};

pub struct LevelRunner {
    world: WorldState,
    scheduler: Scheduler,
    rng: Pcg32,
    max_dt: f32,
    lose_delay: Duration,
    won_delay: Duration,
    prev: FrameInput,
}

impl LevelRunner {
    pub fn new(config: &GameConfig, rng: Pcg32) -> Self {
        LevelRunner {
            world: WorldState::new(config.general.start_level, config.general.sound),
            scheduler: Scheduler::new(),
            rng,
            max_dt: config.timing.max_dt,
            lose_delay: config.timing.lose_delay,
            won_delay: config.timing.won_delay,
            prev: FrameInput::default(),
        }
    }

    pub fn run_state(&self) -> RunState {
        self.world.run_state
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.world.snapshot()
    }

    /// One front-end frame. Returns the events for the audio layer.
    pub fn frame(&mut self, now: Instant, dt: f32, input: &FrameInput) -> Vec<GameEvent> {
        self.pump(now);

        let mut events = Vec::new();
        let pressed = newly_pressed(&self.prev, input);

        if pressed.toggle_sound {
            self.world.sound_on = !self.world.sound_on;
            debug!("sound {}", if self.world.sound_on { "on" } else { "off" });
        }

        match self.world.run_state {
            RunState::Menu => self.handle_menu(input, &pressed),
            RunState::Playing => self.play(now, dt, input, &mut events),
            RunState::Lost | RunState::Won => {
                if pressed.confirm {
                    let selection = self.menu_selection_after_run();
                    self.cancel_pending();
                    self.world.enter_menu(selection);
                }
            }
        }

        self.prev = *input;
        events
    }

    /// Fire every deferred transition due at `now`. Safe to call without
    /// a frame, e.g. while the front end is paused.
    pub fn pump(&mut self, now: Instant) {
        for transition in self.scheduler.take_due(now) {
            match transition {
                Transition::ToMenu { selection } => {
                    info!("back to menu (level {selection} selected)");
                    self.world.enter_menu(selection);
                }
            }
        }
    }

    /// Start `idx` from scratch with a zero score.
    pub fn start_level(&mut self, idx: usize) {
        self.cancel_pending();
        self.world.load_level(idx, 0);
        info!("level {} \"{}\" started", self.world.level_index, self.snapshot().level_name);
    }

    fn handle_menu(&mut self, input: &FrameInput, pressed: &FrameInput) {
        if pressed.move_left {
            self.world.shift_selection(-1);
        } else if pressed.move_right {
            self.world.shift_selection(1);
        }
        if let Some(n) = input.select_level {
            self.world.select(n);
        }
        if pressed.confirm {
            self.start_level(self.world.level_index);
        }
    }

    fn play(&mut self, now: Instant, dt: f32, input: &FrameInput, events: &mut Vec<GameEvent>) {
        let dt = if dt.is_nan() { 0.0 } else { dt.min(self.max_dt) };

        match step::step(&mut self.world, dt, input, &mut self.rng, events) {
            StepOutcome::Continue => {}
            StepOutcome::Lost => {
                let selection = self.world.level_index;
                self.scheduler.schedule(now + self.lose_delay, Transition::ToMenu { selection });
            }
            StepOutcome::Cleared => self.level_cleared(now),
        }
    }

    fn level_cleared(&mut self, now: Instant) {
        let score = self.world.player.score;
        info!("level {} cleared, score {score}", self.world.level_index);

        if self.world.is_last_level() {
            info!("all levels cleared, final score {score}");
            self.world.run_state = RunState::Won;
            self.scheduler.schedule(now + self.won_delay, Transition::ToMenu { selection: 0 });
        } else {
            self.cancel_pending();
            self.world.load_level(self.world.level_index + 1, score);
            info!("level {} \"{}\" started", self.world.level_index, self.snapshot().level_name);
        }
    }

    fn cancel_pending(&mut self) {
        let pending = self.scheduler.pending();
        if pending > 0 {
            debug!("dropping {pending} pending transition(s)");
        }
        self.scheduler.cancel_all();
    }

    fn menu_selection_after_run(&self) -> usize {
        match self.world.run_state {
            RunState::Won => 0,
            _ => self.world.level_index,
        }
    }
}

/// Buttons down this frame that were up the frame before.
fn newly_pressed(prev: &FrameInput, cur: &FrameInput) -> FrameInput {
    FrameInput {
        move_left: cur.move_left && !prev.move_left,
        move_right: cur.move_right && !prev.move_right,
        climb_up: cur.climb_up && !prev.climb_up,
        climb_down: cur.climb_down && !prev.climb_down,
        jump: cur.jump && !prev.jump,
        confirm: cur.confirm && !prev.confirm,
        toggle_sound: cur.toggle_sound && !prev.toggle_sound,
        select_level: cur.select_level.filter(|_| prev.select_level != cur.select_level),
    }
}
