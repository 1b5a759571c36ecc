/// The step function: advances a `Playing` world by one tick.
///
/// Processing order:
///   1. Hazard spawner
///   2. Player integration (jump event)
///   3. Hazard integration (wrap / rest)
///   4. Hazard contact → `Lost`, stop
///   5. Item pickup
///   6. Level clear check → `Cleared`, stop
///   7. Antagonist phase
///
/// Level lifecycle (what follows a clear or a loss) belongs to the
/// runner; this function only reports the outcome.

use log::{debug, info};
use rand::Rng;

use crate::domain::entity::FrameInput;
use crate::domain::physics;
use super::event::GameEvent;
use super::world::{RunState, WorldState};

pub const PICKUP_SCORE: u32 = 100;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StepOutcome {
    /// Nothing happened, or the world was not in `Playing`.
    Continue,
    /// A hazard touched the player; the world is now `Lost`.
    Lost,
    /// The last item was collected.
    Cleared,
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step<R: Rng>(
    world: &mut WorldState,
    dt: f32,
    input: &FrameInput,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) -> StepOutcome {
    // NaN fails the comparison too.
    if world.run_state != RunState::Playing || !(dt > 0.0) {
        return StepOutcome::Continue;
    }

    resolve_spawner(world, dt, rng);

    if physics::step_player(&mut world.player, &world.grid, input) {
        events.push(GameEvent::Jump);
    }

    for hazard in &mut world.hazards {
        physics::step_hazard(hazard, &world.grid, rng);
    }

    if let Some(idx) = physics::hazard_contact(&world.player, &world.hazards) {
        info!("level {} lost: hazard {idx} hit the player", world.level_index);
        world.run_state = RunState::Lost;
        events.push(GameEvent::Hurt);
        return StepOutcome::Lost;
    }

    resolve_pickups(world, events);

    if world.items.is_empty() {
        events.push(GameEvent::Win);
        return StepOutcome::Cleared;
    }

    world.antagonist.advance(dt);
    StepOutcome::Continue
}

// ══════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════

fn resolve_spawner<R: Rng>(world: &mut WorldState, dt: f32, rng: &mut R) {
    let alive = world.hazards.len();
    if let Some(h) = world.spawner.update(dt, alive, &world.config, &world.antagonist, rng) {
        debug!("hazard spawned at ({:.1}, {:.1}), speed {:.2}", h.body.x, h.body.y, -h.body.dx);
        world.hazards.push(h);
    }
}

fn resolve_pickups(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let player = &mut world.player;
    world.items.retain(|item| {
        if physics::within_pickup(player, item) {
            player.score += PICKUP_SCORE;
            events.push(GameEvent::Pickup);
            false
        } else {
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Hazard, Item};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing(level: usize) -> (WorldState, Pcg32) {
        let mut w = WorldState::new(level, true);
        w.load_level(level, 0);
        (w, Pcg32::seed_from_u64(1))
    }

    fn item_at_player(w: &WorldState) -> Item {
        Item { x: w.player.body.x + 2.0, y: w.player.body.y + 2.0 }
    }

    #[test]
    fn idle_outside_playing() {
        let mut w = WorldState::new(0, true);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ev = Vec::new();
        let before = w.player.body;
        let out = step(&mut w, 0.016, &FrameInput { jump: true, ..Default::default() }, &mut rng, &mut ev);
        assert_eq!(out, StepOutcome::Continue);
        assert!(ev.is_empty());
        assert_eq!(w.player.body, before);
    }

    #[test]
    fn zero_or_nan_dt_is_a_no_op() {
        let (mut w, mut rng) = playing(0);
        let mut ev = Vec::new();
        let before = w.player.body;
        let timer = w.spawner.timer();
        step(&mut w, 0.0, &FrameInput::default(), &mut rng, &mut ev);
        step(&mut w, f32::NAN, &FrameInput::default(), &mut rng, &mut ev);
        assert_eq!(w.player.body, before);
        assert_eq!(w.spawner.timer(), timer);
        assert_eq!(w.antagonist.t, 0.0);
    }

    #[test]
    fn hazard_contact_loses_and_skips_pickups() {
        let (mut w, mut rng) = playing(0);
        let (px, py) = (w.player.body.x, w.player.body.y);
        w.hazards.push(Hazard::new(px + 4.0, py + 2.0, 0.0));
        w.items.push(item_at_player(&w));
        let count = w.items.len();

        let mut ev = Vec::new();
        let out = step(&mut w, 0.016, &FrameInput::default(), &mut rng, &mut ev);
        assert_eq!(out, StepOutcome::Lost);
        assert_eq!(w.run_state, RunState::Lost);
        assert_eq!(ev, vec![GameEvent::Hurt]);
        assert_eq!(w.items.len(), count);
        assert_eq!(w.player.score, 0);
    }

    #[test]
    fn lost_world_is_frozen() {
        let (mut w, mut rng) = playing(0);
        w.run_state = RunState::Lost;
        w.hazards.push(Hazard::new(100.0, 40.0, 1.5));
        let h = w.hazards[0].body;
        let mut ev = Vec::new();
        for _ in 0..10 {
            step(&mut w, 0.016, &FrameInput { move_right: true, ..Default::default() }, &mut rng, &mut ev);
        }
        assert_eq!(w.hazards[0].body, h);
        assert_eq!(w.player.body.x, 16.0);
    }

    #[test]
    fn pickup_scores_and_clear_reports_win() {
        let (mut w, mut rng) = playing(0);
        w.items = vec![item_at_player(&w), Item { x: 200.0, y: 40.0 }];

        let mut ev = Vec::new();
        let out = step(&mut w, 0.016, &FrameInput::default(), &mut rng, &mut ev);
        assert_eq!(out, StepOutcome::Continue);
        assert_eq!(ev, vec![GameEvent::Pickup]);
        assert_eq!(w.player.score, PICKUP_SCORE);
        assert_eq!(w.items.len(), 1);

        w.items = vec![item_at_player(&w)];
        ev.clear();
        let out = step(&mut w, 0.016, &FrameInput::default(), &mut rng, &mut ev);
        assert_eq!(out, StepOutcome::Cleared);
        assert_eq!(ev, vec![GameEvent::Pickup, GameEvent::Win]);
        assert_eq!(w.player.score, 2 * PICKUP_SCORE);
    }

    #[test]
    fn jump_event_on_takeoff() {
        let (mut w, mut rng) = playing(0);
        let mut ev = Vec::new();
        for _ in 0..10 {
            step(&mut w, 0.016, &FrameInput::default(), &mut rng, &mut ev);
        }
        assert!(w.player.on_ground);
        step(&mut w, 0.016, &FrameInput { jump: true, ..Default::default() }, &mut rng, &mut ev);
        assert_eq!(ev, vec![GameEvent::Jump]);
    }

    #[test]
    fn spawner_fills_up_to_the_cap() {
        let (mut w, mut rng) = playing(0);
        // Hazards are culled before they can roll into the spawn corner.
        let mut ev = Vec::new();
        let mut max_seen = 0;
        for _ in 0..2000 {
            w.player.body.x = 16.0;
            w.player.body.y = 160.0;
            w.hazards.retain(|h| h.body.x > 150.0);
            step(&mut w, 0.05, &FrameInput::default(), &mut rng, &mut ev);
            max_seen = max_seen.max(w.hazards.len());
            assert!(w.hazards.len() <= w.config.hazard_cap);
        }
        assert!(max_seen >= 1);
        assert!(w.antagonist.t > 0.0);
    }
}
