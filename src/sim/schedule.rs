/// Deferred state transitions.
///
/// Transitions that must happen "a little later" (back to the menu after
/// a loss or after the final level) are queued here with a wall-clock
/// due time instead of being counted down inside the tick, so they fire
/// even while no ticks arrive. Each entry carries the epoch it was
/// scheduled in; `cancel_all` moves to a new epoch and every older entry
/// is dropped unfired.

use std::time::Instant;

use log::debug;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Transition {
    /// Leave `Lost`/`Won` for the menu with `selection` highlighted.
    ToMenu { selection: usize },
}

#[derive(Clone, Debug)]
struct Pending {
    due: Instant,
    /// Epoch at scheduling time; the entry is live while it matches.
    epoch: u64,
    action: Transition,
}

#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    epoch: u64,
    queue: Vec<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler::default()
    }

    pub fn schedule(&mut self, due: Instant, action: Transition) {
        self.queue.push(Pending { due, epoch: self.epoch, action });
    }

    /// Invalidate everything scheduled so far.
    pub fn cancel_all(&mut self) {
        self.epoch += 1;
    }

    /// Remove and return the live transitions due at `now`, earliest first.
    /// Stale entries from an older epoch are discarded on the way.
    pub fn take_due(&mut self, now: Instant) -> Vec<Transition> {
        let epoch = self.epoch;
        let mut due: Vec<Pending> = Vec::new();
        self.queue.retain(|p| {
            if p.epoch != epoch {
                debug!("discarding stale transition {:?}", p.action);
                false
            } else if p.due <= now {
                due.push(p.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|p| p.due);
        due.into_iter().map(|p| p.action).collect()
    }

    /// Live transitions still waiting.
    pub fn pending(&self) -> usize {
        self.queue.iter().filter(|p| p.epoch == self.epoch).count()
    }
}
