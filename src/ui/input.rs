/// Keyboard input tracker.
///
/// Tracks which keys are currently held so movement can be continuous,
/// and turns the held set into a `FrameInput` once per frame. Edge
/// detection for menu keys happens in the runner, not here.
///
/// Terminals rarely report key releases, so a key counts as released once
/// no Press/Repeat event has arrived for `HOLD_TIMEOUT`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::FrameInput;

/// After this duration without a Press/Repeat event, consider the key released.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

const LEFT: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const UP: [KeyCode; 3] = [KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const DOWN: [KeyCode; 3] = [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const JUMP: [KeyCode; 1] = [KeyCode::Char(' ')];
const CONFIRM: [KeyCode; 1] = [KeyCode::Enter];
const SOUND: [KeyCode; 2] = [KeyCode::Char('m'), KeyCode::Char('M')];
const QUIT: [KeyCode; 3] = [KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Raw key events collected during drain, for Ctrl+C.
    raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            raw_events: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before the runner.
    pub fn drain_events(&mut self) {
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.raw_events.push(key);
                if key.kind != KeyEventKind::Release {
                    self.press(key.code, Instant::now());
                }
            }
        }

        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn press(&mut self, code: KeyCode, at: Instant) {
        self.last_active.insert(code, at);
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.last_active
            .get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }

    fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Logical actions held right now.
    pub fn frame_input(&self) -> FrameInput {
        let left = self.any_held(&LEFT);
        let up = self.any_held(&UP);
        FrameInput {
            move_left: left,
            move_right: !left && self.any_held(&RIGHT),
            climb_up: up,
            climb_down: !up && self.any_held(&DOWN),
            jump: self.any_held(&JUMP),
            confirm: self.any_held(&CONFIRM),
            toggle_sound: self.any_held(&SOUND),
            select_level: (0..=9u32)
                .find(|&d| self.is_held(KeyCode::Char(char::from_digit(d, 10).unwrap_or('0'))))
                .map(|d| d as usize),
        }
    }

    /// Esc or `q` (only honoured by the caller while in the menu).
    pub fn quit_held(&self) -> bool {
        self.any_held(&QUIT)
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_keys_to_actions() {
        let mut kb = InputState::new();
        let now = Instant::now();
        kb.press(KeyCode::Char('a'), now);
        kb.press(KeyCode::Up, now);
        kb.press(KeyCode::Char(' '), now);
        kb.press(KeyCode::Char('7'), now);
        let f = kb.frame_input();
        assert!(f.move_left && !f.move_right);
        assert!(f.climb_up && f.jump);
        assert!(!f.confirm && !f.toggle_sound);
        assert_eq!(f.select_level, Some(7));
    }

    #[test]
    fn opposite_directions_resolve_to_one() {
        let mut kb = InputState::new();
        let now = Instant::now();
        kb.press(KeyCode::Left, now);
        kb.press(KeyCode::Right, now);
        kb.press(KeyCode::Up, now);
        kb.press(KeyCode::Down, now);
        let f = kb.frame_input();
        assert!(f.move_left && !f.move_right);
        assert!(f.climb_up && !f.climb_down);
    }

    #[test]
    fn keys_expire_after_timeout() {
        let mut kb = InputState::new();
        let Some(old) = Instant::now().checked_sub(HOLD_TIMEOUT * 2) else { return };
        kb.press(KeyCode::Enter, old);
        assert!(!kb.frame_input().confirm);
        kb.press(KeyCode::Char('q'), Instant::now());
        assert!(kb.quit_held());
    }
}
