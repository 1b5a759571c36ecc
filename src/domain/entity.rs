/// Entities: Player, Hazard, Item, Antagonist.
/// Each is its own struct; the ones that collide share the `Body` trait.

use super::tile::{HEIGHT, WIDTH};

pub const PLAYER_W: f32 = 12.0;
pub const PLAYER_H: f32 = 14.0;
pub const HAZARD_W: f32 = 10.0;
pub const HAZARD_H: f32 = 10.0;

/// Player spawn, top-left corner.
pub const PLAYER_SPAWN: (f32, f32) = (16.0, HEIGHT - 32.0);

/// Axis-aligned box, `(x, y)` is the top-left corner.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// Anything with a position and a collision box.
pub trait Body {
    fn aabb(&self) -> Aabb;

    fn center(&self) -> (f32, f32) {
        let b = self.aabb();
        (b.x + b.w / 2.0, b.y + b.h / 2.0)
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct KinematicBody {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub w: f32,
    pub h: f32,
}

impl KinematicBody {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        KinematicBody { x, y, dx: 0.0, dy: 0.0, w, h }
    }
}

impl Body for KinematicBody {
    fn aabb(&self) -> Aabb {
        Aabb { x: self.x, y: self.y, w: self.w, h: self.h }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub body: KinematicBody,
    pub on_ground: bool,
    pub climbing: bool,
    pub score: u32,
}

impl Player {
    /// Fresh player at the spawn point carrying `score` over.
    pub fn spawn(score: u32) -> Self {
        Player {
            body: KinematicBody::new(PLAYER_SPAWN.0, PLAYER_SPAWN.1, PLAYER_W, PLAYER_H),
            on_ground: false,
            climbing: false,
            score,
        }
    }
}

impl Body for Player {
    fn aabb(&self) -> Aabb {
        self.body.aabb()
    }
}

#[derive(Clone, Debug)]
pub struct Hazard {
    pub body: KinematicBody,
}

impl Hazard {
    /// A hazard rolling left at `speed` px/tick.
    pub fn new(x: f32, y: f32, speed: f32) -> Self {
        let mut body = KinematicBody::new(x, y, HAZARD_W, HAZARD_H);
        body.dx = -speed;
        Hazard { body }
    }
}

impl Body for Hazard {
    fn aabb(&self) -> Aabb {
        self.body.aabb()
    }
}

/// A collectible. Static point; removed when picked up.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Item {
    pub x: f32,
    pub y: f32,
}

/// The hazard source. Its position is a pure function of elapsed time.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Antagonist {
    pub t: f32,
}

impl Antagonist {
    pub const HOME_X: f32 = WIDTH - 40.0;
    pub const HOME_Y: f32 = 16.0;

    pub fn new() -> Self {
        Antagonist { t: 0.0 }
    }

    pub fn advance(&mut self, dt: f32) {
        self.t += dt;
    }

    pub fn position(&self) -> (f32, f32) {
        (Self::HOME_X + (self.t * 2.0).sin() * 4.0, Self::HOME_Y)
    }

    /// Where a freshly spawned hazard appears.
    pub fn spawn_point(&self) -> (f32, f32) {
        let (x, y) = self.position();
        (x - 4.0, y + 8.0)
    }
}

/// Logical actions held this frame. Built by the input collaborators,
/// consumed by the runner once per tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct FrameInput {
    pub move_left: bool,
    pub move_right: bool,
    pub climb_up: bool,
    pub climb_down: bool,
    pub jump: bool,
    pub confirm: bool,
    pub toggle_sound: bool,
    pub select_level: Option<usize>,
}

impl FrameInput {
    /// Union of two sources (keyboard + gamepad).
    pub fn merge(self, other: FrameInput) -> FrameInput {
        FrameInput {
            move_left: self.move_left || other.move_left,
            move_right: self.move_right || other.move_right,
            climb_up: self.climb_up || other.climb_up,
            climb_down: self.climb_down || other.climb_down,
            jump: self.jump || other.jump,
            confirm: self.confirm || other.confirm,
            toggle_sound: self.toggle_sound || other.toggle_sound,
            select_level: self.select_level.or(other.select_level),
        }
    }

    pub fn vertical_held(&self) -> bool {
        self.climb_up || self.climb_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_overlap_is_strict() {
        let a = Aabb { x: 0.0, y: 0.0, w: 10.0, h: 10.0 };
        let touching = Aabb { x: 10.0, y: 0.0, w: 5.0, h: 5.0 };
        let inside = Aabb { x: 9.9, y: 9.9, w: 5.0, h: 5.0 };
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn antagonist_bobs_around_home() {
        let mut a = Antagonist::new();
        assert_eq!(a.position(), (Antagonist::HOME_X, Antagonist::HOME_Y));
        for _ in 0..100 {
            a.advance(0.05);
            let (x, y) = a.position();
            assert!((x - Antagonist::HOME_X).abs() <= 4.0);
            assert_eq!(y, Antagonist::HOME_Y);
        }
        let (sx, sy) = a.spawn_point();
        assert_eq!(sx, a.position().0 - 4.0);
        assert_eq!(sy, 24.0);
    }

    #[test]
    fn hazard_moves_left() {
        let h = Hazard::new(100.0, 20.0, 1.5);
        assert_eq!(h.body.dx, -1.5);
        assert_eq!(h.aabb().w, HAZARD_W);
    }

    #[test]
    fn merge_prefers_first_level_pick() {
        let kb = FrameInput { move_left: true, select_level: Some(3), ..Default::default() };
        let pad = FrameInput { jump: true, select_level: Some(5), ..Default::default() };
        let m = kb.merge(pad);
        assert!(m.move_left && m.jump);
        assert_eq!(m.select_level, Some(3));
    }

    #[test]
    fn player_spawn_keeps_score() {
        let p = Player::spawn(700);
        assert_eq!(p.score, 700);
        assert_eq!((p.body.x, p.body.y), PLAYER_SPAWN);
        assert!(!p.climbing);
    }
}
