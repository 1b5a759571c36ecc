/// Kinematic integrator for the player and the hazards.
///
/// Velocities are in pixels per tick; only timers use `dt`.
///
/// ## Player step
///
///   1. Horizontal velocity: ±MOVE_V while a direction is held, else 0.
///   2. Ladder state: enter climbing when the centre tile is climbable and
///      up/down is held; leave it on jump or when the centre leaves the ladder.
///   3. Vertical velocity: climb speed (no gravity) or gravity + jump impulse.
///      A climber is never grounded, so leaving a ladder never grants a jump.
///   4. Integrate x, resolve against the two leading corners.
///   5. Integrate y, resolve against the two leading corners.
///   6. Clamp into the world rectangle.
///
/// Collision is a two-point sample per axis, not a swept box. A 1 px
/// corner clip at tile seams is expected and the levels are tuned for it.
///
/// ## Hazard step
///
///   x += dx; fall unless the tile under the forward centre is solid;
///   wrap to the right edge when far off the left; rest on the tile below.

use rand::Rng;

use super::entity::{Body, FrameInput, Hazard, Item, Player, HAZARD_H};
use super::tile::{tile_index, TileGrid, HEIGHT, TILE, WIDTH};

pub const GRAVITY: f32 = 0.35;
pub const JUMP_V: f32 = -6.2;
pub const MOVE_V: f32 = 2.0;
pub const CLIMB_V: f32 = 1.5;

/// Gap left between a resolved body and the tile it hit.
pub const SKIN: f32 = 0.01;

/// Hazards further left than this re-enter from the right.
pub const WRAP_X: f32 = -20.0;
pub const WRAP_ENTRY_X: f32 = WIDTH + 10.0;
/// Re-entry height band `[lo, hi)`.
pub const WRAP_BAND: (f32, f32) = (32.0, 72.0);

/// Hazard ground probes, relative to its left edge.
const HAZARD_SUPPORT_PROBE: f32 = 5.0;
const HAZARD_REST_PROBE: f32 = 2.0;

/// Item pickup window (player top-left vs item point).
pub const PICKUP_DX: f32 = 10.0;
pub const PICKUP_DY: f32 = 12.0;

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

/// Advance the player one tick. Returns true if a jump impulse fired.
pub fn step_player(player: &mut Player, grid: &TileGrid, input: &FrameInput) -> bool {
    let mut jumped = false;

    player.body.dx = if input.move_left {
        -MOVE_V
    } else if input.move_right {
        MOVE_V
    } else {
        0.0
    };

    let (cx, cy) = player.center();
    let on_ladder = grid.climbable_at(cx, cy);
    if on_ladder && input.vertical_held() {
        player.climbing = true;
    } else if !on_ladder {
        player.climbing = false;
    }

    if player.climbing {
        player.on_ground = false;
        player.body.dy = if input.climb_up {
            -CLIMB_V
        } else if input.climb_down {
            CLIMB_V
        } else {
            0.0
        };
        if input.jump {
            player.climbing = false;
        }
    } else {
        player.body.dy += GRAVITY;
        if input.jump && player.on_ground {
            player.body.dy = JUMP_V;
            player.on_ground = false;
            jumped = true;
        }
    }

    move_horizontal(player, grid);
    move_vertical(player, grid);

    let b = &mut player.body;
    b.x = b.x.clamp(0.0, WIDTH - b.w);
    b.y = b.y.clamp(0.0, HEIGHT - b.h);

    jumped
}

fn move_horizontal(player: &mut Player, grid: &TileGrid) {
    let b = &mut player.body;
    b.x += b.dx;
    if b.dx > 0.0 {
        let edge = b.x + b.w;
        if grid.solid_at(edge, b.y) || grid.solid_at(edge, b.y + b.h - 1.0) {
            b.x = tile_index(edge) as f32 * TILE - b.w - SKIN;
        }
    } else if b.dx < 0.0 {
        if grid.solid_at(b.x, b.y) || grid.solid_at(b.x, b.y + b.h - 1.0) {
            b.x = (tile_index(b.x) + 1) as f32 * TILE + SKIN;
        }
    }
}

fn move_vertical(player: &mut Player, grid: &TileGrid) {
    let b = &mut player.body;
    b.y += b.dy;
    let (left, right) = (b.x + 1.0, b.x + b.w - 1.0);
    if b.dy > 0.0 {
        let feet = b.y + b.h;
        if grid.solid_at(left, feet) || grid.solid_at(right, feet) {
            b.y = tile_index(feet) as f32 * TILE - b.h - SKIN;
            b.dy = 0.0;
            player.on_ground = true;
        } else {
            player.on_ground = false;
        }
    } else if b.dy < 0.0 && (grid.solid_at(left, b.y) || grid.solid_at(right, b.y)) {
        b.y = (tile_index(b.y) + 1) as f32 * TILE + SKIN;
        b.dy = 0.0;
    }
}

// ══════════════════════════════════════════════════════════════
// Hazards
// ══════════════════════════════════════════════════════════════

/// Advance one hazard. Returns true if it wrapped this tick.
pub fn step_hazard<R: Rng>(hazard: &mut Hazard, grid: &TileGrid, rng: &mut R) -> bool {
    let b = &mut hazard.body;
    b.x += b.dx;

    if hazard_surface_at(grid, b.x + HAZARD_SUPPORT_PROBE, b.y + HAZARD_H) {
        b.dy = 0.0;
    } else {
        b.dy += GRAVITY;
    }
    b.y += b.dy;

    let mut wrapped = false;
    if b.x < WRAP_X {
        b.x = WRAP_ENTRY_X;
        b.y = rng.random_range(WRAP_BAND.0..WRAP_BAND.1);
        wrapped = true;
    }

    let bottom = b.y + HAZARD_H;
    if hazard_surface_at(grid, b.x + HAZARD_REST_PROBE, bottom) {
        b.y = tile_index(bottom) as f32 * TILE - HAZARD_H - SKIN;
        b.dy = 0.0;
    }

    wrapped
}

/// Can a hazard rest on the point? Solid cells inside the grid and
/// anything below the floor hold it. Unlike `TileGrid::solid_at`, which
/// treats every out-of-range cell as a wall, the side and top walls do
/// not hold hazards, so one entering from off-screen drops in instead of
/// resting on air above the wrap band.
fn hazard_surface_at(grid: &TileGrid, px: f32, py: f32) -> bool {
    let (col, row) = (tile_index(px), tile_index(py));
    if row >= grid.height() as i32 {
        return true;
    }
    if row < 0 || col < 0 || col >= grid.width() as i32 {
        return false;
    }
    grid.classify(col, row).is_solid()
}

// ══════════════════════════════════════════════════════════════
// Contact tests
// ══════════════════════════════════════════════════════════════

/// First hazard overlapping the player, if any.
pub fn hazard_contact(player: &Player, hazards: &[Hazard]) -> Option<usize> {
    let p = player.aabb();
    hazards.iter().position(|h| h.aabb().overlaps(&p))
}

/// Proximity pickup: independent x/y windows around the player's corner.
pub fn within_pickup(player: &Player, item: &Item) -> bool {
    (player.body.x - item.x).abs() < PICKUP_DX && (player.body.y - item.y).abs() < PICKUP_DY
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
