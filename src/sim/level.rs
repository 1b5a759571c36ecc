/// Built-in level set.
///
/// Ten hand-authored 16×12 layouts, `'1'` solid and `'0'` empty, each
/// with its own ladder list. Every level keeps the same frame: rows 0-2
/// open for the antagonist and falling hazards, the spawn corner
/// (columns 0-1 of row 10) clear, and a full floor on row 11. Layouts are
/// tuned so no placed item sits within pickup reach of the spawn.
///
/// Ladders are given by their bottom cell and run three cells up, so
/// each one pokes a cell above the platform it serves and the climber
/// can step off at the top.

use crate::domain::tile::{LadderSpec, TileGrid};

pub const LEVEL_COUNT: usize = 10;

pub struct LevelDef {
    pub name: &'static str,
    pub rows: [&'static str; 12],
    pub ladders: &'static [LadderSpec],
}

impl LevelDef {
    pub fn grid(&self) -> TileGrid {
        TileGrid::build_from_layout(&self.rows, self.ladders)
    }
}

/// Level `idx`, clamped into the built-in range.
pub fn builtin(idx: usize) -> &'static LevelDef {
    &LEVELS[clamp_index(idx)]
}

pub fn clamp_index(idx: usize) -> usize {
    idx.min(LEVEL_COUNT - 1)
}

pub fn names() -> impl Iterator<Item = &'static str> {
    LEVELS.iter().map(|l| l.name)
}

const OPEN: &str = "0000000000000000";
const FLOOR: &str = "1111111111111111";

/// Shared frame; only rows 3, 5, 7 and 9 differ between levels.
const fn layout(r3: &'static str, r5: &'static str, r7: &'static str, r9: &'static str) -> [&'static str; 12] {
    [OPEN, OPEN, OPEN, r3, OPEN, r5, OPEN, r7, OPEN, r9, OPEN, FLOOR]
}

const fn ladder(column: i32, bottom: i32) -> LadderSpec {
    LadderSpec::new(column, bottom, 3)
}

static LEVELS: [LevelDef; LEVEL_COUNT] = [
    LevelDef {
        name: "Henhouse",
        rows: layout("0000111111111111", "1111111111110000", "0000111111111111", "1111111111110000"),
        ladders: &[ladder(10, 10), ladder(5, 8), ladder(9, 6), ladder(6, 4)],
    },
    LevelDef {
        name: "Coop Stairs",
        rows: layout("0011111111111111", "1111110011111100", "0011111111111111", "1111111100111100"),
        ladders: &[ladder(12, 10), ladder(4, 8), ladder(11, 6), ladder(3, 4)],
    },
    LevelDef {
        name: "Feed Loft",
        rows: layout("0001111100111111", "1111100111110000", "0000111110011111", "1111100111111100"),
        ladders: &[ladder(2, 10), ladder(13, 8), ladder(7, 6), ladder(4, 4)],
    },
    LevelDef {
        name: "Straw Gaps",
        rows: layout("0111011101111111", "1110111011101100", "0011101110111011", "1101110111011100"),
        ladders: &[ladder(5, 10), ladder(10, 8), ladder(2, 6), ladder(9, 4)],
    },
    LevelDef {
        name: "Barn Rafters",
        rows: layout("0000111111111111", "0111111111100000", "0000011111111110", "0111111111110000"),
        ladders: &[ladder(3, 10), ladder(8, 10), ladder(10, 8), ladder(6, 6), ladder(9, 4)],
    },
    LevelDef {
        name: "Silo Walk",
        rows: layout("0000011111111111", "0011111110011100", "0000111001111111", "1111100111111000"),
        ladders: &[ladder(1, 10), ladder(11, 8), ladder(5, 6), ladder(12, 4)],
    },
    LevelDef {
        name: "Egg Crates",
        rows: layout("0000111111111000", "0111100111100111", "0011111001111100", "1110011111100111"),
        ladders: &[ladder(8, 10), ladder(3, 8), ladder(12, 8), ladder(10, 6), ladder(7, 4)],
    },
    LevelDef {
        name: "Weathervane",
        rows: layout("0111111111111111", "1111111011111110", "0111111110111111", "1111110111111110"),
        ladders: &[ladder(13, 10), ladder(2, 8), ladder(12, 6), ladder(4, 4)],
    },
    LevelDef {
        name: "Hayloft",
        rows: layout("0000111101111111", "1101111011110110", "0110111101101111", "1111011011110110"),
        ladders: &[ladder(2, 10), ladder(7, 8), ladder(13, 6), ladder(5, 4)],
    },
    LevelDef {
        name: "Rooster's Roost",
        rows: layout("0000000011111111", "0110110110110110", "0011011011011011", "1101101101101100"),
        ladders: &[ladder(3, 10), ladder(10, 10), ladder(6, 8), ladder(14, 8), ladder(10, 6), ladder(9, 4)],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::difficulty::LevelConfig;
    use crate::domain::entity::Player;
    use crate::domain::physics::within_pickup;
    use crate::domain::placement::place;
    use crate::domain::tile::{Tile, GRID_H, GRID_W};

    #[test]
    fn ten_levels_with_full_rows() {
        assert_eq!(names().count(), LEVEL_COUNT);
        for def in &LEVELS {
            for row in def.rows {
                assert_eq!(row.len(), GRID_W, "{}", def.name);
                assert!(row.chars().all(|c| c == '0' || c == '1'));
            }
        }
    }

    #[test]
    fn spawn_corner_and_floor_are_kept() {
        for def in &LEVELS {
            let g = def.grid();
            assert!(!g.classify(0, 10).is_solid(), "{}", def.name);
            assert!(!g.classify(1, 10).is_solid(), "{}", def.name);
            for col in 0..GRID_W as i32 {
                assert_eq!(g.classify(col, GRID_H as i32 - 1), Tile::Solid);
            }
        }
    }

    #[test]
    fn ladders_cross_a_platform() {
        // Each ladder's middle cell replaces a solid platform cell.
        for def in &LEVELS {
            for l in def.ladders {
                let middle = def.rows[(l.row - 1) as usize].as_bytes()[l.column as usize];
                assert_eq!(middle, b'1', "{} ladder at column {}", def.name, l.column);
            }
        }
    }

    #[test]
    fn no_item_is_collected_at_spawn() {
        let spawn = Player::spawn(0);
        for (idx, def) in LEVELS.iter().enumerate() {
            let items = place(&def.grid(), LevelConfig::for_level(idx).item_count);
            for item in &items {
                assert!(!within_pickup(&spawn, item), "{} item at ({}, {})", def.name, item.x, item.y);
            }
        }
    }

    #[test]
    fn out_of_range_index_clamps() {
        assert_eq!(builtin(42).name, LEVELS[LEVEL_COUNT - 1].name);
        assert_eq!(clamp_index(3), 3);
    }
}
