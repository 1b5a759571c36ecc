/// Tile categories and the per-level occupancy grid.
///
/// The grid is built once per level from a character layout plus a
/// ladder overlay and never changes afterwards. Anything outside the
/// grid reads as `Solid`, so the world has implicit walls on every side.

pub const TILE: f32 = 16.0;
pub const GRID_W: usize = 16;
pub const GRID_H: usize = 12;
pub const WIDTH: f32 = GRID_W as f32 * TILE;
pub const HEIGHT: f32 = GRID_H as f32 * TILE;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tile {
    #[default]
    Empty,
    Solid,
    Climbable,
}

impl Tile {
    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Solid)
    }

    pub fn is_climbable(self) -> bool {
        matches!(self, Tile::Climbable)
    }
}

/// A vertical ladder run. Starting at `(column, row)` it covers `height`
/// cells going up the screen (towards row 0).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LadderSpec {
    pub column: i32,
    pub row: i32,
    pub height: i32,
}

impl LadderSpec {
    pub const fn new(column: i32, row: i32, height: i32) -> Self {
        LadderSpec { column, row, height }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TileGrid {
    cells: [[Tile; GRID_W]; GRID_H],
}

impl TileGrid {
    /// Parse a layout (`'1'` solid, anything else empty) and stamp the
    /// ladders over it. Short rows are padded with `Empty`; extra rows and
    /// columns are ignored. Ladder cells outside the grid are dropped.
    pub fn build_from_layout(rows: &[&str], ladders: &[LadderSpec]) -> Self {
        let mut cells = [[Tile::Empty; GRID_W]; GRID_H];

        for (y, row) in rows.iter().take(GRID_H).enumerate() {
            for (x, ch) in row.chars().take(GRID_W).enumerate() {
                cells[y][x] = if ch == '1' { Tile::Solid } else { Tile::Empty };
            }
        }

        for ladder in ladders {
            if ladder.column < 0 || ladder.column >= GRID_W as i32 { continue; }
            for i in 0..ladder.height.max(0) {
                let y = ladder.row - i;
                if y < 0 || y >= GRID_H as i32 { continue; }
                cells[y as usize][ladder.column as usize] = Tile::Climbable;
            }
        }

        TileGrid { cells }
    }

    /// Cell category at `(col, row)`; out of range is `Solid`.
    #[inline]
    pub fn classify(&self, col: i32, row: i32) -> Tile {
        if col < 0 || row < 0 || col >= GRID_W as i32 || row >= GRID_H as i32 {
            return Tile::Solid;
        }
        self.cells[row as usize][col as usize]
    }

    /// Cell category under a world-space point.
    #[inline]
    pub fn classify_point(&self, px: f32, py: f32) -> Tile {
        self.classify(tile_index(px), tile_index(py))
    }

    #[inline]
    pub fn solid_at(&self, px: f32, py: f32) -> bool {
        self.classify_point(px, py).is_solid()
    }

    #[inline]
    pub fn climbable_at(&self, px: f32, py: f32) -> bool {
        self.classify_point(px, py).is_climbable()
    }

    pub fn width(&self) -> usize {
        GRID_W
    }

    pub fn height(&self) -> usize {
        GRID_H
    }
}

/// Tile coordinate containing a world-space coordinate.
#[inline]
pub fn tile_index(p: f32) -> i32 {
    (p / TILE).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAT: [&str; 12] = [
        "0000000000000000",
        "0000000000000000",
        "0000000000000000",
        "0000000000000000",
        "0000000000000000",
        "0000000000000000",
        "0000000000000000",
        "0000000000000000",
        "0000000000000000",
        "0011110000000000",
        "0000000000000000",
        "1111111111111111",
    ];

    #[test]
    fn parses_solid_and_empty() {
        let g = TileGrid::build_from_layout(&FLAT, &[]);
        assert_eq!(g.classify(0, 11), Tile::Solid);
        assert_eq!(g.classify(2, 9), Tile::Solid);
        assert_eq!(g.classify(1, 9), Tile::Empty);
        assert_eq!(g.classify(7, 0), Tile::Empty);
    }

    #[test]
    fn out_of_range_is_solid() {
        let g = TileGrid::build_from_layout(&FLAT, &[]);
        assert_eq!(g.classify(-1, 3), Tile::Solid);
        assert_eq!(g.classify(16, 3), Tile::Solid);
        assert_eq!(g.classify(3, -1), Tile::Solid);
        assert_eq!(g.classify(3, 12), Tile::Solid);
        assert!(g.solid_at(-0.5, 10.0));
        assert!(g.solid_at(WIDTH + 10.0, 40.0));
    }

    #[test]
    fn ladder_overwrites_upward() {
        let g = TileGrid::build_from_layout(&FLAT, &[LadderSpec::new(3, 10, 3)]);
        assert_eq!(g.classify(3, 10), Tile::Climbable);
        assert_eq!(g.classify(3, 9), Tile::Climbable); // was solid
        assert_eq!(g.classify(3, 8), Tile::Climbable);
        assert_eq!(g.classify(3, 7), Tile::Empty);
        assert_eq!(g.classify(3, 11), Tile::Solid);
    }

    #[test]
    fn ladder_clipped_at_edges() {
        let ladders = [
            LadderSpec::new(5, 1, 4),   // runs past row 0
            LadderSpec::new(20, 5, 2),  // column off the grid
            LadderSpec::new(6, 14, 4),  // starts below the grid
            LadderSpec::new(7, 4, -2),  // negative height
        ];
        let g = TileGrid::build_from_layout(&FLAT, &ladders);
        assert_eq!(g.classify(5, 1), Tile::Climbable);
        assert_eq!(g.classify(5, 0), Tile::Climbable);
        assert_eq!(g.classify(6, 11), Tile::Climbable);
        assert_eq!(g.classify(6, 10), Tile::Empty);
        assert_eq!(g.classify(7, 4), Tile::Empty);
    }

    #[test]
    fn short_layout_pads_with_empty() {
        let g = TileGrid::build_from_layout(&["11"], &[]);
        assert_eq!(g.classify(1, 0), Tile::Solid);
        assert_eq!(g.classify(2, 0), Tile::Empty);
        assert_eq!(g.classify(0, 5), Tile::Empty);
    }

    #[test]
    fn point_queries_use_floor() {
        let g = TileGrid::build_from_layout(&FLAT, &[]);
        assert!(g.solid_at(32.0, 144.0));
        assert!(!g.solid_at(31.9, 144.0));
        assert_eq!(tile_index(-0.01), -1);
    }
}
