/// Item placement on platform tops.
///
/// A platform top is a Solid cell whose upper neighbour is not Solid.
/// Candidates are collected in row-major order (row 0 excluded) and
/// `count` of them are picked at even index spacing, so the first and
/// last candidates are always used. Asking for more items than there are
/// candidates repeats some of them.

use super::entity::Item;
use super::tile::{TileGrid, TILE};

/// Items float this far above the tile top.
const ITEM_LIFT: f32 = 8.0;

/// Every platform-top cell as `(col, row)`, in scan order.
pub fn platform_tops(grid: &TileGrid) -> Vec<(i32, i32)> {
    let mut tops = Vec::new();
    for row in 1..grid.height() as i32 {
        for col in 0..grid.width() as i32 {
            if grid.classify(col, row).is_solid() && !grid.classify(col, row - 1).is_solid() {
                tops.push((col, row));
            }
        }
    }
    tops
}

/// Pick `count` items spread evenly over the platform tops.
pub fn place(grid: &TileGrid, count: usize) -> Vec<Item> {
    let tops = platform_tops(grid);
    if tops.is_empty() {
        return Vec::new();
    }

    let n = tops.len();
    let span = count.saturating_sub(1).max(1);
    (0..count)
        .map(|i| {
            let (col, row) = tops[i * (n - 1) / span];
            Item {
                x: col as f32 * TILE + TILE / 2.0,
                y: row as f32 * TILE - ITEM_LIFT,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tile::LadderSpec;
    use crate::sim::level;
    use proptest::prelude::*;

    const SHELF: [&str; 12] = [
        "1111111111111111",
        "0000000000000000",
        "0000000000000000",
        "0000000000000000",
        "0000000000000000",
        "0000000000000000",
        "0000000000000000",
        "0000000000000000",
        "0000000000000000",
        "0000110000000000",
        "0000110000000000",
        "0000000000000000",
    ];

    #[test]
    fn finds_tops_in_scan_order() {
        let g = TileGrid::build_from_layout(&SHELF, &[]);
        // Row 0 is never a candidate; row 10 is covered by row 9.
        assert_eq!(platform_tops(&g), vec![(4, 9), (5, 9)]);
    }

    #[test]
    fn ladder_cell_exposes_the_tile_below() {
        let g = TileGrid::build_from_layout(&SHELF, &[LadderSpec::new(5, 9, 1)]);
        assert_eq!(platform_tops(&g), vec![(4, 9), (5, 10)]);
    }

    #[test]
    fn empty_grid_places_nothing() {
        let g = TileGrid::build_from_layout(&[], &[]);
        assert!(place(&g, 6).is_empty());
    }

    #[test]
    fn item_sits_above_tile_centre() {
        let g = TileGrid::build_from_layout(&SHELF, &[]);
        let items = place(&g, 1);
        assert_eq!(items, vec![Item { x: 72.0, y: 136.0 }]);
    }

    #[test]
    fn more_items_than_tops_repeats() {
        let g = TileGrid::build_from_layout(&SHELF, &[]);
        let items = place(&g, 5);
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].x, 72.0);
        assert_eq!(items[4].x, 88.0);
        assert!(items.iter().filter(|it| it.x == 72.0).count() >= 2);
    }

    #[test]
    fn zero_count_is_empty() {
        let g = TileGrid::build_from_layout(&SHELF, &[]);
        assert!(place(&g, 0).is_empty());
    }

    #[test]
    fn builtin_levels_have_room_for_items() {
        for idx in 0..level::LEVEL_COUNT {
            let g = level::builtin(idx).grid();
            assert!(platform_tops(&g).len() >= 10, "level {idx}");
        }
    }

    proptest! {
        #[test]
        fn count_and_endpoints(idx in 0..level::LEVEL_COUNT, count in 1usize..40) {
            let g = level::builtin(idx).grid();
            let tops = platform_tops(&g);
            let items = place(&g, count);
            prop_assert_eq!(items.len(), count);

            let to_item = |(c, r): (i32, i32)| Item { x: c as f32 * TILE + 8.0, y: r as f32 * TILE - 8.0 };
            prop_assert_eq!(items[0], to_item(tops[0]));
            if count > 1 {
                prop_assert_eq!(items[count - 1], to_item(tops[tops.len() - 1]));
            }
        }
    }
}
