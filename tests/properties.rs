//! Property tests for the grid and match/prune passes

use std::collections::{HashSet, VecDeque};

use bubble_shooter::Tuning;
use bubble_shooter::sim::{
    Bubble, BubbleColor, GridCoord, GridLayout, HexGrid, find_anchored, find_cluster,
    find_floating, resolve_matches,
};
use proptest::prelude::*;

const ROWS: usize = 8;
const COLS: usize = 10;

fn build_grid(cells: &[Option<u8>]) -> HexGrid {
    let mut grid = HexGrid::new(GridLayout::from_tuning(&Tuning::default()));
    for (i, cell) in cells.iter().enumerate() {
        if let Some(color) = cell {
            let coord = GridCoord::new((i / COLS) as i32, (i % COLS) as i32);
            let color = BubbleColor::ALL[*color as usize];
            grid.place(coord, Bubble::new(color)).unwrap();
        }
    }
    grid
}

/// Cells of `cells` reachable from row 0, by breadth-first search over the
/// raw neighbor table
fn reachable_from_top(cells: &HashSet<GridCoord>) -> HashSet<GridCoord> {
    let mut seen: HashSet<GridCoord> = cells.iter().copied().filter(|c| c.row == 0).collect();
    let mut queue: VecDeque<GridCoord> = seen.iter().copied().collect();
    while let Some(coord) = queue.pop_front() {
        for n in coord.neighbors() {
            if cells.contains(&n) && seen.insert(n) {
                queue.push_back(n);
            }
        }
    }
    seen
}

/// Random layouts with up to four colors and roughly a third of cells empty
fn grid_cells() -> impl Strategy<Value = Vec<Option<u8>>> {
    prop::collection::vec(prop::option::weighted(0.65, 0u8..4), ROWS * COLS)
}

proptest! {
    #[test]
    fn test_neighbor_relation_is_symmetric(row in 0i32..40, col in 0i32..(COLS as i32)) {
        let coord = GridCoord::new(row, col);
        for n in coord.neighbors() {
            prop_assert!(n.neighbors().contains(&coord), "{} -> {} not mutual", coord, n);
        }
    }

    #[test]
    fn test_cluster_is_connected_single_color_and_unique(
        cells in grid_cells(),
        row in 0i32..(ROWS as i32),
        col in 0i32..(COLS as i32),
    ) {
        let grid = build_grid(&cells);
        let start = GridCoord::new(row, col);
        let cluster = find_cluster(&grid, start);

        let Some(color) = grid.color_at(start) else {
            prop_assert!(cluster.is_empty());
            return Ok(());
        };
        let unique: HashSet<_> = cluster.iter().copied().collect();
        prop_assert_eq!(unique.len(), cluster.len());
        prop_assert!(unique.contains(&start));
        for coord in &cluster {
            prop_assert_eq!(grid.color_at(*coord), Some(color));
        }
        // Closed under same-color adjacency
        for coord in &cluster {
            for n in grid.occupied_neighbors(*coord) {
                if grid.color_at(n) == Some(color) {
                    prop_assert!(unique.contains(&n));
                }
            }
        }
    }

    #[test]
    fn test_floating_and_anchored_partition_the_grid(cells in grid_cells()) {
        let grid = build_grid(&cells);
        let anchored = find_anchored(&grid);
        let floating: HashSet<_> = find_floating(&grid).into_iter().collect();

        for coord in grid.coords() {
            prop_assert!(anchored.contains(&coord) != floating.contains(&coord));
        }
        for coord in grid.coords().filter(|c| c.row == 0) {
            prop_assert!(anchored.contains(&coord));
        }
    }

    #[test]
    fn test_resolve_drops_exactly_the_unreachable(
        cells in grid_cells(),
        row in 0i32..(ROWS as i32),
        col in 0i32..(COLS as i32),
    ) {
        let mut grid = build_grid(&cells);
        let start = GridCoord::new(row, col);
        let before: HashSet<GridCoord> = grid.coords().collect();
        let cluster: HashSet<GridCoord> = find_cluster(&grid, start).into_iter().collect();

        let outcome = resolve_matches(&mut grid, start, 3);
        let remaining: HashSet<GridCoord> = grid.coords().collect();

        if cluster.len() < 3 {
            prop_assert!(outcome.is_empty());
            prop_assert_eq!(remaining, before);
            return Ok(());
        }
        prop_assert_eq!(outcome.popped.len(), cluster.len());
        for b in outcome.popped.iter().chain(&outcome.dropped) {
            prop_assert_eq!(b.cell, None);
        }

        // Whatever left the grid without being in the cluster was dropped
        let dropped: HashSet<GridCoord> = before
            .difference(&remaining)
            .copied()
            .filter(|c| !cluster.contains(c))
            .collect();
        prop_assert_eq!(dropped.len(), outcome.dropped.len());

        let post_pop: HashSet<GridCoord> = remaining.union(&dropped).copied().collect();
        let reachable = reachable_from_top(&post_pop);
        for coord in &dropped {
            prop_assert!(!reachable.contains(coord), "{} was anchored but dropped", coord);
        }
        for coord in &remaining {
            prop_assert!(reachable.contains(coord), "{} is floating but kept", coord);
        }
    }

    #[test]
    fn test_ceiling_drop_keeps_cells(cells in grid_cells(), drops in 0u32..6) {
        let mut grid = build_grid(&cells);
        let layout_cells: Vec<_> = grid.coords().collect();
        let row_height = grid.layout.row_height;

        for _ in 0..drops {
            grid.lower_ceiling(row_height);
        }

        prop_assert_eq!(grid.coords().collect::<Vec<_>>(), layout_cells);
        for (coord, b) in grid.iter() {
            prop_assert_eq!(b.cell, Some(coord));
            prop_assert_eq!(grid.pixel_to_cell(b.pos), coord);
            prop_assert!((b.pos - grid.cell_to_pixel(coord)).length() < 1e-3);
        }
    }
}
