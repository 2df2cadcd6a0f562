//! Match detection - same-color clusters and floating bubble pruning
//!
//! Both passes are depth-first searches with an explicit stack and a
//! visited set, so they terminate on any grid shape. Pruning must run after
//! the matched cluster is gone: the set of anchored bubbles depends on it.

use std::collections::HashSet;

use super::grid::{GridCoord, HexGrid};
use super::state::{Bubble, BubbleColor};

/// What a landing removed from the grid
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    /// Color of the popped cluster (None if nothing popped)
    pub color: Option<BubbleColor>,
    /// Bubbles removed as part of the same-color cluster
    pub popped: Vec<Bubble>,
    /// Bubbles cut loose from the ceiling after the pop
    pub dropped: Vec<Bubble>,
}

impl MatchOutcome {
    pub fn is_empty(&self) -> bool {
        self.popped.is_empty() && self.dropped.is_empty()
    }
}

/// Connected same-color bubbles containing `start`, in visit order.
///
/// Empty if `start` holds no bubble.
pub fn find_cluster(grid: &HexGrid, start: GridCoord) -> Vec<GridCoord> {
    let Some(color) = grid.color_at(start) else {
        return Vec::new();
    };

    let mut cluster = Vec::new();
    let mut visited = HashSet::new();
    let mut stack = vec![start];
    visited.insert(start);

    while let Some(coord) = stack.pop() {
        cluster.push(coord);
        for neighbor in grid.occupied_neighbors(coord) {
            if grid.color_at(neighbor) == Some(color) && visited.insert(neighbor) {
                stack.push(neighbor);
            }
        }
    }

    cluster
}

/// Every bubble connected to row 0 through occupied cells
pub fn find_anchored(grid: &HexGrid) -> HashSet<GridCoord> {
    let mut anchored = HashSet::new();
    let mut stack: Vec<GridCoord> = grid.coords().take_while(|c| c.row == 0).collect();
    anchored.extend(stack.iter().copied());

    while let Some(coord) = stack.pop() {
        for neighbor in grid.occupied_neighbors(coord) {
            if anchored.insert(neighbor) {
                stack.push(neighbor);
            }
        }
    }

    anchored
}

/// Bubbles not connected to row 0, in row-major order
pub fn find_floating(grid: &HexGrid) -> Vec<GridCoord> {
    let anchored = find_anchored(grid);
    grid.coords().filter(|c| !anchored.contains(c)).collect()
}

/// Pop the cluster at `start` if it has at least `min_match` bubbles, then
/// detach everything left hanging. Nothing is pruned when nothing pops.
pub fn resolve_matches(grid: &mut HexGrid, start: GridCoord, min_match: usize) -> MatchOutcome {
    let cluster = find_cluster(grid, start);
    if cluster.len() < min_match {
        return MatchOutcome::default();
    }

    let color = grid.color_at(start);
    let popped: Vec<Bubble> = cluster.iter().filter_map(|c| grid.remove(*c)).collect();

    let floating = find_floating(grid);
    let dropped: Vec<Bubble> = floating.iter().filter_map(|c| grid.remove(*c)).collect();

    log::debug!(
        "Popped {} {:?} at {}, dropped {}",
        popped.len(),
        color,
        start,
        dropped.len()
    );

    MatchOutcome {
        color,
        popped,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::GridLayout;
    use crate::tuning::Tuning;
    use BubbleColor::*;

    fn grid_with(cells: &[((i32, i32), BubbleColor)]) -> HexGrid {
        let mut g = HexGrid::new(GridLayout::from_tuning(&Tuning::default()));
        for &((row, col), color) in cells {
            g.place(GridCoord::new(row, col), Bubble::new(color)).unwrap();
        }
        g
    }

    #[test]
    fn test_cluster_of_three() {
        let g = grid_with(&[((0, 0), Red), ((0, 1), Red), ((1, 0), Red), ((0, 2), Blue)]);
        let mut cluster = find_cluster(&g, GridCoord::new(0, 0));
        cluster.sort();
        assert_eq!(
            cluster,
            vec![GridCoord::new(0, 0), GridCoord::new(0, 1), GridCoord::new(1, 0)]
        );
    }

    #[test]
    fn test_cluster_of_empty_cell() {
        let g = grid_with(&[((0, 0), Red)]);
        assert!(find_cluster(&g, GridCoord::new(4, 4)).is_empty());
        assert!(find_cluster(&g, GridCoord::new(-1, 0)).is_empty());
    }

    #[test]
    fn test_cluster_terminates_on_cycles() {
        // A solid block of one color is full of cycles
        let mut cells = Vec::new();
        for row in 0..6 {
            for col in 0..10 {
                cells.push(((row, col), Green));
            }
        }
        let g = grid_with(&cells);
        let cluster = find_cluster(&g, GridCoord::new(3, 5));
        assert_eq!(cluster.len(), 60);
        let unique: HashSet<_> = cluster.iter().collect();
        assert_eq!(unique.len(), 60);
    }

    #[test]
    fn test_pair_does_not_pop() {
        let mut g = grid_with(&[((0, 0), Red), ((0, 1), Red), ((0, 2), Blue)]);
        let outcome = resolve_matches(&mut g, GridCoord::new(0, 1), 3);
        assert!(outcome.is_empty());
        assert_eq!(outcome.color, None);
        assert_eq!(g.len(), 3);
    }

    #[test]
    fn test_pop_and_drop() {
        // Blue column hangs from the ceiling, green bubble hangs off the blues
        let mut g = grid_with(&[
            ((0, 0), Red),
            ((0, 5), Blue),
            ((1, 5), Blue),
            ((2, 5), Blue),
            ((3, 4), Green),
        ]);
        assert!(find_floating(&g).is_empty());

        let outcome = resolve_matches(&mut g, GridCoord::new(2, 5), 3);
        assert_eq!(outcome.color, Some(Blue));
        assert_eq!(outcome.popped.len(), 3);
        assert_eq!(outcome.dropped.len(), 1);
        assert_eq!(outcome.dropped[0].color, Green);
        assert_eq!(outcome.dropped[0].cell, None);

        assert_eq!(g.len(), 1);
        assert!(g.is_occupied(GridCoord::new(0, 0)));
    }

    #[test]
    fn test_anchored_through_other_colors() {
        let mut g = grid_with(&[
            ((0, 3), Red),
            ((1, 3), Yellow),
            ((2, 3), Red),
            ((2, 4), Red),
            ((2, 5), Red),
        ]);
        let outcome = resolve_matches(&mut g, GridCoord::new(2, 4), 3);
        // (2,3),(2,4),(2,5) pop; the ceiling red is not connected by color through yellow
        assert_eq!(outcome.popped.len(), 3);
        assert!(outcome.dropped.is_empty());
        assert_eq!(g.len(), 2);
    }
}
