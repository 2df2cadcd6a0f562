//! Projectile flight, contact detection and grid snapping
//!
//! The projectile flies in a straight line at constant speed, bouncing off
//! the side walls, until it touches a resident bubble or the ceiling.

use std::collections::HashSet;

use glam::Vec2;

use super::grid::{GridCoord, HexGrid};
use super::state::Bubble;

/// Safety limit on the nearest-empty-cell search
const MAX_SNAP_SEARCH: usize = 512;

/// What the projectile touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Within two radii of the bubble resident at this cell
    Bubble(GridCoord),
    /// Leading edge reached the ceiling line
    Ceiling,
}

/// Move the projectile one tick, reflecting off the side walls
pub fn advance_projectile(projectile: &mut Bubble, radius: f32, board_width: f32) {
    projectile.pos += projectile.vel;

    if projectile.pos.x - radius <= 0.0 && projectile.vel.x < 0.0 {
        projectile.vel.x = -projectile.vel.x;
        projectile.pos.x = radius;
    } else if projectile.pos.x + radius >= board_width && projectile.vel.x > 0.0 {
        projectile.vel.x = -projectile.vel.x;
        projectile.pos.x = board_width - radius;
    }
}

/// Check whether the projectile at `pos` touches the grid or the ceiling.
///
/// Bubbles are tested first so a shot grazing both snaps next to the bubble.
pub fn detect_contact(grid: &HexGrid, pos: Vec2) -> Option<Contact> {
    let radius = grid.layout.radius;
    let reach_sq = (radius * 2.0) * (radius * 2.0);

    let hit = grid
        .iter()
        .find(|(_, bubble)| bubble.pos.distance_squared(pos) < reach_sq)
        .map(|(coord, _)| Contact::Bubble(coord));
    if hit.is_some() {
        return hit;
    }

    if pos.y - radius <= grid.ceiling_offset() {
        return Some(Contact::Ceiling);
    }
    None
}

/// Cell a projectile at `pos` should occupy.
///
/// Normally the nearest cell is free. If it is taken, the closest free cell
/// reachable through neighboring cells is used instead.
pub fn snap_cell(grid: &HexGrid, pos: Vec2) -> Option<GridCoord> {
    let target = grid.pixel_to_cell(pos);
    if !grid.is_occupied(target) {
        return Some(target);
    }

    let mut checked = HashSet::new();
    let mut ring = vec![target];
    checked.insert(target);

    while !ring.is_empty() && checked.len() < MAX_SNAP_SEARCH {
        let mut next_ring = Vec::new();
        for coord in &ring {
            for neighbor in grid.neighbors_of(*coord) {
                if checked.insert(neighbor) {
                    next_ring.push(neighbor);
                }
            }
        }

        let best = next_ring
            .iter()
            .filter(|c| !grid.is_occupied(**c))
            .min_by(|a, b| {
                let da = grid.cell_to_pixel(**a).distance_squared(pos);
                let db = grid.cell_to_pixel(**b).distance_squared(pos);
                da.total_cmp(&db)
            });
        if let Some(coord) = best {
            return Some(*coord);
        }
        ring = next_ring;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::GridLayout;
    use crate::sim::state::BubbleColor;
    use crate::tuning::Tuning;

    fn grid() -> HexGrid {
        HexGrid::new(GridLayout::from_tuning(&Tuning::default()))
    }

    #[test]
    fn test_advance_moves_at_constant_velocity() {
        let mut b = Bubble::at(BubbleColor::Red, Vec2::new(210.0, 550.0));
        b.vel = Vec2::new(0.0, -10.0);
        for _ in 0..5 {
            advance_projectile(&mut b, 20.0, 420.0);
        }
        assert_eq!(b.pos, Vec2::new(210.0, 500.0));
        assert_eq!(b.vel, Vec2::new(0.0, -10.0));
    }

    #[test]
    fn test_wall_bounce() {
        let mut b = Bubble::at(BubbleColor::Red, Vec2::new(25.0, 300.0));
        b.vel = Vec2::new(-8.0, -6.0);
        advance_projectile(&mut b, 20.0, 420.0);
        assert_eq!(b.vel, Vec2::new(8.0, -6.0));
        assert_eq!(b.pos.x, 20.0);

        // Moving away from the wall does not flip again
        advance_projectile(&mut b, 20.0, 420.0);
        assert_eq!(b.vel.x, 8.0);

        let mut b = Bubble::at(BubbleColor::Red, Vec2::new(395.0, 300.0));
        b.vel = Vec2::new(8.0, -6.0);
        advance_projectile(&mut b, 20.0, 420.0);
        assert_eq!(b.vel.x, -8.0);
        assert_eq!(b.pos.x, 400.0);
    }

    #[test]
    fn test_contact_with_bubble_and_ceiling() {
        let mut g = grid();
        g.place(GridCoord::new(0, 4), Bubble::new(BubbleColor::Red)).unwrap();
        let center = g.cell_to_pixel(GridCoord::new(0, 4));

        assert_eq!(
            detect_contact(&g, center + Vec2::new(0.0, 39.0)),
            Some(Contact::Bubble(GridCoord::new(0, 4)))
        );
        assert_eq!(detect_contact(&g, center + Vec2::new(0.0, 41.0)), None);

        // Far from the bubble but at the ceiling
        assert_eq!(detect_contact(&g, Vec2::new(380.0, 20.0)), Some(Contact::Ceiling));

        // Ceiling follows drops
        g.lower_ceiling(36.0);
        assert_eq!(detect_contact(&g, Vec2::new(380.0, 50.0)), Some(Contact::Ceiling));
    }

    #[test]
    fn test_snap_to_free_cell() {
        let g = grid();
        assert_eq!(snap_cell(&g, Vec2::new(101.0, 70.0)), Some(GridCoord::new(1, 2)));
    }

    #[test]
    fn test_snap_avoids_occupied_cell() {
        let mut g = grid();
        g.place(GridCoord::new(1, 2), Bubble::new(BubbleColor::Red)).unwrap();
        let cell = snap_cell(&g, Vec2::new(101.0, 70.0)).unwrap();
        assert_ne!(cell, GridCoord::new(1, 2));
        assert!(!g.is_occupied(cell));
        assert!(GridCoord::new(1, 2).neighbors().contains(&cell));
    }
}
