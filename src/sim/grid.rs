//! Offset-coordinate hex grid holding the resident bubbles
//!
//! Rows grow downward from the ceiling. Odd rows are shifted right by one
//! radius, so the neighbor table depends on row parity. Columns are fixed;
//! rows are added on demand when a projectile snaps below the last row.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Bubble, BubbleColor};
use crate::error::GridError;
use crate::tuning::Tuning;

/// Neighbor offsets (d_row, d_col) for even rows
const EVEN_ROW_OFFSETS: [(i32, i32); 6] = [(-1, -1), (-1, 0), (0, -1), (0, 1), (1, -1), (1, 0)];
/// Neighbor offsets (d_row, d_col) for odd rows (shifted right)
const ODD_ROW_OFFSETS: [(i32, i32); 6] = [(-1, 0), (-1, 1), (0, -1), (0, 1), (1, 0), (1, 1)];

/// A (row, col) cell address. Signed so intermediate results may go out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub row: i32,
    pub col: i32,
}

impl GridCoord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[inline]
    pub fn is_odd_row(&self) -> bool {
        self.row.rem_euclid(2) == 1
    }

    /// All six adjacent addresses, unfiltered
    pub fn neighbors(&self) -> [GridCoord; 6] {
        let offsets = if self.is_odd_row() {
            ODD_ROW_OFFSETS
        } else {
            EVEN_ROW_OFFSETS
        };
        offsets.map(|(dr, dc)| GridCoord::new(self.row + dr, self.col + dc))
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Pixel layout of the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub radius: f32,
    pub cols: usize,
    pub row_height: f32,
    pub top_margin: f32,
}

impl GridLayout {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            radius: tuning.bubble_radius,
            cols: tuning.cols,
            row_height: tuning.row_height(),
            top_margin: tuning.top_margin,
        }
    }
}

/// Grid storage: dense rows of optional bubbles.
///
/// Saved grids are checked on load: every row must have one slot per
/// column and every bubble must be attached to the cell it is stored in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StoredGrid")]
pub struct HexGrid {
    pub layout: GridLayout,
    /// Cumulative downward shift applied by ceiling drops
    ceiling_offset: f32,
    rows: Vec<Vec<Option<Bubble>>>,
}

/// Serialized form of [`HexGrid`], validated before use
#[derive(Deserialize)]
struct StoredGrid {
    layout: GridLayout,
    ceiling_offset: f32,
    rows: Vec<Vec<Option<Bubble>>>,
}

impl TryFrom<StoredGrid> for HexGrid {
    type Error = GridError;

    fn try_from(stored: StoredGrid) -> Result<Self, GridError> {
        let cols = stored.layout.cols;
        for (r, row) in stored.rows.iter().enumerate() {
            if row.len() != cols {
                return Err(GridError::RaggedRow {
                    row: r,
                    len: row.len(),
                    expected: cols,
                });
            }
            for (c, cell) in row.iter().enumerate() {
                let Some(bubble) = cell else { continue };
                if bubble.cell != Some(GridCoord::new(r as i32, c as i32)) {
                    return Err(GridError::CellMismatch { row: r, col: c });
                }
            }
        }
        Ok(Self {
            layout: stored.layout,
            ceiling_offset: stored.ceiling_offset,
            rows: stored.rows,
        })
    }
}

impl HexGrid {
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            ceiling_offset: 0.0,
            rows: Vec::new(),
        }
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.layout.cols
    }

    /// Number of allocated rows (populated or not)
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn ceiling_offset(&self) -> f32 {
        self.ceiling_offset
    }

    /// True if the address lies inside the allocated grid
    pub fn in_bounds(&self, coord: GridCoord) -> bool {
        coord.row >= 0
            && coord.col >= 0
            && (coord.row as usize) < self.rows.len()
            && (coord.col as usize) < self.layout.cols
    }

    /// True if the column is valid and the row is non-negative (rows can grow)
    pub fn is_placeable(&self, coord: GridCoord) -> bool {
        coord.row >= 0 && coord.col >= 0 && (coord.col as usize) < self.layout.cols
    }

    /// Bubble at a cell. Any address, including negative or past the end, is safe.
    pub fn get(&self, coord: GridCoord) -> Option<&Bubble> {
        if !self.in_bounds(coord) {
            return None;
        }
        self.rows
            .get(coord.row as usize)
            .and_then(|row| row.get(coord.col as usize))
            .and_then(Option::as_ref)
    }

    pub fn color_at(&self, coord: GridCoord) -> Option<BubbleColor> {
        self.get(coord).map(|b| b.color)
    }

    #[inline]
    pub fn is_occupied(&self, coord: GridCoord) -> bool {
        self.get(coord).is_some()
    }

    /// Adjacent addresses that lie inside the column range and below the ceiling.
    ///
    /// Rows past the last allocated row are included so snapping can look
    /// at them; lookups there simply come back empty.
    pub fn neighbors_of(&self, coord: GridCoord) -> impl Iterator<Item = GridCoord> + '_ {
        coord
            .neighbors()
            .into_iter()
            .filter(move |n| self.is_placeable(*n))
    }

    /// Adjacent cells that hold a bubble
    pub fn occupied_neighbors(&self, coord: GridCoord) -> impl Iterator<Item = GridCoord> + '_ {
        coord
            .neighbors()
            .into_iter()
            .filter(move |n| self.is_occupied(*n))
    }

    /// Center of a cell in board pixels
    pub fn cell_to_pixel(&self, coord: GridCoord) -> Vec2 {
        let r = self.layout.radius;
        let shift = if coord.is_odd_row() { r } else { 0.0 };
        let x = coord.col as f32 * r * 2.0 + r + shift;
        let y = coord.row as f32 * self.layout.row_height + r + self.layout.top_margin + self.ceiling_offset;
        Vec2::new(x, y)
    }

    /// Nearest cell to a pixel position, column clamped into range, row clamped to >= 0
    pub fn pixel_to_cell(&self, pos: Vec2) -> GridCoord {
        let r = self.layout.radius;
        let row = ((pos.y - self.layout.top_margin - self.ceiling_offset) / self.layout.row_height)
            .floor()
            .max(0.0) as i32;
        let shift = if row % 2 == 1 { r } else { 0.0 };
        let col = ((pos.x - r - shift) / (r * 2.0)).round() as i32;
        let max_col = self.layout.cols as i32 - 1;
        GridCoord::new(row, col.clamp(0, max_col))
    }

    /// Place a bubble, attaching it to the cell and moving it to the cell center.
    ///
    /// Returns the previous occupant, if any. Addresses with an invalid column
    /// or negative row are rejected and hand the bubble back.
    pub fn place(&mut self, coord: GridCoord, mut bubble: Bubble) -> Result<Option<Bubble>, Bubble> {
        if !self.is_placeable(coord) {
            return Err(bubble);
        }
        let row = coord.row as usize;
        if row >= self.rows.len() {
            let cols = self.layout.cols;
            self.rows.resize_with(row + 1, || vec![None; cols]);
        }
        bubble.pos = self.cell_to_pixel(coord);
        bubble.vel = Vec2::ZERO;
        bubble.cell = Some(coord);
        match self.rows.get_mut(row).and_then(|r| r.get_mut(coord.col as usize)) {
            Some(slot) => Ok(slot.replace(bubble)),
            None => Err(bubble),
        }
    }

    /// Take a bubble out of the grid, detaching it from its cell
    pub fn remove(&mut self, coord: GridCoord) -> Option<Bubble> {
        if !self.in_bounds(coord) {
            return None;
        }
        let mut bubble = self
            .rows
            .get_mut(coord.row as usize)
            .and_then(|row| row.get_mut(coord.col as usize))
            .and_then(Option::take)?;
        bubble.cell = None;
        Some(bubble)
    }

    /// Drop every bubble and reset the ceiling
    pub fn clear(&mut self) {
        self.rows.clear();
        self.ceiling_offset = 0.0;
    }

    /// Shift the ceiling and every resident bubble down by `amount` pixels
    pub fn lower_ceiling(&mut self, amount: f32) {
        self.ceiling_offset += amount;
        for bubble in self.rows.iter_mut().flatten().flatten() {
            bubble.pos.y += amount;
        }
    }

    /// Number of resident bubbles
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Resident bubbles in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, &Bubble)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(c, cell)| cell.as_ref().map(|b| (GridCoord::new(r as i32, c as i32), b)))
        })
    }

    /// Occupied coordinates in row-major order
    pub fn coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.iter().map(|(coord, _)| coord)
    }

    /// Lowest y reached by any resident bubble's lower edge
    pub fn lowest_edge(&self) -> Option<f32> {
        self.iter()
            .map(|(_, b)| b.pos.y + self.layout.radius)
            .reduce(f32::max)
    }
}
