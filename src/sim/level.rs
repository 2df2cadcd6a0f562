//! Level configuration and progression
//!
//! Levels 1-5 come from a fixed table. Past level 5 the difficulty keeps
//! scaling: one more starting row every two levels (up to 8) and one fewer
//! shot between ceiling drops every two levels (down to 4).

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{GridCoord, HexGrid};
use super::state::{Bubble, BubbleColor};

/// Per-level difficulty settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub color_count: usize,
    pub initial_rows: u32,
    pub shots_until_drop: u32,
}

const LEVEL_TABLE: [LevelConfig; 5] = [
    LevelConfig { color_count: 3, initial_rows: 3, shots_until_drop: 15 },
    LevelConfig { color_count: 4, initial_rows: 4, shots_until_drop: 12 },
    LevelConfig { color_count: 5, initial_rows: 4, shots_until_drop: 10 },
    LevelConfig { color_count: 6, initial_rows: 5, shots_until_drop: 9 },
    LevelConfig { color_count: 6, initial_rows: 5, shots_until_drop: 8 },
];

/// Starting rows never exceed this, keeping fresh grids well above the danger line
pub const MAX_INITIAL_ROWS: u32 = 8;
/// Ceiling drops never come more often than this
pub const MIN_SHOTS_UNTIL_DROP: u32 = 4;

impl LevelConfig {
    /// Configuration for a 1-based level (0 is treated as 1)
    pub fn for_level(level: u32) -> Self {
        let last = LEVEL_TABLE.len() as u32;
        if level <= last {
            return LEVEL_TABLE[level.max(1) as usize - 1];
        }
        let base = LEVEL_TABLE[LEVEL_TABLE.len() - 1];
        let steps = (level - last) / 2;
        Self {
            color_count: base.color_count,
            initial_rows: (base.initial_rows + steps).min(MAX_INITIAL_ROWS),
            shots_until_drop: base
                .shots_until_drop
                .saturating_sub(steps)
                .max(MIN_SHOTS_UNTIL_DROP),
        }
    }

    pub fn palette(&self) -> &'static [BubbleColor] {
        BubbleColor::palette(self.color_count)
    }
}

/// Level number and the ceiling-drop shot counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    /// 1-based, only ever increases within a run
    pub level: u32,
    /// Shots fired since the last ceiling drop (or level start)
    pub shots_since_drop: u32,
}

impl Default for LevelProgress {
    fn default() -> Self {
        Self {
            level: 1,
            shots_since_drop: 0,
        }
    }
}

impl LevelProgress {
    pub fn config(&self) -> LevelConfig {
        LevelConfig::for_level(self.level)
    }

    /// Count a shot. Returns true when the ceiling should drop (counter resets).
    pub fn record_shot(&mut self) -> bool {
        self.shots_since_drop += 1;
        if self.shots_since_drop >= self.config().shots_until_drop {
            self.shots_since_drop = 0;
            true
        } else {
            false
        }
    }

    /// Move to the next level, resetting the shot counter
    pub fn advance(&mut self) {
        self.level += 1;
        self.shots_since_drop = 0;
    }
}

/// Fill rows `0..initial_rows` with random colors from the level palette.
///
/// Odd rows hold one bubble fewer since they are shifted right.
pub fn generate_grid<R: Rng>(grid: &mut HexGrid, config: &LevelConfig, rng: &mut R) {
    let palette = config.palette();
    let cols = grid.cols() as i32;
    for row in 0..config.initial_rows as i32 {
        let row_cols = if row % 2 == 0 { cols } else { cols - 1 };
        for col in 0..row_cols {
            let color = palette[rng.random_range(0..palette.len())];
            let coord = GridCoord::new(row, col);
            if grid.place(coord, Bubble::new(color)).is_err() {
                log::warn!("Generated cell {} is outside the grid, skipped", coord);
            }
        }
    }
}

/// Colors present in the grid, in palette order
pub fn colors_in_grid(grid: &HexGrid) -> BTreeSet<BubbleColor> {
    grid.iter().map(|(_, b)| b.color).collect()
}

/// Draw a shooter color uniformly from the colors still on the board,
/// or from the level palette when the board is empty.
pub fn pick_color<R: Rng>(grid: &HexGrid, config: &LevelConfig, rng: &mut R) -> BubbleColor {
    let present: Vec<BubbleColor> = colors_in_grid(grid).into_iter().collect();
    let choices: &[BubbleColor] = if present.is_empty() {
        config.palette()
    } else {
        &present
    };
    choices[rng.random_range(0..choices.len())]
}

/// True if any resident bubble's lower edge has reached the danger line
pub fn crosses_danger_line(grid: &HexGrid, danger_line: f32) -> bool {
    grid.lowest_edge().is_some_and(|edge| edge >= danger_line)
}
