//! Bubble Shooter - hex-grid bubble popping arcade core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, collisions, matching, levels)
//! - `tuning`: Data-driven game balance
//! - `highscores`: High score persistence backends
//! - `game`: Host wrapper tying a session to a high score store

pub mod error;
pub mod game;
pub mod highscores;
pub mod sim;
pub mod tuning;

pub use error::{GridError, StoreError, TuningError};
pub use game::Game;
pub use highscores::{HighScoreStore, MemoryStore};
pub use sim::{GameEvent, GamePhase, GameSession, TickInput, tick};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Bubble radius in pixels
    pub const BUBBLE_RADIUS: f32 = 20.0;
    /// Columns per grid row
    pub const COLS: usize = 10;
    /// Rows that fit above the danger line
    pub const DANGER_ROWS: u32 = 12;
    /// Vertical distance between row centers, as a multiple of the radius.
    /// Less than 2.0 so rows nest into each other.
    pub const ROW_HEIGHT_FACTOR: f32 = 1.8;
    /// Gap between the ceiling and the top of row 0
    pub const TOP_MARGIN: f32 = 10.0;

    /// Board dimensions
    pub const BOARD_WIDTH: f32 = COLS as f32 * BUBBLE_RADIUS * 2.0 + BUBBLE_RADIUS;
    pub const BOARD_HEIGHT: f32 = 600.0;
    /// Shooter sits this far above the bottom edge
    pub const SHOOTER_INSET: f32 = 50.0;

    /// Projectile speed (pixels per tick)
    pub const PROJECTILE_SPEED: f32 = 10.0;
    /// Aim is limited to ±60° from vertical
    pub const MAX_AIM_ANGLE: f32 = std::f32::consts::FRAC_PI_3;

    /// Falling bubble physics (per tick)
    pub const FALL_GRAVITY: f32 = 0.5;
    pub const FALL_INITIAL_VY: f32 = 2.0;
    pub const FALL_VX_SPREAD: f32 = 1.0;

    /// Scoring
    pub const MIN_MATCH: usize = 3;
    pub const POINTS_PER_MATCH: u64 = 10;
    pub const POINTS_PER_DROP: u64 = 20;
    pub const CLEAR_BONUS_PER_LEVEL: u64 = 100;

    /// Delay between a full clear and the next level's grid (~500ms at 60 Hz)
    pub const ADVANCE_DELAY_TICKS: u32 = 30;
}

/// Clamp an aim angle (radians from vertical) to `[-max, max]`
#[inline]
pub fn clamp_aim(angle: f32, max: f32) -> f32 {
    if angle.is_nan() {
        return 0.0;
    }
    angle.clamp(-max, max)
}

/// Convert a pointer position into an aim angle relative to the shooter.
///
/// Screen y grows downward, so straight up is angle 0 and right is positive.
#[inline]
pub fn aim_from_pointer(origin: Vec2, pointer: Vec2, max: f32) -> f32 {
    let d = pointer - origin;
    clamp_aim(d.x.atan2(-d.y), max)
}

/// Unit direction for an aim angle (screen coordinates, y down)
#[inline]
pub fn aim_direction(angle: f32) -> Vec2 {
    Vec2::new(angle.sin(), -angle.cos())
}
