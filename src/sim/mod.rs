//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, velocities in pixels per tick
//! - Seeded RNG only
//! - Stable iteration order (row-major grid scans)
//! - No rendering or platform dependencies

pub mod collision;
pub mod grid;
pub mod level;
pub mod matching;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{Contact, advance_projectile, detect_contact, snap_cell};
pub use grid::{GridCoord, GridLayout, HexGrid};
pub use level::{LevelConfig, LevelProgress, crosses_danger_line, generate_grid, pick_color};
pub use matching::{MatchOutcome, find_anchored, find_cluster, find_floating, resolve_matches};
pub use snapshot::{BubbleView, Snapshot};
pub use state::{Bubble, BubbleColor, GameEvent, GamePhase, GameSession, Shooter};
pub use tick::{TickInput, tick};
