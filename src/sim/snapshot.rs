//! Read-only view of a session for renderers
//!
//! Built once per frame; nothing here feeds back into the simulation.

use glam::Vec2;
use serde::Serialize;

use super::state::{Bubble, BubbleColor, GamePhase, GameSession};

/// A bubble as a renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleView {
    pub x: f32,
    pub y: f32,
    pub color: BubbleColor,
    /// Grid cell, present only for resident bubbles
    pub row: Option<i32>,
    pub col: Option<i32>,
}

impl From<&Bubble> for BubbleView {
    fn from(b: &Bubble) -> Self {
        Self {
            x: b.pos.x,
            y: b.pos.y,
            color: b.color,
            row: b.cell.map(|c| c.row),
            col: b.cell.map(|c| c.col),
        }
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub board_width: f32,
    pub board_height: f32,
    pub radius: f32,
    pub grid: Vec<BubbleView>,
    pub projectile: Option<BubbleView>,
    pub current: Option<BubbleView>,
    pub next: Option<BubbleView>,
    pub shooter: Vec2,
    pub aim_angle: f32,
    pub ceiling_offset: f32,
    pub danger_line: f32,
    pub falling: Vec<BubbleView>,
    pub score: u64,
    pub high_score: u64,
    pub level: u32,
    pub shots_until_drop: u32,
    pub advancing: bool,
    pub game_over: bool,
}

impl GameSession {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board_width: self.tuning.board_width,
            board_height: self.tuning.board_height,
            radius: self.tuning.bubble_radius,
            grid: self.grid.iter().map(|(_, b)| b.into()).collect(),
            projectile: self.projectile.as_ref().map(BubbleView::from),
            current: self.shooter.current.as_ref().map(BubbleView::from),
            next: self.shooter.next.as_ref().map(BubbleView::from),
            shooter: self.tuning.shooter_origin(),
            aim_angle: self.shooter.angle,
            ceiling_offset: self.grid.ceiling_offset(),
            danger_line: self.tuning.danger_line(),
            falling: self.falling.iter().map(BubbleView::from).collect(),
            score: self.score,
            high_score: self.high_score,
            level: self.progress.level,
            shots_until_drop: self.shots_until_drop(),
            advancing: matches!(self.phase, GamePhase::Advancing { .. }),
            game_over: self.phase == GamePhase::GameOver,
        }
    }
}
