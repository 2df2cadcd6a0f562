//! Game state and core simulation types
//!
//! All state that must be persisted for Continue/determinism lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{GridCoord, GridLayout, HexGrid};
use super::level::{self, LevelProgress};
use crate::tuning::Tuning;

/// Bubble palette, in the order levels unlock them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BubbleColor {
    Red,
    Teal,
    Yellow,
    Green,
    Purple,
    Blue,
}

impl BubbleColor {
    pub const ALL: [BubbleColor; 6] = [
        BubbleColor::Red,
        BubbleColor::Teal,
        BubbleColor::Yellow,
        BubbleColor::Green,
        BubbleColor::Purple,
        BubbleColor::Blue,
    ];

    /// The first `count` colors (clamped to the palette size, at least one)
    pub fn palette(count: usize) -> &'static [BubbleColor] {
        &Self::ALL[..count.clamp(1, Self::ALL.len())]
    }

    /// CSS color for renderers
    pub fn hex(&self) -> &'static str {
        match self {
            BubbleColor::Red => "#ff6b6b",
            BubbleColor::Teal => "#4ecdc4",
            BubbleColor::Yellow => "#f1c40f",
            BubbleColor::Green => "#2ecc71",
            BubbleColor::Purple => "#9b59b6",
            BubbleColor::Blue => "#3498db",
        }
    }
}

/// A bubble, wherever it lives: grid, shooter, projectile slot or falling list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: BubbleColor,
    /// Grid cell while resident, `None` otherwise
    pub cell: Option<GridCoord>,
}

impl Bubble {
    pub fn new(color: BubbleColor) -> Self {
        Self::at(color, Vec2::ZERO)
    }

    pub fn at(color: BubbleColor, pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            color,
            cell: None,
        }
    }
}

/// The player's launcher
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Shooter {
    /// Aim angle (radians from vertical, positive = right)
    pub angle: f32,
    /// Loaded bubble, ready to fire
    pub current: Option<Bubble>,
    /// Preview of the bubble loaded after the next landing
    pub next: Option<Bubble>,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Grid cleared, next level's grid appears when the countdown ends
    Advancing { ticks_left: u32 },
    /// Run ended (terminal until restart)
    GameOver,
}

/// Discrete notifications for audio/UX collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired,
    BubblesPopped { color: BubbleColor, count: usize },
    BubblesDropped { count: usize },
    CeilingDropped { offset: f32 },
    LevelCleared { level: u32, bonus: u64 },
    LevelStarted { level: u32 },
    GameOver { score: u64 },
    NewHighScore { score: u64 },
}

/// Complete game session (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub grid: HexGrid,
    pub shooter: Shooter,
    /// Bubble in flight, if any
    pub projectile: Option<Bubble>,
    /// Detached bubbles animating off the board (not gameplay-affecting)
    pub falling: Vec<Bubble>,
    pub score: u64,
    pub high_score: u64,
    pub progress: LevelProgress,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    rng: Pcg32,
    /// Pending notifications, drained by the host
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Start a new game at level 1
    pub fn new(seed: u64, tuning: Tuning, high_score: u64) -> Self {
        let mut session = Self {
            seed,
            grid: HexGrid::new(GridLayout::from_tuning(&tuning)),
            tuning,
            shooter: Shooter::default(),
            projectile: None,
            falling: Vec::new(),
            score: 0,
            high_score,
            progress: LevelProgress::default(),
            phase: GamePhase::Playing,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        };
        session.start_level();
        session
    }

    /// Session with an empty grid, for hosts that lay out their own puzzles
    pub fn empty(seed: u64, tuning: Tuning) -> Self {
        let mut session = Self::new(seed, tuning, 0);
        session.grid.clear();
        session.events.clear();
        session
    }

    /// Throw away the current run and start over, keeping the high score.
    ///
    /// Any pending level advance is discarded along with the old state.
    pub fn restart(&mut self, seed: u64) {
        let high_score = self.high_score;
        let tuning = self.tuning.clone();
        *self = Self::new(seed, tuning, high_score);
        log::info!("Game restarted with seed {}", seed);
    }

    /// Regenerate the grid for the current level and reload the shooter
    pub(crate) fn start_level(&mut self) {
        let config = self.progress.config();
        self.grid.clear();
        level::generate_grid(&mut self.grid, &config, &mut self.rng);
        self.shooter.current = None;
        self.shooter.next = None;
        self.reload_shooter();
        log::info!(
            "Level {}: {} colors, {} rows, ceiling drops every {} shots",
            self.progress.level,
            config.color_count,
            config.initial_rows,
            config.shots_until_drop
        );
        self.push_event(GameEvent::LevelStarted {
            level: self.progress.level,
        });
    }

    /// Move the preview into the launcher and draw a fresh preview color
    pub(crate) fn reload_shooter(&mut self) {
        let config = self.progress.config();
        let current_color = match self.shooter.next.take() {
            Some(next) => next.color,
            None => level::pick_color(&self.grid, &config, &mut self.rng),
        };
        let next_color = level::pick_color(&self.grid, &config, &mut self.rng);
        self.shooter.current = Some(Bubble::at(current_color, self.tuning.shooter_origin()));
        self.shooter.next = Some(Bubble::at(next_color, self.tuning.next_bubble_origin()));
    }

    pub(crate) fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Add points, tracking the high score
    pub(crate) fn award(&mut self, points: u64) {
        if points == 0 {
            return;
        }
        let beat_before = self.score > self.high_score;
        self.score = self.score.saturating_add(points);
        if self.score > self.high_score {
            self.high_score = self.score;
            if !beat_before {
                self.push_event(GameEvent::NewHighScore { score: self.score });
            }
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pending events without consuming them
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn level(&self) -> u32 {
        self.progress.level
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Shots left before the ceiling drops
    pub fn shots_until_drop(&self) -> u32 {
        self.progress
            .config()
            .shots_until_drop
            .saturating_sub(self.progress.shots_since_drop)
    }

    /// Serialize the running game (pending events excluded)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore a game saved with [`GameSession::to_json`]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_sizes() {
        assert_eq!(BubbleColor::palette(3).len(), 3);
        assert_eq!(BubbleColor::palette(0).len(), 1);
        assert_eq!(BubbleColor::palette(99).len(), 6);
        assert_eq!(BubbleColor::palette(2), &[BubbleColor::Red, BubbleColor::Teal]);
    }

    #[test]
    fn test_new_session_is_ready() {
        let session = GameSession::new(42, Tuning::default(), 150);
        assert_eq!(session.level(), 1);
        assert_eq!(session.score, 0);
        assert_eq!(session.high_score, 150);
        assert_eq!(session.phase, GamePhase::Playing);
        assert!(session.projectile.is_none());
        assert!(session.shooter.current.is_some());
        assert!(session.shooter.next.is_some());
        // Level 1: 3 rows of 10 + 9 + 10
        assert_eq!(session.grid.len(), 29);
        assert_eq!(
            session.events(),
            &[GameEvent::LevelStarted { level: 1 }]
        );
    }

    #[test]
    fn test_award_tracks_high_score_once() {
        let mut session = GameSession::new(1, Tuning::default(), 20);
        session.drain_events();

        session.award(10);
        assert_eq!(session.high_score, 20);
        session.award(30);
        assert_eq!(session.score, 40);
        assert_eq!(session.high_score, 40);
        session.award(10);
        assert_eq!(session.high_score, 50);

        let highs: Vec<_> = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::NewHighScore { .. }))
            .collect();
        assert_eq!(highs, vec![GameEvent::NewHighScore { score: 40 }]);
    }

    #[test]
    fn test_restart_keeps_high_score() {
        let mut session = GameSession::new(7, Tuning::default(), 0);
        session.award(500);
        session.phase = GamePhase::Advancing { ticks_left: 10 };
        session.restart(8);
        assert_eq!(session.score, 0);
        assert_eq!(session.high_score, 500);
        assert_eq!(session.seed, 8);
        assert_eq!(session.phase, GamePhase::Playing);
    }

    #[test]
    fn test_json_roundtrip_preserves_rng() {
        let mut a = GameSession::new(99, Tuning::default(), 0);
        let mut b = GameSession::from_json(&a.to_json().unwrap()).unwrap();
        a.reload_shooter();
        b.reload_shooter();
        assert_eq!(a.shooter.next, b.shooter.next);
        assert_eq!(a.grid.len(), b.grid.len());
    }
}
