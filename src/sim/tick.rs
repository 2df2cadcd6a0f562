//! Simulation tick
//!
//! Core game loop: one call per rendered frame advances the projectile,
//! resolves landings, animates falling bubbles and runs level transitions.

use rand::Rng;

use super::collision::{advance_projectile, detect_contact, snap_cell};
use super::grid::GridCoord;
use super::level::crosses_danger_line;
use super::matching::resolve_matches;
use super::state::{Bubble, GameEvent, GamePhase, GameSession};
use crate::{aim_direction, clamp_aim};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// New aim angle (radians from vertical), clamped on use
    pub aim: Option<f32>,
    /// Fire the loaded bubble (click/tap)
    pub fire: bool,
    /// Start a new game with this seed
    pub restart: Option<u64>,
}

impl GameSession {
    /// Update the aim angle, clamped to the allowed cone
    pub fn set_aim_angle(&mut self, angle: f32) {
        self.shooter.angle = clamp_aim(angle, self.tuning.max_aim_angle);
    }

    /// Launch the loaded bubble along the current aim.
    ///
    /// Ignored (returns false) while a shot is in flight, while the
    /// launcher is empty, during a level transition and after game over.
    pub fn fire(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            log::debug!("Fire ignored in phase {:?}", self.phase);
            return false;
        }
        if self.projectile.is_some() {
            log::debug!("Fire ignored: projectile in flight");
            return false;
        }
        let Some(mut bubble) = self.shooter.current.take() else {
            log::debug!("Fire ignored: launcher empty");
            return false;
        };

        bubble.pos = self.tuning.shooter_origin();
        bubble.vel = aim_direction(self.shooter.angle) * self.tuning.projectile_speed;
        bubble.cell = None;
        self.projectile = Some(bubble);
        self.push_event(GameEvent::ShotFired);

        if self.progress.record_shot() {
            self.drop_ceiling();
        }
        true
    }

    /// Shift the whole grid down one row height
    fn drop_ceiling(&mut self) {
        let amount = self.tuning.row_height();
        self.grid.lower_ceiling(amount);
        let offset = self.grid.ceiling_offset();
        log::info!("Ceiling dropped to {}", offset);
        self.push_event(GameEvent::CeilingDropped { offset });
    }

    /// Snap the projectile into the grid and resolve the landing
    fn land_projectile(&mut self, projectile: Bubble) {
        match snap_cell(&self.grid, projectile.pos) {
            Some(cell) => self.settle(cell, projectile),
            None => {
                log::warn!("No free cell near {:?}, discarding projectile", projectile.pos);
                self.reload_shooter();
            }
        }
    }

    /// Place a bubble at `cell` and run the landing sequence: match,
    /// prune floating bubbles, score, detect a clear, reload the launcher,
    /// then check the danger line.
    pub fn settle(&mut self, cell: GridCoord, bubble: Bubble) {
        match self.grid.place(cell, bubble) {
            Ok(Some(previous)) => {
                log::warn!("Landing at {} replaced a {:?} bubble", cell, previous.color);
            }
            Ok(None) => log::debug!("Bubble landed at {}", cell),
            Err(bubble) => {
                log::warn!("Cannot place {:?} bubble at {}", bubble.color, cell);
                self.reload_shooter();
                return;
            }
        }

        let outcome = resolve_matches(&mut self.grid, cell, self.tuning.min_match);

        if let Some(color) = outcome.color {
            let count = outcome.popped.len();
            self.award(count as u64 * self.tuning.points_per_match);
            self.push_event(GameEvent::BubblesPopped { color, count });
        }

        if !outcome.dropped.is_empty() {
            let count = outcome.dropped.len();
            for mut bubble in outcome.dropped {
                let spread = self.tuning.fall_vx_spread;
                bubble.vel.x = (self.rng_mut().random::<f32>() - 0.5) * 2.0 * spread;
                bubble.vel.y = self.tuning.fall_initial_vy;
                self.falling.push(bubble);
            }
            self.award(count as u64 * self.tuning.points_per_drop);
            self.push_event(GameEvent::BubblesDropped { count });
        }

        if !outcome.popped.is_empty() && self.grid.is_empty() {
            let level = self.progress.level;
            let bonus = self.tuning.clear_bonus_per_level * level as u64;
            self.award(bonus);
            log::info!("Level {} cleared, bonus {}", level, bonus);
            self.push_event(GameEvent::LevelCleared { level, bonus });
            self.phase = GamePhase::Advancing {
                ticks_left: self.tuning.advance_delay_ticks,
            };
        }

        self.reload_shooter();

        if crosses_danger_line(&self.grid, self.tuning.danger_line()) {
            self.phase = GamePhase::GameOver;
            log::info!("Game over at level {} with score {}", self.progress.level, self.score);
            self.push_event(GameEvent::GameOver { score: self.score });
        }
    }

    /// Next level's grid, fresh shot counter, ceiling back at the top
    fn advance_level(&mut self) {
        self.progress.advance();
        self.start_level();
        self.phase = GamePhase::Playing;
    }

    /// Gravity for detached bubbles; they leave once below the board
    fn update_falling(&mut self) {
        let gravity = self.tuning.fall_gravity;
        let floor = self.tuning.board_height;
        for bubble in &mut self.falling {
            bubble.vel.y += gravity;
            bubble.pos += bubble.vel;
        }
        self.falling.retain(|b| b.pos.y <= floor);
    }
}

/// Advance the game by one frame
pub fn tick(state: &mut GameSession, input: &TickInput) {
    if let Some(seed) = input.restart {
        state.restart(seed);
        return;
    }

    if let Some(angle) = input.aim {
        state.set_aim_angle(angle);
    }
    if input.fire {
        state.fire();
    }

    state.time_ticks += 1;
    state.update_falling();

    match state.phase {
        GamePhase::GameOver => {}

        GamePhase::Advancing { ticks_left } => {
            if ticks_left <= 1 {
                state.advance_level();
            } else {
                state.phase = GamePhase::Advancing {
                    ticks_left: ticks_left - 1,
                };
            }
        }

        GamePhase::Playing => {
            let Some(mut projectile) = state.projectile.take() else {
                return;
            };
            advance_projectile(
                &mut projectile,
                state.tuning.bubble_radius,
                state.tuning.board_width,
            );
            if detect_contact(&state.grid, projectile.pos).is_some() {
                state.land_projectile(projectile);
            } else {
                state.projectile = Some(projectile);
            }
        }
    }
}
