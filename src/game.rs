//! Host-side game wrapper
//!
//! Couples a [`GameSession`] with a [`HighScoreStore`]: loads the stored
//! best at startup and writes it back whenever the running score beats it.
//! Storage failures are logged and play continues.

use crate::highscores::HighScoreStore;
use crate::sim::{GameEvent, GameSession, Snapshot, TickInput, tick};
use crate::tuning::Tuning;

pub struct Game<S: HighScoreStore> {
    pub session: GameSession,
    store: S,
    /// Last value known to be in the store
    stored_high_score: u64,
}

impl<S: HighScoreStore> Game<S> {
    pub fn new(seed: u64, tuning: Tuning, mut store: S) -> Self {
        let stored_high_score = store.load().unwrap_or_else(|e| {
            log::warn!("Could not load high score: {}", e);
            0
        });
        Self {
            session: GameSession::new(seed, tuning, stored_high_score),
            store,
            stored_high_score,
        }
    }

    /// Run one frame and persist a new best if one was reached
    pub fn tick(&mut self, input: &TickInput) {
        tick(&mut self.session, input);
        self.persist_high_score();
    }

    /// Aim input (pointer movement)
    pub fn set_aim_angle(&mut self, angle: f32) {
        self.session.set_aim_angle(angle);
    }

    /// Fire input (click/tap); false if the shot was ignored
    pub fn fire(&mut self) -> bool {
        self.session.fire()
    }

    /// New game; the high score carries over
    pub fn restart(&mut self, seed: u64) {
        self.session.restart(seed);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.session.drain_events()
    }

    pub fn score(&self) -> u64 {
        self.session.score
    }

    pub fn level(&self) -> u32 {
        self.session.level()
    }

    pub fn high_score(&self) -> u64 {
        self.session.high_score
    }

    pub fn is_game_over(&self) -> bool {
        self.session.is_game_over()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist_high_score(&mut self) {
        let score = self.session.score;
        if score <= self.stored_high_score {
            return;
        }
        match self.store.save(score) {
            Ok(()) => self.stored_high_score = score,
            Err(e) => log::warn!("Could not save high score: {}", e),
        }
    }
}
