//! Data-driven game balance
//!
//! Every field defaults to the matching constant in [`crate::consts`], so a
//! JSON document only needs the keys it wants to override.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{TuningError, TuningResult};

/// Runtime-tunable geometry, physics and scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Geometry ===
    pub bubble_radius: f32,
    pub cols: usize,
    /// Rows that fit above the danger line
    pub danger_rows: u32,
    pub row_height_factor: f32,
    pub top_margin: f32,
    pub board_width: f32,
    pub board_height: f32,
    pub shooter_inset: f32,

    // === Physics (per tick) ===
    pub projectile_speed: f32,
    pub max_aim_angle: f32,
    pub fall_gravity: f32,
    pub fall_initial_vy: f32,
    pub fall_vx_spread: f32,

    // === Scoring ===
    pub min_match: usize,
    pub points_per_match: u64,
    pub points_per_drop: u64,
    pub clear_bonus_per_level: u64,

    // === Progression ===
    pub advance_delay_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            bubble_radius: BUBBLE_RADIUS,
            cols: COLS,
            danger_rows: DANGER_ROWS,
            row_height_factor: ROW_HEIGHT_FACTOR,
            top_margin: TOP_MARGIN,
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            shooter_inset: SHOOTER_INSET,

            projectile_speed: PROJECTILE_SPEED,
            max_aim_angle: MAX_AIM_ANGLE,
            fall_gravity: FALL_GRAVITY,
            fall_initial_vy: FALL_INITIAL_VY,
            fall_vx_spread: FALL_VX_SPREAD,

            min_match: MIN_MATCH,
            points_per_match: POINTS_PER_MATCH,
            points_per_drop: POINTS_PER_DROP,
            clear_bonus_per_level: CLEAR_BONUS_PER_LEVEL,

            advance_delay_ticks: ADVANCE_DELAY_TICKS,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON and validate it
    pub fn from_json(json: &str) -> TuningResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> TuningResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break the grid math or the game loop
    pub fn validate(&self) -> TuningResult<()> {
        fn positive(field: &'static str, value: f32) -> TuningResult<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::OutOfRange {
                    field,
                    value: value as f64,
                    expected: "> 0",
                })
            }
        }

        positive("bubble_radius", self.bubble_radius)?;
        positive("row_height_factor", self.row_height_factor)?;
        positive("board_width", self.board_width)?;
        positive("board_height", self.board_height)?;
        positive("projectile_speed", self.projectile_speed)?;
        positive("max_aim_angle", self.max_aim_angle)?;
        positive("fall_gravity", self.fall_gravity)?;

        for (field, value) in [
            ("fall_initial_vy", self.fall_initial_vy),
            ("fall_vx_spread", self.fall_vx_spread),
        ] {
            if !value.is_finite() {
                return Err(TuningError::OutOfRange {
                    field,
                    value: value as f64,
                    expected: "finite",
                });
            }
        }
        // Contact is checked once per tick: a shot must move less than a diameter per tick
        if self.projectile_speed >= self.bubble_radius * 2.0 {
            return Err(TuningError::OutOfRange {
                field: "projectile_speed",
                value: self.projectile_speed as f64,
                expected: "< 2 * bubble_radius",
            });
        }

        if self.cols == 0 {
            return Err(TuningError::OutOfRange {
                field: "cols",
                value: 0.0,
                expected: ">= 1",
            });
        }
        if self.min_match < 2 {
            return Err(TuningError::OutOfRange {
                field: "min_match",
                value: self.min_match as f64,
                expected: ">= 2",
            });
        }
        if self.max_aim_angle >= std::f32::consts::FRAC_PI_2 {
            return Err(TuningError::OutOfRange {
                field: "max_aim_angle",
                value: self.max_aim_angle as f64,
                expected: "< π/2",
            });
        }
        let danger = self.danger_line();
        if danger <= 0.0 || danger >= self.shooter_origin().y {
            return Err(TuningError::OutOfRange {
                field: "danger_rows",
                value: self.danger_rows as f64,
                expected: "danger line between ceiling and shooter",
            });
        }
        Ok(())
    }

    /// Vertical distance between adjacent row centers
    #[inline]
    pub fn row_height(&self) -> f32 {
        self.bubble_radius * self.row_height_factor
    }

    /// Y coordinate of the danger line (bubble lower edges must stay above it)
    pub fn danger_line(&self) -> f32 {
        self.danger_rows.saturating_sub(1) as f32 * self.row_height()
            + self.bubble_radius
            + self.top_margin
    }

    /// Where the loaded bubble sits
    pub fn shooter_origin(&self) -> Vec2 {
        Vec2::new(self.board_width / 2.0, self.board_height - self.shooter_inset)
    }

    /// Where the preview bubble is displayed
    pub fn next_bubble_origin(&self) -> Vec2 {
        let shooter = self.shooter_origin();
        Vec2::new(self.board_width - 40.0, shooter.y + 20.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.danger_line(), 426.0);
        assert_eq!(tuning.shooter_origin(), Vec2::new(210.0, 550.0));
        assert!((tuning.row_height() - 36.0).abs() < 1e-4);
    }

    #[test]
    fn test_partial_json_overrides() {
        let tuning = Tuning::from_json(r#"{ "projectile_speed": 14.0, "min_match": 4 }"#).unwrap();
        assert_eq!(tuning.projectile_speed, 14.0);
        assert_eq!(tuning.min_match, 4);
        assert_eq!(tuning.cols, COLS);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "bubble_radius": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::OutOfRange {
                field: "bubble_radius",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "min_match": 1 }"#).unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { field: "min_match", .. }));

        let err = Tuning::from_json(r#"{ "danger_rows": 40 }"#).unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { field: "danger_rows", .. }));

        let err = Tuning::from_json(r#"{ "fall_gravity": -1.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { field: "fall_gravity", .. }));

        let err = Tuning::from_json(r#"{ "fall_gravity": 0.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { field: "fall_gravity", .. }));

        let err = Tuning::from_json(r#"{ "projectile_speed": 40.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { field: "projectile_speed", .. }));

        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_json_roundtrip() {
        let tuning = Tuning::default();
        let back = Tuning::from_json(&tuning.to_json().unwrap()).unwrap();
        assert_eq!(tuning, back);
    }
}
