//! Data-driven game balance
//!
//! Every knob the simulation reads at runtime lives in [`Tuning`]. Defaults
//! reproduce the stock board; a partial JSON document can override any subset
//! of fields for balance experiments.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Runtime balance knobs for the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Fraction of wagered value retained in expectation (0.05 = 95% RTP)
    pub house_edge: f64,
    /// Velocity retained through a peg bounce
    pub dampening: f32,
    /// Scales per-ball gravity (1.0 = spacing_x / 200 per tick)
    pub gravity_scale: f32,
    /// Scales spawn jitter; 0.0 drops every ball exactly at the origin
    pub jitter_scale: f32,
    /// Post-bounce vertical speed above which a peg hit cues audio
    pub hard_hit_speed: f32,
    /// Ticks between auto-play spawns
    pub auto_play_cadence: u64,
    /// Balls spawned by one auto-play run
    pub auto_play_trials: u32,
    /// Session starting balance
    pub starting_balance: f64,
    /// Supported row-count range
    pub min_rows: u32,
    pub max_rows: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            house_edge: HOUSE_EDGE,
            dampening: DAMPENING,
            gravity_scale: 1.0,
            jitter_scale: 1.0,
            hard_hit_speed: HARD_HIT_SPEED,
            auto_play_cadence: AUTO_PLAY_CADENCE,
            auto_play_trials: AUTO_PLAY_TRIALS,
            starting_balance: STARTING_BALANCE,
            min_rows: MIN_ROWS,
            max_rows: MAX_ROWS,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        log::info!(
            "Loaded tuning: house_edge={}, cadence={}, trials={}",
            tuning.house_edge,
            tuning.auto_play_cadence,
            tuning.auto_play_trials
        );
        Ok(tuning)
    }

    /// Clamp a requested row count to the supported range
    pub fn clamp_rows(&self, rows: u32) -> u32 {
        rows.clamp(self.min_rows, self.max_rows)
    }
}
