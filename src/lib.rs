//! Plinko - a peg-board ball drop with a self-calibrating payout engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (board layout, physics, odds, game state)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio playback and widget handling live outside this crate: a
//! frontend reads the public simulation state each frame, feeds slider/button
//! input through [`sim::TickInput`], and drains [`sim::GameEvent`]s for sound
//! cues and one-shot presentation effects.

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Frame pump rate; one `tick()` call advances exactly one frame
    pub const FRAME_RATE: u32 = 60;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 1600.0;
    pub const PLAYFIELD_HEIGHT: f32 = 800.0;

    /// Supported peg-row range (clamped at the layout boundary)
    pub const MIN_ROWS: u32 = 5;
    pub const MAX_ROWS: u32 = 20;
    pub const DEFAULT_ROWS: u32 = 10;

    /// Vertical offset of the first peg row
    pub const PEG_FIELD_Y_OFFSET: f32 = 200.0;
    /// Horizontal peg spacing as a multiple of the vertical spacing
    pub const SPACING_X_MULTIPLIER: f32 = 1.5;
    /// Peg radius as a fraction of the horizontal spacing
    pub const PEG_RADIUS_SCALE: f32 = 0.10;
    /// Ball radius as a fraction of the horizontal spacing
    pub const BALL_RADIUS_SCALE: f32 = 0.15;
    /// Bucket row sits this fraction of a bucket width below the last peg row
    pub const BUCKET_DROP_FRACTION: f32 = 0.2;

    /// Launch height of a dropped ball (above the first peg row)
    pub const DROP_HEIGHT: f32 = 130.0;
    /// Velocity retained through a peg bounce
    pub const DAMPENING: f32 = 0.9;
    /// Per-ball gravity = spacing_x / GRAVITY_DIVISOR, so physics scales
    /// with board density
    pub const GRAVITY_DIVISOR: f32 = 200.0;
    /// Post-bounce vertical speed above which a peg hit cues audio
    pub const HARD_HIT_SPEED: f32 = 1.0;

    /// Fraction of wagered value retained in expectation
    pub const HOUSE_EDGE: f64 = 0.05;
    /// Neutral multiplier before any empirical data exists
    pub const BASELINE_MULTIPLIER: f64 = 1.0;

    /// Auto-play spawns one ball every this many ticks
    pub const AUTO_PLAY_CADENCE: u64 = 10;
    /// Auto-play trial count
    pub const AUTO_PLAY_TRIALS: u32 = 1000;

    /// Session starting balance
    pub const STARTING_BALANCE: f64 = 1000.0;
    /// Default wager per ball
    pub const DEFAULT_WAGER: f64 = 10.0;

    /// Lifetime of a floating multiplier label, in ticks
    pub const LABEL_TTL_TICKS: u32 = 60;
}

/// Round a monetary amount to 2 decimal places
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
