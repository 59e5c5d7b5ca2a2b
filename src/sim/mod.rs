//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick = one frame)
//! - Seeded RNG only, owned by the state
//! - Stable iteration order (pegs in lattice order, buckets left to right)
//! - No rendering, audio, or widget dependencies - presentation reads the
//!   public state and drains [`GameEvent`]s

pub mod board;
pub mod collision;
pub mod odds;
pub mod state;
pub mod tick;

pub use board::{BoardLayout, BucketSlot, Peg};
pub use collision::{PegContact, bucket_index_at, resolve_peg_collision};
pub use odds::{empirical_probability, recompute_multipliers};
pub use state::{
    AutoPlay, Ball, BallState, Bucket, Burst, BurstParticle, FloatingLabel, GameEvent, GameState,
};
pub use tick::{TickInput, tick};
