//! Game state and core simulation types
//!
//! All mutable simulation state (balance, bucket counters, active balls,
//! cosmetic effects, RNG) is owned by [`GameState`] and driven by the single
//! simulation thread. Randomness always flows through the seeded RNG stored
//! here, so a run is reproducible from its seed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::board::{BoardLayout, BucketSlot};
use crate::consts::*;
use crate::tuning::Tuning;

/// Lifecycle of a dropped ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallState {
    /// In flight through the peg field
    Falling,
    /// Came to rest in the given bucket; retired at end of tick
    Landed { bucket: usize },
    /// Left the playfield without landing; retired without payout
    Exited,
}

/// A moving particle; owns its own integration constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Per-tick downward acceleration, proportional to peg spacing
    pub gravity: f32,
    /// Velocity retained through a bounce
    pub dampening: f32,
    /// Wager captured at drop time; the landing credit uses this
    pub wager: f64,
    pub state: BallState,
}

impl Ball {
    /// Spawn a ball at the drop point with uniform horizontal jitter bounded
    /// by half the peg spacing (models release-mechanism noise).
    pub fn spawn(layout: &BoardLayout, tuning: &Tuning, wager: f64, rng: &mut Pcg32) -> Self {
        let half = layout.spacing_x / 2.0 * tuning.jitter_scale;
        let jitter = if half > 0.0 {
            rng.random_range(-half..=half)
        } else {
            0.0
        };
        let drop = layout.drop_point();
        Self {
            pos: Vec2::new(drop.x + jitter, drop.y),
            vel: Vec2::ZERO,
            radius: layout.ball_radius(),
            gravity: layout.gravity(tuning.gravity_scale),
            dampening: tuning.dampening,
            wager,
            state: BallState::Falling,
        }
    }

    /// Apply gravity and integrate position by one tick
    pub fn integrate(&mut self) {
        self.vel.y += self.gravity;
        self.pos += self.vel;
    }
}

/// A scoring zone with its payout multiplier and landing statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub slot: BucketSlot,
    /// Current payout multiplier (wager x multiplier on landing)
    pub multiplier: f64,
    /// Balls that came to rest here since the last reset
    pub landings: u32,
    /// Balls dropped anywhere on the board since the last reset
    pub total_drops: u32,
}

impl Bucket {
    pub fn new(slot: BucketSlot) -> Self {
        Self {
            slot,
            multiplier: BASELINE_MULTIPLIER,
            landings: 0,
            total_drops: 0,
        }
    }

    /// Buckets are square
    #[inline]
    pub fn height(&self) -> f32 {
        self.slot.width
    }

    /// Whether a ball center lies within this bucket's rectangular bounds
    pub fn contains(&self, point: Vec2) -> bool {
        self.slot.pos.x <= point.x
            && point.x <= self.slot.pos.x + self.slot.width
            && self.slot.pos.y <= point.y
            && point.y <= self.slot.pos.y + self.height()
    }

    /// Zero the landing statistics (fresh statistical run)
    pub fn reset_counts(&mut self) {
        self.landings = 0;
        self.total_drops = 0;
    }
}

/// One spark of a landing burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
}

/// Cosmetic particle explosion at a landing point
#[derive(Debug, Clone, PartialEq)]
pub struct Burst {
    pub particles: Vec<BurstParticle>,
}

impl Burst {
    pub fn new(origin: Vec2, rng: &mut Pcg32) -> Self {
        let particles = (0..20)
            .map(|_| BurstParticle {
                pos: origin,
                vel: Vec2::new(rng.random_range(-2.0..=2.0), rng.random_range(-2.0..=2.0)),
                size: rng.random_range(4..=10) as f32,
            })
            .collect();
        Self { particles }
    }

    /// Advance one tick; particles shrink until they vanish
    pub fn step(&mut self) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.size -= 0.2;
        }
        self.particles.retain(|p| p.size > 0.0);
    }

    pub fn finished(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Transient floating text showing the multiplier that was hit
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingLabel {
    pub text: String,
    pub pos: Vec2,
    /// Display rotation in degrees
    pub angle: f32,
    /// Opacity, fades from 255 to 0 over the lifetime
    pub alpha: f32,
    ttl: u32,
}

impl FloatingLabel {
    pub fn new(text: String, playfield: Vec2, rng: &mut Pcg32) -> Self {
        Self {
            text,
            pos: Vec2::new(
                rng.random_range(100.0..=playfield.x - 100.0),
                rng.random_range(100.0..=playfield.y - 100.0),
            ),
            angle: rng.random_range(-45.0..=45.0),
            alpha: 255.0,
            ttl: LABEL_TTL_TICKS,
        }
    }

    pub fn step(&mut self) {
        self.ttl = self.ttl.saturating_sub(1);
        self.alpha = (self.alpha - 255.0 / LABEL_TTL_TICKS as f32).max(0.0);
    }

    pub fn expired(&self) -> bool {
        self.ttl == 0
    }
}

/// One-shot notifications for the presentation layer (audio cues, HUD pops).
/// Fire-and-forget: the core never observes a response.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A ball bounced off a peg hard enough to be audible ("peg_hit" cue)
    PegHit { pos: Vec2 },
    /// A ball came to rest in a bucket ("bucket_landing" cue)
    BucketLanding {
        bucket: usize,
        multiplier: f64,
        winnings: f64,
        pos: Vec2,
    },
    /// Auto-play spawned its last ball and the board is clear
    AutoPlayFinished,
}

/// Batch driver state: spawns balls on a timer without manual input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoPlay {
    /// Balls spawned so far this run
    pub spawned: u32,
    /// Trial count for this run
    pub limit: u32,
    /// Tick counter driving the spawn cadence
    pub timer: u64,
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG; sole source of randomness in the simulation
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Current board geometry; regenerated only while no balls are in flight
    pub layout: BoardLayout,
    /// Scoring zones, left to right; always layout.rows + 1 of them
    pub buckets: Vec<Bucket>,
    /// Balls in flight
    pub balls: Vec<Ball>,
    /// Cosmetic landing explosions
    pub bursts: Vec<Burst>,
    /// Cosmetic multiplier labels
    pub labels: Vec<FloatingLabel>,
    /// Session balance; debited on drop, credited on landing
    pub balance: f64,
    /// Active auto-play run, if any
    pub auto_play: Option<AutoPlay>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let playfield = Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
        let layout = BoardLayout::generate(DEFAULT_ROWS, playfield);
        let buckets = layout.bucket_slots.iter().copied().map(Bucket::new).collect();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            balance: tuning.starting_balance,
            tuning,
            layout,
            buckets,
            balls: Vec::new(),
            bursts: Vec::new(),
            labels: Vec::new(),
            auto_play: None,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Change the row count and regenerate pegs and buckets together.
    ///
    /// Refused (returns false) while balls are in flight or auto-play is
    /// running, since regeneration would invalidate in-flight collision
    /// state and the statistics of the current run.
    pub fn set_rows(&mut self, rows: u32) -> bool {
        let rows = self.tuning.clamp_rows(rows);
        if rows == self.layout.rows {
            return false;
        }
        if !self.balls.is_empty() || self.auto_play.is_some() {
            return false;
        }
        self.layout = BoardLayout::generate(rows, self.layout.playfield);
        self.buckets = self
            .layout
            .bucket_slots
            .iter()
            .copied()
            .map(Bucket::new)
            .collect();
        log::info!(
            "Board regenerated: {} rows, {} pegs, {} buckets",
            rows,
            self.layout.pegs.len(),
            self.buckets.len()
        );
        true
    }

    /// Manual drop: refused silently when the balance cannot cover the wager.
    /// Returns whether a ball was spawned.
    pub fn drop_ball(&mut self, wager: f64) -> bool {
        if self.balance < wager {
            log::warn!(
                "Drop refused: balance {:.2} < wager {:.2}",
                self.balance,
                wager
            );
            return false;
        }
        self.spawn_ball(wager);
        true
    }

    /// Spawn a ball unconditionally: debit the wager and count the drop on
    /// every bucket. Auto-play calls this directly, bypassing the balance
    /// check so statistical runs can complete.
    pub fn spawn_ball(&mut self, wager: f64) {
        let ball = Ball::spawn(&self.layout, &self.tuning, wager, &mut self.rng);
        self.balls.push(ball);
        self.balance -= wager;
        for bucket in &mut self.buckets {
            bucket.total_drops += 1;
        }
    }

    /// Begin an auto-play run of `trials` balls, resetting bucket statistics
    pub fn start_auto_play(&mut self, trials: u32) {
        for bucket in &mut self.buckets {
            bucket.reset_counts();
        }
        self.auto_play = Some(AutoPlay {
            spawned: 0,
            limit: trials,
            timer: 0,
        });
        log::info!("Auto-play started: {} trials", trials);
    }

    pub fn auto_play_active(&self) -> bool {
        self.auto_play.is_some()
    }

    /// Drain pending presentation events (audio cues, HUD notifications)
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
