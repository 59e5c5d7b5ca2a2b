//! Ball-peg collision resolution and bucket landing tests
//!
//! The bounce is deliberately simplified: on contact the rebound magnitude is
//! taken from the ball's current vertical speed only (scaled by dampening),
//! directed along the contact angle. This is not an elastic reflection about
//! the surface normal - it produces the pachinko-style scatter the game is
//! tuned around, so keep it as is.
//!
//! Multiple pegs overlapping the ball in one tick are resolved sequentially
//! in peg iteration order, last-applied-wins. Deterministic, not batched.

use glam::Vec2;

use super::board::Peg;
use super::state::{Ball, Bucket};

/// Outcome of a resolved ball-peg contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PegContact {
    /// Ball center after position correction
    pub point: Vec2,
    /// Whether the bounce was fast enough to cue the peg-hit sound
    pub hard: bool,
}

/// Test a ball against one peg and, on overlap, apply the bounce and push the
/// ball out of the peg.
///
/// The positional correction is 2x the overlap depth along the contact angle.
/// Over-correcting prevents the ball from sticking to a peg or tunneling into
/// an adjacent one on the next tick.
pub fn resolve_peg_collision(ball: &mut Ball, peg: &Peg, hard_hit_speed: f32) -> Option<PegContact> {
    let delta = ball.pos - peg.pos;
    let distance = delta.length();
    let radii = ball.radius + peg.radius;
    if distance > radii {
        return None;
    }

    let angle = delta.y.atan2(delta.x);
    let fall_speed = ball.vel.y;
    ball.vel = Vec2::new(
        angle.cos() * fall_speed * ball.dampening,
        angle.sin() * fall_speed * ball.dampening,
    );

    let overlap = radii - distance;
    ball.pos += Vec2::new(angle.cos(), angle.sin()) * overlap * 2.0;

    Some(PegContact {
        point: ball.pos,
        hard: ball.vel.y.abs() > hard_hit_speed,
    })
}

/// Index of the first bucket (left to right) containing the point.
///
/// Slots are disjoint by construction, but first-match-wins is kept as the
/// defined semantics should geometry ever be misconfigured.
pub fn bucket_index_at(buckets: &[Bucket], point: Vec2) -> Option<usize> {
    buckets.iter().position(|b| b.contains(point))
}
