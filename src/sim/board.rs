//! Board layout generation
//!
//! Pure geometry: given a row count and playfield size, produce the staggered
//! peg lattice and the bucket slots beneath it. Pegs and buckets are always
//! generated together so the landing geometry stays consistent - never mix
//! layouts from two different row counts.
//!
//! Spacing divisions are floored to keep the layout pixel-aligned.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A fixed circular obstacle; passive collision target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    pub pos: Vec2,
    pub radius: f32,
}

/// Geometry of one scoring zone (square: height == width)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketSlot {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
}

/// Peg lattice plus bucket slots for one row count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardLayout {
    pub rows: u32,
    pub playfield: Vec2,
    /// Horizontal peg spacing; most physical quantities scale off this
    pub spacing_x: f32,
    /// Vertical peg spacing
    pub spacing_y: f32,
    /// rows x rows pegs, row-major
    pub pegs: Vec<Peg>,
    /// rows + 1 contiguous slots, left to right
    pub bucket_slots: Vec<BucketSlot>,
}

impl BoardLayout {
    /// Generate the layout for `rows` peg rows.
    ///
    /// Row counts outside the supported range are clamped here so a
    /// degenerate (zero-row or negative-spacing) board can never exist.
    pub fn generate(rows: u32, playfield: Vec2) -> Self {
        let rows = rows.clamp(MIN_ROWS, MAX_ROWS);

        let spacing_y = ((playfield.y - PEG_FIELD_Y_OFFSET) / (rows + 1) as f32).floor();
        let spacing_x = spacing_y * SPACING_X_MULTIPLIER;
        let peg_radius = spacing_x * PEG_RADIUS_SCALE;

        // Square lattice: columns match rows, odd rows shifted half a step
        let centering = ((playfield.x - rows as f32 * spacing_x) / 2.0).floor();
        let mut pegs = Vec::with_capacity((rows * rows) as usize);
        for row in 0..rows {
            let stagger = 0.5 * (row % 2) as f32;
            for col in 0..rows {
                pegs.push(Peg {
                    pos: Vec2::new(
                        (col as f32 + stagger) * spacing_x + centering,
                        row as f32 * spacing_y + PEG_FIELD_Y_OFFSET,
                    ),
                    radius: peg_radius,
                });
            }
        }

        // rows + 1 buckets centered under the lattice; even row counts need a
        // half-width shift to line buckets up with the peg gaps
        let last_row_y = (rows - 1) as f32 * spacing_y + PEG_FIELD_Y_OFFSET;
        let bucket_width = spacing_x;
        let bucket_y = last_row_y + (bucket_width * BUCKET_DROP_FRACTION).floor();
        let even_offset = if rows % 2 == 0 {
            bucket_width / 2.0
        } else {
            0.0
        };
        let bucket_slots = (0..=rows)
            .map(|i| BucketSlot {
                pos: Vec2::new(
                    playfield.x / 2.0 + (i as f32 - rows as f32 / 2.0) * bucket_width
                        - even_offset,
                    bucket_y,
                ),
                width: bucket_width,
            })
            .collect();

        Self {
            rows,
            playfield,
            spacing_x,
            spacing_y,
            pegs,
            bucket_slots,
        }
    }

    /// Where dropped balls are released
    pub fn drop_point(&self) -> Vec2 {
        Vec2::new(self.playfield.x / 2.0, DROP_HEIGHT)
    }

    /// Per-tick gravity for balls on this board
    pub fn gravity(&self, gravity_scale: f32) -> f32 {
        self.spacing_x / GRAVITY_DIVISOR * gravity_scale
    }

    /// Ball radius for this board density
    pub fn ball_radius(&self) -> f32 {
        self.spacing_x * BALL_RADIUS_SCALE
    }
}
