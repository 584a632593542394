use std::time::Duration;

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::uniform;
use crate::particle::{Blossom, Bounds, Confetti, Heart, Kind, Particle};

/// Nominal frame length that speeds are expressed against in [`StepMode::Elapsed`].
pub const REFERENCE_FRAME_MS: f32 = 16.0;

/// Populations at least this large are stepped on the rayon pool.
const PARALLEL_THRESHOLD: usize = 256;

/// How a frame's elapsed time maps onto particle motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepMode {
    /// Speeds are per 16 ms; motion scales with the measured frame interval.
    #[default]
    Elapsed,
    /// Speeds are per call, whatever the frame interval.
    Fixed,
}

#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    /// Multiplier applied to blossom and heart velocities.
    pub factor: f32,
    pub bounds: Bounds,
}

impl StepContext {
    pub fn new(mode: StepMode, dt: Duration, bounds: Bounds) -> Self {
        let factor = match mode {
            StepMode::Elapsed => dt.as_secs_f32() * 1000.0 / REFERENCE_FRAME_MS,
            StepMode::Fixed => 1.0,
        };
        Self { factor, bounds }
    }

    pub fn fixed(bounds: Bounds) -> Self {
        Self { factor: 1.0, bounds }
    }
}

/// Advances one particle by one frame. `drift` is the random-walk increment for
/// a heart's horizontal speed and is ignored by other kinds.
pub fn step(particle: &mut Particle, ctx: &StepContext, drift: f32) {
    let Particle { position, alpha, kind, .. } = particle;
    match kind {
        Kind::Blossom(Blossom { speed, wind, rotation, rotation_speed, .. }) => {
            position.x += *wind * ctx.factor;
            position.y += *speed * ctx.factor;
            *rotation += *rotation_speed * ctx.factor;
            *alpha = blossom_alpha(position.y, ctx.bounds.height);
        }
        Kind::Heart(Heart { speed_x, speed_y, .. }) => {
            position.y -= *speed_y * ctx.factor;
            position.x += *speed_x * ctx.factor;
            *speed_x += drift;
            *alpha = heart_alpha(position.y, ctx.bounds.height);
        }
        Kind::Confetti(Confetti { speed_x, speed_y, gravity, disappear_distance, fade_rate }) => {
            position.x += *speed_x;
            position.y += *speed_y;
            *speed_y += *gravity;
            if position.y >= *disappear_distance {
                *alpha = (*alpha - *fade_rate).max(0.0);
            }
        }
    }
}

/// Steps a whole population. Heart drift is drawn from `rng` in store order
/// before the (possibly parallel) update, so results only depend on the seed.
pub fn step_all<R: Rng + ?Sized>(
    particles: &mut [Particle],
    ctx: &StepContext,
    drift_jitter: f32,
    rng: &mut R,
) {
    let drifts: Vec<f32> = particles
        .iter()
        .map(|p| {
            if p.is_heart() {
                uniform(rng, -drift_jitter.abs(), drift_jitter.abs())
            } else {
                0.0
            }
        })
        .collect();

    if particles.len() >= PARALLEL_THRESHOLD {
        particles
            .par_iter_mut()
            .zip(drifts.par_iter())
            .for_each(|(particle, &drift)| step(particle, ctx, drift));
    } else {
        for (particle, drift) in particles.iter_mut().zip(drifts) {
            step(particle, ctx, drift);
        }
    }
}

/// Hearts fade towards the top: 1.0 at the bottom edge, 0.2 at the top.
pub fn heart_alpha(y: f32, height: f32) -> f32 {
    if height <= 0.0 {
        return 1.0;
    }
    (0.2 + (y / height) * 0.8).clamp(0.0, 1.0)
}

/// Blossoms fade as they fall: 1.0 at the top edge, 0.5 at the bottom.
pub fn blossom_alpha(y: f32, height: f32) -> f32 {
    if height <= 0.0 {
        return 1.0;
    }
    (1.0 - 0.5 * (y / height)).clamp(0.5, 1.0)
}
