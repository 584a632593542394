use std::f32::consts::TAU;

use cgmath::vec2;
use rand::Rng;

use crate::color::Color;
use crate::config::{ConfettiConfig, uniform};
use crate::particle::{Bounds, Confetti, Kind, Particle};

/// Burst of confetti fragments radiating from `(x, y)`.
pub fn explode<R: Rng + ?Sized>(
    x: f32,
    y: f32,
    bounds: Bounds,
    config: &ConfettiConfig,
    rng: &mut R,
) -> Vec<Particle> {
    let count = config.count.sample(rng);
    let fade_base = 0.3 * bounds.height + 0.3 * bounds.width;

    (0..count)
        .map(|_| {
            let angle = rng.gen_range(0.0..TAU);
            let speed = uniform(rng, 0.0, config.speed_max);
            let jitter = uniform(rng, 0.0, config.fade_jitter);

            Particle {
                position: vec2(x, y),
                size: config.size.sample(rng),
                color: Color::random_festive(rng),
                alpha: config.alpha.sample_left_open(rng),
                kind: Kind::Confetti(Confetti {
                    speed_x: angle.cos() * speed,
                    speed_y: angle.sin() * speed,
                    gravity: config.gravity,
                    disappear_distance: fade_base + jitter,
                    fade_rate: config.fade_rate,
                }),
            }
        })
        .collect()
}
