use std::f32::consts::{PI, TAU};
use std::time::Duration;

use cgmath::vec2;
use rand::Rng;

use crate::color::Color;
use crate::config::{BlossomConfig, HeartConfig, chance, uniform};
use crate::particle::{Blossom, Bounds, Heart, Kind, Particle, Petal, Stamen};
use crate::step::blossom_alpha;

/// Fixed-cadence spawn clock, driven by the host's timestamps.
///
/// Arming an already armed timer is a no-op, so a resume that races a
/// still-pending timer cannot double the spawn rate.
#[derive(Debug, Clone)]
pub struct SpawnTimer {
    interval: Duration,
    next_due: Option<Duration>,
}

impl SpawnTimer {
    pub fn new(interval: Duration) -> Self {
        Self { interval, next_due: None }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Returns false if the timer was already armed.
    pub fn arm(&mut self, now: Duration) -> bool {
        if self.next_due.is_some() {
            return false;
        }
        self.next_due = Some(now + self.interval);
        true
    }

    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    /// Fires at most once per call; the next deadline counts from `now`.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

/// Creates a blossom just above the top edge, reusing `recycled` when given.
pub fn spawn_blossom<R: Rng + ?Sized>(
    bounds: Bounds,
    config: &BlossomConfig,
    rng: &mut R,
    recycled: Option<Particle>,
) -> Particle {
    let size = config.size.sample(rng);
    let x = sample_x(bounds, rng);
    let y = config.spawn_offset_y;

    let mut petals = match recycled {
        Some(Particle { kind: Kind::Blossom(old), .. }) => old.petals,
        _ => Vec::with_capacity(config.petal_count),
    };
    petals.clear();

    for i in 0..config.petal_count {
        let stamen_count = config.stamens.sample(rng);
        let stamens = (0..stamen_count)
            .map(|_| Stamen {
                length: uniform(rng, 0.0, size / 4.0) + size / 5.0,
                angle: rng.gen_range(0.0..PI / 3.0) - PI / 10.0,
            })
            .collect();
        petals.push(Petal {
            angle: i as f32 * TAU / config.petal_count as f32,
            stamens,
        });
    }

    Particle {
        position: vec2(x, y),
        size,
        color: Color::BLOSSOM_PETAL,
        alpha: blossom_alpha(y, bounds.height),
        kind: Kind::Blossom(Blossom {
            speed: config.speed.sample(rng),
            wind: config.wind.sample(rng),
            rotation: rng.gen_range(0.0..TAU),
            rotation_speed: config.rotation_speed.sample(rng),
            petals,
        }),
    }
}

/// Creates a heart just below the bottom edge with its own burst altitude.
pub fn spawn_heart<R: Rng + ?Sized>(bounds: Bounds, config: &HeartConfig, rng: &mut R) -> Particle {
    let x = sample_x(bounds, rng);
    let y = bounds.height + config.spawn_offset_y;
    let size = config.size.sample(rng);
    let color = Color::random_festive(rng);
    let alpha = config.alpha.sample(rng);

    Particle {
        position: vec2(x, y),
        size,
        color,
        alpha,
        kind: Kind::Heart(Heart {
            speed_x: config.speed_x.sample(rng),
            speed_y: config.speed_y.sample(rng),
            target_altitude: config.target_altitude.sample(rng) * bounds.height,
            explode_eligible: chance(rng, config.explode_chance),
            needs_explosion: false,
            hovered: false,
        }),
    }
}

fn sample_x<R: Rng + ?Sized>(bounds: Bounds, rng: &mut R) -> f32 {
    uniform(rng, 0.0, bounds.width)
}
