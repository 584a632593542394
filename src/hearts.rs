//! Rising hearts that burst into confetti.
//!
//! A heart bursts when it touches another heart (directly or through a chain
//! of touching hearts), when it reaches its own target altitude and was rolled
//! eligible at spawn, or when it is clicked.

use std::time::Duration;

use cgmath::Vector2;
use rand::RngCore;
use tracing::{debug, trace};

use crate::cluster::find_clusters;
use crate::config::{ConfettiConfig, HeartConfig};
use crate::effect::{Canvas, Effect};
use crate::explode::explode;
use crate::particle::{Bounds, Kind, Particle};
use crate::spawn::spawn_heart;
use crate::step::{StepContext, step_all};
use crate::store::ParticleStore;

pub struct HeartEffect {
    hearts_config: HeartConfig,
    confetti_config: ConfettiConfig,
    hearts: ParticleStore,
    confetti: ParticleStore,
    pointer: Option<Vector2<f32>>,
}

impl HeartEffect {
    pub fn new(hearts_config: HeartConfig, confetti_config: ConfettiConfig) -> Self {
        Self {
            hearts_config,
            confetti_config,
            hearts: ParticleStore::new(),
            confetti: ParticleStore::new(),
            pointer: None,
        }
    }

    pub fn hearts(&self) -> &ParticleStore {
        &self.hearts
    }

    pub fn confetti(&self) -> &ParticleStore {
        &self.confetti
    }

    /// Places a heart directly, bypassing the spawner.
    pub fn insert_heart(&mut self, heart: Particle) {
        debug_assert!(heart.is_heart());
        self.hearts.push(heart);
    }

    fn update_hover(&mut self) {
        let pointer = self.pointer;
        for particle in self.hearts.particles_mut() {
            let hovered = pointer.is_some_and(|p| particle.contains(p.x, p.y));
            if let Kind::Heart(heart) = &mut particle.kind {
                heart.hovered = hovered;
            }
        }
    }

    /// Flags eligible hearts that have risen to their target altitude.
    fn flag_altitude_bursts(&mut self) -> usize {
        let mut flagged = 0;
        for particle in self.hearts.particles_mut() {
            let y = particle.position.y;
            if let Kind::Heart(heart) = &mut particle.kind {
                if heart.explode_eligible && !heart.needs_explosion && y <= heart.target_altitude {
                    heart.needs_explosion = true;
                    flagged += 1;
                }
            }
        }
        flagged
    }

    /// Turns every flagged heart into a confetti burst. The hearts themselves
    /// are removed by the retirement pass that follows.
    fn expand_explosions(&mut self, bounds: Bounds, rng: &mut dyn RngCore) -> usize {
        let mut bursts = 0;
        let before = self.confetti.len();
        for heart in self.hearts.iter().filter(|p| p.needs_explosion()) {
            self.confetti
                .extend(explode(heart.x(), heart.y(), bounds, &self.confetti_config, rng));
            bursts += 1;
        }
        if bursts > 0 {
            debug!(bursts, confetti = self.confetti.len() - before, "hearts exploded");
        }
        bursts
    }
}

impl Effect for HeartEffect {
    fn name(&self) -> &'static str {
        "heart"
    }

    fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.hearts_config.spawn_interval_ms)
    }

    fn spawn(&mut self, bounds: Bounds, rng: &mut dyn RngCore) {
        let heart = spawn_heart(bounds, &self.hearts_config, rng);
        trace!(x = heart.x(), size = heart.size, "spawned heart");
        self.hearts.push(heart);
    }

    fn advance(&mut self, ctx: &StepContext, rng: &mut dyn RngCore) {
        step_all(self.hearts.particles_mut(), ctx, self.hearts_config.drift_jitter, rng);
        step_all(self.confetti.particles_mut(), ctx, 0.0, rng);
        self.update_hover();

        let clusters = find_clusters(self.hearts.particles_mut());
        if !clusters.is_empty() {
            let members: usize = clusters.iter().map(Vec::len).sum();
            debug!(clusters = clusters.len(), members, "touching hearts clustered");
        }

        let risen = self.flag_altitude_bursts();
        if risen > 0 {
            debug!(risen, "hearts reached burst altitude");
        }

        self.expand_explosions(ctx.bounds, rng);
        self.hearts.retire(ctx.bounds);
        self.confetti.retire(ctx.bounds);
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        for heart in self.hearts.iter() {
            canvas.draw(heart);
        }
        for confetto in self.confetti.iter() {
            canvas.draw(confetto);
        }
    }

    fn pointer_moved(&mut self, pointer: Option<Vector2<f32>>) {
        self.pointer = pointer;
        self.update_hover();
    }

    fn clicked(&mut self, x: f32, y: f32) -> usize {
        let mut hit = 0;
        for heart in self.hearts.particles_mut() {
            if heart.is_heart() && heart.contains(x, y) {
                heart.flag_explosion();
                hit += 1;
            }
        }
        if hit > 0 {
            debug!(x, y, hit, "hearts clicked");
        }
        hit
    }

    fn particle_count(&self) -> usize {
        self.hearts.len() + self.confetti.len()
    }

    fn clear(&mut self) {
        self.hearts.clear();
        self.confetti.clear();
    }
}
