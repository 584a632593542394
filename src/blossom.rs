use std::time::Duration;

use rand::RngCore;
use tracing::trace;

use crate::config::BlossomConfig;
use crate::effect::{Canvas, Effect};
use crate::particle::Bounds;
use crate::spawn::spawn_blossom;
use crate::step::{StepContext, step_all};
use crate::store::ParticleStore;

/// Blossoms drifting down from above the top edge.
pub struct BlossomEffect {
    config: BlossomConfig,
    blossoms: ParticleStore,
}

impl BlossomEffect {
    pub fn new(config: BlossomConfig) -> Self {
        let blossoms = ParticleStore::with_pool(config.pool_capacity);
        Self { config, blossoms }
    }

    pub fn blossoms(&self) -> &ParticleStore {
        &self.blossoms
    }
}

impl Effect for BlossomEffect {
    fn name(&self) -> &'static str {
        "blossom"
    }

    fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.config.spawn_interval_ms)
    }

    fn spawn(&mut self, bounds: Bounds, rng: &mut dyn RngCore) {
        let recycled = self.blossoms.recycle();
        let blossom = spawn_blossom(bounds, &self.config, rng, recycled);
        trace!(x = blossom.x(), size = blossom.size, "spawned blossom");
        self.blossoms.push(blossom);
    }

    fn advance(&mut self, ctx: &StepContext, rng: &mut dyn RngCore) {
        step_all(self.blossoms.particles_mut(), ctx, 0.0, rng);
        self.blossoms.retire(ctx.bounds);
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        for blossom in self.blossoms.iter() {
            canvas.draw(blossom);
        }
    }

    fn particle_count(&self) -> usize {
        self.blossoms.len()
    }

    fn clear(&mut self) {
        self.blossoms.clear();
    }
}
