use crate::particle::{Bounds, Kind, Particle};

/// Horizontal slack blossoms get before they count as gone.
const BLOSSOM_MARGIN: f32 = 50.0;

/// Exit condition for each population. Particles with non-finite positions
/// are always dead.
pub fn is_alive(particle: &Particle, bounds: Bounds) -> bool {
    let Particle { position, size, alpha, kind, .. } = particle;
    if !(position.x.is_finite() && position.y.is_finite()) {
        return false;
    }

    match kind {
        Kind::Blossom(_) => {
            position.x >= -BLOSSOM_MARGIN
                && position.x <= bounds.width + BLOSSOM_MARGIN
                && position.y <= bounds.height
        }
        Kind::Heart(heart) => {
            !heart.needs_explosion
                && position.x >= -size
                && position.x <= bounds.width + size
                && position.y >= -size
        }
        Kind::Confetti(_) => *alpha > 0.0,
    }
}

/// Live particles of one population plus a bounded pool of retired ones.
#[derive(Debug, Default)]
pub struct ParticleStore {
    live: Vec<Particle>,
    pool: Vec<Particle>,
    pool_capacity: usize,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retired particles are kept for reuse, up to `pool_capacity` of them.
    pub fn with_pool(pool_capacity: usize) -> Self {
        Self {
            live: Vec::new(),
            pool: Vec::with_capacity(pool_capacity),
            pool_capacity,
        }
    }

    pub fn push(&mut self, particle: Particle) {
        self.live.push(particle);
    }

    pub fn extend<I: IntoIterator<Item = Particle>>(&mut self, particles: I) {
        self.live.extend(particles);
    }

    /// Pops a retired particle for re-initialisation.
    pub fn recycle(&mut self) -> Option<Particle> {
        self.pool.pop()
    }

    /// Removes every particle whose exit condition holds. Runs after iteration
    /// so no element is skipped when several retire in the same frame.
    /// Returns how many were removed.
    pub fn retire(&mut self, bounds: Bounds) -> usize {
        let (alive, dead): (Vec<_>, Vec<_>) = std::mem::take(&mut self.live)
            .into_iter()
            .partition(|p| is_alive(p, bounds));
        self.live = alive;

        let retired = dead.len();
        let room = self.pool_capacity.saturating_sub(self.pool.len());
        self.pool.extend(dead.into_iter().take(room));
        retired
    }

    pub fn particles(&self) -> &[Particle] {
        &self.live
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.live
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.live.iter()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn pooled(&self) -> usize {
        self.pool.len()
    }

    pub fn clear(&mut self) {
        self.live.clear();
    }
}
