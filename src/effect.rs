use std::time::Duration;

use cgmath::Vector2;
use rand::RngCore;

use crate::particle::{Bounds, Particle};
use crate::step::StepContext;

/// Draw capability supplied by the host. How a particle looks is up to the
/// implementation; the simulation only decides what is drawn.
pub trait Canvas {
    fn clear(&mut self);
    fn draw(&mut self, particle: &Particle);
}

/// One self-contained particle pipeline (spawn, step, retire, draw).
pub trait Effect {
    fn name(&self) -> &'static str;

    /// Cadence of [`Effect::spawn`], independent of the frame rate.
    fn spawn_interval(&self) -> Duration;

    fn spawn(&mut self, bounds: Bounds, rng: &mut dyn RngCore);

    /// Runs one frame of simulation: step, then any effect-specific passes,
    /// then retirement.
    fn advance(&mut self, ctx: &StepContext, rng: &mut dyn RngCore);

    fn draw(&self, canvas: &mut dyn Canvas);

    /// Pointer position in surface coordinates, `None` once it leaves.
    fn pointer_moved(&mut self, _pointer: Option<Vector2<f32>>) {}

    /// Returns how many particles reacted to the click.
    fn clicked(&mut self, _x: f32, _y: f32) -> usize {
        0
    }

    fn particle_count(&self) -> usize;

    fn clear(&mut self);
}
