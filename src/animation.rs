//! Per-surface animation controller.
//!
//! The host owns the clock and the frame primitive. It calls [`Animation::tick`]
//! whenever a frame it requested through [`FrameScheduler`] fires, and forwards
//! resize, pointer and visibility events. Each tick runs
//! spawn → step → cluster → explode → retire → draw for every effect.

use std::time::Duration;

use cgmath::vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace, warn};

use crate::blossom::BlossomEffect;
use crate::config::AnimationConfig;
use crate::effect::{Canvas, Effect};
use crate::hearts::HeartEffect;
use crate::particle::Bounds;
use crate::spawn::SpawnTimer;
use crate::step::{StepContext, StepMode};

/// Opaque token for a pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// The host's "call me back next frame" primitive.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Running,
    Stopped,
}

/// Drawing surface size: logical units for simulation, device pixels for the
/// backing store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub bounds: Bounds,
    pub pixel_ratio: f32,
}

impl Surface {
    pub fn backing_size(&self) -> (u32, u32) {
        let scale = |v: f32| (v * self.pixel_ratio).max(0.0).round() as u32;
        (scale(self.bounds.width), scale(self.bounds.height))
    }
}

struct Slot {
    effect: Box<dyn Effect>,
    timer: SpawnTimer,
}

pub struct Animation {
    step_mode: StepMode,
    slots: Vec<Slot>,
    surface: Surface,
    rng: ChaCha8Rng,
    state: State,
    pending_frame: Option<FrameHandle>,
    last_frame: Option<Duration>,
}

impl Animation {
    /// Builds the blossom and heart effects enabled in `config`.
    ///
    /// A config that fails [`AnimationConfig::validate`] is still accepted;
    /// sampling clamps out-of-range values so frames never fault.
    pub fn new(config: AnimationConfig) -> Self {
        if let Err(err) = config.validate() {
            warn!(%err, "animation config is out of range; sampling will clamp");
        }
        let mut effects: Vec<Box<dyn Effect>> = Vec::new();
        if config.blossom.enabled {
            effects.push(Box::new(BlossomEffect::new(config.blossom.clone())));
        }
        if config.heart.enabled {
            effects.push(Box::new(HeartEffect::new(config.heart.clone(), config.confetti.clone())));
        }
        Self::with_effects(config.step_mode, config.seed, effects)
    }

    pub fn with_effects(step_mode: StepMode, seed: Option<u64>, effects: Vec<Box<dyn Effect>>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let slots = effects
            .into_iter()
            .map(|effect| {
                let timer = SpawnTimer::new(effect.spawn_interval());
                Slot { effect, timer }
            })
            .collect();

        Self {
            step_mode,
            slots,
            surface: Surface { bounds: Bounds::new(0.0, 0.0), pixel_ratio: 1.0 },
            rng,
            state: State::Idle,
            pending_frame: None,
            last_frame: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn bounds(&self) -> Bounds {
        self.surface.bounds
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    pub fn effects(&self) -> impl Iterator<Item = &dyn Effect> {
        self.slots.iter().map(|slot| slot.effect.as_ref())
    }

    pub fn particle_count(&self) -> usize {
        self.slots.iter().map(|slot| slot.effect.particle_count()).sum()
    }

    /// Records a new surface size. Live particles keep their positions.
    pub fn resize(&mut self, width: f32, height: f32, pixel_ratio: f32) {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 { pixel_ratio } else { 1.0 };
        self.surface = Surface {
            bounds: Bounds::new(width.max(0.0), height.max(0.0)),
            pixel_ratio,
        };
        let (bw, bh) = self.surface.backing_size();
        info!(width, height, pixel_ratio, backing_width = bw, backing_height = bh, "surface resized");
    }

    pub fn start(&mut self, now: Duration, scheduler: &mut dyn FrameScheduler) {
        if self.state == State::Running {
            return;
        }
        info!(effects = self.slots.len(), "animation started");
        self.run(now, scheduler);
    }

    /// Cancels the pending frame and every spawn timer.
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.state != State::Running {
            return;
        }
        if let Some(handle) = self.pending_frame.take() {
            scheduler.cancel_frame(handle);
        }
        for slot in &mut self.slots {
            slot.timer.disarm();
        }
        self.state = State::Stopped;
        info!("animation stopped");
    }

    /// Re-arms timers and the frame request; anything still armed is left alone.
    pub fn resume(&mut self, now: Duration, scheduler: &mut dyn FrameScheduler) {
        if self.state == State::Running && self.pending_frame.is_some() {
            return;
        }
        info!("animation resumed");
        self.run(now, scheduler);
    }

    fn run(&mut self, now: Duration, scheduler: &mut dyn FrameScheduler) {
        for slot in &mut self.slots {
            slot.timer.arm(now);
        }
        if self.pending_frame.is_none() {
            self.pending_frame = Some(scheduler.request_frame());
        }
        self.last_frame = Some(now);
        self.state = State::Running;
    }

    /// Runs one frame. Ignored unless running, so a stale callback that fires
    /// after [`Animation::stop`] does nothing.
    pub fn tick(&mut self, now: Duration, scheduler: &mut dyn FrameScheduler, canvas: &mut dyn Canvas) {
        if self.state != State::Running {
            return;
        }
        self.pending_frame = None;

        let dt = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last_frame = Some(now);

        let bounds = self.surface.bounds;
        if !bounds.is_degenerate() {
            let ctx = StepContext::new(self.step_mode, dt, bounds);
            for slot in &mut self.slots {
                if slot.timer.poll(now) {
                    slot.effect.spawn(bounds, &mut self.rng);
                }
                slot.effect.advance(&ctx, &mut self.rng);
            }
        }
        self.render(canvas);

        trace!(dt_ms = dt.as_secs_f32() * 1000.0, particles = self.particle_count(), "frame");
        self.pending_frame = Some(scheduler.request_frame());
    }

    /// Clears the canvas and draws every live particle without advancing.
    /// A degenerate surface only gets cleared.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        canvas.clear();
        if self.surface.bounds.is_degenerate() {
            return;
        }
        for slot in &self.slots {
            slot.effect.draw(canvas);
        }
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        for slot in &mut self.slots {
            slot.effect.pointer_moved(Some(vec2(x, y)));
        }
    }

    pub fn pointer_left(&mut self) {
        for slot in &mut self.slots {
            slot.effect.pointer_moved(None);
        }
    }

    /// Returns how many particles were hit.
    pub fn click(&mut self, x: f32, y: f32) -> usize {
        let hit = self.slots.iter_mut().map(|slot| slot.effect.clicked(x, y)).sum();
        debug!(x, y, hit, "click");
        hit
    }

    /// Drops every live particle; timers and the frame loop are untouched.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.effect.clear();
        }
    }
}
