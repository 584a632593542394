use std::time::Duration;

use blossom_hearts::{
    Animation, AnimationConfig, Canvas, Color, ConfettiConfig, FrameHandle, FrameScheduler,
    Heart, HeartConfig, HeartEffect, Kind, Particle, Span, State, StepMode,
};
use cgmath::vec2;

#[derive(Default)]
struct Frames {
    next: u64,
    pending: Vec<FrameHandle>,
    requested: usize,
}

impl FrameScheduler for Frames {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
    }
}

#[derive(Default)]
struct Recorder {
    clears: usize,
    drawn: Vec<Particle>,
}

impl Recorder {
    fn count(&self, f: impl Fn(&Kind) -> bool) -> usize {
        self.drawn.iter().filter(|p| f(&p.kind)).count()
    }
}

impl Canvas for Recorder {
    fn clear(&mut self) {
        self.clears += 1;
        self.drawn.clear();
    }

    fn draw(&mut self, particle: &Particle) {
        self.drawn.push(particle.clone());
    }
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

/// Delivers the pending frame callback at `t` milliseconds.
fn fire(animation: &mut Animation, frames: &mut Frames, canvas: &mut Recorder, t: u64) {
    frames.pending.clear();
    animation.tick(ms(t), frames, canvas);
}

fn still_heart(x: f32, y: f32, size: f32) -> Particle {
    Particle {
        position: vec2(x, y),
        size,
        color: Color::rgb(240, 40, 90),
        alpha: 1.0,
        kind: Kind::Heart(Heart {
            speed_x: 0.0,
            speed_y: 0.0,
            target_altitude: 0.0,
            explode_eligible: false,
            needs_explosion: false,
            hovered: false,
        }),
    }
}

/// Heart effect that never spawns on its own during a test run.
fn quiet_hearts() -> HeartEffect {
    let config = HeartConfig {
        spawn_interval_ms: 3_600_000,
        drift_jitter: 0.0,
        ..HeartConfig::default()
    };
    HeartEffect::new(config, ConfettiConfig::default())
}

fn blossoms_only() -> Animation {
    let mut config = AnimationConfig::default();
    config.heart.enabled = false;
    config.step_mode = StepMode::Fixed;
    config.seed = Some(99);
    Animation::new(config)
}

#[test]
fn touching_hearts_explode_into_confetti() {
    let mut hearts = quiet_hearts();
    hearts.insert_heart(still_heart(100.0, 100.0, 40.0));
    hearts.insert_heart(still_heart(120.0, 100.0, 40.0));
    hearts.insert_heart(still_heart(500.0, 500.0, 40.0));

    let mut animation = Animation::with_effects(StepMode::Fixed, Some(1), vec![Box::new(hearts)]);
    animation.resize(800.0, 600.0, 1.0);

    let mut frames = Frames::default();
    let mut canvas = Recorder::default();
    animation.start(Duration::ZERO, &mut frames);
    fire(&mut animation, &mut frames, &mut canvas, 16);

    assert_eq!(canvas.clears, 1);
    assert_eq!(canvas.count(|k| matches!(k, Kind::Heart(_))), 1);
    let confetti = canvas.count(|k| matches!(k, Kind::Confetti(_)));
    assert!((40..140).contains(&confetti), "{confetti}");

    for p in canvas.drawn.iter().filter(|p| matches!(p.kind, Kind::Confetti(_))) {
        assert!(p.alpha > 0.7 && p.alpha <= 1.0);
    }
}

#[test]
fn clicked_heart_bursts_on_the_next_frame() {
    let mut hearts = quiet_hearts();
    hearts.insert_heart(still_heart(300.0, 300.0, 30.0));

    let mut animation = Animation::with_effects(StepMode::Fixed, Some(2), vec![Box::new(hearts)]);
    animation.resize(800.0, 600.0, 1.0);
    let mut frames = Frames::default();
    let mut canvas = Recorder::default();
    animation.start(Duration::ZERO, &mut frames);

    assert_eq!(animation.click(10.0, 10.0), 0);
    assert_eq!(animation.click(305.0, 300.0), 1);

    fire(&mut animation, &mut frames, &mut canvas, 16);
    assert_eq!(canvas.count(|k| matches!(k, Kind::Heart(_))), 0);
    assert!(canvas.count(|k| matches!(k, Kind::Confetti(_))) >= 20);
}

#[test]
fn hover_is_reported_to_the_canvas() {
    let mut hearts = quiet_hearts();
    hearts.insert_heart(still_heart(200.0, 200.0, 30.0));

    let mut animation = Animation::with_effects(StepMode::Fixed, Some(3), vec![Box::new(hearts)]);
    animation.resize(800.0, 600.0, 1.0);
    let mut frames = Frames::default();
    let mut canvas = Recorder::default();
    animation.start(Duration::ZERO, &mut frames);

    animation.pointer_moved(210.0, 200.0);
    fire(&mut animation, &mut frames, &mut canvas, 16);
    assert!(canvas.drawn[0].as_heart().unwrap().hovered);

    animation.pointer_left();
    fire(&mut animation, &mut frames, &mut canvas, 32);
    assert!(!canvas.drawn[0].as_heart().unwrap().hovered);
}

#[test]
fn blossoms_spawn_on_their_own_cadence() {
    let mut animation = blossoms_only();
    animation.resize(800.0, 600.0, 1.0);
    let mut frames = Frames::default();
    let mut canvas = Recorder::default();

    animation.start(Duration::ZERO, &mut frames);
    for t in (100..=10_000).step_by(100) {
        fire(&mut animation, &mut frames, &mut canvas, t);
    }

    // Due at 2, 4, 6, 8 and 10 seconds; none can have left the surface yet.
    assert_eq!(canvas.drawn.len(), 5);
    assert_eq!(animation.particle_count(), 5);
    assert_eq!(frames.pending.len(), 1);
}

#[test]
fn stop_cancels_frame_and_stale_ticks_do_nothing() {
    let mut animation = blossoms_only();
    animation.resize(800.0, 600.0, 1.0);
    let mut frames = Frames::default();
    let mut canvas = Recorder::default();

    animation.start(Duration::ZERO, &mut frames);
    fire(&mut animation, &mut frames, &mut canvas, 2000);
    assert_eq!(animation.particle_count(), 1);

    animation.stop(&mut frames);
    assert!(frames.pending.is_empty());
    assert_eq!(animation.state(), State::Stopped);

    let requested = frames.requested;
    let clears = canvas.clears;
    animation.tick(ms(10_000), &mut frames, &mut canvas); // stale callback
    assert_eq!(frames.requested, requested);
    assert_eq!(canvas.clears, clears);
    assert_eq!(animation.particle_count(), 1);
}

#[test]
fn repeated_resume_never_double_arms() {
    let mut animation = blossoms_only();
    animation.resize(800.0, 600.0, 1.0);
    let mut frames = Frames::default();
    let mut canvas = Recorder::default();

    animation.start(Duration::ZERO, &mut frames);
    animation.stop(&mut frames);

    animation.resume(ms(1000), &mut frames);
    animation.resume(ms(1500), &mut frames);
    assert_eq!(frames.pending.len(), 1);

    // The spawn deadline still counts from the first resume.
    fire(&mut animation, &mut frames, &mut canvas, 2900);
    assert_eq!(animation.particle_count(), 0);
    fire(&mut animation, &mut frames, &mut canvas, 3000);
    assert_eq!(animation.particle_count(), 1);
    fire(&mut animation, &mut frames, &mut canvas, 3400);
    assert_eq!(animation.particle_count(), 1);
}

#[test]
fn resize_keeps_particles_in_flight() {
    let mut animation = blossoms_only();
    animation.resize(800.0, 600.0, 1.0);
    let mut frames = Frames::default();
    let mut canvas = Recorder::default();

    animation.start(Duration::ZERO, &mut frames);
    fire(&mut animation, &mut frames, &mut canvas, 2000);
    let before = canvas.drawn[0].position;

    animation.resize(1024.0, 768.0, 2.0);
    assert_eq!(animation.surface().backing_size(), (2048, 1536));
    fire(&mut animation, &mut frames, &mut canvas, 2016);

    assert_eq!(canvas.drawn.len(), 1);
    let after = canvas.drawn[0].position;
    assert!((after.y - before.y) > 0.0 && (after.y - before.y) <= 1.0);
}

#[test]
fn zero_sized_surface_yields_empty_frames() {
    let mut animation = Animation::new(AnimationConfig { seed: Some(4), ..AnimationConfig::default() });
    let mut frames = Frames::default();
    let mut canvas = Recorder::default();

    animation.start(Duration::ZERO, &mut frames);
    for t in (16..=20_000).step_by(16) {
        fire(&mut animation, &mut frames, &mut canvas, t);
    }

    assert!(canvas.drawn.is_empty());
    assert_eq!(animation.particle_count(), 0);
    assert!(animation.has_pending_frame());
}

#[test]
fn no_effects_is_a_no_op() {
    let mut config = AnimationConfig::default();
    config.blossom.enabled = false;
    config.heart.enabled = false;
    let mut animation = Animation::new(config);
    animation.resize(800.0, 600.0, 1.0);

    let mut frames = Frames::default();
    let mut canvas = Recorder::default();
    animation.start(Duration::ZERO, &mut frames);
    fire(&mut animation, &mut frames, &mut canvas, 16);

    assert_eq!(canvas.clears, 1);
    assert!(canvas.drawn.is_empty());
    assert_eq!(animation.effects().count(), 0);
}

/// Runs five seconds of frames and returns how many confetti pieces were seen.
fn run_unvalidated(config: AnimationConfig) -> usize {
    assert!(config.validate().is_err());
    let mut animation = Animation::new(config);
    animation.resize(640.0, 480.0, 1.0);
    let mut frames = Frames::default();
    let mut canvas = Recorder::default();

    let mut confetti = 0;
    animation.start(Duration::ZERO, &mut frames);
    for t in (16..=5_000).step_by(16) {
        fire(&mut animation, &mut frames, &mut canvas, t);
        confetti += canvas.count(|k| matches!(k, Kind::Confetti(_)));
    }

    assert!(animation.has_pending_frame());
    assert_eq!(frames.pending.len(), 1);
    confetti
}

#[test]
fn span_too_wide_to_subtract_does_not_fault() {
    let mut config = AnimationConfig { seed: Some(6), ..AnimationConfig::default() };
    config.heart.spawn_interval_ms = 50;
    config.heart.speed_x = Span::new(-3e38, 3e38);
    config.heart.drift_jitter = f32::INFINITY;
    config.blossom.size = Span::new(-5.0, -1.0);
    run_unvalidated(config);
}

#[test]
fn non_finite_burst_settings_do_not_fault() {
    let mut config = AnimationConfig { seed: Some(7), ..AnimationConfig::default() };
    config.heart.spawn_interval_ms = 50;
    config.heart.explode_chance = 1.5;
    config.heart.target_altitude = Span::new(0.9, 1.0);
    config.confetti.speed_max = f32::INFINITY;
    config.confetti.fade_jitter = f32::NAN;

    // Every heart is eligible and bursts shortly after rising into view.
    assert!(run_unvalidated(config) > 0);
}

#[test]
fn full_scene_stays_within_invariants() {
    let mut animation = Animation::new(AnimationConfig { seed: Some(5), ..AnimationConfig::default() });
    animation.resize(640.0, 480.0, 1.0);
    let mut frames = Frames::default();
    let mut canvas = Recorder::default();

    animation.start(Duration::ZERO, &mut frames);
    for t in (16..=60_000).step_by(16) {
        fire(&mut animation, &mut frames, &mut canvas, t);
        for p in &canvas.drawn {
            assert!(p.alpha > 0.0 && p.alpha <= 1.0, "{p:?}");
            assert!(p.size > 0.0);
            assert!(!p.needs_explosion(), "flagged heart drawn: {p:?}");
        }
    }

    assert!(animation.effects().all(|e| e.particle_count() < 10_000));
}
