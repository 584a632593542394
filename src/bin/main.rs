use std::f32::consts::TAU;
use std::time::Instant;

use blossom_hearts::{
    Animation, AnimationConfig, Canvas, Color, FrameHandle, FrameScheduler, Kind, Particle, Petal,
    State,
};
use eframe::egui;
use egui::{Color32, Painter, Pos2, Stroke, Vec2};
use tracing::{error, info};

const BACKGROUND: Color32 = Color32::from_rgb(24, 18, 32);
const PETAL_SAMPLES: usize = 10;

/// Frame requests map onto egui repaints.
struct RepaintScheduler {
    ctx: egui::Context,
    next: u64,
    pending: Option<FrameHandle>,
}

impl FrameScheduler for RepaintScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending = Some(handle);
        self.ctx.request_repaint();
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

struct EguiCanvas<'a> {
    painter: &'a Painter,
    origin: Pos2,
}

impl EguiCanvas<'_> {
    fn at(&self, x: f32, y: f32) -> Pos2 {
        self.origin + Vec2::new(x, y)
    }

    fn heart(&self, p: &Particle, hovered: bool) {
        let size = if hovered { p.size * 1.15 } else { p.size };
        let fill = rgba(p.color, p.alpha);
        let lobe = size * 0.28;
        let c = self.at(p.x(), p.y());

        self.painter.circle_filled(c + Vec2::new(-size * 0.22, -size * 0.12), lobe, fill);
        self.painter.circle_filled(c + Vec2::new(size * 0.22, -size * 0.12), lobe, fill);
        self.painter.add(egui::Shape::convex_polygon(
            vec![
                c + Vec2::new(-size * 0.48, -size * 0.04),
                c + Vec2::new(size * 0.48, -size * 0.04),
                c + Vec2::new(0.0, size * 0.4),
            ],
            fill,
            Stroke::NONE,
        ));
        if hovered {
            self.painter.circle_stroke(c, size * 0.6, Stroke::new(1.0, rgba(Color::rgb(255, 255, 255), 0.4)));
        }
    }

    fn blossom(&self, p: &Particle, rotation: f32, petals: &[Petal]) {
        let centre = self.at(p.x(), p.y());
        let fill = rgba(Color::BLOSSOM_PETAL.lerp(Color::BLOSSOM_TIP, 0.35), p.alpha);
        let edge = Stroke::new(1.0, rgba(Color::BLOSSOM_EDGE, p.alpha));

        for petal in petals {
            let angle = rotation + petal.angle;
            let (sin, cos) = angle.sin_cos();
            let rotate = |v: Vec2| Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos);

            // Lens from the centre out to the petal tip.
            let mut outline = Vec::with_capacity(PETAL_SAMPLES * 2);
            for i in 0..=PETAL_SAMPLES {
                let t = i as f32 / PETAL_SAMPLES as f32;
                outline.push(centre + rotate(Vec2::new(p.size * t, -p.size * 0.3 * (t * TAU / 2.0).sin())));
            }
            for i in (1..PETAL_SAMPLES).rev() {
                let t = i as f32 / PETAL_SAMPLES as f32;
                outline.push(centre + rotate(Vec2::new(p.size * t, p.size * 0.3 * (t * TAU / 2.0).sin())));
            }
            self.painter.add(egui::Shape::convex_polygon(outline, fill, edge));

            for stamen in &petal.stamens {
                let (s, c) = (angle + stamen.angle).sin_cos();
                let tip = centre + Vec2::new(c, s) * stamen.length;
                self.painter.line_segment([centre, tip], Stroke::new(1.0, rgba(Color::STAMEN, p.alpha)));
                self.painter.circle_filled(tip, 2.0, rgba(Color::ANTHER, p.alpha));
            }
        }
    }
}

impl Canvas for EguiCanvas<'_> {
    fn clear(&mut self) {
        self.painter.rect_filled(self.painter.clip_rect(), 0.0, BACKGROUND);
    }

    fn draw(&mut self, particle: &Particle) {
        match &particle.kind {
            Kind::Blossom(b) => self.blossom(particle, b.rotation, &b.petals),
            Kind::Heart(h) => self.heart(particle, h.hovered),
            Kind::Confetti(_) => {
                self.painter.circle_filled(
                    self.at(particle.x(), particle.y()),
                    particle.size / 2.0,
                    rgba(particle.color, particle.alpha),
                );
            }
        }
    }
}

fn rgba(color: Color, alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, (alpha.clamp(0.0, 1.0) * 255.0) as u8)
}

struct BlossomHeartsApp {
    animation: Animation,
    scheduler: RepaintScheduler,
    epoch: Instant,
    last_frame_time: Instant,
}

impl BlossomHeartsApp {
    fn new(cc: &eframe::CreationContext, config: AnimationConfig) -> Self {
        let mut scheduler = RepaintScheduler { ctx: cc.egui_ctx.clone(), next: 0, pending: None };
        let mut animation = Animation::new(config);
        let epoch = Instant::now();
        animation.start(epoch.elapsed(), &mut scheduler);

        Self { animation, scheduler, epoch, last_frame_time: epoch }
    }

    fn toggle_visibility(&mut self) {
        let now = self.epoch.elapsed();
        match self.animation.state() {
            State::Running => self.animation.stop(&mut self.scheduler),
            State::Stopped | State::Idle => self.animation.resume(now, &mut self.scheduler),
        }
    }

    fn render_ui_panel(&mut self, ui: &mut egui::Ui, frame_time: f32) {
        ui.label(format!("FPS: {:.1}", 1.0 / frame_time.max(f32::EPSILON)));
        ui.label(format!("Frame Time: {:.3}ms", frame_time * 1000.0));
        ui.separator();

        for effect in self.animation.effects() {
            ui.label(format!("{}: {} particles", effect.name(), effect.particle_count()));
        }
        let (bw, bh) = self.animation.surface().backing_size();
        ui.label(format!("Surface: {bw}x{bh} px"));
        ui.separator();

        let label = if self.animation.is_running() { "Pause (Space)" } else { "Resume (Space)" };
        if ui.button(label).clicked() {
            self.toggle_visibility();
        }
        if ui.button("Clear").clicked() {
            self.animation.clear();
        }
    }
}

impl eframe::App for BlossomHeartsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let current_time = Instant::now();
        let frame_time = current_time.duration_since(self.last_frame_time).as_secs_f32();
        self.last_frame_time = current_time;

        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            self.toggle_visibility();
        }

        egui::SidePanel::left("Control Panel").show(ctx, |ui| {
            self.render_ui_panel(ui, frame_time);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BACKGROUND))
            .show(ctx, |ui| {
                let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click());
                let rect = response.rect;

                let bounds = self.animation.bounds();
                if bounds.width != rect.width() || bounds.height != rect.height() {
                    self.animation.resize(rect.width(), rect.height(), ctx.pixels_per_point());
                }

                match response.hover_pos() {
                    Some(pos) => self.animation.pointer_moved(pos.x - rect.min.x, pos.y - rect.min.y),
                    None => self.animation.pointer_left(),
                }
                if response.clicked() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        self.animation.click(pos.x - rect.min.x, pos.y - rect.min.y);
                    }
                }

                let mut canvas = EguiCanvas { painter: &painter, origin: rect.min };
                if self.scheduler.pending.take().is_some() {
                    self.animation.tick(self.epoch.elapsed(), &mut self.scheduler, &mut canvas);
                } else {
                    self.animation.render(&mut canvas);
                }
            });
    }
}

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match AnimationConfig::from_toml_file(&path) {
            Ok(config) => {
                info!(%path, "loaded configuration");
                config
            }
            Err(err) => {
                error!(%path, %err, "could not load configuration");
                std::process::exit(2);
            }
        },
        None => AnimationConfig::default(),
    };

    eframe::run_native(
        "Blossoms & Hearts",
        eframe::NativeOptions {
            renderer: eframe::Renderer::Wgpu,
            ..Default::default()
        },
        Box::new(move |cc| Box::new(BlossomHeartsApp::new(cc, config))),
    )
}
