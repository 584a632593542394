//! Tunables for both effects, loadable from TOML.
//!
//! Every table is optional; missing keys fall back to the defaults that
//! reproduce the stock blossom and heart animations.

use std::fs;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::step::StepMode;

/// Half-open `[min, max)` interval of floats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn len(&self) -> f32 {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        self.max <= self.min
    }

    /// Uniform sample from `[min, max)`; collapses to `min` for an empty span.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        uniform(rng, self.min, self.max)
    }

    /// Uniform sample from `(min, max]`, strictly above `min`.
    pub fn sample_left_open<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if !(self.min < self.max) || !self.len().is_finite() {
            return if self.max.is_finite() { self.max } else { 0.0 };
        }
        loop {
            let v = rng.gen_range(self.min..=self.max);
            if v > self.min {
                return v;
            }
        }
    }

    fn validate(&self, field: &'static str) -> Result<()> {
        if self.min > self.max || !self.min.is_finite() || !self.max.is_finite() || !self.len().is_finite() {
            return Err(Error::InvalidRange { field, min: self.min, max: self.max });
        }
        Ok(())
    }
}

/// `[low, high)` sample that never panics. Empty or NaN ranges collapse to a
/// finite endpoint (or 0). A range too wide to subtract is interpolated.
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    if !(low < high) {
        return if low.is_finite() { low } else { 0.0 };
    }
    if (high - low).is_finite() {
        return rng.gen_range(low..high);
    }
    match (low.is_finite(), high.is_finite()) {
        (true, true) => {
            let t: f32 = rng.gen_range(0.0..1.0);
            (low * (1.0 - t) + high * t).min(high)
        }
        (true, false) => low,
        (false, true) => high,
        (false, false) => 0.0,
    }
}

/// Bernoulli draw that treats out-of-range probabilities as certain or never.
pub(crate) fn chance<R: Rng + ?Sized>(rng: &mut R, probability: f32) -> bool {
    if probability.is_nan() || probability <= 0.0 {
        false
    } else if probability >= 1.0 {
        true
    } else {
        rng.gen_bool(f64::from(probability))
    }
}

/// Half-open `[min, max)` interval of counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountSpan {
    pub min: usize,
    pub max: usize,
}

impl CountSpan {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        if self.max <= self.min {
            self.min
        } else {
            rng.gen_range(self.min..self.max)
        }
    }

    fn validate(&self, field: &'static str) -> Result<()> {
        if self.min > self.max {
            return Err(Error::InvalidRange {
                field,
                min: self.min as f32,
                max: self.max as f32,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlossomConfig {
    pub enabled: bool,
    pub spawn_interval_ms: u64,
    pub size: Span,
    pub speed: Span,
    pub wind: Span,
    pub rotation_speed: Span,
    /// Vertical spawn position; negative is above the top edge.
    pub spawn_offset_y: f32,
    pub petal_count: usize,
    pub stamens: CountSpan,
    pub pool_capacity: usize,
}

impl Default for BlossomConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            spawn_interval_ms: 2000,
            size: Span::new(10.0, 40.0),
            speed: Span::new(0.5, 1.0),
            wind: Span::new(-0.5, 0.5),
            rotation_speed: Span::new(-0.01, 0.01),
            spawn_offset_y: -20.0,
            petal_count: 5,
            stamens: CountSpan::new(3, 8),
            pool_capacity: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartConfig {
    pub enabled: bool,
    pub spawn_interval_ms: u64,
    pub size: Span,
    pub speed_x: Span,
    pub speed_y: Span,
    /// Half-width of the per-frame random walk applied to horizontal speed.
    pub drift_jitter: f32,
    /// Distance below the bottom edge at which hearts appear.
    pub spawn_offset_y: f32,
    pub alpha: Span,
    /// Probability that a heart bursts on its own once it reaches its target altitude.
    pub explode_chance: f32,
    /// Target altitude as a fraction of surface height.
    pub target_altitude: Span,
}

impl Default for HeartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            spawn_interval_ms: 800,
            size: Span::new(15.0, 50.0),
            speed_x: Span::new(-0.36, 0.84),
            speed_y: Span::new(0.2, 1.2),
            drift_jitter: 0.05,
            spawn_offset_y: 20.0,
            alpha: Span::new(0.7, 1.0),
            explode_chance: 0.1,
            target_altitude: Span::new(0.1, 0.6),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfettiConfig {
    pub count: CountSpan,
    pub size: Span,
    pub speed_max: f32,
    pub gravity: f32,
    pub fade_rate: f32,
    /// Random extra distance added to the fade-start threshold.
    pub fade_jitter: f32,
    /// Initial opacity, sampled from `(min, max]`.
    pub alpha: Span,
}

impl Default for ConfettiConfig {
    fn default() -> Self {
        Self {
            count: CountSpan::new(20, 70),
            size: Span::new(3.0, 9.0),
            speed_max: 5.0,
            gravity: 0.01,
            fade_rate: 0.01,
            fade_jitter: 40.0,
            alpha: Span::new(0.7, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub step_mode: StepMode,
    /// Fixed RNG seed; entropy-seeded when absent.
    pub seed: Option<u64>,
    pub blossom: BlossomConfig,
    pub heart: HeartConfig,
    pub confetti: ConfettiConfig,
}

impl AnimationConfig {
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        let b = &self.blossom;
        if b.enabled && b.spawn_interval_ms == 0 {
            return Err(Error::ZeroInterval { effect: "blossom" });
        }
        b.size.validate("blossom.size")?;
        positive("blossom.size.min", b.size.min)?;
        b.speed.validate("blossom.speed")?;
        b.wind.validate("blossom.wind")?;
        b.rotation_speed.validate("blossom.rotation_speed")?;
        b.stamens.validate("blossom.stamens")?;
        finite("blossom.spawn_offset_y", b.spawn_offset_y)?;

        let h = &self.heart;
        if h.enabled && h.spawn_interval_ms == 0 {
            return Err(Error::ZeroInterval { effect: "heart" });
        }
        h.size.validate("heart.size")?;
        positive("heart.size.min", h.size.min)?;
        h.speed_x.validate("heart.speed_x")?;
        h.speed_y.validate("heart.speed_y")?;
        h.alpha.validate("heart.alpha")?;
        h.target_altitude.validate("heart.target_altitude")?;
        unit("heart.explode_chance", h.explode_chance)?;
        unit("heart.alpha.min", h.alpha.min)?;
        unit("heart.alpha.max", h.alpha.max)?;
        finite("heart.drift_jitter", h.drift_jitter)?;
        finite("heart.spawn_offset_y", h.spawn_offset_y)?;

        let c = &self.confetti;
        c.count.validate("confetti.count")?;
        c.size.validate("confetti.size")?;
        positive("confetti.size.min", c.size.min)?;
        c.alpha.validate("confetti.alpha")?;
        unit("confetti.alpha.min", c.alpha.min)?;
        unit("confetti.alpha.max", c.alpha.max)?;
        positive("confetti.fade_rate", c.fade_rate)?;
        finite("confetti.speed_max", c.speed_max)?;
        finite("confetti.gravity", c.gravity)?;
        finite("confetti.fade_jitter", c.fade_jitter)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::NonPositive { field })
    }
}

fn finite(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::NonFinite { field })
    }
}

fn unit(field: &'static str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::OutOfUnitRange { field, value })
    }
}
