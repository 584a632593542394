use cgmath::Vector2;

use crate::color::Color;

/// Visible drawing area in surface-local units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A zero or negative sized surface has nothing to draw on.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// A single simulated particle: common visual state plus a per-population tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vector2<f32>,
    pub size: f32,
    pub color: Color,
    pub alpha: f32,
    pub kind: Kind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Blossom(Blossom),
    Heart(Heart),
    Confetti(Confetti),
}

/// Falling blossom. `speed` is vertical, `wind` horizontal.
#[derive(Debug, Clone, PartialEq)]
pub struct Blossom {
    pub speed: f32,
    pub wind: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub petals: Vec<Petal>,
}

/// Draw-only decoration, fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Petal {
    pub angle: f32,
    pub stamens: Vec<Stamen>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stamen {
    pub length: f32,
    pub angle: f32,
}

/// Rising heart. `speed_y` is positive upwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Heart {
    pub speed_x: f32,
    pub speed_y: f32,
    /// Altitude (surface y) at which an eligible heart bursts by itself.
    pub target_altitude: f32,
    pub explode_eligible: bool,
    /// Sticky: once set the heart bursts and is retired.
    pub needs_explosion: bool,
    pub hovered: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Confetti {
    pub speed_x: f32,
    pub speed_y: f32,
    pub gravity: f32,
    /// Surface y past which the fragment starts fading.
    pub disappear_distance: f32,
    pub fade_rate: f32,
}

impl Particle {
    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn as_heart(&self) -> Option<&Heart> {
        match &self.kind {
            Kind::Heart(heart) => Some(heart),
            _ => None,
        }
    }

    pub fn as_heart_mut(&mut self) -> Option<&mut Heart> {
        match &mut self.kind {
            Kind::Heart(heart) => Some(heart),
            _ => None,
        }
    }

    pub fn is_heart(&self) -> bool {
        matches!(self.kind, Kind::Heart(_))
    }

    /// Marks a heart for bursting. No-op for other kinds.
    pub fn flag_explosion(&mut self) {
        if let Some(heart) = self.as_heart_mut() {
            heart.needs_explosion = true;
        }
    }

    pub fn needs_explosion(&self) -> bool {
        self.as_heart().is_some_and(|h| h.needs_explosion)
    }

    /// True when `(x, y)` lies within `size` of the centre.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let dx = self.position.x - x;
        let dy = self.position.y - y;
        dx * dx + dy * dy < self.size * self.size
    }
}
