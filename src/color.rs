use rand::Rng;

/// Opaque sRGB color. Opacity is carried separately on each particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLOSSOM_PETAL: Color = Color::rgb(0xf4, 0x79, 0x83);
    pub const BLOSSOM_EDGE: Color = Color::rgb(0xff, 0x85, 0x9f);
    pub const BLOSSOM_TIP: Color = Color::rgb(0xfd, 0xf1, 0xf4);
    pub const STAMEN: Color = Color::rgb(0xfd, 0xe9, 0xed);
    pub const ANTHER: Color = Color::rgb(0xfb, 0xd3, 0xdc);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `hue` in degrees, `saturation` and `lightness` in percent.
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 360.0;
        let s = (saturation / 100.0).clamp(0.0, 1.0);
        let l = (lightness / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            let v = to_byte(l);
            return Self::rgb(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Self::rgb(
            to_byte(hue_to_channel(p, q, h + 1.0 / 3.0)),
            to_byte(hue_to_channel(p, q, h)),
            to_byte(hue_to_channel(p, q, h - 1.0 / 3.0)),
        )
    }

    /// Picks from three bands: warm reds, cyans and violet-to-magenta.
    pub fn random_festive<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let band: f32 = rng.gen_range(0.0..1.0);
        let hue = if band < 0.3 {
            rng.gen_range(0.0..20.0)
        } else if band < 0.6 {
            rng.gen_range(180.0..210.0)
        } else {
            rng.gen_range(280.0..360.0)
        };
        let saturation = rng.gen_range(70.0..100.0);
        let lightness = rng.gen_range(40.0..60.0);
        Self::from_hsl(hue, saturation, lightness)
    }

    /// Linear blend towards `other`; `t` is clamped to [0, 1].
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self::rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn hsl_primaries() {
        assert_eq!(Color::from_hsl(0.0, 100.0, 50.0), Color::rgb(255, 0, 0));
        assert_eq!(Color::from_hsl(120.0, 100.0, 50.0), Color::rgb(0, 255, 0));
        assert_eq!(Color::from_hsl(240.0, 100.0, 50.0), Color::rgb(0, 0, 255));
        assert_eq!(Color::from_hsl(360.0, 100.0, 50.0), Color::rgb(255, 0, 0));
    }

    #[test]
    fn zero_saturation_is_grey() {
        assert_eq!(Color::from_hsl(200.0, 0.0, 50.0), Color::rgb(128, 128, 128));
    }

    #[test]
    fn festive_palette_is_never_green() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..500 {
            let c = Color::random_festive(&mut rng);
            assert!(!(c.g > c.r && c.g > c.b), "{c:?}");
        }
    }

    #[test]
    fn lerp_endpoints() {
        let a = Color::rgb(0, 100, 200);
        let b = Color::rgb(200, 100, 0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Color::rgb(100, 100, 100));
    }
}
