mod stats;

pub use stats::Stats;

use crate::geometry::FloatType;

pub type Rgb = rgb::RGB<FloatType>;
pub type Rgba = rgb::RGBA<FloatType>;

pub const BLACK: Rgb = Rgb {
    r: 0.0,
    g: 0.0,
    b: 0.0,
};

/// Componentwise product of two colors.
pub fn modulate(a: Rgb, b: Rgb) -> Rgb {
    Rgb::new(a.r * b.r, a.g * b.g, a.b * b.b)
}

/// Clamps each channel into [0, 1].
pub fn saturate(c: Rgb) -> Rgb {
    Rgb::new(c.r.clamp(0.0, 1.0), c.g.clamp(0.0, 1.0), c.b.clamp(0.0, 1.0))
}

pub fn with_alpha(c: Rgb, alpha: FloatType) -> Rgba {
    Rgba::new(c.r, c.g, c.b, alpha)
}

pub fn without_alpha(c: Rgba) -> Rgb {
    Rgb::new(c.r, c.g, c.b)
}

/// True if every channel lies in [0, 1].
pub fn is_unit_color(c: Rgb) -> bool {
    [c.r, c.g, c.b].iter().all(|x| (0.0..=1.0).contains(x))
}
