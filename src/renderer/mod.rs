mod composite;
mod machinery;
mod ray_tracer;
mod traced_ray;
mod worker;

pub use composite::{Contribution, combine};
pub use machinery::{RenderProgress, render, render_with_progress};
pub use ray_tracer::RayTracer;
pub use traced_ray::{TracedRay, attenuation};

use std::num::NonZeroUsize;

use crate::{geometry::FloatType, util::Rgba};

/// Mirror coefficients up to this value count as not reflective at all.
pub const MIRROR_THRESHOLD: FloatType = 1e-3;

/// Rays carrying less intensity than this are not traced any further.
pub const INTENSITY_EPSILON: FloatType = 1e-6;

/// Total weight below which a combination of colors is black.
pub const WEIGHT_EPSILON: FloatType = 1e-12;

/// Coefficients of the distance attenuation `1 / (1 + k1 * d + k2 * d^2)`.
pub const ATTENUATION_LINEAR: FloatType = 0.005;
pub const ATTENUATION_QUADRATIC: FloatType = 0.005;

/// Specular exponent of materials that are not mirrors.
pub const DEFAULT_SHININESS: FloatType = 8.0;
/// Specular exponent of a perfect mirror.
pub const MAX_SHININESS: FloatType = 256.0;

pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// How many threads render the image.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum WorkerCount {
    /// One worker pinned to each available core.
    #[default]
    Auto,
    Manual(NonZeroUsize),
}

#[derive(Copy, Clone, Debug)]
pub struct RenderSettings {
    /// Rays deeper than this many bounces contribute nothing.
    pub max_depth: u32,
    /// Color of rays that leave the scene.
    pub background: Rgba,
    pub worker_count: WorkerCount,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            max_depth: DEFAULT_MAX_DEPTH,
            background: Rgba::new(0.0, 0.0, 0.0, 1.0),
            worker_count: WorkerCount::Auto,
        }
    }
}
