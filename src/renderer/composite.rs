use crate::{
    geometry::FloatType,
    util::{BLACK, Rgb, Rgba, saturate, with_alpha, without_alpha},
};

use super::WEIGHT_EPSILON;

/// A color together with the weight it gets when mixed with others.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contribution {
    pub color: Rgb,
    pub alpha: FloatType,
}

impl Contribution {
    pub fn new(color: Rgb, alpha: FloatType) -> Self {
        Contribution { color, alpha }
    }

    /// Takes the color of a traced ray, scaled by the share it has in the result.
    pub fn weighted(color: Rgba, share: FloatType) -> Self {
        Contribution {
            color: without_alpha(color),
            alpha: color.a * share,
        }
    }
}

/// Weighted average of the contributions, clamped to [0, 1].
/// The alpha of the result is the total weight, clamped as well.
pub fn combine(contributions: &[Contribution]) -> Rgba {
    let total: FloatType = contributions.iter().map(|c| c.alpha).sum();
    if total <= WEIGHT_EPSILON {
        return with_alpha(BLACK, 0.0);
    }

    let sum = contributions
        .iter()
        .fold(BLACK, |acc, c| acc + c.color * c.alpha);
    with_alpha(saturate(sum * (1.0 / total)), total.min(1.0))
}
