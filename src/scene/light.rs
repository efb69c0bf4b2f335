use assert2::assert;

use crate::{
    geometry::{FloatType, WorldPoint},
    util::Rgb,
};

/// Point light.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Light {
    pub position: WorldPoint,
    pub color: Rgb,
    pub intensity: FloatType,
}

impl Light {
    pub fn new(position: WorldPoint, color: Rgb, intensity: FloatType) -> Self {
        assert!(intensity >= 0.0);
        Light {
            position,
            color,
            intensity,
        }
    }

    pub fn white(position: WorldPoint) -> Self {
        Light::new(position, Rgb::new(1.0, 1.0, 1.0), 1.0)
    }
}
