use assert2::assert;
use bon::bon;

use crate::{
    geometry::FloatType,
    util::{Rgb, Rgba, is_unit_color, with_alpha, without_alpha},
};

/// Index of refraction of empty space surrounding all objects.
pub const VACUUM_REFRACTION_INDEX: FloatType = 1.0;

/// Surface properties shared by all faces of a mesh.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    /// Base color, alpha channel is opacity
    color: Rgba,
    refraction_index: FloatType,
    /// Reflectivity, 0 is fully diffuse, 1 a perfect mirror
    mirror: FloatType,
}

#[bon]
impl Material {
    #[builder]
    pub fn new(
        color: Rgb,
        #[builder(default = 1.0)] opacity: FloatType,
        #[builder(default = VACUUM_REFRACTION_INDEX)] refraction_index: FloatType,
        #[builder(default = 0.0)] mirror: FloatType,
    ) -> Self {
        assert!(is_unit_color(color));
        assert!((0.0..=1.0).contains(&opacity));
        assert!(refraction_index > 0.0);
        assert!((0.0..=1.0).contains(&mirror));

        Material {
            color: with_alpha(color, opacity),
            refraction_index,
            mirror,
        }
    }
}

impl Material {
    pub fn color(&self) -> Rgb {
        without_alpha(self.color)
    }

    pub fn opacity(&self) -> FloatType {
        self.color.a
    }

    pub fn is_translucent(&self) -> bool {
        self.opacity() < 1.0
    }

    pub fn refraction_index(&self) -> FloatType {
        self.refraction_index
    }

    pub fn mirror(&self) -> FloatType {
        self.mirror
    }
}
