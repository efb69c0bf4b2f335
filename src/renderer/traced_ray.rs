use crate::{
    geometry::{FloatType, Ray, WorldPoint, WorldVector},
    scene::{Material, VACUUM_REFRACTION_INDEX},
};

use super::{ATTENUATION_LINEAR, ATTENUATION_QUADRATIC};

/// Fraction of light that survives travelling `distance`.
pub fn attenuation(distance: FloatType) -> FloatType {
    1.0 / (1.0 + ATTENUATION_LINEAR * distance + ATTENUATION_QUADRATIC * distance * distance)
}

/// A ray together with the state it carries through the scene.
#[derive(Copy, Clone, Debug)]
pub struct TracedRay {
    pub ray: Ray,
    /// Fraction of the light that still reaches the camera along this ray
    pub intensity: FloatType,
    /// Number of bounces since the camera
    pub depth: u32,
    /// Refraction index of the medium the ray travels through
    pub refraction_index: FloatType,
}

impl TracedRay {
    /// Ray leaving the camera.
    pub fn primary(ray: Ray) -> Self {
        TracedRay {
            ray,
            intensity: 1.0,
            depth: 0,
            refraction_index: VACUUM_REFRACTION_INDEX,
        }
    }

    /// The same ray with its intensity reduced by the distance to `point`.
    pub fn attenuated(&self, point: &WorldPoint) -> Self {
        TracedRay {
            intensity: self.intensity * attenuation((point - self.ray.origin).norm()),
            ..*self
        }
    }

    /// Mirror reflection at `point`.
    /// `normal` must be a unit vector, its orientation doesn't matter.
    pub fn reflect(&self, normal: &WorldVector, point: &WorldPoint, material: &Material) -> Self {
        self.reflected(normal, point, material.mirror())
    }

    /// Refraction into or out of the material at `point`.
    ///
    /// The ray enters the material if `normal` faces it and leaves into vacuum otherwise.
    /// Falls back to a reflection if the ray is totally internally reflected.
    pub fn refract(&self, normal: &WorldVector, point: &WorldPoint, material: &Material) -> Self {
        let direction = self.ray.direction;
        let transmission = 1.0 - material.opacity();

        let cos_incident = -normal.dot(&direction);
        let (facing, cos_incident, next_index) = if cos_incident >= 0.0 {
            (*normal, cos_incident, material.refraction_index())
        } else {
            (-normal, -cos_incident, VACUUM_REFRACTION_INDEX)
        };

        let eta = self.refraction_index / next_index;
        let discriminant = 1.0 - eta * eta * (1.0 - cos_incident * cos_incident);
        if discriminant < 0.0 {
            return self.reflected(normal, point, transmission);
        }

        let refracted = direction * eta + facing * (eta * cos_incident - discriminant.sqrt());
        TracedRay {
            ray: Ray::new(*point, refracted),
            intensity: self.attenuated(point).intensity * transmission,
            depth: self.depth + 1,
            refraction_index: next_index,
        }
    }

    fn reflected(&self, normal: &WorldVector, point: &WorldPoint, factor: FloatType) -> Self {
        let direction = self.ray.direction;
        let reflected = direction - normal * (2.0 * normal.dot(&direction));
        TracedRay {
            ray: Ray::new(*point, reflected),
            intensity: self.attenuated(point).intensity * factor,
            depth: self.depth + 1,
            refraction_index: self.refraction_index,
        }
    }
}
