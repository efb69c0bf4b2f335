use super::{BOX_EPSILON, FloatType, Ray, WorldBox};

pub trait RayIntersectionExt {
    /// Calculate first and last ray intersection with the box
    fn intersect(&self, ray: &Ray) -> (FloatType, FloatType);

    /// Distance along the ray where it enters the box, if the ray penetrates the box
    /// somewhere in front of its origin and closer than `max_t`.
    /// Rays starting inside the box enter it at zero.
    fn penetration(&self, ray: &Ray, max_t: FloatType) -> Option<FloatType> {
        let (t1, t2) = self.intersect(ray);
        let slack = BOX_EPSILON * (1.0 + t1.abs().max(t2.abs()).min(FloatType::MAX));
        if t1 <= t2 + slack && t2 >= -slack && t1 <= max_t {
            Some(t1.max(0.0))
        } else {
            None
        }
    }
}

impl RayIntersectionExt for WorldBox {
    /// Slab method.
    /// Returns minimum and maximum distance along the ray, ray intersects is min <= max.
    fn intersect(&self, ray: &Ray) -> (FloatType, FloatType) {
        // Componentwise distances along the ray to the box's min and max corners
        // The multiplication is NAN if the ray is starting inside the slab bounding plane
        // and is parallel to it. In this case we blend to +-infinity, so that the range becomes infinite
        let to_box_min = (self.min - ray.origin)
            .component_mul(&ray.inv_direction)
            .map(|x| if x.is_nan() { FloatType::NEG_INFINITY } else { x });
        let to_box_max = (self.max - ray.origin)
            .component_mul(&ray.inv_direction)
            .map(|x| if x.is_nan() { FloatType::INFINITY } else { x });

        // Correctly ordered (min_t <= max_t)
        let componentwise_min_t = to_box_min.zip_map(&to_box_max, FloatType::min);
        let componentwise_max_t = to_box_min.zip_map(&to_box_max, FloatType::max);

        (componentwise_min_t.max(), componentwise_max_t.min())
    }
}
