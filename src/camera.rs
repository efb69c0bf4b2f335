use assert2::assert;
use bon::bon;
use nalgebra::{Matrix3, Unit};

use crate::geometry::{FloatType, Ray, ScreenPoint, ScreenSize, WorldPoint, WorldVector};

/// Shortest vector still accepted as a direction when building the camera basis
const MIN_BASIS_NORM: FloatType = 1e-9;

/// Pinhole camera, looking from `position` towards `center`.
#[derive(Copy, Clone, Debug)]
pub struct Camera {
    position: WorldPoint,
    resolution: ScreenSize,

    /// Camera to world rotation, columns are right, up and backward
    basis: Matrix3<FloatType>,

    /// Half sizes of the image plane at distance `z_near`
    half_width: FloatType,
    half_height: FloatType,

    z_near: FloatType,
    z_far: FloatType,
}

#[bon]
impl Camera {
    /// `fovy` is the vertical field of view in degrees,
    /// image width is `height * aspect_ratio`.
    #[builder]
    pub fn new(
        position: WorldPoint,
        center: WorldPoint,
        up: WorldVector,
        height: u32,
        fovy: FloatType,
        #[builder(default = 1.0)] aspect_ratio: FloatType,
        #[builder(default = 1.0)] z_near: FloatType,
        #[builder(default = 1000.0)] z_far: FloatType,
    ) -> Self {
        let backward = Unit::try_new(position - center, MIN_BASIS_NORM)
            .expect("Camera position and center must differ");
        let up = Unit::try_new(up, MIN_BASIS_NORM).expect("Up vector must be non-zero");
        let right = Unit::try_new(up.cross(&backward), MIN_BASIS_NORM)
            .expect("`up` and viewing direction must be linearly independent");
        let up = Unit::new_normalize(backward.cross(&right));

        assert!(height > 0);
        assert!(fovy > 0.0 && fovy < 180.0);
        assert!(aspect_ratio > 0.0);
        assert!(z_near > 0.0);
        assert!(z_far > z_near);

        let width = ((height as FloatType) * aspect_ratio).round().max(1.0) as u32;
        let half_height = z_near * (fovy.to_radians() / 2.0).tan();

        Camera {
            position,
            resolution: ScreenSize::new(width, height),
            basis: Matrix3::from_columns(&[
                right.into_inner(),
                up.into_inner(),
                backward.into_inner(),
            ]),
            half_width: half_height * aspect_ratio,
            half_height,
            z_near,
            z_far,
        }
    }
}

impl Camera {
    /// Image size, x is width, y is height.
    pub fn resolution(&self) -> ScreenSize {
        self.resolution
    }

    pub fn width(&self) -> u32 {
        self.resolution.x
    }

    pub fn height(&self) -> u32 {
        self.resolution.y
    }

    pub fn position(&self) -> WorldPoint {
        self.position
    }

    /// Primary hits further than this are ignored.
    pub fn z_far(&self) -> FloatType {
        self.z_far
    }

    /// Ray through the center of the given pixel.
    /// `point.x` is the column, `point.y` the row, row 0 is at the top of the image.
    pub fn primary_ray(&self, point: &ScreenPoint) -> Ray {
        let resolution = self.resolution.cast::<FloatType>();
        let x = 2.0 * (point.x as FloatType + 0.5) / resolution.x - 1.0;
        let y = 1.0 - 2.0 * (point.y as FloatType + 0.5) / resolution.y;

        let camera_space =
            WorldVector::new(x * self.half_width, y * self.half_height, -self.z_near);

        Ray::new(self.position, self.basis * camera_space)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;

    fn looking_along_y() -> Camera {
        // X goes right, Y goes away, Z goes up
        Camera::builder()
            .position(WorldPoint::new(0.0, 0.0, 0.0))
            .center(WorldPoint::new(0.0, 1.0, 0.0))
            .up(WorldVector::new(0.0, 0.0, 1.0))
            .height(601)
            .aspect_ratio(801.0 / 601.0)
            .fovy(60.0)
            .build()
    }

    #[test]
    fn left_right_up_down() {
        let camera = looking_along_y();

        let ray_center = camera.primary_ray(&ScreenPoint::new(400, 300));
        let ray_left = camera.primary_ray(&ScreenPoint::new(0, 300));
        let ray_right = camera.primary_ray(&ScreenPoint::new(800, 300));
        let ray_up = camera.primary_ray(&ScreenPoint::new(400, 0));
        let ray_down = camera.primary_ray(&ScreenPoint::new(400, 600));

        assert!(ray_center.direction.x.abs() < 1e-12);
        assert!(ray_center.direction.z.abs() < 1e-12);
        assert!(ray_center.direction.y > 0.0);
        assert!(ray_left.direction.x < ray_center.direction.x);
        assert!(ray_right.direction.x > ray_center.direction.x);
        assert!(ray_up.direction.z > ray_center.direction.z);
        assert!(ray_down.direction.z < ray_center.direction.z);
    }

    #[test]
    fn first_row_is_the_top_of_the_view() {
        let camera = looking_along_y();
        let top = camera.primary_ray(&ScreenPoint::new(400, 0));
        let bottom = camera.primary_ray(&ScreenPoint::new(400, 600));

        // Z is up for this camera, so the first row looks up and the last one down
        assert!(top.direction.z > 0.0);
        assert!(bottom.direction.z < 0.0);
        assert!((top.direction.z + bottom.direction.z).abs() < 1e-12);
    }

    #[test]
    fn width_follows_aspect_ratio() {
        let camera = looking_along_y();
        assert!(camera.resolution() == ScreenSize::new(801, 601));
        assert!(camera.width() == 801);
        assert!(camera.height() == 601);
    }

    #[test]
    fn vertical_field_of_view() {
        let camera = Camera::builder()
            .position(WorldPoint::new(0.0, 0.0, 2.0))
            .center(WorldPoint::origin())
            .up(WorldVector::new(0.0, 1.0, 0.0))
            .height(1001)
            .fovy(90.0)
            .z_near(0.1)
            .build();

        // Top row center, half a pixel below the edge of the frustum
        let ray = camera.primary_ray(&ScreenPoint::new(500, 0));
        let angle = ray.direction.angle(&WorldVector::new(0.0, 0.0, -1.0));
        let expected = (1.0 - 1.0 / 1001.0 as FloatType).atan();
        assert!((angle - expected).abs() < 1e-9);
        assert!(ray.direction.y > 0.0);
        assert!(ray.origin == WorldPoint::new(0.0, 0.0, 2.0));
    }

    #[test]
    #[should_panic]
    fn degenerate_up_vector() {
        Camera::builder()
            .position(WorldPoint::new(0.0, 0.0, 2.0))
            .center(WorldPoint::origin())
            .up(WorldVector::new(0.0, 0.0, 1.0))
            .height(10)
            .fovy(45.0)
            .build();
    }
}
