use arrayvec::ArrayVec;
use itertools::Itertools as _;

use crate::{
    camera::Camera,
    geometry::{FloatType, Ray, ScreenPoint, WorldPoint, WorldVector},
    scene::{
        Light, Material, Scene,
        octree::{Octree, OctreeHit, StackCache},
    },
    util::{BLACK, Rgb, Rgba, modulate, saturate, with_alpha, without_alpha},
};

use super::{
    Contribution, DEFAULT_SHININESS, INTENSITY_EPSILON, MAX_SHININESS, MIRROR_THRESHOLD,
    RenderSettings, TracedRay, attenuation, combine,
};

/// Whitted style ray tracer over an octree of the scene.
pub struct RayTracer<'s> {
    octree: Octree<'s>,
    camera: Camera,
    settings: RenderSettings,
}

impl<'s> RayTracer<'s> {
    /// Builds the octree for the scene.
    pub fn new(scene: &'s Scene, camera: Camera, settings: RenderSettings) -> Self {
        let octree = Octree::build(scene);
        octree.log_statistics();
        octree.log_tree();

        RayTracer {
            octree,
            camera,
            settings,
        }
    }

    pub fn octree(&self) -> &Octree<'s> {
        &self.octree
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Color of a single pixel.
    /// Anything further from the camera than its far plane is background.
    pub fn trace_pixel(&self, point: &ScreenPoint, cache: &mut StackCache) -> Rgb {
        let ray = TracedRay::primary(self.camera.primary_ray(point));
        without_alpha(self.cast_within(&ray, self.camera.z_far(), cache))
    }

    /// Color seen along the ray.
    ///
    /// The alpha channel is the weight the color should get when mixed into the result
    /// of the parent ray. Rays that went too deep or carry no intensity have zero weight.
    pub fn cast(&self, ray: &TracedRay, cache: &mut StackCache) -> Rgba {
        self.cast_within(ray, FloatType::INFINITY, cache)
    }

    fn cast_within(&self, ray: &TracedRay, max_t: FloatType, cache: &mut StackCache) -> Rgba {
        if ray.depth > self.settings.max_depth || ray.intensity <= INTENSITY_EPSILON {
            return with_alpha(BLACK, 0.0);
        }

        match self.octree.nearest_intersect_within(&ray.ray, max_t, cache) {
            Some(hit) => self.shade(ray, &hit, cache),
            None => self.settings.background,
        }
    }

    fn shade(&self, ray: &TracedRay, hit: &OctreeHit, cache: &mut StackCache) -> Rgba {
        let scene = self.octree.scene();
        let face = scene.face(hit.face);
        let material = scene.material(hit.face);
        let point = ray.ray.point_at(hit.t);

        // Facing the incoming ray
        let normal = if face.normal.dot(&ray.ray.direction) > 0.0 {
            -face.normal
        } else {
            face.normal
        };

        let opacity = material.opacity();
        let mirror = material.mirror();
        let mut contributions = ArrayVec::<Contribution, 3>::new();

        if material.is_translucent() {
            // Needs the face normal to tell entering from leaving
            let refracted = ray.refract(&face.normal, &point, material);
            contributions.push(Contribution::weighted(
                self.cast(&refracted, cache),
                1.0 - opacity,
            ));
        }

        if mirror > MIRROR_THRESHOLD {
            let reflected = ray.reflect(&normal, &point, material);
            contributions.push(Contribution::weighted(
                self.cast(&reflected, cache),
                opacity * mirror,
            ));
        }

        contributions.push(Contribution::new(
            self.direct_lighting(ray, &point, &normal, material, cache),
            opacity * (1.0 - mirror),
        ));

        combine(&contributions)
    }

    /// Phong shading from all lights that are visible from the point.
    fn direct_lighting(
        &self,
        ray: &TracedRay,
        point: &WorldPoint,
        normal: &WorldVector,
        material: &Material,
        cache: &mut StackCache,
    ) -> Rgb {
        let contributions = self
            .octree
            .scene()
            .lights()
            .iter()
            .map(|light| {
                let to_light = light.position - point;
                let distance = to_light.norm();
                let alpha = attenuation(distance) * light.intensity * material.opacity();

                let shadow_ray = Ray::new(*point, to_light);
                let color = if self
                    .octree
                    .nearest_intersect_within(&shadow_ray, distance, cache)
                    .is_some()
                {
                    BLACK
                } else {
                    illuminate(light, &shadow_ray.direction, &ray.ray.direction, normal, material)
                };

                Contribution::new(color, alpha)
            })
            .collect_vec();

        without_alpha(combine(&contributions))
    }
}

/// Diffuse and specular light reaching the viewer from an unoccluded light.
fn illuminate(
    light: &Light,
    to_light: &WorldVector,
    view_direction: &WorldVector,
    normal: &WorldVector,
    material: &Material,
) -> Rgb {
    let lambert = normal.dot(to_light);
    if lambert <= 0.0 {
        return BLACK;
    }

    let diffuse = saturate(
        modulate(light.color, material.color())
            * (light.intensity * material.opacity() * lambert),
    );

    let reflected_light = normal * (2.0 * lambert) - to_light;
    let highlight = reflected_light.dot(&-view_direction).max(0.0);
    let specular = light.color * (light.intensity * highlight.powf(shininess(material.mirror())));

    saturate(diffuse + specular)
}

fn shininess(mirror: FloatType) -> FloatType {
    if mirror < MIRROR_THRESHOLD {
        DEFAULT_SHININESS
    } else {
        DEFAULT_SHININESS + (MAX_SHININESS - DEFAULT_SHININESS) * mirror
    }
}
