mod light;
mod material;
mod mesh;
pub mod octree;
mod primitives;

pub use light::Light;
pub use material::{Material, VACUUM_REFRACTION_INDEX};
pub use mesh::{Mesh, MeshOpenError};

use std::ops::Range;

use index_vec::IndexVec;
use nalgebra::Matrix4;

use crate::geometry::{
    FloatType, Ray, Triangle, TriangleHit, WorldBox, WorldPoint, WorldVector, intersect_triangle,
};

index_vec::define_index_type! {
    pub struct VertexIdx = u32;
}

index_vec::define_index_type! {
    pub struct FaceIdx = u32;
}

index_vec::define_index_type! {
    pub struct MaterialIdx = u32;
}

/// A triangle of the scene.
#[derive(Clone, Debug)]
pub struct Face {
    pub vertices: Triangle<VertexIdx>,
    /// Unit normal, zero for faces without area
    pub normal: WorldVector,
    pub material: MaterialIdx,
}

/// Everything that gets rendered: triangles with their materials, and lights.
/// Geometry is added mesh by mesh and never changes afterwards.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    vertices: IndexVec<VertexIdx, WorldPoint>,
    faces: IndexVec<FaceIdx, Face>,
    materials: IndexVec<MaterialIdx, Material>,
    lights: Vec<Light>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a mesh into the scene, with the model matrix applied to its vertices.
    /// Returns the indices of the newly added faces.
    pub fn add_mesh(
        &mut self,
        mesh: &Mesh,
        material: Material,
        transform: &Matrix4<FloatType>,
    ) -> Range<FaceIdx> {
        let material = self.materials.push(material);
        let first_vertex = self.vertices.next_idx();
        let first_face = self.faces.next_idx();

        self.vertices
            .extend(mesh.vertices.iter().map(|p| transform.transform_point(p)));

        for triangle in &mesh.triangles {
            let vertices = triangle.map(|i| first_vertex + *i);
            let normal = vertices.map(|i| self.vertices[*i]).unit_normal();
            self.faces.push(Face {
                vertices,
                normal,
                material,
            });
        }

        first_face..self.faces.next_idx()
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn faces(&self) -> &IndexVec<FaceIdx, Face> {
        &self.faces
    }

    pub fn face(&self, index: FaceIdx) -> &Face {
        &self.faces[index]
    }

    pub fn vertices(&self) -> &IndexVec<VertexIdx, WorldPoint> {
        &self.vertices
    }

    /// Positions of the corners of a face.
    pub fn triangle(&self, index: FaceIdx) -> Triangle<WorldPoint> {
        self.faces[index].vertices.map(|i| self.vertices[*i])
    }

    pub fn material(&self, index: FaceIdx) -> &Material {
        &self.materials[self.faces[index].material]
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn bounding_box(&self) -> Option<WorldBox> {
        WorldBox::from_points(&self.vertices)
    }

    pub fn intersect_face(&self, index: FaceIdx, ray: &Ray) -> Option<TriangleHit> {
        intersect_triangle(&self.triangle(index), &self.faces[index].normal, ray)
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::util::Rgb;
    use assert2::assert;

    pub fn gray() -> Material {
        Material::builder().color(Rgb::new(0.5, 0.5, 0.5)).build()
    }

    #[test]
    fn add_mesh_transforms_and_indexes() {
        let mut scene = Scene::new();
        let first = scene.add_mesh(&Mesh::triangle(), gray(), &Matrix4::identity());
        let transform = Matrix4::new_translation(&WorldVector::new(0.0, 0.0, 5.0));
        let second = scene.add_mesh(&Mesh::square(), gray(), &transform);

        assert!(first == (FaceIdx::new(0)..FaceIdx::new(1)));
        assert!(second == (FaceIdx::new(1)..FaceIdx::new(3)));
        assert!(scene.faces().len() == 3);
        assert!(scene.vertices().len() == 7);

        // Indices of the second mesh point past the first mesh's vertices
        let triangle = scene.triangle(FaceIdx::new(1));
        assert!(triangle[0] == WorldPoint::new(-0.5, 0.0, 4.5));
        assert!(scene.face(FaceIdx::new(2)).material == MaterialIdx::new(1));
        assert!(scene.face(FaceIdx::new(2)).normal == WorldVector::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn normals_follow_rotation() {
        let mut scene = Scene::new();
        let rotation = nalgebra::Rotation3::from_axis_angle(
            &WorldVector::x_axis(),
            std::f64::consts::FRAC_PI_2,
        )
        .to_homogeneous();
        scene.add_mesh(&Mesh::square(), gray(), &rotation);
        let normal = scene.face(FaceIdx::new(0)).normal;
        assert!((normal - WorldVector::new(0.0, 0.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn degenerate_face_has_zero_normal() {
        let mesh = Mesh {
            vertices: vec![WorldPoint::origin(), WorldPoint::new(1.0, 1.0, 1.0)],
            triangles: vec![Triangle::new(0, 1, 1)],
        };
        let mut scene = Scene::new();
        scene.add_mesh(&mesh, gray(), &Matrix4::identity());
        assert!(scene.face(FaceIdx::new(0)).normal == WorldVector::zeros());

        let ray = Ray::new(WorldPoint::new(0.5, 0.5, -1.0), WorldVector::new(0.0, 0.0, 1.0));
        assert!(scene.intersect_face(FaceIdx::new(0), &ray).is_none());
    }
}
