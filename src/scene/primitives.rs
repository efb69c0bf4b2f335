//! Procedurally generated meshes.
//! All of them fit into a unit cube centered at the origin and have their faces wound
//! counter-clockwise when seen from outside.

use std::f64::consts::{PI, TAU};

use assert2::assert;

use crate::geometry::{Triangle, WorldPoint, WorldVector};

use super::Mesh;

impl Mesh {
    /// Unit square in the xz plane, facing +y.
    pub fn square() -> Mesh {
        let mut mesh = Mesh::default();
        mesh.add_quad(
            &WorldPoint::origin(),
            &WorldVector::new(0.0, 0.0, 0.5),
            &WorldVector::new(0.5, 0.0, 0.0),
        );
        mesh
    }

    /// Single triangle in the xy plane, facing +z.
    pub fn triangle() -> Mesh {
        Mesh {
            vertices: vec![
                WorldPoint::new(-0.5, -0.5, 0.0),
                WorldPoint::new(0.5, -0.5, 0.0),
                WorldPoint::new(0.0, 0.5, 0.0),
            ],
            triangles: vec![Triangle::new(0, 1, 2)],
        }
    }

    pub fn cube() -> Mesh {
        let x = WorldVector::new(0.5, 0.0, 0.0);
        let y = WorldVector::new(0.0, 0.5, 0.0);
        let z = WorldVector::new(0.0, 0.0, 0.5);

        // (u, v) with u × v pointing out of the face
        let faces = [(y, z), (z, y), (z, x), (x, z), (x, y), (y, x)];

        let mut mesh = Mesh::default();
        for (u, v) in faces {
            let center = WorldPoint::from(u.cross(&v) * 2.0);
            mesh.add_quad(&center, &u, &v);
        }
        mesh
    }

    /// UV sphere with radius 0.5.
    pub fn sphere(segments: usize, rings: usize) -> Mesh {
        assert!(segments >= 3);
        assert!(rings >= 2);

        let vertices = (0..=rings)
            .flat_map(|ring| {
                let theta = PI * ring as f64 / rings as f64;
                (0..=segments).map(move |segment| {
                    let phi = TAU * segment as f64 / segments as f64;
                    WorldPoint::new(
                        0.5 * theta.sin() * phi.cos(),
                        0.5 * theta.cos(),
                        0.5 * theta.sin() * phi.sin(),
                    )
                })
            })
            .collect();

        let index = |ring: usize, segment: usize| ring * (segments + 1) + segment;
        let mut triangles = Vec::new();
        for ring in 0..rings {
            for segment in 0..segments {
                let a = index(ring, segment);
                let b = index(ring + 1, segment);
                let c = index(ring + 1, segment + 1);
                let d = index(ring, segment + 1);

                // The poles would produce zero area triangles
                if ring + 1 < rings {
                    triangles.push(Triangle::new(a, c, b));
                }
                if ring > 0 {
                    triangles.push(Triangle::new(a, d, c));
                }
            }
        }

        Mesh {
            vertices,
            triangles,
        }
    }

    /// Adds a rectangle with corners `center ± u ± v`, facing `u × v`.
    fn add_quad(&mut self, center: &WorldPoint, u: &WorldVector, v: &WorldVector) {
        let first = self.vertices.len();
        self.vertices.extend([
            center - u - v,
            center + u - v,
            center + u + v,
            center - u + v,
        ]);
        self.triangles.extend([
            Triangle::new(first, first + 1, first + 2),
            Triangle::new(first, first + 2, first + 3),
        ]);
    }
}
