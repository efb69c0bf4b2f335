use std::{fs, io, path::Path, str::FromStr};

use indexmap::IndexMap;
use itertools::Itertools as _;
use nalgebra::Matrix4;
use thiserror::Error;

use crate::geometry::{FloatType, Triangle, WorldBox, WorldPoint};

/// Indexed triangle mesh, before it is placed into a scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<WorldPoint>,
    pub triangles: Vec<Triangle<usize>>,
}

#[derive(Debug, Error)]
pub enum MeshOpenError {
    #[error("Failed to read file: {0}")]
    ReadError(#[from] io::Error),

    #[error("Failed to parse OBJ file: {0}")]
    ObjParseError(#[from] wavefront_obj::ParseError),

    #[error("Missing OFF header")]
    MissingHeader,

    #[error("Line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Unexpected end of file, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("Line {line}: vertex index {index} out of range, mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        line: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("Unknown mesh format: {0:?}")]
    UnknownFormat(std::path::PathBuf),
}

impl Mesh {
    /// Loads a mesh, choosing the format by file extension (`.off` or `.obj`).
    pub fn load(p: impl AsRef<Path>) -> Result<Mesh, MeshOpenError> {
        let p = p.as_ref();
        match p.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase) {
            Some(e) if e == "off" => Self::with_off(p),
            Some(e) if e == "obj" => Self::with_obj(p),
            _ => Err(MeshOpenError::UnknownFormat(p.to_owned())),
        }
    }

    pub fn with_off(p: impl AsRef<Path>) -> Result<Mesh, MeshOpenError> {
        let content = fs::read_to_string(p)?;
        Self::parse_off(&content)
    }

    pub fn with_obj(p: impl AsRef<Path>) -> Result<Mesh, MeshOpenError> {
        let content = fs::read_to_string(p)?;
        let parsed = wavefront_obj::obj::parse(content)?;
        Ok(Self::load_obj(parsed))
    }

    /// Parses the Object File Format.
    /// Polygons with more than three vertices are split into triangle fans,
    /// anything after the coordinates or indices on a line (colors) is ignored.
    pub fn parse_off(content: &str) -> Result<Mesh, MeshOpenError> {
        let mut lines = content_lines(content);

        let (line, mut header) = lines.next().ok_or(MeshOpenError::MissingHeader)?;
        if !header[0].ends_with("OFF") {
            return Err(MeshOpenError::MissingHeader);
        }

        // Counts are allowed on the header line as well
        let (line, counts) = if header.len() > 1 {
            (line, header.split_off(1))
        } else {
            lines.next().ok_or(MeshOpenError::UnexpectedEnd {
                expected: "element counts",
            })?
        };
        let Some((vertex_count, face_count)) = counts.iter().take(2).collect_tuple() else {
            return Err(syntax_error(line, "expected vertex and face counts"));
        };
        let vertex_count: usize = parse_token(line, vertex_count)?;
        let face_count: usize = parse_token(line, face_count)?;

        let vertices = (0..vertex_count)
            .map(|_| {
                let (line, tokens) = lines
                    .next()
                    .ok_or(MeshOpenError::UnexpectedEnd { expected: "vertex" })?;
                let Some((x, y, z)) = tokens.iter().take(3).collect_tuple() else {
                    return Err(syntax_error(line, "vertex needs three coordinates"));
                };
                Ok(WorldPoint::new(
                    parse_token(line, x)?,
                    parse_token(line, y)?,
                    parse_token(line, z)?,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut triangles = Vec::new();
        for _ in 0..face_count {
            let (line, tokens) = lines
                .next()
                .ok_or(MeshOpenError::UnexpectedEnd { expected: "face" })?;
            let corner_count: usize = parse_token(line, tokens[0])?;
            if corner_count < 3 {
                return Err(syntax_error(line, "face needs at least three vertices"));
            }
            if tokens.len() <= corner_count {
                return Err(syntax_error(line, "face is missing vertex indices"));
            }

            let indices = tokens[1..=corner_count]
                .iter()
                .map(|token| {
                    let index: usize = parse_token(line, token)?;
                    if index < vertices.len() {
                        Ok(index)
                    } else {
                        Err(MeshOpenError::IndexOutOfRange {
                            line,
                            index,
                            vertex_count: vertices.len(),
                        })
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;

            triangles.extend(
                indices[1..]
                    .iter()
                    .tuple_windows()
                    .map(|(b, c)| Triangle::new(indices[0], *b, *c)),
            );
        }

        Ok(Mesh {
            vertices,
            triangles,
        })
    }

    fn load_obj(obj: wavefront_obj::obj::ObjSet) -> Mesh {
        let mut triangles = Vec::new();
        let mut vertices = IndexMap::new();

        for (object_index, o) in obj.objects.into_iter().enumerate() {
            for geometry in o.geometry {
                for shape in geometry.shapes {
                    let wavefront_obj::obj::Primitive::Triangle(a, b, c) = shape.primitive else {
                        log::warn!("Skipping non-triangle primitive in object {:?}", o.name);
                        continue;
                    };

                    let mut handle_vertex = |vtindex: (usize, Option<usize>, Option<usize>)| {
                        let entry = vertices.entry((object_index, vtindex.0));
                        let index = entry.index();
                        entry.or_insert_with(|| {
                            let vertex = &o.vertices[vtindex.0];
                            WorldPoint::new(vertex.x, vertex.y, vertex.z)
                        });
                        index
                    };

                    let a = handle_vertex(a);
                    let b = handle_vertex(b);
                    let c = handle_vertex(c);

                    triangles.push(Triangle::new(a, b, c));
                }
            }
        }

        Mesh {
            vertices: vertices.into_values().collect(),
            triangles,
        }
    }

    pub fn bounding_box(&self) -> Option<WorldBox> {
        WorldBox::from_points(&self.vertices)
    }

    /// Centers the mesh at the origin and scales it uniformly, so that its largest
    /// extent is `dim`.
    pub fn normalized(&self, dim: FloatType) -> Mesh {
        let Some(bounding_box) = self.bounding_box() else {
            return self.clone();
        };
        let center = bounding_box.center();
        let extent = bounding_box.largest_extent();
        let scale = if extent > 0.0 { dim / extent } else { 1.0 };

        Mesh {
            vertices: self
                .vertices
                .iter()
                .map(|p| WorldPoint::from((p - center) * scale))
                .collect(),
            triangles: self.triangles.clone(),
        }
    }

    /// Applies a model matrix to all vertices.
    pub fn transformed(&self, transform: &Matrix4<FloatType>) -> Mesh {
        Mesh {
            vertices: self
                .vertices
                .iter()
                .map(|p| transform.transform_point(p))
                .collect(),
            triangles: self.triangles.clone(),
        }
    }

    /// Positions of the corners of a triangle.
    pub fn face_positions(&self, index: usize) -> Triangle<WorldPoint> {
        self.triangles[index].map(|i| self.vertices[*i])
    }
}

/// Non-empty lines of the file split into tokens, with comments removed.
/// Line numbers are one based.
fn content_lines(content: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    content.lines().enumerate().filter_map(|(i, line)| {
        let line = line.split('#').next().unwrap_or_default();
        let tokens = line.split_whitespace().collect_vec();
        (!tokens.is_empty()).then_some((i + 1, tokens))
    })
}

fn parse_token<T: FromStr>(line: usize, token: &str) -> Result<T, MeshOpenError> {
    token
        .parse()
        .map_err(|_| syntax_error(line, &format!("invalid number {token:?}")))
}

fn syntax_error(line: usize, message: &str) -> MeshOpenError {
    MeshOpenError::Syntax {
        line,
        message: message.to_owned(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::WorldVector;
    use assert2::{assert, let_assert};
    use test_case::test_case;

    const TETRAHEDRON: &str = "OFF
# a comment
4 4 6

0 0 0
1 0 0
0 1 0
0 0 1
3 0 2 1
3 0 1 3
3 0 3 2   # trailing comment
3 1 2 3 255 0 0
";

    #[test]
    fn parse_tetrahedron() {
        let_assert!(Ok(mesh) = Mesh::parse_off(TETRAHEDRON));
        assert!(mesh.vertices.len() == 4);
        assert!(mesh.triangles.len() == 4);
        assert!(mesh.vertices[3] == WorldPoint::new(0.0, 0.0, 1.0));
        assert!(mesh.triangles[3] == Triangle::new(1, 2, 3));
    }

    #[test]
    fn tetrahedron_faces_point_outwards() {
        let mesh = Mesh::parse_off(TETRAHEDRON).unwrap();
        let center = WorldPoint::new(0.25, 0.25, 0.25);
        for i in 0..mesh.triangles.len() {
            let triangle = mesh.face_positions(i);
            assert!(triangle.normal().dot(&(triangle.centroid() - center)) > 0.0);
        }
    }

    #[test]
    fn polygons_become_fans() {
        let mesh = Mesh::parse_off("OFF 5 1 0\n0 0 0\n1 0 0\n2 1 0\n1 2 0\n0 1 0\n5 0 1 2 3 4\n")
            .unwrap();
        assert!(
            mesh.triangles
                == vec![
                    Triangle::new(0, 1, 2),
                    Triangle::new(0, 2, 3),
                    Triangle::new(0, 3, 4)
                ]
        );
    }

    #[test]
    fn missing_header() {
        let_assert!(Err(MeshOpenError::MissingHeader) = Mesh::parse_off("4 4 6\n"));
        let_assert!(Err(MeshOpenError::MissingHeader) = Mesh::parse_off("# nothing\n\n"));
    }

    #[test_case("OFF\n1 0 0\n0 zero 0\n", 3 ; "bad_coordinate")]
    #[test_case("OFF\n1\n", 2 ; "missing_face_count")]
    #[test_case("OFF\n1 1 0\n0 0\n", 3 ; "short_vertex")]
    #[test_case("OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n2 0 1\n", 6 ; "two_vertex_face")]
    #[test_case("OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1\n", 6 ; "missing_index")]
    fn syntax_errors(content: &str, expected_line: usize) {
        let_assert!(Err(MeshOpenError::Syntax { line, .. }) = Mesh::parse_off(content));
        assert!(line == expected_line);
    }

    #[test]
    fn index_out_of_range() {
        let_assert!(
            Err(MeshOpenError::IndexOutOfRange {
                line: 6,
                index: 3,
                vertex_count: 3
            }) = Mesh::parse_off("OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 3\n")
        );
    }

    #[test_case("OFF\n3 18446744073709551615 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n", "face" ; "huge_face_count")]
    #[test_case("OFF\n18446744073709551615 1 0\n0 0 0\n", "vertex" ; "huge_vertex_count")]
    fn counts_larger_than_content(content: &str, expected_element: &str) {
        let_assert!(Err(MeshOpenError::UnexpectedEnd { expected }) = Mesh::parse_off(content));
        assert!(expected == expected_element);
    }

    #[test]
    fn truncated() {
        let_assert!(
            Err(MeshOpenError::UnexpectedEnd { expected: "face" }) =
                Mesh::parse_off("OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n")
        );
    }

    #[test]
    fn normalized_fits_dimension() {
        let mesh = Mesh {
            vertices: vec![WorldPoint::new(10.0, 10.0, 10.0), WorldPoint::new(14.0, 12.0, 11.0)],
            triangles: vec![],
        };
        let normalized = mesh.normalized(2.0);
        let_assert!(Some(b) = normalized.bounding_box());
        assert!(b.min == WorldPoint::new(-1.0, -0.5, -0.25));
        assert!(b.max == WorldPoint::new(1.0, 0.5, 0.25));
    }

    #[test]
    fn transformed_applies_model_matrix() {
        let mesh = Mesh::parse_off(TETRAHEDRON).unwrap();
        let transform = Matrix4::new_translation(&WorldVector::new(1.0, 2.0, 3.0))
            * Matrix4::new_scaling(2.0);
        let moved = mesh.transformed(&transform);
        assert!(moved.vertices[1] == WorldPoint::new(3.0, 2.0, 3.0));
        assert!(moved.triangles == mesh.triangles);
    }

    #[test]
    fn obj_vertices_are_shared() {
        let source = "o tetra\nv 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 2 3\nf 1 2 4\n";
        let_assert!(Ok(parsed) = wavefront_obj::obj::parse(source.to_string()));
        let mesh = Mesh::load_obj(parsed);
        assert!(mesh.triangles.len() == 2);
        assert!(mesh.vertices.len() == 4);

        // The loader may rotate the corners, the winding is what stays
        let triangle = mesh.face_positions(1);
        let mut corners = triangle.iter().map(|p| [p.x, p.y, p.z]).collect::<Vec<_>>();
        corners.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!(corners == vec![[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]]);
        assert!(triangle.unit_normal() == WorldVector::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn load_by_extension() {
        let path = std::env::temp_dir().join(format!("octrace-mesh-{}.off", std::process::id()));
        fs::write(&path, TETRAHEDRON).unwrap();
        let loaded = Mesh::load(&path);
        fs::remove_file(&path).unwrap();

        let_assert!(Ok(mesh) = loaded);
        assert!(mesh.triangles.len() == 4);

        let_assert!(Err(MeshOpenError::UnknownFormat(_)) = Mesh::load("teapot.stl"));
        let_assert!(Err(MeshOpenError::ReadError(_)) = Mesh::load("/nonexistent/teapot.off"));
    }
}
