//! # Procedural Geometry Generation
//!
//! Builds the meshes the house is made of, without external model files.
//! Every builder returns [`GeometryData`]: plain vertex/index buffers with no
//! dependency on the GPU.
//!
//! ## Supported Shapes
//!
//! - **Box**: Axis-aligned box with one set of vertices per face
//! - **Plane**: Flat plane in the XY plane with configurable subdivisions
//! - **Roof fill**: Closed triangular prism filling a gable
//!
//! ## Usage
//!
//! ```rust
//! use thatch::gfx::geometry::{generate_box, generate_plane, generate_roof_fill};
//!
//! let wall = generate_box(40.0, 10.0, 0.1);
//! let ground = generate_plane(40.0, 20.0, 1, 1);
//! let fill = generate_roof_fill(40.0, 20.0, 10.0, 2.7).unwrap();
//! assert_eq!(fill.triangle_count(), 8);
//! ```

pub mod primitives;
pub mod prism;

pub use primitives::*;
pub use prism::generate_roof_fill;

use cgmath::{InnerSpace, Vector3, Zero};
use thiserror::Error;

/// Errors raised while building or checking geometry
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("{name} must be positive and finite, got {value}")]
    NonPositiveDimension { name: &'static str, value: f32 },

    #[error("{name} must be finite and not negative, got {value}")]
    NegativeDimension { name: &'static str, value: f32 },

    #[error("index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),

    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("{attribute} has {len} entries but there are {vertex_count} vertices")]
    AttributeLengthMismatch {
        attribute: &'static str,
        len: usize,
        vertex_count: usize,
    },
}

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates the triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Checks the mesh invariants: whole triangles, indices in range and one
    /// normal and texture coordinate per vertex when present.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.indices.len() % 3 != 0 {
            return Err(GeometryError::IncompleteTriangle(self.indices.len()));
        }

        let vertex_count = self.vertices.len();
        if let Some(&index) = self
            .indices
            .iter()
            .find(|&&i| i as usize >= vertex_count)
        {
            return Err(GeometryError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        for (attribute, len) in [
            ("normals", self.normals.len()),
            ("tex_coords", self.tex_coords.len()),
        ] {
            if len != 0 && len != vertex_count {
                return Err(GeometryError::AttributeLengthMismatch {
                    attribute,
                    len,
                    vertex_count,
                });
            }
        }

        Ok(())
    }

    /// Convert to the vertex format used by the renderer
    pub fn to_scene_format(&self) -> (Vec<crate::gfx::scene::vertex::Vertex3D>, Vec<u32>) {
        use crate::gfx::scene::vertex::Vertex3D;

        let vertices: Vec<Vertex3D> = (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                tex_coords: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect();

        (vertices, self.indices.clone())
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}

/// Unnormalized face normal of a triangle; its length is twice the area
pub fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Vector3<f32> {
    let a = Vector3::from(a);
    (Vector3::from(b) - a).cross(Vector3::from(c) - a)
}

/// Replaces the normals with smooth per-vertex normals.
///
/// Each vertex receives the sum of the face normals of every triangle that
/// uses it. Face normals are left unnormalized so larger faces weigh more.
/// The sum is then normalized. Vertices used by no triangle get a zero normal.
pub fn compute_vertex_normals(data: &mut GeometryData) {
    compute_creased_normals(data, std::f32::consts::PI);
}

/// Smooth normals that keep hard edges sharper than `crease_angle` radians.
///
/// A vertex takes the direction of the first non-degenerate triangle that
/// uses it. Later triangles only add to its sum when their face normal is
/// within `crease_angle` of that first one. Sums are area weighted as in
/// [`compute_vertex_normals`].
pub fn compute_creased_normals(data: &mut GeometryData, crease_angle: f32) {
    let min_cos = crease_angle.cos() - 1e-6;
    let mut sums = vec![Vector3::<f32>::zero(); data.vertices.len()];
    let mut owners: Vec<Option<Vector3<f32>>> = vec![None; data.vertices.len()];

    for triangle in data.triangles() {
        let [i0, i1, i2] = triangle.map(|i| i as usize);
        let n = face_normal(data.vertices[i0], data.vertices[i1], data.vertices[i2]);
        if n.magnitude2() == 0.0 {
            continue;
        }
        let unit = n.normalize();

        for i in [i0, i1, i2] {
            let owner = *owners[i].get_or_insert(unit);
            if owner.dot(unit) >= min_cos {
                sums[i] += n;
            }
        }
    }

    data.normals = sums
        .into_iter()
        .map(|n| {
            if n.magnitude2() > 0.0 {
                n.normalize().into()
            } else {
                [0.0, 0.0, 0.0]
            }
        })
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_triangle() -> GeometryData {
        GeometryData {
            vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_compute_vertex_normals_follows_winding() {
        let mut data = single_triangle();
        compute_vertex_normals(&mut data);
        for n in &data.normals {
            assert_eq!(*n, [0.0, 0.0, 1.0]);
        }

        data.indices = vec![0, 2, 1];
        compute_vertex_normals(&mut data);
        for n in &data.normals {
            assert_eq!(*n, [0.0, 0.0, -1.0]);
        }
    }

    #[test]
    fn test_shared_vertex_normal_is_averaged() {
        // Two faces of a roof meeting at a ridge along Z
        let mut data = GeometryData {
            vertices: vec![
                [-1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 1.0, -1.0],
                [1.0, 0.0, 0.0],
            ],
            indices: vec![0, 1, 2, 3, 2, 1],
            ..Default::default()
        };
        compute_vertex_normals(&mut data);

        let ridge = data.normals[1];
        assert!(ridge[0].abs() < 1e-6);
        assert!((ridge[1] - 1.0).abs() < 1e-6);
        assert!(ridge[2].abs() < 1e-6);
    }

    #[test]
    fn test_creased_normals_keep_hard_edges() {
        // An L-shaped corner: a floor facing +Y and a wall facing +Z sharing
        // the edge from vertex 0 to vertex 1
        let mut data = GeometryData {
            vertices: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 0.0, -1.0],
                [0.0, 1.0, 0.0],
            ],
            indices: vec![0, 1, 2, 0, 1, 3],
            ..Default::default()
        };

        compute_creased_normals(&mut data, std::f32::consts::FRAC_PI_3);
        assert_eq!(data.normals[0], [0.0, 1.0, 0.0]);
        assert_eq!(data.normals[1], [0.0, 1.0, 0.0]);
        assert_eq!(data.normals[3], [0.0, 0.0, 1.0]);

        compute_vertex_normals(&mut data);
        let shared = data.normals[0];
        assert!((shared[1] - shared[2]).abs() < 1e-6);
        assert!(shared[1] > 0.7);
    }

    #[test]
    fn test_validate() {
        let mut data = single_triangle();
        assert!(data.validate().is_ok());

        data.indices.push(0);
        assert_eq!(data.validate(), Err(GeometryError::IncompleteTriangle(4)));

        data.indices = vec![0, 1, 3];
        assert_eq!(
            data.validate(),
            Err(GeometryError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            })
        );

        data.indices = vec![0, 1, 2];
        data.normals = vec![[0.0, 0.0, 1.0]];
        assert!(matches!(
            data.validate(),
            Err(GeometryError::AttributeLengthMismatch {
                attribute: "normals",
                ..
            })
        ));
    }
}
