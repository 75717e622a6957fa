//! # Primitive Shape Generation
//!
//! This module contains functions to generate the primitive shapes the house
//! is built from. All shapes are generated with outward normals and texture
//! coordinates spanning 0 to 1 per face.

use super::GeometryData;

/// Generate a box centered at the origin
///
/// # Arguments
/// * `width` - Extent along X
/// * `height` - Extent along Y
/// * `depth` - Extent along Z
///
/// Each face has its own four vertices so the normals stay flat, and UV
/// coordinates from 0 to 1.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();

    let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);

    #[rustfmt::skip]
    let positions = [
        // Front face
        [-x, -y,  z], [ x, -y,  z], [ x,  y,  z], [-x,  y,  z],
        // Back face
        [-x, -y, -z], [-x,  y, -z], [ x,  y, -z], [ x, -y, -z],
        // Left face
        [-x, -y, -z], [-x, -y,  z], [-x,  y,  z], [-x,  y, -z],
        // Right face
        [ x, -y,  z], [ x, -y, -z], [ x,  y, -z], [ x,  y,  z],
        // Top face
        [-x,  y,  z], [ x,  y,  z], [ x,  y, -z], [-x,  y, -z],
        // Bottom face
        [-x, -y, -z], [ x, -y, -z], [ x, -y,  z], [-x, -y,  z],
    ];

    #[rustfmt::skip]
    let tex_coords = [
        // Front, Back, Left, Right, Top, Bottom faces
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
    ];

    let face_normals = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    data.vertices = positions.to_vec();
    data.tex_coords = tex_coords.to_vec();
    data.normals = face_normals
        .iter()
        .flat_map(|n| std::iter::repeat(*n).take(4))
        .collect();

    // Two counter-clockwise triangles per face
    data.indices = (0..6u32)
        .flat_map(|face| {
            let i = face * 4;
            [i, i + 1, i + 2, i + 2, i + 3, i]
        })
        .collect();

    data
}

/// Generate a plane in the XY plane
///
/// # Arguments
/// * `width` - Width of the plane (X direction)
/// * `height` - Height of the plane (Y direction)
/// * `width_segments` - Number of subdivisions along width
/// * `height_segments` - Number of subdivisions along height
///
/// Returns a plane centered at the origin with its normal along +Z. Rotate
/// it by -90° about X to lay it flat on the ground.
pub fn generate_plane(
    width: f32,
    height: f32,
    width_segments: u32,
    height_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);

    for y in 0..=h_segs {
        let v = y as f32 / h_segs as f32;
        let pos_y = (v - 0.5) * height;

        for x in 0..=w_segs {
            let u = x as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            data.vertices.push([pos_x, pos_y, 0.0]);
            data.normals.push([0.0, 0.0, 1.0]);
            data.tex_coords.push([u, 1.0 - v]);
        }
    }

    // Counter-clockwise when viewed from +Z
    for y in 0..h_segs {
        for x in 0..w_segs {
            let i = y * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;

            data.indices.extend_from_slice(&[i, i + 1, next_row]);
            data.indices.extend_from_slice(&[next_row, i + 1, next_row + 1]);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::super::face_normal;
    use super::*;
    use cgmath::InnerSpace;

    #[test]
    fn test_box_generation() {
        let wall = generate_box(40.0, 10.0, 0.1);
        assert_eq!(wall.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(wall.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(wall.vertex_count(), 24);
        assert_eq!(wall.triangle_count(), 12);
        assert!(wall.validate().is_ok());

        for v in &wall.vertices {
            assert_eq!(v[0].abs(), 20.0);
            assert_eq!(v[1].abs(), 5.0);
            assert!((v[2].abs() - 0.05).abs() < 1e-6);
        }
    }

    #[test]
    fn test_box_winding_matches_normals() {
        let cube = generate_box(1.0, 2.0, 3.0);
        for [a, b, c] in cube.triangles() {
            let n = face_normal(
                cube.vertices[a as usize],
                cube.vertices[b as usize],
                cube.vertices[c as usize],
            )
            .normalize();
            let stored: cgmath::Vector3<f32> = cube.normals[a as usize].into();
            assert!((n - stored).magnitude() < 1e-5);
        }
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(2.0, 2.0, 2, 2);
        assert_eq!(plane.vertices.len(), 9); // 3x3 grid
        assert_eq!(plane.indices.len(), 24); // 4 quads * 2 triangles * 3 indices
        assert!(plane.validate().is_ok());

        for [a, b, c] in plane.triangles() {
            let n = face_normal(
                plane.vertices[a as usize],
                plane.vertices[b as usize],
                plane.vertices[c as usize],
            );
            assert!(n.z > 0.0);
        }
    }

    #[test]
    fn test_plane_clamps_segments() {
        let plane = generate_plane(40.0, 20.0, 0, 0);
        assert_eq!(plane.vertex_count(), 4);
        assert_eq!(plane.triangle_count(), 2);
    }
}
