//! # Roof-fill prism
//!
//! A closed triangular prism that fills the gable between the two roof slopes
//! and the tops of the front and back walls. The triangular end-caps sit in
//! the front (`z = -depth/2`) and back (`z = depth/2`) wall planes and the
//! ridge runs along Z at `x = 0`.

use super::{compute_creased_normals, GeometryData, GeometryError};

/// Faces meeting at a sharper angle than this keep separate normals
const CREASE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;

/// Vertex indices of the roof fill, in buffer order
pub mod vertex {
    pub const FRONT_BOTTOM_LEFT: u32 = 0;
    pub const FRONT_BOTTOM_RIGHT: u32 = 1;
    pub const FRONT_PEAK: u32 = 2;
    pub const BACK_BOTTOM_LEFT: u32 = 3;
    pub const BACK_BOTTOM_RIGHT: u32 = 4;
    pub const BACK_PEAK: u32 = 5;
    // Duplicates used by the left slope, the ridge and the base so the
    // end-caps keep their own normals.
    pub const SIDE_FRONT_BOTTOM_LEFT: u32 = 6;
    pub const SIDE_BACK_BOTTOM_LEFT: u32 = 7;
    pub const SIDE_FRONT_PEAK: u32 = 8;
    pub const SIDE_BACK_PEAK: u32 = 9;
}

/// Generate the roof-fill prism
///
/// # Arguments
/// * `width` - Boundary width along X
/// * `depth` - Full front-to-back depth along Z
/// * `wall_height` - Y of the prism base (the wall tops)
/// * `roof_height` - Height of the peak above the base
///
/// Returns 10 vertices and 8 triangles: two end-caps, two roof slopes and the
/// base, all wound counter-clockwise seen from outside. Normals are smoothed
/// across the ridge only; the end-caps stay flat.
pub fn generate_roof_fill(
    width: f32,
    depth: f32,
    wall_height: f32,
    roof_height: f32,
) -> Result<GeometryData, GeometryError> {
    require_positive("width", width)?;
    require_positive("depth", depth)?;
    require_positive("roof height", roof_height)?;
    if !(wall_height >= 0.0 && wall_height.is_finite()) {
        return Err(GeometryError::NegativeDimension {
            name: "wall height",
            value: wall_height,
        });
    }

    let (hw, hd) = (width / 2.0, depth / 2.0);
    let (base, peak) = (wall_height, wall_height + roof_height);

    let front_left = [-hw, base, -hd];
    let front_right = [hw, base, -hd];
    let front_peak = [0.0, peak, -hd];
    let back_left = [-hw, base, hd];
    let back_right = [hw, base, hd];
    let back_peak = [0.0, peak, hd];

    let mut data = GeometryData::new();
    data.vertices = vec![
        front_left,
        front_right,
        front_peak,
        back_left,
        back_right,
        back_peak,
        front_left,
        back_left,
        front_peak,
        back_peak,
    ];

    // End-cap-only vertices map the gable upright as seen from outside. All
    // other vertices use a top-down projection, which the shared bottom-right
    // corners satisfy for both mappings.
    data.tex_coords = data
        .vertices
        .iter()
        .enumerate()
        .map(|(i, p)| match i as u32 {
            vertex::FRONT_BOTTOM_LEFT | vertex::FRONT_PEAK => {
                [0.5 - p[0] / width, 1.0 - (p[1] - base) / roof_height]
            }
            vertex::BACK_BOTTOM_LEFT | vertex::BACK_PEAK => {
                [p[0] / width + 0.5, 1.0 - (p[1] - base) / roof_height]
            }
            _ => [p[2] / depth + 0.5, p[0] / width + 0.5],
        })
        .collect();

    use vertex::*;
    #[rustfmt::skip]
    let indices = vec![
        // Front end-cap
        FRONT_BOTTOM_LEFT, FRONT_PEAK, FRONT_BOTTOM_RIGHT,
        // Back end-cap
        BACK_BOTTOM_LEFT, BACK_BOTTOM_RIGHT, BACK_PEAK,
        // Left slope
        SIDE_FRONT_BOTTOM_LEFT, SIDE_BACK_BOTTOM_LEFT, SIDE_BACK_PEAK,
        SIDE_FRONT_BOTTOM_LEFT, SIDE_BACK_PEAK, SIDE_FRONT_PEAK,
        // Right slope
        FRONT_BOTTOM_RIGHT, SIDE_FRONT_PEAK, SIDE_BACK_PEAK,
        FRONT_BOTTOM_RIGHT, SIDE_BACK_PEAK, BACK_BOTTOM_RIGHT,
        // Base
        SIDE_FRONT_BOTTOM_LEFT, FRONT_BOTTOM_RIGHT, BACK_BOTTOM_RIGHT,
        SIDE_FRONT_BOTTOM_LEFT, BACK_BOTTOM_RIGHT, SIDE_BACK_BOTTOM_LEFT,
    ];
    data.indices = indices;

    compute_creased_normals(&mut data, CREASE_ANGLE);

    Ok(data)
}

fn require_positive(name: &'static str, value: f32) -> Result<(), GeometryError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::NonPositiveDimension { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::super::face_normal;
    use super::*;
    use cgmath::{InnerSpace, Vector3};

    const EPS: f32 = 1e-5;

    fn reference() -> GeometryData {
        generate_roof_fill(40.0, 20.0, 10.0, 2.7).unwrap()
    }

    #[test]
    fn test_counts_and_index_range() {
        for (w, d, h, r) in [
            (40.0, 20.0, 10.0, 2.7),
            (1.0, 1.0, 0.0, 1.0),
            (0.01, 300.0, 5.0, 90.0),
        ] {
            let fill = generate_roof_fill(w, d, h, r).unwrap();
            assert_eq!(fill.vertex_count(), 10);
            assert_eq!(fill.indices.len(), 24);
            assert_eq!(fill.triangle_count(), 8);
            assert!(fill.indices.iter().all(|&i| i < 10));
            assert!(fill.validate().is_ok());
        }
    }

    #[test]
    fn test_end_caps_lie_in_wall_planes() {
        let fill = reference();
        let mut caps = fill.triangles();

        for i in caps.next().unwrap() {
            assert!((fill.vertices[i as usize][2] + 10.0).abs() < EPS);
        }
        for i in caps.next().unwrap() {
            assert!((fill.vertices[i as usize][2] - 10.0).abs() < EPS);
        }
    }

    #[test]
    fn test_heights_within_base_and_peak() {
        let fill = reference();
        for v in &fill.vertices {
            assert!(v[1] >= 10.0 && v[1] <= 12.7, "y = {}", v[1]);
        }
    }

    #[test]
    fn test_normals_are_unit_length() {
        let fill = reference();
        assert_eq!(fill.normals.len(), 10);
        for n in &fill.normals {
            let len = Vector3::from(*n).magnitude();
            assert!((len - 1.0).abs() < EPS, "normal length {}", len);
        }
    }

    #[test]
    fn test_front_peak_position() {
        let fill = reference();
        assert_eq!(
            fill.vertices[vertex::FRONT_PEAK as usize],
            [0.0, 12.7, -10.0]
        );
        assert_eq!(
            fill.vertices[vertex::BACK_PEAK as usize],
            [0.0, 12.7, 10.0]
        );
    }

    #[test]
    fn test_triangles_face_outward() {
        let fill = reference();
        let centroid = fill
            .vertices
            .iter()
            .fold(Vector3::new(0.0, 0.0, 0.0), |acc, v| acc + Vector3::from(*v))
            / fill.vertex_count() as f32;

        for [a, b, c] in fill.triangles() {
            let (a, b, c) = (
                fill.vertices[a as usize],
                fill.vertices[b as usize],
                fill.vertices[c as usize],
            );
            let n = face_normal(a, b, c);
            assert!(n.magnitude() > EPS, "degenerate triangle");

            let face_center = (Vector3::from(a) + Vector3::from(b) + Vector3::from(c)) / 3.0;
            assert!(n.dot(face_center - centroid) > 0.0);
        }
    }

    #[test]
    fn test_ridge_normals_point_up() {
        let fill = reference();
        for i in [vertex::SIDE_FRONT_PEAK, vertex::SIDE_BACK_PEAK] {
            let n = fill.normals[i as usize];
            assert!(n[0].abs() < EPS);
            assert!(n[1] > 0.0);
        }
    }

    #[test]
    fn test_end_cap_normals_stay_flat() {
        let fill = reference();
        let mut caps = fill.triangles();

        for i in caps.next().unwrap() {
            let n = fill.normals[i as usize];
            assert!(n[2] < -0.5, "front cap vertex {} normal {:?}", i, n);
        }
        for i in caps.next().unwrap() {
            let n = fill.normals[i as usize];
            assert!(n[2] > 0.5, "back cap vertex {} normal {:?}", i, n);
        }
    }

    #[test]
    fn test_slope_normals_are_not_dragged_down_by_base() {
        let fill = reference();
        for i in [vertex::SIDE_FRONT_BOTTOM_LEFT, vertex::SIDE_BACK_BOTTOM_LEFT] {
            let n = fill.normals[i as usize];
            assert!(n[0] < 0.0 && n[1] > 0.9, "left slope normal {:?}", n);
        }
    }

    #[test]
    fn test_no_face_edge_collapses_in_uv_space() {
        for fill in [reference(), generate_roof_fill(3.0, 7.0, 0.0, 1.5).unwrap()] {
            for [a, b, c] in fill.triangles() {
                for (p, q) in [(a, b), (b, c), (c, a)] {
                    let (uv_p, uv_q) = (fill.tex_coords[p as usize], fill.tex_coords[q as usize]);
                    let du = uv_p[0] - uv_q[0];
                    let dv = uv_p[1] - uv_q[1];
                    assert!(
                        du.abs() > EPS || dv.abs() > EPS,
                        "edge {}-{} maps to {:?}",
                        p,
                        q,
                        uv_p
                    );
                }
            }
        }
    }

    #[test]
    fn test_right_slope_maps_depth() {
        let fill = reference();
        let front = fill.tex_coords[vertex::FRONT_BOTTOM_RIGHT as usize];
        let back = fill.tex_coords[vertex::BACK_BOTTOM_RIGHT as usize];
        assert_eq!(front, [0.0, 1.0]);
        assert_eq!(back, [1.0, 1.0]);
    }

    #[test]
    fn test_rejects_degenerate_dimensions() {
        assert_eq!(
            generate_roof_fill(0.0, 20.0, 10.0, 2.7),
            Err(GeometryError::NonPositiveDimension {
                name: "width",
                value: 0.0
            })
        );
        assert_eq!(
            generate_roof_fill(40.0, 20.0, 10.0, 0.0),
            Err(GeometryError::NonPositiveDimension {
                name: "roof height",
                value: 0.0
            })
        );
        assert!(generate_roof_fill(40.0, -1.0, 10.0, 2.7).is_err());
        assert!(generate_roof_fill(f32::NAN, 20.0, 10.0, 2.7).is_err());
        assert!(generate_roof_fill(40.0, 20.0, f32::INFINITY, 2.7).is_err());
        assert!(matches!(
            generate_roof_fill(40.0, 20.0, -0.5, 2.7),
            Err(GeometryError::NegativeDimension { .. })
        ));
    }
}
