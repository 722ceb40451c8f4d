//! # Primitive Shape Generation
//!
//! This module contains functions to generate common 3D primitive shapes.
//! All shapes are generated with outward normals and counter-clockwise winding.

use super::GeometryData;
use cgmath::{InnerSpace, Vector3};
use std::f32::consts::PI;

/// Generate a box centered at the origin
///
/// Each face has its own four vertices so normals stay flat per face.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();

    // Unit cube corners, scaled per axis below
    let positions: [[f32; 3]; 24] = [
        // Front face
        [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5],
        // Back face
        [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5],
        // Left face
        [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5],
        // Right face
        [ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5],
        // Top face
        [-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5],
        // Bottom face
        [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5],
    ];

    let face_normals: [[f32; 3]; 6] = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    data.vertices = positions
        .iter()
        .map(|p| [p[0] * width, p[1] * height, p[2] * depth])
        .collect();
    data.normals = face_normals
        .iter()
        .flat_map(|n| std::iter::repeat(*n).take(4))
        .collect();

    // Two triangles per face
    data.indices = (0..6u32)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base + 2, base + 3, base]
        })
        .collect();

    data
}

/// Generate a (possibly tapered) cylinder along the Y axis
///
/// # Arguments
/// * `radius_top` - Radius of the ring at `+height/2`
/// * `radius_bottom` - Radius of the ring at `-height/2`
/// * `height` - Height of the cylinder
/// * `radial_segments` - Number of segments around the axis (at least 3)
/// * `height_segments` - Number of rows along the axis (at least 1)
/// * `open_ended` - Skip both caps when true
///
/// A cap is only generated for a ring with a positive radius, so a cone
/// (`radius_top == 0`) gets a single bottom cap.
pub fn generate_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
    open_ended: bool,
) -> GeometryData {
    let mut data = GeometryData::new();

    let radial = radial_segments.max(3);
    let rows = height_segments.max(1);
    let half_height = height * 0.5;
    let slope = if height != 0.0 {
        (radius_bottom - radius_top) / height
    } else {
        0.0
    };

    // Torso, top row first
    let mut grid: Vec<Vec<u32>> = Vec::with_capacity(rows as usize + 1);
    for y in 0..=rows {
        let v = y as f32 / rows as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;

        let mut row = Vec::with_capacity(radial as usize + 1);
        for x in 0..=radial {
            let theta = x as f32 / radial as f32 * 2.0 * PI;
            let (sin_theta, cos_theta) = theta.sin_cos();

            row.push(data.vertices.len() as u32);
            data.vertices.push([
                radius * sin_theta,
                -v * height + half_height,
                radius * cos_theta,
            ]);
            data.normals
                .push(Vector3::new(sin_theta, slope, cos_theta).normalize().into());
        }
        grid.push(row);
    }

    for x in 0..radial as usize {
        for y in 0..rows as usize {
            let a = grid[y][x];
            let b = grid[y + 1][x];
            let c = grid[y + 1][x + 1];
            let d = grid[y][x + 1];

            data.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    if !open_ended {
        if radius_top > 0.0 {
            push_cap(&mut data, radius_top, half_height, radial, true);
        }
        if radius_bottom > 0.0 {
            push_cap(&mut data, radius_bottom, half_height, radial, false);
        }
    }

    data
}

/// Appends a triangle fan closing one end of a cylinder
fn push_cap(data: &mut GeometryData, radius: f32, half_height: f32, radial: u32, top: bool) {
    let sign = if top { 1.0 } else { -1.0 };
    let y = half_height * sign;

    let center = data.vertices.len() as u32;
    data.vertices.push([0.0, y, 0.0]);
    data.normals.push([0.0, sign, 0.0]);

    let ring_start = center + 1;
    for x in 0..=radial {
        let theta = x as f32 / radial as f32 * 2.0 * PI;
        let (sin_theta, cos_theta) = theta.sin_cos();
        data.vertices
            .push([radius * sin_theta, y, radius * cos_theta]);
        data.normals.push([0.0, sign, 0.0]);
    }

    for x in 0..radial {
        let i = ring_start + x;
        if top {
            data.indices.extend_from_slice(&[i, i + 1, center]);
        } else {
            data.indices.extend_from_slice(&[i + 1, i, center]);
        }
    }
}

/// Generate a UV sphere with specified resolution
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `width_segments` - Number of longitude segments (at least 3)
/// * `height_segments` - Number of latitude segments (at least 2)
///
/// Triangles that would collapse at the poles are skipped.
pub fn generate_sphere(radius: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = width_segments.max(3);
    let lat_segs = height_segments.max(2);

    let mut grid: Vec<Vec<u32>> = Vec::with_capacity(lat_segs as usize + 1);
    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let (sin_theta, cos_theta) = theta.sin_cos();

        let mut row = Vec::with_capacity(long_segs as usize + 1);
        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32; // 0 to 2*PI
            let (sin_phi, cos_phi) = phi.sin_cos();

            let direction = [-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta];

            row.push(data.vertices.len() as u32);
            data.vertices.push([
                radius * direction[0],
                radius * direction[1],
                radius * direction[2],
            ]);
            data.normals.push(direction);
        }
        grid.push(row);
    }

    for lat in 0..lat_segs as usize {
        for long in 0..long_segs as usize {
            let a = grid[lat][long + 1];
            let b = grid[lat][long];
            let c = grid[lat + 1][long];
            let d = grid[lat + 1][long + 1];

            if lat != 0 {
                data.indices.extend_from_slice(&[a, b, d]);
            }
            if lat != lat_segs as usize - 1 {
                data.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

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
/// Returns a plane centered at the origin with its normal pointing along +Z.
pub fn generate_plane(
    width: f32,
    height: f32,
    width_segments: u32,
    height_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);
    let row_len = w_segs + 1;

    for y in 0..=h_segs {
        let pos_y = height * 0.5 - y as f32 / h_segs as f32 * height;

        for x in 0..=w_segs {
            let pos_x = x as f32 / w_segs as f32 * width - width * 0.5;

            data.vertices.push([pos_x, pos_y, 0.0]);
            data.normals.push([0.0, 0.0, 1.0]);
        }
    }

    for y in 0..h_segs {
        for x in 0..w_segs {
            let a = x + row_len * y;
            let b = x + row_len * (y + 1);
            let c = (x + 1) + row_len * (y + 1);
            let d = (x + 1) + row_len * y;

            data.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_in_range(data: &GeometryData) {
        let count = data.vertices.len() as u32;
        assert!(data.indices.iter().all(|&i| i < count));
        assert_eq!(data.vertices.len(), data.normals.len());
    }

    #[test]
    fn test_box_generation() {
        let cube = generate_box(9.0, 2.0, 9.0);
        assert_eq!(cube.vertex_count(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.triangle_count(), 12);
        assert_indices_in_range(&cube);

        let max_y = cube.vertices.iter().map(|v| v[1]).fold(f32::MIN, f32::max);
        let max_x = cube.vertices.iter().map(|v| v[0]).fold(f32::MIN, f32::max);
        assert_eq!(max_y, 1.0);
        assert_eq!(max_x, 4.5);
    }

    #[test]
    fn test_closed_cylinder_generation() {
        let cylinder = generate_cylinder(3.6, 3.6, 0.5, 20, 1, false);
        // torso 21 * 2, plus two caps of 1 center + 21 ring vertices
        assert_eq!(cylinder.vertex_count(), 42 + 2 * 22);
        // torso 20 quads, plus 20 triangles per cap
        assert_eq!(cylinder.triangle_count(), 40 + 2 * 20);
        assert_indices_in_range(&cylinder);
    }

    #[test]
    fn test_open_cylinder_has_no_caps() {
        let fence = generate_cylinder(3.2, 3.2, 1.0, 10, 1, true);
        assert_eq!(fence.vertex_count(), 22);
        assert_eq!(fence.triangle_count(), 20);
        assert!(fence.normals.iter().all(|n| n[1].abs() < 1e-6));
    }

    #[test]
    fn test_cylinder_spans_height_around_origin() {
        let body = generate_cylinder(2.6, 4.0, 20.0, 100, 1, false);
        assert_eq!(body.vertices[0], [0.0, 10.0, 2.6]);

        let bottom_ring_start = 101;
        assert_eq!(body.vertices[bottom_ring_start], [0.0, -10.0, 4.0]);
    }

    #[test]
    fn test_tapered_cylinder_normals_lean_outward() {
        let body = generate_cylinder(2.6, 4.0, 20.0, 8, 1, true);
        // Wider at the bottom, so side normals tilt upward
        assert!(body.normals.iter().all(|n| n[1] > 0.0));
    }

    #[test]
    fn test_cylinder_segment_counts_are_clamped() {
        let degenerate = generate_cylinder(1.0, 1.0, 1.0, 0, 0, true);
        assert_eq!(degenerate.vertex_count(), 4 * 2);
        assert_eq!(degenerate.triangle_count(), 3 * 2);
    }

    #[test]
    fn test_cone_has_only_bottom_cap() {
        let roof = generate_cylinder(0.0, 3.5, 3.5, 100, 1, false);
        assert_eq!(roof.vertex_count(), 202 + 102);
        assert_eq!(roof.triangle_count(), 200 + 100);
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(0.5, 32, 16);
        assert_eq!(sphere.vertex_count(), 33 * 17);
        // Pole rows contribute one triangle per segment instead of two
        assert_eq!(sphere.triangle_count(), 32 * (2 * 16 - 2));
        assert_indices_in_range(&sphere);

        for v in &sphere.vertices {
            let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((len - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(2.0, 2.0, 2, 2);
        assert_eq!(plane.vertices.len(), 9); // 3x3 grid
        assert_eq!(plane.indices.len(), 24); // 4 quads * 2 triangles * 3 indices
        assert_eq!(plane.vertices[0], [-1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_negative_radius_is_passed_through() {
        let inverted = generate_sphere(-1.0, 8, 4);
        assert_eq!(inverted.vertices[0], [-0.0, -1.0, -0.0]);
    }
}
