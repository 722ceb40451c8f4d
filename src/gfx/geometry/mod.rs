//! # Procedural Geometry Generation
//!
//! Shape descriptions ([`Geometry`]) and the tessellation that turns them into
//! vertex/index data ([`GeometryData`]) ready for GPU upload.
//!
//! All shapes are Y-up and centered at their local origin:
//!
//! - **Box**: `width` along X, `height` along Y, `depth` along Z
//! - **Cylinder / Cone**: axis along Y, from `-height/2` to `height/2`
//! - **Sphere**: UV sphere
//! - **Plane**: lies in the XY plane facing +Z
//!
//! ## Usage
//!
//! ```rust
//! use lighthouse::gfx::geometry::Geometry;
//!
//! let roof = Geometry::cone(3.5, 3.5, 100, 1, false);
//! let data = roof.tessellate();
//! assert!(data.triangle_count() > 0);
//! ```

pub mod primitives;

use std::collections::HashSet;

pub use primitives::*;

/// Default sphere resolution, matching the common `SphereGeometry(radius)` call.
pub const DEFAULT_SPHERE_WIDTH_SEGMENTS: u32 = 32;
pub const DEFAULT_SPHERE_HEIGHT_SEGMENTS: u32 = 16;

/// Shape description of a mesh, independent of its appearance.
///
/// Parameters are never validated. Segment counts are clamped to the minimum
/// valid topology during tessellation, everything else passes through as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
        open_ended: bool,
    },
    Cone {
        radius: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
        open_ended: bool,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Plane {
        width: f32,
        height: f32,
    },
}

impl Geometry {
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Geometry::Box {
            width,
            height,
            depth,
        }
    }

    pub fn cylinder(
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
        open_ended: bool,
    ) -> Self {
        Geometry::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
            height_segments,
            open_ended,
        }
    }

    pub fn cone(
        radius: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
        open_ended: bool,
    ) -> Self {
        Geometry::Cone {
            radius,
            height,
            radial_segments,
            height_segments,
            open_ended,
        }
    }

    pub fn sphere(radius: f32) -> Self {
        Geometry::Sphere {
            radius,
            width_segments: DEFAULT_SPHERE_WIDTH_SEGMENTS,
            height_segments: DEFAULT_SPHERE_HEIGHT_SEGMENTS,
        }
    }

    pub fn plane(width: f32, height: f32) -> Self {
        Geometry::Plane { width, height }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Box { .. } => "box",
            Geometry::Cylinder { .. } => "cylinder",
            Geometry::Cone { .. } => "cone",
            Geometry::Sphere { .. } => "sphere",
            Geometry::Plane { .. } => "plane",
        }
    }

    /// Builds the vertex and index data for this shape.
    pub fn tessellate(&self) -> GeometryData {
        match *self {
            Geometry::Box {
                width,
                height,
                depth,
            } => generate_box(width, height, depth),
            Geometry::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
                height_segments,
                open_ended,
            } => generate_cylinder(
                radius_top,
                radius_bottom,
                height,
                radial_segments,
                height_segments,
                open_ended,
            ),
            // A cone is a cylinder whose top ring collapses to the apex
            Geometry::Cone {
                radius,
                height,
                radial_segments,
                height_segments,
                open_ended,
            } => generate_cylinder(
                0.0,
                radius,
                height,
                radial_segments,
                height_segments,
                open_ended,
            ),
            Geometry::Sphere {
                radius,
                width_segments,
                height_segments,
            } => generate_sphere(radius, width_segments, height_segments),
            Geometry::Plane { width, height } => generate_plane(width, height, 1, 1),
        }
    }
}

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Line-list indices covering every triangle edge exactly once.
    ///
    /// Used for wireframe rendering. Edges keep the order in which they are first
    /// met while walking the triangle list.
    pub fn edge_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();

        for triangle in self.indices.chunks_exact(3) {
            for (a, b) in [
                (triangle[0], triangle[1]),
                (triangle[1], triangle[2]),
                (triangle[2], triangle[0]),
            ] {
                if seen.insert((a.min(b), a.max(b))) {
                    edges.push(a);
                    edges.push(b);
                }
            }
        }

        edges
    }

    /// Convert to the interleaved vertex format used by the renderer
    pub fn to_vertices(&self) -> Vec<crate::gfx::scene::vertex::Vertex3D> {
        use crate::gfx::scene::vertex::Vertex3D;

        self.vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_indices_deduplicate_shared_edges() {
        // Two triangles sharing the 0-2 diagonal of a quad
        let data = GeometryData {
            vertices: vec![[0.0; 3]; 4],
            normals: vec![[0.0, 0.0, 1.0]; 4],
            indices: vec![0, 1, 2, 2, 3, 0],
        };

        let edges = data.edge_indices();
        assert_eq!(edges.len(), 10); // 5 unique edges
        assert_eq!(&edges[..6], &[0, 1, 1, 2, 2, 0]);
    }

    #[test]
    fn cone_tessellates_as_cylinder_with_closed_apex() {
        let cone = Geometry::cone(3.5, 3.5, 100, 1, false).tessellate();
        let cylinder = Geometry::cylinder(0.0, 3.5, 3.5, 100, 1, false).tessellate();
        assert_eq!(cone.vertices, cylinder.vertices);
        assert_eq!(cone.indices, cylinder.indices);
    }

    #[test]
    fn sphere_uses_default_resolution() {
        match Geometry::sphere(0.5) {
            Geometry::Sphere {
                width_segments,
                height_segments,
                ..
            } => {
                assert_eq!(width_segments, 32);
                assert_eq!(height_segments, 16);
            }
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn to_vertices_pairs_positions_with_normals() {
        let data = Geometry::plane(2.0, 2.0).tessellate();
        let vertices = data.to_vertices();
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[0].normal, [0.0, 0.0, 1.0]);
    }
}
