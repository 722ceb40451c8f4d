//! # Vertex Data Structures
//!
//! GPU vertex format shared by every mesh in the scene. Tessellated
//! [`GeometryData`](crate::gfx::geometry::GeometryData) is converted into this
//! layout before upload.

/// A 3D vertex with position and normal data.
///
/// `#[repr(C)]` keeps the layout identical to the `VertexInput` struct in the
/// WGSL shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    /// Object-space position [x, y, z]
    pub position: [f32; 3],
    /// Object-space unit normal [nx, ny, nz]
    pub normal: [f32; 3],
}

impl Vertex3D {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Returns the vertex buffer layout for wgpu rendering.
    ///
    /// - Attribute 0: position (Float32x3)
    /// - Attribute 1: normal (Float32x3)
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_struct_size() {
        let layout = Vertex3D::desc();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[1].offset, 12);
    }
}
