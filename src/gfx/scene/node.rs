//! Renderable mesh nodes
//!
//! A [`MeshNode`] pairs a [`Geometry`] with a [`Material`] and a rigid
//! transform. Geometry and material are fixed at construction; only the
//! position and rotation are set afterwards, once, while the scene is being
//! assembled.

use std::ops::Range;

use cgmath::{Matrix4, Rad, Vector3};
use wgpu::{util::DeviceExt, Device};

use super::vertex::Vertex3D;
use crate::{
    gfx::{
        camera::camera_utils::convert_matrix4_to_array, geometry::Geometry,
        resources::material::Material,
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Per-object uniform data. Matches `Object` in the WGSL shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    /// x: receives shadows (0/1)
    pub flags: [u32; 4],
}

/// Creates the layout for the per-object bind group (group 1).
pub fn object_bind_group_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_rendering(binding_types::uniform())
        .create(device, "Object Bind Group Layout")
}

/// Layouts shared by every mesh's bind groups.
pub struct MeshLayouts<'a> {
    pub object: &'a BindGroupLayoutWithDesc,
    pub material: &'a BindGroupLayoutWithDesc,
}

struct MeshGpuResources {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    edge_buffer: wgpu::Buffer,
    edge_count: u32,
    _object_ubo: UniformBuffer<ObjectUniform>,
    object_bind_group: wgpu::BindGroup,
}

pub struct MeshNode {
    pub name: String,
    geometry: Geometry,
    material: Material,
    position: Vector3<f32>,
    /// Euler angles in radians, applied X then Y then Z.
    rotation: Vector3<f32>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,

    gpu_resources: Option<MeshGpuResources>,
}

impl MeshNode {
    pub fn new(name: &str, geometry: Geometry, material: Material) -> Self {
        Self {
            name: name.to_string(),
            geometry,
            material,
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            cast_shadow: false,
            receive_shadow: false,
            gpu_resources: None,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn rotation(&self) -> Vector3<f32> {
        self.rotation
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vector3::new(x, y, z);
    }

    /// Sets the Euler rotation (radians, XYZ order).
    pub fn set_rotation(&mut self, x: Rad<f32>, y: Rad<f32>, z: Rad<f32>) {
        self.rotation = Vector3::new(x.0, y.0, z.0);
    }

    fn rotation_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
    }

    /// Object-to-world transform: `T * Rx * Ry * Rz`.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position) * self.rotation_matrix()
    }

    pub fn uniform(&self) -> ObjectUniform {
        ObjectUniform {
            model: convert_matrix4_to_array(self.model_matrix()),
            // no scale, so the rotation is its own inverse transpose
            normal_matrix: convert_matrix4_to_array(self.rotation_matrix()),
            flags: [self.receive_shadow as u32, 0, 0, 0],
        }
    }

    pub fn has_gpu_resources(&self) -> bool {
        self.gpu_resources.is_some()
    }

    /// Tessellates the geometry and uploads vertex, index, edge and uniform
    /// buffers. Calling this again is a no-op.
    pub fn init_gpu_resources(&mut self, device: &Device, layouts: &MeshLayouts<'_>) {
        if self.gpu_resources.is_some() {
            return;
        }

        let data = self.geometry.tessellate();
        let vertices = data.to_vertices();
        let edges = data.edge_indices();
        log::debug!(
            "Uploading '{}' ({}): {} vertices, {} triangles, {} edges",
            self.name,
            self.geometry.kind(),
            vertices.len(),
            data.triangle_count(),
            edges.len() / 2
        );

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", self.name)),
            contents: bytemuck::cast_slice::<Vertex3D, u8>(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", self.name)),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let edge_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Edge Buffer", self.name)),
            contents: bytemuck::cast_slice(&edges),
            usage: wgpu::BufferUsages::INDEX,
        });

        let object_ubo = UniformBuffer::new_with_data(device, &self.uniform());
        let object_bind_group = BindGroupBuilder::new(layouts.object)
            .resource(object_ubo.binding_resource())
            .create(device, &format!("{} Object Bind Group", self.name));

        self.material.init_gpu_resources(device, layouts.material);

        self.gpu_resources = Some(MeshGpuResources {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
            edge_buffer,
            edge_count: edges.len() as u32,
            _object_ubo: object_ubo,
            object_bind_group,
        });
    }
}

/// Draw helpers for [`MeshNode`]s on a render pass.
///
/// Meshes without GPU resources are skipped silently.
pub trait DrawMesh {
    /// Binds the object uniform at `object_group` and issues the draw call,
    /// using the edge list when `as_lines` is set.
    fn draw_mesh_node(&mut self, node: &MeshNode, object_group: u32, as_lines: bool);

    /// Like [`DrawMesh::draw_mesh_node`], also binding the material at
    /// `material_group`.
    fn draw_mesh_node_with_material(
        &mut self,
        node: &MeshNode,
        object_group: u32,
        material_group: u32,
        instances: Range<u32>,
    );
}

impl DrawMesh for wgpu::RenderPass<'_> {
    fn draw_mesh_node(&mut self, node: &MeshNode, object_group: u32, as_lines: bool) {
        let Some(gpu) = &node.gpu_resources else {
            return;
        };

        self.set_bind_group(object_group, &gpu.object_bind_group, &[]);
        self.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
        if as_lines {
            self.set_index_buffer(gpu.edge_buffer.slice(..), wgpu::IndexFormat::Uint32);
            self.draw_indexed(0..gpu.edge_count, 0, 0..1);
        } else {
            self.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            self.draw_indexed(0..gpu.index_count, 0, 0..1);
        }
    }

    fn draw_mesh_node_with_material(
        &mut self,
        node: &MeshNode,
        object_group: u32,
        material_group: u32,
        instances: Range<u32>,
    ) {
        let (Some(gpu), Some(material)) = (&node.gpu_resources, node.material.bind_group()) else {
            return;
        };

        self.set_bind_group(object_group, &gpu.object_bind_group, &[]);
        self.set_bind_group(material_group, material, &[]);
        self.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
        if node.material.wireframe {
            self.set_index_buffer(gpu.edge_buffer.slice(..), wgpu::IndexFormat::Uint32);
            self.draw_indexed(0..gpu.edge_count, 0, instances);
        } else {
            self.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            self.draw_indexed(0..gpu.index_count, 0, instances);
        }
    }
}
