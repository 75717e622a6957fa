//! Scene objects: meshes with a transform and a material reference

use std::ops::Range;

use cgmath::{Euler, Matrix4, Rad, Vector3, Zero};
use wgpu::{util::DeviceExt, Device};

use crate::gfx::{geometry::GeometryData, resources::material::MaterialId};

use super::vertex::Vertex3D;

/// Triangle mesh with optional GPU buffers
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    pub index_count: u32,
    pub vertex_count: u32,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        Self {
            index_count: indices.len() as u32,
            vertex_count: vertices.len() as u32,
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
        }
    }

    pub fn from_geometry(geometry: &GeometryData) -> Self {
        let (vertices, indices) = geometry.to_scene_format();
        Self::new(vertices, indices)
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn is_uploaded(&self) -> bool {
        self.vertex_buffer.is_some() && self.index_buffer.is_some()
    }

    fn upload(&mut self, device: &Device, label: &str) {
        self.vertex_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.index_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }
}

/// GPU resources owned by one object
pub struct ObjectGpuResources {
    pub transform_buffer: wgpu::Buffer,
    pub transform_bind_group: wgpu::BindGroup,
}

/// A renderable node: meshes, a transform and the name of its material
pub struct Object {
    pub name: String,
    pub meshes: Vec<Mesh>,
    pub position: Vector3<f32>,
    /// Euler rotation applied in X, Y, Z order
    pub rotation: Euler<Rad<f32>>,
    pub material_id: Option<MaterialId>,
    pub visible: bool,
    pub gpu_resources: Option<ObjectGpuResources>, // None until init_gpu_resources called
}

impl Object {
    /// Create a new Object at the origin with no rotation
    pub fn new(name: &str, meshes: Vec<Mesh>) -> Self {
        Self {
            name: name.to_string(),
            meshes,
            position: Vector3::zero(),
            rotation: Euler::new(Rad(0.0), Rad(0.0), Rad(0.0)),
            material_id: None,
            visible: true,
            gpu_resources: None,
        }
    }

    /// Create an object holding a single mesh built from generated geometry
    pub fn from_geometry(name: &str, geometry: &GeometryData) -> Self {
        Self::new(name, vec![Mesh::from_geometry(geometry)])
    }

    /// Builder pattern: Set translation
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vector3::new(x, y, z);
        self
    }

    /// Builder pattern: Set rotation around the X axis
    pub fn with_rotation_x(mut self, angle: Rad<f32>) -> Self {
        self.rotation.x = angle;
        self
    }

    /// Builder pattern: Assign a material by name
    pub fn with_material(mut self, material_id: &str) -> Self {
        self.set_material(material_id);
        self
    }

    pub fn set_material(&mut self, material_id: &str) {
        self.material_id = Some(material_id.to_string());
    }

    pub fn get_material_id(&self) -> Option<&MaterialId> {
        self.material_id.as_ref()
    }

    /// Model matrix: translation applied after rotation
    pub fn transform(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position) * Matrix4::from(self.rotation)
    }

    /// Get the transform bind group for rendering
    pub fn get_transform_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources
            .as_ref()
            .map(|res| &res.transform_bind_group)
    }

    /// Uploads the meshes and creates the transform uniform
    pub fn init_gpu_resources(
        &mut self,
        device: &Device,
        transform_layout: &wgpu::BindGroupLayout,
    ) {
        for mesh in self.meshes.iter_mut() {
            mesh.upload(device, &self.name);
            log::debug!(
                "Uploaded '{}': {} vertices, {} indices",
                self.name,
                mesh.vertex_count,
                mesh.index_count
            );
        }

        let transform: [[f32; 4]; 4] = self.transform().into();
        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Transform Buffer", self.name)),
            contents: bytemuck::cast_slice(&transform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let transform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} Transform Bind Group", self.name)),
            layout: transform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_buffer.as_entire_binding(),
            }],
        });

        self.gpu_resources = Some(ObjectGpuResources {
            transform_buffer,
            transform_bind_group,
        });
    }
}

pub trait DrawObject<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    fn draw_mesh_instanced(&mut self, mesh: &'a Mesh, instances: Range<u32>);
    fn draw_object(&mut self, object: &'a Object);
}

impl<'a, 'b> DrawObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        self.draw_mesh_instanced(mesh, 0..1);
    }

    fn draw_mesh_instanced(&mut self, mesh: &'b Mesh, instances: Range<u32>) {
        let (Some(vertex_buffer), Some(index_buffer)) = (&mesh.vertex_buffer, &mesh.index_buffer)
        else {
            return; // Skip drawing if not uploaded
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, instances);
    }

    fn draw_object(&mut self, object: &'b Object) {
        let Some(transform_bind_group) = object.get_transform_bind_group() else {
            return;
        };
        self.set_bind_group(1, transform_bind_group, &[]);

        for mesh in &object.meshes {
            self.draw_mesh(mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_box;
    use cgmath::{SquareMatrix, Vector4};
    use std::f32::consts::PI;

    #[test]
    fn test_mesh_from_geometry() {
        let mesh = Mesh::from_geometry(&generate_box(1.0, 1.0, 1.0));
        assert_eq!(mesh.vertex_count, 24);
        assert_eq!(mesh.index_count, 36);
        assert!(!mesh.is_uploaded());
        assert_eq!(mesh.vertices()[0].tex_coords, [0.0, 0.0]);
    }

    #[test]
    fn test_default_transform_is_identity() {
        let object = Object::from_geometry("cube", &generate_box(1.0, 1.0, 1.0));
        assert_eq!(object.transform(), Matrix4::identity());
        assert!(object.visible);
        assert!(object.get_material_id().is_none());
    }

    #[test]
    fn test_transform_rotates_then_translates() {
        let object = Object::from_geometry("plane", &generate_box(1.0, 1.0, 1.0))
            .with_rotation_x(Rad(-PI / 2.0))
            .with_position(0.0, 5.0, 0.0);

        // +Z rotated -90° about X points along +Y, then lifted by 5
        let p = object.transform() * Vector4::new(0.0, 0.0, 1.0, 1.0);
        assert!(p.x.abs() < 1e-6);
        assert!((p.y - 6.0).abs() < 1e-6);
        assert!(p.z.abs() < 1e-6);
    }
}
