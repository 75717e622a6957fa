//! Materials and the manager that owns them
//!
//! Objects reference materials by name. Each material keeps a uniform (color,
//! roughness, metalness, texture tiling) plus a texture and sampler, bound
//! together at slot 2.

use std::{collections::HashMap, path::PathBuf};

use wgpu::Device;

use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

use super::texture_resource::TextureResource;

/// Material ID for referencing materials
pub type MaterialId = String;

/// GPU uniform data for materials
///
/// MUST match the `Material` struct in `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub uv_repeat: [f32; 2],
    pub metallic: f32,
    pub roughness: f32,
    /// 1.0 when the bound texture holds the material's image, else 0.0
    pub texture_strength: f32,
    _padding: [f32; 3],
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Layout shared by every material bind group: uniform, texture, sampler
pub fn create_material_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_fragment(binding_types::uniform())
        .next_binding_fragment(binding_types::texture_2d())
        .next_binding_fragment(binding_types::sampler(
            wgpu::SamplerBindingType::Filtering,
        ))
        .create(device, "Material Bind Group Layout")
}

struct MaterialGpuResources {
    ubo: MaterialUBO,
    // Owned for as long as the bind group refers to it
    _texture: TextureResource,
    bind_group: wgpu::BindGroup,
}

/// Surface appearance of an object
pub struct Material {
    pub name: String,
    /// Linear RGBA
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub texture_path: Option<PathBuf>,
    /// Times the texture tiles across the surface in u and v
    pub uv_repeat: [f32; 2],
    /// Drawn without back-face culling
    pub double_sided: bool,
    texture_loaded: bool,
    gpu_resources: Option<MaterialGpuResources>,
}

impl Default for Material {
    fn default() -> Self {
        Self::new("default", [0.8, 0.8, 0.8, 1.0], 0.0, 0.5)
    }
}

impl Material {
    pub fn new(name: &str, base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            texture_path: None,
            uv_repeat: [1.0, 1.0],
            double_sided: false,
            texture_loaded: false,
            gpu_resources: None,
        }
    }

    /// Builder pattern: Set base color from RGB values
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.base_color = [r, g, b, self.base_color[3]];
        self
    }

    /// Builder pattern: Set metallic factor
    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic.clamp(0.0, 1.0);
        self
    }

    /// Builder pattern: Set roughness factor
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Builder pattern: Image read when GPU resources are created
    pub fn with_texture(mut self, path: impl Into<PathBuf>) -> Self {
        self.texture_path = Some(path.into());
        self
    }

    /// Builder pattern: Tile the texture `u` by `v` times
    pub fn with_repeat(mut self, u: f32, v: f32) -> Self {
        self.uv_repeat = [u, v];
        self
    }

    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    /// True once the material's image has been uploaded
    pub fn is_textured(&self) -> bool {
        self.texture_loaded
    }

    pub fn uniform(&self) -> MaterialUniform {
        MaterialUniform {
            base_color: self.base_color,
            uv_repeat: self.uv_repeat,
            metallic: self.metallic,
            roughness: self.roughness,
            texture_strength: if self.texture_loaded { 1.0 } else { 0.0 },
            _padding: [0.0; 3],
        }
    }

    /// Creates or refreshes this material's GPU resources
    ///
    /// The texture is read on first call. A file that is missing or does not
    /// decode is logged and the material falls back to its base color.
    pub fn update_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        if self.gpu_resources.is_none() {
            let texture = self.load_texture(device, queue);
            let ubo = MaterialUBO::new(device);
            let bind_group = BindGroupBuilder::new(layout)
                .resource(ubo.binding_resource())
                .texture(&texture.view)
                .sampler(&texture.sampler)
                .create(device, &format!("{} Material Bind Group", self.name));

            self.gpu_resources = Some(MaterialGpuResources {
                ubo,
                _texture: texture,
                bind_group,
            });
        }

        let uniform = self.uniform();
        if let Some(gpu) = &mut self.gpu_resources {
            gpu.ubo.update_content(queue, uniform);
        }
    }

    fn load_texture(&mut self, device: &Device, queue: &wgpu::Queue) -> TextureResource {
        let Some(path) = &self.texture_path else {
            return TextureResource::white(device, queue);
        };

        match TextureResource::from_path(device, queue, path) {
            Ok(texture) => {
                log::info!("Loaded texture for material '{}'", self.name);
                self.texture_loaded = true;
                texture
            }
            Err(err) => {
                log::warn!("{}; material '{}' renders untextured", err, self.name);
                TextureResource::white(device, queue)
            }
        }
    }

    /// Gets the bind group for rendering
    pub fn get_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources.as_ref().map(|gpu| &gpu.bind_group)
    }
}

/// Central storage for materials, keyed by name
///
/// Always holds a `"default"` material used for objects whose material is
/// missing or unset.
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_material_id: MaterialId,
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialManager {
    pub fn new() -> Self {
        let default_material = Material::default();
        let default_material_id = default_material.name.clone();
        let mut materials = HashMap::new();
        materials.insert(default_material_id.clone(), default_material);

        Self {
            materials,
            default_material_id,
        }
    }

    /// Adds a material, replacing any with the same name
    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn get_default_material(&self) -> &Material {
        &self.materials[&self.default_material_id]
    }

    /// Material for an object, falling back to the default
    pub fn get_material_for_object(&self, material_id: Option<&MaterialId>) -> &Material {
        material_id
            .and_then(|id| self.get_material(id))
            .unwrap_or_else(|| self.get_default_material())
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Creates or refreshes GPU resources for all materials
    pub fn update_all_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue, layout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size_is_16_byte_multiple() {
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 48);
    }

    #[test]
    fn test_builder_sets_fields() {
        let material = Material::new("walls", [1.0; 4], 0.0, 0.5)
            .with_roughness(0.8)
            .with_metallic(2.0)
            .with_texture("assets/walls_texture.jpg")
            .with_repeat(4.0, 4.0)
            .with_double_sided(true);

        assert_eq!(material.roughness, 0.8);
        assert_eq!(material.metallic, 1.0);
        assert_eq!(material.uv_repeat, [4.0, 4.0]);
        assert!(material.double_sided);
        assert_eq!(
            material.texture_path,
            Some(PathBuf::from("assets/walls_texture.jpg"))
        );
    }

    #[test]
    fn test_unloaded_texture_is_not_sampled() {
        let material = Material::default().with_texture("missing.jpg");
        assert!(!material.is_textured());
        assert_eq!(material.uniform().texture_strength, 0.0);
        assert!(material.get_bind_group().is_none());
    }

    #[test]
    fn test_manager_falls_back_to_default() {
        let mut manager = MaterialManager::new();
        manager.add_material(Material::default().with_color(1.0, 0.0, 0.0));
        manager.add_material(Material::new("straw", [1.0; 4], 0.1, 0.8));

        assert_eq!(manager.len(), 2);
        assert_eq!(manager.get_default_material().base_color[0], 1.0);
        assert_eq!(
            manager
                .get_material_for_object(Some(&"straw".to_string()))
                .name,
            "straw"
        );
        assert_eq!(
            manager
                .get_material_for_object(Some(&"missing".to_string()))
                .name,
            "default"
        );
        assert_eq!(manager.get_material_for_object(None).name, "default");
    }
}
