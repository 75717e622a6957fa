//! Global uniform bindings for camera and scene lighting
//!
//! Holds the per-frame data shared by every object: camera matrices plus the
//! ambient and directional lights. Bound to slot 0 in the scene pipeline.

use cgmath::{InnerSpace, Vector3};

use crate::{
    config::LightingConfig,
    gfx::camera::camera_utils::CameraUniform,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content
///
/// MUST match the `Globals` struct in `scene.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
    /// rgb = ambient color, a = intensity
    pub ambient: [f32; 4],
    /// xyz = unit vector pointing toward the light, w = intensity
    pub light_direction: [f32; 4],
    /// rgb = directional light color, a unused
    pub light_color: [f32; 4],
}

impl GlobalUBOContent {
    pub fn new(camera: CameraUniform, lighting: &LightingConfig) -> Self {
        let [ar, ag, ab] = lighting.ambient_color;
        let [lr, lg, lb] = lighting.directional_color;

        // Shines from `directional_position` toward the origin
        let toward_light = Vector3::from(lighting.directional_position);
        let toward_light = if toward_light.magnitude2() > 0.0 {
            toward_light.normalize()
        } else {
            Vector3::unit_y()
        };

        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            ambient: [ar, ag, ab, lighting.ambient_intensity],
            light_direction: [
                toward_light.x,
                toward_light.y,
                toward_light.z,
                lighting.directional_intensity,
            ],
            light_color: [lr, lg, lb, 0.0],
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Writes camera and light data for this frame
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    lighting: &LightingConfig,
) {
    ubo.update_content(queue, GlobalUBOContent::new(camera, lighting));
}

/// Bind group layout and bind group for the global uniform
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    /// Sets up the layout; the bind group is made by `create_bind_group`
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");

        GlobalBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(&mut self, device: &wgpu::Device, ubo: &GlobalUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Global Bind Group"),
        );
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    /// None until `create_bind_group` has run
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_uniform_friendly() {
        // Five 16-byte aligned members, matrix counted as four
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 128);
    }

    #[test]
    fn test_light_points_from_configured_position() {
        let content = GlobalUBOContent::new(CameraUniform::default(), &LightingConfig::default());
        let d = content.light_direction;
        let expected = 1.0 / 3.0f32.sqrt();
        assert!((d[0] - expected).abs() < 1e-6);
        assert!((d[1] - expected).abs() < 1e-6);
        assert!((d[2] - expected).abs() < 1e-6);
        assert_eq!(d[3], 0.5);
        assert_eq!(content.ambient, [1.0, 1.0, 1.0, 0.7]);
    }
}
