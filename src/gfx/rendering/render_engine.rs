//! WGPU-based rendering engine
//!
//! Owns the surface, device and queue, the multisampled attachments, the
//! global uniform and the scene pipelines, and draws one frame at a time.

use std::sync::Arc;
use wgpu::{Device, TextureFormat};

use crate::{
    config::{srgb_to_linear, LightingConfig},
    gfx::{
        camera::camera_utils::CameraUniform,
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO},
            material::create_material_layout,
            texture_resource::TextureResource,
        },
        scene::{object::DrawObject, scene::Scene},
    },
    wgpu_utils::{binding_types, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
};

use super::{
    pipeline_manager::{PipelineConfig, PipelineManager},
    RenderError,
};

const SCENE_PIPELINE: &str = "scene";
const DOUBLE_SIDED_PIPELINE: &str = "scene_double_sided";

/// What happened to a frame handed to [`RenderEngine::render_frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    /// The surface was not ready; nothing was drawn this time
    Skipped,
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    sample_count: u32,
    /// Multisampled color target resolved into the surface; `None` at 1 sample
    msaa_view: Option<wgpu::TextureView>,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    transform_layout: BindGroupLayoutWithDesc,
    material_layout: BindGroupLayoutWithDesc,
}

impl RenderEngine {
    /// Creates a render engine drawing to `window`
    ///
    /// `sample_count` falls back to 1 when the adapter cannot multisample the
    /// surface or depth format. Fails if no surface, adapter or device can be
    /// obtained.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        let info = adapter.get_info();
        log::info!("Using adapter '{}' ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        // Shading happens in linear space; an sRGB target encodes on write
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::UnsupportedSurface)?;
        log::info!("Surface format {:?}", format);

        let multisample_supported = [format, TextureResource::DEPTH_FORMAT].iter().all(|f| {
            adapter
                .get_texture_format_features(*f)
                .flags
                .sample_count_supported(sample_count)
        });
        let sample_count = if multisample_supported {
            sample_count
        } else {
            log::warn!("{}x multisampling unsupported, rendering without it", sample_count);
            1
        };
        log::info!("Multisampling at {}x", sample_count);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, sample_count, "depth_texture");
        let msaa_view = create_msaa_view(&device, &config, sample_count);

        let global_ubo = GlobalUBO::new(&device);
        let mut global_bindings = GlobalBindings::new(&device);
        global_bindings.create_bind_group(&device, &global_ubo);

        let transform_layout = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform())
            .create(&device, "Transform Bind Group Layout");
        let material_layout = create_material_layout(&device);

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("scene", include_str!("scene.wgsl"));

        let scene_config = scene_pipeline_config(format, sample_count)
            .with_bind_group_layouts(vec![
                global_bindings.bind_group_layout().clone(),
                transform_layout.layout.clone(),
                material_layout.layout.clone(),
            ]);

        pipeline_manager.register_pipeline(
            SCENE_PIPELINE,
            scene_config.clone().with_label("Scene Pipeline"),
        );
        pipeline_manager.register_pipeline(
            DOUBLE_SIDED_PIPELINE,
            scene_config
                .with_label("Double-Sided Scene Pipeline")
                .with_cull_mode(None),
        );
        pipeline_manager.create_all_pipelines()?;

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            sample_count,
            msaa_view,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            transform_layout,
            material_layout,
        })
    }

    /// Uploads meshes, transforms, textures and materials of `scene`
    pub fn init_scene(&self, scene: &mut Scene) {
        scene.init_gpu_resources(
            &self.device,
            &self.queue,
            &self.transform_layout.layout,
            &self.material_layout,
        );
        let stats = scene.get_statistics();
        log::info!(
            "Scene uploaded: {} objects, {} materials, {} triangles",
            stats.object_count,
            stats.material_count,
            stats.total_triangles
        );
    }

    /// Writes this frame's camera and light uniforms
    pub fn update(&mut self, camera_uniform: CameraUniform, lighting: &LightingConfig) {
        update_global_ubo(&mut self.global_ubo, &self.queue, camera_uniform, lighting);
    }

    /// Draws every visible object of `scene` and presents the frame
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped;
    /// running out of memory is returned as an error.
    pub fn render_frame(&mut self, scene: &Scene) -> Result<FrameOutcome, RenderError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(FrameOutcome::Skipped);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(err) => {
                log::warn!("Skipping frame: {}", err);
                return Ok(FrameOutcome::Skipped);
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let (color_view, resolve_target) = match &self.msaa_view {
            Some(msaa_view) => (msaa_view, Some(&surface_texture_view)),
            None => (&surface_texture_view, None),
        };

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(
                            scene.background,
                            self.format.is_srgb(),
                        )),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            for object in scene.objects.iter().filter(|object| object.visible) {
                let material = scene.get_material_for_object(object);

                let Some(material_bind_group) = material.get_bind_group() else {
                    log::debug!(
                        "Skipping '{}': material '{}' has no GPU resources",
                        object.name,
                        material.name
                    );
                    continue;
                };

                let pipeline_name = if material.double_sided {
                    DOUBLE_SIDED_PIPELINE
                } else {
                    SCENE_PIPELINE
                };
                let Some(pipeline) = self.pipeline_manager.get_pipeline(pipeline_name) else {
                    continue;
                };

                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(2, material_bind_group, &[]);
                render_pass.draw_object(object);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(FrameOutcome::Presented)
    }

    /// Resizes the surface and recreates the depth and multisampled targets
    ///
    /// Zero-sized requests (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture = TextureResource::create_depth_texture(
            &self.device,
            &self.config,
            self.sample_count,
            "depth_texture",
        );
        self.msaa_view = create_msaa_view(&self.device, &self.config, self.sample_count);
    }
}

/// Shader, color target, depth test and sample count shared by the scene
/// pipelines
fn scene_pipeline_config(format: TextureFormat, sample_count: u32) -> PipelineConfig {
    PipelineConfig::default()
        .with_shader("scene")
        .with_color_format(format)
        .with_depth_format(TextureResource::DEPTH_FORMAT)
        .with_sample_count(sample_count)
}

fn create_msaa_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    sample_count: u32,
) -> Option<wgpu::TextureView> {
    if sample_count <= 1 {
        return None;
    }
    let texture = device.create_texture(&TextureResource::multisampled_color_descriptor(
        config,
        sample_count,
        "msaa_color",
    ));
    Some(texture.create_view(&wgpu::TextureViewDescriptor::default()))
}

/// Clear color for an sRGB background
///
/// An sRGB target re-encodes on write, so the value is linearized first.
pub fn clear_color(background: [f32; 3], srgb_target: bool) -> wgpu::Color {
    let [r, g, b] = if srgb_target {
        background.map(srgb_to_linear)
    } else {
        background
    };
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: 1.0,
    }
}
