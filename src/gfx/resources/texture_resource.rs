//! Texture resource management for wgpu
//!
//! Provides utilities for creating GPU textures, views, and samplers: the
//! depth and multisampled color attachments, mipmapped image textures decoded
//! from disk, and a plain white texture bound wherever a material has no image.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure to turn an image file into texture data
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to read texture '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode texture '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Reads and decodes an image file into 8-bit RGBA pixels
///
/// The decoder is the only format check; anything it accepts is used.
pub fn load_image(path: &Path) -> Result<image::RgbaImage, TextureError> {
    let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let img = image::load_from_memory(&bytes).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// GPU texture resource containing texture, view, and sampler
#[derive(Clone)]
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Standard depth buffer format used throughout the engine
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Describes a depth buffer matching the surface configuration
    pub fn depth_descriptor<'a>(
        config: &wgpu::SurfaceConfiguration,
        sample_count: u32,
        label: &'a str,
    ) -> wgpu::TextureDescriptor<'a> {
        attachment_descriptor(config, Self::DEPTH_FORMAT, sample_count, label)
    }

    /// Describes the multisampled color target resolved into the surface
    pub fn multisampled_color_descriptor<'a>(
        config: &wgpu::SurfaceConfiguration,
        sample_count: u32,
        label: &'a str,
    ) -> wgpu::TextureDescriptor<'a> {
        attachment_descriptor(config, config.format, sample_count, label)
    }

    /// Creates a depth texture matching the surface configuration
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        sample_count: u32,
        label: &str,
    ) -> Self {
        let texture = device.create_texture(&Self::depth_descriptor(config, sample_count, label));
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Loads an image file and uploads it as a repeating sRGB texture
    pub fn from_path(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Result<Self, TextureError> {
        let rgba = load_image(path)?;
        let label = path.display().to_string();
        Ok(Self::from_rgba(device, queue, &rgba, &label))
    }

    /// 1×1 white texture; sampling it leaves the base color unchanged
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let pixel = image::RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
        Self::from_rgba(device, queue, &pixel, "White Texture")
    }

    /// Uploads decoded pixels and their full mip chain as a repeating sRGB
    /// texture
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &image::RgbaImage,
        label: &str,
    ) -> Self {
        let levels = mip_chain(rgba);
        let (width, height) = rgba.dimensions();

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip_level, level) in levels.iter().enumerate() {
            let (width, height) = level.dimensions();
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: mip_level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                level.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * width),
                    rows_per_image: Some(height),
                },
                wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Repeat addressing lets materials tile the image via their uv scale
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}

fn attachment_descriptor<'a>(
    config: &wgpu::SurfaceConfiguration,
    format: wgpu::TextureFormat,
    sample_count: u32,
    label: &'a str,
) -> wgpu::TextureDescriptor<'a> {
    wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    }
}

/// Number of mip levels down to 1×1 for a texture of this size
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// The image followed by successively halved copies, ending at 1×1
pub fn mip_chain(base: &image::RgbaImage) -> Vec<image::RgbaImage> {
    let (width, height) = base.dimensions();
    let count = mip_level_count(width, height);

    let mut levels = Vec::with_capacity(count as usize);
    levels.push(base.clone());
    for level in 1..count {
        let size = ((width >> level).max(1), (height >> level).max(1));
        let next = image::imageops::resize(
            &levels[level as usize - 1],
            size.0,
            size.1,
            image::imageops::FilterType::Triangle,
        );
        levels.push(next);
    }
    levels
}
