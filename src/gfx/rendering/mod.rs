// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles render pipelines, GPU resource management, and frame rendering.

use thiserror::Error;

pub mod pipeline_manager;
pub mod render_engine;

// Re-export main types
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::{FrameOutcome, RenderEngine};

/// Failures while setting up or driving the GPU
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create a rendering surface for the window")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter found")]
    NoAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open the graphics device")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("the surface reports no usable texture format")]
    UnsupportedSurface,

    #[error("shader '{0}' has not been loaded")]
    ShaderNotFound(String),

    #[error("the GPU ran out of memory while acquiring a frame")]
    OutOfMemory,
}
