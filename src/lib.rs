// src/lib.rs
//! Thatch
//!
//! Renders a small house (textured walls, a gabled straw roof and a ground
//! plane) with wgpu and winit, viewed through a damped orbit camera.

pub mod app;
pub mod config;
pub mod gfx;
pub mod house;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ThatchApp;
pub use config::SceneConfig;
