//! # Graphics Module
//!
//! This module contains all graphics-related functionality for Thatch,
//! including the camera system, procedural geometry, scene management,
//! GPU resources and the render engine.
//!
//! ## Architecture Overview
//!
//! - **Geometry** ([`geometry`]) - Box, plane and roof-fill prism builders
//!   returning plain vertex/index data
//! - **Resources** ([`resources`]) - Materials, textures and global uniforms
//! - **Scene Management** ([`scene`]) - Objects, meshes and the scene container
//! - **Camera System** ([`camera`]) - Orbit camera with damped controls
//! - **Rendering Pipeline** ([`rendering`]) - Forward pass with ambient and
//!   directional lighting
//!
//! ## Usage
//!
//! ```no_run
//! use thatch::{config::SceneConfig, house::build_house};
//!
//! let config = SceneConfig::default();
//! let scene = build_house(&config).expect("reference scene is valid");
//! // The render engine is created by ThatchApp once a window exists
//! ```

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
