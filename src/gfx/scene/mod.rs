//! # Scene Management Module
//!
//! Objects, their meshes and transforms, and the [`Scene`] that holds them
//! together with materials, lights and the camera.
//!
//! ```no_run
//! use thatch::gfx::scene::{Object, Scene};
//! use thatch::gfx::camera::CameraManager;
//! use thatch::gfx::geometry::generate_box;
//! use thatch::SceneConfig;
//!
//! let config = SceneConfig::default();
//! let mut scene = Scene::new(CameraManager::from_config(&config));
//! scene.add_object(
//!     Object::from_geometry("crate", &generate_box(1.0, 1.0, 1.0)).with_position(0.0, 0.5, 0.0),
//! );
//! ```

pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use object::{DrawObject, Mesh, Object};
pub use scene::{Scene, SceneStatistics};
pub use vertex::Vertex3D;
