use cgmath::{Matrix4, SquareMatrix};
use winit::event::{DeviceEvent, WindowEvent};

use crate::config::SceneConfig;

use super::{camera_controller::CameraController, orbit_camera::OrbitCamera};

/// Owns the camera and the controller that drives it
pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    /// Camera and controls as described by the scene configuration
    pub fn from_config(config: &SceneConfig) -> Self {
        let aspect = config.window.width as f32 / config.window.height.max(1) as f32;
        Self::new(
            OrbitCamera::from_config(&config.camera, aspect),
            CameraController::from_config(&config.controls),
        )
    }

    /// Feeds a window event to the controller. Returns true if it was used.
    pub fn process_window_event(&mut self, event: &WindowEvent) -> bool {
        self.controller.process_window_event(event)
    }

    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        self.controller.process_device_event(event);
    }

    /// Applies this frame's share of pending motion and refreshes the uniform
    pub fn update(&mut self) {
        self.controller.update(&mut self.camera);
        self.camera.update_view_proj();
    }
}

pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    /// Creates a default [CameraUniform].
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }
}
