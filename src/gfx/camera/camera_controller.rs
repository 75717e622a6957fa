use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::config::ControlsConfig;

use super::orbit_camera::OrbitCamera;

/// Pending motion below this is dropped so damping comes to rest
const REST_THRESHOLD: f32 = 1e-5;

/// Pixel scroll deltas are much larger than line deltas
const PIXELS_PER_LINE: f32 = 50.0;

/// Orbit controls: drag to rotate, scroll to zoom, shift-drag to pan when
/// panning is enabled.
///
/// Input only accumulates pending motion. [`update`](Self::update) runs once
/// per frame and moves the camera; with damping on it applies
/// `damping_factor` of what is pending and keeps the rest for later frames,
/// so the camera glides to a stop.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_pan: bool,
    is_shift_held: bool,
    is_mouse_pressed: bool,
    reset_requested: bool,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_zoom: f32,
    pending_pan: (f32, f32),
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            enable_damping: false,
            damping_factor: 1.0,
            enable_pan: true,
            is_shift_held: false,
            is_mouse_pressed: false,
            reset_requested: false,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_zoom: 0.0,
            pending_pan: (0.0, 0.0),
        }
    }

    pub fn from_config(config: &ControlsConfig) -> Self {
        let mut controller = Self::new(config.rotate_speed, config.zoom_speed);
        controller.enable_damping = config.enable_damping;
        controller.damping_factor = config.damping_factor;
        controller.enable_pan = config.enable_pan;
        controller
    }

    /// Handles button, wheel and keyboard input. Returns true if the event
    /// was used by the controls.
    pub fn process_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.set_dragging(*state == ElementState::Pressed);
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32 / PIXELS_PER_LINE
                    }
                };
                self.scroll(lines);
                true
            }
            WindowEvent::KeyboardInput { event, .. } => self.process_key_event(event),
            WindowEvent::Focused(false) => {
                self.set_dragging(false);
                self.is_shift_held = false;
                false
            }
            _ => false,
        }
    }

    /// Raw pointer motion drives rotation while the button is held
    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.drag(delta.0 as f32, delta.1 as f32);
        }
    }

    fn process_key_event(&mut self, event: &KeyEvent) -> bool {
        match event {
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight),
                state,
                ..
            } => {
                self.is_shift_held = *state == ElementState::Pressed;
                true
            }
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::KeyC),
                state: ElementState::Pressed,
                ..
            } if self.is_shift_held => {
                log::info!("Resetting camera to its initial view");
                self.reset_requested = true;
                true
            }
            _ => false,
        }
    }

    pub fn set_dragging(&mut self, pressed: bool) {
        self.is_mouse_pressed = pressed;
    }

    pub fn set_shift_held(&mut self, held: bool) {
        self.is_shift_held = held;
    }

    /// Pointer moved by `(dx, dy)` pixels
    pub fn drag(&mut self, dx: f32, dy: f32) {
        if !self.is_mouse_pressed {
            return;
        }

        if self.is_shift_held {
            if self.enable_pan {
                self.pending_pan.0 += -dx * self.pan_speed;
                self.pending_pan.1 += dy * self.pan_speed;
            }
        } else {
            self.pending_yaw += -dx * self.rotate_speed;
            self.pending_pitch += dy * self.rotate_speed;
        }
    }

    /// Wheel moved by `lines`; positive zooms in
    pub fn scroll(&mut self, lines: f32) {
        self.pending_zoom += -lines * self.zoom_speed;
    }

    /// Returns true if currently panning
    pub fn is_panning(&self) -> bool {
        self.enable_pan && self.is_mouse_pressed && self.is_shift_held
    }

    /// True while motion is still waiting to be applied
    pub fn is_moving(&self) -> bool {
        self.pending_yaw != 0.0
            || self.pending_pitch != 0.0
            || self.pending_zoom != 0.0
            || self.pending_pan != (0.0, 0.0)
    }

    /// Moves the camera by this frame's share of the pending motion
    pub fn update(&mut self, camera: &mut OrbitCamera) {
        if self.reset_requested {
            self.reset_requested = false;
            self.clear_pending();
            camera.reset_to_default();
            return;
        }

        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        if self.pending_yaw != 0.0 {
            camera.add_yaw(self.pending_yaw * step);
        }
        if self.pending_pitch != 0.0 {
            camera.add_pitch(self.pending_pitch * step);
        }
        if self.pending_zoom != 0.0 {
            camera.add_distance(self.pending_zoom * step);
        }
        if self.pending_pan != (0.0, 0.0) {
            camera.pan((self.pending_pan.0 * step, self.pending_pan.1 * step));
        }

        let keep = 1.0 - step;
        self.pending_yaw = settle(self.pending_yaw * keep);
        self.pending_pitch = settle(self.pending_pitch * keep);
        self.pending_zoom = settle(self.pending_zoom * keep);
        self.pending_pan = (
            settle(self.pending_pan.0 * keep),
            settle(self.pending_pan.1 * keep),
        );
    }

    fn clear_pending(&mut self) {
        self.pending_yaw = 0.0;
        self.pending_pitch = 0.0;
        self.pending_zoom = 0.0;
        self.pending_pan = (0.0, 0.0);
    }
}

fn settle(value: f32) -> f32 {
    if value.abs() < REST_THRESHOLD {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3, Zero};

    fn damped() -> CameraController {
        CameraController::from_config(&ControlsConfig::default())
    }

    fn camera() -> OrbitCamera {
        OrbitCamera::new(20.0, 0.3, 0.0, Vector3::zero(), 1.0)
    }

    #[test]
    fn test_damping_applies_fraction_per_frame() {
        let mut controller = damped();
        let mut camera = camera();
        controller.set_dragging(true);
        // 200 px left at 0.005 rad/px leaves 1 rad of yaw pending
        controller.drag(-200.0, 0.0);

        controller.update(&mut camera);
        assert!((camera.yaw - 0.1).abs() < 1e-6);

        controller.update(&mut camera);
        assert!((camera.yaw - 0.19).abs() < 1e-6);

        for _ in 0..200 {
            controller.update(&mut camera);
        }
        assert!((camera.yaw - 1.0).abs() < 1e-3);
        assert!(!controller.is_moving());
    }

    #[test]
    fn test_without_damping_motion_applies_at_once() {
        let mut controller = CameraController::new(0.005, 1.0);
        let mut camera = camera();
        controller.set_dragging(true);
        controller.drag(0.0, 20.0);
        controller.update(&mut camera);
        assert!((camera.pitch - 0.4).abs() < 1e-6);
        assert!(!controller.is_moving());
    }

    #[test]
    fn test_drag_ignored_when_not_pressed() {
        let mut controller = damped();
        controller.drag(100.0, 100.0);
        assert!(!controller.is_moving());
    }

    #[test]
    fn test_pan_disabled_keeps_target() {
        let mut controller = damped();
        let mut camera = camera();
        controller.set_dragging(true);
        controller.set_shift_held(true);
        controller.drag(50.0, 50.0);
        assert!(!controller.is_panning());

        for _ in 0..10 {
            controller.update(&mut camera);
        }
        assert_eq!(camera.target, Vector3::zero());
    }

    #[test]
    fn test_pan_enabled_moves_target() {
        let mut controller = damped();
        controller.enable_pan = true;
        let mut camera = camera();
        controller.set_dragging(true);
        controller.set_shift_held(true);
        controller.drag(50.0, 0.0);
        controller.update(&mut camera);
        assert!(camera.target.magnitude() > 0.0);
    }

    #[test]
    fn test_scroll_up_zooms_in() {
        let mut controller = damped();
        let mut camera = camera();
        controller.scroll(3.0);
        for _ in 0..100 {
            controller.update(&mut camera);
        }
        assert!(camera.distance < 20.0);
    }
}
