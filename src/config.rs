//! Scene configuration
//!
//! Every dimension, camera setting and light used to build the house scene is
//! held here and passed explicitly into scene construction. `Default` gives the
//! reference scene.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised when a [`SceneConfig`] holds out-of-range values
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("damping factor must be in (0, 1], got {0}")]
    DampingOutOfRange(f32),

    #[error("vertical field of view must be in (0, 180) degrees, got {0}")]
    FieldOfViewOutOfRange(f32),

    #[error("clip planes must satisfy 0 < near < far, got near {near} and far {far}")]
    InvalidClipPlanes { near: f32, far: f32 },

    #[error("multisample count must be 1, 2, 4, 8 or 16, got {0}")]
    InvalidSampleCount(u32),
}

/// Outer dimensions of the house
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseDimensions {
    /// Boundary width along X
    pub width: f32,
    /// Boundary depth along Z, front wall to back wall
    pub depth: f32,
    /// Height of the walls
    pub wall_height: f32,
    /// Height of the roof peak above the wall tops
    pub roof_height: f32,
}

impl Default for HouseDimensions {
    fn default() -> Self {
        Self {
            width: 40.0,
            depth: 20.0,
            wall_height: 10.0,
            roof_height: 2.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [15.0, 10.0, 15.0],
            target: [0.0, 0.0, 0.0],
            fov_y_degrees: 75.0,
            z_near: 0.1,
            z_far: 1000.0,
        }
    }
}

/// Orbit control behaviour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlsConfig {
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per frame when damping is on
    pub damping_factor: f32,
    pub enable_pan: bool,
    /// Radians per pixel of pointer drag
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.1,
            enable_pan: false,
            rotate_speed: 0.005,
            zoom_speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingConfig {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub directional_color: [f32; 3],
    pub directional_intensity: f32,
    /// The directional light shines from this point toward the origin
    pub directional_position: [f32; 3],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.7,
            directional_color: [1.0, 1.0, 1.0],
            directional_intensity: 0.5,
            directional_position: [10.0, 10.0, 10.0],
        }
    }
}

/// Where texture images are read from
#[derive(Debug, Clone, PartialEq)]
pub struct AssetConfig {
    pub directory: PathBuf,
    pub wall_texture: String,
    pub straw_texture: String,
}

impl AssetConfig {
    pub fn wall_texture_path(&self) -> PathBuf {
        self.directory.join(&self.wall_texture)
    }

    pub fn straw_texture_path(&self) -> PathBuf {
        self.directory.join(&self.straw_texture)
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("assets"),
            wall_texture: "walls_texture.jpg".to_string(),
            straw_texture: "straw_texture.jpg".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Samples per pixel for antialiasing; 1 disables multisampling
    pub sample_count: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Thatch".to_string(),
            width: 1200,
            height: 800,
            sample_count: 4,
        }
    }
}

/// Complete configuration for the house scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub house: HouseDimensions,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub lighting: LightingConfig,
    pub assets: AssetConfig,
    /// Clear color, sRGB
    pub background: [f32; 3],
    pub window: WindowConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            house: HouseDimensions::default(),
            camera: CameraConfig::default(),
            controls: ControlsConfig::default(),
            lighting: LightingConfig::default(),
            assets: AssetConfig::default(),
            background: hex_to_rgb(0x87CEEB),
            window: WindowConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Builder pattern: Read textures from a different directory
    pub fn with_asset_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.assets.directory = directory.into();
        self
    }

    /// Checks that every value is usable before any geometry or GPU work starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("house width", self.house.width)?;
        positive("house depth", self.house.depth)?;
        positive("wall height", self.house.wall_height)?;
        positive("roof height", self.house.roof_height)?;

        let damping = self.controls.damping_factor;
        if !(damping > 0.0 && damping <= 1.0) {
            return Err(ConfigError::DampingOutOfRange(damping));
        }

        let fov = self.camera.fov_y_degrees;
        if !(fov > 0.0 && fov < 180.0) {
            return Err(ConfigError::FieldOfViewOutOfRange(fov));
        }

        let (near, far) = (self.camera.z_near, self.camera.z_far);
        if !(near > 0.0 && far > near && far.is_finite()) {
            return Err(ConfigError::InvalidClipPlanes { near, far });
        }

        let samples = self.window.sample_count;
        if !matches!(samples, 1 | 2 | 4 | 8 | 16) {
            return Err(ConfigError::InvalidSampleCount(samples));
        }

        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

/// Splits a 0xRRGGBB color into sRGB components in [0, 1]
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Converts one sRGB component to linear light
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_reference_scene() {
        let config = SceneConfig::default();
        assert_eq!(config.house.width, 40.0);
        assert_eq!(config.house.depth, 20.0);
        assert_eq!(config.house.wall_height, 10.0);
        assert_eq!(config.house.roof_height, 2.7);
        assert_eq!(config.camera.fov_y_degrees, 75.0);
        assert_eq!(config.controls.damping_factor, 0.1);
        assert!(!config.controls.enable_pan);
        assert_eq!(config.window.sample_count, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = SceneConfig::default();
        config.house.roof_height = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                name: "roof height",
                value: 0.0
            })
        );

        let mut config = SceneConfig::default();
        config.controls.damping_factor = 1.5;
        assert_eq!(config.validate(), Err(ConfigError::DampingOutOfRange(1.5)));

        let mut config = SceneConfig::default();
        config.camera.z_far = 0.05;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidClipPlanes { .. })
        ));

        let mut config = SceneConfig::default();
        config.window.sample_count = 3;
        assert_eq!(config.validate(), Err(ConfigError::InvalidSampleCount(3)));
        config.window.sample_count = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_hex_to_rgb() {
        let [r, g, b] = hex_to_rgb(0xa0a0a0);
        assert!((r - 160.0 / 255.0).abs() < 1e-6);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(hex_to_rgb(0xff0000), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_asset_paths() {
        let config = SceneConfig::default().with_asset_directory("/tmp/textures");
        assert_eq!(
            config.assets.wall_texture_path(),
            PathBuf::from("/tmp/textures/walls_texture.jpg")
        );
        assert_eq!(
            config.assets.straw_texture_path(),
            PathBuf::from("/tmp/textures/straw_texture.jpg")
        );
    }
}
