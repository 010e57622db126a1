use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::Deserialize;

use crate::camera::Projection;
use crate::error::ConfigError;

/// Driver settings. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub frames: u32,
    pub frame_time_ms: u64,
    pub resolution: Resolution,
    pub sphere_segments: u32,
    pub camera: CameraConfig,
    pub projection: ProjectionConfig,
    pub textures: TextureConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&source)
    }

    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        // serde_yaml treats an empty document as null rather than an empty map.
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn frame_time_secs(&self) -> f32 {
        self.frame_time_ms as f32 / 1000.0
    }

    pub fn projection(&self) -> Projection {
        Projection {
            fov_y_degrees: self.projection.fov_y_degrees,
            aspect: self.resolution.aspect(),
            near: self.projection.near,
            far: self.projection.far,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frames: 120,
            frame_time_ms: 35,
            resolution: Resolution::default(),
            sphere_segments: 24,
            camera: CameraConfig::default(),
            projection: ProjectionConfig::default(),
            textures: TextureConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution {
            width: 640,
            height: 480,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 20.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Optional PPM textures for each kind of body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    pub sun: Option<PathBuf>,
    pub planet: Option<PathBuf>,
    pub moon: Option<PathBuf>,
}
