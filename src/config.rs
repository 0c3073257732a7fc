use anyhow::{Context, Result};
use arplace_placement::PlacementConfig;
use arplace_tracking::Camera;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/arplace.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Device position in meters, relative to the tracking origin.
    pub position: [f32; 3],
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// View size in points (width, height).
    pub viewport: [f32; 2],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 1.5, 0.0],
            yaw_degrees: 0.0,
            pitch_degrees: -45.0,
            fov_degrees: 60.0,
            viewport: [390.0, 844.0],
        }
    }
}

impl CameraConfig {
    pub fn to_camera(&self) -> Camera {
        let mut camera = Camera::looking(
            Vec3::from_array(self.position),
            self.yaw_degrees.to_radians(),
            self.pitch_degrees.to_radians(),
        );
        camera.fov = self.fov_degrees.clamp(10.0, 120.0).to_radians();
        camera.viewport = (self.viewport[0], self.viewport[1]);
        camera
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Seed for object colors; random when unset.
    pub seed: Option<u64>,
    pub camera: CameraConfig,
    pub placement: PlacementConfig,
}

impl DemoConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<DemoConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    DemoConfig::default()
                }
            },
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else if path != Path::new(DEFAULT_CONFIG_PATH) {
                    warn!("Config not found at {}. Using defaults", path.display());
                }
                DemoConfig::default()
            }
        }
    }

    /// Load configuration, returning parse and IO errors to the caller.
    pub fn load_strict(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}
