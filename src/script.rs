use anyhow::{bail, Context, Result};
use arplace_core::PlaneAlignment;
use arplace_tracking::EstimatedSurface;
use glam::{Mat4, Quat, Vec2, Vec3};
use serde::Deserialize;
use std::{fs, path::Path};

/// Scenario driven against a simulated session.
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    /// Overrides the configured color seed.
    #[serde(default)]
    pub seed: Option<u64>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// The tracker detects a new plane.
    DetectPlane {
        alignment: PlaneAlignment,
        position: [f32; 3],
        /// Surface normal; defaults to +Y for horizontal and -X for vertical planes.
        #[serde(default)]
        normal: Option<[f32; 3]>,
        extent: [f32; 2],
    },
    /// The tracker refines a plane detected earlier; `plane` counts detections from 0.
    GrowPlane {
        plane: usize,
        extent: [f32; 2],
        #[serde(default)]
        center: [f32; 3],
    },
    /// Feature points suggest a surface the tracker has not confirmed.
    EstimatedSurface {
        alignment: PlaneAlignment,
        point: [f32; 3],
        #[serde(default)]
        normal: Option<[f32; 3]>,
    },
    /// Tap at a view location; omit both to tap the screen center.
    Tap {
        #[serde(default)]
        x: Option<f32>,
        #[serde(default)]
        y: Option<f32>,
    },
    /// Turn the device.
    Look {
        #[serde(default)]
        yaw_degrees: f32,
        #[serde(default)]
        pitch_degrees: f32,
    },
    Reset,
    Fail {
        #[serde(default = "default_failure_reason")]
        reason: String,
    },
    Interrupt,
    Resume,
}

fn default_failure_reason() -> String {
    "simulated sensor failure".to_string()
}

fn default_normal(alignment: PlaneAlignment) -> Vec3 {
    match alignment {
        PlaneAlignment::Horizontal => Vec3::Y,
        PlaneAlignment::Vertical => Vec3::NEG_X,
    }
}

fn resolve_normal(alignment: PlaneAlignment, normal: Option<[f32; 3]>) -> Result<Vec3> {
    let normal = normal.map(Vec3::from_array).unwrap_or_else(|| default_normal(alignment));
    match normal.try_normalize() {
        Some(normal) => Ok(normal),
        None => bail!("surface normal must be non-zero"),
    }
}

impl Step {
    /// Pose for a `DetectPlane` step.
    pub fn plane_transform(
        alignment: PlaneAlignment,
        position: [f32; 3],
        normal: Option<[f32; 3]>,
    ) -> Result<Mat4> {
        let normal = resolve_normal(alignment, normal)?;
        Ok(Mat4::from_rotation_translation(
            Quat::from_rotation_arc(Vec3::Y, normal),
            Vec3::from_array(position),
        ))
    }

    /// Surface for an `EstimatedSurface` step.
    pub fn estimated_surface(
        alignment: PlaneAlignment,
        point: [f32; 3],
        normal: Option<[f32; 3]>,
    ) -> Result<EstimatedSurface> {
        Ok(EstimatedSurface {
            point: Vec3::from_array(point),
            normal: resolve_normal(alignment, normal)?,
            alignment,
        })
    }

    pub fn extent(extent: [f32; 2]) -> Result<Vec2> {
        let extent = Vec2::from_array(extent);
        if !(extent.x > 0.0 && extent.y > 0.0) {
            bail!("plane extent must be positive, got {extent:?}");
        }
        Ok(extent)
    }
}

impl Script {
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("Invalid script {}", path.display()))
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let script: Script = serde_json::from_str(contents)?;
        if script.steps.is_empty() {
            bail!("script contains no steps");
        }
        Ok(script)
    }

    /// Scenario used when no script is given: a floor, a wall guess and a reset.
    pub fn builtin() -> Self {
        Self {
            seed: None,
            steps: vec![
                Step::Tap { x: None, y: None },
                Step::EstimatedSurface {
                    alignment: PlaneAlignment::Horizontal,
                    point: [0.0, 0.0, 0.0],
                    normal: None,
                },
                Step::Tap { x: None, y: None },
                Step::DetectPlane {
                    alignment: PlaneAlignment::Horizontal,
                    position: [0.0, 0.0, 0.0],
                    normal: None,
                    extent: [1.0, 1.0],
                },
                Step::GrowPlane {
                    plane: 0,
                    extent: [4.0, 4.0],
                    center: [0.0, 0.0, 0.0],
                },
                Step::Tap { x: None, y: None },
                Step::DetectPlane {
                    alignment: PlaneAlignment::Vertical,
                    position: [3.0, 1.0, 0.0],
                    normal: None,
                    extent: [2.0, 2.0],
                },
                Step::Tap {
                    x: Some(195.0),
                    y: Some(100.0),
                },
                Step::Interrupt,
                Step::Resume,
                Step::Reset,
            ],
        }
    }
}
