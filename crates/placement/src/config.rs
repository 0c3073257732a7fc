//! Tunables for placed objects and plane visualisation.

use arplace_core::Color;
use arplace_tracking::RaycastAlignment;
use serde::{Deserialize, Serialize};

/// Dimensions of spawned boxes, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BoxDimensions {
    /// Extent along X.
    pub width: f32,
    /// Extent along Y.
    pub height: f32,
    /// Extent along Z.
    pub length: f32,
    /// Edge rounding radius.
    pub chamfer_radius: f32,
}

impl Default for BoxDimensions {
    fn default() -> Self {
        Self {
            width: 0.3,
            height: 0.3,
            length: 0.3,
            chamfer_radius: 0.0,
        }
    }
}

/// Placement configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Box spawned on confidently detected planes.
    #[serde(rename = "box")]
    pub box_dimensions: BoxDimensions,
    /// Radius of spheres spawned on estimated surfaces.
    pub sphere_radius: f32,
    /// Horizontal plane tint.
    pub horizontal_plane_color: Color,
    /// Vertical plane tint.
    pub vertical_plane_color: Color,
    /// Alignment filter for both raycast tiers.
    pub raycast_alignment: RaycastAlignment,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            box_dimensions: BoxDimensions::default(),
            sphere_radius: 0.2,
            horizontal_plane_color: Color::BLUE.with_alpha(0.9),
            vertical_plane_color: Color::CYAN.with_alpha(0.9),
            raycast_alignment: RaycastAlignment::Any,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: PlacementConfig = toml::from_str(
            r#"
sphere_radius = 0.5

[box]
width = 0.1
"#,
        )
        .expect("valid config");
        assert_eq!(config.sphere_radius, 0.5);
        assert_eq!(config.box_dimensions.width, 0.1);
        assert_eq!(config.box_dimensions.height, 0.3);
        assert_eq!(config.raycast_alignment, RaycastAlignment::Any);
        assert_eq!(config.vertical_plane_color.a, 0.9);
    }
}
