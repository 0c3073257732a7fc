//! Session configuration and run options.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Plane alignments the tracker should look for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct PlaneDetection: u8 {
        /// Detect floors, tables and similar surfaces.
        const HORIZONTAL = 0b01;
        /// Detect walls and similar surfaces.
        const VERTICAL = 0b10;
    }
}

bitflags! {
    /// Options applied when (re)running a session.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct RunOptions: u8 {
        /// Discard every anchor the session currently tracks.
        const REMOVE_EXISTING_ANCHORS = 0b001;
        /// Restart device tracking from a fresh world origin.
        const RESET_TRACKING = 0b010;
        /// Cancel outstanding tracked raycasts.
        const STOP_TRACKED_RAYCASTS = 0b100;
    }
}

impl RunOptions {
    /// Options used when the user resets the experience.
    pub fn full_reset() -> Self {
        Self::REMOVE_EXISTING_ANCHORS | Self::RESET_TRACKING | Self::STOP_TRACKED_RAYCASTS
    }
}

/// World-tracking configuration handed to [`crate::TrackingSession::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldTrackingConfiguration {
    /// Plane alignments to detect.
    pub plane_detection: PlaneDetection,
    /// Whether ambient light estimation is enabled.
    pub light_estimation: bool,
}

impl Default for WorldTrackingConfiguration {
    fn default() -> Self {
        Self {
            plane_detection: PlaneDetection::empty(),
            light_estimation: false,
        }
    }
}

impl WorldTrackingConfiguration {
    /// Horizontal and vertical plane detection with light estimation.
    pub fn planes_and_light() -> Self {
        Self {
            plane_detection: PlaneDetection::HORIZONTAL | PlaneDetection::VERTICAL,
            light_estimation: true,
        }
    }

    /// Whether planes of `alignment` are detected under this configuration.
    pub fn detects(&self, alignment: arplace_core::PlaneAlignment) -> bool {
        match alignment {
            arplace_core::PlaneAlignment::Horizontal => {
                self.plane_detection.contains(PlaneDetection::HORIZONTAL)
            }
            arplace_core::PlaneAlignment::Vertical => {
                self.plane_detection.contains(PlaneDetection::VERTICAL)
            }
        }
    }
}
