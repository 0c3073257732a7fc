#![warn(missing_docs)]
//! World-tracking surface consumed by the placement layer.
//!
//! The [`TrackingSession`] trait is the narrow seam between the demo logic and
//! whatever engine actually tracks the device. [`SimulatedSession`] implements
//! it in memory so the whole flow can run headless.

mod anchor;
mod camera;
mod config;
mod raycast;
mod session;
mod simulated;

pub use anchor::{Anchor, PlaneAnchor, PlaneGeometry};
pub use camera::Camera;
pub use config::{PlaneDetection, RunOptions, WorldTrackingConfiguration};
pub use raycast::{Ray, RaycastAlignment, RaycastQuery, RaycastResult, RaycastTarget};
pub use session::{SessionEvent, TrackedRaycastId, TrackingError, TrackingSession};
pub use simulated::{EstimatedSurface, RunRecord, SimulatedSession};
