//! The tracking-session seam.

use crate::anchor::Anchor;
use crate::camera::Camera;
use crate::config::{RunOptions, WorldTrackingConfiguration};
use crate::raycast::{RaycastAlignment, RaycastQuery, RaycastResult, RaycastTarget};
use arplace_core::{AnchorId, ScreenPoint};
use thiserror::Error;

/// Handle to a raycast the session keeps re-evaluating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackedRaycastId(pub u64);

/// Failures reported by the tracking subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackingError {
    /// The device cannot run world tracking.
    #[error("world tracking is not supported on this device")]
    Unsupported,
    /// Camera access was denied.
    #[error("camera access is not authorized")]
    CameraUnauthorized,
    /// A sensor stopped delivering data.
    #[error("sensor failure: {0}")]
    SensorFailure(String),
}

/// Lifecycle notifications delivered by a running session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A new anchor was added.
    AnchorAdded(Anchor),
    /// An existing anchor changed (for planes: its estimated geometry).
    AnchorUpdated(Anchor),
    /// An anchor was removed.
    AnchorRemoved(AnchorId),
    /// The session stopped because of an error.
    Failed(TrackingError),
    /// Tracking was suspended (e.g. the app moved to the background).
    Interrupted,
    /// Tracking resumed after an interruption.
    InterruptionEnded,
}

/// A world-tracking session.
///
/// Implementations answer raycasts synchronously against the current frame and
/// queue lifecycle events until the owner polls them. All calls are expected on
/// one logical thread.
pub trait TrackingSession {
    /// Start or restart tracking with `config`.
    fn run(&mut self, config: WorldTrackingConfiguration, options: RunOptions);

    /// Camera for the current frame.
    fn camera(&self) -> &Camera;

    /// Intersect a query with tracked geometry, nearest hit first.
    fn raycast(&self, query: &RaycastQuery) -> Vec<RaycastResult>;

    /// Drain pending lifecycle events in delivery order.
    fn poll_events(&mut self) -> Vec<SessionEvent>;

    /// Begin a raycast the session keeps re-evaluating until stopped.
    fn start_tracked_raycast(&mut self, query: RaycastQuery) -> Option<TrackedRaycastId>;

    /// Number of tracked raycasts still running.
    fn tracked_raycast_count(&self) -> usize;

    /// Build a query through a view point of the current camera.
    fn raycast_query(
        &self,
        point: ScreenPoint,
        target: RaycastTarget,
        alignment: RaycastAlignment,
    ) -> Option<RaycastQuery> {
        RaycastQuery::from_screen(self.camera(), point, target, alignment)
    }
}
