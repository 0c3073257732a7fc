#![warn(missing_docs)]
//! Tap-to-place AR interaction: object creation, plane visualisation and the
//! session controller that ties them to a tracking session.

pub mod coaching;
pub mod config;
pub mod controller;
pub mod factory;
pub mod interaction;
pub mod plane_mesh;
pub mod registry;

use arplace_scene::SceneError;
use thiserror::Error;

pub use coaching::{CoachingGoal, CoachingOverlay, EdgeConstraints};
pub use config::PlacementConfig;
pub use controller::{NoopObserver, SessionController, SessionObserver};
pub use factory::ObjectFactory;
pub use interaction::{InteractionHandler, TapOutcome};
pub use plane_mesh::PlaneMeshAdapter;
pub use registry::{PlacedObject, Registries, RegistryCounts, TrackedPlane};

/// Errors surfaced by the placement layer.
///
/// A raycast that hits nothing is not an error; it yields [`TapOutcome::Miss`].
#[derive(Debug, Error)]
pub enum PlacementError {
    /// A scene graph mutation failed.
    #[error("scene graph error: {0}")]
    Scene(#[from] SceneError),
}
