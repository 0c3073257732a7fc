#![warn(missing_docs)]
//! Shared fixtures for headless AR tests.

mod snapshot;

use arplace_core::PlaneAlignment;
use arplace_tracking::{
    Camera, RunOptions, SimulatedSession, TrackingSession, WorldTrackingConfiguration,
};
use glam::{Mat4, Quat, Vec2, Vec3};
use serde::Serialize;

pub use snapshot::*;

/// Height of the fixture camera above the floor, in meters.
pub const CAMERA_HEIGHT: f32 = 1.5;

/// Where the fixture camera's center ray meets the floor at y = 0.
pub const FLOOR_HIT: Vec3 = Vec3::new(CAMERA_HEIGHT, 0.0, 0.0);

/// Camera at [`CAMERA_HEIGHT`] looking 45 degrees down the +X axis.
pub fn downward_camera() -> Camera {
    Camera::looking(
        Vec3::new(0.0, CAMERA_HEIGHT, 0.0),
        0.0,
        -std::f32::consts::FRAC_PI_4,
    )
}

/// Idle simulated session viewed through [`downward_camera`].
pub fn idle_session() -> SimulatedSession {
    SimulatedSession::new(downward_camera())
}

/// Simulated session already running with plane detection and light estimation.
pub fn running_session() -> SimulatedSession {
    let mut session = idle_session();
    session.run(
        WorldTrackingConfiguration::planes_and_light(),
        RunOptions::empty(),
    );
    session
}

/// Pose of a floor plane at `height`.
pub fn floor_transform(height: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, height, 0.0))
}

/// Pose of a wall at `x`, facing back toward the origin.
pub fn wall_transform(x: f32) -> Mat4 {
    Mat4::from_rotation_translation(
        Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
        Vec3::new(x, 0.0, 0.0),
    )
}

/// Detect a square floor plane of side `size` under the fixture camera.
pub fn detect_floor(session: &mut SimulatedSession, size: f32) -> arplace_core::AnchorId {
    session
        .detect_plane(
            PlaneAlignment::Horizontal,
            floor_transform(0.0),
            Vec2::splat(size),
        )
        .expect("session must be running to detect planes")
}

/// Assert two vectors agree within `1e-3` per component.
#[track_caller]
pub fn assert_vec3_near(actual: Vec3, expected: Vec3) {
    assert!(
        (actual - expected).abs().max_element() < 1e-3,
        "expected {expected:?}, got {actual:?}"
    );
}

/// Vector rounded to whole millimeters, for stable snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Millimeters(pub [i32; 3]);

impl From<Vec3> for Millimeters {
    fn from(v: Vec3) -> Self {
        let mm = |c: f32| (c * 1000.0).round() as i32;
        Self([mm(v.x), mm(v.y), mm(v.z)])
    }
}

/// Install a test subscriber honouring `RUST_LOG`; repeated calls are harmless.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
