//! Property-based tests for simulated raycasts
//!
//! Validates raycast invariants:
//! - Hits lie on the surface that produced them
//! - Results are ordered by distance
//! - Existing-plane hits stay within the plane's extent

use arplace_core::{PlaneAlignment, ScreenPoint};
use arplace_tracking::{
    Camera, EstimatedSurface, RaycastAlignment, RaycastTarget, RunOptions, SimulatedSession,
    TrackingSession, WorldTrackingConfiguration,
};
use glam::{Mat4, Vec2, Vec3};
use proptest::prelude::*;

fn session_looking_down() -> SimulatedSession {
    let camera = Camera::looking(Vec3::new(0.0, 1.5, 0.0), 0.0, -1.2);
    let mut session = SimulatedSession::new(camera);
    session.run(
        WorldTrackingConfiguration::planes_and_light(),
        RunOptions::empty(),
    );
    session
}

proptest! {
    /// Property: estimated hits lie on the estimated surface
    #[test]
    fn estimated_hits_lie_on_surface(
        x in 0.0f32..390.0,
        y in 500.0f32..844.0,
        height in -2.0f32..0.5,
    ) {
        let mut session = session_looking_down();
        session.add_estimated_surface(EstimatedSurface::horizontal(height));
        let query = session
            .raycast_query(ScreenPoint::new(x, y), RaycastTarget::EstimatedPlane, RaycastAlignment::Any)
            .expect("point inside viewport");
        let hits = session.raycast(&query);
        prop_assert_eq!(hits.len(), 1);
        prop_assert!((hits[0].world_position().y - height).abs() < 1e-3);
        prop_assert!(hits[0].anchor.is_none());
    }

    /// Property: existing-plane hits never fall outside the plane extent
    #[test]
    fn existing_hits_stay_inside_extent(
        x in 0.0f32..390.0,
        y in 0.0f32..844.0,
        width in 0.1f32..4.0,
        length in 0.1f32..4.0,
    ) {
        let mut session = session_looking_down();
        session.detect_plane(
            PlaneAlignment::Horizontal,
            Mat4::from_translation(Vec3::new(0.5, 0.0, 0.0)),
            Vec2::new(width, length),
        );
        let query = session
            .raycast_query(ScreenPoint::new(x, y), RaycastTarget::ExistingPlaneGeometry, RaycastAlignment::Any)
            .expect("point inside viewport");
        for hit in session.raycast(&query) {
            let p = hit.world_position();
            prop_assert!((p.x - 0.5).abs() <= width * 0.5 + 1e-3);
            prop_assert!(p.z.abs() <= length * 0.5 + 1e-3);
            prop_assert!(p.y.abs() < 1e-3);
        }
    }

    /// Property: results are sorted nearest first
    #[test]
    fn hits_are_distance_ordered(
        heights in proptest::collection::vec(-3.0f32..1.0, 1..6),
    ) {
        let mut session = session_looking_down();
        for height in &heights {
            session.add_estimated_surface(EstimatedSurface::horizontal(*height));
        }
        let query = session
            .raycast_query(session.camera().screen_center(), RaycastTarget::EstimatedPlane, RaycastAlignment::Any)
            .expect("center query");
        let hits = session.raycast(&query);
        prop_assert_eq!(hits.len(), heights.len());
        for pair in hits.windows(2) {
            prop_assert!(pair[0].distance <= pair[1].distance);
        }
    }
}

#[test]
fn vertical_filter_skips_floor() {
    let mut session = session_looking_down();
    session.detect_plane(PlaneAlignment::Horizontal, Mat4::IDENTITY, Vec2::splat(20.0));
    let query = session
        .raycast_query(
            session.camera().screen_center(),
            RaycastTarget::ExistingPlaneGeometry,
            RaycastAlignment::Vertical,
        )
        .unwrap();
    assert!(session.raycast(&query).is_empty());
}
