//! Property-based tests for tap placement
//!
//! Validates placement invariants:
//! - Each tap adds at most one object, of the kind its raycast tier implies
//! - Every registered node is attached to the scene
//! - Reset always returns to an empty scene and empty registries

use arplace_core::{seeded_rng, ScreenPoint};
use arplace_placement::{PlacementConfig, SessionController, TapOutcome};
use arplace_testkit::{detect_floor, idle_session};
use arplace_tracking::{EstimatedSurface, SimulatedSession};
use proptest::prelude::*;
use rand::rngs::StdRng;

fn controller(
    floor: Option<f32>,
    estimated: bool,
) -> SessionController<SimulatedSession, StdRng> {
    let mut controller =
        SessionController::new(idle_session(), seeded_rng(99), &PlacementConfig::default());
    controller.start();
    if let Some(size) = floor {
        detect_floor(controller.session_mut(), size);
    }
    if estimated {
        controller
            .session_mut()
            .add_estimated_surface(EstimatedSurface::horizontal(0.0));
    }
    controller.process_events().expect("events");
    controller
}

fn tap_strategy() -> impl Strategy<Value = ScreenPoint> {
    (0.0f32..390.0, 0.0f32..844.0).prop_map(|(x, y)| ScreenPoint::new(x, y))
}

proptest! {
    /// Property: a tap adds exactly zero or one object to the matching registry
    #[test]
    fn each_tap_adds_at_most_one_object(
        floor in proptest::option::of(0.5f32..6.0),
        estimated in any::<bool>(),
        taps in proptest::collection::vec(tap_strategy(), 1..12),
    ) {
        let mut controller = controller(floor, estimated);
        for tap in taps {
            let before = controller.counts();
            let outcome = controller.handle_tap(tap).expect("tap");
            let after = controller.counts();
            match outcome {
                TapOutcome::Box { node, .. } => {
                    prop_assert!(floor.is_some());
                    prop_assert_eq!(after.boxes, before.boxes + 1);
                    prop_assert_eq!(after.spheres, before.spheres);
                    prop_assert!(controller.scene().is_attached(node));
                }
                TapOutcome::Sphere { node, .. } => {
                    prop_assert!(estimated);
                    prop_assert_eq!(after.spheres, before.spheres + 1);
                    prop_assert_eq!(after.boxes, before.boxes);
                    prop_assert!(controller.scene().is_attached(node));
                }
                TapOutcome::Miss => prop_assert_eq!(after, before),
            }
        }
        for node in controller.registries().nodes() {
            prop_assert!(controller.scene().is_attached(node));
        }
    }

    /// Property: reset empties everything regardless of prior placements
    #[test]
    fn reset_always_empties_session(
        floor in proptest::option::of(0.5f32..6.0),
        taps in proptest::collection::vec(tap_strategy(), 0..10),
        resets in 1usize..3,
    ) {
        let mut controller = controller(floor, true);
        for tap in taps {
            controller.handle_tap(tap).expect("tap");
        }
        for _ in 0..resets {
            controller.reset();
            controller.process_events().expect("events");
        }
        prop_assert_eq!(controller.counts().total(), 0);
        prop_assert!(controller.scene().is_empty());
        prop_assert_eq!(controller.session().anchor_count(), 0);
    }
}
