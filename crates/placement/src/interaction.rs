//! Two-tier tap handling: confident planes spawn boxes, estimated surfaces
//! spawn spheres.

use crate::config::{BoxDimensions, PlacementConfig};
use crate::factory::ObjectFactory;
use crate::registry::{PlacedObject, Registries};
use crate::PlacementError;
use arplace_core::{Color, ObjectId, ObjectKind, ScreenPoint};
use arplace_scene::{NodeAction, NodeHandle, SceneGraph};
use arplace_tracking::{RaycastAlignment, RaycastResult, RaycastTarget, TrackingSession};
use glam::Vec3;
use rand::Rng;
use tracing::debug;

/// What a single tap produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapOutcome {
    /// A box was placed on an existing plane.
    Box {
        /// Identity of the new object.
        id: ObjectId,
        /// Its scene node.
        node: NodeHandle,
        /// World position of the raycast hit.
        position: Vec3,
    },
    /// A sphere was placed on an estimated surface.
    Sphere {
        /// Identity of the new object.
        id: ObjectId,
        /// Its scene node.
        node: NodeHandle,
        /// World position of the raycast hit.
        position: Vec3,
    },
    /// Neither raycast hit anything.
    Miss,
}

impl TapOutcome {
    /// Kind of object placed, if any.
    pub fn kind(&self) -> Option<ObjectKind> {
        match self {
            TapOutcome::Box { .. } => Some(ObjectKind::Box),
            TapOutcome::Sphere { .. } => Some(ObjectKind::Sphere),
            TapOutcome::Miss => None,
        }
    }

    /// Whether the first-tier raycast hit an existing plane.
    pub fn plane_intersected(&self) -> bool {
        matches!(self, TapOutcome::Box { .. })
    }

    /// World position of the placed object.
    pub fn position(&self) -> Option<Vec3> {
        match self {
            TapOutcome::Box { position, .. } | TapOutcome::Sphere { position, .. } => {
                Some(*position)
            }
            TapOutcome::Miss => None,
        }
    }
}

/// Maps a tap to a placement decision.
#[derive(Debug, Clone)]
pub struct InteractionHandler {
    box_dimensions: BoxDimensions,
    sphere_radius: f32,
    alignment: RaycastAlignment,
}

impl InteractionHandler {
    /// Handler spawning objects sized by `config`.
    pub fn new(config: &PlacementConfig) -> Self {
        Self {
            box_dimensions: config.box_dimensions,
            sphere_radius: config.sphere_radius,
            alignment: config.raycast_alignment,
        }
    }

    fn first_hit<S: TrackingSession>(
        &self,
        session: &S,
        point: ScreenPoint,
        target: RaycastTarget,
    ) -> Option<RaycastResult> {
        let query = session.raycast_query(point, target, self.alignment)?;
        session.raycast(&query).into_iter().next()
    }

    /// Raycast existing planes first, then estimated surfaces, and place the
    /// matching primitive at the first hit.
    pub fn handle_tap<S: TrackingSession, R: Rng>(
        &self,
        point: ScreenPoint,
        session: &S,
        scene: &mut SceneGraph,
        registries: &mut Registries,
        factory: &mut ObjectFactory<R>,
    ) -> Result<TapOutcome, PlacementError> {
        if let Some(hit) = self.first_hit(session, point, RaycastTarget::ExistingPlaneGeometry) {
            let dims = self.box_dimensions;
            let node = factory.create_box(
                scene,
                dims.width,
                dims.height,
                dims.length,
                dims.chamfer_radius,
            );
            let (id, position) = place(scene, registries, node, ObjectKind::Box, &hit)?;
            return Ok(TapOutcome::Box { id, node, position });
        }

        if let Some(hit) = self.first_hit(session, point, RaycastTarget::EstimatedPlane) {
            let node = factory.create_sphere(scene, self.sphere_radius);
            let (id, position) = place(scene, registries, node, ObjectKind::Sphere, &hit)?;
            return Ok(TapOutcome::Sphere { id, node, position });
        }

        debug!(x = point.x, y = point.y, "Tap hit no surface");
        Ok(TapOutcome::Miss)
    }
}

fn place(
    scene: &mut SceneGraph,
    registries: &mut Registries,
    node: NodeHandle,
    kind: ObjectKind,
    hit: &RaycastResult,
) -> Result<(ObjectId, Vec3), PlacementError> {
    let position = hit.world_position();
    let color = scene
        .node_mut(node)
        .and_then(|n| {
            n.name = Some(kind.tag().to_string());
            n.material.map(|m| m.diffuse)
        })
        .unwrap_or(Color::WHITE);
    let attached = scene
        .add_child(scene.root(), node)
        .and_then(|()| scene.set_world_position(node, position));
    if let Err(err) = attached {
        // Release the factory node so the arena only holds registered objects.
        let _ = scene.run_action(node, NodeAction::RemoveFromParent);
        return Err(err.into());
    }

    let id = registries.allocate_object_id();
    registries.insert_object(PlacedObject {
        id,
        kind,
        node,
        position,
        color,
    });
    debug!(%id, ?kind, ?position, "Object placed");
    Ok((id, position))
}
