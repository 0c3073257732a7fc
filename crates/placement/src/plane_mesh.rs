//! Keeps plane visualisations in sync with plane anchors.

use crate::config::PlacementConfig;
use crate::registry::{Registries, TrackedPlane};
use crate::PlacementError;
use arplace_core::{Color, PlaneAlignment};
use arplace_scene::{Geometry, Material, NodeHandle, PlaneMesh, SceneGraph};
use arplace_tracking::Anchor;
use tracing::debug;

/// Turns plane anchor add/update events into translucent mesh nodes.
#[derive(Debug, Clone)]
pub struct PlaneMeshAdapter {
    horizontal_color: Color,
    vertical_color: Color,
    horizontal_count: u32,
    vertical_count: u32,
}

impl PlaneMeshAdapter {
    /// Adapter tinting planes with the configured colors.
    pub fn new(config: &PlacementConfig) -> Self {
        Self {
            horizontal_color: config.horizontal_plane_color,
            vertical_color: config.vertical_plane_color,
            horizontal_count: 0,
            vertical_count: 0,
        }
    }

    /// Restart the per-alignment naming counters.
    pub fn reset_counters(&mut self) {
        self.horizontal_count = 0;
        self.vertical_count = 0;
    }

    fn next_name(&mut self, alignment: PlaneAlignment) -> String {
        let counter = match alignment {
            PlaneAlignment::Horizontal => &mut self.horizontal_count,
            PlaneAlignment::Vertical => &mut self.vertical_count,
        };
        let name = format!("{}{}", alignment.node_prefix(), counter);
        *counter += 1;
        name
    }

    /// Build a mesh node for a newly added plane anchor under `anchor_node`.
    ///
    /// Returns `Ok(None)` for anchors that are not planes.
    pub fn on_plane_added(
        &mut self,
        scene: &mut SceneGraph,
        registries: &mut Registries,
        anchor: &Anchor,
        anchor_node: NodeHandle,
    ) -> Result<Option<NodeHandle>, PlacementError> {
        let Some(plane) = anchor.as_plane() else {
            return Ok(None);
        };

        let color = match plane.alignment {
            PlaneAlignment::Horizontal => self.horizontal_color,
            PlaneAlignment::Vertical => self.vertical_color,
        };
        let node = scene.create_node(Some(Geometry::PlaneMesh(PlaneMesh::from_geometry(
            &plane.geometry,
        ))));
        let name = self.next_name(plane.alignment);
        if let Some(n) = scene.node_mut(node) {
            n.name = Some(name.clone());
            n.material = Some(Material::diffuse(color));
        }
        scene.add_child(anchor_node, node)?;

        debug!(anchor = %plane.id, %name, "Plane added");
        registries.insert_plane(TrackedPlane {
            anchor: plane.id,
            alignment: plane.alignment,
            node,
            name,
        });
        Ok(Some(node))
    }

    /// Refresh the mesh of an already visualised plane.
    ///
    /// The plane node is located through the registry, falling back to the
    /// first child of `anchor_node`. Anchors that are not planes and nodes
    /// without plane-mesh geometry are left untouched; returns whether a mesh
    /// was updated.
    pub fn on_plane_updated(
        &self,
        scene: &mut SceneGraph,
        registries: &Registries,
        anchor: &Anchor,
        anchor_node: NodeHandle,
    ) -> bool {
        let Some(plane) = anchor.as_plane() else {
            return false;
        };
        let Some(node) = registries
            .plane(plane.id)
            .map(|tracked| tracked.node)
            .or_else(|| scene.children(anchor_node).first().copied())
        else {
            return false;
        };
        let Some(mesh) = scene
            .node_mut(node)
            .and_then(|n| n.geometry.as_mut())
            .and_then(Geometry::as_plane_mesh_mut)
        else {
            return false;
        };

        mesh.update_from(&plane.geometry);
        true
    }
}
