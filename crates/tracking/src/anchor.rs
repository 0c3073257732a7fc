//! Anchors reported by the tracking subsystem.

use arplace_core::{AnchorId, PlaneAlignment};
use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Triangulated boundary of a detected plane, in the anchor's local space.
///
/// Planes lie in the local XZ plane with +Y as their normal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaneGeometry {
    /// Mesh vertices.
    pub vertices: Vec<Vec3>,
    /// Triangle list indexing into `vertices`.
    pub triangle_indices: Vec<u16>,
    /// Outline of the plane, counter-clockwise when viewed from above.
    pub boundary_vertices: Vec<Vec3>,
}

impl PlaneGeometry {
    /// Rectangle of `extent` (width along X, length along Z) centered on `center`.
    pub fn rectangle(center: Vec3, extent: Vec2) -> Self {
        let hx = extent.x * 0.5;
        let hz = extent.y * 0.5;
        let corners = vec![
            center + Vec3::new(-hx, 0.0, -hz),
            center + Vec3::new(-hx, 0.0, hz),
            center + Vec3::new(hx, 0.0, hz),
            center + Vec3::new(hx, 0.0, -hz),
        ];
        Self {
            vertices: corners.clone(),
            triangle_indices: vec![0, 1, 2, 0, 2, 3],
            boundary_vertices: corners,
        }
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.triangle_indices.len() / 3
    }
}

/// A plane surface tracked in the real world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneAnchor {
    /// Stable identity.
    pub id: AnchorId,
    /// Horizontal or vertical.
    pub alignment: PlaneAlignment,
    /// Anchor pose in world space.
    pub transform: Mat4,
    /// Center of the plane in the anchor's local space.
    pub center: Vec3,
    /// Estimated width (X) and length (Z) of the plane.
    pub extent: Vec2,
    /// Latest tessellation of the plane.
    pub geometry: PlaneGeometry,
}

impl PlaneAnchor {
    /// Build an anchor whose geometry is the rectangle described by `extent`.
    pub fn new(id: AnchorId, alignment: PlaneAlignment, transform: Mat4, extent: Vec2) -> Self {
        Self {
            id,
            alignment,
            transform,
            center: Vec3::ZERO,
            extent,
            geometry: PlaneGeometry::rectangle(Vec3::ZERO, extent),
        }
    }

    /// Replace the estimated extent and regenerate the geometry.
    pub fn set_extent(&mut self, center: Vec3, extent: Vec2) {
        self.center = center;
        self.extent = extent;
        self.geometry = PlaneGeometry::rectangle(center, extent);
    }

    /// Plane normal in world space.
    pub fn world_normal(&self) -> Vec3 {
        self.transform.transform_vector3(Vec3::Y).normalize()
    }

    /// World-space translation of the anchor.
    pub fn world_position(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }

    /// Whether a local-space point falls inside the plane's extent.
    pub(crate) fn contains_local(&self, point: Vec3) -> bool {
        let offset = point - self.center;
        offset.x.abs() <= self.extent.x * 0.5 && offset.z.abs() <= self.extent.y * 0.5
    }
}

/// Anything the tracking subsystem can anchor content to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Anchor {
    /// A detected plane.
    Plane(PlaneAnchor),
    /// A bare pose with no surface information.
    Point {
        /// Stable identity.
        id: AnchorId,
        /// Anchor pose in world space.
        transform: Mat4,
    },
}

impl Anchor {
    /// Identity of the anchor regardless of its kind.
    pub fn id(&self) -> AnchorId {
        match self {
            Anchor::Plane(plane) => plane.id,
            Anchor::Point { id, .. } => *id,
        }
    }

    /// World pose of the anchor.
    pub fn transform(&self) -> Mat4 {
        match self {
            Anchor::Plane(plane) => plane.transform,
            Anchor::Point { transform, .. } => *transform,
        }
    }

    /// The plane payload, if this is a plane anchor.
    pub fn as_plane(&self) -> Option<&PlaneAnchor> {
        match self {
            Anchor::Plane(plane) => Some(plane),
            Anchor::Point { .. } => None,
        }
    }
}
