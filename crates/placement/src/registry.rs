//! Registries of tracked planes and placed objects.
//!
//! Every node stored here is attached to the live scene graph. The session
//! controller is the only writer and clears the registries together with the
//! scene during a reset.

use arplace_core::{AnchorId, Color, ObjectId, ObjectKind, PlaneAlignment};
use arplace_scene::NodeHandle;
use glam::Vec3;
use serde::Serialize;
use std::collections::BTreeMap;

/// A plane visualisation kept in sync with its anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedPlane {
    /// Anchor the plane mirrors.
    pub anchor: AnchorId,
    /// Alignment of the anchor.
    pub alignment: PlaneAlignment,
    /// Node holding the plane mesh.
    pub node: NodeHandle,
    /// Node name, e.g. `horizontalPlane0`.
    pub name: String,
}

/// An object spawned by a tap.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedObject {
    /// Stable identity.
    pub id: ObjectId,
    /// Box or sphere.
    pub kind: ObjectKind,
    /// Node in the scene.
    pub node: NodeHandle,
    /// World-space position at creation.
    pub position: Vec3,
    /// Color sampled at creation.
    pub color: Color,
}

/// Size of each registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RegistryCounts {
    /// Tracked vertical planes.
    pub vertical_planes: usize,
    /// Tracked horizontal planes.
    pub horizontal_planes: usize,
    /// Placed boxes.
    pub boxes: usize,
    /// Placed spheres.
    pub spheres: usize,
}

impl RegistryCounts {
    /// Sum of all four registries.
    pub fn total(&self) -> usize {
        self.vertical_planes + self.horizontal_planes + self.boxes + self.spheres
    }
}

/// Session-wide collections keyed by stable identity.
#[derive(Debug, Default)]
pub struct Registries {
    vertical_planes: BTreeMap<AnchorId, TrackedPlane>,
    horizontal_planes: BTreeMap<AnchorId, TrackedPlane>,
    boxes: BTreeMap<ObjectId, PlacedObject>,
    spheres: BTreeMap<ObjectId, PlacedObject>,
    next_object: u64,
}

impl Registries {
    /// Empty registries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next object identity. Identities are never reused.
    pub fn allocate_object_id(&mut self) -> ObjectId {
        self.next_object += 1;
        ObjectId(self.next_object)
    }

    fn planes_mut(&mut self, alignment: PlaneAlignment) -> &mut BTreeMap<AnchorId, TrackedPlane> {
        match alignment {
            PlaneAlignment::Horizontal => &mut self.horizontal_planes,
            PlaneAlignment::Vertical => &mut self.vertical_planes,
        }
    }

    /// Planes of one alignment, ordered by anchor id.
    pub fn planes(&self, alignment: PlaneAlignment) -> impl Iterator<Item = &TrackedPlane> {
        match alignment {
            PlaneAlignment::Horizontal => self.horizontal_planes.values(),
            PlaneAlignment::Vertical => self.vertical_planes.values(),
        }
    }

    /// Plane mirroring `anchor`, whichever its alignment.
    pub fn plane(&self, anchor: AnchorId) -> Option<&TrackedPlane> {
        self.horizontal_planes
            .get(&anchor)
            .or_else(|| self.vertical_planes.get(&anchor))
    }

    /// Record a plane, replacing any previous entry for the same anchor.
    pub fn insert_plane(&mut self, plane: TrackedPlane) -> Option<TrackedPlane> {
        self.planes_mut(plane.alignment).insert(plane.anchor, plane)
    }

    /// Record a placed object in the collection matching its kind.
    pub fn insert_object(&mut self, object: PlacedObject) {
        let collection = match object.kind {
            ObjectKind::Box => &mut self.boxes,
            ObjectKind::Sphere => &mut self.spheres,
        };
        collection.insert(object.id, object);
    }

    /// Placed boxes, oldest first.
    pub fn boxes(&self) -> impl Iterator<Item = &PlacedObject> {
        self.boxes.values()
    }

    /// Placed spheres, oldest first.
    pub fn spheres(&self) -> impl Iterator<Item = &PlacedObject> {
        self.spheres.values()
    }

    /// Look up a placed object.
    pub fn object(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.boxes.get(&id).or_else(|| self.spheres.get(&id))
    }

    /// Every registered node: vertical planes, horizontal planes, boxes, spheres.
    pub fn nodes(&self) -> Vec<NodeHandle> {
        self.vertical_planes
            .values()
            .chain(self.horizontal_planes.values())
            .map(|plane| plane.node)
            .chain(self.boxes.values().chain(self.spheres.values()).map(|o| o.node))
            .collect()
    }

    /// Size of each registry.
    pub fn counts(&self) -> RegistryCounts {
        RegistryCounts {
            vertical_planes: self.vertical_planes.len(),
            horizontal_planes: self.horizontal_planes.len(),
            boxes: self.boxes.len(),
            spheres: self.spheres.len(),
        }
    }

    /// Whether all four registries are empty.
    pub fn is_empty(&self) -> bool {
        self.counts().total() == 0
    }

    /// Empty all four registries. Object identities keep counting up.
    pub fn clear(&mut self) {
        self.vertical_planes.clear();
        self.horizontal_planes.clear();
        self.boxes.clear();
        self.spheres.clear();
    }
}
