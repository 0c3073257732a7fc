//! Renderable geometry and materials.

use arplace_core::Color;
use arplace_tracking::PlaneGeometry;
use glam::Vec3;
use serde::Serialize;

/// Surface appearance of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Material {
    /// Diffuse color.
    pub diffuse: Color,
}

impl Material {
    /// Material with a single diffuse color.
    pub fn diffuse(color: Color) -> Self {
        Self { diffuse: color }
    }
}

/// Mesh that mirrors the tessellation of a tracked plane.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PlaneMesh {
    /// Mesh vertices in the owning anchor's space.
    pub vertices: Vec<Vec3>,
    /// Triangle list.
    pub triangle_indices: Vec<u16>,
    /// Plane outline.
    pub boundary: Vec<Vec3>,
    /// How many times the mesh was refreshed from tracking data.
    pub revision: u32,
}

impl PlaneMesh {
    /// Build a mesh from the plane's current geometry.
    pub fn from_geometry(geometry: &PlaneGeometry) -> Self {
        let mut mesh = Self::default();
        mesh.copy_from(geometry);
        mesh
    }

    /// Replace the mesh with the plane's latest geometry.
    pub fn update_from(&mut self, geometry: &PlaneGeometry) {
        self.copy_from(geometry);
        self.revision += 1;
    }

    fn copy_from(&mut self, geometry: &PlaneGeometry) {
        self.vertices.clone_from(&geometry.vertices);
        self.triangle_indices.clone_from(&geometry.triangle_indices);
        self.boundary.clone_from(&geometry.boundary_vertices);
    }
}

/// Shape attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geometry {
    /// Axis-aligned box with optionally rounded edges.
    Box {
        /// Extent along X.
        width: f32,
        /// Extent along Y.
        height: f32,
        /// Extent along Z.
        length: f32,
        /// Edge rounding radius.
        chamfer_radius: f32,
    },
    /// Sphere centered on the node.
    Sphere {
        /// Radius.
        radius: f32,
    },
    /// Live plane mesh.
    PlaneMesh(PlaneMesh),
}

impl Geometry {
    /// The plane mesh payload, if this geometry is one.
    pub fn as_plane_mesh(&self) -> Option<&PlaneMesh> {
        match self {
            Geometry::PlaneMesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Mutable plane mesh payload, if this geometry is one.
    pub fn as_plane_mesh_mut(&mut self) -> Option<&mut PlaneMesh> {
        match self {
            Geometry::PlaneMesh(mesh) => Some(mesh),
            _ => None,
        }
    }
}
