//! Raycast queries against tracked and estimated geometry.

use crate::camera::Camera;
use arplace_core::{AnchorId, PlaneAlignment, ScreenPoint};
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

const PARALLEL_EPSILON: f32 = 1e-4;

/// Half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start of the ray.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance along the ray to an infinite plane, if it lies in front.
    pub fn intersect_plane(&self, point: Vec3, normal: Vec3) -> Option<f32> {
        let denom = self.direction.dot(normal);
        // Ray parallel to plane
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = (point - self.origin).dot(normal) / denom;
        (t >= 0.0).then_some(t)
    }
}

/// What kind of geometry a raycast may intersect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaycastTarget {
    /// Confidently detected planes, limited to their estimated shape.
    ExistingPlaneGeometry,
    /// Surfaces inferred from feature points that may be planes.
    EstimatedPlane,
}

/// Alignment filter applied to raycast hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaycastAlignment {
    /// Accept any surface.
    #[default]
    Any,
    /// Accept only horizontal surfaces.
    Horizontal,
    /// Accept only vertical surfaces.
    Vertical,
}

impl RaycastAlignment {
    /// Whether a surface of `alignment` passes this filter.
    pub fn accepts(self, alignment: PlaneAlignment) -> bool {
        match self {
            RaycastAlignment::Any => true,
            RaycastAlignment::Horizontal => alignment == PlaneAlignment::Horizontal,
            RaycastAlignment::Vertical => alignment == PlaneAlignment::Vertical,
        }
    }
}

/// A ray plus the kind of geometry it may hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastQuery {
    /// World-space ray.
    pub ray: Ray,
    /// Geometry the ray may intersect.
    pub target: RaycastTarget,
    /// Alignment filter.
    pub alignment: RaycastAlignment,
}

impl RaycastQuery {
    /// Build a query through a view point, or `None` when the point has no ray.
    pub fn from_screen(
        camera: &Camera,
        point: ScreenPoint,
        target: RaycastTarget,
        alignment: RaycastAlignment,
    ) -> Option<Self> {
        let ray = camera.screen_ray(point)?;
        Some(Self {
            ray,
            target,
            alignment,
        })
    }
}

/// One intersection returned by a raycast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastResult {
    /// Pose of the hit: translation at the hit, rotation of the surface.
    pub world_transform: Mat4,
    /// The target that produced the hit.
    pub target: RaycastTarget,
    /// Anchor that was hit, when the surface is anchored.
    pub anchor: Option<AnchorId>,
    /// Distance from the ray origin.
    pub distance: f32,
}

impl RaycastResult {
    /// Build a result at `hit`, oriented like `surface_rotation`.
    pub fn new(
        hit: Vec3,
        surface_rotation: Quat,
        target: RaycastTarget,
        anchor: Option<AnchorId>,
        distance: f32,
    ) -> Self {
        Self {
            world_transform: Mat4::from_rotation_translation(surface_rotation, hit),
            target,
            anchor,
            distance,
        }
    }

    /// World-space position of the hit.
    pub fn world_position(&self) -> Vec3 {
        self.world_transform.w_axis.truncate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_hits_floor_in_front() {
        let ray = Ray {
            origin: Vec3::new(0.0, 2.0, 0.0),
            direction: Vec3::new(0.0, -1.0, 0.0),
        };
        let t = ray.intersect_plane(Vec3::ZERO, Vec3::Y).expect("hit");
        assert!((t - 2.0).abs() < 1e-5);
        assert_eq!(ray.at(t), Vec3::ZERO);
    }

    #[test]
    fn ray_misses_plane_behind_origin() {
        let ray = Ray {
            origin: Vec3::new(0.0, 2.0, 0.0),
            direction: Vec3::Y,
        };
        assert!(ray.intersect_plane(Vec3::ZERO, Vec3::Y).is_none());
    }

    #[test]
    fn parallel_ray_misses() {
        let ray = Ray {
            origin: Vec3::new(0.0, 1.0, 0.0),
            direction: Vec3::X,
        };
        assert!(ray.intersect_plane(Vec3::ZERO, Vec3::Y).is_none());
    }

    #[test]
    fn alignment_filter() {
        assert!(RaycastAlignment::Any.accepts(PlaneAlignment::Vertical));
        assert!(RaycastAlignment::Horizontal.accepts(PlaneAlignment::Horizontal));
        assert!(!RaycastAlignment::Horizontal.accepts(PlaneAlignment::Vertical));
        assert!(!RaycastAlignment::Vertical.accepts(PlaneAlignment::Horizontal));
    }

    #[test]
    fn result_position_is_translation_column() {
        let result = RaycastResult::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::IDENTITY,
            RaycastTarget::EstimatedPlane,
            None,
            4.0,
        );
        assert_eq!(result.world_position(), Vec3::new(1.0, 2.0, 3.0));
    }
}
