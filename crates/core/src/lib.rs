#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod color;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use color::Color;

/// Opaque identity of an anchor maintained by the tracking subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AnchorId(pub u64);

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anchor#{}", self.0)
    }
}

/// Stable identity of an object placed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// Orientation of a detected plane relative to gravity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaneAlignment {
    /// Floors, tables and other surfaces perpendicular to gravity.
    Horizontal,
    /// Walls and other surfaces parallel to gravity.
    Vertical,
}

impl PlaneAlignment {
    /// Name prefix used for plane nodes of this alignment.
    pub fn node_prefix(self) -> &'static str {
        match self {
            PlaneAlignment::Horizontal => "horizontalPlane",
            PlaneAlignment::Vertical => "verticalPlane",
        }
    }
}

/// Kind of primitive a tap can spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Spawned on confidently detected planes.
    Box,
    /// Spawned on estimated surfaces.
    Sphere,
}

impl ObjectKind {
    /// Tag assigned to the spawned node.
    pub fn tag(self) -> &'static str {
        match self {
            ObjectKind::Box => "box",
            ObjectKind::Sphere => "sphere",
        }
    }
}

/// Tap location in view coordinates (origin top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Horizontal offset in points.
    pub x: f32,
    /// Vertical offset in points.
    pub y: f32,
}

impl ScreenPoint {
    /// Create a new screen point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Build a reproducible RNG for scripted runs and tests.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_tags_match_node_names() {
        assert_eq!(ObjectKind::Box.tag(), "box");
        assert_eq!(ObjectKind::Sphere.tag(), "sphere");
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        use rand::Rng;
        let mut a = seeded_rng(7);
        let mut b = seeded_rng(7);
        for _ in 0..4 {
            assert_eq!(a.gen::<u32>(), b.gen::<u32>());
        }
    }

    #[test]
    fn ids_are_ordered_by_value() {
        assert!(AnchorId(1) < AnchorId(2));
        assert_eq!(ObjectId(3).to_string(), "object#3");
    }
}
