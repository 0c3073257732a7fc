#![warn(missing_docs)]
//! Minimal scene graph for placed content and plane visualisations.

mod geometry;
mod graph;

pub use geometry::{Geometry, Material, PlaneMesh};
pub use graph::{Node, NodeAction, NodeHandle, SceneError, SceneGraph};
