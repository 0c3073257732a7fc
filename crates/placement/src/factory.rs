//! Builds randomly colored primitives.

use arplace_core::Color;
use arplace_scene::{Geometry, Material, NodeHandle, SceneGraph};
use rand::Rng;

/// Creates detached box and sphere nodes with a random opaque color each.
#[derive(Debug)]
pub struct ObjectFactory<R> {
    rng: R,
}

impl<R: Rng> ObjectFactory<R> {
    /// Create a factory drawing colors from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Create a box node. The node is not attached to the scene.
    pub fn create_box(
        &mut self,
        scene: &mut SceneGraph,
        width: f32,
        height: f32,
        length: f32,
        chamfer_radius: f32,
    ) -> NodeHandle {
        let geometry = Geometry::Box {
            width,
            height,
            length,
            chamfer_radius,
        };
        self.create(scene, geometry)
    }

    /// Create a sphere node. The node is not attached to the scene.
    pub fn create_sphere(&mut self, scene: &mut SceneGraph, radius: f32) -> NodeHandle {
        self.create(scene, Geometry::Sphere { radius })
    }

    fn create(&mut self, scene: &mut SceneGraph, geometry: Geometry) -> NodeHandle {
        let color = Color::random_opaque(&mut self.rng);
        let node = scene.create_node(Some(geometry));
        if let Some(node) = scene.node_mut(node) {
            node.material = Some(Material::diffuse(color));
        }
        node
    }
}
