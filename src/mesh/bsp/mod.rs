//! Binary Space Partitioning (BSP) tree
//!
//! The algorithms live behind the [`BspOps`] trait; [`Node`] exposes them as
//! convenience methods backed by [`SerialBspOps`].

pub mod node;
pub mod serial;
pub mod traits;

pub use node::Node;
pub use serial::SerialBspOps;
pub use traits::{BalancedSplittingStrategy, BspOps, SplittingPlaneStrategy};

use crate::mesh::polygon::Polygon;

impl Node {
    /// Creates a new BSP node from polygons
    pub fn from_polygons(polygons: &[Polygon]) -> Self {
        let mut node = Self::new();
        if !polygons.is_empty() {
            node.build(polygons);
        }
        node
    }

    /// Convert solid space to empty space and empty space to solid space
    pub fn invert(&mut self) {
        SerialBspOps::new().invert(self);
    }

    /// Remove all polygons in this BSP tree that are inside the other BSP tree
    pub fn clip_to(&mut self, bsp: &Node) {
        SerialBspOps::new().clip_to(self, bsp);
    }

    /// Return all polygons in this BSP tree
    pub fn all_polygons(&self) -> Vec<Polygon> {
        SerialBspOps::new().all_polygons(self)
    }

    /// Build (or extend) the tree from the given polygons
    pub fn build(&mut self, polygons: &[Polygon]) {
        SerialBspOps::new().build(self, polygons);
    }
}
