//! Traits defining BSP tree operations

use crate::float_types::Real;
use crate::mesh::bsp::node::Node;
use crate::mesh::plane::{BACK, COPLANAR, FRONT, Plane};
use crate::mesh::polygon::Polygon;

/// Core BSP operations
pub trait BspOps {
    /// Invert all polygons in the BSP tree
    fn invert(&self, node: &mut Node);

    /// Recursively remove all polygons that are inside this BSP tree
    fn clip_polygons(&self, node: &Node, polygons: &[Polygon]) -> Vec<Polygon>;

    /// Remove all polygons in this BSP tree that are inside the other BSP tree
    fn clip_to(&self, node: &mut Node, other: &Node);

    /// Build a BSP tree from the given polygons
    fn build(&self, node: &mut Node, polygons: &[Polygon]);

    /// Return all polygons in this BSP tree
    fn all_polygons(&self, node: &Node) -> Vec<Polygon>;
}

/// Picks the plane a node splits its polygons by
pub trait SplittingPlaneStrategy {
    /// `polygons` is never empty.
    fn pick_best_splitting_plane(&self, polygons: &[Polygon]) -> Plane;
}

/// Scores candidate planes by how many polygons they cut and how lopsided they leave the tree
pub struct BalancedSplittingStrategy {
    pub span_weight: Real,
    pub balance_weight: Real,
    /// Number of leading polygons whose planes are tried as candidates
    pub sample_size: usize,
}

impl Default for BalancedSplittingStrategy {
    fn default() -> Self {
        Self {
            span_weight: 8.0,
            balance_weight: 1.0,
            sample_size: 20,
        }
    }
}

impl SplittingPlaneStrategy for BalancedSplittingStrategy {
    fn pick_best_splitting_plane(&self, polygons: &[Polygon]) -> Plane {
        let mut best_plane = &polygons[0].plane;
        let mut best_score = Real::MAX;

        for candidate in polygons.iter().take(self.sample_size) {
            let plane = &candidate.plane;
            let (num_front, num_back, num_spanning) =
                polygons
                    .iter()
                    .fold((0i64, 0i64, 0i64), |acc, poly| match plane.classify_polygon(poly) {
                        COPLANAR => acc,
                        FRONT => (acc.0 + 1, acc.1, acc.2),
                        BACK => (acc.0, acc.1 + 1, acc.2),
                        _ => (acc.0, acc.1, acc.2 + 1),
                    });

            let score = self.span_weight * num_spanning as Real
                + self.balance_weight * ((num_front - num_back) as Real).abs();

            // first best wins
            if score < best_score {
                best_score = score;
                best_plane = plane;
            }
        }

        best_plane.clone()
    }
}
