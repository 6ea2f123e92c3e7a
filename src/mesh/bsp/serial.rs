//! Serial implementation of BSP operations

use crate::mesh::bsp::node::Node;
use crate::mesh::bsp::traits::{BalancedSplittingStrategy, BspOps, SplittingPlaneStrategy};
use crate::mesh::polygon::Polygon;

/// Serial implementation of BSP operations
pub struct SerialBspOps<SP: SplittingPlaneStrategy = BalancedSplittingStrategy> {
    splitting_strategy: SP,
}

impl SerialBspOps<BalancedSplittingStrategy> {
    pub fn new() -> Self {
        Self {
            splitting_strategy: BalancedSplittingStrategy::default(),
        }
    }
}

impl Default for SerialBspOps<BalancedSplittingStrategy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<SP: SplittingPlaneStrategy> BspOps for SerialBspOps<SP> {
    fn invert(&self, node: &mut Node) {
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            current.polygons.iter_mut().for_each(|p| p.flip());
            if let Some(ref mut plane) = current.plane {
                plane.flip();
            }

            std::mem::swap(&mut current.front, &mut current.back);

            if let Some(ref mut front) = current.front {
                stack.push(front.as_mut());
            }
            if let Some(ref mut back) = current.back {
                stack.push(back.as_mut());
            }
        }
    }

    fn clip_polygons(&self, node: &Node, polygons: &[Polygon]) -> Vec<Polygon> {
        let Some(plane) = node.plane.as_ref() else {
            return polygons.to_vec();
        };

        let mut front_polys = Vec::with_capacity(polygons.len());
        let mut back_polys = Vec::with_capacity(polygons.len());

        for polygon in polygons {
            let (coplanar_front, coplanar_back, front_parts, back_parts) =
                plane.split_polygon(polygon);
            front_polys.extend(coplanar_front);
            front_polys.extend(front_parts);
            back_polys.extend(coplanar_back);
            back_polys.extend(back_parts);
        }

        let mut result = match &node.front {
            Some(front_node) => self.clip_polygons(front_node, &front_polys),
            None => front_polys,
        };

        // no back subtree means the back half-space is solid: drop those polygons
        if let Some(back_node) = &node.back {
            result.extend(self.clip_polygons(back_node, &back_polys));
        }

        result
    }

    fn clip_to(&self, node: &mut Node, bsp: &Node) {
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            current.polygons = self.clip_polygons(bsp, &current.polygons);

            if let Some(ref mut front) = current.front {
                stack.push(front.as_mut());
            }
            if let Some(ref mut back) = current.back {
                stack.push(back.as_mut());
            }
        }
    }

    fn all_polygons(&self, node: &Node) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            result.extend_from_slice(&current.polygons);
            stack.extend(
                [&current.front, &current.back]
                    .into_iter()
                    .filter_map(|child| child.as_deref()),
            );
        }
        result
    }

    fn build(&self, node: &mut Node, polygons: &[Polygon]) {
        let mut stack = vec![(node, polygons.to_vec())];

        while let Some((current, polygons)) = stack.pop() {
            if polygons.is_empty() {
                continue;
            }

            let plane = current
                .plane
                .get_or_insert_with(|| self.splitting_strategy.pick_best_splitting_plane(&polygons))
                .clone();

            let mut front = Vec::with_capacity(polygons.len() / 2);
            let mut back = Vec::with_capacity(polygons.len() / 2);

            for polygon in &polygons {
                let (coplanar_front, coplanar_back, front_parts, back_parts) =
                    plane.split_polygon(polygon);
                current.polygons.extend(coplanar_front);
                current.polygons.extend(coplanar_back);
                front.extend(front_parts);
                back.extend(back_parts);
            }

            let Node {
                front: front_child,
                back: back_child,
                ..
            } = current;

            if !front.is_empty() {
                let child = front_child.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((child.as_mut(), front));
            }
            if !back.is_empty() {
                let child = back_child.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((child.as_mut(), back));
            }
        }
    }
}
