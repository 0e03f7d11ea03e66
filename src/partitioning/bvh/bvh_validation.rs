use super::{Bvh, BvhError, BvhNodeAdaptor, BvhNodeContent, BvhNodeId};
use crate::bounding_volume::BoundingVolume;
use crate::math::Real;
use crate::utils::hashset::HashSet;
use alloc::vec::Vec;
use core::fmt::Debug;

impl<T, A> Bvh<T, A>
where
    T: Clone + PartialEq + Debug,
    A: BvhNodeAdaptor<T>,
{
    /// Checks all the structural invariants of this tree.
    ///
    /// This traverses the whole tree and checks that:
    /// - every node is reachable exactly once from the root, and the arena holds no other node,
    /// - parent links and depths match the traversal,
    /// - every bounding box is exactly the union of its objects or children,
    /// - leaves are not empty (except the root of an empty tree) nor above capacity,
    /// - the adaptor maps every object to the leaf containing it,
    /// - the maximum depth and the optimization queue are consistent with the nodes.
    pub fn check_integrity(&self) -> Result<(), BvhError> {
        let mut visited: HashSet<BvhNodeId> = HashSet::default();
        let mut stack: Vec<(BvhNodeId, Option<BvhNodeId>, u32)> = vec![(self.root, None, 0)];
        let mut deepest = 0;

        while let Some((id, expected_parent, expected_depth)) = stack.pop() {
            if !visited.insert(id) {
                return Err(integrity(id, "node reachable through several paths"));
            }

            let node = self.node(id)?;

            if node.parent != expected_parent {
                return Err(integrity(id, "parent link does not match the tree structure"));
            }

            if node.depth != expected_depth {
                return Err(integrity(id, "depth does not match the distance to the root"));
            }

            deepest = deepest.max(node.depth);

            match &node.content {
                BvhNodeContent::Leaf(objects) => {
                    if objects.is_empty() && id != self.root {
                        return Err(integrity(id, "non-root leaf without objects"));
                    }

                    if objects.len() > self.config.leaf_capacity {
                        return Err(integrity(id, "leaf above capacity"));
                    }

                    if node.aabb != self.objects_aabb(objects)? {
                        return Err(integrity(id, "leaf bounds differ from its objects bounds"));
                    }

                    for object in objects {
                        self.adaptor.check_map(object)?;

                        if self.adaptor.leaf_of(object) != Some(id) {
                            return Err(BvhError::ObjectNotInLeaf {
                                leaf: self.adaptor.leaf_of(object).unwrap_or(id),
                                object: format!("{object:?}"),
                            });
                        }
                    }
                }
                BvhNodeContent::Interior { left, right } => {
                    if left == right {
                        return Err(integrity(id, "both children are the same node"));
                    }

                    let expected = self.aabb_of(*left)?.merged(&self.aabb_of(*right)?);
                    if node.aabb != expected {
                        return Err(integrity(id, "interior bounds differ from its children"));
                    }

                    stack.push((*right, Some(id), expected_depth + 1));
                    stack.push((*left, Some(id), expected_depth + 1));
                }
            }
        }

        if visited.len() != self.nodes.len() {
            return Err(integrity(self.root, "the arena contains unreachable nodes"));
        }

        if deepest != self.depths.max_depth() {
            return Err(integrity(self.root, "stale maximum depth"));
        }

        for id in &self.refit_nodes {
            let _ = self.node(*id)?;
        }

        Ok(())
    }

    /// Panics if [`Self::check_integrity`] fails.
    pub fn assert_well_formed(&self) {
        if let Err(err) = self.check_integrity() {
            panic!("malformed BVH: {err}");
        }
    }

    /// The sum of the surface areas of all the nodes except the root.
    ///
    /// This is the quantity the insertion and rotation heuristics locally minimize, up to a
    /// constant factor.
    pub fn total_sah_cost(&self) -> Real {
        self.nodes
            .iter()
            .filter(|(id, _)| *id != self.root.0)
            .map(|(_, node)| node.surface_area())
            .sum()
    }
}

fn integrity(node: BvhNodeId, reason: &'static str) -> BvhError {
    BvhError::Integrity { node, reason }
}
