use super::{Bvh, BvhError, BvhNodeAdaptor, BvhNodeId};
use crate::bounding_volume::BoundingVolume;
use crate::math::Real;
use alloc::vec::Vec;
use core::fmt::Debug;

/// A local restructuring of the two levels of the tree below an interior node `N`.
///
/// `L` and `R` designate the left and right children of `N`, `LL`, `LR`, `RL`, `RR` its
/// grandchildren. Every rotation swaps two of these nodes. The variants are listed in the order
/// the rotation candidates are evaluated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BvhRotation {
    /// Leave the node unchanged.
    None,
    /// Swap `L` with `RL`.
    LeftWithRightLeft,
    /// Swap `L` with `RR`.
    LeftWithRightRight,
    /// Swap `R` with `LL`.
    RightWithLeftLeft,
    /// Swap `R` with `LR`.
    RightWithLeftRight,
    /// Swap `LL` with `RR`.
    LeftLeftWithRightRight,
    /// Swap `LL` with `RL`.
    LeftLeftWithRightLeft,
}

impl BvhRotation {
    /// All the rotations, in evaluation order.
    pub const ALL: [BvhRotation; 7] = [
        BvhRotation::None,
        BvhRotation::LeftWithRightLeft,
        BvhRotation::LeftWithRightRight,
        BvhRotation::RightWithLeftLeft,
        BvhRotation::RightWithLeftRight,
        BvhRotation::LeftLeftWithRightRight,
        BvhRotation::LeftLeftWithRightLeft,
    ];

    /// Does this rotation move a subtree one level up or down?
    ///
    /// This is the case of the child↔grandchild swaps. Grandchild↔grandchild swaps keep all
    /// the depths unchanged.
    pub fn changes_depths(self) -> bool {
        matches!(
            self,
            BvhRotation::LeftWithRightLeft
                | BvhRotation::LeftWithRightRight
                | BvhRotation::RightWithLeftLeft
                | BvhRotation::RightWithLeftRight
        )
    }
}

impl<T, A> Bvh<T, A>
where
    T: Clone + PartialEq + Debug,
    A: BvhNodeAdaptor<T>,
{
    /// Improves the tree quality around the nodes refitted since the last call.
    ///
    /// The queued nodes are processed deepest first. Each one is considered for a tree
    /// rotation reducing the sum of its children's surface areas, and its parent is queued in
    /// turn. This stops when the queue is empty, i.e., after the root was processed.
    ///
    /// Only trees with a single object per leaf can be optimized.
    pub fn optimize(&mut self) -> Result<(), BvhError> {
        if self.config.leaf_capacity != 1 {
            return Err(BvhError::OptimizeRequiresSingleObjectLeaves(
                self.config.leaf_capacity,
            ));
        }

        let mut sweep = Vec::new();

        while !self.refit_nodes.is_empty() {
            let mut max_depth = 0;
            for id in self.refit_nodes.iter() {
                max_depth = max_depth.max(self.node(*id)?.depth);
            }

            sweep.clear();
            for id in self.refit_nodes.iter() {
                if self.node(*id)?.depth == max_depth {
                    sweep.push(*id);
                }
            }
            // Deterministic processing order.
            sweep.sort_unstable();

            for id in &sweep {
                let _ = self.refit_nodes.remove(id);
            }

            log::trace!(
                "BVH optimization sweep at depth {}: {} nodes.",
                max_depth,
                sweep.len()
            );

            for id in &sweep {
                self.try_rotate(*id)?;
            }
        }

        Ok(())
    }

    pub(super) fn try_rotate(&mut self, id: BvhNodeId) -> Result<(), BvhError> {
        let node = self.node(id)?;
        let parent = node.parent;
        let Some((left, right)) = node.children() else {
            return Ok(());
        };

        let left_node = self.node(left)?;
        let right_node = self.node(right)?;
        let leaf_children = left_node.is_leaf() && right_node.is_leaf();
        let current_cost = left_node.surface_area() + right_node.surface_area();

        // No grandchild to swap with.
        if leaf_children {
            if let Some(parent) = parent {
                let _ = self.refit_nodes.insert(parent);
            }
            return Ok(());
        }

        let mut best_rotation = BvhRotation::None;
        let mut best_cost = Real::MAX;

        for rotation in BvhRotation::ALL {
            if let Some(cost) = self.rotation_cost(rotation, left, right)? {
                if cost < best_cost {
                    best_rotation = rotation;
                    best_cost = cost;
                }
            }
        }

        if best_rotation == BvhRotation::None {
            if let Some(parent) = parent {
                if self.rng.rand_float() < self.config.parent_requeue_probability {
                    let _ = self.refit_nodes.insert(parent);
                }
            }
            return Ok(());
        }

        if let Some(parent) = parent {
            let _ = self.refit_nodes.insert(parent);
        }

        let improvement = if current_cost > 0.0 {
            (current_cost - best_cost) / current_cost
        } else {
            0.0
        };

        if improvement < self.config.min_rotation_improvement {
            return Ok(());
        }

        log::debug!(
            "BVH rotation {:?} at {:?}: children cost {} -> {}.",
            best_rotation,
            id,
            current_cost,
            best_cost
        );

        self.apply_rotation(id, best_rotation, left, right)
    }

    /// The sum of the surface areas of the children of the node with children `left` and
    /// `right` after `rotation`, or `None` if the rotation needs a grandchild that doesn't
    /// exist.
    fn rotation_cost(
        &self,
        rotation: BvhRotation,
        left: BvhNodeId,
        right: BvhNodeId,
    ) -> Result<Option<Real>, BvhError> {
        let sa = |id: BvhNodeId| -> Result<Real, BvhError> { Ok(self.node(id)?.surface_area()) };
        let merged_sa = |a: BvhNodeId, b: BvhNodeId| -> Result<Real, BvhError> {
            Ok(self.aabb_of(a)?.merged(&self.aabb_of(b)?).surface_area())
        };
        let left_children = self.node(left)?.children();
        let right_children = self.node(right)?.children();

        let cost = match rotation {
            BvhRotation::None => sa(left)? + sa(right)?,
            BvhRotation::LeftWithRightLeft => {
                let Some((rl, rr)) = right_children else {
                    return Ok(None);
                };
                sa(rl)? + merged_sa(left, rr)?
            }
            BvhRotation::LeftWithRightRight => {
                let Some((rl, rr)) = right_children else {
                    return Ok(None);
                };
                sa(rr)? + merged_sa(left, rl)?
            }
            BvhRotation::RightWithLeftLeft => {
                let Some((ll, lr)) = left_children else {
                    return Ok(None);
                };
                merged_sa(right, lr)? + sa(ll)?
            }
            BvhRotation::RightWithLeftRight => {
                let Some((ll, lr)) = left_children else {
                    return Ok(None);
                };
                merged_sa(right, ll)? + sa(lr)?
            }
            BvhRotation::LeftLeftWithRightRight => {
                let (Some((ll, lr)), Some((rl, rr))) = (left_children, right_children) else {
                    return Ok(None);
                };
                merged_sa(rr, lr)? + merged_sa(rl, ll)?
            }
            BvhRotation::LeftLeftWithRightLeft => {
                let (Some((ll, lr)), Some((rl, rr))) = (left_children, right_children) else {
                    return Ok(None);
                };
                merged_sa(rl, lr)? + merged_sa(ll, rr)?
            }
        };

        Ok(Some(cost))
    }

    fn apply_rotation(
        &mut self,
        id: BvhNodeId,
        rotation: BvhRotation,
        left: BvhNodeId,
        right: BvhNodeId,
    ) -> Result<(), BvhError> {
        match rotation {
            BvhRotation::None => return Ok(()),
            BvhRotation::LeftWithRightLeft => {
                let (rl, rr) = self.children_of(right)?;
                self.set_children(id, rl, right)?;
                self.set_children(right, left, rr)?;
                self.child_refit(right, false)?;
            }
            BvhRotation::LeftWithRightRight => {
                let (rl, rr) = self.children_of(right)?;
                self.set_children(id, rr, right)?;
                self.set_children(right, rl, left)?;
                self.child_refit(right, false)?;
            }
            BvhRotation::RightWithLeftLeft => {
                let (ll, lr) = self.children_of(left)?;
                self.set_children(id, left, ll)?;
                self.set_children(left, right, lr)?;
                self.child_refit(left, false)?;
            }
            BvhRotation::RightWithLeftRight => {
                let (ll, lr) = self.children_of(left)?;
                self.set_children(id, left, lr)?;
                self.set_children(left, ll, right)?;
                self.child_refit(left, false)?;
            }
            BvhRotation::LeftLeftWithRightRight => {
                let (ll, lr) = self.children_of(left)?;
                let (rl, rr) = self.children_of(right)?;
                self.set_children(left, rr, lr)?;
                self.set_children(right, rl, ll)?;
                self.child_refit(left, false)?;
                self.child_refit(right, false)?;
            }
            BvhRotation::LeftLeftWithRightLeft => {
                let (ll, lr) = self.children_of(left)?;
                let (rl, rr) = self.children_of(right)?;
                self.set_children(left, rl, lr)?;
                self.set_children(right, ll, rr)?;
                self.child_refit(left, false)?;
                self.child_refit(right, false)?;
            }
        }

        if rotation.changes_depths() {
            let depth = self.node(id)?.depth;
            self.set_depth(id, depth)?;
        }

        Ok(())
    }
}
