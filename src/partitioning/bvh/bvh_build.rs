use super::{Bvh, BvhError, BvhNode, BvhNodeAdaptor, BvhNodeContent, BvhNodeId};
use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use alloc::vec::Vec;
use core::fmt::Debug;
use smallvec::SmallVec;

/// A coordinate axis along which objects are sorted when a node is split.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SplitAxis {
    /// The `x` axis.
    X,
    /// The `y` axis.
    Y,
    /// The `z` axis.
    Z,
}

impl SplitAxis {
    /// All the axes, in the order they are tried by the split heuristic.
    pub const ALL: [SplitAxis; 3] = [SplitAxis::X, SplitAxis::Y, SplitAxis::Z];

    /// The index of the point coordinate along this axis.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            SplitAxis::X => 0,
            SplitAxis::Y => 1,
            SplitAxis::Z => 2,
        }
    }
}

pub(super) struct SplitCandidate<T> {
    pub axis: SplitAxis,
    pub cost: Real,
    pub left: Vec<T>,
    pub right: Vec<T>,
}

impl<T, A> Bvh<T, A>
where
    T: Clone + PartialEq + Debug,
    A: BvhNodeAdaptor<T>,
{
    /// Builds the subtree containing `objects`, with a root at the given depth.
    pub(super) fn build_node(
        &mut self,
        parent: Option<BvhNodeId>,
        objects: Vec<T>,
        depth: u32,
    ) -> Result<BvhNodeId, BvhError> {
        if objects.is_empty() {
            return Err(BvhError::EmptyObjectList);
        }

        let aabb = self.objects_aabb(&objects)?;

        if objects.len() <= self.config.leaf_capacity {
            // The slab hands out its vacant key on the next insertion.
            let id = BvhNodeId(self.nodes.vacant_key());

            for object in &objects {
                if self.adaptor.leaf_of(object).is_some() {
                    return Err(BvhError::DuplicateObject(format!("{object:?}")));
                }
                self.adaptor.map_object_to_leaf(object, id);
            }

            let leaf = self.alloc_node(BvhNode::leaf(aabb, parent, depth, objects.into()));
            debug_assert_eq!(leaf, id);
            Ok(leaf)
        } else {
            let id = self.alloc_node(BvhNode::leaf(aabb, parent, depth, SmallVec::new()));
            self.split_into(id, objects)?;
            Ok(id)
        }
    }

    /// Splits the leaf `id` if it holds more objects than the leaf capacity.
    pub(super) fn split_if_necessary(&mut self, id: BvhNodeId) -> Result<(), BvhError> {
        let len = self
            .node(id)?
            .objects()
            .ok_or(BvhError::NotALeaf(id))?
            .len();

        if len > self.config.leaf_capacity {
            self.split_node(id)?;
        }

        Ok(())
    }

    /// Turns the leaf `id` into an interior node whose subtrees contain the leaf's objects.
    pub(super) fn split_node(&mut self, id: BvhNodeId) -> Result<(), BvhError> {
        let objects = match &mut self.node_mut(id)?.content {
            BvhNodeContent::Leaf(objects) => core::mem::take(objects),
            BvhNodeContent::Interior { .. } => return Err(BvhError::NotALeaf(id)),
        };

        for object in &objects {
            self.adaptor.unmap_object(object);
        }

        self.split_into(id, objects.into_vec())
    }

    fn split_into(&mut self, id: BvhNodeId, objects: Vec<T>) -> Result<(), BvhError> {
        let split = self.best_split(objects)?;
        let depth = self.node(id)?.depth;

        log::trace!(
            "Splitting BVH node {:?} along {:?}: {} + {} objects, cost {}.",
            id,
            split.axis,
            split.left.len(),
            split.right.len(),
            split.cost
        );

        let left = self.build_node(Some(id), split.left, depth + 1)?;
        let right = self.build_node(Some(id), split.right, depth + 1)?;
        self.node_mut(id)?.content = BvhNodeContent::Interior { left, right };
        self.child_refit(id, false)
    }

    /// Finds the axis whose median split minimizes the surface area heuristic.
    ///
    /// For each axis, the objects are stably sorted by position and cut in two halves of
    /// `n / 2` and `n - n / 2` objects. A split costs `SA(left) * |left| + SA(right) * |right|`.
    /// Ties keep the first axis.
    pub(super) fn best_split(&self, objects: Vec<T>) -> Result<SplitCandidate<T>, BvhError> {
        let center = objects.len() / 2;
        let keyed = objects
            .into_iter()
            .map(|object| Ok((self.adaptor.object_position(&object)?, object)))
            .collect::<Result<Vec<(Point<Real>, T)>, BvhError>>()?;
        let mut best: Option<SplitCandidate<T>> = None;

        for axis in SplitAxis::ALL {
            let dim = axis.index();
            let mut sorted = keyed.clone();
            sorted.sort_by(|a, b| a.0[dim].total_cmp(&b.0[dim]));

            let right: Vec<T> = sorted.split_off(center).into_iter().map(|e| e.1).collect();
            let left: Vec<T> = sorted.into_iter().map(|e| e.1).collect();
            let cost = self.split_cost(&left)? + self.split_cost(&right)?;

            if best.as_ref().map_or(true, |best| cost < best.cost) {
                best = Some(SplitCandidate {
                    axis,
                    cost,
                    left,
                    right,
                });
            }
        }

        best.ok_or(BvhError::EmptyObjectList)
    }

    fn split_cost(&self, objects: &[T]) -> Result<Real, BvhError> {
        if objects.is_empty() {
            return Ok(0.0);
        }

        let aabb: Aabb = self.objects_aabb(objects)?;
        Ok(aabb.surface_area() * objects.len() as Real)
    }
}
