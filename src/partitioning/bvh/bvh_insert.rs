use super::{Bvh, BvhError, BvhNode, BvhNodeAdaptor, BvhNodeContent, BvhNodeId};
use crate::bounding_volume::{Aabb, BoundingVolume};
use core::fmt::Debug;
use smallvec::smallvec;

impl<T, A> Bvh<T, A>
where
    T: Clone + PartialEq + Debug,
    A: BvhNodeAdaptor<T>,
{
    /// Inserts a new object into this tree.
    ///
    /// The tree is descended from the root, choosing at each interior node the cheapest of:
    /// - sending the object to the left child: `SA(right) + SA(left ∪ object)`,
    /// - sending the object to the right child: `SA(left) + SA(right ∪ object)`,
    /// - pushing both children down under a new interior node, and adding a new leaf for the
    ///   object next to it: `SA(left ∪ right) + SA(object)`.
    ///
    /// The pushdown is only selected if its cost is smaller than the best descent cost
    /// multiplied by [`BvhConfig::merge_discount`](super::BvhConfig::merge_discount). When a
    /// leaf is reached, the object is added to it and the leaf is split if it exceeds the leaf
    /// capacity.
    pub fn insert(&mut self, object: T) -> Result<(), BvhError> {
        if self.adaptor.leaf_of(&object).is_some() {
            return Err(BvhError::DuplicateObject(format!("{object:?}")));
        }

        let object_aabb = self.adaptor.object_aabb(&object)?;
        let mut curr = self.root;

        loop {
            let children = self.node(curr)?.children();
            let Some((left, right)) = children else {
                return self.insert_in_leaf(curr, object);
            };

            let left_aabb = self.aabb_of(left)?;
            let right_aabb = self.aabb_of(right)?;
            let left_sa = left_aabb.surface_area();
            let right_sa = right_aabb.surface_area();

            let send_left = right_sa + left_aabb.merged(&object_aabb).surface_area();
            let send_right = left_sa + right_aabb.merged(&object_aabb).surface_area();
            let merged = left_aabb.merged(&right_aabb).surface_area() + object_aabb.surface_area();

            if merged < send_left.min(send_right) * self.config.merge_discount {
                return self.insert_pushdown(curr, left, right, object, object_aabb);
            }

            curr = if send_left < send_right { left } else { right };
        }
    }

    fn insert_in_leaf(&mut self, leaf: BvhNodeId, object: T) -> Result<(), BvhError> {
        match &mut self.node_mut(leaf)?.content {
            BvhNodeContent::Leaf(objects) => objects.push(object.clone()),
            BvhNodeContent::Interior { .. } => return Err(BvhError::NotALeaf(leaf)),
        }

        self.adaptor.map_object_to_leaf(&object, leaf);
        let _ = self.refit_volume(leaf)?;
        self.split_if_necessary(leaf)
    }

    /// Moves the children of `curr` under a new interior node, and makes a new leaf containing
    /// `object` its sibling.
    fn insert_pushdown(
        &mut self,
        curr: BvhNodeId,
        left: BvhNodeId,
        right: BvhNodeId,
        object: T,
        object_aabb: Aabb,
    ) -> Result<(), BvhError> {
        let depth = self.node(curr)?.depth;
        log::trace!("BVH insertion pushdown at {:?} (depth {}).", curr, depth);

        let merged_aabb = self.aabb_of(left)?.merged(&self.aabb_of(right)?);
        let merged = self.alloc_node(BvhNode {
            aabb: merged_aabb,
            parent: Some(curr),
            depth: depth + 1,
            content: BvhNodeContent::Interior { left, right },
        });
        self.node_mut(left)?.parent = Some(merged);
        self.node_mut(right)?.parent = Some(merged);

        let leaf = self.alloc_node(BvhNode::leaf(
            object_aabb,
            Some(curr),
            depth + 1,
            smallvec![object.clone()],
        ));
        self.adaptor.map_object_to_leaf(&object, leaf);

        self.node_mut(curr)?.content = BvhNodeContent::Interior {
            left: merged,
            right: leaf,
        };
        self.set_depth(curr, depth)?;
        self.child_refit(curr, true)
    }
}
