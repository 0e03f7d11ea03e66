use super::{Bvh, BvhError, BvhNodeAdaptor, BvhNodeId};
use crate::bounding_volume::BoundingVolume;
use core::fmt::Debug;

impl<T, A> Bvh<T, A>
where
    T: Clone + PartialEq + Debug,
    A: BvhNodeAdaptor<T>,
{
    /// Notifies the tree that the bounding box of `object` changed.
    ///
    /// The leaf containing `object` and its ancestors are refitted. If the leaf bounds actually
    /// changed, the leaf's parent is queued for the next [`Self::optimize`] pass.
    pub fn object_moved(&mut self, object: &T) -> Result<(), BvhError> {
        let leaf = self.mapped_leaf(object)?;

        if self.refit_volume(leaf)? {
            if let Some(parent) = self.node(leaf)?.parent {
                let _ = self.refit_nodes.insert(parent);
            }
        }

        Ok(())
    }

    /// Recomputes the bounds of a non-empty leaf from its objects.
    ///
    /// Returns `true` if the bounds changed, in which case all the ancestors are refitted too.
    pub(super) fn refit_volume(&mut self, leaf: BvhNodeId) -> Result<bool, BvhError> {
        let node = self.node(leaf)?;
        let objects = node.objects().ok_or(BvhError::NotALeaf(leaf))?;

        if objects.is_empty() {
            return Err(BvhError::Integrity {
                node: leaf,
                reason: "cannot refit a leaf without objects",
            });
        }

        let new_aabb = self.objects_aabb(objects)?;
        let parent = node.parent;

        if new_aabb == node.aabb {
            return Ok(false);
        }

        self.node_mut(leaf)?.aabb = new_aabb;

        if let Some(parent) = parent {
            self.child_refit(parent, true)?;
        }

        Ok(true)
    }

    /// Recomputes the bounds of the interior node `id` as the union of its children's bounds.
    ///
    /// With `propagate`, the refit continues along the ancestors up to the root.
    pub(super) fn child_refit(&mut self, id: BvhNodeId, propagate: bool) -> Result<(), BvhError> {
        let mut curr = Some(id);

        while let Some(id) = curr {
            let (left, right) = self.children_of(id)?;
            let aabb = self.aabb_of(left)?.merged(&self.aabb_of(right)?);
            let node = self.node_mut(id)?;
            node.aabb = aabb;
            curr = if propagate { node.parent } else { None };
        }

        Ok(())
    }
}
