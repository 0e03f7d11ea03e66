use super::{Bvh, BvhError, BvhNode, BvhNodeAdaptor, BvhNodeContent, BvhNodeId};
use crate::bounding_volume::Aabb;
use core::fmt::Debug;

impl<T, A> Bvh<T, A>
where
    T: Clone + PartialEq + Debug,
    A: BvhNodeAdaptor<T>,
{
    /// Removes an object from this tree.
    ///
    /// If this leaves its leaf empty, the leaf is deleted and its sibling takes the place of
    /// their parent. The parent node keeps its id.
    pub fn remove(&mut self, object: &T) -> Result<(), BvhError> {
        let leaf = self.mapped_leaf(object)?;
        self.adaptor.unmap_object(object);

        let node = self.node_mut(leaf)?;
        let parent = node.parent;
        let remaining = match &mut node.content {
            BvhNodeContent::Leaf(objects) => {
                let Some(i) = objects.iter().position(|o| o == object) else {
                    return Err(BvhError::ObjectNotInLeaf {
                        leaf,
                        object: format!("{object:?}"),
                    });
                };
                let _ = objects.remove(i);
                objects.len()
            }
            BvhNodeContent::Interior { .. } => return Err(BvhError::NotALeaf(leaf)),
        };

        if remaining > 0 {
            let _ = self.refit_volume(leaf)?;
            return Ok(());
        }

        match parent {
            // The tree is now empty.
            None => self.node_mut(leaf)?.aabb = Aabb::new_invalid(),
            Some(parent) => self.collapse_into_parent(parent, leaf)?,
        }

        Ok(())
    }

    /// Deletes the empty leaf `removed` and moves its sibling into `parent`.
    fn collapse_into_parent(
        &mut self,
        parent: BvhNodeId,
        removed: BvhNodeId,
    ) -> Result<(), BvhError> {
        let (left, right) = self.children_of(parent)?;
        let kept = if removed == left {
            right
        } else if removed == right {
            left
        } else {
            return Err(BvhError::ChildMismatch {
                parent,
                child: removed,
            });
        };

        let _ = self.free_node(removed)?;
        let BvhNode { aabb, content, .. } = self.free_node(kept)?;

        log::trace!(
            "BVH leaf {:?} removed, {:?} collapsed into {:?}.",
            removed,
            kept,
            parent
        );

        match &content {
            BvhNodeContent::Interior { left, right } => {
                self.node_mut(*left)?.parent = Some(parent);
                self.node_mut(*right)?.parent = Some(parent);
            }
            BvhNodeContent::Leaf(objects) => {
                for object in objects {
                    self.adaptor.map_object_to_leaf(object, parent);
                }
            }
        }

        let node = self.node_mut(parent)?;
        node.aabb = aabb;
        node.content = content;
        let depth = node.depth;
        let grandparent = node.parent;

        // The promoted subtree moved one level up.
        self.set_depth(parent, depth)?;

        if let Some(grandparent) = grandparent {
            self.child_refit(grandparent, true)?;
        }

        Ok(())
    }
}
