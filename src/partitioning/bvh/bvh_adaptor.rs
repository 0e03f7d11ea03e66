use super::{BvhError, BvhNodeId};
use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use core::fmt::Debug;

/// Binds the objects indexed by a [`Bvh`](super::Bvh) to the tree.
///
/// The tree never creates or destroys objects of type `T`: it only stores them in its leaves
/// and asks the adaptor for their geometry. The adaptor also owns the object→leaf lookup used
/// by removals and moved-object notifications. That lookup must be kept exactly in sync with
/// the tree's leaves; the tree calls [`Self::map_object_to_leaf`] and [`Self::unmap_object`]
/// every time an object changes leaf.
///
/// The adaptor is owned by the tree, see [`Bvh::adaptor`](super::Bvh::adaptor) and
/// [`Bvh::adaptor_mut`](super::Bvh::adaptor_mut).
pub trait BvhNodeAdaptor<T> {
    /// The point representing `object` when objects are ordered along an axis during splits.
    fn object_position(&self, object: &T) -> Result<Point<Real>, BvhError>;

    /// The current bounding box of `object`.
    fn object_aabb(&self, object: &T) -> Result<Aabb, BvhError>;

    /// Records `leaf` as the leaf currently containing `object`, replacing any previous entry.
    fn map_object_to_leaf(&mut self, object: &T, leaf: BvhNodeId);

    /// Forgets the leaf of `object`.
    fn unmap_object(&mut self, object: &T);

    /// The leaf currently containing `object`, if it is indexed by the tree.
    fn leaf_of(&self, object: &T) -> Option<BvhNodeId>;

    /// Integrity hook called on every indexed object by
    /// [`Bvh::check_integrity`](super::Bvh::check_integrity).
    fn check_map(&self, object: &T) -> Result<(), BvhError>
    where
        T: Debug,
    {
        match self.leaf_of(object) {
            Some(_) => Ok(()),
            None => Err(BvhError::UnmappedObject(format!("{object:?}"))),
        }
    }
}
