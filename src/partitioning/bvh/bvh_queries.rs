use super::{Bvh, BvhNodeAdaptor, BvhNodeId};
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Point, Real};
use crate::query::Ray;
use alloc::vec::Vec;
use core::fmt::Debug;
use smallvec::{smallvec, SmallVec};

impl<T, A> Bvh<T, A>
where
    T: Clone + PartialEq + Debug,
    A: BvhNodeAdaptor<T>,
{
    /// Collects all the nodes whose bounding box passes `predicate`, and whose ancestors all
    /// pass `predicate` too.
    ///
    /// Nodes are returned in depth-first pre-order, left child first. This includes interior
    /// nodes; use [`Self::query_objects`] to retrieve the objects of the matching leaves.
    pub fn query(&self, mut predicate: impl FnMut(&Aabb) -> bool) -> Vec<BvhNodeId> {
        let mut hits = Vec::new();
        let mut stack: SmallVec<[BvhNodeId; 32]> = smallvec![self.root];

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];

            if predicate(&node.aabb) {
                hits.push(id);

                if let Some((left, right)) = node.children() {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }

        hits
    }

    /// Collects all the nodes whose bounding box is hit by the given ray.
    ///
    /// Only intersections at non-negative ray parameters are reported.
    pub fn query_ray(&self, ray: &Ray) -> Vec<BvhNodeId> {
        self.query(|aabb| ray.intersects_aabb(aabb))
    }

    /// Collects all the nodes whose bounding box overlaps `aabb`.
    ///
    /// Boxes that are only touching do not overlap.
    pub fn query_aabb(&self, aabb: &Aabb) -> Vec<BvhNodeId> {
        self.query(|node_aabb| node_aabb.intersects(aabb))
    }

    /// Collects all the nodes whose bounding box intersects the given sphere.
    pub fn query_sphere(&self, center: &Point<Real>, radius: Real) -> Vec<BvhNodeId> {
        self.query(|aabb| aabb.intersects_sphere(center, radius))
    }

    /// The objects stored by the leaves found by [`Self::query`].
    pub fn query_objects<'a>(
        &'a self,
        predicate: impl FnMut(&Aabb) -> bool,
    ) -> impl Iterator<Item = &'a T> + 'a {
        self.query(predicate)
            .into_iter()
            .flat_map(move |id| self.nodes[id.0].objects().unwrap_or(&[]).iter())
    }

    /// Iterates through all the objects indexed by this tree, in no particular order.
    pub fn objects(&self) -> impl Iterator<Item = &T> {
        self.nodes
            .iter()
            .filter_map(|(_, node)| node.objects())
            .flatten()
    }
}
