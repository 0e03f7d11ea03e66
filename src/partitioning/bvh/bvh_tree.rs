use super::{BvhConfig, BvhError, BvhNodeAdaptor};
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::Real;
use crate::utils::hashset::HashSet;
use alloc::vec::Vec;
use core::fmt::Debug;
use oorandom::Rand32;
use slab::Slab;
use smallvec::{smallvec, SmallVec};

/// The identifier of a node of a [`Bvh`].
///
/// Identifiers are stable for the lifetime of the node: rotations and refits never change the
/// id of a node, and the root keeps its id even when a removal collapses it. The id of a
/// removed node may be reused by a node created later.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BvhNodeId(pub usize);

/// The payload of a BVH node: either the objects of a leaf, or the two children of an interior
/// node.
#[derive(Clone, Debug, PartialEq)]
pub enum BvhNodeContent<T> {
    /// The objects stored by a leaf. Only the root leaf of an empty tree has no object.
    Leaf(SmallVec<[T; 1]>),
    /// The two children of an interior node.
    Interior {
        /// The left child.
        left: BvhNodeId,
        /// The right child.
        right: BvhNodeId,
    },
}

/// A node of a [`Bvh`].
#[derive(Clone, Debug)]
pub struct BvhNode<T> {
    pub(super) aabb: Aabb,
    pub(super) parent: Option<BvhNodeId>,
    pub(super) depth: u32,
    pub(super) content: BvhNodeContent<T>,
}

impl<T> BvhNode<T> {
    pub(super) fn leaf(
        aabb: Aabb,
        parent: Option<BvhNodeId>,
        depth: u32,
        objects: SmallVec<[T; 1]>,
    ) -> Self {
        Self {
            aabb,
            parent,
            depth,
            content: BvhNodeContent::Leaf(objects),
        }
    }

    pub(super) fn empty_root() -> Self {
        Self::leaf(Aabb::new_invalid(), None, 0, SmallVec::new())
    }

    /// The bounding box of this node.
    ///
    /// It is the smallest box enclosing all the objects (for a leaf) or the boxes of both
    /// children (for an interior node).
    #[inline]
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// The parent of this node, `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<BvhNodeId> {
        self.parent
    }

    /// The distance from the root, which has a depth of 0.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// The content of this node.
    #[inline]
    pub fn content(&self) -> &BvhNodeContent<T> {
        &self.content
    }

    /// Is this node a leaf?
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.content, BvhNodeContent::Leaf(_))
    }

    /// The objects stored by this node if it is a leaf.
    #[inline]
    pub fn objects(&self) -> Option<&[T]> {
        match &self.content {
            BvhNodeContent::Leaf(objects) => Some(objects),
            BvhNodeContent::Interior { .. } => None,
        }
    }

    /// The `(left, right)` children of this node if it is an interior node.
    #[inline]
    pub fn children(&self) -> Option<(BvhNodeId, BvhNodeId)> {
        match self.content {
            BvhNodeContent::Leaf(_) => None,
            BvhNodeContent::Interior { left, right } => Some((left, right)),
        }
    }

    /// The surface area of this node's bounding box.
    #[inline]
    pub fn surface_area(&self) -> Real {
        self.aabb.surface_area()
    }
}

/// Number of live nodes at each depth, so the maximum depth stays exact when nodes are removed
/// or move up the tree.
#[derive(Clone, Debug, Default)]
pub(super) struct DepthHistogram {
    counts: Vec<usize>,
}

impl DepthHistogram {
    pub fn add(&mut self, depth: u32) {
        let depth = depth as usize;
        if depth >= self.counts.len() {
            self.counts.resize(depth + 1, 0);
        }
        self.counts[depth] += 1;
    }

    pub fn remove(&mut self, depth: u32) {
        if let Some(count) = self.counts.get_mut(depth as usize) {
            *count = count.saturating_sub(1);
        }

        while self.counts.last() == Some(&0) {
            let _ = self.counts.pop();
        }
    }

    pub fn max_depth(&self) -> u32 {
        self.counts.len().saturating_sub(1) as u32
    }
}

/// A dynamic bounding volume hierarchy over objects of type `T`.
///
/// The tree is a binary tree of axis-aligned bounding boxes. Leaves store up to
/// [`BvhConfig::leaf_capacity`] objects, interior nodes have exactly two children. Objects can
/// be inserted and removed one at a time; moving objects are handled by refitting their leaf
/// with [`Bvh::object_moved`] and by periodically calling [`Bvh::optimize`] which applies local
/// tree rotations to the refitted part of the tree.
///
/// The geometry of the objects, as well as the object→leaf lookup, is provided by the adaptor
/// `A` owned by the tree.
///
/// # Example
///
/// ```
/// use dynbvh3d::math::Point;
/// use dynbvh3d::partitioning::SphereBvh;
/// use dynbvh3d::shape::Sphere;
///
/// let mut bvh = SphereBvh::default();
/// let a = bvh.insert_object(Sphere::new(Point::origin(), 1.0)).unwrap();
/// let _b = bvh.insert_object(Sphere::new(Point::new(5.0, 0.0, 0.0), 1.0)).unwrap();
///
/// bvh.update_object(a, |sphere| sphere.center.x = 10.0).unwrap();
/// bvh.optimize().unwrap();
///
/// let hits: Vec<_> = bvh
///     .query_objects(|aabb| aabb.intersects_sphere(&Point::new(10.0, 0.0, 0.0), 0.5))
///     .collect();
/// assert_eq!(hits, vec![&a]);
/// ```
#[derive(Clone, Debug)]
pub struct Bvh<T, A> {
    pub(super) nodes: Slab<BvhNode<T>>,
    pub(super) root: BvhNodeId,
    pub(super) adaptor: A,
    pub(super) config: BvhConfig,
    // Interior nodes whose bounds changed since the last optimization pass.
    pub(super) refit_nodes: HashSet<BvhNodeId>,
    pub(super) depths: DepthHistogram,
    pub(super) rng: Rand32,
}

impl<T, A> Default for Bvh<T, A>
where
    T: Clone + PartialEq + Debug,
    A: BvhNodeAdaptor<T> + Default,
{
    fn default() -> Self {
        Self::new(A::default())
    }
}

impl<T, A> Bvh<T, A>
where
    T: Clone + PartialEq + Debug,
    A: BvhNodeAdaptor<T>,
{
    /// Creates an empty tree using the default configuration.
    pub fn new(adaptor: A) -> Self {
        let config = BvhConfig::default();
        let mut nodes = Slab::new();
        let mut depths = DepthHistogram::default();
        depths.add(0);
        let root = BvhNodeId(nodes.insert(BvhNode::empty_root()));

        Self {
            nodes,
            root,
            adaptor,
            config,
            refit_nodes: HashSet::default(),
            depths,
            rng: Rand32::new(config.seed),
        }
    }

    /// Creates an empty tree with the given configuration.
    pub fn with_config(adaptor: A, config: BvhConfig) -> Result<Self, BvhError> {
        config.validate()?;
        let mut result = Self::new(adaptor);
        result.config = config;
        result.rng = Rand32::new(config.seed);
        Ok(result)
    }

    /// Builds a tree containing all the given objects with a top-down median split.
    ///
    /// The adaptor must not know any of these objects yet.
    pub fn from_objects(
        adaptor: A,
        objects: Vec<T>,
        config: BvhConfig,
    ) -> Result<Self, BvhError> {
        let mut result = Self::with_config(adaptor, config)?;

        if !objects.is_empty() {
            // Replace the empty root by the bulk-built one.
            let _ = result.free_node(result.root)?;
            result.root = result.build_node(None, objects, 0)?;
        }

        log::trace!(
            "BVH built with {} objects, {} nodes, max depth {}.",
            result.count(),
            result.node_count(),
            result.max_depth()
        );

        Ok(result)
    }

    /// The id of the root node.
    #[inline]
    pub fn root(&self) -> BvhNodeId {
        self.root
    }

    /// The bounding box of the whole tree.
    ///
    /// This is [`Aabb::new_invalid`] if the tree is empty.
    #[inline]
    pub fn root_aabb(&self) -> Aabb {
        self.nodes[self.root.0].aabb
    }

    /// The node with the given id.
    pub fn node(&self, id: BvhNodeId) -> Result<&BvhNode<T>, BvhError> {
        self.nodes.get(id.0).ok_or(BvhError::DanglingNode(id))
    }

    pub(super) fn node_mut(&mut self, id: BvhNodeId) -> Result<&mut BvhNode<T>, BvhError> {
        self.nodes.get_mut(id.0).ok_or(BvhError::DanglingNode(id))
    }

    /// Iterates through all the live nodes, in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = (BvhNodeId, &BvhNode<T>)> {
        self.nodes.iter().map(|(id, node)| (BvhNodeId(id), node))
    }

    /// The configuration of this tree.
    #[inline]
    pub fn config(&self) -> &BvhConfig {
        &self.config
    }

    /// The adaptor providing the objects geometry and their leaf lookup.
    #[inline]
    pub fn adaptor(&self) -> &A {
        &self.adaptor
    }

    /// Mutable access to the adaptor.
    ///
    /// Modifying the geometry of an indexed object through this reference must be followed by
    /// a call to [`Self::object_moved`] for that object. Altering the object→leaf lookup breaks
    /// the tree.
    #[inline]
    pub fn adaptor_mut(&mut self) -> &mut A {
        &mut self.adaptor
    }

    /// The leaf containing `object`, if it is indexed by this tree.
    #[inline]
    pub fn leaf_of(&self, object: &T) -> Option<BvhNodeId> {
        self.adaptor.leaf_of(object)
    }

    /// Does this tree index no object?
    pub fn is_empty(&self) -> bool {
        self.nodes[self.root.0]
            .objects()
            .is_some_and(|objects| objects.is_empty())
    }

    /// The number of objects indexed by this tree.
    pub fn count(&self) -> usize {
        self.nodes
            .iter()
            .filter_map(|(_, node)| node.objects())
            .map(|objects| objects.len())
            .sum()
    }

    /// The number of leaves of this tree.
    ///
    /// An empty tree still has one (empty) leaf: its root.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|(_, node)| node.is_leaf()).count()
    }

    /// The total number of nodes (interior nodes and leaves) of this tree.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The depth of the deepest node of this tree.
    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.depths.max_depth()
    }

    /// The number of interior nodes queued for the next [`Self::optimize`] pass.
    #[inline]
    pub fn pending_refit_count(&self) -> usize {
        self.refit_nodes.len()
    }

    /// Is the given node queued for the next [`Self::optimize`] pass?
    #[inline]
    pub fn is_refit_pending(&self, id: BvhNodeId) -> bool {
        self.refit_nodes.contains(&id)
    }

    /// Restarts the pseudo-random generator used by [`Self::optimize`] with a new seed.
    pub fn reseed(&mut self, seed: u64) {
        self.config.seed = seed;
        self.rng = Rand32::new(seed);
    }

    pub(super) fn children_of(&self, id: BvhNodeId) -> Result<(BvhNodeId, BvhNodeId), BvhError> {
        self.node(id)?.children().ok_or(BvhError::NotAnInterior(id))
    }

    pub(super) fn aabb_of(&self, id: BvhNodeId) -> Result<Aabb, BvhError> {
        Ok(self.node(id)?.aabb)
    }

    /// The union of the bounding boxes of the given objects.
    pub(super) fn objects_aabb(&self, objects: &[T]) -> Result<Aabb, BvhError> {
        let mut aabb = Aabb::new_invalid();
        for object in objects {
            aabb.merge(&self.adaptor.object_aabb(object)?);
        }
        Ok(aabb)
    }

    /// The leaf registered by the adaptor for `object`, after checking it actually contains it.
    pub(super) fn mapped_leaf(&self, object: &T) -> Result<BvhNodeId, BvhError> {
        let leaf = self
            .adaptor
            .leaf_of(object)
            .ok_or_else(|| BvhError::UnmappedObject(format!("{object:?}")))?;
        let objects = self.node(leaf)?.objects().ok_or(BvhError::NotALeaf(leaf))?;

        if objects.contains(object) {
            Ok(leaf)
        } else {
            Err(BvhError::ObjectNotInLeaf {
                leaf,
                object: format!("{object:?}"),
            })
        }
    }

    pub(super) fn alloc_node(&mut self, node: BvhNode<T>) -> BvhNodeId {
        self.depths.add(node.depth);
        BvhNodeId(self.nodes.insert(node))
    }

    pub(super) fn free_node(&mut self, id: BvhNodeId) -> Result<BvhNode<T>, BvhError> {
        if !self.nodes.contains(id.0) {
            return Err(BvhError::DanglingNode(id));
        }

        let node = self.nodes.remove(id.0);
        self.depths.remove(node.depth);
        let _ = self.refit_nodes.remove(&id);
        Ok(node)
    }

    /// Makes `left` and `right` the children of `parent`.
    pub(super) fn set_children(
        &mut self,
        parent: BvhNodeId,
        left: BvhNodeId,
        right: BvhNodeId,
    ) -> Result<(), BvhError> {
        self.node_mut(parent)?.content = BvhNodeContent::Interior { left, right };
        self.node_mut(left)?.parent = Some(parent);
        self.node_mut(right)?.parent = Some(parent);
        Ok(())
    }

    /// Assigns `depth` to `id` and the matching depths to its whole subtree.
    pub(super) fn set_depth(&mut self, id: BvhNodeId, depth: u32) -> Result<(), BvhError> {
        let mut stack: SmallVec<[(BvhNodeId, u32); 32]> = smallvec![(id, depth)];

        while let Some((curr, depth)) = stack.pop() {
            let node = self.node_mut(curr)?;
            let old_depth = core::mem::replace(&mut node.depth, depth);
            let children = node.children();

            if old_depth != depth {
                self.depths.remove(old_depth);
                self.depths.add(depth);
            }

            if let Some((left, right)) = children {
                stack.push((right, depth + 1));
                stack.push((left, depth + 1));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::DepthHistogram;

    #[test]
    fn depth_histogram_tracks_the_deepest_level() {
        let mut histogram = DepthHistogram::default();
        assert_eq!(histogram.max_depth(), 0);

        histogram.add(0);
        histogram.add(1);
        histogram.add(3);
        histogram.add(3);
        assert_eq!(histogram.max_depth(), 3);

        histogram.remove(3);
        assert_eq!(histogram.max_depth(), 3);
        histogram.remove(3);
        assert_eq!(histogram.max_depth(), 1);
        histogram.remove(1);
        histogram.remove(0);
        assert_eq!(histogram.max_depth(), 0);
    }
}
