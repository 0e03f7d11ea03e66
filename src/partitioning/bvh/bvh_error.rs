use super::BvhNodeId;

/// Faults reported by the BVH operations.
///
/// All of them indicate a programming or integration error (desynchronized adaptor
/// bookkeeping, misuse of the API, corrupted tree). None of them is expected during normal
/// operation and the tree should not be considered usable after one was returned in the middle
/// of a mutation.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum BvhError {
    /// A node was built from an empty object list.
    #[error("a BVH node cannot be built from an empty object list")]
    EmptyObjectList,
    /// The leaf capacity must be at least 1.
    #[error("the maximum number of objects per leaf must be at least 1, got {0}")]
    InvalidLeafCapacity(usize),
    /// [`Bvh::optimize`](super::Bvh::optimize) only supports trees with one object per leaf.
    #[error("tree rotations require exactly one object per leaf, this tree allows {0}")]
    OptimizeRequiresSingleObjectLeaves(usize),
    /// The adaptor has no leaf registered for this object.
    #[error("the object {0} is not mapped to any BVH leaf")]
    UnmappedObject(String),
    /// The adaptor cannot provide the geometry of this object.
    #[error("the adaptor does not know the object {0}")]
    UnknownObject(String),
    /// The object is already indexed by the tree.
    #[error("the object {0} is already indexed by this BVH")]
    DuplicateObject(String),
    /// The object cannot leave the adaptor storage while a leaf still holds it.
    #[error("the object {0} is still indexed by a BVH leaf")]
    ObjectStillIndexed(String),
    /// A leaf was expected but an interior node was found.
    #[error("the node {0:?} was expected to be a leaf")]
    NotALeaf(BvhNodeId),
    /// An interior node was expected but a leaf was found.
    #[error("the node {0:?} was expected to be an interior node")]
    NotAnInterior(BvhNodeId),
    /// The node id does not identify any live node.
    #[error("the node {0:?} does not exist")]
    DanglingNode(BvhNodeId),
    /// A node was expected to be a child of `parent`.
    #[error("the node {child:?} is not a child of {parent:?}")]
    ChildMismatch {
        /// The interior node.
        parent: BvhNodeId,
        /// The node that was expected to be one of its children.
        child: BvhNodeId,
    },
    /// The adaptor maps an object to a leaf that does not contain it.
    #[error("the leaf {leaf:?} does not contain the object {object}")]
    ObjectNotInLeaf {
        /// The leaf registered by the adaptor.
        leaf: BvhNodeId,
        /// The object that was looked up.
        object: String,
    },
    /// A structural invariant of the tree does not hold.
    #[error("BVH integrity violation at node {node:?}: {reason}")]
    Integrity {
        /// The node where the violation was detected.
        node: BvhNodeId,
        /// The invariant that does not hold.
        reason: &'static str,
    },
}
