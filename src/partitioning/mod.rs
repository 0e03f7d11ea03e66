//! Spatial partitioning tools.

pub use self::adaptors::{
    BvhObject, LeafMap, ObjectHandle, ShapeBvh, ShapeBvhAdaptor, SlabAdaptor, SphereBvh,
    SphereBvhAdaptor,
};
pub use self::bvh::{
    Bvh, BvhConfig, BvhError, BvhNode, BvhNodeAdaptor, BvhNodeContent, BvhNodeId, BvhRotation,
    SplitAxis,
};

mod adaptors;
mod bvh;
