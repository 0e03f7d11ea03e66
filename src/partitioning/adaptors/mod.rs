//! Ready-to-use adaptors binding objects to a [`Bvh`](super::Bvh).

pub use self::leaf_map::LeafMap;
pub use self::slab_adaptor::{
    BvhObject, ObjectHandle, ShapeBvh, ShapeBvhAdaptor, SlabAdaptor, SphereBvh, SphereBvhAdaptor,
};

mod leaf_map;
mod slab_adaptor;
