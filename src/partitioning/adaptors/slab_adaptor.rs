use super::LeafMap;
use crate::bounding_volume::{Aabb, BoundingSphere};
use crate::math::{Point, Real};
use crate::partitioning::{Bvh, BvhConfig, BvhError, BvhNodeAdaptor, BvhNodeId};
use crate::shape::{Shape, Sphere};
use slab::Slab;

/// The handle of an object stored by a [`SlabAdaptor`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ObjectHandle(pub usize);

/// Geometry of an object that can be stored by a [`SlabAdaptor`].
pub trait BvhObject {
    /// The point used to order this object along an axis when a BVH node is split.
    fn bvh_position(&self) -> Point<Real>;
    /// The bounding box of this object.
    fn bvh_aabb(&self) -> Aabb;
}

impl BvhObject for Sphere {
    fn bvh_position(&self) -> Point<Real> {
        self.center
    }

    fn bvh_aabb(&self) -> Aabb {
        self.aabb()
    }
}

impl BvhObject for Shape {
    fn bvh_position(&self) -> Point<Real> {
        self.centroid()
    }

    fn bvh_aabb(&self) -> Aabb {
        self.aabb()
    }
}

impl BvhObject for BoundingSphere {
    fn bvh_position(&self) -> Point<Real> {
        *self.center()
    }

    fn bvh_aabb(&self) -> Aabb {
        self.aabb()
    }
}

impl BvhObject for Aabb {
    fn bvh_position(&self) -> Point<Real> {
        self.center()
    }

    fn bvh_aabb(&self) -> Aabb {
        *self
    }
}

/// An adaptor owning the indexed objects in a slab, handing out [`ObjectHandle`]s as the
/// BVH objects.
#[derive(Clone, Debug)]
pub struct SlabAdaptor<S> {
    objects: Slab<S>,
    leaves: LeafMap<ObjectHandle>,
}

impl<S> Default for SlabAdaptor<S> {
    fn default() -> Self {
        Self {
            objects: Slab::new(),
            leaves: LeafMap::default(),
        }
    }
}

impl<S> SlabAdaptor<S> {
    /// Creates an adaptor storing no object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new object. It is not indexed by any tree yet.
    pub fn add(&mut self, object: S) -> ObjectHandle {
        ObjectHandle(self.objects.insert(object))
    }

    /// Removes an object from the storage.
    ///
    /// Fails if a leaf still holds `handle`: its slot would otherwise be reused by the next
    /// [`SlabAdaptor::add`]. Use [`Bvh::remove_object`] to drop an indexed object.
    pub fn remove(&mut self, handle: ObjectHandle) -> Result<S, BvhError> {
        if self.leaves.contains(&handle) {
            return Err(BvhError::ObjectStillIndexed(format!("{handle:?}")));
        }

        self.objects
            .try_remove(handle.0)
            .ok_or_else(|| BvhError::UnknownObject(format!("{handle:?}")))
    }

    /// The object with the given handle.
    pub fn get(&self, handle: ObjectHandle) -> Option<&S> {
        self.objects.get(handle.0)
    }

    /// Mutable reference to the object with the given handle.
    pub fn get_mut(&mut self, handle: ObjectHandle) -> Option<&mut S> {
        self.objects.get_mut(handle.0)
    }

    /// The number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Does this adaptor store no object?
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// The number of objects currently mapped to a leaf.
    pub fn mapped_len(&self) -> usize {
        self.leaves.len()
    }

    /// Iterates through all the stored objects.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectHandle, &S)> {
        self.objects
            .iter()
            .map(|(handle, object)| (ObjectHandle(handle), object))
    }

    fn object(&self, handle: &ObjectHandle) -> Result<&S, BvhError> {
        self.objects
            .get(handle.0)
            .ok_or_else(|| BvhError::UnknownObject(format!("{handle:?}")))
    }
}

impl<S: BvhObject> BvhNodeAdaptor<ObjectHandle> for SlabAdaptor<S> {
    fn object_position(&self, object: &ObjectHandle) -> Result<Point<Real>, BvhError> {
        Ok(self.object(object)?.bvh_position())
    }

    fn object_aabb(&self, object: &ObjectHandle) -> Result<Aabb, BvhError> {
        Ok(self.object(object)?.bvh_aabb())
    }

    fn map_object_to_leaf(&mut self, object: &ObjectHandle, leaf: BvhNodeId) {
        self.leaves.map(object, leaf);
    }

    fn unmap_object(&mut self, object: &ObjectHandle) {
        let _ = self.leaves.unmap(object);
    }

    fn leaf_of(&self, object: &ObjectHandle) -> Option<BvhNodeId> {
        self.leaves.get(object)
    }

    fn check_map(&self, object: &ObjectHandle) -> Result<(), BvhError> {
        let _ = self.object(object)?;

        if self.leaves.contains(object) {
            Ok(())
        } else {
            Err(BvhError::UnmappedObject(format!("{object:?}")))
        }
    }
}

/// An adaptor storing spheres.
pub type SphereBvhAdaptor = SlabAdaptor<Sphere>;
/// An adaptor storing spheres and capsules.
pub type ShapeBvhAdaptor = SlabAdaptor<Shape>;
/// A BVH over spheres.
pub type SphereBvh = Bvh<ObjectHandle, SphereBvhAdaptor>;
/// A BVH over spheres and capsules.
pub type ShapeBvh = Bvh<ObjectHandle, ShapeBvhAdaptor>;

impl<S: BvhObject> Bvh<ObjectHandle, SlabAdaptor<S>> {
    /// Builds a tree indexing all the given objects.
    pub fn from_iter<I>(objects: I, config: BvhConfig) -> Result<Self, BvhError>
    where
        I: IntoIterator<Item = S>,
    {
        let mut adaptor = SlabAdaptor::new();
        let handles = objects.into_iter().map(|o| adaptor.add(o)).collect();
        Self::from_objects(adaptor, handles, config)
    }

    /// Stores `object` in the adaptor and inserts it into this tree.
    pub fn insert_object(&mut self, object: S) -> Result<ObjectHandle, BvhError> {
        let handle = self.adaptor_mut().add(object);

        if let Err(err) = self.insert(handle) {
            self.adaptor_mut().unmap_object(&handle);
            let _ = self.adaptor_mut().remove(handle);
            return Err(err);
        }

        Ok(handle)
    }

    /// Removes an object from this tree and from the adaptor storage.
    pub fn remove_object(&mut self, handle: ObjectHandle) -> Result<S, BvhError> {
        self.remove(&handle)?;
        self.adaptor_mut().remove(handle)
    }

    /// Modifies an object with `f`, then refits the tree to its new bounds.
    pub fn update_object(
        &mut self,
        handle: ObjectHandle,
        f: impl FnOnce(&mut S),
    ) -> Result<(), BvhError> {
        let object = self
            .adaptor_mut()
            .get_mut(handle)
            .ok_or_else(|| BvhError::UnknownObject(format!("{handle:?}")))?;
        f(object);
        self.object_moved(&handle)
    }

    /// The object with the given handle.
    pub fn object(&self, handle: ObjectHandle) -> Option<&S> {
        self.adaptor().get(handle)
    }
}
