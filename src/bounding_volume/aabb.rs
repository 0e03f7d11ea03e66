//! Axis Aligned Bounding Box.

use crate::bounding_volume::BoundingVolume;
use crate::math::{Point, Real, Vector, DIM};
use na;

/// An Axis-Aligned Bounding Box (AABB).
///
/// An AABB is defined by its minimum and maximum corners. Its edges are always parallel to the
/// coordinate axes, which makes overlap, inclusion, and merge tests a handful of comparisons.
///
/// # Empty box
///
/// [`Aabb::new_invalid`] returns the empty box with `mins = +∞` and `maxs = -∞`. Merging
/// anything with it yields the other box unchanged, which makes it the identity of
/// [`BoundingVolume::merged`]. Every non-empty box satisfies `mins[i] <= maxs[i]`.
///
/// # Example
///
/// ```rust
/// use dynbvh3d::bounding_volume::{Aabb, BoundingVolume};
/// use nalgebra::Point3;
///
/// let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
/// let b = Aabb::new(Point3::new(2.0, 0.0, 0.0), Point3::new(3.0, 1.0, 1.0));
///
/// let union = a.merged(&b);
/// assert_eq!(union.mins, Point3::new(0.0, 0.0, 0.0));
/// assert_eq!(union.maxs, Point3::new(3.0, 1.0, 1.0));
/// assert_eq!(Aabb::new_invalid().merged(&a), a);
/// ```
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct Aabb {
    /// The point with minimum coordinates.
    pub mins: Point<Real>,
    /// The point with maximum coordinates.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// Creates a new Aabb.
    ///
    /// # Arguments:
    ///   * `mins` - position of the point with the smallest coordinates.
    ///   * `maxs` - position of the point with the highest coordinates. Each component of `mins`
    ///     must be smaller than the related components of `maxs`.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates the empty Aabb, with `mins` at `+∞` and `maxs` at `-∞`.
    ///
    /// This is the identity element of [`BoundingVolume::merge`].
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::INFINITY).into(),
            Vector::repeat(Real::NEG_INFINITY).into(),
        )
    }

    /// Creates a new `Aabb` from its center and its half-extents.
    #[inline]
    pub fn from_half_extents(center: Point<Real>, half_extents: Vector<Real>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Is this the empty box, or a box with at least one inverted axis?
    #[inline]
    pub fn is_empty(&self) -> bool {
        (0..DIM).any(|i| self.mins[i] > self.maxs[i])
    }

    /// The center of this `Aabb`.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// The extents of this `Aabb`.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// The surface area of this `Aabb`: `2 * (dx * dy + dx * dz + dy * dz)`.
    ///
    /// This is the cost proxy of the surface area heuristic. Flat boxes have a zero area
    /// and inverted extents give a negative one; neither is treated as an error.
    #[inline]
    pub fn surface_area(&self) -> Real {
        let extents = self.extents();
        2.0 * (extents.x * extents.y + extents.x * extents.z + extents.y * extents.z)
    }

    /// Does this `Aabb` overlap the sphere with the given center and radius?
    ///
    /// The test is conservative: it compares the sphere's own bounding box with `self`,
    /// boundaries included.
    #[inline]
    pub fn intersects_sphere(&self, center: &Point<Real>, radius: Real) -> bool {
        (0..DIM).all(|i| {
            !(center[i] + radius < self.mins[i]) && !(center[i] - radius > self.maxs[i])
        })
    }
}

impl BoundingVolume for Aabb {
    /// Open-interval overlap test: boxes that only touch along a face do not intersect.
    #[inline]
    fn intersects(&self, other: &Aabb) -> bool {
        (0..DIM).all(|i| self.maxs[i] > other.mins[i] && self.mins[i] < other.maxs[i])
    }

    #[inline]
    fn merge(&mut self, other: &Aabb) {
        self.mins = self.mins.inf(&other.mins);
        self.maxs = self.maxs.sup(&other.maxs);
    }

    #[inline]
    fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            mins: self.mins.inf(&other.mins),
            maxs: self.maxs.sup(&other.maxs),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Aabb;
    use crate::bounding_volume::BoundingVolume;
    use crate::math::{Point, Vector};

    fn unit_box() -> Aabb {
        Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn empty_box_is_merge_identity() {
        let empty = Aabb::new_invalid();
        assert!(empty.is_empty());
        assert_eq!(empty.merged(&unit_box()), unit_box());
        assert_eq!(unit_box().merged(&empty), unit_box());
    }

    #[test]
    fn surface_area_of_boxes() {
        assert_eq!(unit_box().surface_area(), 24.0);

        let slab = Aabb::new(Point::origin(), Point::new(10.0, 10.0, 0.0));
        assert_eq!(slab.surface_area(), 200.0);

        let point = Aabb::new(Point::new(3.0, 4.0, 5.0), Point::new(3.0, 4.0, 5.0));
        assert_eq!(point.surface_area(), 0.0);
    }

    #[test]
    fn overlap_is_open_interval() {
        let a = unit_box();
        let touching = Aabb::new(Point::new(1.0, -1.0, -1.0), Point::new(3.0, 1.0, 1.0));
        let overlapping = Aabb::new(Point::new(0.5, -1.0, -1.0), Point::new(3.0, 1.0, 1.0));

        assert!(!a.intersects(&touching));
        assert!(a.intersects(&overlapping));
        assert!(overlapping.intersects(&a));
    }

    #[test]
    fn sphere_overlap_includes_boundary() {
        let a = unit_box();
        assert!(a.intersects_sphere(&Point::new(2.0, 0.0, 0.0), 1.0));
        assert!(!a.intersects_sphere(&Point::new(2.5, 0.0, 0.0), 1.0));
    }

    #[test]
    fn half_extents_and_center() {
        let a = Aabb::from_half_extents(Point::new(1.0, 2.0, 3.0), Vector::new(0.5, 1.0, 2.0));
        assert_eq!(a, Aabb::new(Point::new(0.5, 1.0, 1.0), Point::new(1.5, 3.0, 5.0)));
        assert_eq!(a.center(), Point::new(1.0, 2.0, 3.0));
        assert_eq!(a.extents(), Vector::new(1.0, 2.0, 4.0));
        assert!(!a.is_empty());
    }
}
