//! Bounding sphere.

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};

/// A Bounding Sphere.
///
/// Stored as-is in a BVH through its enclosing [`Aabb`].
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct BoundingSphere {
    /// The center of the sphere.
    pub center: Point<Real>,
    /// The radius of the sphere.
    pub radius: Real,
}

impl BoundingSphere {
    /// Creates a new bounding sphere.
    pub fn new(center: Point<Real>, radius: Real) -> BoundingSphere {
        BoundingSphere { center, radius }
    }

    /// The bounding sphere center.
    #[inline]
    pub fn center(&self) -> &Point<Real> {
        &self.center
    }

    /// The smallest AABB enclosing this sphere.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_half_extents(self.center, Vector::repeat(self.radius))
    }
}

#[cfg(test)]
mod test {
    use super::BoundingSphere;
    use crate::math::Point;

    #[test]
    fn aabb_encloses_sphere() {
        let s = BoundingSphere::new(Point::new(1.0, -2.0, 3.0), 0.5);
        let aabb = s.aabb();
        assert_eq!(aabb.mins, Point::new(0.5, -2.5, 2.5));
        assert_eq!(aabb.maxs, Point::new(1.5, -1.5, 3.5));
    }
}
