use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::query;
use crate::shape::Capsule;

/// A sphere positioned in space.
#[derive(PartialEq, Debug, Copy, Clone)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Sphere {
    /// The center of the sphere.
    pub center: Point<Real>,
    /// The radius of the sphere.
    pub radius: Real,
}

impl Sphere {
    /// Creates a new sphere from its center and radius.
    #[inline]
    pub fn new(center: Point<Real>, radius: Real) -> Sphere {
        Sphere { center, radius }
    }

    /// The AABB of this sphere.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_half_extents(self.center, Vector::repeat(self.radius))
    }

    /// Checks if this sphere intersects `other`. Tangent spheres intersect.
    pub fn intersects_sphere(&self, other: &Sphere) -> bool {
        let sum_radius = self.radius + other.radius;
        na::distance_squared(&self.center, &other.center) <= sum_radius * sum_radius
    }

    /// Checks if this sphere intersects the capsule `other`. Tangent shapes do not intersect.
    pub fn intersects_capsule(&self, other: &Capsule) -> bool {
        let sum_radius = self.radius + other.radius;
        query::segment_segment_distance_squared(&self.center, &self.center, &other.a, &other.b)
            < sum_radius * sum_radius
    }
}
